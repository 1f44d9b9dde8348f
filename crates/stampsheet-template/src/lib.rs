//! Template-driven sheet generation.
//!
//! A [`RowReplicator`] stamps rows of a template sheet into a new sheet,
//! expanding merged blocks, substituting `#name#` placeholders from caller
//! data and cloning each template style into the target workbook once.

pub mod config;
pub mod error;
pub mod merged;
pub mod picture;
pub mod placeholder;
mod projector;
pub mod replicator;
pub mod style_cache;

pub use config::SessionConfig;
pub use error::{Result, TemplateError};
pub use merged::RowBlock;
pub use placeholder::{DataMap, Resolved};
pub use replicator::RowReplicator;
pub use style_cache::StyleCache;
