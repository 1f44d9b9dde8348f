use stampsheet_core::{CellStyle, Fill, FillPattern, StyleId, StylePool};
use std::collections::HashMap;
use tracing::trace;

/// Maps template styles to their clones in the target pool.
///
/// One cache per generation session: each distinct template style is cloned
/// into the target pool at most once, so stamping many rows does not grow
/// the pool.
#[derive(Debug, Default)]
pub struct StyleCache {
    mapped: HashMap<CellStyle, StyleId>,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target-pool handle for `source`, cloning it into `target` on first sight
    pub fn resolve(&mut self, source: &CellStyle, target: &mut StylePool) -> StyleId {
        if let Some(id) = self.mapped.get(source) {
            return *id;
        }

        let mut cloned = source.clone();
        cloned.fill = normalize_fill(cloned.fill);
        let id = target.push(cloned);
        trace!(style = id.0, "cloned template style into target pool");

        self.mapped.insert(source.clone(), id);
        id
    }

    /// Number of styles created so far
    pub fn len(&self) -> usize {
        self.mapped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapped.is_empty()
    }
}

/// Only solid fills survive the copy; every other pattern becomes no fill
fn normalize_fill(fill: Fill) -> Fill {
    match fill.pattern {
        FillPattern::Solid => fill,
        _ => Fill {
            pattern: FillPattern::None,
            ..fill
        },
    }
}
