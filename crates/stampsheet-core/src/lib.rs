pub mod cell;
pub mod drawing;
pub mod error;
pub mod range;
pub mod sheet;
pub mod style;
pub mod workbook;

pub use cell::{Cell, CellValue};
pub use drawing::{ClientAnchor, Drawing, Picture, PictureData, PictureFormat};
pub use error::{CellError, SheetError};
pub use range::{col_from_label, col_to_label, CellCoord, CellRange};
pub use sheet::{Row, Sheet, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
pub use style::{
    BorderSide, BorderStyle, Borders, CellStyle, Color, Fill, FillPattern, HorizontalAlign,
    StyleId, StylePool, VerticalAlign,
};
pub use workbook::Workbook;
