use stampsheet_core::{
    CellCoord, CellRange, CellStyle, CellValue, ClientAnchor, Row, Sheet, StyleId, StylePool,
    Workbook,
};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, trace, warn};

use crate::config::SessionConfig;
use crate::error::{Result, TemplateError};
use crate::merged::{self, RowBlock};
use crate::picture;
use crate::placeholder::{self, DataMap};
use crate::projector;
use crate::style_cache::StyleCache;

/// One generation session: stamps rows of a template sheet into a new sheet
/// of the target workbook.
///
/// The template is never modified. The target sheet, its workbook's style
/// pool and the style cache grow for the life of the session.
#[derive(Debug)]
pub struct RowReplicator {
    template: Workbook,
    template_sheet: usize,
    target: Workbook,
    target_sheet: usize,
    styles: StyleCache,
}

impl RowReplicator {
    /// Start a session over an already loaded template workbook
    pub fn new(template: Workbook, mut target: Workbook, config: &SessionConfig) -> Result<Self> {
        if template.get_sheet(config.template_sheet).is_none() {
            return Err(TemplateError::MissingTemplateSheet(config.template_sheet));
        }

        let target_sheet = match &config.target_sheet_name {
            Some(name) => target.add_sheet(name.clone())?,
            None => target.add_sheet_auto(),
        };

        info!(
            template = %template.name,
            template_sheet = config.template_sheet,
            target_sheet = %target.sheets[target_sheet].name,
            "generation session started"
        );

        Ok(Self {
            template,
            template_sheet: config.template_sheet,
            target,
            target_sheet,
            styles: StyleCache::new(),
        })
    }

    /// Start a session from a template file
    pub fn open(path: impl AsRef<Path>, target: Workbook, config: &SessionConfig) -> Result<Self> {
        let template = Workbook::open(path).map_err(TemplateError::SourceFormat)?;
        Self::new(template, target, config)
    }

    pub fn template_sheet(&self) -> &Sheet {
        &self.template.sheets[self.template_sheet]
    }

    pub fn target_sheet(&self) -> &Sheet {
        &self.target.sheets[self.target_sheet]
    }

    pub fn target_sheet_mut(&mut self) -> &mut Sheet {
        &mut self.target.sheets[self.target_sheet]
    }

    pub fn target(&self) -> &Workbook {
        &self.target
    }

    /// End the session and hand back the target workbook
    pub fn into_target(self) -> Workbook {
        self.target
    }

    pub fn style_cache(&self) -> &StyleCache {
        &self.styles
    }

    /// Display text of the merged template cell covering `(row, col)`
    pub fn template_merged_value(&self, row: u32, col: u32) -> String {
        merged::merged_region_value(self.template_sheet(), row, col)
    }

    /// Copy template row `source_row` (widened to its merged block) below the
    /// last row of the target sheet, substituting placeholders from `data`.
    pub fn append_row(&mut self, source_row: u32, data: Option<&DataMap>) -> Result<()> {
        let block = merged::row_block(self.template_sheet(), source_row);
        if let Some(data) = data {
            check_block(self.template_sheet(), &block, data)?;
        }

        let start = match self.target_sheet().last_row_num() {
            Some(last) => u64::from(last) + 1,
            None => 0,
        };
        let start = ensure_rows_fit(start, block.row_count())?;
        debug!(
            source_row,
            target_row = start,
            rows = block.row_count(),
            "appending template block"
        );

        self.context().copy_block(&block, start, data)
    }

    /// Copy template row `source_row` to `target_row`, shifting occupied
    /// target rows down to make room. Does nothing when `target_row` already
    /// crosses a merged region.
    ///
    /// Rows from the first occupied destination row through the last target
    /// row move down far enough that the first of them lands directly below
    /// the copied block, so existing content is never overwritten.
    pub fn copy_row(
        &mut self,
        source_row: u32,
        target_row: u32,
        data: Option<&DataMap>,
    ) -> Result<()> {
        if merged::row_intersects_any_region(self.target_sheet(), target_row) {
            debug!(source_row, target_row, "target row already merged, skipping copy");
            return Ok(());
        }

        let block = merged::row_block(self.template_sheet(), source_row);
        if let Some(data) = data {
            check_block(self.template_sheet(), &block, data)?;
        }
        ensure_rows_fit(u64::from(target_row), block.row_count())?;

        let block_end = target_row + block.row_count();
        let target = self.target_sheet_mut();
        let first_occupied = (target_row..block_end).find(|row| target.row(*row).is_some());
        if let (Some(first), Some(last)) = (first_occupied, target.last_row_num()) {
            let by = block_end - first;
            ensure_rows_fit(u64::from(last) + 1, by)?;
            debug!(first, last, by, "shifting target rows to make room");
            target.shift_rows(first, last, by);
        }

        self.context().copy_block(&block, target_row, data)
    }

    /// Merge `target_range` in the target sheet, replacing any merged region
    /// it overlaps, and paint it from `template_region`.
    pub fn add_merged_range(&mut self, template_region: CellRange, target_range: CellRange) {
        let mut ctx = self.context();

        let stale = merged::overlapping_indices(ctx.target, &target_range);
        for index in stale.into_iter().rev() {
            ctx.target.remove_merged_region(index);
        }
        ctx.target.add_merged_region(target_range);
        debug!(%template_region, %target_range, "merged target range");

        projector::project(&mut ctx, template_region, target_range);
    }

    /// Embed the picture at `path` in the target workbook.
    ///
    /// Returns the picture index, or `None` when the path is not a file or its
    /// extension names no supported format.
    pub fn add_picture(&mut self, path: impl AsRef<Path>) -> Result<Option<usize>> {
        let Some(data) = picture::load_picture(path.as_ref())? else {
            return Ok(None);
        };
        let index = self.target.add_picture(data);
        debug!(index, "embedded picture");
        Ok(Some(index))
    }

    /// Place an embedded picture on the target sheet. Returns `false` for an
    /// unknown picture index.
    pub fn anchor_picture(
        &mut self,
        anchor: ClientAnchor,
        picture_index: usize,
        scale: Option<f64>,
    ) -> bool {
        if picture_index >= self.target.pictures.len() {
            warn!(picture_index, "no embedded picture at index");
            return false;
        }
        self.target_sheet_mut()
            .drawing_mut()
            .add_picture(anchor, picture_index, scale);
        true
    }

    /// Persist the target workbook to `path`
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        self.target.save(path)?;
        Ok(())
    }

    /// Persist the target workbook into `writer`
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        self.target.write_to(writer)?;
        Ok(())
    }

    fn context(&mut self) -> CopyContext<'_> {
        CopyContext {
            source: &self.template.sheets[self.template_sheet],
            source_styles: &self.template.styles,
            target: &mut self.target.sheets[self.target_sheet],
            target_styles: &mut self.target.styles,
            cache: &mut self.styles,
        }
    }
}

/// Fail before writing anything if a placeholder in the block cannot be
/// resolved against `data`
fn check_block(source: &Sheet, block: &RowBlock, data: &DataMap) -> Result<()> {
    for row in block.rows() {
        let Some((first, last)) = source.row(row).and_then(cell_span) else {
            continue;
        };
        for col in first..=last {
            let coord = merged::region_containing(source, row, col)
                .map_or(CellCoord::new(row, col), |region| region.start);
            if let Some(CellValue::Text(text)) = source.get_cell(coord).map(|cell| &cell.value) {
                placeholder::check(text, data)?;
            }
        }
    }
    Ok(())
}

/// First row of a `rows`-row block starting at `first`, when the whole block
/// fits inside a sheet
fn ensure_rows_fit(first: u64, rows: u32) -> Result<u32> {
    let last = first + u64::from(rows) - 1;
    if last >= u64::from(Sheet::MAX_ROWS) {
        return Err(TemplateError::RowLimit { row: last });
    }
    Ok(first as u32)
}

fn cell_span(row: &Row) -> Option<(u32, u32)> {
    Some((row.first_cell_num()?, row.last_cell_num()?))
}

/// Borrowed view over everything one copy operation touches
pub(crate) struct CopyContext<'a> {
    pub(crate) source: &'a Sheet,
    pub(crate) source_styles: &'a StylePool,
    pub(crate) target: &'a mut Sheet,
    pub(crate) target_styles: &'a mut StylePool,
    pub(crate) cache: &'a mut StyleCache,
}

impl<'a> CopyContext<'a> {
    /// Template style of the cell at `coord`; absent cells have the default style
    pub(crate) fn source_style(&self, coord: CellCoord) -> &'a CellStyle {
        let source = self.source;
        let id = source.get_cell(coord).map_or(StyleId::DEFAULT, |cell| cell.style);
        self.source_styles.get_or_default(id)
    }

    /// Target-pool handle for the style of the template cell at `coord`
    pub(crate) fn resolve_style(&mut self, coord: CellCoord) -> StyleId {
        let style = self.source_style(coord);
        self.cache.resolve(style, self.target_styles)
    }

    pub(crate) fn copy_row_height(&mut self, source_row: u32, target_row: u32) {
        let height = self.source.row(source_row).and_then(Row::height);
        self.target.get_or_create_row(target_row).set_height(height);
    }

    pub(crate) fn copy_col_width(&mut self, source_col: u32, target_col: u32) {
        let width = self.source.get_col_width(source_col);
        self.target.set_col_width(target_col, width);
    }

    fn copy_block(&mut self, block: &RowBlock, start: u32, data: Option<&DataMap>) -> Result<()> {
        let source = self.source;

        for (offset, row) in block.rows().enumerate() {
            let target_row = start + offset as u32;
            let Some((first, last)) = source.row(row).and_then(cell_span) else {
                continue;
            };

            for col in first..=last {
                if merged::region_containing(self.target, target_row, col).is_some() {
                    trace!(target_row, col, "target cell already merged, skipping");
                    continue;
                }
                match merged::region_containing(source, row, col) {
                    Some(region) => {
                        self.replicate_region(region, block.first_row, row, target_row, data)?
                    }
                    None => self.copy_cell(row, col, target_row, data)?,
                }
            }
        }
        Ok(())
    }

    /// Recreate a whole template region at the target row offset
    fn replicate_region(
        &mut self,
        region: CellRange,
        block_first_row: u32,
        row: u32,
        target_row: u32,
        data: Option<&DataMap>,
    ) -> Result<()> {
        let lead = row - region.start.row.max(block_first_row);
        let target_region = region.moved_to_row(target_row - lead);
        if merged::range_intersects_any_region(self.target, &target_region) {
            debug!(%region, %target_region, "target range overlaps a merged region, skipping");
            return Ok(());
        }

        let source = self.source;
        let anchor_value = source
            .get_cell(region.start)
            .map(|cell| cell.value.clone())
            .unwrap_or_default();
        let value = placeholder::substitute(&anchor_value, data)?;
        let anchor = self.target.get_or_create_cell(target_region.start);
        if let Some(value) = value {
            anchor.value = value;
        }

        self.target.add_merged_region(target_region);
        self.copy_row_height(row, target_row);
        projector::project(self, region, target_region);
        debug!(%region, %target_region, "replicated merged region");
        Ok(())
    }

    /// Copy one unmerged cell: style, substituted value, row height, column width
    fn copy_cell(
        &mut self,
        row: u32,
        col: u32,
        target_row: u32,
        data: Option<&DataMap>,
    ) -> Result<()> {
        let source = self.source;
        let Some(cell) = source.get_cell(CellCoord::new(row, col)) else {
            return Ok(());
        };

        let value = placeholder::substitute(&cell.value, data)?;
        let style = self
            .cache
            .resolve(self.source_styles.get_or_default(cell.style), self.target_styles);

        let target = self.target.get_or_create_cell(CellCoord::new(target_row, col));
        target.style = style;
        if let Some(value) = value {
            target.value = value;
        }

        self.copy_row_height(row, target_row);
        self.copy_col_width(col, col);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stampsheet_core::{Cell, PictureFormat};

    fn data(value: serde_json::Value) -> DataMap {
        value.as_object().cloned().unwrap()
    }

    fn replicator(template: Workbook) -> RowReplicator {
        RowReplicator::new(template, Workbook::blank("out"), &SessionConfig::default()).unwrap()
    }

    fn coord(a1: &str) -> CellCoord {
        CellCoord::from_a1(a1).unwrap()
    }

    #[test]
    fn test_new_creates_target_sheet() {
        let config = SessionConfig::default().with_target_sheet_name("Invoice");
        let rep = RowReplicator::new(Workbook::new("tpl"), Workbook::new("out"), &config).unwrap();
        assert_eq!(rep.target_sheet().name, "Invoice");
        assert_eq!(rep.target().sheet_count(), 2);

        let auto = replicator(Workbook::new("tpl"));
        assert_eq!(auto.target_sheet().name, "Sheet1");
    }

    #[test]
    fn test_new_rejects_missing_template_sheet() {
        let config = SessionConfig::default().with_template_sheet(3);
        let err =
            RowReplicator::new(Workbook::new("tpl"), Workbook::blank("out"), &config).unwrap_err();
        assert!(matches!(err, TemplateError::MissingTemplateSheet(3)));
    }

    #[test]
    fn test_new_rejects_duplicate_target_name() {
        let config = SessionConfig::default().with_target_sheet_name("Sheet1");
        let err =
            RowReplicator::new(Workbook::new("tpl"), Workbook::new("out"), &config).unwrap_err();
        assert!(matches!(err, TemplateError::Sheet(_)));
    }

    #[test]
    fn test_preflight_failure_writes_nothing() {
        let mut template = Workbook::new("tpl");
        let sheet = &mut template.sheets[0];
        sheet.set_cell(coord("A1"), Cell::text("#name#"));
        sheet.set_cell(coord("B1"), Cell::text("#missing#"));

        let mut rep = replicator(template);
        let err = rep.append_row(0, Some(&data(json!({"name": "x"})))).unwrap_err();

        assert!(matches!(err, TemplateError::MissingKey { ref key } if key == "missing"));
        assert_eq!(rep.target_sheet().row_count(), 0);
        assert!(rep.style_cache().is_empty());
    }

    #[test]
    fn test_block_entered_below_region_anchor() {
        // A1:A3 is the first region crossing row 1; B2:B3 starts inside the block
        let mut template = Workbook::new("tpl");
        let sheet = &mut template.sheets[0];
        sheet.set_cell(coord("A1"), Cell::text("group"));
        sheet.set_cell(coord("B2"), Cell::text("detail"));
        sheet.set_cell(coord("C3"), Cell::number(1.0));
        sheet.add_merged_region(CellRange::from_a1("A1:A3").unwrap());
        sheet.add_merged_region(CellRange::from_a1("B2:B3").unwrap());

        let mut rep = replicator(template);
        rep.append_row(1, None).unwrap();

        let target = rep.target_sheet();
        let regions: Vec<String> = target.merged_regions().iter().map(CellRange::to_a1).collect();
        assert_eq!(regions, vec!["A1:A3", "B2:B3"]);
        assert_eq!(target.get_cell(coord("A1")).unwrap().value, CellValue::Text("group".into()));
        assert_eq!(target.get_cell(coord("B2")).unwrap().value, CellValue::Text("detail".into()));
        assert_eq!(target.get_cell(coord("C3")).unwrap().value, CellValue::Number(1.0));
    }

    #[test]
    fn test_add_merged_range_replaces_overlaps() {
        let mut template = Workbook::new("tpl");
        template.sheets[0].set_cell(coord("A1"), Cell::text("title"));

        let mut rep = replicator(template);
        let target = rep.target_sheet_mut();
        target.add_merged_region(CellRange::from_a1("A1:B1").unwrap());
        target.add_merged_region(CellRange::from_a1("D1:D2").unwrap());
        target.add_merged_region(CellRange::from_a1("C2:C3").unwrap());

        rep.add_merged_range(
            CellRange::from_a1("A1:B1").unwrap(),
            CellRange::from_a1("A2:C2").unwrap(),
        );

        let regions: Vec<String> = rep
            .target_sheet()
            .merged_regions()
            .iter()
            .map(CellRange::to_a1)
            .collect();
        assert_eq!(regions, vec!["A1:B1", "D1:D2", "A2:C2"]);
        assert!(rep.target_sheet().get_cell(coord("C2")).is_some());
    }

    #[test]
    fn test_pictures() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let mut rep = replicator(Workbook::new("tpl"));
        assert_eq!(rep.add_picture(dir.path().join("none.png")).unwrap(), None);
        let index = rep.add_picture(&path).unwrap().unwrap();
        assert_eq!(rep.target().pictures[index].format, PictureFormat::Png);

        let anchor = ClientAnchor::new(0, 0, 0, 0, 1, 1, 3, 5);
        assert!(rep.anchor_picture(anchor, index, Some(0.5)));
        assert!(!rep.anchor_picture(anchor, index + 1, None));

        let drawing = rep.target_sheet().drawing().unwrap();
        assert_eq!(drawing.pictures.len(), 1);
        assert_eq!(drawing.pictures[0].scale, Some(0.5));
    }

    #[test]
    fn test_template_merged_value() {
        let mut template = Workbook::new("tpl");
        template.sheets[0].set_cell(coord("B2"), Cell::boolean(true));
        template.sheets[0].add_merged_region(CellRange::from_a1("B2:C2").unwrap());

        let rep = replicator(template);
        assert_eq!(rep.template_merged_value(1, 2), "TRUE");
        assert_eq!(rep.template_merged_value(0, 0), "");
    }

    #[test]
    fn test_copy_row_moves_gapped_rows_below_block() {
        let mut template = Workbook::new("tpl");
        template.sheets[0].set_cell(coord("A1"), Cell::text("block"));
        template.sheets[0].add_merged_region(CellRange::from_a1("A1:A3").unwrap());

        let mut rep = replicator(template);
        rep.target_sheet_mut().set_cell(coord("A1"), Cell::text("first"));
        rep.target_sheet_mut().set_cell(coord("A3"), Cell::text("third"));

        rep.copy_row(0, 0, None).unwrap();

        let target = rep.target_sheet();
        let text = |a1: &str| target.get_cell(coord(a1)).map(|c| c.value.display_text());
        assert_eq!(text("A1").as_deref(), Some("block"));
        assert_eq!(text("A4").as_deref(), Some("first"));
        assert_eq!(text("A6").as_deref(), Some("third"));
        assert_eq!(target.merged_regions(), &[CellRange::from_a1("A1:A3").unwrap()]);
    }

    #[test]
    fn test_rows_past_sheet_end_rejected() {
        let mut template = Workbook::new("tpl");
        template.sheets[0].set_cell(coord("A1"), Cell::text("x"));

        let mut rep = replicator(template);
        let last = Sheet::MAX_ROWS - 1;
        rep.target_sheet_mut()
            .set_cell(CellCoord::new(last, 0), Cell::text("last"));
        let before = rep.target().clone();

        let limit = u64::from(Sheet::MAX_ROWS);
        assert!(matches!(
            rep.append_row(0, None),
            Err(TemplateError::RowLimit { row }) if row == limit
        ));
        // fits, but the occupied row cannot move down
        assert!(matches!(
            rep.copy_row(0, last, None),
            Err(TemplateError::RowLimit { row }) if row == limit
        ));
        assert!(matches!(
            rep.copy_row(0, Sheet::MAX_ROWS, None),
            Err(TemplateError::RowLimit { .. })
        ));
        assert_eq!(rep.target(), &before);
    }
}
