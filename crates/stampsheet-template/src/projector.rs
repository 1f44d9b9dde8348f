//! Paints styles and dimensions of a template region onto a target region.

use stampsheet_core::{CellCoord, CellRange};
use tracing::trace;

use crate::replicator::CopyContext;

/// Paint `target` from the template region `source`.
///
/// Same-shaped regions are copied cell by cell. Otherwise one blended style
/// (the anchor's style with the bottom-right cell's right and bottom borders)
/// is applied to every target cell, and row heights and column widths are
/// mapped modulo the template region's size.
pub(crate) fn project(ctx: &mut CopyContext<'_>, source: CellRange, target: CellRange) {
    if source.same_shape(&target) {
        copy_cell_by_cell(ctx, source, target);
    } else {
        paint_blended(ctx, source, target);
    }
}

fn copy_cell_by_cell(ctx: &mut CopyContext<'_>, source: CellRange, target: CellRange) {
    for (dy, src_row) in (source.start.row..=source.end.row).enumerate() {
        let dst_row = target.start.row + dy as u32;
        for (dx, src_col) in (source.start.col..=source.end.col).enumerate() {
            let dst_col = target.start.col + dx as u32;
            let style = ctx.resolve_style(CellCoord::new(src_row, src_col));
            ctx.target
                .get_or_create_cell(CellCoord::new(dst_row, dst_col))
                .style = style;
            ctx.copy_col_width(src_col, dst_col);
        }
        ctx.copy_row_height(src_row, dst_row);
    }
}

fn paint_blended(ctx: &mut CopyContext<'_>, source: CellRange, target: CellRange) {
    let corner = ctx.source_style(source.end);
    let mut blended = ctx.source_style(source.start).clone();
    blended.borders.right = corner.borders.right;
    blended.borders.bottom = corner.borders.bottom;
    let style = ctx.cache.resolve(&blended, ctx.target_styles);
    trace!(%source, %target, "painting blended region style");

    for (dy, dst_row) in (target.start.row..=target.end.row).enumerate() {
        for (dx, dst_col) in (target.start.col..=target.end.col).enumerate() {
            ctx.target
                .get_or_create_cell(CellCoord::new(dst_row, dst_col))
                .style = style;
            let src_col = source.start.col + dx as u32 % source.col_span();
            ctx.copy_col_width(src_col, dst_col);
        }
        let src_row = source.start.row + dy as u32 % source.row_span();
        ctx.copy_row_height(src_row, dst_row);
    }
}
