//! Table detection over a page layout.
//!
//! Spans are clustered into visual rows by baseline, nearby spans of a row
//! are merged into cells, and runs of multi-cell rows become tables whose
//! columns are anchored on their widest row.

use super::layout::{PageLayout, TextSpan};
use crate::table::{ColumnSpan, RawTable, nearest_column};

/// Baselines closer than this (× font size) share a row.
const ROW_TOLERANCE: f32 = 0.35;
/// Horizontal gap (× font size) under which two spans are one cell.
const CELL_GAP: f32 = 1.2;
/// Gap (× font size) under which spans are glued without a space.
const WORD_GAP: f32 = 0.15;
/// Max distance (× row height) from a table row to a wrapped line below it.
const CONTINUATION_GAP: f32 = 1.6;
/// Vertical gap (× row height) that ends a table.
const MULTI_ROW_GAP: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Cell {
    pub x0: f32,
    pub x1: f32,
    pub text: String,
}

impl Cell {
    fn span(&self) -> ColumnSpan {
        ColumnSpan::new(self.x0, self.x1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VisualRow {
    pub y: f32,
    pub height: f32,
    pub cells: Vec<Cell>,
}

/// Rows top to bottom, cells left to right.
pub(crate) fn visual_rows(layout: &PageLayout) -> Vec<VisualRow> {
    let mut spans: Vec<&TextSpan> = layout.spans.iter().collect();
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut groups: Vec<Vec<&TextSpan>> = Vec::new();
    for span in spans {
        let tolerance = ROW_TOLERANCE * span.font_size.max(1.0);
        match groups.last_mut() {
            Some(group) if (group[0].y - span.y).abs() <= tolerance => group.push(span),
            _ => groups.push(vec![span]),
        }
    }

    groups
        .into_iter()
        .map(|mut group| {
            group.sort_by(|a, b| a.x.total_cmp(&b.x));
            let height = group.iter().map(|s| s.font_size).fold(1.0_f32, f32::max);
            VisualRow {
                y: group[0].y,
                height,
                cells: merge_cells(&group),
            }
        })
        .collect()
}

fn merge_cells(spans: &[&TextSpan]) -> Vec<Cell> {
    let mut cells: Vec<Cell> = Vec::new();
    for span in spans {
        let size = span.font_size.max(1.0);
        match cells.last_mut() {
            Some(cell) if span.x - cell.x1 <= CELL_GAP * size => {
                if span.x - cell.x1 > WORD_GAP * size {
                    cell.text.push(' ');
                }
                cell.text.push_str(&span.text);
                cell.x1 = cell.x1.max(span.right());
            }
            _ => cells.push(Cell {
                x0: span.x,
                x1: span.right(),
                text: span.text.clone(),
            }),
        }
    }
    for cell in &mut cells {
        cell.text = cell.text.trim().to_string();
    }
    cells
}

/// Plain text of the page, one line per visual row.
pub fn page_text(layout: &PageLayout) -> String {
    visual_rows(layout)
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tables on the page, top to bottom, numbered from 1.
pub fn tables(layout: &PageLayout) -> Vec<RawTable> {
    let mut blocks: Vec<Vec<VisualRow>> = Vec::new();
    let mut current: Vec<VisualRow> = Vec::new();

    for row in visual_rows(layout) {
        let gap = current.last().map(|last| last.y - row.y);
        if row.cells.len() >= 2 {
            if gap.is_some_and(|g| g > MULTI_ROW_GAP * row.height) {
                blocks.push(std::mem::take(&mut current));
            }
            current.push(row);
            continue;
        }

        let Some(last) = current.last_mut() else {
            continue;
        };
        if gap.is_some_and(|g| g <= CONTINUATION_GAP * last.height) {
            // wrapped line of the row above
            for cell in row.cells {
                let target = nearest_cell(&cell, &last.cells);
                let dest = &mut last.cells[target];
                dest.text.push('\n');
                dest.text.push_str(&cell.text);
            }
            last.y = row.y;
        } else {
            blocks.push(std::mem::take(&mut current));
        }
    }
    blocks.push(current);

    blocks
        .into_iter()
        .filter(|block| !block.is_empty())
        .filter_map(|block| {
            let bands = column_bands(&block);
            (bands.len() >= 2).then(|| project(&block, bands))
        })
        .enumerate()
        .map(|(i, (rows, bands))| RawTable::new(layout.page, i + 1, rows).with_columns(bands))
        .collect()
}

fn nearest_cell(cell: &Cell, cells: &[Cell]) -> usize {
    let spans: Vec<ColumnSpan> = cells.iter().map(Cell::span).collect();
    nearest_column(&cell.span(), &spans)
}

/// Disjoint column bands for a block, left to right.
///
/// The row with the most cells (the header, for a block that has one)
/// anchors the bands, and its cells never share a band. Every other cell
/// widens the band it overlaps most, up to the neighbouring band, so a long
/// description spilling into the next column cannot fuse two columns.
/// Cells clear of every band form bands of their own.
fn column_bands(block: &[VisualRow]) -> Vec<ColumnSpan> {
    let Some(anchor) = block
        .iter()
        .enumerate()
        .rev()
        .max_by_key(|(_, row)| row.cells.len())
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };

    let mut bands: Vec<ColumnSpan> = block[anchor].cells.iter().map(Cell::span).collect();
    let mut loose: Vec<ColumnSpan> = Vec::new();
    for (_, row) in block.iter().enumerate().filter(|(i, _)| *i != anchor) {
        for span in row.cells.iter().map(Cell::span) {
            match best_overlap(&span, &bands) {
                Some(i) => widen(&mut bands, i, &span),
                None => loose.push(span),
            }
        }
    }

    loose.sort_by(|a, b| a.x0.total_cmp(&b.x0));
    let mut merged: Vec<ColumnSpan> = Vec::new();
    for span in loose {
        match merged.last_mut() {
            Some(band) if span.x0 <= band.x1 => band.x1 = band.x1.max(span.x1),
            _ => merged.push(span),
        }
    }
    for span in merged {
        match best_overlap(&span, &bands) {
            Some(i) => widen(&mut bands, i, &span),
            None => {
                let at = bands.partition_point(|band| band.x0 < span.x0);
                bands.insert(at, span);
            }
        }
    }
    bands
}

fn best_overlap(span: &ColumnSpan, bands: &[ColumnSpan]) -> Option<usize> {
    bands
        .iter()
        .map(|band| span.overlap(band))
        .enumerate()
        .filter(|(_, overlap)| *overlap > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Grow `bands[i]` over `span` without reaching into its neighbours.
fn widen(bands: &mut [ColumnSpan], i: usize, span: &ColumnSpan) {
    let floor = i.checked_sub(1).map_or(f32::NEG_INFINITY, |prev| bands[prev].x1);
    let ceiling = bands.get(i + 1).map_or(f32::INFINITY, |next| next.x0);
    let band = &mut bands[i];
    band.x0 = band.x0.min(span.x0.max(floor));
    band.x1 = band.x1.max(span.x1.min(ceiling));
}

fn project(block: &[VisualRow], bands: Vec<ColumnSpan>) -> (Vec<Vec<String>>, Vec<ColumnSpan>) {
    let rows = block
        .iter()
        .map(|row| {
            let mut out = vec![String::new(); bands.len()];
            for cell in &row.cells {
                let dest = &mut out[nearest_column(&cell.span(), &bands)];
                if !dest.is_empty() {
                    dest.push(' ');
                }
                dest.push_str(&cell.text);
            }
            out
        })
        .collect();
    (rows, bands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(x: f32, y: f32, text: &str) -> TextSpan {
        TextSpan {
            x,
            y,
            width: text.chars().count() as f32 * 5.0,
            font_size: 10.0,
            text: text.to_string(),
        }
    }

    fn page(spans: Vec<TextSpan>) -> PageLayout {
        PageLayout { page: 1, spans }
    }

    #[test]
    fn test_rows_and_cells() {
        let layout = page(vec![
            span(110.0, 700.0, "UPI"),
            span(40.0, 700.5, "Date"),
            span(127.0, 700.0, "PAYTM"),
            span(40.0, 680.0, "next"),
        ]);
        let rows = visual_rows(&layout);
        assert_eq!(rows.len(), 2);
        let texts: Vec<_> = rows[0].cells.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["Date", "UPI PAYTM"]);
        assert_eq!(page_text(&layout), "Date  UPI PAYTM\nnext");
    }

    #[test]
    fn test_table_with_wrapped_description() {
        let layout = page(vec![
            span(40.0, 760.0, "Statement of Account"),
            span(40.0, 700.0, "Date"),
            span(110.0, 700.0, "Description"),
            span(250.0, 700.0, "Amount"),
            span(40.0, 686.0, "01-Jan-24"),
            span(110.0, 686.0, "UPI/PAYTM"),
            span(250.0, 686.0, "100.00"),
            span(110.0, 674.0, "GROCERY"),
            span(40.0, 660.0, "02-Jan-24"),
            span(110.0, 660.0, "ATM"),
            span(250.0, 660.0, "-20.00"),
            span(40.0, 500.0, "Page 1 of 2"),
        ]);
        let tables = tables(&layout);
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!((t.page, t.index), (1, 1));
        assert_eq!(t.rows.len(), 3);
        assert_eq!(t.rows[0], ["Date", "Description", "Amount"]);
        assert_eq!(t.rows[1], ["01-Jan-24", "UPI/PAYTM\nGROCERY", "100.00"]);
        assert_eq!(t.rows[2], ["02-Jan-24", "ATM", "-20.00"]);
        assert_eq!(t.columns.len(), 3);
    }

    #[test]
    fn test_blank_cells_and_separate_tables() {
        let layout = page(vec![
            span(40.0, 700.0, "Date"),
            span(110.0, 700.0, "Debit"),
            span(200.0, 700.0, "Credit"),
            span(40.0, 686.0, "01-Jan-24"),
            span(200.0, 686.0, "5.00"),
            // far below: a second table
            span(40.0, 400.0, "Total"),
            span(200.0, 400.0, "5.00"),
        ]);
        let tables = tables(&layout);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows[1], ["01-Jan-24", "", "5.00"]);
        assert_eq!(tables[1].index, 2);
        assert_eq!(tables[1].rows[0], ["Total", "5.00"]);
    }

    #[test]
    fn test_prose_page_has_no_tables() {
        let layout = page(vec![
            span(40.0, 700.0, "This page intentionally"),
            span(40.0, 686.0, "left blank."),
        ]);
        assert!(tables(&layout).is_empty());
    }

    #[test]
    fn test_overflowing_cell_keeps_header_columns() {
        let layout = page(vec![
            span(40.0, 700.0, "Txn Date"),
            span(110.0, 700.0, "Description"),
            span(250.0, 700.0, "Ref No."),
            span(360.0, 700.0, "Debit"),
            span(40.0, 686.0, "03-Jan-24"),
            // runs to x = 275, past the start of the Ref column
            span(110.0, 686.0, "TO TRANSFER-UPI/DR/4031/ACME CORP"),
            span(360.0, 686.0, "1,200.00"),
            span(40.0, 672.0, "04-Jan-24"),
            span(110.0, 672.0, "Rent"),
            span(250.0, 672.0, "CHQ 0041"),
            span(360.0, 672.0, "5,000.00"),
        ]);
        let tables = tables(&layout);
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.columns.len(), 4);
        assert_eq!(t.rows[0], ["Txn Date", "Description", "Ref No.", "Debit"]);
        assert_eq!(t.rows[1], ["03-Jan-24", "TO TRANSFER-UPI/DR/4031/ACME CORP", "", "1,200.00"]);
        assert_eq!(t.rows[2], ["04-Jan-24", "Rent", "CHQ 0041", "5,000.00"]);
        // the description band stops where the Ref band starts
        assert_eq!(t.columns[1].x1, 250.0);
    }

    #[test]
    fn test_cells_outside_anchor_columns_form_bands() {
        let layout = page(vec![
            span(40.0, 700.0, "Date"),
            span(110.0, 700.0, "Amount"),
            span(300.0, 700.0, "Balance"),
            span(400.0, 700.0, "Note"),
            span(40.0, 686.0, "01-Jan-24"),
            span(110.0, 686.0, "5.00"),
            span(200.0, 686.0, "*"),
            span(300.0, 686.0, "5.00"),
        ]);
        let t = &tables(&layout)[0];
        assert_eq!(t.columns.len(), 5);
        assert_eq!(t.rows[0], ["Date", "Amount", "", "Balance", "Note"]);
        assert_eq!(t.rows[1], ["01-Jan-24", "5.00", "*", "5.00", ""]);
    }
}
