//! Raw tables as they come out of a document, before any header mapping

/// Horizontal extent of a column on the page, in PDF user-space units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpan {
    pub x0: f32,
    pub x1: f32,
}

impl ColumnSpan {
    pub fn new(x0: f32, x1: f32) -> Self {
        Self { x0, x1 }
    }

    pub fn overlap(&self, other: &ColumnSpan) -> f32 {
        (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0)
    }

    pub fn center(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }
}

/// Rows of trimmed cell strings. Blank cells are `""`, every row has the
/// same width. `page` and `index` are 1-based and only used for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub page: usize,
    pub index: usize,
    pub rows: Vec<Vec<String>>,
    /// Column geometry when the table came from a page layout; empty otherwise.
    pub columns: Vec<ColumnSpan>,
}

impl RawTable {
    pub fn new(page: usize, index: usize, rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut row: Vec<String> = row.into_iter().map(|c| c.trim().to_string()).collect();
                row.resize(width, String::new());
                row
            })
            .collect();

        Self {
            page,
            index,
            rows,
            columns: Vec::new(),
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnSpan>) -> Self {
        self.columns = columns;
        self
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Re-project this table onto another table's column layout.
    ///
    /// A continuation table on a later page may have fewer columns than the
    /// table that carried the header (a column that happens to be blank on
    /// every row of the page never forms a band). Each of our columns is
    /// moved to the target column it overlaps most, or the nearest one.
    /// Without geometry on both sides the table is returned unchanged.
    pub fn realign(&self, target: &[ColumnSpan]) -> RawTable {
        if target.is_empty() || self.columns.is_empty() || self.columns == target {
            return self.clone();
        }

        let mapping: Vec<usize> = self
            .columns
            .iter()
            .map(|col| nearest_column(col, target))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = vec![String::new(); target.len()];
                for (cell, &dest) in row.iter().zip(&mapping) {
                    if cell.is_empty() {
                        continue;
                    }
                    if !out[dest].is_empty() {
                        out[dest].push(' ');
                    }
                    out[dest].push_str(cell);
                }
                out
            })
            .collect();

        RawTable {
            page: self.page,
            index: self.index,
            rows,
            columns: target.to_vec(),
        }
    }
}

/// Index of the column in `columns` that best matches `span`.
pub(crate) fn nearest_column(span: &ColumnSpan, columns: &[ColumnSpan]) -> usize {
    let mut best = 0;
    let mut best_overlap = 0.0_f32;
    for (i, col) in columns.iter().enumerate() {
        let overlap = span.overlap(col);
        if overlap > best_overlap {
            best = i;
            best_overlap = overlap;
        }
    }
    if best_overlap > 0.0 {
        return best;
    }

    let center = span.center();
    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (a.center() - center)
                .abs()
                .partial_cmp(&(b.center() - center).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rows_are_padded_and_trimmed() {
        let table = RawTable::new(
            1,
            1,
            vec![strings(&[" Date ", "Narration", "Debit"]), strings(&["01-Jan-24"])],
        );
        assert_eq!(table.width(), 3);
        assert_eq!(table.rows[0][0], "Date");
        assert_eq!(table.rows[1], strings(&["01-Jan-24", "", ""]));
    }

    #[test]
    fn test_realign_onto_wider_layout() {
        let target = vec![
            ColumnSpan::new(40.0, 90.0),
            ColumnSpan::new(110.0, 230.0),
            ColumnSpan::new(360.0, 400.0),
            ColumnSpan::new(440.0, 480.0),
            ColumnSpan::new(520.0, 570.0),
        ];
        // credit column (440..480) is blank on this page
        let table = RawTable::new(
            2,
            1,
            vec![strings(&["02-Jan-24", "ATM WDL", "500.00", "9,500.00"])],
        )
        .with_columns(vec![
            ColumnSpan::new(40.0, 85.0),
            ColumnSpan::new(110.0, 145.0),
            ColumnSpan::new(365.0, 395.0),
            ColumnSpan::new(520.0, 565.0),
        ]);

        let aligned = table.realign(&target);
        assert_eq!(
            aligned.rows[0],
            strings(&["02-Jan-24", "ATM WDL", "500.00", "", "9,500.00"])
        );
        assert_eq!(aligned.columns, target);
    }

    #[test]
    fn test_realign_without_geometry_is_identity() {
        let table = RawTable::new(1, 1, vec![strings(&["a", "b"])]);
        assert_eq!(table.realign(&[ColumnSpan::new(0.0, 1.0)]), table);
    }
}
