//! Rectangular report output.

/// One cell; `None` is written as an empty field.
pub type Cell = Option<String>;

/// Header rows followed by data rows, ready to be written out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    header: Vec<Vec<Cell>>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table.
    pub const fn new(header: Vec<Vec<Cell>>, rows: Vec<Vec<Cell>>) -> Self {
        Self { header, rows }
    }

    /// Header rows.
    pub fn header(&self) -> &[Vec<Cell>] {
        &self.header
    }

    /// Data rows.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Header rows then data rows, as they appear in the output.
    pub fn records(&self) -> impl Iterator<Item = &[Cell]> {
        self.header.iter().chain(&self.rows).map(Vec::as_slice)
    }

    /// Every record with blank cells as empty strings.
    pub fn to_strings(&self) -> Vec<Vec<String>> {
        self.records()
            .map(|record| {
                record
                    .iter()
                    .map(|cell| cell.clone().unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}
