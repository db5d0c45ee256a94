use std::collections::HashMap;

use crate::domain::entities::member::MemberId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Existing(u32),
    Appended(u32),
}

impl Placement {
    pub fn row(self) -> u32 {
        match self {
            Placement::Existing(row) | Placement::Appended(row) => row,
        }
    }

    pub fn is_new(self) -> bool {
        matches!(self, Placement::Appended(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIndex {
    rows: HashMap<MemberId, u32>,
    next_free_row: u32,
}

impl RowIndex {
    /// Builds the index from the id column values read from `start_row` downward.
    ///
    /// Blank cells still occupy a row, so the append position is `start_row + cells.len()`.
    /// When an id appears twice in the column the upper row keeps it.
    pub fn from_column<S: AsRef<str>>(cells: &[S], start_row: u32) -> Self {
        let mut rows = HashMap::with_capacity(cells.len());
        for (offset, cell) in cells.iter().enumerate() {
            let id = cell.as_ref().trim();
            if id.is_empty() {
                continue;
            }
            let row = start_row.saturating_add(u32::try_from(offset).unwrap_or(u32::MAX));
            rows.entry(MemberId::from(id)).or_insert(row);
        }

        let used = u32::try_from(cells.len()).unwrap_or(u32::MAX);
        Self {
            rows,
            next_free_row: start_row.saturating_add(used),
        }
    }

    pub fn row_of(&self, id: &MemberId) -> Option<u32> {
        self.rows.get(id).copied()
    }

    pub fn next_free_row(&self) -> u32 {
        self.next_free_row
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn resolve(&mut self, id: &MemberId) -> Placement {
        if let Some(row) = self.row_of(id) {
            return Placement::Existing(row);
        }

        let row = self.next_free_row;
        self.rows.insert(id.clone(), row);
        self.next_free_row = self.next_free_row.saturating_add(1);
        Placement::Appended(row)
    }
}
