/// First worksheet row holding member data; rows above it are the sheet header block.
pub const DATA_START_ROW: u32 = 8;

pub const FORMAT_END_ROW: u32 = 1000;

pub const ID_COLUMN: u32 = 1;

pub const MEMBER_COLUMNS: [&str; 14] = [
    "ID",
    "Name",
    "Street",
    "Date of Birth",
    "Blood Group",
    "WhatsApp",
    "Plan",
    "Photo",
    "Fees",
    "Payment Status",
    "Created",
    "Last Payment",
    "Valid Till",
    "Updated",
];

pub const PAID_LABEL: &str = "Paid";
pub const NOT_PAID_LABEL: &str = "Not Paid";

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    #[cfg(test)]
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }
}

pub type ProjectedRow = Vec<CellValue>;

/// Converts a 1-based column ordinal to its spreadsheet label (1 = A, 26 = Z, 27 = AA).
///
/// Bijective base-26: there is no zero digit, so `0` has no label and yields an empty string.
pub fn column_letter(ordinal: u32) -> String {
    let mut n = ordinal;
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

pub fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Builds the A1 range spanning `width` columns of a single row, e.g. `'Sheet1'!A8:N8`.
pub fn row_range(sheet: &str, row: u32, width: usize) -> String {
    let end = column_letter(width.max(1) as u32);
    format!("{}!A{row}:{end}{row}", quote_sheet_name(sheet))
}

pub fn column_range(sheet: &str, column: u32, start_row: u32) -> String {
    let letter = column_letter(column);
    format!("{}!{letter}{start_row}:{letter}", quote_sheet_name(sheet))
}
