use crate::domain::entities::member::Plan;
use crate::domain::entities::sheet::{
    column_letter, FORMAT_END_ROW, MEMBER_COLUMNS, NOT_PAID_LABEL, PAID_LABEL,
};

pub const PLAN_COLUMN: u32 = 7;
pub const PHOTO_COLUMN: u32 = 8;
pub const FEES_COLUMN: u32 = 9;
pub const PAID_COLUMN: u32 = 10;

pub const PHOTO_COLUMN_WIDTH_PX: u32 = 130;
pub const DATA_ROW_HEIGHT_PX: u32 = 120;
pub const CURRENCY_PATTERN: &str = "₹#,##0";

// Rows and columns are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub first_row: u32,
    pub last_row: u32,
    pub first_col: u32,
    pub last_col: u32,
}

impl CellSpan {
    pub fn columns(first_col: u32, last_col: u32, first_row: u32, last_row: u32) -> Self {
        Self {
            first_row,
            last_row,
            first_col,
            last_col,
        }
    }

    pub fn column(col: u32, first_row: u32, last_row: u32) -> Self {
        Self::columns(col, col, first_row, last_row)
    }

    #[cfg(test)]
    pub fn a1(&self) -> String {
        format!(
            "{}{}:{}{}",
            column_letter(self.first_col),
            self.first_row,
            column_letter(self.last_col),
            self.last_row
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Rgb {
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown {
    pub span: CellSpan,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    TextEq(String),
    CustomFormula(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalRule {
    pub span: CellSpan,
    pub condition: Condition,
    pub background: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberFormatKind {
    Text,
    Date,
    Currency(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormatRule {
    pub span: CellSpan,
    pub kind: NumberFormatKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidth {
    pub column: u32,
    pub pixels: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHeight {
    pub first_row: u32,
    pub last_row: u32,
    pub pixels: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetLayout {
    pub dropdowns: Vec<Dropdown>,
    /// Drop every conditional format already on the worksheet before adding ours.
    pub replace_conditional_rules: bool,
    pub conditional_rules: Vec<ConditionalRule>,
    pub column_widths: Vec<ColumnWidth>,
    pub row_heights: Vec<RowHeight>,
    pub number_formats: Vec<NumberFormatRule>,
    /// Spans centered horizontally and vertically.
    pub centered: Vec<CellSpan>,
}

/// The fixed layout of the membership sheet, covering `start_row` through [`FORMAT_END_ROW`].
pub fn member_layout(start_row: u32) -> SheetLayout {
    let end = FORMAT_END_ROW.max(start_row);
    let last_col = MEMBER_COLUMNS.len() as u32;
    let plan_span = CellSpan::column(PLAN_COLUMN, start_row, end);
    let paid_span = CellSpan::column(PAID_COLUMN, start_row, end);
    let full_row = CellSpan::columns(1, last_col, start_row, end);

    let dropdowns = vec![
        Dropdown {
            span: plan_span,
            choices: Plan::CHOICES.iter().map(|c| c.to_string()).collect(),
        },
        Dropdown {
            span: paid_span,
            choices: vec![PAID_LABEL.to_string(), NOT_PAID_LABEL.to_string()],
        },
    ];

    let plan_colors = [
        Rgb::new(0.8, 0.9, 1.0),
        Rgb::new(0.85, 1.0, 0.85),
        Rgb::new(0.9, 0.85, 1.0),
    ];
    let mut conditional_rules: Vec<ConditionalRule> = Plan::CHOICES
        .iter()
        .zip(plan_colors)
        .map(|(plan, background)| ConditionalRule {
            span: plan_span,
            condition: Condition::TextEq(plan.to_string()),
            background,
        })
        .collect();
    conditional_rules.push(ConditionalRule {
        span: paid_span,
        condition: Condition::TextEq(PAID_LABEL.to_string()),
        background: Rgb::new(0.75, 0.95, 0.75),
    });
    conditional_rules.push(ConditionalRule {
        span: full_row,
        condition: Condition::CustomFormula(format!(
            "=${}{start_row}=\"{NOT_PAID_LABEL}\"",
            column_letter(PAID_COLUMN)
        )),
        background: Rgb::new(1.0, 0.9, 0.9),
    });

    let number_formats = vec![
        NumberFormatRule {
            span: CellSpan::column(1, start_row, end),
            kind: NumberFormatKind::Text,
        },
        NumberFormatRule {
            span: CellSpan::columns(2, 3, start_row, end),
            kind: NumberFormatKind::Text,
        },
        NumberFormatRule {
            span: CellSpan::column(4, start_row, end),
            kind: NumberFormatKind::Date,
        },
        NumberFormatRule {
            span: CellSpan::column(5, start_row, end),
            kind: NumberFormatKind::Text,
        },
        NumberFormatRule {
            span: CellSpan::column(6, start_row, end),
            kind: NumberFormatKind::Text,
        },
        NumberFormatRule {
            span: CellSpan::column(FEES_COLUMN, start_row, end),
            kind: NumberFormatKind::Currency(CURRENCY_PATTERN.to_string()),
        },
        NumberFormatRule {
            span: CellSpan::columns(11, last_col, start_row, end),
            kind: NumberFormatKind::Date,
        },
    ];

    SheetLayout {
        dropdowns,
        replace_conditional_rules: true,
        conditional_rules,
        column_widths: vec![ColumnWidth {
            column: PHOTO_COLUMN,
            pixels: PHOTO_COLUMN_WIDTH_PX,
        }],
        row_heights: vec![RowHeight {
            first_row: start_row,
            last_row: end,
            pixels: DATA_ROW_HEIGHT_PX,
        }],
        number_formats,
        centered: vec![full_row],
    }
}
