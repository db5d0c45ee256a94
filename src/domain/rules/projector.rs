use chrono::{DateTime, Months, Utc};

use crate::domain::entities::member::{FieldValue, MemberRecord, Plan};
use crate::domain::entities::sheet::{CellValue, ProjectedRow, NOT_PAID_LABEL, PAID_LABEL};

pub const DATE_FORMAT: &str = "%d-%b-%Y";

const PHOTO_FIT_MODE: u8 = 4;
const PHOTO_WIDTH_PX: u32 = 120;
const PHOTO_HEIGHT_PX: u32 = 120;

pub fn format_date(value: &FieldValue) -> String {
    value
        .as_timestamp()
        .map(|ts| ts.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Advances the last payment by the plan's calendar offset.
///
/// Unknown plans leave the payment date untouched; a missing or non-timestamp payment yields `None`.
/// Month arithmetic clamps to the end of the target month.
pub fn valid_till(last_payment: &FieldValue, plan: &FieldValue) -> Option<DateTime<Utc>> {
    let paid_at = last_payment.as_timestamp()?;
    let Some(plan) = Plan::parse(&plan.to_text()) else {
        return Some(paid_at);
    };
    paid_at.checked_add_months(Months::new(plan.months()))
}

pub fn photo_formula(photo: &FieldValue) -> String {
    let url = photo.to_text();
    if !photo.is_truthy() || url.is_empty() {
        return String::new();
    }
    format!("=IMAGE(\"{url}\", {PHOTO_FIT_MODE}, {PHOTO_WIDTH_PX}, {PHOTO_HEIGHT_PX})")
}

pub fn paid_label(is_paid: &FieldValue) -> &'static str {
    if is_paid.is_truthy() {
        PAID_LABEL
    } else {
        NOT_PAID_LABEL
    }
}

fn passthrough(value: &FieldValue) -> CellValue {
    match value {
        FieldValue::Integer(n) => CellValue::Integer(*n),
        FieldValue::Float(n) => CellValue::Float(*n),
        FieldValue::Bool(b) => CellValue::Bool(*b),
        FieldValue::Timestamp(_) => CellValue::Text(format_date(value)),
        other => CellValue::Text(other.to_text()),
    }
}

// Only a missing fee defaults to zero; an explicit null stays blank.
fn fee(value: &FieldValue) -> CellValue {
    match value {
        FieldValue::Missing => CellValue::Integer(0),
        other => passthrough(other),
    }
}

pub fn project(record: &MemberRecord) -> ProjectedRow {
    let expiry = valid_till(&record.last_payment, &record.plan)
        .map(FieldValue::Timestamp)
        .unwrap_or_default();

    vec![
        CellValue::Text(record.id.0.clone()),
        passthrough(&record.name),
        passthrough(&record.street),
        CellValue::Text(format_date(&record.date_of_birth)),
        passthrough(&record.blood_group),
        // Always text so long numbers keep their digits and never parse as formulas.
        CellValue::Text(record.whatsapp_number.to_text()),
        passthrough(&record.plan),
        CellValue::Text(photo_formula(&record.photo)),
        fee(&record.fees),
        CellValue::text(paid_label(&record.is_paid)),
        CellValue::Text(format_date(&record.created_at)),
        CellValue::Text(format_date(&record.last_payment)),
        CellValue::Text(format_date(&expiry)),
        CellValue::Text(format_date(&record.updated_at)),
    ]
}
