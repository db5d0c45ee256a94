use async_trait::async_trait;
use google_sheets4::api::{BatchUpdateSpreadsheetRequest, ValueRange};
use tracing::{debug, info};

use crate::domain::entities::layout::SheetLayout;
use crate::domain::entities::sheet::{column_range, row_range, CellValue};
use crate::infra::sheets::client::SheetsHub;
use crate::infra::sheets::requests::layout_requests;
use crate::usecase::ports::sink::{SheetSink, SinkError};

const USER_ENTERED: &str = "USER_ENTERED";

pub struct GoogleSheetSink {
    hub: SheetsHub,
    spreadsheet_id: String,
    worksheet: String,
}

impl GoogleSheetSink {
    pub fn new(hub: SheetsHub, spreadsheet_id: String, worksheet: String) -> Self {
        Self {
            hub,
            spreadsheet_id,
            worksheet,
        }
    }

    async fn worksheet_properties(&self) -> Result<(i32, usize), SinkError> {
        let (_, spreadsheet) = self
            .hub
            .spreadsheets()
            .get(&self.spreadsheet_id)
            .doit()
            .await
            .map_err(classify)?;

        spreadsheet
            .sheets
            .unwrap_or_default()
            .into_iter()
            .find_map(|sheet| {
                let properties = sheet.properties?;
                if properties.title.as_deref() != Some(self.worksheet.as_str()) {
                    return None;
                }
                let rules = sheet.conditional_formats.map_or(0, |rules| rules.len());
                Some((properties.sheet_id.unwrap_or(0), rules))
            })
            .ok_or_else(|| {
                SinkError::Fatal(format!(
                    "worksheet '{}' not found in spreadsheet {}",
                    self.worksheet, self.spreadsheet_id
                ))
            })
    }
}

// Only error responses from the service are retried. Transport failures mean
// the service is unreachable and abort the run.
fn classify(err: google_sheets4::Error) -> SinkError {
    match &err {
        google_sheets4::Error::BadRequest(_) | google_sheets4::Error::Failure(_) => {
            SinkError::Transient(err.to_string())
        }
        _ => SinkError::Fatal(err.to_string()),
    }
}

pub fn json_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(num) => num.to_string(),
        serde_json::Value::Bool(flag) => flag.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn cell_to_json(value: &CellValue) -> serde_json::Value {
    match value {
        CellValue::Text(s) => serde_json::Value::String(s.clone()),
        CellValue::Integer(n) => serde_json::Value::from(*n),
        CellValue::Float(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        CellValue::Bool(b) => serde_json::Value::Bool(*b),
    }
}

#[async_trait]
impl SheetSink for GoogleSheetSink {
    async fn read_column(&self, column: u32, start_row: u32) -> Result<Vec<String>, SinkError> {
        let range = column_range(&self.worksheet, column, start_row);
        debug!(%range, "reading id column");

        let (_, value_range) = self
            .hub
            .spreadsheets()
            .values_get(&self.spreadsheet_id, &range)
            .doit()
            .await
            .map_err(classify)?;

        Ok(value_range
            .values
            .unwrap_or_default()
            .iter()
            .map(|row| row.first().map(json_value_to_string).unwrap_or_default())
            .collect())
    }

    async fn write_row(&self, row: u32, values: &[CellValue]) -> Result<(), SinkError> {
        let range = row_range(&self.worksheet, row, values.len());
        let value_range = ValueRange {
            range: Some(range.clone()),
            major_dimension: Some("ROWS".to_string()),
            values: Some(vec![values.iter().map(cell_to_json).collect()]),
            ..Default::default()
        };

        self.hub
            .spreadsheets()
            .values_update(value_range, &self.spreadsheet_id, &range)
            .value_input_option(USER_ENTERED)
            .doit()
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn apply_layout(&self, layout: &SheetLayout) -> Result<(), SinkError> {
        let (sheet_id, existing_rules) = self.worksheet_properties().await?;
        let requests = layout_requests(sheet_id, existing_rules, layout);
        info!(
            worksheet = %self.worksheet,
            requests = requests.len(),
            replaced_rules = existing_rules,
            "applying sheet layout"
        );

        let batch = BatchUpdateSpreadsheetRequest {
            requests: Some(requests),
            ..Default::default()
        };
        self.hub
            .spreadsheets()
            .batch_update(batch, &self.spreadsheet_id)
            .doit()
            .await
            .map_err(classify)?;
        Ok(())
    }
}
