use async_trait::async_trait;

use crate::domain::entities::layout::SheetLayout;
use crate::domain::entities::sheet::CellValue;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sheet service error: {0}")]
    Transient(String),
    #[error("sheet request failed: {0}")]
    Fatal(String),
}

impl SinkError {
    pub fn is_transient(&self) -> bool {
        matches!(self, SinkError::Transient(_))
    }
}

#[async_trait]
pub trait SheetSink: Send + Sync {
    /// Blank cells inside the used range come back as empty strings.
    async fn read_column(&self, column: u32, start_row: u32) -> Result<Vec<String>, SinkError>;

    async fn write_row(&self, row: u32, values: &[CellValue]) -> Result<(), SinkError>;

    async fn apply_layout(&self, layout: &SheetLayout) -> Result<(), SinkError>;
}
