use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::layout::member_layout;
use crate::domain::entities::sheet::{DATA_START_ROW, ID_COLUMN};
use crate::domain::rules::projector::project;
use crate::domain::rules::row_index::RowIndex;
use crate::usecase::ports::sink::{SheetSink, SinkError};
use crate::usecase::ports::source::{MemberSource, SourceError};
use crate::usecase::services::retry::{write_row_with_retry, RetryPolicy, WriteOutcome};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub records: usize,
    pub updated: usize,
    pub appended: usize,
    pub dropped: usize,
    pub placements: Vec<(String, u32)>,
}

impl SyncReport {
    pub fn delivered(&self) -> usize {
        self.records - self.dropped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub start_row: u32,
    pub retry: RetryPolicy,
    pub apply_layout: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            start_row: DATA_START_ROW,
            retry: RetryPolicy::default(),
            apply_layout: true,
        }
    }
}

pub struct SyncService {
    source: Arc<dyn MemberSource>,
    sink: Arc<dyn SheetSink>,
    options: SyncOptions,
}

impl SyncService {
    pub fn new(
        source: Arc<dyn MemberSource>,
        sink: Arc<dyn SheetSink>,
        options: SyncOptions,
    ) -> Self {
        Self {
            source,
            sink,
            options,
        }
    }

    pub async fn load_row_index(&self) -> Result<RowIndex, SinkError> {
        let cells = self
            .sink
            .read_column(ID_COLUMN, self.options.start_row)
            .await?;
        let index = RowIndex::from_column(&cells, self.options.start_row);
        info!(
            existing = index.len(),
            next_free_row = index.next_free_row(),
            "loaded member rows from sheet"
        );
        Ok(index)
    }

    /// Rows whose writes keep failing after retries are counted as dropped; the run still completes.
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let mut index = self.load_row_index().await?;
        let mut report = SyncReport::default();

        let mut cursor = self.source.scan().await?;
        while let Some(record) = cursor.next_record().await? {
            let placement = index.resolve(&record.id);
            let row = placement.row();
            let values = project(&record);
            debug!(id = %record.id, row, new = placement.is_new(), "writing member row");

            let outcome =
                write_row_with_retry(self.sink.as_ref(), row, &values, self.options.retry).await?;

            report.records += 1;
            if placement.is_new() {
                report.appended += 1;
            } else {
                report.updated += 1;
            }
            if let WriteOutcome::Dropped { attempts } = outcome {
                warn!(id = %record.id, row, attempts, "member row was not written");
                report.dropped += 1;
            }
            report.placements.push((record.id.0, row));
        }

        if self.options.apply_layout {
            self.sink
                .apply_layout(&member_layout(self.options.start_row))
                .await?;
            info!("applied sheet layout");
        }

        info!(
            records = report.records,
            updated = report.updated,
            appended = report.appended,
            dropped = report.dropped,
            "member sync finished"
        );
        Ok(report)
    }
}
