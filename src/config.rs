use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;

use crate::domain::entities::sheet::{DATA_START_ROW, FORMAT_END_ROW};
use crate::usecase::services::retry::{RetryPolicy, DEFAULT_WRITE_ATTEMPTS};

pub const DEFAULT_DB_NAME: &str = "Grower";
pub const DEFAULT_COLLECTION: &str = "Member";
pub const DEFAULT_WORKSHEET: &str = "Sheet1";
pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub mongo_uri: String,
    pub db_name: String,
    pub collection: String,
    pub spreadsheet_id: String,
    pub worksheet: String,
    pub credentials_path: PathBuf,
    pub start_row: u32,
    pub write_attempts: u32,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mongo_uri = get("MONGO_URI").ok_or(ConfigError::Missing("MONGO_URI"))?;
        let spreadsheet = get("SPREADSHEET_URL").ok_or(ConfigError::Missing("SPREADSHEET_URL"))?;
        let spreadsheet_id =
            spreadsheet_id_from_url(&spreadsheet).ok_or_else(|| ConfigError::Invalid {
                key: "SPREADSHEET_URL",
                value: spreadsheet.clone(),
                reason: "expected a spreadsheet URL or id",
            })?;

        let credentials_path = match get("GOOGLE_CREDENTIALS_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_credentials_path(),
        };

        Ok(Self {
            mongo_uri,
            db_name: get("MONGO_DB").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            collection: get("MONGO_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            spreadsheet_id,
            worksheet: get("WORKSHEET_NAME").unwrap_or_else(|| DEFAULT_WORKSHEET.to_string()),
            credentials_path,
            start_row: parse_start_row(get("DATA_START_ROW"))?,
            write_attempts: parse_positive(
                "SYNC_WRITE_RETRIES",
                get("SYNC_WRITE_RETRIES"),
                DEFAULT_WRITE_ATTEMPTS,
            )?,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.write_attempts,
            base_delay: Duration::from_secs(1),
        }
    }
}

fn parse_positive(key: &'static str, raw: Option<String>, default: u32) -> Result<u32, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "expected a positive integer",
        }),
    }
}

// Data must begin inside the formatted block.
fn parse_start_row(raw: Option<String>) -> Result<u32, ConfigError> {
    let row = parse_positive("DATA_START_ROW", raw, DATA_START_ROW)?;
    if row > FORMAT_END_ROW {
        return Err(ConfigError::Invalid {
            key: "DATA_START_ROW",
            value: row.to_string(),
            reason: "must not be past the formatted rows",
        });
    }
    Ok(row)
}

/// Extracts the spreadsheet id from a `docs.google.com/spreadsheets/d/<id>/...` URL.
///
/// A value without a scheme is taken as a bare id.
pub fn spreadsheet_id_from_url(value: &str) -> Option<String> {
    let value = value.trim();
    if !value.contains("://") {
        let bare = value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        return (bare && !value.is_empty()).then(|| value.to_string());
    }

    let (_, rest) = value.split_once("/spreadsheets/d/")?;
    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    (!id.is_empty()).then_some(id)
}

pub fn default_credentials_path() -> PathBuf {
    let local = Path::new(CREDENTIALS_FILE_NAME);
    if local.exists() {
        return local.to_path_buf();
    }
    ProjectDirs::from("com", "grower", "member-sheet-sync")
        .map(|dirs| dirs.config_dir().join(CREDENTIALS_FILE_NAME))
        .unwrap_or_else(|| local.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SHEET_URL: &str =
        "https://docs.google.com/spreadsheets/d/1jx-WM6g948mzjWxNa1qY8Osmf0qx8XXh9hugBuC7G9M/edit";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn spreadsheet_id_is_taken_from_url() {
        assert_eq!(
            spreadsheet_id_from_url(SHEET_URL).as_deref(),
            Some("1jx-WM6g948mzjWxNa1qY8Osmf0qx8XXh9hugBuC7G9M")
        );
        assert_eq!(
            spreadsheet_id_from_url("https://docs.google.com/spreadsheets/d/abc_123").as_deref(),
            Some("abc_123")
        );
        assert_eq!(spreadsheet_id_from_url("abc_123").as_deref(), Some("abc_123"));
        assert_eq!(spreadsheet_id_from_url("https://example.com/other"), None);
        assert_eq!(spreadsheet_id_from_url("not an id"), None);
    }

    #[test]
    fn defaults_fill_optional_settings() {
        let config = SyncConfig::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://localhost:27017"),
            ("SPREADSHEET_URL", SHEET_URL),
            ("GOOGLE_CREDENTIALS_FILE", "/etc/sync/creds.json"),
        ]))
        .expect("config should load");

        assert_eq!(config.db_name, "Grower");
        assert_eq!(config.collection, "Member");
        assert_eq!(config.worksheet, "Sheet1");
        assert_eq!(config.start_row, 8);
        assert_eq!(config.write_attempts, 5);
        assert_eq!(config.credentials_path, PathBuf::from("/etc/sync/creds.json"));
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn missing_mongo_uri_is_reported() {
        let err = SyncConfig::from_lookup(lookup(&[("SPREADSHEET_URL", SHEET_URL)]))
            .expect_err("config should fail");

        assert_eq!(err, ConfigError::Missing("MONGO_URI"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let err = SyncConfig::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://localhost"),
            ("SPREADSHEET_URL", "   "),
        ]))
        .expect_err("config should fail");

        assert_eq!(err, ConfigError::Missing("SPREADSHEET_URL"));
    }

    #[test]
    fn start_row_must_be_positive() {
        let err = SyncConfig::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://localhost"),
            ("SPREADSHEET_URL", SHEET_URL),
            ("DATA_START_ROW", "0"),
        ]))
        .expect_err("config should fail");

        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "DATA_START_ROW",
                ..
            }
        ));
    }

    #[test]
    fn start_row_past_formatted_rows_is_rejected() {
        let with_start_row = |row| {
            SyncConfig::from_lookup(lookup(&[
                ("MONGO_URI", "mongodb://localhost"),
                ("SPREADSHEET_URL", SHEET_URL),
                ("DATA_START_ROW", row),
            ]))
        };

        let err = with_start_row("4294967295").expect_err("config should fail");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "DATA_START_ROW",
                ..
            }
        ));

        let config = with_start_row("1000").expect("last formatted row is allowed");
        assert_eq!(config.start_row, 1000);
    }

    #[test]
    fn zero_write_retries_is_rejected() {
        let err = SyncConfig::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://localhost"),
            ("SPREADSHEET_URL", SHEET_URL),
            ("SYNC_WRITE_RETRIES", "0"),
        ]))
        .expect_err("config should fail");

        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "SYNC_WRITE_RETRIES",
                ..
            }
        ));
    }

    #[test]
    fn overrides_are_applied() {
        let config = SyncConfig::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://db"),
            ("SPREADSHEET_URL", "sheet-id"),
            ("MONGO_DB", "Gym"),
            ("MONGO_COLLECTION", "People"),
            ("WORKSHEET_NAME", "Members 2024"),
            ("DATA_START_ROW", "2"),
            ("SYNC_WRITE_RETRIES", "3"),
        ]))
        .expect("config should load");

        assert_eq!(config.spreadsheet_id, "sheet-id");
        assert_eq!(config.db_name, "Gym");
        assert_eq!(config.collection, "People");
        assert_eq!(config.worksheet, "Members 2024");
        assert_eq!(config.start_row, 2);
        assert_eq!(config.write_attempts, 3);
    }
}
