use std::path::Path;

use anyhow::{Context, Result};
use google_sheets4::{hyper_rustls, yup_oauth2, Sheets};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, info};

pub type SheetsHub = Sheets<hyper_rustls::HttpsConnector<HttpConnector>>;

pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

// A token is requested up front so bad credentials fail before any sheet call.
pub async fn connect_service_account(credentials_path: &Path) -> Result<SheetsHub> {
    info!(path = %credentials_path.display(), "authorizing with service account");

    let key = yup_oauth2::read_service_account_key(credentials_path)
        .await
        .with_context(|| {
            format!(
                "failed to read service account key: {}",
                credentials_path.display()
            )
        })?;

    let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .context("failed to build service account authenticator")?;

    auth.token(&SCOPES)
        .await
        .context("service account could not obtain an access token")?;
    debug!(scopes = ?SCOPES, "obtained access token");

    let client = hyper_util::client::legacy::Client::builder(TokioExecutor::new()).build(
        hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .context("failed to load native TLS roots")?
            .https_or_http()
            .enable_http1()
            .build(),
    );

    Ok(Sheets::new(client, auth))
}
