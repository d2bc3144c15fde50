//! Apps Script ingestion sink.
//!
//! Completed records are POSTed as JSON to a Google Apps Script web app that
//! appends a spreadsheet row.

use std::time::Duration;

use intake_core::dispatch::RecordSink;
use intake_types::config::SheetsConfig;
use intake_types::conversation::IntakeRecord;
use intake_types::error::DispatchError;
use serde::Serialize;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Row shape expected by the Apps Script endpoint.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SheetRow<'a> {
    pub from: &'a str,
    pub name: &'a str,
    pub district: &'a str,
    pub property_type: &'a str,
    pub area: &'a str,
    pub service: &'a str,
    pub service_type: &'a str,
    pub contact: &'a str,
}

impl<'a> From<&'a IntakeRecord> for SheetRow<'a> {
    fn from(record: &'a IntakeRecord) -> Self {
        Self {
            from: &record.user_id,
            name: &record.name,
            district: &record.district,
            property_type: &record.property_type,
            area: &record.area,
            service: &record.service,
            service_type: &record.service_urgency,
            contact: &record.contact_consent,
        }
    }
}

/// [`RecordSink`] backed by an Apps Script web app.
#[derive(Debug, Clone)]
pub struct AppsScriptSink {
    http: reqwest::Client,
    url: Option<String>,
}

impl AppsScriptSink {
    pub fn from_config(config: &SheetsConfig) -> Result<Self, DispatchError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DispatchError::Unreachable(e.to_string()))?;
        Ok(Self::with_client(http, config.url.clone()))
    }

    pub fn with_client(http: reqwest::Client, url: Option<String>) -> Self {
        let url = url.filter(|u| !u.trim().is_empty());
        if url.is_none() {
            tracing::warn!("Apps Script URL not configured; completed records will be rejected");
        }
        Self { http, url }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

impl RecordSink for AppsScriptSink {
    async fn submit_record(&self, record: &IntakeRecord) -> Result<(), DispatchError> {
        let url = self.url.as_deref().ok_or(DispatchError::NotConfigured)?;

        let response = self
            .http
            .post(url)
            .json(&SheetRow::from(record))
            .send()
            .await
            .map_err(|e| DispatchError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
