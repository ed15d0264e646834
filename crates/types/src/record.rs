//! The certificate row as it is stored by the hosted record store.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("certificate record is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Issuance status. Only `valid` is known; anything else is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CertificateStatus {
    Valid,
    Other(String),
}

impl CertificateStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, CertificateStatus::Valid)
    }

    /// The label shown next to a verified certificate, e.g. "Valid" or "revoked".
    pub fn label(&self) -> &str {
        match self {
            CertificateStatus::Valid => "Valid",
            CertificateStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for CertificateStatus {
    fn from(raw: String) -> Self {
        if raw == "valid" {
            CertificateStatus::Valid
        } else {
            CertificateStatus::Other(raw)
        }
    }
}

impl From<CertificateStatus> for String {
    fn from(status: CertificateStatus) -> Self {
        match status {
            CertificateStatus::Valid => "valid".to_string(),
            CertificateStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateStatus::Valid => f.write_str("valid"),
            CertificateStatus::Other(raw) => f.write_str(raw),
        }
    }
}

/// One issued credential. Read-only to the renderer and exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "certificate_id")]
    pub display_id: String,
    #[serde(rename = "student_name")]
    pub holder_name: String,
    pub program_name: String,
    pub issue_date: String,
    pub status: CertificateStatus,
}

impl CertificateRecord {
    /// Checks the fields the renderer needs are present.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.display_id.trim().is_empty() {
            return Err(RecordError::MissingField("certificate_id"));
        }
        if self.holder_name.trim().is_empty() {
            return Err(RecordError::MissingField("student_name"));
        }
        if self.program_name.trim().is_empty() {
            return Err(RecordError::MissingField("program_name"));
        }
        Ok(())
    }

    /// The issue date as "Month D, YYYY", or the raw string when it does not parse.
    pub fn formatted_issue_date(&self) -> String {
        parse_issue_date(&self.issue_date)
            .map(|date| date.format("%B %-d, %Y").to_string())
            .unwrap_or_else(|| self.issue_date.clone())
    }
}

fn parse_issue_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}
