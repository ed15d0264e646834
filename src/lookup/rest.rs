use super::{LookupError, RecordStore};
use async_trait::async_trait;
use certforge_types::CertificateRecord;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;

/// Queries a hosted PostgREST table:
/// `GET {url}/rest/v1/{table}?certificate_id=eq.{id}&select=*`.
#[derive(Debug, Clone)]
pub struct RestRecordStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RestRecordStore {
    pub fn new(
        base_url: &str,
        table: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        if base_url.trim().is_empty() {
            return Err(LookupError::Failed("record store URL is not configured".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Failed(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn find_by_display_id(
        &self,
        display_id: &str,
    ) -> Result<Option<CertificateRecord>, LookupError> {
        let filter = format!("eq.{}", display_id);
        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("certificate_id", filter.as_str()), ("select", "*")])
            .header(ACCEPT, "application/json");
        if !self.api_key.is_empty() {
            request = request
                .header("apikey", &self.api_key)
                .header(AUTHORIZATION, format!("Bearer {}", self.api_key));
        }

        let response = request.send().await.map_err(|e| {
            log::warn!("Record store request failed: {}", e);
            LookupError::Failed(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Record store answered {} for {}", status, display_id);
            return Err(LookupError::Failed(format!("record store returned {}", status)));
        }

        let mut rows: Vec<CertificateRecord> = response
            .json()
            .await
            .map_err(|e| LookupError::Failed(format!("malformed record store response: {}", e)))?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(LookupError::Failed(format!(
                "{} records share certificate ID {}",
                n, display_id
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "RestRecordStore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_table_path() {
        let store = RestRecordStore::new(
            "https://db.example.com/",
            "certificates",
            "key",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(store.endpoint(), "https://db.example.com/rest/v1/certificates");
    }

    #[test]
    fn missing_url_is_rejected() {
        let result = RestRecordStore::new(" ", "certificates", "", Duration::from_secs(1));
        assert!(matches!(result, Err(LookupError::Failed(_))));
    }

    #[tokio::test]
    async fn unreachable_store_is_a_lookup_failure() {
        let store = RestRecordStore::new(
            "http://127.0.0.1:1",
            "certificates",
            "",
            Duration::from_millis(200),
        )
        .unwrap();
        let result = store.find_by_display_id("EZZCODE-2024-WD-001").await;
        assert!(matches!(result, Err(LookupError::Failed(_))));
    }
}
