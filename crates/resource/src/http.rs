use async_trait::async_trait;
use certforge_traits::{AssetSource, ResourceError, SharedResourceData};
use std::sync::Arc;
use std::time::Duration;

/// Fetches assets by absolute URL. Relative locations are joined onto `base_url`.
#[derive(Debug, Clone)]
pub struct HttpAssetSource {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpAssetSource {
    pub fn new(timeout: Duration) -> Result<Self, ResourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResourceError::LoadFailed {
                path: "<http client>".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: None,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn resolve(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            return location.to_string();
        }
        match &self.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                location.trim_start_matches('/')
            ),
            None => location.to_string(),
        }
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, location: &str) -> Result<SharedResourceData, ResourceError> {
        let url = self.resolve(location);
        log::debug!("Fetching asset from {}", url);

        let load_failed = |message: String| ResourceError::LoadFailed {
            path: url.clone(),
            message,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| load_failed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ResourceError::NotFound(url.clone()));
        }
        if !status.is_success() {
            return Err(load_failed(format!("HTTP status {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| load_failed(e.to_string()))?;
        Ok(Arc::new(bytes.to_vec()))
    }

    fn name(&self) -> &'static str {
        "HttpAssetSource"
    }
}
