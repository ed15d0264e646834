//! Asynchronous asset fetching.
//!
//! The renderer waits on two decorative images per certificate. Each fetch may
//! suspend on network or disk I/O, so the boundary is async; a failed fetch is
//! reported, never retried here.

use crate::resource::{ResourceError, SharedResourceData};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

#[async_trait]
pub trait AssetSource: Send + Sync + Debug {
    /// Fetch the raw bytes behind `location` (a URL or a provider path).
    async fn fetch(&self, location: &str) -> Result<SharedResourceData, ResourceError>;

    fn name(&self) -> &'static str;
}

#[async_trait]
impl<S: AssetSource + ?Sized> AssetSource for Arc<S> {
    async fn fetch(&self, location: &str) -> Result<SharedResourceData, ResourceError> {
        (**self).fetch(location).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
