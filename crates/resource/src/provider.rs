use async_trait::async_trait;
use certforge_traits::{AssetSource, ResourceError, ResourceProvider, SharedResourceData};
use std::sync::Arc;

/// Runs a synchronous [`ResourceProvider`] on tokio's blocking pool so that
/// slow disks never stall the event loop.
#[derive(Debug)]
pub struct ProviderAssetSource<P: ?Sized> {
    provider: Arc<P>,
}

impl<P: ResourceProvider + ?Sized + 'static> ProviderAssetSource<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: ResourceProvider + ?Sized + 'static> AssetSource for ProviderAssetSource<P> {
    async fn fetch(&self, location: &str) -> Result<SharedResourceData, ResourceError> {
        let provider = Arc::clone(&self.provider);
        let path = location.to_string();
        log::debug!("Loading asset '{}' via {}", location, provider.name());

        tokio::task::spawn_blocking(move || provider.load(&path))
            .await
            .map_err(|e| ResourceError::LoadFailed {
                path: location.to_string(),
                message: format!("asset loader task failed: {}", e),
            })?
    }

    fn name(&self) -> &'static str {
        self.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certforge_traits::InMemoryResourceProvider;

    #[tokio::test]
    async fn fetches_through_the_wrapped_provider() {
        let provider = Arc::new(InMemoryResourceProvider::new().with("logo.png", vec![1, 2, 3]));
        let source = ProviderAssetSource::new(provider);

        assert_eq!(&*source.fetch("logo.png").await.unwrap(), &[1, 2, 3]);
        assert!(matches!(
            source.fetch("seal.png").await,
            Err(ResourceError::NotFound(_))
        ));
        assert_eq!(source.name(), "InMemoryResourceProvider");
    }

    #[tokio::test]
    async fn accepts_trait_objects() {
        let provider: Arc<dyn ResourceProvider> =
            Arc::new(InMemoryResourceProvider::new().with("a", vec![9]));
        let source = ProviderAssetSource::new(provider);
        assert_eq!(&*source.fetch("a").await.unwrap(), &[9]);
    }
}
