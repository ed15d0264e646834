//! Asset sources for the certificate renderer.
//!
//! - [`FilesystemResourceProvider`]: loads from a base directory
//! - [`ProviderAssetSource`]: adapts any synchronous provider to the async [`AssetSource`] boundary
//! - [`HttpAssetSource`]: fetches absolute URLs
//!
//! [`AssetSource`]: certforge_traits::AssetSource

mod filesystem;
mod http;
mod provider;

pub use filesystem::FilesystemResourceProvider;
pub use http::HttpAssetSource;
pub use provider::ProviderAssetSource;

pub use certforge_traits::InMemoryResourceProvider;
