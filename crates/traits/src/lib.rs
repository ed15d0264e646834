pub mod asset;
pub mod resource;

pub use asset::AssetSource;
pub use resource::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};
