//! Loads certificate assets and font files from a local directory.

use certforge_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Resources are resolved relative to `base_path`. Absolute paths and any
/// path that would leave the base directory resolve to `NotFound`.
#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical_base = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute() {
            return None;
        }
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return None;
        }

        let full_path = self.base_path.join(relative);
        match (full_path.canonicalize(), &self.canonical_base) {
            // Symlinks may still point outside the base.
            (Ok(canonical), Some(base)) => canonical.starts_with(base).then_some(canonical),
            _ => Some(full_path),
        }
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self
            .resolve(path)
            .ok_or_else(|| ResourceError::NotFound(format!("{} (outside asset directory)", path)))?;

        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(path.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_file_relative_to_base() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("seal.png"), b"seal").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        assert_eq!(&*provider.load("seal.png").unwrap(), b"seal");
        assert!(provider.exists("seal.png"));
        assert_eq!(provider.base(), dir.path());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());
        assert!(matches!(
            provider.load("logo.png"),
            Err(ResourceError::NotFound(_))
        ));
        assert!(!provider.exists("logo.png"));
    }

    #[test]
    fn nested_paths_are_allowed() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("brand")).unwrap();
        fs::write(dir.path().join("brand/logo.png"), b"logo").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        assert_eq!(&*provider.load("brand/logo.png").unwrap(), b"logo");
    }

    #[test]
    fn traversal_and_absolute_paths_are_blocked() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        assert!(provider.load("../../../etc/passwd").is_err());
        assert!(provider.load("/etc/passwd").is_err());
        assert!(!provider.exists(".."));
        assert!(!provider.exists("brand/../../secret"));
    }

    #[test]
    fn directories_do_not_count_as_existing_resources() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("fonts")).unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());
        assert!(!provider.exists("fonts"));
    }
}
