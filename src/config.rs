use certforge_layout::LinkTargets;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const BUILTIN_DEFAULTS: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub concurrency: ConcurrencyConfig,
    pub store: StoreConfig,
    pub assets: AssetsConfig,
    pub links: LinksConfig,
    pub fonts: FontsConfig,
    pub export: ExportConfig,
    /// Directory relative paths are resolved against (set during loading)
    #[serde(skip)]
    base_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConcurrencyConfig {
    pub max_concurrent_renders: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Rest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub seed_file: PathBuf,
    pub url: String,
    pub table: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSourceKind {
    Filesystem,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    pub source: AssetSourceKind,
    /// A directory for `filesystem`, a base URL for `http`.
    pub base: String,
    pub brand_mark: String,
    pub seal: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinksConfig {
    pub verification_url: String,
    pub site_url: String,
}

impl LinksConfig {
    pub fn targets(&self) -> LinkTargets {
        LinkTargets::new(self.verification_url.as_str(), self.site_url.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FontsConfig {
    #[serde(default)]
    pub regular: String,
    #[serde(default)]
    pub bold: String,
    #[serde(default)]
    pub italic: String,
}

impl FontsConfig {
    /// Whether a TrueType face is configured; otherwise the bitmap font is used.
    pub fn uses_outline(&self) -> bool {
        !self.regular.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub page_width_pt: f32,
}

impl Config {
    /// Loads `config/default.toml` (or the file named by `CERTFORGE_CONFIG`)
    /// over the built-in defaults, then layers `CERTFORGE__SECTION__KEY`
    /// environment variables on top.
    pub fn load() -> Result<Self, config::ConfigError> {
        let override_path = std::env::var("CERTFORGE_CONFIG")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        Self::load_from(override_path.as_deref())
    }

    /// Like [`Config::load`] with an explicit configuration file.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            BUILTIN_DEFAULTS,
            config::FileFormat::Toml,
        ));
        let mut base_path: Option<PathBuf> = None;

        if let Some(path) = path {
            if !path.exists() {
                return Err(config::ConfigError::Message(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
            // config/<file>.toml -> project directory
            base_path = path
                .parent()
                .and_then(Path::parent)
                .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
                .map(Path::to_path_buf);
        } else if Path::new("config/default.toml").exists() {
            builder = builder.add_source(config::File::with_name("config/default"));
            base_path = Some(PathBuf::from("."));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CERTFORGE")
                .prefix_separator("__")
                .separator("__"),
        );

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.base_path = base_path;
        config.resolve_paths();
        Ok(config)
    }

    /// The defaults compiled into the binary, without files or environment.
    pub fn builtin() -> Result<Self, config::ConfigError> {
        Self::from_toml_str("")
    }

    /// Parses a TOML document layered over the built-in defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(
                BUILTIN_DEFAULTS,
                config::FileFormat::Toml,
            ))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Resolves relative paths against `base`.
    pub fn with_base_path(mut self, base: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base.into());
        self.resolve_paths();
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn resolve_paths(&mut self) {
        let Some(base) = self.base_path.as_ref() else {
            return;
        };
        if self.store.seed_file.is_relative() {
            self.store.seed_file = base.join(&self.store.seed_file);
        }
        if self.assets.source == AssetSourceKind::Filesystem
            && Path::new(&self.assets.base).is_relative()
        {
            self.assets.base = base.join(&self.assets.base).to_string_lossy().into_owned();
        }
    }
}
