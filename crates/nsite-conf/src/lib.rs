use camino::Utf8PathBuf;
use config::{Config, ConfigError as ExternalConfigError, Environment, File, FileFormat, Map};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Unprefixed variable names existing site deployments set credentials with.
/// They take precedence over every other source.
pub const LEGACY_SECRET_VAR: &str = "NOTION_API_SECRET";
pub const LEGACY_DATABASE_VAR: &str = "DATABASE_ID";

const ENV_PREFIX: &str = "NSITE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub debug: bool,
    pub notion: NotionSettings,
    pub assets: AssetSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct NotionSettings {
    pub api_secret: Option<String>,
    pub database_id: Option<String>,
    pub api_base_url: String,
    /// Sent as the `Notion-Version` header.
    pub api_version: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for NotionSettings {
    fn default() -> Self {
        Self {
            api_secret: None,
            database_id: None,
            api_base_url: "https://api.notion.com/v1".to_string(),
            api_version: "2022-06-28".to_string(),
            page_size: 100,
            timeout_secs: 30,
        }
    }
}

impl NotionSettings {
    /// The API secret, treating an empty value as unset.
    #[must_use]
    pub fn secret(&self) -> Option<&str> {
        self.api_secret.as_deref().filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn database(&self) -> Option<&str> {
        self.database_id.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory the downloaded assets are written to.
    pub dir: Utf8PathBuf,
    /// Root-relative prefix of the references handed to the renderer.
    pub public_prefix: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            dir: Utf8PathBuf::from("dist/notion-images"),
            public_prefix: "/notion-images".to_string(),
        }
    }
}

impl Settings {
    pub fn new(project_root: &Path) -> Result<Self, ConfigError> {
        let user_config_file = ProjectDirs::from("org", "nsite", "nsite")
            .map(|proj_dirs| proj_dirs.config_dir().join("nsite.toml"));

        Self::load_from_paths(
            project_root,
            user_config_file.as_deref(),
            std::env::vars().collect(),
        )
    }

    fn load_from_paths(
        project_root: &Path,
        user_config_path: Option<&Path>,
        vars: Map<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        builder = builder.add_source(
            File::from(project_root.join(".nsite.toml"))
                .format(FileFormat::Toml)
                .required(false),
        );

        builder = builder.add_source(
            File::from(project_root.join("nsite.toml"))
                .format(FileFormat::Toml)
                .required(false),
        );

        let legacy = |name: &str| vars.get(name).filter(|v| !v.is_empty()).cloned();
        let legacy_secret = legacy(LEGACY_SECRET_VAR);
        let legacy_database = legacy(LEGACY_DATABASE_VAR);

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars)),
        );

        builder = builder
            .set_override_option("notion.api_secret", legacy_secret)?
            .set_override_option("notion.database_id", legacy_database)?;

        let config = builder.build()?;
        let settings = config.try_deserialize()?;
        Ok(settings)
    }
}
