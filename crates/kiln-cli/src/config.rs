//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by reference. The
//! CLI layer owns config; the core crate only sees the settings derived from
//! it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, not here)
//! 2. Environment variables: `KILN_<SECTION>__<KEY>`, e.g.
//!    `KILN_GENERATION__OVERWRITE=skip`
//! 3. `--config FILE`, or else `./kiln.toml` over the user config file
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use kiln_core::domain::{DEFAULT_IMPORT_NAMESPACE, DEFAULT_REGISTRY_PATH, OverwritePolicy};

/// Name of the project-local configuration file.
pub const LOCAL_CONFIG_FILE: &str = "kiln.toml";

const ENV_PREFIX: &str = "KILN";

/// Every settable key, in display order.
pub const KEYS: &[&str] = &[
    "generation.output_root",
    "generation.overwrite",
    "generation.registry_path",
    "generation.import_namespace",
    "generation.register",
    "templates.dir",
    "formatter.enabled",
    "formatter.program",
    "formatter.args",
    "output.no_color",
    "output.format",
    "log.file",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generation: GenerationConfig,
    pub templates: TemplateConfig,
    pub formatter: FormatterConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Project root artifact paths are relative to.
    pub output_root: PathBuf,
    pub overwrite: OverwritePolicy,
    /// Route registry, relative to the output root.
    pub registry_path: PathBuf,
    /// Module prefix pages are imported from in the registry.
    pub import_namespace: String,
    /// Register generated pages in the route registry.
    pub register: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            overwrite: OverwritePolicy::default(),
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            import_namespace: DEFAULT_IMPORT_NAMESPACE.to_string(),
            register: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Override directory, relative to the output root unless absolute.
    pub dir: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".kiln/templates"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub enabled: bool,
    pub program: String,
    /// Arguments placed before the generated file paths.
    pub args: Vec<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "npx".into(),
            args: vec!["prettier".into(), "--write".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Also write JSON logs to this file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from files and the environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        match config_file {
            Some(path) => {
                debug!(path = %path.display(), "Loading explicit config file");
                builder = builder.add_source(toml_file(path).required(true));
            }
            None => {
                builder = builder
                    .add_source(toml_file(&Self::config_path()).required(false))
                    .add_source(toml_file(Path::new(LOCAL_CONFIG_FILE)).required(false));
            }
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(" ")
                    .with_list_parse_key("formatter.args"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.kiln.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "kiln", "kiln")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".kiln.toml"))
    }

    /// The file `config set` edits: `--config`, else `./kiln.toml` when it
    /// exists, else the user configuration file.
    pub fn writable_path(config_file: Option<&PathBuf>) -> PathBuf {
        if let Some(path) = config_file {
            return path.clone();
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            local
        } else {
            Self::config_path()
        }
    }
}

fn toml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.generation.overwrite, OverwritePolicy::Always);
        assert_eq!(cfg.generation.registry_path, PathBuf::from("src/routes.tsx"));
        assert_eq!(cfg.generation.import_namespace, "@/pages/");
        assert!(cfg.generation.register);
        assert!(cfg.formatter.enabled);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [generation]
            overwrite = "skip"

            [formatter]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.generation.overwrite, OverwritePolicy::Skip);
        assert_eq!(cfg.generation.output_root, PathBuf::from("."));
        assert!(!cfg.formatter.enabled);
        assert_eq!(cfg.formatter.program, "npx");
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.conf");
        std::fs::write(&path, "[templates]\ndir = \"tpl\"\n").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.templates.dir, PathBuf::from("tpl"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = PathBuf::from("/definitely/not/here/kiln.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn serialized_config_round_trips_through_toml() {
        let cfg = AppConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("[generation]"));
        assert_eq!(toml::from_str::<AppConfig>(&text).unwrap(), cfg);
    }

    #[test]
    fn every_key_resolves_in_defaults() {
        let value = serde_json::to_value(AppConfig::default()).unwrap();
        for key in KEYS.iter().filter(|k| **k != "log.file") {
            let pointer = format!("/{}", key.replace('.', "/"));
            assert!(value.pointer(&pointer).is_some(), "{key}");
        }
    }
}
