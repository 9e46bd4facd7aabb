//! `kiln config` - read and write configuration values.

use std::path::Path;

use crate::{
    cli::{ConfigCommands, GlobalArgs, OutputFormat},
    config::{AppConfig, KEYS},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(config, &key)?;
            output.print(&value)?;
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::writable_path(global.config.as_ref());
            set_in_file(&path, &key, &value)?;
            output.success(&format!("{key} = {value} ({})", path.display()))?;
        }

        ConfigCommands::List => {
            if output.format() == OutputFormat::Json {
                output.json(config)?;
            } else {
                output.header("Current Configuration:")?;
                let serialised = toml::to_string_pretty(config)
                    .map_err(|e| CliError::config("Failed to serialise config", e))?;
                output.print(serialised.trim_end())?;
            }
        }

        ConfigCommands::Path => {
            let path = AppConfig::writable_path(global.config.as_ref());
            output.print(&path.display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn check_key(key: &str) -> CliResult<()> {
    if KEYS.contains(&key) {
        Ok(())
    } else {
        Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}' (known: {})", KEYS.join(", ")),
            source: None,
        })
    }
}

/// Strings print bare, lists space-separated, unset values as nothing.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    check_key(key)?;
    let root = serde_json::to_value(config)
        .map_err(|e| CliError::config("Failed to serialise config", e))?;
    let pointer = format!("/{}", key.replace('.', "/"));

    Ok(match root.pointer(&pointer) {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_owned))
            .collect::<Vec<_>>()
            .join(" "),
        Some(other) => other.to_string(),
    })
}

fn parse_value(key: &str, raw: &str) -> toml::Value {
    if key == "formatter.args" {
        return toml::Value::Array(
            raw.split_whitespace()
                .map(|arg| toml::Value::String(arg.to_string()))
                .collect(),
        );
    }
    match raw {
        "true" => toml::Value::Boolean(true),
        "false" => toml::Value::Boolean(false),
        _ => toml::Value::String(raw.to_string()),
    }
}

/// Set `key` in `table`, rejecting values the config cannot deserialize.
fn set_config_value(table: &mut toml::Table, key: &str, raw: &str) -> CliResult<()> {
    check_key(key)?;
    let Some((section, field)) = key.split_once('.') else {
        return Err(CliError::invalid_input(format!("'{key}' is not a section key")));
    };

    let entry = table
        .entry(section.to_string())
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(section_table) = entry else {
        return Err(CliError::ConfigError {
            message: format!("'{section}' in the config file is not a table"),
            source: None,
        });
    };
    section_table.insert(field.to_string(), parse_value(key, raw));

    toml::Value::Table(table.clone())
        .try_into::<AppConfig>()
        .map_err(|e| CliError::config(format!("Invalid value for '{key}': {raw}"), e))?;
    Ok(())
}

fn set_in_file(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    let mut table = if path.is_file() {
        let text = std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read '{}'", path.display()))?;
        toml::from_str::<toml::Table>(&text)
            .map_err(|e| CliError::config(format!("Failed to parse '{}'", path.display()), e))?
    } else {
        toml::Table::new()
    };

    set_config_value(&mut table, key, raw)?;

    let text = toml::to_string_pretty(&table)
        .map_err(|e| CliError::config("Failed to serialise config", e))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    std::fs::write(path, text).with_cli_context(|| format!("Failed to write '{}'", path.display()))
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use kiln_core::domain::OverwritePolicy;

    use super::*;

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "generation.overwrite").unwrap(), "always");
        assert_eq!(get_config_value(&cfg, "generation.register").unwrap(), "true");
        assert_eq!(get_config_value(&cfg, "formatter.args").unwrap(), "prettier --write");
        assert_eq!(get_config_value(&cfg, "log.file").unwrap(), "");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn set_typed_values() {
        let mut table = toml::Table::new();
        set_config_value(&mut table, "generation.overwrite", "skip").unwrap();
        set_config_value(&mut table, "generation.register", "false").unwrap();
        set_config_value(&mut table, "formatter.args", "biome format --write").unwrap();

        let cfg: AppConfig = toml::Value::Table(table).try_into().unwrap();
        assert_eq!(cfg.generation.overwrite, OverwritePolicy::Skip);
        assert!(!cfg.generation.register);
        assert_eq!(cfg.formatter.args, ["biome", "format", "--write"]);
    }

    #[test]
    fn set_rejects_invalid_values() {
        let mut table = toml::Table::new();
        assert!(matches!(
            set_config_value(&mut table, "generation.overwrite", "sometimes"),
            Err(CliError::ConfigError { .. })
        ));
        assert!(set_config_value(&mut table, "nope.key", "x").is_err());
    }

    #[test]
    fn set_in_file_keeps_other_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiln.toml");
        std::fs::write(&path, "[templates]\ndir = \"tpl\"\n").unwrap();

        set_in_file(&path, "output.format", "json").unwrap();

        let cfg: AppConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cfg.templates.dir, std::path::PathBuf::from("tpl"));
        assert_eq!(cfg.output.format, "json");
    }
}
