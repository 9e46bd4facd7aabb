//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use kiln_core::domain::{ArtifactKind, OverwritePolicy};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kiln",
    bin_name = "kiln",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f525} Front-end artifact generator",
    long_about = "Kiln generates React components, stores, services and pages \
                  from templates, and registers new pages in the route table.",
    after_help = "EXAMPLES:\n\
        \x20 kiln generate component OrderItem --styled\n\
        \x20 kiln g page Invoice --store --service\n\
        \x20 kiln list --format json\n\
        \x20 kiln completions bash > /usr/share/bash-completion/completions/kiln",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate an artifact from templates.
    #[command(
        visible_alias = "g",
        about = "Generate a component, store, service or page",
        after_help = "EXAMPLES:\n\
            \x20 kiln generate component Button --antd\n\
            \x20 kiln generate store Invoice --api\n\
            \x20 kiln generate service Invoice --zod\n\
            \x20 kiln generate page Invoice --store --dry-run"
    )]
    Generate(GenerateArgs),

    /// List artifact kinds and templates.
    #[command(
        visible_alias = "ls",
        about = "List artifact kinds and templates",
        after_help = "EXAMPLES:\n\
            \x20 kiln list\n\
            \x20 kiln list --kind page\n\
            \x20 kiln list --format csv"
    )]
    List(ListArgs),

    /// Initialise a Kiln configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 kiln init           # user config directory\n\
            \x20 kiln init --local   # ./kiln.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kiln completions bash > ~/.local/share/bash-completion/completions/kiln\n\
            \x20 kiln completions zsh  > ~/.zfunc/_kiln\n\
            \x20 kiln completions fish > ~/.config/fish/completions/kiln.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Kiln configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kiln config get generation.overwrite\n\
            \x20 kiln config set generation.overwrite skip\n\
            \x20 kiln config list"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `kiln generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Artifact kind.
    #[arg(value_enum, value_name = "KIND")]
    pub kind: KindArg,

    /// Base name, e.g. `Invoice`, `orderItem` or `InvoicePage`.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Doc comment placed in the generated source.
    #[arg(short = 'd', long = "description", value_name = "TEXT")]
    pub description: Option<String>,

    /// Component: wrap content in an antd `Card`.
    #[arg(long, help_heading = "Kind options")]
    pub antd: bool,

    /// Component: use a styled-components root.
    #[arg(long, help_heading = "Kind options")]
    pub styled: bool,

    /// Store: generate an HTTP client and call it from the actions.
    #[arg(long, help_heading = "Kind options")]
    pub api: bool,

    /// Service: derive the record type from a zod schema.
    #[arg(long, help_heading = "Kind options")]
    pub zod: bool,

    /// Page: wire the page to the entity's store.
    #[arg(long, help_heading = "Kind options")]
    pub store: bool,

    /// Page: load records through the entity's service.
    #[arg(long, help_heading = "Kind options")]
    pub service: bool,

    /// Project root the artifact paths are relative to.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Route registry file, relative to the output root.
    #[arg(long = "registry", value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Directory with template overrides (`<kind>/<name>.hbs`).
    #[arg(long = "templates", value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// What to do with files that already exist.
    #[arg(long = "overwrite", value_enum, value_name = "POLICY")]
    pub overwrite: Option<OverwriteArg>,

    /// Show what would be written without writing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Skip the code formatter.
    #[arg(long = "no-format")]
    pub no_format: bool,

    /// Do not touch the route registry.
    #[arg(long = "no-register")]
    pub no_register: bool,
}

/// Artifact kinds accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    #[value(alias = "comp")]
    Component,
    Store,
    #[value(alias = "svc")]
    Service,
    Page,
}

impl From<KindArg> for ArtifactKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Component => ArtifactKind::Component,
            KindArg::Store => ArtifactKind::Store,
            KindArg::Service => ArtifactKind::Service,
            KindArg::Page => ArtifactKind::Page,
        }
    }
}

/// Overwrite policies accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OverwriteArg {
    /// Replace existing files.
    Always,
    /// Keep existing files.
    Skip,
    /// Fail before writing anything.
    Error,
}

impl From<OverwriteArg> for OverwritePolicy {
    fn from(policy: OverwriteArg) -> Self {
        match policy {
            OverwriteArg::Always => OverwritePolicy::Always,
            OverwriteArg::Skip => OverwritePolicy::Skip,
            OverwriteArg::Error => OverwritePolicy::Error,
        }
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show one kind.
    #[arg(short = 'k', long = "kind", value_enum)]
    pub kind: Option<KindArg>,

    /// Directory with template overrides.
    #[arg(long = "templates", value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One template key per line.
    List,
    /// JSON document.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `kiln.toml` in the current directory.
    #[arg(long = "local", help = "Create kiln.toml in the current directory")]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `kiln completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `kiln config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generation.overwrite`.
        key: String,
    },
    /// Set a configuration key in the configuration file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value. Lists take space-separated items.
        value: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the path of the configuration file `set` writes to.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from(["kiln", "generate", "page", "Invoice", "--store"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.kind, KindArg::Page);
        assert_eq!(args.name, "Invoice");
        assert!(args.store);
        assert!(!args.service);
        assert!(args.overwrite.is_none());
    }

    #[test]
    fn generate_alias_and_kind_alias() {
        let cli = Cli::parse_from(["kiln", "g", "svc", "Invoice", "--overwrite", "skip"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(ArtifactKind::from(args.kind), ArtifactKind::Service);
        assert_eq!(
            args.overwrite.map(OverwritePolicy::from),
            Some(OverwritePolicy::Skip)
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["kiln", "generate", "widget", "X"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["kiln", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_set_takes_key_and_value() {
        let cli = Cli::parse_from(["kiln", "config", "set", "generation.register", "false"]);
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Set { ref key, ref value })
                if key == "generation.register" && value == "false"
        ));
    }
}
