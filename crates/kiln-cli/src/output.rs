//! Everything `kiln` prints to stdout.
//!
//! Generation reports are a handful of status lines (`✓ created …`,
//! `ℹ kept existing …`, `⚠ …`) plus an optional header. JSON documents go
//! through [`OutputManager::json`] and are the only thing a `--quiet` run
//! still prints, besides errors on stderr.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Leading mark of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Done,
    Note,
    Caution,
}

impl Mark {
    fn symbol(self) -> &'static str {
        match self {
            Self::Done => "\u{2713}",
            Self::Note => "\u{2139}",
            Self::Caution => "\u{26a0}",
        }
    }
}

fn status_line(mark: Mark, msg: &str, color: bool) -> String {
    if !color {
        return format!("{} {msg}", mark.symbol());
    }
    match mark {
        Mark::Done => format!("{} {}", mark.symbol().green().bold(), msg.green()),
        Mark::Note => format!("{} {}", mark.symbol().blue().bold(), msg),
        Mark::Caution => format!("{} {}", mark.symbol().yellow().bold(), msg.yellow()),
    }
}

pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    color: bool,
    term: Term,
}

impl OutputManager {
    /// `--output-format` wins over `output.format`; when both say `auto`
    /// the format is Human on a terminal and Plain when piped.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let configured = OutputFormat::from_config(&config.output.format);
        let format = match (args.output_format, configured) {
            (OutputFormat::Auto, Some(format)) if format != OutputFormat::Auto => format,
            (OutputFormat::Auto, _) if io::stdout().is_terminal() => OutputFormat::Human,
            (OutputFormat::Auto, _) => OutputFormat::Plain,
            (format, _) => format,
        };

        Self {
            format,
            quiet: args.quiet,
            color: !(args.no_color || config.output.no_color),
            term: Term::stdout(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn line(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(text)
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.line(msg)
    }

    /// A file written or a route registered.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.line(&status_line(Mark::Done, msg, self.color))
    }

    /// Something left as it was.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.line(&status_line(Mark::Note, msg, self.color))
    }

    /// A step that failed without failing the run (registry, formatter,
    /// unknown template files).
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.line(&status_line(Mark::Caution, msg, self.color))
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.color {
            self.line(&text.cyan().bold().to_string())
        } else {
            self.line(text)
        }
    }

    /// Pretty JSON on stdout, quiet or not.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(output_format: OutputFormat, no_color: bool) -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color,
            config: None,
            output_format,
        }
    }

    #[test]
    fn plain_status_lines() {
        assert_eq!(
            status_line(Mark::Done, "created src/stores/InvoiceStore.ts", false),
            "\u{2713} created src/stores/InvoiceStore.ts"
        );
        assert_eq!(
            status_line(Mark::Note, "kept existing src/services/InvoiceService.ts", false),
            "\u{2139} kept existing src/services/InvoiceService.ts"
        );
        assert_eq!(
            status_line(Mark::Caution, "formatter failed", false),
            "\u{26a0} formatter failed"
        );
    }

    #[test]
    fn colored_status_keeps_the_message() {
        let line = status_line(Mark::Caution, "route registry left untouched", true);
        assert!(line.contains("route registry left untouched"));
        assert!(line.contains('\u{1b}'));
    }

    #[test]
    fn no_color_from_flag_or_config() {
        let config = AppConfig::default();
        assert!(OutputManager::new(&global(OutputFormat::Plain, false), &config).color);
        assert!(!OutputManager::new(&global(OutputFormat::Plain, true), &config).color);

        let mut config = AppConfig::default();
        config.output.no_color = true;
        assert!(!OutputManager::new(&global(OutputFormat::Plain, false), &config).color);
    }

    #[test]
    fn report_format_comes_from_flag_then_config() {
        let mut config = AppConfig::default();
        config.output.format = "json".into();

        let auto = OutputManager::new(&global(OutputFormat::Auto, true), &config);
        assert_eq!(auto.format(), OutputFormat::Json);

        let explicit = OutputManager::new(&global(OutputFormat::Human, true), &config);
        assert_eq!(explicit.format(), OutputFormat::Human);
    }

    #[test]
    fn unknown_configured_format_falls_back_to_terminal_detection() {
        let mut config = AppConfig::default();
        config.output.format = "yaml".into();
        let out = OutputManager::new(&global(OutputFormat::Auto, true), &config);
        assert!(matches!(out.format(), OutputFormat::Human | OutputFormat::Plain));
    }
}
