//! Implementation of the `kiln list` command.

use kiln_adapters::DirectoryStore;
use kiln_core::{
    application::{KindInfo, TemplateOrigin, TemplateService},
    domain::ArtifactKind,
};

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let dir = args.templates.clone().unwrap_or_else(|| {
        if config.templates.dir.is_absolute() {
            config.templates.dir.clone()
        } else {
            config.generation.output_root.join(&config.templates.dir)
        }
    });
    let service = TemplateService::new(Box::new(DirectoryStore::new(dir)));

    let filter = args.kind.map(ArtifactKind::from);
    let kinds: Vec<KindInfo> = service
        .kinds()?
        .into_iter()
        .filter(|info| filter.is_none_or(|kind| kind == info.kind))
        .collect();

    match args.format {
        ListFormat::Table => {
            output.header("Artifact kinds:")?;
            for info in &kinds {
                output.print(&format!(
                    "  {:<10} suffix {:<10} options: {}{}",
                    info.kind.as_str(),
                    display_suffix(info.suffix),
                    info.options.join(", "),
                    if info.registers_route { "  (registers a route)" } else { "" }
                ))?;
                for template in &info.templates {
                    output.print(&format!("      {:<20} {}", template.key, origin(&template.origin)))?;
                }
            }
        }

        ListFormat::Json => output.json(&kinds)?,

        ListFormat::List => {
            for template in kinds.iter().flat_map(|info| &info.templates) {
                output.print(&template.key.to_string())?;
            }
        }

        ListFormat::Csv => {
            output.print("kind,template,origin")?;
            for info in &kinds {
                for template in &info.templates {
                    output.print(&format!(
                        "{},{},{}",
                        info.kind,
                        template.key.name,
                        origin(&template.origin)
                    ))?;
                }
            }
        }
    }

    Ok(())
}

fn display_suffix(suffix: &str) -> &str {
    if suffix.is_empty() { "-" } else { suffix }
}

fn origin(origin: &TemplateOrigin) -> String {
    match origin {
        TemplateOrigin::Builtin => "builtin".into(),
        TemplateOrigin::Custom(path) => path.display().to_string(),
    }
}
