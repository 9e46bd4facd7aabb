//! `kiln generate` - render an artifact, write it and register its route.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use kiln_adapters::{BlockRenderer, CommandFormatter, DirectoryStore, LocalFilesystem, NoopFormatter};
use kiln_core::{
    application::{
        ArtifactOutcome, GenerateService, GenerateSettings, GenerationPlan, GenerationReport,
        RegistryStatus, ports::CodeFormatter,
    },
    domain::{ArtifactKind, GenerationRequest, RegistryConvention},
};

use crate::{
    cli::{GenerateArgs, OutputFormat},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(kind = ?args.kind, name = %args.name))]
pub fn execute(args: GenerateArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let request = build_request(&args, config);
    let settings = build_settings(&args, config);
    let templates = templates_dir(&args, config, &request.output_root);
    debug!(templates = %templates.display(), ?settings, "Resolved generation settings");

    let store = DirectoryStore::new(&templates);
    for path in store.unrecognized().with_cli_context(|| "scanning templates")? {
        output.warning(&format!("ignoring unknown template {}", path.display()))?;
    }

    let formatter: Box<dyn CodeFormatter> = if settings.format {
        Box::new(
            CommandFormatter::new(&config.formatter.program, &config.formatter.args)
                .with_working_dir(&request.output_root),
        )
    } else {
        Box::new(NoopFormatter)
    };

    let service = GenerateService::new(
        Box::new(store),
        Box::new(BlockRenderer::new()),
        Box::new(LocalFilesystem::new()),
        formatter,
    )
    .with_settings(settings);

    if args.dry_run {
        let plan = service.plan(&request)?;
        return print_plan(&plan, output);
    }

    let report = service.generate(&request)?;
    print_report(&report, output)
}

/// Turn the parsed flags into a core request. Flags are only added when set
/// so kinds never see options they did not ask for.
fn build_request(args: &GenerateArgs, config: &AppConfig) -> GenerationRequest {
    let output_root = args
        .output
        .clone()
        .unwrap_or_else(|| config.generation.output_root.clone());
    let mut request = GenerationRequest::new(&args.name, ArtifactKind::from(args.kind), output_root);

    if let Some(description) = &args.description {
        request.options.set("description", description.as_str());
    }
    let flags = [
        ("antd", args.antd),
        ("styled", args.styled),
        ("api", args.api),
        ("zod", args.zod),
        ("store", args.store),
        ("service", args.service),
    ];
    for (name, set) in flags {
        if set {
            request.options.set(name, true);
        }
    }
    request
}

/// CLI flags override the configuration.
fn build_settings(args: &GenerateArgs, config: &AppConfig) -> GenerateSettings {
    let generation = &config.generation;
    GenerateSettings {
        overwrite: args.overwrite.map_or(generation.overwrite, Into::into),
        register: generation.register && !args.no_register,
        registry_path: args
            .registry
            .clone()
            .unwrap_or_else(|| generation.registry_path.clone()),
        convention: RegistryConvention::new(&generation.import_namespace),
        format: config.formatter.enabled && !args.no_format && !args.dry_run,
    }
}

/// `--templates` is taken as given; the configured directory is relative to
/// the output root.
fn templates_dir(args: &GenerateArgs, config: &AppConfig, output_root: &Path) -> PathBuf {
    match &args.templates {
        Some(dir) => dir.clone(),
        None if config.templates.dir.is_absolute() => config.templates.dir.clone(),
        None => output_root.join(&config.templates.dir),
    }
}

fn print_plan(plan: &GenerationPlan, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(plan)?;
        return Ok(());
    }

    output.header(&format!(
        "Dry run: {} {} (nothing written)",
        plan.kind, plan.identifiers.pascal_name
    ))?;
    for artifact in &plan.artifacts {
        output.print(&format!(
            "  would write {} ({} lines)",
            plan.output_root.join(&artifact.relative_path).display(),
            artifact.content.lines().count()
        ))?;
    }
    if let Some(registration) = &plan.registration {
        output.print(&format!(
            "  would register in {}: {}",
            plan.output_root.join(&registration.path).display(),
            registration.entry.import_statement
        ))?;
    }
    Ok(())
}

fn print_report(report: &GenerationReport, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(report)?;
        return Ok(());
    }

    for artifact in &report.artifacts {
        let path = report.output_root.join(&artifact.path);
        match artifact.outcome {
            ArtifactOutcome::Created => output.success(&format!("created {}", path.display()))?,
            ArtifactOutcome::Overwritten => {
                output.success(&format!("overwrote {}", path.display()))?
            }
            ArtifactOutcome::Skipped => {
                output.info(&format!("kept existing {}", path.display()))?
            }
        }
    }

    match &report.registry {
        RegistryStatus::Created { path } => output.success(&format!(
            "created route registry {}",
            report.output_root.join(path).display()
        ))?,
        RegistryStatus::Patched { path } => output.success(&format!(
            "registered /{} in {}",
            report.identifiers.kebab_name,
            report.output_root.join(path).display()
        ))?,
        RegistryStatus::AlreadyExists { path } => output.info(&format!(
            "route /{} already registered in {}",
            report.identifiers.kebab_name,
            report.output_root.join(path).display()
        ))?,
        RegistryStatus::NotApplicable
        | RegistryStatus::Disabled
        | RegistryStatus::Skipped { .. } => {}
    }

    for warning in &report.warnings {
        output.warning(warning)?;
    }

    output.print(&format!(
        "{} {} ready ({} of {} files written{})",
        report.kind,
        report.identifiers.pascal_name,
        report.written().count(),
        report.artifacts.len(),
        if report.formatted { ", formatted" } else { "" }
    ))?;
    Ok(())
}
