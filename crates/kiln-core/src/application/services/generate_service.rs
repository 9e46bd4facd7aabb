//! Generate Service - main application orchestrator.
//!
//! This service coordinates one generation run:
//! 1. Derive identifiers and build the template context
//! 2. Render every layout entry in memory
//! 3. Write artifacts under the overwrite policy
//! 4. Patch the route registry (pages only)
//! 5. Run the code formatter
//!
//! Steps 1-2 fail the run. Registry and formatter failures are isolated: the
//! artifacts already written stay, and the failure is reported as a warning.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{CodeFormatter, Filesystem, TemplateRenderer, TemplateStore},
    },
    domain::{
        ArtifactKind, DEFAULT_REGISTRY_PATH, DerivedIdentifiers, GenerationRequest,
        OverwritePolicy, PatchOutcome, RegistryConvention, RegistryEntry, RenderedArtifact,
        build_context, derive, layout, patch_with, registry_entry,
    },
    error::KilnResult,
};

/// Run-wide behavior of [`GenerateService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSettings {
    pub overwrite: OverwritePolicy,
    /// Patch the route registry for routable kinds.
    pub register: bool,
    /// Registry file, relative to the request's output root.
    pub registry_path: PathBuf,
    pub convention: RegistryConvention,
    /// Run the code formatter over written files.
    pub format: bool,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            overwrite: OverwritePolicy::default(),
            register: true,
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            convention: RegistryConvention::default(),
            format: true,
        }
    }
}

/// Everything a run would produce, computed without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPlan {
    pub kind: ArtifactKind,
    pub identifiers: DerivedIdentifiers,
    pub output_root: PathBuf,
    /// Paths relative to `output_root`.
    pub artifacts: Vec<RenderedArtifact>,
    pub registration: Option<PlannedRegistration>,
}

/// A registry entry and the file it goes into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRegistration {
    pub path: PathBuf,
    pub entry: RegistryEntry,
}

/// What happened to one artifact file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactOutcome {
    Created,
    Overwritten,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    pub path: PathBuf,
    pub outcome: ArtifactOutcome,
}

/// What happened to the route registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegistryStatus {
    /// The kind has no route.
    NotApplicable,
    /// Registration was turned off for this run.
    Disabled,
    Created { path: PathBuf },
    Patched { path: PathBuf },
    AlreadyExists { path: PathBuf },
    /// Registration failed; artifacts were still written.
    Skipped { reason: String },
}

/// Result of [`GenerateService::generate`]. Serializable for `--format json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub kind: ArtifactKind,
    pub identifiers: DerivedIdentifiers,
    pub output_root: PathBuf,
    pub artifacts: Vec<ArtifactReport>,
    pub registry: RegistryStatus,
    pub formatted: bool,
    pub warnings: Vec<String>,
}

impl GenerationReport {
    pub fn written(&self) -> impl Iterator<Item = &ArtifactReport> {
        self.artifacts
            .iter()
            .filter(|a| a.outcome != ArtifactOutcome::Skipped)
    }
}

/// Main generation service. One instance per CLI invocation.
pub struct GenerateService {
    store: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    formatter: Box<dyn CodeFormatter>,
    settings: GenerateSettings,
}

impl GenerateService {
    /// Create a new generate service with the given adapters and default
    /// settings.
    pub fn new(
        store: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
        formatter: Box<dyn CodeFormatter>,
    ) -> Self {
        Self {
            store,
            renderer,
            filesystem,
            formatter,
            settings: GenerateSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerateSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &GenerateSettings {
        &self.settings
    }

    /// Render everything in memory. Nothing is written.
    #[instrument(
        skip_all,
        fields(kind = %request.kind, name = %request.base_name)
    )]
    pub fn plan(&self, request: &GenerationRequest) -> KilnResult<GenerationPlan> {
        let ids = derive(&request.base_name, request.kind)?;
        let context = build_context(request, &ids)?;
        debug!(keys = context.len(), "Template context built");

        let mut artifacts = Vec::new();
        for spec in layout(request.kind, &ids) {
            let source = self.store.get(&spec.template)?;
            let content = self.renderer.render(&source, &context).map_err(|source| {
                ApplicationError::Rendering {
                    template: spec.template.to_string(),
                    source,
                }
            })?;
            artifacts.push(RenderedArtifact {
                relative_path: spec.relative_path,
                content,
            });
        }

        let registration = registry_entry(request.kind, &ids, &self.settings.convention).map(
            |entry| PlannedRegistration {
                path: self.settings.registry_path.clone(),
                entry,
            },
        );

        Ok(GenerationPlan {
            kind: request.kind,
            identifiers: ids,
            output_root: request.output_root.clone(),
            artifacts,
            registration,
        })
    }

    /// Generate, write and register one artifact.
    #[instrument(
        skip_all,
        fields(
            run_id = tracing::field::Empty,
            kind = %request.kind,
            name = %request.base_name,
            output = %request.output_root.display()
        )
    )]
    pub fn generate(&self, request: &GenerationRequest) -> KilnResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));
        info!("Generating {} {}", request.kind, request.base_name);

        let plan = self.plan(request)?;
        let mut warnings = Vec::new();

        let artifacts = self.write_artifacts(&plan)?;

        let registry = match &plan.registration {
            None => RegistryStatus::NotApplicable,
            Some(_) if !self.settings.register => RegistryStatus::Disabled,
            Some(planned) => match self.register(&plan.output_root, planned) {
                Ok(status) => status,
                Err(e) => {
                    warn!(error = %e, "Registry patch skipped");
                    warnings.push(format!("route not registered: {e}"));
                    RegistryStatus::Skipped {
                        reason: e.to_string(),
                    }
                }
            },
        };

        let mut formatted = false;
        if self.settings.format {
            let paths = touched_paths(&plan.output_root, &artifacts, &registry);
            match self.formatter.format(&paths) {
                Ok(()) => formatted = true,
                Err(e) => {
                    warn!(error = %e, "Formatter failed");
                    warnings.push(format!("formatting skipped: {e}"));
                }
            }
        }

        info!(
            files = artifacts.len(),
            warnings = warnings.len(),
            "Generation completed"
        );

        Ok(GenerationReport {
            run_id,
            kind: plan.kind,
            identifiers: plan.identifiers,
            output_root: plan.output_root,
            artifacts,
            registry,
            formatted,
            warnings,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Write all artifacts. With [`OverwritePolicy::Error`] every target is
    /// checked before the first write.
    fn write_artifacts(&self, plan: &GenerationPlan) -> KilnResult<Vec<ArtifactReport>> {
        let targets: Vec<(PathBuf, bool)> = plan
            .artifacts
            .iter()
            .map(|a| {
                let path = plan.output_root.join(&a.relative_path);
                let exists = self.filesystem.exists(&path);
                (path, exists)
            })
            .collect();

        if self.settings.overwrite == OverwritePolicy::Error {
            if let Some((path, _)) = targets.iter().find(|(_, exists)| *exists) {
                return Err(ApplicationError::ArtifactExists { path: path.clone() }.into());
            }
        }

        let mut reports = Vec::with_capacity(targets.len());
        for (artifact, (path, exists)) in plan.artifacts.iter().zip(targets) {
            let outcome = match (exists, self.settings.overwrite) {
                (true, OverwritePolicy::Skip) => {
                    info!(path = %path.display(), "Keeping existing file");
                    ArtifactOutcome::Skipped
                }
                (true, _) => {
                    self.write(&path, &artifact.content)?;
                    warn!(path = %path.display(), "Overwrote existing file");
                    ArtifactOutcome::Overwritten
                }
                (false, _) => {
                    self.write(&path, &artifact.content)?;
                    debug!(path = %path.display(), "Created file");
                    ArtifactOutcome::Created
                }
            };
            reports.push(ArtifactReport {
                path: artifact.relative_path.clone(),
                outcome,
            });
        }
        Ok(reports)
    }

    fn write(&self, path: &Path, content: &str) -> KilnResult<()> {
        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(path, content)
    }

    fn register(
        &self,
        output_root: &Path,
        planned: &PlannedRegistration,
    ) -> KilnResult<RegistryStatus> {
        let path = output_root.join(&planned.path);
        let existing = self.filesystem.read_to_string(&path)?;

        match patch_with(existing.as_deref(), &planned.entry, &self.settings.convention)? {
            PatchOutcome::Created(doc) => {
                if let Some(parent) = path.parent() {
                    self.filesystem.create_dir_all(parent)?;
                }
                self.filesystem.write_file_atomic(&path, &doc)?;
                info!(path = %path.display(), "Registry created");
                Ok(RegistryStatus::Created {
                    path: planned.path.clone(),
                })
            }
            PatchOutcome::Patched(doc) => {
                self.filesystem.write_file_atomic(&path, &doc)?;
                info!(path = %path.display(), "Registry patched");
                Ok(RegistryStatus::Patched {
                    path: planned.path.clone(),
                })
            }
            PatchOutcome::AlreadyExists => {
                info!(key = %planned.entry.uniqueness_key, "Route already registered");
                Ok(RegistryStatus::AlreadyExists {
                    path: planned.path.clone(),
                })
            }
        }
    }
}

/// Absolute paths of files written in this run.
fn touched_paths(
    root: &Path,
    artifacts: &[ArtifactReport],
    registry: &RegistryStatus,
) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = artifacts
        .iter()
        .filter(|a| a.outcome != ArtifactOutcome::Skipped)
        .map(|a| root.join(&a.path))
        .collect();
    if let RegistryStatus::Created { path } | RegistryStatus::Patched { path } = registry {
        paths.push(root.join(path));
    }
    paths
}
