//! Application layer for Kiln.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerateService, TemplateService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! generation rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    ArtifactOutcome, ArtifactReport, GenerateService, GenerateSettings, GenerationPlan,
    GenerationReport, KindInfo, PlannedRegistration, RegistryStatus, TemplateService,
};

pub use ports::{
    CodeFormatter, Filesystem, TemplateListing, TemplateOrigin, TemplateRenderer, TemplateStore,
};

pub use error::ApplicationError;
