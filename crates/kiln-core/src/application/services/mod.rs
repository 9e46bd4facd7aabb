//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a page" or "list templates".

pub mod generate_service;
pub mod template_service;

pub use generate_service::{
    ArtifactOutcome, ArtifactReport, GenerateService, GenerateSettings, GenerationPlan,
    GenerationReport, PlannedRegistration, RegistryStatus,
};
pub use template_service::{KindInfo, TemplateService};
