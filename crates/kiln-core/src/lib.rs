//! Kiln Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Kiln
//! artifact generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             kiln-cli (CLI)              │
//! │     (Builds requests, owns adapters)    │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (GenerateService, TemplateService)    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │  (Filesystem, Store, Render, Format)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     kiln-adapters (Infrastructure)      │
//! │ (LocalFilesystem, BlockRenderer, etc.)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (identifiers, context, layout, registry)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kiln_core::prelude::*;
//!
//! # fn adapters() -> (Box<dyn TemplateStore>, Box<dyn TemplateRenderer>,
//! #     Box<dyn Filesystem>, Box<dyn CodeFormatter>) { unimplemented!() }
//! let (store, renderer, filesystem, formatter) = adapters();
//! let service = GenerateService::new(store, renderer, filesystem, formatter);
//!
//! let request = GenerationRequest::new("Invoice", ArtifactKind::Page, ".")
//!     .with_option("store", true);
//! let report = service.generate(&request)?;
//! println!("{} files written", report.written().count());
//! # Ok::<(), KilnError>(())
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateService, GenerateSettings, GenerationPlan, GenerationReport, RegistryStatus,
        TemplateService,
        ports::{CodeFormatter, Filesystem, TemplateRenderer, TemplateStore},
    };
    pub use crate::domain::{
        ArtifactKind, DerivedIdentifiers, GenerationRequest, OptionValue, OverwritePolicy,
        RegistryConvention, TemplateContext, TemplateKey,
    };
    pub use crate::error::{KilnError, KilnResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
