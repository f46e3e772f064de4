//! FHIR data models
//!
//! This crate provides immutable, strongly-typed Rust structures for a slice of the
//! FHIR R5 (5.0.0) specification.
//!
//! # Module Organization
//!
//! - `r5`: FHIR R5 models: primitives, code enums, data types and the `Coverage`,
//!   `ImagingSelection`, `Permission` and `Specimen` resources
//! - `config`: Process-wide model configuration
//! - `error`: Error and result types
//!
//! # Design Philosophy
//!
//! - **Immutable**: Instances are created through builders and never change afterwards
//! - **Validated**: `build()` enforces cardinality, required bindings and reference targets
//! - **Traversable**: Every type implements [`r5::visitor::Visitable`]
//! - **Comparable**: Equality and hashing are structural
//!
//! # Example
//!
//! ```rust
//! use ferrum_r5::r5::{Reference, Specimen, SpecimenContainer, SpecimenStatus};
//!
//! let specimen = Specimen::builder()
//!     .status(SpecimenStatus::Available)
//!     .subject(Reference::builder().reference("Patient/example").build().unwrap())
//!     .container(
//!         SpecimenContainer::builder()
//!             .device(Reference::builder().reference("Device/tube").build().unwrap())
//!             .build()
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(specimen.status(), Some(&SpecimenStatus::Available));
//! assert_eq!(specimen.container().len(), 1);
//! assert_eq!(specimen, specimen.to_builder().build().unwrap());
//! ```

pub mod config;
pub mod error;
pub mod r5;

pub use config::ModelConfig;
pub use error::{Error, Result};
