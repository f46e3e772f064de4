//! FHIR R5 models
//!
//! Types mirror the R5 (5.0.0) structure definitions. Nested BackboneElements are
//! flattened into top-level types named after their path, e.g. `Specimen.collection`
//! becomes [`SpecimenCollection`].

#[macro_use]
mod macros;

pub mod codes;
pub mod datatypes;
pub mod json;
pub mod primitives;
pub mod resources;
pub mod support;
pub mod validation;
pub mod visitor;

// Re-export commonly used types
pub use codes::*;
pub use datatypes::*;
pub use primitives::*;
pub use resources::*;
pub use visitor::{PathCollector, PrimitiveValue, ReferenceCollector, Visitable, Visitor};
