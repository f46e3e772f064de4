//! FHIR R5 complex data types
//!
//! Every type follows the same shape: private fields, getters, a builder whose `build()`
//! validates the result, and a [`Visitable`](super::visitor::Visitable) implementation.

mod annotation;
mod coding;
mod expression;
mod extension;
mod identifier;
mod meta;
mod narrative;
mod period;
mod quantity;
mod reference;

pub use annotation::{Annotation, AnnotationAuthor, AnnotationBuilder};
pub use coding::{
    CodeableConcept, CodeableConceptBuilder, CodeableReference, CodeableReferenceBuilder, Coding,
    CodingBuilder,
};
pub use expression::{Expression, ExpressionBuilder};
pub use extension::{Extension, ExtensionBuilder, ExtensionValue};
pub use identifier::{Identifier, IdentifierBuilder};
pub use meta::{Meta, MetaBuilder};
pub use narrative::{Narrative, NarrativeBuilder};
pub use period::{Period, PeriodBuilder};
pub use quantity::{Duration, Money, MoneyBuilder, Quantity, QuantityBuilder, SimpleQuantity};
pub use reference::{LiteralReference, Reference, ReferenceBuilder};
