use super::{Extension, Identifier};
use crate::error::Result;
use crate::r5::primitives::Uri;
use crate::r5::validation;
use crate::r5::visitor::{accept_optional, walk, Visitable, Visitor};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `[base/]Type/id[/_history/version]`
static LITERAL_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((https?://([A-Za-z0-9\-\.:%\$]*/)+)?)([A-Za-z]+)/([A-Za-z0-9\-\.]{1,64})(/_history/([A-Za-z0-9\-\.]{1,64}))?$",
    )
    .unwrap()
});

/// Prefix that makes a `Reference.type` absolute
const STRUCTURE_DEFINITION_BASE: &str = "http://hl7.org/fhir/StructureDefinition/";

/// A reference from one resource to another
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    /// Literal reference, relative, internal or absolute URL
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,

    /// Type the reference refers to (e.g. "Patient")
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<Uri>,

    /// Logical reference, when literal reference is not known
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<Box<Identifier>>,

    /// Text alternative for the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<String>,
}

/// The parts of a literal `Reference.reference`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiteralReference<'a> {
    /// Service base URL of an absolute reference
    pub base_url: Option<&'a str>,
    pub resource_type: &'a str,
    pub id: &'a str,
    pub version: Option<&'a str>,
}

impl<'a> LiteralReference<'a> {
    /// Splits `Type/id`, `Type/id/_history/version` and absolute URLs ending in either form.
    /// Contained (`#id`) and `urn:` references are not literal references.
    pub fn parse(reference: &'a str) -> Option<Self> {
        let captures = LITERAL_REFERENCE.captures(reference)?;
        Some(LiteralReference {
            base_url: captures
                .get(1)
                .map(|m| m.as_str().trim_end_matches('/'))
                .filter(|base| !base.is_empty()),
            resource_type: captures.get(4)?.as_str(),
            id: captures.get(5)?.as_str(),
            version: captures.get(7).map(|m| m.as_str()),
        })
    }
}

impl fmt::Display for LiteralReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(base_url) = self.base_url {
            write!(f, "{base_url}/")?;
        }
        write!(f, "{}/{}", self.resource_type, self.id)?;
        if let Some(version) = self.version {
            write!(f, "/_history/{version}")?;
        }
        Ok(())
    }
}

impl Reference {
    pub fn builder() -> ReferenceBuilder {
        ReferenceBuilder::default()
    }

    pub fn to_builder(&self) -> ReferenceBuilder {
        ReferenceBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            reference: self.reference.clone(),
            type_: self.type_.clone(),
            identifier: self.identifier.clone(),
            display: self.display.clone(),
            skip_validation: false,
        }
    }

    element_getters!();

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn type_(&self) -> Option<&Uri> {
        self.type_.as_ref()
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_deref()
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// `Reference.type` with the StructureDefinition base stripped
    pub fn declared_type(&self) -> Option<&str> {
        self.type_.as_ref().map(|type_| {
            let type_ = type_.as_str();
            type_.strip_prefix(STRUCTURE_DEFINITION_BASE).unwrap_or(type_)
        })
    }

    /// The parsed literal reference, if `reference` has the `Type/id` form
    pub fn literal(&self) -> Option<LiteralReference<'_>> {
        self.reference.as_deref().and_then(LiteralReference::parse)
    }

    /// Target type from `type`, or else from a literal reference
    pub fn reference_type(&self) -> Option<&str> {
        self.declared_type()
            .or_else(|| self.literal().map(|literal| literal.resource_type))
    }

    /// Whether this points at a resource contained in the referencing resource
    pub fn is_contained(&self) -> bool {
        self.reference.as_deref().is_some_and(|r| r.starts_with('#'))
    }
}

#[derive(Debug, Default)]
pub struct ReferenceBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    reference: Option<String>,
    type_: Option<Uri>,
    identifier: Option<Box<Identifier>>,
    display: Option<String>,
    skip_validation: bool,
}

impl ReferenceBuilder {
    element_builder_methods!();

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn type_(mut self, type_: Uri) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(Box::new(identifier));
        self
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn build(self) -> Result<Reference> {
        let reference = Reference {
            id: self.id,
            extension: self.extension,
            reference: self.reference,
            type_: self.type_,
            identifier: self.identifier,
            display: self.display,
        };
        if !self.skip_validation {
            reference.validate()?;
        }
        Ok(reference)
    }
}

impl Visitable for Reference {
    fn type_name(&self) -> &'static str {
        "Reference"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self)
            || self.reference.is_some()
            || self.type_.is_some()
            || self.identifier.is_some()
            || self.display.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            accept_optional(self.reference.as_ref(), "reference", visitor);
            accept_optional(self.type_.as_ref(), "type", visitor);
            accept_optional(self.identifier.as_deref(), "identifier", visitor);
            accept_optional(self.display.as_ref(), "display", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_optional_string(self.reference.as_deref(), "reference")?;
        validation::check_optional_string(self.display.as_deref(), "display")?;
        validation::require_value_or_children(self.has_children(), "Reference")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relative() {
        let literal = LiteralReference::parse("Patient/123").unwrap();
        assert_eq!(literal.resource_type, "Patient");
        assert_eq!(literal.id, "123");
        assert_eq!(literal.base_url, None);
        assert_eq!(literal.version, None);
    }

    #[test]
    fn test_parse_versioned_absolute() {
        let literal =
            LiteralReference::parse("https://example.org/fhir/Specimen/abc/_history/2").unwrap();
        assert_eq!(literal.base_url, Some("https://example.org/fhir"));
        assert_eq!(literal.resource_type, "Specimen");
        assert_eq!(literal.id, "abc");
        assert_eq!(literal.version, Some("2"));
        assert_eq!(literal.to_string(), "https://example.org/fhir/Specimen/abc/_history/2");
    }

    #[test]
    fn test_non_literal_forms() {
        assert!(LiteralReference::parse("#p1").is_none());
        assert!(LiteralReference::parse("urn:uuid:04121321-4af5-424c-a0e1-ed3aab1c349d").is_none());
        assert!(LiteralReference::parse("Patient").is_none());
    }

    #[test]
    fn test_reference_type_prefers_declared() {
        let reference = Reference::builder()
            .type_(Uri::new("http://hl7.org/fhir/StructureDefinition/Group").unwrap())
            .reference("#g1")
            .build()
            .unwrap();
        assert_eq!(reference.reference_type(), Some("Group"));
        assert!(reference.is_contained());

        let literal = Reference::builder().reference("Device/d1").build().unwrap();
        assert_eq!(literal.reference_type(), Some("Device"));
    }
}
