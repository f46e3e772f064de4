use super::{CodeableConcept, Extension, Period, Reference};
use crate::error::Result;
use crate::r5::codes::IdentifierUse;
use crate::r5::primitives::Uri;
use crate::r5::validation;
use crate::r5::visitor::{accept_optional, walk, Visitable, Visitor};
use serde::{Deserialize, Serialize};

/// An identifier intended for computation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    use_: Option<IdentifierUse>,

    /// Description of identifier
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<CodeableConcept>,

    /// The namespace for the identifier value
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<Uri>,

    /// The value that is unique
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,

    /// Time period when id is/was valid for use
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<Period>,

    /// Organization that issued id (may be just text)
    #[serde(skip_serializing_if = "Option::is_none")]
    assigner: Option<Reference>,
}

impl Identifier {
    pub fn builder() -> IdentifierBuilder {
        IdentifierBuilder::default()
    }

    pub fn to_builder(&self) -> IdentifierBuilder {
        IdentifierBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            use_: self.use_,
            type_: self.type_.clone(),
            system: self.system.clone(),
            value: self.value.clone(),
            period: self.period.clone(),
            assigner: self.assigner.clone(),
            skip_validation: false,
        }
    }

    element_getters!();

    pub fn use_(&self) -> Option<&IdentifierUse> {
        self.use_.as_ref()
    }

    pub fn type_(&self) -> Option<&CodeableConcept> {
        self.type_.as_ref()
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }

    pub fn assigner(&self) -> Option<&Reference> {
        self.assigner.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct IdentifierBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    use_: Option<IdentifierUse>,
    type_: Option<CodeableConcept>,
    system: Option<Uri>,
    value: Option<String>,
    period: Option<Period>,
    assigner: Option<Reference>,
    skip_validation: bool,
}

impl IdentifierBuilder {
    element_builder_methods!();

    pub fn use_(mut self, use_: IdentifierUse) -> Self {
        self.use_ = Some(use_);
        self
    }

    pub fn type_(mut self, type_: CodeableConcept) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn system(mut self, system: Uri) -> Self {
        self.system = Some(system);
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn assigner(mut self, assigner: Reference) -> Self {
        self.assigner = Some(assigner);
        self
    }

    pub fn build(self) -> Result<Identifier> {
        let identifier = Identifier {
            id: self.id,
            extension: self.extension,
            use_: self.use_,
            type_: self.type_,
            system: self.system,
            value: self.value,
            period: self.period,
            assigner: self.assigner,
        };
        if !self.skip_validation {
            identifier.validate()?;
        }
        Ok(identifier)
    }
}

impl Visitable for Identifier {
    fn type_name(&self) -> &'static str {
        "Identifier"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self)
            || self.use_.is_some()
            || self.type_.is_some()
            || self.system.is_some()
            || self.value.is_some()
            || self.period.is_some()
            || self.assigner.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            accept_optional(self.use_.as_ref(), "use", visitor);
            accept_optional(self.type_.as_ref(), "type", visitor);
            accept_optional(self.system.as_ref(), "system", visitor);
            accept_optional(self.value.as_ref(), "value", visitor);
            accept_optional(self.period.as_ref(), "period", visitor);
            accept_optional(self.assigner.as_ref(), "assigner", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_optional_string(self.value.as_deref(), "value")?;
        validation::check_reference_type(self.assigner.as_ref(), "assigner", &["Organization"])?;
        validation::require_value_or_children(self.has_children(), "Identifier")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_identifier_json_names() {
        let identifier = Identifier::builder()
            .use_(IdentifierUse::Official)
            .system(Uri::new("urn:oid:2.16.840.1.113883.3.19.2.1").unwrap())
            .value("X-12345")
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&identifier).unwrap(),
            json!({
                "use": "official",
                "system": "urn:oid:2.16.840.1.113883.3.19.2.1",
                "value": "X-12345"
            })
        );
    }

    #[test]
    fn test_assigner_must_be_organization() {
        let result = Identifier::builder()
            .value("1")
            .assigner(Reference::builder().reference("Patient/1").build().unwrap())
            .build();
        assert!(matches!(result, Err(Error::InvalidReferenceType { element: "assigner", .. })));
    }
}
