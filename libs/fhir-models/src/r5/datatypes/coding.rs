use super::{Extension, Reference};
use crate::error::Result;
use crate::r5::primitives::{Code, Uri};
use crate::r5::validation;
use crate::r5::visitor::{accept_list, accept_optional, walk, Visitable, Visitor};
use serde::{Deserialize, Serialize};

/// A reference to a code defined by a terminology system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    /// Identity of the terminology system
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<Uri>,

    /// Version of the system - if relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,

    /// Symbol in syntax defined by the system
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<Code>,

    /// Representation defined by the system
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<String>,

    /// If this coding was chosen directly by the user
    #[serde(skip_serializing_if = "Option::is_none")]
    user_selected: Option<bool>,
}

impl Coding {
    pub fn builder() -> CodingBuilder {
        CodingBuilder::default()
    }

    pub fn to_builder(&self) -> CodingBuilder {
        CodingBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            system: self.system.clone(),
            version: self.version.clone(),
            code: self.code.clone(),
            display: self.display.clone(),
            user_selected: self.user_selected,
            skip_validation: false,
        }
    }

    element_getters!();

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn user_selected(&self) -> Option<bool> {
        self.user_selected
    }
}

#[derive(Debug, Default)]
pub struct CodingBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    system: Option<Uri>,
    version: Option<String>,
    code: Option<Code>,
    display: Option<String>,
    user_selected: Option<bool>,
    skip_validation: bool,
}

impl CodingBuilder {
    element_builder_methods!();

    pub fn system(mut self, system: Uri) -> Self {
        self.system = Some(system);
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn code(mut self, code: Code) -> Self {
        self.code = Some(code);
        self
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn user_selected(mut self, user_selected: bool) -> Self {
        self.user_selected = Some(user_selected);
        self
    }

    pub fn build(self) -> Result<Coding> {
        let coding = Coding {
            id: self.id,
            extension: self.extension,
            system: self.system,
            version: self.version,
            code: self.code,
            display: self.display,
            user_selected: self.user_selected,
        };
        if !self.skip_validation {
            coding.validate()?;
        }
        Ok(coding)
    }
}

impl Visitable for Coding {
    fn type_name(&self) -> &'static str {
        "Coding"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self)
            || self.system.is_some()
            || self.version.is_some()
            || self.code.is_some()
            || self.display.is_some()
            || self.user_selected.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            accept_optional(self.system.as_ref(), "system", visitor);
            accept_optional(self.version.as_ref(), "version", visitor);
            accept_optional(self.code.as_ref(), "code", visitor);
            accept_optional(self.display.as_ref(), "display", visitor);
            accept_optional(self.user_selected.as_ref(), "userSelected", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_optional_string(self.version.as_deref(), "version")?;
        validation::check_optional_string(self.display.as_deref(), "display")?;
        validation::require_value_or_children(self.has_children(), "Coding")
    }
}

/// Concept - reference to a terminology or just text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeableConcept {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    coding: Vec<Coding>,

    /// Plain text representation of the concept
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl CodeableConcept {
    pub fn builder() -> CodeableConceptBuilder {
        CodeableConceptBuilder::default()
    }

    pub fn to_builder(&self) -> CodeableConceptBuilder {
        CodeableConceptBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            coding: self.coding.clone(),
            text: self.text.clone(),
            skip_validation: false,
        }
    }

    element_getters!();

    pub fn coding(&self) -> &[Coding] {
        &self.coding
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Whether any coding carries `system` and `code`
    pub fn has_coding(&self, system: &str, code: &str) -> bool {
        self.coding.iter().any(|coding| {
            coding.system().map(Uri::as_str) == Some(system)
                && coding.code().map(Code::as_str) == Some(code)
        })
    }
}

#[derive(Debug, Default)]
pub struct CodeableConceptBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    coding: Vec<Coding>,
    text: Option<String>,
    skip_validation: bool,
}

impl CodeableConceptBuilder {
    element_builder_methods!();

    pub fn coding(mut self, coding: Coding) -> Self {
        self.coding.push(coding);
        self
    }

    pub fn set_coding(mut self, coding: impl IntoIterator<Item = Coding>) -> Self {
        self.coding = coding.into_iter().collect();
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn build(self) -> Result<CodeableConcept> {
        let concept = CodeableConcept {
            id: self.id,
            extension: self.extension,
            coding: self.coding,
            text: self.text,
        };
        if !self.skip_validation {
            concept.validate()?;
        }
        Ok(concept)
    }
}

impl Visitable for CodeableConcept {
    fn type_name(&self) -> &'static str {
        "CodeableConcept"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self) || !self.coding.is_empty() || self.text.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            accept_list(&self.coding, "coding", visitor);
            accept_optional(self.text.as_ref(), "text", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_optional_string(self.text.as_deref(), "text")?;
        validation::require_value_or_children(self.has_children(), "CodeableConcept")
    }
}

/// Reference to a resource or a concept
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeableReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    concept: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<Reference>,
}

impl CodeableReference {
    pub fn builder() -> CodeableReferenceBuilder {
        CodeableReferenceBuilder::default()
    }

    pub fn to_builder(&self) -> CodeableReferenceBuilder {
        CodeableReferenceBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            concept: self.concept.clone(),
            reference: self.reference.clone(),
            skip_validation: false,
        }
    }

    element_getters!();

    /// Reference to a concept (by class)
    pub fn concept(&self) -> Option<&CodeableConcept> {
        self.concept.as_ref()
    }

    /// Reference to a resource (by instance)
    pub fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct CodeableReferenceBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    concept: Option<CodeableConcept>,
    reference: Option<Reference>,
    skip_validation: bool,
}

impl CodeableReferenceBuilder {
    element_builder_methods!();

    pub fn concept(mut self, concept: CodeableConcept) -> Self {
        self.concept = Some(concept);
        self
    }

    pub fn reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn build(self) -> Result<CodeableReference> {
        let codeable_reference = CodeableReference {
            id: self.id,
            extension: self.extension,
            concept: self.concept,
            reference: self.reference,
        };
        if !self.skip_validation {
            codeable_reference.validate()?;
        }
        Ok(codeable_reference)
    }
}

impl Visitable for CodeableReference {
    fn type_name(&self) -> &'static str {
        "CodeableReference"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self) || self.concept.is_some() || self.reference.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            accept_optional(self.concept.as_ref(), "concept", visitor);
            accept_optional(self.reference.as_ref(), "reference", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::require_value_or_children(self.has_children(), "CodeableReference")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    fn loinc(code: &str) -> Coding {
        Coding::builder()
            .system(Uri::new("http://loinc.org").unwrap())
            .code(Code::new(code).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_codeable_concept_json() {
        let concept = CodeableConcept::builder()
            .coding(loinc("12345-6"))
            .text("Serum")
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&concept).unwrap(),
            json!({
                "coding": [{"system": "http://loinc.org", "code": "12345-6"}],
                "text": "Serum"
            })
        );
        assert!(concept.has_coding("http://loinc.org", "12345-6"));
        assert!(!concept.has_coding("http://snomed.info/sct", "12345-6"));
    }

    #[test]
    fn test_empty_codeable_concept_rejected() {
        let err = CodeableConcept::builder().build().unwrap_err();
        assert!(matches!(err, Error::NoValueOrChildren("CodeableConcept")));
        assert!(CodeableConcept::builder().validating(false).build().is_ok());
    }

    #[test]
    fn test_blank_display_rejected() {
        let result = Coding::builder().code(Code::new("x").unwrap()).display("  ").build();
        assert!(matches!(result, Err(Error::InvalidString { element: "display", .. })));
    }

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(loinc("1-8"), loinc("1-8"));
        assert_ne!(loinc("1-8"), loinc("2-6"));
        assert_eq!(loinc("1-8").to_builder().build().unwrap(), loinc("1-8"));
    }
}
