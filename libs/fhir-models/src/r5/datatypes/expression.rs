use super::Extension;
use crate::error::Result;
use crate::r5::primitives::{Code, Uri};
use crate::r5::validation;
use crate::r5::visitor::{accept_optional, walk, Visitable, Visitor};
use serde::{Deserialize, Serialize};

/// An expression that can be used to generate a value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expression {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    /// Natural language description of the condition
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// Short name assigned to expression for reuse
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<Code>,

    /// text/cql | text/fhirpath | application/x-fhir-query | etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<Code>,

    #[serde(skip_serializing_if = "Option::is_none")]
    expression: Option<String>,

    /// Where the expression is found
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<Uri>,
}

impl Expression {
    pub fn builder() -> ExpressionBuilder {
        ExpressionBuilder::default()
    }

    pub fn to_builder(&self) -> ExpressionBuilder {
        ExpressionBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            description: self.description.clone(),
            name: self.name.clone(),
            language: self.language.clone(),
            expression: self.expression.clone(),
            reference: self.reference.clone(),
            skip_validation: false,
        }
    }

    element_getters!();

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn name(&self) -> Option<&Code> {
        self.name.as_ref()
    }

    pub fn language(&self) -> Option<&Code> {
        self.language.as_ref()
    }

    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    pub fn reference(&self) -> Option<&Uri> {
        self.reference.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct ExpressionBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    description: Option<String>,
    name: Option<Code>,
    language: Option<Code>,
    expression: Option<String>,
    reference: Option<Uri>,
    skip_validation: bool,
}

impl ExpressionBuilder {
    element_builder_methods!();

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(mut self, name: Code) -> Self {
        self.name = Some(name);
        self
    }

    pub fn language(mut self, language: Code) -> Self {
        self.language = Some(language);
        self
    }

    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    pub fn reference(mut self, reference: Uri) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn build(self) -> Result<Expression> {
        let expression = Expression {
            id: self.id,
            extension: self.extension,
            description: self.description,
            name: self.name,
            language: self.language,
            expression: self.expression,
            reference: self.reference,
        };
        if !self.skip_validation {
            expression.validate()?;
        }
        Ok(expression)
    }
}

impl Visitable for Expression {
    fn type_name(&self) -> &'static str {
        "Expression"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self)
            || self.description.is_some()
            || self.name.is_some()
            || self.language.is_some()
            || self.expression.is_some()
            || self.reference.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            accept_optional(self.description.as_ref(), "description", visitor);
            accept_optional(self.name.as_ref(), "name", visitor);
            accept_optional(self.language.as_ref(), "language", visitor);
            accept_optional(self.expression.as_ref(), "expression", visitor);
            accept_optional(self.reference.as_ref(), "reference", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_optional_string(self.description.as_deref(), "description")?;
        validation::check_optional_string(self.expression.as_deref(), "expression")?;
        validation::require_value_or_children(self.has_children(), "Expression")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_round_trip_through_builder() {
        let expression = Expression::builder()
            .language(Code::new("text/fhirpath").unwrap())
            .expression("Observation.subject")
            .build()
            .unwrap();
        assert_eq!(expression.expression(), Some("Observation.subject"));
        assert_eq!(expression.to_builder().build().unwrap(), expression);
    }
}
