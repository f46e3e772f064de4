use super::{
    Annotation, CodeableConcept, CodeableReference, Coding, Expression, Identifier, Money, Period,
    Quantity, Reference,
};
use crate::error::{Error, Result};
use crate::r5::primitives::{
    Base64Binary, Canonical, Code, Date, DateTime, Id, Instant, Markdown, PositiveInt, UnsignedInt,
    Uri,
};
use crate::r5::validation;
use crate::r5::visitor::{walk, Visitable, Visitor};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Additional content defined by implementations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    /// Identifies the meaning of the extension
    url: String,

    #[serde(flatten, deserialize_with = "ExtensionValue::deserialize_flattened")]
    value: Option<ExtensionValue>,
}

choice_enum!(
    /// `Extension.value[x]`
    ExtensionValue {
        Base64Binary(Base64Binary) => "valueBase64Binary",
        Boolean(bool) => "valueBoolean",
        Canonical(Canonical) => "valueCanonical",
        Code(Code) => "valueCode",
        Date(Date) => "valueDate",
        DateTime(DateTime) => "valueDateTime",
        Decimal(Decimal) => "valueDecimal",
        Id(Id) => "valueId",
        Instant(Instant) => "valueInstant",
        Integer(i32) => "valueInteger",
        Markdown(Markdown) => "valueMarkdown",
        PositiveInt(PositiveInt) => "valuePositiveInt",
        String(String) => "valueString",
        UnsignedInt(UnsignedInt) => "valueUnsignedInt",
        Uri(Uri) => "valueUri",
        Annotation(Annotation) => "valueAnnotation",
        CodeableConcept(CodeableConcept) => "valueCodeableConcept",
        CodeableReference(CodeableReference) => "valueCodeableReference",
        Coding(Coding) => "valueCoding",
        Expression(Expression) => "valueExpression",
        Identifier(Identifier) => "valueIdentifier",
        Money(Money) => "valueMoney",
        Period(Period) => "valuePeriod",
        Quantity(Quantity) => "valueQuantity",
        Reference(Reference) => "valueReference",
    }
);

impl Extension {
    pub fn builder() -> ExtensionBuilder {
        ExtensionBuilder::default()
    }

    pub fn to_builder(&self) -> ExtensionBuilder {
        ExtensionBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            url: Some(self.url.clone()),
            value: self.value.clone(),
            skip_validation: false,
        }
    }

    element_getters!();

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn value(&self) -> Option<&ExtensionValue> {
        self.value.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct ExtensionBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    url: Option<String>,
    value: Option<ExtensionValue>,
    skip_validation: bool,
}

impl ExtensionBuilder {
    element_builder_methods!();

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn value(mut self, value: ExtensionValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn build(self) -> Result<Extension> {
        let extension = Extension {
            id: self.id,
            extension: self.extension,
            url: self.url.ok_or(Error::MissingElement("url"))?,
            value: self.value,
        };
        if !self.skip_validation {
            extension.validate()?;
        }
        Ok(extension)
    }
}

impl Visitable for Extension {
    fn type_name(&self) -> &'static str {
        "Extension"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self) || self.value.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            self.url.accept("url", None, visitor);
            if let Some(value) = &self.value {
                value.as_visitable().accept("value", None, visitor);
            }
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_string(&self.url, "url")?;
        validation::require_value_or_children(self.has_children(), "Extension")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extension_value_uses_typed_name() {
        let extension = Extension::builder()
            .url("http://example.org/fhir/StructureDefinition/flag")
            .value(ExtensionValue::Boolean(true))
            .build()
            .unwrap();
        let value = serde_json::to_value(&extension).unwrap();
        assert_eq!(
            value,
            json!({
                "url": "http://example.org/fhir/StructureDefinition/flag",
                "valueBoolean": true
            })
        );

        let parsed: Extension = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, extension);
    }

    #[test]
    fn test_extension_requires_url() {
        let err = Extension::builder()
            .value(ExtensionValue::String("x".to_string()))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingElement("url")));
    }

    #[test]
    fn test_extension_needs_value_or_children() {
        let err = Extension::builder()
            .url("http://example.org/empty")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::NoValueOrChildren("Extension")));
    }
}
