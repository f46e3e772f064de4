use super::Extension;
use crate::error::Result;
use crate::r5::codes::QuantityComparator;
use crate::r5::primitives::{Code, Uri};
use crate::r5::validation;
use crate::r5::visitor::{accept_optional, walk, Visitable, Visitor};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A measured or measurable amount
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    /// Numerical value (with implicit precision)
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Decimal>,

    /// < | <= | >= | > | ad - how to understand the value
    #[serde(skip_serializing_if = "Option::is_none")]
    comparator: Option<QuantityComparator>,

    /// Unit representation
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<String>,

    /// System that defines coded unit form
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<Uri>,

    /// Coded form of the unit
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<Code>,
}

/// Quantity profile without a comparator; checked where the element is declared
pub type SimpleQuantity = Quantity;

/// Quantity profile for a length of time
pub type Duration = Quantity;

impl Quantity {
    pub fn builder() -> QuantityBuilder {
        QuantityBuilder::default()
    }

    pub fn to_builder(&self) -> QuantityBuilder {
        QuantityBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            value: self.value,
            comparator: self.comparator,
            unit: self.unit.clone(),
            system: self.system.clone(),
            code: self.code.clone(),
            skip_validation: false,
        }
    }

    element_getters!();

    pub fn value(&self) -> Option<&Decimal> {
        self.value.as_ref()
    }

    pub fn comparator(&self) -> Option<&QuantityComparator> {
        self.comparator.as_ref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct QuantityBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    value: Option<Decimal>,
    comparator: Option<QuantityComparator>,
    unit: Option<String>,
    system: Option<Uri>,
    code: Option<Code>,
    skip_validation: bool,
}

impl QuantityBuilder {
    element_builder_methods!();

    pub fn value(mut self, value: impl Into<Decimal>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn comparator(mut self, comparator: QuantityComparator) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn system(mut self, system: Uri) -> Self {
        self.system = Some(system);
        self
    }

    pub fn code(mut self, code: Code) -> Self {
        self.code = Some(code);
        self
    }

    pub fn build(self) -> Result<Quantity> {
        let quantity = Quantity {
            id: self.id,
            extension: self.extension,
            value: self.value,
            comparator: self.comparator,
            unit: self.unit,
            system: self.system,
            code: self.code,
        };
        if !self.skip_validation {
            quantity.validate()?;
        }
        Ok(quantity)
    }
}

impl Visitable for Quantity {
    fn type_name(&self) -> &'static str {
        "Quantity"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self)
            || self.value.is_some()
            || self.comparator.is_some()
            || self.unit.is_some()
            || self.system.is_some()
            || self.code.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            accept_optional(self.value.as_ref(), "value", visitor);
            accept_optional(self.comparator.as_ref(), "comparator", visitor);
            accept_optional(self.unit.as_ref(), "unit", visitor);
            accept_optional(self.system.as_ref(), "system", visitor);
            accept_optional(self.code.as_ref(), "code", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_optional_string(self.unit.as_deref(), "unit")?;
        validation::require_value_or_children(self.has_children(), "Quantity")
    }
}

/// An amount of economic utility in some recognized currency
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Decimal>,

    /// ISO 4217 Currency Code
    #[serde(skip_serializing_if = "Option::is_none")]
    currency: Option<Code>,
}

impl Money {
    pub fn builder() -> MoneyBuilder {
        MoneyBuilder::default()
    }

    pub fn to_builder(&self) -> MoneyBuilder {
        MoneyBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            value: self.value,
            currency: self.currency.clone(),
            skip_validation: false,
        }
    }

    element_getters!();

    pub fn value(&self) -> Option<&Decimal> {
        self.value.as_ref()
    }

    pub fn currency(&self) -> Option<&Code> {
        self.currency.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct MoneyBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    value: Option<Decimal>,
    currency: Option<Code>,
    skip_validation: bool,
}

impl MoneyBuilder {
    element_builder_methods!();

    pub fn value(mut self, value: impl Into<Decimal>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn currency(mut self, currency: Code) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn build(self) -> Result<Money> {
        let money = Money {
            id: self.id,
            extension: self.extension,
            value: self.value,
            currency: self.currency,
        };
        if !self.skip_validation {
            money.validate()?;
        }
        Ok(money)
    }
}

impl Visitable for Money {
    fn type_name(&self) -> &'static str {
        "Money"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self) || self.value.is_some() || self.currency.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            accept_optional(self.value.as_ref(), "value", visitor);
            accept_optional(self.currency.as_ref(), "currency", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::require_value_or_children(self.has_children(), "Money")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_quantity_decimal_on_the_wire() {
        let quantity: Quantity = serde_json::from_value(json!({
            "value": 2.5,
            "unit": "mL",
            "system": "http://unitsofmeasure.org",
            "code": "mL"
        }))
        .unwrap();
        assert_eq!(quantity.value(), Some(&Decimal::from_str("2.5").unwrap()));
        assert_eq!(serde_json::to_value(&quantity).unwrap()["value"], json!(2.5));
    }

    #[test]
    fn test_decimal_precision_survives() {
        let json = r#"{"value":12345678901234567.89,"currency":"EUR"}"#;
        let money: Money = serde_json::from_str(json).unwrap();
        assert_eq!(money.value(), Some(&Decimal::from_str("12345678901234567.89").unwrap()));
        assert_eq!(serde_json::to_string(&money).unwrap(), json);

        let quantity: Quantity = serde_json::from_str(r#"{"value":1.50,"unit":"mg"}"#).unwrap();
        assert_eq!(quantity.value().map(Decimal::scale), Some(2));
        assert_eq!(serde_json::to_string(&quantity).unwrap(), r#"{"value":1.50,"unit":"mg"}"#);
    }

    #[test]
    fn test_simple_quantity_comparator() {
        let quantity = Quantity::builder()
            .value(5)
            .comparator(QuantityComparator::LessThan)
            .build()
            .unwrap();
        assert!(matches!(
            validation::check_simple_quantity(Some(&quantity), "quantity"),
            Err(Error::SimpleQuantityComparator("quantity"))
        ));
    }

    #[test]
    fn test_equal_values_hash_alike() {
        use std::collections::HashSet;
        let a = Money::builder().value(10).currency(Code::new("EUR").unwrap()).build().unwrap();
        let b = a.to_builder().build().unwrap();
        let set: HashSet<Money> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
