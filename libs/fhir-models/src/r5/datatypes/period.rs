use super::Extension;
use crate::error::Result;
use crate::r5::primitives::DateTime;
use crate::r5::validation;
use crate::r5::visitor::{accept_optional, walk, Visitable, Visitor};
use serde::{Deserialize, Serialize};

/// Time range defined by start and end date/time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<DateTime>,

    /// End time with inclusive boundary, if not ongoing
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<DateTime>,
}

impl Period {
    pub fn builder() -> PeriodBuilder {
        PeriodBuilder::default()
    }

    pub fn to_builder(&self) -> PeriodBuilder {
        PeriodBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            skip_validation: false,
        }
    }

    element_getters!();

    pub fn start(&self) -> Option<&DateTime> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&DateTime> {
        self.end.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct PeriodBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    start: Option<DateTime>,
    end: Option<DateTime>,
    skip_validation: bool,
}

impl PeriodBuilder {
    element_builder_methods!();

    pub fn start(mut self, start: DateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn build(self) -> Result<Period> {
        let period = Period {
            id: self.id,
            extension: self.extension,
            start: self.start,
            end: self.end,
        };
        if !self.skip_validation {
            period.validate()?;
        }
        Ok(period)
    }
}

impl Visitable for Period {
    fn type_name(&self) -> &'static str {
        "Period"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self) || self.start.is_some() || self.end.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            accept_optional(self.start.as_ref(), "start", visitor);
            accept_optional(self.end.as_ref(), "end", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::require_value_or_children(self.has_children(), "Period")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_bounds_are_not_ordered() {
        // per-1 is a FHIRPath invariant and is not evaluated
        let period = Period::builder()
            .start(DateTime::new("2024-02-01").unwrap())
            .end(DateTime::new("2024-01-01").unwrap())
            .build();
        assert!(period.is_ok());
    }

    #[test]
    fn test_period_json() {
        let period: Period = serde_json::from_str(r#"{"start": "2023-05"}"#).unwrap();
        assert_eq!(period.start().map(DateTime::as_str), Some("2023-05"));
        assert!(period.end().is_none());
    }
}
