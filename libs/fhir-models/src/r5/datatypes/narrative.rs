use super::Extension;
use crate::error::{Error, Result};
use crate::r5::codes::NarrativeStatus;
use crate::r5::validation;
use crate::r5::visitor::{walk, Visitable, Visitor};
use serde::{Deserialize, Serialize};

/// Human-readable summary of the resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    status: NarrativeStatus,

    /// Limited xhtml content
    div: String,
}

impl Narrative {
    pub fn builder() -> NarrativeBuilder {
        NarrativeBuilder::default()
    }

    pub fn to_builder(&self) -> NarrativeBuilder {
        NarrativeBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            status: Some(self.status),
            div: Some(self.div.clone()),
            skip_validation: false,
        }
    }

    element_getters!();

    pub fn status(&self) -> &NarrativeStatus {
        &self.status
    }

    pub fn div(&self) -> &str {
        &self.div
    }
}

#[derive(Debug, Default)]
pub struct NarrativeBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    status: Option<NarrativeStatus>,
    div: Option<String>,
    skip_validation: bool,
}

impl NarrativeBuilder {
    element_builder_methods!();

    pub fn status(mut self, status: NarrativeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn div(mut self, div: impl Into<String>) -> Self {
        self.div = Some(div.into());
        self
    }

    pub fn build(self) -> Result<Narrative> {
        let narrative = Narrative {
            id: self.id,
            extension: self.extension,
            status: self.status.ok_or(Error::MissingElement("status"))?,
            div: self.div.ok_or(Error::MissingElement("div"))?,
        };
        if !self.skip_validation {
            narrative.validate()?;
        }
        Ok(narrative)
    }
}

impl Visitable for Narrative {
    fn type_name(&self) -> &'static str {
        "Narrative"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            self.status.accept("status", None, visitor);
            self.div.accept("div", None, visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        let div = self.div.trim();
        if !div.starts_with("<div") || !(div.ends_with("</div>") || div.ends_with("/>")) {
            return Err(Error::InvalidNarrative("div must be a single xhtml <div> element"));
        }
        if div.len() > validation::MAX_STRING_LENGTH {
            return Err(Error::InvalidNarrative("div exceeds the maximum string length"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_must_be_xhtml_div() {
        let ok = Narrative::builder()
            .status(NarrativeStatus::Generated)
            .div(r#"<div xmlns="http://www.w3.org/1999/xhtml">Blood sample</div>"#)
            .build();
        assert!(ok.is_ok());

        let err = Narrative::builder()
            .status(NarrativeStatus::Generated)
            .div("<p>Blood sample</p>")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidNarrative(_)));
    }

    #[test]
    fn test_narrative_requires_status() {
        let err = Narrative::builder().div("<div/>").build().unwrap_err();
        assert!(matches!(err, Error::MissingElement("status")));
    }
}
