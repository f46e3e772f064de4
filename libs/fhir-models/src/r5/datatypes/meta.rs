use super::{Coding, Extension};
use crate::error::Result;
use crate::r5::primitives::{Canonical, Id, Instant, Uri};
use crate::r5::validation;
use crate::r5::visitor::{accept_list, accept_optional, walk, Visitable, Visitor};
use serde::{Deserialize, Serialize};

/// Metadata about a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    version_id: Option<Id>,

    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<Instant>,

    /// Identifies where the resource comes from
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<Uri>,

    /// Profiles this resource claims to conform to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    profile: Vec<Canonical>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    security: Vec<Coding>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tag: Vec<Coding>,
}

impl Meta {
    pub fn builder() -> MetaBuilder {
        MetaBuilder::default()
    }

    pub fn to_builder(&self) -> MetaBuilder {
        MetaBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            version_id: self.version_id.clone(),
            last_updated: self.last_updated.clone(),
            source: self.source.clone(),
            profile: self.profile.clone(),
            security: self.security.clone(),
            tag: self.tag.clone(),
            skip_validation: false,
        }
    }

    element_getters!();

    pub fn version_id(&self) -> Option<&Id> {
        self.version_id.as_ref()
    }

    pub fn last_updated(&self) -> Option<&Instant> {
        self.last_updated.as_ref()
    }

    pub fn source(&self) -> Option<&Uri> {
        self.source.as_ref()
    }

    pub fn profile(&self) -> &[Canonical] {
        &self.profile
    }

    pub fn security(&self) -> &[Coding] {
        &self.security
    }

    pub fn tag(&self) -> &[Coding] {
        &self.tag
    }
}

#[derive(Debug, Default)]
pub struct MetaBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    version_id: Option<Id>,
    last_updated: Option<Instant>,
    source: Option<Uri>,
    profile: Vec<Canonical>,
    security: Vec<Coding>,
    tag: Vec<Coding>,
    skip_validation: bool,
}

impl MetaBuilder {
    element_builder_methods!();

    pub fn version_id(mut self, version_id: Id) -> Self {
        self.version_id = Some(version_id);
        self
    }

    pub fn last_updated(mut self, last_updated: Instant) -> Self {
        self.last_updated = Some(last_updated);
        self
    }

    pub fn source(mut self, source: Uri) -> Self {
        self.source = Some(source);
        self
    }

    pub fn profile(mut self, profile: Canonical) -> Self {
        self.profile.push(profile);
        self
    }

    pub fn set_profile(mut self, profile: impl IntoIterator<Item = Canonical>) -> Self {
        self.profile = profile.into_iter().collect();
        self
    }

    pub fn security(mut self, security: Coding) -> Self {
        self.security.push(security);
        self
    }

    pub fn set_security(mut self, security: impl IntoIterator<Item = Coding>) -> Self {
        self.security = security.into_iter().collect();
        self
    }

    pub fn tag(mut self, tag: Coding) -> Self {
        self.tag.push(tag);
        self
    }

    pub fn set_tag(mut self, tag: impl IntoIterator<Item = Coding>) -> Self {
        self.tag = tag.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<Meta> {
        let meta = Meta {
            id: self.id,
            extension: self.extension,
            version_id: self.version_id,
            last_updated: self.last_updated,
            source: self.source,
            profile: self.profile,
            security: self.security,
            tag: self.tag,
        };
        if !self.skip_validation {
            meta.validate()?;
        }
        Ok(meta)
    }
}

impl Visitable for Meta {
    fn type_name(&self) -> &'static str {
        "Meta"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self)
            || self.version_id.is_some()
            || self.last_updated.is_some()
            || self.source.is_some()
            || !self.profile.is_empty()
            || !self.security.is_empty()
            || !self.tag.is_empty()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            accept_optional(self.version_id.as_ref(), "versionId", visitor);
            accept_optional(self.last_updated.as_ref(), "lastUpdated", visitor);
            accept_optional(self.source.as_ref(), "source", visitor);
            accept_list(&self.profile, "profile", visitor);
            accept_list(&self.security, "security", visitor);
            accept_list(&self.tag, "tag", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::require_value_or_children(self.has_children(), "Meta")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meta_json() {
        let meta: Meta = serde_json::from_value(json!({
            "versionId": "3",
            "lastUpdated": "2024-03-01T10:00:00Z",
            "profile": ["http://example.org/fhir/StructureDefinition/my-specimen"]
        }))
        .unwrap();
        assert_eq!(meta.version_id().map(Id::as_str), Some("3"));
        assert_eq!(meta.profile().len(), 1);
        assert!(meta.last_updated().is_some());
    }

    #[test]
    fn test_invalid_last_updated_rejected() {
        let result: serde_json::Result<Meta> =
            serde_json::from_value(json!({"lastUpdated": "2024-03-01"}));
        assert!(result.is_err());
    }
}
