//! FHIR R5 resources
//!
//! Each resource flattens a [`DomainResource`] holding the elements every domain
//! resource shares, followed by its own elements in definition order.

mod coverage;
mod imaging_selection;
mod permission;
mod specimen;

pub use coverage::*;
pub use imaging_selection::*;
pub use permission::*;
pub use specimen::*;

use super::datatypes::{Extension, Meta, Narrative};
use super::primitives::{Code, Id, Uri};
use super::visitor::{accept_list, accept_optional, Visitable, Visitor};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Elements of `Resource` and `DomainResource`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<Id>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) meta: Option<Meta>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) implicit_rules: Option<Uri>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) language: Option<Code>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) text: Option<Narrative>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) contained: Vec<Resource>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) modifier_extension: Vec<Extension>,
}

impl DomainResource {
    pub(crate) fn has_children(&self) -> bool {
        self.id.is_some()
            || self.meta.is_some()
            || self.implicit_rules.is_some()
            || self.language.is_some()
            || self.text.is_some()
            || !self.contained.is_empty()
            || !self.extension.is_empty()
            || !self.modifier_extension.is_empty()
    }

    pub(crate) fn accept_children(&self, visitor: &mut dyn Visitor) {
        accept_optional(self.id.as_ref(), "id", visitor);
        accept_optional(self.meta.as_ref(), "meta", visitor);
        accept_optional(self.implicit_rules.as_ref(), "implicitRules", visitor);
        accept_optional(self.language.as_ref(), "language", visitor);
        accept_optional(self.text.as_ref(), "text", visitor);
        accept_list(&self.contained, "contained", visitor);
        accept_list(&self.extension, "extension", visitor);
        accept_list(&self.modifier_extension, "modifierExtension", visitor);
    }
}

/// Types of the resources modelled by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    Coverage,
    ImagingSelection,
    Permission,
    Specimen,
}

impl ResourceType {
    pub const ALL: &'static [ResourceType] = &[
        ResourceType::Coverage,
        ResourceType::ImagingSelection,
        ResourceType::Permission,
        ResourceType::Specimen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Coverage => "Coverage",
            ResourceType::ImagingSelection => "ImagingSelection",
            ResourceType::Permission => "Permission",
            ResourceType::Specimen => "Specimen",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ResourceType::ALL
            .iter()
            .copied()
            .find(|resource_type| resource_type.as_str() == s)
            .ok_or_else(|| Error::UnknownResourceType(s.to_string()))
    }
}

/// Any modelled resource, tagged by `resourceType` on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Coverage(Box<Coverage>),
    ImagingSelection(Box<ImagingSelection>),
    Permission(Box<Permission>),
    Specimen(Box<Specimen>),
}

impl Resource {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Resource::Coverage(_) => ResourceType::Coverage,
            Resource::ImagingSelection(_) => ResourceType::ImagingSelection,
            Resource::Permission(_) => ResourceType::Permission,
            Resource::Specimen(_) => ResourceType::Specimen,
        }
    }

    pub fn id(&self) -> Option<&Id> {
        match self {
            Resource::Coverage(resource) => resource.id(),
            Resource::ImagingSelection(resource) => resource.id(),
            Resource::Permission(resource) => resource.id(),
            Resource::Specimen(resource) => resource.id(),
        }
    }

    fn as_visitable(&self) -> &dyn Visitable {
        match self {
            Resource::Coverage(resource) => resource.as_ref(),
            Resource::ImagingSelection(resource) => resource.as_ref(),
            Resource::Permission(resource) => resource.as_ref(),
            Resource::Specimen(resource) => resource.as_ref(),
        }
    }
}

macro_rules! resource_conversions {
    ($($name:ident),+) => {
        $(
            impl From<$name> for Resource {
                fn from(resource: $name) -> Self {
                    Resource::$name(Box::new(resource))
                }
            }

            impl TryFrom<Resource> for $name {
                type Error = Error;

                fn try_from(resource: Resource) -> Result<Self> {
                    match resource {
                        Resource::$name(resource) => Ok(*resource),
                        other => Err(Error::UnexpectedResourceType {
                            expected: stringify!($name),
                            found: other.resource_type().as_str(),
                        }),
                    }
                }
            }
        )+
    };
}

resource_conversions!(Coverage, ImagingSelection, Permission, Specimen);

impl Visitable for Resource {
    fn type_name(&self) -> &'static str {
        self.as_visitable().type_name()
    }

    fn has_children(&self) -> bool {
        self.as_visitable().has_children()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        self.as_visitable().accept(element_name, element_index, visitor);
    }

    fn validate(&self) -> Result<()> {
        self.as_visitable().validate()
    }
}

/// JSON form of the resource, pretty-printed unless disabled in
/// [`ModelConfig`](crate::ModelConfig)
impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pretty = crate::ModelConfig::current().pretty_printing;
        let json = super::json::to_string(self, pretty).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_from_str() {
        assert_eq!("Specimen".parse::<ResourceType>().unwrap(), ResourceType::Specimen);
        assert!(matches!(
            "Patient".parse::<ResourceType>(),
            Err(Error::UnknownResourceType(name)) if name == "Patient"
        ));
    }
}
