//! ImagingSelection: a selection of DICOM SOP instances and/or frames

use super::DomainResource;
use crate::error::{Error, Result};
use crate::r5::codes::{
    ImagingSelection2DGraphicType, ImagingSelection3DGraphicType, ImagingSelectionStatus,
};
use crate::r5::datatypes::{CodeableConcept, CodeableReference, Coding, Extension, Identifier, Reference};
use crate::r5::primitives::{Id, Instant, UnsignedInt};
use crate::r5::validation;
use crate::r5::visitor::{accept_list, accept_optional, walk, Visitable, Visitor};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A selection of DICOM SOP instances and/or frames within a single study and series
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagingSelection {
    #[serde(flatten)]
    base: DomainResource,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    identifier: Vec<Identifier>,

    /// available | entered-in-error | unknown
    status: ImagingSelectionStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<Reference>,

    /// Date / Time when this imaging selection was created
    #[serde(skip_serializing_if = "Option::is_none")]
    issued: Option<Instant>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    performer: Vec<ImagingSelectionPerformer>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    based_on: Vec<Reference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    category: Vec<CodeableConcept>,

    /// Imaging Selection purpose text or code
    code: CodeableConcept,

    /// DICOM Study Instance UID
    #[serde(skip_serializing_if = "Option::is_none")]
    study_uid: Option<Id>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    derived_from: Vec<Reference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    endpoint: Vec<Reference>,

    /// DICOM Series Instance UID
    #[serde(skip_serializing_if = "Option::is_none")]
    series_uid: Option<Id>,

    #[serde(skip_serializing_if = "Option::is_none")]
    series_number: Option<UnsignedInt>,

    /// The Frame of Reference UID for the selected images
    #[serde(skip_serializing_if = "Option::is_none")]
    frame_of_reference_uid: Option<Id>,

    #[serde(skip_serializing_if = "Option::is_none")]
    body_site: Option<CodeableReference>,

    /// Related resources that are the focus of the selection
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    focus: Vec<Reference>,

    /// The selected instances
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    instance: Vec<ImagingSelectionInstance>,
}

impl ImagingSelection {
    pub fn builder() -> ImagingSelectionBuilder {
        ImagingSelectionBuilder::default()
    }

    pub fn to_builder(&self) -> ImagingSelectionBuilder {
        ImagingSelectionBuilder {
            base: self.base.clone(),
            identifier: self.identifier.clone(),
            status: Some(self.status),
            subject: self.subject.clone(),
            issued: self.issued.clone(),
            performer: self.performer.clone(),
            based_on: self.based_on.clone(),
            category: self.category.clone(),
            code: Some(self.code.clone()),
            study_uid: self.study_uid.clone(),
            derived_from: self.derived_from.clone(),
            endpoint: self.endpoint.clone(),
            series_uid: self.series_uid.clone(),
            series_number: self.series_number,
            frame_of_reference_uid: self.frame_of_reference_uid.clone(),
            body_site: self.body_site.clone(),
            focus: self.focus.clone(),
            instance: self.instance.clone(),
            skip_validation: false,
        }
    }

    domain_resource_getters!();

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    pub fn status(&self) -> &ImagingSelectionStatus {
        &self.status
    }

    pub fn subject(&self) -> Option<&Reference> {
        self.subject.as_ref()
    }

    pub fn issued(&self) -> Option<&Instant> {
        self.issued.as_ref()
    }

    pub fn performer(&self) -> &[ImagingSelectionPerformer] {
        &self.performer
    }

    pub fn based_on(&self) -> &[Reference] {
        &self.based_on
    }

    pub fn category(&self) -> &[CodeableConcept] {
        &self.category
    }

    pub fn code(&self) -> &CodeableConcept {
        &self.code
    }

    pub fn study_uid(&self) -> Option<&Id> {
        self.study_uid.as_ref()
    }

    pub fn derived_from(&self) -> &[Reference] {
        &self.derived_from
    }

    pub fn endpoint(&self) -> &[Reference] {
        &self.endpoint
    }

    pub fn series_uid(&self) -> Option<&Id> {
        self.series_uid.as_ref()
    }

    pub fn series_number(&self) -> Option<&UnsignedInt> {
        self.series_number.as_ref()
    }

    pub fn frame_of_reference_uid(&self) -> Option<&Id> {
        self.frame_of_reference_uid.as_ref()
    }

    pub fn body_site(&self) -> Option<&CodeableReference> {
        self.body_site.as_ref()
    }

    pub fn focus(&self) -> &[Reference] {
        &self.focus
    }

    pub fn instance(&self) -> &[ImagingSelectionInstance] {
        &self.instance
    }
}

#[derive(Debug, Default)]
pub struct ImagingSelectionBuilder {
    base: DomainResource,
    identifier: Vec<Identifier>,
    status: Option<ImagingSelectionStatus>,
    subject: Option<Reference>,
    issued: Option<Instant>,
    performer: Vec<ImagingSelectionPerformer>,
    based_on: Vec<Reference>,
    category: Vec<CodeableConcept>,
    code: Option<CodeableConcept>,
    study_uid: Option<Id>,
    derived_from: Vec<Reference>,
    endpoint: Vec<Reference>,
    series_uid: Option<Id>,
    series_number: Option<UnsignedInt>,
    frame_of_reference_uid: Option<Id>,
    body_site: Option<CodeableReference>,
    focus: Vec<Reference>,
    instance: Vec<ImagingSelectionInstance>,
    skip_validation: bool,
}

impl ImagingSelectionBuilder {
    domain_resource_builder_methods!();

    pub fn identifier(mut self, identifier: Identifier) -> Self {
        self.identifier.push(identifier);
        self
    }

    pub fn set_identifier(mut self, identifier: impl IntoIterator<Item = Identifier>) -> Self {
        self.identifier = identifier.into_iter().collect();
        self
    }

    pub fn status(mut self, status: ImagingSelectionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn subject(mut self, subject: Reference) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn issued(mut self, issued: Instant) -> Self {
        self.issued = Some(issued);
        self
    }

    pub fn performer(mut self, performer: ImagingSelectionPerformer) -> Self {
        self.performer.push(performer);
        self
    }

    pub fn set_performer(
        mut self,
        performer: impl IntoIterator<Item = ImagingSelectionPerformer>,
    ) -> Self {
        self.performer = performer.into_iter().collect();
        self
    }

    pub fn based_on(mut self, based_on: Reference) -> Self {
        self.based_on.push(based_on);
        self
    }

    pub fn set_based_on(mut self, based_on: impl IntoIterator<Item = Reference>) -> Self {
        self.based_on = based_on.into_iter().collect();
        self
    }

    pub fn category(mut self, category: CodeableConcept) -> Self {
        self.category.push(category);
        self
    }

    pub fn set_category(mut self, category: impl IntoIterator<Item = CodeableConcept>) -> Self {
        self.category = category.into_iter().collect();
        self
    }

    pub fn code(mut self, code: CodeableConcept) -> Self {
        self.code = Some(code);
        self
    }

    pub fn study_uid(mut self, study_uid: Id) -> Self {
        self.study_uid = Some(study_uid);
        self
    }

    pub fn derived_from(mut self, derived_from: Reference) -> Self {
        self.derived_from.push(derived_from);
        self
    }

    pub fn set_derived_from(mut self, derived_from: impl IntoIterator<Item = Reference>) -> Self {
        self.derived_from = derived_from.into_iter().collect();
        self
    }

    pub fn endpoint(mut self, endpoint: Reference) -> Self {
        self.endpoint.push(endpoint);
        self
    }

    pub fn set_endpoint(mut self, endpoint: impl IntoIterator<Item = Reference>) -> Self {
        self.endpoint = endpoint.into_iter().collect();
        self
    }

    pub fn series_uid(mut self, series_uid: Id) -> Self {
        self.series_uid = Some(series_uid);
        self
    }

    pub fn series_number(mut self, series_number: UnsignedInt) -> Self {
        self.series_number = Some(series_number);
        self
    }

    pub fn frame_of_reference_uid(mut self, frame_of_reference_uid: Id) -> Self {
        self.frame_of_reference_uid = Some(frame_of_reference_uid);
        self
    }

    pub fn body_site(mut self, body_site: CodeableReference) -> Self {
        self.body_site = Some(body_site);
        self
    }

    pub fn focus(mut self, focus: Reference) -> Self {
        self.focus.push(focus);
        self
    }

    pub fn set_focus(mut self, focus: impl IntoIterator<Item = Reference>) -> Self {
        self.focus = focus.into_iter().collect();
        self
    }

    pub fn instance(mut self, instance: ImagingSelectionInstance) -> Self {
        self.instance.push(instance);
        self
    }

    pub fn set_instance(
        mut self,
        instance: impl IntoIterator<Item = ImagingSelectionInstance>,
    ) -> Self {
        self.instance = instance.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<ImagingSelection> {
        let selection = ImagingSelection {
            base: self.base,
            identifier: self.identifier,
            status: self.status.ok_or(Error::MissingElement("status"))?,
            subject: self.subject,
            issued: self.issued,
            performer: self.performer,
            based_on: self.based_on,
            category: self.category,
            code: self.code.ok_or(Error::MissingElement("code"))?,
            study_uid: self.study_uid,
            derived_from: self.derived_from,
            endpoint: self.endpoint,
            series_uid: self.series_uid,
            series_number: self.series_number,
            frame_of_reference_uid: self.frame_of_reference_uid,
            body_site: self.body_site,
            focus: self.focus,
            instance: self.instance,
        };
        if !self.skip_validation {
            selection.validate()?;
        }
        Ok(selection)
    }
}

impl Visitable for ImagingSelection {
    fn type_name(&self) -> &'static str {
        "ImagingSelection"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            self.base.accept_children(visitor);
            accept_list(&self.identifier, "identifier", visitor);
            self.status.accept("status", None, visitor);
            accept_optional(self.subject.as_ref(), "subject", visitor);
            accept_optional(self.issued.as_ref(), "issued", visitor);
            accept_list(&self.performer, "performer", visitor);
            accept_list(&self.based_on, "basedOn", visitor);
            accept_list(&self.category, "category", visitor);
            self.code.accept("code", None, visitor);
            accept_optional(self.study_uid.as_ref(), "studyUid", visitor);
            accept_list(&self.derived_from, "derivedFrom", visitor);
            accept_list(&self.endpoint, "endpoint", visitor);
            accept_optional(self.series_uid.as_ref(), "seriesUid", visitor);
            accept_optional(self.series_number.as_ref(), "seriesNumber", visitor);
            accept_optional(self.frame_of_reference_uid.as_ref(), "frameOfReferenceUid", visitor);
            accept_optional(self.body_site.as_ref(), "bodySite", visitor);
            accept_list(&self.focus, "focus", visitor);
            accept_list(&self.instance, "instance", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_reference_type(
            self.subject.as_ref(),
            "subject",
            &[
                "Patient",
                "Group",
                "Device",
                "Location",
                "Organization",
                "Procedure",
                "Practitioner",
                "Medication",
                "Substance",
                "Specimen",
            ],
        )?;
        validation::check_reference_types(
            &self.based_on,
            "basedOn",
            &["CarePlan", "ServiceRequest", "Appointment", "AppointmentResponse", "Task"],
        )?;
        validation::check_reference_types(
            &self.derived_from,
            "derivedFrom",
            &["ImagingStudy", "DocumentReference"],
        )?;
        validation::check_reference_types(&self.endpoint, "endpoint", &["Endpoint"])?;
        validation::check_codeable_reference_type(
            self.body_site.as_ref(),
            "bodySite",
            &["BodyStructure"],
        )?;
        validation::check_reference_types(&self.focus, "focus", &["ImagingSelection"])
    }
}

/// Selector of the instances (human or machine)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagingSelectionPerformer {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// Type of performer
    #[serde(skip_serializing_if = "Option::is_none")]
    function: Option<CodeableConcept>,

    /// Author (human or machine)
    #[serde(skip_serializing_if = "Option::is_none")]
    actor: Option<Reference>,
}

impl ImagingSelectionPerformer {
    pub fn builder() -> ImagingSelectionPerformerBuilder {
        ImagingSelectionPerformerBuilder::default()
    }

    pub fn to_builder(&self) -> ImagingSelectionPerformerBuilder {
        ImagingSelectionPerformerBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            function: self.function.clone(),
            actor: self.actor.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn function(&self) -> Option<&CodeableConcept> {
        self.function.as_ref()
    }

    pub fn actor(&self) -> Option<&Reference> {
        self.actor.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct ImagingSelectionPerformerBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    function: Option<CodeableConcept>,
    actor: Option<Reference>,
    skip_validation: bool,
}

impl ImagingSelectionPerformerBuilder {
    backbone_builder_methods!();

    pub fn function(mut self, function: CodeableConcept) -> Self {
        self.function = Some(function);
        self
    }

    pub fn actor(mut self, actor: Reference) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn build(self) -> Result<ImagingSelectionPerformer> {
        let performer = ImagingSelectionPerformer {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            function: self.function,
            actor: self.actor,
        };
        if !self.skip_validation {
            performer.validate()?;
        }
        Ok(performer)
    }
}

impl Visitable for ImagingSelectionPerformer {
    fn type_name(&self) -> &'static str {
        "ImagingSelection.performer"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self, backbone) || self.function.is_some() || self.actor.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            accept_optional(self.function.as_ref(), "function", visitor);
            accept_optional(self.actor.as_ref(), "actor", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_reference_type(
            self.actor.as_ref(),
            "actor",
            &[
                "Practitioner",
                "PractitionerRole",
                "Device",
                "Organization",
                "CareTeam",
                "Patient",
                "RelatedPerson",
                "HealthcareService",
            ],
        )?;
        validation::require_value_or_children(self.has_children(), "ImagingSelection.performer")
    }
}

/// A selected SOP instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagingSelectionInstance {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// DICOM SOP Instance UID
    uid: Id,

    /// DICOM Instance Number
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<UnsignedInt>,

    /// DICOM SOP Class UID
    #[serde(skip_serializing_if = "Option::is_none")]
    sop_class: Option<Coding>,

    /// The selected subset of the SOP Instance
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    subset: Vec<String>,

    #[serde(rename = "imageRegion2D", default, skip_serializing_if = "Vec::is_empty")]
    image_region_2d: Vec<ImagingSelectionImageRegion2D>,

    #[serde(rename = "imageRegion3D", default, skip_serializing_if = "Vec::is_empty")]
    image_region_3d: Vec<ImagingSelectionImageRegion3D>,
}

impl ImagingSelectionInstance {
    pub fn builder() -> ImagingSelectionInstanceBuilder {
        ImagingSelectionInstanceBuilder::default()
    }

    pub fn to_builder(&self) -> ImagingSelectionInstanceBuilder {
        ImagingSelectionInstanceBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            uid: Some(self.uid.clone()),
            number: self.number,
            sop_class: self.sop_class.clone(),
            subset: self.subset.clone(),
            image_region_2d: self.image_region_2d.clone(),
            image_region_3d: self.image_region_3d.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn uid(&self) -> &Id {
        &self.uid
    }

    pub fn number(&self) -> Option<&UnsignedInt> {
        self.number.as_ref()
    }

    pub fn sop_class(&self) -> Option<&Coding> {
        self.sop_class.as_ref()
    }

    pub fn subset(&self) -> &[String] {
        &self.subset
    }

    pub fn image_region_2d(&self) -> &[ImagingSelectionImageRegion2D] {
        &self.image_region_2d
    }

    pub fn image_region_3d(&self) -> &[ImagingSelectionImageRegion3D] {
        &self.image_region_3d
    }
}

#[derive(Debug, Default)]
pub struct ImagingSelectionInstanceBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    uid: Option<Id>,
    number: Option<UnsignedInt>,
    sop_class: Option<Coding>,
    subset: Vec<String>,
    image_region_2d: Vec<ImagingSelectionImageRegion2D>,
    image_region_3d: Vec<ImagingSelectionImageRegion3D>,
    skip_validation: bool,
}

impl ImagingSelectionInstanceBuilder {
    backbone_builder_methods!();

    pub fn uid(mut self, uid: Id) -> Self {
        self.uid = Some(uid);
        self
    }

    pub fn number(mut self, number: UnsignedInt) -> Self {
        self.number = Some(number);
        self
    }

    pub fn sop_class(mut self, sop_class: Coding) -> Self {
        self.sop_class = Some(sop_class);
        self
    }

    pub fn subset(mut self, subset: impl Into<String>) -> Self {
        self.subset.push(subset.into());
        self
    }

    pub fn set_subset<S: Into<String>>(mut self, subset: impl IntoIterator<Item = S>) -> Self {
        self.subset = subset.into_iter().map(Into::into).collect();
        self
    }

    pub fn image_region_2d(mut self, region: ImagingSelectionImageRegion2D) -> Self {
        self.image_region_2d.push(region);
        self
    }

    pub fn set_image_region_2d(
        mut self,
        regions: impl IntoIterator<Item = ImagingSelectionImageRegion2D>,
    ) -> Self {
        self.image_region_2d = regions.into_iter().collect();
        self
    }

    pub fn image_region_3d(mut self, region: ImagingSelectionImageRegion3D) -> Self {
        self.image_region_3d.push(region);
        self
    }

    pub fn set_image_region_3d(
        mut self,
        regions: impl IntoIterator<Item = ImagingSelectionImageRegion3D>,
    ) -> Self {
        self.image_region_3d = regions.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<ImagingSelectionInstance> {
        let instance = ImagingSelectionInstance {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            uid: self.uid.ok_or(Error::MissingElement("uid"))?,
            number: self.number,
            sop_class: self.sop_class,
            subset: self.subset,
            image_region_2d: self.image_region_2d,
            image_region_3d: self.image_region_3d,
        };
        if !self.skip_validation {
            instance.validate()?;
        }
        Ok(instance)
    }
}

impl Visitable for ImagingSelectionInstance {
    fn type_name(&self) -> &'static str {
        "ImagingSelection.instance"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            self.uid.accept("uid", None, visitor);
            accept_optional(self.number.as_ref(), "number", visitor);
            accept_optional(self.sop_class.as_ref(), "sopClass", visitor);
            accept_list(&self.subset, "subset", visitor);
            accept_list(&self.image_region_2d, "imageRegion2D", visitor);
            accept_list(&self.image_region_3d, "imageRegion3D", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_strings(&self.subset, "subset")
    }
}

/// Declares an image region backbone element; 2D and 3D differ only in their graphic type
macro_rules! image_region {
    (
        $(#[$meta:meta])*
        $name:ident, $builder:ident, $graphic_type:ty, $path:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            #[serde(skip_serializing_if = "Option::is_none")]
            id: Option<String>,

            #[serde(default, skip_serializing_if = "Vec::is_empty")]
            extension: Vec<Extension>,

            #[serde(default, skip_serializing_if = "Vec::is_empty")]
            modifier_extension: Vec<Extension>,

            region_type: $graphic_type,

            /// Flattened list of coordinate values
            #[serde(default)]
            coordinate: Vec<Decimal>,
        }

        impl $name {
            pub fn builder() -> $builder {
                $builder::default()
            }

            pub fn to_builder(&self) -> $builder {
                $builder {
                    id: self.id.clone(),
                    extension: self.extension.clone(),
                    modifier_extension: self.modifier_extension.clone(),
                    region_type: Some(self.region_type),
                    coordinate: self.coordinate.clone(),
                    skip_validation: false,
                }
            }

            backbone_getters!();

            pub fn region_type(&self) -> &$graphic_type {
                &self.region_type
            }

            pub fn coordinate(&self) -> &[Decimal] {
                &self.coordinate
            }
        }

        #[derive(Debug, Default)]
        pub struct $builder {
            id: Option<String>,
            extension: Vec<Extension>,
            modifier_extension: Vec<Extension>,
            region_type: Option<$graphic_type>,
            coordinate: Vec<Decimal>,
            skip_validation: bool,
        }

        impl $builder {
            backbone_builder_methods!();

            pub fn region_type(mut self, region_type: $graphic_type) -> Self {
                self.region_type = Some(region_type);
                self
            }

            /// Adds one coordinate value
            pub fn coordinate(mut self, coordinate: impl Into<Decimal>) -> Self {
                self.coordinate.push(coordinate.into());
                self
            }

            pub fn set_coordinate(mut self, coordinate: impl IntoIterator<Item = Decimal>) -> Self {
                self.coordinate = coordinate.into_iter().collect();
                self
            }

            pub fn build(self) -> Result<$name> {
                let region = $name {
                    id: self.id,
                    extension: self.extension,
                    modifier_extension: self.modifier_extension,
                    region_type: self.region_type.ok_or(Error::MissingElement("regionType"))?,
                    coordinate: self.coordinate,
                };
                if !self.skip_validation {
                    region.validate()?;
                }
                Ok(region)
            }
        }

        impl Visitable for $name {
            fn type_name(&self) -> &'static str {
                $path
            }

            fn has_children(&self) -> bool {
                true
            }

            fn accept(
                &self,
                element_name: &str,
                element_index: Option<usize>,
                visitor: &mut dyn Visitor,
            ) {
                walk(self, element_name, element_index, visitor, |visitor| {
                    accept_element_children!(self, visitor, backbone);
                    self.region_type.accept("regionType", None, visitor);
                    accept_list(&self.coordinate, "coordinate", visitor);
                });
            }

            fn validate(&self) -> Result<()> {
                validation::check_optional_string(self.id.as_deref(), "id")?;
                validation::require_non_empty(&self.coordinate, "coordinate")
            }
        }
    };
}

image_region!(
    /// A specific 2D region in a DICOM image / frame
    ImagingSelectionImageRegion2D,
    ImagingSelectionImageRegion2DBuilder,
    ImagingSelection2DGraphicType,
    "ImagingSelection.instance.imageRegion2D"
);

image_region!(
    /// A specific 3D region in a DICOM frame of reference
    ImagingSelectionImageRegion3D,
    ImagingSelectionImageRegion3DBuilder,
    ImagingSelection3DGraphicType,
    "ImagingSelection.instance.imageRegion3D"
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn concept(text: &str) -> CodeableConcept {
        CodeableConcept::builder().text(text).build().unwrap()
    }

    fn uid(value: &str) -> Id {
        Id::new(value).unwrap()
    }

    #[test]
    fn test_required_elements() {
        let err = ImagingSelection::builder().code(concept("key images")).build().unwrap_err();
        assert!(matches!(err, Error::MissingElement("status")));

        let err = ImagingSelection::builder()
            .status(ImagingSelectionStatus::Available)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingElement("code")));
    }

    #[test]
    fn test_region_requires_coordinates() {
        let err = ImagingSelectionImageRegion2D::builder()
            .region_type(ImagingSelection2DGraphicType::Point)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::EmptyList("coordinate")));

        let err = ImagingSelectionImageRegion3D::builder().coordinate(1).build().unwrap_err();
        assert!(matches!(err, Error::MissingElement("regionType")));
    }

    #[test]
    fn test_instance_json() {
        let region = ImagingSelectionImageRegion2D::builder()
            .region_type(ImagingSelection2DGraphicType::Circle)
            .set_coordinate([Decimal::new(100, 0), Decimal::new(1005, 1), Decimal::new(110, 0)])
            .coordinate(100)
            .build()
            .unwrap();
        let instance = ImagingSelectionInstance::builder()
            .uid(uid("1.2.840.113747.20080222.83341314456631405221.1"))
            .number(UnsignedInt::new(1).unwrap())
            .image_region_2d(region)
            .build()
            .unwrap();
        let selection = ImagingSelection::builder()
            .status(ImagingSelectionStatus::Available)
            .code(concept("region of interest"))
            .series_uid(uid("1.2.840.113747.20080222.83341314456631405221"))
            .instance(instance)
            .build()
            .unwrap();

        let value = serde_json::to_value(&selection).unwrap();
        let instance = &value["instance"][0];
        assert_eq!(instance["number"], 1);
        assert_eq!(instance["imageRegion2D"][0]["regionType"], "circle");
        assert_eq!(instance["imageRegion2D"][0]["coordinate"], json!([100, 100.5, 110, 100]));
        assert!(instance.get("imageRegion3D").is_none());
        assert_eq!(value["seriesUid"], "1.2.840.113747.20080222.83341314456631405221");

        let parsed: ImagingSelection = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, selection);
    }

    #[test]
    fn test_performer_actor_and_focus() {
        let err = ImagingSelectionPerformer::builder()
            .actor(Reference::builder().reference("Specimen/s1").build().unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceType { element: "actor", .. }));

        let err = ImagingSelection::builder()
            .status(ImagingSelectionStatus::Available)
            .code(concept("key images"))
            .focus(Reference::builder().reference("ImagingStudy/st1").build().unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceType { element: "focus", .. }));
    }

    #[test]
    fn test_empty_performer_violates_ele1() {
        let err = ImagingSelectionPerformer::builder().build().unwrap_err();
        assert!(matches!(err, Error::NoValueOrChildren("ImagingSelection.performer")));
    }
}
