//! Specimen: a sample to be used for analysis

use super::DomainResource;
use crate::error::{Error, Result};
use crate::r5::codes::{SpecimenCombined, SpecimenStatus};
use crate::r5::datatypes::{
    Annotation, CodeableConcept, CodeableReference, Duration, Extension, Identifier, Period,
    Reference, SimpleQuantity,
};
use crate::r5::primitives::DateTime;
use crate::r5::validation;
use crate::r5::visitor::{accept_list, accept_optional, walk, Visitable, Visitor};
use serde::{Deserialize, Serialize};

/// A sample to be used for analysis
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specimen {
    #[serde(flatten)]
    base: DomainResource,

    /// External Identifier
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    identifier: Vec<Identifier>,

    /// Identifier assigned by the lab
    #[serde(skip_serializing_if = "Option::is_none")]
    accession_identifier: Option<Identifier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<SpecimenStatus>,

    /// Kind of material that forms the specimen
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<CodeableConcept>,

    /// Where the specimen came from
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<Reference>,

    /// The time when specimen is received by the testing laboratory
    #[serde(skip_serializing_if = "Option::is_none")]
    received_time: Option<DateTime>,

    /// Specimen from which this specimen originated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parent: Vec<Reference>,

    /// Why the specimen was collected
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    request: Vec<Reference>,

    /// grouped | pooled
    #[serde(skip_serializing_if = "Option::is_none")]
    combined: Option<SpecimenCombined>,

    /// The role the specimen serves
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    role: Vec<CodeableConcept>,

    /// The physical feature of a specimen
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    feature: Vec<SpecimenFeature>,

    #[serde(skip_serializing_if = "Option::is_none")]
    collection: Option<SpecimenCollection>,

    /// Processing and processing step details
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    processing: Vec<SpecimenProcessing>,

    /// Direct container of specimen (tube/slide, etc.)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    container: Vec<SpecimenContainer>,

    /// State of the specimen
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    condition: Vec<CodeableConcept>,

    /// Comments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    note: Vec<Annotation>,
}

impl Specimen {
    pub fn builder() -> SpecimenBuilder {
        SpecimenBuilder::default()
    }

    pub fn to_builder(&self) -> SpecimenBuilder {
        SpecimenBuilder {
            base: self.base.clone(),
            identifier: self.identifier.clone(),
            accession_identifier: self.accession_identifier.clone(),
            status: self.status,
            type_: self.type_.clone(),
            subject: self.subject.clone(),
            received_time: self.received_time.clone(),
            parent: self.parent.clone(),
            request: self.request.clone(),
            combined: self.combined,
            role: self.role.clone(),
            feature: self.feature.clone(),
            collection: self.collection.clone(),
            processing: self.processing.clone(),
            container: self.container.clone(),
            condition: self.condition.clone(),
            note: self.note.clone(),
            skip_validation: false,
        }
    }

    domain_resource_getters!();

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    pub fn accession_identifier(&self) -> Option<&Identifier> {
        self.accession_identifier.as_ref()
    }

    /// available | unavailable | unsatisfactory | entered-in-error
    pub fn status(&self) -> Option<&SpecimenStatus> {
        self.status.as_ref()
    }

    pub fn type_(&self) -> Option<&CodeableConcept> {
        self.type_.as_ref()
    }

    pub fn subject(&self) -> Option<&Reference> {
        self.subject.as_ref()
    }

    pub fn received_time(&self) -> Option<&DateTime> {
        self.received_time.as_ref()
    }

    pub fn parent(&self) -> &[Reference] {
        &self.parent
    }

    pub fn request(&self) -> &[Reference] {
        &self.request
    }

    pub fn combined(&self) -> Option<&SpecimenCombined> {
        self.combined.as_ref()
    }

    pub fn role(&self) -> &[CodeableConcept] {
        &self.role
    }

    pub fn feature(&self) -> &[SpecimenFeature] {
        &self.feature
    }

    /// Collection details
    pub fn collection(&self) -> Option<&SpecimenCollection> {
        self.collection.as_ref()
    }

    pub fn processing(&self) -> &[SpecimenProcessing] {
        &self.processing
    }

    pub fn container(&self) -> &[SpecimenContainer] {
        &self.container
    }

    pub fn condition(&self) -> &[CodeableConcept] {
        &self.condition
    }

    pub fn note(&self) -> &[Annotation] {
        &self.note
    }
}

#[derive(Debug, Default)]
pub struct SpecimenBuilder {
    base: DomainResource,
    identifier: Vec<Identifier>,
    accession_identifier: Option<Identifier>,
    status: Option<SpecimenStatus>,
    type_: Option<CodeableConcept>,
    subject: Option<Reference>,
    received_time: Option<DateTime>,
    parent: Vec<Reference>,
    request: Vec<Reference>,
    combined: Option<SpecimenCombined>,
    role: Vec<CodeableConcept>,
    feature: Vec<SpecimenFeature>,
    collection: Option<SpecimenCollection>,
    processing: Vec<SpecimenProcessing>,
    container: Vec<SpecimenContainer>,
    condition: Vec<CodeableConcept>,
    note: Vec<Annotation>,
    skip_validation: bool,
}

impl SpecimenBuilder {
    domain_resource_builder_methods!();

    pub fn identifier(mut self, identifier: Identifier) -> Self {
        self.identifier.push(identifier);
        self
    }

    pub fn set_identifier(mut self, identifier: impl IntoIterator<Item = Identifier>) -> Self {
        self.identifier = identifier.into_iter().collect();
        self
    }

    pub fn accession_identifier(mut self, accession_identifier: Identifier) -> Self {
        self.accession_identifier = Some(accession_identifier);
        self
    }

    pub fn status(mut self, status: SpecimenStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn type_(mut self, type_: CodeableConcept) -> Self {
        self.type_ = Some(type_);
        self
    }

    /// Allowed targets: Patient, Group, Device, BiologicallyDerivedProduct, Substance, Location
    pub fn subject(mut self, subject: Reference) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn received_time(mut self, received_time: DateTime) -> Self {
        self.received_time = Some(received_time);
        self
    }

    pub fn parent(mut self, parent: Reference) -> Self {
        self.parent.push(parent);
        self
    }

    pub fn set_parent(mut self, parent: impl IntoIterator<Item = Reference>) -> Self {
        self.parent = parent.into_iter().collect();
        self
    }

    pub fn request(mut self, request: Reference) -> Self {
        self.request.push(request);
        self
    }

    pub fn set_request(mut self, request: impl IntoIterator<Item = Reference>) -> Self {
        self.request = request.into_iter().collect();
        self
    }

    pub fn combined(mut self, combined: SpecimenCombined) -> Self {
        self.combined = Some(combined);
        self
    }

    pub fn role(mut self, role: CodeableConcept) -> Self {
        self.role.push(role);
        self
    }

    pub fn set_role(mut self, role: impl IntoIterator<Item = CodeableConcept>) -> Self {
        self.role = role.into_iter().collect();
        self
    }

    pub fn feature(mut self, feature: SpecimenFeature) -> Self {
        self.feature.push(feature);
        self
    }

    pub fn set_feature(mut self, feature: impl IntoIterator<Item = SpecimenFeature>) -> Self {
        self.feature = feature.into_iter().collect();
        self
    }

    pub fn collection(mut self, collection: SpecimenCollection) -> Self {
        self.collection = Some(collection);
        self
    }

    pub fn processing(mut self, processing: SpecimenProcessing) -> Self {
        self.processing.push(processing);
        self
    }

    pub fn set_processing(mut self, processing: impl IntoIterator<Item = SpecimenProcessing>) -> Self {
        self.processing = processing.into_iter().collect();
        self
    }

    pub fn container(mut self, container: SpecimenContainer) -> Self {
        self.container.push(container);
        self
    }

    pub fn set_container(mut self, container: impl IntoIterator<Item = SpecimenContainer>) -> Self {
        self.container = container.into_iter().collect();
        self
    }

    pub fn condition(mut self, condition: CodeableConcept) -> Self {
        self.condition.push(condition);
        self
    }

    pub fn set_condition(mut self, condition: impl IntoIterator<Item = CodeableConcept>) -> Self {
        self.condition = condition.into_iter().collect();
        self
    }

    pub fn note(mut self, note: Annotation) -> Self {
        self.note.push(note);
        self
    }

    pub fn set_note(mut self, note: impl IntoIterator<Item = Annotation>) -> Self {
        self.note = note.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<Specimen> {
        let specimen = Specimen {
            base: self.base,
            identifier: self.identifier,
            accession_identifier: self.accession_identifier,
            status: self.status,
            type_: self.type_,
            subject: self.subject,
            received_time: self.received_time,
            parent: self.parent,
            request: self.request,
            combined: self.combined,
            role: self.role,
            feature: self.feature,
            collection: self.collection,
            processing: self.processing,
            container: self.container,
            condition: self.condition,
            note: self.note,
        };
        if !self.skip_validation {
            specimen.validate()?;
        }
        Ok(specimen)
    }
}

impl Visitable for Specimen {
    fn type_name(&self) -> &'static str {
        "Specimen"
    }

    fn has_children(&self) -> bool {
        self.base.has_children()
            || !self.identifier.is_empty()
            || self.accession_identifier.is_some()
            || self.status.is_some()
            || self.type_.is_some()
            || self.subject.is_some()
            || self.received_time.is_some()
            || !self.parent.is_empty()
            || !self.request.is_empty()
            || self.combined.is_some()
            || !self.role.is_empty()
            || !self.feature.is_empty()
            || self.collection.is_some()
            || !self.processing.is_empty()
            || !self.container.is_empty()
            || !self.condition.is_empty()
            || !self.note.is_empty()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            self.base.accept_children(visitor);
            accept_list(&self.identifier, "identifier", visitor);
            accept_optional(self.accession_identifier.as_ref(), "accessionIdentifier", visitor);
            accept_optional(self.status.as_ref(), "status", visitor);
            accept_optional(self.type_.as_ref(), "type", visitor);
            accept_optional(self.subject.as_ref(), "subject", visitor);
            accept_optional(self.received_time.as_ref(), "receivedTime", visitor);
            accept_list(&self.parent, "parent", visitor);
            accept_list(&self.request, "request", visitor);
            accept_optional(self.combined.as_ref(), "combined", visitor);
            accept_list(&self.role, "role", visitor);
            accept_list(&self.feature, "feature", visitor);
            accept_optional(self.collection.as_ref(), "collection", visitor);
            accept_list(&self.processing, "processing", visitor);
            accept_list(&self.container, "container", visitor);
            accept_list(&self.condition, "condition", visitor);
            accept_list(&self.note, "note", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_reference_type(
            self.subject.as_ref(),
            "subject",
            &["Patient", "Group", "Device", "BiologicallyDerivedProduct", "Substance", "Location"],
        )?;
        validation::check_reference_types(&self.parent, "parent", &["Specimen"])?;
        validation::check_reference_types(&self.request, "request", &["ServiceRequest"])
    }
}

/// The physical feature of a specimen
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecimenFeature {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// Highlighted feature
    #[serde(rename = "type")]
    type_: CodeableConcept,

    /// Information about the feature
    description: String,
}

impl SpecimenFeature {
    pub fn builder() -> SpecimenFeatureBuilder {
        SpecimenFeatureBuilder::default()
    }

    pub fn to_builder(&self) -> SpecimenFeatureBuilder {
        SpecimenFeatureBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            type_: Some(self.type_.clone()),
            description: Some(self.description.clone()),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn type_(&self) -> &CodeableConcept {
        &self.type_
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Default)]
pub struct SpecimenFeatureBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    type_: Option<CodeableConcept>,
    description: Option<String>,
    skip_validation: bool,
}

impl SpecimenFeatureBuilder {
    backbone_builder_methods!();

    pub fn type_(mut self, type_: CodeableConcept) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> Result<SpecimenFeature> {
        let feature = SpecimenFeature {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            type_: self.type_.ok_or(Error::MissingElement("type"))?,
            description: self.description.ok_or(Error::MissingElement("description"))?,
        };
        if !self.skip_validation {
            feature.validate()?;
        }
        Ok(feature)
    }
}

impl Visitable for SpecimenFeature {
    fn type_name(&self) -> &'static str {
        "Specimen.feature"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            self.type_.accept("type", None, visitor);
            self.description.accept("description", None, visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_string(&self.description, "description")
    }
}

choice_enum!(
    /// `Specimen.collection.collected[x]`
    SpecimenCollectionCollected {
        DateTime(DateTime) => "collectedDateTime",
        Period(Period) => "collectedPeriod",
    }
);

choice_enum!(
    /// `Specimen.collection.fastingStatus[x]`
    SpecimenCollectionFastingStatus {
        CodeableConcept(CodeableConcept) => "fastingStatusCodeableConcept",
        Duration(Duration) => "fastingStatusDuration",
    }
);

/// Collection details
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecimenCollection {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// Who collected the specimen
    #[serde(skip_serializing_if = "Option::is_none")]
    collector: Option<Reference>,

    #[serde(flatten, deserialize_with = "SpecimenCollectionCollected::deserialize_flattened")]
    collected: Option<SpecimenCollectionCollected>,

    /// How long it took to collect specimen
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<Duration>,

    /// The quantity of specimen collected
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<SimpleQuantity>,

    /// Technique used to perform collection
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<CodeableConcept>,

    /// Device used to perform collection
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<CodeableReference>,

    /// The procedure that collects the specimen
    #[serde(skip_serializing_if = "Option::is_none")]
    procedure: Option<Reference>,

    /// Anatomical collection site
    #[serde(skip_serializing_if = "Option::is_none")]
    body_site: Option<CodeableReference>,

    #[serde(flatten, deserialize_with = "SpecimenCollectionFastingStatus::deserialize_flattened")]
    fasting_status: Option<SpecimenCollectionFastingStatus>,
}

impl SpecimenCollection {
    pub fn builder() -> SpecimenCollectionBuilder {
        SpecimenCollectionBuilder::default()
    }

    pub fn to_builder(&self) -> SpecimenCollectionBuilder {
        SpecimenCollectionBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            collector: self.collector.clone(),
            collected: self.collected.clone(),
            duration: self.duration.clone(),
            quantity: self.quantity.clone(),
            method: self.method.clone(),
            device: self.device.clone(),
            procedure: self.procedure.clone(),
            body_site: self.body_site.clone(),
            fasting_status: self.fasting_status.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn collector(&self) -> Option<&Reference> {
        self.collector.as_ref()
    }

    /// Collection time
    pub fn collected(&self) -> Option<&SpecimenCollectionCollected> {
        self.collected.as_ref()
    }

    pub fn duration(&self) -> Option<&Duration> {
        self.duration.as_ref()
    }

    pub fn quantity(&self) -> Option<&SimpleQuantity> {
        self.quantity.as_ref()
    }

    pub fn method(&self) -> Option<&CodeableConcept> {
        self.method.as_ref()
    }

    pub fn device(&self) -> Option<&CodeableReference> {
        self.device.as_ref()
    }

    pub fn procedure(&self) -> Option<&Reference> {
        self.procedure.as_ref()
    }

    pub fn body_site(&self) -> Option<&CodeableReference> {
        self.body_site.as_ref()
    }

    /// Whether or how long patient abstained from food and/or drink
    pub fn fasting_status(&self) -> Option<&SpecimenCollectionFastingStatus> {
        self.fasting_status.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct SpecimenCollectionBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    collector: Option<Reference>,
    collected: Option<SpecimenCollectionCollected>,
    duration: Option<Duration>,
    quantity: Option<SimpleQuantity>,
    method: Option<CodeableConcept>,
    device: Option<CodeableReference>,
    procedure: Option<Reference>,
    body_site: Option<CodeableReference>,
    fasting_status: Option<SpecimenCollectionFastingStatus>,
    skip_validation: bool,
}

impl SpecimenCollectionBuilder {
    backbone_builder_methods!();

    pub fn collector(mut self, collector: Reference) -> Self {
        self.collector = Some(collector);
        self
    }

    pub fn collected(mut self, collected: SpecimenCollectionCollected) -> Self {
        self.collected = Some(collected);
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn quantity(mut self, quantity: SimpleQuantity) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn method(mut self, method: CodeableConcept) -> Self {
        self.method = Some(method);
        self
    }

    pub fn device(mut self, device: CodeableReference) -> Self {
        self.device = Some(device);
        self
    }

    pub fn procedure(mut self, procedure: Reference) -> Self {
        self.procedure = Some(procedure);
        self
    }

    pub fn body_site(mut self, body_site: CodeableReference) -> Self {
        self.body_site = Some(body_site);
        self
    }

    pub fn fasting_status(mut self, fasting_status: SpecimenCollectionFastingStatus) -> Self {
        self.fasting_status = Some(fasting_status);
        self
    }

    pub fn build(self) -> Result<SpecimenCollection> {
        let collection = SpecimenCollection {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            collector: self.collector,
            collected: self.collected,
            duration: self.duration,
            quantity: self.quantity,
            method: self.method,
            device: self.device,
            procedure: self.procedure,
            body_site: self.body_site,
            fasting_status: self.fasting_status,
        };
        if !self.skip_validation {
            collection.validate()?;
        }
        Ok(collection)
    }
}

impl Visitable for SpecimenCollection {
    fn type_name(&self) -> &'static str {
        "Specimen.collection"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self, backbone)
            || self.collector.is_some()
            || self.collected.is_some()
            || self.duration.is_some()
            || self.quantity.is_some()
            || self.method.is_some()
            || self.device.is_some()
            || self.procedure.is_some()
            || self.body_site.is_some()
            || self.fasting_status.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            accept_optional(self.collector.as_ref(), "collector", visitor);
            if let Some(collected) = &self.collected {
                collected.as_visitable().accept("collected", None, visitor);
            }
            accept_optional(self.duration.as_ref(), "duration", visitor);
            accept_optional(self.quantity.as_ref(), "quantity", visitor);
            accept_optional(self.method.as_ref(), "method", visitor);
            accept_optional(self.device.as_ref(), "device", visitor);
            accept_optional(self.procedure.as_ref(), "procedure", visitor);
            accept_optional(self.body_site.as_ref(), "bodySite", visitor);
            if let Some(fasting_status) = &self.fasting_status {
                fasting_status.as_visitable().accept("fastingStatus", None, visitor);
            }
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_reference_type(
            self.collector.as_ref(),
            "collector",
            &["Practitioner", "PractitionerRole", "Patient", "RelatedPerson"],
        )?;
        validation::check_simple_quantity(self.quantity.as_ref(), "quantity")?;
        validation::check_codeable_reference_type(self.device.as_ref(), "device", &["Device"])?;
        validation::check_reference_type(self.procedure.as_ref(), "procedure", &["Procedure"])?;
        validation::check_codeable_reference_type(
            self.body_site.as_ref(),
            "bodySite",
            &["BodyStructure"],
        )?;
        validation::require_value_or_children(self.has_children(), "Specimen.collection")
    }
}

choice_enum!(
    /// `Specimen.processing.time[x]`
    SpecimenProcessingTime {
        DateTime(DateTime) => "timeDateTime",
        Period(Period) => "timePeriod",
    }
);

/// Processing and processing step details
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecimenProcessing {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// Textual description of procedure
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// Indicates the treatment step applied to the specimen
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<CodeableConcept>,

    /// Material used in the processing step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    additive: Vec<Reference>,

    #[serde(flatten, deserialize_with = "SpecimenProcessingTime::deserialize_flattened")]
    time: Option<SpecimenProcessingTime>,
}

impl SpecimenProcessing {
    pub fn builder() -> SpecimenProcessingBuilder {
        SpecimenProcessingBuilder::default()
    }

    pub fn to_builder(&self) -> SpecimenProcessingBuilder {
        SpecimenProcessingBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            description: self.description.clone(),
            method: self.method.clone(),
            additive: self.additive.clone(),
            time: self.time.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn method(&self) -> Option<&CodeableConcept> {
        self.method.as_ref()
    }

    pub fn additive(&self) -> &[Reference] {
        &self.additive
    }

    /// Date and time of specimen processing
    pub fn time(&self) -> Option<&SpecimenProcessingTime> {
        self.time.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct SpecimenProcessingBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    description: Option<String>,
    method: Option<CodeableConcept>,
    additive: Vec<Reference>,
    time: Option<SpecimenProcessingTime>,
    skip_validation: bool,
}

impl SpecimenProcessingBuilder {
    backbone_builder_methods!();

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn method(mut self, method: CodeableConcept) -> Self {
        self.method = Some(method);
        self
    }

    pub fn additive(mut self, additive: Reference) -> Self {
        self.additive.push(additive);
        self
    }

    pub fn set_additive(mut self, additive: impl IntoIterator<Item = Reference>) -> Self {
        self.additive = additive.into_iter().collect();
        self
    }

    pub fn time(mut self, time: SpecimenProcessingTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn build(self) -> Result<SpecimenProcessing> {
        let processing = SpecimenProcessing {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            description: self.description,
            method: self.method,
            additive: self.additive,
            time: self.time,
        };
        if !self.skip_validation {
            processing.validate()?;
        }
        Ok(processing)
    }
}

impl Visitable for SpecimenProcessing {
    fn type_name(&self) -> &'static str {
        "Specimen.processing"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self, backbone)
            || self.description.is_some()
            || self.method.is_some()
            || !self.additive.is_empty()
            || self.time.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            accept_optional(self.description.as_ref(), "description", visitor);
            accept_optional(self.method.as_ref(), "method", visitor);
            accept_list(&self.additive, "additive", visitor);
            if let Some(time) = &self.time {
                time.as_visitable().accept("time", None, visitor);
            }
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_optional_string(self.description.as_deref(), "description")?;
        validation::check_reference_types(&self.additive, "additive", &["Substance"])?;
        validation::require_value_or_children(self.has_children(), "Specimen.processing")
    }
}

/// Direct container of specimen (tube/slide, etc.)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecimenContainer {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// Device resource for the container
    device: Reference,

    /// Where the container is
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Reference>,

    /// Quantity of specimen within container
    #[serde(skip_serializing_if = "Option::is_none")]
    specimen_quantity: Option<SimpleQuantity>,
}

impl SpecimenContainer {
    pub fn builder() -> SpecimenContainerBuilder {
        SpecimenContainerBuilder::default()
    }

    pub fn to_builder(&self) -> SpecimenContainerBuilder {
        SpecimenContainerBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            device: Some(self.device.clone()),
            location: self.location.clone(),
            specimen_quantity: self.specimen_quantity.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn device(&self) -> &Reference {
        &self.device
    }

    pub fn location(&self) -> Option<&Reference> {
        self.location.as_ref()
    }

    pub fn specimen_quantity(&self) -> Option<&SimpleQuantity> {
        self.specimen_quantity.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct SpecimenContainerBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    device: Option<Reference>,
    location: Option<Reference>,
    specimen_quantity: Option<SimpleQuantity>,
    skip_validation: bool,
}

impl SpecimenContainerBuilder {
    backbone_builder_methods!();

    pub fn device(mut self, device: Reference) -> Self {
        self.device = Some(device);
        self
    }

    pub fn location(mut self, location: Reference) -> Self {
        self.location = Some(location);
        self
    }

    pub fn specimen_quantity(mut self, specimen_quantity: SimpleQuantity) -> Self {
        self.specimen_quantity = Some(specimen_quantity);
        self
    }

    pub fn build(self) -> Result<SpecimenContainer> {
        let container = SpecimenContainer {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            device: self.device.ok_or(Error::MissingElement("device"))?,
            location: self.location,
            specimen_quantity: self.specimen_quantity,
        };
        if !self.skip_validation {
            container.validate()?;
        }
        Ok(container)
    }
}

impl Visitable for SpecimenContainer {
    fn type_name(&self) -> &'static str {
        "Specimen.container"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            self.device.accept("device", None, visitor);
            accept_optional(self.location.as_ref(), "location", visitor);
            accept_optional(self.specimen_quantity.as_ref(), "specimenQuantity", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_reference_type(Some(&self.device), "device", &["Device"])?;
        validation::check_reference_type(self.location.as_ref(), "location", &["Location"])?;
        validation::check_simple_quantity(self.specimen_quantity.as_ref(), "specimenQuantity")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r5::datatypes::Coding;
    use crate::r5::primitives::{Code, Uri};
    use serde_json::json;

    fn reference(value: &str) -> Reference {
        Reference::builder().reference(value).build().unwrap()
    }

    fn concept(text: &str) -> CodeableConcept {
        CodeableConcept::builder().text(text).build().unwrap()
    }

    #[test]
    fn test_build_and_getters() {
        let specimen = Specimen::builder()
            .status(SpecimenStatus::Available)
            .type_(concept("Venous blood specimen"))
            .subject(reference("Patient/example"))
            .combined(SpecimenCombined::Pooled)
            .parent(reference("Specimen/s1"))
            .parent(reference("Specimen/s2"))
            .build()
            .unwrap();

        assert_eq!(specimen.status(), Some(&SpecimenStatus::Available));
        assert_eq!(specimen.parent().len(), 2);
        assert_eq!(specimen.combined(), Some(&SpecimenCombined::Pooled));
        assert!(specimen.collection().is_none());
        assert!(specimen.note().is_empty());
    }

    #[test]
    fn test_subject_reference_type() {
        let err = Specimen::builder()
            .subject(reference("Practitioner/p1"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceType { element: "subject", .. }));

        // validating(false) skips the reference check
        assert!(Specimen::builder()
            .subject(reference("Practitioner/p1"))
            .validating(false)
            .build()
            .is_ok());
    }

    #[test]
    fn test_feature_requires_type_and_description() {
        let err = SpecimenFeature::builder().description("red ink margin").build().unwrap_err();
        assert!(matches!(err, Error::MissingElement("type")));

        let err = SpecimenFeature::builder().type_(concept("margin")).build().unwrap_err();
        assert!(matches!(err, Error::MissingElement("description")));
    }

    #[test]
    fn test_container_requires_device() {
        let err = SpecimenContainer::builder().build().unwrap_err();
        assert!(matches!(err, Error::MissingElement("device")));

        let err = SpecimenContainer::builder()
            .device(reference("Location/l1"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceType { element: "device", .. }));
    }

    #[test]
    fn test_collection_quantity_is_simple() {
        let quantity = SimpleQuantity::builder()
            .value(6)
            .comparator(crate::r5::codes::QuantityComparator::GreaterThan)
            .unit("mL")
            .build()
            .unwrap();
        let err = SpecimenCollection::builder().quantity(quantity).build().unwrap_err();
        assert!(matches!(err, Error::SimpleQuantityComparator("quantity")));
    }

    #[test]
    fn test_empty_collection_rejected() {
        let err = SpecimenCollection::builder().build().unwrap_err();
        assert!(matches!(err, Error::NoValueOrChildren("Specimen.collection")));
    }

    #[test]
    fn test_choice_elements_json() {
        let collection = SpecimenCollection::builder()
            .collected(SpecimenCollectionCollected::DateTime(
                DateTime::new("2011-05-30T06:15:00Z").unwrap(),
            ))
            .fasting_status(SpecimenCollectionFastingStatus::CodeableConcept(
                CodeableConcept::builder()
                    .coding(
                        Coding::builder()
                            .system(Uri::new("http://terminology.hl7.org/CodeSystem/v2-0916").unwrap())
                            .code(Code::new("F").unwrap())
                            .build()
                            .unwrap(),
                    )
                    .build()
                    .unwrap(),
            ))
            .build()
            .unwrap();

        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["collectedDateTime"], "2011-05-30T06:15:00Z");
        assert_eq!(value["fastingStatusCodeableConcept"]["coding"][0]["code"], "F");
        assert!(value.get("collected").is_none());

        let parsed: SpecimenCollection = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, collection);
    }

    #[test]
    fn test_malformed_choice_value_is_rejected() {
        let err = serde_json::from_value::<SpecimenCollection>(json!({
            "collector": { "reference": "Practitioner/p1" },
            "collectedDateTime": "not-a-date"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("collectedDateTime"));

        let err = serde_json::from_value::<SpecimenProcessing>(json!({
            "timePeriod": "2015-08-18T07:03:00Z"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("timePeriod"));
    }

    #[test]
    fn test_choice_allows_one_type() {
        let err = serde_json::from_value::<SpecimenCollection>(json!({
            "collectedDateTime": "2011-05-30T06:15:00Z",
            "collectedPeriod": { "start": "2011-05-30T06:15:00Z" }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("collectedDateTime"));
        assert!(err.to_string().contains("collectedPeriod"));

        // Different choice elements of the same backbone do not conflict
        let collection: SpecimenCollection = serde_json::from_value(json!({
            "collectedPeriod": { "start": "2011-05-30T06:15:00Z" },
            "fastingStatusDuration": { "value": 12, "unit": "h" }
        }))
        .unwrap();
        assert!(matches!(collection.collected(), Some(SpecimenCollectionCollected::Period(_))));
        assert!(matches!(
            collection.fasting_status(),
            Some(SpecimenCollectionFastingStatus::Duration(_))
        ));
    }

    #[test]
    fn test_serialize_skips_empty_elements() {
        let specimen = Specimen::builder()
            .status(SpecimenStatus::Unavailable)
            .container(SpecimenContainer::builder().device(reference("Device/tube")).build().unwrap())
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&specimen).unwrap(),
            json!({
                "status": "unavailable",
                "container": [{"device": {"reference": "Device/tube"}}]
            })
        );
    }

    #[test]
    fn test_to_builder_round_trip() {
        let specimen = Specimen::builder()
            .status(SpecimenStatus::Available)
            .note(Annotation::builder().text("hemolyzed".parse().unwrap()).build().unwrap())
            .processing(
                SpecimenProcessing::builder()
                    .description("Acidify to pH < 3.0 with 6 N HCl.")
                    .additive(reference("Substance/acid"))
                    .time(SpecimenProcessingTime::DateTime(DateTime::new("2015-08-18").unwrap()))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let rebuilt = specimen.to_builder().build().unwrap();
        assert_eq!(rebuilt, specimen);

        let changed = specimen.to_builder().status(SpecimenStatus::EnteredInError).build().unwrap();
        assert_ne!(changed, specimen);
        assert_eq!(specimen.status(), Some(&SpecimenStatus::Available));
    }
}
