//! Model metadata
//!
//! Element definitions, bindings, constraints and maturity of the modelled types, held in
//! compile-time perfect hash maps. Backbone elements are keyed by their path
//! (`Specimen.collection`). Lookups walk the base chain, so `element_info("Specimen", "id")`
//! finds the element declared on `Resource`.
//!
//! Constraints are descriptive only; nothing in this crate evaluates their expressions.

use super::codes::{BindingStrength, ConstraintLevel, StandardsStatus};
use phf::{phf_map, phf_set};

/// Kind of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Abstract base types (`Element`, `BackboneElement`, `Resource`, `DomainResource`)
    Base,
    /// Complex data types such as `CodeableConcept`
    DataType,
    /// Nested structures declared inside a resource
    BackboneElement,
    Resource,
}

/// Terminology binding of a coded element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub name: &'static str,
    pub strength: BindingStrength,
    pub value_set: Option<&'static str>,
    pub description: Option<&'static str>,
}

/// Definition of one element of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementInfo {
    /// Element name; choice elements carry no type suffix
    pub name: &'static str,
    /// FHIR type codes (more than one only for choice elements)
    pub types: &'static [&'static str],
    pub required: bool,
    pub summary: bool,
    pub repeating: bool,
    pub choice: bool,
    pub reference_targets: &'static [&'static str],
    pub binding: Option<Binding>,
}

impl ElementInfo {
    const fn new(name: &'static str, types: &'static [&'static str]) -> Self {
        ElementInfo {
            name,
            types,
            required: false,
            summary: false,
            repeating: false,
            choice: types.len() > 1,
            reference_targets: &[],
            binding: None,
        }
    }

    const fn required(self) -> Self {
        ElementInfo { required: true, ..self }
    }

    const fn summary(self) -> Self {
        ElementInfo { summary: true, ..self }
    }

    const fn repeating(self) -> Self {
        ElementInfo { repeating: true, ..self }
    }

    const fn targets(self, reference_targets: &'static [&'static str]) -> Self {
        ElementInfo { reference_targets, ..self }
    }

    const fn bound(
        self,
        name: &'static str,
        strength: BindingStrength,
        value_set: Option<&'static str>,
        description: Option<&'static str>,
    ) -> Self {
        ElementInfo {
            binding: Some(Binding {
                name,
                strength,
                value_set,
                description,
            }),
            ..self
        }
    }

    /// JSON name of this choice element for one of its types (`collected` + `dateTime`
    /// gives `collectedDateTime`)
    pub fn choice_name(&self, type_code: &str) -> Option<String> {
        if !self.choice || !self.types.iter().any(|t| *t == type_code) {
            return None;
        }
        Some(choice_element_name(self.name, type_code))
    }
}

/// A constraint declared on a type, carried as metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub id: &'static str,
    pub level: ConstraintLevel,
    /// `(base)` or the element path the constraint applies to
    pub location: &'static str,
    pub description: &'static str,
    /// FHIRPath expression (not evaluated)
    pub expression: &'static str,
    pub source: &'static str,
}

/// FHIR maturity model level and standards status of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Maturity {
    pub level: u8,
    pub status: StandardsStatus,
}

/// Metadata of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    pub name: &'static str,
    pub kind: TypeKind,
    pub base: Option<&'static str>,
    /// Elements declared by this type itself, in definition order
    pub elements: &'static [ElementInfo],
    pub constraints: &'static [Constraint],
    pub maturity: Option<Maturity>,
}

const fn base_type(name: &'static str, base: Option<&'static str>, elements: &'static [ElementInfo]) -> TypeInfo {
    TypeInfo {
        name,
        kind: TypeKind::Base,
        base,
        elements,
        constraints: &[],
        maturity: None,
    }
}

const fn data_type(name: &'static str, elements: &'static [ElementInfo]) -> TypeInfo {
    TypeInfo {
        name,
        kind: TypeKind::DataType,
        base: Some("Element"),
        elements,
        constraints: &[],
        maturity: None,
    }
}

const fn backbone(name: &'static str, elements: &'static [ElementInfo]) -> TypeInfo {
    TypeInfo {
        name,
        kind: TypeKind::BackboneElement,
        base: Some("BackboneElement"),
        elements,
        constraints: &[],
        maturity: None,
    }
}

const fn resource(
    name: &'static str,
    elements: &'static [ElementInfo],
    constraints: &'static [Constraint],
    maturity: Maturity,
) -> TypeInfo {
    TypeInfo {
        name,
        kind: TypeKind::Resource,
        base: Some("DomainResource"),
        elements,
        constraints,
        maturity: Some(maturity),
    }
}

const fn warning(
    id: &'static str,
    location: &'static str,
    description: &'static str,
    expression: &'static str,
    source: &'static str,
) -> Constraint {
    Constraint {
        id,
        level: ConstraintLevel::Warning,
        location,
        description,
        expression,
        source,
    }
}

use BindingStrength::{Example, Extensible, Preferred, Required};

type E = ElementInfo;

const BODY_SITE_VS: Option<&str> = Some("http://hl7.org/fhir/ValueSet/body-site");
const BODY_SITE_DESC: Option<&str> = Some("SNOMED CT Body site concepts");

// Base types

const ELEMENT: &[ElementInfo] = &[
    E::new("id", &["string"]),
    E::new("extension", &["Extension"]).repeating(),
];

const BACKBONE_ELEMENT: &[ElementInfo] =
    &[E::new("modifierExtension", &["Extension"]).repeating().summary()];

const RESOURCE: &[ElementInfo] = &[
    E::new("id", &["id"]).summary(),
    E::new("meta", &["Meta"]).summary(),
    E::new("implicitRules", &["uri"]).summary(),
    E::new("language", &["code"]).bound(
        "Language",
        Required,
        Some("http://hl7.org/fhir/ValueSet/all-languages|5.0.0"),
        Some("IETF language tag for a human language"),
    ),
];

const DOMAIN_RESOURCE: &[ElementInfo] = &[
    E::new("text", &["Narrative"]),
    E::new("contained", &["Resource"]).repeating(),
    E::new("extension", &["Extension"]).repeating(),
    E::new("modifierExtension", &["Extension"]).repeating().summary(),
];

// Data types

const EXTENSION: &[ElementInfo] = &[
    E::new("url", &["uri"]).required(),
    E::new(
        "value",
        &[
            "base64Binary",
            "boolean",
            "canonical",
            "code",
            "date",
            "dateTime",
            "decimal",
            "id",
            "instant",
            "integer",
            "markdown",
            "positiveInt",
            "string",
            "unsignedInt",
            "uri",
            "Annotation",
            "CodeableConcept",
            "CodeableReference",
            "Coding",
            "Expression",
            "Identifier",
            "Money",
            "Period",
            "Quantity",
            "Reference",
        ],
    ),
];

const CODING: &[ElementInfo] = &[
    E::new("system", &["uri"]).summary(),
    E::new("version", &["string"]).summary(),
    E::new("code", &["code"]).summary(),
    E::new("display", &["string"]).summary(),
    E::new("userSelected", &["boolean"]).summary(),
];

const CODEABLE_CONCEPT: &[ElementInfo] = &[
    E::new("coding", &["Coding"]).repeating().summary(),
    E::new("text", &["string"]).summary(),
];

const CODEABLE_REFERENCE: &[ElementInfo] = &[
    E::new("concept", &["CodeableConcept"]).summary(),
    E::new("reference", &["Reference"]).summary(),
];

const REFERENCE: &[ElementInfo] = &[
    E::new("reference", &["string"]).summary(),
    E::new("type", &["uri"]).summary().bound(
        "FHIRResourceTypeExt",
        Extensible,
        Some("http://hl7.org/fhir/ValueSet/resource-types"),
        Some("A resource (or, for logical models, the URI of the logical model)."),
    ),
    E::new("identifier", &["Identifier"]).summary(),
    E::new("display", &["string"]).summary(),
];

const IDENTIFIER: &[ElementInfo] = &[
    E::new("use", &["code"]).summary().bound(
        "IdentifierUse",
        Required,
        Some("http://hl7.org/fhir/ValueSet/identifier-use|5.0.0"),
        Some("Identifies the purpose for this identifier, if known ."),
    ),
    E::new("type", &["CodeableConcept"]).summary().bound(
        "IdentifierType",
        Extensible,
        Some("http://hl7.org/fhir/ValueSet/identifier-type"),
        Some("A coded type for an identifier that can be used to determine which identifier to use for a specific purpose."),
    ),
    E::new("system", &["uri"]).summary(),
    E::new("value", &["string"]).summary(),
    E::new("period", &["Period"]).summary(),
    E::new("assigner", &["Reference"]).summary().targets(&["Organization"]),
];

const PERIOD: &[ElementInfo] = &[
    E::new("start", &["dateTime"]).summary(),
    E::new("end", &["dateTime"]).summary(),
];

const QUANTITY: &[ElementInfo] = &[
    E::new("value", &["decimal"]).summary(),
    E::new("comparator", &["code"]).summary().bound(
        "QuantityComparator",
        Required,
        Some("http://hl7.org/fhir/ValueSet/quantity-comparator|5.0.0"),
        Some("How the Quantity should be understood and represented."),
    ),
    E::new("unit", &["string"]).summary(),
    E::new("system", &["uri"]).summary(),
    E::new("code", &["code"]).summary(),
];

const MONEY: &[ElementInfo] = &[
    E::new("value", &["decimal"]).summary(),
    E::new("currency", &["code"]).summary().bound(
        "CurrencyCode",
        Required,
        Some("http://hl7.org/fhir/ValueSet/currencies|5.0.0"),
        Some("A code indicating the currency, taken from ISO 4217."),
    ),
];

const ANNOTATION: &[ElementInfo] = &[
    E::new("author", &["Reference", "string"]).summary().targets(&[
        "Practitioner",
        "PractitionerRole",
        "Patient",
        "RelatedPerson",
        "Organization",
    ]),
    E::new("time", &["dateTime"]).summary(),
    E::new("text", &["markdown"]).required().summary(),
];

const EXPRESSION: &[ElementInfo] = &[
    E::new("description", &["string"]).summary(),
    E::new("name", &["code"]).summary(),
    E::new("language", &["code"]).summary().bound(
        "ExpressionLanguage",
        Extensible,
        Some("http://hl7.org/fhir/ValueSet/expression-language"),
        Some("The media type of the expression language."),
    ),
    E::new("expression", &["string"]).summary(),
    E::new("reference", &["uri"]).summary(),
];

const META: &[ElementInfo] = &[
    E::new("versionId", &["id"]).summary(),
    E::new("lastUpdated", &["instant"]).summary(),
    E::new("source", &["uri"]).summary(),
    E::new("profile", &["canonical"]).repeating().summary(),
    E::new("security", &["Coding"]).repeating().summary(),
    E::new("tag", &["Coding"]).repeating().summary(),
];

const NARRATIVE: &[ElementInfo] = &[
    E::new("status", &["code"]).required().bound(
        "NarrativeStatus",
        Required,
        Some("http://hl7.org/fhir/ValueSet/narrative-status|5.0.0"),
        Some("The status of a resource narrative."),
    ),
    E::new("div", &["xhtml"]).required(),
];

// Coverage

const COVERAGE: &[ElementInfo] = &[
    E::new("identifier", &["Identifier"]).repeating().summary(),
    E::new("status", &["code"]).required().summary().bound(
        "CoverageStatus",
        Required,
        Some("http://hl7.org/fhir/ValueSet/fm-status|5.0.0"),
        Some("A code specifying the state of the resource instance."),
    ),
    E::new("kind", &["code"]).required().summary().bound(
        "CoverageKind",
        Required,
        Some("http://hl7.org/fhir/ValueSet/coverage-kind|5.0.0"),
        None,
    ),
    E::new("paymentBy", &["BackboneElement"]).repeating(),
    E::new("type", &["CodeableConcept"]).summary().bound(
        "CoverageType",
        Preferred,
        Some("http://hl7.org/fhir/ValueSet/coverage-type"),
        Some("The type of insurance: public health, worker compensation; private accident, auto, private health, etc.) or a direct payment by an individual or organization."),
    ),
    E::new("policyHolder", &["Reference"])
        .summary()
        .targets(&["Patient", "RelatedPerson", "Organization"]),
    E::new("subscriber", &["Reference"]).summary().targets(&["Patient", "RelatedPerson"]),
    E::new("subscriberId", &["Identifier"]).repeating().summary(),
    E::new("beneficiary", &["Reference"]).required().summary().targets(&["Patient"]),
    E::new("dependent", &["string"]).summary(),
    E::new("relationship", &["CodeableConcept"]).bound(
        "Relationship",
        Extensible,
        Some("http://hl7.org/fhir/ValueSet/subscriber-relationship"),
        Some("The relationship between the Subscriber and the Beneficiary (insured/covered party/patient)."),
    ),
    E::new("period", &["Period"]).summary(),
    E::new("insurer", &["Reference"]).summary().targets(&["Organization"]),
    E::new("class", &["BackboneElement"]).repeating(),
    E::new("order", &["positiveInt"]).summary(),
    E::new("network", &["string"]).summary(),
    E::new("costToBeneficiary", &["BackboneElement"]).repeating(),
    E::new("subrogation", &["boolean"]),
    E::new("contract", &["Reference"]).repeating().targets(&["Contract"]),
    E::new("insurancePlan", &["Reference"]).targets(&["InsurancePlan"]),
];

const COVERAGE_PAYMENT_BY: &[ElementInfo] = &[
    E::new("party", &["Reference"])
        .required()
        .summary()
        .targets(&["Patient", "RelatedPerson", "Organization"]),
    E::new("responsibility", &["string"]).summary(),
];

const COVERAGE_CLASS: &[ElementInfo] = &[
    E::new("type", &["CodeableConcept"]).required().summary().bound(
        "CoverageClass",
        Extensible,
        Some("http://hl7.org/fhir/ValueSet/coverage-class"),
        Some("The policy classifications, e.g. Group, Plan, Class, etc."),
    ),
    E::new("value", &["Identifier"]).required().summary(),
    E::new("name", &["string"]).summary(),
];

const COVERAGE_COST_TO_BENEFICIARY: &[ElementInfo] = &[
    E::new("type", &["CodeableConcept"]).summary().bound(
        "CopayTypes",
        Extensible,
        Some("http://hl7.org/fhir/ValueSet/coverage-copay-type"),
        Some("The types of services to which patient copayments are specified."),
    ),
    E::new("category", &["CodeableConcept"]).bound(
        "BenefitCategory",
        Example,
        Some("http://hl7.org/fhir/ValueSet/ex-benefitcategory"),
        None,
    ),
    E::new("network", &["CodeableConcept"]).bound(
        "BenefitNetwork",
        Example,
        Some("http://hl7.org/fhir/ValueSet/benefit-network"),
        None,
    ),
    E::new("unit", &["CodeableConcept"]).bound(
        "BenefitUnit",
        Example,
        Some("http://hl7.org/fhir/ValueSet/benefit-unit"),
        None,
    ),
    E::new("term", &["CodeableConcept"]).bound(
        "BenefitTerm",
        Example,
        Some("http://hl7.org/fhir/ValueSet/benefit-term"),
        None,
    ),
    E::new("value", &["Quantity", "Money"]).summary(),
    E::new("exception", &["BackboneElement"]).repeating(),
];

const COVERAGE_COST_TO_BENEFICIARY_EXCEPTION: &[ElementInfo] = &[
    E::new("type", &["CodeableConcept"]).required().summary().bound(
        "CoverageFinancialException",
        Example,
        Some("http://hl7.org/fhir/ValueSet/coverage-financial-exception"),
        Some("The types of exceptions from the part or full value of financial obligations such as copays."),
    ),
    E::new("period", &["Period"]).summary(),
];

const COVERAGE_SD: &str = "http://hl7.org/fhir/StructureDefinition/Coverage";

const COVERAGE_CONSTRAINTS: &[Constraint] = &[
    warning(
        "coverage-0",
        "(base)",
        "SHOULD contain a code from value set http://hl7.org/fhir/ValueSet/coverage-type",
        "type.exists() implies (type.memberOf('http://hl7.org/fhir/ValueSet/coverage-type', 'preferred'))",
        COVERAGE_SD,
    ),
    warning(
        "coverage-1",
        "(base)",
        "SHALL, if possible, contain a code from value set http://hl7.org/fhir/ValueSet/subscriber-relationship",
        "relationship.exists() implies (relationship.memberOf('http://hl7.org/fhir/ValueSet/subscriber-relationship', 'extensible'))",
        COVERAGE_SD,
    ),
    warning(
        "coverage-2",
        "class.type",
        "SHALL, if possible, contain a code from value set http://hl7.org/fhir/ValueSet/coverage-class",
        "$this.memberOf('http://hl7.org/fhir/ValueSet/coverage-class', 'extensible')",
        COVERAGE_SD,
    ),
    warning(
        "coverage-3",
        "costToBeneficiary.type",
        "SHALL, if possible, contain a code from value set http://hl7.org/fhir/ValueSet/coverage-copay-type",
        "$this.memberOf('http://hl7.org/fhir/ValueSet/coverage-copay-type', 'extensible')",
        COVERAGE_SD,
    ),
];

// ImagingSelection

const IMAGING_SELECTION_CODE_VS: Option<&str> =
    Some("http://dicom.nema.org/medical/dicom/current/output/chtml/part16/sect_CID_7010.html");

const IMAGING_SELECTION: &[ElementInfo] = &[
    E::new("identifier", &["Identifier"]).repeating().summary(),
    E::new("status", &["code"]).required().summary().bound(
        "ImagingSelectionStatus",
        Required,
        Some("http://hl7.org/fhir/ValueSet/imagingselection-status|5.0.0"),
        Some("The status of the ImagingSelection."),
    ),
    E::new("subject", &["Reference"]).summary().targets(&[
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
    ]),
    E::new("issued", &["instant"]).summary(),
    E::new("performer", &["BackboneElement"]).repeating().summary(),
    E::new("basedOn", &["Reference"]).repeating().summary().targets(&[
        "CarePlan",
        "ServiceRequest",
        "Appointment",
        "AppointmentResponse",
        "Task",
    ]),
    E::new("category", &["CodeableConcept"]).repeating().summary().bound(
        "ImagingSelectionCode",
        Example,
        IMAGING_SELECTION_CODE_VS,
        Some("Key Object Selection Document Title."),
    ),
    E::new("code", &["CodeableConcept"]).required().summary().bound(
        "ImagingSelectionCode",
        Example,
        IMAGING_SELECTION_CODE_VS,
        Some("Key Object Selection Document Title."),
    ),
    E::new("studyUid", &["id"]).summary(),
    E::new("derivedFrom", &["Reference"])
        .repeating()
        .summary()
        .targets(&["ImagingStudy", "DocumentReference"]),
    E::new("endpoint", &["Reference"]).repeating().summary().targets(&["Endpoint"]),
    E::new("seriesUid", &["id"]).summary(),
    E::new("seriesNumber", &["unsignedInt"]).summary(),
    E::new("frameOfReferenceUid", &["id"]).summary(),
    E::new("bodySite", &["CodeableReference"])
        .summary()
        .targets(&["BodyStructure"])
        .bound("BodySite", Example, BODY_SITE_VS, BODY_SITE_DESC),
    E::new("focus", &["Reference"]).repeating().summary().targets(&["ImagingSelection"]),
    E::new("instance", &["BackboneElement"]).repeating().summary(),
];

const IMAGING_SELECTION_PERFORMER: &[ElementInfo] = &[
    E::new("function", &["CodeableConcept"]).summary().bound(
        "EventPerformerFunction",
        Extensible,
        Some("http://hl7.org/fhir/ValueSet/series-performer-function"),
        Some("The type of involvement of the performer."),
    ),
    E::new("actor", &["Reference"]).summary().targets(&[
        "Practitioner",
        "PractitionerRole",
        "Device",
        "Organization",
        "CareTeam",
        "Patient",
        "RelatedPerson",
        "HealthcareService",
    ]),
];

const IMAGING_SELECTION_INSTANCE: &[ElementInfo] = &[
    E::new("uid", &["id"]).required().summary(),
    E::new("number", &["unsignedInt"]).summary(),
    E::new("sopClass", &["Coding"]).bound(
        "sopClass",
        Extensible,
        Some("http://dicom.nema.org/medical/dicom/current/output/chtml/part04/sect_B.5.html#table_B.5-1"),
        Some("DICOM SOP Classes."),
    ),
    E::new("subset", &["string"]).repeating(),
    E::new("imageRegion2D", &["BackboneElement"]).repeating(),
    E::new("imageRegion3D", &["BackboneElement"]).repeating(),
];

const IMAGING_SELECTION_IMAGE_REGION_2D: &[ElementInfo] = &[
    E::new("regionType", &["code"]).required().bound(
        "ImagingSelection2DGraphicType",
        Required,
        Some("http://hl7.org/fhir/ValueSet/imagingselection-2dgraphictype|5.0.0"),
        Some("The type of image region."),
    ),
    E::new("coordinate", &["decimal"]).required().repeating(),
];

const IMAGING_SELECTION_IMAGE_REGION_3D: &[ElementInfo] = &[
    E::new("regionType", &["code"]).required().bound(
        "ImagingSelection3DGraphicType",
        Required,
        Some("http://hl7.org/fhir/ValueSet/imagingselection-3dgraphictype|5.0.0"),
        Some("The type of image region."),
    ),
    E::new("coordinate", &["decimal"]).required().repeating(),
];

const IMAGING_SELECTION_SD: &str = "http://hl7.org/fhir/StructureDefinition/ImagingSelection";

const IMAGING_SELECTION_CONSTRAINTS: &[Constraint] = &[
    warning(
        "imagingSelection-0",
        "performer.function",
        "SHALL, if possible, contain a code from value set http://hl7.org/fhir/ValueSet/series-performer-function",
        "$this.memberOf('http://hl7.org/fhir/ValueSet/series-performer-function', 'extensible')",
        IMAGING_SELECTION_SD,
    ),
    warning(
        "imagingSelection-1",
        "instance.sopClass",
        "SHALL, if possible, contain a code from value set http://dicom.nema.org/medical/dicom/current/output/chtml/part04/sect_B.5.html#table_B.5-1",
        "$this.memberOf('http://dicom.nema.org/medical/dicom/current/output/chtml/part04/sect_B.5.html#table_B.5-1', 'extensible')",
        IMAGING_SELECTION_SD,
    ),
];

// Permission

const PERMISSION: &[ElementInfo] = &[
    E::new("status", &["code"]).required().summary().bound(
        "PermissionStatus",
        Required,
        Some("http://hl7.org/fhir/ValueSet/permission-status|5.0.0"),
        Some("Codes identifying the lifecycle stage of a product."),
    ),
    E::new("asserter", &["Reference"]).summary().targets(&[
        "Practitioner",
        "PractitionerRole",
        "Organization",
        "CareTeam",
        "Patient",
        "RelatedPerson",
        "HealthcareService",
    ]),
    E::new("date", &["dateTime"]).repeating().summary(),
    E::new("validity", &["Period"]).summary(),
    E::new("justification", &["BackboneElement"]).summary(),
    E::new("combining", &["code"]).required().summary().bound(
        "PermissionCombining",
        Required,
        Some("http://hl7.org/fhir/ValueSet/permission-rule-combining|5.0.0"),
        Some("How the rules are to be combined."),
    ),
    E::new("rule", &["BackboneElement"]).repeating().summary(),
];

const PERMISSION_JUSTIFICATION: &[ElementInfo] = &[
    E::new("basis", &["CodeableConcept"]).repeating().summary().bound(
        "ConsentRegulatoryBasis",
        Example,
        Some("http://hl7.org/fhir/ValueSet/consent-policy"),
        Some("Regulatory policy examples"),
    ),
    E::new("evidence", &["Reference"]).repeating().summary().targets(&["Resource"]),
];

const PERMISSION_RULE: &[ElementInfo] = &[
    E::new("type", &["code"]).summary().bound(
        "PermissionProvisionType",
        Required,
        Some("http://hl7.org/fhir/ValueSet/consent-provision-type|5.0.0"),
        Some("How a rule statement is applied."),
    ),
    E::new("data", &["BackboneElement"]).repeating().summary(),
    E::new("activity", &["BackboneElement"]).repeating().summary(),
    E::new("limit", &["CodeableConcept"]).repeating().summary().bound(
        "PermissionUsageLimits",
        Example,
        Some("http://hl7.org/fhir/ValueSet/security-label-event-examples"),
        Some("Obligations and Refrains"),
    ),
];

const PERMISSION_RULE_DATA: &[ElementInfo] = &[
    E::new("resource", &["BackboneElement"]).repeating().summary(),
    E::new("security", &["Coding"]).repeating().summary(),
    E::new("period", &["Period"]).repeating().summary(),
    E::new("expression", &["Expression"]).summary(),
];

const PERMISSION_RULE_DATA_RESOURCE: &[ElementInfo] = &[
    E::new("meaning", &["code"]).required().summary().bound(
        "ConsentDataMeaning",
        Required,
        Some("http://hl7.org/fhir/ValueSet/consent-data-meaning|5.0.0"),
        Some("How a resource reference is interpreted when testing consent restrictions."),
    ),
    E::new("reference", &["Reference"]).required().summary().targets(&["Resource"]),
];

const PERMISSION_RULE_ACTIVITY: &[ElementInfo] = &[
    E::new("actor", &["Reference"]).repeating().summary().targets(&[
        "Device",
        "Group",
        "CareTeam",
        "Organization",
        "Patient",
        "Practitioner",
        "RelatedPerson",
        "PractitionerRole",
    ]),
    E::new("action", &["CodeableConcept"]).repeating().summary().bound(
        "ProcessingActivityAction",
        Example,
        Some("http://hl7.org/fhir/ValueSet/consent-action"),
        Some("Detailed codes for the action."),
    ),
    E::new("purpose", &["CodeableConcept"]).repeating().summary().bound(
        "PurposeOfUse",
        Preferred,
        Some("http://terminology.hl7.org/ValueSet/v3-PurposeOfUse"),
        Some("What purposes of use are controlled by this exception. If more than one label is specified, operations must have all the specified labels."),
    ),
];

const PERMISSION_CONSTRAINTS: &[Constraint] = &[warning(
    "permission-0",
    "rule.activity.purpose",
    "SHOULD contain a code from value set http://terminology.hl7.org/ValueSet/v3-PurposeOfUse",
    "$this.memberOf('http://terminology.hl7.org/ValueSet/v3-PurposeOfUse', 'preferred')",
    "http://hl7.org/fhir/StructureDefinition/Permission",
)];

// Specimen

const SPECIMEN: &[ElementInfo] = &[
    E::new("identifier", &["Identifier"]).repeating().summary(),
    E::new("accessionIdentifier", &["Identifier"]).summary(),
    E::new("status", &["code"]).summary().bound(
        "SpecimenStatus",
        Required,
        Some("http://hl7.org/fhir/ValueSet/specimen-status|5.0.0"),
        Some("Codes providing the status/availability of a specimen."),
    ),
    E::new("type", &["CodeableConcept"]).summary().bound(
        "SpecimenType",
        Example,
        Some("http://terminology.hl7.org/ValueSet/v2-0487"),
        Some("The type of the specimen."),
    ),
    E::new("subject", &["Reference"]).summary().targets(&[
        "Patient",
        "Group",
        "Device",
        "BiologicallyDerivedProduct",
        "Substance",
        "Location",
    ]),
    E::new("receivedTime", &["dateTime"]).summary(),
    E::new("parent", &["Reference"]).repeating().targets(&["Specimen"]),
    E::new("request", &["Reference"]).repeating().targets(&["ServiceRequest"]),
    E::new("combined", &["code"]).summary().bound(
        "SpecimenCombined",
        Required,
        Some("http://hl7.org/fhir/ValueSet/specimen-combined|5.0.0"),
        Some("Codes for the combined status of a specimen."),
    ),
    E::new("role", &["CodeableConcept"]).repeating().bound(
        "SpecimenRole",
        Preferred,
        Some("http://hl7.org/fhir/ValueSet/specimen-role"),
        Some("Codes describing specimen role."),
    ),
    E::new("feature", &["BackboneElement"]).repeating(),
    E::new("collection", &["BackboneElement"]),
    E::new("processing", &["BackboneElement"]).repeating(),
    E::new("container", &["BackboneElement"]).repeating(),
    E::new("condition", &["CodeableConcept"]).repeating().summary().bound(
        "SpecimenCondition",
        Extensible,
        Some("http://terminology.hl7.org/ValueSet/v2-0493"),
        Some("Codes describing the state of the specimen."),
    ),
    E::new("note", &["Annotation"]).repeating(),
];

const SPECIMEN_FEATURE: &[ElementInfo] = &[
    E::new("type", &["CodeableConcept"])
        .required()
        .bound("SpecimenFeatureType", Example, BODY_SITE_VS, BODY_SITE_DESC),
    E::new("description", &["string"]).required(),
];

const SPECIMEN_COLLECTION: &[ElementInfo] = &[
    E::new("collector", &["Reference"]).summary().targets(&[
        "Practitioner",
        "PractitionerRole",
        "Patient",
        "RelatedPerson",
    ]),
    E::new("collected", &["dateTime", "Period"]).summary(),
    E::new("duration", &["Duration"]).summary(),
    E::new("quantity", &["Quantity"]),
    E::new("method", &["CodeableConcept"]).bound(
        "SpecimenCollectionMethod",
        Example,
        Some("http://hl7.org/fhir/ValueSet/specimen-collection-method"),
        Some("The technique that is used to perform the procedure."),
    ),
    E::new("device", &["CodeableReference"]).targets(&["Device"]).bound(
        "SpecimenCollectionDevice",
        Example,
        None,
        Some("The device that was used to obtain the specimen (e.g. a catheter or catheter part used to draw the blood via a central line)."),
    ),
    E::new("procedure", &["Reference"]).targets(&["Procedure"]),
    E::new("bodySite", &["CodeableReference"])
        .targets(&["BodyStructure"])
        .bound("BodySite", Example, BODY_SITE_VS, BODY_SITE_DESC),
    E::new("fastingStatus", &["CodeableConcept", "Duration"]).summary().bound(
        "FastingStatus",
        Extensible,
        Some("http://terminology.hl7.org/ValueSet/v2-0916"),
        Some("Codes describing the fasting status of the patient."),
    ),
];

const SPECIMEN_PROCESSING: &[ElementInfo] = &[
    E::new("description", &["string"]),
    E::new("method", &["CodeableConcept"]).bound(
        "SpecimenProcessingMethod",
        Example,
        Some("http://hl7.org/fhir/ValueSet/specimen-processing-method"),
        Some("Type indicating the technique used to process the specimen."),
    ),
    E::new("additive", &["Reference"]).repeating().targets(&["Substance"]),
    E::new("time", &["dateTime", "Period"]),
];

const SPECIMEN_CONTAINER: &[ElementInfo] = &[
    E::new("device", &["Reference"]).required().targets(&["Device"]),
    E::new("location", &["Reference"]).targets(&["Location"]),
    E::new("specimenQuantity", &["Quantity"]),
];

const SPECIMEN_SD: &str = "http://hl7.org/fhir/StructureDefinition/Specimen";

const SPECIMEN_CONSTRAINTS: &[Constraint] = &[
    warning(
        "specimen-0",
        "(base)",
        "SHOULD contain a code from value set http://hl7.org/fhir/ValueSet/specimen-role",
        "role.exists() implies (role.all(memberOf('http://hl7.org/fhir/ValueSet/specimen-role', 'preferred')))",
        SPECIMEN_SD,
    ),
    warning(
        "specimen-1",
        "collection.fastingStatus",
        "SHALL, if possible, contain a code from value set http://terminology.hl7.org/ValueSet/v2-0916",
        "$this.as(CodeableConcept).memberOf('http://terminology.hl7.org/ValueSet/v2-0916', 'extensible')",
        SPECIMEN_SD,
    ),
    warning(
        "specimen-2",
        "(base)",
        "SHALL, if possible, contain a code from value set http://terminology.hl7.org/ValueSet/v2-0493",
        "condition.exists() implies (condition.all(memberOf('http://terminology.hl7.org/ValueSet/v2-0493', 'extensible')))",
        SPECIMEN_SD,
    ),
];

const TRIAL_USE: StandardsStatus = StandardsStatus::TrialUse;

static TYPES: phf::Map<&'static str, TypeInfo> = phf_map! {
    "Element" => base_type("Element", None, ELEMENT),
    "BackboneElement" => base_type("BackboneElement", Some("Element"), BACKBONE_ELEMENT),
    "Resource" => base_type("Resource", None, RESOURCE),
    "DomainResource" => base_type("DomainResource", Some("Resource"), DOMAIN_RESOURCE),

    "Extension" => data_type("Extension", EXTENSION),
    "Coding" => data_type("Coding", CODING),
    "CodeableConcept" => data_type("CodeableConcept", CODEABLE_CONCEPT),
    "CodeableReference" => data_type("CodeableReference", CODEABLE_REFERENCE),
    "Reference" => data_type("Reference", REFERENCE),
    "Identifier" => data_type("Identifier", IDENTIFIER),
    "Period" => data_type("Period", PERIOD),
    "Quantity" => data_type("Quantity", QUANTITY),
    "Duration" => data_type("Duration", QUANTITY),
    "Money" => data_type("Money", MONEY),
    "Annotation" => data_type("Annotation", ANNOTATION),
    "Expression" => data_type("Expression", EXPRESSION),
    "Meta" => data_type("Meta", META),
    "Narrative" => data_type("Narrative", NARRATIVE),

    "Coverage" => resource(
        "Coverage",
        COVERAGE,
        COVERAGE_CONSTRAINTS,
        Maturity { level: 4, status: TRIAL_USE },
    ),
    "Coverage.paymentBy" => backbone("Coverage.paymentBy", COVERAGE_PAYMENT_BY),
    "Coverage.class" => backbone("Coverage.class", COVERAGE_CLASS),
    "Coverage.costToBeneficiary" => backbone("Coverage.costToBeneficiary", COVERAGE_COST_TO_BENEFICIARY),
    "Coverage.costToBeneficiary.exception" => backbone(
        "Coverage.costToBeneficiary.exception",
        COVERAGE_COST_TO_BENEFICIARY_EXCEPTION,
    ),

    "ImagingSelection" => resource(
        "ImagingSelection",
        IMAGING_SELECTION,
        IMAGING_SELECTION_CONSTRAINTS,
        Maturity { level: 1, status: TRIAL_USE },
    ),
    "ImagingSelection.performer" => backbone("ImagingSelection.performer", IMAGING_SELECTION_PERFORMER),
    "ImagingSelection.instance" => backbone("ImagingSelection.instance", IMAGING_SELECTION_INSTANCE),
    "ImagingSelection.instance.imageRegion2D" => backbone(
        "ImagingSelection.instance.imageRegion2D",
        IMAGING_SELECTION_IMAGE_REGION_2D,
    ),
    "ImagingSelection.instance.imageRegion3D" => backbone(
        "ImagingSelection.instance.imageRegion3D",
        IMAGING_SELECTION_IMAGE_REGION_3D,
    ),

    "Permission" => resource(
        "Permission",
        PERMISSION,
        PERMISSION_CONSTRAINTS,
        Maturity { level: 0, status: TRIAL_USE },
    ),
    "Permission.justification" => backbone("Permission.justification", PERMISSION_JUSTIFICATION),
    "Permission.rule" => backbone("Permission.rule", PERMISSION_RULE),
    "Permission.rule.data" => backbone("Permission.rule.data", PERMISSION_RULE_DATA),
    "Permission.rule.data.resource" => backbone("Permission.rule.data.resource", PERMISSION_RULE_DATA_RESOURCE),
    "Permission.rule.activity" => backbone("Permission.rule.activity", PERMISSION_RULE_ACTIVITY),

    "Specimen" => resource(
        "Specimen",
        SPECIMEN,
        SPECIMEN_CONSTRAINTS,
        Maturity { level: 2, status: TRIAL_USE },
    ),
    "Specimen.feature" => backbone("Specimen.feature", SPECIMEN_FEATURE),
    "Specimen.collection" => backbone("Specimen.collection", SPECIMEN_COLLECTION),
    "Specimen.processing" => backbone("Specimen.processing", SPECIMEN_PROCESSING),
    "Specimen.container" => backbone("Specimen.container", SPECIMEN_CONTAINER),
};

/// Abstract resource types; every other member of [`RESOURCE_TYPES`] is concrete
static ABSTRACT_RESOURCE_TYPES: phf::Set<&'static str> = phf_set! {
    "Resource",
    "DomainResource",
    "CanonicalResource",
    "MetadataResource",
};

/// Every FHIR R5 resource type name, modelled or not
static RESOURCE_TYPES: phf::Set<&'static str> = phf_set! {
    "Resource", "DomainResource", "CanonicalResource", "MetadataResource",
    "Account", "ActivityDefinition", "ActorDefinition", "AdministrableProductDefinition",
    "AdverseEvent", "AllergyIntolerance", "Appointment", "AppointmentResponse",
    "ArtifactAssessment", "AuditEvent", "Basic", "Binary", "BiologicallyDerivedProduct",
    "BiologicallyDerivedProductDispense", "BodyStructure", "Bundle", "CapabilityStatement",
    "CarePlan", "CareTeam", "ChargeItem", "ChargeItemDefinition", "Citation", "Claim",
    "ClaimResponse", "ClinicalImpression", "ClinicalUseDefinition", "CodeSystem",
    "Communication", "CommunicationRequest", "CompartmentDefinition", "Composition",
    "ConceptMap", "Condition", "ConditionDefinition", "Consent", "Contract", "Coverage",
    "CoverageEligibilityRequest", "CoverageEligibilityResponse", "DetectedIssue", "Device",
    "DeviceAssociation", "DeviceDefinition", "DeviceDispense", "DeviceMetric",
    "DeviceRequest", "DeviceUsage", "DiagnosticReport", "DocumentReference", "Encounter",
    "EncounterHistory", "Endpoint", "EnrollmentRequest", "EnrollmentResponse",
    "EpisodeOfCare", "EventDefinition", "Evidence", "EvidenceReport", "EvidenceVariable",
    "ExampleScenario", "ExplanationOfBenefit", "FamilyMemberHistory", "Flag",
    "FormularyItem", "GenomicStudy", "Goal", "GraphDefinition", "Group", "GuidanceResponse",
    "HealthcareService", "ImagingSelection", "ImagingStudy", "Immunization",
    "ImmunizationEvaluation", "ImmunizationRecommendation", "ImplementationGuide",
    "Ingredient", "InsurancePlan", "InventoryItem", "InventoryReport", "Invoice", "Library",
    "Linkage", "List", "Location", "ManufacturedItemDefinition", "Measure", "MeasureReport",
    "Medication", "MedicationAdministration", "MedicationDispense", "MedicationKnowledge",
    "MedicationRequest", "MedicationStatement", "MedicinalProductDefinition",
    "MessageDefinition", "MessageHeader", "MolecularSequence", "NamingSystem",
    "NutritionIntake", "NutritionOrder", "NutritionProduct", "Observation",
    "ObservationDefinition", "OperationDefinition", "OperationOutcome", "Organization",
    "OrganizationAffiliation", "PackagedProductDefinition", "Parameters", "Patient",
    "PaymentNotice", "PaymentReconciliation", "Permission", "Person", "PlanDefinition",
    "Practitioner", "PractitionerRole", "Procedure", "Provenance", "Questionnaire",
    "QuestionnaireResponse", "RegulatedAuthorization", "RelatedPerson",
    "RequestOrchestration", "Requirements", "ResearchStudy", "ResearchSubject",
    "RiskAssessment", "Schedule", "SearchParameter", "ServiceRequest", "Slot", "Specimen",
    "SpecimenDefinition", "StructureDefinition", "StructureMap", "Subscription",
    "SubscriptionStatus", "SubscriptionTopic", "Substance", "SubstanceDefinition",
    "SubstanceNucleicAcid", "SubstancePolymer", "SubstanceProtein",
    "SubstanceReferenceInformation", "SubstanceSourceMaterial", "SupplyDelivery",
    "SupplyRequest", "Task", "TerminologyCapabilities", "TestPlan", "TestReport",
    "TestScript", "Transport", "ValueSet", "VerificationResult", "VisionPrescription",
};

/// Metadata of a registered type or backbone path
pub fn type_info(type_name: &str) -> Option<&'static TypeInfo> {
    TYPES.get(type_name)
}

/// Iterates a type followed by its bases, most derived first
fn lineage(type_name: &str) -> impl Iterator<Item = &'static TypeInfo> {
    std::iter::successors(type_info(type_name), |info| info.base.and_then(type_info))
}

/// Definition of `element_name` on `type_name` or one of its bases
///
/// Choice elements are looked up without their type suffix (`collected`, not
/// `collectedDateTime`); see [`choice_element_info`] for the suffixed form.
pub fn element_info(type_name: &str, element_name: &str) -> Option<&'static ElementInfo> {
    lineage(type_name).find_map(|info| info.elements.iter().find(|e| e.name == element_name))
}

/// Names of every element of a type, inherited elements first
pub fn element_names(type_name: &str) -> Vec<&'static str> {
    let chain: Vec<_> = lineage(type_name).collect();
    let mut names = Vec::new();
    for info in chain.iter().rev() {
        for element in info.elements {
            // DomainResource redeclares nothing, but Element and Resource both have `id`
            if !names.contains(&element.name) {
                names.push(element.name);
            }
        }
    }
    names
}

/// Every element definition of a type, inherited elements first
pub fn elements(type_name: &str) -> Vec<&'static ElementInfo> {
    let chain: Vec<_> = lineage(type_name).collect();
    let mut elements: Vec<&'static ElementInfo> = Vec::new();
    for info in chain.iter().rev() {
        for element in info.elements {
            if !elements.iter().any(|e| e.name == element.name) {
                elements.push(element);
            }
        }
    }
    elements
}

/// Whether `name` is an R5 resource type, abstract types included
pub fn is_resource_type(name: &str) -> bool {
    RESOURCE_TYPES.contains(name)
}

/// Whether `name` is an R5 resource type that can be instantiated
pub fn is_concrete_resource_type(name: &str) -> bool {
    is_resource_type(name) && !ABSTRACT_RESOURCE_TYPES.contains(name)
}

pub fn is_choice_element(type_name: &str, element_name: &str) -> bool {
    element_info(type_name, element_name).is_some_and(|e| e.choice)
}

/// Type-suffixed name of a choice element: `fastingStatus` + `Duration` gives
/// `fastingStatusDuration`
pub fn choice_element_name(element_name: &str, type_code: &str) -> String {
    let mut chars = type_code.chars();
    match chars.next() {
        Some(first) => format!("{element_name}{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => element_name.to_string(),
    }
}

/// Resolves a type-suffixed JSON name (`collectedDateTime`) to the choice element and the
/// chosen type code (`dateTime`)
pub fn choice_element_info(
    type_name: &str,
    json_name: &str,
) -> Option<(&'static ElementInfo, &'static str)> {
    lineage(type_name)
        .flat_map(|info| info.elements.iter())
        .filter(|element| element.choice && json_name.starts_with(element.name))
        .find_map(|element| {
            element
                .types
                .iter()
                .find(|type_code| choice_element_name(element.name, type_code) == json_name)
                .map(|type_code| (element, *type_code))
        })
}

pub fn is_required_element(type_name: &str, element_name: &str) -> bool {
    element_info(type_name, element_name).is_some_and(|e| e.required)
}

pub fn is_summary_element(type_name: &str, element_name: &str) -> bool {
    element_info(type_name, element_name).is_some_and(|e| e.summary)
}

pub fn is_repeating_element(type_name: &str, element_name: &str) -> bool {
    element_info(type_name, element_name).is_some_and(|e| e.repeating)
}

/// Resource types a Reference element may point at; empty for non-reference elements
pub fn reference_target_types(type_name: &str, element_name: &str) -> &'static [&'static str] {
    element_info(type_name, element_name)
        .map(|e| e.reference_targets)
        .unwrap_or(&[])
}

/// Constraints declared on a resource (not evaluated)
pub fn constraints(type_name: &str) -> &'static [Constraint] {
    type_info(type_name).map(|info| info.constraints).unwrap_or(&[])
}

pub fn maturity(type_name: &str) -> Option<Maturity> {
    type_info(type_name).and_then(|info| info.maturity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_types() {
        assert!(is_resource_type("Patient"));
        assert!(is_resource_type("DomainResource"));
        assert!(!is_resource_type("patient"));
        assert!(!is_resource_type("CodeableConcept"));

        assert!(is_concrete_resource_type("Specimen"));
        assert!(!is_concrete_resource_type("DomainResource"));
        assert_eq!(RESOURCE_TYPES.len() - ABSTRACT_RESOURCE_TYPES.len(), 158);
    }

    #[test]
    fn test_element_lookup_walks_bases() {
        let id = element_info("Specimen", "id").unwrap();
        assert_eq!(id.types, &["id"]);
        assert!(id.summary);

        let modifier = element_info("Specimen.collection", "modifierExtension").unwrap();
        assert!(modifier.repeating);

        assert_eq!(element_info("Coverage.class", "id").unwrap().types, &["string"]);
        assert!(element_info("Specimen", "collectedDateTime").is_none());
    }

    #[test]
    fn test_element_names_order() {
        let names = element_names("Coverage.paymentBy");
        assert_eq!(names, vec!["id", "extension", "modifierExtension", "party", "responsibility"]);

        let names = element_names("Permission");
        assert_eq!(&names[..4], &["id", "meta", "implicitRules", "language"]);
        assert_eq!(names.last(), Some(&"rule"));
    }

    #[test]
    fn test_choice_elements() {
        assert!(is_choice_element("Specimen.collection", "collected"));
        assert!(!is_choice_element("Specimen.collection", "duration"));
        assert_eq!(choice_element_name("collected", "dateTime"), "collectedDateTime");

        let (element, type_code) =
            choice_element_info("Specimen.collection", "fastingStatusCodeableConcept").unwrap();
        assert_eq!(element.name, "fastingStatus");
        assert_eq!(type_code, "CodeableConcept");

        let (element, type_code) = choice_element_info("Extension", "valueString").unwrap();
        assert_eq!(element.name, "value");
        assert_eq!(type_code, "string");

        assert!(choice_element_info("Specimen.collection", "collectedInstant").is_none());
        assert_eq!(
            element_info("Coverage.costToBeneficiary", "value").unwrap().choice_name("Money"),
            Some("valueMoney".to_string())
        );
    }

    #[test]
    fn test_flags_and_targets() {
        assert!(is_required_element("Coverage", "beneficiary"));
        assert!(!is_required_element("Specimen", "status"));
        assert!(is_summary_element("ImagingSelection", "code"));
        assert!(is_repeating_element("ImagingSelection.instance.imageRegion2D", "coordinate"));
        assert_eq!(reference_target_types("Specimen.container", "device"), &["Device"]);
        assert!(reference_target_types("Specimen", "status").is_empty());
    }

    #[test]
    fn test_bindings() {
        let binding = element_info("Permission", "combining").unwrap().binding.unwrap();
        assert_eq!(binding.strength, BindingStrength::Required);
        assert_eq!(
            binding.value_set,
            Some("http://hl7.org/fhir/ValueSet/permission-rule-combining|5.0.0")
        );
    }

    #[test]
    fn test_constraints_and_maturity() {
        let ids: Vec<_> = constraints("Coverage").iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["coverage-0", "coverage-1", "coverage-2", "coverage-3"]);
        assert!(constraints("Specimen.feature").is_empty());

        let maturity = maturity("Coverage").unwrap();
        assert_eq!(maturity.level, 4);
        assert_eq!(maturity.status, StandardsStatus::TrialUse);
        assert!(super::maturity("Coding").is_none());
    }
}
