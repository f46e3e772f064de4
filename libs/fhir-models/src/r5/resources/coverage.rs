//! Coverage: insurance or medical plan or a payment agreement

use super::DomainResource;
use crate::error::{Error, Result};
use crate::r5::codes::{CoverageKind, CoverageStatus};
use crate::r5::datatypes::{
    CodeableConcept, Extension, Identifier, Money, Period, Reference, SimpleQuantity,
};
use crate::r5::primitives::PositiveInt;
use crate::r5::validation;
use crate::r5::visitor::{accept_list, accept_optional, walk, Visitable, Visitor};
use serde::{Deserialize, Serialize};

/// Insurance or medical plan or a payment agreement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    #[serde(flatten)]
    base: DomainResource,

    /// Business identifier(s) for this coverage
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    identifier: Vec<Identifier>,

    /// active | cancelled | draft | entered-in-error
    status: CoverageStatus,

    /// insurance | self-pay | other
    kind: CoverageKind,

    /// Self-pay parties and responsibility
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    payment_by: Vec<CoveragePaymentBy>,

    /// Coverage category such as medical or accident
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<CodeableConcept>,

    /// Owner of the policy
    #[serde(skip_serializing_if = "Option::is_none")]
    policy_holder: Option<Reference>,

    /// Subscriber to the policy
    #[serde(skip_serializing_if = "Option::is_none")]
    subscriber: Option<Reference>,

    /// ID assigned to the subscriber
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    subscriber_id: Vec<Identifier>,

    /// Plan beneficiary
    beneficiary: Reference,

    /// Dependent number
    #[serde(skip_serializing_if = "Option::is_none")]
    dependent: Option<String>,

    /// Beneficiary relationship to the subscriber
    #[serde(skip_serializing_if = "Option::is_none")]
    relationship: Option<CodeableConcept>,

    /// Coverage start and end dates
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<Period>,

    /// Issuer of the policy
    #[serde(skip_serializing_if = "Option::is_none")]
    insurer: Option<Reference>,

    /// Additional coverage classifications
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    class: Vec<CoverageClass>,

    /// Relative order of the coverage
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<PositiveInt>,

    /// Insurer network
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<String>,

    /// Patient payments for services/products
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    cost_to_beneficiary: Vec<CoverageCostToBeneficiary>,

    /// Reimbursement to insurer
    #[serde(skip_serializing_if = "Option::is_none")]
    subrogation: Option<bool>,

    /// Contract details
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    contract: Vec<Reference>,

    /// Insurance plan details
    #[serde(skip_serializing_if = "Option::is_none")]
    insurance_plan: Option<Reference>,
}

impl Coverage {
    pub fn builder() -> CoverageBuilder {
        CoverageBuilder::default()
    }

    pub fn to_builder(&self) -> CoverageBuilder {
        CoverageBuilder {
            base: self.base.clone(),
            identifier: self.identifier.clone(),
            status: Some(self.status),
            kind: Some(self.kind),
            payment_by: self.payment_by.clone(),
            type_: self.type_.clone(),
            policy_holder: self.policy_holder.clone(),
            subscriber: self.subscriber.clone(),
            subscriber_id: self.subscriber_id.clone(),
            beneficiary: Some(self.beneficiary.clone()),
            dependent: self.dependent.clone(),
            relationship: self.relationship.clone(),
            period: self.period.clone(),
            insurer: self.insurer.clone(),
            class: self.class.clone(),
            order: self.order,
            network: self.network.clone(),
            cost_to_beneficiary: self.cost_to_beneficiary.clone(),
            subrogation: self.subrogation,
            contract: self.contract.clone(),
            insurance_plan: self.insurance_plan.clone(),
            skip_validation: false,
        }
    }

    domain_resource_getters!();

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    pub fn status(&self) -> &CoverageStatus {
        &self.status
    }

    pub fn kind(&self) -> &CoverageKind {
        &self.kind
    }

    pub fn payment_by(&self) -> &[CoveragePaymentBy] {
        &self.payment_by
    }

    pub fn type_(&self) -> Option<&CodeableConcept> {
        self.type_.as_ref()
    }

    pub fn policy_holder(&self) -> Option<&Reference> {
        self.policy_holder.as_ref()
    }

    pub fn subscriber(&self) -> Option<&Reference> {
        self.subscriber.as_ref()
    }

    pub fn subscriber_id(&self) -> &[Identifier] {
        &self.subscriber_id
    }

    pub fn beneficiary(&self) -> &Reference {
        &self.beneficiary
    }

    pub fn dependent(&self) -> Option<&str> {
        self.dependent.as_deref()
    }

    pub fn relationship(&self) -> Option<&CodeableConcept> {
        self.relationship.as_ref()
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }

    pub fn insurer(&self) -> Option<&Reference> {
        self.insurer.as_ref()
    }

    pub fn class(&self) -> &[CoverageClass] {
        &self.class
    }

    pub fn order(&self) -> Option<&PositiveInt> {
        self.order.as_ref()
    }

    pub fn network(&self) -> Option<&str> {
        self.network.as_deref()
    }

    pub fn cost_to_beneficiary(&self) -> &[CoverageCostToBeneficiary] {
        &self.cost_to_beneficiary
    }

    pub fn subrogation(&self) -> Option<bool> {
        self.subrogation
    }

    pub fn contract(&self) -> &[Reference] {
        &self.contract
    }

    pub fn insurance_plan(&self) -> Option<&Reference> {
        self.insurance_plan.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct CoverageBuilder {
    base: DomainResource,
    identifier: Vec<Identifier>,
    status: Option<CoverageStatus>,
    kind: Option<CoverageKind>,
    payment_by: Vec<CoveragePaymentBy>,
    type_: Option<CodeableConcept>,
    policy_holder: Option<Reference>,
    subscriber: Option<Reference>,
    subscriber_id: Vec<Identifier>,
    beneficiary: Option<Reference>,
    dependent: Option<String>,
    relationship: Option<CodeableConcept>,
    period: Option<Period>,
    insurer: Option<Reference>,
    class: Vec<CoverageClass>,
    order: Option<PositiveInt>,
    network: Option<String>,
    cost_to_beneficiary: Vec<CoverageCostToBeneficiary>,
    subrogation: Option<bool>,
    contract: Vec<Reference>,
    insurance_plan: Option<Reference>,
    skip_validation: bool,
}

impl CoverageBuilder {
    domain_resource_builder_methods!();

    pub fn identifier(mut self, identifier: Identifier) -> Self {
        self.identifier.push(identifier);
        self
    }

    pub fn set_identifier(mut self, identifier: impl IntoIterator<Item = Identifier>) -> Self {
        self.identifier = identifier.into_iter().collect();
        self
    }

    pub fn status(mut self, status: CoverageStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn kind(mut self, kind: CoverageKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn payment_by(mut self, payment_by: CoveragePaymentBy) -> Self {
        self.payment_by.push(payment_by);
        self
    }

    pub fn set_payment_by(mut self, payment_by: impl IntoIterator<Item = CoveragePaymentBy>) -> Self {
        self.payment_by = payment_by.into_iter().collect();
        self
    }

    pub fn type_(mut self, type_: CodeableConcept) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn policy_holder(mut self, policy_holder: Reference) -> Self {
        self.policy_holder = Some(policy_holder);
        self
    }

    pub fn subscriber(mut self, subscriber: Reference) -> Self {
        self.subscriber = Some(subscriber);
        self
    }

    pub fn subscriber_id(mut self, subscriber_id: Identifier) -> Self {
        self.subscriber_id.push(subscriber_id);
        self
    }

    pub fn set_subscriber_id(mut self, subscriber_id: impl IntoIterator<Item = Identifier>) -> Self {
        self.subscriber_id = subscriber_id.into_iter().collect();
        self
    }

    pub fn beneficiary(mut self, beneficiary: Reference) -> Self {
        self.beneficiary = Some(beneficiary);
        self
    }

    pub fn dependent(mut self, dependent: impl Into<String>) -> Self {
        self.dependent = Some(dependent.into());
        self
    }

    pub fn relationship(mut self, relationship: CodeableConcept) -> Self {
        self.relationship = Some(relationship);
        self
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn insurer(mut self, insurer: Reference) -> Self {
        self.insurer = Some(insurer);
        self
    }

    pub fn class(mut self, class: CoverageClass) -> Self {
        self.class.push(class);
        self
    }

    pub fn set_class(mut self, class: impl IntoIterator<Item = CoverageClass>) -> Self {
        self.class = class.into_iter().collect();
        self
    }

    pub fn order(mut self, order: PositiveInt) -> Self {
        self.order = Some(order);
        self
    }

    pub fn network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    pub fn cost_to_beneficiary(mut self, cost: CoverageCostToBeneficiary) -> Self {
        self.cost_to_beneficiary.push(cost);
        self
    }

    pub fn set_cost_to_beneficiary(
        mut self,
        cost: impl IntoIterator<Item = CoverageCostToBeneficiary>,
    ) -> Self {
        self.cost_to_beneficiary = cost.into_iter().collect();
        self
    }

    pub fn subrogation(mut self, subrogation: bool) -> Self {
        self.subrogation = Some(subrogation);
        self
    }

    pub fn contract(mut self, contract: Reference) -> Self {
        self.contract.push(contract);
        self
    }

    pub fn set_contract(mut self, contract: impl IntoIterator<Item = Reference>) -> Self {
        self.contract = contract.into_iter().collect();
        self
    }

    pub fn insurance_plan(mut self, insurance_plan: Reference) -> Self {
        self.insurance_plan = Some(insurance_plan);
        self
    }

    pub fn build(self) -> Result<Coverage> {
        let coverage = Coverage {
            base: self.base,
            identifier: self.identifier,
            status: self.status.ok_or(Error::MissingElement("status"))?,
            kind: self.kind.ok_or(Error::MissingElement("kind"))?,
            payment_by: self.payment_by,
            type_: self.type_,
            policy_holder: self.policy_holder,
            subscriber: self.subscriber,
            subscriber_id: self.subscriber_id,
            beneficiary: self.beneficiary.ok_or(Error::MissingElement("beneficiary"))?,
            dependent: self.dependent,
            relationship: self.relationship,
            period: self.period,
            insurer: self.insurer,
            class: self.class,
            order: self.order,
            network: self.network,
            cost_to_beneficiary: self.cost_to_beneficiary,
            subrogation: self.subrogation,
            contract: self.contract,
            insurance_plan: self.insurance_plan,
        };
        if !self.skip_validation {
            coverage.validate()?;
        }
        Ok(coverage)
    }
}

impl Visitable for Coverage {
    fn type_name(&self) -> &'static str {
        "Coverage"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            self.base.accept_children(visitor);
            accept_list(&self.identifier, "identifier", visitor);
            self.status.accept("status", None, visitor);
            self.kind.accept("kind", None, visitor);
            accept_list(&self.payment_by, "paymentBy", visitor);
            accept_optional(self.type_.as_ref(), "type", visitor);
            accept_optional(self.policy_holder.as_ref(), "policyHolder", visitor);
            accept_optional(self.subscriber.as_ref(), "subscriber", visitor);
            accept_list(&self.subscriber_id, "subscriberId", visitor);
            self.beneficiary.accept("beneficiary", None, visitor);
            accept_optional(self.dependent.as_ref(), "dependent", visitor);
            accept_optional(self.relationship.as_ref(), "relationship", visitor);
            accept_optional(self.period.as_ref(), "period", visitor);
            accept_optional(self.insurer.as_ref(), "insurer", visitor);
            accept_list(&self.class, "class", visitor);
            accept_optional(self.order.as_ref(), "order", visitor);
            accept_optional(self.network.as_ref(), "network", visitor);
            accept_list(&self.cost_to_beneficiary, "costToBeneficiary", visitor);
            accept_optional(self.subrogation.as_ref(), "subrogation", visitor);
            accept_list(&self.contract, "contract", visitor);
            accept_optional(self.insurance_plan.as_ref(), "insurancePlan", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_reference_type(
            self.policy_holder.as_ref(),
            "policyHolder",
            &["Patient", "RelatedPerson", "Organization"],
        )?;
        validation::check_reference_type(
            self.subscriber.as_ref(),
            "subscriber",
            &["Patient", "RelatedPerson"],
        )?;
        validation::check_reference_type(Some(&self.beneficiary), "beneficiary", &["Patient"])?;
        validation::check_optional_string(self.dependent.as_deref(), "dependent")?;
        validation::check_reference_type(self.insurer.as_ref(), "insurer", &["Organization"])?;
        validation::check_optional_string(self.network.as_deref(), "network")?;
        validation::check_reference_types(&self.contract, "contract", &["Contract"])?;
        validation::check_reference_type(
            self.insurance_plan.as_ref(),
            "insurancePlan",
            &["InsurancePlan"],
        )
    }
}

/// Self-pay parties and responsibility
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoveragePaymentBy {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// Parties performing self-payment
    party: Reference,

    /// Party's responsibility
    #[serde(skip_serializing_if = "Option::is_none")]
    responsibility: Option<String>,
}

impl CoveragePaymentBy {
    pub fn builder() -> CoveragePaymentByBuilder {
        CoveragePaymentByBuilder::default()
    }

    pub fn to_builder(&self) -> CoveragePaymentByBuilder {
        CoveragePaymentByBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            party: Some(self.party.clone()),
            responsibility: self.responsibility.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn party(&self) -> &Reference {
        &self.party
    }

    pub fn responsibility(&self) -> Option<&str> {
        self.responsibility.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct CoveragePaymentByBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    party: Option<Reference>,
    responsibility: Option<String>,
    skip_validation: bool,
}

impl CoveragePaymentByBuilder {
    backbone_builder_methods!();

    pub fn party(mut self, party: Reference) -> Self {
        self.party = Some(party);
        self
    }

    pub fn responsibility(mut self, responsibility: impl Into<String>) -> Self {
        self.responsibility = Some(responsibility.into());
        self
    }

    pub fn build(self) -> Result<CoveragePaymentBy> {
        let payment_by = CoveragePaymentBy {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            party: self.party.ok_or(Error::MissingElement("party"))?,
            responsibility: self.responsibility,
        };
        if !self.skip_validation {
            payment_by.validate()?;
        }
        Ok(payment_by)
    }
}

impl Visitable for CoveragePaymentBy {
    fn type_name(&self) -> &'static str {
        "Coverage.paymentBy"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            self.party.accept("party", None, visitor);
            accept_optional(self.responsibility.as_ref(), "responsibility", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_reference_type(
            Some(&self.party),
            "party",
            &["Patient", "RelatedPerson", "Organization"],
        )?;
        validation::check_optional_string(self.responsibility.as_deref(), "responsibility")
    }
}

/// Additional coverage classifications
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageClass {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// Type of class such as 'group' or 'plan'
    #[serde(rename = "type")]
    type_: CodeableConcept,

    /// Value associated with the type
    value: Identifier,

    /// Human readable description of the type and value
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl CoverageClass {
    pub fn builder() -> CoverageClassBuilder {
        CoverageClassBuilder::default()
    }

    pub fn to_builder(&self) -> CoverageClassBuilder {
        CoverageClassBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            type_: Some(self.type_.clone()),
            value: Some(self.value.clone()),
            name: self.name.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn type_(&self) -> &CodeableConcept {
        &self.type_
    }

    pub fn value(&self) -> &Identifier {
        &self.value
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct CoverageClassBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    type_: Option<CodeableConcept>,
    value: Option<Identifier>,
    name: Option<String>,
    skip_validation: bool,
}

impl CoverageClassBuilder {
    backbone_builder_methods!();

    pub fn type_(mut self, type_: CodeableConcept) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn value(mut self, value: Identifier) -> Self {
        self.value = Some(value);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> Result<CoverageClass> {
        let class = CoverageClass {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            type_: self.type_.ok_or(Error::MissingElement("type"))?,
            value: self.value.ok_or(Error::MissingElement("value"))?,
            name: self.name,
        };
        if !self.skip_validation {
            class.validate()?;
        }
        Ok(class)
    }
}

impl Visitable for CoverageClass {
    fn type_name(&self) -> &'static str {
        "Coverage.class"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            self.type_.accept("type", None, visitor);
            self.value.accept("value", None, visitor);
            accept_optional(self.name.as_ref(), "name", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_optional_string(self.name.as_deref(), "name")
    }
}

choice_enum!(
    /// `Coverage.costToBeneficiary.value[x]`
    CoverageCostToBeneficiaryValue {
        Quantity(SimpleQuantity) => "valueQuantity",
        Money(Money) => "valueMoney",
    }
);

/// Patient payments for services/products
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageCostToBeneficiary {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// Cost category
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<CodeableConcept>,

    /// Benefit classification
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<CodeableConcept>,

    /// In or out of network
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<CodeableConcept>,

    /// Individual or family
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<CodeableConcept>,

    /// Annual or lifetime
    #[serde(skip_serializing_if = "Option::is_none")]
    term: Option<CodeableConcept>,

    #[serde(flatten, deserialize_with = "CoverageCostToBeneficiaryValue::deserialize_flattened")]
    value: Option<CoverageCostToBeneficiaryValue>,

    /// Exceptions for patient payments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    exception: Vec<CoverageCostToBeneficiaryException>,
}

impl CoverageCostToBeneficiary {
    pub fn builder() -> CoverageCostToBeneficiaryBuilder {
        CoverageCostToBeneficiaryBuilder::default()
    }

    pub fn to_builder(&self) -> CoverageCostToBeneficiaryBuilder {
        CoverageCostToBeneficiaryBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            type_: self.type_.clone(),
            category: self.category.clone(),
            network: self.network.clone(),
            unit: self.unit.clone(),
            term: self.term.clone(),
            value: self.value.clone(),
            exception: self.exception.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn type_(&self) -> Option<&CodeableConcept> {
        self.type_.as_ref()
    }

    pub fn category(&self) -> Option<&CodeableConcept> {
        self.category.as_ref()
    }

    pub fn network(&self) -> Option<&CodeableConcept> {
        self.network.as_ref()
    }

    pub fn unit(&self) -> Option<&CodeableConcept> {
        self.unit.as_ref()
    }

    pub fn term(&self) -> Option<&CodeableConcept> {
        self.term.as_ref()
    }

    /// The amount or percentage due from the beneficiary
    pub fn value(&self) -> Option<&CoverageCostToBeneficiaryValue> {
        self.value.as_ref()
    }

    pub fn exception(&self) -> &[CoverageCostToBeneficiaryException] {
        &self.exception
    }
}

#[derive(Debug, Default)]
pub struct CoverageCostToBeneficiaryBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    type_: Option<CodeableConcept>,
    category: Option<CodeableConcept>,
    network: Option<CodeableConcept>,
    unit: Option<CodeableConcept>,
    term: Option<CodeableConcept>,
    value: Option<CoverageCostToBeneficiaryValue>,
    exception: Vec<CoverageCostToBeneficiaryException>,
    skip_validation: bool,
}

impl CoverageCostToBeneficiaryBuilder {
    backbone_builder_methods!();

    pub fn type_(mut self, type_: CodeableConcept) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn category(mut self, category: CodeableConcept) -> Self {
        self.category = Some(category);
        self
    }

    pub fn network(mut self, network: CodeableConcept) -> Self {
        self.network = Some(network);
        self
    }

    pub fn unit(mut self, unit: CodeableConcept) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn term(mut self, term: CodeableConcept) -> Self {
        self.term = Some(term);
        self
    }

    pub fn value(mut self, value: CoverageCostToBeneficiaryValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn exception(mut self, exception: CoverageCostToBeneficiaryException) -> Self {
        self.exception.push(exception);
        self
    }

    pub fn set_exception(
        mut self,
        exception: impl IntoIterator<Item = CoverageCostToBeneficiaryException>,
    ) -> Self {
        self.exception = exception.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<CoverageCostToBeneficiary> {
        let cost = CoverageCostToBeneficiary {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            type_: self.type_,
            category: self.category,
            network: self.network,
            unit: self.unit,
            term: self.term,
            value: self.value,
            exception: self.exception,
        };
        if !self.skip_validation {
            cost.validate()?;
        }
        Ok(cost)
    }
}

impl Visitable for CoverageCostToBeneficiary {
    fn type_name(&self) -> &'static str {
        "Coverage.costToBeneficiary"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self, backbone)
            || self.type_.is_some()
            || self.category.is_some()
            || self.network.is_some()
            || self.unit.is_some()
            || self.term.is_some()
            || self.value.is_some()
            || !self.exception.is_empty()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            accept_optional(self.type_.as_ref(), "type", visitor);
            accept_optional(self.category.as_ref(), "category", visitor);
            accept_optional(self.network.as_ref(), "network", visitor);
            accept_optional(self.unit.as_ref(), "unit", visitor);
            accept_optional(self.term.as_ref(), "term", visitor);
            if let Some(value) = &self.value {
                value.as_visitable().accept("value", None, visitor);
            }
            accept_list(&self.exception, "exception", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        if let Some(CoverageCostToBeneficiaryValue::Quantity(quantity)) = &self.value {
            validation::check_simple_quantity(Some(quantity), "value")?;
        }
        validation::require_value_or_children(self.has_children(), "Coverage.costToBeneficiary")
    }
}

/// Exceptions for patient payments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageCostToBeneficiaryException {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// Exception category
    #[serde(rename = "type")]
    type_: CodeableConcept,

    /// The effective period of the exception
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<Period>,
}

impl CoverageCostToBeneficiaryException {
    pub fn builder() -> CoverageCostToBeneficiaryExceptionBuilder {
        CoverageCostToBeneficiaryExceptionBuilder::default()
    }

    pub fn to_builder(&self) -> CoverageCostToBeneficiaryExceptionBuilder {
        CoverageCostToBeneficiaryExceptionBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            type_: Some(self.type_.clone()),
            period: self.period.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn type_(&self) -> &CodeableConcept {
        &self.type_
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct CoverageCostToBeneficiaryExceptionBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    type_: Option<CodeableConcept>,
    period: Option<Period>,
    skip_validation: bool,
}

impl CoverageCostToBeneficiaryExceptionBuilder {
    backbone_builder_methods!();

    pub fn type_(mut self, type_: CodeableConcept) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn build(self) -> Result<CoverageCostToBeneficiaryException> {
        let exception = CoverageCostToBeneficiaryException {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            type_: self.type_.ok_or(Error::MissingElement("type"))?,
            period: self.period,
        };
        if !self.skip_validation {
            exception.validate()?;
        }
        Ok(exception)
    }
}

impl Visitable for CoverageCostToBeneficiaryException {
    fn type_name(&self) -> &'static str {
        "Coverage.costToBeneficiary.exception"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            self.type_.accept("type", None, visitor);
            accept_optional(self.period.as_ref(), "period", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r5::primitives::Code;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn reference(value: &str) -> Reference {
        Reference::builder().reference(value).build().unwrap()
    }

    fn concept(text: &str) -> CodeableConcept {
        CodeableConcept::builder().text(text).build().unwrap()
    }

    fn minimal() -> CoverageBuilder {
        Coverage::builder()
            .status(CoverageStatus::Active)
            .kind(CoverageKind::Insurance)
            .beneficiary(reference("Patient/4"))
    }

    #[test]
    fn test_required_elements() {
        let err = Coverage::builder()
            .kind(CoverageKind::Insurance)
            .beneficiary(reference("Patient/4"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingElement("status")));

        let err = Coverage::builder()
            .status(CoverageStatus::Active)
            .kind(CoverageKind::SelfPay)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingElement("beneficiary")));

        // required elements are enforced even without validation
        assert!(Coverage::builder().validating(false).build().is_err());
    }

    #[test]
    fn test_beneficiary_must_be_patient() {
        let err = Coverage::builder()
            .status(CoverageStatus::Active)
            .kind(CoverageKind::Insurance)
            .beneficiary(reference("Organization/o1"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceType { element: "beneficiary", .. }));
    }

    #[test]
    fn test_cost_to_beneficiary_money() {
        let cost = CoverageCostToBeneficiary::builder()
            .type_(concept("gpvisit"))
            .value(CoverageCostToBeneficiaryValue::Money(
                Money::builder()
                    .value(Decimal::new(2000, 2))
                    .currency(Code::new("USD").unwrap())
                    .build()
                    .unwrap(),
            ))
            .exception(
                CoverageCostToBeneficiaryException::builder()
                    .type_(concept("retired"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let coverage = minimal().cost_to_beneficiary(cost).build().unwrap();

        let value = serde_json::to_value(&coverage).unwrap();
        assert_eq!(value["costToBeneficiary"][0]["valueMoney"]["value"].to_string(), "20.00");
        assert_eq!(value["costToBeneficiary"][0]["exception"][0]["type"]["text"], "retired");
        assert_eq!(value["beneficiary"]["reference"], "Patient/4");
        assert_eq!(value["status"], "active");
    }

    #[test]
    fn test_cost_to_beneficiary_quantity_is_simple() {
        let quantity = SimpleQuantity::builder()
            .value(20)
            .comparator(crate::r5::codes::QuantityComparator::LessOrEqual)
            .unit("%")
            .build()
            .unwrap();
        let result = CoverageCostToBeneficiary::builder()
            .value(CoverageCostToBeneficiaryValue::Quantity(quantity))
            .build();
        assert!(matches!(result, Err(Error::SimpleQuantityComparator("value"))));
    }

    #[test]
    fn test_class_requires_type_and_value() {
        let err = CoverageClass::builder().type_(concept("group")).build().unwrap_err();
        assert!(matches!(err, Error::MissingElement("value")));

        let class = CoverageClass::builder()
            .type_(concept("group"))
            .value(Identifier::builder().value("CB135").build().unwrap())
            .name("Corporate Baker's Inc. Local #35")
            .build()
            .unwrap();
        let coverage = minimal().class(class.clone()).build().unwrap();
        assert_eq!(coverage.class(), &[class]);
    }

    #[test]
    fn test_payment_by_party() {
        let err = CoveragePaymentBy::builder()
            .party(reference("Device/d1"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceType { element: "party", .. }));
    }
}
