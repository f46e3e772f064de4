//! Permission: access rules for a set of data

use super::DomainResource;
use crate::error::{Error, Result};
use crate::r5::codes::{
    ConsentDataMeaning, ConsentProvisionType, PermissionRuleCombining, PermissionStatus,
};
use crate::r5::datatypes::{CodeableConcept, Coding, Expression, Extension, Period, Reference};
use crate::r5::primitives::DateTime;
use crate::r5::validation;
use crate::r5::visitor::{accept_list, accept_optional, walk, Visitable, Visitor};
use serde::{Deserialize, Serialize};

/// Permission resource holds access rules for a given data and context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(flatten)]
    base: DomainResource,

    /// active | entered-in-error | draft | rejected
    status: PermissionStatus,

    /// The person or entity that asserts the permission
    #[serde(skip_serializing_if = "Option::is_none")]
    asserter: Option<Reference>,

    /// The date that permission was asserted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    date: Vec<DateTime>,

    /// The period in which the permission is active
    #[serde(skip_serializing_if = "Option::is_none")]
    validity: Option<Period>,

    #[serde(skip_serializing_if = "Option::is_none")]
    justification: Option<PermissionJustification>,

    /// How the rules are to be combined
    combining: PermissionRuleCombining,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    rule: Vec<PermissionRule>,
}

impl Permission {
    pub fn builder() -> PermissionBuilder {
        PermissionBuilder::default()
    }

    pub fn to_builder(&self) -> PermissionBuilder {
        PermissionBuilder {
            base: self.base.clone(),
            status: Some(self.status),
            asserter: self.asserter.clone(),
            date: self.date.clone(),
            validity: self.validity.clone(),
            justification: self.justification.clone(),
            combining: Some(self.combining),
            rule: self.rule.clone(),
            skip_validation: false,
        }
    }

    domain_resource_getters!();

    pub fn status(&self) -> &PermissionStatus {
        &self.status
    }

    pub fn asserter(&self) -> Option<&Reference> {
        self.asserter.as_ref()
    }

    pub fn date(&self) -> &[DateTime] {
        &self.date
    }

    pub fn validity(&self) -> Option<&Period> {
        self.validity.as_ref()
    }

    pub fn justification(&self) -> Option<&PermissionJustification> {
        self.justification.as_ref()
    }

    pub fn combining(&self) -> &PermissionRuleCombining {
        &self.combining
    }

    /// Constraints to the Permission
    pub fn rule(&self) -> &[PermissionRule] {
        &self.rule
    }
}

#[derive(Debug, Default)]
pub struct PermissionBuilder {
    base: DomainResource,
    status: Option<PermissionStatus>,
    asserter: Option<Reference>,
    date: Vec<DateTime>,
    validity: Option<Period>,
    justification: Option<PermissionJustification>,
    combining: Option<PermissionRuleCombining>,
    rule: Vec<PermissionRule>,
    skip_validation: bool,
}

impl PermissionBuilder {
    domain_resource_builder_methods!();

    pub fn status(mut self, status: PermissionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn asserter(mut self, asserter: Reference) -> Self {
        self.asserter = Some(asserter);
        self
    }

    pub fn date(mut self, date: DateTime) -> Self {
        self.date.push(date);
        self
    }

    pub fn set_date(mut self, date: impl IntoIterator<Item = DateTime>) -> Self {
        self.date = date.into_iter().collect();
        self
    }

    pub fn validity(mut self, validity: Period) -> Self {
        self.validity = Some(validity);
        self
    }

    pub fn justification(mut self, justification: PermissionJustification) -> Self {
        self.justification = Some(justification);
        self
    }

    pub fn combining(mut self, combining: PermissionRuleCombining) -> Self {
        self.combining = Some(combining);
        self
    }

    pub fn rule(mut self, rule: PermissionRule) -> Self {
        self.rule.push(rule);
        self
    }

    pub fn set_rule(mut self, rule: impl IntoIterator<Item = PermissionRule>) -> Self {
        self.rule = rule.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<Permission> {
        let permission = Permission {
            base: self.base,
            status: self.status.ok_or(Error::MissingElement("status"))?,
            asserter: self.asserter,
            date: self.date,
            validity: self.validity,
            justification: self.justification,
            combining: self.combining.ok_or(Error::MissingElement("combining"))?,
            rule: self.rule,
        };
        if !self.skip_validation {
            permission.validate()?;
        }
        Ok(permission)
    }
}

impl Visitable for Permission {
    fn type_name(&self) -> &'static str {
        "Permission"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            self.base.accept_children(visitor);
            self.status.accept("status", None, visitor);
            accept_optional(self.asserter.as_ref(), "asserter", visitor);
            accept_list(&self.date, "date", visitor);
            accept_optional(self.validity.as_ref(), "validity", visitor);
            accept_optional(self.justification.as_ref(), "justification", visitor);
            self.combining.accept("combining", None, visitor);
            accept_list(&self.rule, "rule", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_reference_type(
            self.asserter.as_ref(),
            "asserter",
            &[
                "Practitioner",
                "PractitionerRole",
                "Organization",
                "CareTeam",
                "Patient",
                "RelatedPerson",
                "HealthcareService",
            ],
        )
    }
}

/// The asserted justification for using the data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionJustification {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// The regulatory grounds upon which this Permission builds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    basis: Vec<CodeableConcept>,

    /// Justifying rationale
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    evidence: Vec<Reference>,
}

impl PermissionJustification {
    pub fn builder() -> PermissionJustificationBuilder {
        PermissionJustificationBuilder::default()
    }

    pub fn to_builder(&self) -> PermissionJustificationBuilder {
        PermissionJustificationBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            basis: self.basis.clone(),
            evidence: self.evidence.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn basis(&self) -> &[CodeableConcept] {
        &self.basis
    }

    pub fn evidence(&self) -> &[Reference] {
        &self.evidence
    }
}

#[derive(Debug, Default)]
pub struct PermissionJustificationBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    basis: Vec<CodeableConcept>,
    evidence: Vec<Reference>,
    skip_validation: bool,
}

impl PermissionJustificationBuilder {
    backbone_builder_methods!();

    pub fn basis(mut self, basis: CodeableConcept) -> Self {
        self.basis.push(basis);
        self
    }

    pub fn set_basis(mut self, basis: impl IntoIterator<Item = CodeableConcept>) -> Self {
        self.basis = basis.into_iter().collect();
        self
    }

    pub fn evidence(mut self, evidence: Reference) -> Self {
        self.evidence.push(evidence);
        self
    }

    pub fn set_evidence(mut self, evidence: impl IntoIterator<Item = Reference>) -> Self {
        self.evidence = evidence.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<PermissionJustification> {
        let justification = PermissionJustification {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            basis: self.basis,
            evidence: self.evidence,
        };
        if !self.skip_validation {
            justification.validate()?;
        }
        Ok(justification)
    }
}

impl Visitable for PermissionJustification {
    fn type_name(&self) -> &'static str {
        "Permission.justification"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self, backbone) || !self.basis.is_empty() || !self.evidence.is_empty()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            accept_list(&self.basis, "basis", visitor);
            accept_list(&self.evidence, "evidence", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::require_value_or_children(self.has_children(), "Permission.justification")
    }
}

/// Constraints to the Permission
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// deny | permit
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<ConsentProvisionType>,

    /// The selection criteria to identify data that is within scope of this provision
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    data: Vec<PermissionRuleData>,

    /// A description or definition of which activities are allowed to be done on the data
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    activity: Vec<PermissionRuleActivity>,

    /// What limits apply to the use of the data
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    limit: Vec<CodeableConcept>,
}

impl PermissionRule {
    pub fn builder() -> PermissionRuleBuilder {
        PermissionRuleBuilder::default()
    }

    pub fn to_builder(&self) -> PermissionRuleBuilder {
        PermissionRuleBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            type_: self.type_,
            data: self.data.clone(),
            activity: self.activity.clone(),
            limit: self.limit.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn type_(&self) -> Option<&ConsentProvisionType> {
        self.type_.as_ref()
    }

    pub fn data(&self) -> &[PermissionRuleData] {
        &self.data
    }

    pub fn activity(&self) -> &[PermissionRuleActivity] {
        &self.activity
    }

    pub fn limit(&self) -> &[CodeableConcept] {
        &self.limit
    }
}

#[derive(Debug, Default)]
pub struct PermissionRuleBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    type_: Option<ConsentProvisionType>,
    data: Vec<PermissionRuleData>,
    activity: Vec<PermissionRuleActivity>,
    limit: Vec<CodeableConcept>,
    skip_validation: bool,
}

impl PermissionRuleBuilder {
    backbone_builder_methods!();

    pub fn type_(mut self, type_: ConsentProvisionType) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn data(mut self, data: PermissionRuleData) -> Self {
        self.data.push(data);
        self
    }

    pub fn set_data(mut self, data: impl IntoIterator<Item = PermissionRuleData>) -> Self {
        self.data = data.into_iter().collect();
        self
    }

    pub fn activity(mut self, activity: PermissionRuleActivity) -> Self {
        self.activity.push(activity);
        self
    }

    pub fn set_activity(mut self, activity: impl IntoIterator<Item = PermissionRuleActivity>) -> Self {
        self.activity = activity.into_iter().collect();
        self
    }

    pub fn limit(mut self, limit: CodeableConcept) -> Self {
        self.limit.push(limit);
        self
    }

    pub fn set_limit(mut self, limit: impl IntoIterator<Item = CodeableConcept>) -> Self {
        self.limit = limit.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<PermissionRule> {
        let rule = PermissionRule {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            type_: self.type_,
            data: self.data,
            activity: self.activity,
            limit: self.limit,
        };
        if !self.skip_validation {
            rule.validate()?;
        }
        Ok(rule)
    }
}

impl Visitable for PermissionRule {
    fn type_name(&self) -> &'static str {
        "Permission.rule"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self, backbone)
            || self.type_.is_some()
            || !self.data.is_empty()
            || !self.activity.is_empty()
            || !self.limit.is_empty()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            accept_optional(self.type_.as_ref(), "type", visitor);
            accept_list(&self.data, "data", visitor);
            accept_list(&self.activity, "activity", visitor);
            accept_list(&self.limit, "limit", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::require_value_or_children(self.has_children(), "Permission.rule")
    }
}

/// The selection criteria to identify data that is within scope of this provision
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRuleData {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// Explicit FHIR Resource references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    resource: Vec<PermissionRuleDataResource>,

    /// Security tag code on .meta.security
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    security: Vec<Coding>,

    /// Timeframe encompasing data create/update
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    period: Vec<Period>,

    /// Expression identifying the data
    #[serde(skip_serializing_if = "Option::is_none")]
    expression: Option<Expression>,
}

impl PermissionRuleData {
    pub fn builder() -> PermissionRuleDataBuilder {
        PermissionRuleDataBuilder::default()
    }

    pub fn to_builder(&self) -> PermissionRuleDataBuilder {
        PermissionRuleDataBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            resource: self.resource.clone(),
            security: self.security.clone(),
            period: self.period.clone(),
            expression: self.expression.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn resource(&self) -> &[PermissionRuleDataResource] {
        &self.resource
    }

    pub fn security(&self) -> &[Coding] {
        &self.security
    }

    pub fn period(&self) -> &[Period] {
        &self.period
    }

    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct PermissionRuleDataBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    resource: Vec<PermissionRuleDataResource>,
    security: Vec<Coding>,
    period: Vec<Period>,
    expression: Option<Expression>,
    skip_validation: bool,
}

impl PermissionRuleDataBuilder {
    backbone_builder_methods!();

    pub fn resource(mut self, resource: PermissionRuleDataResource) -> Self {
        self.resource.push(resource);
        self
    }

    pub fn set_resource(
        mut self,
        resource: impl IntoIterator<Item = PermissionRuleDataResource>,
    ) -> Self {
        self.resource = resource.into_iter().collect();
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

    pub fn period(mut self, period: Period) -> Self {
        self.period.push(period);
        self
    }

    pub fn set_period(mut self, period: impl IntoIterator<Item = Period>) -> Self {
        self.period = period.into_iter().collect();
        self
    }

    pub fn expression(mut self, expression: Expression) -> Self {
        self.expression = Some(expression);
        self
    }

    pub fn build(self) -> Result<PermissionRuleData> {
        let data = PermissionRuleData {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            resource: self.resource,
            security: self.security,
            period: self.period,
            expression: self.expression,
        };
        if !self.skip_validation {
            data.validate()?;
        }
        Ok(data)
    }
}

impl Visitable for PermissionRuleData {
    fn type_name(&self) -> &'static str {
        "Permission.rule.data"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self, backbone)
            || !self.resource.is_empty()
            || !self.security.is_empty()
            || !self.period.is_empty()
            || self.expression.is_some()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            accept_list(&self.resource, "resource", visitor);
            accept_list(&self.security, "security", visitor);
            accept_list(&self.period, "period", visitor);
            accept_optional(self.expression.as_ref(), "expression", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::require_value_or_children(self.has_children(), "Permission.rule.data")
    }
}

/// Explicit FHIR Resource references
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRuleDataResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// instance | related | dependents | authoredby
    meaning: ConsentDataMeaning,

    /// The actual data reference
    reference: Reference,
}

impl PermissionRuleDataResource {
    pub fn builder() -> PermissionRuleDataResourceBuilder {
        PermissionRuleDataResourceBuilder::default()
    }

    pub fn to_builder(&self) -> PermissionRuleDataResourceBuilder {
        PermissionRuleDataResourceBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            meaning: Some(self.meaning),
            reference: Some(self.reference.clone()),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn meaning(&self) -> &ConsentDataMeaning {
        &self.meaning
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }
}

#[derive(Debug, Default)]
pub struct PermissionRuleDataResourceBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    meaning: Option<ConsentDataMeaning>,
    reference: Option<Reference>,
    skip_validation: bool,
}

impl PermissionRuleDataResourceBuilder {
    backbone_builder_methods!();

    pub fn meaning(mut self, meaning: ConsentDataMeaning) -> Self {
        self.meaning = Some(meaning);
        self
    }

    pub fn reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn build(self) -> Result<PermissionRuleDataResource> {
        let resource = PermissionRuleDataResource {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            meaning: self.meaning.ok_or(Error::MissingElement("meaning"))?,
            reference: self.reference.ok_or(Error::MissingElement("reference"))?,
        };
        if !self.skip_validation {
            resource.validate()?;
        }
        Ok(resource)
    }
}

impl Visitable for PermissionRuleDataResource {
    fn type_name(&self) -> &'static str {
        "Permission.rule.data.resource"
    }

    fn has_children(&self) -> bool {
        true
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            self.meaning.accept("meaning", None, visitor);
            self.reference.accept("reference", None, visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")
    }
}

/// A description or definition of which activities are allowed to be done on the data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRuleActivity {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,

    /// Authorized actor(s)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    actor: Vec<Reference>,

    /// Actions controlled by this rule
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    action: Vec<CodeableConcept>,

    /// The purpose for which the permission is given
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    purpose: Vec<CodeableConcept>,
}

impl PermissionRuleActivity {
    pub fn builder() -> PermissionRuleActivityBuilder {
        PermissionRuleActivityBuilder::default()
    }

    pub fn to_builder(&self) -> PermissionRuleActivityBuilder {
        PermissionRuleActivityBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            modifier_extension: self.modifier_extension.clone(),
            actor: self.actor.clone(),
            action: self.action.clone(),
            purpose: self.purpose.clone(),
            skip_validation: false,
        }
    }

    backbone_getters!();

    pub fn actor(&self) -> &[Reference] {
        &self.actor
    }

    pub fn action(&self) -> &[CodeableConcept] {
        &self.action
    }

    pub fn purpose(&self) -> &[CodeableConcept] {
        &self.purpose
    }
}

#[derive(Debug, Default)]
pub struct PermissionRuleActivityBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    actor: Vec<Reference>,
    action: Vec<CodeableConcept>,
    purpose: Vec<CodeableConcept>,
    skip_validation: bool,
}

impl PermissionRuleActivityBuilder {
    backbone_builder_methods!();

    pub fn actor(mut self, actor: Reference) -> Self {
        self.actor.push(actor);
        self
    }

    pub fn set_actor(mut self, actor: impl IntoIterator<Item = Reference>) -> Self {
        self.actor = actor.into_iter().collect();
        self
    }

    pub fn action(mut self, action: CodeableConcept) -> Self {
        self.action.push(action);
        self
    }

    pub fn set_action(mut self, action: impl IntoIterator<Item = CodeableConcept>) -> Self {
        self.action = action.into_iter().collect();
        self
    }

    pub fn purpose(mut self, purpose: CodeableConcept) -> Self {
        self.purpose.push(purpose);
        self
    }

    pub fn set_purpose(mut self, purpose: impl IntoIterator<Item = CodeableConcept>) -> Self {
        self.purpose = purpose.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<PermissionRuleActivity> {
        let activity = PermissionRuleActivity {
            id: self.id,
            extension: self.extension,
            modifier_extension: self.modifier_extension,
            actor: self.actor,
            action: self.action,
            purpose: self.purpose,
        };
        if !self.skip_validation {
            activity.validate()?;
        }
        Ok(activity)
    }
}

impl Visitable for PermissionRuleActivity {
    fn type_name(&self) -> &'static str {
        "Permission.rule.activity"
    }

    fn has_children(&self) -> bool {
        element_has_children!(self, backbone)
            || !self.actor.is_empty()
            || !self.action.is_empty()
            || !self.purpose.is_empty()
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor, backbone);
            accept_list(&self.actor, "actor", visitor);
            accept_list(&self.action, "action", visitor);
            accept_list(&self.purpose, "purpose", visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        validation::check_reference_types(
            &self.actor,
            "actor",
            &[
                "Device",
                "Group",
                "CareTeam",
                "Organization",
                "Patient",
                "Practitioner",
                "RelatedPerson",
                "PractitionerRole",
            ],
        )?;
        validation::require_value_or_children(self.has_children(), "Permission.rule.activity")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference(value: &str) -> Reference {
        Reference::builder().reference(value).build().unwrap()
    }

    fn permit_rule() -> PermissionRule {
        PermissionRule::builder()
            .type_(ConsentProvisionType::Permit)
            .data(
                PermissionRuleData::builder()
                    .resource(
                        PermissionRuleDataResource::builder()
                            .meaning(ConsentDataMeaning::Dependents)
                            .reference(reference("Observation/o1"))
                            .build()
                            .unwrap(),
                    )
                    .build()
                    .unwrap(),
            )
            .activity(
                PermissionRuleActivity::builder()
                    .actor(reference("Practitioner/p1"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_required_elements() {
        let err = Permission::builder()
            .combining(PermissionRuleCombining::DenyOverrides)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingElement("status")));

        let err = Permission::builder().status(PermissionStatus::Active).build().unwrap_err();
        assert!(matches!(err, Error::MissingElement("combining")));
    }

    #[test]
    fn test_rule_json() {
        let permission = Permission::builder()
            .status(PermissionStatus::Active)
            .combining(PermissionRuleCombining::PermitUnlessDeny)
            .asserter(reference("Organization/org1"))
            .rule(permit_rule())
            .build()
            .unwrap();

        let value = serde_json::to_value(&permission).unwrap();
        assert_eq!(value["combining"], "permit-unless-deny");
        assert_eq!(value["rule"][0]["type"], "permit");
        assert_eq!(
            value["rule"][0]["data"][0]["resource"][0],
            json!({"meaning": "dependents", "reference": {"reference": "Observation/o1"}})
        );

        let parsed: Permission = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, permission);
    }

    #[test]
    fn test_data_resource_requires_meaning_and_reference() {
        let err = PermissionRuleDataResource::builder()
            .reference(reference("Observation/o1"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingElement("meaning")));

        let err = PermissionRuleDataResource::builder()
            .meaning(ConsentDataMeaning::Instance)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingElement("reference")));
    }

    #[test]
    fn test_reference_targets() {
        let err = Permission::builder()
            .status(PermissionStatus::Draft)
            .combining(PermissionRuleCombining::DenyOverrides)
            .asserter(reference("Device/d1"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceType { element: "asserter", .. }));

        let err = PermissionRuleActivity::builder()
            .actor(reference("HealthcareService/h1"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceType { element: "actor", .. }));

        // evidence accepts any resource type
        assert!(PermissionJustification::builder()
            .evidence(reference("Contract/c1"))
            .build()
            .is_ok());
    }

    #[test]
    fn test_empty_rule_violates_ele1() {
        let err = PermissionRule::builder().build().unwrap_err();
        assert!(matches!(err, Error::NoValueOrChildren("Permission.rule")));
    }
}
