//! Validation support
//!
//! Builders call the `check_*`/`require_*` functions from each type's
//! [`Visitable::validate`]. [`validate_tree`] and [`collect_issues`] run those same checks
//! over a whole tree, which is how deserialized resources get validated.

use super::datatypes::{CodeableReference, Quantity, Reference};
use super::support;
use super::visitor::{PathCollector, Visitable, Visitor};
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use std::fmt;

/// Upper bound on the length of a FHIR `string` (1 MiB)
pub const MAX_STRING_LENGTH: usize = 1_048_576;

/// A FHIR `string` must contain non-whitespace content and stay within
/// [`MAX_STRING_LENGTH`]
pub fn check_string(value: &str, element: &'static str) -> Result<()> {
    if value.len() > MAX_STRING_LENGTH {
        return Err(Error::InvalidString {
            element,
            reason: "exceeds the maximum string length",
        });
    }
    if value.trim().is_empty() {
        return Err(Error::InvalidString {
            element,
            reason: "must contain at least one non-whitespace character",
        });
    }
    Ok(())
}

pub fn check_optional_string(value: Option<&str>, element: &'static str) -> Result<()> {
    match value {
        Some(value) => check_string(value, element),
        None => Ok(()),
    }
}

pub fn check_strings(values: &[String], element: &'static str) -> Result<()> {
    values.iter().try_for_each(|value| check_string(value, element))
}

/// A list with minimum cardinality 1 must not be empty
pub fn require_non_empty<T>(values: &[T], element: &'static str) -> Result<()> {
    if values.is_empty() {
        Err(Error::EmptyList(element))
    } else {
        Ok(())
    }
}

/// ele-1: every element must have a value or children
pub fn require_value_or_children(has_value_or_children: bool, type_name: &'static str) -> Result<()> {
    if has_value_or_children {
        Ok(())
    } else {
        Err(Error::NoValueOrChildren(type_name))
    }
}

/// A Quantity in a SimpleQuantity position must not carry a comparator
pub fn check_simple_quantity(quantity: Option<&Quantity>, element: &'static str) -> Result<()> {
    match quantity {
        Some(quantity) if quantity.comparator().is_some() => {
            Err(Error::SimpleQuantityComparator(element))
        }
        _ => Ok(()),
    }
}

/// Checks that a reference targets one of `allowed`
///
/// The type comes from `Reference.type` and from the literal `Type/id` form of
/// `Reference.reference`; when both are present they must agree. Contained (`#id`),
/// `urn:` and logical references carry no type and always pass. Disabled through
/// [`ModelConfig::check_reference_types`].
pub fn check_reference_type(
    reference: Option<&Reference>,
    element: &'static str,
    allowed: &[&'static str],
) -> Result<()> {
    let Some(reference) = reference else {
        return Ok(());
    };
    if !ModelConfig::current().check_reference_types || allowed.contains(&"Resource") {
        return Ok(());
    }

    let declared = reference.declared_type();
    if let Some(declared) = declared {
        if !allowed.contains(&declared) {
            return Err(Error::InvalidReferenceType {
                element,
                found: declared.to_string(),
                allowed: allowed.to_vec(),
            });
        }
    }

    let literal_type = reference
        .literal()
        .map(|literal| literal.resource_type)
        .filter(|resource_type| support::is_resource_type(resource_type));
    if let Some(literal_type) = literal_type {
        if !allowed.contains(&literal_type) {
            return Err(Error::InvalidReferenceType {
                element,
                found: literal_type.to_string(),
                allowed: allowed.to_vec(),
            });
        }
        if let Some(declared) = declared {
            if declared != literal_type {
                return Err(Error::ReferenceTypeMismatch {
                    element,
                    found: literal_type.to_string(),
                    declared: declared.to_string(),
                });
            }
        }
    }
    Ok(())
}

pub fn check_reference_types(
    references: &[Reference],
    element: &'static str,
    allowed: &[&'static str],
) -> Result<()> {
    references
        .iter()
        .try_for_each(|reference| check_reference_type(Some(reference), element, allowed))
}

/// Reference-type check applied to the `reference` part of a CodeableReference
pub fn check_codeable_reference_type(
    codeable_reference: Option<&CodeableReference>,
    element: &'static str,
    allowed: &[&'static str],
) -> Result<()> {
    check_reference_type(
        codeable_reference.and_then(CodeableReference::reference),
        element,
        allowed,
    )
}

pub fn check_codeable_reference_types(
    codeable_references: &[CodeableReference],
    element: &'static str,
    allowed: &[&'static str],
) -> Result<()> {
    codeable_references
        .iter()
        .try_for_each(|item| check_codeable_reference_type(Some(item), element, allowed))
}

/// A failed check and the location of the element that failed it
#[derive(Debug)]
pub struct ValidationIssue {
    pub path: String,
    pub error: Error,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

/// Runs `validate` on every node, tracking where it is in the tree
struct IssueCollector {
    paths: PathCollector,
    issues: Vec<ValidationIssue>,
    stop_at_first: bool,
}

impl Visitor for IssueCollector {
    fn pre_visit(&mut self, _node: &dyn Visitable) -> bool {
        !(self.stop_at_first && !self.issues.is_empty())
    }

    fn visit_start(&mut self, element_name: &str, element_index: Option<usize>, _node: &dyn Visitable) {
        self.paths.push(element_name, element_index);
    }

    fn visit(&mut self, _element_name: &str, _element_index: Option<usize>, node: &dyn Visitable) -> bool {
        if let Err(error) = node.validate() {
            let path = self.paths.current();
            tracing::trace!(%path, %error, "validation issue");
            self.issues.push(ValidationIssue { path, error });
        }
        true
    }

    fn visit_end(&mut self, _element_name: &str, _element_index: Option<usize>, _node: &dyn Visitable) {
        self.paths.pop();
    }
}

fn run(root: &dyn Visitable, stop_at_first: bool) -> Vec<ValidationIssue> {
    let mut collector = IssueCollector {
        paths: PathCollector::new(),
        issues: Vec::new(),
        stop_at_first,
    };
    root.accept(root.type_name(), None, &mut collector);
    collector.issues
}

/// Validates a whole tree, failing with the first issue found (as [`Error::AtPath`])
pub fn validate_tree(root: &dyn Visitable) -> Result<()> {
    match run(root, true).into_iter().next() {
        Some(issue) => Err(Error::AtPath {
            path: issue.path,
            source: Box::new(issue.error),
        }),
        None => Ok(()),
    }
}

/// Validates a whole tree and reports every issue
pub fn collect_issues(root: &dyn Visitable) -> Vec<ValidationIssue> {
    let issues = run(root, false);
    tracing::debug!(root = root.type_name(), issues = issues.len(), "tree validated");
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(value: &str) -> Reference {
        Reference::builder().reference(value).build().unwrap()
    }

    #[test]
    fn test_check_string() {
        assert!(check_string("value", "text").is_ok());
        assert!(matches!(
            check_string(" \t\n", "text"),
            Err(Error::InvalidString { element: "text", .. })
        ));
        assert!(check_string(&"a".repeat(MAX_STRING_LENGTH + 1), "text").is_err());
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty(&[1], "coordinate").is_ok());
        assert!(matches!(
            require_non_empty::<u8>(&[], "coordinate"),
            Err(Error::EmptyList("coordinate"))
        ));
    }

    #[test]
    fn test_literal_reference_type() {
        let allowed = ["Patient", "Group"];
        assert!(check_reference_type(Some(&reference("Patient/1")), "subject", &allowed).is_ok());
        assert!(check_reference_type(
            Some(&reference("http://example.org/fhir/Group/2/_history/3")),
            "subject",
            &allowed
        )
        .is_ok());

        let err = check_reference_type(Some(&reference("Device/1")), "subject", &allowed).unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceType { ref found, .. } if found == "Device"));
    }

    #[test]
    fn test_untyped_references_pass() {
        let allowed = ["Patient"];
        for value in ["#contained", "urn:uuid:53fefa32-fcbb-4ff8-8a92-55ee120877b7", "not a literal"] {
            assert!(check_reference_type(Some(&reference(value)), "subject", &allowed).is_ok());
        }
    }

    #[test]
    fn test_declared_type_must_match_literal() {
        let mismatch = Reference::builder()
            .reference("Patient/1")
            .type_("Group".parse().unwrap())
            .build()
            .unwrap();
        let err = check_reference_type(Some(&mismatch), "subject", &["Patient", "Group"]).unwrap_err();
        assert!(matches!(err, Error::ReferenceTypeMismatch { .. }));

        let declared_only = Reference::builder()
            .type_("Device".parse().unwrap())
            .display("a device")
            .build()
            .unwrap();
        assert!(check_reference_type(Some(&declared_only), "subject", &["Patient"]).is_err());
    }

    #[test]
    fn test_resource_allows_any_target() {
        assert!(check_reference_type(Some(&reference("Device/1")), "focus", &["Resource"]).is_ok());
    }
}
