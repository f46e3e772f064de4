//! JSON parsing and generation
//!
//! Parsing deserializes with serde and then validates the whole tree, so a parsed
//! resource satisfies the same rules as one produced by a builder. Choice elements use
//! their type-suffixed names (`collectedDateTime`). Primitive extensions (`_element`)
//! are not supported. Properties the model has no element for are dropped and logged.

use super::resources::{Resource, ResourceType};
use super::validation::{self, ValidationIssue};
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// Parses and validates a resource from JSON text
pub fn parse_resource(json: &str) -> Result<Resource> {
    let value: Value = serde_json::from_str(json)?;
    from_value(value)
}

/// Parses and validates a resource from a JSON value
pub fn from_value(value: Value) -> Result<Resource> {
    let resource = deserialize(value)?;
    validation::validate_tree(&resource)?;

    tracing::trace!(resource_type = %resource.resource_type(), id = ?resource.id(), "resource parsed");
    Ok(resource)
}

/// Deserializes a resource without tree validation
///
/// Primitive formats and codes are still checked. Use
/// [`collect_issues`](validation::collect_issues) to report every rule the result breaks.
pub fn deserialize(value: Value) -> Result<Resource> {
    let (resource, unknown) = deserialize_with_unknown(&value)?;
    for issue in &unknown {
        tracing::warn!(path = %issue.path, "{}", issue.error);
    }
    Ok(resource)
}

/// Like [`deserialize`], also returning the input properties that were dropped
/// because the model has no element for them
pub fn deserialize_with_unknown(value: &Value) -> Result<(Resource, Vec<ValidationIssue>)> {
    let resource_type = match value.get("resourceType") {
        Some(Value::String(name)) => name.parse::<ResourceType>()?,
        Some(_) => {
            return Err(Error::InvalidResource(
                "resourceType must be a string".to_string(),
            ))
        }
        None => return Err(Error::InvalidResource("missing resourceType".to_string())),
    };
    tracing::debug!(%resource_type, "parsing resource");

    let resource = Resource::deserialize(value)?;
    let unknown = unknown_elements(value, &resource)?;
    Ok((resource, unknown))
}

/// Input properties with no counterpart in the generated JSON of `resource`
///
/// Each issue is located at the parent element and names the dropped property.
/// `null` values and empty arrays are absent values, not unknown properties.
pub fn unknown_elements(input: &Value, resource: &Resource) -> Result<Vec<ValidationIssue>> {
    let generated = to_value(resource)?;
    let mut issues = Vec::new();
    compare_properties(input, &generated, resource.resource_type().as_str(), &mut issues);
    Ok(issues)
}

fn compare_properties(input: &Value, generated: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    match (input, generated) {
        (Value::Object(input), Value::Object(generated)) => {
            for (key, value) in input {
                match generated.get(key) {
                    Some(generated) => {
                        compare_properties(value, generated, &format!("{path}.{key}"), issues)
                    }
                    None if is_absent(value) => {}
                    None => issues.push(ValidationIssue {
                        path: path.to_string(),
                        error: Error::UnknownElement(key.clone()),
                    }),
                }
            }
        }
        (Value::Array(input), Value::Array(generated)) => {
            for (index, (value, generated)) in input.iter().zip(generated).enumerate() {
                compare_properties(value, generated, &format!("{path}[{index}]"), issues);
            }
        }
        _ => {}
    }
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Parses a resource and converts it into the expected type
pub fn parse<T>(json: &str) -> Result<T>
where
    T: TryFrom<Resource, Error = Error>,
{
    T::try_from(parse_resource(json)?)
}

pub fn to_value(resource: &Resource) -> Result<Value> {
    Ok(serde_json::to_value(resource)?)
}

/// Generates JSON text, indented when `pretty` is set
pub fn to_string(resource: &Resource, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(resource)?
    } else {
        serde_json::to_string(resource)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r5::{Specimen, SpecimenStatus};
    use serde_json::json;

    fn specimen_json() -> Value {
        json!({
            "resourceType": "Specimen",
            "id": "sp1",
            "status": "available",
            "subject": { "reference": "Patient/example" },
            "collection": {
                "collectedDateTime": "2011-05-30T06:15:00Z"
            }
        })
    }

    #[test]
    fn test_parse_resource() {
        let resource = from_value(specimen_json()).unwrap();
        assert_eq!(resource.resource_type(), ResourceType::Specimen);
        assert_eq!(resource.id().map(|id| id.as_str()), Some("sp1"));

        let specimen: Specimen = resource.try_into().unwrap();
        assert_eq!(specimen.status(), Some(&SpecimenStatus::Available));
    }

    #[test]
    fn test_resource_type_checks() {
        assert!(matches!(
            parse_resource(r#"{"status": "available"}"#),
            Err(Error::InvalidResource(_))
        ));
        assert!(matches!(
            parse_resource(r#"{"resourceType": 7}"#),
            Err(Error::InvalidResource(_))
        ));
        assert!(matches!(
            parse_resource(r#"{"resourceType": "Patient"}"#),
            Err(Error::UnknownResourceType(name)) if name == "Patient"
        ));
        assert!(matches!(parse_resource("{"), Err(Error::SerializationError(_))));
    }

    #[test]
    fn test_parse_validates_tree() {
        let mut value = specimen_json();
        value["subject"] = json!({ "reference": "Practitioner/1" });

        let err = from_value(value).unwrap_err();
        assert_eq!(err.path(), Some("Specimen"));
        assert!(matches!(
            err,
            Error::AtPath { ref source, .. } if matches!(**source, Error::InvalidReferenceType { element: "subject", .. })
        ));
    }

    #[test]
    fn test_deserialize_skips_tree_validation() {
        let mut value = specimen_json();
        value["subject"] = json!({ "reference": "Practitioner/1" });
        value["collection"] = json!({});

        let resource = deserialize(value).unwrap();
        let issues = validation::collect_issues(&resource);
        let paths: Vec<_> = issues.iter().map(|issue| issue.path.as_str()).collect();
        assert_eq!(paths, vec!["Specimen", "Specimen.collection"]);
    }

    #[test]
    fn test_unknown_elements_are_reported() {
        let mut value = specimen_json();
        value["stauts"] = json!("available");
        value["collection"]["collectedBy"] = json!({ "reference": "Practitioner/1" });
        value["note"] = json!([]);

        let (resource, unknown) = deserialize_with_unknown(&value).unwrap();
        let found: Vec<_> = unknown.iter().map(ToString::to_string).collect();
        assert_eq!(
            found,
            vec![
                "Specimen.collection: Unknown element 'collectedBy'",
                "Specimen: Unknown element 'stauts'",
            ]
        );

        // The known part still parses
        assert_eq!(deserialize(value).unwrap(), resource);
        assert!(unknown_elements(&specimen_json(), &resource).unwrap().is_empty());
    }

    #[test]
    fn test_choice_errors_fail_parsing() {
        let mut value = specimen_json();
        value["collection"]["collectedDateTime"] = json!("not-a-date");
        assert!(matches!(from_value(value), Err(Error::SerializationError(_))));

        let mut value = specimen_json();
        value["collection"]["collectedPeriod"] = json!({ "start": "2011-05-30" });
        assert!(matches!(from_value(value), Err(Error::SerializationError(_))));
    }

    #[test]
    fn test_invalid_code_is_rejected() {
        let mut value = specimen_json();
        value["status"] = json!("lost");
        assert!(matches!(from_value(value), Err(Error::SerializationError(_))));
    }

    #[test]
    fn test_generation() {
        let resource = from_value(specimen_json()).unwrap();

        let compact = to_string(&resource, false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(compact.starts_with(r#"{"resourceType":"Specimen","id":"sp1""#));

        let pretty = to_string(&resource, true).unwrap();
        assert!(pretty.contains("\n  \"status\": \"available\""));

        assert_eq!(to_value(&resource).unwrap(), specimen_json());
        assert_eq!(parse_resource(&compact).unwrap(), resource);
    }
}
