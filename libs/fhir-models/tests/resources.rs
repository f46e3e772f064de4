use ferrum_r5::r5::json;
use ferrum_r5::r5::{
    Coverage, CoverageCostToBeneficiaryValue, CoverageStatus, ImagingSelection, Permission,
    PermissionRuleCombining, Reference, Resource, ResourceType, Specimen,
    SpecimenCollectionCollected, SpecimenStatus,
};
use ferrum_r5::Error;
use serde_json::{json, Value};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

fn coverage_example() -> Value {
    json!({
        "resourceType": "Coverage",
        "id": "9876B1",
        "identifier": [{ "system": "http://benefitsinc.com/certificate", "value": "12345" }],
        "status": "active",
        "kind": "insurance",
        "type": {
            "coding": [{
                "system": "http://terminology.hl7.org/CodeSystem/v3-ActCode",
                "code": "EHCPOL",
                "display": "extended healthcare"
            }]
        },
        "policyHolder": { "reference": "http://benefitsinc.com/FHIR/Organization/CBI35" },
        "subscriber": { "reference": "Patient/4" },
        "beneficiary": { "reference": "Patient/4" },
        "dependent": "0",
        "relationship": { "coding": [{ "code": "self" }] },
        "period": { "start": "2011-05-23", "end": "2012-05-23" },
        "insurer": { "reference": "Organization/2" },
        "class": [{
            "type": {
                "coding": [{
                    "system": "http://terminology.hl7.org/CodeSystem/coverage-class",
                    "code": "group"
                }]
            },
            "value": { "value": "CB135" },
            "name": "Corporate Baker's Inc. Local #35"
        }],
        "costToBeneficiary": [{
            "type": {
                "coding": [{
                    "system": "http://terminology.hl7.org/CodeSystem/coverage-copay-type",
                    "code": "gpvisit"
                }]
            },
            "valueMoney": { "value": 20.0, "currency": "USD" },
            "exception": [{
                "type": { "coding": [{ "code": "retired" }] },
                "period": { "start": "2018-01-01" }
            }]
        }]
    })
}

fn specimen_example() -> Value {
    json!({
        "resourceType": "Specimen",
        "id": "101",
        "identifier": [{ "system": "http://ehr.acme.org/identifiers/collections", "value": "23234352356" }],
        "accessionIdentifier": { "system": "http://lab.acme.org/specimens/2011", "value": "X352356" },
        "status": "available",
        "type": {
            "coding": [{
                "system": "http://snomed.info/sct",
                "code": "122555007",
                "display": "Venous blood specimen"
            }]
        },
        "subject": { "reference": "Patient/example", "display": "Peter Patient" },
        "receivedTime": "2011-03-04T07:03:00Z",
        "request": [{ "reference": "ServiceRequest/example" }],
        "collection": {
            "collector": { "reference": "Practitioner/example" },
            "collectedDateTime": "2011-05-30T06:15:00Z",
            "quantity": { "value": 6.0, "unit": "mL" },
            "method": {
                "coding": [{ "system": "http://terminology.hl7.org/CodeSystem/v2-0488", "code": "LNV" }]
            },
            "bodySite": {
                "concept": {
                    "coding": [{
                        "system": "http://snomed.info/sct",
                        "code": "49852007",
                        "display": "Structure of median cubital vein (body structure)"
                    }]
                }
            }
        },
        "container": [{
            "device": { "reference": "Device/green-gel-vacutainer" },
            "specimenQuantity": { "value": 3.0, "unit": "mL" }
        }],
        "note": [{ "text": "Specimen is grossly lipemic" }]
    })
}

fn permission_example() -> Value {
    json!({
        "resourceType": "Permission",
        "id": "example",
        "status": "active",
        "asserter": { "reference": "Practitioner/example" },
        "date": ["2018-12-24"],
        "validity": { "start": "2018-12-24", "end": "2019-12-24" },
        "combining": "deny-overrides",
        "rule": [{
            "type": "deny",
            "data": [{
                "resource": [{
                    "meaning": "dependents",
                    "reference": { "reference": "Organization/f001" }
                }]
            }],
            "activity": [{
                "actor": [{ "reference": "Practitioner/example" }],
                "action": [{
                    "coding": [{ "system": "http://terminology.hl7.org/CodeSystem/consentaction", "code": "use" }]
                }],
                "purpose": [{
                    "coding": [{ "system": "http://terminology.hl7.org/CodeSystem/v3-ActReason", "code": "HTEST" }]
                }]
            }]
        }]
    })
}

fn imaging_selection_example() -> Value {
    json!({
        "resourceType": "ImagingSelection",
        "id": "example",
        "status": "available",
        "subject": { "reference": "Patient/example" },
        "issued": "2010-01-30T23:00:00Z",
        "basedOn": [{ "reference": "ServiceRequest/example" }],
        "code": {
            "coding": [{
                "system": "http://dicom.nema.org/resources/ontology/DCM",
                "code": "113091",
                "display": "Rejected for Quality Reasons"
            }]
        },
        "studyUid": "1.2.840.113619.2.21.848.34082.0.538976288.3",
        "derivedFrom": [{ "reference": "ImagingStudy/example" }],
        "seriesUid": "1.2.840.113619.2.21.3408.700.0.757923840.3.0",
        "instance": [{
            "uid": "1.2.840.113619.2.21.848.34082.0.538976288.3.1",
            "sopClass": { "system": "urn:ietf:rfc:3986", "code": "urn:oid:1.2.840.10008.5.1.4.1.1.2" },
            "imageRegion2D": [{
                "regionType": "circle",
                "coordinate": [300.0, 400.0, 300.0, 500.0]
            }]
        }]
    })
}

fn examples() -> Vec<Value> {
    vec![
        coverage_example(),
        specimen_example(),
        permission_example(),
        imaging_selection_example(),
    ]
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn examples_parse_and_generate_unchanged() {
    for example in examples() {
        let resource = json::from_value(example.clone()).unwrap();
        assert_eq!(json::to_value(&resource).unwrap(), example);
    }
}

#[test]
fn parsed_resources_have_their_type() {
    let types: Vec<_> = examples()
        .into_iter()
        .map(|example| json::from_value(example).unwrap().resource_type())
        .collect();
    assert_eq!(
        types,
        vec![
            ResourceType::Coverage,
            ResourceType::Specimen,
            ResourceType::Permission,
            ResourceType::ImagingSelection,
        ]
    );
}

#[test]
fn coverage_example_accessors() {
    let coverage: Coverage = json::parse(&coverage_example().to_string()).unwrap();

    assert_eq!(coverage.status(), &CoverageStatus::Active);
    assert_eq!(coverage.beneficiary().reference(), Some("Patient/4"));
    assert_eq!(coverage.class()[0].value().value(), Some("CB135"));
    assert_eq!(coverage.dependent(), Some("0"));

    let cost = &coverage.cost_to_beneficiary()[0];
    assert!(matches!(cost.value(), Some(CoverageCostToBeneficiaryValue::Money(_))));
    assert_eq!(cost.exception().len(), 1);
}

#[test]
fn specimen_example_accessors() {
    let specimen: Specimen = json::parse(&specimen_example().to_string()).unwrap();

    assert_eq!(specimen.status(), Some(&SpecimenStatus::Available));
    let collection = specimen.collection().unwrap();
    assert!(matches!(
        collection.collected(),
        Some(SpecimenCollectionCollected::DateTime(date_time)) if date_time.as_str() == "2011-05-30T06:15:00Z"
    ));
    assert!(collection.body_site().unwrap().concept().is_some());
    assert_eq!(specimen.container().len(), 1);
}

#[test]
fn wrong_typed_parse_is_rejected() {
    let result = json::parse::<Permission>(&specimen_example().to_string());
    assert!(matches!(
        result,
        Err(Error::UnexpectedResourceType { expected: "Permission", found: "Specimen" })
    ));
}

#[test]
fn equality_and_hash_are_structural() {
    for example in examples() {
        let first = json::from_value(example.clone()).unwrap();
        let second = json::from_value(example).unwrap();
        assert_eq!(first, second);
        assert_eq!(hash_of(&first), hash_of(&second));
    }

    let permission: Permission = json::from_value(permission_example()).unwrap().try_into().unwrap();
    let changed = permission
        .to_builder()
        .combining(PermissionRuleCombining::PermitOverrides)
        .build()
        .unwrap();
    assert_ne!(permission, changed);

    let set: HashSet<Resource> = [
        Resource::from(permission.clone()),
        Resource::from(permission.to_builder().build().unwrap()),
        Resource::from(changed),
    ]
    .into_iter()
    .collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn to_builder_rebuilds_an_equal_resource() {
    let coverage: Coverage = json::from_value(coverage_example()).unwrap().try_into().unwrap();
    assert_eq!(coverage.to_builder().build().unwrap(), coverage);

    let selection: ImagingSelection = json::from_value(imaging_selection_example())
        .unwrap()
        .try_into()
        .unwrap();
    assert_eq!(selection.to_builder().build().unwrap(), selection);

    let updated = selection
        .to_builder()
        .subject(Reference::builder().reference("Group/g1").build().unwrap())
        .build()
        .unwrap();
    assert_eq!(updated.subject().and_then(Reference::reference), Some("Group/g1"));
    assert_eq!(selection.subject().and_then(Reference::reference), Some("Patient/example"));
}

#[test]
fn nested_errors_report_their_path() {
    let mut coverage = coverage_example();
    coverage["costToBeneficiary"][0] = json!({
        "valueQuantity": { "value": 5.0, "comparator": "<", "unit": "visits" }
    });
    let err = json::from_value(coverage).unwrap_err();
    assert_eq!(err.path(), Some("Coverage.costToBeneficiary[0]"));

    let mut selection = imaging_selection_example();
    selection["instance"][0]["imageRegion2D"][0]["coordinate"] = json!([]);
    let err = json::from_value(selection).unwrap_err();
    assert_eq!(err.path(), Some("ImagingSelection.instance[0].imageRegion2D[0]"));

    let mut permission = permission_example();
    permission["rule"][0]["activity"][0]["actor"] = json!([{ "reference": "Location/1" }]);
    let err = json::from_value(permission).unwrap_err();
    assert_eq!(err.path(), Some("Permission.rule[0].activity[0]"));
}

#[test]
fn missing_required_elements_fail_deserialization() {
    let mut coverage = coverage_example();
    coverage.as_object_mut().unwrap().remove("beneficiary");
    assert!(matches!(json::from_value(coverage), Err(Error::SerializationError(_))));

    let mut permission = permission_example();
    permission.as_object_mut().unwrap().remove("combining");
    assert!(matches!(json::from_value(permission), Err(Error::SerializationError(_))));
}

#[test]
fn contained_resources_round_trip() {
    let mut specimen = specimen_example();
    specimen["contained"] = json!([coverage_example()]);
    specimen["parent"] = json!([{ "reference": "#9876B1" }]);

    let resource = json::from_value(specimen.clone()).unwrap();
    assert_eq!(json::to_value(&resource).unwrap(), specimen);

    let specimen: Specimen = resource.try_into().unwrap();
    assert_eq!(specimen.contained().len(), 1);
    assert_eq!(specimen.contained()[0].resource_type(), ResourceType::Coverage);
}

#[test]
fn decimals_round_trip_exactly() {
    let text = coverage_example().to_string().replace(
        r#""valueMoney":{"value":20.0,"#,
        r#""valueMoney":{"value":12345678901234567.89,"#,
    );
    let resource = json::parse_resource(&text).unwrap();
    assert_eq!(json::to_string(&resource, false).unwrap(), text);

    let text = imaging_selection_example()
        .to_string()
        .replace("[300.0,400.0,300.0,500.0]", "[300.50,400,300.000,500.0]");
    assert!(text.contains("300.50"));
    let resource = json::parse_resource(&text).unwrap();
    assert!(json::to_string(&resource, false)
        .unwrap()
        .contains(r#""coordinate":[300.50,400,300.000,500.0]"#));
}

#[test]
fn choice_elements_reject_bad_and_duplicate_values() {
    let mut specimen = specimen_example();
    specimen["collection"]["collectedDateTime"] = json!("not-a-date");
    assert!(matches!(json::from_value(specimen), Err(Error::SerializationError(_))));

    let mut specimen = specimen_example();
    specimen["collection"]["collectedPeriod"] = json!({ "start": "2011-05-30T06:15:00Z" });
    let err = json::from_value(specimen).unwrap_err();
    assert!(err.to_string().contains("collectedPeriod"));

    let mut coverage = coverage_example();
    coverage["costToBeneficiary"][0]["valueQuantity"] = json!({ "value": 1 });
    assert!(matches!(json::from_value(coverage), Err(Error::SerializationError(_))));
}
