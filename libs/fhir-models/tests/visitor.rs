use ferrum_r5::r5::json;
use ferrum_r5::r5::{
    Coding, PathCollector, Reference, ReferenceCollector, Resource, Visitable, Visitor,
};
use serde_json::json;

fn permission() -> Resource {
    json::from_value(json!({
        "resourceType": "Permission",
        "id": "p1",
        "status": "active",
        "asserter": { "reference": "Practitioner/example" },
        "combining": "permit-overrides",
        "justification": {
            "evidence": [{ "reference": "#consent" }]
        },
        "rule": [
            {
                "type": "permit",
                "activity": [{ "actor": [{ "reference": "Organization/o1" }] }]
            },
            {
                "type": "deny",
                "data": [{ "security": [{ "system": "http://terminology.hl7.org/CodeSystem/v3-Confidentiality", "code": "R" }] }]
            }
        ]
    }))
    .unwrap()
}

fn collect_paths(resource: &Resource) -> Vec<String> {
    let mut collector = PathCollector::new();
    resource.accept(resource.type_name(), None, &mut collector);
    collector.into_paths()
}

#[test]
fn paths_follow_definition_order() {
    let paths = collect_paths(&permission());
    assert_eq!(
        paths,
        vec![
            "Permission",
            "Permission.id",
            "Permission.status",
            "Permission.asserter",
            "Permission.asserter.reference",
            "Permission.justification",
            "Permission.justification.evidence[0]",
            "Permission.justification.evidence[0].reference",
            "Permission.combining",
            "Permission.rule[0]",
            "Permission.rule[0].type",
            "Permission.rule[0].activity[0]",
            "Permission.rule[0].activity[0].actor[0]",
            "Permission.rule[0].activity[0].actor[0].reference",
            "Permission.rule[1]",
            "Permission.rule[1].type",
            "Permission.rule[1].data[0]",
            "Permission.rule[1].data[0].security[0]",
            "Permission.rule[1].data[0].security[0].system",
            "Permission.rule[1].data[0].security[0].code",
        ]
    );
}

#[test]
fn reference_collector_skips_contained_by_default() {
    let resource = permission();

    let mut collector = ReferenceCollector::new();
    resource.accept(resource.type_name(), None, &mut collector);
    assert_eq!(collector.references(), &["Practitioner/example", "Organization/o1"]);

    let mut collector = ReferenceCollector::new().include_contained(true);
    resource.accept(resource.type_name(), None, &mut collector);
    assert_eq!(
        collector.into_references(),
        vec!["Practitioner/example", "#consent", "Organization/o1"]
    );
}

/// Records list boundaries and primitive values
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl Visitor for Recorder {
    fn visit(&mut self, element_name: &str, _element_index: Option<usize>, node: &dyn Visitable) -> bool {
        if let Some(value) = node.primitive_value() {
            self.events.push(format!("{element_name}={value}"));
        }
        true
    }

    fn visit_list_start(&mut self, element_name: &str, len: usize) {
        self.events.push(format!("[{element_name} {len}"));
    }

    fn visit_list_end(&mut self, element_name: &str, _len: usize) {
        self.events.push(format!("{element_name}]"));
    }
}

#[test]
fn visitor_sees_lists_and_primitives() {
    let resource = permission();
    let mut recorder = Recorder::default();
    resource.accept(resource.type_name(), None, &mut recorder);

    assert_eq!(&recorder.events[..3], &["id=p1", "status=active", "reference=Practitioner/example"]);
    assert!(recorder.events.contains(&"[rule 2".to_string()));
    assert!(recorder.events.contains(&"type=deny".to_string()));
    assert_eq!(recorder.events.last().map(String::as_str), Some("rule]"));
}

/// Skips everything below a Reference
struct SkipReferences {
    visited: usize,
}

impl Visitor for SkipReferences {
    fn pre_visit(&mut self, node: &dyn Visitable) -> bool {
        node.downcast_ref::<Reference>().is_none()
    }

    fn visit(&mut self, _element_name: &str, _element_index: Option<usize>, node: &dyn Visitable) -> bool {
        self.visited += 1;
        // Codings are visited but their children are not
        node.downcast_ref::<Coding>().is_none()
    }
}

#[test]
fn visitor_controls_depth() {
    let resource = permission();
    let mut visitor = SkipReferences { visited: 0 };
    resource.accept(resource.type_name(), None, &mut visitor);

    let all = collect_paths(&resource).len();
    // three references with one child each, plus the two primitives of the coding
    assert_eq!(visitor.visited, all - 6 - 2);
}
