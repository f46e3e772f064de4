//! Subcommand implementations
//!
//! Each command writes its report to the given writer so the output can be tested.

use anyhow::{bail, Context};
use ferrum_r5::r5::support::{self, ElementInfo};
use ferrum_r5::r5::validation::{self, ValidationIssue};
use ferrum_r5::r5::{json, PathCollector, ReferenceCollector, Resource, Visitable};
use std::io::Write;
use std::path::Path;

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Reads a resource without tree validation so every issue can be reported
fn read_resource(path: &Path) -> anyhow::Result<Resource> {
    json::deserialize(read_json(path)?).with_context(|| format!("Failed to parse {}", path.display()))
}

fn check_file(path: &Path) -> anyhow::Result<Vec<ValidationIssue>> {
    let value = read_json(path)?;
    let (resource, mut issues) = json::deserialize_with_unknown(&value)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!(file = %path.display(), resource_type = %resource.resource_type(), "validating");
    issues.extend(validation::collect_issues(&resource));
    Ok(issues)
}

pub fn validate(files: &[impl AsRef<Path>], out: &mut impl Write) -> anyhow::Result<()> {
    let mut failed = 0;
    for path in files {
        let path = path.as_ref();
        match check_file(path) {
            Ok(issues) if issues.is_empty() => writeln!(out, "{}: ok", path.display())?,
            Ok(issues) => {
                failed += 1;
                for issue in issues {
                    writeln!(out, "{}: {issue}", path.display())?;
                }
            }
            Err(error) => {
                failed += 1;
                writeln!(out, "{}: {error:#}", path.display())?;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files failed validation", files.len());
    }
    Ok(())
}

pub fn paths(file: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let resource = read_resource(file)?;
    let mut collector = PathCollector::new();
    resource.accept(resource.type_name(), None, &mut collector);
    for path in collector.paths() {
        writeln!(out, "{path}")?;
    }
    Ok(())
}

pub fn references(file: &Path, include_contained: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let resource = read_resource(file)?;
    let mut collector = ReferenceCollector::new().include_contained(include_contained);
    resource.accept(resource.type_name(), None, &mut collector);
    for reference in collector.references() {
        writeln!(out, "{reference}")?;
    }
    Ok(())
}

fn cardinality(element: &ElementInfo) -> String {
    let min = if element.required { "1" } else { "0" };
    let max = if element.repeating { "*" } else { "1" };
    format!("{min}..{max}")
}

fn type_column(element: &ElementInfo) -> String {
    element
        .types
        .iter()
        .map(|type_code| match (*type_code, element.reference_targets) {
            ("Reference" | "CodeableReference", targets) if !targets.is_empty() => {
                format!("{type_code}({})", targets.join(" | "))
            }
            _ => type_code.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn describe(type_name: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let Some(info) = support::type_info(type_name) else {
        bail!("Unknown type '{type_name}'");
    };

    write!(out, "{} ({:?}", info.name, info.kind)?;
    if let Some(maturity) = info.maturity {
        write!(out, ", FMM {} {}", maturity.level, maturity.status.code())?;
    }
    writeln!(out, ")")?;

    for element in support::elements(type_name) {
        let name = if element.choice {
            format!("{}[x]", element.name)
        } else {
            element.name.to_string()
        };
        let summary = if element.summary { "Σ" } else { " " };
        write!(
            out,
            "  {name:<24} {summary} {:<5} {}",
            cardinality(element),
            type_column(element)
        )?;
        if let Some(binding) = element.binding {
            write!(out, " [{} {}", binding.name, binding.strength.code())?;
            if let Some(value_set) = binding.value_set {
                write!(out, " {value_set}")?;
            }
            write!(out, "]")?;
        }
        writeln!(out)?;
    }

    let constraints = support::constraints(type_name);
    if !constraints.is_empty() {
        writeln!(out, "Constraints:")?;
        for constraint in constraints {
            writeln!(
                out,
                "  {} ({}, {}): {}",
                constraint.id,
                constraint.level.code(),
                constraint.location,
                constraint.description
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_fixture(name: &str, value: serde_json::Value) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ferrum-r5-cli-{}-{name}.json", std::process::id()));
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn output(run: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> (anyhow::Result<()>, String) {
        let mut out = Vec::new();
        let result = run(&mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_validate_reports_issues() {
        let valid = write_fixture(
            "valid",
            serde_json::json!({
                "resourceType": "Specimen",
                "subject": { "reference": "Patient/1" }
            }),
        );
        let invalid = write_fixture(
            "invalid",
            serde_json::json!({
                "resourceType": "Specimen",
                "subject": { "reference": "Practitioner/1" },
                "collection": {},
                "stauts": "available"
            }),
        );

        let (result, text) = output(|out| validate(&[&valid, &invalid], out));
        std::fs::remove_file(&valid).unwrap();
        std::fs::remove_file(&invalid).unwrap();

        assert!(result.unwrap_err().to_string().contains("1 of 2 files"));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with(": ok"));
        assert!(lines[1].contains("Specimen: Unknown element 'stauts'"));
        assert!(lines[2].contains("Specimen: Invalid reference type 'Practitioner'"));
        assert!(lines[3].contains("Specimen.collection: ele-1"));
    }

    #[test]
    fn test_paths_and_references() {
        let file = write_fixture(
            "paths",
            serde_json::json!({
                "resourceType": "Specimen",
                "subject": { "reference": "Patient/1" },
                "parent": [{ "reference": "Specimen/2" }, { "reference": "#p" }]
            }),
        );

        let (result, paths_text) = output(|out| paths(&file, out));
        result.unwrap();
        let (result, references_text) = output(|out| references(&file, false, out));
        result.unwrap();
        std::fs::remove_file(&file).unwrap();

        assert!(paths_text.lines().any(|line| line == "Specimen.parent[1].reference"));
        assert_eq!(references_text, "Patient/1\nSpecimen/2\n");
    }

    #[test]
    fn test_describe() {
        let (result, text) = output(|out| describe("Specimen.container", out));
        result.unwrap();
        assert!(text.starts_with("Specimen.container (BackboneElement)"));
        assert!(text.contains("device"));
        assert!(text.contains("1..1  Reference(Device)"));

        let (result, text) = output(|out| describe("Coverage", out));
        result.unwrap();
        assert!(text.contains("FMM 4 trial-use"));
        assert!(text.contains("coverage-2 (warning, class.type)"));

        assert!(describe("Patient", &mut Vec::new()).is_err());
    }
}
