use super::*;
use crate::association::associate;

fn step(guid: &str, payload: &str) -> TestStep {
    let mut step = TestStep::new(guid);
    step.step_number = guid.trim_start_matches('s').to_string();
    step.graph_payload = payload.to_string();
    step
}

fn fixture() -> (Vec<TestRecord>, Vec<TestDefinition>) {
    let records = vec![
        TestRecord::new("bench.csv", "run-1", "A")
            .with_program_name("Mains")
            .with_step(step("s1", "|#GR#|<t\\s|U\\V>0|0\\1|750\\2|1500\\}"))
            .with_step(step("s2", "garbage"))
            .with_step(step("s3", "|#GR#|<t\\s|I\\mA>0|0.1\\1|x\\}")),
        TestRecord::new("bench.csv", "run-2", "Z").with_program_name("Probe"),
    ];
    let definitions = vec![TestDefinition::new("Mains", "A"), TestDefinition::new("Spare", "S")];
    (records, definitions)
}

fn build() -> Report {
    let (records, definitions) = fixture();
    let association = associate(&records, &definitions);
    Report::build(&records, &definitions, &association, &ReportOptions::default())
}

#[test]
fn test_report_sections() {
    let report = build();

    assert_eq!(report.runs.len(), 1);
    let run = &report.runs[0];
    assert_eq!(run.run_id, "run-1");
    assert_eq!(run.definition_name, "Mains");
    assert_eq!(run.steps.len(), 3);
    assert_eq!(report.step_count(), 3);
}

#[test]
fn test_step_order_preserved() {
    let report = build();
    let numbers: Vec<_> = report.runs[0].steps.iter().map(|s| s.number.as_str()).collect();
    assert_eq!(numbers, vec!["1", "2", "3"]);
}

#[test]
fn test_malformed_payload_is_scoped_to_step() {
    let report = build();
    let steps = &report.runs[0].steps;

    assert!(!steps[0].graph.is_missing());
    assert!(steps[1].graph.is_missing());
    assert!(!steps[2].graph.is_missing());
    assert_eq!(report.missing_graph_count(), 1);
}

#[test]
fn test_axis_summaries() {
    let report = build();
    let steps = &report.runs[0].steps;

    match &steps[0].graph {
        StepGraph::Parsed { axes, .. } => {
            assert_eq!(axes[1].label, "U");
            assert_eq!(axes[1].units, "V");
            assert_eq!(axes[1].min, Some(0.0));
            assert_eq!(axes[1].max, Some(1500.0));
        }
        other => panic!("expected parsed graph, got {other:?}"),
    }

    match &steps[2].graph {
        StepGraph::Parsed { axes, .. } => {
            assert!(axes[0].error.is_none());
            assert!(axes[1].error.is_some());
        }
        other => panic!("expected parsed graph, got {other:?}"),
    }
}

#[test]
fn test_orphans_reported() {
    let report = build();

    assert!(report.has_orphans());
    assert_eq!(report.orphan_records.len(), 1);
    assert_eq!(report.orphan_records[0].run_id, "run-2");
    assert_eq!(report.orphan_definitions.len(), 1);
    assert_eq!(report.orphan_definitions[0].name, "Spare");
}

#[test]
fn test_duplicate_guids_reported() {
    let (records, mut definitions) = fixture();
    definitions.push(TestDefinition::new("Mains copy", "A"));
    let association = associate(&records, &definitions);
    let report = Report::build(&records, &definitions, &association, &ReportOptions::default());

    assert_eq!(report.runs.len(), 2);
    assert_eq!(report.duplicate_guids, vec!["A".to_string()]);
}

#[test]
fn test_report_display() {
    let options = ReportOptions {
        title: "Bench".to_string(),
        sample_preview: 2,
    };
    let (records, definitions) = fixture();
    let association = associate(&records, &definitions);
    let report = Report::build(&records, &definitions, &association, &options);

    let output = format!("{}", report);
    assert!(output.starts_with("Bench\n=====\n"));
    assert!(output.contains("U [V]: 0 .. 1500"));
    assert!(output.contains("no graph data"));
    assert!(output.contains("I [mA]: non-numeric"));
    assert!(output.contains("| 1 | 750"));
    assert!(!output.contains("| 2 | 1500"));
    assert!(output.contains("bench.csv: Mains, Probe"));
    assert!(output.contains("references unknown program GUID 'Z'"));
    assert!(output.contains("Definition 'Spare' (S) is not used by any run"));
    assert!(output.contains("Summary: 1 runs, 3 steps, 1 without graph data, 1 orphan runs, 1 orphan definitions"));
}

#[test]
fn test_report_json() {
    let report = build();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["runs"][0]["steps"][0]["graph"]["status"], "parsed");
    assert_eq!(json["runs"][0]["steps"][1]["graph"]["status"], "missing");
    assert_eq!(json["orphan_definitions"][0]["guid"], "S");
}

/// Drop ANSI escape sequences (`ESC [ ... letter`)
fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[test]
fn test_colored_output_matches_plain_text() {
    let options = ReportOptions {
        title: "Bench".to_string(),
        sample_preview: 2,
    };
    let (records, definitions) = fixture();
    let association = associate(&records, &definitions);
    let report = Report::build(&records, &definitions, &association, &options);

    let colored = strip_ansi(&report.format_colored());
    assert!(colored.contains("| 0 | 0"));
    assert!(colored.contains("| 1 | 750"));
    assert!(colored.contains("bench.csv: Mains, Probe"));
    assert!(colored.contains("Program GUID: A"));
    assert_eq!(colored, report.to_string());
}

#[test]
fn test_missing_graph_carries_reason() {
    let report = build();
    match &report.runs[0].steps[1].graph {
        StepGraph::Missing { reason } => assert!(reason.contains("start-of-graph marker")),
        other => panic!("expected missing graph, got {other:?}"),
    }

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    let missing = &json["runs"][0]["steps"][1]["graph"];
    assert!(missing["reason"].as_str().unwrap().contains("start-of-graph marker"));
}
