use super::*;
use proptest::prelude::*;

fn record(file: &str, guid: &str, program: &str) -> TestRecord {
    TestRecord::new(file, "run", guid).with_program_name(program)
}

fn definition(guid: &str) -> TestDefinition {
    TestDefinition::new(guid, guid)
}

#[test]
fn test_duplicate_definition_guids_each_match() {
    let records = vec![record("a.csv", "A", "Mains")];
    let definitions = vec![definition("A"), definition("A")];

    let result = associate(&records, &definitions);

    assert_eq!(
        result.matches,
        vec![
            RecordMatch { record: 0, definition: 0 },
            RecordMatch { record: 0, definition: 1 },
        ]
    );
    assert!(result.unmatched_records.is_empty());
    assert!(result.unmatched_definitions.is_empty());
    assert_eq!(result.duplicate_definition_guids(&definitions), vec!["A"]);
}

#[test]
fn test_no_match_reports_both_orphans() {
    let records = vec![record("a.csv", "A", "Mains")];
    let definitions = vec![definition("B")];

    let result = associate(&records, &definitions);

    assert!(result.matches.is_empty());
    assert_eq!(result.unmatched_records, vec![0]);
    assert_eq!(result.unmatched_definitions, vec![0]);
    assert!(result.has_orphans());
}

#[test]
fn test_guid_comparison_is_case_sensitive() {
    let records = vec![record("a.csv", "abc", "P")];
    let definitions = vec![definition("ABC")];
    assert!(associate(&records, &definitions).matches.is_empty());
}

#[test]
fn test_empty_inputs() {
    let result = associate(&[], &[]);
    assert_eq!(result, AssociationResult::default());
    assert!(!result.has_orphans());

    let result = associate(&[], &[definition("A")]);
    assert_eq!(result.unmatched_definitions, vec![0]);
}

#[test]
fn test_definitions_for_record() {
    let records = vec![record("a.csv", "A", "P"), record("a.csv", "B", "Q")];
    let definitions = vec![definition("B"), definition("A"), definition("B")];

    let result = associate(&records, &definitions);

    assert_eq!(result.definitions_for(0).collect::<Vec<_>>(), vec![1]);
    assert_eq!(result.definitions_for(1).collect::<Vec<_>>(), vec![0, 2]);
}

#[test]
fn test_programs_grouped_by_file() {
    let records = vec![
        record("a.csv", "A", "Mains"),
        record("a.csv", "B", "Probe"),
        record("a.csv", "A", "Mains"),
        record("b.csv", "Z", "Mains"),
    ];

    let result = associate(&records, &[definition("A")]);

    assert_eq!(result.programs_by_file.len(), 2);
    let a: Vec<_> = result.programs_by_file["a.csv"].iter().cloned().collect();
    assert_eq!(a, vec!["Mains".to_string(), "Probe".to_string()]);
    assert_eq!(result.programs_by_file["b.csv"].len(), 1);
    assert_eq!(result.unmatched_records, vec![1, 3]);
}

proptest! {
    #[test]
    fn prop_every_record_matched_or_orphaned(
        record_guids in prop::collection::vec("[ABC]", 0..12),
        definition_guids in prop::collection::vec("[ABCD]", 0..8),
    ) {
        let records: Vec<_> = record_guids.iter().map(|g| record("f.csv", g, "P")).collect();
        let definitions: Vec<_> = definition_guids.iter().map(|g| definition(g)).collect();

        let result = associate(&records, &definitions);

        for (i, guid) in record_guids.iter().enumerate() {
            let matched = result.matches.iter().any(|m| m.record == i);
            let orphan = result.unmatched_records.contains(&i);
            prop_assert!(matched != orphan);

            let expected = definition_guids.iter().filter(|d| *d == guid).count();
            prop_assert_eq!(result.definitions_for(i).count(), expected);
        }
        for j in 0..definitions.len() {
            let matched = result.matches.iter().any(|m| m.definition == j);
            prop_assert!(matched != result.unmatched_definitions.contains(&j));
        }
    }
}
