//! # Association Module
//!
//! Links test runs to the test definitions they were executed from by
//! program GUID. GUIDs are opaque and compared exactly (case-sensitive).
//!
//! Every `(record, definition)` pair with equal GUIDs is reported, so a
//! definition set that contains the same GUID twice yields two matches for
//! each referencing run. Runs and definitions that match nothing are
//! reported as orphans; neither case is an error.
//!
//! ```rust
//! use glp2report::association::associate;
//! use glp2report::records::{TestDefinition, TestRecord};
//!
//! let records = vec![TestRecord::new("a.csv", "run-1", "A")];
//! let definitions = vec![TestDefinition::new("one", "A"), TestDefinition::new("two", "B")];
//!
//! let result = associate(&records, &definitions);
//! assert_eq!(result.matches.len(), 1);
//! assert_eq!(result.unmatched_definitions, vec![1]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::records::{TestDefinition, TestRecord};

#[cfg(test)]
mod tests;

/// A run linked to a definition, by index into the inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordMatch {
    /// Index into the record collection
    pub record: usize,
    /// Index into the definition collection
    pub definition: usize,
}

/// Outcome of linking runs to definitions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationResult {
    /// Every matching pair, record-major in input order
    pub matches: Vec<RecordMatch>,

    /// Records that matched no definition, ascending
    pub unmatched_records: Vec<usize>,

    /// Definitions that no record referenced, ascending
    pub unmatched_definitions: Vec<usize>,

    /// Distinct program names referenced per data file
    pub programs_by_file: BTreeMap<String, BTreeSet<String>>,
}

impl AssociationResult {
    /// Definitions matched by one record, in definition order
    pub fn definitions_for(&self, record: usize) -> impl Iterator<Item = usize> + '_ {
        self.matches
            .iter()
            .filter(move |m| m.record == record)
            .map(|m| m.definition)
    }

    /// True if any record or definition is unmatched
    pub fn has_orphans(&self) -> bool {
        !self.unmatched_records.is_empty() || !self.unmatched_definitions.is_empty()
    }

    /// Program GUIDs that appear on more than one matched definition
    pub fn duplicate_definition_guids<'a>(
        &self,
        definitions: &'a [TestDefinition],
    ) -> Vec<&'a str> {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        let matched: BTreeSet<usize> = self.matches.iter().map(|m| m.definition).collect();
        for dfn in matched.into_iter().filter_map(|idx| definitions.get(idx)) {
            *seen.entry(dfn.guid.as_str()).or_default() += 1;
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(guid, _)| guid)
            .collect()
    }
}

/// Link every record to every definition with an equal program GUID.
///
/// Runs the full `records × definitions` cross product; there is no early
/// exit because duplicated definition GUIDs must each produce a match.
pub fn associate(records: &[TestRecord], definitions: &[TestDefinition]) -> AssociationResult {
    let matches: Vec<RecordMatch> = records
        .iter()
        .enumerate()
        .flat_map(|(r, record)| {
            definitions
                .iter()
                .enumerate()
                .filter(move |(_, dfn)| dfn.guid == record.program_guid)
                .map(move |(d, _)| RecordMatch {
                    record: r,
                    definition: d,
                })
        })
        .collect();

    let matched_records: BTreeSet<usize> = matches.iter().map(|m| m.record).collect();
    let matched_definitions: BTreeSet<usize> = matches.iter().map(|m| m.definition).collect();

    let unmatched_records: Vec<usize> = (0..records.len())
        .filter(|i| !matched_records.contains(i))
        .collect();
    let unmatched_definitions: Vec<usize> = (0..definitions.len())
        .filter(|i| !matched_definitions.contains(i))
        .collect();

    let programs_by_file = records.iter().fold(
        BTreeMap::<String, BTreeSet<String>>::new(),
        |mut acc, record| {
            acc.entry(record.source_file.clone())
                .or_default()
                .insert(record.program_name.clone());
            acc
        },
    );

    debug!(
        "Associated {} record(s) with {} definition(s): {} match(es), {} orphan record(s), {} orphan definition(s)",
        records.len(),
        definitions.len(),
        matches.len(),
        unmatched_records.len(),
        unmatched_definitions.len()
    );

    AssociationResult {
        matches,
        unmatched_records,
        unmatched_definitions,
        programs_by_file,
    }
}
