use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};

use super::text::{decode_text_with, TextEncoding};
use super::{DefinitionStep, LoadError, TestDefinition};

const GENERAL_SECTION: &str = "general data";
const STEP_SECTION_PREFIX: &str = "teststep";

mod keys {
    pub const GUID: &str = "guid";
    pub const COMMENTS: &str = "comments";
    pub const PROGRAMMER: &str = "name of programmer";
    pub const METHOD: &str = "stepmethod";
    pub const MODE: &str = "mode";
    pub const DESCRIPTION: &str = "description";
    pub const CURRENT_RANGE: &str = "currentrange";
    pub const CURRENT_LIMIT: &str = "limit value";
    pub const TEST_TIME: &str = "testtime";
    pub const RAMP_TIME: &str = "ramptime";
    pub const DELAY_TIME: &str = "delaytime";
    pub const TEST_VOLTAGE: &str = "testvoltage";
}

/// Sections of an INI-style file: lower-cased section name to lower-cased keys
type Sections = Vec<(String, HashMap<String, String>)>;

fn parse_sections(source: &str, text: &str) -> Result<Sections, LoadError> {
    let mut sections: Sections = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[') {
            let name = name.strip_suffix(']').ok_or_else(|| {
                LoadError::InvalidFormat(format!(
                    "{}:{}: unterminated section header",
                    source,
                    line_no + 1
                ))
            })?;
            sections.push((name.trim().to_lowercase(), HashMap::new()));
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .or_else(|| line.split_once(':'))
            .ok_or_else(|| {
                LoadError::InvalidFormat(format!(
                    "{}:{}: expected 'key = value'",
                    source,
                    line_no + 1
                ))
            })?;

        let (_, entries) = sections.last_mut().ok_or_else(|| {
            LoadError::InvalidFormat(format!(
                "{}:{}: entry outside of any section",
                source,
                line_no + 1
            ))
        })?;
        entries.insert(key.trim().to_lowercase(), value.trim().to_string());
    }

    Ok(sections)
}

fn text_value(entries: &HashMap<String, String>, key: &str) -> String {
    entries.get(key).cloned().unwrap_or_default()
}

fn numeric_value<T: std::str::FromStr>(
    source: &str,
    section: &str,
    entries: &HashMap<String, String>,
    key: &str,
) -> Option<T> {
    let raw = entries.get(key)?;
    match raw.trim().replace(',', ".").parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{}: [{}] {} = '{}' is not a number, ignored", source, section, key, raw);
            None
        }
    }
}

fn integer_value(
    source: &str,
    section: &str,
    entries: &HashMap<String, String>,
    key: &str,
) -> Option<i32> {
    let raw = entries.get(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{}: [{}] {} = '{}' is not an integer, ignored", source, section, key, raw);
            None
        }
    }
}

fn parse_step(
    source: &str,
    section: &str,
    number: u32,
    entries: &HashMap<String, String>,
) -> DefinitionStep {
    DefinitionStep {
        number,
        guid: text_value(entries, keys::GUID),
        method: integer_value(source, section, entries, keys::METHOD),
        mode: integer_value(source, section, entries, keys::MODE),
        description: text_value(entries, keys::DESCRIPTION),
        current_range: text_value(entries, keys::CURRENT_RANGE),
        current_limit: numeric_value(source, section, entries, keys::CURRENT_LIMIT),
        test_time: numeric_value(source, section, entries, keys::TEST_TIME),
        ramp_time: numeric_value(source, section, entries, keys::RAMP_TIME),
        delay_time: numeric_value(source, section, entries, keys::DELAY_TIME),
        test_voltage: numeric_value(source, section, entries, keys::TEST_VOLTAGE),
    }
}

/// Decode the text of a `.TPR` test definition.
///
/// `name` becomes the definition's display name. A missing GUID is not an
/// error: the definition loads with an empty GUID and matches no run.
pub fn parse_definition(name: &str, text: &str) -> Result<TestDefinition, LoadError> {
    let sections = parse_sections(name, text)?;
    let mut definition = TestDefinition::new(name, "");

    for (section, entries) in &sections {
        if section == GENERAL_SECTION {
            definition.guid = text_value(entries, keys::GUID);
            definition.comments = text_value(entries, keys::COMMENTS);
            definition.programmer = text_value(entries, keys::PROGRAMMER);
        } else if let Some(number) = section.strip_prefix(STEP_SECTION_PREFIX) {
            match number.trim().parse::<u32>() {
                Ok(number) => definition
                    .steps
                    .push(parse_step(name, section, number, entries)),
                Err(_) => warn!("{}: ignoring section [{}]", name, section),
            }
        }
    }

    if definition.guid.is_empty() {
        warn!("{}: no GUID in [General Data]; no test run can reference it", name);
    }

    definition.steps.sort_by_key(|step| step.number);
    Ok(definition)
}

/// Load a test definition from a `.TPR` file
pub fn load_definition_file<P: AsRef<Path>>(path: P) -> Result<TestDefinition, LoadError> {
    load_definition_file_with(path, TextEncoding::Auto)
}

/// Load one test definition, assuming `encoding` if the file has no BOM
pub fn load_definition_file_with<P: AsRef<Path>>(
    path: P,
    encoding: TextEncoding,
) -> Result<TestDefinition, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let text = decode_text_with(&bytes, encoding)?;

    let name = path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let definition = parse_definition(&name, &text)?;
    debug!(
        "{}: GUID '{}', {} step(s)",
        name,
        definition.guid,
        definition.steps.len()
    );
    Ok(definition)
}
