use serde::{Deserialize, Serialize};

/// One step of a test program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinitionStep {
    /// Step number taken from the `[TestStepN]` section name
    pub number: u32,

    /// Step GUID
    pub guid: String,

    /// Step method code
    pub method: Option<i32>,

    /// Step mode code
    pub mode: Option<i32>,

    /// Step description
    pub description: String,

    /// Current range, kept as text (e.g. "10mA")
    pub current_range: String,

    /// Current limit
    pub current_limit: Option<f64>,

    /// Test time in seconds
    pub test_time: Option<f64>,

    /// Ramp time in seconds
    pub ramp_time: Option<f64>,

    /// Delay time in seconds
    pub delay_time: Option<f64>,

    /// Test voltage
    pub test_voltage: Option<f64>,
}

impl DefinitionStep {
    /// Create a step with only its number set
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }
}

/// One test program loaded from a `.TPR` definition file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestDefinition {
    /// Display name, the definition file stem
    pub name: String,

    /// Program GUID; test runs reference it
    pub guid: String,

    /// Free-text comments
    pub comments: String,

    /// Name of the programmer
    pub programmer: String,

    /// Steps ordered by step number
    pub steps: Vec<DefinitionStep>,
}

impl TestDefinition {
    /// Create a definition with the given name and GUID
    pub fn new(name: &str, guid: &str) -> Self {
        Self {
            name: name.to_string(),
            guid: guid.to_string(),
            ..Default::default()
        }
    }
}
