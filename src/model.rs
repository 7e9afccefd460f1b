//! Core data models for a game map stage.
//! Parameters arrive as JSON from the authoring tool, hence the camelCase renames.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StageError;
use crate::util::parse_float;

/// The shared state enumeration, including the two aliases a host may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateId {
    Locked,
    Unlocking,
    Open,
    /// Alias of `Open`.
    Opened,
    /// Alias of `Cleared`, only honoured under free or complete roaming.
    Completed,
    Cleared,
}

impl StateId {
    pub const ALL: [StateId; 6] = [
        StateId::Locked,
        StateId::Unlocking,
        StateId::Open,
        StateId::Opened,
        StateId::Completed,
        StateId::Cleared,
    ];

    pub fn id(self) -> u32 {
        match self {
            StateId::Locked => 0,
            StateId::Unlocking => 1,
            StateId::Open => 2,
            StateId::Opened => 3,
            StateId::Completed => 4,
            StateId::Cleared => 5,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            StateId::Locked => "locked",
            StateId::Unlocking => "unlocking",
            StateId::Open => "open",
            StateId::Opened => "opened",
            StateId::Completed => "completed",
            StateId::Cleared => "cleared",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State a stage can actually hold. Aliases never survive a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageState {
    Locked,
    Unlocking,
    Open,
    Cleared,
}

impl StageState {
    pub fn state_id(self) -> StateId {
        match self {
            StageState::Locked => StateId::Locked,
            StageState::Unlocking => StateId::Unlocking,
            StageState::Open => StateId::Open,
            StageState::Cleared => StateId::Cleared,
        }
    }

    /// Canonical stored state for an enumeration entry, folding aliases.
    pub fn canonical(state: StateId) -> Self {
        match state {
            StateId::Locked => StageState::Locked,
            StateId::Unlocking => StageState::Unlocking,
            StateId::Open | StateId::Opened => StageState::Open,
            StateId::Completed | StateId::Cleared => StageState::Cleared,
        }
    }

    /// Locked tier: the stage does not react to activation.
    pub fn is_locked_tier(self) -> bool {
        matches!(self, StageState::Locked | StageState::Unlocking)
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.state_id().name())
    }
}

/// Placement on the map: `x`/`y` in percent of the canvas, `width`/`height` as sizes.
/// The authoring tool may store any of them as numeric strings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub x: f64,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub y: f64,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub width: f64,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub height: f64,
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match TelemetryValue::deserialize(deserializer)? {
        TelemetryValue::Number(v) if v.is_finite() => Ok(v),
        TelemetryValue::Number(v) => Err(de::Error::custom(format!("not a finite number: {}", v))),
        TelemetryValue::Text(raw) => {
            parse_float(&raw).ok_or_else(|| de::Error::custom(format!("not a number: {:?}", raw)))
        }
    }
}

impl Telemetry {
    /// Field pairs in the shape `Stage::update` consumes.
    pub fn entries(&self) -> Vec<(String, TelemetryValue)> {
        vec![
            ("x".to_string(), TelemetryValue::Number(self.x)),
            ("y".to_string(), TelemetryValue::Number(self.y)),
            ("width".to_string(), TelemetryValue::Number(self.width)),
            ("height".to_string(), TelemetryValue::Number(self.height)),
        ]
    }

    /// Stores a known field, returns false for anything else.
    pub(crate) fn assign(&mut self, property: &str, value: f64) -> bool {
        match property {
            "x" => self.x = value,
            "y" => self.y = value,
            "width" => self.width = value,
            "height" => self.height = value,
            _ => return false,
        }
        true
    }
}

/// A telemetry value as hosts hand it over: numbers, or numbers in strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Number(f64),
    Text(String),
}

impl From<f64> for TelemetryValue {
    fn from(v: f64) -> Self {
        TelemetryValue::Number(v)
    }
}

impl From<i32> for TelemetryValue {
    fn from(v: i32) -> Self {
        TelemetryValue::Number(v as f64)
    }
}

impl From<&str> for TelemetryValue {
    fn from(v: &str) -> Self {
        TelemetryValue::Text(v.to_string())
    }
}

impl From<String> for TelemetryValue {
    fn from(v: String) -> Self {
        TelemetryValue::Text(v)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visuals {
    pub color_stage: String,
    pub color_stage_cleared: String,
    pub color_stage_locked: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRestrictions {
    #[serde(default)]
    pub open_on_score_sufficient: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
}

impl AccessRestrictions {
    /// True while a minimum score is configured and not yet reached.
    pub fn blocks(&self, score: f64) -> bool {
        self.min_score.is_some_and(|min| min > score)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageParams {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub neighbors: Vec<String>,
    pub telemetry: Telemetry,
    #[serde(default)]
    pub visuals: Visuals,
    #[serde(default)]
    pub access_restrictions: AccessRestrictions,
    #[serde(default)]
    pub can_be_start_stage: bool,
    #[serde(default)]
    pub hidden: bool,
    /// Initial state request; locked when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateId>,
}

impl StageParams {
    pub fn new(id: impl Into<String>, telemetry: Telemetry) -> Self {
        Self {
            id: id.into(),
            label: None,
            neighbors: Vec::new(),
            telemetry,
            visuals: Visuals::default(),
            access_restrictions: AccessRestrictions::default(),
            can_be_start_stage: false,
            hidden: false,
            state: None,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, StageError> {
        let params: StageParams = serde_json::from_str(raw)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), StageError> {
        if self.id.is_empty() {
            return Err(StageError::EmptyId);
        }
        let t = &self.telemetry;
        for (axis, value) in [("x", t.x), ("y", t.y)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(StageError::TelemetryOutOfRange {
                    id: self.id.clone(),
                    axis,
                    value,
                });
            }
        }
        Ok(())
    }
}
