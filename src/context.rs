//! Map-wide settings and services a stage reads but never owns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use crate::error::StageError;
use crate::timer::Scheduler;

/// Whether stages may be completed out of order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoamingMode {
    #[default]
    Free,
    Complete,
    /// Any other policy string, e.g. `"success"` or `"linear"`.
    Other(String),
}

impl RoamingMode {
    /// Modes under which a `completed` request clears the stage.
    pub fn accepts_completion(&self) -> bool {
        matches!(self, RoamingMode::Free | RoamingMode::Complete)
    }
}

impl From<String> for RoamingMode {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "free" => RoamingMode::Free,
            "complete" => RoamingMode::Complete,
            _ => RoamingMode::Other(raw),
        }
    }
}

impl From<&str> for RoamingMode {
    fn from(raw: &str) -> Self {
        RoamingMode::from(raw.to_string())
    }
}

impl From<RoamingMode> for String {
    fn from(mode: RoamingMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for RoamingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoamingMode::Free => f.write_str("free"),
            RoamingMode::Complete => f.write_str("complete"),
            RoamingMode::Other(raw) => f.write_str(raw),
        }
    }
}

/// The `behaviour` block of the map parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapBehaviour {
    #[serde(default = "default_show_labels")]
    pub show_labels: bool,
    #[serde(default)]
    pub roaming: RoamingMode,
}

fn default_show_labels() -> bool {
    true
}

impl Default for MapBehaviour {
    fn default() -> Self {
        Self {
            show_labels: default_show_labels(),
            roaming: RoamingMode::default(),
        }
    }
}

impl MapBehaviour {
    pub fn from_json(raw: &str) -> Result<Self, StageError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Read-only view of the map a stage is placed on. Cloning is cheap; all
/// stages of one map share the same score accessor and scheduler.
#[derive(Clone)]
pub struct MapContext {
    pub behaviour: MapBehaviour,
    /// Result of the host's touch capability detection.
    pub supports_touch: bool,
    score: Rc<dyn Fn() -> f64>,
    scheduler: Rc<dyn Scheduler>,
}

impl MapContext {
    pub fn new(behaviour: MapBehaviour, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            behaviour,
            supports_touch: false,
            score: Rc::new(|| 0.0),
            scheduler,
        }
    }

    pub fn with_score(mut self, score: impl Fn() -> f64 + 'static) -> Self {
        self.score = Rc::new(score);
        self
    }

    pub fn with_touch_support(mut self, supports_touch: bool) -> Self {
        self.supports_touch = supports_touch;
        self
    }

    pub fn show_labels(&self) -> bool {
        self.behaviour.show_labels
    }

    pub fn roaming(&self) -> &RoamingMode {
        &self.behaviour.roaming
    }

    /// Current player score, queried on demand.
    pub fn score(&self) -> f64 {
        (self.score)()
    }

    pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
        &self.scheduler
    }
}

impl fmt::Debug for MapContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapContext")
            .field("behaviour", &self.behaviour)
            .field("supports_touch", &self.supports_touch)
            .finish()
    }
}
