//! Interactive stages for a game map: an access state machine per stage,
//! label disclosure on hover, focus or touch peek, and telemetry-driven layout.

pub mod components;
pub mod context;
pub mod error;
pub mod label;
pub mod model;
pub mod stage;
pub mod surface;
pub mod timer;
pub mod util;

pub use context::{MapBehaviour, MapContext, RoamingMode};
pub use error::StageError;
pub use label::{Label, LabelPosition, LabelSurface, ShowOptions, TextLabel};
pub use model::{AccessRestrictions, StageParams, StageState, StateId, Telemetry, TelemetryValue, Visuals};
pub use stage::{Interaction, LABEL_TIMEOUT, PointerKind, SetStateOptions, Stage, StageCallbacks, StateKey};
pub use surface::StageSurface;
pub use timer::{BrowserScheduler, ManualScheduler, Scheduler, TimerHandle};
