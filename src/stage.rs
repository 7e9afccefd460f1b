//! A single stage on the game map: access state machine, label disclosure
//! and click gating.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, trace};
use yew::Callback;

use crate::context::MapContext;
use crate::error::StageError;
use crate::label::{Label, LabelPosition, LabelSurface, ShowOptions, TextLabel};
use crate::model::{AccessRestrictions, StageParams, StageState, StateId, Telemetry, TelemetryValue};
use crate::surface::{HIDDEN_CLASS, StageSurface};
use crate::timer::TimerHandle;
use crate::util::parse_float;

/// How long a label disclosed by a touch peek stays up.
pub const LABEL_TIMEOUT: Duration = Duration::from_millis(3000);

pub const STAGE_CLASS: &str = "game-map-stage";
pub const CONTENT_CLASS: &str = "game-map-stage-content";

/// Marker class on the hotspot for a given state.
pub fn state_class(state: StateId) -> String {
    format!("{}-{}", STAGE_CLASS, state.name())
}

#[derive(Clone, PartialEq)]
pub struct StageCallbacks {
    /// Fired with the stage id for every activation that passes the gate.
    pub on_clicked: Callback<String>,
    /// Fired once per committed transition.
    pub on_state_changed: Callback<(String, StageState)>,
}

impl Default for StageCallbacks {
    fn default() -> Self {
        Self {
            on_clicked: Callback::noop(),
            on_state_changed: Callback::noop(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
    /// No pointer, e.g. a click synthesized from the keyboard.
    Other,
}

impl PointerKind {
    /// Maps a DOM `pointerType`.
    pub fn from_pointer_type(raw: &str) -> Self {
        match raw {
            "mouse" => PointerKind::Mouse,
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    Click(PointerKind),
    PointerEnter,
    Focus,
    PointerLeave,
    Blur,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetStateOptions {
    /// Apply the request as is, skipping roaming rules and reveal side effects.
    pub force: bool,
}

impl SetStateOptions {
    pub const FORCE: SetStateOptions = SetStateOptions { force: true };
}

/// A state request by name, numeric id, or enumeration entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateKey<'a> {
    Name(&'a str),
    Id(u32),
    State(StateId),
}

impl StateKey<'_> {
    pub fn resolve(self) -> Option<StateId> {
        match self {
            StateKey::Name(name) => StateId::from_name(name),
            StateKey::Id(id) => StateId::from_id(id),
            StateKey::State(state) => Some(state),
        }
    }
}

impl<'a> From<&'a str> for StateKey<'a> {
    fn from(name: &'a str) -> Self {
        StateKey::Name(name)
    }
}

impl From<u32> for StateKey<'_> {
    fn from(id: u32) -> Self {
        StateKey::Id(id)
    }
}

impl From<StateId> for StateKey<'_> {
    fn from(state: StateId) -> Self {
        StateKey::State(state)
    }
}

impl From<StageState> for StateKey<'_> {
    fn from(state: StageState) -> Self {
        StateKey::State(state.state_id())
    }
}

pub struct Stage {
    params: StageParams,
    context: MapContext,
    callbacks: StageCallbacks,
    surface: StageSurface,
    label: Rc<dyn Label>,
    label_position: LabelPosition,
    state: Option<StageState>,
    label_timer: Option<TimerHandle>,
}

impl Stage {
    pub fn new(
        params: StageParams,
        context: MapContext,
        callbacks: StageCallbacks,
    ) -> Result<Self, StageError> {
        let position = LabelPosition::for_placement(params.telemetry.x, params.telemetry.y);
        let label = TextLabel::new(params.label.clone().unwrap_or_default(), position);
        Self::with_label(params, context, callbacks, Rc::new(label))
    }

    /// Builds a stage around a caller-provided label. The label should be
    /// placed at `LabelPosition::for_placement` of the initial telemetry.
    pub fn with_label(
        params: StageParams,
        context: MapContext,
        callbacks: StageCallbacks,
        label: Rc<dyn Label>,
    ) -> Result<Self, StageError> {
        params.validate()?;
        let label_position = LabelPosition::for_placement(params.telemetry.x, params.telemetry.y);

        let mut surface = StageSurface::new(STAGE_CLASS, CONTENT_CLASS);
        surface.aria_label = params.label.clone();
        surface.set_style("--stage-color", params.visuals.color_stage.as_str());
        surface.set_style("--stage-color-cleared", params.visuals.color_stage_cleared.as_str());
        surface.set_style("--stage-color-locked", params.visuals.color_stage_locked.as_str());

        let mut stage = Self {
            params,
            context,
            callbacks,
            surface,
            label,
            label_position,
            state: None,
            label_timer: None,
        };

        let initial = stage.params.state.unwrap_or(StateId::Locked);
        stage.set_state(initial, SetStateOptions::default());
        if stage.state.is_none() {
            debug!("stage {}: initial state {} not applicable, locking", stage.params.id, initial);
            stage.set_state(StateId::Locked, SetStateOptions::FORCE);
        }

        if stage.params.hidden {
            stage.hide();
        }

        let telemetry = stage.params.telemetry.entries();
        stage.update(telemetry);
        Ok(stage)
    }

    pub fn surface(&self) -> &StageSurface {
        &self.surface
    }

    pub fn id(&self) -> &str {
        &self.params.id
    }

    pub fn neighbors(&self) -> &[String] {
        &self.params.neighbors
    }

    pub fn can_be_start_stage(&self) -> bool {
        self.params.can_be_start_stage
    }

    pub fn access_restrictions(&self) -> &AccessRestrictions {
        &self.params.access_restrictions
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.params.telemetry
    }

    pub fn label(&self) -> &dyn Label {
        self.label.as_ref()
    }

    pub fn label_surface(&self) -> LabelSurface {
        self.label.surface()
    }

    /// Fixed at construction; later telemetry updates do not move the label.
    pub fn label_position(&self) -> LabelPosition {
        self.label_position
    }

    pub fn show(&mut self) {
        self.surface.remove_class(HIDDEN_CLASS);
    }

    pub fn hide(&mut self) {
        self.surface.add_class(HIDDEN_CLASS);
    }

    pub fn is_visible(&self) -> bool {
        !self.surface.is_hidden()
    }

    pub fn state(&self) -> StageState {
        self.state.unwrap_or(StageState::Locked)
    }

    /// Opens the stage, or parks it in `Unlocking` while the score is short
    /// of the configured minimum. Only acts from the locked tier.
    pub fn unlock(&mut self) {
        if !self.state().is_locked_tier() {
            return;
        }
        if self.params.access_restrictions.blocks(self.context.score()) {
            self.set_state(StateId::Unlocking, SetStateOptions::default());
            return;
        }
        self.set_state(StateId::Open, SetStateOptions::default());
    }

    /// Back to `Locked` regardless of restrictions, re-hidden if configured hidden.
    pub fn reset(&mut self) {
        self.set_state(StateId::Locked, SetStateOptions::FORCE);
        if self.params.hidden {
            self.hide();
        }
    }

    /// Applies telemetry. `x`/`y` land on `left`/`top`, every other property
    /// keeps its name; values are written as percentages.
    pub fn update<I, K, V>(&mut self, params: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<TelemetryValue>,
    {
        for (property, value) in params {
            let property = property.as_ref();
            let parsed = match value.into() {
                TelemetryValue::Number(v) => Some(v).filter(|v| v.is_finite()),
                TelemetryValue::Text(raw) => parse_float(&raw),
            };
            let Some(value) = parsed else {
                debug!("stage {}: ignoring non-numeric {}", self.params.id, property);
                continue;
            };
            self.params.telemetry.assign(property, value);
            let style_property = match property {
                "x" => "left",
                "y" => "top",
                other => other,
            };
            self.surface.set_style(style_property, format!("{}%", value));
        }
    }

    pub fn set_state<'a>(&mut self, requested: impl Into<StateKey<'a>>, options: SetStateOptions) {
        let key = requested.into();
        let Some(requested) = key.resolve() else {
            debug!("stage {}: unknown state {:?}", self.params.id, key);
            return;
        };

        let target = if options.force {
            StageState::canonical(requested)
        } else {
            match self.normalize(requested) {
                Some(target) => target,
                None => {
                    debug!(
                        "stage {}: {} dropped under roaming {}",
                        self.params.id,
                        requested,
                        self.context.roaming()
                    );
                    return;
                }
            }
        };

        if self.state == Some(target) {
            return;
        }
        trace!("stage {}: {} -> {}", self.params.id, self.state(), target);
        self.state = Some(target);
        for state in StateId::ALL {
            self.surface.set_content_class(&state_class(state), state == target.state_id());
        }
        self.callbacks.on_state_changed.emit((self.params.id.clone(), target));
    }

    fn normalize(&mut self, requested: StateId) -> Option<StageState> {
        match requested {
            StateId::Locked => Some(StageState::Locked),
            StateId::Unlocking => {
                self.show();
                Some(StageState::Unlocking)
            }
            StateId::Open | StateId::Opened => {
                self.show();
                Some(StageState::Open)
            }
            StateId::Completed if self.context.roaming().accepts_completion() => Some(StageState::Cleared),
            StateId::Cleared => Some(StageState::Cleared),
            StateId::Completed => None,
        }
    }

    pub fn handle(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::Click(pointer) => self.handle_click(pointer),
            Interaction::PointerEnter | Interaction::Focus => {
                if self.hover_disclosure() {
                    self.label.show(ShowOptions {
                        is_touch: false,
                        skip_delay: interaction == Interaction::Focus,
                    });
                }
            }
            Interaction::PointerLeave | Interaction::Blur => {
                if self.hover_disclosure() {
                    self.hide_label();
                }
            }
        }
    }

    fn handle_click(&mut self, pointer: PointerKind) {
        if pointer != PointerKind::Mouse
            && self.has_label()
            && !self.label.is_showing()
            && self.context.show_labels()
        {
            self.peek_label();
            return;
        }

        if self.state().is_locked_tier() {
            return;
        }

        self.hide_label();
        self.callbacks.on_clicked.emit(self.params.id.clone());
    }

    /// Touch devices have no hover, so the first tap only reveals the label.
    fn peek_label(&mut self) {
        self.cancel_label_timer();
        self.label.show(ShowOptions { is_touch: true, skip_delay: false });
        let label = Rc::clone(&self.label);
        let handle = self
            .context
            .scheduler()
            .schedule(LABEL_TIMEOUT, Box::new(move || label.hide()));
        self.label_timer = Some(handle);
    }

    fn hide_label(&mut self) {
        self.cancel_label_timer();
        self.label.hide();
    }

    fn cancel_label_timer(&mut self) {
        if let Some(handle) = self.label_timer.take() {
            self.context.scheduler().cancel(handle);
        }
    }

    pub fn label_timer_pending(&self) -> bool {
        self.label_timer
            .is_some_and(|handle| self.context.scheduler().is_pending(handle))
    }

    fn has_label(&self) -> bool {
        self.params.label.as_deref().is_some_and(|l| !l.is_empty())
    }

    fn hover_disclosure(&self) -> bool {
        self.context.show_labels() && !self.context.supports_touch
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.cancel_label_timer();
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("id", &self.params.id)
            .field("state", &self.state)
            .field("visible", &self.is_visible())
            .field("label_position", &self.label_position)
            .finish()
    }
}
