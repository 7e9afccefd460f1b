//! End-to-end checks of the stage protocol as a map host drives it: JSON
//! config in, interactions and clock ticks, callbacks out.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use yew::Callback;
use yew_game_map::{
    Interaction, LABEL_TIMEOUT, ManualScheduler, MapBehaviour, MapContext, PointerKind,
    SetStateOptions, Stage, StageCallbacks, StageError, StageParams, StageState,
};
use yew_game_map::util::console_subscriber;

struct Host {
    clock: ManualScheduler,
    score: Rc<Cell<f64>>,
    clicked: Rc<RefCell<Vec<String>>>,
    changed: Rc<RefCell<Vec<(String, StageState)>>>,
}

impl Host {
    fn new() -> Self {
        Self {
            clock: ManualScheduler::new(),
            score: Rc::new(Cell::new(0.0)),
            clicked: Rc::new(RefCell::new(Vec::new())),
            changed: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn place(&self, stage_json: &str, behaviour_json: &str) -> Result<Stage, StageError> {
        let params = StageParams::from_json(stage_json)?;
        let behaviour = MapBehaviour::from_json(behaviour_json)?;
        let score = self.score.clone();
        let context = MapContext::new(behaviour, Rc::new(self.clock.clone()))
            .with_score(move || score.get());
        let clicked = self.clicked.clone();
        let changed = self.changed.clone();
        Stage::new(
            params,
            context,
            StageCallbacks {
                on_clicked: Callback::from(move |id: String| clicked.borrow_mut().push(id)),
                on_state_changed: Callback::from(move |c: (String, StageState)| {
                    changed.borrow_mut().push(c)
                }),
            },
        )
    }
}

const GATED: &str = r##"{
    "id": "cave",
    "label": "Cave riddle",
    "neighbors": ["forest"],
    "telemetry": { "x": "68", "y": 62, "width": 6, "height": 6 },
    "visuals": { "colorStage": "#1768c4", "colorStageCleared": "#0d7d43", "colorStageLocked": "#555" },
    "accessRestrictions": { "openOnScoreSufficient": true, "minScore": 50 },
    "hidden": true
}"##;

const FREE: &str = r#"{ "showLabels": true, "roaming": "free" }"#;
const LINEAR: &str = r#"{ "showLabels": true, "roaming": "linear" }"#;

#[test]
fn string_telemetry_in_config_places_the_stage() {
    let host = Host::new();
    let stage = host
        .place(
            r#"{"id":"s1","label":"A","telemetry":{"x":"37.5","y":"10","width":"42","height":"42"}}"#,
            FREE,
        )
        .expect("stage");
    assert_eq!(stage.telemetry().x, 37.5);
    assert_eq!(stage.telemetry().y, 10.0);
    assert_eq!(stage.surface().style("left"), Some("37.5%"));
    assert_eq!(stage.surface().style("top"), Some("10%"));
    assert_eq!(stage.surface().style("width"), Some("42%"));
    assert_eq!(stage.label_position().to_string(), "bottom-right");
}

#[test]
fn unreadable_config_is_reported() {
    let host = Host::new();
    assert!(matches!(
        host.place(r#"{"id":"s1","telemetry":{"x":"far","y":0,"width":1,"height":1}}"#, FREE),
        Err(StageError::Config(_))
    ));
}

#[test]
fn score_gated_stage_walks_through_unlocking() {
    let host = Host::new();
    let mut stage = host.place(GATED, FREE).expect("stage");
    assert!(!stage.is_visible());
    assert_eq!(stage.access_restrictions().min_score, Some(50.0));

    host.score.set(30.0);
    stage.unlock();
    assert_eq!(stage.state(), StageState::Unlocking);
    assert!(stage.is_visible());
    stage.handle(Interaction::Click(PointerKind::Mouse));
    assert!(host.clicked.borrow().is_empty());

    host.score.set(60.0);
    stage.unlock();
    assert_eq!(stage.state(), StageState::Open);
    stage.handle(Interaction::Click(PointerKind::Mouse));
    assert_eq!(*host.clicked.borrow(), vec!["cave".to_string()]);

    stage.set_state("completed", SetStateOptions::default());
    assert_eq!(stage.state(), StageState::Cleared);

    stage.reset();
    assert_eq!(stage.state(), StageState::Locked);
    assert!(!stage.is_visible());

    let states: Vec<StageState> = host.changed.borrow().iter().map(|(_, s)| *s).collect();
    assert_eq!(
        states,
        vec![
            StageState::Locked,
            StageState::Unlocking,
            StageState::Open,
            StageState::Cleared,
            StageState::Locked,
        ]
    );
}

#[test]
fn completion_is_ignored_under_linear_roaming() {
    let host = Host::new();
    let mut stage = host.place(GATED, LINEAR).expect("stage");
    stage.set_state("open", SetStateOptions::default());
    let before = host.changed.borrow().len();
    stage.set_state("completed", SetStateOptions::default());
    assert_eq!(stage.state(), StageState::Open);
    assert_eq!(host.changed.borrow().len(), before);
}

#[test]
fn touch_peek_then_activate_within_timeout() {
    let host = Host::new();
    host.score.set(100.0);
    let mut stage = host.place(GATED, FREE).expect("stage");
    stage.unlock();

    stage.handle(Interaction::Click(PointerKind::Touch));
    assert!(stage.label().is_showing());
    assert!(host.clicked.borrow().is_empty());

    host.clock.advance(LABEL_TIMEOUT - Duration::from_millis(1));
    stage.handle(Interaction::Click(PointerKind::Touch));
    assert_eq!(host.clicked.borrow().len(), 1);
    assert!(!stage.label().is_showing());

    // the cancelled hide never fires late
    stage.handle(Interaction::PointerEnter);
    host.clock.advance(Duration::from_secs(5));
    assert!(stage.label().is_showing());
}

#[test]
fn tap_after_timeout_peeks_again() {
    let host = Host::new();
    host.score.set(100.0);
    let mut stage = host.place(GATED, FREE).expect("stage");
    stage.unlock();

    stage.handle(Interaction::Click(PointerKind::Touch));
    host.clock.advance(LABEL_TIMEOUT);
    assert!(!stage.label().is_showing());

    stage.handle(Interaction::Click(PointerKind::Touch));
    assert!(stage.label().is_showing());
    assert!(host.clicked.borrow().is_empty());
}

#[test]
fn labels_disabled_means_taps_activate_directly() {
    let host = Host::new();
    let mut stage = host
        .place(GATED, r#"{ "showLabels": false, "roaming": "free" }"#)
        .expect("stage");
    stage.set_state("open", SetStateOptions::default());
    stage.handle(Interaction::Click(PointerKind::Touch));
    assert_eq!(host.clicked.borrow().len(), 1);
    assert_eq!(host.clock.pending(), 0);
}

#[test]
fn relayout_moves_the_stage_but_not_its_label() {
    let host = Host::new();
    let mut stage = host.place(GATED, FREE).expect("stage");
    assert_eq!(stage.label_position().to_string(), "top-left");
    stage.update([("x", "37.5"), ("y", "10")]);
    assert_eq!(stage.surface().style("left"), Some("37.5%"));
    assert_eq!(stage.surface().style("top"), Some("10%"));
    assert_eq!(stage.label_position().to_string(), "top-left");
    assert_eq!(stage.label_surface().position.to_string(), "top-left");
}

#[test]
fn dropped_requests_are_logged_to_the_console_sink() {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink_lines = lines.clone();
    let subscriber = console_subscriber(move |line: &str| {
        sink_lines.lock().expect("lock").push(line.to_string())
    });
    tracing::subscriber::with_default(subscriber, || {
        let host = Host::new();
        let mut stage = host.place(GATED, LINEAR).expect("stage");
        stage.set_state("sealed", SetStateOptions::default());
        stage.set_state("completed", SetStateOptions::default());
    });
    let lines = lines.lock().expect("lock");
    assert!(lines.iter().any(|l| l.contains("stage cave: unknown state")));
    assert!(lines.iter().any(|l| l.contains("stage cave: completed dropped under roaming linear")));
}
