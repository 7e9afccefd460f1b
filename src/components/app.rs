use std::cell::RefCell;
use std::rc::Rc;

use yew::prelude::*;

use super::stage_button::StageButton;
use crate::context::{MapBehaviour, MapContext};
use crate::model::{StageParams, StageState, StateId};
use crate::stage::{Interaction, SetStateOptions, Stage, StageCallbacks};
use crate::timer::BrowserScheduler;
use crate::util::clog;

const DEMO_BEHAVIOUR: &str = r#"{ "showLabels": true, "roaming": "free" }"#;

const DEMO_STAGES: &str = r##"[
    { "id": "intro", "label": "Introduction", "neighbors": ["forest"],
      "telemetry": { "x": 12, "y": 20, "width": 6, "height": 6 },
      "visuals": { "colorStage": "#1768c4", "colorStageCleared": "#0d7d43", "colorStageLocked": "#555555" },
      "canBeStartStage": true, "state": "open" },
    { "id": "forest", "label": "Forest quiz", "neighbors": ["intro", "cave"],
      "telemetry": { "x": 40, "y": 45, "width": 6, "height": 6 },
      "visuals": { "colorStage": "#1768c4", "colorStageCleared": "#0d7d43", "colorStageLocked": "#555555" } },
    { "id": "cave", "label": "Cave riddle", "neighbors": ["forest", "summit"],
      "telemetry": { "x": 68, "y": 62, "width": 6, "height": 6 },
      "visuals": { "colorStage": "#1768c4", "colorStageCleared": "#0d7d43", "colorStageLocked": "#555555" },
      "accessRestrictions": { "openOnScoreSufficient": true, "minScore": 20 } },
    { "id": "summit", "label": "Summit", "neighbors": ["cave"],
      "telemetry": { "x": 85, "y": 85, "width": 6, "height": 6 },
      "visuals": { "colorStage": "#1768c4", "colorStageCleared": "#0d7d43", "colorStageLocked": "#555555" },
      "hidden": true }
]"##;

fn build_stages(
    context: &MapContext,
    clicked: Rc<RefCell<Vec<String>>>,
) -> Vec<Stage> {
    let params: Vec<StageParams> = match serde_json::from_str(DEMO_STAGES) {
        Ok(p) => p,
        Err(err) => {
            clog(&format!("demo stages unreadable: {}", err));
            return Vec::new();
        }
    };
    params
        .into_iter()
        .filter_map(|p| {
            let clicked = clicked.clone();
            let callbacks = StageCallbacks {
                on_clicked: Callback::from(move |id: String| clicked.borrow_mut().push(id)),
                on_state_changed: Callback::from(|(id, state): (String, StageState)| {
                    clog(&format!("stage {} is now {}", id, state));
                }),
            };
            Stage::new(p, context.clone(), callbacks)
                .map_err(|err| clog(&format!("skipping stage: {}", err)))
                .ok()
        })
        .collect()
}

#[function_component(App)]
pub fn app() -> Html {
    let trigger = use_force_update();
    let score = use_mut_ref(|| 0.0_f64);
    let clicked = use_mut_ref(Vec::<String>::new);
    let behaviour = use_memo((), |_| {
        MapBehaviour::from_json(DEMO_BEHAVIOUR).unwrap_or_else(|err| {
            clog(&format!("demo behaviour unreadable: {}", err));
            MapBehaviour::default()
        })
    });
    let stages = {
        let trigger = trigger.clone();
        let score = score.clone();
        let clicked = clicked.clone();
        let behaviour = (*behaviour).clone();
        use_mut_ref(move || {
            let scheduler = BrowserScheduler::new().with_after_fire(move || trigger.force_update());
            let context = MapContext::new(behaviour, Rc::new(scheduler))
                .with_score(move || *score.borrow());
            build_stages(&context, clicked)
        })
    };

    let on_interaction = {
        let stages = stages.clone();
        let clicked = clicked.clone();
        let trigger = trigger.clone();
        Callback::from(move |(idx, interaction): (usize, Interaction)| {
            if let Some(stage) = stages.borrow_mut().get_mut(idx) {
                stage.handle(interaction);
            }
            // Click callbacks only queue ids; act once the stage is released.
            let ids: Vec<String> = clicked.borrow_mut().drain(..).collect();
            for id in ids {
                clog(&format!("stage {} activated", id));
                if let Some(stage) = stages.borrow_mut().iter_mut().find(|s| s.id() == id) {
                    stage.set_state(StateId::Completed, SetStateOptions::default());
                }
            }
            trigger.force_update();
        })
    };
    let unlock_all = {
        let stages = stages.clone();
        let trigger = trigger.clone();
        Callback::from(move |_| {
            stages.borrow_mut().iter_mut().for_each(Stage::unlock);
            trigger.force_update();
        })
    };
    let add_score = {
        let score = score.clone();
        let trigger = trigger.clone();
        Callback::from(move |_| {
            *score.borrow_mut() += 10.0;
            trigger.force_update();
        })
    };
    let reset = {
        let stages = stages.clone();
        let score = score.clone();
        let trigger = trigger.clone();
        Callback::from(move |_| {
            *score.borrow_mut() = 0.0;
            stages.borrow_mut().iter_mut().for_each(Stage::reset);
            trigger.force_update();
        })
    };

    let show_labels = behaviour.show_labels;
    let current_score = *score.borrow();
    html! {
        <div id="root" style="position:relative; width:100vw; height:100vh; background:#0e1116; color:#c9d1d9;">
            <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; gap:6px; align-items:center; z-index:10;">
                <span style="font-variant-numeric:tabular-nums;">{ format!("Score: {}", current_score) }</span>
                <button onclick={add_score}>{"+10"}</button>
                <button onclick={unlock_all}>{"Unlock"}</button>
                <button onclick={reset}>{"Reset"}</button>
            </div>
            <div class="game-map" style="position:absolute; inset:56px 12px 12px 12px;">
                { for stages.borrow().iter().enumerate().map(|(idx, stage)| html! {
                    <StageButton
                        key={stage.id().to_string()}
                        surface={stage.surface().clone()}
                        label={stage.label_surface()}
                        {show_labels}
                        on_interaction={on_interaction.reform(move |i| (idx, i))}
                    />
                }) }
            </div>
        </div>
    }
}
