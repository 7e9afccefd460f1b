use wasm_bindgen::JsCast;
use web_sys::{FocusEvent, MouseEvent, PointerEvent};
use yew::prelude::*;

use super::label_view::LabelView;
use crate::label::LabelSurface;
use crate::stage::{Interaction, PointerKind};
use crate::surface::StageSurface;

#[derive(Properties, PartialEq, Clone)]
pub struct StageButtonProps {
    pub surface: StageSurface,
    pub label: LabelSurface,
    /// Hover and focus listeners are only attached when labels are enabled.
    pub show_labels: bool,
    pub on_interaction: Callback<Interaction>,
}

#[function_component(StageButton)]
pub fn stage_button(props: &StageButtonProps) -> Html {
    let onclick = {
        let cb = props.on_interaction.clone();
        Callback::from(move |e: MouseEvent| {
            // Browsers without PointerEvent clicks report no pointer type.
            let pointer = e
                .dyn_ref::<PointerEvent>()
                .map(|p| PointerKind::from_pointer_type(&p.pointer_type()))
                .unwrap_or(PointerKind::Other);
            cb.emit(Interaction::Click(pointer));
        })
    };
    let hover = |interaction: Interaction| {
        props.show_labels.then(|| {
            let cb = props.on_interaction.clone();
            Callback::from(move |_: MouseEvent| cb.emit(interaction))
        })
    };
    let focus = |interaction: Interaction| {
        props.show_labels.then(|| {
            let cb = props.on_interaction.clone();
            Callback::from(move |_: FocusEvent| cb.emit(interaction))
        })
    };

    let s = &props.surface;
    let class = classes!(s.classes().map(str::to_string).collect::<Vec<_>>());
    let content_class = classes!(s.content_classes().map(str::to_string).collect::<Vec<_>>());

    html! {
        <button
            class={class}
            style={s.style_attr()}
            aria-label={s.aria_label.clone()}
            {onclick}
            onmouseenter={hover(Interaction::PointerEnter)}
            onmouseleave={hover(Interaction::PointerLeave)}
            onfocus={focus(Interaction::Focus)}
            onblur={focus(Interaction::Blur)}
        >
            <div class={content_class}></div>
            <LabelView label={props.label.clone()} />
        </button>
    }
}
