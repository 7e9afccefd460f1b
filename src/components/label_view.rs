use yew::prelude::*;

use crate::label::LabelSurface;

#[derive(Properties, PartialEq, Clone)]
pub struct LabelViewProps {
    pub label: LabelSurface,
}

#[function_component(LabelView)]
pub fn label_view(props: &LabelViewProps) -> Html {
    let l = &props.label;
    if l.text.is_empty() {
        return html! {};
    }
    let class = classes!(
        "game-map-stage-label",
        l.position.to_string(),
        l.showing.then_some("visible"),
        l.touch.then_some("touch"),
        l.skip_delay.then_some("skip-delay")
    );
    html! {
        <div class={class} aria-hidden="true">
            <span class="game-map-stage-label-text">{ l.text.clone() }</span>
        </div>
    }
}
