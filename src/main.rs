use yew_game_map::components::App;
use yew_game_map::util::init_tracing;

fn main() {
    init_tracing();
    yew::Renderer::<App>::new().render();
}
