pub mod app;
pub mod label_view;
pub mod stage_button;

pub use app::App;
pub use label_view::LabelView;
pub use stage_button::StageButton;
