//! Caption shown next to a stage.
//! A stage only talks to its label through the `Label` trait; `TextLabel` is
//! the plain implementation the map uses.

use std::cell::Cell;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShowOptions {
    /// Disclosed by a touch peek rather than hover or focus.
    pub is_touch: bool,
    /// Show immediately instead of after the entrance delay.
    pub skip_delay: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Right,
}

/// Side of the stage the label sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelPosition {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl LabelPosition {
    /// Picks the side with more room: stages left of center get a label on
    /// their right, stages in the upper half get it below.
    pub fn for_placement(x: f64, y: f64) -> Self {
        Self {
            vertical: if y < 50.0 { Vertical::Bottom } else { Vertical::Top },
            horizontal: if x < 50.0 { Horizontal::Right } else { Horizontal::Left },
        }
    }
}

impl fmt::Display for LabelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self.vertical {
            Vertical::Top => "top",
            Vertical::Bottom => "bottom",
        };
        let h = match self.horizontal {
            Horizontal::Left => "left",
            Horizontal::Right => "right",
        };
        write!(f, "{}-{}", v, h)
    }
}

/// Render snapshot of a label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelSurface {
    pub text: String,
    pub position: LabelPosition,
    pub showing: bool,
    pub touch: bool,
    pub skip_delay: bool,
}

pub trait Label {
    fn show(&self, options: ShowOptions);
    fn hide(&self);
    fn is_showing(&self) -> bool;
    fn surface(&self) -> LabelSurface;
}

#[derive(Debug)]
pub struct TextLabel {
    text: String,
    position: LabelPosition,
    shown_with: Cell<Option<ShowOptions>>,
}

impl TextLabel {
    pub fn new(text: impl Into<String>, position: LabelPosition) -> Self {
        Self {
            text: text.into(),
            position,
            shown_with: Cell::new(None),
        }
    }
}

impl Label for TextLabel {
    fn show(&self, options: ShowOptions) {
        if self.text.is_empty() {
            return;
        }
        self.shown_with.set(Some(options));
    }

    fn hide(&self) {
        self.shown_with.set(None);
    }

    fn is_showing(&self) -> bool {
        self.shown_with.get().is_some()
    }

    fn surface(&self) -> LabelSurface {
        let opts = self.shown_with.get();
        LabelSurface {
            text: self.text.clone(),
            position: self.position,
            showing: opts.is_some(),
            touch: opts.is_some_and(|o| o.is_touch),
            skip_delay: opts.is_some_and(|o| o.skip_delay),
        }
    }
}
