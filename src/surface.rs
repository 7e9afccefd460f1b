use std::collections::{BTreeMap, BTreeSet};

/// Class toggled on a surface to suppress it visually.
pub const HIDDEN_CLASS: &str = "display-none";

/// Renderable description of a stage: the button element, its style
/// properties, and the classes of the inner hotspot element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageSurface {
    pub aria_label: Option<String>,
    classes: BTreeSet<String>,
    style: BTreeMap<String, String>,
    content_classes: BTreeSet<String>,
}

impl StageSurface {
    pub fn new(base_class: &str, content_class: &str) -> Self {
        let mut surface = Self::default();
        surface.classes.insert(base_class.to_string());
        surface.content_classes.insert(content_class.to_string());
        surface
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn set_content_class(&mut self, class: &str, on: bool) {
        if on {
            self.content_classes.insert(class.to_string());
        } else {
            self.content_classes.remove(class);
        }
    }

    pub fn has_content_class(&self, class: &str) -> bool {
        self.content_classes.contains(class)
    }

    pub fn content_classes(&self) -> impl Iterator<Item = &str> {
        self.content_classes.iter().map(String::as_str)
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        self.style.insert(property.to_string(), value.into());
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn is_hidden(&self) -> bool {
        self.has_class(HIDDEN_CLASS)
    }

    /// Inline `style` attribute value.
    pub fn style_attr(&self) -> String {
        self.style
            .iter()
            .map(|(k, v)| format!("{}:{};", k, v))
            .collect()
    }
}
