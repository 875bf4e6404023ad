//! Range sliders and the controls panel toggle.

use tracing::debug;

use super::controller::GalleryController;
use super::dom::Dom;
use super::timer::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeControl {
    Width,
    Spacing,
}

impl RangeControl {
    /// Style variable written on the games container.
    pub fn property(self) -> &'static str {
        match self {
            RangeControl::Width => "--cover-width",
            RangeControl::Spacing => "--cover-spacing",
        }
    }
}

/// Skips a value equal to the last one applied, so the `input` stream and the
/// final `change` never apply the same value twice.
#[derive(Debug, Default)]
pub struct RangeBinding {
    last: Option<String>,
}

impl RangeBinding {
    /// Record `value`; true if it differs from the last applied one.
    pub fn update(&mut self, value: &str) -> bool {
        if self.last.as_deref() == Some(value) {
            return false;
        }
        self.last = Some(value.to_string());
        true
    }
}

/// A released key with the modifier state we care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub ctrl: bool,
    /// `KeyboardEvent.key`.
    pub key: String,
}

impl KeyPress {
    pub fn new(ctrl: bool, key: impl Into<String>) -> Self {
        Self { ctrl, key: key.into() }
    }

    /// Ctrl + Space.
    pub fn is_controls_chord(&self) -> bool {
        self.ctrl && matches!(self.key.as_str(), " " | "Spacebar")
    }
}

impl<D: Dom, C: Clock> GalleryController<D, C> {
    /// Mirror a slider value into its style variable. Returns whether it applied.
    pub fn apply_range(&mut self, control: RangeControl, value: &str) -> bool {
        let binding = match control {
            RangeControl::Width => &mut self.width,
            RangeControl::Spacing => &mut self.spacing,
        };
        if !binding.update(value) {
            return false;
        }
        debug!("{} = {value}px", control.property());
        self.dom.set_style(&self.games, control.property(), Some(&format!("{value}px")));
        true
    }

    /// Show/hide the controls panel on Ctrl + Space. Returns whether it toggled.
    pub fn toggle_controls(&mut self, key: &KeyPress) -> bool {
        if !key.is_controls_chord() {
            return false;
        }
        let visible = self.dom.has_class(&self.controls, &self.config.visible_class);
        self.dom.set_class(&self.controls, &self.config.visible_class, !visible);
        true
    }
}
