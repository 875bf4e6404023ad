//! The slice of the DOM the controller needs.
//!
//! Implemented by the web-sys host in the browser and by an in-memory tree in
//! tests. Reads take `&self`, writes take `&mut self`.

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

pub trait Dom {
    /// Handle to an element. Equality means "same element".
    type Node: Clone + PartialEq + std::fmt::Debug;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Direct element children, in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// The element's id, empty when unset.
    fn id(&self, node: &Self::Node) -> String;

    /// Every element under the viewport point, topmost first.
    fn elements_from_point(&self, x: f64, y: f64) -> Vec<Self::Node>;

    /// Client size of the document viewport.
    fn viewport(&self) -> Size;

    /// Rendered (offset) size of an element.
    fn offset_size(&self, node: &Self::Node) -> Size;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Add or remove `class` depending on `on`.
    fn set_class(&mut self, node: &Self::Node, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    /// Inline style property, empty when unset.
    fn style(&self, node: &Self::Node, property: &str) -> String;

    /// Set an inline style property (custom properties included); `None` removes it.
    fn set_style(&mut self, node: &Self::Node, property: &str, value: Option<&str>);

    /// A `data-*` attribute by its camel-cased dataset key.
    fn data(&self, node: &Self::Node, key: &str) -> Option<String>;

    /// Current value of a form control.
    fn value(&self, node: &Self::Node) -> String;
}
