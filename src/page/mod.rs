//! In-page controller for the generated gallery: hover tooltips, live search
//! and the width/spacing sliders.
//!
//! [`GalleryController`] holds all state and only talks to the page through
//! [`Dom`] and to time through [`Clock`], so it runs the same in the browser
//! and against an in-memory document in tests.

mod controller;
mod controls;
mod dom;
mod hover;
mod search;
mod timer;
mod tooltip;

#[cfg(target_arch = "wasm32")]
mod web;

pub use controller::{GalleryController, PageEvent};
pub use controls::{KeyPress, RangeBinding, RangeControl};
pub use dom::{Dom, Size};
pub use hover::HoverState;
pub use search::{QueryMatcher, SearchOutcome, normalize_query};
pub use timer::{Clock, ManualClock, TimerId, TimerQueue};
pub use tooltip::{Corner, Placement, init_min_width, place, position};

#[cfg(target_arch = "wasm32")]
pub use web::{GalleryPage, PerformanceClock, WebDom, start};
