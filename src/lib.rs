//! Galaxy Gallery
//!
//! Turns a GOG Galaxy 2 library export into a single-page cover gallery and
//! drives that page in the browser: hover tooltips, live title search and
//! cover size sliders.
//!
//! The page half is this same crate compiled for the browser. The generated
//! page imports `pkg/galaxy_gallery.js` relative to itself, so build it next
//! to the page with:
//!
//! ```text
//! wasm-pack build --target web --out-dir <site>/pkg
//! ```
//!
//! Without the bundle the page renders but stays static.

pub mod catalog;
pub mod config;
pub mod error;
pub mod page;

pub use error::{Error, Result};
