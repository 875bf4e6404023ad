//! Catalog generator: library CSV in, image download list and HTML page out.

mod csv;
mod entry;
mod export;
mod template;
mod text;

use std::path::Path;

use tracing::info;

use crate::error::Result;

pub use csv::{parse_records, read_rows};
pub use entry::{GameEntry, roman_value, search_variants, sort_title};
pub use export::{
    BUNDLE, HtmlOptions, download_hint, first_game_id, missing_bundle, missing_images,
    normalize_image, render_html, write_html, write_image_list,
};
pub use template::{Filled, Template, TemplateKind};
pub use text::{
    clean, delist, description, duration, escape_html, image_paths, natural_cmp, transliterate,
};

/// Games of a library export, in natural order of their sort titles.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub entries: Vec<GameEntry>,
}

impl Catalog {
    /// Build from CSV text.
    pub fn from_csv(content: &str, delimiter: char) -> Result<Self> {
        let mut entries = Vec::new();
        for row in read_rows(content, delimiter)? {
            if let Some(entry) = GameEntry::from_row(&row)? {
                entries.push(entry);
            }
        }
        entries.sort_by(|a, b| natural_cmp(&a.sort_title, &b.sort_title));
        Ok(Self { entries })
    }

    pub fn load(path: &Path, delimiter: char) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_csv(&content, delimiter)?;
        info!("{} game(s) loaded from {}", catalog.entries.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
