//! One game of the library and the title variants search matches against.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::text::{image_paths, transliterate};
use crate::error::{Error, Result};

fn rx(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("bad built-in pattern {pattern:?}: {e}"))
}

/// Leading articles (English, Italian) that sort after the title.
const ARTICLES: &str = r"(an?\s+|the\s+|il?\s+|l[oiae]\s+|gli\s+|un[oa]?\s+|(?:l|un)')";

/// Image columns in order of preference.
const IMAGE_COLUMNS: [&str; 3] = ["verticalCover", "backgroundImage", "squareIcon"];

static LEADING_ARTICLE: LazyLock<Regex> = LazyLock::new(|| rx(&format!("^{ARTICLES}(.+?)$")));
static TRAILING_ARTICLE: LazyLock<Regex> = LazyLock::new(|| rx(&format!(", {ARTICLES}$")));
static TRADEMARK: LazyLock<Regex> = LazyLock::new(|| rx(r"\(tm\)"));
static REGISTERED: LazyLock<Regex> = LazyLock::new(|| rx(r"\(r\)"));
static ROMAN: LazyLock<Regex> =
    LazyLock::new(|| rx(r"^m*(c[md]|d?c{0,3})(x[cl]|l?x{0,3})(i[xv]|v?i{0,3})$"));

/// Rewrite stages applied cumulatively to the sort title; each stage's output
/// is a search variant of its own.
static SEARCH_STAGES: LazyLock<Vec<Vec<(Regex, &'static str)>>> = LazyLock::new(|| {
    vec![
        vec![(rx(r"[,.…]"), "")],
        vec![(rx(r"[;:'-]"), ""), (rx(r"[|\\/()]"), " "), (rx(r"\s{2,}"), " ")],
        vec![
            (rx(r"([0-9])0{12}(\s|$)"), "${1}t${2}"),
            (rx(r"([0-9])0{9}(\s|$)"), "${1}g${2}"),
            (rx(r"([0-9])0{6}(\s|$)"), "${1}m${2}"),
            (rx(r"([0-9])0{3}(\s|$)"), "${1}k${2}"),
        ],
    ]
});

/// A game row ready for export.
#[derive(Debug, Clone, PartialEq)]
pub struct GameEntry {
    pub title: String,
    /// Lowercase ASCII title with the leading article moved to the end.
    pub sort_title: String,
    /// Lowercase variants the page search matches against.
    pub searchable: Vec<String>,
    pub image_url: String,
    /// Local candidates for the image; the first is canonical.
    pub image_paths: Vec<String>,
    pub summary: String,
    pub developers: String,
    pub publishers: String,
    pub platforms: String,
    pub genres: String,
    pub themes: String,
    pub critics_score: String,
    pub release_date: String,
    pub game_mins: String,
}

fn column<'a>(row: &'a HashMap<String, String>, name: &str) -> Result<&'a str> {
    row.get(name).map(String::as_str).ok_or_else(|| Error::MissingColumn(name.to_string()))
}

impl GameEntry {
    /// Build from a CSV row. Rows without any usable image are skipped (`Ok(None)`).
    pub fn from_row(row: &HashMap<String, String>) -> Result<Option<Self>> {
        let mut image_url = "";
        for name in IMAGE_COLUMNS {
            let value = column(row, name)?;
            if !value.is_empty() {
                image_url = value;
                break;
            }
        }
        let title = column(row, "title")?.replace("...", "…");
        if image_url.is_empty() {
            debug!("skipping {title:?}: no image");
            return Ok(None);
        }
        let Some(image_paths) = image_paths(image_url) else {
            warn!("skipping {title:?}: cannot derive an image name from {image_url}");
            return Ok(None);
        };

        let sort_title = sort_title(&title);
        let searchable = search_variants(&title, &sort_title);

        Ok(Some(Self {
            searchable,
            sort_title,
            image_url: image_url.to_string(),
            image_paths,
            summary: column(row, "summary")?.to_string(),
            developers: column(row, "developers")?.to_string(),
            publishers: column(row, "publishers")?.to_string(),
            platforms: column(row, "platformList")?.to_string(),
            genres: column(row, "genres")?.to_string(),
            themes: column(row, "themes")?.to_string(),
            critics_score: column(row, "criticsScore")?.to_string(),
            release_date: column(row, "releaseDate")?.to_string(),
            game_mins: column(row, "gameMins")?.to_string(),
            title,
        }))
    }
}

/// `"The Witcher 3™"` → `"witcher 3, the"`.
pub fn sort_title(title: &str) -> String {
    let folded = transliterate(title).to_lowercase();
    let moved = LEADING_ARTICLE.replace(&folded, "${2}, ${1}");
    let s = moved.trim();
    let s = TRAILING_ARTICLE.replace(s, "");
    let s = TRADEMARK.replace_all(&s, "");
    REGISTERED.replace_all(&s, "").into_owned()
}

/// Every distinct variant of a title: the lowercase original, the sort title,
/// each cumulative punctuation/number rewrite of it, and the form with roman
/// numerals written as digits.
pub fn search_variants(title: &str, sort_title: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    let mut push = |v: String| {
        if !variants.contains(&v) {
            variants.push(v);
        }
    };
    push(title.to_lowercase());
    push(sort_title.to_string());

    let mut current = sort_title.to_string();
    for stage in SEARCH_STAGES.iter() {
        for (pattern, replacement) in stage {
            current = pattern.replace_all(&current, *replacement).into_owned();
        }
        current = current.trim().to_string();
        push(current.clone());
    }

    let numbered: Vec<String> = current
        .split(' ')
        .map(|word| roman_value(word).map_or_else(|| word.to_string(), |n| n.to_string()))
        .collect();
    push(numbered.join(" "));
    variants
}

/// Value of a lowercase roman numeral, or `None` if `word` is not one.
pub fn roman_value(word: &str) -> Option<u32> {
    if word.is_empty() || !ROMAN.is_match(word) {
        return None;
    }
    let digits: Vec<u32> = word
        .chars()
        .map(|c| match c {
            'i' => 1,
            'v' => 5,
            'x' => 10,
            'l' => 50,
            'c' => 100,
            'd' => 500,
            _ => 1000,
        })
        .collect();
    let mut total: i64 = 0;
    for (j, &value) in digits.iter().enumerate() {
        let next = digits[(j + 1).min(digits.len() - 1)];
        total += if value >= next { i64::from(value) } else { -i64::from(value) };
    }
    u32::try_from(total).ok()
}
