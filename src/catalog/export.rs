//! Image list and HTML page export.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::Catalog;
use super::entry::GameEntry;
use super::template::{Template, TemplateKind};
use super::text::{clean, delist, description, duration};
use crate::error::Result;

/// Image URLs of `catalog` with no local copy under `base`.
pub fn missing_images<'a>(catalog: &'a Catalog, base: &Path) -> Vec<&'a str> {
    catalog
        .entries
        .iter()
        .filter(|e| !e.image_paths.iter().any(|p| base.join(p).exists()))
        .map(|e| e.image_url.as_str())
        .collect()
}

/// Write the download list for missing images to `list`, creating the images
/// directory under `base`. Returns how many URLs were listed; nothing is
/// written when none are missing.
pub fn write_image_list(catalog: &Catalog, base: &Path, list: &Path) -> Result<usize> {
    std::fs::create_dir_all(base.join("images"))?;
    let missing = missing_images(catalog, base);
    if missing.is_empty() {
        info!("No new images to download");
        return Ok(0);
    }
    std::fs::write(list, missing.join("\n"))?;
    info!("{} image(s) listed in {}", missing.len(), list.display());
    Ok(missing.len())
}

/// Move an image saved under an alternate name to the canonical path.
pub fn normalize_image(entry: &GameEntry, base: &Path) -> Result<()> {
    let Some((canonical, alternates)) = entry.image_paths.split_first() else {
        return Ok(());
    };
    let canonical = base.join(canonical);
    for alt in alternates {
        let alt = base.join(alt);
        if alt.exists() {
            debug!("rename {} -> {}", alt.display(), canonical.display());
            std::fs::rename(&alt, &canonical)?;
        }
    }
    Ok(())
}

/// Options for [`render_html`].
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    pub title: String,
    /// Inline the script and stylesheet instead of linking them.
    pub embed: bool,
    pub templates_dir: PathBuf,
    /// Only render these game ids and leave out cover images.
    pub debug_ids: Vec<u32>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            title: "GOG Galaxy 2 game library".into(),
            embed: false,
            templates_dir: PathBuf::from("templates"),
            debug_ids: Vec::new(),
        }
    }
}

/// First game id: one past the next multiple of 1000 above the game count.
pub fn first_game_id(count: usize) -> u32 {
    let n = count as u32;
    n + 1000 - n % 1000 + 1
}

/// Search payload stored in `data-search`: a JSON array, attribute-escaped.
fn search_attribute(searchable: &[String]) -> Result<String> {
    let json = serde_json::to_string(searchable)?;
    Ok(json.replace('&', "&amp;").replace('\'', "&apos;"))
}

fn game_params(id: u32, entry: &GameEntry) -> Result<Vec<(&'static str, String)>> {
    Ok(vec![
        ("id", id.to_string()),
        ("title", clean(&entry.title, true)),
        ("description", description(&entry.summary)),
        ("search", search_attribute(&entry.searchable)?),
        ("developers", clean(&delist(&entry.developers), true)),
        ("platforms", clean(&delist(&entry.platforms), true)),
        ("publishers", clean(&delist(&entry.publishers), true)),
        ("score", entry.critics_score.clone()),
        ("released", entry.release_date.clone()),
        ("genres", delist(&entry.genres)),
        ("themes", delist(&entry.themes)),
        ("playtime", duration(&entry.game_mins)),
    ])
}

/// Render the whole page.
pub fn render_html(catalog: &Catalog, options: &HtmlOptions) -> Result<String> {
    let dir = &options.templates_dir;
    let game = Template::load(dir, TemplateKind::Game)?;
    let index = Template::load(dir, TemplateKind::Index)?;

    let mut content = String::new();
    let mut image_css = String::new();
    for (id, entry) in (first_game_id(catalog.entries.len())..).zip(&catalog.entries) {
        if !options.debug_ids.is_empty() && !options.debug_ids.contains(&id) {
            continue;
        }
        content.push_str(&game.render(&game_params(id, entry)?));
        let _ = write!(
            image_css,
            "#game-{id}{{order:{id};background-image:url(\"{}\");}}",
            entry.image_paths.first().map_or("", String::as_str)
        );
    }

    let (style, javascript) = if options.embed {
        let style = Template::load(dir, TemplateKind::Style)?;
        let script = Template::load(dir, TemplateKind::Script)?;
        (
            format!("<style>{}</style>", style.source()),
            format!("<script type=\"module\">{}</script>", script.source()),
        )
    } else {
        (
            format!(
                "<link rel=\"stylesheet\" href=\"{}\">",
                href(&TemplateKind::Style.resolve(dir))
            ),
            format!(
                "<script type=\"module\" src=\"{}\"></script>",
                href(&TemplateKind::Script.resolve(dir))
            ),
        )
    };

    if !options.debug_ids.is_empty() {
        image_css.clear();
    }
    let params = vec![
        ("language", "en".to_string()),
        ("title", clean(&options.title, true)),
        ("imageCSS", image_css),
        ("style", style),
        ("javascript", javascript),
        ("content", content),
    ];
    Ok(index.fill(&params).text)
}

fn href(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Browser bundle the page script imports, relative to the page.
pub const BUNDLE: &str = "pkg/galaxy_gallery.js";

/// Where the page at `output` expects the browser bundle, if it is not there yet.
pub fn missing_bundle(output: &Path) -> Option<PathBuf> {
    let bundle = output.parent().unwrap_or(Path::new("")).join(BUNDLE);
    (!bundle.exists()).then_some(bundle)
}

/// Command that fetches every URL of the download list into `images/`.
pub fn download_hint(list: &Path) -> String {
    format!("wget -nc -P images -i \"{}\"", list.display())
}

/// Render to `output`. Alternate image names are normalized first; when
/// assets are linked, missing stock assets are written where the page expects them.
///
/// Returns the bundle path when the page has no browser bundle next to it.
pub fn write_html(
    catalog: &Catalog,
    options: &HtmlOptions,
    base: &Path,
    output: &Path,
) -> Result<Option<PathBuf>> {
    for (id, entry) in (first_game_id(catalog.entries.len())..).zip(&catalog.entries) {
        if options.debug_ids.is_empty() || options.debug_ids.contains(&id) {
            normalize_image(entry, base)?;
        }
    }

    if !options.embed {
        for kind in [TemplateKind::Style, TemplateKind::Script] {
            let target = kind.resolve(&options.templates_dir);
            if !target.exists() {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                warn!("writing stock {} to {}", kind.file_stem(), target.display());
                std::fs::write(&target, Template::builtin(kind).source())?;
            }
        }
    }

    let html = render_html(catalog, options)?;
    std::fs::write(output, html)?;
    info!("{} game(s) written to {}", catalog.entries.len(), output.display());

    let missing = missing_bundle(output);
    if let Some(bundle) = &missing {
        warn!(
            "{} not found; the page stays static until `wasm-pack build --target web \
             --out-dir <site>/pkg` is run",
            bundle.display()
        );
    }
    Ok(missing)
}
