//! Page templates: `{name}` placeholders and `{rep}…{/rep}` repeat blocks.
//!
//! Each template is looked up as `<dir>/<name>.custom.<ext>` first, so a
//! user can override any of them without touching the stock file; when neither
//! file exists the built-in copy is used.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{Error, Result};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap_or_else(|e| panic!("{e}"))
});
static REPEAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(\s*)\{rep\}(.*?)\{/rep\}").unwrap_or_else(|e| panic!("{e}"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Index,
    Game,
    Script,
    Style,
}

impl TemplateKind {
    pub fn file_stem(self) -> &'static str {
        match self {
            TemplateKind::Index => "index",
            TemplateKind::Game => "game",
            TemplateKind::Script => "script",
            TemplateKind::Style => "style",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            TemplateKind::Index | TemplateKind::Game => "html",
            TemplateKind::Script => "js",
            TemplateKind::Style => "css",
        }
    }

    fn builtin(self) -> &'static str {
        match self {
            TemplateKind::Index => include_str!("../../templates/index.html"),
            TemplateKind::Game => include_str!("../../templates/game.html"),
            TemplateKind::Script => include_str!("../../templates/script.js"),
            TemplateKind::Style => include_str!("../../templates/style.css"),
        }
    }

    fn file_name(self, custom: bool) -> String {
        if custom {
            format!("{}.custom.{}", self.file_stem(), self.extension())
        } else {
            format!("{}.{}", self.file_stem(), self.extension())
        }
    }

    /// Path the page should reference: the custom file if present, else the stock one.
    pub fn resolve(self, dir: &Path) -> PathBuf {
        let custom = dir.join(self.file_name(true));
        if custom.is_file() { custom } else { dir.join(self.file_name(false)) }
    }
}

/// A loaded template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    /// Read `kind` from `dir`, falling back to the built-in copy.
    pub fn load(dir: &Path, kind: TemplateKind) -> Result<Self> {
        let path = kind.resolve(dir);
        if path.is_file() {
            debug!("template {}", path.display());
            let source = std::fs::read_to_string(&path)
                .map_err(|e| Error::Template(format!("{}: {e}", path.display())))?;
            return Ok(Self::new(source));
        }
        Ok(Self::builtin(kind))
    }

    pub fn builtin(kind: TemplateKind) -> Self {
        Self::new(kind.builtin())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute known placeholders; unknown ones are left as written.
    /// `{{` and `}}` produce literal braces.
    pub fn fill(&self, params: &[(&str, String)]) -> Filled {
        let mut used = HashSet::new();
        let text = PLACEHOLDER.replace_all(&self.source, |caps: &Captures| match &caps[0] {
            "{{" => "{".to_string(),
            "}}" => "}".to_string(),
            whole => match params.iter().find(|(k, _)| *k == &caps[1]) {
                Some((k, v)) => {
                    used.insert(k.to_string());
                    v.clone()
                }
                None => whole.to_string(),
            },
        });
        Filled { text: text.into_owned(), used }
    }

    /// [`fill`](Self::fill), then expand each `{rep}…{/rep}` block once per
    /// remaining non-empty param, `{0}` being its name and `{1}` its value.
    pub fn render(&self, params: &[(&str, String)]) -> String {
        let filled = self.fill(params);
        let rest: Vec<&(&str, String)> = params
            .iter()
            .filter(|(k, v)| !v.is_empty() && !filled.used.contains(*k))
            .collect();
        REPEAT
            .replace_all(&filled.text, |caps: &Captures| {
                let (indent, body) = (&caps[1], &caps[2]);
                rest.iter()
                    .map(|(k, v)| format!("{indent}{}", body.replace("{0}", k).replace("{1}", v)))
                    .collect::<String>()
            })
            .into_owned()
    }
}

/// Result of [`Template::fill`].
#[derive(Debug)]
pub struct Filled {
    pub text: String,
    /// Param names that had a placeholder.
    pub used: HashSet<String>,
}
