//! Text helpers for turning export fields into page content.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

fn rx(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("bad built-in pattern {pattern:?}: {e}"))
}

/// Escape `& < > " '` for HTML text and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

static CLEAN_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (rx(r"\.\.\."), "…"),
        (rx(r"\s+-\s+"), " – "),
        // CP1252 smart quotes and dash decoded as C1 controls
        (rx("\u{0092}"), "’"),
        (rx("\u{0093}"), "“"),
        (rx("\u{0094}"), "”"),
        (rx("\\s*\u{0097}\\s*"), " – "),
    ]
});

/// Trim and fix typography; `purge` also HTML-escapes the result.
pub fn clean(s: &str, purge: bool) -> String {
    let mut s = s.trim().to_string();
    for (pattern, replacement) in CLEAN_RULES.iter() {
        s = pattern.replace_all(&s, *replacement).into_owned();
    }
    if purge { escape_html(&s) } else { s }
}

static P_CLOSE: LazyLock<Regex> = LazyLock::new(|| rx(r"\s*</p>\s*"));
static P_OPEN: LazyLock<Regex> = LazyLock::new(|| rx(r"\s*<p>\s*"));
static P_TAGGED: LazyLock<Regex> = LazyLock::new(|| rx(r"\s*(<p[^>]*>)\s*"));
static P_LEADING: LazyLock<Regex> = LazyLock::new(|| rx(r"^\s*(<p[^>]*>)\s*"));
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| rx(r"^[*-]\s*"));
static TAG_NAME: LazyLock<Regex> = LazyLock::new(|| rx(r"^<\s*([A-Za-z][\w-]*)"));
static TAG_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    rx(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
});

const SPACER: &str = "spaced-1";

enum Block {
    Item(String),
    Paragraph(String),
}

/// A start tag's name and attributes; classes are kept as a list.
struct StartTag {
    name: String,
    attrs: Vec<(String, Vec<String>)>,
}

impl StartTag {
    fn paragraph() -> Self {
        Self { name: "p".into(), attrs: vec![("class".into(), Vec::new())] }
    }

    fn parse(tag: &str) -> Self {
        let Some(name) = TAG_NAME.captures(tag) else {
            return Self::paragraph();
        };
        let rest = &tag[name.get(0).map_or(0, |m| m.end())..];
        let mut attrs: Vec<(String, Vec<String>)> = Vec::new();
        for caps in TAG_ATTR.captures_iter(rest.trim_end_matches('>')) {
            let key = caps[1].to_lowercase();
            let value = caps.get(2).or(caps.get(3)).or(caps.get(4)).map(|m| m.as_str());
            let values = match (key.as_str(), value) {
                ("class", Some(v)) => v.split_whitespace().map(str::to_string).collect(),
                (_, Some(v)) => vec![v.to_string()],
                (_, None) => Vec::new(),
            };
            attrs.push((key, values));
        }
        Self { name: name[1].to_lowercase(), attrs }
    }

    fn add_class(&mut self, class: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == "class") {
            Some((_, classes)) => classes.push(class.to_string()),
            None => self.attrs.push(("class".into(), vec![class.to_string()])),
        }
    }

    fn render(&self) -> String {
        let mut out = format!("<{}", self.name);
        for (key, values) in &self.attrs {
            let mut seen = Vec::new();
            for v in values {
                if !seen.contains(&v.as_str()) {
                    seen.push(v.as_str());
                }
            }
            if seen.is_empty() {
                continue;
            }
            let value = seen.join(" ");
            let quote = if value.contains('"') { '\'' } else { '"' };
            out.push_str(&format!(" {key}={quote}{value}{quote}"));
        }
        out.push('>');
        out
    }
}

/// Restructure a free-form summary into `<p>`/`<ul>` markup.
///
/// Lines starting with `*` or `-` become list items, everything else a
/// paragraph (keeping an existing `<p …>` tag and its attributes). Elements that
/// follow blank lines get the `spaced-1` class.
pub fn description(raw: &str) -> String {
    let mut s = clean(raw, false);
    if s.len() >= 2 && s.matches('"').count() == 2 && s.starts_with('"') && s.ends_with('"') {
        s = s[1..s.len() - 1].trim().to_string();
    }
    let s = s.replace("\\n", "\n");
    let s = P_CLOSE.replace_all(&s, "\n");
    let s = P_OPEN.replace_all(&s, "\n");
    let s = P_TAGGED.replace_all(&s, "\n$1");
    let lines: Vec<&str> = s.trim().split('\n').map(str::trim).collect();

    let mut blocks = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let mut breaks = 0;
        while i > breaks && lines[i - 1 - breaks].is_empty() {
            breaks += 1;
        }
        let spaced = breaks > 0;

        if LIST_ITEM.is_match(line) {
            let class = if spaced { format!(" class=\"{SPACER}\"") } else { String::new() };
            blocks.push(Block::Item(format!("<li{class}>{}</li>", LIST_ITEM.replace(line, ""))));
            continue;
        }

        let (mut tag, text) = match P_LEADING.captures(line) {
            Some(caps) => {
                let end = caps.get(0).map_or(0, |m| m.end());
                (StartTag::parse(&caps[1]), &line[end..])
            }
            None => (StartTag::paragraph(), *line),
        };
        if spaced {
            tag.add_class(SPACER);
        }
        blocks.push(Block::Paragraph(format!("{}{text}</p>", tag.render())));
    }

    let mut out = String::new();
    let mut in_list = false;
    for block in blocks {
        match block {
            Block::Paragraph(p) => {
                if in_list {
                    out.push_str("</ul>");
                    in_list = false;
                }
                out.push_str(&p);
            }
            Block::Item(li) => {
                if !in_list {
                    out.push_str("<ul>");
                    in_list = true;
                }
                out.push_str(&li);
            }
        }
    }
    if in_list {
        out.push_str("</ul>");
    }
    out
}

static LIST_STRING: LazyLock<Regex> =
    LazyLock::new(|| rx(r#"'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)""#));
static STRING_ESCAPE: LazyLock<Regex> = LazyLock::new(|| rx(r"\\(.)"));

/// `['a', 'b']` (a list literal as exported) → `a, b`. Other text passes through.
pub fn delist(s: &str) -> String {
    let s = s.trim();
    if !s.starts_with('[') {
        return s.to_string();
    }
    LIST_STRING
        .captures_iter(s)
        .filter_map(|caps| caps.get(1).or(caps.get(2)))
        .map(|m| STRING_ESCAPE.replace_all(m.as_str(), "$1").into_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Minutes → `"Xd Yh Zm"`, omitting zero parts. Unparseable input is 0.
pub fn duration(minutes: &str) -> String {
    let t: u64 = minutes.trim().parse().unwrap_or(0);
    let (d, h, m) = (t / 1440, (t / 60) % 24, t % 60);
    let mut parts = Vec::new();
    if d > 0 {
        parts.push(format!("{d}d"));
    }
    if h > 0 {
        parts.push(format!("{h}h"));
    }
    if m > 0 {
        parts.push(format!("{m}m"));
    }
    parts.join(" ")
}

static IMAGE_NAME: LazyLock<Regex> = LazyLock::new(|| rx(r"/([^/]+?)(?:\?([^/]+))?$"));

/// Local candidates for a downloaded image, as `wget -nc -P images` names them:
/// `images/<name>` and, with a query string, `images/<name>@<query>`.
pub fn image_paths(url: &str) -> Option<Vec<String>> {
    let caps = IMAGE_NAME.captures(url)?;
    let name = &caps[1];
    let mut paths = vec![format!("images/{name}")];
    if let Some(query) = caps.get(2) {
        paths.push(format!("images/{name}@{}", query.as_str()));
    }
    Some(paths)
}

/// Letters and symbols compatibility decomposition leaves alone (or, for
/// `™`, would turn into plain `TM`).
fn fold_special(c: char) -> Option<&'static str> {
    Some(match c {
        'Æ' => "AE",
        'æ' => "ae",
        'Ø' => "O",
        'ø' => "o",
        'ß' => "ss",
        'Ł' => "L",
        'ł' => "l",
        'Œ' => "OE",
        'œ' => "oe",
        'Đ' | 'Ð' => "D",
        'đ' | 'ð' => "d",
        'Þ' => "Th",
        'þ' => "th",
        'Ħ' => "H",
        'ħ' => "h",
        'ı' => "i",
        'ĸ' => "q",
        'Ŧ' => "T",
        'ŧ' => "t",
        '×' => "x",
        '÷' => "/",
        '‘' | '’' | '‚' | '′' | 'ʼ' => "'",
        '“' | '”' | '„' | '″' => "\"",
        '‐' | '‑' | '‒' | '–' | '—' | '−' => "-",
        '…' => "...",
        '™' => "(tm)",
        '®' => "(r)",
        '©' => "(c)",
        '«' => "<<",
        '»' => ">>",
        '·' => "*",
        '¡' => "!",
        '¿' => "?",
        _ => return None,
    })
}

/// Fold accented letters and typographic punctuation to ASCII: NFKD with
/// combining marks dropped, plus [`fold_special`]. Characters without an ASCII
/// form are kept.
pub fn transliterate(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if let Some(folded) = fold_special(c) {
            out.push_str(folded);
            continue;
        }
        for d in std::iter::once(c).nfkd() {
            if is_combining_mark(d) {
                continue;
            }
            match fold_special(d) {
                Some(folded) => out.push_str(folded),
                None => out.push(d),
            }
        }
    }
    out
}

#[derive(PartialEq, Eq)]
enum Chunk<'a> {
    Number(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut digits = None;
    for (i, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        if digits.is_some_and(|d| d != is_digit) {
            out.push(if is_digit { Chunk::Text(&s[start..i]) } else { Chunk::Number(&s[start..i]) });
            start = i;
        }
        digits = Some(is_digit);
    }
    match digits {
        Some(true) => out.push(Chunk::Number(&s[start..])),
        Some(false) => out.push(Chunk::Text(&s[start..])),
        None => {}
    }
    out
}

/// Natural order: digit runs compare by value, so "2" sorts before "10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (ca, cb) = (chunks(a), chunks(b));
    for (x, y) in ca.iter().zip(cb.iter()) {
        let ord = match (x, y) {
            (Chunk::Number(x), Chunk::Number(y)) => {
                let (x, y) = (x.trim_start_matches('0'), y.trim_start_matches('0'));
                x.len().cmp(&y.len()).then_with(|| x.cmp(y))
            }
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
            (Chunk::Text(x), Chunk::Text(y)) => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ca.len().cmp(&cb.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_typography() {
        assert_eq!(clean("  Wait... what - now  ", false), "Wait… what – now");
        assert_eq!(clean("it\u{0092}s \u{0093}q\u{0094}", false), "it’s “q”");
        assert_eq!(clean("a \u{0097} b", false), "a – b");
        assert_eq!(clean("Tom & <Jerry>", true), "Tom &amp; &lt;Jerry&gt;");
    }

    #[test]
    fn test_description_paragraphs_and_spacing() {
        assert_eq!(description("One\nTwo"), "<p>One</p><p>Two</p>");
        assert_eq!(
            description("One\n\nTwo"),
            "<p>One</p><p class=\"spaced-1\">Two</p>"
        );
    }

    #[test]
    fn test_description_lists() {
        assert_eq!(
            description("Features:\n* fast\n* fun\nEnd"),
            "<p>Features:</p><ul><li>fast</li><li>fun</li></ul><p>End</p>"
        );
        assert_eq!(description("- alone"), "<ul><li>alone</li></ul>");
        assert_eq!(description("Intro\n\n* item"), "<p>Intro</p><ul><li class=\"spaced-1\">item</li></ul>");
    }

    #[test]
    fn test_description_existing_tags() {
        assert_eq!(description("<p>One</p><p>Two</p>"), "<p>One</p><p>Two</p>");
        assert_eq!(
            description("<p class=\"lead\" id=\"a\">One</p>"),
            "<p class=\"lead\" id=\"a\">One</p>"
        );
        assert_eq!(
            description("Intro<p class='x y x'>Body</p>"),
            "<p>Intro</p><p class=\"x y\">Body</p>"
        );
    }

    #[test]
    fn test_description_strips_wrapping_quotes_and_escaped_newlines() {
        assert_eq!(description("\"First\\nSecond\""), "<p>First</p><p>Second</p>");
    }

    #[test]
    fn test_delist() {
        assert_eq!(delist("['Id Software', \"Bethesda\"]"), "Id Software, Bethesda");
        assert_eq!(delist("['Don\\'t Nod']"), "Don't Nod");
        assert_eq!(delist(""), "");
        assert_eq!(delist("[]"), "");
        assert_eq!(delist("plain"), "plain");
    }

    #[test]
    fn test_duration() {
        assert_eq!(duration("0"), "");
        assert_eq!(duration("59"), "59m");
        assert_eq!(duration("60"), "1h");
        assert_eq!(duration("1501"), "1d 1h 1m");
        assert_eq!(duration("2880"), "2d");
        assert_eq!(duration("n/a"), "");
    }

    #[test]
    fn test_image_paths() {
        assert_eq!(
            image_paths("https://cdn.example/covers/abc.jpg").unwrap(),
            vec!["images/abc.jpg"]
        );
        assert_eq!(
            image_paths("https://cdn.example/covers/abc.jpg?w=300").unwrap(),
            vec!["images/abc.jpg", "images/abc.jpg@w=300"]
        );
        assert!(image_paths("no-slash").is_none());
    }

    #[test]
    fn test_transliterate() {
        assert_eq!(transliterate("Pokémon Ōkami"), "Pokemon Okami");
        assert_eq!(transliterate("Łódź"), "Lodz");
        assert_eq!(transliterate("Œuvre™ – “x”…"), "OEuvre(tm) - \"x\"...");
        assert_eq!(transliterate("東方"), "東方");
    }

    #[test]
    fn test_transliterate_latin_extended_b() {
        assert_eq!(transliterate("Ștefan cel Mare: Țara"), "Stefan cel Mare: Tara");
        assert_eq!(transliterate("Pǎ"), "Pa");
        assert_eq!(transliterate("Ơn Ưu"), "On Uu");
        assert_eq!(transliterate("ǅemo"), "Dzemo");
        assert_eq!(transliterate("Ĳssel ŉ"), "IJssel 'n");
    }

    // A dash line after a line break reads as a spaced dash before the list
    // split, so only `*` starts an item mid-text; `<p>` swallows the line break
    // in front of it.
    #[test]
    fn test_description_line_break_quirks() {
        assert_eq!(
            description("Features:\n* fast\n- fun"),
            "<p>Features:</p><ul><li>fast – fun</li></ul>"
        );
        assert_eq!(description("One</p>\n\n<p>Two"), "<p>One</p><p>Two</p>");
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("doom 2", "doom 10"), Ordering::Less);
        assert_eq!(natural_cmp("doom", "doom 2"), Ordering::Less);
        assert_eq!(natural_cmp("7 days", "abc"), Ordering::Less);
        // equal values fall back to plain string order
        assert_eq!(natural_cmp("x02", "x2"), Ordering::Less);
        assert_eq!(natural_cmp("abc", "abc"), Ordering::Equal);
    }
}
