//! Shared test helpers: an in-memory document and a ready-made gallery.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use galaxy_gallery::config::ControllerConfig;
use galaxy_gallery::page::{Dom, GalleryController, ManualClock, Size};

#[derive(Debug, Default)]
pub struct FakeNode {
    pub id: String,
    pub children: Vec<usize>,
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
    pub data: HashMap<String, String>,
    pub value: String,
    pub size: Size,
    /// Hit-test box: x, y, width, height.
    pub rect: Option<(f64, f64, f64, f64)>,
}

/// Element tree with hit testing by boxes. Nodes are indices.
#[derive(Debug)]
pub struct FakeDom {
    pub nodes: Vec<FakeNode>,
    pub viewport: Size,
    /// Every `set_style` call: node, property, value.
    pub style_log: Vec<(usize, String, Option<String>)>,
}

impl FakeDom {
    pub fn new(viewport: Size) -> Self {
        Self { nodes: Vec::new(), viewport, style_log: Vec::new() }
    }

    pub fn add(&mut self, id: &str, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(FakeNode { id: id.to_string(), ..Default::default() });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        index
    }

    pub fn find(&self, id: &str) -> usize {
        self.nodes
            .iter()
            .position(|n| n.id == id)
            .unwrap_or_else(|| panic!("no node #{id}"))
    }

    pub fn tooltip_of(&self, card: usize) -> usize {
        self.nodes[card].children[0]
    }

    pub fn classes(&self, node: usize) -> Vec<&str> {
        self.nodes[node].classes.iter().map(String::as_str).collect()
    }

    pub fn style_of(&self, node: usize, property: &str) -> Option<&str> {
        self.nodes[node].styles.get(property).map(String::as_str)
    }

    /// How many times `property` was written on `node`.
    pub fn writes(&self, node: usize, property: &str) -> usize {
        self.style_log.iter().filter(|(n, p, _)| *n == node && p == property).count()
    }
}

impl Dom for FakeDom {
    type Node = usize;

    fn element_by_id(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| !id.is_empty() && n.id == id)
    }

    fn children(&self, node: &usize) -> Vec<usize> {
        self.nodes[*node].children.clone()
    }

    fn id(&self, node: &usize) -> String {
        self.nodes[*node].id.clone()
    }

    fn elements_from_point(&self, x: f64, y: f64) -> Vec<usize> {
        // Later nodes paint on top.
        let mut hits: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| {
                n.rect.is_some_and(|(rx, ry, w, h)| x >= rx && x < rx + w && y >= ry && y < ry + h)
            })
            .map(|(i, _)| i)
            .collect();
        hits.reverse();
        hits
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn offset_size(&self, node: &usize) -> Size {
        self.nodes[*node].size
    }

    fn has_class(&self, node: &usize, class: &str) -> bool {
        self.nodes[*node].classes.contains(class)
    }

    fn add_class(&mut self, node: &usize, class: &str) {
        self.nodes[*node].classes.insert(class.to_string());
    }

    fn remove_class(&mut self, node: &usize, class: &str) {
        self.nodes[*node].classes.remove(class);
    }

    fn style(&self, node: &usize, property: &str) -> String {
        self.nodes[*node].styles.get(property).cloned().unwrap_or_default()
    }

    fn set_style(&mut self, node: &usize, property: &str, value: Option<&str>) {
        self.style_log.push((*node, property.to_string(), value.map(str::to_string)));
        let styles = &mut self.nodes[*node].styles;
        match value {
            Some(v) => styles.insert(property.to_string(), v.to_string()),
            None => styles.remove(property),
        };
    }

    fn data(&self, node: &usize, key: &str) -> Option<String> {
        self.nodes[*node].data.get(key).cloned()
    }

    fn value(&self, node: &usize) -> String {
        self.nodes[*node].value.clone()
    }
}

pub const VIEWPORT: Size = Size::new(800.0, 600.0);
pub const CARD: f64 = 100.0;
pub const TOOLTIP: Size = Size::new(200.0, 150.0);

/// Page with the six controller elements and one 100×100 card per entry,
/// laid out left to right from the origin. Each entry is a key and its
/// searchable strings.
pub fn gallery_dom(cards: &[(&str, &[&str])]) -> FakeDom {
    let mut dom = FakeDom::new(VIEWPORT);
    let root = dom.add("", None);
    dom.add("controls", Some(root));
    dom.add("search", Some(root));
    dom.add("width", Some(root));
    dom.add("spacing", Some(root));
    let games = dom.add("games", Some(root));
    for (i, (key, searchable)) in cards.iter().enumerate() {
        let card = dom.add(&format!("game-{key}"), Some(games));
        dom.nodes[card].classes.insert("game".into());
        dom.nodes[card].rect = Some((i as f64 * CARD, 0.0, CARD, CARD));
        let json = serde_json::to_string(searchable).unwrap();
        dom.nodes[card].data.insert("search".into(), json);

        let tooltip = dom.add("", Some(card));
        dom.nodes[tooltip].classes.insert("data".into());
        dom.nodes[tooltip].size = TOOLTIP;
    }
    // Non-card child of the container.
    dom.add("games-footer", Some(games));
    let overlay = dom.add("overlay", Some(root));
    dom.nodes[overlay].rect = Some((0.0, 0.0, VIEWPORT.width, VIEWPORT.height));
    dom
}

pub type TestController = GalleryController<FakeDom, ManualClock>;

#[allow(dead_code)]
pub fn controller(cards: &[(&str, &[&str])]) -> (TestController, ManualClock) {
    let clock = ManualClock::new();
    let controller =
        GalleryController::new(gallery_dom(cards), clock.clone(), ControllerConfig::default())
            .unwrap();
    (controller, clock)
}

#[allow(dead_code)]
pub fn sample() -> (TestController, ManualClock) {
    controller(&[
        ("1001", &["the witcher 3", "witcher 3, the"]),
        ("1002", &["doom"]),
        ("1003", &["final fantasy vii", "final fantasy 7"]),
    ])
}
