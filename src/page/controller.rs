//! The page controller: owns every piece of transient UI state and turns page
//! events into DOM writes.

use tracing::debug;

use super::controls::{KeyPress, RangeBinding, RangeControl};
use super::dom::Dom;
use super::hover::HoverState;
use super::search::SearchState;
use super::timer::{Clock, TimerId, TimerQueue};
use crate::config::ControllerConfig;
use crate::error::{Error, Result};

/// Everything the host forwards from the page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Pointer moved over the tracking surface (overlay-relative coordinates).
    PointerMove { x: f64, y: f64 },
    /// Pointer left the tracking surface.
    PointerOut,
    /// The page scrolled under a stationary pointer.
    Scroll,
    KeyUp(KeyPress),
    /// Continuous update while a range slider is dragged.
    RangeInput { control: RangeControl, value: String },
    /// Committed range value.
    RangeChange { control: RangeControl, value: String },
    SearchInput,
    SearchBlur,
}

/// Work queued for later.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Deferred<N> {
    RestoreCursor,
    RevealTooltip(N),
    RerunSearch,
}

/// A card found in the games container at construction time.
#[derive(Debug)]
pub(super) struct Card<N> {
    pub(super) key: String,
    pub(super) node: N,
    /// Parsed `data-search` payload, filled on first use.
    pub(super) sources: Option<Vec<String>>,
}

pub struct GalleryController<D: Dom, C: Clock> {
    pub(super) dom: D,
    pub(super) clock: C,
    pub(super) config: ControllerConfig,
    pub(super) overlay: D::Node,
    pub(super) controls: D::Node,
    pub(super) games: D::Node,
    pub(super) search_input: D::Node,
    pub(super) cards: Vec<Card<D::Node>>,
    /// Last pointer position over the tracking surface.
    pub(super) cursor: (f64, f64),
    pub(super) hover: HoverState<D::Node>,
    pub(super) cursor_restore: Option<TimerId>,
    pub(super) search: SearchState,
    pub(super) search_rerun: Option<TimerId>,
    pub(super) width: RangeBinding,
    pub(super) spacing: RangeBinding,
    pub(super) timers: TimerQueue<Deferred<D::Node>>,
}

fn require<D: Dom>(dom: &D, id: &str) -> Result<D::Node> {
    dom.element_by_id(id)
        .ok_or_else(|| Error::MissingElement(id.to_string()))
}

impl<D: Dom, C: Clock> GalleryController<D, C> {
    /// Resolve the page elements, collect the cards and reveal the list.
    pub fn new(mut dom: D, clock: C, config: ControllerConfig) -> Result<Self> {
        let overlay = require(&dom, &config.overlay_id)?;
        let controls = require(&dom, &config.controls_id)?;
        let games = require(&dom, &config.games_id)?;
        let search_input = require(&dom, &config.search_id)?;
        require(&dom, &config.width_id)?;
        require(&dom, &config.spacing_id)?;

        let cards: Vec<_> = dom
            .children(&games)
            .into_iter()
            .filter_map(|node| {
                let id = dom.id(&node);
                let key = id.strip_prefix(&config.card_prefix)?.to_string();
                Some(Card { key, node, sources: None })
            })
            .collect();
        debug!("gallery controller: {} cards", cards.len());

        // Load finished: fade the curtain out.
        dom.set_style(&overlay, "opacity", Some("0"));
        dom.set_style(&overlay, "cursor", Some("initial"));

        Ok(Self {
            dom,
            clock,
            config,
            overlay,
            controls,
            games,
            search_input,
            cards,
            cursor: (0.0, 0.0),
            hover: HoverState::Idle,
            cursor_restore: None,
            search: SearchState::default(),
            search_rerun: None,
            width: RangeBinding::default(),
            spacing: RangeBinding::default(),
            timers: TimerQueue::new(),
        })
    }

    /// Process one page event. An error aborts this event only.
    pub fn handle(&mut self, event: PageEvent) -> Result<()> {
        match event {
            PageEvent::PointerMove { x, y } => {
                self.cursor = (x, y);
                self.track_pointer(true)
            }
            PageEvent::Scroll => self.track_pointer(true),
            PageEvent::PointerOut => self.track_pointer(false),
            PageEvent::KeyUp(key) => {
                self.toggle_controls(&key);
                Ok(())
            }
            PageEvent::RangeInput { control, value } | PageEvent::RangeChange { control, value } => {
                self.apply_range(control, &value);
                Ok(())
            }
            PageEvent::SearchInput => {
                if let Some(id) = self.search_rerun.take() {
                    self.timers.cancel(id);
                }
                self.run_search().map(|_| ())
            }
            PageEvent::SearchBlur => {
                self.schedule_search_rerun();
                Ok(())
            }
        }
    }

    /// Run every deferred action that is due. Returns how many ran.
    ///
    /// All due actions run even if one fails; the first error is returned.
    pub fn advance(&mut self) -> Result<usize> {
        let mut fired = 0;
        let mut first_error = None;
        loop {
            let due = self.timers.take_due(self.clock.now_ms());
            if due.is_empty() {
                break;
            }
            for action in due {
                fired += 1;
                if let Err(e) = self.run_deferred(action) {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(fired),
        }
    }

    fn run_deferred(&mut self, action: Deferred<D::Node>) -> Result<()> {
        match action {
            Deferred::RestoreCursor => {
                self.cursor_restore = None;
                self.dom.set_style(&self.overlay, "cursor", Some("initial"));
                Ok(())
            }
            Deferred::RevealTooltip(tooltip) => {
                self.dom.set_style(&tooltip, "opacity", Some("1"));
                Ok(())
            }
            Deferred::RerunSearch => {
                self.search_rerun = None;
                self.run_search().map(|_| ())
            }
        }
    }

    /// When the next deferred action is due, if any.
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers.next_deadline()
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Keys of all cards, in container order.
    pub fn card_keys(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.key.as_str()).collect()
    }

    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }
}
