//! Pointer tracking: which card is under the pointer and its tooltip.

use tracing::debug;

use super::controller::{Deferred, GalleryController};
use super::dom::Dom;
use super::timer::Clock;
use super::tooltip;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum HoverState<N> {
    Idle,
    Active { card: N, key: String, tooltip: N },
}

impl<D: Dom, C: Clock> GalleryController<D, C> {
    /// Topmost card at the stored pointer position.
    fn card_at_cursor(&self) -> Option<D::Node> {
        let (x, y) = self.cursor;
        self.dom
            .elements_from_point(x, y)
            .into_iter()
            .find(|node| self.dom.id(node).starts_with(&self.config.card_prefix))
    }

    /// Re-evaluate the hovered card. `over_surface` is false once the pointer
    /// has left the tracking surface.
    pub(super) fn track_pointer(&mut self, over_surface: bool) -> Result<()> {
        let target = if over_surface { self.card_at_cursor() } else { None };

        let unchanged = match (&self.hover, &target) {
            (HoverState::Active { card, .. }, Some(node)) => card == node,
            (HoverState::Idle, None) => true,
            _ => false,
        };
        if unchanged {
            if let HoverState::Active { tooltip, .. } = &self.hover {
                let tooltip = tooltip.clone();
                let (x, y) = self.cursor;
                tooltip::position(&mut self.dom, &tooltip, x, y);
            }
            return Ok(());
        }

        self.leave_card();
        match target {
            Some(card) => self.enter_card(card),
            None => Ok(()),
        }
    }

    fn leave_card(&mut self) {
        let HoverState::Active { card, key, .. } = std::mem::replace(&mut self.hover, HoverState::Idle)
        else {
            return;
        };
        debug!("hover leave {key}");
        self.dom.remove_class(&card, &self.config.hover_class);

        if let Some(id) = self.cursor_restore.take() {
            self.timers.cancel(id);
        }
        let now = self.clock.now_ms();
        self.cursor_restore = Some(self.timers.schedule(
            now,
            self.config.cursor_restore_ms,
            Deferred::RestoreCursor,
        ));
    }

    fn enter_card(&mut self, card: D::Node) -> Result<()> {
        let id = self.dom.id(&card);
        let key = id.strip_prefix(&self.config.card_prefix).unwrap_or(&id).to_string();
        let tooltip = self
            .dom
            .children(&card)
            .into_iter()
            .find(|child| self.dom.has_class(child, &self.config.tooltip_class))
            .ok_or_else(|| Error::MissingTooltip(key.clone()))?;
        debug!("hover enter {key}");

        // A new hover supersedes any pending cursor restore.
        if let Some(restore) = self.cursor_restore.take() {
            self.timers.cancel(restore);
        }

        tooltip::init_min_width(&mut self.dom, &tooltip);
        self.dom.set_style(&tooltip, "opacity", Some("0"));
        let now = self.clock.now_ms();
        self.timers.schedule(now, self.config.fade_in_ms, Deferred::RevealTooltip(tooltip.clone()));

        let (x, y) = self.cursor;
        tooltip::position(&mut self.dom, &tooltip, x, y);
        self.dom.set_style(&self.overlay, "cursor", Some("none"));
        self.dom.add_class(&card, &self.config.hover_class);

        self.hover = HoverState::Active { card, key, tooltip };
        Ok(())
    }

    /// Key of the card currently hovered.
    pub fn active_card(&self) -> Option<&str> {
        match &self.hover {
            HoverState::Active { key, .. } => Some(key),
            HoverState::Idle => None,
        }
    }

    /// Tooltip element of the hovered card.
    pub fn active_tooltip(&self) -> Option<&D::Node> {
        match &self.hover {
            HoverState::Active { tooltip, .. } => Some(tooltip),
            HoverState::Idle => None,
        }
    }
}
