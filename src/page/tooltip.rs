//! Tooltip placement and first-show sizing.

use super::dom::{Dom, Size};

/// Which corner of the tooltip sits on the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Indexed by orientation code: bit 0 = flipped horizontally, bit 1 = flipped vertically.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn from_flips(horizontal: bool, vertical: bool) -> Self {
        Self::ALL[horizontal as usize + 2 * vertical as usize]
    }

    pub fn class(self) -> &'static str {
        match self {
            Corner::TopLeft => "tl",
            Corner::TopRight => "tr",
            Corner::BottomLeft => "bl",
            Corner::BottomRight => "br",
        }
    }

    pub fn code(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }
}

/// Where a tooltip ends up for a given pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub corner: Corner,
}

/// Anchor right/below the pointer, flipping an axis only when the default side
/// overflows the viewport and the opposite side fits.
pub fn place(x: f64, y: f64, tooltip: Size, viewport: Size) -> Placement {
    let flip_h = viewport.width < x + tooltip.width && x - tooltip.width >= 0.0;
    let flip_v = viewport.height < y + tooltip.height && y - tooltip.height >= 0.0;
    Placement {
        left: if flip_h { x - tooltip.width } else { x },
        top: if flip_v { y - tooltip.height } else { y },
        corner: Corner::from_flips(flip_h, flip_v),
    }
}

/// Measure `tooltip`, place it at `(x, y)` and write position and corner class.
pub fn position<D: Dom>(dom: &mut D, tooltip: &D::Node, x: f64, y: f64) -> Placement {
    let placement = place(x, y, dom.offset_size(tooltip), dom.viewport());
    dom.set_style(tooltip, "top", Some(&format!("{}px", placement.top)));
    dom.set_style(tooltip, "left", Some(&format!("{}px", placement.left)));
    for corner in Corner::ALL {
        dom.set_class(tooltip, corner.class(), corner == placement.corner);
    }
    placement
}

/// Lock the tooltip's natural width in as `min-width` the first time it is shown.
///
/// Hidden tooltips use `display: none`, so they are briefly made measurable but
/// invisible. An empty inline `opacity` marks a tooltip that was never shown;
/// returns whether the measurement ran.
pub fn init_min_width<D: Dom>(dom: &mut D, tooltip: &D::Node) -> bool {
    if !dom.style(tooltip, "opacity").is_empty() {
        return false;
    }
    dom.set_style(tooltip, "visibility", Some("hidden"));
    dom.set_style(tooltip, "display", Some("block"));
    let width = dom.offset_size(tooltip).width;
    dom.set_style(tooltip, "min-width", Some(&format!("{width}px")));
    dom.set_style(tooltip, "display", None);
    dom.set_style(tooltip, "visibility", None);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Size = Size::new(800.0, 600.0);

    #[test]
    fn test_default_orientation_when_it_fits() {
        let p = place(100.0, 100.0, Size::new(200.0, 150.0), VIEW);
        assert_eq!(p, Placement { left: 100.0, top: 100.0, corner: Corner::TopLeft });
    }

    #[test]
    fn test_flip_left_on_right_overflow() {
        let p = place(700.0, 100.0, Size::new(200.0, 150.0), VIEW);
        assert_eq!(p.left, 500.0);
        assert_eq!(p.top, 100.0);
        assert_eq!(p.corner, Corner::TopRight);
        assert_eq!(p.corner.code(), 1);
    }

    #[test]
    fn test_flip_up_on_bottom_overflow() {
        let p = place(100.0, 500.0, Size::new(200.0, 150.0), VIEW);
        assert_eq!(p.top, 350.0);
        assert_eq!(p.corner, Corner::BottomLeft);
    }

    #[test]
    fn test_flip_both_axes() {
        let p = place(700.0, 500.0, Size::new(200.0, 150.0), VIEW);
        assert_eq!((p.left, p.top), (500.0, 350.0));
        assert_eq!(p.corner.class(), "br");
    }

    #[test]
    fn test_no_flip_when_other_side_does_not_fit() {
        // Wider than the space on either side: stay on the default side.
        let p = place(300.0, 100.0, Size::new(500.0, 10.0), VIEW);
        assert_eq!(p.left, 300.0);
        assert_eq!(p.corner, Corner::TopLeft);
    }

    #[test]
    fn test_zero_sized_tooltip_never_flips() {
        let p = place(800.0, 600.0, Size::default(), VIEW);
        assert_eq!((p.left, p.top, p.corner), (800.0, 600.0, Corner::TopLeft));
    }

    #[test]
    fn test_exact_fit_does_not_flip() {
        let p = place(600.0, 0.0, Size::new(200.0, 10.0), VIEW);
        assert_eq!(p.corner, Corner::TopLeft);
    }

    #[test]
    fn test_corner_codes_match_table() {
        for (code, corner) in Corner::ALL.iter().enumerate() {
            assert_eq!(corner.code(), code);
            assert_eq!(Corner::from_flips(code & 1 != 0, code & 2 != 0), *corner);
        }
    }
}
