//! Narrow/wide viewport predicate
//!
//! One predicate shared by every component that branches on layout. It is
//! re-evaluated from the live width on every call and never cached, so a
//! resize handler and a click handler running back to back always agree.

use crate::dom::HeaderDom;

/// Default breakpoint in CSS pixels
pub const DEFAULT_BREAKPOINT_PX: f64 = 768.0;

/// Equivalent of `matchMedia("(max-width: <breakpoint>px)")`
pub fn is_narrow_width(width: f64, breakpoint_px: f64) -> bool {
    width <= breakpoint_px
}

/// Evaluate the predicate against the host's current width
pub fn is_narrow<D: HeaderDom>(dom: &D, breakpoint_px: f64) -> bool {
    is_narrow_width(dom.viewport_width(), breakpoint_px)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn test_breakpoint_is_inclusive() {
        assert!(is_narrow_width(400.0, DEFAULT_BREAKPOINT_PX));
        assert!(is_narrow_width(768.0, DEFAULT_BREAKPOINT_PX));
        assert!(!is_narrow_width(768.5, DEFAULT_BREAKPOINT_PX));
        assert!(!is_narrow_width(1200.0, DEFAULT_BREAKPOINT_PX));
    }

    #[test]
    fn test_reads_live_width() {
        let dom = MemoryDom::from_html("<p></p>");
        dom.set_viewport_width(500.0);
        assert!(is_narrow(&dom, DEFAULT_BREAKPOINT_PX));
        dom.set_viewport_width(1024.0);
        assert!(!is_narrow(&dom, DEFAULT_BREAKPOINT_PX));
    }
}
