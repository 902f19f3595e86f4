//! Scroll-position tracking for the "currently reading" outline highlight.
//!
//! Mirrors an intersection-observer setup: each anchor row is observed
//! against a band offset from the viewport edges, and entering that band
//! activates the matching outline entry. One tracker exists per outline;
//! callers must [`ActiveSectionTracker::dispose`] the old one before
//! subscribing a replacement so a stale tracker can never write active state
//! for anchors that happen to share rows with the new set.

use mdscope_core::viewport::ViewportState;

/// Offsets that shrink the viewport into the observed band.
///
/// The band starts `top_offset` rows below the viewport top and ends above
/// the bottom `bottom_fraction` of the viewport, so a heading counts as
/// "being read" once it reaches the upper part of the reading area rather
/// than anywhere on screen.
#[derive(Clone, Copy, Debug)]
pub struct BandOptions {
    pub top_offset: u16,
    pub bottom_fraction: f32,
}

impl Default for BandOptions {
    fn default() -> Self {
        Self {
            top_offset: 2,
            bottom_fraction: 0.70,
        }
    }
}

#[derive(Debug)]
pub struct ActiveSectionTracker {
    rows: Vec<usize>,
    inside: Vec<bool>,
    options: BandOptions,
    disposed: bool,
}

impl ActiveSectionTracker {
    /// Starts observing the given anchor rows. The first [`Self::observe`]
    /// call reports every anchor already inside the band, which seeds the
    /// initial active entry right after a render.
    pub fn subscribe(rows: Vec<usize>, options: BandOptions) -> Self {
        let inside = vec![false; rows.len()];
        Self {
            rows,
            inside,
            options,
            disposed: false,
        }
    }

    /// Stops observing; subsequent `observe` calls are no-ops.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Reports the anchor that should become active, if any transitioned
    /// into the band since the last observation. When several enter at once
    /// the last one in document order wins.
    pub fn observe(&mut self, viewport: &ViewportState) -> Option<usize> {
        if self.disposed {
            return None;
        }
        let Some((band_top, band_bottom)) = self.band(viewport) else {
            return None;
        };

        let mut entered = None;
        for (i, &row) in self.rows.iter().enumerate() {
            let row = row as u32;
            let now_inside = row >= band_top && row < band_bottom;
            if now_inside && !self.inside[i] {
                entered = Some(i);
            }
            self.inside[i] = now_inside;
        }
        entered
    }

    /// Observed band in content rows: `[top, bottom)`.
    fn band(&self, viewport: &ViewportState) -> Option<(u32, u32)> {
        let h = viewport.viewport_h as u32;
        if h == 0 {
            return None;
        }
        let bottom_cut = (h as f32 * self.options.bottom_fraction).floor() as u32;
        let top = viewport.y.saturating_add(self.options.top_offset as u32);
        let bottom = viewport.y.saturating_add(h.saturating_sub(bottom_cut));
        (bottom > top).then_some((top, bottom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(y: u32, h: u16) -> ViewportState {
        let mut v = ViewportState::default();
        v.set_viewport(80, h);
        v.set_content(80, 1000);
        v.y = y;
        v
    }

    // With h = 20 and defaults the band is rows [y + 2, y + 6).
    fn tracker(rows: &[usize]) -> ActiveSectionTracker {
        ActiveSectionTracker::subscribe(rows.to_vec(), BandOptions::default())
    }

    #[test]
    fn first_observation_reports_anchor_already_in_band() {
        let mut t = tracker(&[0, 3, 50]);
        assert_eq!(t.observe(&viewport(0, 20)), Some(1));
    }

    #[test]
    fn scrolling_transfers_the_active_anchor() {
        let mut t = tracker(&[0, 10, 40]);
        assert_eq!(t.observe(&viewport(0, 20)), None);
        // Row 10 enters the band once the viewport reaches it.
        assert_eq!(t.observe(&viewport(8, 20)), Some(1));
        // No new transition while it stays inside.
        assert_eq!(t.observe(&viewport(9, 20)), None);
        // Row 40 enters later.
        assert_eq!(t.observe(&viewport(38, 20)), Some(2));
    }

    #[test]
    fn reentering_the_band_fires_again() {
        let mut t = tracker(&[10]);
        assert_eq!(t.observe(&viewport(8, 20)), Some(0));
        assert_eq!(t.observe(&viewport(30, 20)), None);
        assert_eq!(t.observe(&viewport(8, 20)), Some(0));
    }

    #[test]
    fn simultaneous_entries_resolve_to_the_last_in_order() {
        let mut t = tracker(&[12, 13]);
        assert_eq!(t.observe(&viewport(10, 20)), Some(1));
    }

    #[test]
    fn disposed_tracker_stays_silent() {
        let mut t = tracker(&[3]);
        t.dispose();
        assert!(t.is_disposed());
        assert_eq!(t.observe(&viewport(1, 20)), None);
        assert_eq!(t.observe(&viewport(2, 20)), None);
    }

    #[test]
    fn tiny_viewports_produce_no_band() {
        let mut t = tracker(&[0, 1]);
        assert_eq!(t.observe(&viewport(0, 2)), None);
    }
}
