//! Page scroll progress, damped, with range queries over page sections.

use std::time::Duration;

/// Scroll position over a page several viewports tall.
///
/// Input moves `target`; `update` eases the reported `offset` toward it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    /// Page height in viewports
    pub pages: f64,
    /// Easing time constant in seconds, zero snaps
    pub damping: f64,
    target: f64,
    offset: f64,
}

impl ScrollState {
    pub fn new(pages: f64, damping: f64) -> Self {
        Self {
            pages: pages.max(1.0),
            damping: damping.max(0.0),
            target: 0.0,
            offset: 0.0,
        }
    }

    /// Current progress, 0 at the top and 1 at the bottom
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Move by a number of viewports, negative scrolls up
    pub fn scroll_by(&mut self, viewports: f64) {
        let scrollable = self.pages - 1.0;
        if scrollable <= 0.0 {
            return;
        }
        self.scroll_to(self.target + viewports / scrollable);
    }

    pub fn scroll_to(&mut self, progress: f64) {
        if progress.is_nan() {
            return;
        }
        self.target = progress.clamp(0.0, 1.0);
    }

    pub fn page_down(&mut self) {
        self.scroll_by(1.0);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-1.0);
    }

    pub fn home(&mut self) {
        self.scroll_to(0.0);
    }

    pub fn end(&mut self) {
        self.scroll_to(1.0);
    }

    pub fn update(&mut self, dt: Duration) {
        if self.damping <= 0.0 {
            self.offset = self.target;
            return;
        }
        let k = 1.0 - (-dt.as_secs_f64() / self.damping).exp();
        self.offset += (self.target - self.offset) * k;
        if (self.target - self.offset).abs() < 1e-5 {
            self.offset = self.target;
        }
    }

    /// Progress through `[from - margin, from + distance + margin]`, 0 before and 1 after
    pub fn range(&self, from: f64, distance: f64, margin: f64) -> f64 {
        let start = from - margin;
        let end = start + distance + margin * 2.0;
        if self.offset < start {
            0.0
        } else if self.offset > end || end <= start {
            1.0
        } else {
            (self.offset - start) / (end - start)
        }
    }

    /// Rises from 0 to 1 and back to 0 across the section
    pub fn curve(&self, from: f64, distance: f64, margin: f64) -> f64 {
        (self.range(from, distance, margin) * std::f64::consts::PI).sin()
    }

    /// Whether the offset lies inside the section
    pub fn visible(&self, from: f64, distance: f64, margin: f64) -> bool {
        let start = from - margin;
        let end = start + distance + margin * 2.0;
        self.offset >= start && self.offset <= end
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(4.0, 0.2)
    }
}
