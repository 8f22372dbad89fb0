//! Host page emulation
//!
//! The scene lives in a tall page section with a sticky viewport. Scrolling
//! the page moves a normalized progress value from 0 (section top at the
//! viewport top) to 1 (section bottom at the viewport bottom). The window
//! plays the viewport; wheel and keys scroll a virtual page around it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// Section height in viewport heights.
    pub section_viewports: f32,
    /// Page content above and below the section, in viewport heights.
    pub margin_viewports: f32,
    /// Pixels scrolled per wheel line.
    pub line_height: f32,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            section_viewports: 2.5,
            margin_viewports: 1.0,
            line_height: 40.0,
        }
    }
}

/// Virtual scroll page in logical pixels.
#[derive(Debug, Clone)]
pub struct VirtualPage {
    settings: HostSettings,
    viewport: f32,
    offset: f32,
}

impl VirtualPage {
    /// A page for a viewport `viewport` logical pixels tall, scrolled to the
    /// top of the scene section.
    pub fn new(settings: HostSettings, viewport: f32) -> Self {
        let mut page = Self {
            settings,
            viewport: viewport.max(1.0),
            offset: 0.0,
        };
        page.offset = page.section_top();
        page
    }

    fn section_top(&self) -> f32 {
        self.settings.margin_viewports * self.viewport
    }

    fn section_height(&self) -> f32 {
        self.settings.section_viewports * self.viewport
    }

    pub fn page_length(&self) -> f32 {
        self.section_height() + 2.0 * self.section_top()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Scroll by `delta` logical pixels (positive is down), clamped to the page.
    pub fn scroll_by(&mut self, delta: f32) {
        let max = (self.page_length() - self.viewport).max(0.0);
        self.offset = (self.offset + delta).clamp(0.0, max);
    }

    pub fn scroll_lines(&mut self, lines: f32) {
        self.scroll_by(lines * self.settings.line_height);
    }

    /// Scroll by whole viewports.
    pub fn scroll_pages(&mut self, pages: f32) {
        self.scroll_by(pages * self.viewport);
    }

    /// Keep the normalized progress across a viewport change.
    pub fn set_viewport(&mut self, viewport: f32) {
        let progress = self.progress();
        let inside = self.offset - self.section_top();
        self.viewport = viewport.max(1.0);
        let travel = self.section_height() - self.viewport;
        self.offset = if (0.0..=1.0).contains(&progress) && inside >= 0.0 && travel > 0.0 {
            self.section_top() + progress * travel
        } else {
            self.offset.clamp(0.0, (self.page_length() - self.viewport).max(0.0))
        };
    }

    /// Section scroll progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        let travel = self.section_height() - self.viewport;
        if travel <= 0.0 {
            return 0.0;
        }
        ((self.offset - self.section_top()) / travel).clamp(0.0, 1.0)
    }

    /// Whether any part of the section overlaps the viewport.
    pub fn section_in_view(&self) -> bool {
        let top = self.section_top();
        let bottom = top + self.section_height();
        self.offset < bottom && self.offset + self.viewport > top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> VirtualPage {
        VirtualPage::new(HostSettings::default(), 720.0)
    }

    #[test]
    fn starts_at_section_top() {
        let page = page();
        assert_eq!(page.progress(), 0.0);
        assert!(page.section_in_view());
        assert_eq!(page.page_length(), 720.0 * 4.5);
    }

    #[test]
    fn progress_spans_the_sticky_travel() {
        let mut page = page();
        // travel is 1.5 viewports
        page.scroll_by(540.0);
        assert!((page.progress() - 0.5).abs() < 1e-6);
        page.scroll_pages(10.0);
        assert_eq!(page.progress(), 1.0);
        assert_eq!(page.offset(), page.page_length() - 720.0);
    }

    #[test]
    fn scrolling_past_the_section_hides_it() {
        let mut page = page();
        page.scroll_pages(2.5);
        assert!(!page.section_in_view());
        page.scroll_pages(-10.0);
        assert_eq!(page.offset(), 0.0);
        assert!(!page.section_in_view());
        assert_eq!(page.progress(), 0.0);
        page.scroll_lines(1.0);
        assert!(page.section_in_view());
    }

    #[test]
    fn resize_keeps_progress() {
        let mut page = page();
        page.scroll_by(270.0);
        let before = page.progress();
        page.set_viewport(1080.0);
        assert!((page.progress() - before).abs() < 1e-5);
    }
}
