use crate::config::Settings;

use super::helpers::LayerBuilder;

/// Top-to-bottom layout cursor over a growing list of pages.
///
/// Coordinates are PDF-style millimetres from the bottom-left corner. The
/// cursor marks the top of the next block.
pub struct PageFlow<'a> {
    settings: &'a Settings,
    finished: Vec<LayerBuilder>,
    current: LayerBuilder,
    cursor_y: f32,
}

impl<'a> PageFlow<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            finished: Vec::new(),
            current: LayerBuilder::new(),
            cursor_y: settings.page_height - settings.margin_top,
        }
    }

    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    pub fn layer(&mut self) -> &mut LayerBuilder {
        &mut self.current
    }

    pub fn cursor(&self) -> f32 {
        self.cursor_y
    }

    pub fn left(&self) -> f32 {
        self.settings.margin_left
    }

    pub fn width(&self) -> f32 {
        self.settings.content_width()
    }

    fn top(&self) -> f32 {
        self.settings.page_height - self.settings.margin_top
    }

    /// Vertical space left on the current page
    pub fn remaining(&self) -> f32 {
        self.cursor_y - self.settings.margin_bottom
    }

    pub fn at_page_top(&self) -> bool {
        (self.cursor_y - self.top()).abs() < f32::EPSILON
    }

    /// Start a new page unless `height` fits below the cursor.
    ///
    /// Returns true when a page break happened. A block taller than a whole
    /// page is placed at the top of a fresh page and allowed to overflow.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if height <= self.remaining() || self.at_page_top() {
            return false;
        }
        self.new_page();
        true
    }

    pub fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.finished.push(page);
        self.cursor_y = self.top();
    }

    pub fn advance(&mut self, dy: f32) {
        self.cursor_y -= dy;
    }

    /// Gap between blocks; swallowed at the top of a page
    pub fn add_spacing(&mut self, dy: f32) {
        if self.at_page_top() {
            return;
        }
        if dy >= self.remaining() {
            self.new_page();
        } else {
            self.advance(dy);
        }
    }

    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    /// All pages, including the one in progress
    pub fn into_pages(mut self) -> Vec<LayerBuilder> {
        self.finished.push(self.current);
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_top_margin() {
        let settings = Settings::default();
        let flow = PageFlow::new(&settings);
        assert!(flow.at_page_top());
        assert_eq!(flow.cursor(), settings.page_height - settings.margin_top);
        assert_eq!(flow.page_count(), 1);
    }

    #[test]
    fn test_breaks_when_space_runs_out() {
        let settings = Settings::default();
        let mut flow = PageFlow::new(&settings);
        let content = settings.content_height();

        assert!(!flow.ensure_space(10.0));
        flow.advance(content - 5.0);
        assert!(flow.ensure_space(10.0));
        assert_eq!(flow.page_count(), 2);
        assert!(flow.at_page_top());
    }

    #[test]
    fn test_oversized_block_stays_on_fresh_page() {
        let settings = Settings::default();
        let mut flow = PageFlow::new(&settings);
        assert!(!flow.ensure_space(settings.page_height * 2.0));
        assert_eq!(flow.page_count(), 1);
    }

    #[test]
    fn test_spacing_is_swallowed_at_top() {
        let settings = Settings::default();
        let mut flow = PageFlow::new(&settings);
        flow.add_spacing(5.0);
        assert!(flow.at_page_top());
        flow.advance(1.0);
        flow.add_spacing(5.0);
        assert!((flow.cursor() - (settings.page_height - settings.margin_top - 6.0)).abs() < 1e-4);
        assert_eq!(flow.into_pages().len(), 1);
    }
}
