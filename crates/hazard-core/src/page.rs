//! "Show more" pagination over the processed alert list.

/// Rows shown before the user asks for more.
pub const INITIAL_PAGE_SIZE: usize = 6;
/// Rows added per "show more".
pub const PAGE_STEP: usize = 10;

/// A visible-count cursor. Pure slice; it never reorders or filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    visible: usize,
    initial: usize,
    step: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(INITIAL_PAGE_SIZE, PAGE_STEP)
    }
}

impl Pager {
    pub fn new(initial: usize, step: usize) -> Self {
        Self {
            visible: initial,
            initial,
            step,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// Back to the first page. Called whenever any filter changes.
    pub fn reset(&mut self) {
        self.visible = self.initial;
    }

    pub fn show_more(&mut self) {
        self.visible = self.visible.saturating_add(self.step);
    }

    pub fn show_less(&mut self) {
        self.reset();
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible.min(items.len())]
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible < total
    }

    /// Whether a "show less" control makes sense for this list.
    pub fn can_show_less(&self, total: usize) -> bool {
        !self.has_more(total) && total > self.initial
    }

    /// `"A mostrar 6 de 14"`-style counter values: (shown, total).
    pub fn shown_of(&self, total: usize) -> (usize, usize) {
        (self.visible.min(total), total)
    }
}
