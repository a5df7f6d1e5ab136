//! Buffering presentation surface.
//!
//! Records render directives instead of drawing, for hosts that pull them
//! after each action (FFI callers, tests).

use super::{PresentationSurface, TaskRow};

/// One instruction for a host-side list display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDirective {
    ClearRows,
    AppendRow(TaskRow),
    Notify(String),
    ClearInput,
}

/// Surface that queues directives in emission order.
///
/// Removals are always immediate; hosts animate on their side.
#[derive(Debug, Default)]
pub struct DirectiveQueue {
    directives: Vec<RenderDirective>,
}

impl DirectiveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directives(&self) -> &[RenderDirective] {
        &self.directives
    }

    /// Takes all queued directives, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<RenderDirective> {
        std::mem::take(&mut self.directives)
    }

    /// Rows currently displayed after replaying the queued directives.
    pub fn visible_rows(&self) -> Vec<&TaskRow> {
        let mut rows = Vec::new();
        for directive in &self.directives {
            match directive {
                RenderDirective::ClearRows => rows.clear(),
                RenderDirective::AppendRow(row) => rows.push(row),
                RenderDirective::Notify(_) | RenderDirective::ClearInput => {}
            }
        }
        rows
    }
}

impl PresentationSurface for DirectiveQueue {
    fn clear_rows(&mut self) {
        self.directives.push(RenderDirective::ClearRows);
    }

    fn append_row(&mut self, row: &TaskRow) {
        self.directives.push(RenderDirective::AppendRow(row.clone()));
    }

    fn notify(&mut self, message: &str) {
        self.directives.push(RenderDirective::Notify(message.to_string()));
    }

    fn clear_input(&mut self) {
        self.directives.push(RenderDirective::ClearInput);
    }
}
