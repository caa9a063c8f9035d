use ratatui::Frame;
use ratatui::layout::Rect;

/// A renderable piece of the dashboard.
///
/// Components receive data as struct fields ("props") and may borrow
/// persistent presentation state, such as a list cursor, for the duration
/// of a frame. `render` takes `&mut self` so that borrowed state can be
/// updated while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes terminal events.
pub trait EventHandler {
    /// What the component reports back to the loop.
    type Event;

    /// Handle a `TuiEvent`; `None` means the event was not consumed.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
