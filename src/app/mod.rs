mod state;

use crossterm::event::KeyCode;

pub use state::{App, FormKind, FormPopup};

/// Possible input events the app reacts to.
pub enum AppEvent {
    Tick,
    KeyPress(KeyCode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Home,
    Timers,
    Projects,
    Categories,
    Report,
    Help,
}

/// Views reachable from the tab bar, in display order.
pub const TABS: [AppView; 5] = [
    AppView::Home,
    AppView::Timers,
    AppView::Projects,
    AppView::Categories,
    AppView::Report,
];

impl AppView {
    pub fn title(self) -> &'static str {
        match self {
            AppView::Home => "Home",
            AppView::Timers => "Timers",
            AppView::Projects => "Projects",
            AppView::Categories => "Categories",
            AppView::Report => "Report",
            AppView::Help => "Help",
        }
    }
}
