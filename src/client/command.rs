//! The Ctrl+K command palette.

use super::layout::LayoutStore;
use super::navigation::{NavigationStore, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    GoTo(Page),
    ToggleInsightRibbon,
    ToggleRightRail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: &'static str,
    pub label: &'static str,
    pub action: CommandAction,
}

pub fn commands() -> Vec<Command> {
    vec![
        Command {
            id: "1",
            label: "Go to Today",
            action: CommandAction::GoTo(Page::Today),
        },
        Command {
            id: "2",
            label: "Go to Customers",
            action: CommandAction::GoTo(Page::Customers),
        },
        Command {
            id: "3",
            label: "Go to Work",
            action: CommandAction::GoTo(Page::Work),
        },
        Command {
            id: "4",
            label: "Go to Systems",
            action: CommandAction::GoTo(Page::Systems),
        },
        Command {
            id: "5",
            label: "Toggle Insight Ribbon",
            action: CommandAction::ToggleInsightRibbon,
        },
        Command {
            id: "6",
            label: "Toggle Right Rail",
            action: CommandAction::ToggleRightRail,
        },
    ]
}

/// A key press as the palette sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress<'a> {
    pub key: &'a str,
    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub command_modifier: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandStore {
    pub is_open: bool,
    pub query: String,
}

impl CommandStore {
    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Close and forget the query.
    pub fn close(&mut self) {
        self.is_open = false;
        self.query.clear();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Commands whose label contains the query, ignoring case.
    pub fn filtered(&self) -> Vec<Command> {
        let needle = self.query.to_lowercase();
        commands()
            .into_iter()
            .filter(|cmd| cmd.label.to_lowercase().contains(&needle))
            .collect()
    }

    /// Handle a global shortcut. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: KeyPress<'_>) -> bool {
        match key {
            KeyPress {
                key: "k" | "K",
                command_modifier: true,
            } => {
                self.toggle();
                true
            }
            KeyPress { key: "Escape", .. } if self.is_open => {
                self.close();
                true
            }
            _ => false,
        }
    }

    /// Run `action` against the stores it touches, then close the palette.
    pub fn execute(
        &mut self,
        action: CommandAction,
        navigation: &mut NavigationStore,
        layout: &mut LayoutStore,
    ) {
        match action {
            CommandAction::GoTo(page) => navigation.navigate(page),
            CommandAction::ToggleInsightRibbon => layout.toggle_insight_ribbon(),
            CommandAction::ToggleRightRail => layout.toggle_right_rail(),
        }
        self.close();
    }
}
