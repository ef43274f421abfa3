use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::persist::Persisted;

/// Top-level views of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Today,
    Customers,
    Work,
    Systems,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Today, Page::Customers, Page::Work, Page::Systems];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Today => "today",
            Page::Customers => "customers",
            Page::Work => "work",
            Page::Systems => "systems",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Today => "Today",
            Page::Customers => "Customers",
            Page::Work => "Work",
            Page::Systems => "Systems",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown page: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationStore {
    pub current_page: Page,
    /// Visited pages, oldest first; the last entry is the current page.
    pub history: Vec<Page>,
}

impl Default for NavigationStore {
    fn default() -> Self {
        Self {
            current_page: Page::Today,
            history: vec![Page::Today],
        }
    }
}

impl Persisted for NavigationStore {
    const STORAGE_KEY: &'static str = "helix-navigation-storage";
}

impl NavigationStore {
    /// Go to `page`. Navigating to the current page changes nothing.
    pub fn navigate(&mut self, page: Page) {
        if page == self.current_page {
            return;
        }
        self.current_page = page;
        self.history.push(page);
    }

    pub fn go_back(&mut self) {
        if !self.can_go_back() {
            return;
        }
        self.history.pop();
        if let Some(&previous) = self.history.last() {
            self.current_page = previous;
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }
}
