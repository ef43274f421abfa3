use serde::{Deserialize, Serialize};

use super::persist::Persisted;

/// Which optional panels of the shell are visible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStore {
    pub show_insight_ribbon: bool,
    pub show_right_rail: bool,
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self {
            show_insight_ribbon: true,
            show_right_rail: false,
        }
    }
}

impl Persisted for LayoutStore {
    const STORAGE_KEY: &'static str = "helix-layout-storage";
}

impl LayoutStore {
    pub fn toggle_insight_ribbon(&mut self) {
        self.show_insight_ribbon = !self.show_insight_ribbon;
    }

    pub fn toggle_right_rail(&mut self) {
        self.show_right_rail = !self.show_right_rail;
    }
}
