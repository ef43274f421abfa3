//! Guided tours: one per page, stepped through as tooltips.

use serde::{Deserialize, Serialize};

use super::persist::Persisted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideStep {
    /// CSS selector of the element the tooltip points at.
    pub target: &'static str,
    pub title: &'static str,
    pub content: &'static str,
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guide {
    pub id: &'static str,
    pub steps: &'static [GuideStep],
}

const fn step(
    target: &'static str,
    title: &'static str,
    content: &'static str,
    placement: Placement,
) -> GuideStep {
    GuideStep {
        target,
        title,
        content,
        placement,
    }
}

static TODAY_STEPS: [GuideStep; 3] = [
    step(
        ".today-deck",
        "Your Daily Dashboard",
        "This is your Today page where you can see your schedule and active tasks at a glance.",
        Placement::Bottom,
    ),
    step(
        ".time-grid",
        "Time Management",
        "View and manage your time blocks here. Click on any slot to add or edit events.",
        Placement::Right,
    ),
    step(
        ".active-items",
        "Active Tasks",
        "Track your current tasks and their progress. Drag to reorder or click to view details.",
        Placement::Left,
    ),
];

static CUSTOMERS_STEPS: [GuideStep; 3] = [
    step(
        ".customer-orbit",
        "Customer Overview",
        "View all your customer relationships and interactions in one place.",
        Placement::Bottom,
    ),
    step(
        ".identity-card",
        "Customer Profile",
        "See detailed information about each customer including contact details and status.",
        Placement::Right,
    ),
    step(
        ".journey-timeline",
        "Interaction History",
        "Track all meetings, emails, and calls with this customer over time.",
        Placement::Left,
    ),
];

static WORK_STEPS: [GuideStep; 3] = [
    step(
        ".kanban-board",
        "Work Board",
        "Manage your projects using this kanban board. Drag cards between columns to update status.",
        Placement::Top,
    ),
    step(
        ".kanban-column",
        "Work Columns",
        "Organize tasks into columns like To Do, In Progress, and Done.",
        Placement::Bottom,
    ),
    step(
        ".kanban-card",
        "Task Cards",
        "Each card represents a task. Click to edit details or drag to move between columns.",
        Placement::Right,
    ),
];

static SYSTEMS_STEPS: [GuideStep; 1] = [step(
    ".systems-page",
    "Systems & Settings",
    "Configure your workspace preferences and system settings here.",
    Placement::Bottom,
)];

pub static GUIDES: [Guide; 4] = [
    Guide {
        id: "today",
        steps: &TODAY_STEPS,
    },
    Guide {
        id: "customers",
        steps: &CUSTOMERS_STEPS,
    },
    Guide {
        id: "work",
        steps: &WORK_STEPS,
    },
    Guide {
        id: "systems",
        steps: &SYSTEMS_STEPS,
    },
];

pub fn find_guide(id: &str) -> Option<&'static Guide> {
    GUIDES.iter().find(|g| g.id == id)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuideStore {
    pub active_guide: Option<String>,
    pub current_step: usize,
    pub completed_guides: Vec<String>,
}

impl Persisted for GuideStore {
    const STORAGE_KEY: &'static str = "helix-guide-storage";
}

impl GuideStore {
    pub fn start(&mut self, guide_id: &str) {
        self.active_guide = Some(guide_id.to_string());
        self.current_step = 0;
    }

    pub fn next_step(&mut self) {
        self.current_step += 1;
    }

    pub fn prev_step(&mut self) {
        self.current_step = self.current_step.saturating_sub(1);
    }

    /// Leave the tour without recording it as completed.
    pub fn skip(&mut self) {
        self.active_guide = None;
        self.current_step = 0;
    }

    /// End the active tour, recording it once in the completed list.
    pub fn complete(&mut self) {
        if let Some(id) = self.active_guide.take()
            && !self.completed_guides.contains(&id)
        {
            self.completed_guides.push(id);
        }
        self.current_step = 0;
    }

    pub fn is_completed(&self, guide_id: &str) -> bool {
        self.completed_guides.iter().any(|g| g == guide_id)
    }

    /// The tooltip to show, if any. A step index past the end of the
    /// active guide completes the guide and shows nothing.
    pub fn current(&mut self) -> Option<&'static GuideStep> {
        let guide = find_guide(self.active_guide.as_deref()?)?;
        match guide.steps.get(self.current_step) {
            Some(step) => Some(step),
            None => {
                self.complete();
                None
            }
        }
    }

    /// The tooltip's primary button: next step, or finish on the last one.
    pub fn advance(&mut self) {
        let Some(guide) = self.active_guide.as_deref().and_then(find_guide) else {
            return;
        };
        if self.current_step + 1 < guide.steps.len() {
            self.next_step();
        } else {
            self.complete();
        }
    }
}
