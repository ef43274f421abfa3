//! Demo data written by `helixdesk init --seed`.

use crate::backend::store::Document;
use crate::models::{Column, Customer, EventKind, KanbanBoard, Priority, Task, TimelineEvent};

fn event(id: &str, kind: EventKind, title: &str, date: &str, notes: &str) -> TimelineEvent {
    TimelineEvent {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        date: date.to_string(),
        notes: notes.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn customer(
    id: &str,
    name: &str,
    contact: &str,
    email: &str,
    status: &str,
    ltv: &str,
    segment: &str,
    avatar_name: &str,
    timeline: Vec<TimelineEvent>,
) -> Customer {
    Customer {
        id: id.to_string(),
        name: name.to_string(),
        contact: contact.to_string(),
        email: email.to_string(),
        status: status.to_string(),
        ltv: ltv.to_string(),
        segment: segment.to_string(),
        avatar: format!(
            "https://ui-avatars.com/api/?name={}&background=random",
            avatar_name
        ),
        timeline,
        extra: Default::default(),
    }
}

pub fn demo_customers() -> Vec<Customer> {
    vec![
        customer(
            "1",
            "Reliance Industries",
            "Aarav Ambani",
            "aarav@reliance.com",
            "Active",
            "₹1,20,00,000",
            "Enterprise",
            "Reliance+Ind",
            vec![
                event(
                    "t1",
                    EventKind::Meeting,
                    "Q3 Strategy",
                    "2025-11-18T10:00:00",
                    "Discussed digital expansion.",
                ),
                event(
                    "t2",
                    EventKind::Email,
                    "Invoice Sent",
                    "2025-11-15T14:30:00",
                    "Invoice #1023 sent.",
                ),
            ],
        ),
        customer(
            "2",
            "Tata Consultancy",
            "Diya Tata",
            "diya@tcs.com",
            "VIP",
            "₹50,00,000",
            "Strategic",
            "Tata+Cons",
            vec![event(
                "t3",
                EventKind::Call,
                "Project Update",
                "2025-11-19T09:00:00",
                "Urgent request for new features.",
            )],
        ),
        customer(
            "3",
            "Infosys Ltd",
            "Rohan Murthy",
            "rohan@infosys.com",
            "Active",
            "₹8,50,000",
            "Enterprise",
            "Infosys",
            Vec::new(),
        ),
    ]
}

fn task(id: &str, title: &str, customer: &str, due: &str, priority: Priority) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        customer: customer.to_string(),
        due_date: due.to_string(),
        priority,
        completed: false,
        extra: Default::default(),
    }
}

/// Three columns (To Do, In Progress, Done) with a handful of tasks.
pub fn demo_board() -> KanbanBoard {
    let mut board = KanbanBoard::default();
    for (id, title) in [("todo", "To Do"), ("in-progress", "In Progress"), ("done", "Done")] {
        board.add_column(Column {
            id: id.to_string(),
            title: title.to_string(),
            task_ids: Vec::new(),
        });
    }

    let placements = [
        (task("task-1", "Prepare Q4 proposal", "Reliance Industries", "Today", Priority::High), "todo"),
        (task("task-2", "Send feature estimate", "Tata Consultancy", "Tomorrow", Priority::High), "todo"),
        (task("task-3", "Schedule onboarding call", "Infosys Ltd", "Fri", Priority::Medium), "todo"),
        (task("task-4", "Review invoice #1023", "Reliance Industries", "Today", Priority::Medium), "in-progress"),
        (task("task-5", "Update CRM notes", "Tata Consultancy", "No Date", Priority::Low), "done"),
    ];
    for (mut task, column) in placements {
        task.completed = column == "done";
        board.add_task(task, column);
    }
    board
}

pub fn demo_document() -> Document {
    Document {
        customers: demo_customers(),
        kanban: demo_board(),
        users: Default::default(),
        extra: Default::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_document_is_consistent() {
        let doc = demo_document();
        assert_eq!(doc.customers.len(), 3);
        assert_eq!(doc.kanban.column_order, vec!["todo", "in-progress", "done"]);
        assert!(doc.kanban.dangling_references().is_empty());
        for id in doc.kanban.tasks.keys() {
            assert!(doc.kanban.column_of(id).is_some(), "task {} has no column", id);
        }
    }

    #[test]
    fn test_demo_customers_match_wire_shape() {
        let json = serde_json::to_value(demo_customers()).unwrap();
        assert_eq!(json[0]["name"], "Reliance Industries");
        assert_eq!(json[0]["timeline"][0]["type"], "meeting");
        assert_eq!(json[1]["status"], "VIP");
        assert_eq!(json[2]["timeline"], serde_json::json!([]));
    }

    #[test]
    fn test_done_column_tasks_are_completed() {
        let board = demo_board();
        for id in &board.columns["done"].task_ids {
            assert!(board.tasks[id].completed);
        }
        assert!(!board.tasks["task-1"].completed);
    }
}
