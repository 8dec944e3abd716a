use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

/// A stored task. Serialized with the camelCase field names clients expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub created_by: String,
}

/// Fields of a task as accepted on creation, defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<OffsetDateTime>,
}

/// Merge update: `None` leaves the stored field alone.
/// `due_date: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due_date: Option<Option<OffsetDateTime>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
    }

    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Priority,
    DueDate,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::CreatedAt,
        SortKey::UpdatedAt,
        SortKey::Title,
        SortKey::Priority,
        SortKey::DueDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::Title => "title",
            Self::Priority => "priority",
            Self::DueDate => "dueDate",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == raw)
    }

    /// Dates compare by instant with a missing due date treated as the epoch.
    /// Titles ignore case first and fall back to the raw strings.
    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            Self::DueDate => {
                let epoch = OffsetDateTime::UNIX_EPOCH;
                a.due_date
                    .unwrap_or(epoch)
                    .cmp(&b.due_date.unwrap_or(epoch))
            }
            Self::Title => a
                .title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title)),
            Self::Priority => a.priority.as_str().cmp(b.priority.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
    }

    /// Sorts in place. Equal keys fall back to ascending id whatever the direction,
    /// so the order never depends on map iteration.
    pub fn sort(&self, tasks: &mut [Task]) {
        tasks.sort_by(|a, b| {
            let primary = self.sort_by.compare(a, b);
            let primary = match self.sort_order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });
    }

    pub fn apply<'a, I>(&self, tasks: I) -> Vec<Task>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut out: Vec<Task> = tasks
            .into_iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect();
        self.sort(&mut out);
        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub todo: usize,
    #[serde(rename = "in-progress")]
    pub in_progress: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
    pub overdue: usize,
}

impl TaskStats {
    /// Overdue means a due date strictly before `now` on a task that isn't completed.
    pub fn collect<'a, I>(tasks: I, now: OffsetDateTime) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut stats = Self::default();
        for task in tasks {
            stats.total += 1;
            match task.status {
                Status::Todo => stats.by_status.todo += 1,
                Status::InProgress => stats.by_status.in_progress += 1,
                Status::Completed => stats.by_status.completed += 1,
            }
            match task.priority {
                Priority::Low => stats.by_priority.low += 1,
                Priority::Medium => stats.by_priority.medium += 1,
                Priority::High => stats.by_priority.high += 1,
            }
            if task.status != Status::Completed && task.due_date.is_some_and(|d| d < now) {
                stats.overdue += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn task(title: &str, due: Option<OffsetDateTime>) -> Task {
        let at = datetime!(2024-03-01 09:00 UTC);
        Task {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            title: title.into(),
            description: String::new(),
            priority: Priority::Medium,
            status: Status::Todo,
            due_date: due,
            created_at: at,
            updated_at: at,
            created_by: "Alice".into(),
        }
    }

    #[test]
    fn wire_names_match_clients() {
        assert_eq!(
            serde_json::to_value(Status::InProgress).unwrap(),
            "in-progress"
        );
        assert_eq!(serde_json::to_value(Priority::High).unwrap(), "high");
        assert_eq!(SortKey::parse("dueDate"), Some(SortKey::DueDate));
        assert_eq!(Status::parse("done"), None);
    }

    #[test]
    fn task_serializes_camel_case_with_rfc3339_dates() {
        let t = task("A", None);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["createdBy"], "Alice");
        assert_eq!(json["createdAt"], "2024-03-01T09:00:00Z");
        assert!(json["dueDate"].is_null());
    }

    #[test]
    fn due_date_ascending_puts_missing_first() {
        let tasks = vec![
            task("none", None),
            task("2024", Some(datetime!(2024-01-01 00:00 UTC))),
            task("2023", Some(datetime!(2023-01-01 00:00 UTC))),
        ];
        let filter = TaskFilter {
            sort_by: SortKey::DueDate,
            ..TaskFilter::default()
        };
        let sorted = filter.apply(&tasks);
        let titles: Vec<_> = sorted.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["none", "2023", "2024"]);
    }

    #[test]
    fn descending_title_sort_and_id_tie_break() {
        let mut a1 = task("a", None);
        let mut a2 = task("a", None);
        if a1.id > a2.id {
            std::mem::swap(&mut a1.id, &mut a2.id);
        }
        let b = task("b", None);
        let filter = TaskFilter {
            sort_by: SortKey::Title,
            sort_order: SortOrder::Desc,
            ..TaskFilter::default()
        };
        let sorted = filter.apply(&[a2.clone(), b.clone(), a1.clone()]);
        assert_eq!(sorted[0].id, b.id);
        assert_eq!(sorted[1].id, a1.id);
        assert_eq!(sorted[2].id, a2.id);
    }

    #[test]
    fn title_sort_ignores_case() {
        let tasks = vec![task("cherry", None), task("Banana", None), task("apple", None)];
        let filter = TaskFilter {
            sort_by: SortKey::Title,
            ..TaskFilter::default()
        };
        let titles: Vec<_> = filter
            .apply(&tasks)
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["apple", "Banana", "cherry"]);

        let same_letters = vec![task("b", None), task("B", None)];
        let titles: Vec<_> = filter
            .apply(&same_letters)
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["B", "b"]);
    }

    #[test]
    fn priority_sorts_by_wire_string() {
        let mut low = task("l", None);
        low.priority = Priority::Low;
        let mut high = task("h", None);
        high.priority = Priority::High;
        let medium = task("m", None);
        let filter = TaskFilter {
            sort_by: SortKey::Priority,
            ..TaskFilter::default()
        };
        let sorted = filter.apply(&[medium, low, high]);
        let order: Vec<_> = sorted.iter().map(|t| t.priority).collect();
        assert_eq!(order, [Priority::High, Priority::Low, Priority::Medium]);
    }

    #[test]
    fn filter_narrows_by_status_and_priority() {
        let mut done_high = task("x", None);
        done_high.status = Status::Completed;
        done_high.priority = Priority::High;
        let mut done_low = task("y", None);
        done_low.status = Status::Completed;
        done_low.priority = Priority::Low;
        let open = task("z", None);
        let filter = TaskFilter {
            status: Some(Status::Completed),
            priority: Some(Priority::High),
            ..TaskFilter::default()
        };
        let out = filter.apply(&[done_high.clone(), done_low, open]);
        assert_eq!(out, vec![done_high]);
    }

    #[test]
    fn patch_touches_only_supplied_fields() {
        let mut t = task("keep", Some(datetime!(2024-05-01 00:00 UTC)));
        t.description = "desc".into();
        let before = t.clone();
        TaskPatch {
            status: Some(Status::Completed),
            ..TaskPatch::default()
        }
        .apply(&mut t);
        assert_eq!(t.status, Status::Completed);
        assert_eq!(t.title, before.title);
        assert_eq!(t.description, before.description);
        assert_eq!(t.due_date, before.due_date);

        TaskPatch {
            due_date: Some(None),
            ..TaskPatch::default()
        }
        .apply(&mut t);
        assert_eq!(t.due_date, None);
    }

    #[test]
    fn stats_count_overdue_only_for_open_tasks() {
        let now = datetime!(2024-06-10 12:00 UTC);
        let yesterday = Some(datetime!(2024-06-09 12:00 UTC));
        let overdue = task("late", yesterday);
        let mut finished = task("done", yesterday);
        finished.status = Status::Completed;
        let mut future = task("later", Some(datetime!(2024-06-11 12:00 UTC)));
        future.priority = Priority::High;
        future.status = Status::InProgress;

        let stats = TaskStats::collect(&[overdue, finished, future], now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.by_status.todo, 1);
        assert_eq!(stats.by_status.in_progress, 1);
        assert_eq!(stats.by_status.completed, 1);
        assert_eq!(stats.by_priority.medium, 2);
        assert_eq!(stats.by_priority.high, 1);

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["byStatus"]["in-progress"], 1);
        assert_eq!(json["byPriority"]["low"], 0);
    }
}
