use crate::domain::models::Task;
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;

pub const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    pub percentage: u32,
}

/// Per-category counts and rounded percentages over the full cached
/// collection. An empty collection yields an empty breakdown rather than a
/// division by zero. Output is ordered by category name.
pub fn category_breakdown(tasks: &[Task]) -> Vec<CategoryShare> {
    if tasks.is_empty() {
        return Vec::new();
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for task in tasks {
        *counts.entry(task.category.as_str()).or_default() += 1;
    }

    let total = tasks.len();
    counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category: category.to_string(),
            count,
            percentage: percentage_of(count, total),
        })
        .collect()
}

fn percentage_of(count: usize, total: usize) -> u32 {
    ((count as f64 / total as f64) * 100.0).round() as u32
}

/// Tasks that still need attention soon: not completed, and either overdue
/// (strictly before `today`) or due within the next seven calendar days
/// inclusive of `today`. Sorted ascending by due date (stable).
///
/// `today` is evaluated once per derivation so every task is judged against
/// the same instant.
pub fn upcoming_window(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    let horizon = today + chrono::Duration::days(UPCOMING_WINDOW_DAYS);
    let mut upcoming: Vec<Task> = tasks
        .iter()
        .filter(|task| !task.status.is_completed())
        .filter(|task| task.due_date < today || task.due_date <= horizon)
        .cloned()
        .collect();
    upcoming.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    upcoming
}

/// Convenience wrapper computing "today" at local midnight, never via a UTC
/// instant, so the window does not shift a day for users away from UTC.
pub fn upcoming(tasks: &[Task]) -> Vec<Task> {
    upcoming_window(tasks, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TaskStatus;
    use proptest::prelude::*;

    fn task(id: &str, category: &str, due_date: NaiveDate, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            description: None,
            assignee_id: None,
            category: category.to_string(),
            due_date,
            status,
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn breakdown_of_empty_collection_is_empty() {
        assert!(category_breakdown(&[]).is_empty());
    }

    #[test]
    fn breakdown_counts_and_percentages() {
        let today = date(2025, 12, 10);
        let tasks = vec![
            task("tsk-1", "Chore", today, TaskStatus::Todo),
            task("tsk-2", "Chore", today, TaskStatus::Completed),
            task("tsk-3", "Shopping", today, TaskStatus::Todo),
            task("tsk-4", "Homework", today, TaskStatus::InProgress),
        ];
        let breakdown = category_breakdown(&tasks);
        assert_eq!(breakdown.len(), 3);
        // BTreeMap ordering: Chore, Homework, Shopping.
        assert_eq!(breakdown[0].category, "Chore");
        assert_eq!(breakdown[0].count, 2);
        assert_eq!(breakdown[0].percentage, 50);
        assert_eq!(breakdown[1].category, "Homework");
        assert_eq!(breakdown[1].percentage, 25);
        assert_eq!(breakdown[2].category, "Shopping");
        assert_eq!(breakdown[2].percentage, 25);
    }

    #[test]
    fn upcoming_includes_overdue_and_week_window_only() {
        let today = date(2025, 12, 10);
        let tasks = vec![
            task("overdue", "Chore", date(2025, 12, 1), TaskStatus::Todo),
            task("due-today", "Chore", today, TaskStatus::Todo),
            task("due-7th-day", "Chore", date(2025, 12, 17), TaskStatus::Todo),
            task("too-far", "Chore", date(2025, 12, 18), TaskStatus::Todo),
            task("done", "Chore", today, TaskStatus::Completed),
        ];
        let upcoming = upcoming_window(&tasks, today);
        let ids: Vec<&str> = upcoming.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["overdue", "due-today", "due-7th-day"]);
    }

    #[test]
    fn upcoming_sorts_ascending_and_is_stable() {
        let today = date(2025, 12, 10);
        let tasks = vec![
            task("b-first", "Chore", date(2025, 12, 12), TaskStatus::Todo),
            task("b-second", "Chore", date(2025, 12, 12), TaskStatus::InProgress),
            task("a", "Chore", date(2025, 12, 11), TaskStatus::Todo),
        ];
        let upcoming = upcoming_window(&tasks, today);
        let ids: Vec<&str> = upcoming.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b-first", "b-second"]);
    }

    fn category_pattern() -> impl Strategy<Value = String> {
        prop::sample::select(vec![
            "Chore".to_string(),
            "Shopping".to_string(),
            "Homework".to_string(),
            "Other".to_string(),
        ])
    }

    proptest! {
        #[test]
        fn percentages_sum_to_100_within_rounding(categories in prop::collection::vec(category_pattern(), 1..40)) {
            let today = date(2025, 12, 10);
            let tasks: Vec<Task> = categories
                .iter()
                .enumerate()
                .map(|(index, category)| task(&format!("tsk-{index}"), category, today, TaskStatus::Todo))
                .collect();

            let breakdown = category_breakdown(&tasks);
            let sum: u32 = breakdown.iter().map(|share| share.percentage).sum();
            let tolerance = breakdown.len() as u32 - 1;
            prop_assert!(sum >= 100 - tolerance && sum <= 100 + tolerance);

            let counted: usize = breakdown.iter().map(|share| share.count).sum();
            prop_assert_eq!(counted, tasks.len());
        }
    }
}
