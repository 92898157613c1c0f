use crate::domain::models::Task;

/// Tagged filter variants instead of a magic `"all"` string, so a category
/// literally named "all" cannot collide with the sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssigneeFilter {
    #[default]
    All,
    Member(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    DueDate,
    Title,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub search_text: String,
    pub category: CategoryFilter,
    pub assignee: AssigneeFilter,
    pub sort_by: SortBy,
}

impl FilterSpec {
    /// True iff any predicate differs from the no-filter baseline. The sort
    /// key never counts toward dirtiness.
    pub fn is_dirty(&self) -> bool {
        !self.search_text.trim().is_empty()
            || self.category != CategoryFilter::All
            || self.assignee != AssigneeFilter::All
    }
}

/// Derives the displayed task list from a cached collection. Pure: the input
/// is never mutated and a fresh vector is returned.
///
/// All predicates are ANDed; each is vacuously true at its baseline. Search
/// is a case-insensitive substring match over title and description. Sorting
/// is stable, so tasks sharing a due date keep their relative order.
pub fn derive(tasks: &[Task], spec: &FilterSpec) -> Vec<Task> {
    let needle = spec.search_text.trim().to_lowercase();

    let mut displayed: Vec<Task> = tasks
        .iter()
        .filter(|task| {
            let matches_search = needle.is_empty() || {
                let haystack = format!(
                    "{} {}",
                    task.title,
                    task.description.as_deref().unwrap_or_default()
                )
                .to_lowercase();
                haystack.contains(&needle)
            };
            let matches_category = match &spec.category {
                CategoryFilter::All => true,
                CategoryFilter::Only(category) => &task.category == category,
            };
            let matches_assignee = match &spec.assignee {
                AssigneeFilter::All => true,
                AssigneeFilter::Member(member_id) => {
                    task.assignee_id.as_deref() == Some(member_id.as_str())
                }
            };
            matches_search && matches_category && matches_assignee
        })
        .cloned()
        .collect();

    match spec.sort_by {
        SortBy::DueDate => displayed.sort_by(|a, b| a.due_date.cmp(&b.due_date)),
        SortBy::Title => displayed.sort_by(|a, b| a.title.cmp(&b.title)),
    }
    displayed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TaskStatus;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn task(id: &str, title: &str, due_date: NaiveDate) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            assignee_id: None,
            category: "Chore".to_string(),
            due_date,
            status: TaskStatus::Todo,
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn sample_tasks() -> Vec<Task> {
        let mut trash = task("tsk-1", "Take out trash", date(2025, 12, 20));
        trash.assignee_id = Some("mem-1".to_string());
        let mut vacuum = task("tsk-2", "Vacuum living room", date(2025, 12, 10));
        vacuum.category = "Other".to_string();
        vacuum.description = Some("Upstairs too".to_string());
        vec![trash, vacuum]
    }

    #[test]
    fn search_matches_case_insensitive_substring() {
        let tasks = sample_tasks();
        let spec = FilterSpec {
            search_text: "trash".to_string(),
            ..FilterSpec::default()
        };
        let displayed = derive(&tasks, &spec);
        assert_eq!(displayed.len(), 1);
        assert_eq!(displayed[0].title, "Take out trash");

        let spec = FilterSpec {
            search_text: "UPSTAIRS".to_string(),
            ..FilterSpec::default()
        };
        let displayed = derive(&tasks, &spec);
        assert_eq!(displayed.len(), 1);
        assert_eq!(displayed[0].id, "tsk-2");
    }

    #[test]
    fn category_and_assignee_filters_are_exact_matches() {
        let tasks = sample_tasks();
        let spec = FilterSpec {
            category: CategoryFilter::Only("Other".to_string()),
            ..FilterSpec::default()
        };
        assert_eq!(derive(&tasks, &spec).len(), 1);

        let spec = FilterSpec {
            assignee: AssigneeFilter::Member("mem-1".to_string()),
            ..FilterSpec::default()
        };
        let displayed = derive(&tasks, &spec);
        assert_eq!(displayed.len(), 1);
        assert_eq!(displayed[0].id, "tsk-1");

        let spec = FilterSpec {
            assignee: AssigneeFilter::Member("mem-9".to_string()),
            ..FilterSpec::default()
        };
        assert!(derive(&tasks, &spec).is_empty());
    }

    #[test]
    fn sorts_by_due_date_and_by_title() {
        let tasks = vec![
            task("tsk-b", "B", date(2025, 12, 20)),
            task("tsk-a", "A", date(2025, 12, 10)),
        ];

        let by_due = derive(
            &tasks,
            &FilterSpec {
                sort_by: SortBy::DueDate,
                ..FilterSpec::default()
            },
        );
        assert_eq!(by_due[0].title, "A");
        assert_eq!(by_due[1].title, "B");

        let by_title = derive(
            &tasks,
            &FilterSpec {
                sort_by: SortBy::Title,
                ..FilterSpec::default()
            },
        );
        assert_eq!(by_title[0].title, "A");
        assert_eq!(by_title[1].title, "B");
    }

    #[test]
    fn due_date_sort_is_stable_for_equal_dates() {
        let shared = date(2025, 12, 15);
        let tasks = vec![
            task("tsk-1", "First", shared),
            task("tsk-2", "Second", shared),
            task("tsk-3", "Third", shared),
        ];
        let displayed = derive(&tasks, &FilterSpec::default());
        let ids: Vec<&str> = displayed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tsk-1", "tsk-2", "tsk-3"]);
    }

    #[test]
    fn derive_does_not_mutate_input() {
        let tasks = vec![
            task("tsk-b", "B", date(2025, 12, 20)),
            task("tsk-a", "A", date(2025, 12, 10)),
        ];
        let before = tasks.clone();
        let _ = derive(&tasks, &FilterSpec::default());
        assert_eq!(tasks, before);
    }

    #[test]
    fn is_dirty_ignores_sort_key() {
        let mut spec = FilterSpec::default();
        assert!(!spec.is_dirty());
        spec.sort_by = SortBy::Title;
        assert!(!spec.is_dirty());
        spec.search_text = "milk".to_string();
        assert!(spec.is_dirty());

        let spec = FilterSpec {
            category: CategoryFilter::Only("Chore".to_string()),
            ..FilterSpec::default()
        };
        assert!(spec.is_dirty());
        let spec = FilterSpec {
            assignee: AssigneeFilter::Member("mem-1".to_string()),
            ..FilterSpec::default()
        };
        assert!(spec.is_dirty());
    }

    fn title_pattern() -> impl Strategy<Value = String> {
        "[A-Za-z ]{1,20}"
    }

    fn task_list_pattern() -> impl Strategy<Value = Vec<Task>> {
        prop::collection::vec(
            (title_pattern(), 0u32..3650u32).prop_map(|(title, offset)| {
                let base = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date");
                task(
                    &format!("tsk-{offset}-{title}"),
                    &title,
                    base + chrono::Duration::days(i64::from(offset)),
                )
            }),
            0..20,
        )
    }

    proptest! {
        #[test]
        fn baseline_spec_only_permutes(tasks in task_list_pattern(), sort_title in any::<bool>()) {
            let spec = FilterSpec {
                sort_by: if sort_title { SortBy::Title } else { SortBy::DueDate },
                ..FilterSpec::default()
            };
            let displayed = derive(&tasks, &spec);
            prop_assert_eq!(displayed.len(), tasks.len());
            for original in &tasks {
                prop_assert!(displayed.iter().any(|t| t == original));
            }
        }

        #[test]
        fn derive_is_idempotent(tasks in task_list_pattern(), needle in "[a-z]{0,3}") {
            let spec = FilterSpec {
                search_text: needle,
                ..FilterSpec::default()
            };
            let once = derive(&tasks, &spec);
            let twice = derive(&once, &spec);
            prop_assert_eq!(once, twice);
        }
    }
}
