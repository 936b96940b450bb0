//! Search and category filters.
//!
//! A blank query matches everything; otherwise the query is matched as a
//! case-insensitive substring. The query is used as typed (no trimming).

use crate::model::member::{Department, Member};
use crate::model::task::{Task, TaskStatus};
use std::fmt::{Display, Formatter};

const ALL: &str = "All";

/// Department selector; `All` disables the department predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepartmentFilter {
    #[default]
    All,
    Only(Department),
}

impl DepartmentFilter {
    /// Parses `"All"` or an exact department name.
    pub fn parse(value: &str) -> Option<Self> {
        if value == ALL {
            return Some(Self::All);
        }
        Department::parse(value).map(Self::Only)
    }

    pub fn matches(self, department: Department) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == department,
        }
    }
}

impl Display for DepartmentFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(department) => write!(f, "{department}"),
        }
    }
}

/// Status selector; `All` disables the status predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn parse(value: &str) -> Option<Self> {
        if value == ALL {
            return Some(Self::All);
        }
        TaskStatus::parse(value).map(Self::Only)
    }

    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

/// Lowercased query; `None` means "match everything".
struct Needle(Option<String>);

impl Needle {
    fn new(query: &str) -> Self {
        if query.is_empty() {
            Self(None)
        } else {
            Self(Some(query.to_lowercase()))
        }
    }

    fn found_in<'a>(&self, mut haystacks: impl Iterator<Item = &'a str>) -> bool {
        match &self.0 {
            None => true,
            Some(needle) => {
                haystacks.any(|haystack| haystack.to_lowercase().contains(needle.as_str()))
            }
        }
    }
}

/// Returns whether `member` passes both the query and department predicates.
///
/// The query is checked against name, role and every skill.
pub fn member_matches(member: &Member, query: &str, department: DepartmentFilter) -> bool {
    member_passes(member, &Needle::new(query), department)
}

/// Returns whether `task` passes both the query and status predicates.
///
/// The query is checked against title, assignee, description and every tag.
pub fn task_matches(task: &Task, query: &str, status: StatusFilter) -> bool {
    task_passes(task, &Needle::new(query), status)
}

/// Visible subset of `members`, in input order.
pub fn filter_members(members: &[Member], query: &str, department: DepartmentFilter) -> Vec<Member> {
    let needle = Needle::new(query);
    members
        .iter()
        .filter(|member| member_passes(member, &needle, department))
        .cloned()
        .collect()
}

/// Visible subset of `tasks`, in input order.
pub fn filter_tasks(tasks: &[Task], query: &str, status: StatusFilter) -> Vec<Task> {
    let needle = Needle::new(query);
    tasks
        .iter()
        .filter(|task| task_passes(task, &needle, status))
        .cloned()
        .collect()
}

fn member_passes(member: &Member, needle: &Needle, department: DepartmentFilter) -> bool {
    department.matches(member.department)
        && needle.found_in(
            [member.name.as_str(), member.role.as_str()]
                .into_iter()
                .chain(member.skills.iter().map(String::as_str)),
        )
}

fn task_passes(task: &Task, needle: &Needle, status: StatusFilter) -> bool {
    status.matches(task.status)
        && needle.found_in(
            [
                task.title.as_str(),
                task.assignee.as_str(),
                task.description.as_str(),
            ]
            .into_iter()
            .chain(task.tags.iter().map(String::as_str)),
        )
}
