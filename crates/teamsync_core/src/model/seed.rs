//! Default dataset used on first load.

use crate::model::member::{Department, Member};
use crate::model::task::{Task, TaskPriority, TaskStatus};
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn member(
    id: i64,
    name: &str,
    role: &str,
    email: &str,
    avatar: &str,
    department: Department,
    join_date: NaiveDate,
    skills: &[&str],
) -> Member {
    Member {
        id,
        name: name.to_string(),
        role: role.to_string(),
        email: email.to_string(),
        avatar: avatar.to_string(),
        department,
        join_date,
        skills: labels(skills),
    }
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: i64,
    title: &str,
    assignee: &str,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: NaiveDate,
    description: &str,
    tags: &[&str],
) -> Task {
    Task {
        id,
        title: title.to_string(),
        assignee: assignee.to_string(),
        assignee_id: None,
        status,
        priority,
        due_date,
        description: description.to_string(),
        tags: labels(tags),
    }
}

/// Four seed members, in display order.
pub fn seed_members() -> Vec<Member> {
    vec![
        member(
            1,
            "Sarah Johnson",
            "Frontend Developer",
            "sarah.j@company.com",
            "👩‍💻",
            Department::Engineering,
            date(2023, 1, 15),
            &["React", "TypeScript", "CSS"],
        ),
        member(
            2,
            "Mike Chen",
            "Product Manager",
            "mike.chen@company.com",
            "👨‍💼",
            Department::Product,
            date(2022, 8, 20),
            &["Agile", "Figma", "Analytics"],
        ),
        member(
            3,
            "Emily Davis",
            "UX Designer",
            "emily.d@company.com",
            "👩‍🎨",
            Department::Design,
            date(2023, 3, 10),
            &["Figma", "User Research", "Prototyping"],
        ),
        member(
            4,
            "Alex Rodriguez",
            "Backend Developer",
            "alex.r@company.com",
            "👨‍💻",
            Department::Engineering,
            date(2022, 11, 5),
            &["Node.js", "Python", "AWS"],
        ),
    ]
}

/// Four seed tasks assigned by free-text name.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        task(
            1,
            "Implement user authentication system",
            "Sarah Johnson",
            TaskStatus::InProgress,
            TaskPriority::High,
            date(2024, 2, 15),
            "Create secure login and registration flow",
            &["Authentication", "Security"],
        ),
        task(
            2,
            "Design new dashboard layout",
            "Emily Davis",
            TaskStatus::Completed,
            TaskPriority::Medium,
            date(2024, 2, 10),
            "Redesign the main dashboard for better UX",
            &["UI/UX", "Design"],
        ),
        task(
            3,
            "Product requirements document",
            "Mike Chen",
            TaskStatus::Todo,
            TaskPriority::High,
            date(2024, 2, 20),
            "Draft PRD for Q2 features",
            &["Documentation", "Planning"],
        ),
        task(
            4,
            "API optimization",
            "Alex Rodriguez",
            TaskStatus::InProgress,
            TaskPriority::Medium,
            date(2024, 2, 25),
            "Optimize database queries and API responses",
            &["Backend", "Performance"],
        ),
    ]
}
