//! Terminal presentation layer over `teamsync_core`.
//!
//! # Responsibility
//! - Open the configured store and render the dashboard view as text.
//! - Apply search/filter flags the same way the UI controls do.
//!
//! Usage: `teamsync_cli [--config PATH] [--search TEXT] [--department NAME]
//! [--status NAME] [--message MEMBER_ID]
//! [--add-member NAME:ROLE:EMAIL[:DEPARTMENT]] [--avatar INDEX]
//! [--delete-member MEMBER_ID [--yes]]`
//!
//! `--delete-member` without `--yes` only reports what would be removed.

use log::info;
use std::process::ExitCode;
use teamsync_core::db::{open_db, open_db_in_memory};
use teamsync_core::model::member::AVATAR_OPTIONS;
use teamsync_core::{
    core_version, init_logging, DashboardConfig, DashboardService, DashboardView, Department,
    DepartmentFilter, KeyValueStorage, MemberDraft, MessageRecipient, SqliteKeyValueStorage,
    StatusFilter, SystemClock,
};

#[derive(Debug, Default)]
struct CliArgs {
    config: Option<String>,
    search: Option<String>,
    department: Option<DepartmentFilter>,
    status: Option<StatusFilter>,
    message: Option<i64>,
    add_member: Option<MemberDraft>,
    avatar: Option<&'static str>,
    delete_member: Option<i64>,
    confirm: bool,
}

fn parse_member_id(raw: &str) -> Result<i64, String> {
    raw.parse()
        .map_err(|_| format!("invalid member id `{raw}`"))
}

/// Parses `NAME:ROLE:EMAIL[:DEPARTMENT]`.
fn parse_member_draft(raw: &str) -> Result<MemberDraft, String> {
    let parts: Vec<&str> = raw.split(':').collect();
    let draft = match parts.as_slice() {
        [name, role, email] => MemberDraft::new(*name, *role, *email),
        [name, role, email, department] => MemberDraft::new(*name, *role, *email)
            .with_department(
                Department::parse(department)
                    .ok_or_else(|| format!("unknown department `{department}`"))?,
            ),
        _ => return Err(format!("expected NAME:ROLE:EMAIL[:DEPARTMENT], got `{raw}`")),
    };
    Ok(draft)
}

fn parse_avatar(raw: &str) -> Result<&'static str, String> {
    raw.parse::<usize>()
        .ok()
        .and_then(|index| AVATAR_OPTIONS.get(index).copied())
        .ok_or_else(|| {
            format!(
                "avatar must be an index below {}, got `{raw}`",
                AVATAR_OPTIONS.len()
            )
        })
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .ok_or_else(|| format!("missing value for `{flag}`"))
        };
        match flag.as_str() {
            "--config" => parsed.config = Some(value()?),
            "--search" => parsed.search = Some(value()?),
            "--department" => {
                let raw = value()?;
                parsed.department = Some(
                    DepartmentFilter::parse(&raw)
                        .ok_or_else(|| format!("unknown department `{raw}`"))?,
                );
            }
            "--status" => {
                let raw = value()?;
                parsed.status = Some(
                    StatusFilter::parse(&raw).ok_or_else(|| format!("unknown status `{raw}`"))?,
                );
            }
            "--message" => parsed.message = Some(parse_member_id(&value()?)?),
            "--add-member" => parsed.add_member = Some(parse_member_draft(&value()?)?),
            "--avatar" => parsed.avatar = Some(parse_avatar(&value()?)?),
            "--delete-member" => parsed.delete_member = Some(parse_member_id(&value()?)?),
            "--yes" => parsed.confirm = true,
            other => return Err(format!("unknown argument `{other}`")),
        }
    }
    parsed.add_member = match (parsed.avatar, parsed.add_member.take()) {
        (Some(avatar), Some(draft)) => Some(draft.with_avatar(avatar)),
        (Some(_), None) => return Err("`--avatar` requires `--add-member`".to_string()),
        (None, draft) => draft,
    };
    Ok(parsed)
}

fn render(view: &DashboardView) {
    let stats = view.task_stats;
    println!(
        "members={} tasks={} done={} in_progress={} todo={}",
        view.member_count, stats.total, stats.completed, stats.in_progress, stats.todo
    );
    println!("-- team members ({})", view.members.len());
    for member in &view.members {
        println!(
            "{} {} [{}] {} <{}> skills={}",
            member.avatar,
            member.name,
            member.department,
            member.role,
            member.email,
            member.skills.join(",")
        );
    }
    println!("-- tasks ({})", view.tasks.len());
    for task in &view.tasks {
        println!(
            "#{} [{}] {} ({}, due {}) -> {}",
            task.id, task.status, task.title, task.priority, task.due_date, task.assignee
        );
    }
}

fn delete_member<S: KeyValueStorage>(
    dashboard: &mut DashboardService<S>,
    member_id: i64,
    confirm: bool,
) -> Result<(), String> {
    let pending = dashboard
        .request_delete_member(member_id)
        .map_err(|err| err.to_string())?;
    if !confirm {
        dashboard.cancel_delete(&pending);
        println!(
            "would delete {} and {} task(s); pass --yes to confirm",
            pending.member_name,
            pending.affected_task_ids.len()
        );
        return Ok(());
    }
    let outcome = dashboard
        .confirm_delete(&pending)
        .map_err(|err| err.to_string())?;
    println!(
        "deleted {} and {} task(s)",
        outcome.member.name,
        outcome.removed_tasks.len()
    );
    Ok(())
}

fn run() -> Result<(), String> {
    let args = parse_args(std::env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => DashboardConfig::load(path).map_err(|err| err.to_string())?,
        None => DashboardConfig::default(),
    };
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = match &config.db_path {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    }
    .map_err(|err| err.to_string())?;

    let mut dashboard = DashboardService::open_with(
        SqliteKeyValueStorage::new(&conn),
        &config,
        Box::new(SystemClock),
    );
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    if let Some(draft) = args.add_member {
        dashboard
            .add_member(draft)
            .map_err(|err| err.to_string())?;
    }
    if let Some(member_id) = args.delete_member {
        delete_member(&mut dashboard, member_id, args.confirm)?;
    }
    if let Some(query) = args.search {
        dashboard.set_search_query(query);
    }
    if let Some(filter) = args.department {
        dashboard.set_department_filter(filter);
    }
    if let Some(filter) = args.status {
        dashboard.set_status_filter(filter);
    }
    if let Some(member_id) = args.message {
        let open_mail_client =
            |recipient: &MessageRecipient| println!("open {}", recipient.mailto_link());
        dashboard
            .send_message(member_id, &open_mail_client)
            .map_err(|err| err.to_string())?;
    }

    render(&dashboard.view());
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("teamsync: {err}");
            ExitCode::from(2)
        }
    }
}
