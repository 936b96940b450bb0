use chrono::NaiveDate;
use std::cell::RefCell;
use std::time::{Duration, Instant};
use teamsync_core::db::{open_db, open_db_in_memory};
use teamsync_core::service::dashboard_service::{MEMBERS_KEY, TASKS_KEY};
use teamsync_core::{
    DashboardConfig, DashboardError, DashboardService, Department, DepartmentFilter, FixedClock,
    KeyValueStorage, LogNotifier, Member, MemberDraft, MemberRepository, MemoryKeyValueStorage,
    MessageRecipient, RepoError, SqliteKeyValueStorage, StatusFilter, StoreError, StoreResult,
    Task, TaskDraft, TaskPatch, TaskStatus,
};

const NOW_MS: i64 = 1_718_000_000_000;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn open<S: KeyValueStorage>(storage: S) -> DashboardService<S> {
    DashboardService::open_with(
        storage,
        &DashboardConfig::default(),
        Box::new(FixedClock::new(NOW_MS, date(2024, 6, 10))),
    )
}

fn stored<T: serde::de::DeserializeOwned>(storage: &MemoryKeyValueStorage, key: &str) -> T {
    let raw = storage
        .get(&format!("teamsync:{key}"))
        .unwrap()
        .expect("entry should be persisted");
    serde_json::from_str(&raw).unwrap()
}

struct BrokenStorage;

impl KeyValueStorage for BrokenStorage {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }

    fn put(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }
}

#[test]
fn first_open_seeds_and_persists_defaults() {
    let storage = MemoryKeyValueStorage::new();
    let dashboard = open(&storage);

    let view = dashboard.view();

    assert_eq!(view.member_count, 4);
    assert_eq!(view.task_stats.total, 4);
    assert_eq!(view.members.len(), 4);
    assert_eq!(stored::<Vec<Member>>(&storage, MEMBERS_KEY).len(), 4);
    assert_eq!(stored::<Vec<Task>>(&storage, TASKS_KEY).len(), 4);
}

#[test]
fn add_then_cascade_delete_scenario() {
    let storage = MemoryKeyValueStorage::new();
    let mut dashboard = open(&storage);

    let view = dashboard
        .add_member(MemberDraft::new("Jun Park", "QA Engineer", "jun@x.com"))
        .unwrap();
    assert_eq!(view.member_count, 5);
    assert_eq!(dashboard.members().last().unwrap().name, "Jun Park");

    // Give Alex a second task so the cascade removes two.
    dashboard
        .add_task(TaskDraft::new("Cache warmup", "Alex Rodriguez", date(2024, 7, 1)))
        .unwrap();
    let tasks_before = dashboard.tasks().len();
    let alex_task_ids: Vec<_> = dashboard
        .tasks()
        .iter()
        .filter(|task| task.assignee == "Alex Rodriguez")
        .map(|task| task.id)
        .collect();
    assert_eq!(alex_task_ids.len(), 2);

    let pending = dashboard.request_delete_member(4).unwrap();
    assert_eq!(pending.member_name, "Alex Rodriguez");
    assert_eq!(pending.affected_task_ids, alex_task_ids);
    let outcome = dashboard.confirm_delete(&pending).unwrap();

    assert_eq!(outcome.member.id, 4);
    assert_eq!(outcome.view.member_count, 4);
    assert_eq!(outcome.view.task_stats.total, tasks_before - 2);
    assert!(dashboard
        .tasks()
        .iter()
        .all(|task| !alex_task_ids.contains(&task.id)));
    assert!(dashboard.members().iter().all(|member| member.id != 4));

    let persisted_tasks: Vec<Task> = stored(&storage, TASKS_KEY);
    let persisted_members: Vec<Member> = stored(&storage, MEMBERS_KEY);
    assert_eq!(persisted_tasks.len(), tasks_before - 2);
    assert_eq!(persisted_members.len(), 4);
    assert_eq!(persisted_members.last().unwrap().name, "Jun Park");
}

#[test]
fn cascade_leaves_other_assignees_untouched() {
    let mut dashboard = open(MemoryKeyValueStorage::new());
    let before: Vec<Task> = dashboard.tasks().as_ref().clone();

    let pending = dashboard.request_delete_member(1).unwrap();
    dashboard.confirm_delete(&pending).unwrap();

    let expected: Vec<Task> = before
        .into_iter()
        .filter(|task| task.assignee != "Sarah Johnson")
        .collect();
    assert_eq!(dashboard.tasks().as_ref(), &expected);
}

#[test]
fn cancelled_deletion_changes_nothing() {
    let storage = MemoryKeyValueStorage::new();
    let mut dashboard = open(&storage);

    let pending = dashboard.request_delete_member(2).unwrap();
    let view = dashboard.cancel_delete(&pending);

    assert_eq!(view.member_count, 4);
    assert_eq!(view.task_stats.total, 4);
    assert!(dashboard.pending_deletion().is_none());
    assert_eq!(
        dashboard.confirm_delete(&pending).unwrap_err(),
        DashboardError::NoPendingDeletion
    );
}

#[test]
fn only_latest_deletion_request_can_be_confirmed() {
    let mut dashboard = open(MemoryKeyValueStorage::new());

    let first = dashboard.request_delete_member(1).unwrap();
    let second = dashboard.request_delete_member(3).unwrap();

    assert_eq!(
        dashboard.confirm_delete(&first).unwrap_err(),
        DashboardError::StaleDeletion { token: first.token }
    );
    let outcome = dashboard.confirm_delete(&second).unwrap();
    assert_eq!(outcome.member.name, "Emily Davis");
    assert_eq!(dashboard.members().len(), 3);
}

#[test]
fn deleting_unknown_member_is_not_found() {
    let mut dashboard = open(MemoryKeyValueStorage::new());

    assert_eq!(
        dashboard.request_delete_member(404).unwrap_err(),
        DashboardError::Repo(RepoError::MemberNotFound(404))
    );
}

#[test]
fn id_linked_task_follows_member_not_name() {
    let mut dashboard = open(MemoryKeyValueStorage::new());
    dashboard
        .add_task(TaskDraft::for_member("Persona interviews", 3, date(2024, 7, 3)))
        .unwrap();
    let linked = dashboard
        .tasks()
        .iter()
        .find(|task| task.title == "Persona interviews")
        .cloned()
        .unwrap();
    assert_eq!(linked.assignee, "Emily Davis");
    assert_eq!(linked.assignee_id, Some(3));

    // Free-text edits cannot detach the name from an id-linked task.
    let patch = TaskPatch {
        assignee: Some("E. Davis".to_string()),
        ..TaskPatch::default()
    };
    dashboard.update_task(linked.id, &patch).unwrap();
    let renamed = dashboard
        .tasks()
        .iter()
        .find(|task| task.id == linked.id)
        .cloned()
        .unwrap();
    assert_eq!(renamed.assignee, "Emily Davis");
    assert_eq!(dashboard.resolve_assignee(&renamed), "Emily Davis");

    let pending = dashboard.request_delete_member(3).unwrap();
    let outcome = dashboard.confirm_delete(&pending).unwrap();

    let removed: Vec<_> = outcome.removed_tasks.iter().map(|task| task.id).collect();
    assert_eq!(removed, vec![2, linked.id]);
}

#[test]
fn linking_task_to_missing_member_is_rejected() {
    let storage = MemoryKeyValueStorage::new();
    let mut dashboard = open(&storage);
    let patch = TaskPatch {
        assignee_id: Some(Some(999)),
        ..TaskPatch::default()
    };

    let err = dashboard.update_task(1, &patch).unwrap_err();

    assert_eq!(err, DashboardError::Repo(RepoError::MemberNotFound(999)));
    assert_eq!(dashboard.tasks()[0].assignee_id, None);
    assert_eq!(stored::<Vec<Task>>(&storage, TASKS_KEY)[0].assignee_id, None);

    let pending = dashboard.request_delete_member(1).unwrap();
    let outcome = dashboard.confirm_delete(&pending).unwrap();
    let removed: Vec<_> = outcome.removed_tasks.iter().map(|task| task.id).collect();
    assert_eq!(removed, vec![1]);
}

#[test]
fn linking_task_by_patch_takes_member_name() {
    let mut dashboard = open(MemoryKeyValueStorage::new());
    let patch = TaskPatch {
        assignee: Some("Whoever".to_string()),
        assignee_id: Some(Some(4)),
        ..TaskPatch::default()
    };

    dashboard.update_task(3, &patch).unwrap();

    let task = dashboard.tasks()[2].clone();
    assert_eq!(task.assignee_id, Some(4));
    assert_eq!(task.assignee, "Alex Rodriguez");
    assert_eq!(
        dashboard.update_task(404, &TaskPatch::default()).unwrap_err(),
        DashboardError::Repo(RepoError::TaskNotFound(404))
    );
}

#[test]
fn search_finds_linked_task_by_displayed_assignee() {
    let mut dashboard = open(MemoryKeyValueStorage::new());
    dashboard
        .add_task(TaskDraft::for_member("Persona interviews", 3, date(2024, 7, 3)))
        .unwrap();
    let linked_id = dashboard.tasks().last().unwrap().id;
    let patch = TaskPatch {
        assignee: Some("E. Davis".to_string()),
        ..TaskPatch::default()
    };
    dashboard.update_task(linked_id, &patch).unwrap();

    let view = dashboard.set_search_query("emily");

    let ids: Vec<_> = view.tasks.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![2, linked_id]);
    for task in &view.tasks {
        assert_eq!(dashboard.resolve_assignee(task), "Emily Davis");
    }
}

#[test]
fn failed_cascade_write_keeps_stored_snapshot_consistent() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKeyValueStorage::new(&conn);
    let mut dashboard = open(&storage);
    conn.execute_batch(
        "CREATE TRIGGER reject_tasks BEFORE UPDATE ON kv_entries
         WHEN NEW.key = 'teamsync:tasks'
         BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
    )
    .unwrap();

    let pending = dashboard.request_delete_member(1).unwrap();
    let outcome = dashboard.confirm_delete(&pending).unwrap();
    assert_eq!(outcome.view.member_count, 3);

    conn.execute_batch("DROP TRIGGER reject_tasks;").unwrap();
    let reopened = open(&storage);
    assert_eq!(reopened.members().len(), 4);
    assert_eq!(reopened.tasks().len(), 4);
    assert!(reopened.members().iter().any(|member| member.id == 1));
}

#[test]
fn free_text_task_is_orphaned_when_name_differs() {
    let mut dashboard = open(MemoryKeyValueStorage::new());
    let patch = TaskPatch {
        assignee: Some("Mike C.".to_string()),
        ..TaskPatch::default()
    };
    dashboard.update_task(3, &patch).unwrap();

    let pending = dashboard.request_delete_member(2).unwrap();
    assert!(pending.affected_task_ids.is_empty());
    dashboard.confirm_delete(&pending).unwrap();

    let orphan = dashboard.tasks().iter().find(|task| task.id == 3).cloned();
    assert_eq!(orphan.unwrap().assignee, "Mike C.");
}

#[test]
fn add_task_for_missing_member_fails() {
    let mut dashboard = open(MemoryKeyValueStorage::new());

    let err = dashboard
        .add_task(TaskDraft::for_member("Orphan", 77, date(2024, 7, 3)))
        .unwrap_err();

    assert_eq!(err, DashboardError::Repo(RepoError::MemberNotFound(77)));
    assert_eq!(dashboard.tasks().len(), 4);
}

#[test]
fn invalid_member_draft_is_rejected_without_persisting() {
    let storage = MemoryKeyValueStorage::new();
    let mut dashboard = open(&storage);

    let err = dashboard
        .add_member(MemberDraft::new("", "QA Engineer", "jun@x.com"))
        .unwrap_err();

    assert!(matches!(err, DashboardError::Repo(RepoError::Validation(_))));
    assert_eq!(stored::<Vec<Member>>(&storage, MEMBERS_KEY).len(), 4);
}

#[test]
fn status_update_is_persisted_and_reflected_in_stats() {
    let storage = MemoryKeyValueStorage::new();
    let mut dashboard = open(&storage);

    let view = dashboard.update_task_status(3, TaskStatus::Completed).unwrap();

    assert_eq!(view.task_stats.completed, 2);
    assert_eq!(view.task_stats.todo, 0);
    let persisted: Vec<Task> = stored(&storage, TASKS_KEY);
    assert_eq!(persisted[2].status, TaskStatus::Completed);
    assert_eq!(persisted[2].title, "Product requirements document");
}

#[test]
fn filters_shape_the_view_but_not_the_stats() {
    let mut dashboard = open(MemoryKeyValueStorage::new());

    dashboard.set_department_filter(DepartmentFilter::Only(Department::Engineering));
    let view = dashboard.set_status_filter(StatusFilter::Only(TaskStatus::Completed));

    assert_eq!(view.members.len(), 2);
    assert_eq!(view.tasks.len(), 1);
    assert_eq!(view.member_count, 4);
    assert_eq!(view.task_stats.total, 4);

    let view = dashboard.set_search_query("react");
    assert_eq!(view.members.len(), 1);
    assert!(view.tasks.is_empty());
}

#[test]
fn typed_search_applies_after_quiet_period() {
    let mut dashboard = open(MemoryKeyValueStorage::new());
    let start = Instant::now();

    dashboard.type_search("fig", start);
    dashboard.type_search("figma", start + Duration::from_millis(120));

    assert_eq!(dashboard.search_draft(), "figma");
    assert_eq!(dashboard.search_query(), "");
    assert!(dashboard.tick(start + Duration::from_millis(300)).is_none());

    let view = dashboard
        .tick(start + Duration::from_millis(420))
        .expect("query should propagate");
    assert_eq!(dashboard.search_query(), "figma");
    assert_eq!(view.members.len(), 2);

    let cleared = dashboard.clear_search();
    assert_eq!(cleared.members.len(), 4);
}

#[test]
fn send_message_hands_recipient_to_notifier() {
    let dashboard = open(MemoryKeyValueStorage::new());
    let sent = RefCell::new(Vec::new());
    let notifier = |recipient: &MessageRecipient| sent.borrow_mut().push(recipient.clone());

    dashboard.send_message(2, &notifier).unwrap();
    assert!(dashboard.send_message(404, &notifier).is_err());
    dashboard.send_message(1, &LogNotifier).unwrap();

    let sent = sent.into_inner();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].name, "Mike Chen");
    assert_eq!(sent[0].mailto_link(), "mailto:mike.chen@company.com");
}

#[test]
fn broken_storage_degrades_to_in_memory_session() {
    let mut dashboard = open(BrokenStorage);

    dashboard
        .add_member(MemberDraft::new("Jun Park", "QA Engineer", "jun@x.com"))
        .unwrap();
    let pending = dashboard.request_delete_member(1).unwrap();
    let outcome = dashboard.confirm_delete(&pending).unwrap();

    assert_eq!(outcome.view.member_count, 4);
    assert_eq!(outcome.view.task_stats.total, 3);
}

#[test]
fn reopening_file_store_restores_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("teamsync.db");
    let added_id;
    {
        let conn = open_db(&path).unwrap();
        let mut dashboard = open(SqliteKeyValueStorage::new(&conn));
        dashboard
            .add_member(
                MemberDraft::new("Jun Park", "QA Engineer", "jun@x.com")
                    .with_department(Department::Sales),
            )
            .unwrap();
        dashboard.update_task_status(1, TaskStatus::Completed).unwrap();
        added_id = dashboard.members().last().unwrap().id;
    }

    let conn = open_db(&path).unwrap();
    let dashboard = open(SqliteKeyValueStorage::new(&conn));

    assert_eq!(dashboard.members().len(), 5);
    let jun = MemberRepository::new(dashboard.members().as_ref().clone())
        .get(added_id)
        .cloned()
        .unwrap();
    assert_eq!(jun.department, Department::Sales);
    assert_eq!(jun.join_date, date(2024, 6, 10));
    assert_eq!(dashboard.task_stats().completed, 2);
}
