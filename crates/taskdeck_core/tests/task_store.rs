use chrono::{Duration, TimeZone, Utc};
use std::collections::HashSet;
use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    ManualClock, MemorySlotStorage, MutationOutcome, NewTask, SlotStorage, SqliteSlotStorage,
    StorageResult, StoreConfig, SystemClock, Task, TaskFilter, TaskPatch, TaskPriority,
    TaskStatus, TaskStore, UnavailableSlotStorage, User,
};

fn ada() -> User {
    User::new("u-ada", "Ada")
}

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap()
}

fn payload(title: &str, status: TaskStatus, priority: TaskPriority) -> NewTask {
    let mut data = NewTask::new(title, ada());
    data.description = Some(String::new());
    data.status = status;
    data.priority = priority;
    data
}

fn persisted(storage: &MemorySlotStorage) -> Vec<Task> {
    let raw = storage.read_slot("tasks").unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn create_assigns_unique_ids_and_equal_timestamps() {
    let clock = ManualClock::new(start());
    let mut store = TaskStore::open(MemorySlotStorage::new(), &clock, StoreConfig::default());

    let mut ids = HashSet::new();
    for index in 0..20 {
        clock.advance(Duration::milliseconds(1));
        let task = store.create_task(payload(
            &format!("task {index}"),
            TaskStatus::Todo,
            TaskPriority::Low,
        ));
        assert!(!task.id.is_empty());
        assert_eq!(task.created_at, task.updated_at);
        assert!(ids.insert(task.id));
    }
    assert_eq!(store.len(), 20);
}

#[test]
fn create_then_move_scenario() {
    let clock = ManualClock::new(start());
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::open(&storage, &clock, StoreConfig::default());

    let created = store.create_task(payload("A", TaskStatus::Todo, TaskPriority::Low));
    assert_eq!(store.len(), 1);

    clock.advance(Duration::seconds(1));
    assert_eq!(
        store.move_task(&created.id, TaskStatus::Done),
        MutationOutcome::Applied
    );

    let moved = store.get_task_by_id(&created.id).unwrap();
    assert_eq!(moved.status, TaskStatus::Done);
    assert_ne!(moved.updated_at, created.updated_at);
    assert_eq!(moved.created_at, created.created_at);
    assert_eq!(persisted(&storage)[0].status, TaskStatus::Done);
}

#[test]
fn update_merges_one_field_and_refreshes_updated_at() {
    let clock = ManualClock::new(start());
    let mut store = TaskStore::open(MemorySlotStorage::new(), &clock, StoreConfig::default());
    let created = store.create_task(payload("draft", TaskStatus::Todo, TaskPriority::Low));

    clock.advance(Duration::minutes(1));
    let outcome = store.update_task(
        &created.id,
        TaskPatch {
            priority: Some(TaskPriority::High),
            ..TaskPatch::default()
        },
    );
    assert!(outcome.is_applied());

    let updated = store.get_task_by_id(&created.id).unwrap().clone();
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.priority, TaskPriority::High);

    let mut expected = created.clone();
    expected.priority = TaskPriority::High;
    expected.updated_at = updated.updated_at;
    assert_eq!(updated, expected);
}

#[test]
fn update_with_stalled_clock_still_advances_updated_at() {
    let clock = ManualClock::new(start());
    let mut store = TaskStore::open(MemorySlotStorage::new(), &clock, StoreConfig::default());
    let created = store.create_task(payload("draft", TaskStatus::Todo, TaskPriority::Low));

    store.update_task(
        &created.id,
        TaskPatch {
            title: Some("renamed".to_string()),
            ..TaskPatch::default()
        },
    );
    let updated = store.get_task_by_id(&created.id).unwrap();
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.title, "renamed");
}

#[test]
fn lookup_misses_are_reported_without_touching_tasks() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::open(&storage, SystemClock, StoreConfig::default());
    let created = store.create_task(payload("keep", TaskStatus::Todo, TaskPriority::Low));
    let before = store.tasks().to_vec();

    assert_eq!(
        store.update_task("missing", TaskPatch::default()),
        MutationOutcome::NotFound
    );
    assert_eq!(
        store.move_task("missing", TaskStatus::Done),
        MutationOutcome::NotFound
    );
    assert_eq!(store.delete_task("missing"), MutationOutcome::NotFound);

    assert_eq!(store.tasks(), before.as_slice());
    assert_eq!(persisted(&storage), before);
    assert!(store.get_task_by_id(&created.id).is_some());
}

#[test]
fn delete_removes_task_and_persists() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::open(&storage, SystemClock, StoreConfig::default());
    let first = store.create_task(payload("first", TaskStatus::Todo, TaskPriority::Low));
    let second = store.create_task(payload("second", TaskStatus::Todo, TaskPriority::Low));

    assert!(store.delete_task(&first.id).is_applied());
    assert!(store.get_task_by_id(&first.id).is_none());
    assert_eq!(persisted(&storage), vec![second]);
}

#[test]
fn empty_filter_returns_everything_in_order() {
    let mut store = TaskStore::open(MemorySlotStorage::new(), SystemClock, StoreConfig::default());
    store.create_task(payload("one", TaskStatus::Done, TaskPriority::Low));
    store.create_task(payload("two", TaskStatus::Todo, TaskPriority::High));
    store.create_task(payload("three", TaskStatus::Review, TaskPriority::Medium));

    let titles: Vec<&str> = store
        .filtered_tasks()
        .into_iter()
        .map(|task| task.title.as_str())
        .collect();
    assert_eq!(titles, vec!["one", "two", "three"]);
}

#[test]
fn status_filter_returns_exact_subset() {
    let mut store = TaskStore::open(MemorySlotStorage::new(), SystemClock, StoreConfig::default());
    store.create_task(payload("one", TaskStatus::Done, TaskPriority::Low));
    store.create_task(payload("two", TaskStatus::Todo, TaskPriority::High));
    store.create_task(payload("three", TaskStatus::Done, TaskPriority::Medium));

    store.set_filter(TaskFilter::by_status(TaskStatus::Done));
    let done: Vec<&str> = store
        .filtered_tasks()
        .into_iter()
        .map(|task| task.title.as_str())
        .collect();
    assert_eq!(done, vec!["one", "three"]);

    store.clear_filter();
    assert_eq!(store.filtered_tasks().len(), 3);
}

#[test]
fn filter_predicates_combine_conjunctively() {
    let mut store = TaskStore::open(MemorySlotStorage::new(), SystemClock, StoreConfig::default());

    let mut matching = payload("match", TaskStatus::InProgress, TaskPriority::High);
    matching.assignee = Some(User::new("u-grace", "Grace"));
    matching.tags = Some(vec!["backend".to_string()]);
    let matching = store.create_task(matching);

    let mut wrong_priority = payload("low", TaskStatus::InProgress, TaskPriority::Low);
    wrong_priority.assignee = Some(User::new("u-grace", "Grace"));
    wrong_priority.tags = Some(vec!["backend".to_string()]);
    store.create_task(wrong_priority);

    let mut untagged = payload("untagged", TaskStatus::InProgress, TaskPriority::High);
    untagged.assignee = Some(User::new("u-grace", "Grace"));
    store.create_task(untagged);

    store.set_filter(TaskFilter {
        status: Some(TaskStatus::InProgress),
        priority: Some(TaskPriority::High),
        assignee_id: Some("u-grace".to_string()),
        tags: Some(vec!["frontend".to_string(), "backend".to_string()]),
    });

    let visible = store.filtered_tasks();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, matching.id);
}

#[test]
fn tasks_by_status_narrows_the_filtered_view() {
    let mut store = TaskStore::open(MemorySlotStorage::new(), SystemClock, StoreConfig::default());
    store.create_task(payload("a", TaskStatus::Todo, TaskPriority::High));
    store.create_task(payload("b", TaskStatus::Todo, TaskPriority::Low));
    store.create_task(payload("c", TaskStatus::Done, TaskPriority::High));

    assert_eq!(store.tasks_by_status(TaskStatus::Todo).len(), 2);

    store.set_filter(TaskFilter {
        priority: Some(TaskPriority::High),
        ..TaskFilter::default()
    });
    let todo = store.tasks_by_status(TaskStatus::Todo);
    assert_eq!(todo.len(), 1);
    assert_eq!(todo[0].title, "a");
    assert!(store.tasks_by_status(TaskStatus::Review).is_empty());
}

#[test]
fn get_task_by_id_ignores_the_filter() {
    let mut store = TaskStore::open(MemorySlotStorage::new(), SystemClock, StoreConfig::default());
    let task = store.create_task(payload("hidden", TaskStatus::Todo, TaskPriority::Low));
    store.set_filter(TaskFilter::by_status(TaskStatus::Done));

    assert!(store.filtered_tasks().is_empty());
    assert_eq!(store.get_task_by_id(&task.id), Some(&task));
}

#[test]
fn modal_toggles_track_state() {
    let mut store = TaskStore::open(MemorySlotStorage::new(), SystemClock, StoreConfig::default());
    let task = store.create_task(payload("edit me", TaskStatus::Todo, TaskPriority::Low));

    store.open_create_task_modal();
    assert!(store.modal_state().is_create_modal_open);
    store.close_create_task_modal();
    assert!(!store.modal_state().is_create_modal_open);

    store.open_edit_task_modal(&task);
    assert!(store.modal_state().is_edit_modal_visible);
    assert_eq!(store.modal_state().task_to_edit.as_ref(), Some(&task));
}

#[test]
fn reopened_store_sees_persisted_tasks() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteSlotStorage::try_new(&conn).unwrap();

    let created = {
        let mut store = TaskStore::open(&storage, SystemClock, StoreConfig::default());
        let mut data = payload("durable", TaskStatus::Review, TaskPriority::High);
        data.due_date = Some(start() + Duration::days(3));
        data.tags = Some(vec!["ops".to_string()]);
        store.create_task(data)
    };

    let reopened = TaskStore::open(&storage, SystemClock, StoreConfig::default());
    assert_eq!(reopened.tasks(), &[created]);
}

#[test]
fn custom_slot_key_is_honored() {
    let storage = MemorySlotStorage::new();
    let config = StoreConfig {
        slot_key: "board-2".to_string(),
        ..StoreConfig::default()
    };
    let mut store = TaskStore::open(&storage, SystemClock, config);
    store.create_task(payload("x", TaskStatus::Todo, TaskPriority::Low));

    assert!(storage.read_slot("tasks").unwrap().is_none());
    assert!(storage.read_slot("board-2").unwrap().is_some());
}

#[test]
fn malformed_slot_starts_empty_and_is_overwritten_on_next_write() {
    let storage = MemorySlotStorage::with_slot("tasks", "[{\"id\": 42}]");
    let mut store = TaskStore::open(&storage, SystemClock, StoreConfig::default());
    assert!(store.is_empty());

    let task = store.create_task(payload("fresh", TaskStatus::Todo, TaskPriority::Low));
    assert_eq!(persisted(&storage), vec![task]);
}

fn slot_record(id: &str, due_date: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": id,
        "status": "TODO",
        "priority": "LOW",
        "creator": { "id": "u-ada", "name": "Ada" },
        "performers": [],
        "dueDate": due_date,
        "createdAt": "2024-04-01T08:00:00.000Z",
        "updatedAt": "2024-04-01T08:00:00.000Z"
    })
}

#[test]
fn loose_due_dates_in_the_slot_do_not_drop_other_tasks() {
    let records = serde_json::json!([
        slot_record("keep-1", serde_json::json!("2024-06-01T12:00:00.000Z")),
        slot_record("date-only", serde_json::json!("2024-05-01")),
        slot_record("blank", serde_json::json!("")),
    ]);
    let storage = MemorySlotStorage::with_slot("tasks", &records.to_string());
    let mut store = TaskStore::open(&storage, SystemClock, StoreConfig::default());

    assert_eq!(store.len(), 3);
    assert_eq!(
        store.get_task_by_id("date-only").unwrap().due_date,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(store.get_task_by_id("blank").unwrap().due_date, None);

    store.create_task(payload("fresh", TaskStatus::Todo, TaskPriority::Low));
    let ids: HashSet<String> = persisted(&storage).into_iter().map(|task| task.id).collect();
    assert_eq!(ids.len(), 4);
    for id in ["keep-1", "date-only", "blank"] {
        assert!(ids.contains(id), "{id} missing from the slot");
    }
}

#[test]
fn unavailable_storage_never_blocks_mutations() {
    let mut store = TaskStore::open(UnavailableSlotStorage, SystemClock, StoreConfig::default());
    let task = store.create_task(payload("memory only", TaskStatus::Todo, TaskPriority::Low));

    assert!(store.move_task(&task.id, TaskStatus::Done).is_applied());
    assert_eq!(
        store.get_task_by_id(&task.id).unwrap().status,
        TaskStatus::Done
    );
    assert!(store.delete_task(&task.id).is_applied());
    assert!(store.is_empty());
}

struct FailingWrites;

impl SlotStorage for FailingWrites {
    fn read_slot(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn write_slot(&self, key: &str, _value: &str) -> StorageResult<()> {
        Err(taskdeck_core::StorageError::InvalidKey(key.to_string()))
    }

    fn remove_slot(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }
}

#[test]
fn write_failures_keep_the_in_memory_mutation() {
    let mut store = TaskStore::open(FailingWrites, SystemClock, StoreConfig::default());
    let task = store.create_task(payload("kept", TaskStatus::Todo, TaskPriority::Low));

    assert_eq!(store.len(), 1);
    assert_eq!(store.get_task_by_id(&task.id), Some(&task));
}
