use todo_core::{format_timestamp, parse_timestamp, Priority, Todo, TodoStats, TodoValidationError};

fn at(text: &str) -> chrono::NaiveDateTime {
    parse_timestamp(text).unwrap()
}

#[test]
fn todo_new_trims_and_sets_defaults() {
    let todo = Todo::new(
        7,
        "  title  ",
        "  body ",
        Priority::Low,
        at("2026-02-13 10:00:00"),
    )
    .unwrap();

    assert_eq!(todo.id, 7);
    assert_eq!(todo.title, "title");
    assert_eq!(todo.description, "body");
    assert_eq!(todo.priority, Priority::Low);
    assert!(!todo.completed);
    assert_eq!(todo.completed_at, None);
    assert_eq!(format_timestamp(&todo.created_at), "2026-02-13 10:00:00");
}

#[test]
fn todo_new_rejects_blank_title_and_zero_id() {
    let created_at = at("2026-02-13 10:00:00");

    let err = Todo::new(1, " \n ", "", Priority::Medium, created_at).unwrap_err();
    assert_eq!(err, TodoValidationError::EmptyTitle);

    let err = Todo::new(0, "ok", "", Priority::Medium, created_at).unwrap_err();
    assert_eq!(err, TodoValidationError::ZeroId);
}

#[test]
fn completion_transitions_keep_timestamp_in_sync() {
    let mut todo = Todo::new(1, "task", "", Priority::Medium, at("2026-02-13 10:00:00")).unwrap();

    todo.mark_completed(at("2026-02-13 11:30:00"));
    assert!(todo.completed);
    assert_eq!(todo.completed_at, Some(at("2026-02-13 11:30:00")));
    todo.validate().unwrap();

    todo.mark_pending();
    assert!(!todo.completed);
    assert_eq!(todo.completed_at, None);
    todo.validate().unwrap();

    todo.completed = true;
    assert_eq!(
        todo.validate().unwrap_err(),
        TodoValidationError::CompletionMismatch { id: 1 }
    );
}

#[test]
fn repair_completion_realigns_stamp_with_flag() {
    let mut todo = Todo::new(1, "task", "", Priority::Medium, at("2026-02-13 10:00:00")).unwrap();
    assert!(!todo.repair_completion());

    todo.completed = true;
    assert!(todo.repair_completion());
    assert_eq!(todo.completed_at, Some(at("2026-02-13 10:00:00")));
    assert!(!todo.repair_completion());

    todo.completed = false;
    assert!(todo.repair_completion());
    assert_eq!(todo.completed_at, None);
    todo.validate().unwrap();
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let mut todo = Todo::new(3, "Pay rent", "", Priority::High, at("2026-02-01 08:15:00")).unwrap();
    todo.mark_completed(at("2026-02-01 09:00:05"));

    let json = serde_json::to_value(&todo).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": 3,
            "title": "Pay rent",
            "description": "",
            "priority": "high",
            "completed": true,
            "created_at": "2026-02-01 08:15:00",
            "completed_at": "2026-02-01 09:00:05"
        })
    );

    let decoded: Todo = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, todo);
}

#[test]
fn deserialize_rejects_malformed_timestamp() {
    let value = serde_json::json!({
        "id": 1,
        "title": "bad stamp",
        "description": "",
        "priority": "medium",
        "completed": false,
        "created_at": "2026-02-01T08:15:00Z",
        "completed_at": null
    });

    let err = serde_json::from_value::<Todo>(value).unwrap_err();
    assert!(
        err.to_string().contains("invalid timestamp `2026-02-01T08:15:00Z`"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_unknown_priority() {
    let value = serde_json::json!({
        "id": 1,
        "title": "x",
        "description": "",
        "priority": "urgent",
        "completed": false,
        "created_at": "2026-02-01 08:15:00",
        "completed_at": null
    });

    assert!(serde_json::from_value::<Todo>(value).is_err());
}

#[test]
fn stats_serialize_with_snake_case_keys() {
    let created_at = at("2026-02-01 08:15:00");
    let mut done = Todo::new(1, "a", "", Priority::Medium, created_at).unwrap();
    done.mark_completed(created_at);
    let pending = Todo::new(2, "b", "", Priority::Medium, created_at).unwrap();

    let stats = TodoStats::from_todos(&[done, pending]);
    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "total": 2,
            "completed": 1,
            "pending": 1,
            "completion_rate": 50.0
        })
    );
}
