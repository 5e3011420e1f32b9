use rpomodoro::core::repository::TaskRepository;
use rpomodoro::db::gateway::{DbOptions, StorageGateway};
use rpomodoro::db::log::LOG_RETENTION_ROWS;
use rpomodoro::errors::AppError;
use rpomodoro::models::progress::Progress;
use rpomodoro::models::task::Task;
use rpomodoro::ui::view::TaskView;
use std::cell::RefCell;
use std::rc::Rc;

fn memory_repo() -> TaskRepository {
    let gateway =
        StorageGateway::open_in_memory(&DbOptions::at(":memory:")).expect("open in-memory db");
    TaskRepository::new(gateway).expect("repository")
}

/// View that records every list it is handed.
#[derive(Clone, Default)]
struct RecordingView {
    renders: Rc<RefCell<Vec<Vec<String>>>>,
}

impl TaskView for RecordingView {
    fn render(&self, tasks: &[Task]) {
        self.renders
            .borrow_mut()
            .push(tasks.iter().map(|t| t.name.clone()).collect());
    }
    fn render_detail(&self, _task: &Task) {}
    fn render_progress(&self, _progress: &Progress) {}
}

#[test]
fn test_create_and_list() {
    let repo = memory_repo();

    let first = repo.create_task("Write report").expect("create");
    let second = repo.create_task("  Review PR  ").expect("create");
    assert_ne!(first, second);

    let tasks = repo.list_tasks().expect("list");
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].name, "Write report");
    assert_eq!(tasks[0].pomodoros, 0);
    assert_eq!(tasks[0].interruptions, 0);
    assert_eq!(tasks[1].name, "Review PR");
}

#[test]
fn test_blank_name_writes_nothing() {
    let repo = memory_repo();

    let err = repo.create_task("   ").unwrap_err();
    assert!(matches!(err, AppError::Validation { field: "name" }));
    assert!(repo.list_tasks().expect("list").is_empty());
}

#[test]
fn test_counters_are_independent() {
    let repo = memory_repo();
    let id = repo.create_task("Write report").expect("create");

    assert_eq!(repo.increment_pomodoro(id).expect("pomodoro"), 1);
    assert_eq!(repo.increment_interruption(id).expect("interrupt"), 1);
    assert_eq!(repo.increment_interruption(id).expect("interrupt"), 2);

    let task = repo.get_task(id).expect("get");
    assert_eq!(task.pomodoros, 1);
    assert_eq!(task.interruptions, 2);
}

#[test]
fn test_null_counters_count_from_zero() {
    let repo = memory_repo();
    repo.gateway()
        .with_conn(|conn| {
            conn.execute(
                "INSERT INTO Messages (id, name, pomodoros, interruptions) VALUES (5, 'legacy', NULL, NULL)",
                [],
            )
        })
        .expect("raw insert");

    let task = repo.get_task(5).expect("get");
    assert_eq!(task.pomodoros, 0);
    assert_eq!(repo.increment_pomodoro(5).expect("pomodoro"), 1);
}

#[test]
fn test_delete_then_not_found() {
    let repo = memory_repo();
    let id = repo.create_task("Write report").expect("create");

    repo.delete_task(id).expect("delete");

    assert!(matches!(repo.get_task(id), Err(AppError::NotFound(x)) if x == id));
    assert!(matches!(repo.delete_task(id), Err(AppError::NotFound(_))));
    assert!(matches!(
        repo.increment_interruption(id),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_view_refreshed_after_list_changes() {
    let gateway =
        StorageGateway::open_in_memory(&DbOptions::at(":memory:")).expect("open in-memory db");
    let view = RecordingView::default();
    let renders = Rc::clone(&view.renders);
    let repo = TaskRepository::with_view(gateway, Box::new(view)).expect("repository");

    // fresh schema: one empty render
    assert_eq!(renders.borrow().len(), 1);
    assert!(renders.borrow()[0].is_empty());

    let id = repo.create_task("Write report").expect("create");
    assert_eq!(renders.borrow().last().cloned(), Some(vec!["Write report".to_string()]));

    // counter updates do not refresh the list
    repo.increment_interruption(id).expect("interrupt");
    assert_eq!(renders.borrow().len(), 2);

    repo.delete_task(id).expect("delete");
    assert_eq!(renders.borrow().len(), 3);
    assert!(renders.borrow()[2].is_empty());

    // failed validation: no refresh
    repo.create_task("").unwrap_err();
    assert_eq!(renders.borrow().len(), 3);
}

#[test]
fn test_audit_log_follows_mutations() {
    let repo = memory_repo();
    let id = repo.create_task("Write report").expect("create");
    repo.increment_pomodoro(id).expect("pomodoro");
    repo.delete_task(id).expect("delete");

    let entries = rpomodoro::core::log::LogLogic::entries(repo.gateway()).expect("log");
    let ops: Vec<&str> = entries.iter().map(|e| e.operation.as_str()).collect();
    assert_eq!(ops, ["add", "pomodoro", "del"]);
}

#[test]
fn test_audit_log_is_capped_under_small_quota() {
    let mut opts = DbOptions::at(":memory:");
    opts.size_bytes = 64 * 1024;
    let gateway = StorageGateway::open_in_memory(&opts).expect("open in-memory db");
    let repo = TaskRepository::new(gateway).expect("repository");
    let id = repo.create_task("Write report").expect("create");

    for n in 1..=1000 {
        assert_eq!(repo.increment_interruption(id).expect("interrupt"), n);
    }
    assert_eq!(repo.increment_pomodoro(id).expect("pomodoro"), 1);

    let entries = rpomodoro::core::log::LogLogic::entries(repo.gateway()).expect("log");
    assert_eq!(entries.len() as i64, LOG_RETENTION_ROWS);
    // newest rows are the ones kept
    assert_eq!(entries.last().map(|e| e.operation.as_str()), Some("pomodoro"));
    assert!(entries.iter().all(|e| e.operation != "add"));
}

#[test]
fn test_failed_refresh_keeps_committed_changes() {
    let gateway =
        StorageGateway::open_in_memory(&DbOptions::at(":memory:")).expect("open in-memory db");
    let view = RecordingView::default();
    let renders = Rc::clone(&view.renders);
    let repo = TaskRepository::with_view(gateway, Box::new(view)).expect("repository");
    assert_eq!(renders.borrow().len(), 1);

    // A row whose name is a blob cannot be mapped, so every list read fails
    repo.gateway()
        .with_conn(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER unreadable AFTER INSERT ON Messages WHEN NEW.name = 'Write report'
                 BEGIN INSERT INTO Messages (name, pomodoros, interruptions) VALUES (x'00', 0, 0); END;",
            )
        })
        .expect("trigger");

    let id = repo.create_task("Write report").expect("insert committed");
    assert!(repo.list_tasks().is_err());
    assert_eq!(repo.get_task(id).expect("get").name, "Write report");

    repo.delete_task(id).expect("delete committed");
    assert!(matches!(repo.get_task(id), Err(AppError::NotFound(_))));

    // neither refresh reached the view
    assert_eq!(renders.borrow().len(), 1);
}
