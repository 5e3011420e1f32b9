use rpomodoro::db::gateway::{DbOptions, Recovery, StorageGateway};
use rpomodoro::errors::{AppError, ErrorCode};
use rusqlite::params;
use std::cell::Cell;

mod common;
use common::setup_test_db;

fn memory_gateway() -> StorageGateway {
    let gw = StorageGateway::open_in_memory(&DbOptions::at(":memory:")).expect("open");
    gw.ensure_schema().expect("schema");
    gw
}

fn count(gw: &StorageGateway) -> i64 {
    gw.with_conn(|c| c.query_row("SELECT COUNT(*) FROM Messages", [], |r| r.get(0)))
        .expect("count")
}

const INSERT: &str = "INSERT INTO Messages (name, pomodoros, interruptions) VALUES (?, 0, 0)";

#[test]
fn test_insert_reports_id_and_rows() {
    let gw = memory_gateway();
    let rs = gw
        .transaction(|tx| Ok(tx.execute(INSERT, params!["a"])?))
        .expect("insert");
    assert_eq!(rs.rows_affected, 1);
    assert_eq!(rs.insert_id, Some(1));

    let rs = gw
        .transaction(|tx| Ok(tx.execute("SELECT id, name FROM Messages", &[])?))
        .expect("select");
    assert_eq!(rs.rows.len(), 1);
    assert_eq!(rs.rows[0].get_text("name").expect("name"), "a");
    assert_eq!(rs.insert_id, None);
}

#[test]
fn test_error_rolls_back_whole_transaction() {
    let gw = memory_gateway();

    let err = gw
        .transaction(|tx| {
            tx.execute(INSERT, params!["a"])?;
            tx.execute("INSERT INTO Nope VALUES (1)", &[])?;
            Ok(())
        })
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::Database));
    assert_eq!(count(&gw), 0);
}

#[test]
fn test_continue_keeps_earlier_statements() {
    let gw = memory_gateway();
    let seen = Cell::new(None);

    gw.transaction(|tx| {
        tx.execute(INSERT, params!["a"])?;
        let skipped = tx.execute_with(
            "INSERT INTO Nope VALUES (1)",
            &[],
            |_| (),
            |e| {
                seen.set(Some(e.code));
                Recovery::Continue
            },
        )?;
        assert!(skipped.is_none());
        tx.execute(INSERT, params!["b"])?;
        Ok(())
    })
    .expect("transaction");

    assert_eq!(seen.get(), Some(ErrorCode::Database));
    assert_eq!(count(&gw), 2);
}

#[test]
fn test_abort_from_handler_rolls_back() {
    let gw = memory_gateway();

    let res = gw.transaction(|tx| {
        tx.execute(INSERT, params!["a"])?;
        tx.execute_with("INSERT INTO Nope VALUES (1)", &[], |_| (), |_| Recovery::Abort)?;
        Ok(())
    });

    assert!(matches!(res, Err(AppError::Storage(_))));
    assert_eq!(count(&gw), 0);
}

#[test]
fn test_success_callback_sees_result() {
    let gw = memory_gateway();
    let id = gw
        .transaction(|tx| {
            Ok(tx.execute_with(INSERT, params!["a"], |rs| rs.insert_id, |_| Recovery::Abort)?)
        })
        .expect("insert");
    assert_eq!(id, Some(Some(1)));
}

#[test]
fn test_syntax_errors_are_classified() {
    let gw = memory_gateway();

    let err = gw
        .transaction(|tx| Ok(tx.execute("SELEC 1", &[])?))
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Syntax));

    let err = gw
        .transaction(|tx| Ok(tx.execute(INSERT, params!["a", "b"])?))
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Syntax));
}

#[test]
fn test_constraint_violation() {
    let gw = memory_gateway();
    let err = gw
        .transaction(|tx| {
            tx.execute("INSERT INTO Messages (id, name) VALUES (1, 'a')", &[])?;
            tx.execute("INSERT INTO Messages (id, name) VALUES (1, 'b')", &[])?;
            Ok(())
        })
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Constraint));
}

#[test]
fn test_quota_exceeded() {
    let mut opts = DbOptions::at(":memory:");
    opts.size_bytes = 32 * 1024;
    let gw = StorageGateway::open_in_memory(&opts).expect("open");
    gw.ensure_schema().expect("schema");

    let big = "x".repeat(256 * 1024);
    let err = gw
        .transaction(|tx| Ok(tx.execute(INSERT, params![big])?))
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Quota));
}

#[test]
fn test_run_transaction_reports_errors() {
    let gw = memory_gateway();
    let failed = Cell::new(false);

    let out: Option<()> = gw.run_transaction(
        |tx| {
            tx.execute("DROP TABLE Nope", &[])?;
            Ok(())
        },
        |_| failed.set(true),
    );
    assert!(out.is_none());
    assert!(failed.get());

    let out = gw.run_transaction(|_| Ok(7), |_| panic!("no error expected"));
    assert_eq!(out, Some(7));
}

#[test]
fn test_reopen_keeps_data_and_checks_version() {
    let db_path = setup_test_db("gateway_reopen");
    let opts = DbOptions::at(&db_path);

    let gw = StorageGateway::open(&opts).expect("open");
    gw.ensure_schema().expect("schema");
    gw.transaction(|tx| Ok(tx.execute(INSERT, params!["kept"])?))
        .expect("insert");
    gw.shutdown().expect("shutdown");

    let gw = StorageGateway::open(&opts).expect("reopen");
    assert_eq!(
        gw.ensure_schema().expect("schema"),
        rpomodoro::db::gateway::SchemaStatus::Existing
    );
    assert_eq!(count(&gw), 1);
    gw.shutdown().expect("shutdown");

    // any version accepted when none is requested
    let mut any = opts.clone();
    any.version = String::new();
    StorageGateway::open(&any).expect("open any version");

    let mut newer = opts.clone();
    newer.version = "2.0".into();
    let err = StorageGateway::open(&newer).err().expect("version mismatch");
    assert_eq!(err.code(), Some(ErrorCode::Version));
}
