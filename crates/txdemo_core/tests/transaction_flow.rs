use std::io;
use txdemo_core::db::open_db;
use txdemo_core::repo::RepoError;
use txdemo_core::{
    run_transaction_flow, run_transaction_flow_with, DataContext, FlowError, FlowOutcome,
    FlowPlan, ReadMode, RecordValidationError, StoreConfig,
};

const EXPECTED_LINES: [&str; 5] = [
    "Database deleted.",
    "Database created with migrations.",
    "Entities have been successfully added to the database.",
    "Entities have been successfully updated in the database.",
    "Entities have been successfully updated in the database.",
];

#[test]
fn flow_prints_five_status_lines_and_persists_update() {
    let mut context = DataContext::open(&StoreConfig::in_memory()).unwrap();
    let mut out = Vec::new();

    let outcome = run_transaction_flow(&mut context, &mut out).unwrap();

    assert_eq!(outcome, FlowOutcome::Updated);
    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed.lines().collect::<Vec<_>>(), EXPECTED_LINES);

    let stored = context
        .first_reversal_by_reference("TRX12345", ReadMode::NoTracking)
        .unwrap();
    assert_eq!(stored.name.as_deref(), Some("Updated Name"));
    assert_eq!(context.payments(ReadMode::NoTracking).unwrap().len(), 1);
}

#[test]
fn flow_resets_existing_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transaction_demo.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO transaction_reversals (reference, name) VALUES ('TRX12345', 'Stale');",
        [],
    )
    .unwrap();
    conn.execute("INSERT INTO payments (batch_id) VALUES ('TRX12345');", [])
        .unwrap();
    drop(conn);

    let mut context = DataContext::open(&StoreConfig::file(&path)).unwrap();
    let outcome = run_transaction_flow(&mut context, &mut io::sink()).unwrap();
    assert_eq!(outcome, FlowOutcome::Updated);

    // Stale rows are gone, so the join still yields exactly one pair.
    let pairs = context
        .reversals_with_payments(ReadMode::NoTracking, ReadMode::NoTracking)
        .unwrap();
    assert_eq!(pairs.len(), 1);
    context.close().unwrap();
}

#[test]
fn flow_runs_twice_on_same_context() {
    let mut context = DataContext::open(&StoreConfig::in_memory()).unwrap();

    run_transaction_flow(&mut context, &mut io::sink()).unwrap();
    let outcome = run_transaction_flow(&mut context, &mut io::sink()).unwrap();

    assert_eq!(outcome, FlowOutcome::Updated);
    assert_eq!(context.reversals(ReadMode::NoTracking).unwrap().len(), 1);
}

#[test]
fn invalid_update_aborts_after_seed() {
    let mut context = DataContext::open(&StoreConfig::in_memory()).unwrap();
    let plan = FlowPlan {
        updated_name: "n".repeat(101),
        ..FlowPlan::default()
    };
    let mut out = Vec::new();

    let err = run_transaction_flow_with(&mut context, &plan, &mut out).unwrap_err();
    assert!(matches!(
        err,
        FlowError::Repo(RepoError::Validation(RecordValidationError::NameTooLong {
            chars: 101
        }))
    ));

    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed.lines().count(), 3);
    let stored = context
        .first_reversal_by_reference("TRX12345", ReadMode::NoTracking)
        .unwrap();
    assert_eq!(stored.name.as_deref(), Some("Old Name"));
}

#[test]
fn invalid_reference_aborts_before_insert() {
    let mut context = DataContext::open(&StoreConfig::in_memory()).unwrap();
    let plan = FlowPlan {
        reference: String::new(),
        ..FlowPlan::default()
    };

    let err = run_transaction_flow_with(&mut context, &plan, &mut io::sink()).unwrap_err();
    assert!(matches!(
        err,
        FlowError::Repo(RepoError::Validation(
            RecordValidationError::EmptyReference
        ))
    ));
    assert!(context.reversals(ReadMode::NoTracking).unwrap().is_empty());
}
