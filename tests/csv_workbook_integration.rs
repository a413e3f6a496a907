//! CSV Workbook Integration Test
//!
//! Runs the coordinator against a workbook on disk and checks what lands
//! back in the worksheets, then replays the run to confirm it only ever
//! finds fewer free resources.

mod common;

use common::seed_workbook;
use skyroster::pipeline::{DispatchEvent, EventLog, NullSink, Terminal};
use skyroster::storage::StoreError;
use skyroster::{
    AssignmentCoordinator, AssignmentLedger, CsvWorkbook, InMemoryStore, MatchPolicy,
    RecordStore, Status,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn run_writes_assignments_back_to_worksheets() {
    let dir = tempdir().unwrap();
    seed_workbook(dir.path());
    let mut workbook = CsvWorkbook::open(dir.path()).unwrap();

    let mut coordinator =
        AssignmentCoordinator::new(&mut workbook, EventLog::new(), MatchPolicy::default());
    let report = coordinator.run().unwrap();
    let log = coordinator.into_sink();

    assert_eq!(report.backend, "CsvWorkbook");
    assert_eq!(report.outcome("PRJ001").unwrap().pilot.as_deref(), Some("Arjun"));
    assert_eq!(report.outcome("PRJ001").unwrap().drone.as_deref(), Some("D001"));
    assert_eq!(report.outcome("PRJ002").unwrap().pilot.as_deref(), Some("Neha"));
    assert_eq!(report.outcome("PRJ002").unwrap().drone.as_deref(), Some("D002"));

    // PRJ003 is urgent with everyone busy: Arjun is pulled in, but no drone is left
    let prj003 = report.outcome("PRJ003").unwrap();
    assert_eq!(prj003.terminal, Terminal::NoDrone);
    assert!(prj003.reassigned);
    assert!(log.events().iter().any(|e| matches!(
        e,
        DispatchEvent::UrgentReassignment { pilot, previous_assignment: Some(prev), .. }
            if pilot == "Arjun" && prev == "PRJ001"
    )));
    assert_eq!(report.unpersisted(), 0);

    let pilots = workbook.list_pilots().unwrap();
    assert_eq!(pilots[0].status, Status::Assigned);
    assert_eq!(pilots[0].current_assignment.as_deref(), Some("PRJ001"));
    assert_eq!(pilots[1].current_assignment.as_deref(), Some("PRJ002"));
    assert_eq!(pilots[2].current_assignment.as_deref(), Some("PRJ000"));

    let drones = workbook.list_drones().unwrap();
    assert_eq!(drones[1].current_assignment.as_deref(), Some("PRJ002"));
    assert_eq!(drones[2].status, Status::Other("Maintenance".into()));

    // Columns this crate does not use survive the rewrite
    let text = fs::read_to_string(dir.path().join("drone_fleet.csv")).unwrap();
    assert!(text.contains("D002,DJI Mavic 3,Assigned,\"IP43, Rain\",Mumbai,PRJ002"));
}

#[test]
fn replay_finds_no_free_pilots() {
    let dir = tempdir().unwrap();
    seed_workbook(dir.path());
    let mut workbook = CsvWorkbook::open(dir.path()).unwrap();

    let first = AssignmentCoordinator::new(&mut workbook, NullSink, MatchPolicy::default())
        .run()
        .unwrap();
    let second = AssignmentCoordinator::new(&mut workbook, NullSink, MatchPolicy::default())
        .run()
        .unwrap();

    assert_eq!(first.assigned(), 2);
    assert!(second.assigned() <= first.assigned());
    assert_eq!(second.outcome("PRJ001").unwrap().terminal, Terminal::NoPilot);
}

#[test]
fn dry_run_snapshot_leaves_files_untouched() {
    let dir = tempdir().unwrap();
    seed_workbook(dir.path());
    let before = fs::read_to_string(dir.path().join("pilot_roster.csv")).unwrap();

    let workbook = CsvWorkbook::open(dir.path()).unwrap();
    let mut snapshot = InMemoryStore::snapshot(&workbook).unwrap();
    let report = AssignmentCoordinator::new(&mut snapshot, NullSink, MatchPolicy::default())
        .dry_run(true)
        .run()
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.assigned(), 2);
    assert_eq!(snapshot.pilots()[0].status, Status::Assigned);
    let after = fs::read_to_string(dir.path().join("pilot_roster.csv")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn malformed_row_aborts_before_any_mission() {
    let dir = tempdir().unwrap();
    seed_workbook(dir.path());
    fs::write(
        dir.path().join("missions.csv"),
        "project_id,location,required_skills,required_certs,start_date,end_date,\
         priority,mission_budget_inr,weather_forecast\n\
         PRJ001,Bangalore,Mapping,DGCA,2026-02-06,2026-02-08,High,ten thousand,Sunny\n",
    )
    .unwrap();
    let before = fs::read_to_string(dir.path().join("pilot_roster.csv")).unwrap();

    let mut workbook = CsvWorkbook::open(dir.path()).unwrap();
    let mut log = EventLog::new();
    let err = AssignmentCoordinator::new(&mut workbook, &mut log, MatchPolicy::default())
        .run()
        .unwrap_err();

    match err {
        StoreError::MalformedRecord { collection, row, field, .. } => {
            assert_eq!(collection, "mission");
            assert_eq!(row, 2);
            assert_eq!(field, "mission_budget_inr");
        }
        other => panic!("expected MalformedRecord, got {other}"),
    }
    assert!(log.is_empty());
    assert_eq!(before, fs::read_to_string(dir.path().join("pilot_roster.csv")).unwrap());
}

#[test]
fn run_report_lands_in_ledger() {
    let dir = tempdir().unwrap();
    seed_workbook(dir.path());
    let mut workbook = CsvWorkbook::open(dir.path()).unwrap();
    let report = AssignmentCoordinator::new(&mut workbook, NullSink, MatchPolicy::default())
        .run()
        .unwrap();

    let ledger = AssignmentLedger::open(dir.path().join("assignment_ledger")).unwrap();
    ledger.record(&report).unwrap();

    let recent = ledger.recent(5);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0], report);
}
