//! End-to-end planner scenarios running against the real store stack:
//! create a trip, pool and schedule activities, lay out the day grid,
//! aggregate costs, and round-trip the whole trip through the export
//! format.

use std::sync::Arc;

use travelmate_schedule::{layout, GridCell};
use travelmate_store::{FileStore, MemoryStore, TripSnapshot, TripStore};
use travelmate_trip::{Expense, Flight, FlightKind, Stay};

fn memory_repo() -> TripStore {
    TripStore::new(Arc::new(MemoryStore::new()))
}

#[test]
fn paris_trip_costs_flow_into_the_overall_total() {
    let repo = memory_repo();
    repo.create_trip("Paris", 3, 2).unwrap();

    let cruise = repo.add_activity("Seine cruise", None, 50.0).unwrap();
    repo.select_day(1).unwrap();
    repo.schedule_activity(
        1,
        cruise.id,
        "10:00".parse().unwrap(),
        "12:00".parse().unwrap(),
        "#007bff",
    )
    .unwrap();

    let summary = repo.recalculate_costs().unwrap();
    assert_eq!(summary.activities_total, 100.0);

    let trip = repo.trip().unwrap();
    assert_eq!(trip.day_plans[&1].total_cost, 100.0);
    assert_eq!(trip.total_cost_all_travelers, 100.0);
    assert_eq!(trip.total_cost_per_person, 50.0);
}

#[test]
fn scheduled_day_renders_on_the_grid() {
    let repo = memory_repo();
    repo.create_trip("Paris", 3, 2).unwrap();
    let cruise = repo.add_activity("Seine cruise", None, 50.0).unwrap();
    repo.schedule_activity(
        1,
        cruise.id,
        "10:00".parse().unwrap(),
        "12:00".parse().unwrap(),
        "#007bff",
    )
    .unwrap();

    let plan = repo.day_plan(1).unwrap();
    let grid = layout(&plan.bookings).unwrap();

    match grid.cell(10, 0) {
        Some(GridCell::Start { booking, row_span }) => {
            assert_eq!(booking.title, "Seine cruise");
            assert_eq!(*row_span, 2);
        }
        other => panic!("expected the cruise to start at slot 10, got {other:?}"),
    }
    assert_eq!(grid.cell(11, 0), Some(&GridCell::Covered));
}

#[test]
fn export_then_import_reproduces_the_trip() {
    let repo = memory_repo();
    repo.create_trip("Paris", 3, 2).unwrap();
    repo.set_budget(500.0).unwrap();
    repo.select_day(2).unwrap();

    let louvre = repo.add_activity("Louvre", Some("Skip the line"), 25.0).unwrap();
    repo.schedule_activity(
        2,
        louvre.id,
        "09:30".parse().unwrap(),
        "11:00".parse().unwrap(),
        "#663399",
    )
    .unwrap();
    repo.add_flight(Flight::new("BOS", "CDG", 400.0, FlightKind::RoundTrip).unwrap())
        .unwrap();
    repo.add_stay(Stay::new("Hotel du Nord", "Paris", 2, 300.0).unwrap())
        .unwrap();
    repo.add_expense(Expense::new("Metro passes", 40.0).unwrap())
        .unwrap();
    repo.add_todo("Renew passports").unwrap();
    repo.recalculate_costs().unwrap();

    let exported = repo.export_snapshot().unwrap();
    let json = exported.to_json().unwrap();

    // A fresh installation imports the file wholesale.
    let other = memory_repo();
    other
        .import_snapshot(TripSnapshot::from_json(&json).unwrap())
        .unwrap();

    let trip = other.trip().unwrap();
    assert_eq!(trip.destination, "Paris");
    assert_eq!(trip.days, 3);
    assert_eq!(trip.people, 2);
    assert_eq!(other.selected_day().unwrap(), Some(2));
    assert_eq!(other.activities().unwrap(), repo.activities().unwrap());
    assert_eq!(other.flights().unwrap(), repo.flights().unwrap());
    assert_eq!(other.stays().unwrap(), repo.stays().unwrap());
    assert_eq!(other.expenses().unwrap(), repo.expenses().unwrap());
    assert_eq!(other.todos().unwrap(), repo.todos().unwrap());
    assert_eq!(other.day_plan(2).unwrap(), repo.day_plan(2).unwrap());

    // Importing twice more changes nothing: totals are recomputed, not
    // accumulated.
    let re_exported = other.export_snapshot().unwrap();
    other.import_snapshot(re_exported.clone()).unwrap();
    assert_eq!(other.export_snapshot().unwrap(), re_exported);
}

#[test]
fn import_refuses_invalid_documents_and_keeps_local_state() {
    let repo = memory_repo();
    repo.create_trip("Kyoto", 5, 1).unwrap();

    let err = TripSnapshot::from_json(r#"{ "tripDetails": { "destination": "", "days": 1, "people": 1 } }"#)
        .unwrap_err();
    assert!(err.to_string().contains("Invalid trip data format."));

    // Nothing was cleared by the failed parse.
    assert_eq!(repo.trip().unwrap().destination, "Kyoto");
}

#[test]
fn full_flow_persists_through_the_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("travelmate.json");

    {
        let repo = TripStore::new(Arc::new(FileStore::open(&path).unwrap()));
        repo.create_trip("Paris", 3, 2).unwrap();
        let cruise = repo.add_activity("Seine cruise", None, 50.0).unwrap();
        repo.schedule_activity(
            1,
            cruise.id,
            "10:00".parse().unwrap(),
            "12:00".parse().unwrap(),
            "#007bff",
        )
        .unwrap();
        repo.recalculate_costs().unwrap();
    }

    let reopened = TripStore::new(Arc::new(FileStore::open(&path).unwrap()));
    let trip = reopened.trip().unwrap();
    assert_eq!(trip.destination, "Paris");
    assert_eq!(trip.day_plans[&1].total_cost, 100.0);
    assert_eq!(trip.day_plans[&1].bookings[0].start_time.to_string(), "10:00");
}
