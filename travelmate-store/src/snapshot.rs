use serde::{Deserialize, Serialize};

use travelmate_core::CoreError;
use travelmate_trip::{Activity, Expense, Flight, Stay, TodoItem, Trip};

use crate::kv::KvStoreExt;
use crate::trip_store::{keys, TripStore};
use crate::StoreResult;

/// A whole trip as one JSON document. Top-level keys mirror the storage
/// keys so a file written by one installation loads into another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSnapshot {
    pub trip_details: Trip,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub flights: Vec<Flight>,
    #[serde(default)]
    pub stays: Vec<Stay>,
    #[serde(default)]
    pub additional_expenses: Vec<Expense>,
    #[serde(default)]
    pub todo_list: Vec<TodoItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_day: Option<u32>,
}

impl TripSnapshot {
    pub fn from_json(raw: &str) -> StoreResult<Self> {
        let snapshot: Self = serde_json::from_str(raw)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The import gate: a snapshot without a destination, day count, or
    /// traveler count is refused before any local state is touched.
    pub fn validate(&self) -> StoreResult<()> {
        let trip = &self.trip_details;
        if trip.destination.trim().is_empty() || trip.days == 0 || trip.people == 0 {
            return Err(
                CoreError::ValidationError("Invalid trip data format.".to_string()).into(),
            );
        }
        Ok(())
    }
}

impl TripStore {
    pub fn export_snapshot(&self) -> StoreResult<TripSnapshot> {
        Ok(TripSnapshot {
            trip_details: self.trip()?,
            activities: self.activities()?,
            flights: self.flights()?,
            stays: self.stays()?,
            additional_expenses: self.expenses()?,
            todo_list: self.todos()?,
            selected_day: self.selected_day()?,
        })
    }

    /// Replace all local state with the snapshot's. Existing keys are
    /// cleared first; derived totals are recomputed rather than trusted.
    pub fn import_snapshot(&self, snapshot: TripSnapshot) -> StoreResult<()> {
        snapshot.validate()?;

        self.store.clear()?;
        self.store.set(keys::TRIP, &snapshot.trip_details)?;
        self.store.set(keys::ACTIVITIES, &snapshot.activities)?;
        self.store.set(keys::FLIGHTS, &snapshot.flights)?;
        self.store.set(keys::STAYS, &snapshot.stays)?;
        self.store.set(keys::EXPENSES, &snapshot.additional_expenses)?;
        self.store.set(keys::TODOS, &snapshot.todo_list)?;
        if let Some(day) = snapshot.selected_day {
            self.store.set(keys::SELECTED_DAY, &day)?;
        }

        self.recalculate_costs()?;
        tracing::info!(
            destination = %snapshot.trip_details.destination,
            "trip imported"
        );
        Ok(())
    }
}
