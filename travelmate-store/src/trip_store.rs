use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use travelmate_core::{CoreError, TimeOfDay};
use travelmate_trip::{
    Activity, ActivityEvent, Booking, BudgetAggregator, CostSummary, DayPlan, EventBus, Expense,
    Flight, Stay, TodoItem, Trip,
};

use crate::kv::{KvStore, KvStoreExt, StoreResult};

/// Storage keys, matching the trip export file format one to one.
pub mod keys {
    pub const TRIP: &str = "tripDetails";
    pub const ACTIVITIES: &str = "activities";
    pub const FLIGHTS: &str = "flights";
    pub const STAYS: &str = "stays";
    pub const EXPENSES: &str = "additionalExpenses";
    pub const TODOS: &str = "todoList";
    pub const SELECTED_DAY: &str = "selectedDay";
    pub const TOTAL_FLIGHT_COST: &str = "totalFlightCost";
    pub const TOTAL_STAY_COST: &str = "totalStayCost";
    pub const TOTAL_EXPENSES: &str = "totalAdditionalExpenses";
}

/// Typed repository over the key-value collaborator. All planner state
/// flows through here; components never address raw keys themselves.
///
/// Activity-pool edits are propagated into day plans via the event bus
/// rather than by reaching into the trip document from the pool side, so
/// the two stay decoupled.
pub struct TripStore {
    pub(crate) store: Arc<dyn KvStore>,
    bus: EventBus,
    aggregator: BudgetAggregator,
}

impl TripStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        let bus = EventBus::new();
        let day_plan_side = store.clone();
        bus.subscribe(move |event| {
            if let Err(err) = patch_day_plans(day_plan_side.as_ref(), event) {
                tracing::warn!(%err, "failed to patch day plans after activity change");
            }
        });
        Self {
            store,
            bus,
            aggregator: BudgetAggregator::new(),
        }
    }

    // ========================================================================
    // Trip lifecycle
    // ========================================================================

    pub fn create_trip(&self, destination: &str, days: u32, people: u32) -> StoreResult<Trip> {
        let trip = Trip::new(destination, days, people)?;
        self.store.set(keys::TRIP, &trip)?;
        tracing::info!(destination = %trip.destination, days, people, "trip created");
        Ok(trip)
    }

    pub fn try_trip(&self) -> StoreResult<Option<Trip>> {
        self.store.get(keys::TRIP)
    }

    /// The active trip, or a not-found error the caller turns into a
    /// redirect to the start page.
    pub fn trip(&self) -> StoreResult<Trip> {
        self.try_trip()?
            .ok_or_else(|| CoreError::NotFoundError("No active trip.".to_string()).into())
    }

    pub fn set_budget(&self, budget: f64) -> StoreResult<Trip> {
        let mut trip = self.trip()?;
        trip.set_budget(budget)?;
        trip.total_budget_all_travelers = budget * trip.people as f64;
        self.store.set(keys::TRIP, &trip)?;
        Ok(trip)
    }

    pub fn select_day(&self, day: u32) -> StoreResult<()> {
        self.trip()?.check_day(day)?;
        self.store.set(keys::SELECTED_DAY, &day)
    }

    pub fn selected_day(&self) -> StoreResult<Option<u32>> {
        self.store.get(keys::SELECTED_DAY)
    }

    pub fn require_selected_day(&self) -> StoreResult<u32> {
        self.selected_day()?
            .ok_or_else(|| CoreError::NotFoundError("No selected day.".to_string()).into())
    }

    // ========================================================================
    // Activity pool
    // ========================================================================

    pub fn activities(&self) -> StoreResult<Vec<Activity>> {
        self.load_list(keys::ACTIVITIES)
    }

    pub fn add_activity(
        &self,
        title: &str,
        description: Option<&str>,
        cost: f64,
    ) -> StoreResult<Activity> {
        let activity = Activity::new(title, description, cost)?;
        let mut pool = self.activities()?;
        pool.push(activity.clone());
        self.store.set(keys::ACTIVITIES, &pool)?;
        Ok(activity)
    }

    /// Edit a pooled activity and patch its denormalized copies in every
    /// day plan through the change event.
    pub fn update_activity(
        &self,
        id: Uuid,
        title: &str,
        description: Option<&str>,
        cost: f64,
    ) -> StoreResult<Activity> {
        let mut pool = self.activities()?;
        let activity = pool
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| CoreError::NotFoundError("Activity not found.".to_string()))?;
        activity.update(title, description, cost)?;
        let updated = activity.clone();
        self.store.set(keys::ACTIVITIES, &pool)?;

        self.bus.publish(&ActivityEvent::Updated {
            id,
            title: updated.title.clone(),
            description: updated.description.clone(),
            cost: updated.cost,
        });
        Ok(updated)
    }

    pub fn remove_activity(&self, id: Uuid) -> StoreResult<()> {
        let mut pool = self.activities()?;
        let before = pool.len();
        pool.retain(|a| a.id != id);
        if pool.len() == before {
            return Err(CoreError::NotFoundError("Activity not found.".to_string()).into());
        }
        self.store.set(keys::ACTIVITIES, &pool)?;

        self.bus.publish(&ActivityEvent::Removed { id });
        Ok(())
    }

    // ========================================================================
    // Day scheduling
    // ========================================================================

    pub fn day_plan(&self, day: u32) -> StoreResult<DayPlan> {
        let trip = self.trip()?;
        trip.check_day(day)?;
        Ok(trip.day_plan(day).cloned().unwrap_or_default())
    }

    /// Pool activities not yet scheduled on the given day.
    pub fn available_activities(&self, day: u32) -> StoreResult<Vec<Activity>> {
        let plan = self.day_plan(day)?;
        let mut pool = self.activities()?;
        pool.retain(|a| !plan.contains(a.id));
        Ok(pool)
    }

    pub fn schedule_activity(
        &self,
        day: u32,
        activity_id: Uuid,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        color: &str,
    ) -> StoreResult<Booking> {
        let activity = self
            .activities()?
            .into_iter()
            .find(|a| a.id == activity_id)
            .ok_or_else(|| CoreError::NotFoundError("Activity not found.".to_string()))?;

        let mut trip = self.trip()?;
        let people = trip.people;
        let plan = trip.day_plan_mut(day)?;
        if plan.contains(activity_id) {
            return Err(CoreError::ValidationError(
                "Activity is already scheduled for this day.".to_string(),
            )
            .into());
        }

        let booking = Booking::new(&activity, start_time, end_time, color)?;
        plan.bookings.push(booking.clone());
        plan.refresh_total(people);
        self.store.set(keys::TRIP, &trip)?;
        Ok(booking)
    }

    pub fn update_booking(
        &self,
        day: u32,
        activity_id: Uuid,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        color: Option<&str>,
    ) -> StoreResult<Booking> {
        let mut trip = self.trip()?;
        let plan = trip.day_plan_mut(day)?;
        let booking = plan
            .booking_mut(activity_id)
            .ok_or_else(|| CoreError::NotFoundError("Booking not found.".to_string()))?;
        booking.set_times(start_time, end_time)?;
        if let Some(color) = color {
            booking.color = color.to_string();
        }
        let updated = booking.clone();
        self.store.set(keys::TRIP, &trip)?;
        Ok(updated)
    }

    /// Remove a booking from a day, returning it so the caller can offer
    /// the activity again.
    pub fn remove_booking(&self, day: u32, activity_id: Uuid) -> StoreResult<Booking> {
        let mut trip = self.trip()?;
        let people = trip.people;
        let plan = trip.day_plan_mut(day)?;
        let booking = plan
            .remove(activity_id)
            .ok_or_else(|| CoreError::NotFoundError("Booking not found.".to_string()))?;
        plan.refresh_total(people);
        self.store.set(keys::TRIP, &trip)?;
        Ok(booking)
    }

    // ========================================================================
    // Flights, stays, expenses, to-dos
    // ========================================================================

    pub fn flights(&self) -> StoreResult<Vec<Flight>> {
        self.load_list(keys::FLIGHTS)
    }

    pub fn add_flight(&self, flight: Flight) -> StoreResult<()> {
        self.push_item(keys::FLIGHTS, flight)
    }

    pub fn update_flight(&self, index: usize, flight: Flight) -> StoreResult<()> {
        self.replace_at(keys::FLIGHTS, index, flight, "Flight")
    }

    pub fn remove_flight(&self, index: usize) -> StoreResult<()> {
        self.remove_at::<Flight>(keys::FLIGHTS, index, "Flight")
    }

    pub fn stays(&self) -> StoreResult<Vec<Stay>> {
        self.load_list(keys::STAYS)
    }

    pub fn add_stay(&self, stay: Stay) -> StoreResult<()> {
        self.push_item(keys::STAYS, stay)
    }

    pub fn update_stay(&self, index: usize, stay: Stay) -> StoreResult<()> {
        self.replace_at(keys::STAYS, index, stay, "Stay")
    }

    pub fn remove_stay(&self, index: usize) -> StoreResult<()> {
        self.remove_at::<Stay>(keys::STAYS, index, "Stay")
    }

    pub fn expenses(&self) -> StoreResult<Vec<Expense>> {
        self.load_list(keys::EXPENSES)
    }

    pub fn add_expense(&self, expense: Expense) -> StoreResult<()> {
        self.push_item(keys::EXPENSES, expense)
    }

    pub fn update_expense(&self, index: usize, expense: Expense) -> StoreResult<()> {
        self.replace_at(keys::EXPENSES, index, expense, "Expense")
    }

    pub fn remove_expense(&self, index: usize) -> StoreResult<()> {
        self.remove_at::<Expense>(keys::EXPENSES, index, "Expense")
    }

    pub fn todos(&self) -> StoreResult<Vec<TodoItem>> {
        self.load_list(keys::TODOS)
    }

    pub fn add_todo(&self, title: &str) -> StoreResult<TodoItem> {
        let todo = TodoItem::new(title)?;
        self.push_item(keys::TODOS, todo.clone())?;
        Ok(todo)
    }

    pub fn update_todo(&self, index: usize, title: &str) -> StoreResult<TodoItem> {
        let todo = TodoItem::new(title)?;
        self.replace_at(keys::TODOS, index, todo.clone(), "To-Do")?;
        Ok(todo)
    }

    pub fn toggle_todo(&self, index: usize) -> StoreResult<TodoItem> {
        let mut todos = self.todos()?;
        let todo = todos
            .get_mut(index)
            .ok_or_else(|| CoreError::NotFoundError("To-Do not found.".to_string()))?;
        todo.toggle();
        let toggled = todo.clone();
        self.store.set(keys::TODOS, &todos)?;
        Ok(toggled)
    }

    pub fn remove_todo(&self, index: usize) -> StoreResult<()> {
        self.remove_at::<TodoItem>(keys::TODOS, index, "To-Do")
    }

    // ========================================================================
    // Derived costs
    // ========================================================================

    /// Run the budget aggregator over current state and persist the
    /// refreshed trip plus the per-collection total cache keys.
    pub fn recalculate_costs(&self) -> StoreResult<CostSummary> {
        let mut trip = self.trip()?;
        let flights = self.flights()?;
        let stays = self.stays()?;
        let expenses = self.expenses()?;

        let summary = self.aggregator.apply(&mut trip, &flights, &stays, &expenses);
        self.store.set(keys::TRIP, &trip)?;
        self.store
            .set(keys::TOTAL_FLIGHT_COST, &round2(summary.flights_total))?;
        self.store
            .set(keys::TOTAL_STAY_COST, &round2(summary.stays_total))?;
        self.store
            .set(keys::TOTAL_EXPENSES, &round2(summary.expenses_total))?;
        Ok(summary)
    }

    // ========================================================================
    // List plumbing
    // ========================================================================

    fn load_list<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        Ok(self.store.get(key)?.unwrap_or_default())
    }

    fn push_item<T: Serialize + DeserializeOwned>(&self, key: &str, item: T) -> StoreResult<()> {
        let mut list: Vec<T> = self.load_list(key)?;
        list.push(item);
        self.store.set(key, &list)
    }

    fn replace_at<T: Serialize + DeserializeOwned>(
        &self,
        key: &str,
        index: usize,
        item: T,
        what: &str,
    ) -> StoreResult<()> {
        let mut list: Vec<T> = self.load_list(key)?;
        let slot = list
            .get_mut(index)
            .ok_or_else(|| CoreError::NotFoundError(format!("{} not found.", what)))?;
        *slot = item;
        self.store.set(key, &list)
    }

    fn remove_at<T: Serialize + DeserializeOwned>(
        &self,
        key: &str,
        index: usize,
        what: &str,
    ) -> StoreResult<()> {
        let mut list: Vec<T> = self.load_list(key)?;
        if index >= list.len() {
            return Err(CoreError::NotFoundError(format!("{} not found.", what)).into());
        }
        list.remove(index);
        self.store.set(key, &list)
    }
}

fn patch_day_plans(store: &dyn KvStore, event: &ActivityEvent) -> StoreResult<()> {
    let Some(mut trip) = store.get::<Trip>(keys::TRIP)? else {
        return Ok(());
    };
    let people = trip.people;
    let mut changed = false;
    for plan in trip.day_plans.values_mut() {
        if plan.apply(event) {
            plan.refresh_total(people);
            changed = true;
        }
    }
    if changed {
        store.set(keys::TRIP, &trip)?;
    }
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
