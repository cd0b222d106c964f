use serde::{Deserialize, Serialize};
use uuid::Uuid;

use travelmate_core::{CoreError, CoreResult, TimeOfDay};

use crate::activity::Activity;
use crate::events::ActivityEvent;

/// A scheduled activity instance with a concrete time range on one day.
///
/// The id is the source activity's id; title and cost are denormalized so
/// the day grid renders without a pool lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub title: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub cost: f64,
    pub color: String,
}

impl Booking {
    pub fn new(
        activity: &Activity,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        color: &str,
    ) -> CoreResult<Self> {
        check_times(start_time, end_time)?;
        Ok(Self {
            id: activity.id,
            title: activity.title.clone(),
            start_time,
            end_time,
            cost: activity.cost,
            color: color.to_string(),
        })
    }

    pub fn set_times(&mut self, start_time: TimeOfDay, end_time: TimeOfDay) -> CoreResult<()> {
        check_times(start_time, end_time)?;
        self.start_time = start_time;
        self.end_time = end_time;
        Ok(())
    }

    /// Number of hour slots the booking occupies on the grid.
    pub fn duration_slots(&self) -> u32 {
        self.end_time.end_slot() - self.start_time.start_slot()
    }
}

fn check_times(start: TimeOfDay, end: TimeOfDay) -> CoreResult<()> {
    if end <= start {
        return Err(CoreError::ValidationError(
            "End time must be after start time.".to_string(),
        ));
    }
    Ok(())
}

/// All bookings for one numbered day plus the derived for-all-travelers
/// total maintained by the budget aggregator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    #[serde(rename = "dayPlan", default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub total_cost: f64,
}

impl DayPlan {
    pub fn contains(&self, activity_id: Uuid) -> bool {
        self.bookings.iter().any(|b| b.id == activity_id)
    }

    pub fn booking_mut(&mut self, activity_id: Uuid) -> Option<&mut Booking> {
        self.bookings.iter_mut().find(|b| b.id == activity_id)
    }

    pub fn remove(&mut self, activity_id: Uuid) -> Option<Booking> {
        let idx = self.bookings.iter().position(|b| b.id == activity_id)?;
        Some(self.bookings.remove(idx))
    }

    /// Sum of per-person booking costs for the day.
    pub fn cost_per_person(&self) -> f64 {
        self.bookings.iter().map(|b| b.cost).sum()
    }

    pub fn refresh_total(&mut self, people: u32) {
        self.total_cost = self.cost_per_person() * people as f64;
    }

    /// Apply an activity-pool change to this day's denormalized bookings.
    /// Returns true if anything changed.
    pub fn apply(&mut self, event: &ActivityEvent) -> bool {
        match event {
            ActivityEvent::Updated {
                id, title, cost, ..
            } => {
                let mut changed = false;
                for booking in self.bookings.iter_mut().filter(|b| b.id == *id) {
                    booking.title = title.clone();
                    booking.cost = *cost;
                    changed = true;
                }
                changed
            }
            ActivityEvent::Removed { id } => {
                let before = self.bookings.len();
                self.bookings.retain(|b| b.id != *id);
                self.bookings.len() != before
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(cost: f64) -> Activity {
        Activity::new("Museum visit", None, cost).unwrap()
    }

    fn time(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn booking_requires_end_after_start() {
        let act = activity(50.0);
        let err = Booking::new(&act, time("10:00"), time("10:00"), "#007bff").unwrap_err();
        assert!(err.to_string().contains("End time must be after start time."));
        assert!(Booking::new(&act, time("10:00"), time("09:00"), "#007bff").is_err());
        assert!(Booking::new(&act, time("10:00"), time("12:00"), "#007bff").is_ok());
    }

    #[test]
    fn duration_rounds_up_to_whole_hours() {
        let act = activity(10.0);
        let booking = Booking::new(&act, time("09:15"), time("10:05"), "#fff").unwrap();
        assert_eq!(booking.duration_slots(), 2);
    }

    #[test]
    fn day_totals_scale_by_travelers() {
        let act = activity(50.0);
        let mut plan = DayPlan::default();
        plan.bookings
            .push(Booking::new(&act, time("10:00"), time("12:00"), "#007bff").unwrap());
        plan.refresh_total(2);
        assert_eq!(plan.total_cost, 100.0);
    }

    #[test]
    fn pool_update_patches_denormalized_fields() {
        let act = activity(50.0);
        let mut plan = DayPlan::default();
        plan.bookings
            .push(Booking::new(&act, time("10:00"), time("12:00"), "#007bff").unwrap());

        let changed = plan.apply(&ActivityEvent::Updated {
            id: act.id,
            title: "Museum visit (guided)".to_string(),
            description: None,
            cost: 60.0,
        });
        assert!(changed);
        assert_eq!(plan.bookings[0].title, "Museum visit (guided)");
        assert_eq!(plan.bookings[0].cost, 60.0);

        let removed = plan.apply(&ActivityEvent::Removed { id: act.id });
        assert!(removed);
        assert!(plan.bookings.is_empty());
    }
}
