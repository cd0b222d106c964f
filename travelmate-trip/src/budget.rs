use serde::{Deserialize, Serialize};

use crate::extras::{Expense, Flight, Stay};
use crate::trip::Trip;

/// Recomputed cost and budget totals for a trip. Activities are the only
/// per-person component scaled by traveler count; flights, stays, and
/// ad-hoc expenses are already whole-party figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub flights_total: f64,
    pub stays_total: f64,
    pub activities_total: f64,
    pub expenses_total: f64,
    pub total_cost_all_travelers: f64,
    pub total_cost_per_person: f64,
    pub total_budget_all_travelers: f64,
}

/// Recomputes trip totals on demand. Stateless; derived fields on the trip
/// are outputs only, so re-running on unchanged input yields identical
/// numbers with no double counting.
pub struct BudgetAggregator;

impl BudgetAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(
        &self,
        trip: &Trip,
        flights: &[Flight],
        stays: &[Stay],
        expenses: &[Expense],
    ) -> CostSummary {
        let people = trip.people.max(1) as f64;

        let flights_total: f64 = flights.iter().map(|f| f.cost).sum();
        let stays_total: f64 = stays.iter().map(|s| s.cost).sum();
        let expenses_total: f64 = expenses.iter().map(|e| e.cost).sum();
        let activities_total: f64 = trip
            .day_plans
            .values()
            .map(|plan| plan.cost_per_person() * people)
            .sum();

        let total_cost_all_travelers =
            flights_total + stays_total + activities_total + expenses_total;

        CostSummary {
            flights_total,
            stays_total,
            activities_total,
            expenses_total,
            total_cost_all_travelers,
            total_cost_per_person: total_cost_all_travelers / people,
            total_budget_all_travelers: trip.budget * people,
        }
    }

    /// Recompute and write the derived totals back onto the trip, including
    /// each day plan's for-all-travelers figure.
    pub fn apply(
        &self,
        trip: &mut Trip,
        flights: &[Flight],
        stays: &[Stay],
        expenses: &[Expense],
    ) -> CostSummary {
        let summary = self.summarize(trip, flights, stays, expenses);
        let people = trip.people;
        for plan in trip.day_plans.values_mut() {
            plan.refresh_total(people);
        }
        trip.total_cost_all_travelers = summary.total_cost_all_travelers;
        trip.total_cost_per_person = summary.total_cost_per_person;
        trip.total_budget_all_travelers = summary.total_budget_all_travelers;
        summary
    }
}

impl Default for BudgetAggregator {
    fn default() -> Self {
        Self::new()
    }
}
