use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use travelmate_core::{CoreError, CoreResult};

use crate::booking::DayPlan;
use crate::validate;

/// Root trip entity. Day plans are keyed by day number (1..=days); the
/// trailing total fields are a derived cache owned by the budget
/// aggregator, never authoritative input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub destination: String,
    pub days: u32,
    pub people: u32,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub day_plans: BTreeMap<u32, DayPlan>,
    #[serde(default)]
    pub total_cost_all_travelers: f64,
    #[serde(default)]
    pub total_cost_per_person: f64,
    #[serde(default)]
    pub total_budget_all_travelers: f64,
}

impl Trip {
    pub fn new(destination: &str, days: u32, people: u32) -> CoreResult<Self> {
        validate::required("Destination", destination)?;
        validate::positive("Number of days", days)?;
        validate::positive("Number of travelers", people)?;
        Ok(Self {
            destination: destination.trim().to_string(),
            days,
            people,
            budget: 0.0,
            day_plans: BTreeMap::new(),
            total_cost_all_travelers: 0.0,
            total_cost_per_person: 0.0,
            total_budget_all_travelers: 0.0,
        })
    }

    pub fn check_day(&self, day: u32) -> CoreResult<()> {
        if day == 0 || day > self.days {
            return Err(CoreError::NotFoundError(format!(
                "Day {} is not part of this trip.",
                day
            )));
        }
        Ok(())
    }

    pub fn day_plan(&self, day: u32) -> Option<&DayPlan> {
        self.day_plans.get(&day)
    }

    /// Day plan for a valid day, created empty on first access.
    pub fn day_plan_mut(&mut self, day: u32) -> CoreResult<&mut DayPlan> {
        self.check_day(day)?;
        Ok(self.day_plans.entry(day).or_default())
    }

    pub fn set_budget(&mut self, budget: f64) -> CoreResult<()> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(CoreError::ValidationError(
                "Budget must be a valid number and cannot be negative.".to_string(),
            ));
        }
        self.budget = budget;
        Ok(())
    }
}
