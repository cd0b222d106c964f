use serde::{Deserialize, Serialize};
use uuid::Uuid;

use travelmate_core::CoreResult;

use crate::validate;

/// An activity in the trip's pool, priced per person. Scheduling one onto a
/// day produces a [`crate::Booking`] that denormalizes title and cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cost: f64,
}

impl Activity {
    pub fn new(title: &str, description: Option<&str>, cost: f64) -> CoreResult<Self> {
        validate::min_len("Title", title, 3)?;
        validate::cost(cost)?;
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
            cost,
        })
    }

    /// Apply edited fields in place, re-running the form rules.
    pub fn update(&mut self, title: &str, description: Option<&str>, cost: f64) -> CoreResult<()> {
        validate::min_len("Title", title, 3)?;
        validate::cost(cost)?;
        self.title = title.trim().to_string();
        self.description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);
        self.cost = cost;
        Ok(())
    }
}
