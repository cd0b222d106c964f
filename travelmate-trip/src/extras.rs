use serde::{Deserialize, Serialize};

use travelmate_core::CoreResult;

use crate::validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightKind {
    #[default]
    #[serde(rename = "One-Way")]
    OneWay,
    #[serde(rename = "Round-Trip")]
    RoundTrip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub departure: String,
    pub arrival: String,
    pub cost: f64,
    #[serde(rename = "type", default)]
    pub kind: FlightKind,
}

impl Flight {
    pub fn new(departure: &str, arrival: &str, cost: f64, kind: FlightKind) -> CoreResult<Self> {
        validate::required("Departure", departure)?;
        validate::required("Arrival", arrival)?;
        validate::cost(cost)?;
        Ok(Self {
            departure: departure.trim().to_string(),
            arrival: arrival.trim().to_string(),
            cost,
            kind,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stay {
    pub name: String,
    pub location: String,
    pub nights: u32,
    pub cost: f64,
}

impl Stay {
    pub fn new(name: &str, location: &str, nights: u32, cost: f64) -> CoreResult<Self> {
        validate::required("Name", name)?;
        validate::required("Location", location)?;
        validate::positive("Number of nights", nights)?;
        validate::cost(cost)?;
        Ok(Self {
            name: name.trim().to_string(),
            location: location.trim().to_string(),
            nights,
            cost,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub title: String,
    pub cost: f64,
}

impl Expense {
    pub fn new(title: &str, cost: f64) -> CoreResult<Self> {
        validate::min_len("Title", title, 3)?;
        validate::cost(cost)?;
        Ok(Self {
            title: title.trim().to_string(),
            cost,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl TodoItem {
    pub fn new(title: &str) -> CoreResult<Self> {
        validate::min_len("To-Do title", title, 3)?;
        Ok(Self {
            title: title.trim().to_string(),
            completed: false,
        })
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}
