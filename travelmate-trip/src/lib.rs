pub mod activity;
pub mod booking;
pub mod budget;
pub mod events;
pub mod extras;
pub mod trip;
mod validate;

pub use activity::Activity;
pub use booking::{Booking, DayPlan};
pub use budget::{BudgetAggregator, CostSummary};
pub use events::{ActivityEvent, EventBus};
pub use extras::{Expense, Flight, FlightKind, Stay, TodoItem};
pub use trip::Trip;
