pub mod grid;

pub use grid::{layout, layout_partial, DayGrid, GridCell, ScheduleError};
