use serde::Serialize;

use travelmate_core::time::SLOTS_PER_DAY;
use travelmate_trip::Booking;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid time range {start}-{end} for \"{title}\"")]
    InvalidTimeRange {
        title: String,
        start: String,
        end: String,
    },
}

/// One cell of the day grid. Only the first slot of a span carries the
/// booking; the slots below it are `Covered` and must not be rendered as
/// independent cells, which is what realizes a row-spanning table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GridCell {
    Empty,
    Start { booking: Booking, row_span: u32 },
    Covered,
}

impl GridCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, GridCell::Empty)
    }
}

/// Grid placement for one day: 24 hour rows, each holding one cell per
/// track active at that slot. Rows are ragged; use [`DayGrid::padded_rows`]
/// for a rectangular rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGrid {
    rows: Vec<Vec<GridCell>>,
}

impl DayGrid {
    fn empty() -> Self {
        Self {
            rows: vec![Vec::new(); SLOTS_PER_DAY as usize],
        }
    }

    pub fn rows(&self) -> &[Vec<GridCell>] {
        &self.rows
    }

    pub fn cell(&self, slot: u32, track: usize) -> Option<&GridCell> {
        self.rows.get(slot as usize).and_then(|row| row.get(track))
    }

    /// Maximum number of tracks used at any slot, never less than one so an
    /// empty day still renders a single blank column.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0).max(1)
    }

    /// Rows padded with `Empty` cells up to [`DayGrid::column_count`].
    pub fn padded_rows(&self) -> Vec<Vec<GridCell>> {
        let width = self.column_count();
        self.rows
            .iter()
            .map(|row| {
                let mut padded = row.clone();
                padded.resize(width, GridCell::Empty);
                padded
            })
            .collect()
    }
}

/// Place a day's bookings onto the hour grid, processing them in input
/// order. Each booking takes the lowest track that is free at every slot
/// of its range; once placed it is never moved. This greedy single pass is
/// order dependent and can use more tracks than an optimal interval
/// packing would, which callers relying on the observed column count
/// expect.
///
/// Fails on the first booking whose time range does not fit `[0, 24)`
/// hour slots or whose end does not come after its start. Upstream
/// validation already guarantees this for bookings built through
/// [`Booking::new`]; the check here guards hand-built or deserialized
/// values.
pub fn layout(bookings: &[Booking]) -> Result<DayGrid, ScheduleError> {
    let mut grid = DayGrid::empty();
    let mut occupancy: Vec<Vec<bool>> = vec![Vec::new(); SLOTS_PER_DAY as usize];

    for booking in bookings {
        place(booking, &mut grid, &mut occupancy)?;
    }
    Ok(grid)
}

/// Like [`layout`], but a booking with an invalid time range is rejected
/// individually instead of failing the whole grid. The skipped bookings'
/// errors are returned alongside the placement of everything else.
pub fn layout_partial(bookings: &[Booking]) -> (DayGrid, Vec<ScheduleError>) {
    let mut grid = DayGrid::empty();
    let mut occupancy: Vec<Vec<bool>> = vec![Vec::new(); SLOTS_PER_DAY as usize];
    let mut rejected = Vec::new();

    for booking in bookings {
        if let Err(err) = place(booking, &mut grid, &mut occupancy) {
            tracing::warn!(booking = %booking.title, %err, "skipping booking with invalid time range");
            rejected.push(err);
        }
    }
    (grid, rejected)
}

fn place(
    booking: &Booking,
    grid: &mut DayGrid,
    occupancy: &mut [Vec<bool>],
) -> Result<(), ScheduleError> {
    let start_slot = booking.start_time.start_slot() as usize;
    let end_slot = booking.end_time.end_slot() as usize;

    if start_slot >= end_slot || end_slot > SLOTS_PER_DAY as usize {
        return Err(ScheduleError::InvalidTimeRange {
            title: booking.title.clone(),
            start: booking.start_time.to_string(),
            end: booking.end_time.to_string(),
        });
    }

    let range = start_slot..end_slot;
    let mut track = 0;
    while range
        .clone()
        .any(|slot| occupancy[slot].get(track).copied().unwrap_or(false))
    {
        track += 1;
    }

    let row_span = (end_slot - start_slot) as u32;
    for slot in range {
        if occupancy[slot].len() <= track {
            occupancy[slot].resize(track + 1, false);
        }
        occupancy[slot][track] = true;

        let row = &mut grid.rows[slot];
        if row.len() <= track {
            row.resize(track + 1, GridCell::Empty);
        }
        row[track] = if slot == start_slot {
            GridCell::Start {
                booking: booking.clone(),
                row_span,
            }
        } else {
            GridCell::Covered
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use travelmate_core::TimeOfDay;
    use travelmate_trip::Activity;

    fn time(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn booking(title: &str, start: &str, end: &str) -> Booking {
        let activity = Activity::new(title, None, 10.0).unwrap();
        Booking::new(&activity, time(start), time(end), "#007bff").unwrap()
    }

    fn track_of(grid: &DayGrid, title: &str) -> usize {
        for row in grid.rows() {
            for (track, cell) in row.iter().enumerate() {
                if let GridCell::Start { booking, .. } = cell {
                    if booking.title == title {
                        return track;
                    }
                }
            }
        }
        panic!("booking {title} not placed");
    }

    #[test]
    fn disjoint_bookings_all_share_track_zero() {
        let bookings = vec![
            booking("Breakfast", "08:00", "09:00"),
            booking("Museum tour", "10:00", "12:00"),
            booking("Dinner", "19:00", "21:00"),
        ];
        let grid = layout(&bookings).unwrap();

        assert_eq!(grid.column_count(), 1);
        for title in ["Breakfast", "Museum tour", "Dinner"] {
            assert_eq!(track_of(&grid, title), 0);
        }
    }

    #[test]
    fn overlapping_bookings_take_distinct_tracks() {
        let bookings = vec![
            booking("Walking tour", "09:00", "12:00"),
            booking("Market visit", "10:00", "11:00"),
        ];
        let grid = layout(&bookings).unwrap();

        assert_eq!(grid.column_count(), 2);
        assert_eq!(track_of(&grid, "Walking tour"), 0);
        assert_eq!(track_of(&grid, "Market visit"), 1);

        // The shared slot holds both without collision.
        assert!(matches!(grid.cell(10, 0), Some(GridCell::Covered)));
        assert!(matches!(grid.cell(10, 1), Some(GridCell::Start { .. })));
    }

    #[test]
    fn two_hour_booking_spans_with_covered_continuation() {
        let bookings = vec![booking("Museum tour", "09:00", "11:00")];
        let grid = layout(&bookings).unwrap();

        match grid.cell(9, 0) {
            Some(GridCell::Start { booking, row_span }) => {
                assert_eq!(booking.title, "Museum tour");
                assert_eq!(*row_span, 2);
            }
            other => panic!("expected start cell at slot 9, got {other:?}"),
        }
        assert_eq!(grid.cell(10, 0), Some(&GridCell::Covered));
        assert_eq!(grid.cell(11, 0), None);
    }

    #[test]
    fn partial_hours_round_outward_to_whole_slots() {
        let bookings = vec![booking("Lunch", "12:30", "13:15")];
        let grid = layout(&bookings).unwrap();

        match grid.cell(12, 0) {
            Some(GridCell::Start { row_span, .. }) => assert_eq!(*row_span, 2),
            other => panic!("expected start cell at slot 12, got {other:?}"),
        }
        assert_eq!(grid.cell(13, 0), Some(&GridCell::Covered));
    }

    #[test]
    fn rejects_hand_built_booking_with_reversed_times() {
        // Bypasses Booking::new on purpose; the engine re-checks.
        let activity = Activity::new("Backwards", None, 0.0).unwrap();
        let bad = Booking {
            id: activity.id,
            title: activity.title.clone(),
            start_time: time("10:00"),
            end_time: time("09:00"),
            cost: 0.0,
            color: "#fff".to_string(),
        };

        assert!(matches!(
            layout(&[bad.clone()]),
            Err(ScheduleError::InvalidTimeRange { .. })
        ));

        let (grid, rejected) = layout_partial(&[booking("Kept", "08:00", "09:00"), bad]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(track_of(&grid, "Kept"), 0);
    }

    #[test]
    fn identical_input_order_reproduces_the_same_grid() {
        let bookings = vec![
            booking("A", "09:00", "12:00"),
            booking("B", "09:00", "10:00"),
            booking("C", "11:00", "13:00"),
        ];
        assert_eq!(layout(&bookings).unwrap(), layout(&bookings).unwrap());
    }

    #[test]
    fn track_assignment_depends_on_input_order() {
        let long = booking("Long", "10:00", "12:00");
        let first = booking("First hour", "10:00", "11:00");
        let second = booking("Second hour", "11:00", "12:00");

        let forward = layout(&[long.clone(), first.clone(), second.clone()]).unwrap();
        assert_eq!(track_of(&forward, "Long"), 0);
        assert_eq!(track_of(&forward, "First hour"), 1);
        assert_eq!(track_of(&forward, "Second hour"), 1);

        // Same bookings, different order: the long one is displaced. The
        // single pass never repacks, so placement is a function of order.
        let reversed = layout(&[first, second, long]).unwrap();
        assert_eq!(track_of(&reversed, "First hour"), 0);
        assert_eq!(track_of(&reversed, "Second hour"), 0);
        assert_eq!(track_of(&reversed, "Long"), 1);
    }

    #[test]
    fn padded_rows_render_rectangularly() {
        let bookings = vec![
            booking("A", "09:00", "11:00"),
            booking("B", "09:00", "10:00"),
        ];
        let grid = layout(&bookings).unwrap();
        let rows = grid.padded_rows();

        assert_eq!(rows.len(), SLOTS_PER_DAY as usize);
        assert!(rows.iter().all(|row| row.len() == grid.column_count()));
        assert_eq!(rows[23], vec![GridCell::Empty, GridCell::Empty]);
    }

    #[test]
    fn empty_day_still_has_one_blank_column() {
        let grid = layout(&[]).unwrap();
        assert_eq!(grid.column_count(), 1);
        assert!(grid.rows().iter().all(|row| row.is_empty()));
    }
}
