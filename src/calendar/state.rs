use super::grid;
use ratatui::layout::{Position, Rect};
use time::{Date, Duration, Weekday};

/// View state for the month grid: the selected month, the cursor day, and
/// which of the cursor day's events is selected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthState {
    month: Date,
    cursor: Date,
    selected_event: usize,
    week_start: Weekday,
    // Day-cell regions recorded by the last render, for mouse hit-testing.
    cells: Vec<(Date, Rect)>,
}

impl MonthState {
    pub(crate) fn new(today: Date, week_start: Weekday) -> MonthState {
        MonthState {
            month: grid::first_of_month(today),
            cursor: today,
            selected_event: 0,
            week_start,
            cells: Vec::new(),
        }
    }

    /// The first day of the selected month.
    pub(crate) fn month(&self) -> Date {
        self.month
    }

    pub(crate) fn cursor(&self) -> Date {
        self.cursor
    }

    pub(crate) fn selected_event(&self) -> usize {
        self.selected_event
    }

    pub(super) fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub(super) fn visible_days(&self) -> Vec<Date> {
        grid::visible_days(self.month, self.week_start)
    }

    pub(super) fn clear_cells(&mut self) {
        self.cells.clear();
    }

    pub(super) fn record_cell(&mut self, date: Date, area: Rect) {
        self.cells.push((date, area));
    }

    pub(crate) fn day_at(&self, position: Position) -> Option<Date> {
        self.cells
            .iter()
            .find(|&&(_, area)| area.contains(position))
            .map(|&(date, _)| date)
    }

    pub(crate) fn goto(&mut self, date: Date) {
        self.cursor = date;
        self.month = grid::first_of_month(date);
        self.selected_event = 0;
    }

    /// Cursor to a day already on screen; the selected month is unchanged.
    pub(crate) fn goto_visible(&mut self, date: Date) {
        self.cursor = date;
        self.selected_event = 0;
    }

    /// Moves the cursor by whole days; once it walks off the visible grid
    /// the selected month follows it.
    pub(crate) fn move_cursor(&mut self, days: i64) -> bool {
        let Some(cursor) = self.cursor.checked_add(Duration::days(days)) else {
            return false;
        };
        self.cursor = cursor;
        self.selected_event = 0;
        let shown = self.visible_days();
        let off_grid = shown.first().is_some_and(|&first| cursor < first)
            || shown.last().is_some_and(|&last| cursor > last);
        if off_grid {
            self.month = grid::first_of_month(cursor);
        }
        true
    }

    /// Selects an adjacent month, keeping the cursor's day of month where
    /// the shorter month allows it.
    pub(crate) fn shift_month(&mut self, delta: i32) -> bool {
        let Some(first) = grid::add_months(self.month, delta) else {
            return false;
        };
        let day = self.cursor.day().min(grid::last_of_month(first).day());
        let Ok(cursor) = first.replace_day(day) else {
            return false;
        };
        self.cursor = cursor;
        self.month = first;
        self.selected_event = 0;
        true
    }

    pub(crate) fn select_next_event(&mut self, count: usize) -> bool {
        if count == 0 {
            return false;
        }
        self.selected_event = (self.selected_event + 1) % count;
        true
    }

    pub(crate) fn select_previous_event(&mut self, count: usize) -> bool {
        if count == 0 {
            return false;
        }
        self.selected_event = (self.selected_event + count - 1) % count;
        true
    }
}
