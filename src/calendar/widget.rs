use super::cell::DayCell;
use super::state::MonthState;
use crate::events::{EventStore, EventTime};
use crate::theme::{BASE_STYLE, OVERFLOW_STYLE, TITLE_STYLE, WEEKDAY_STYLE};
use ratatui::{buffer::Buffer, layout::Rect, style::Modifier, widgets::StatefulWidget};
use std::iter::{successors, zip};
use time::{Date, Weekday};

const DAYS_IN_WEEK: u16 = 7;

/// Narrowest cell that still fits a day number
const MIN_CELL_WIDTH: u16 = 3;

/// Lines taken up by the month title, the weekday names, and their rule
const HEADER_LINES: u16 = 3;

const ACS_HLINE: char = '─';

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthView<'a> {
    pub(crate) store: &'a EventStore,
    pub(crate) today: Date,
}

impl StatefulWidget for MonthView<'_> {
    type State = MonthState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.clear_cells();
        if area.width < DAYS_IN_WEEK * MIN_CELL_WIDTH || area.height <= HEADER_LINES {
            return;
        }
        let days = state.visible_days();
        let Ok(week_qty) = u16::try_from(days.len() / usize::from(DAYS_IN_WEEK)) else {
            return;
        };
        if week_qty == 0 {
            return;
        }
        let cell_width = area.width / DAYS_IN_WEEK;
        let grid_width = cell_width * DAYS_IN_WEEK;
        let left = area.x + (area.width - grid_width) / 2;
        let cell_height = ((area.height - HEADER_LINES) / week_qty).max(1);

        let month = state.month();
        let cursor = state.cursor();
        let selected_event = state.selected_event();

        let title = format!("{} {}", month.month(), month.year());
        let title_width = u16::try_from(title.len()).unwrap_or(u16::MAX);
        let title_x = area.x + area.width.saturating_sub(title_width) / 2;
        buf.set_stringn(title_x, area.y, &title, area.width.into(), TITLE_STYLE);

        for (col, weekday) in zip(0u16.., weekdays_from(state.week_start())) {
            buf.set_string(
                left + col * cell_width + 1,
                area.y + 1,
                weekday_short(weekday),
                WEEKDAY_STYLE,
            );
        }
        buf.set_stringn(
            left,
            area.y + 2,
            String::from(ACS_HLINE).repeat(grid_width.into()),
            grid_width.into(),
            BASE_STYLE,
        );

        for (row, week) in zip(0u16.., days.chunks(usize::from(DAYS_IN_WEEK))) {
            let y = area.y + HEADER_LINES + row * cell_height;
            if y >= area.bottom() {
                break;
            }
            let height = cell_height.min(area.bottom() - y);
            for (col, &date) in zip(0u16.., week.iter()) {
                let cell_area = Rect {
                    x: left + col * cell_width,
                    y,
                    width: cell_width,
                    height,
                };
                let cell = DayCell::classify(date, month, self.today);
                let is_cursor = date == cursor;
                buf.set_style(cell_area, cell.style());
                let day_span = cell.show(is_cursor);
                buf.set_stringn(
                    cell_area.x,
                    cell_area.y,
                    day_span.content.as_ref(),
                    cell_width.into(),
                    day_span.style,
                );
                self.render_events(buf, cell_area, &cell, is_cursor, selected_event);
                state.record_cell(date, cell_area);
            }
        }
    }
}

impl MonthView<'_> {
    fn render_events(
        &self,
        buf: &mut Buffer,
        cell_area: Rect,
        cell: &DayCell,
        is_cursor: bool,
        selected_event: usize,
    ) {
        let events = self.store.on_date(cell.date);
        let lines = usize::from(cell_area.height.saturating_sub(1));
        if lines == 0 || events.is_empty() {
            return;
        }
        let shown = if events.len() > lines {
            lines - 1
        } else {
            events.len()
        };
        let label_width = usize::from(cell_area.width.saturating_sub(1));
        for (line, event) in zip(1u16.., events.iter().take(shown)) {
            let label = match event.time {
                EventTime::AllDay => format!("▪ {}", event.name),
                EventTime::Timed { start, .. } => {
                    format!("{:02}:{:02} {}", start.hour(), start.minute(), event.name)
                }
            };
            let mut style = event.color.style();
            if cell.past || cell.outside_month {
                style = style.add_modifier(Modifier::DIM);
            }
            if is_cursor && usize::from(line - 1) == selected_event {
                style = style.add_modifier(Modifier::REVERSED);
            }
            buf.set_stringn(cell_area.x, cell_area.y + line, label, label_width, style);
        }
        if shown < events.len() {
            let more = format!("+{} more", events.len() - shown);
            let y = cell_area.y + u16::try_from(shown).unwrap_or(u16::MAX).saturating_add(1);
            buf.set_stringn(cell_area.x, y, more, label_width, OVERFLOW_STYLE);
        }
    }
}

fn weekdays_from(start: Weekday) -> impl Iterator<Item = Weekday> {
    successors(Some(start), |wd| Some(wd.next())).take(usize::from(DAYS_IN_WEEK))
}

fn weekday_short(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sunday => "Su",
        Weekday::Monday => "Mo",
        Weekday::Tuesday => "Tu",
        Weekday::Wednesday => "We",
        Weekday::Thursday => "Th",
        Weekday::Friday => "Fr",
        Weekday::Saturday => "Sa",
    }
}
