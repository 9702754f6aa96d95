use crate::theme::{BASE_STYLE, OUTSIDE_MONTH_STYLE};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use time::Date;

/// One date's classification against the selected month and today.  Computed
/// at render time and never stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct DayCell {
    pub(super) date: Date,
    pub(super) outside_month: bool,
    pub(super) past: bool,
    pub(super) today: bool,
}

impl DayCell {
    pub(super) fn classify(date: Date, month: Date, today: Date) -> DayCell {
        DayCell {
            date,
            outside_month: (date.year(), date.month()) != (month.year(), month.month()),
            // "End of day strictly before now" collapses to a plain date
            // comparison at day granularity.
            past: date < today,
            today: date == today,
        }
    }

    // The flags are independent patches; none takes precedence.
    pub(super) fn style(&self) -> Style {
        let mut style = if self.outside_month {
            OUTSIDE_MONTH_STYLE
        } else {
            BASE_STYLE
        };
        if self.past {
            style = style.add_modifier(Modifier::DIM);
        }
        style
    }

    pub(super) fn show(&self, selected: bool) -> Span<'static> {
        let s = if self.today {
            format!("[{:2}]", self.date.day())
        } else {
            format!(" {:2} ", self.date.day())
        };
        let mut style = self.style();
        if self.today {
            style = style.add_modifier(Modifier::BOLD);
        }
        if selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Span::styled(s, style)
    }
}
