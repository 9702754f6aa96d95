use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const OUTSIDE_MONTH_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const OVERFLOW_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const BLUE_EVENT_STYLE: Style = BASE_STYLE.fg(Color::LightBlue);

pub(crate) const RED_EVENT_STYLE: Style = BASE_STYLE.fg(Color::LightRed);

pub(crate) const GREEN_EVENT_STYLE: Style = BASE_STYLE.fg(Color::LightGreen);

pub(crate) mod form {
    use super::*;

    pub(crate) const LABEL_STYLE: Style = BASE_STYLE;

    pub(crate) const FOCUS_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

    pub(crate) const PLACEHOLDER_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const DATE_STYLE: Style = BASE_STYLE.fg(Color::Gray);

    pub(crate) const ERROR_STYLE: Style = BASE_STYLE.fg(Color::LightRed);
}
