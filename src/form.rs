use crate::events::{Event, EventColor, EventDraft, EventId, EventTime};
use crate::theme::{
    form::{DATE_STYLE, ERROR_STYLE, FOCUS_STYLE, LABEL_STYLE, PLACEHOLDER_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};
use thiserror::Error;
use time::{Date, Time};

const OUTER_WIDTH: u16 = 38;
const NAME_MAX: usize = 24;
const TIME_MAX: usize = 5;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct EventForm;

impl StatefulWidget for EventForm {
    type State = EventFormState;

    /*
     * ......................................
     * .┌───────────── Add Event ──────────┐.
     * .│ Wednesday, March 15 2023         │.
     * .│                                  │.
     * .│ Name     Team sync               │.
     * .│ All day  [ ]                     │.
     * .│ Start    09:00                   │.
     * .│ End      10:00                   │.
     * .│ Color    < Blue >                │.
     * .│                                  │.
     * .│             [ Save ]             │.
     * .└──────────────────────────────────┘.
     * ......................................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let text = state.to_text();
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(4);
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([height]).flex(Flex::Center).areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(state.title())
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        state.area = block_area;
        let text_area = block_area.inner(Margin::new(1, 1));
        text.render(text_area, buf);
    }
}

/// A form edits either a brand new event on a given date or one existing
/// event; the two never mix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum FormMode {
    Create { date: Date },
    Edit { id: EventId, date: Date },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Field {
    Name,
    AllDay,
    Start,
    End,
    Color,
    Save,
    Delete,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EventFormState {
    mode: FormMode,
    name: String,
    all_day: bool,
    start: String,
    end: String,
    color: EventColor,
    focus: Field,
    error: Option<FormError>,
    area: Rect,
}

impl EventFormState {
    pub(crate) fn for_new_event(date: Date) -> EventFormState {
        EventFormState {
            mode: FormMode::Create { date },
            name: String::new(),
            all_day: false,
            start: String::new(),
            end: String::new(),
            color: EventColor::Blue,
            focus: Field::Name,
            error: None,
            area: Rect::ZERO,
        }
    }

    pub(crate) fn for_event(event: &Event) -> EventFormState {
        let (all_day, start, end) = match event.time {
            EventTime::AllDay => (true, String::new(), String::new()),
            EventTime::Timed { start, end } => (false, show_time(start), show_time(end)),
        };
        EventFormState {
            mode: FormMode::Edit {
                id: event.id(),
                date: event.date,
            },
            name: event.name.clone(),
            all_day,
            start,
            end,
            color: event.color,
            focus: Field::Name,
            error: None,
            area: Rect::ZERO,
        }
    }

    /// The on-screen region the form last occupied; a click anywhere else
    /// counts as outside the modal.
    pub(crate) fn area(&self) -> Rect {
        self.area
    }

    fn date(&self) -> Date {
        match self.mode {
            FormMode::Create { date } | FormMode::Edit { date, .. } => date,
        }
    }

    fn editing(&self) -> Option<EventId> {
        match self.mode {
            FormMode::Create { .. } => None,
            FormMode::Edit { id, .. } => Some(id),
        }
    }

    fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create { .. } => " Add Event ",
            FormMode::Edit { .. } => " Edit Event ",
        }
    }

    // Time fields drop out of the ring while the event is all-day, and the
    // delete button only exists for an existing event.
    fn focus_ring(&self) -> &'static [Field] {
        match (self.all_day, self.editing().is_some()) {
            (false, false) => &[
                Field::Name,
                Field::AllDay,
                Field::Start,
                Field::End,
                Field::Color,
                Field::Save,
            ],
            (false, true) => &[
                Field::Name,
                Field::AllDay,
                Field::Start,
                Field::End,
                Field::Color,
                Field::Save,
                Field::Delete,
            ],
            (true, false) => &[Field::Name, Field::AllDay, Field::Color, Field::Save],
            (true, true) => &[
                Field::Name,
                Field::AllDay,
                Field::Color,
                Field::Save,
                Field::Delete,
            ],
        }
    }

    pub(crate) fn handle_input(&mut self, input: FormInput) -> FormOutput {
        match input {
            FormInput::NextField => {
                self.cycle_focus(true);
                FormOutput::Ok
            }
            FormInput::PrevField => {
                self.cycle_focus(false);
                FormOutput::Ok
            }
            FormInput::Char(c) => self.insert(c),
            FormInput::Backspace => self.backspace(),
            FormInput::Previous => match self.focus {
                Field::Color => {
                    self.color = self.color.previous();
                    FormOutput::Ok
                }
                _ => FormOutput::Invalid,
            },
            FormInput::Next => match self.focus {
                Field::Color => {
                    self.color = self.color.next();
                    FormOutput::Ok
                }
                _ => FormOutput::Invalid,
            },
            FormInput::Activate => self.activate(),
        }
    }

    fn cycle_focus(&mut self, forwards: bool) {
        let ring = self.focus_ring();
        let pos = ring.iter().position(|&field| field == self.focus).unwrap_or(0);
        let next = if forwards {
            (pos + 1) % ring.len()
        } else {
            (pos + ring.len() - 1) % ring.len()
        };
        self.focus = ring[next];
    }

    fn insert(&mut self, c: char) -> FormOutput {
        match self.focus {
            Field::Name if !c.is_control() => {
                if self.name.len() < NAME_MAX {
                    self.name.push(c);
                    self.error = None;
                    FormOutput::Ok
                } else {
                    FormOutput::Invalid
                }
            }
            Field::AllDay if c == ' ' => {
                self.toggle_all_day();
                FormOutput::Ok
            }
            Field::Start | Field::End if c.is_ascii_digit() || c == ':' => {
                let buf = if self.focus == Field::Start {
                    &mut self.start
                } else {
                    &mut self.end
                };
                if buf.len() < TIME_MAX {
                    buf.push(c);
                    self.error = None;
                    FormOutput::Ok
                } else {
                    FormOutput::Invalid
                }
            }
            Field::Color if c == ' ' => {
                self.color = self.color.next();
                FormOutput::Ok
            }
            Field::Save if c == ' ' => self.try_submit(),
            Field::Delete if c == ' ' => self.delete(),
            _ => FormOutput::Invalid,
        }
    }

    fn backspace(&mut self) -> FormOutput {
        let buf = match self.focus {
            Field::Name => &mut self.name,
            Field::Start => &mut self.start,
            Field::End => &mut self.end,
            _ => return FormOutput::Invalid,
        };
        if buf.pop().is_some() {
            self.error = None;
            FormOutput::Ok
        } else {
            FormOutput::Invalid
        }
    }

    fn toggle_all_day(&mut self) {
        self.all_day = !self.all_day;
        self.error = None;
    }

    fn activate(&mut self) -> FormOutput {
        match self.focus {
            Field::AllDay => {
                self.toggle_all_day();
                FormOutput::Ok
            }
            Field::Color => {
                self.color = self.color.next();
                FormOutput::Ok
            }
            Field::Delete => self.delete(),
            Field::Name | Field::Start | Field::End | Field::Save => self.try_submit(),
        }
    }

    fn delete(&mut self) -> FormOutput {
        match self.editing() {
            Some(id) => FormOutput::Delete { id },
            None => FormOutput::Invalid,
        }
    }

    // A failed submission keeps the form open and shows the violation; the
    // caller only sees Invalid.
    fn try_submit(&mut self) -> FormOutput {
        match self.validate() {
            Ok(draft) => FormOutput::Submit {
                id: self.editing(),
                draft,
            },
            Err(e) => {
                self.error = Some(e);
                FormOutput::Invalid
            }
        }
    }

    fn validate(&self) -> Result<EventDraft, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::NameRequired);
        }
        let time = if self.all_day {
            EventTime::AllDay
        } else {
            if self.start.is_empty() {
                return Err(FormError::StartRequired);
            }
            if self.end.is_empty() {
                return Err(FormError::EndRequired);
            }
            let start = parse_time(&self.start).ok_or(FormError::BadStart)?;
            let end = parse_time(&self.end).ok_or(FormError::BadEnd)?;
            if end <= start {
                return Err(FormError::EndBeforeStart);
            }
            EventTime::Timed { start, end }
        };
        Ok(EventDraft {
            name: name.to_owned(),
            date: self.date(),
            time,
            color: self.color,
        })
    }

    fn to_text(&self) -> Text<'static> {
        let date = self.date();
        let mut lines = vec![
            Line::styled(
                format!(
                    "{}, {} {} {}",
                    date.weekday(),
                    date.month(),
                    date.day(),
                    date.year()
                ),
                DATE_STYLE,
            ),
            Line::raw(""),
            self.text_field("Name", &self.name, Field::Name),
            self.check_field(),
            self.text_field("Start", &self.start, Field::Start),
            self.text_field("End", &self.end, Field::End),
            self.color_field(),
            Line::raw(""),
            self.buttons(),
        ];
        if let Some(e) = &self.error {
            lines.push(Line::styled(format!(" {e}"), ERROR_STYLE));
        }
        Text::from(lines)
    }

    fn text_field(&self, label: &'static str, value: &str, field: Field) -> Line<'static> {
        let disabled = self.all_day && matches!(field, Field::Start | Field::End);
        let placeholder = match field {
            Field::Name => "(name)",
            _ => "HH:MM",
        };
        let mut style = if value.is_empty() || disabled {
            PLACEHOLDER_STYLE
        } else {
            BASE_STYLE
        };
        if self.focus == field {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let shown = if value.is_empty() {
            placeholder.to_owned()
        } else {
            value.to_owned()
        };
        Line::from_iter([
            Span::styled(format!(" {label:<8}"), LABEL_STYLE),
            Span::styled(shown, style),
        ])
    }

    fn check_field(&self) -> Line<'static> {
        let mut style = BASE_STYLE;
        if self.focus == Field::AllDay {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Line::from_iter([
            Span::styled(format!(" {:<8}", "All day"), LABEL_STYLE),
            Span::styled(if self.all_day { "[x]" } else { "[ ]" }, style),
        ])
    }

    fn color_field(&self) -> Line<'static> {
        let mut style = self.color.style();
        if self.focus == Field::Color {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Line::from_iter([
            Span::styled(format!(" {:<8}", "Color"), LABEL_STYLE),
            Span::styled(format!("< {} >", self.color.label()), style),
        ])
    }

    fn buttons(&self) -> Line<'static> {
        let save_style = if self.focus == Field::Save {
            FOCUS_STYLE
        } else {
            BASE_STYLE
        };
        let mut spans = vec![Span::styled("[ Save ]", save_style)];
        if self.editing().is_some() {
            let delete_style = if self.focus == Field::Delete {
                FOCUS_STYLE
            } else {
                BASE_STYLE
            };
            spans.push(Span::styled("  ", BASE_STYLE));
            spans.push(Span::styled("[ Delete ]", delete_style));
        }
        Line::from_iter(spans).centered()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FormInput {
    Char(char),
    Backspace,
    NextField,
    PrevField,
    Previous,
    Next,
    Activate,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum FormOutput {
    Ok,
    Invalid,
    Submit {
        id: Option<EventId>,
        draft: EventDraft,
    },
    Delete {
        id: EventId,
    },
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum FormError {
    #[error("a name is required")]
    NameRequired,
    #[error("a start time is required")]
    StartRequired,
    #[error("an end time is required")]
    EndRequired,
    #[error("start time must look like HH:MM")]
    BadStart,
    #[error("end time must look like HH:MM")]
    BadEnd,
    #[error("end time must come after the start time")]
    EndBeforeStart,
}

fn show_time(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

fn parse_time(s: &str) -> Option<Time> {
    let (hour, minute) = s.split_once(':')?;
    let hour = hour.parse().ok()?;
    let minute = minute.parse().ok()?;
    Time::from_hms(hour, minute, 0).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventStore;
    use time::macros::{date, time};

    const DAY: Date = date!(2023 - 03 - 15);

    fn type_text(state: &mut EventFormState, text: &str) {
        for c in text.chars() {
            assert_eq!(state.handle_input(FormInput::Char(c)), FormOutput::Ok);
        }
    }

    fn lunch_event(store: &mut EventStore) -> Event {
        let id = store.add(EventDraft {
            name: "Lunch".into(),
            date: date!(2023 - 03 - 10),
            time: EventTime::Timed {
                start: time!(12:00),
                end: time!(13:00),
            },
            color: EventColor::Red,
        });
        store
            .events()
            .iter()
            .find(|event| event.id() == id)
            .expect("the store should hold the event it just added")
            .clone()
    }

    #[test]
    fn test_create_all_day_event() {
        let mut state = EventFormState::for_new_event(DAY);
        type_text(&mut state, "Team sync");
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        assert_eq!(state.handle_input(FormInput::Char(' ')), FormOutput::Ok);
        // On to the save button, past the now-hidden time fields.
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        assert_eq!(state.focus, Field::Save);
        let output = state.handle_input(FormInput::Activate);
        assert_eq!(
            output,
            FormOutput::Submit {
                id: None,
                draft: EventDraft {
                    name: "Team sync".into(),
                    date: DAY,
                    time: EventTime::AllDay,
                    color: EventColor::Blue,
                },
            }
        );
    }

    #[test]
    fn test_create_timed_event() {
        let mut state = EventFormState::for_new_event(DAY);
        type_text(&mut state, "Standup");
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        type_text(&mut state, "09:00");
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        type_text(&mut state, "09:15");
        let output = state.handle_input(FormInput::Activate);
        assert_eq!(
            output,
            FormOutput::Submit {
                id: None,
                draft: EventDraft {
                    name: "Standup".into(),
                    date: DAY,
                    time: EventTime::Timed {
                        start: time!(09:00),
                        end: time!(09:15),
                    },
                    color: EventColor::Blue,
                },
            }
        );
    }

    #[test]
    fn test_blank_name_blocks_submission() {
        let mut state = EventFormState::for_new_event(DAY);
        assert_eq!(state.handle_input(FormInput::Activate), FormOutput::Invalid);
        assert_eq!(state.error, Some(FormError::NameRequired));
    }

    #[test]
    fn test_missing_times_block_submission() {
        let mut state = EventFormState::for_new_event(DAY);
        type_text(&mut state, "Standup");
        assert_eq!(state.handle_input(FormInput::Activate), FormOutput::Invalid);
        assert_eq!(state.error, Some(FormError::StartRequired));
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        type_text(&mut state, "09:00");
        assert_eq!(state.handle_input(FormInput::Activate), FormOutput::Invalid);
        assert_eq!(state.error, Some(FormError::EndRequired));
    }

    #[test]
    fn test_malformed_time_blocks_submission() {
        let mut state = EventFormState::for_new_event(DAY);
        type_text(&mut state, "Standup");
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        type_text(&mut state, "99:00");
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        type_text(&mut state, "10:00");
        assert_eq!(state.handle_input(FormInput::Activate), FormOutput::Invalid);
        assert_eq!(state.error, Some(FormError::BadStart));
    }

    #[test]
    fn test_end_must_follow_start() {
        let mut state = EventFormState::for_new_event(DAY);
        type_text(&mut state, "Standup");
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        type_text(&mut state, "10:00");
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        type_text(&mut state, "10:00");
        assert_eq!(state.handle_input(FormInput::Activate), FormOutput::Invalid);
        assert_eq!(state.error, Some(FormError::EndBeforeStart));
    }

    #[test]
    fn test_all_day_skips_the_time_fields() {
        let mut state = EventFormState::for_new_event(DAY);
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        assert_eq!(state.focus, Field::AllDay);
        assert_eq!(state.handle_input(FormInput::Char(' ')), FormOutput::Ok);
        assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        assert_eq!(state.focus, Field::Color);
    }

    #[test]
    fn test_edit_mode_is_prefilled() {
        let mut store = EventStore::new();
        let event = lunch_event(&mut store);
        let state = EventFormState::for_event(&event);
        assert_eq!(state.name, "Lunch");
        assert!(!state.all_day);
        assert_eq!(state.start, "12:00");
        assert_eq!(state.end, "13:00");
        assert_eq!(state.color, EventColor::Red);
        assert_eq!(state.editing(), Some(event.id()));
    }

    #[test]
    fn test_delete_fires_once_and_never_submits() {
        let mut store = EventStore::new();
        let event = lunch_event(&mut store);
        let mut state = EventFormState::for_event(&event);
        // Name, all day, start, end, color, save, then delete.
        for _ in 0..6 {
            assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        }
        assert_eq!(state.focus, Field::Delete);
        assert_eq!(
            state.handle_input(FormInput::Activate),
            FormOutput::Delete { id: event.id() }
        );
    }

    #[test]
    fn test_create_mode_has_no_delete_button() {
        let mut state = EventFormState::for_new_event(DAY);
        for _ in 0..6 {
            assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        }
        // The ring wraps back around without ever reaching a delete field.
        assert_eq!(state.focus, Field::Name);
    }

    #[test]
    fn test_color_cycling() {
        let mut state = EventFormState::for_new_event(DAY);
        for _ in 0..4 {
            assert_eq!(state.handle_input(FormInput::NextField), FormOutput::Ok);
        }
        assert_eq!(state.focus, Field::Color);
        assert_eq!(state.handle_input(FormInput::Next), FormOutput::Ok);
        assert_eq!(state.color, EventColor::Red);
        assert_eq!(state.handle_input(FormInput::Previous), FormOutput::Ok);
        assert_eq!(state.color, EventColor::Blue);
        assert_eq!(state.handle_input(FormInput::Previous), FormOutput::Ok);
        assert_eq!(state.color, EventColor::Green);
    }

    #[test]
    fn test_typing_clears_the_error() {
        let mut state = EventFormState::for_new_event(DAY);
        assert_eq!(state.handle_input(FormInput::Activate), FormOutput::Invalid);
        assert_eq!(state.error, Some(FormError::NameRequired));
        assert_eq!(state.handle_input(FormInput::Char('x')), FormOutput::Ok);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_render_records_the_modal_region() {
        let mut state = EventFormState::for_new_event(DAY);
        let area = Rect::new(0, 0, 60, 20);
        let mut buffer = Buffer::empty(area);
        EventForm.render(area, &mut buffer, &mut state);
        let region = state.area();
        assert_ne!(region, Rect::ZERO);
        assert!(region.width < area.width);
        assert!(region.height < area.height);
    }
}
