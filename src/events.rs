use crate::theme::{BLUE_EVENT_STYLE, GREEN_EVENT_STYLE, RED_EVENT_STYLE};
use ratatui::style::Style;
use std::fmt;
use thiserror::Error;
use time::{Date, Time};
use uuid::Uuid;

/// Opaque event identifier, generated by the store on creation and immutable
/// afterwards.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct EventId(Uuid);

impl EventId {
    fn generate() -> EventId {
        EventId(Uuid::new_v4())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EventColor {
    Blue,
    Red,
    Green,
}

impl EventColor {
    pub(crate) fn label(self) -> &'static str {
        match self {
            EventColor::Blue => "Blue",
            EventColor::Red => "Red",
            EventColor::Green => "Green",
        }
    }

    pub(crate) fn style(self) -> Style {
        match self {
            EventColor::Blue => BLUE_EVENT_STYLE,
            EventColor::Red => RED_EVENT_STYLE,
            EventColor::Green => GREEN_EVENT_STYLE,
        }
    }

    pub(crate) fn next(self) -> EventColor {
        match self {
            EventColor::Blue => EventColor::Red,
            EventColor::Red => EventColor::Green,
            EventColor::Green => EventColor::Blue,
        }
    }

    pub(crate) fn previous(self) -> EventColor {
        self.next().next()
    }
}

/// Whether an event covers its whole day or a start/end range.  A timed
/// event carries both endpoints by construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EventTime {
    AllDay,
    Timed { start: Time, end: Time },
}

/// Everything a caller supplies for an event; the store attaches the id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EventDraft {
    pub(crate) name: String,
    pub(crate) date: Date,
    pub(crate) time: EventTime,
    pub(crate) color: EventColor,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Event {
    id: EventId,
    pub(crate) name: String,
    pub(crate) date: Date,
    pub(crate) time: EventTime,
    pub(crate) color: EventColor,
}

impl Event {
    fn from_draft(id: EventId, draft: EventDraft) -> Event {
        Event {
            id,
            name: draft.name,
            date: draft.date,
            time: draft.time,
            color: draft.color,
        }
    }

    pub(crate) fn id(&self) -> EventId {
        self.id
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("no event with id {0}")]
pub(crate) struct UnknownEvent(pub(crate) EventId);

/// In-memory event collection.  Insertion order is preserved by every
/// operation; readers group by date via [`EventStore::on_date`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub(crate) fn new() -> EventStore {
        EventStore::default()
    }

    pub(crate) fn events(&self) -> &[Event] {
        &self.events
    }

    pub(crate) fn add(&mut self, draft: EventDraft) -> EventId {
        let id = EventId::generate();
        self.events.push(Event::from_draft(id, draft));
        id
    }

    /// Replaces the whole record for `id`; there are no partial updates.
    pub(crate) fn update(&mut self, id: EventId, draft: EventDraft) -> Result<(), UnknownEvent> {
        let Some(idx) = self.events.iter().position(|event| event.id == id) else {
            return Err(UnknownEvent(id));
        };
        self.events[idx] = Event::from_draft(id, draft);
        Ok(())
    }

    pub(crate) fn remove(&mut self, id: EventId) -> Result<(), UnknownEvent> {
        let Some(idx) = self.events.iter().position(|event| event.id == id) else {
            return Err(UnknownEvent(id));
        };
        self.events.remove(idx);
        Ok(())
    }

    /// A day's events: all-day entries first, then by start time, ties in
    /// insertion order.
    pub(crate) fn on_date(&self, date: Date) -> Vec<&Event> {
        let mut events = self
            .events
            .iter()
            .filter(|event| event.date == date)
            .collect::<Vec<_>>();
        events.sort_by_key(|event| match event.time {
            EventTime::AllDay => (false, Time::MIDNIGHT),
            EventTime::Timed { start, .. } => (true, start),
        });
        events
    }
}
