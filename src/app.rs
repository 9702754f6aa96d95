use crate::calendar::{MonthState, MonthView};
use crate::events::EventStore;
use crate::form::{EventForm, EventFormState, FormInput, FormOutput};
use crate::help::Help;
use crate::theme::BASE_STYLE;
use crossterm::event::{
    read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Position, Rect},
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::{Date, Weekday};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    today: Date,
    store: EventStore,
    view: MonthState,
    state: AppState,
}

impl App {
    pub(crate) fn new(today: Date, week_start: Weekday) -> App {
        App {
            today,
            store: EventStore::new(),
            view: MonthState::new(today, week_start),
            state: AppState::Browsing,
        }
    }

    pub(crate) fn start_date(mut self, date: Date) -> App {
        self.view.goto(date);
        self
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        match read()? {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                    self.state = AppState::Quitting;
                } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                    self.beep()?;
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                if !self.handle_click(Position::new(column, row)) {
                    self.beep()?;
                }
            }
            // Redraw on resize, and we might as well redraw on other stuff
            // too
            _ => (),
        }
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Browsing => match key {
                KeyCode::Char('h') | KeyCode::Left => self.view.move_cursor(-1),
                KeyCode::Char('l') | KeyCode::Right => self.view.move_cursor(1),
                KeyCode::Char('k') | KeyCode::Up => self.view.move_cursor(-7),
                KeyCode::Char('j') | KeyCode::Down => self.view.move_cursor(7),
                KeyCode::Char('p') | KeyCode::PageUp => self.view.shift_month(-1),
                KeyCode::Char('n') | KeyCode::PageDown => self.view.shift_month(1),
                KeyCode::Char('t') | KeyCode::Home => {
                    self.view.goto(self.today);
                    true
                }
                KeyCode::Char('a') | KeyCode::Enter => {
                    self.state = AppState::Form(EventFormState::for_new_event(self.view.cursor()));
                    true
                }
                KeyCode::Tab => {
                    let count = self.store.on_date(self.view.cursor()).len();
                    self.view.select_next_event(count)
                }
                KeyCode::BackTab => {
                    let count = self.store.on_date(self.view.cursor()).len();
                    self.view.select_previous_event(count)
                }
                KeyCode::Char('e') => self.edit_selected(),
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Browsing;
                true
            }
            AppState::Form(form) => {
                if key == KeyCode::Esc {
                    self.state = AppState::Browsing;
                    return true;
                }
                let Some(input) = form_input(key) else {
                    return false;
                };
                match form.handle_input(input) {
                    FormOutput::Ok => true,
                    FormOutput::Invalid => false,
                    FormOutput::Submit { id, draft } => {
                        let ok = match id {
                            Some(id) => self.store.update(id, draft).is_ok(),
                            None => {
                                self.store.add(draft);
                                true
                            }
                        };
                        self.state = AppState::Browsing;
                        ok
                    }
                    FormOutput::Delete { id } => {
                        let ok = self.store.remove(id).is_ok();
                        self.state = AppState::Browsing;
                        ok
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    // Returns `false` if the click landed on nothing interactive
    fn handle_click(&mut self, position: Position) -> bool {
        match &self.state {
            AppState::Browsing => match self.view.day_at(position) {
                Some(date) => {
                    self.view.goto_visible(date);
                    true
                }
                None => false,
            },
            AppState::Form(form) => {
                if !form.area().contains(position) {
                    self.state = AppState::Browsing;
                }
                true
            }
            AppState::Helping => {
                self.state = AppState::Browsing;
                true
            }
            AppState::Quitting => true,
        }
    }

    fn edit_selected(&mut self) -> bool {
        let events = self.store.on_date(self.view.cursor());
        let Some(&event) = events.get(self.view.selected_event()) else {
            return false;
        };
        let form = EventFormState::for_event(event);
        self.state = AppState::Form(form);
        true
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let view = MonthView {
            store: &self.store,
            today: self.today,
        };
        view.render(area, buf, &mut self.view);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Form(ref mut form) = self.state {
            EventForm.render(area, buf, form);
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Browsing,
    Form(EventFormState),
    Helping,
    Quitting,
}

fn form_input(key: KeyCode) -> Option<FormInput> {
    match key {
        KeyCode::Char(c) => Some(FormInput::Char(c)),
        KeyCode::Backspace | KeyCode::Delete => Some(FormInput::Backspace),
        KeyCode::Tab | KeyCode::Down => Some(FormInput::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(FormInput::PrevField),
        KeyCode::Left => Some(FormInput::Previous),
        KeyCode::Right => Some(FormInput::Next),
        KeyCode::Enter => Some(FormInput::Activate),
        _ => None,
    }
}
