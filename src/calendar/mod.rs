mod cell;
mod grid;
mod state;
mod widget;
pub(crate) use self::state::MonthState;
pub(crate) use self::widget::MonthView;
