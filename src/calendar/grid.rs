use std::iter::successors;
use time::{Date, Month, Weekday};

/// Every date shown when `month`'s month is selected: whole weeks, from the
/// `week_start` on or before the first of the month through the day before
/// the following `week_start` after the last.
///
/// The result length is a positive multiple of seven, ascending, and any two
/// dates in the same month produce the same grid.
pub(super) fn visible_days(month: Date, week_start: Weekday) -> Vec<Date> {
    let start = week_start_on_or_before(first_of_month(month), week_start);
    let end = week_end_on_or_after(last_of_month(month), week_start);
    successors(Some(start), |&d| d.next_day())
        .take_while(|&d| d <= end)
        .collect()
}

pub(super) fn first_of_month(date: Date) -> Date {
    let mut day = date;
    while let Some(yesterday) = day.previous_day() {
        if yesterday.month() != day.month() {
            break;
        }
        day = yesterday;
    }
    day
}

pub(super) fn last_of_month(date: Date) -> Date {
    let mut day = date;
    while let Some(tomorrow) = day.next_day() {
        if tomorrow.month() != day.month() {
            break;
        }
        day = tomorrow;
    }
    day
}

/// Shifts `date` by whole months, clamping the day of month, so one month
/// after January 31 is the last day of February.  Returns `None` past either
/// end of the representable date range.
pub(super) fn add_months(date: Date, delta: i32) -> Option<Date> {
    let months =
        i64::from(date.year()) * 12 + i64::from(u8::from(date.month())) - 1 + i64::from(delta);
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = Month::try_from(u8::try_from(months.rem_euclid(12) + 1).ok()?).ok()?;
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let day = date.day().min(last_of_month(first).day());
    Date::from_calendar_date(year, month, day).ok()
}

fn week_start_on_or_before(date: Date, week_start: Weekday) -> Date {
    let mut day = date;
    while day.weekday() != week_start {
        let Some(yesterday) = day.previous_day() else {
            break;
        };
        day = yesterday;
    }
    day
}

fn week_end_on_or_after(date: Date, week_start: Weekday) -> Date {
    let week_end = week_start.previous();
    let mut day = date;
    while day.weekday() != week_end {
        let Some(tomorrow) = day.next_day() else {
            break;
        };
        day = tomorrow;
    }
    day
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::Weekday::{Monday, Saturday, Sunday};

    #[test]
    fn test_march_2023_sunday_weeks() {
        let days = visible_days(date!(2023 - 03 - 10), Sunday);
        assert_eq!(days.len(), 35);
        assert_eq!(days.first(), Some(&date!(2023 - 02 - 26)));
        assert_eq!(days.last(), Some(&date!(2023 - 04 - 01)));
    }

    #[test]
    fn test_march_2023_monday_weeks() {
        let days = visible_days(date!(2023 - 03 - 10), Monday);
        assert_eq!(days.len(), 35);
        assert_eq!(days.first(), Some(&date!(2023 - 02 - 27)));
        assert_eq!(days.last(), Some(&date!(2023 - 04 - 02)));
    }

    #[test]
    fn test_grids_are_whole_weeks() {
        let months = [
            date!(2023 - 01 - 01),
            date!(2023 - 02 - 14),
            date!(2024 - 02 - 29),
            date!(2025 - 12 - 31),
        ];
        for month in months {
            let days = visible_days(month, Sunday);
            assert_eq!(days.len() % 7, 0, "{month}");
            assert!(days.len() >= 28, "{month}");
            assert_eq!(days.first().map(|d| d.weekday()), Some(Sunday), "{month}");
            assert_eq!(days.last().map(|d| d.weekday()), Some(Saturday), "{month}");
            assert!(days.contains(&first_of_month(month)), "{month}");
            assert!(days.contains(&last_of_month(month)), "{month}");
        }
    }

    #[test]
    fn test_same_month_same_grid() {
        assert_eq!(
            visible_days(date!(2023 - 03 - 01), Sunday),
            visible_days(date!(2023 - 03 - 31), Sunday)
        );
    }

    #[test]
    fn test_grid_is_ascending() {
        let days = visible_days(date!(2023 - 03 - 10), Sunday);
        assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_first_and_last_of_month() {
        assert_eq!(first_of_month(date!(2023 - 03 - 10)), date!(2023 - 03 - 01));
        assert_eq!(last_of_month(date!(2023 - 03 - 10)), date!(2023 - 03 - 31));
        assert_eq!(last_of_month(date!(2024 - 02 - 01)), date!(2024 - 02 - 29));
        assert_eq!(last_of_month(date!(2023 - 02 - 01)), date!(2023 - 02 - 28));
    }

    #[test]
    fn test_add_months_clamps_the_day() {
        assert_eq!(
            add_months(date!(2023 - 01 - 31), 1),
            Some(date!(2023 - 02 - 28))
        );
        assert_eq!(
            add_months(date!(2024 - 01 - 31), 1),
            Some(date!(2024 - 02 - 29))
        );
        assert_eq!(
            add_months(date!(2023 - 03 - 31), -1),
            Some(date!(2023 - 02 - 28))
        );
    }

    #[test]
    fn test_add_months_crosses_years() {
        assert_eq!(
            add_months(date!(2023 - 12 - 15), 1),
            Some(date!(2024 - 01 - 15))
        );
        assert_eq!(
            add_months(date!(2023 - 01 - 15), -1),
            Some(date!(2022 - 12 - 15))
        );
        assert_eq!(
            add_months(date!(2023 - 06 - 15), 18),
            Some(date!(2024 - 12 - 15))
        );
    }

    #[test]
    fn test_add_months_stops_at_the_end_of_time() {
        assert_eq!(add_months(date!(9999 - 12 - 01), 1), None);
        assert_eq!(add_months(date!(-9999 - 01 - 31), -1), None);
    }
}
