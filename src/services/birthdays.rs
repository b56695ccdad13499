//! Next-occurrence birthday arithmetic for the upcoming-birthdays query.

use chrono::{Datelike, NaiveDate};

/// The next occurrence of `birthday` on or after `today`, wrapping to next
/// year once this year's date has passed. A Feb-29 birthday lands on Mar-1
/// in non-leap years.
pub fn next_occurrence(birthday: NaiveDate, today: NaiveDate) -> NaiveDate {
    let occurrence_in = |year: i32| {
        birthday
            .with_year(year)
            .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
            .unwrap_or(today)
    };

    let this_year = occurrence_in(today.year());
    if this_year < today {
        occurrence_in(today.year() + 1)
    } else {
        this_year
    }
}

/// True when the next occurrence of `birthday` is at most `days` days away.
pub fn upcoming_within(birthday: NaiveDate, today: NaiveDate, days: i64) -> bool {
    let until = (next_occurrence(birthday, today) - today).num_days();
    (0..=days).contains(&until)
}
