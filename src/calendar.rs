//! Month grid arithmetic for the calendar view.

use chrono::{Datelike, Days, Months, NaiveDate};

pub type Week = [Option<NaiveDate>; 7];

/// Weeks of the month containing `date`, Sunday first. Days outside the month
/// are `None`.
pub fn month_grid(date: NaiveDate) -> Vec<Week> {
    let Some(first) = date.with_day(1) else {
        return Vec::new();
    };
    let offset = first.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(first);

    let mut weeks = Vec::new();
    let mut week: Week = [None; 7];
    let mut column = offset;
    for day in 0..days {
        week[column] = first.checked_add_days(Days::new(u64::from(day)));
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [None; 7];
            column = 0;
        }
    }
    if column != 0 {
        weeks.push(week);
    }
    weeks
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let Some(first) = date.with_day(1) else {
        return 0;
    };
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Moves by whole months, clamping the day to the target month's length.
pub fn shift_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

/// Moves by days, staying put at the ends of chrono's range.
pub fn shift_days(date: NaiveDate, delta: i64) -> NaiveDate {
    let days = Days::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    };
    shifted.unwrap_or(date)
}
