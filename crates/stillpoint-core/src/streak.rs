//! Calendar-day streak arithmetic.
//!
//! Everything here works on `NaiveDate` values that the clock port has
//! already projected into the user's timezone. Raw epoch gaps never decide
//! a streak: 23:50 and 00:10 are a day apart, 00:10 and 20:10 are not.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakStep {
    /// No earlier session on record
    First,
    SameDay,
    NextDay,
    /// A gap of two or more days, or a date before the last one
    Broken,
}

pub fn classify(last: Option<NaiveDate>, date: NaiveDate) -> StreakStep {
    let Some(last) = last else {
        return StreakStep::First;
    };
    match (date - last).num_days() {
        0 => StreakStep::SameDay,
        1 => StreakStep::NextDay,
        _ => StreakStep::Broken,
    }
}

/// Streak value after a session on `date`.
pub fn advance(current: u32, last: Option<NaiveDate>, date: NaiveDate) -> u32 {
    match classify(last, date) {
        StreakStep::SameDay => current,
        StreakStep::NextDay => current.saturating_add(1),
        StreakStep::First | StreakStep::Broken => 1,
    }
}

/// Longest run of consecutive days in a chronologically ordered sequence.
pub fn longest_run<I>(dates: I) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        run = match classify(previous, date) {
            StreakStep::First => 1,
            StreakStep::SameDay => run,
            StreakStep::NextDay => run + 1,
            StreakStep::Broken => {
                longest = longest.max(run);
                1
            }
        };
        previous = Some(date);
    }
    longest.max(run)
}
