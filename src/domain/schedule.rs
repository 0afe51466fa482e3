//! Contribution schedules: frequency → calendar interval → dated sequence.
//!
//! Interval arithmetic is calendar-aware. Adding one month to Jan 31 lands
//! on the last day of February, and each step is applied to the previous
//! step's result.

use chrono::{Days, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Days,
    Weeks,
    Fortnights,
    Months,
    Quarters,
    Years,
}

impl Frequency {
    pub const ALL: [Frequency; 6] = [
        Frequency::Days,
        Frequency::Weeks,
        Frequency::Fortnights,
        Frequency::Months,
        Frequency::Quarters,
        Frequency::Years,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Frequency::Days => "days",
            Frequency::Weeks => "weeks",
            Frequency::Fortnights => "fortnights",
            Frequency::Months => "months",
            Frequency::Quarters => "quarters",
            Frequency::Years => "years",
        }
    }

    pub fn interval(&self) -> ScheduleInterval {
        let zero = ScheduleInterval::default();
        match self {
            Frequency::Days => ScheduleInterval { days: 1, ..zero },
            Frequency::Weeks => ScheduleInterval { weeks: 1, ..zero },
            Frequency::Fortnights => ScheduleInterval { weeks: 2, ..zero },
            Frequency::Months => ScheduleInterval { months: 1, ..zero },
            Frequency::Quarters => ScheduleInterval { months: 3, ..zero },
            Frequency::Years => ScheduleInterval { years: 1, ..zero },
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Frequency::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| format!("unknown frequency '{s}'"))
    }
}

/// A calendar step. Built from a [`Frequency`], exactly one field is non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleInterval {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
}

impl ScheduleInterval {
    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.weeks == 0 && self.days == 0
    }

    /// Months first (clamping to month end), then whole days. `None` on overflow.
    pub fn add_to(&self, date: NaiveDate) -> Option<NaiveDate> {
        let months = self.years.checked_mul(12)?.checked_add(self.months)?;
        let days = u64::from(self.weeks) * 7 + u64::from(self.days);
        date.checked_add_months(Months::new(months))?
            .checked_add_days(Days::new(days))
    }
}

/// Map a frequency name onto its interval; unknown names give the zero interval.
pub fn frequency_to_interval(frequency: &str) -> ScheduleInterval {
    frequency
        .parse::<Frequency>()
        .map(|f| f.interval())
        .unwrap_or_default()
}

/// Dates from `start` (or one step after it) up to and including `end`.
///
/// A zero interval cannot advance: it yields `[start]` when the first date is
/// kept and nothing when it is skipped.
pub fn build_schedule(
    start: NaiveDate,
    end: NaiveDate,
    interval: ScheduleInterval,
    skip_first: bool,
) -> Vec<NaiveDate> {
    if interval.is_zero() {
        return if !skip_first && start <= end {
            vec![start]
        } else {
            Vec::new()
        };
    }

    let mut schedule = Vec::new();
    let mut next = if skip_first {
        interval.add_to(start)
    } else {
        Some(start)
    };

    while let Some(date) = next {
        if date > end {
            break;
        }
        schedule.push(date);
        next = interval.add_to(date);
    }

    schedule
}
