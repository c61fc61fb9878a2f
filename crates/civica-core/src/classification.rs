//! Age-based beneficiary classification.
//!
//! Pure functions of (birth date, current date). Age is counted in whole
//! years: one year is subtracted when the current (month, day) comes
//! before the birthday's (month, day).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CivicaError, CivicaResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum AgeCategory {
    /// Under 12.
    Child,
    /// 12 to 17.
    Adolescent,
    /// 18 to 64.
    Adult,
    /// 65 and over.
    Senior,
}

impl AgeCategory {
    pub fn from_age(years: u32) -> Self {
        match years {
            0..=11 => Self::Child,
            12..=17 => Self::Adolescent,
            18..=64 => Self::Adult,
            _ => Self::Senior,
        }
    }

    pub fn classify(birth_date: NaiveDate, today: NaiveDate) -> CivicaResult<Self> {
        age_in_years(birth_date, today).map(Self::from_age)
    }
}

/// Whole years between `birth_date` and `today`.
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> CivicaResult<u32> {
    if birth_date > today {
        return Err(CivicaError::validation(format!(
            "birth date {birth_date} is in the future"
        )));
    }
    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    // Non-negative: birth_date <= today.
    Ok(years as u32)
}
