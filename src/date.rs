//! Calendar-independant date.

use std::ops::{Add, RangeInclusive, Sub};

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};
use crate::sexagenary::StemBranch;

/// Gregorian years for which calendar conversion, solar terms and pillars are
/// available.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=2100;

/// A calendar-independant date.
///
/// Supported range begins from January 1, 4713 BC, proleptic Julian calendar.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Date {
    jdn: u32,
}

impl Date {
    /// Creates a `Date` with a Julian day number (JDN).
    pub fn from_jdn(jdn: u32) -> Self {
        Self { jdn }
    }
    /// Returns the Julian day number (JDN) of the date.
    pub fn jdn(&self) -> u32 {
        self.jdn
    }

    /// Creates a `Date` with a Gregorian calendar date.
    ///
    /// `year` should be an astronomical year number, i.e. 1 BC is `0`, 2
    /// BC is `-1`, etc.
    ///
    /// Returns `None` if the result date is out of supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use manseryeok::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!(2451545, date.jdn());
    /// ```
    pub fn from_gregorian(year: i32, month: i32, day: i32) -> Option<Self> {
        let (y, m, d) = (year, month, day);
        u32::try_from(
            (1461 * (y + 4800 + (m - 14) / 12)) / 4 + (367 * (m - 2 - 12 * ((m - 14) / 12))) / 12
                - (3 * ((y + 4900 + (m - 14) / 12) / 100)) / 4
                + d
                - 32075,
        )
        .map(Self::from_jdn)
        .ok()
    }
    /// Represents the date in Gregorian calendar.
    ///
    /// Returns in `(year, month, day)` format.
    ///
    /// # Example
    ///
    /// ```
    /// use manseryeok::Date;
    ///
    /// let date = Date::from_jdn(2451545);
    /// assert_eq!((2000, 1, 1), date.gregorian());
    /// ```
    pub fn gregorian(&self) -> (i32, i32, i32) {
        let jdn = i32::try_from(self.jdn).expect("jdn >= 2**31 not supported");
        let f = jdn + 1401 + (((4 * jdn + 274277) / 146097) * 3) / 4 - 38;
        let e = 4 * f + 3;
        let g = (e % 1461) / 4;
        let h = 5 * g + 2;
        let day = (h % 153) / 5 + 1;
        let month = (h / 153 + 2) % 12 + 1;
        let year = e / 1461 - 4716 + (12 + 2 - month) / 12;
        (year, month, day)
    }
    /// Formats the date in ISO 8601 format.
    ///
    /// # Example
    ///
    /// ```
    /// use manseryeok::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!("2000-01-01", date.iso_gregorian());
    /// ```
    pub fn iso_gregorian(&self) -> String {
        let (y, m, d) = self.gregorian();
        format!("{:04}-{:02}-{:02}", y, m, d)
    }

    /// Converts a chrono date. Returns `None` before the start of the Julian
    /// period.
    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        Self::from_gregorian(date.year(), date.month() as i32, date.day() as i32)
    }
    /// Converts into a chrono date.
    pub fn to_naive(&self) -> Option<NaiveDate> {
        let (y, m, d) = self.gregorian();
        NaiveDate::from_ymd_opt(y, m as u32, d as u32)
    }

    /// Returns `self` if its Gregorian year is in [`SUPPORTED_YEARS`].
    pub fn within_era(self) -> Result<Self> {
        let year = self.gregorian().0;
        if SUPPORTED_YEARS.contains(&year) {
            Ok(self)
        } else {
            Err(Error::UnsupportedDateRange { year })
        }
    }

    /// Returns the sexagenary day of the date.
    ///
    /// The day cycle runs continuously from the start of the Julian period
    /// and ignores every calendar irregularity.
    ///
    /// # Example
    ///
    /// ```
    /// use manseryeok::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!("戊午", date.sexagenary().to_string());
    /// ```
    pub fn sexagenary(&self) -> StemBranch {
        StemBranch::from_index(((self.jdn + 49) % 60) as u8)
    }
}

impl Add<i32> for Date {
    type Output = Date;
    fn add(self, rhs: i32) -> Self::Output {
        Date::from_jdn(if rhs >= 0 {
            self.jdn + rhs as u32
        } else {
            self.jdn - rhs.wrapping_neg() as u32
        })
    }
}
impl Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> Self::Output {
        self.jdn as i32 - rhs.jdn as i32
    }
}
