//! Birth profile: the input every chart is computed from.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::date::Date;
use crate::error::{Error, Result};
use crate::lunisolar::{LunarDate, Month};

/// Local time substituted when the birth time is unknown.
pub const NOON: NaiveTime = match NaiveTime::from_hms_opt(12, 0, 0) {
    Some(t) => t,
    None => unreachable!(),
};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn is_female(self) -> bool {
        self == Gender::Female
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CalendarKind {
    Solar,
    Lunar,
}

/// A birth date in either calendar.
///
/// Only lunisolar dates carry a leap month flag, inside [`Month`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CalendarDate {
    Solar(NaiveDate),
    Lunar(LunarDate),
}

impl CalendarDate {
    pub fn kind(&self) -> CalendarKind {
        match self {
            CalendarDate::Solar(_) => CalendarKind::Solar,
            CalendarDate::Lunar(_) => CalendarKind::Lunar,
        }
    }
}

/// When, where (as a UTC offset) and to whom a birth happened.
///
/// `time` is `None` when the birth time is unknown; the chart is then
/// computed at local noon and has no hour pillar.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BirthProfile {
    pub date: CalendarDate,
    pub time: Option<NaiveTime>,
    pub gender: Gender,
    pub offset: FixedOffset,
}

impl BirthProfile {
    pub fn solar(
        date: NaiveDate,
        time: Option<NaiveTime>,
        gender: Gender,
        offset: FixedOffset,
    ) -> Self {
        Self {
            date: CalendarDate::Solar(date),
            time,
            gender,
            offset,
        }
    }

    pub fn lunar(
        date: LunarDate,
        time: Option<NaiveTime>,
        gender: Gender,
        offset: FixedOffset,
    ) -> Self {
        Self {
            date: CalendarDate::Lunar(date),
            time,
            gender,
            offset,
        }
    }

    /// Builds a profile from form-style text fields.
    ///
    /// `date` is `YYYY-MM-DD` in the chosen calendar, `time` is `HH:MM` or
    /// `unknown` (an empty string means the same). `leap` is only accepted
    /// with [`CalendarKind::Lunar`].
    ///
    /// ```
    /// use chrono::FixedOffset;
    /// use manseryeok::profile::{BirthProfile, CalendarKind, Gender};
    ///
    /// let kst = FixedOffset::east_opt(9 * 3600).unwrap();
    /// let profile =
    ///     BirthProfile::parse("1980-07-07", "13:00", CalendarKind::Solar, false, Gender::Male, kst)
    ///         .unwrap();
    /// assert_eq!("1980-07-07T13:00:00+09:00", profile.instant().unwrap().to_rfc3339());
    ///
    /// let unknown =
    ///     BirthProfile::parse("2017-05-01", "unknown", CalendarKind::Lunar, true, Gender::Female, kst)
    ///         .unwrap();
    /// assert!(unknown.time.is_none());
    /// ```
    pub fn parse(
        date: &str,
        time: &str,
        calendar: CalendarKind,
        leap: bool,
        gender: Gender,
        offset: FixedOffset,
    ) -> Result<Self> {
        let time = parse_time(time)?;
        let date = match calendar {
            CalendarKind::Solar if leap => {
                return Err(Error::invalid_input("leap month flag given for a solar date"));
            }
            CalendarKind::Solar => CalendarDate::Solar(
                NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                    .map_err(|e| Error::invalid_input(format!("date {date:?}: {e}")))?,
            ),
            CalendarKind::Lunar => {
                let (year, month, day) = parse_ymd(date)?;
                let month = if leap {
                    Month::Leap(month)
                } else {
                    Month::Common(month)
                };
                CalendarDate::Lunar(LunarDate::new(year, month, day))
            }
        };
        Ok(Self {
            date,
            time,
            gender,
            offset,
        })
    }

    pub fn time_known(&self) -> bool {
        self.time.is_some()
    }

    /// Gregorian date of birth, converting a lunisolar date if needed.
    pub fn civil_date(&self) -> Result<NaiveDate> {
        match self.date {
            CalendarDate::Solar(date) => {
                Date::from_naive(date)
                    .ok_or_else(|| Error::invalid_input(format!("date {date} out of range")))?
                    .within_era()?;
                Ok(date)
            }
            CalendarDate::Lunar(lunar) => lunar.to_solar(),
        }
    }

    /// Local wall-clock time of birth, noon if unknown.
    pub fn local_datetime(&self) -> Result<NaiveDateTime> {
        Ok(self.civil_date()?.and_time(self.time.unwrap_or(NOON)))
    }

    /// The birth instant in the profile's offset.
    pub fn instant(&self) -> Result<DateTime<FixedOffset>> {
        let local = self.local_datetime()?;
        self.offset
            .from_local_datetime(&local)
            .single()
            .ok_or(Error::AmbiguousTime(local))
    }
}

fn parse_time(time: &str) -> Result<Option<NaiveTime>> {
    let time = time.trim();
    if time.is_empty() || time.eq_ignore_ascii_case("unknown") {
        return Ok(None);
    }
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(Some)
        .map_err(|e| Error::invalid_input(format!("time {time:?}: {e}")))
}

/// Splits `YYYY-MM-DD` without checking the numbers against any calendar.
fn parse_ymd(date: &str) -> Result<(i32, u32, u32)> {
    let invalid = || Error::invalid_input(format!("date {date:?} is not YYYY-MM-DD"));
    let mut parts = date.trim().splitn(3, '-');
    let mut next = || parts.next().ok_or_else(invalid);
    let year = next()?.parse().map_err(|_| invalid())?;
    let month = next()?.parse().map_err(|_| invalid())?;
    let day = next()?.parse().map_err(|_| invalid())?;
    Ok((year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn parse_solar() {
        let profile =
            BirthProfile::parse("1980-07-07", "13:00", CalendarKind::Solar, false, Gender::Male, kst())
                .unwrap();
        assert_eq!(
            CalendarDate::Solar(NaiveDate::from_ymd_opt(1980, 7, 7).unwrap()),
            profile.date
        );
        assert_eq!(NaiveTime::from_hms_opt(13, 0, 0), profile.time);
        assert!(profile.time_known());
    }

    #[test]
    fn parse_lunar() {
        let profile =
            BirthProfile::parse("2017-05-01", "", CalendarKind::Lunar, true, Gender::Female, kst())
                .unwrap();
        assert_eq!(CalendarKind::Lunar, profile.date.kind());
        assert!(!profile.time_known());
        assert_eq!(
            NaiveDate::from_ymd_opt(2017, 6, 24).unwrap(),
            profile.civil_date().unwrap()
        );
        assert_eq!(
            "2017-06-24T12:00:00+09:00",
            profile.instant().unwrap().to_rfc3339()
        );
    }

    #[test]
    fn rejects_bad_input() {
        let cases = [
            ("1980-07-07", "13:00", CalendarKind::Solar, true),
            ("1980-02-30", "13:00", CalendarKind::Solar, false),
            ("1980/07/07", "13:00", CalendarKind::Lunar, false),
            ("1980-07-07", "25:00", CalendarKind::Solar, false),
            ("1980-07-07", "noon", CalendarKind::Solar, false),
        ];
        for (date, time, calendar, leap) in cases {
            let result = BirthProfile::parse(date, time, calendar, leap, Gender::Male, kst());
            assert!(
                matches!(result, Err(Error::InvalidInput { .. })),
                "{date} {time}: {result:?}"
            );
        }
    }

    #[test]
    fn impossible_lunar_date() {
        let profile =
            BirthProfile::parse("2017-05-30", "08:00", CalendarKind::Lunar, false, Gender::Male, kst())
                .unwrap();
        assert_eq!(
            Err(Error::InvalidCalendarDate(LunarDate::new(2017, Month::Common(5), 30))),
            profile.civil_date()
        );
    }

    #[test]
    fn outside_era() {
        let profile = BirthProfile::solar(
            NaiveDate::from_ymd_opt(1899, 12, 31).unwrap(),
            None,
            Gender::Male,
            kst(),
        );
        assert_eq!(
            Err(Error::UnsupportedDateRange { year: 1899 }),
            profile.instant()
        );
    }
}
