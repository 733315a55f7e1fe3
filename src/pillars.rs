//! The Four Pillars (四柱) of a birth instant.
//!
//! Years turn at 立春 and months at the major solar terms, both compared as
//! instants. The day is the civil date in the birth offset, except that from
//! 23:00 on the next date's 子 hour has begun and the next date's pillar is
//! used.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::date::{Date, SUPPORTED_YEARS};
use crate::error::{Error, Result};
use crate::profile::BirthProfile;
use crate::sexagenary::{Branch, Stem, StemBranch};
use crate::solar_terms::{self, SolarTerm};

/// Local hour from which the day pillar belongs to the next date.
const LATE_ZI_HOUR: u32 = 23;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FourPillars {
    pub year: StemBranch,
    pub month: StemBranch,
    pub day: StemBranch,
    /// `None` when the birth time is unknown.
    pub hour: Option<StemBranch>,
    /// Instant the pillars were computed for.
    pub instant: DateTime<FixedOffset>,
    /// Set when `instant` is local noon standing in for an unknown time.
    pub time_assumed: bool,
}

impl FourPillars {
    /// Stem of the day pillar, the Day Master (日主).
    pub fn day_master(&self) -> Stem {
        self.day.stem()
    }

    /// Year, month, day and hour pillars in that order.
    pub fn as_array(&self) -> [Option<StemBranch>; 4] {
        [Some(self.year), Some(self.month), Some(self.day), self.hour]
    }
}

/// Computes the Four Pillars of a birth.
///
/// ```
/// use chrono::{FixedOffset, NaiveDate, NaiveTime};
/// use manseryeok::pillars::four_pillars;
/// use manseryeok::profile::{BirthProfile, Gender};
///
/// let profile = BirthProfile::solar(
///     NaiveDate::from_ymd_opt(1980, 7, 7).unwrap(),
///     NaiveTime::from_hms_opt(13, 0, 0),
///     Gender::Male,
///     FixedOffset::east_opt(9 * 3600).unwrap(),
/// );
/// let pillars = four_pillars(&profile).unwrap();
/// assert_eq!("庚申", pillars.year.to_string());
/// assert_eq!("癸未", pillars.month.to_string());
/// assert_eq!("辛巳", pillars.day.to_string());
/// assert_eq!("乙未", pillars.hour.unwrap().to_string());
/// ```
pub fn four_pillars(profile: &BirthProfile) -> Result<FourPillars> {
    let instant = profile.instant()?;
    let local = instant.naive_local();
    let utc = instant.with_timezone(&Utc);

    let year = year_pillar_at(utc, local.year())?;
    let month = month_pillar_at(utc, year.stem())?;

    let mut date = Date::from_naive(local.date())
        .ok_or(Error::UnsupportedDateRange { year: local.year() })?
        .within_era()?;
    if local.hour() >= LATE_ZI_HOUR {
        date = date + 1;
    }
    let day = date.sexagenary();
    let hour = profile
        .time
        .map(|time| hour_pillar(day.stem(), Branch::for_hour(time.hour())));

    tracing::trace!(
        %instant,
        %year,
        %month,
        %day,
        hour = ?hour.map(|h| h.to_string()),
        "four pillars"
    );
    Ok(FourPillars {
        year,
        month,
        day,
        hour,
        instant,
        time_assumed: profile.time.is_none(),
    })
}

/// Year pillar of a Gregorian year, as it stands after that year's 立春.
///
/// ```
/// use manseryeok::pillars::year_pillar_for;
///
/// assert_eq!("甲辰", year_pillar_for(2024).unwrap().to_string());
/// assert!(year_pillar_for(2101).is_err());
/// ```
pub fn year_pillar_for(year: i32) -> Result<StemBranch> {
    if !SUPPORTED_YEARS.contains(&year) {
        return Err(Error::UnsupportedDateRange { year });
    }
    Ok(StemBranch::from_index((year - 4).rem_euclid(60) as u8))
}

/// Day pillar of a civil date.
pub fn day_pillar_for(date: NaiveDate) -> Result<StemBranch> {
    let converted = Date::from_naive(date).ok_or(Error::UnsupportedDateRange { year: date.year() })?;
    Ok(converted.within_era()?.sexagenary())
}

fn year_pillar_at(utc: DateTime<Utc>, local_year: i32) -> Result<StemBranch> {
    let lichun = solar_terms::boundaries_for_year(local_year)?
        .into_iter()
        .find(|b| b.term == SolarTerm::LICHUN)
        .ok_or(Error::UnsupportedDateRange { year: local_year })?;
    let year = if utc < lichun.instant {
        local_year - 1
    } else {
        local_year
    };
    Ok(StemBranch::from_index((year - 4).rem_euclid(60) as u8))
}

fn month_pillar_at(utc: DateTime<Utc>, year_stem: Stem) -> Result<StemBranch> {
    let boundary = solar_terms::major_boundary_at_or_before(utc)?;
    let branch = boundary.term.month_branch();
    // 甲己 years open with 丙寅, 乙庚 with 戊寅, and so on
    let first = pair(
        Stem::from_index((year_stem.index() % 5) * 2 + 2),
        Branch::Yin,
    );
    let months_in = (i32::from(branch.index()) - i32::from(Branch::Yin.index())).rem_euclid(12);
    Ok(first.offset(months_in))
}

fn hour_pillar(day_stem: Stem, branch: Branch) -> StemBranch {
    // 甲己 days open with 甲子, 乙庚 with 丙子, and so on
    let first = pair(Stem::from_index((day_stem.index() % 5) * 2), Branch::Zi);
    first.offset(i32::from(branch.index()))
}

/// Pairs a stem and branch already known to share parity.
fn pair(stem: Stem, branch: Branch) -> StemBranch {
    debug_assert_eq!(stem.index() % 2, branch.index() % 2);
    let (s, b) = (i32::from(stem.index()), i32::from(branch.index()));
    StemBranch::from_index((6 * s - 5 * b).rem_euclid(60) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Gender;
    use chrono::NaiveTime;

    fn profile(y: i32, m: u32, d: u32, time: Option<(u32, u32)>, offset_hours: i32) -> BirthProfile {
        BirthProfile::solar(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            time.map(|(h, min)| NaiveTime::from_hms_opt(h, min, 0).unwrap()),
            Gender::Male,
            FixedOffset::east_opt(offset_hours * 3600).unwrap(),
        )
    }

    fn names(pillars: &FourPillars) -> [String; 4] {
        pillars
            .as_array()
            .map(|p| p.map_or_else(|| "-".to_owned(), |p| p.to_string()))
    }

    #[test]
    fn reference_chart() {
        let pillars = four_pillars(&profile(1980, 7, 7, Some((13, 0)), 9)).unwrap();
        assert_eq!(["庚申", "癸未", "辛巳", "乙未"], names(&pillars));
        assert_eq!(Stem::Xin, pillars.day_master());
        assert!(!pillars.time_assumed);
    }

    #[test]
    fn charts() {
        let dataset = [
            ((2000, 1, 1, (0, 30), 8), ["己卯", "丙子", "戊午", "壬子"]),
            ((2024, 2, 4, (16, 0), 8), ["癸卯", "乙丑", "戊戌", "庚申"]),
            ((2024, 2, 4, (16, 40), 8), ["甲辰", "丙寅", "戊戌", "庚申"]),
            ((2025, 12, 31, (23, 30), 9), ["乙巳", "戊子", "乙亥", "丙子"]),
        ];
        for ((y, m, d, time, offset), std) in dataset {
            let pillars = four_pillars(&profile(y, m, d, Some(time), offset)).unwrap();
            assert_eq!(std, names(&pillars), "{y:04}-{m:02}-{d:02} {time:?}");
        }
    }

    #[test]
    fn month_stems_follow_year_stem() {
        // 寅 month of every year stem
        let stds = ["丙寅", "戊寅", "庚寅", "壬寅", "甲寅"];
        for (year_stem, std) in Stem::ALL.into_iter().zip(stds.iter().cycle()) {
            let utc = "2024-02-20T00:00:00Z".parse().unwrap();
            assert_eq!(*std, month_pillar_at(utc, year_stem).unwrap().to_string());
        }
    }

    #[test]
    fn hour_stems_follow_day_stem() {
        let stds = ["甲子", "丙子", "戊子", "庚子", "壬子"];
        for (day_stem, std) in Stem::ALL.into_iter().zip(stds.iter().cycle()) {
            assert_eq!(*std, hour_pillar(day_stem, Branch::Zi).to_string());
        }
        assert_eq!("乙亥", hour_pillar(Stem::Jia, Branch::Hai).to_string());
    }

    #[test]
    fn unknown_time() {
        let pillars = four_pillars(&profile(1980, 7, 7, None, 9)).unwrap();
        assert_eq!(None, pillars.hour);
        assert!(pillars.time_assumed);
        assert_eq!(12, pillars.instant.hour());
        assert_eq!("辛巳", pillars.day.to_string());
    }

    #[test]
    fn year_pillars() {
        for (year, std) in [(1900, "庚子"), (1980, "庚申"), (1984, "甲子"), (2100, "庚申")] {
            assert_eq!(std, year_pillar_for(year).unwrap().to_string());
        }
        assert_eq!(
            Err(Error::UnsupportedDateRange { year: 1899 }),
            year_pillar_for(1899)
        );
    }

    #[test]
    fn day_pillars() {
        for ((y, m, d), std) in [((2026, 1, 1), "乙亥"), ((2026, 1, 2), "丙子"), ((1980, 7, 8), "壬午")] {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            assert_eq!(std, day_pillar_for(date).unwrap().to_string());
        }
    }
}
