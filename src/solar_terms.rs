//! The 24 solar terms and the instants at which they begin.
//!
//! A term begins when the apparent ecliptic longitude of the sun reaches a
//! multiple of 15°. Terms are numbered by that multiple, so 春分 (0°) is 0 and
//! 冬至 (270°) is 18. The odd-numbered terms are the twelve *major* terms (節)
//! that start the months of the sexagenary calendar.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::date::SUPPORTED_YEARS;
use crate::error::{Error, Result};
use crate::lunisolar::{ephemeris, fmt as names};
use crate::sexagenary::Branch;
use crate::time_scales::Ut;

/// A solar term, numbered by ecliptic longitude in steps of 15°.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SolarTerm(u8);

impl SolarTerm {
    pub const CHUNFEN: SolarTerm = SolarTerm(0);
    pub const QINGMING: SolarTerm = SolarTerm(1);
    pub const LIXIA: SolarTerm = SolarTerm(3);
    pub const MANGZHONG: SolarTerm = SolarTerm(5);
    pub const XIAOSHU: SolarTerm = SolarTerm(7);
    pub const LIQIU: SolarTerm = SolarTerm(9);
    pub const BAILU: SolarTerm = SolarTerm(11);
    pub const HANLU: SolarTerm = SolarTerm(13);
    pub const LIDONG: SolarTerm = SolarTerm(15);
    pub const DAXUE: SolarTerm = SolarTerm(17);
    pub const DONGZHI: SolarTerm = SolarTerm(18);
    pub const XIAOHAN: SolarTerm = SolarTerm(19);
    pub const LICHUN: SolarTerm = SolarTerm(21);
    pub const JINGZHE: SolarTerm = SolarTerm(23);

    /// Term number `index` in `0..=23`, or `None` beyond.
    pub fn new(index: u8) -> Option<Self> {
        (index < 24).then_some(Self(index))
    }
    pub fn index(self) -> u8 {
        self.0
    }
    /// Ecliptic longitude of the sun, in degrees, at which the term begins.
    pub fn longitude(self) -> f64 {
        f64::from(self.0) * 15.0
    }
    /// Whether this is one of the twelve month-starting terms (節).
    pub fn is_major(self) -> bool {
        self.0 % 2 == 1
    }
    /// Branch of the sexagenary month the term falls in.
    ///
    /// ```
    /// use manseryeok::sexagenary::Branch;
    /// use manseryeok::solar_terms::SolarTerm;
    ///
    /// assert_eq!(Branch::Yin, SolarTerm::LICHUN.month_branch());
    /// assert_eq!(Branch::Wei, SolarTerm::XIAOSHU.month_branch());
    /// assert_eq!(Branch::Zi, SolarTerm::DONGZHI.month_branch());
    /// ```
    pub fn month_branch(self) -> Branch {
        Branch::from_index(((self.0 + 1) / 2 + 3) % 12)
    }

    pub fn hanja(self) -> &'static str {
        names::SOLAR_TERM_HANJA[usize::from(self.0)]
    }
    pub fn hangul(self) -> &'static str {
        names::SOLAR_TERM_HANGUL[usize::from(self.0)]
    }
}

impl fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hanja())
    }
}

impl TryFrom<u8> for SolarTerm {
    type Error = Error;

    fn try_from(index: u8) -> std::result::Result<Self, Self::Error> {
        Self::new(index).ok_or_else(|| Error::invalid_input(format!("no solar term {index}")))
    }
}

impl From<SolarTerm> for u8 {
    fn from(term: SolarTerm) -> Self {
        term.0
    }
}

/// The instant a solar term begins, to the second.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SolarTermBoundary {
    pub term: SolarTerm,
    pub instant: DateTime<Utc>,
}

/// Returns the 24 terms beginning in Gregorian `year`, from 小寒 to 冬至.
///
/// ```
/// use manseryeok::solar_terms::{self, SolarTerm};
///
/// let terms = solar_terms::boundaries_for_year(2024).unwrap();
/// assert_eq!(SolarTerm::XIAOHAN, terms[0].term);
/// assert_eq!(SolarTerm::LICHUN, terms[2].term);
/// assert_eq!("2024-02-04", terms[2].instant.date_naive().to_string());
/// ```
pub fn boundaries_for_year(year: i32) -> Result<[SolarTermBoundary; 24]> {
    if !SUPPORTED_YEARS.contains(&year) {
        return Err(Error::UnsupportedDateRange { year });
    }
    year_boundaries(year).ok_or(Error::UnsupportedDateRange { year })
}

/// Same as [`boundaries_for_year`], but only limited by the ephemeris, which
/// extends one year past the era on each side.
fn year_boundaries(year: i32) -> Option<[SolarTermBoundary; 24]> {
    let annus = ephemeris::Annus::get(year)?;
    let mut boundaries = [SolarTermBoundary {
        term: SolarTerm::XIAOHAN,
        instant: DateTime::<Utc>::UNIX_EPOCH,
    }; 24];
    // solar_term[0] is the previous 冬至
    for (j, boundary) in boundaries.iter_mut().enumerate() {
        *boundary = SolarTermBoundary {
            term: SolarTerm(((19 + j) % 24) as u8),
            instant: Ut::convert(annus.solar_term[j + 1]).to_utc()?,
        };
    }
    tracing::trace!(year, "solar term boundaries");
    Some(boundaries)
}

/// Last major term beginning at or before `instant`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use manseryeok::solar_terms::{self, SolarTerm};
///
/// let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let boundary = solar_terms::major_boundary_at_or_before(instant).unwrap();
/// assert_eq!(SolarTerm::DAXUE, boundary.term);
/// ```
pub fn major_boundary_at_or_before(instant: DateTime<Utc>) -> Result<SolarTermBoundary> {
    let year = instant.year();
    for y in [year, year - 1] {
        let boundaries = year_boundaries(y).ok_or(Error::UnsupportedDateRange { year })?;
        if let Some(boundary) = boundaries
            .iter()
            .rev()
            .find(|b| b.term.is_major() && b.instant <= instant)
        {
            return Ok(*boundary);
        }
    }
    Err(Error::UnsupportedDateRange { year })
}

/// First major term beginning strictly after `instant`.
pub fn major_boundary_after(instant: DateTime<Utc>) -> Result<SolarTermBoundary> {
    let year = instant.year();
    for y in [year, year + 1] {
        let boundaries = year_boundaries(y).ok_or(Error::UnsupportedDateRange { year })?;
        if let Some(boundary) = boundaries
            .iter()
            .find(|b| b.term.is_major() && b.instant > instant)
        {
            return Ok(*boundary);
        }
    }
    Err(Error::UnsupportedDateRange { year })
}

/// The term beginning on civil `date` in the timezone `offset`, if any.
///
/// ```
/// use chrono::{FixedOffset, NaiveDate};
/// use manseryeok::solar_terms::{self, SolarTerm};
///
/// let kst = FixedOffset::east_opt(9 * 3600).unwrap();
/// let date = NaiveDate::from_ymd_opt(1980, 7, 7).unwrap();
/// assert_eq!(Ok(Some(SolarTerm::XIAOSHU)), solar_terms::term_on(date, kst));
/// assert_eq!(Ok(None), solar_terms::term_on(date.succ_opt().unwrap(), kst));
/// ```
pub fn term_on(date: NaiveDate, offset: FixedOffset) -> Result<Option<SolarTerm>> {
    let boundaries = boundaries_for_year(date.year())?;
    Ok(boundaries
        .iter()
        .find(|b| b.instant.with_timezone(&offset).date_naive() == date)
        .map(|b| b.term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn reference_instants() {
        let dataset = [
            (2024, SolarTerm::XIAOHAN, utc(2024, 1, 5, 20, 48, 44)),
            (2024, SolarTerm::LICHUN, utc(2024, 2, 4, 8, 26, 23)),
            (2025, SolarTerm::LICHUN, utc(2025, 2, 3, 14, 10, 0)),
            (1999, SolarTerm::DONGZHI, utc(1999, 12, 22, 7, 43, 34)),
            (1980, SolarTerm::XIAOSHU, utc(1980, 7, 6, 23, 23, 37)),
            (1980, SolarTerm::LIQIU, utc(1980, 8, 7, 9, 8, 23)),
            (2100, SolarTerm::DONGZHI, utc(2100, 12, 21, 19, 50, 21)),
        ];
        for (year, term, std) in dataset {
            let boundaries = boundaries_for_year(year).unwrap();
            let found = boundaries.iter().find(|b| b.term == term).unwrap();
            let error = (found.instant - std).abs();
            assert!(error < Duration::minutes(2), "{year} {term}: {}", found.instant);
        }
    }

    #[test]
    fn year_layout() {
        for year in [1900, 1980, 2024, 2100] {
            let boundaries = boundaries_for_year(year).unwrap();
            assert_eq!(SolarTerm::XIAOHAN, boundaries[0].term);
            assert_eq!(SolarTerm::DONGZHI, boundaries[23].term);
            assert_eq!(12, boundaries.iter().filter(|b| b.term.is_major()).count());
            for pair in boundaries.windows(2) {
                assert!(pair[0].instant < pair[1].instant);
                assert_eq!((pair[0].term.index() + 1) % 24, pair[1].term.index());
            }
            assert!(boundaries.iter().all(|b| b.instant.year() == year));
        }
    }

    #[test]
    fn unsupported_years() {
        for year in [1899, 2101] {
            assert_eq!(
                Err(Error::UnsupportedDateRange { year }),
                boundaries_for_year(year)
            );
        }
    }

    #[test]
    fn neighbouring_major_terms() {
        let lichun = utc(2024, 2, 4, 8, 26, 23);
        let before = major_boundary_at_or_before(lichun + Duration::hours(1)).unwrap();
        assert_eq!(SolarTerm::LICHUN, before.term);
        let before = major_boundary_at_or_before(lichun - Duration::hours(1)).unwrap();
        assert_eq!(SolarTerm::XIAOHAN, before.term);
        let after = major_boundary_after(lichun - Duration::hours(1)).unwrap();
        assert_eq!(SolarTerm::LICHUN, after.term);
        let after = major_boundary_after(utc(2023, 12, 31, 0, 0, 0)).unwrap();
        assert_eq!(SolarTerm::XIAOHAN, after.term);
        assert_eq!(2024, after.instant.year());

        let exact = major_boundary_at_or_before(before.instant).unwrap();
        assert_eq!(before, exact);
        assert!(major_boundary_after(before.instant).unwrap().instant > before.instant);
    }

    #[test]
    fn era_edges() {
        let start = utc(1900, 1, 1, 0, 0, 0);
        assert_eq!(SolarTerm::DAXUE, major_boundary_at_or_before(start).unwrap().term);
        let end = utc(2100, 12, 31, 23, 59, 59);
        assert_eq!(SolarTerm::XIAOHAN, major_boundary_after(end).unwrap().term);
        assert!(major_boundary_at_or_before(utc(1850, 1, 1, 0, 0, 0)).is_err());
    }

    #[test]
    fn month_branches() {
        let majors: Vec<_> = (0..24)
            .filter_map(SolarTerm::new)
            .filter(|t| t.is_major())
            .map(|t| (t.hanja(), t.month_branch()))
            .collect();
        assert_eq!(12, majors.len());
        assert!(majors.contains(&("驚蟄", Branch::Mao)));
        assert!(majors.contains(&("大雪", Branch::Zi)));
        assert!(majors.contains(&("小寒", Branch::Chou)));
        assert!(SolarTerm::new(24).is_none());
    }
}
