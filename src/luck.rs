//! Luck cycles: the ten-year Daewoon (大運) pillars of a birth and the annual
//! Seun (歲運) pillars.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::element::{self, Relationship};
use crate::error::{Error, Result};
use crate::pillars::{self, FourPillars};
use crate::profile::Gender;
use crate::sexagenary::{Stem, StemBranch};
use crate::solar_terms;

/// Minutes of distance to a major term that count as one year of onset age
/// (three days).
const MINUTES_PER_YEAR: i64 = 3 * 24 * 60;
/// Six hours count as one month.
const MINUTES_PER_MONTH: i64 = 6 * 60;
/// Twelve minutes count as one day.
const MINUTES_PER_DAY: i64 = 12;

/// Years covered by each Daewoon pillar.
pub const DAEWOON_SPAN: u32 = 10;
/// Most Daewoon pillars a sequence may hold, enough for any lifespan.
pub const MAX_DAEWOON_COUNT: u32 = 15;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Direction of the Daewoon sequence: yang-year men and yin-year women go
/// forward, the others backward.
///
/// ```
/// use manseryeok::luck::{direction, Direction};
/// use manseryeok::profile::Gender;
/// use manseryeok::sexagenary::Stem;
///
/// assert_eq!(Direction::Forward, direction(Stem::Geng, Gender::Male));
/// assert_eq!(Direction::Backward, direction(Stem::Geng, Gender::Female));
/// ```
pub fn direction(year_stem: Stem, gender: Gender) -> Direction {
    if year_stem.is_yang() != gender.is_female() {
        Direction::Forward
    } else {
        Direction::Backward
    }
}

/// Age at which the first Daewoon pillar begins, in traditional units.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct OnsetAge {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl OnsetAge {
    /// Converts the distance between birth and the governing major term.
    ///
    /// ```
    /// use manseryeok::luck::OnsetAge;
    ///
    /// // 31 days 5 hours 8 minutes
    /// let onset = OnsetAge::from_minutes(31 * 1440 + 5 * 60 + 8);
    /// assert_eq!(OnsetAge { years: 10, months: 4, days: 25 }, onset);
    /// assert_eq!(10, onset.start_age());
    /// ```
    pub fn from_minutes(minutes: i64) -> Self {
        let minutes = minutes.max(0);
        let rest = minutes % MINUTES_PER_YEAR;
        Self {
            years: (minutes / MINUTES_PER_YEAR) as u32,
            months: (rest / MINUTES_PER_MONTH) as u32,
            days: (rest % MINUTES_PER_MONTH / MINUTES_PER_DAY) as u32,
        }
    }

    /// Whole-year start age: half a year or more rounds up, and the first
    /// pillar never starts before age 1.
    pub fn start_age(&self) -> u32 {
        let rounded = self.years + u32::from(self.months >= 6);
        rounded.max(1)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DaewoonPillar {
    /// Position in the sequence, from 0.
    pub ordinal: u32,
    /// First age covered, inclusive.
    pub start_age: u32,
    /// Last age covered, inclusive.
    pub end_age: u32,
    pub pillar: StemBranch,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DaewoonSequence {
    pub direction: Direction,
    pub onset: OnsetAge,
    pub pillars: Vec<DaewoonPillar>,
}

impl DaewoonSequence {
    /// The pillar covering `age`, if the sequence reaches it.
    pub fn at_age(&self, age: u32) -> Option<&DaewoonPillar> {
        self.pillars
            .iter()
            .find(|p| (p.start_age..=p.end_age).contains(&age))
    }

    /// The pillar in force during Gregorian `year`, counting age as the
    /// years elapsed since `birth_year`.
    pub fn for_year(&self, birth_year: i32, year: i32) -> Option<&DaewoonPillar> {
        let age = u32::try_from(year - birth_year).ok()?;
        self.at_age(age)
    }
}

/// Projects `count` Daewoon pillars from a birth chart.
///
/// The onset age is the distance from the birth to the next major term
/// (forward) or from the last major term at or before it (backward), three
/// days counting as a year.
///
/// ```
/// use chrono::{FixedOffset, NaiveDate, NaiveTime};
/// use manseryeok::luck::{daewoon_sequence, Direction};
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
/// let daewoon = daewoon_sequence(&pillars, Gender::Male, 8).unwrap();
/// assert_eq!(Direction::Forward, daewoon.direction);
/// assert_eq!(10, daewoon.pillars[0].start_age);
/// assert_eq!("甲申", daewoon.pillars[0].pillar.to_string());
/// assert_eq!("乙酉", daewoon.pillars[1].pillar.to_string());
/// ```
pub fn daewoon_sequence(
    pillars: &FourPillars,
    gender: Gender,
    count: u32,
) -> Result<DaewoonSequence> {
    if !(1..=MAX_DAEWOON_COUNT).contains(&count) {
        return Err(Error::InvalidCount);
    }
    let direction = direction(pillars.year.stem(), gender);
    let birth = pillars.instant.with_timezone(&Utc);
    let distance = match direction {
        Direction::Forward => solar_terms::major_boundary_after(birth)?.instant - birth,
        Direction::Backward => birth - solar_terms::major_boundary_at_or_before(birth)?.instant,
    };
    let onset = OnsetAge::from_minutes(distance.num_minutes());
    let start = onset.start_age();

    let daewoon = (0..count)
        .map(|ordinal| {
            let start_age = start + ordinal * DAEWOON_SPAN;
            DaewoonPillar {
                ordinal,
                start_age,
                end_age: start_age + DAEWOON_SPAN - 1,
                pillar: pillars
                    .month
                    .offset(direction.step() * (ordinal as i32 + 1)),
            }
        })
        .collect();

    tracing::debug!(?direction, ?onset, start_age = start, count, "daewoon sequence");
    Ok(DaewoonSequence {
        direction,
        onset,
        pillars: daewoon,
    })
}

/// The annual pillar of one year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SeunPillar {
    pub year: i32,
    pub pillar: StemBranch,
}

impl SeunPillar {
    /// How the year's stem stands towards the Day Master.
    pub fn relationship_to(&self, day_master: Stem) -> Relationship {
        element::relationship_of(day_master.element(), self.pillar.stem().element())
    }
}

/// Seun pillar of Gregorian `year`.
///
/// ```
/// use manseryeok::luck::seun_pillar;
///
/// assert_eq!("乙巳", seun_pillar(2025).unwrap().pillar.to_string());
/// ```
pub fn seun_pillar(year: i32) -> Result<SeunPillar> {
    Ok(SeunPillar {
        year,
        pillar: pillars::year_pillar_for(year)?,
    })
}

/// Seun pillars of every year in `from..=to`.
pub fn seun_range(from: i32, to: i32) -> Result<Vec<SeunPillar>> {
    (from..=to).map(seun_pillar).collect()
}

/// A day's pillar and its relation to a Day Master.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DailyRelationship {
    pub date: NaiveDate,
    pub pillar: StemBranch,
    pub relationship: Relationship,
}

/// Relates the day pillar of `date` to `day_master`, by their stems'
/// elements.
///
/// ```
/// use chrono::NaiveDate;
/// use manseryeok::element::Relationship;
/// use manseryeok::luck::daily_relationship;
/// use manseryeok::sexagenary::Stem;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// let daily = daily_relationship(Stem::Xin, date).unwrap();
/// assert_eq!("乙亥", daily.pillar.to_string());
/// assert_eq!(Relationship::Wealth, daily.relationship);
/// ```
pub fn daily_relationship(day_master: Stem, date: NaiveDate) -> Result<DailyRelationship> {
    let pillar = pillars::day_pillar_for(date)?;
    Ok(DailyRelationship {
        date,
        pillar,
        relationship: element::relationship_of(day_master.element(), pillar.stem().element()),
    })
}
