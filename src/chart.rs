//! A complete chart: pillars, Day Master and luck cycles of one birth.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ChartConfig;
use crate::element::{self, Element, Polarity};
use crate::error::Result;
use crate::luck::{self, DaewoonSequence, Direction, SeunPillar};
use crate::pillars::{self, FourPillars};
use crate::profile::{BirthProfile, Gender};
use crate::sexagenary::{Stem, StemBranch};

/// The day stem with its element and polarity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DayMaster {
    pub stem: Stem,
    pub element: Element,
    pub polarity: Polarity,
}

impl DayMaster {
    pub fn new(stem: Stem) -> Self {
        let (element, polarity) = element::resolve(stem);
        Self {
            stem,
            element,
            polarity,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub gender: Gender,
    pub pillars: FourPillars,
    pub day_master: DayMaster,
    pub daewoon: DaewoonSequence,
    pub seun: Option<SeunPillar>,
}

impl Chart {
    /// Computes everything a chart holds for `profile`.
    ///
    /// ```
    /// use chrono::{FixedOffset, NaiveDate, NaiveTime};
    /// use manseryeok::chart::Chart;
    /// use manseryeok::config::ChartConfig;
    /// use manseryeok::element::Element;
    /// use manseryeok::profile::{BirthProfile, Gender};
    ///
    /// let profile = BirthProfile::solar(
    ///     NaiveDate::from_ymd_opt(1980, 7, 7).unwrap(),
    ///     NaiveTime::from_hms_opt(13, 0, 0),
    ///     Gender::Male,
    ///     FixedOffset::east_opt(9 * 3600).unwrap(),
    /// );
    /// let chart = Chart::compute(&profile, &ChartConfig::default()).unwrap();
    /// assert_eq!(Element::Metal, chart.day_master.element);
    /// assert_eq!(10, chart.daewoon.pillars.len());
    /// ```
    pub fn compute(profile: &BirthProfile, config: &ChartConfig) -> Result<Self> {
        config.validate()?;
        let pillars = pillars::four_pillars(profile)?;
        let day_master = DayMaster::new(pillars.day_master());
        let daewoon = luck::daewoon_sequence(&pillars, profile.gender, config.daewoon_count)?;
        let seun = config.seun_year.map(luck::seun_pillar).transpose()?;

        tracing::debug!(
            instant = %pillars.instant,
            day_master = %day_master.stem,
            time_assumed = pillars.time_assumed,
            "chart computed"
        );
        Ok(Self {
            gender: profile.gender,
            pillars,
            day_master,
            daewoon,
            seun,
        })
    }
}

fn cell(pillar: Option<StemBranch>, part: fn(StemBranch) -> (&'static str, &'static str)) -> String {
    match pillar {
        Some(p) => {
            let (hanja, hangul) = part(p);
            format!("{hanja}({hangul})")
        }
        None => "?".to_owned(),
    }
}

/// Renders the pillars right to left (hour, day, month, year), then the Day
/// Master and luck cycles.
impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [year, month, day, hour] = self.pillars.as_array();
        let columns = [hour, day, month, year];

        writeln!(f, "     時柱    日柱    月柱    年柱")?;
        write!(f, "天干")?;
        for pillar in columns {
            write!(f, "  {:<6}", cell(pillar, |p| (p.stem().hanja(), p.stem().hangul())))?;
        }
        writeln!(f)?;
        write!(f, "地支")?;
        for pillar in columns {
            write!(f, "  {:<6}", cell(pillar, |p| (p.branch().hanja(), p.branch().hangul())))?;
        }
        writeln!(f)?;
        if self.pillars.time_assumed {
            writeln!(f, "(birth time unknown, computed at noon)")?;
        }

        let polarity = match self.day_master.polarity {
            Polarity::Yang => "陽",
            Polarity::Yin => "陰",
        };
        writeln!(
            f,
            "日主: {} {}{}",
            self.day_master.stem, polarity, self.day_master.element
        )?;

        let direction = match self.daewoon.direction {
            Direction::Forward => "順行",
            Direction::Backward => "逆行",
        };
        let onset = self.daewoon.onset;
        write!(
            f,
            "大運 {direction} {}y {}m {}d:",
            onset.years, onset.months, onset.days
        )?;
        for p in &self.daewoon.pillars {
            write!(f, " {}({})", p.pillar, p.start_age)?;
        }
        if let Some(seun) = self.seun {
            write!(f, "\n歲運 {}: {}", seun.year, seun.pillar)?;
        }
        Ok(())
    }
}
