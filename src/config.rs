//! Chart computation settings

use serde::{Deserialize, Serialize};

use crate::date::SUPPORTED_YEARS;
use crate::error::{Error, Result};
use crate::luck::MAX_DAEWOON_COUNT;

/// Options for [`Chart::compute`](crate::chart::Chart::compute).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Number of Daewoon pillars to project
    #[serde(default = "default_daewoon_count")]
    pub daewoon_count: u32,

    /// Year whose Seun pillar is added to the chart
    #[serde(default)]
    pub seun_year: Option<i32>,
}

fn default_daewoon_count() -> u32 {
    10
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            daewoon_count: default_daewoon_count(),
            seun_year: None,
        }
    }
}

impl ChartConfig {
    /// Checks the settings before any computation is attempted.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DAEWOON_COUNT).contains(&self.daewoon_count) {
            return Err(Error::InvalidCount);
        }
        if let Some(year) = self.seun_year
            && !SUPPORTED_YEARS.contains(&year)
        {
            return Err(Error::UnsupportedDateRange { year });
        }
        Ok(())
    }
}
