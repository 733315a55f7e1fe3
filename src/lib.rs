//! Four Pillars (四柱, saju) charts and luck cycles on the sexagenary
//! calendar.
//!
//! Solar terms and new moons are computed astronomically, so the Korean
//! lunisolar calendar and the month pillars are available for Gregorian years
//! 1900 to 2100 without any data tables.
//!
//! # Examples
//!
//! A complete chart:
//!
//! ```
//! use chrono::{FixedOffset, NaiveDate, NaiveTime};
//! use manseryeok::{BirthProfile, Chart, ChartConfig, Gender};
//!
//! let profile = BirthProfile::solar(
//!     NaiveDate::from_ymd_opt(1980, 7, 7).unwrap(),
//!     NaiveTime::from_hms_opt(13, 0, 0),
//!     Gender::Male,
//!     FixedOffset::east_opt(9 * 3600).unwrap(),
//! );
//! let chart = Chart::compute(&profile, &ChartConfig::default()).unwrap();
//!
//! assert_eq!("庚申", chart.pillars.year.to_string());
//! assert_eq!("癸未", chart.pillars.month.to_string());
//! assert_eq!("辛巳", chart.pillars.day.to_string());
//! assert_eq!("乙未", chart.pillars.hour.unwrap().to_string());
//! assert_eq!("甲申", chart.daewoon.pillars[0].pillar.to_string());
//! ```
//!
//! Lunisolar calendar:
//!
//! ```
//! use manseryeok::Date;
//! use manseryeok::lunisolar::{self, LunarDate, Month::*};
//!
//! let date = Date::from_gregorian(2000, 1, 1).unwrap();
//! let lunar = lunisolar::to_lunisolar(date).unwrap();
//!
//! assert_eq!(LunarDate::new(1999, Common(11), 25), lunar);
//! assert_eq!(Ok(date), lunisolar::to_solar(&lunar));
//! ```
//!
//! The crate logs through [`tracing`] and installs no subscriber of its own.

pub mod chart;
pub mod config;
pub mod date;
pub mod element;
pub mod error;
pub mod luck;
pub mod lunisolar;
pub mod pillars;
pub mod profile;
pub mod sexagenary;
pub mod solar_terms;
pub mod time_scales;

pub use chart::{Chart, DayMaster};
pub use config::ChartConfig;
pub use date::Date;
pub use element::{Element, Polarity, Relationship};
pub use error::{Error, Result};
pub use luck::{DaewoonPillar, DaewoonSequence, Direction, SeunPillar};
pub use lunisolar::{LunarDate, Month};
pub use pillars::FourPillars;
pub use profile::{BirthProfile, CalendarDate, CalendarKind, Gender};
pub use sexagenary::{Branch, Stem, StemBranch};
pub use solar_terms::{SolarTerm, SolarTermBoundary};
