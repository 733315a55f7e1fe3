//! Deals with different time scales, specifically, conversion from TT into UT.
//!
//! Only conversions necessary for other computations in this crate are
//! included.

use chrono::{DateTime, Utc};

use crate::date::Date;

/// Julian date of the Unix epoch, 1970-01-01T00:00Z.
const UNIX_EPOCH_JD: f64 = 2440587.5;

/// [Terristrial time](https://en.wikipedia.org/wiki/Terrestrial_Time),
/// represented in Julian date (JD).
///
/// Ephemeris computations in this crate are carried out in this time scale,
/// and should be converted to UT when calculating dates.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tt(pub f64);

/// [Universal time](https://en.wikipedia.org/wiki/Universal_Time), the actual
/// civil time used for determining the actual date at a given time point,
/// represented in Julian date (JD).
///
/// Leap seconds are not modelled: UT here is UT1 as predicted by a ΔT model,
/// which never differs from UTC by more than 0.9 seconds.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Ut(pub f64);

impl Ut {
    /// Converts a TT (or other time scale convertible to TT) into UT.
    ///
    /// # Example
    ///
    /// ```
    /// use manseryeok::time_scales::{Tt, Ut};
    /// let tt = Tt(2451543.166666667);
    /// let ut = Ut::convert(tt);
    /// assert_eq!((1999, 12, 30), ut.date_in_timezone(0).gregorian());
    /// ```
    pub fn convert<T>(time: T) -> Self
    where
        T: Into<Tt>,
    {
        let tt = time.into();
        Ut(tt.0 - delta_t::seconds(tt) / 86400.0)
    }
    /// Returns the date at the time point in timezone ahead (east) of UTC by
    /// `tz_offset_minutes`minutes.
    ///
    /// For Korean standard time (UTC+9), `tz_offset_minutes` should be +540.
    ///
    /// # Example
    ///
    /// ```
    /// use manseryeok::time_scales::Ut;
    /// let ut = Ut(2451543.0); // 1999-12-30T12:00Z
    /// assert_eq!((1999, 12, 30), ut.date_in_timezone(480).gregorian());
    /// assert_eq!((1999, 12, 31), ut.date_in_timezone(780).gregorian());
    /// ```
    pub fn date_in_timezone(&self, tz_offset_minutes: i32) -> Date {
        let jdn = (self.0 + tz_offset_minutes as f64 / 1440.0).round() as u32;
        Date::from_jdn(jdn)
    }

    /// Rounds to the nearest second as a chrono UTC instant.
    ///
    /// Returns `None` only for time points chrono cannot represent.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let secs = ((self.0 - UNIX_EPOCH_JD) * 86400.0).round() as i64;
        DateTime::from_timestamp(secs, 0)
    }
}

mod delta_t {
    use super::Tt;

    /// Estimates ΔT = TT − UT in seconds, using the polynomial expressions of
    /// Espenak & Meeus (2006) between 1860 and 2150.
    ///
    /// Outside that span the nearest expression is extrapolated, which stays
    /// reasonable for the few years the ephemeris needs around the era.
    pub fn seconds(tt: Tt) -> f64 {
        let y = 2000.0 + (tt.0 - 2451544.5) / 365.2425;
        if y < 1900.0 {
            let t = y - 1860.0;
            7.62 + 0.5737 * t - 0.251754 * t.powi(2) + 0.01680668 * t.powi(3)
                - 0.0004473624 * t.powi(4)
                + t.powi(5) / 233174.0
        } else if y < 1920.0 {
            let t = y - 1900.0;
            -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
                - 0.000197 * t.powi(4)
        } else if y < 1941.0 {
            let t = y - 1920.0;
            21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
        } else if y < 1961.0 {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
        } else if y < 1986.0 {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
        } else if y < 2005.0 {
            let t = y - 2000.0;
            63.86 + 0.3345 * t - 0.060374 * t.powi(2)
                + 0.0017275 * t.powi(3)
                + 0.000651814 * t.powi(4)
                + 0.00002373599 * t.powi(5)
        } else if y < 2050.0 {
            let t = y - 2000.0;
            62.92 + 0.32217 * t + 0.005589 * t.powi(2)
        } else {
            let u = (y - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tt_to_ut() {
        let tt = Tt(2451543.166666667);
        let ut = Ut::convert(tt);
        assert_eq!((1999, 12, 30), ut.date_in_timezone(0).gregorian());
        assert_eq!((1999, 12, 30), ut.date_in_timezone(480).gregorian());
        let ut_midnight = Ut(2451543.0 + 4.0 / 24.0);
        let ut_before_midnight = Ut(ut_midnight.0 - 1.0 / 86400.0);
        let ut_after_midnight = Ut(ut_midnight.0 + 1.0 / 86400.0);
        assert_eq!(
            (1999, 12, 30),
            ut_before_midnight.date_in_timezone(480).gregorian()
        );
        assert_eq!(
            (1999, 12, 31),
            ut_after_midnight.date_in_timezone(480).gregorian()
        );
    }

    #[test]
    fn delta_t_values() {
        for (jd, std) in [
            (2415020.5, -2.7), // 1900
            (2433282.5, 29.1), // 1950
            (2451544.5, 63.9), // 2000
            (2459215.5, 72.2), // 2021
        ] {
            let dt = delta_t::seconds(Tt(jd));
            assert!((dt - std).abs() < 1.5, "ΔT({jd}) = {dt}");
        }
    }

    #[test]
    fn utc_instants() {
        let utc = Ut(2451545.0).to_utc().unwrap();
        assert_eq!("2000-01-01T12:00:00+00:00", utc.to_rfc3339());
        // rounded to the second
        let utc = Ut(2451545.0 + 0.6 / 86400.0).to_utc().unwrap();
        assert_eq!("2000-01-01T12:00:01+00:00", utc.to_rfc3339());
    }
}
