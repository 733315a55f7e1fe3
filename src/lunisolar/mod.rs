//! Lunisolar calendar
//!
//! Note: 為方便處理諸多術語，本模塊文檔用中文。
//!
//! 本模塊以天文算法即時編算陰曆（韓國農曆），節氣與合朔時刻見 [`ephemeris`]。置閏規則同夏曆，惟日期以韓國標準時計，見 [`date_kst`]。

use std::fmt as stdfmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{Date, SUPPORTED_YEARS};
use crate::error::{Error, Result};
use crate::time_scales::{Tt, Ut};

pub mod ephemeris;
pub mod fmt;

/// 韓國標準時（UTC+9），單位為分鐘
pub const KST_OFFSET_MINUTES: i32 = 540;
/// 以東經 127.5° 為準的舊標準時（UTC+8:30），單位為分鐘
pub const KST_LEGACY_OFFSET_MINUTES: i32 = 510;

/// 行用 UTC+8:30 的時段，首尾兩日皆含在內
const LEGACY_SPANS: [((i32, i32, i32), (i32, i32, i32)); 2] = [
    ((1908, 4, 1), (1911, 12, 31)),
    ((1954, 3, 21), (1961, 8, 9)),
];

/// 「歲」，相鄰兩冬至間的時段，或自冬至所在月（十一月）至下一冬至前月（十月或閏十月）的時段。
///
/// 注意：「歲」與「年」在曆法上不同，年以正月為首，但曆法編算須以兩冬至間的「歲」為基礎，本程序亦以「歲」編排，並依日期計算所在「年」。
///
/// # 用例
///
/// ```
/// use manseryeok::Date;
/// use manseryeok::lunisolar::{Annus, Month::*};
///
/// let date = Date::from_gregorian(2000, 1, 1).unwrap();
/// let annus = Annus::from_date(date).unwrap();
///
/// assert_eq!(Ok((1999, Common(11), 25)), annus.ymd_for(date));
/// ```
#[derive(Debug, Clone)]
pub struct Annus {
    /// 序號，為該歲大部分時段所在的公元年
    pub annus: i32,
    /// 該歲的曆表
    pub ephemeris: &'static ephemeris::Annus,
    /// 全部月首，包括次一歲首月用以標記本歲最末日
    pub months: Vec<NewMoon>,
}

/// 月首信息
#[derive(Debug, Copy, Clone)]
pub struct NewMoon {
    /// 月名
    pub month: Month,
    /// 月首所在日期
    pub date: Date,
}

/// 月名，`Common` 為平月，`Leap` 為閏月。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Month {
    Common(u32),
    Leap(u32),
}

impl Month {
    /// 取得月序號，無論平閏。
    pub fn num(&self) -> u32 {
        use Month::*;
        *match self {
            Common(v) | Leap(v) => v,
        }
    }
    /// 閏月為 `true`，平月為 `false`
    pub fn is_leap(&self) -> bool {
        matches!(self, Self::Leap(_))
    }
    /// 取得月名的文本形式，十一、十二月稱「冬月」「臘月」。
    ///
    /// # Panics
    ///
    /// 月序號不在 `1..=12` 間則 panic，見 [`fmt::month`]。
    pub fn name(&self) -> String {
        fmt::month(*self)
    }
}

impl Annus {
    /// 取得與公元 `annus` 年對應的歲。
    ///
    /// 若曆表不支持該歲則返回 `None`。
    ///
    /// # 用例
    ///
    /// ```
    /// use manseryeok::lunisolar::Annus;
    ///
    /// let annus = Annus::new(2000).unwrap();
    /// assert_eq!(13, annus.months.len());
    /// ```
    pub fn new(annus: i32) -> Option<Self> {
        use Month::*;

        let ephemeris = ephemeris::Annus::get(annus)?;
        let new_moon_dates: Vec<_> = ephemeris.new_moon.iter().map(|&tt| date_kst(tt)).collect();
        let ws = date_kst(ephemeris.solar_term[0]);
        let ws_next = date_kst(ephemeris.solar_term[24]);
        // 朔與冬至同日者，該月即為十一月
        let m11_idx = new_moon_dates.partition_point(|date| date <= &ws) - 1;
        let m11n_idx = new_moon_dates.partition_point(|date| date <= &ws_next) - 1;
        let mut needs_leap = match m11n_idx - m11_idx {
            12 => false,
            13 => true,
            n => unreachable!("{n} months between winter solstices of annus {annus}"),
        };

        let mut months = Vec::with_capacity(m11n_idx - m11_idx + 1);
        let mut month = 10;
        let mut term = 0;
        for i in m11_idx..=m11n_idx {
            let lacks_principal_term = new_moon_dates
                .get(i + 1)
                .is_some_and(|&next| next <= date_kst(ephemeris.solar_term[term]));
            if needs_leap && lacks_principal_term {
                months.push(NewMoon {
                    month: Leap(month),
                    date: new_moon_dates[i],
                });
                needs_leap = false;
                continue;
            }
            month = month % 12 + 1;
            months.push(NewMoon {
                month: Common(month),
                date: new_moon_dates[i],
            });
            term += 2;
        }
        debug_assert!(!needs_leap, "no leap month placed in annus {annus}");

        Some(Annus {
            annus,
            ephemeris,
            months,
        })
    }

    /// 依特定日期取得其所在歲。
    ///
    /// 若曆表不支持該歲則返回 `None`。
    ///
    /// # 用例
    ///
    /// ```
    /// use manseryeok::Date;
    /// use manseryeok::lunisolar::Annus;
    ///
    /// let date = Date::from_gregorian(1999, 12, 31).unwrap();
    /// let annus = Annus::from_date(date).unwrap();
    ///
    /// assert_eq!(2000, annus.annus);
    /// ```
    pub fn from_date(date: Date) -> Option<Self> {
        let mut y = date.gregorian().0;
        loop {
            let annus = Self::new(y)?;
            let start = annus.months[0].date;
            if (start..annus.end()).contains(&date) {
                return Some(annus);
            }
            y += if date < start { -1 } else { 1 };
        }
    }

    /// 次歲首日，即本歲最末日的次日
    fn end(&self) -> Date {
        self.months[self.months.len() - 1].date
    }

    /// 取得給定日期在該歲的年月日，返回格式為 `(年, 月, 日)`。
    ///
    /// 若所給日期不在該歲，則回報 `Err` 並指出該日期在該歲之前還是之後。
    pub fn ymd_for(&self, date: Date) -> std::result::Result<(i32, Month, u32), OtherAnnus> {
        if date < self.months[0].date {
            return Err(OtherAnnus::Before);
        } else if date >= self.end() {
            return Err(OtherAnnus::After);
        }

        let m = self.months[self.months.partition_point(|m| m.date <= date) - 1];
        let d = (date - m.date + 1) as u32;
        Ok((self.year_of(m.month), m.month, d))
    }

    /// 該歲中某月所屬的年：歲首的十一、十二月屬前一年。
    fn year_of(&self, month: Month) -> i32 {
        if month.num() >= 11 {
            self.annus - 1
        } else {
            self.annus
        }
    }

    /// 取得該歲中某月的日數（29 或 30），若該歲無此月則返回 `None`。
    ///
    /// # 用例
    ///
    /// ```
    /// use manseryeok::lunisolar::{Annus, Month::*};
    ///
    /// let annus = Annus::new(2017).unwrap();
    /// assert_eq!(Some(29), annus.month_len(Leap(5)));
    /// assert_eq!(Some(30), annus.month_len(Common(6)));
    /// assert_eq!(None, annus.month_len(Leap(6)));
    /// ```
    pub fn month_len(&self, month: Month) -> Option<u32> {
        self.months
            .windows(2)
            .find(|pair| pair[0].month == month)
            .map(|pair| (pair[1].date - pair[0].date) as u32)
    }
}

/// 表示給定日期不在該歲，並指出其在前還是在後。
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OtherAnnus {
    Before,
    After,
}

/// 將給定曆表時間轉為韓國標準時日期。
///
/// 1908-04-01 至 1911-12-31 及 1954-03-21 至 1961-08-09 間行 UTC+8:30，其餘一律作 UTC+9。
///
/// # 用例
///
/// ```
/// use manseryeok::lunisolar::date_kst;
/// use manseryeok::time_scales::Tt;
///
/// // 2017 年大暑：北京時間 7 月 22 日 23 時許，首爾已入 23 日
/// assert_eq!("2017-07-23", date_kst(Tt(2457957.1362)).iso_gregorian());
/// ```
pub fn date_kst(tt: Tt) -> Date {
    let ut = Ut::convert(tt);
    let date = ut.date_in_timezone(KST_OFFSET_MINUTES);
    let ymd = date.gregorian();
    if LEGACY_SPANS
        .iter()
        .any(|(first, last)| (*first..=*last).contains(&ymd))
    {
        ut.date_in_timezone(KST_LEGACY_OFFSET_MINUTES)
    } else {
        date
    }
}

/// 陰曆日期
///
/// `Display` 格式為 `年-月-日`，閏月在月序號前加 `L`，如 `2017-L05-01`。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: Month,
    pub day: u32,
}

impl LunarDate {
    pub fn new(year: i32, month: Month, day: u32) -> Self {
        Self { year, month, day }
    }

    /// 公曆日期轉陰曆，見 [`to_lunisolar`]。
    ///
    /// # 用例
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use manseryeok::lunisolar::{LunarDate, Month::*};
    ///
    /// let date = NaiveDate::from_ymd_opt(2017, 6, 24).unwrap();
    /// let lunar = LunarDate::from_solar(date).unwrap();
    /// assert_eq!(LunarDate::new(2017, Leap(5), 1), lunar);
    /// assert_eq!(date, lunar.to_solar().unwrap());
    /// ```
    pub fn from_solar(date: NaiveDate) -> Result<Self> {
        let converted = Date::from_naive(date).ok_or(Error::UnsupportedDateRange {
            year: chrono::Datelike::year(&date),
        })?;
        to_lunisolar(converted)
    }

    /// 陰曆轉公曆日期，見 [`to_solar`]。
    pub fn to_solar(&self) -> Result<NaiveDate> {
        let date = to_solar(self)?;
        date.to_naive()
            .ok_or(Error::UnsupportedDateRange { year: date.gregorian().0 })
    }
}

impl stdfmt::Display for LunarDate {
    fn fmt(&self, f: &mut stdfmt::Formatter<'_>) -> stdfmt::Result {
        let leap = if self.month.is_leap() { "L" } else { "" };
        write!(
            f,
            "{:04}-{}{:02}-{:02}",
            self.year,
            leap,
            self.month.num(),
            self.day
        )
    }
}

/// 公曆（或任意）日期轉陰曆。
///
/// 日期須在 [`SUPPORTED_YEARS`] 範圍內，否則回報 [`Error::UnsupportedDateRange`]。
///
/// # 用例
///
/// ```
/// use manseryeok::Date;
/// use manseryeok::lunisolar::{self, LunarDate, Month::*};
///
/// let date = Date::from_gregorian(2020, 1, 25).unwrap();
/// assert_eq!(
///     LunarDate::new(2020, Common(1), 1),
///     lunisolar::to_lunisolar(date).unwrap()
/// );
/// ```
pub fn to_lunisolar(date: Date) -> Result<LunarDate> {
    let date = date.within_era()?;
    let unsupported = || Error::UnsupportedDateRange {
        year: date.gregorian().0,
    };
    let annus = Annus::from_date(date).ok_or_else(unsupported)?;
    let (year, month, day) = annus.ymd_for(date).map_err(|_| unsupported())?;
    Ok(LunarDate { year, month, day })
}

/// 陰曆轉公曆日期。
///
/// 月序號不在 `1..=12`、日序號超出該月日數、或該年並無所指閏月者，回報 [`Error::InvalidCalendarDate`]；
/// 所得日期不在 [`SUPPORTED_YEARS`] 範圍內者，回報 [`Error::UnsupportedDateRange`]。
///
/// # 用例
///
/// ```
/// use manseryeok::lunisolar::{self, LunarDate, Month::*};
/// use manseryeok::Error;
///
/// let date = lunisolar::to_solar(&LunarDate::new(2017, Leap(5), 1)).unwrap();
/// assert_eq!("2017-06-24", date.iso_gregorian());
///
/// let invalid = LunarDate::new(2017, Common(5), 30);
/// assert_eq!(Err(Error::InvalidCalendarDate(invalid)), lunisolar::to_solar(&invalid));
/// ```
pub fn to_solar(lunar: &LunarDate) -> Result<Date> {
    let invalid = || Error::InvalidCalendarDate(*lunar);
    if !(1..=12).contains(&lunar.month.num()) || !(1..=30).contains(&lunar.day) {
        return Err(invalid());
    }
    let annus_num = if lunar.month.num() >= 11 {
        lunar.year + 1
    } else {
        lunar.year
    };
    let annus = Annus::new(annus_num).ok_or(Error::UnsupportedDateRange { year: lunar.year })?;
    let len = annus.month_len(lunar.month).ok_or_else(invalid)?;
    if lunar.day > len {
        return Err(invalid());
    }
    let start = annus
        .months
        .iter()
        .find(|m| m.month == lunar.month)
        .ok_or_else(invalid)?
        .date;
    (start + (lunar.day as i32 - 1)).within_era()
}

/// 取得陰曆某年的閏月序號，無閏月則為 `None`。
///
/// # 用例
///
/// ```
/// use manseryeok::lunisolar;
///
/// assert_eq!(Ok(Some(5)), lunisolar::leap_month(2017));
/// assert_eq!(Ok(None), lunisolar::leap_month(2018));
/// ```
pub fn leap_month(year: i32) -> Result<Option<u32>> {
    if !SUPPORTED_YEARS.contains(&year) {
        return Err(Error::UnsupportedDateRange { year });
    }
    let unsupported = || Error::UnsupportedDateRange { year };
    let this = Annus::new(year).ok_or_else(unsupported)?;
    let next = Annus::new(year + 1).ok_or_else(unsupported)?;
    // 本年正月至十月在本歲，十一、十二月在次歲
    let leap = this
        .months
        .iter()
        .filter(|m| m.month.num() < 11)
        .chain(
            next.months[..next.months.len() - 1]
                .iter()
                .filter(|m| m.month.num() >= 11),
        )
        .find(|m| m.month.is_leap())
        .map(|m| m.month.num());
    Ok(leap)
}
