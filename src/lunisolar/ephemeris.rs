//! 節氣合朔曆表
//!
//! 太陽視黃經採用 Bretagnon 與 Simon 的 49 項週期級數（見 *Calendrical
//! Calculations*），另加光行差及黃經章動；合朔時刻採用 Meeus《天文算法》第
//! 49 章的方法。1900 至 2100 年間節氣與合朔時刻誤差均在一分鐘以內。
//!
//! 每歲曆表於首次取用時計算，其後緩存，可供多綫程同時讀取。

use std::f64::consts::PI;
use std::sync::OnceLock;

use crate::time_scales::Tt;

/// 曆表支持的首歲，須含 1900 年首日所在之歲。
pub const FIRST_ANNUS: i32 = 1899;
/// 曆表支持的末歲，須含 2100 年末日之後的首個節。
pub const LAST_ANNUS: i32 = 2102;

const ANNUS_COUNT: usize = (LAST_ANNUS - FIRST_ANNUS + 1) as usize;

/// J2000.0 曆元
const J2000: f64 = 2451545.0;
const MEAN_TROPICAL_YEAR: f64 = 365.242189;
const MEAN_SYNODIC_MONTH: f64 = 29.530588861;
/// 2000 年冬至的近似時刻，用作迭代初值
const WINTER_SOLSTICE_2000: f64 = 2451900.06;

/// 保存一歲的曆表數據
#[derive(Debug)]
pub struct Annus {
    /// 序號，為該歲大部分時段所在公元年
    pub annus: i32,
    /// 從前一年冬至開始的各節氣時刻，亦含本年冬至以便計算末日
    pub solar_term: [Tt; 25],
    /// 合朔時刻，列出從冬至前（或冬至當時）一朔開始的十五個朔
    pub new_moon: [Tt; 15],
}

static DATA: [OnceLock<Annus>; ANNUS_COUNT] = [const { OnceLock::new() }; ANNUS_COUNT];

impl Annus {
    /// 取得公元 `annus` 年對應的歳的曆表。
    ///
    /// 超出 [`FIRST_ANNUS`]..=[`LAST_ANNUS`] 則返回 `None`。
    pub fn get(annus: i32) -> Option<&'static Self> {
        let idx = usize::try_from(annus - FIRST_ANNUS).ok()?;
        DATA.get(idx)
            .map(|cell| cell.get_or_init(|| Self::compute(annus)))
    }

    fn compute(annus: i32) -> Self {
        let mut guess = Tt(WINTER_SOLSTICE_2000 + f64::from(annus - 2001) * MEAN_TROPICAL_YEAR);
        let mut solar_term = [Tt(0.0); 25];
        for (i, term) in solar_term.iter_mut().enumerate() {
            *term = solar_term_time(270.0 + 15.0 * i as f64, guess);
            guess = Tt(term.0 + MEAN_TROPICAL_YEAR / 24.0);
        }

        let winter_solstice = solar_term[0];
        let mut k = ((winter_solstice.0 - new_moon(0).0) / MEAN_SYNODIC_MONTH).floor() as i32;
        while new_moon(k) > winter_solstice {
            k -= 1;
        }
        while new_moon(k + 1) <= winter_solstice {
            k += 1;
        }
        let new_moons = std::array::from_fn(|i| new_moon(k + i as i32));

        tracing::debug!(annus, k, "computed ephemeris");
        Annus {
            annus,
            solar_term,
            new_moon: new_moons,
        }
    }
}

fn sin_deg(x: f64) -> f64 {
    (x * PI / 180.0).sin()
}
fn cos_deg(x: f64) -> f64 {
    (x * PI / 180.0).cos()
}

/// `(係數, 角速度, 初相)`，角度單位為度，時間單位為儒略世紀
const SOLAR_LONGITUDE_SERIES: [(f64, f64, f64); 49] = [
    (403406.0, 0.9287892, 270.54861),
    (195207.0, 35999.1376958, 340.19128),
    (119433.0, 35999.4089666, 63.91854),
    (112392.0, 35998.7287385, 331.26220),
    (3891.0, 71998.20261, 317.843),
    (2819.0, 71998.4403, 86.631),
    (1721.0, 36000.35726, 240.052),
    (660.0, 71997.4812, 310.26),
    (350.0, 32964.4678, 247.23),
    (334.0, -19.4410, 260.87),
    (314.0, 445267.1117, 297.82),
    (268.0, 45036.8840, 343.14),
    (242.0, 3.1008, 166.79),
    (234.0, 22518.4434, 81.53),
    (158.0, -19.9739, 3.50),
    (132.0, 65928.9345, 132.75),
    (129.0, 9038.0293, 182.95),
    (114.0, 3034.7684, 162.03),
    (99.0, 33718.148, 29.8),
    (93.0, 3034.448, 266.4),
    (86.0, -2280.773, 249.2),
    (78.0, 29929.992, 157.6),
    (72.0, 31556.493, 257.8),
    (68.0, 149.588, 185.1),
    (64.0, 9037.750, 69.9),
    (46.0, 107997.405, 8.0),
    (38.0, -4444.176, 197.1),
    (37.0, 151.771, 250.4),
    (32.0, 67555.316, 65.3),
    (29.0, 31556.080, 162.7),
    (28.0, -4561.540, 341.5),
    (27.0, 107996.706, 291.6),
    (27.0, 1221.655, 98.5),
    (25.0, 62894.167, 146.7),
    (24.0, 31437.369, 110.0),
    (21.0, 14578.298, 5.2),
    (21.0, -31931.757, 342.6),
    (20.0, 34777.243, 230.9),
    (18.0, 1221.999, 256.1),
    (17.0, 62894.511, 45.3),
    (14.0, -4442.039, 242.9),
    (13.0, 107997.909, 115.2),
    (13.0, 119.066, 151.8),
    (13.0, 16859.071, 285.3),
    (12.0, -4.578, 53.3),
    (10.0, 26895.292, 126.6),
    (10.0, -39.127, 205.7),
    (10.0, 12297.536, 85.9),
    (10.0, 90073.778, 146.1),
];

/// 給定時刻的太陽視黃經，單位為度，範圍 `0.0..360.0`。
pub fn apparent_solar_longitude(tt: Tt) -> f64 {
    let c = (tt.0 - J2000) / 36525.0;
    let periodic: f64 = SOLAR_LONGITUDE_SERIES
        .iter()
        .map(|&(x, y, z)| x * sin_deg(y * c + z))
        .sum();
    let lambda = 282.7771834 + 36000.76953744 * c + 0.000005729577951308232 * periodic;
    let aberration = 0.0000974 * cos_deg(177.63 + 35999.01848 * c) - 0.005575;
    let a = 124.90 - 1934.134 * c + 0.002063 * c * c;
    let b = 201.11 + 72001.5377 * c + 0.00057 * c * c;
    let nutation = -0.004778 * sin_deg(a) - 0.0003667 * sin_deg(b);
    (lambda + aberration + nutation).rem_euclid(360.0)
}

/// 求太陽視黃經達到 `longitude` 度的時刻，`guess` 須在所求時刻前後數日內。
pub fn solar_term_time(longitude: f64, guess: Tt) -> Tt {
    let mut t = guess.0;
    for _ in 0..20 {
        let diff = (longitude - apparent_solar_longitude(Tt(t)) + 540.0).rem_euclid(360.0) - 180.0;
        t += diff * MEAN_TROPICAL_YEAR / 360.0;
        if diff.abs() < 1e-7 {
            break;
        }
    }
    Tt(t)
}

/// `(係數, E 的次數, 及 M、M′、F、Ω 各自的倍數)`
const NEW_MOON_TERMS: [(f64, i32, f64, f64, f64, f64); 25] = [
    (-0.40720, 0, 0.0, 1.0, 0.0, 0.0),
    (0.17241, 1, 1.0, 0.0, 0.0, 0.0),
    (0.01608, 0, 0.0, 2.0, 0.0, 0.0),
    (0.01039, 0, 0.0, 0.0, 2.0, 0.0),
    (0.00739, 1, -1.0, 1.0, 0.0, 0.0),
    (-0.00514, 1, 1.0, 1.0, 0.0, 0.0),
    (0.00208, 2, 2.0, 0.0, 0.0, 0.0),
    (-0.00111, 0, 0.0, 1.0, -2.0, 0.0),
    (-0.00057, 0, 0.0, 1.0, 2.0, 0.0),
    (0.00056, 1, 1.0, 2.0, 0.0, 0.0),
    (-0.00042, 0, 0.0, 3.0, 0.0, 0.0),
    (0.00042, 1, 1.0, 0.0, 2.0, 0.0),
    (0.00038, 1, 1.0, 0.0, -2.0, 0.0),
    (-0.00024, 1, -1.0, 2.0, 0.0, 0.0),
    (-0.00017, 0, 0.0, 0.0, 0.0, 1.0),
    (-0.00007, 0, 2.0, 1.0, 0.0, 0.0),
    (0.00004, 0, 0.0, 2.0, -2.0, 0.0),
    (0.00004, 0, 3.0, 0.0, 0.0, 0.0),
    (0.00003, 0, 1.0, 1.0, -2.0, 0.0),
    (0.00003, 0, 0.0, 2.0, 2.0, 0.0),
    (-0.00003, 0, 1.0, 1.0, 2.0, 0.0),
    (0.00003, 0, -1.0, 1.0, 2.0, 0.0),
    (-0.00002, 0, -1.0, 1.0, -2.0, 0.0),
    (-0.00002, 0, 1.0, 3.0, 0.0, 0.0),
    (0.00002, 0, 0.0, 4.0, 0.0, 0.0),
];

/// 行星攝動項 `(係數, 初相, 角速度)`，首項另有 T² 項
const PLANETARY_TERMS: [(f64, f64, f64); 14] = [
    (0.000325, 299.77, 0.107408),
    (0.000165, 251.88, 0.016321),
    (0.000164, 251.83, 26.651886),
    (0.000126, 349.42, 36.412478),
    (0.000110, 84.66, 18.206239),
    (0.000062, 141.74, 53.303771),
    (0.000060, 207.14, 2.453732),
    (0.000056, 154.84, 7.306860),
    (0.000047, 34.52, 27.261239),
    (0.000042, 207.19, 0.121824),
    (0.000040, 291.34, 1.844379),
    (0.000037, 161.72, 24.198154),
    (0.000035, 239.56, 25.513099),
    (0.000023, 331.55, 3.592518),
];

/// 第 `k` 個朔的時刻，`k = 0` 為 2000 年 1 月 6 日之朔，負數為此前。
pub fn new_moon(k: i32) -> Tt {
    let k = f64::from(k);
    let t = k / 1236.85;
    let (t2, t3, t4) = (t * t, t * t * t, t * t * t * t);

    let mean = 2451550.09766 + MEAN_SYNODIC_MONTH * k + 0.00015437 * t2 - 0.000000150 * t3
        + 0.00000000073 * t4;
    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let m = 2.5534 + 29.10535670 * k - 0.0000014 * t2 - 0.00000011 * t3;
    let m1 = 201.5643 + 385.81693528 * k + 0.0107582 * t2 + 0.00001238 * t3 - 0.000000058 * t4;
    let f = 160.7108 + 390.67050284 * k - 0.0016118 * t2 - 0.00000227 * t3 + 0.000000011 * t4;
    let omega = 124.7746 - 1.56375588 * k + 0.0020672 * t2 + 0.00000215 * t3;

    let periodic: f64 = NEW_MOON_TERMS
        .iter()
        .map(|&(coef, e_pow, cm, cm1, cf, co)| {
            coef * e.powi(e_pow) * sin_deg(cm * m + cm1 * m1 + cf * f + co * omega)
        })
        .sum();
    let planetary: f64 = PLANETARY_TERMS
        .iter()
        .enumerate()
        .map(|(i, &(coef, phase, rate))| {
            let arg = phase + rate * k - if i == 0 { 0.009173 * t2 } else { 0.0 };
            coef * sin_deg(arg)
        })
        .sum();

    Tt(mean + periodic + planetary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lunisolar::date_kst;

    #[test]
    fn solar_longitude() {
        // Meeus, example 25.b
        let lambda = apparent_solar_longitude(Tt(2448908.5));
        assert!((lambda - 199.906061).abs() < 0.001, "{lambda}");
    }

    #[test]
    fn new_moon_time() {
        // Meeus, example 49.a
        let tt = new_moon(-283);
        assert!((tt.0 - 2443192.65118).abs() < 1e-4, "{}", tt.0);
    }

    #[test]
    fn solar_terms() {
        let annus = Annus::get(2000).unwrap();
        let date = date_kst(annus.solar_term[0]);
        assert_eq!("1999-12-22", date.iso_gregorian());
        let date = date_kst(annus.solar_term[24]);
        assert_eq!("2000-12-21", date.iso_gregorian());
        for pair in annus.solar_term.windows(2) {
            let gap = pair[1].0 - pair[0].0;
            assert!((14.0..16.5).contains(&gap), "{gap}");
        }
    }

    #[test]
    fn new_moons() {
        let annus = Annus::get(2000).unwrap();
        let date = date_kst(annus.new_moon[0]);
        assert_eq!("1999-12-08", date.iso_gregorian());
        assert!(annus.new_moon[0] <= annus.solar_term[0]);
        assert!(annus.new_moon[1] > annus.solar_term[0]);
    }

    #[test]
    fn cached() {
        let a = Annus::get(1984).unwrap();
        let b = Annus::get(1984).unwrap();
        assert!(std::ptr::eq(a, b));
        assert!(Annus::get(FIRST_ANNUS - 1).is_none());
        assert!(Annus::get(LAST_ANNUS + 1).is_none());
        assert!(Annus::get(LAST_ANNUS).is_some());
    }
}
