//! Heavenly stems, earthly branches and the sexagenary cycle formed by their
//! parity-matched pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::element::{self, Element, Polarity};
use crate::error::Error;
use crate::lunisolar::fmt as names;

/// One of the ten heavenly stems (天干), in cycle order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    /// Stem at `index` in `0..=9`, wrapping around for larger values.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[usize::from(index % 10)]
    }
    pub fn index(self) -> u8 {
        self as u8
    }
    /// Moves `steps` places along the cycle, backwards for negative values.
    pub fn offset(self, steps: i32) -> Self {
        Self::from_index((i32::from(self.index()) + steps).rem_euclid(10) as u8)
    }

    pub fn element(self) -> Element {
        element::resolve(self).0
    }
    pub fn polarity(self) -> Polarity {
        element::resolve(self).1
    }
    pub fn is_yang(self) -> bool {
        self.polarity() == Polarity::Yang
    }

    /// Chinese character, e.g. `"甲"`.
    pub fn hanja(self) -> &'static str {
        names::STEM_HANJA[usize::from(self.index())]
    }
    /// Korean reading, e.g. `"갑"`.
    pub fn hangul(self) -> &'static str {
        names::STEM_HANGUL[usize::from(self.index())]
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hanja())
    }
}

/// One of the twelve earthly branches (地支), in cycle order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    /// Branch at `index` in `0..=11`, wrapping around for larger values.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[usize::from(index % 12)]
    }
    pub fn index(self) -> u8 {
        self as u8
    }
    /// Moves `steps` places along the cycle, backwards for negative values.
    pub fn offset(self, steps: i32) -> Self {
        Self::from_index((i32::from(self.index()) + steps).rem_euclid(12) as u8)
    }

    /// Branch of the two-hour period containing `hour` (`0..=23`).
    ///
    /// 子 covers 23:00 to 00:59, every later branch starts at an odd hour.
    ///
    /// ```
    /// use manseryeok::sexagenary::Branch;
    ///
    /// assert_eq!(Branch::Zi, Branch::for_hour(23));
    /// assert_eq!(Branch::Zi, Branch::for_hour(0));
    /// assert_eq!(Branch::Wei, Branch::for_hour(13));
    /// assert_eq!(Branch::Hai, Branch::for_hour(22));
    /// ```
    pub fn for_hour(hour: u32) -> Self {
        Self::from_index((((hour + 1) / 2) % 12) as u8)
    }

    pub fn element(self) -> Element {
        element::branch_element(self)
    }

    pub fn hanja(self) -> &'static str {
        names::BRANCH_HANJA[usize::from(self.index())]
    }
    pub fn hangul(self) -> &'static str {
        names::BRANCH_HANGUL[usize::from(self.index())]
    }
    /// Zodiac animal in Korean, e.g. `"원숭이"` for 申.
    pub fn animal(self) -> &'static str {
        names::ZODIAC[usize::from(self.index())]
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hanja())
    }
}

/// A valid stem-branch pair, i.e. one of the sixty terms of the cycle.
///
/// Only pairs of equal parity exist: yang stems go with yang branches and yin
/// with yin.
///
/// ```
/// use manseryeok::sexagenary::{Branch, Stem, StemBranch};
///
/// let pair = StemBranch::new(Stem::Geng, Branch::Shen).unwrap();
/// assert_eq!(56, pair.index());
/// assert_eq!("庚申", pair.to_string());
/// assert!(StemBranch::new(Stem::Geng, Branch::You).is_none());
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(Stem, Branch)", into = "(Stem, Branch)")]
pub struct StemBranch {
    stem: Stem,
    branch: Branch,
}

impl StemBranch {
    /// 甲子, the first term of the cycle.
    pub const FIRST: StemBranch = StemBranch {
        stem: Stem::Jia,
        branch: Branch::Zi,
    };

    /// Pairs `stem` with `branch`, or returns `None` if their parities differ.
    pub fn new(stem: Stem, branch: Branch) -> Option<Self> {
        (stem.index() % 2 == branch.index() % 2).then_some(Self { stem, branch })
    }
    /// Term at cycle index `index`, numbered from 0 (甲子) to 59 (癸亥) and
    /// wrapping around for larger values.
    pub fn from_index(index: u8) -> Self {
        let index = index % 60;
        Self {
            stem: Stem::from_index(index % 10),
            branch: Branch::from_index(index % 12),
        }
    }
    /// Cycle index in `0..=59`.
    pub fn index(self) -> u8 {
        let (s, b) = (i32::from(self.stem.index()), i32::from(self.branch.index()));
        (6 * s - 5 * b).rem_euclid(60) as u8
    }
    /// Moves `steps` terms along the cycle, backwards for negative values.
    pub fn offset(self, steps: i32) -> Self {
        Self::from_index((i32::from(self.index()) + steps).rem_euclid(60) as u8)
    }

    pub fn stem(self) -> Stem {
        self.stem
    }
    pub fn branch(self) -> Branch {
        self.branch
    }

    /// Korean reading, e.g. `"경신"`.
    pub fn hangul(self) -> String {
        format!("{}{}", self.stem.hangul(), self.branch.hangul())
    }
}

impl fmt::Display for StemBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

impl TryFrom<(Stem, Branch)> for StemBranch {
    type Error = Error;

    fn try_from((stem, branch): (Stem, Branch)) -> Result<Self, Self::Error> {
        Self::new(stem, branch).ok_or_else(|| {
            Error::invalid_input(format!("{stem}{branch} is not a sexagenary pair"))
        })
    }
}

impl From<StemBranch> for (Stem, Branch) {
    fn from(pair: StemBranch) -> Self {
        (pair.stem, pair.branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn index_bijection() {
        let mut seen = [false; 60];
        for stem in Stem::ALL {
            for branch in Branch::ALL {
                if let Some(pair) = StemBranch::new(stem, branch) {
                    let i = usize::from(pair.index());
                    assert!(!seen[i], "{pair} collides");
                    seen[i] = true;
                    assert_eq!(pair, StemBranch::from_index(pair.index()));
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn names() {
        for (std, index) in [("甲子", 0), ("庚寅", 26), ("辛巳", 17), ("癸亥", 59)] {
            assert_eq!(std, StemBranch::from_index(index).to_string());
        }
        assert_eq!("신사", StemBranch::from_index(17).hangul());
        assert_eq!("돼지", Branch::Hai.animal());
    }

    #[test]
    fn offsets_wrap() {
        assert_eq!(59, StemBranch::FIRST.offset(-1).index());
        assert_eq!(0, StemBranch::from_index(59).offset(1).index());
        assert_eq!(Stem::Gui, Stem::Jia.offset(-1));
        assert_eq!(Branch::Zi, Branch::Hai.offset(1));
    }

    #[test]
    fn hour_buckets() {
        let expected = [0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 0];
        for (hour, std) in (0..24).zip(expected) {
            assert_eq!(std, Branch::for_hour(hour).index(), "{hour:02}:00");
        }
    }

    #[test]
    fn serde_rejects_mismatched_parity() {
        let pair = StemBranch::from_index(56);
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(r#"["Geng","Shen"]"#, json);
        assert_eq!(pair, serde_json::from_str::<StemBranch>(&json).unwrap());
        assert!(serde_json::from_str::<StemBranch>(r#"["Geng","You"]"#).is_err());
    }

    proptest! {
        #[test]
        fn parity_holds_for_every_index(index in 0u8..=255) {
            let pair = StemBranch::from_index(index);
            prop_assert_eq!(pair.stem().index() % 2, pair.branch().index() % 2);
            prop_assert_eq!(index % 60, pair.index());
        }

        #[test]
        fn offset_is_additive(index in 0u8..60, a in -200i32..200, b in -200i32..200) {
            let pair = StemBranch::from_index(index);
            prop_assert_eq!(pair.offset(a).offset(b), pair.offset(a + b));
        }
    }
}
