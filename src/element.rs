//! Five elements (五行), yin/yang polarity and the relationships derived from
//! the generation and restraint cycles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sexagenary::{Branch, Stem};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Yang,
    Yin,
}

/// How a target element stands towards a reference ("self") element.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    /// The target generates the reference (印).
    Resource,
    /// Same element (比劫).
    #[serde(rename = "Self")]
    Self_,
    /// The reference generates the target (食傷).
    Output,
    /// The reference restrains the target (財).
    Wealth,
    /// The target restrains the reference (官).
    Power,
}

/// Seasons as the branches divide the year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

const STEM_ELEMENTS: [Element; 5] = [
    Element::Wood,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Water,
];

const BRANCH_ELEMENTS: [Element; 12] = [
    Element::Water,
    Element::Earth,
    Element::Wood,
    Element::Wood,
    Element::Earth,
    Element::Fire,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Metal,
    Element::Earth,
    Element::Water,
];

/// Resolves a stem, typically the Day Master, to its element and polarity.
///
/// ```
/// use manseryeok::element::{resolve, Element, Polarity};
/// use manseryeok::sexagenary::Stem;
///
/// assert_eq!((Element::Metal, Polarity::Yin), resolve(Stem::Xin));
/// assert_eq!((Element::Wood, Polarity::Yang), resolve(Stem::Jia));
/// ```
pub fn resolve(stem: Stem) -> (Element, Polarity) {
    let i = usize::from(stem.index());
    let polarity = if i % 2 == 0 {
        Polarity::Yang
    } else {
        Polarity::Yin
    };
    (STEM_ELEMENTS[i / 2], polarity)
}

/// Element of an earthly branch; 辰戌丑未 are Earth.
pub fn branch_element(branch: Branch) -> Element {
    BRANCH_ELEMENTS[usize::from(branch.index())]
}

/// Season of a branch: 寅卯辰 spring, 巳午未 summer, 申酉戌 autumn, 亥子丑
/// winter.
pub fn season(branch: Branch) -> Season {
    match branch.index() {
        2..=4 => Season::Spring,
        5..=7 => Season::Summer,
        8..=10 => Season::Autumn,
        _ => Season::Winter,
    }
}

impl Element {
    pub const ALL: [Element; 5] = STEM_ELEMENTS;

    fn index(self) -> usize {
        self as usize
    }

    /// The element this one generates (相生): Wood → Fire → Earth → Metal →
    /// Water → Wood.
    pub fn generates(self) -> Element {
        Self::ALL[(self.index() + 1) % 5]
    }
    /// The element this one restrains (相剋): Wood → Earth → Water → Fire →
    /// Metal → Wood.
    pub fn restrains(self) -> Element {
        Self::ALL[(self.index() + 2) % 5]
    }

    pub fn hanja(self) -> &'static str {
        ["木", "火", "土", "金", "水"][self.index()]
    }
    pub fn hangul(self) -> &'static str {
        ["목", "화", "토", "금", "수"][self.index()]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hanja())
    }
}

/// Relationship of `target` towards `day_master`.
///
/// ```
/// use manseryeok::element::{relationship_of, Element::*, Relationship};
///
/// assert_eq!(Relationship::Resource, relationship_of(Fire, Wood));
/// assert_eq!(Relationship::Wealth, relationship_of(Wood, Earth));
/// ```
pub fn relationship_of(day_master: Element, target: Element) -> Relationship {
    match (target.index() + 5 - day_master.index()) % 5 {
        0 => Relationship::Self_,
        1 => Relationship::Output,
        2 => Relationship::Wealth,
        3 => Relationship::Power,
        _ => Relationship::Resource,
    }
}
