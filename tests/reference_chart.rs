use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, Timelike};
use manseryeok::lunisolar::{LunarDate, Month};
use manseryeok::{
    BirthProfile, Chart, ChartConfig, Direction, FourPillars, Gender, SolarTerm, pillars,
    solar_terms,
};

fn kst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

fn solar(y: i32, m: u32, d: u32, time: Option<NaiveTime>, gender: Gender) -> BirthProfile {
    BirthProfile::solar(NaiveDate::from_ymd_opt(y, m, d).unwrap(), time, gender, kst())
}

fn hm(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

fn names(pillars: &FourPillars) -> Vec<String> {
    pillars
        .as_array()
        .iter()
        .map(|p| p.map_or_else(|| "-".to_owned(), |p| p.to_string()))
        .collect()
}

#[test]
fn reference_chart() {
    let profile = solar(1980, 7, 7, hm(13, 0), Gender::Male);
    let chart = Chart::compute(&profile, &ChartConfig::default()).unwrap();
    assert_eq!(["庚申", "癸未", "辛巳", "乙未"], names(&chart.pillars).as_slice());
    assert_eq!(Direction::Forward, chart.daewoon.direction);
    assert_eq!(10, chart.daewoon.pillars[0].start_age);
    assert_eq!("甲申", chart.daewoon.pillars[0].pillar.to_string());
    assert_eq!((10, 19), (chart.daewoon.pillars[0].start_age, chart.daewoon.pillars[0].end_age));
}

#[test]
fn lunar_input_gives_same_chart() {
    let solar_chart = pillars::four_pillars(&solar(1980, 7, 7, hm(13, 0), Gender::Male)).unwrap();
    let lunar = BirthProfile::lunar(
        LunarDate::new(1980, Month::Common(5), 25),
        hm(13, 0),
        Gender::Male,
        kst(),
    );
    assert_eq!(solar_chart, pillars::four_pillars(&lunar).unwrap());
}

#[test]
fn direction_law() {
    let male = solar(1980, 7, 7, hm(13, 0), Gender::Male);
    let female = BirthProfile {
        gender: Gender::Female,
        ..male
    };
    let config = ChartConfig::default();
    let male = Chart::compute(&male, &config).unwrap();
    let female = Chart::compute(&female, &config).unwrap();
    assert!(male.pillars.year.stem().is_yang());
    assert_eq!(Direction::Forward, male.daewoon.direction);
    assert_eq!(Direction::Backward, female.daewoon.direction);
    assert_eq!("壬午", female.daewoon.pillars[0].pillar.to_string());
    assert_eq!(1, female.daewoon.pillars[0].start_age);
}

#[test]
fn month_boundary() {
    let boundary = solar_terms::boundaries_for_year(1980)
        .unwrap()
        .into_iter()
        .find(|b| b.term == SolarTerm::XIAOSHU)
        .unwrap();
    let local = boundary.instant.with_timezone(&kst()) - Duration::seconds(1);
    let before = local.time().with_second(0).unwrap();
    let after = before + Duration::minutes(1);
    assert_eq!(8, before.hour());

    let before = pillars::four_pillars(&solar(1980, 7, 7, Some(before), Gender::Male)).unwrap();
    let after = pillars::four_pillars(&solar(1980, 7, 7, Some(after), Gender::Male)).unwrap();
    assert_eq!("壬午", before.month.to_string());
    assert_eq!("癸未", after.month.to_string());
    assert_eq!(before.year, after.year);
    assert_eq!(before.day, after.day);
    assert_eq!(before.hour, after.hour);
    assert_eq!("壬辰", after.hour.unwrap().to_string());
}

#[test]
fn hour_boundary() {
    let late = pillars::four_pillars(&solar(1980, 7, 7, hm(22, 59), Gender::Male)).unwrap();
    let zi = pillars::four_pillars(&solar(1980, 7, 7, hm(23, 1), Gender::Male)).unwrap();
    assert_eq!("己亥", late.hour.unwrap().to_string());
    assert_eq!("辛巳", late.day.to_string());
    assert_eq!("庚子", zi.hour.unwrap().to_string());
    let next_day = pillars::day_pillar_for(NaiveDate::from_ymd_opt(1980, 7, 8).unwrap()).unwrap();
    assert_eq!(next_day, zi.day);
    assert_eq!(late.month, zi.month);
}

#[test]
fn unknown_time() {
    let chart = Chart::compute(
        &solar(1980, 7, 7, None, Gender::Male),
        &ChartConfig::default(),
    )
    .unwrap();
    assert_eq!(None, chart.pillars.hour);
    assert!(chart.pillars.time_assumed);
    assert_eq!(["庚申", "癸未", "辛巳", "-"], names(&chart.pillars).as_slice());
}

#[test]
fn parsed_profile() {
    let profile = BirthProfile::parse(
        "1980-05-25",
        "13:00",
        manseryeok::CalendarKind::Lunar,
        false,
        Gender::Male,
        kst(),
    )
    .unwrap();
    let pillars = pillars::four_pillars(&profile).unwrap();
    assert_eq!(["庚申", "癸未", "辛巳", "乙未"], names(&pillars).as_slice());
}
