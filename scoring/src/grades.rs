//! # Grade Colours
//!
//! Boulder problems are graded by hold colour. Rope routes use numeric
//! grades, each of which falls into one of the same colour bands, so both
//! kinds can share one chart palette and one ordering.
use std::cmp::Ordering;

pub const UNKNOWN_COLOUR: &str = "#000000FF";

static COLOURS: [(&str, &str); 8] = [
    ("Yellow", "#FFE066"),
    ("Blue", "#339AF0"),
    ("Purple", "#845EF7"),
    ("Green", "#51CF66"),
    ("Orange", "#FFA94D"),
    ("Red", "#FF6B6B"),
    ("Black", "#343A40"),
    ("White", "#F8F9FA"),
];

static ROPE_BANDS: [(&str, &str); 14] = [
    ("10+", "Yellow"),
    ("14", "Blue"),
    ("15", "Blue"),
    ("16", "Purple"),
    ("17", "Purple"),
    ("18", "Green"),
    ("19", "Green"),
    ("20", "Orange"),
    ("21", "Orange"),
    ("22", "Red"),
    ("23", "Red"),
    ("24", "Black"),
    ("25", "Black"),
    ("26", "White"),
];

/// Easiest to hardest, ropes and boulders interleaved.
pub static GRADE_ORDERING: [&str; 22] = [
    "10+", "Yellow", "14", "15", "Blue", "16", "17", "Purple", "18", "19", "Green", "20", "21",
    "Orange", "22", "23", "Red", "24", "25", "Black", "26", "White",
];

static LIGHT_TEXT_BANDS: [&str; 3] = ["Black", "Purple", "Blue"];

/// Grades such as `"Blue / V3-V5"` are keyed by the part before the slash.
fn key(grade: &str) -> &str {
    grade.split('/').next().unwrap_or(grade).trim()
}

/// Colour band name for a boulder colour or rope grade.
pub fn colour_band(grade: &str) -> Option<&'static str> {
    let key = key(grade);

    COLOURS
        .iter()
        .map(|(name, _)| (*name, *name))
        .chain(ROPE_BANDS.iter().copied())
        .find(|(grade, _)| grade.eq_ignore_ascii_case(key))
        .map(|(_, band)| band)
}

pub fn colour_for_grade(grade: &str) -> &'static str {
    colour_band(grade)
        .and_then(|band| COLOURS.iter().find(|(name, _)| *name == band))
        .map_or(UNKNOWN_COLOUR, |(_, hex)| *hex)
}

/// Readable text colour on top of the grade's colour.
pub fn text_colour_for_grade(grade: &str) -> &'static str {
    match colour_band(grade) {
        Some(band) if LIGHT_TEXT_BANDS.contains(&band) => "white",
        _ => "black",
    }
}

pub fn grade_rank(grade: &str) -> Option<usize> {
    let key = key(grade);

    GRADE_ORDERING
        .iter()
        .position(|known| known.eq_ignore_ascii_case(key))
}

/// Unranked grades sort before every ranked one.
pub fn compare_grades(a: &str, b: &str) -> Ordering {
    grade_rank(a).cmp(&grade_rank(b))
}

/// Progress towards the next grade, as drawn on the average-grade dial.
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub grade: String,
    pub value: f64,
    pub colour: &'static str,
}

impl Gauge {
    pub const MAX: f64 = 100.0;

    pub fn new(grade: &str, perc_to_next_grade: Option<f64>) -> Self {
        let value = perc_to_next_grade
            .filter(|p| p.is_finite())
            .map_or(0.0, |p| (p * Self::MAX).clamp(0.0, Self::MAX));

        Self {
            grade: grade.to_string(),
            value,
            colour: colour_for_grade(grade),
        }
    }
}
