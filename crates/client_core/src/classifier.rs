//! Maps an air-quality index onto one of six health-impact categories.
//!
//! Bands are inclusive on their upper edge and classification always uses the
//! unrounded index; rounding is a display concern only.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Ascending order; drives the health-view legend.
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthySensitive,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    pub fn from_index(index: f64) -> Self {
        // NaN and negatives collapse to the bottom band.
        let index = if index.is_nan() { 0.0 } else { index.max(0.0) };
        if index <= 50.0 {
            AqiCategory::Good
        } else if index <= 100.0 {
            AqiCategory::Moderate
        } else if index <= 150.0 {
            AqiCategory::UnhealthySensitive
        } else if index <= 200.0 {
            AqiCategory::Unhealthy
        } else if index <= 300.0 {
            AqiCategory::VeryUnhealthy
        } else {
            AqiCategory::Hazardous
        }
    }

    pub fn tier(self) -> u8 {
        match self {
            AqiCategory::Good => 1,
            AqiCategory::Moderate => 2,
            AqiCategory::UnhealthySensitive => 3,
            AqiCategory::Unhealthy => 4,
            AqiCategory::VeryUnhealthy => 5,
            AqiCategory::Hazardous => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    pub fn range_label(self) -> &'static str {
        match self {
            AqiCategory::Good => "0-50",
            AqiCategory::Moderate => "51-100",
            AqiCategory::UnhealthySensitive => "101-150",
            AqiCategory::Unhealthy => "151-200",
            AqiCategory::VeryUnhealthy => "201-300",
            AqiCategory::Hazardous => "301+",
        }
    }

    pub fn color(self) -> ColorToken {
        match self {
            AqiCategory::Good => ColorToken::Green,
            AqiCategory::Moderate => ColorToken::Yellow,
            AqiCategory::UnhealthySensitive => ColorToken::Orange,
            AqiCategory::Unhealthy => ColorToken::Red,
            AqiCategory::VeryUnhealthy => ColorToken::Purple,
            AqiCategory::Hazardous => ColorToken::Maroon,
        }
    }

    pub fn advisory(self) -> &'static str {
        match self {
            AqiCategory::Good => "Air quality is satisfactory. Enjoy outdoor activities!",
            AqiCategory::Moderate => {
                "Air quality is acceptable. Unusually sensitive people should consider limiting prolonged outdoor exertion."
            }
            AqiCategory::UnhealthySensitive => {
                "Members of sensitive groups may experience health effects. Reduce prolonged outdoor exertion."
            }
            AqiCategory::Unhealthy => {
                "Everyone may begin to experience health effects. Avoid prolonged outdoor exertion."
            }
            AqiCategory::VeryUnhealthy => {
                "Health alert: everyone may experience serious health effects. Stay indoors."
            }
            AqiCategory::Hazardous => {
                "Health warnings of emergency conditions. Everyone should avoid outdoor activities."
            }
        }
    }

    /// One-line summary shown next to each band in the legend.
    pub fn short_description(self) -> &'static str {
        match self {
            AqiCategory::Good => "Air quality is satisfactory",
            AqiCategory::Moderate => "Acceptable air quality",
            AqiCategory::UnhealthySensitive => "Sensitive groups may experience effects",
            AqiCategory::Unhealthy => "Everyone may experience effects",
            AqiCategory::VeryUnhealthy => "Health alert: everyone may experience serious effects",
            AqiCategory::Hazardous => "Emergency conditions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
    Maroon,
}

impl ColorToken {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorToken::Green => "green",
            ColorToken::Yellow => "yellow",
            ColorToken::Orange => "orange",
            ColorToken::Red => "red",
            ColorToken::Purple => "purple",
            ColorToken::Maroon => "maroon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub index: f64,
    pub category: AqiCategory,
}

impl Classification {
    pub fn status(&self) -> &'static str {
        self.category.label()
    }

    pub fn tier(&self) -> u8 {
        self.category.tier()
    }

    pub fn advisory(&self) -> &'static str {
        self.category.advisory()
    }

    pub fn display_index(&self) -> i64 {
        display_index(self.index)
    }
}

pub fn classify(index: f64) -> Classification {
    Classification {
        index,
        category: AqiCategory::from_index(index),
    }
}

/// Rounds half away from zero, which matches the dashboard's rounding for the
/// non-negative values it ever shows.
pub fn display_index(index: f64) -> i64 {
    if index.is_finite() {
        index.round() as i64
    } else {
        0
    }
}

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod tests;
