use std::fmt;

use serde::{Deserialize, Serialize};

/// Calendar year of an observation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(pub i32);

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which years a view covers: one year, or all of them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearFilter {
    Specific(Year),
    AllYears,
}

impl YearFilter {
    pub fn matches(self, year: Year) -> bool {
        match self {
            YearFilter::Specific(y) => y == year,
            YearFilter::AllYears => true,
        }
    }

    pub fn year(self) -> Option<Year> {
        match self {
            YearFilter::Specific(y) => Some(y),
            YearFilter::AllYears => None,
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::Specific(y) => write!(f, "{y}"),
            YearFilter::AllYears => f.write_str("all"),
        }
    }
}
