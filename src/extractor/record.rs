//! Normalized review record types

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::harvest_engine::HarvestError;
use crate::utils::NOT_SPECIFIED;

/// Long calendar form used for dates in the export, e.g. "January 05, 2024"
pub const LONG_DATE_FORMAT: &str = "%B %d, %Y";

/// Formats accepted for "date of experience" labels
const LABEL_DATE_FORMATS: &[&str] = &[LONG_DATE_FORMAT, "%b %d, %Y", "%d %B %Y", "%Y-%m-%d"];

/// Date a review refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDate {
    Calendar(NaiveDate),
    /// Label text present on the page that isn't a recognizable date
    Text(String),
    NotSpecified,
}

impl ReviewDate {
    /// Interpret label text, keeping it verbatim if no known format matches
    #[must_use]
    pub fn from_label(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::NotSpecified;
        }
        LABEL_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
            .map_or_else(|| Self::Text(text.to_string()), Self::Calendar)
    }

    #[must_use]
    pub fn is_specified(&self) -> bool {
        !matches!(self, Self::NotSpecified)
    }
}

impl fmt::Display for ReviewDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calendar(date) => write!(f, "{}", date.format(LONG_DATE_FORMAT)),
            Self::Text(text) => f.write_str(text),
            Self::NotSpecified => f.write_str(NOT_SPECIFIED),
        }
    }
}

impl Serialize for ReviewDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Star rating in `0..=5`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StarRating(u8);

impl StarRating {
    pub const MAX: u8 = 5;

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for StarRating {
    type Error = HarvestError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or_else(|| {
                HarvestError::RecordParse(format!(
                    "star rating {value} is outside 0..={}",
                    Self::MAX
                ))
            })
    }
}

/// One harvested review
///
/// Built only by the record extractor; fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRecord {
    date: ReviewDate,
    author: String,
    place: String,
    content: String,
    #[serde(rename = "overall_rating")]
    rating: StarRating,
    verified: bool,
}

impl ReviewRecord {
    pub(crate) fn new(
        date: ReviewDate,
        author: String,
        place: String,
        content: String,
        rating: StarRating,
        verified: bool,
    ) -> Self {
        Self {
            date,
            author,
            place,
            content,
            rating,
            verified,
        }
    }

    #[must_use]
    pub fn date(&self) -> &ReviewDate {
        &self.date
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn place(&self) -> &str {
        &self.place
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn rating(&self) -> StarRating {
        self.rating
    }

    #[must_use]
    pub fn verified(&self) -> bool {
        self.verified
    }
}
