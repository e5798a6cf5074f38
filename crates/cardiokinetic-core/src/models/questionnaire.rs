// ABOUTME: Daily subjective wellness questionnaire responses keyed by calendar date
// ABOUTME: Validates 1-5 ratings and parses boundary input once into typed question ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::wellness::{RATING_MAX, RATING_MIN};
use crate::errors::{AppError, AppResult};

/// Questionnaire item
///
/// Every item is rated 1-5 where 5 is the most favourable answer: long sleep,
/// high energy, no soreness, calm, good mood, eager to train, well fuelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    /// Hours slept
    SleepHours,
    /// Subjective sleep quality
    SleepQuality,
    /// Energy level
    Energy,
    /// Muscle soreness (5 = none)
    Soreness,
    /// Life stress (5 = calm)
    Stress,
    /// Mood
    Mood,
    /// Motivation to train
    Motivation,
    /// Nutrition and hydration
    Nutrition,
}

impl QuestionId {
    /// All questionnaire items in display order
    pub const ALL: [Self; 8] = [
        Self::SleepHours,
        Self::SleepQuality,
        Self::Energy,
        Self::Soreness,
        Self::Stress,
        Self::Mood,
        Self::Motivation,
        Self::Nutrition,
    ];

    /// Stable string identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SleepHours => "sleep_hours",
            Self::SleepQuality => "sleep_quality",
            Self::Energy => "energy",
            Self::Soreness => "soreness",
            Self::Stress => "stress",
            Self::Mood => "mood",
            Self::Motivation => "motivation",
            Self::Nutrition => "nutrition",
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown questionnaire item '{s}'")))
    }
}

/// One day's questionnaire answers; the date is the unique key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireResponse {
    /// Day the answers describe
    pub date: NaiveDate,
    /// Ratings by question
    pub responses: BTreeMap<QuestionId, u8>,
    /// When the answers were recorded or last edited
    pub timestamp: DateTime<Utc>,
}

impl QuestionnaireResponse {
    /// Build a response, rejecting ratings outside 1-5
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` if any rating is outside the 1-5 scale
    pub fn new(
        date: NaiveDate,
        responses: BTreeMap<QuestionId, u8>,
        timestamp: DateTime<Utc>,
    ) -> AppResult<Self> {
        validate_ratings(&responses)?;
        Ok(Self {
            date,
            responses,
            timestamp,
        })
    }

    /// Parse a response from boundary data (ISO date string and string-keyed ratings)
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` for an unparseable date, `InvalidInput` for an
    /// unknown question id, and `ValueOutOfRange` for ratings outside 1-5
    pub fn parse<'a, I>(date: &str, responses: I, timestamp: DateTime<Utc>) -> AppResult<Self>
    where
        I: IntoIterator<Item = (&'a str, u8)>,
    {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
        let responses = responses
            .into_iter()
            .map(|(key, rating)| key.parse::<QuestionId>().map(|id| (id, rating)))
            .collect::<AppResult<BTreeMap<_, _>>>()?;
        Self::new(date, responses, timestamp)
    }

    /// Replace the answers while keeping the original date key
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` if any new rating is outside the 1-5 scale
    pub fn edit(
        &mut self,
        responses: BTreeMap<QuestionId, u8>,
        timestamp: DateTime<Utc>,
    ) -> AppResult<()> {
        validate_ratings(&responses)?;
        self.responses = responses;
        self.timestamp = timestamp;
        Ok(())
    }

    /// Rating for one question, if answered
    #[must_use]
    pub fn rating(&self, id: QuestionId) -> Option<u8> {
        self.responses.get(&id).copied()
    }

    /// Whether the question was answered with exactly this rating
    #[must_use]
    pub fn answered(&self, id: QuestionId, rating: u8) -> bool {
        self.rating(id) == Some(rating)
    }
}

fn validate_ratings(responses: &BTreeMap<QuestionId, u8>) -> AppResult<()> {
    for (id, rating) in responses {
        if !(RATING_MIN..=RATING_MAX).contains(rating) {
            return Err(AppError::out_of_range(format!(
                "Rating for '{id}' must be between {RATING_MIN} and {RATING_MAX}, got {rating}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_parse_valid_response() {
        let response =
            QuestionnaireResponse::parse("2024-03-04", [("energy", 4), ("stress", 2)], Utc::now())
                .unwrap();
        assert_eq!(response.rating(QuestionId::Energy), Some(4));
        assert_eq!(response.rating(QuestionId::Mood), None);
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let err = QuestionnaireResponse::parse("04/03/2024", [("energy", 4)], Utc::now())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_rejects_out_of_scale_rating() {
        let err =
            QuestionnaireResponse::parse("2024-03-04", [("mood", 6)], Utc::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_edit_preserves_date() {
        let mut response =
            QuestionnaireResponse::parse("2024-03-04", [("mood", 2)], Utc::now()).unwrap();
        let original_date = response.date;
        response
            .edit(BTreeMap::from([(QuestionId::Mood, 4)]), Utc::now())
            .unwrap();
        assert_eq!(response.date, original_date);
        assert!(response.answered(QuestionId::Mood, 4));
    }
}
