// ABOUTME: Record store contract for session history and daily questionnaire responses
// ABOUTME: Includes a thread-safe in-memory implementation keyed by calendar date
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Training record storage
//!
//! The engine never owns persistence; it reads through [`TrainingRecordStore`].
//! Questionnaire responses are keyed by date, and editing a response keeps its
//! original date.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{NaiveDate, Utc};

use crate::errors::{AppError, AppResult};
use crate::models::{QuestionId, QuestionnaireResponse, Session};

/// Storage contract for training records
pub trait TrainingRecordStore: Send + Sync {
    /// Append a completed session
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable
    fn add_session(&self, session: Session) -> AppResult<()>;

    /// Sessions dated within `[start, end]`, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable
    fn sessions_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Session>>;

    /// Date of the earliest stored session
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable
    fn first_session_date(&self) -> AppResult<Option<NaiveDate>>;

    /// Insert a response, or replace the answers of the one already stored for its date
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for invalid ratings, or an error if the store is unavailable
    fn upsert_response(&self, response: QuestionnaireResponse) -> AppResult<()>;

    /// Response recorded for a date
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable
    fn response_on(&self, date: NaiveDate) -> AppResult<Option<QuestionnaireResponse>>;

    /// Responses dated in `[from, until)`, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable
    fn responses_between(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<Vec<QuestionnaireResponse>>;
}

#[derive(Debug, Default)]
struct Records {
    sessions: Vec<Session>,
    responses: BTreeMap<NaiveDate, QuestionnaireResponse>,
}

/// In-memory record store
///
/// Clones share the same underlying records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<Records>>,
}

fn poisoned<T>(_: PoisonError<T>) -> AppError {
    AppError::storage("Record store lock poisoned")
}

impl InMemoryRecordStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with sessions
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned
    pub fn with_sessions<I>(sessions: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = Session>,
    {
        let store = Self::new();
        for session in sessions {
            store.add_session(session)?;
        }
        Ok(store)
    }

    /// Replace the answers for an existing date
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no response exists for the date, or
    /// `ValueOutOfRange` for invalid ratings
    pub fn edit_response(
        &self,
        date: NaiveDate,
        responses: BTreeMap<QuestionId, u8>,
    ) -> AppResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        let existing = records
            .responses
            .get_mut(&date)
            .ok_or_else(|| AppError::not_found(format!("Questionnaire response for {date}")))?;
        existing.edit(responses, Utc::now())
    }
}

impl TrainingRecordStore for InMemoryRecordStore {
    fn add_session(&self, session: Session) -> AppResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        // Keep chronological order; same-day sessions stay in insertion order
        let position = records
            .sessions
            .partition_point(|existing| existing.date <= session.date);
        records.sessions.insert(position, session);
        Ok(())
    }

    fn sessions_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Session>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .sessions
            .iter()
            .filter(|session| session.date >= start && session.date <= end)
            .cloned()
            .collect())
    }

    fn first_session_date(&self) -> AppResult<Option<NaiveDate>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.sessions.first().map(|session| session.date))
    }

    fn upsert_response(&self, response: QuestionnaireResponse) -> AppResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        match records.responses.get_mut(&response.date) {
            Some(existing) => existing.edit(response.responses, response.timestamp),
            None => {
                records.responses.insert(response.date, response);
                Ok(())
            }
        }
    }

    fn response_on(&self, date: NaiveDate) -> AppResult<Option<QuestionnaireResponse>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.responses.get(&date).cloned())
    }

    fn responses_between(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<Vec<QuestionnaireResponse>> {
        if from >= until {
            return Ok(Vec::new());
        }
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .responses
            .range(from..until)
            .map(|(_, response)| response.clone())
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_sessions_kept_in_date_order() {
        let store = InMemoryRecordStore::new();
        store.add_session(Session::new(day(5), 30.0, 6.0)).unwrap();
        store.add_session(Session::new(day(2), 45.0, 5.0)).unwrap();
        store.add_session(Session::new(day(9), 20.0, 8.0)).unwrap();

        let sessions = store.sessions_between(day(1), day(6)).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].date, day(2));
        assert_eq!(store.first_session_date().unwrap(), Some(day(2)));
    }

    #[test]
    fn test_upsert_preserves_date_key() {
        let store = InMemoryRecordStore::new();
        let first = QuestionnaireResponse::new(
            day(3),
            BTreeMap::from([(QuestionId::Energy, 2)]),
            Utc::now(),
        )
        .unwrap();
        store.upsert_response(first).unwrap();

        let replacement = QuestionnaireResponse::new(
            day(3),
            BTreeMap::from([(QuestionId::Energy, 5)]),
            Utc::now(),
        )
        .unwrap();
        store.upsert_response(replacement).unwrap();

        let stored = store.response_on(day(3)).unwrap().unwrap();
        assert_eq!(stored.date, day(3));
        assert_eq!(stored.rating(QuestionId::Energy), Some(5));
    }

    #[test]
    fn test_responses_between_is_half_open() {
        let store = InMemoryRecordStore::new();
        for d in [1, 4, 8, 11] {
            let response = QuestionnaireResponse::new(
                day(d),
                BTreeMap::from([(QuestionId::Energy, 3)]),
                Utc::now(),
            )
            .unwrap();
            store.upsert_response(response).unwrap();
        }

        let window = store.responses_between(day(4), day(11)).unwrap();
        let dates: Vec<NaiveDate> = window.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(4), day(8)]);
        assert!(store.responses_between(day(11), day(4)).unwrap().is_empty());
    }

    #[test]
    fn test_edit_missing_response_is_not_found() {
        let store = InMemoryRecordStore::new();
        assert!(store.edit_response(day(1), BTreeMap::new()).is_err());
    }
}
