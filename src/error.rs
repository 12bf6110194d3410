// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed errors raised by the record store, the applier and form validation.

use std::fmt;

use serde::Serialize;

use crate::models::RecordId;

/// A single failing form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The record kind an id lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Transaction,
    Budget,
    Goal,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordKind::Transaction => "transaction",
            RecordKind::Budget => "budget",
            RecordKind::Goal => "goal",
        };
        f.write_str(s)
    }
}

/// The errors the core may report. Nothing here is fatal; every variant is
/// raised before any mutation is applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The caller passed an out-of-contract value.
    #[error("invalid input: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// The operation referenced an id that is not in the collection.
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: RecordId },
}

impl Error {
    /// Shorthand for a validation error on a single field.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation(vec![FieldError::new(field, message)])
    }

    pub fn not_found(kind: RecordKind, id: RecordId) -> Self {
        Error::NotFound { kind, id }
    }

    /// The failing fields of a validation error, empty for anything else.
    pub fn fields(&self) -> &[FieldError] {
        match self {
            Error::Validation(fields) => fields,
            Error::NotFound { .. } => &[],
        }
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, Error>;
