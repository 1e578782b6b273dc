//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when a write payload is rejected. It carries the
//!   offending fields, see [`FieldErrors`].
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`IntegrityConflict`] thrown when a delete is blocked by referencing rows.
//! - [`InvalidPage`] thrown when the requested page is outside the result set.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`IntegrityConflict`]: EngineError::IntegrityConflict
//!  [`InvalidPage`]: EngineError::InvalidPage
use std::{collections::BTreeMap, fmt};

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Integrity conflict: {0}")]
    IntegrityConflict(String),
    #[error("Invalid page: {0}")]
    InvalidPage(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::IntegrityConflict(a), Self::IntegrityConflict(b)) => a == b,
            (Self::InvalidPage(a), Self::InvalidPage(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl From<FieldErrors> for EngineError {
    fn from(value: FieldErrors) -> Self {
        Self::Validation(value)
    }
}

/// Validation messages grouped by the payload field they refer to.
///
/// Fields are kept sorted so error bodies are stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortcut for a single error on a single field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Fail with `EngineError::Validation` when at least one error was recorded.
    pub fn into_result(self) -> Result<(), EngineError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(" "))?;
        }
        Ok(())
    }
}
