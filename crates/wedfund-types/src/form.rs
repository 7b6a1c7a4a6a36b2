//! Form lifecycle shared by every create/edit/delete flow.
//!
//! `Closed -> Open(mode) -> Submitting -> Closed`. A draft that fails
//! validation stays `Open` with its field messages attached.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    Create,
    Edit,
    Delete,
}

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`. The first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Closed,
    Open { mode: FormMode, errors: FieldErrors },
    Submitting { mode: FormMode },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("cannot {action} a form that is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

impl FormState {
    pub fn open(self, mode: FormMode) -> Result<Self, FormError> {
        match self {
            Self::Closed => Ok(Self::Open {
                mode,
                errors: FieldErrors::new(),
            }),
            other => Err(other.reject("open")),
        }
    }

    /// Applies a validation outcome. Empty errors move the form to
    /// `Submitting`; anything else keeps it open with the messages.
    pub fn validate(self, errors: FieldErrors) -> Result<Self, FormError> {
        match self {
            Self::Open { mode, .. } if errors.is_empty() => Ok(Self::Submitting { mode }),
            Self::Open { mode, .. } => Ok(Self::Open { mode, errors }),
            other => Err(other.reject("validate")),
        }
    }

    pub fn complete(self) -> Result<Self, FormError> {
        match self {
            Self::Submitting { .. } => Ok(Self::Closed),
            other => Err(other.reject("complete")),
        }
    }

    /// Cancelling is allowed from any open state; closed stays closed.
    pub fn cancel(self) -> Self {
        Self::Closed
    }

    pub fn mode(&self) -> Option<FormMode> {
        match self {
            Self::Closed => None,
            Self::Open { mode, .. } | Self::Submitting { mode } => Some(*mode),
        }
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Open { errors, .. } if !errors.is_empty() => Some(errors),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open { .. } => "open",
            Self::Submitting { .. } => "submitting",
        }
    }

    fn reject(&self, action: &'static str) -> FormError {
        FormError::InvalidTransition {
            action,
            state: self.name(),
        }
    }
}
