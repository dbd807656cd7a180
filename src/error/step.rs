// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors raised while a single step (or hook) runs.

use std::any::Any;

use derive_more::with_trait::{Display, Error};

use crate::step::AmbiguousMatchError;

/// Errors that can occur during step execution.
#[derive(Debug, Display, Error)]
pub enum StepError {
    /// Step invoked from inside a running step has no matching definition.
    #[display("failed to find \"{step}\"")]
    Unmatched {
        /// Text of the step that couldn't be matched.
        #[error(not(source))]
        step: String,
    },

    /// Step invoked from inside a running step matches several definitions.
    #[display("ambiguous step \"{step}\"\n{matches}")]
    Ambiguous {
        /// Text of the step with multiple matches.
        #[error(not(source))]
        step: String,

        /// Definitions the step matches.
        #[error(not(source))]
        matches: AmbiguousMatchError,
    },

    /// Step handler returned an error or panicked.
    #[display("error while executing \"{step}\"\n {message}")]
    Execution {
        /// Description of the step being executed.
        #[error(not(source))]
        step: String,

        /// Rendered underlying error.
        message: String,
    },

    /// [`Continuation`] was dropped without being resumed.
    ///
    /// [`Continuation`]: crate::Continuation
    #[display("\"{step}\" deferred its completion but never resumed")]
    Abandoned {
        /// Description of the step that deferred.
        #[error(not(source))]
        step: String,
    },
}

/// Result type alias for step operations.
pub type StepResult<T> = Result<T, StepError>;

impl StepError {
    /// Creates a new [`StepError::Unmatched`].
    #[must_use]
    pub fn unmatched(step: impl Into<String>) -> Self {
        Self::Unmatched { step: step.into() }
    }

    /// Wraps an error returned by a step handler.
    #[must_use]
    pub fn execution(step: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::Execution {
            step: step.into(),
            message: format!("{err:#}"),
        }
    }

    /// Wraps a payload of a panicked step handler.
    #[must_use]
    pub fn panicked(step: impl Into<String>, payload: &(dyn Any + Send)) -> Self {
        Self::Execution {
            step: step.into(),
            message: payload.to_readable_string(),
        }
    }

    /// Returns the text of the step this error is about.
    #[must_use]
    pub fn step(&self) -> &str {
        match self {
            Self::Unmatched { step }
            | Self::Ambiguous { step, .. }
            | Self::Execution { step, .. }
            | Self::Abandoned { step } => step,
        }
    }
}

/// Conversion of panic payloads into readable messages.
pub trait PanicPayloadExt {
    /// Converts panic payload to a readable string.
    fn to_readable_string(&self) -> String;
}

impl PanicPayloadExt for dyn Any + Send {
    fn to_readable_string(&self) -> String {
        if let Some(s) = self.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = self.downcast_ref::<&str>() {
            (*s).to_owned()
        } else {
            "(Could not resolve panic payload)".to_owned()
        }
    }
}
