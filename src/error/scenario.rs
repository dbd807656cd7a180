// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors failing a whole scenario.

use std::time::Duration;

use derive_more::with_trait::{Display, Error, From};
use itertools::Itertools as _;

use super::StepError;

/// Reason a scenario failed.
#[derive(Debug, Display, Error, From)]
pub enum ScenarioError {
    /// Some steps have no matching definition.
    ///
    /// Holds one report entry per missing step, each already carrying its
    /// "Did you mean?" suggestions.
    #[display(
        "Missing step definitions:\n\t{}{}",
        reports.iter().join("\n\t"),
        ambiguous_section(ambiguous)
    )]
    #[from(ignore)]
    MissingSteps {
        /// Rendered report per missing step.
        #[error(not(source))]
        reports: Vec<String>,

        /// Texts of the steps matching more than one definition, found
        /// alongside the missing ones.
        #[error(not(source))]
        ambiguous: Vec<String>,
    },

    /// Some steps match more than one definition.
    #[display("Ambiguous step definitions:\n\t{}", steps.iter().join("\n\t"))]
    #[from(ignore)]
    AmbiguousSteps {
        /// Texts of the ambiguous steps.
        #[error(not(source))]
        steps: Vec<String>,
    },

    /// A step or hook failed while executing.
    #[display("{_0}")]
    Step(StepError),

    /// Scenario didn't complete in time.
    #[display("scenario timed out after {}", humantime::format_duration(*_0))]
    #[from(ignore)]
    TimedOut(#[error(not(source))] Duration),
}

impl ScenarioError {
    /// Indicates whether this scenario failed on steps it couldn't resolve.
    #[must_use]
    pub const fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::MissingSteps { .. } | Self::AmbiguousSteps { .. })
    }
}

/// Renders the ambiguous `steps` following a missing steps report, if any.
fn ambiguous_section(steps: &[String]) -> String {
    if steps.is_empty() {
        String::new()
    } else {
        format!("\nAmbiguous step definitions:\n\t{}", steps.iter().join("\n\t"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_steps_are_listed_one_per_line() {
        let err = ScenarioError::MissingSteps {
            reports: vec!["first".into(), "second".into()],
            ambiguous: vec![],
        };

        assert_eq!(
            err.to_string(),
            "Missing step definitions:\n\tfirst\n\tsecond",
        );
        assert!(err.is_resolution_failure());
    }

    #[test]
    fn missing_steps_mention_ambiguous_ones() {
        let err = ScenarioError::MissingSteps {
            reports: vec!["nope".into()],
            ambiguous: vec!["push \"1\"".into()],
        };

        assert_eq!(
            err.to_string(),
            "Missing step definitions:\n\tnope\n\
             Ambiguous step definitions:\n\tpush \"1\"",
        );
    }

    #[test]
    fn step_errors_convert_transparently() {
        let err = ScenarioError::from(StepError::unmatched("nope"));

        assert_eq!(err.to_string(), "failed to find \"nope\"");
        assert!(!err.is_resolution_failure());
    }

    #[test]
    fn timeout_is_human_readable() {
        let err = ScenarioError::TimedOut(Duration::from_millis(1500));

        assert_eq!(err.to_string(), "scenario timed out after 1s 500ms");
    }
}
