// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error of a step text matching several step definitions.

use std::fmt;

use derive_more::with_trait::Error;
use itertools::Itertools as _;

use super::{location::Location, regex::StepPattern};

/// Error of a step text matching multiple [`StepPattern`]s inside a
/// [`StepTable`].
///
/// [`StepTable`]: super::StepTable
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct AmbiguousMatchError {
    /// Patterns the step text matches, sorted.
    pub possible_matches: Vec<(StepPattern, Location)>,
}

impl AmbiguousMatchError {
    /// Creates a new [`AmbiguousMatchError`] out of the given matches.
    #[must_use]
    pub fn new(
        possible_matches: impl IntoIterator<Item = (StepPattern, Location)>,
    ) -> Self {
        Self { possible_matches: possible_matches.into_iter().sorted().collect() }
    }

    /// Returns the number of possible matches.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.possible_matches.len()
    }

    /// Returns an iterator over the patterns that matched.
    pub fn patterns(&self) -> impl Iterator<Item = &str> + '_ {
        self.possible_matches.iter().map(|(re, _)| re.as_str())
    }
}

impl fmt::Display for AmbiguousMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Possible matches:")?;
        for (re, loc) in &self.possible_matches {
            write!(f, "\n{re} --> {loc}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches() -> Vec<(StepPattern, Location)> {
        vec![
            (
                StepPattern::new(r"I have (\d+) cucumbers").unwrap(),
                Location::new("tests/steps.rs", 20, 10),
            ),
            (
                StepPattern::new(r"I have .+ cucumbers").unwrap(),
                Location::new("tests/steps.rs", 10, 5),
            ),
        ]
    }

    #[test]
    fn sorts_matches_by_pattern() {
        let err = AmbiguousMatchError::new(matches());

        assert_eq!(err.match_count(), 2);
        assert_eq!(
            err.patterns().collect::<Vec<_>>(),
            vec![r"I have (\d+) cucumbers", r"I have .+ cucumbers"],
        );
    }

    #[test]
    fn display_lists_patterns_with_locations() {
        let err = AmbiguousMatchError::new(matches());

        assert_eq!(
            err.to_string(),
            "Possible matches:\n\
             I have (\\d+) cucumbers --> tests/steps.rs:20:10\n\
             I have .+ cucumbers --> tests/steps.rs:10:5",
        );
    }
}
