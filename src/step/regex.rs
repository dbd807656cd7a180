// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Anchored step patterns.
//!
//! A step definition is written as a plain regex (`I enter "(.*)"`) but has
//! to match the *whole* step text, so [`StepPattern`] keeps both the source the
//! author wrote and the anchored [`Regex`] actually used for matching.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use derive_more::with_trait::{Debug, Deref, Display};
use regex::Regex;

/// Step definition pattern, matched against the entire step text.
///
/// Implements [`Eq`], [`Ord`] and [`Hash`] by its source text.
#[derive(Clone, Debug, Deref, Display)]
#[display("{source}")]
pub struct StepPattern {
    /// Pattern as written by the author.
    source: String,

    /// `^(?:source)$`.
    #[deref]
    anchored: Regex,
}

impl StepPattern {
    /// Compiles the given `source` into an anchored [`StepPattern`].
    ///
    /// # Errors
    ///
    /// If `source` isn't a valid [`Regex`].
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let anchored = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self { source, anchored })
    }

    /// Returns the pattern as written by the author.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the anchored [`Regex`] used for matching.
    #[must_use]
    pub const fn regex(&self) -> &Regex {
        &self.anchored
    }

    /// Matches the whole `text`, returning its capture groups in order.
    ///
    /// Groups that didn't participate in the match are [`None`].
    #[must_use]
    pub fn captures<'t>(&self, text: &'t str) -> Option<Vec<Option<&'t str>>> {
        self.anchored.captures(text).map(|caps| {
            caps.iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str()))
                .collect()
        })
    }
}

impl Hash for StepPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl PartialEq for StepPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for StepPattern {}

impl PartialOrd for StepPattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StepPattern {
    fn cmp(&self, other: &Self) -> Ordering {
        self.source.cmp(&other.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_whole_text_only() {
        let pattern = StepPattern::new(r#"enqueue "(.*)""#).unwrap();

        assert!(pattern.is_match(r#"enqueue "1""#));
        assert!(!pattern.is_match(r#"enqueue "1" asynchronously"#));
        assert!(!pattern.is_match(r#"please enqueue "1""#));
    }

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        let pattern = StepPattern::new("a|b").unwrap();

        assert!(pattern.is_match("a"));
        assert!(pattern.is_match("b"));
        assert!(!pattern.is_match("ab"));
    }

    #[test]
    fn captures_keep_group_order() {
        let pattern =
            StepPattern::new(r#"I added "(.*)" and "(.*)"(!)?"#).unwrap();

        let caps = pattern.captures(r#"I added "1" and "2""#).unwrap();
        assert_eq!(caps, vec![Some("1"), Some("2"), None]);
        assert!(pattern.captures("nothing").is_none());
    }

    #[test]
    fn displays_and_compares_by_source() {
        let a = StepPattern::new("a").unwrap();
        let b = StepPattern::new("b").unwrap();

        assert_eq!(a.to_string(), "a");
        assert_eq!(a.regex().as_str(), "^(?:a)$");
        assert!(a < b);
        assert_eq!(a, StepPattern::new("a").unwrap());
    }

    #[test]
    fn invalid_source_is_rejected() {
        assert!(StepPattern::new("(").is_err());
    }
}
