// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Registry of narratives and step definitions.
//!
//! Populated during the definition phase and only read afterwards: the
//! [`Suite`] borrows it to plan test cases.
//!
//! [`Suite`]: crate::Suite

use itertools::Itertools as _;

use crate::{Feature, StepGroup};

/// [`Feature`]s and [`StepGroup`]s of a run.
#[derive(Debug)]
pub struct Registry<W> {
    features: Vec<Feature>,
    groups: Vec<StepGroup<W>>,
}

// Implemented manually to omit redundant `W: Default` trait bound, imposed
// by `#[derive(Default)]`.
impl<W> Default for Registry<W> {
    fn default() -> Self {
        Self { features: Vec::new(), groups: Vec::new() }
    }
}

impl<W> Registry<W> {
    /// Creates an empty [`Registry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the given [`Feature`].
    pub fn feature(&mut self, feature: Feature) -> &mut Self {
        self.features.push(feature);
        self
    }

    /// Adds the given [`StepGroup`].
    pub fn steps(&mut self, group: StepGroup<W>) -> &mut Self {
        self.groups.push(group);
        self
    }

    /// Returns the registered [`Feature`]s, in registration order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Returns the registered [`StepGroup`]s, in registration order.
    #[must_use]
    pub fn groups(&self) -> &[StepGroup<W>] {
        &self.groups
    }

    /// Returns distinct texts of every step of every [`Feature`], in
    /// declaration order.
    #[must_use]
    pub fn known_steps(&self) -> Vec<String> {
        self.features
            .iter()
            .flat_map(|f| &f.scenarios)
            .flat_map(|s| &s.steps)
            .map(|s| s.description.as_str())
            .unique()
            .map(str::to_owned)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::Scenario;

    use super::*;

    #[test]
    fn known_steps_are_distinct_and_ordered() {
        let mut registry = Registry::<()>::new();
        registry
            .feature(
                Feature::new("a")
                    .scenario(Scenario::new("1").given("x").when("y"))
                    .scenario(Scenario::never("2").given("z").then("x")),
            )
            .feature(Feature::new("b").scenario(Scenario::new("3").given("y")));

        assert_eq!(registry.known_steps(), vec!["x", "y", "z"]);
        assert_eq!(registry.features().len(), 2);
        assert!(registry.groups().is_empty());
    }
}
