// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Planning of a run: which scenarios run, against which steps.
//!
//! For every [`Feature`] of a [`Registry`] the applicable [`StepGroup`]s are
//! flattened once into a shared [`StepTable`], then every selected
//! [`Scenario`] becomes a [`TestCase`] backed by its own [`Executor`].
//!
//! [`StepGroup`]: crate::StepGroup

pub mod executor;

use std::sync::Arc;

use itertools::Itertools as _;
use regex::Regex;

use crate::{step::StepTable, Feature, Registry, Scenario, World};

pub use self::executor::{Executor, HookType, Outcome, Phase, Signal};

/// Single scenario registered with a [`Harness`].
///
/// [`Harness`]: crate::Harness
#[derive(derive_more::with_trait::Debug)]
pub struct TestCase<W> {
    group: String,
    name: String,
    #[debug(skip)]
    executor: Executor<W>,
}

impl<W> TestCase<W> {
    /// Name of the group this case belongs to: `"\nFeature: <description>"`.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Name of this case: `"\nScenario: <description>\n"` followed by its
    /// rendered steps, one per line.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the [`Scenario`] this case runs.
    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        self.executor.scenario()
    }

    /// Runs the scenario to completion.
    pub async fn run(self) -> Outcome<W> {
        self.executor.run().await
    }
}

/// Selects the [`Scenario`]s of `feature` taking part in a run.
///
/// If the `feature` has focused scenarios only they run, otherwise all of
/// them do. Scenarios marked as never running are always left out.
#[must_use]
pub fn select_scenarios(feature: &Feature) -> Vec<&Scenario> {
    let (only, rest): (Vec<_>, Vec<_>) = feature
        .scenarios
        .iter()
        .filter(|s| !s.is_never())
        .partition(|s| s.is_only());
    if only.is_empty() {
        rest
    } else {
        only
    }
}

/// Plans [`TestCase`]s for every selected [`Scenario`] of the `registry`.
///
/// When a `name_filter` is given, only scenarios whose description it matches
/// are planned.
#[must_use]
pub fn plan<W: World>(
    registry: &Registry<W>,
    name_filter: Option<&Regex>,
) -> Vec<TestCase<W>> {
    let known_steps: Arc<[String]> = registry.known_steps().into();

    registry
        .features()
        .iter()
        .flat_map(|feature| {
            let table = Arc::new(StepTable::select(
                &feature.description,
                registry.groups(),
            ));
            let known_steps = Arc::clone(&known_steps);
            select_scenarios(feature)
                .into_iter()
                .filter(move |s| {
                    name_filter.map_or(true, |re| re.is_match(&s.description))
                })
                .map(move |scenario| TestCase {
                    group: format!("\nFeature: {}", feature.description),
                    name: format!(
                        "\nScenario: {}\n{}",
                        scenario.description,
                        scenario.steps.iter().map(|s| s.full_description()).join("\n"),
                    ),
                    executor: Executor::new(
                        Arc::new(scenario.clone()),
                        Arc::clone(&table),
                        Arc::clone(&known_steps),
                    ),
                })
        })
        .inspect(|case| tracing::debug!(case = case.name(), "planned"))
        .collect()
}
