// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Host runners executing planned [`TestCase`]s.

pub mod basic;
pub mod styles;

use crate::{error::ScenarioError, runner::TestCase};

#[doc(inline)]
pub use self::{basic::Basic, styles::Styles};

/// Host runner [`TestCase`]s are registered with.
///
/// Every registered case is expected to be run at most once, in registration
/// order.
pub trait Harness<W> {
    /// Registers a single [`TestCase`] to be run.
    fn register(&mut self, case: TestCase<W>);
}

impl<W> Harness<W> for Vec<TestCase<W>> {
    fn register(&mut self, case: TestCase<W>) {
        self.push(case);
    }
}

/// Failed scenario of a run.
#[derive(Debug)]
pub struct Failure {
    /// Description of the feature the scenario belongs to.
    pub feature: String,

    /// Description of the failed scenario.
    pub scenario: String,

    /// Reason of the failure.
    pub error: ScenarioError,
}

/// Results of a run, as collected by a [`Harness`].
#[derive(Debug, Default)]
pub struct Summary {
    /// Number of features having at least one scenario registered.
    pub features: usize,

    /// Number of passed scenarios.
    pub passed: usize,

    /// Number of scenarios not run because of a fail-fast stop.
    pub skipped: usize,

    /// Failed scenarios, in order of their execution.
    pub failures: Vec<Failure>,
}

impl Summary {
    /// Returns number of failed scenarios.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Returns total number of registered scenarios.
    #[must_use]
    pub fn total(&self) -> usize {
        self.passed + self.skipped + self.failed()
    }

    /// Indicates whether some scenario has failed.
    #[must_use]
    pub fn execution_has_failed(&self) -> bool {
        !self.failures.is_empty()
    }
}
