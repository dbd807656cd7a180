// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Default [`Harness`] running scenarios one by one and reporting them to a
//! console.

use std::{fmt, io, mem, time::Duration};

use itertools::Itertools as _;

use crate::{
    cli::Coloring,
    error::ScenarioError,
    runner::{Outcome, TestCase},
};

use super::{Failure, Harness, Styles, Summary};

/// Default [`Harness`] implementation.
///
/// Runs registered [`TestCase`]s sequentially in registration order, writing
/// a human-readable report into its `Out`put.
pub struct Basic<W, Out = io::Stdout> {
    cases: Vec<TestCase<W>>,
    output: Out,
    styles: Styles,
    timeout: Option<Duration>,
    fail_fast: bool,
}

impl<W, Out> fmt::Debug for Basic<W, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Basic")
            .field("cases", &self.cases.len())
            .field("styles", &self.styles)
            .field("timeout", &self.timeout)
            .field("fail_fast", &self.fail_fast)
            .finish_non_exhaustive()
    }
}

impl<W> Basic<W> {
    /// Creates a new [`Basic`] [`Harness`] writing into [`io::Stdout`].
    #[must_use]
    pub fn stdout(coloring: Coloring) -> Self {
        Self::new(io::stdout(), coloring)
    }
}

impl<W, Out: io::Write> Basic<W, Out> {
    /// Creates a new [`Basic`] [`Harness`] writing into the given `output`.
    #[must_use]
    pub fn new(output: Out, coloring: Coloring) -> Self {
        let mut styles = Styles::new();
        styles.apply_coloring(coloring);
        Self {
            cases: Vec::new(),
            output,
            styles,
            timeout: None,
            fail_fast: false,
        }
    }

    /// Replaces the output of this [`Basic`] [`Harness`], keeping everything
    /// else.
    #[must_use]
    pub fn with_output<O: io::Write>(self, output: O) -> Basic<W, O> {
        Basic {
            cases: self.cases,
            output,
            styles: self.styles,
            timeout: self.timeout,
            fail_fast: self.fail_fast,
        }
    }

    /// Applies the given [`Coloring`] policy to the output.
    #[must_use]
    pub fn coloring(mut self, coloring: Coloring) -> Self {
        self.styles.apply_coloring(coloring);
        self
    }

    /// Limits every scenario to run no longer than the given `timeout`.
    ///
    /// Requires a [`tokio`] runtime to be driving [`Basic::run()`].
    #[must_use]
    pub fn timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.timeout = timeout.into();
        self
    }

    /// Makes the run stop after the first failed scenario.
    #[must_use]
    pub fn fail_fast(mut self, yes: bool) -> Self {
        self.fail_fast = yes;
        self
    }

    /// Returns the registered [`TestCase`]s not run yet.
    #[must_use]
    pub fn cases(&self) -> &[TestCase<W>] {
        &self.cases
    }

    /// Returns the output of this [`Basic`] [`Harness`].
    #[must_use]
    pub fn output(&self) -> &Out {
        &self.output
    }

    /// Consumes this [`Basic`] [`Harness`] returning its output.
    #[must_use]
    pub fn into_output(self) -> Out {
        self.output
    }

    /// Runs all the registered [`TestCase`]s, reporting every one of them.
    ///
    /// # Errors
    ///
    /// If writing into the output fails.
    pub async fn run(&mut self) -> io::Result<Summary> {
        let cases = mem::take(&mut self.cases);
        let mut summary = Summary {
            features: cases.iter().map(TestCase::group).dedup().count(),
            ..Summary::default()
        };

        let mut last_group = None::<String>;
        let mut cases = cases.into_iter();
        for case in cases.by_ref() {
            if last_group.as_deref() != Some(case.group()) {
                let header = self.styles.bold(self.styles.header(case.group().trim_start()));
                writeln!(self.output, "{header}")?;
                last_group = Some(case.group().to_owned());
            }

            let feature = feature_of(&case).to_owned();
            let scenario = case.scenario().description.clone();
            let steps = case
                .scenario()
                .steps
                .iter()
                .map(|s| s.full_description())
                .collect::<Vec<_>>();

            match self.execute(case).await {
                Ok(()) => {
                    summary.passed += 1;
                    let line = format!("  ✔  Scenario: {scenario}");
                    writeln!(self.output, "{}", self.styles.ok(line))?;
                }
                Err(error) => {
                    tracing::warn!(%feature, %scenario, %error, "scenario failed");
                    let report = format!(
                        "  ✘  Scenario: {scenario}{}{}",
                        format_str_with_indent(steps.join("\n"), 6),
                        format_str_with_indent(format!("Error: {error}"), 6),
                    );
                    writeln!(self.output, "{}", self.styles.err(report))?;
                    summary.failures.push(Failure { feature, scenario, error });
                    if self.fail_fast {
                        break;
                    }
                }
            }
        }

        for case in cases {
            summary.skipped += 1;
            let line = format!("  ?  Scenario: {} (skipped)", case.scenario().description);
            writeln!(self.output, "{}", self.styles.skipped(line))?;
        }

        writeln!(self.output, "{}", self.summary(&summary))?;
        self.output.flush()?;

        Ok(summary)
    }

    async fn execute(&self, case: TestCase<W>) -> Result<(), ScenarioError> {
        tracing::trace!(scenario = %case.scenario().description, "running scenario");
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, case.run())
                .await
                .map_err(|_| ScenarioError::TimedOut(limit))?,
            None => case.run().await,
        };
        let Outcome { result, .. } = outcome;
        result
    }

    fn summary(&self, summary: &Summary) -> String {
        let stats = [
            (summary.passed, "passed", &self.styles.ok),
            (summary.skipped, "skipped", &self.styles.skipped),
            (summary.failed(), "failed", &self.styles.err),
        ]
        .into_iter()
        .filter(|(n, ..)| *n > 0)
        .map(|(n, what, style)| {
            let text = format!("{n} {what}");
            if self.styles.is_present {
                style.apply_to(text).bold().to_string()
            } else {
                text
            }
        })
        .join(&self.styles.bold(", "));

        format!(
            "{}\n{}\n{}{}",
            self.styles.bold(self.styles.header("[Summary]")),
            self.styles.maybe_plural("feature", summary.features),
            self.styles.maybe_plural("scenario", summary.total()),
            if stats.is_empty() { String::new() } else { format!(" ({stats})") },
        )
    }
}

impl<W, Out: io::Write> Harness<W> for Basic<W, Out> {
    fn register(&mut self, case: TestCase<W>) {
        self.cases.push(case);
    }
}

fn feature_of<W>(case: &TestCase<W>) -> &str {
    case.group()
        .strip_prefix("\nFeature: ")
        .unwrap_or_else(|| case.group())
}

/// Formats the given `str` by adding `indent`s to each line to prettify the
/// output.
fn format_str_with_indent(str: impl AsRef<str>, indent: usize) -> String {
    let str = str
        .as_ref()
        .lines()
        .map(|line| format!("{}{line}", " ".repeat(indent)))
        .join("\n");
    if str.is_empty() {
        String::new()
    } else {
        format!("\n{str}")
    }
}
