// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Top-level [`Suite`] wiring a [`Registry`] with a [`Harness`].
//!
//! [`Harness`]: crate::Harness

use std::{io, time::Duration};

use crate::{
    cli,
    harness::{Basic, Harness as _, Summary},
    runner, Registry, World,
};

/// Top-level runner of a [`Registry`]: plans its scenarios, runs them with a
/// [`Basic`] harness and reports the results.
///
/// # Example
///
/// ```rust
/// # use stepwise::{Feature, Registry, Scenario, StepGroup, Suite};
/// #
/// #[derive(Default)]
/// struct Queue(Vec<String>);
///
/// # let _ = async {
/// let mut registry = Registry::<Queue>::new();
/// registry
///     .feature(Feature::new("Queue: enqueue").scenario(
///         Scenario::new("keeps order")
///             .given(r#"enqueue "1""#)
///             .then(r#"first is "1""#),
///     ))
///     .steps(
///         StepGroup::<Queue>::new("^Queue")?
///             .given(r#"enqueue "(\d+)""#, |ctx, args| {
///                 ctx.0.push(args.str(0)?.to_owned());
///                 Ok(())
///             })?
///             .then(r#"first is "(\d+)""#, |ctx, args| {
///                 anyhow::ensure!(ctx.0.first().map(String::as_str) == Some(args.str(0)?));
///                 Ok(())
///             })?,
///     );
///
/// Suite::new(registry).run_and_exit().await;
/// # Ok::<_, stepwise::Error>(())
/// # };
/// ```
pub struct Suite<W, Out = io::Stdout> {
    registry: Registry<W>,
    cli: Option<cli::Opts>,
    harness: Basic<W, Out>,
}

impl<W: World> Suite<W> {
    /// Creates a new [`Suite`] over the given [`Registry`], reporting into
    /// [`io::Stdout`].
    #[must_use]
    pub fn new(registry: Registry<W>) -> Self {
        Self {
            registry,
            cli: None,
            harness: Basic::stdout(cli::Coloring::Auto),
        }
    }
}

impl<W: World, Out: io::Write> Suite<W, Out> {
    /// Replaces the output the results are reported into.
    #[must_use]
    pub fn with_output<O: io::Write>(
        self,
        output: O,
        coloring: cli::Coloring,
    ) -> Suite<W, O> {
        Suite {
            registry: self.registry,
            cli: self.cli,
            harness: self.harness.with_output(output).coloring(coloring),
        }
    }

    /// Makes the run stop after the first failed scenario.
    #[must_use]
    pub fn fail_fast(mut self) -> Self {
        self.harness = self.harness.fail_fast(true);
        self
    }

    /// Limits every scenario to run no longer than the given `timeout`.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.harness = self.harness.timeout(timeout);
        self
    }

    /// Consider already parsed [`cli::Opts`] instead of parsing them from the
    /// command line.
    ///
    /// Options given explicitly take precedence over the ones set on this
    /// [`Suite`] before.
    #[must_use]
    pub fn with_cli(mut self, cli: cli::Opts) -> Self {
        self.cli = Some(cli);
        self
    }

    /// Parses [`cli::Opts`] from the command line.
    #[must_use]
    pub fn with_default_cli(self) -> Self {
        self.with_cli(cli::Opts::parsed())
    }

    /// Runs all the selected scenarios, returning their [`Summary`].
    ///
    /// # Errors
    ///
    /// If writing the report into the output fails.
    pub async fn run(self) -> io::Result<Summary> {
        let Self { registry, cli, mut harness } = self;

        let filter = cli.as_ref().and_then(|c| c.re_filter.as_ref());
        if let Some(cli) = &cli {
            if cli.fail_fast {
                harness = harness.fail_fast(true);
            }
            if let Some(timeout) = cli.timeout {
                harness = harness.timeout(timeout);
            }
            if cli.color != cli::Coloring::Auto {
                harness = harness.coloring(cli.color);
            }
        }

        for case in runner::plan(&registry, filter) {
            harness.register(case);
        }
        tracing::info!(scenarios = harness.cases().len(), "running");

        harness.run().await
    }

    /// Runs all the selected scenarios and exits with a non-zero code if any
    /// of them fails.
    ///
    /// # Panics
    ///
    /// If at least one scenario failed, or the report couldn't be written.
    pub async fn run_and_exit(self) {
        let summary = self
            .run()
            .await
            .unwrap_or_else(|e| panic!("Failed to write: {e}"));

        if summary.execution_has_failed() {
            let failed = summary.failed();
            panic!(
                "{failed} scenario{} failed",
                if failed > 1 { "s" } else { "" },
            );
        }
    }
}
