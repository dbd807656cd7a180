// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Execution of a single scenario.
//!
//! A scenario is compiled into a flat list: before hooks, narrative steps,
//! after hooks, and a final guard reporting steps that couldn't be resolved.
//! The list runs strictly in order on a single flow. A step may suspend the
//! flow with [`ScenarioContext::defer()`], in which case the next step starts
//! only once every issued [`Continuation`] has been resumed.
//!
//! [`Continuation`]: crate::Continuation

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use derive_more::with_trait::Display;
use futures::{channel::oneshot, stream::FuturesUnordered, StreamExt as _};

use crate::{
    error::{ScenarioError, StepError},
    similarity,
    step::{Resolution, Resume, ScenarioContext, StepTable},
    Scenario, World,
};

/// Position of a scenario run in its compiled step list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Not started yet.
    Idle,

    /// Executing the step at the index.
    Running(usize),

    /// Waiting for the step at the index to be resumed.
    Suspended(usize),

    /// Finished, successfully or not.
    Completed,
}

/// Event moving a [`Phase`] forward.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Signal {
    /// Run has been started.
    Start,

    /// Current step returned, leaving continuations `pending` or not.
    Returned {
        /// Whether some [`Continuation`] is still to be resumed.
        ///
        /// [`Continuation`]: crate::Continuation
        pending: bool,
    },

    /// Every pending [`Continuation`] has been resumed.
    ///
    /// [`Continuation`]: crate::Continuation
    Resumed,

    /// Current step failed.
    Failed,
}

impl Phase {
    /// Returns the [`Phase`] following this one on `signal`, for a compiled
    /// step list of `len` steps.
    ///
    /// Signals not applicable to the current [`Phase`] leave it unchanged.
    #[must_use]
    pub const fn next(self, signal: Signal, len: usize) -> Self {
        match (self, signal) {
            (Self::Idle, Signal::Start) => Self::at(0, len),
            (Self::Running(i), Signal::Returned { pending: true }) => {
                Self::Suspended(i)
            }
            (Self::Running(i), Signal::Returned { pending: false })
            | (Self::Suspended(i), Signal::Resumed) => Self::at(i + 1, len),
            (Self::Running(_) | Self::Suspended(_), Signal::Failed) => {
                Self::Completed
            }
            (phase, _) => phase,
        }
    }

    const fn at(index: usize, len: usize) -> Self {
        if index < len {
            Self::Running(index)
        } else {
            Self::Completed
        }
    }
}

/// Kind of a scenario hook.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum HookType {
    /// Runs before the narrative steps.
    #[display("before")]
    Before,

    /// Runs after the narrative steps.
    #[display("after")]
    After,
}

/// Entry of a compiled step list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Compiled {
    /// Hook of the given type at the index in the [`StepTable`].
    Hook(HookType, usize),

    /// Narrative step at the index in the [`Scenario`].
    Step(usize),

    /// Fails the run if some steps couldn't be resolved.
    Guard,
}

/// Steps that couldn't be resolved so far.
#[derive(Clone, Debug, Default)]
struct ScanReport {
    missing: Vec<String>,
    ambiguous: Vec<String>,
}

impl ScanReport {
    fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.ambiguous.is_empty()
    }
}

/// Result of a finished scenario run.
pub struct Outcome<W> {
    /// [`World`] as the run left it.
    pub world: W,

    /// Whether the run succeeded.
    pub result: Result<(), ScenarioError>,
}

impl<W> fmt::Debug for Outcome<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outcome")
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

/// Runs one scenario over its compiled step list.
pub struct Executor<W> {
    scenario: Arc<Scenario>,
    table: Arc<StepTable<W>>,
    known_steps: Arc<[String]>,
    steps: Vec<Compiled>,
    report: ScanReport,
    ctx: ScenarioContext<W>,
}

impl<W: World> Executor<W> {
    /// Compiles the given `scenario` against the `table` of its feature.
    ///
    /// `known_steps` are the texts unresolved steps are compared with to
    /// suggest alternatives.
    #[must_use]
    pub fn new(
        scenario: Arc<Scenario>,
        table: Arc<StepTable<W>>,
        known_steps: Arc<[String]>,
    ) -> Self {
        let steps = (0..table.before_hooks().len())
            .map(|i| Compiled::Hook(HookType::Before, i))
            .chain((0..scenario.steps.len()).map(Compiled::Step))
            .chain(
                (0..table.after_hooks().len())
                    .map(|i| Compiled::Hook(HookType::After, i)),
            )
            .chain([Compiled::Guard])
            .collect();

        Self {
            ctx: ScenarioContext::new(Arc::clone(&table)),
            scenario,
            table,
            known_steps,
            steps,
            report: ScanReport::default(),
        }
    }
}

impl<W> Executor<W> {
    /// Returns the [`Scenario`] being run.
    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Drives the compiled step list to completion.
    pub async fn run(mut self) -> Outcome<W> {
        let len = self.steps.len();
        let mut phase = Phase::Idle.next(Signal::Start, len);
        let mut result = Ok(());

        loop {
            let signal = match phase {
                Phase::Idle => Signal::Start,
                Phase::Running(i) => match self.execute(i) {
                    Ok(()) => match self.collect_resumed(i) {
                        Ok(pending) => Signal::Returned { pending },
                        Err(e) => {
                            result = Err(e.into());
                            Signal::Failed
                        }
                    },
                    Err(e) => {
                        result = Err(e);
                        Signal::Failed
                    }
                },
                Phase::Suspended(i) => {
                    tracing::trace!(step = %self.label(i), "suspended");
                    match self.await_resumed(i).await {
                        Ok(()) => Signal::Resumed,
                        Err(e) => {
                            result = Err(e.into());
                            Signal::Failed
                        }
                    }
                }
                Phase::Completed => break,
            };
            phase = phase.next(signal, len);
        }

        if let Err(e) = &result {
            tracing::debug!(
                scenario = %self.scenario.description,
                error = %e,
                "scenario failed",
            );
        }
        Outcome { world: self.ctx.into_world(), result }
    }

    /// Human-readable label of the compiled step at `index`.
    fn label(&self, index: usize) -> String {
        match self.steps[index] {
            Compiled::Hook(ty, i) => format!("{ty} hook #{}", i + 1),
            Compiled::Step(i) => self.scenario.steps[i].description.clone(),
            Compiled::Guard => "unresolved steps check".to_owned(),
        }
    }

    /// Executes the compiled step at `index` synchronously.
    fn execute(&mut self, index: usize) -> Result<(), ScenarioError> {
        let table = Arc::clone(&self.table);
        match self.steps[index] {
            Compiled::Hook(ty, i) => {
                let hook = match ty {
                    HookType::Before => &table.before_hooks()[i],
                    HookType::After => &table.after_hooks()[i],
                };
                let label = self.label(index);
                tracing::trace!(hook = %ty, index = i, "running hook");
                invoke(&mut self.ctx, &label, |ctx| hook(ctx))?;
            }
            Compiled::Step(i) => {
                let scenario = Arc::clone(&self.scenario);
                let step = &scenario.steps[i];
                match table.resolve(&step.description, &step.arguments) {
                    Resolution::Resolved { definition, args } => {
                        if self.report.is_clean() {
                            tracing::trace!(step = %step.description, "running step");
                            invoke(&mut self.ctx, &step.description, |ctx| {
                                definition.call(ctx, args)
                            })?;
                        }
                    }
                    Resolution::Unresolved => {
                        tracing::warn!(step = %step.description, "no matching step definition");
                        self.report.missing.push(step.description.clone());
                    }
                    Resolution::Ambiguous(matches) => {
                        tracing::warn!(
                            step = %step.description,
                            %matches,
                            "ambiguous step definitions",
                        );
                        self.report.ambiguous.push(step.description.clone());
                    }
                }
            }
            Compiled::Guard => self.guard()?,
        }
        Ok(())
    }

    fn guard(&self) -> Result<(), ScenarioError> {
        let ScanReport { missing, ambiguous } = &self.report;
        if !missing.is_empty() {
            let known = self.known_steps.iter().map(String::as_str);
            return Err(ScenarioError::MissingSteps {
                reports: missing
                    .iter()
                    .map(|m| {
                        similarity::suggest(m, known.clone(), missing.as_slice())
                    })
                    .collect(),
                ambiguous: ambiguous.clone(),
            });
        }
        if !ambiguous.is_empty() {
            return Err(ScenarioError::AmbiguousSteps { steps: ambiguous.clone() });
        }
        Ok(())
    }

    /// Applies resumptions that already happened, returning whether some
    /// [`Continuation`]s issued by the step at `index` are still pending.
    ///
    /// [`Continuation`]: crate::Continuation
    fn collect_resumed(&mut self, index: usize) -> Result<bool, StepError> {
        let label = self.label(index);
        let mut pending = Vec::new();
        loop {
            let issued = self.ctx.take_pending();
            if issued.is_empty() {
                break;
            }
            for mut rx in issued {
                match rx.try_recv() {
                    Ok(Some(resume)) => apply(&mut self.ctx, &label, resume)?,
                    Ok(None) => pending.push(rx),
                    Err(oneshot::Canceled) => {
                        return Err(StepError::Abandoned { step: label });
                    }
                }
            }
        }
        let is_pending = !pending.is_empty();
        self.ctx.restore_pending(pending);
        Ok(is_pending)
    }

    /// Waits for every pending [`Continuation`] of the step at `index`,
    /// applying each one as soon as it's resumed.
    ///
    /// [`Continuation`]: crate::Continuation
    async fn await_resumed(&mut self, index: usize) -> Result<(), StepError> {
        let label = self.label(index);
        let mut outstanding = FuturesUnordered::new();
        loop {
            outstanding.extend(self.ctx.take_pending());
            let Some(resumed) = outstanding.next().await else {
                return Ok(());
            };
            let resume = resumed
                .map_err(|_| StepError::Abandoned { step: label.clone() })?;
            apply(&mut self.ctx, &label, resume)?;
        }
    }
}

/// Invokes `f` catching its panics, and attributing failures to `label`.
fn invoke<W>(
    ctx: &mut ScenarioContext<W>,
    label: &str,
    f: impl FnOnce(&mut ScenarioContext<W>) -> anyhow::Result<()>,
) -> Result<(), StepError> {
    match panic::catch_unwind(AssertUnwindSafe(|| f(ctx))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(StepError::execution(label, &e)),
        Err(payload) => Err(StepError::panicked(label, &*payload)),
    }
}

fn apply<W>(
    ctx: &mut ScenarioContext<W>,
    label: &str,
    resume: Resume<W>,
) -> Result<(), StepError> {
    tracing::trace!(step = label, "resumed");
    invoke(ctx, label, resume)
}
