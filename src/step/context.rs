// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-scenario state handed to step handlers and hooks.

use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use futures::channel::oneshot;
use serde_json::Value;

use crate::{
    error::{StepError, StepResult},
    World,
};

use super::collection::{Resolution, StepTable};

/// Deferred work shipped back to a suspended scenario by a [`Continuation`].
pub type Resume<W> =
    Box<dyn FnOnce(&mut ScenarioContext<W>) -> anyhow::Result<()> + Send>;

/// Fresh state of a single scenario run.
///
/// Dereferences to the user-defined [`World`], and additionally allows
/// handlers to run other steps inline ([`ScenarioContext::when()`]) or to
/// complete asynchronously ([`ScenarioContext::defer()`]).
pub struct ScenarioContext<W> {
    world: W,
    table: Arc<StepTable<W>>,
    pending: Vec<oneshot::Receiver<Resume<W>>>,
}

impl<W: fmt::Debug> fmt::Debug for ScenarioContext<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("world", &self.world)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl<W> Deref for ScenarioContext<W> {
    type Target = W;

    fn deref(&self) -> &W {
        &self.world
    }
}

impl<W> DerefMut for ScenarioContext<W> {
    fn deref_mut(&mut self) -> &mut W {
        &mut self.world
    }
}

impl<W: World> ScenarioContext<W> {
    /// Creates a new [`ScenarioContext`] with a [`Default`] [`World`],
    /// resolving inline steps against the given `table`.
    #[must_use]
    pub fn new(table: Arc<StepTable<W>>) -> Self {
        Self { world: W::default(), table, pending: Vec::new() }
    }
}

impl<W> ScenarioContext<W> {
    /// Consumes this [`ScenarioContext`] returning its [`World`].
    #[must_use]
    pub fn into_world(self) -> W {
        self.world
    }

    /// Runs the given [Given] step inline.
    ///
    /// # Errors
    ///
    /// If the step doesn't resolve to exactly one definition, or its handler
    /// fails.
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    pub fn given(&mut self, text: &str) -> StepResult<()> {
        self.run_inline(text, Vec::new())
    }

    /// Runs the given [Given] step inline with structured `arguments`.
    ///
    /// # Errors
    ///
    /// If the step doesn't resolve to exactly one definition, or its handler
    /// fails.
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    pub fn given_with(
        &mut self,
        text: &str,
        arguments: impl IntoIterator<Item = Value>,
    ) -> StepResult<()> {
        self.run_inline(text, arguments.into_iter().collect())
    }

    /// Runs the given [When] step inline.
    ///
    /// # Errors
    ///
    /// If the step doesn't resolve to exactly one definition, or its handler
    /// fails.
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    pub fn when(&mut self, text: &str) -> StepResult<()> {
        self.run_inline(text, Vec::new())
    }

    /// Runs the given [When] step inline with structured `arguments`.
    ///
    /// # Errors
    ///
    /// If the step doesn't resolve to exactly one definition, or its handler
    /// fails.
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    pub fn when_with(
        &mut self,
        text: &str,
        arguments: impl IntoIterator<Item = Value>,
    ) -> StepResult<()> {
        self.run_inline(text, arguments.into_iter().collect())
    }

    /// Runs the given [Then] step inline.
    ///
    /// # Errors
    ///
    /// If the step doesn't resolve to exactly one definition, or its handler
    /// fails.
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    pub fn then(&mut self, text: &str) -> StepResult<()> {
        self.run_inline(text, Vec::new())
    }

    /// Runs the given [Then] step inline with structured `arguments`.
    ///
    /// # Errors
    ///
    /// If the step doesn't resolve to exactly one definition, or its handler
    /// fails.
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    pub fn then_with(
        &mut self,
        text: &str,
        arguments: impl IntoIterator<Item = Value>,
    ) -> StepResult<()> {
        self.run_inline(text, arguments.into_iter().collect())
    }

    /// Defers completion of the currently executing step.
    ///
    /// The scenario doesn't advance past the current step until the returned
    /// [`Continuation`] is resumed. Resuming it before the handler returns
    /// advances right away. When called several times during one step, the
    /// step completes once every [`Continuation`] has been resumed.
    ///
    /// ```rust
    /// # use stepwise::{Args, ScenarioContext};
    /// #[derive(Default)]
    /// struct Queue(Vec<String>);
    ///
    /// fn enqueue_later(
    ///     ctx: &mut ScenarioContext<Queue>,
    ///     args: Args,
    /// ) -> anyhow::Result<()> {
    ///     let value = args.str(0)?.to_owned();
    ///     let done = ctx.defer();
    ///     std::thread::spawn(move || {
    ///         done.resume_with(move |ctx| {
    ///             ctx.0.push(value);
    ///             Ok(())
    ///         });
    ///     });
    ///     Ok(())
    /// }
    /// ```
    pub fn defer(&mut self) -> Continuation<W> {
        let (tx, rx) = oneshot::channel();
        self.pending.push(rx);
        Continuation { tx }
    }

    /// Takes [`Continuation`]s issued since the last call.
    pub(crate) fn take_pending(&mut self) -> Vec<oneshot::Receiver<Resume<W>>> {
        std::mem::take(&mut self.pending)
    }

    /// Puts back [`Continuation`]s that are still to be resumed.
    pub(crate) fn restore_pending(
        &mut self,
        pending: Vec<oneshot::Receiver<Resume<W>>>,
    ) {
        self.pending.extend(pending);
    }

    fn run_inline(&mut self, text: &str, arguments: Vec<Value>) -> StepResult<()> {
        let table = Arc::clone(&self.table);
        match table.resolve(text, &arguments) {
            Resolution::Resolved { definition, args } => {
                tracing::trace!(step = text, "running inline step");
                definition
                    .call(self, args)
                    .map_err(|e| StepError::execution(text, &e))
            }
            Resolution::Unresolved => Err(StepError::unmatched(text)),
            Resolution::Ambiguous(matches) => {
                Err(StepError::Ambiguous { step: text.to_owned(), matches })
            }
        }
    }
}

/// Single-use handle resuming a step suspended by
/// [`ScenarioContext::defer()`].
///
/// Dropping it without resuming fails the scenario.
#[must_use = "scenario stays suspended until the continuation is resumed"]
pub struct Continuation<W> {
    tx: oneshot::Sender<Resume<W>>,
}

impl<W> fmt::Debug for Continuation<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation")
            .field("canceled", &self.tx.is_canceled())
            .finish()
    }
}

impl<W: 'static> Continuation<W> {
    /// Resumes the suspended scenario.
    pub fn resume(self) {
        self.resume_with(|_| Ok(()));
    }

    /// Resumes the suspended scenario, first running `f` on its
    /// [`ScenarioContext`].
    ///
    /// `f` executes on the scenario's own flow, so it may freely mutate the
    /// [`World`] or run inline steps. Its failure fails the deferred step.
    pub fn resume_with<F>(self, f: F)
    where
        F: FnOnce(&mut ScenarioContext<W>) -> anyhow::Result<()> + Send + 'static,
    {
        if self.tx.send(Box::new(f)).is_err() {
            tracing::trace!("scenario finished before continuation resumed");
        }
    }
}
