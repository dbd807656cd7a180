// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step definitions grouped per feature pattern, and their resolution.
//!
//! A [`StepGroup`] binds step patterns and hooks to every [`Feature`] whose
//! description its pattern matches. For a concrete [`Feature`] the applicable
//! groups are flattened into a [`StepTable`], which then resolves step texts.
//!
//! [`Feature`]: crate::Feature

use std::{fmt, sync::Arc};

use derive_more::with_trait::Debug;
use regex::Regex;
use serde_json::Value;

use crate::{error, StepType};

use super::{
    args::Args, context::ScenarioContext, error::AmbiguousMatchError,
    location::Location, regex::StepPattern,
};

/// Handler of a step definition.
pub type StepFn<W> = Arc<
    dyn Fn(&mut ScenarioContext<W>, Args) -> anyhow::Result<()> + Send + Sync,
>;

/// Hook running before or after every scenario of a matching feature.
pub type HookFn<W> =
    Arc<dyn Fn(&mut ScenarioContext<W>) -> anyhow::Result<()> + Send + Sync>;

/// Step pattern bound to its handler.
#[derive(Debug)]
pub struct StepDefinition<W> {
    /// Keyword the definition was registered with.
    ///
    /// Informational only: a step of any [`StepType`] may resolve to it.
    pub ty: StepType,

    /// Pattern matched against the whole step text.
    pub pattern: StepPattern,

    /// Where the definition was registered.
    pub location: Location,

    #[debug(skip)]
    handler: StepFn<W>,
}

// Implemented manually to omit redundant `W: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<W> Clone for StepDefinition<W> {
    fn clone(&self) -> Self {
        Self {
            ty: self.ty,
            pattern: self.pattern.clone(),
            location: self.location,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<W> StepDefinition<W> {
    /// Invokes the handler.
    ///
    /// # Errors
    ///
    /// Whatever the handler returns.
    pub fn call(
        &self,
        ctx: &mut ScenarioContext<W>,
        args: Args,
    ) -> anyhow::Result<()> {
        (self.handler)(ctx, args)
    }
}

/// Step definitions and hooks applying to features whose description matches
/// a pattern.
///
/// ```rust
/// # fn main() -> stepwise::Result<()> {
/// #[derive(Default)]
/// struct Calculator {
///     values: Vec<i64>,
/// }
///
/// let steps = stepwise::StepGroup::<Calculator>::new("Calculator:")?
///     .before(|ctx| {
///         ctx.values.clear();
///         Ok(())
///     })
///     .when(r#"I enter "(.*)""#, |ctx, args| {
///         ctx.values.push(args.parse(0)?);
///         Ok(())
///     })?;
///
/// assert!(steps.applies_to("Calculator: addition"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StepGroup<W> {
    pattern: Regex,
    definitions: Vec<StepDefinition<W>>,
    #[debug("{} hook(s)", before.len())]
    before: Vec<HookFn<W>>,
    #[debug("{} hook(s)", after.len())]
    after: Vec<HookFn<W>>,
}

impl<W> StepGroup<W> {
    /// Creates an empty [`StepGroup`] for features matching `feature_pattern`.
    ///
    /// The pattern only has to match somewhere in a feature description.
    ///
    /// # Errors
    ///
    /// If `feature_pattern` isn't a valid [`Regex`].
    pub fn new(feature_pattern: &str) -> error::Result<Self> {
        Ok(Self {
            pattern: Regex::new(feature_pattern)?,
            definitions: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
        })
    }

    /// Indicates whether this [`StepGroup`] applies to the feature with the
    /// given `description`.
    #[must_use]
    pub fn applies_to(&self, description: &str) -> bool {
        self.pattern.is_match(description)
    }

    /// Registers a [Given] step definition.
    ///
    /// # Errors
    ///
    /// If `pattern` isn't a valid [`Regex`].
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[track_caller]
    pub fn given<F>(self, pattern: &str, handler: F) -> error::Result<Self>
    where
        F: Fn(&mut ScenarioContext<W>, Args) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.define(StepType::Given, pattern, Arc::new(handler), Location::caller())
    }

    /// Registers a [When] step definition.
    ///
    /// # Errors
    ///
    /// If `pattern` isn't a valid [`Regex`].
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[track_caller]
    pub fn when<F>(self, pattern: &str, handler: F) -> error::Result<Self>
    where
        F: Fn(&mut ScenarioContext<W>, Args) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.define(StepType::When, pattern, Arc::new(handler), Location::caller())
    }

    /// Registers a [Then] step definition.
    ///
    /// # Errors
    ///
    /// If `pattern` isn't a valid [`Regex`].
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[track_caller]
    pub fn then<F>(self, pattern: &str, handler: F) -> error::Result<Self>
    where
        F: Fn(&mut ScenarioContext<W>, Args) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.define(StepType::Then, pattern, Arc::new(handler), Location::caller())
    }

    /// Registers a hook running before every matching scenario.
    #[must_use]
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ScenarioContext<W>) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.before.push(Arc::new(hook));
        self
    }

    /// Registers a hook running after every matching scenario.
    #[must_use]
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ScenarioContext<W>) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.after.push(Arc::new(hook));
        self
    }

    fn define(
        mut self,
        ty: StepType,
        pattern: &str,
        handler: StepFn<W>,
        location: Location,
    ) -> error::Result<Self> {
        self.definitions.push(StepDefinition {
            ty,
            pattern: StepPattern::new(pattern)?,
            location,
            handler,
        });
        Ok(self)
    }
}

/// Outcome of resolving a step text against a [`StepTable`].
#[derive(Debug)]
pub enum Resolution<'t, W> {
    /// Exactly one definition matches.
    Resolved {
        /// Matching definition.
        definition: &'t StepDefinition<W>,

        /// Capture groups followed by the step's own arguments.
        args: Args,
    },

    /// No definition matches.
    Unresolved,

    /// Several definitions match.
    Ambiguous(AmbiguousMatchError),
}

/// Step definitions and hooks effective for a single feature.
#[derive(Debug)]
pub struct StepTable<W> {
    definitions: Vec<StepDefinition<W>>,
    #[debug("{} hook(s)", before.len())]
    before: Vec<HookFn<W>>,
    #[debug("{} hook(s)", after.len())]
    after: Vec<HookFn<W>>,
}

// Implemented manually to omit redundant `W: Default` trait bound, imposed
// by `#[derive(Default)]`.
impl<W> Default for StepTable<W> {
    fn default() -> Self {
        Self { definitions: Vec::new(), before: Vec::new(), after: Vec::new() }
    }
}

impl<W> StepTable<W> {
    /// Flattens, in order, every group applying to the feature with the given
    /// `description`.
    pub fn select<'g>(
        description: &str,
        groups: impl IntoIterator<Item = &'g StepGroup<W>>,
    ) -> Self
    where
        W: 'g,
    {
        let mut table = Self::default();
        for group in groups.into_iter().filter(|g| g.applies_to(description)) {
            table.definitions.extend(group.definitions.iter().cloned());
            table.before.extend(group.before.iter().map(Arc::clone));
            table.after.extend(group.after.iter().map(Arc::clone));
        }
        tracing::debug!(
            feature = description,
            definitions = table.definitions.len(),
            before = table.before.len(),
            after = table.after.len(),
            "selected step table",
        );
        table
    }

    /// Returns the step definitions, in registration order.
    #[must_use]
    pub fn definitions(&self) -> &[StepDefinition<W>] {
        &self.definitions
    }

    /// Returns the before hooks, in registration order.
    #[must_use]
    pub fn before_hooks(&self) -> &[HookFn<W>] {
        &self.before
    }

    /// Returns the after hooks, in registration order.
    #[must_use]
    pub fn after_hooks(&self) -> &[HookFn<W>] {
        &self.after
    }

    /// Resolves the step `text` carrying structured `arguments`.
    #[must_use]
    pub fn resolve(&self, text: &str, arguments: &[Value]) -> Resolution<'_, W> {
        let mut matches = self
            .definitions
            .iter()
            .filter_map(|def| def.pattern.captures(text).map(|caps| (def, caps)))
            .collect::<Vec<_>>();

        match matches.len() {
            0 => Resolution::Unresolved,
            1 => {
                // Instead of `.unwrap()` to avoid documenting `# Panics`.
                let (definition, captures) =
                    matches.pop().unwrap_or_else(|| unreachable!());
                Resolution::Resolved {
                    definition,
                    args: Args::new(captures, arguments.iter().cloned()),
                }
            }
            _ => Resolution::Ambiguous(AmbiguousMatchError::new(
                matches.into_iter().map(|(d, _)| (d.pattern.clone(), d.location)),
            )),
        }
    }
}

impl<W> fmt::Display for StepTable<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for def in &self.definitions {
            writeln!(f, "{} {} --> {}", def.ty, def.pattern, def.location)?;
        }
        Ok(())
    }
}
