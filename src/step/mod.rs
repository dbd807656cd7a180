// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step definitions, their resolution and the context they run in.
//!
//! - [`collection`]: [`StepGroup`]s, the per-feature [`StepTable`] and
//!   [`Resolution`] of step texts
//! - [`context`]: [`ScenarioContext`] and [`Continuation`]s
//! - [`args`]: [`Args`] handed to handlers
//! - [`error`]: [`AmbiguousMatchError`]
//! - [`location`]: [`Location`] of definitions
//! - [`regex`]: anchored [`StepPattern`]s

pub mod args;
pub mod collection;
pub mod context;
pub mod error;
pub mod location;
pub mod regex;

pub use self::{
    args::Args,
    collection::{
        HookFn, Resolution, StepDefinition, StepFn, StepGroup, StepTable,
    },
    context::{Continuation, Resume, ScenarioContext},
    error::AmbiguousMatchError,
    location::Location,
    regex::StepPattern,
};
