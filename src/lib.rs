// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![doc = include_str!("../README.md")]
#![deny(nonstandard_style, trivial_casts, trivial_numeric_casts)]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod cli;
pub mod data_table;
pub mod error;
pub mod harness;
pub mod narrative;
pub mod registry;
pub mod runner;
pub mod similarity;
pub mod step;
pub mod suite;

#[doc(inline)]
pub use self::{
    error::{Error, Result, ScenarioError, StepError},
    harness::{Harness, Summary},
    narrative::{Feature, Keyword, Scenario, Selection, Step, StepType},
    registry::Registry,
    runner::{Outcome, TestCase},
    step::{
        Args, Continuation, Location, Resolution, ScenarioContext, StepGroup,
        StepTable,
    },
    suite::Suite,
};

/// State shared by the steps of a single scenario run.
///
/// Every scenario starts with a fresh [`Default`] value, so any such
/// `'static` type is a [`World`].
pub trait World: Default + 'static {}

impl<T: Default + 'static> World for T {}
