// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types, organized by the phase they happen in.
//!
//! - [`core`]: definition phase ([`Error`])
//! - [`step`]: single step execution ([`StepError`])
//! - [`scenario`]: whole scenario outcome ([`ScenarioError`])

pub mod core;
pub mod scenario;
pub mod step;

pub use self::{
    core::{Error, Result},
    scenario::ScenarioError,
    step::{PanicPayloadExt, StepError, StepResult},
};
