// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of the definition phase.

use derive_more::with_trait::{Display, Error as StdError, From};

/// Error of defining features or step groups.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Feature or step pattern is not a valid [`Regex`].
    ///
    /// [`Regex`]: regex::Regex
    #[display("invalid step pattern: {_0}")]
    Pattern(regex::Error),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
