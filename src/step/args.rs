// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Arguments handed to a step handler.
//!
//! A resolved step receives its regex capture groups first (as JSON strings,
//! or `null` for groups that didn't participate), followed by the structured
//! arguments attached to the step in the narrative.

use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, Context as _};
use derive_more::with_trait::{Deref, From, Into};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Ordered arguments of a resolved step.
#[derive(Clone, Debug, Default, Deref, From, Into, PartialEq)]
pub struct Args(Vec<Value>);

impl Args {
    /// Concatenates capture groups and structured step arguments.
    #[must_use]
    pub fn new<'t>(
        captures: impl IntoIterator<Item = Option<&'t str>>,
        arguments: impl IntoIterator<Item = Value>,
    ) -> Self {
        Self(
            captures
                .into_iter()
                .map(|c| c.map_or(Value::Null, |s| Value::String(s.to_owned())))
                .chain(arguments)
                .collect(),
        )
    }

    /// Returns the argument at `index`.
    ///
    /// # Errors
    ///
    /// If there is no such argument.
    pub fn value(&self, index: usize) -> anyhow::Result<&Value> {
        self.0.get(index).ok_or_else(|| {
            anyhow!("step has {} argument(s), no #{index}", self.0.len())
        })
    }

    /// Returns the argument at `index` as a string slice.
    ///
    /// # Errors
    ///
    /// If there is no such argument or it isn't a string.
    pub fn str(&self, index: usize) -> anyhow::Result<&str> {
        let value = self.value(index)?;
        value
            .as_str()
            .ok_or_else(|| anyhow!("argument #{index} is not a string: {value}"))
    }

    /// Parses the string argument at `index`.
    ///
    /// # Errors
    ///
    /// If there is no such argument or it doesn't parse into `T`.
    pub fn parse<T>(&self, index: usize) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.str(index)?;
        raw.parse()
            .map_err(|e| anyhow!("failed to parse argument #{index} `{raw}`: {e}"))
    }

    /// Deserializes the argument at `index`.
    ///
    /// # Errors
    ///
    /// If there is no such argument or it doesn't deserialize into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self, index: usize) -> anyhow::Result<T> {
        T::deserialize(self.value(index)?)
            .with_context(|| format!("failed to deserialize argument #{index}"))
    }
}
