// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Narrative model: [`Feature`]s made of [`Scenario`]s made of [`Step`]s.
//!
//! Narratives are declared in code with a small builder:
//!
//! ```rust
//! use serde_json::json;
//! use stepwise::{Feature, Scenario};
//!
//! let feature = Feature::new("Calculator: addition")
//!     .scenario(
//!         Scenario::new("adds two numbers")
//!             .given(r#"I enter "1""#)
//!             .and(r#"I add "2""#)
//!             .then(r#"I should get "3""#),
//!     )
//!     .scenario(
//!         Scenario::never("greets a person")
//!             .given_with("a person", [json!({"name": "Lance", "age": 3})]),
//!     );
//!
//! assert_eq!(feature.scenarios.len(), 2);
//! ```

use derive_more::with_trait::Display;
use serde_json::{Map, Value};

use crate::data_table;

/// Named group of [`Scenario`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// Free-text description, matched against [`StepGroup`] patterns.
    ///
    /// [`StepGroup`]: crate::StepGroup
    pub description: String,

    /// [`Scenario`]s in declaration order.
    pub scenarios: Vec<Scenario>,
}

impl Feature {
    /// Creates a new [`Feature`] without any [`Scenario`]s.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into(), scenarios: Vec::new() }
    }

    /// Appends the given [`Scenario`].
    #[must_use]
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }
}

/// Whether a [`Scenario`] takes part in a run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Selection {
    /// Runs unless its [`Feature`] has [`Selection::Only`] scenarios.
    #[default]
    Default,

    /// Focused: when present, the other scenarios of the [`Feature`] don't
    /// run.
    Only,

    /// Never runs.
    Never,
}

/// Ordered sequence of [`Step`]s forming one test case.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    /// Free-text description.
    pub description: String,

    /// [`Step`]s in declaration order.
    pub steps: Vec<Step>,

    /// Inclusion into a run.
    pub selection: Selection,
}

impl Scenario {
    /// Creates a new ordinary [`Scenario`].
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self::with_selection(description, Selection::Default)
    }

    /// Creates a new focused [`Scenario`].
    #[must_use]
    pub fn only(description: impl Into<String>) -> Self {
        Self::with_selection(description, Selection::Only)
    }

    /// Creates a new [`Scenario`] excluded from every run.
    #[must_use]
    pub fn never(description: impl Into<String>) -> Self {
        Self::with_selection(description, Selection::Never)
    }

    fn with_selection(
        description: impl Into<String>,
        selection: Selection,
    ) -> Self {
        Self { description: description.into(), steps: Vec::new(), selection }
    }

    /// Indicates whether this [`Scenario`] is focused.
    #[must_use]
    pub fn is_only(&self) -> bool {
        self.selection == Selection::Only
    }

    /// Indicates whether this [`Scenario`] is excluded from every run.
    #[must_use]
    pub fn is_never(&self) -> bool {
        self.selection == Selection::Never
    }

    /// Appends a [Given] [`Step`].
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[must_use]
    pub fn given(self, description: impl Into<String>) -> Self {
        self.given_with(description, [])
    }

    /// Appends a [Given] [`Step`] carrying structured `arguments`.
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[must_use]
    pub fn given_with(
        self,
        description: impl Into<String>,
        arguments: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.push(Keyword::Given, StepType::Given, description, arguments)
    }

    /// Appends a [When] [`Step`].
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[must_use]
    pub fn when(self, description: impl Into<String>) -> Self {
        self.when_with(description, [])
    }

    /// Appends a [When] [`Step`] carrying structured `arguments`.
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[must_use]
    pub fn when_with(
        self,
        description: impl Into<String>,
        arguments: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.push(Keyword::When, StepType::When, description, arguments)
    }

    /// Appends a [Then] [`Step`].
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[must_use]
    pub fn then(self, description: impl Into<String>) -> Self {
        self.then_with(description, [])
    }

    /// Appends a [Then] [`Step`] carrying structured `arguments`.
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[must_use]
    pub fn then_with(
        self,
        description: impl Into<String>,
        arguments: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.push(Keyword::Then, StepType::Then, description, arguments)
    }

    /// Appends an `And` [`Step`] continuing the previous [`StepType`].
    ///
    /// Opening a [`Scenario`] with `And` continues [`StepType::Given`].
    #[must_use]
    pub fn and(self, description: impl Into<String>) -> Self {
        self.and_with(description, [])
    }

    /// Appends an `And` [`Step`] carrying structured `arguments`.
    #[must_use]
    pub fn and_with(
        self,
        description: impl Into<String>,
        arguments: impl IntoIterator<Item = Value>,
    ) -> Self {
        let ty = self.steps.last().map_or(StepType::Given, |s| s.ty);
        self.push(Keyword::And, ty, description, arguments)
    }

    fn push(
        mut self,
        keyword: Keyword,
        ty: StepType,
        description: impl Into<String>,
        arguments: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.steps.push(Step {
            keyword,
            ty,
            description: description.into(),
            arguments: arguments.into_iter().collect(),
        });
        self
    }
}

/// Keyword a [`Step`] was written with.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Keyword {
    /// `Given`.
    Given,

    /// `When`.
    When,

    /// `Then`.
    Then,

    /// `And`, continuing the previous [`StepType`].
    And,
}

/// Bucket a [`Step`] belongs to.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum StepType {
    /// [Given] step.
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    Given,

    /// [When] step.
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    When,

    /// [Then] step.
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    Then,
}

/// Single line of a [`Scenario`].
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Keyword as written.
    pub keyword: Keyword,

    /// Bucket this [`Step`] belongs to, resolved when it was declared.
    pub ty: StepType,

    /// Text matched against step definition patterns.
    pub description: String,

    /// Structured arguments, passed to the handler after capture groups.
    pub arguments: Vec<Value>,
}

impl Step {
    /// Renders this [`Step`] with its keyword and arguments for display.
    ///
    /// Records (or a single list of records) are rendered as a table, any
    /// other arguments as JSON.
    #[must_use]
    pub fn full_description(&self) -> String {
        let keyword = self.keyword.to_string();
        match table_rows(&self.arguments) {
            Some(rows) => {
                data_table::stringify(&keyword, &self.description, Some(rows.as_slice()))
            }
            None if self.arguments.is_empty() => {
                data_table::stringify(&keyword, &self.description, None)
            }
            None => format!(
                "{keyword} {} {}",
                self.description,
                Value::Array(self.arguments.clone()),
            ),
        }
    }
}

/// Extracts table rows out of `arguments`, if they're shaped as records.
fn table_rows(arguments: &[Value]) -> Option<Vec<Map<String, Value>>> {
    let rows = match arguments {
        [Value::Array(items)] => items.as_slice(),
        _ => arguments,
    };
    if rows.is_empty() {
        return None;
    }
    rows.iter().map(|v| v.as_object().cloned()).collect()
}
