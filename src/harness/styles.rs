// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Styling of a console output.

use std::borrow::Cow;

use console::Style;

use crate::cli::Coloring;

/// [`Style`]s for terminal output.
#[derive(Clone, Debug)]
pub struct Styles {
    /// [`Style`] for rendering passed scenarios.
    pub ok: Style,

    /// [`Style`] for rendering scenarios skipped by a fail-fast stop.
    pub skipped: Style,

    /// [`Style`] for rendering errors and failed scenarios.
    pub err: Style,

    /// [`Style`] for rendering headers.
    pub header: Style,

    /// [`Style`] for rendering __bold__.
    pub bold: Style,

    /// Indicates whether the output should be styled at all.
    pub is_present: bool,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            ok: Style::new().green(),
            skipped: Style::new().cyan(),
            err: Style::new().red(),
            header: Style::new().blue(),
            bold: Style::new().bold(),
            is_present: console::user_attended() && console::colors_enabled(),
        }
    }
}

impl Styles {
    /// Creates new [`Styles`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the given [`Coloring`] policy to these [`Styles`].
    pub fn apply_coloring(&mut self, color: Coloring) {
        match color {
            Coloring::Auto => {}
            Coloring::Always => {
                self.is_present = true;
                self.force_styling(true);
            }
            Coloring::Never => {
                self.is_present = false;
                self.force_styling(false);
            }
        }
    }

    fn force_styling(&mut self, value: bool) {
        for style in [
            &mut self.ok,
            &mut self.skipped,
            &mut self.err,
            &mut self.header,
            &mut self.bold,
        ] {
            *style = style.clone().force_styling(value);
        }
    }

    /// If styling is enabled colors `input` with [`Styles::ok`] color or
    /// leaves "as is" otherwise.
    #[must_use]
    pub fn ok<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.apply(&self.ok, input)
    }

    /// If styling is enabled colors `input` with [`Styles::skipped`] color or
    /// leaves "as is" otherwise.
    #[must_use]
    pub fn skipped<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.apply(&self.skipped, input)
    }

    /// If styling is enabled colors `input` with [`Styles::err`] color or
    /// leaves "as is" otherwise.
    #[must_use]
    pub fn err<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.apply(&self.err, input)
    }

    /// If styling is enabled colors `input` with [`Styles::header`] color or
    /// leaves "as is" otherwise.
    #[must_use]
    pub fn header<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.apply(&self.header, input)
    }

    /// If styling is enabled makes `input` __bold__ or leaves "as is"
    /// otherwise.
    #[must_use]
    pub fn bold<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.apply(&self.bold, input)
    }

    /// Adds `s` to `singular` if `num != 1`, making the result __bold__.
    #[must_use]
    pub fn maybe_plural(&self, singular: &str, num: usize) -> Cow<'static, str> {
        self.bold(format!("{num} {singular}{}", if num == 1 { "" } else { "s" }))
    }

    fn apply<'a>(&self, style: &Style, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        if self.is_present {
            style.apply_to(input.into()).to_string().into()
        } else {
            input.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_leaves_input_as_is() {
        let mut styles = Styles::new();
        styles.apply_coloring(Coloring::Never);

        assert_eq!(styles.err("failed"), "failed");
        assert_eq!(styles.bold(styles.ok("passed")), "passed");
    }

    #[test]
    fn always_emits_escape_sequences() {
        let mut styles = Styles::new();
        styles.apply_coloring(Coloring::Always);

        let styled = styles.err("failed");
        assert!(styled.starts_with('\u{1b}'), "not styled: {styled:?}");
        assert!(styled.contains("failed"));
    }

    #[test]
    fn pluralizes() {
        let mut styles = Styles::new();
        styles.apply_coloring(Coloring::Never);

        assert_eq!(styles.maybe_plural("scenario", 1), "1 scenario");
        assert_eq!(styles.maybe_plural("scenario", 0), "0 scenarios");
        assert_eq!(styles.maybe_plural("feature", 3), "3 features");
    }
}
