// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI options of a [`Suite`] run.
//!
//! # Example
//!
//! ```rust,no_run
//! # use stepwise::{cli, Registry, Suite};
//! #
//! # #[derive(Default)]
//! # struct Queue(Vec<i64>);
//! #
//! # let _ = async {
//! let opts = cli::Opts::parsed();
//! opts.init_tracing();
//!
//! Suite::new(Registry::<Queue>::new())
//!     .with_cli(opts)
//!     .run_and_exit()
//!     .await;
//! # };
//! ```
//!
//! [`Suite`]: crate::Suite

use std::{str::FromStr, time::Duration};

use regex::Regex;
use smart_default::SmartDefault;
use tracing_subscriber::{
    fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter,
};

/// Root CLI (command line interface) of a [`Suite`] run.
///
/// [`Suite`]: crate::Suite
#[derive(clap::Parser, Clone, Debug, SmartDefault)]
#[command(
    name = "stepwise",
    about = "Run the scenarios, one step at a time.",
    long_about = "Run the scenarios, one step at a time."
)]
pub struct Opts {
    /// Regex to filter scenarios by their name.
    #[arg(
        id = "name",
        long = "name",
        short = 'n',
        value_name = "regex",
        visible_alias = "scenario-name"
    )]
    pub re_filter: Option<Regex>,

    /// Stop running scenarios after the first failure.
    #[arg(long, alias = "ff")]
    pub fail_fast: bool,

    /// Maximum time a single scenario may take, e.g. `500ms` or `2s`.
    #[arg(long, value_name = "duration", value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Coloring policy for a console output.
    #[arg(long, value_name = "auto|always|never", default_value = "auto")]
    #[default(Coloring::Auto)]
    pub color: Coloring,

    /// Verbosity of diagnostics.
    ///
    /// Without `-v` only warnings are logged, `-v` adds planning and run
    /// information, `-vv` traces every step and hook.
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Opts {
    /// Shortcut for [`clap::Parser::parse()`], which doesn't require the trait
    /// being imported.
    #[must_use]
    pub fn parsed() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Level of diagnostics requested by [`Opts::verbose`].
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Initializes a global [`tracing::Subscriber`] writing to `stderr`.
    ///
    /// `RUST_LOG` takes precedence over [`Opts::verbose`]. Does nothing if a
    /// global subscriber has been set already.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level()));
        let initialized = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init();
        if initialized.is_err() {
            tracing::debug!("global tracing subscriber is already set");
        }
    }
}

/// Possible policies of a [`console`] output coloring.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Coloring {
    /// Letting [`console::colors_enabled()`] to decide, whether output should
    /// be colored.
    Auto,

    /// Forcing of a colored output.
    Always,

    /// Forcing of a non-colored output.
    Never,
}

impl FromStr for Coloring {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err("possible options: auto, always, never"),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    #[test]
    fn parses_all_options() {
        let opts = Opts::try_parse_from([
            "stepwise",
            "--name",
            "^enqueue",
            "--fail-fast",
            "--timeout",
            "1s 500ms",
            "--color",
            "NEVER",
            "-vv",
        ])
        .unwrap();

        assert_eq!(opts.re_filter.as_ref().unwrap().as_str(), "^enqueue");
        assert!(opts.fail_fast);
        assert_eq!(opts.timeout, Some(Duration::from_millis(1500)));
        assert_eq!(opts.color, Coloring::Never);
        assert_eq!(opts.log_level(), "debug");
    }

    #[test]
    fn defaults_match_empty_command_line() {
        let parsed = Opts::try_parse_from(["stepwise"]).unwrap();
        let default = Opts::default();

        assert!(parsed.re_filter.is_none() && default.re_filter.is_none());
        assert_eq!(parsed.fail_fast, default.fail_fast);
        assert_eq!(parsed.timeout, default.timeout);
        assert_eq!(parsed.color, default.color);
        assert_eq!(parsed.log_level(), "warn");
    }

    #[test]
    fn rejects_unknown_coloring() {
        assert_eq!(
            "sometimes".parse::<Coloring>(),
            Err("possible options: auto, always, never"),
        );
        assert!(Opts::try_parse_from(["stepwise", "--color", "rainbow"]).is_err());
    }
}
