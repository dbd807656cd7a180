// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rendering of a step with its tabular arguments.
//!
//! ```rust
//! use serde_json::json;
//!
//! let rows = [json!({"name": "Lance", "age": 3})]
//!     .map(|v| v.as_object().cloned().unwrap());
//!
//! assert_eq!(
//!     stepwise::data_table::stringify("Given", "a person", Some(&rows[..])),
//!     "Given a person\n\t |  name | age | \n\t | Lance |   3 | ",
//! );
//! ```

use std::{borrow::Cow, fmt::Write as _};

use serde_json::{Map, Value};

/// Prefix of every table line.
pub const NEW_LINE: &str = "\n\t | ";

/// Separator following every table cell.
pub const SEPARATOR: &str = " | ";

/// Renders `"<keyword> <description>"` followed by a right-aligned table of
/// `rows`, if any.
///
/// Columns are the keys of the first row. A column is as wide as the longest
/// of its header and its cells.
#[must_use]
pub fn stringify(
    keyword: &str,
    description: &str,
    rows: Option<&[Map<String, Value>]>,
) -> String {
    let mut out = format!("{keyword} {description}");
    let rows = rows.unwrap_or_default();
    let Some(first) = rows.first() else {
        return out;
    };

    let columns = first
        .keys()
        .map(|key| {
            let width = rows
                .iter()
                .map(|row| cell(row, key).chars().count())
                .fold(key.chars().count(), usize::max);
            (key.as_str(), width)
        })
        .collect::<Vec<_>>();

    out.push_str(NEW_LINE);
    for &(key, width) in &columns {
        _ = write!(out, "{key:>width$}{SEPARATOR}");
    }
    for row in rows {
        out.push_str(NEW_LINE);
        for &(key, width) in &columns {
            _ = write!(out, "{:>width$}{SEPARATOR}", cell(row, key));
        }
    }
    out
}

/// Renders the cell of `row` under `key`: strings as is, other values as
/// JSON, missing ones as empty.
fn cell<'v>(row: &'v Map<String, Value>, key: &str) -> Cow<'v, str> {
    match row.get(key) {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s),
        Some(other) => Cow::Owned(other.to_string()),
    }
}
