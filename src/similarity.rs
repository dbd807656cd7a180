// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Closeness of step texts, used to suggest what an unresolved step could
//! have meant.

use std::fmt::Write as _;

use itertools::Itertools as _;

/// Maximum number of suggestions listed for an unresolved step.
pub const MAX_SUGGESTIONS: usize = 5;

/// Levenshtein distance between `a` and `b`, counted in [`char`]s.
#[must_use]
pub fn distance(a: &str, b: &str) -> usize {
    let b = b.chars().collect::<Vec<_>>();
    if b.is_empty() {
        return a.chars().count();
    }

    // Single row of the (|a| + 1) x (|b| + 1) matrix.
    let mut row = (0..=b.len()).collect::<Vec<_>>();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[b.len()]
}

/// Renders `unresolved` followed by the closest `known` step texts.
///
/// `known` texts are deduplicated and those in `reported` are skipped. At most
/// [`MAX_SUGGESTIONS`] candidates are listed, closest first, ties keeping
/// their order in `known`:
///
/// ```text
/// <unresolved>
/// \t\tDid you mean?
/// \t\t\t<candidate> (<distance>)
/// ```
#[must_use]
pub fn suggest<'k, R: AsRef<str>>(
    unresolved: &str,
    known: impl IntoIterator<Item = &'k str>,
    reported: &[R],
) -> String {
    let candidates = known
        .into_iter()
        .unique()
        .filter(|k| !reported.iter().any(|r| r.as_ref() == *k))
        .map(|k| (k, distance(unresolved, k)))
        .sorted_by_key(|(_, score)| *score)
        .take(MAX_SUGGESTIONS);

    let mut out = format!("{unresolved}\n\t\tDid you mean?");
    for (text, score) in candidates {
        _ = write!(out, "\n\t\t\t{text} ({score})");
    }
    out
}
