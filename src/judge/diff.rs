//! Line diff between expected and actual output
//!
//! Lines are aligned on their longest common subsequence. Only removed
//! (expected-side) and inserted (actual-side) lines are reported, and within
//! each changed region the removed lines come first.

use std::fmt;

use serde::Serialize;

/// Upper bound on LCS table cells. Beyond it the changed region is reported
/// as a block replacement instead of an aligned diff.
const MAX_LCS_CELLS: usize = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// Present in the expected output only
    Removed,
    /// Present in the actual output only
    Inserted,
}

/// One changed line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub kind: DiffKind,
    /// 1-based line number in the expected (removed) or actual (inserted) text
    pub line_number: usize,
    pub text: String,
}

impl DiffLine {
    fn removed(line_number: usize, text: &str) -> Self {
        Self {
            kind: DiffKind::Removed,
            line_number,
            text: text.to_string(),
        }
    }

    fn inserted(line_number: usize, text: &str) -> Self {
        Self {
            kind: DiffKind::Inserted,
            line_number,
            text: text.to_string(),
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiffKind::Removed => write!(f, "- {}", self.text),
            DiffKind::Inserted => write!(f, "+ {}", self.text),
        }
    }
}

/// Diff `expected` against `actual`, line by line
pub fn line_diff(expected: &str, actual: &str) -> Vec<DiffLine> {
    let a: Vec<&str> = expected.lines().collect();
    let b: Vec<&str> = actual.lines().collect();

    // Common prefix and suffix never show up in the diff; trimming them keeps
    // the table small for the usual "one line differs" case.
    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let a_mid = &a[prefix..a.len() - suffix];
    let b_mid = &b[prefix..b.len() - suffix];

    let mut out = Vec::new();

    if a_mid.len().saturating_mul(b_mid.len()) > MAX_LCS_CELLS {
        out.extend(
            a_mid
                .iter()
                .enumerate()
                .map(|(i, line)| DiffLine::removed(prefix + i + 1, line)),
        );
        out.extend(
            b_mid
                .iter()
                .enumerate()
                .map(|(j, line)| DiffLine::inserted(prefix + j + 1, line)),
        );
        return out;
    }

    let (n, m) = (a_mid.len(), b_mid.len());
    let width = m + 1;
    // lcs[i * width + j] = LCS length of a_mid[i..] and b_mid[j..]
    let mut lcs = vec![0usize; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * width + j] = if a_mid[i] == b_mid[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a_mid[i] == b_mid[j] {
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            out.push(DiffLine::removed(prefix + i + 1, a_mid[i]));
            i += 1;
        } else {
            out.push(DiffLine::inserted(prefix + j + 1, b_mid[j]));
            j += 1;
        }
    }
    out.extend((i..n).map(|i| DiffLine::removed(prefix + i + 1, a_mid[i])));
    out.extend((j..m).map(|j| DiffLine::inserted(prefix + j + 1, b_mid[j])));

    out
}
