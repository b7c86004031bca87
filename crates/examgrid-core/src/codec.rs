//! Constraint codec
//!
//! Wire form of one category: entries joined by `"; "`, each entry
//! `CODE(item1,item2,...)`. An entry with no items is written as a bare
//! `CODE`. Decoding is lenient: segments that do not parse are reported as
//! [`ParseWarning`]s next to the entries that did.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{ConstraintEntry, ConstraintItems, ConstraintKind};

pub const ENTRY_SEPARATOR: &str = "; ";

/// Reason attached to a repeated course code
pub const REASON_DUPLICATE: &str = "duplicate course code";

/// A segment that was dropped while decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub segment: String,
    pub reason: String,
}

/// Decoded entries plus anything that had to be dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub entries: Vec<ConstraintEntry>,
    pub warnings: Vec<ParseWarning>,
}

impl Decoded {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Encode entries of one category
///
/// Entries whose items are not of `kind` are skipped; the ledger never
/// produces them.
pub fn encode(entries: &[ConstraintEntry], kind: ConstraintKind) -> String {
    entries
        .iter()
        .filter(|entry| {
            let matches = entry.kind() == kind;
            if !matches {
                tracing::warn!(
                    course_code = %entry.course_code,
                    expected = %kind,
                    "skipping constraint entry of the wrong kind"
                );
            }
            matches
        })
        .map(encode_entry)
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

fn encode_entry(entry: &ConstraintEntry) -> String {
    if entry.items.is_empty() {
        entry.course_code.clone()
    } else {
        format!("{}({})", entry.course_code, entry.items.to_strings().join(","))
    }
}

/// Decode one category's wire string
///
/// Blank segments are ignored. A repeated course code keeps the first
/// occurrence and warns about the rest.
pub fn decode(s: &str, kind: ConstraintKind) -> Decoded {
    let mut decoded = Decoded::default();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for raw in s.split(';') {
        let segment = raw.trim();
        if segment.is_empty() {
            continue;
        }
        match decode_segment(segment, kind) {
            Ok(entry) => {
                if seen.insert(entry.course_code.clone()) {
                    decoded.entries.push(entry);
                } else {
                    decoded.warnings.push(warning(segment, REASON_DUPLICATE));
                }
            }
            Err(reason) => decoded.warnings.push(warning(segment, reason)),
        }
    }

    for w in &decoded.warnings {
        tracing::warn!(segment = %w.segment, reason = %w.reason, "dropped constraint segment");
    }
    decoded
}

fn warning(segment: &str, reason: impl Into<String>) -> ParseWarning {
    ParseWarning {
        segment: segment.to_string(),
        reason: reason.into(),
    }
}

/// `\w` in the ASCII sense: letters, digits, underscore
fn is_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn decode_segment(segment: &str, kind: ConstraintKind) -> Result<ConstraintEntry, String> {
    let (code, inner) = match segment.find('(') {
        None => (segment, None),
        Some(open) => {
            let rest = &segment[open + 1..];
            let inner = rest
                .strip_suffix(')')
                .ok_or_else(|| "missing closing parenthesis".to_string())?;
            if inner.contains('(') || inner.contains(')') {
                return Err("nested parentheses".to_string());
            }
            (&segment[..open], Some(inner))
        }
    };

    if !is_code(code) {
        return Err(format!("invalid code '{code}'"));
    }

    let items: Vec<&str> = inner
        .map(|i| {
            i.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let items = match kind {
        ConstraintKind::Period => {
            let mut periods = Vec::with_capacity(items.len());
            for item in items {
                let p = item
                    .parse::<u32>()
                    .map_err(|_| format!("invalid period '{item}'"))?;
                periods.push(p);
            }
            ConstraintItems::Periods(periods)
        }
        ConstraintKind::Venue => {
            ConstraintItems::Venues(items.into_iter().map(str::to_string).collect())
        }
    };

    Ok(ConstraintEntry {
        course_code: code.to_string(),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_code_round_trips_as_empty_entry() {
        let decoded = decode("CSC301", ConstraintKind::Venue);
        assert!(decoded.is_clean());
        assert_eq!(
            decoded.entries,
            vec![ConstraintEntry::venues("CSC301", vec![])]
        );
        assert_eq!(encode(&decoded.entries, ConstraintKind::Venue), "CSC301");
    }

    #[test]
    fn test_items_are_trimmed_and_blank_items_dropped() {
        let decoded = decode("MTH101( LT1 , ,LT2 )", ConstraintKind::Venue);
        assert_eq!(
            decoded.entries,
            vec![ConstraintEntry::venues(
                "MTH101",
                vec!["LT1".to_string(), "LT2".to_string()]
            )]
        );
    }

    #[test]
    fn test_wrong_kind_entries_are_not_encoded() {
        let entries = vec![
            ConstraintEntry::periods("CSC301", vec![1]),
            ConstraintEntry::venues("CSC302", vec!["LT1".to_string()]),
        ];
        assert_eq!(encode(&entries, ConstraintKind::Period), "CSC301(1)");
    }
}
