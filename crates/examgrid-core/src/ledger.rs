//! Editable constraint ledger for one snapshot
//!
//! Holds decoded entries per category and enforces the per-category rules
//! before anything is encoded or persisted.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;

use crate::codec;
use crate::errors::{GridError, Result};
use crate::model::{ConstraintCategory, ConstraintEntry, ConstraintItems, ConstraintSnapshot};

/// Default name for a constraint snapshot saved without one
pub fn default_constraint_name(now: NaiveDateTime) -> String {
    format!("Snapshot {}", now.format("%Y-%m-%d %H:%M"))
}

/// Reject repeated course codes within one category
///
/// # Errors
///
/// `DuplicateCourseCode` naming the first repeat.
pub fn check_unique(category: ConstraintCategory, entries: &[ConstraintEntry]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for entry in entries {
        if !seen.insert(entry.course_code.as_str()) {
            return Err(GridError::DuplicateCourseCode {
                category: category.slug().to_string(),
                course_code: entry.course_code.clone(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintLedger {
    name: String,
    entries: BTreeMap<ConstraintCategory, Vec<ConstraintEntry>>,
}

impl ConstraintLedger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Start editing from a stored snapshot
    pub fn from_snapshot(snapshot: &ConstraintSnapshot) -> Self {
        Self {
            name: snapshot.name.clone(),
            entries: snapshot.entries.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn entries(&self, category: ConstraintCategory) -> &[ConstraintEntry] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Add a new entry
    ///
    /// # Errors
    ///
    /// - `KindMismatch` if the items are not of the category's kind
    /// - `DuplicateCourseCode` if the course already has an entry here
    /// - `PeriodConflict` if any selected period is in `excluded`
    pub fn add_entry(
        &mut self,
        category: ConstraintCategory,
        entry: ConstraintEntry,
        excluded: &BTreeSet<u32>,
    ) -> Result<()> {
        check_entry(category, &entry, excluded)?;
        if self
            .entries(category)
            .iter()
            .any(|e| e.course_code == entry.course_code)
        {
            return Err(GridError::DuplicateCourseCode {
                category: category.slug().to_string(),
                course_code: entry.course_code,
            });
        }
        self.entries.entry(category).or_default().push(entry);
        Ok(())
    }

    /// Replace the items of an existing entry
    ///
    /// # Errors
    ///
    /// `EntryNotFound` when the course has no entry, otherwise the same
    /// checks as [`ConstraintLedger::add_entry`] minus the duplicate check.
    pub fn update_entry(
        &mut self,
        category: ConstraintCategory,
        course_code: &str,
        items: ConstraintItems,
        excluded: &BTreeSet<u32>,
    ) -> Result<()> {
        let candidate = ConstraintEntry {
            course_code: course_code.to_string(),
            items,
        };
        check_entry(category, &candidate, excluded)?;
        let slot = self
            .entries
            .get_mut(&category)
            .and_then(|list| list.iter_mut().find(|e| e.course_code == course_code))
            .ok_or_else(|| GridError::EntryNotFound {
                category: category.slug().to_string(),
                course_code: course_code.to_string(),
            })?;
        *slot = candidate;
        Ok(())
    }

    pub fn remove_entry(
        &mut self,
        category: ConstraintCategory,
        course_code: &str,
    ) -> Option<ConstraintEntry> {
        let list = self.entries.get_mut(&category)?;
        let pos = list.iter().position(|e| e.course_code == course_code)?;
        Some(list.remove(pos))
    }

    /// Re-check uniqueness and kinds across every category
    ///
    /// # Errors
    ///
    /// `DuplicateCourseCode` or `KindMismatch` for the first offending entry.
    pub fn validate(&self) -> Result<()> {
        for (category, entries) in &self.entries {
            for entry in entries {
                check_kind(*category, entry)?;
            }
            check_unique(*category, entries)?;
        }
        Ok(())
    }

    /// Encoded string for every one of the ten categories
    ///
    /// # Errors
    ///
    /// Fails validation before encoding anything.
    pub fn encode_all(&self) -> Result<BTreeMap<ConstraintCategory, String>> {
        self.validate()?;
        Ok(ConstraintCategory::ALL
            .iter()
            .map(|c| (*c, codec::encode(self.entries(*c), c.kind())))
            .collect())
    }
}

fn check_kind(category: ConstraintCategory, entry: &ConstraintEntry) -> Result<()> {
    if entry.kind() != category.kind() {
        return Err(GridError::KindMismatch {
            category: category.slug().to_string(),
            expected: category.kind().to_string(),
        });
    }
    Ok(())
}

fn check_entry(
    category: ConstraintCategory,
    entry: &ConstraintEntry,
    excluded: &BTreeSet<u32>,
) -> Result<()> {
    check_kind(category, entry)?;
    let conflicts: Vec<u32> = entry
        .period_list()
        .iter()
        .copied()
        .filter(|p| excluded.contains(p))
        .collect();
    if !conflicts.is_empty() {
        return Err(GridError::PeriodConflict {
            course_code: entry.course_code.clone(),
            periods: conflicts,
        });
    }
    Ok(())
}
