//! Subject model and dense subject indexing.
//!
//! A subject is identified by its name alone. Solvers never hash subjects
//! in their inner loops: a [`SubjectIndex`] resolves each subject of a solve
//! to a dense position once, and schedules are arrays over those positions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An examinable subject.
///
/// Equality, ordering and hashing are derived from the name. Cloning is
/// cheap (the name buffer is shared).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject {
    name: Arc<str>,
}

impl Subject {
    /// Creates a subject with the given name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    /// Subject name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Subject {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Ordered, de-duplicated subject universe of one solve.
///
/// Position `i` is the dense index of `subjects[i]`. The order follows the
/// caller's subject list (first occurrence wins) and is the fixed iteration
/// order used by segment crossover.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectIndex {
    subjects: Vec<Subject>,
    positions: HashMap<Subject, usize>,
}

impl SubjectIndex {
    /// Builds an index from a subject list, dropping repeated names.
    pub fn new(subjects: &[Subject]) -> Self {
        let mut index = Self {
            subjects: Vec::with_capacity(subjects.len()),
            positions: HashMap::with_capacity(subjects.len()),
        };
        for subject in subjects {
            if !index.positions.contains_key(subject) {
                index.positions.insert(subject.clone(), index.subjects.len());
                index.subjects.push(subject.clone());
            }
        }
        index
    }

    /// Dense index of a subject.
    #[inline]
    pub fn position(&self, subject: &Subject) -> Option<usize> {
        self.positions.get(subject).copied()
    }

    /// Subject at a dense index.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Subject> {
        self.subjects.get(idx)
    }

    /// All subjects in index order.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Number of distinct subjects.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether the index holds no subjects.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
