//! Ordered, position-indexed result set of one calculation.

use serde::{Deserialize, Serialize};

/// One concrete instance of a recurring event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurrence {
    /// Start instant, epoch millis.
    pub start: i64,
    /// End instant, epoch millis.
    pub end: i64,
    /// 1-based position within the series.
    pub position: u32,
}

/// ## Summary
/// Append-only collection of occurrences in position order.
///
/// Created fresh for every calculation and handed to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultCollector {
    occurrences: Vec<Occurrence>,
}

impl ResultCollector {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            occurrences: Vec::new(),
        }
    }

    pub(crate) fn append(&mut self, position: u32, start: i64, end: i64) {
        debug_assert!(
            self.occurrences.last().is_none_or(|last| last.position < position),
            "positions must be appended in ascending order"
        );
        self.occurrences.push(Occurrence {
            start,
            end,
            position,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Occurrence> {
        self.occurrences.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Occurrence] {
        &self.occurrences
    }

    #[must_use]
    pub fn first(&self) -> Option<&Occurrence> {
        self.occurrences.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Occurrence> {
        self.occurrences.last()
    }

    /// The collected occurrence with this series position, if any.
    #[must_use]
    pub fn by_position(&self, position: u32) -> Option<&Occurrence> {
        self.occurrences
            .binary_search_by_key(&position, |occurrence| occurrence.position)
            .ok()
            .map(|idx| &self.occurrences[idx])
    }

    /// The series position of the collected occurrence starting at `start`.
    #[must_use]
    pub fn position_of(&self, start: i64) -> Option<u32> {
        self.occurrences
            .binary_search_by_key(&start, |occurrence| occurrence.start)
            .ok()
            .map(|idx| self.occurrences[idx].position)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Occurrence> {
        self.occurrences
    }
}

impl IntoIterator for ResultCollector {
    type Item = Occurrence;
    type IntoIter = std::vec::IntoIter<Occurrence>;

    fn into_iter(self) -> Self::IntoIter {
        self.occurrences.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultCollector {
    type Item = &'a Occurrence;
    type IntoIter = std::slice::Iter<'a, Occurrence>;

    fn into_iter(self) -> Self::IntoIter {
        self.occurrences.iter()
    }
}
