//! # Extremum Sequence Normalization
//!
//! Tide sources do not promise chronological order. Everything downstream
//! (interpolation, scale extents, markers) assumes extrema ascend strictly in
//! time, so this is the only place that order is established.
//!
//! ## Tie Policy
//! Two extrema sharing an exact timestamp would form a zero-width segment.
//! The sort is stable and the first extremum in input order is kept; later
//! ones at the same instant are dropped.

use crate::TideExtremum;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::debug;

/// Extrema in ascending time order with no repeated timestamps.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExtremumSequence {
    extrema: Vec<TideExtremum>,
}

impl ExtremumSequence {
    /// Sort and de-duplicate raw extrema. Never fails; empty in, empty out.
    pub fn from_unordered(mut extrema: Vec<TideExtremum>) -> Self {
        // Vec::sort_by_key is stable, so equal instants keep input order
        extrema.sort_by_key(|e| e.time);

        let before = extrema.len();
        extrema.dedup_by(|later, kept| later.time == kept.time);
        if extrema.len() != before {
            debug!(
                dropped = before - extrema.len(),
                "dropped extrema sharing a timestamp"
            );
        }

        Self { extrema }
    }

    pub fn as_slice(&self) -> &[TideExtremum] {
        &self.extrema
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TideExtremum> {
        self.extrema.iter()
    }

    pub fn len(&self) -> usize {
        self.extrema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extrema.is_empty()
    }

    /// First and last instants, if any.
    pub fn time_extent(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        Some((self.extrema.first()?.time, self.extrema.last()?.time))
    }

    pub fn into_vec(self) -> Vec<TideExtremum> {
        self.extrema
    }
}

impl<'a> IntoIterator for &'a ExtremumSequence {
    type Item = &'a TideExtremum;
    type IntoIter = std::slice::Iter<'a, TideExtremum>;

    fn into_iter(self) -> Self::IntoIter {
        self.extrema.iter()
    }
}
