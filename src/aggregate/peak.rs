//! Peak annotation over grouped totals.

use std::collections::BTreeMap;

use crate::domain::{Annotated, Emphasis};

/// Mark every entry that attains the maximum total as `Peak`.
///
/// Ties at the maximum are all peaks. Output order follows the map's key order.
pub fn annotate_peaks<K: Copy + Ord>(totals: &BTreeMap<K, u64>) -> Vec<Annotated<K>> {
    let Some(max) = totals.values().copied().max() else {
        return Vec::new();
    };

    totals
        .iter()
        .map(|(&key, &value)| Annotated {
            key,
            value,
            emphasis: if value == max { Emphasis::Peak } else { Emphasis::Normal },
        })
        .collect()
}
