//! Version label allocation.
//!
//! Labels are `v<n>` with a per-project monotonically increasing numeric
//! suffix. The computation reads the current maximum and increments, so it
//! is only safe inside the orchestrator's per-project lock — two callers
//! reading the same maximum would allocate the same label.

use chrono::Utc;

/// Compute the next sequence label from the labels already assigned.
///
/// The maximum is taken over numeric suffixes (`v10` sorts after `v9`).
/// Labels that don't parse as `v<integer>` are ignored, and an empty or
/// entirely unparseable set yields `v1`. The permissive fallback is
/// deliberate: timestamp-derived labels produced under contention must not
/// poison subsequent allocations.
pub fn next_label<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let max = existing
        .into_iter()
        .filter_map(numeric_suffix)
        .max()
        .unwrap_or(0);
    format!("v{}", max + 1)
}

/// A guaranteed-unique label derived from a high-resolution UTC timestamp,
/// used when the sequential allocation race is lost on every retry. The
/// 23-digit suffix exceeds the `u64` range on purpose so [`next_label`]
/// never treats it as part of the sequence.
pub fn fallback_label() -> String {
    format!("v{}", Utc::now().format("%Y%m%d%H%M%S%f"))
}

/// Parse the numeric suffix of a `v<integer>` label.
pub fn numeric_suffix(label: &str) -> Option<u64> {
    label.strip_prefix('v')?.parse().ok()
}
