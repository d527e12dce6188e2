//! Diff-pair selection over a session's attempt snapshots.

use crate::api::AttemptSnapshot;

/// Re-validates the left/right attempt selection against `snapshots`.
///
/// A selection that still names a present attempt is kept. Otherwise left
/// falls back to the second-to-last attempt (the first when there is only
/// one) and right to the latest. An empty list clears both.
pub fn reconcile_selection(
    snapshots: &[AttemptSnapshot],
    left: Option<i64>,
    right: Option<i64>,
) -> (Option<i64>, Option<i64>) {
    if snapshots.is_empty() {
        return (None, None);
    }

    let is_present = |id: Option<i64>| {
        id.filter(|id| snapshots.iter().any(|snapshot| snapshot.id == *id))
    };

    let left = is_present(left).or_else(|| {
        snapshots
            .get(snapshots.len().saturating_sub(2))
            .map(|snapshot| snapshot.id)
    });
    let right = is_present(right).or_else(|| snapshots.last().map(|snapshot| snapshot.id));

    (left, right)
}
