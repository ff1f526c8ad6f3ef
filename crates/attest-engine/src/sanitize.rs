use attest_labels::Evaluator;
use attest_types::{Claim, labels_for};

/// Drop every result whose labels no longer satisfy `filter`.
///
/// Labels are re-derived from each stored `testID` exactly as at registration.
/// Surviving entries are left untouched. Returns the removed ids in key order.
pub fn sanitize_claim(claim: &mut Claim, filter: &Evaluator) -> Vec<String> {
    let removed: Vec<String> = claim
        .results
        .iter()
        .filter(|(_, result)| !filter.eval(&labels_for(&result.test_id)))
        .map(|(id, _)| id.clone())
        .collect();

    for id in &removed {
        tracing::debug!(check = %id, filter = filter.source(), "removing result from claim");
        claim.results.remove(id);
    }
    removed
}
