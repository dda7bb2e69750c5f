use super::{ComboError, HandResult, classify};
use crate::model::card::Card;
use core::cmp::Ordering;

/// Orders two plays holding the same number of cards.
///
/// Singles, pairs and triples compare on their key card. Five-card plays rank
/// by type first and fall back to the key card only when the types match.
pub fn compare(left: &[Card], right: &[Card]) -> Result<Ordering, ComboError> {
    if left.len() != right.len() {
        return Err(ComboError::SizeMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let lhs = classify(left)?;
    let rhs = classify(right)?;

    if left.len() == 5 {
        let by_type = lhs
            .hand_type
            .five_card_priority()
            .cmp(&rhs.hand_type.five_card_priority());
        if by_type != Ordering::Equal {
            return Ok(by_type);
        }
    }

    Ok(compare_keys(&lhs, &rhs))
}

/// True when `candidate` is strictly stronger than `table`. Any shape or size
/// problem counts as not beating.
pub fn beats(candidate: &[Card], table: &[Card]) -> bool {
    matches!(compare(candidate, table), Ok(Ordering::Greater))
}

fn compare_keys(lhs: &HandResult, rhs: &HandResult) -> Ordering {
    lhs.key().cmp(&rhs.key())
}
