use super::{ComboError, HandResult, HandType, rank_groups};
use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

pub fn classify(cards: &[Card]) -> Result<HandResult, ComboError> {
    match cards.len() {
        1 => Ok(HandResult::new(HandType::Single, cards[0].rank, cards[0].suit)),
        2 => classify_set(cards, HandType::Pair),
        3 => classify_set(cards, HandType::ThreeOfAKind),
        5 => classify_five(cards),
        other => Err(ComboError::InvalidHandSize(other)),
    }
}

fn classify_set(cards: &[Card], hand_type: HandType) -> Result<HandResult, ComboError> {
    let rank = cards[0].rank;
    if cards.iter().any(|card| card.rank != rank) {
        return Err(ComboError::NotASet);
    }
    Ok(HandResult::new(hand_type, rank, highest_suit(cards)))
}

fn classify_five(cards: &[Card]) -> Result<HandResult, ComboError> {
    let flush = is_flush(cards);
    let straight_top = straight_top(cards);

    if let (true, Some(top)) = (flush, straight_top) {
        return Ok(run_result(HandType::StraightFlush, cards, top));
    }

    let mut groups: Vec<Vec<Card>> = rank_groups(cards).into_values().collect();
    groups.sort_by(|a, b| b.len().cmp(&a.len()));
    let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();

    if sizes[0] == 4 {
        return Ok(group_result(HandType::FourOfAKind, &groups[0]));
    }

    if sizes == [3, 2] {
        return Ok(group_result(HandType::FullHouse, &groups[0]));
    }

    if flush {
        let top = cards.iter().max().copied().unwrap_or(cards[0]);
        return Ok(HandResult::new(HandType::Flush, top.rank, top.suit));
    }

    if let Some(top) = straight_top {
        return Ok(run_result(HandType::Straight, cards, top));
    }

    Err(ComboError::NotAFiveCardHand)
}

fn is_flush(cards: &[Card]) -> bool {
    cards.iter().all(|card| card.suit == cards[0].suit)
}

/// Highest rank of a run of five consecutive rank values. Ace counts only as
/// the bottom of a run, so A-2-3-4-5 tops out at Five and nothing wraps past
/// King.
fn straight_top(cards: &[Card]) -> Option<Rank> {
    let mut values: Vec<u8> = cards.iter().map(|card| card.rank.value()).collect();
    values.sort_unstable();
    let consecutive = values.windows(2).all(|pair| pair[1] == pair[0] + 1);
    if consecutive {
        values.last().copied().and_then(Rank::from_value)
    } else {
        None
    }
}

fn run_result(hand_type: HandType, cards: &[Card], top: Rank) -> HandResult {
    let top_cards: Vec<Card> = cards.iter().copied().filter(|c| c.rank == top).collect();
    HandResult::new(hand_type, top, highest_suit(&top_cards))
}

fn group_result(hand_type: HandType, group: &[Card]) -> HandResult {
    HandResult::new(hand_type, group[0].rank, highest_suit(group))
}

fn highest_suit(cards: &[Card]) -> Suit {
    cards
        .iter()
        .map(|card| card.suit)
        .max()
        .unwrap_or(Suit::Diamonds)
}
