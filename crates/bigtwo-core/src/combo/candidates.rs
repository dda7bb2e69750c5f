use super::{Combinations, HandType, classify, rank_groups, suit_groups};
use crate::model::card::Card;
use crate::model::rank::Rank;

const RUN_LENGTH: usize = 5;

/// Every subset of `hand` that forms a play of `hand_type`. Each candidate is
/// returned in canonical card order; an empty result means the hand cannot
/// make that shape at all.
pub fn generate(hand: &[Card], hand_type: HandType) -> Vec<Vec<Card>> {
    let mut candidates = match hand_type {
        HandType::Single => hand.iter().map(|card| vec![*card]).collect(),
        HandType::Pair => sets(hand, 2),
        HandType::ThreeOfAKind => sets(hand, 3),
        HandType::FourOfAKind => four_of_a_kinds(hand),
        HandType::FullHouse => full_houses(hand),
        HandType::Flush => flushes(hand),
        HandType::Straight => straights(hand),
        HandType::StraightFlush => straight_flushes(hand),
    };
    for candidate in candidates.iter_mut() {
        candidate.sort();
    }
    candidates
}

fn sets(hand: &[Card], size: usize) -> Vec<Vec<Card>> {
    rank_groups(hand)
        .values()
        .flat_map(|group| Combinations::new(group, size))
        .collect()
}

fn four_of_a_kinds(hand: &[Card]) -> Vec<Vec<Card>> {
    let mut out = Vec::new();
    for (rank, group) in rank_groups(hand) {
        if group.len() < 4 {
            continue;
        }
        for quad in Combinations::new(&group, 4) {
            for kicker in hand.iter().filter(|card| card.rank != rank) {
                let mut play = quad.clone();
                play.push(*kicker);
                out.push(play);
            }
        }
    }
    out
}

fn full_houses(hand: &[Card]) -> Vec<Vec<Card>> {
    let groups = rank_groups(hand);
    let mut out = Vec::new();
    for (triple_rank, triple_group) in groups.iter().filter(|(_, g)| g.len() >= 3) {
        for triple in Combinations::new(triple_group, 3) {
            for (_, pair_group) in groups
                .iter()
                .filter(|(rank, g)| *rank != triple_rank && g.len() >= 2)
            {
                for pair in Combinations::new(pair_group, 2) {
                    let mut play = triple.clone();
                    play.extend(pair);
                    out.push(play);
                }
            }
        }
    }
    out
}

fn flushes(hand: &[Card]) -> Vec<Vec<Card>> {
    suit_groups(hand)
        .values()
        .filter(|group| group.len() >= RUN_LENGTH)
        .flat_map(|group| Combinations::new(group, RUN_LENGTH))
        .collect()
}

/// Every window of five consecutive rank values, expanded over every choice of
/// card for each rank slot. The lowest window is Ace through Five.
fn straights(hand: &[Card]) -> Vec<Vec<Card>> {
    let groups = rank_groups(hand);
    let mut out = Vec::new();
    let last_start = Rank::MAX_VALUE - RUN_LENGTH as u8 + 1;
    for start in Rank::MIN_VALUE..=last_start {
        let slots: Option<Vec<&[Card]>> = (start..start + RUN_LENGTH as u8)
            .map(|value| {
                Rank::from_value(value)
                    .and_then(|rank| groups.get(&rank))
                    .map(Vec::as_slice)
            })
            .collect();
        if let Some(slots) = slots {
            out.extend(cartesian(&slots));
        }
    }
    out
}

fn straight_flushes(hand: &[Card]) -> Vec<Vec<Card>> {
    suit_groups(hand)
        .values()
        .filter(|group| group.len() >= RUN_LENGTH)
        .flat_map(|group| straights(group))
        .filter(|play| {
            matches!(classify(play), Ok(result) if result.hand_type == HandType::StraightFlush)
        })
        .collect()
}

/// One card from each slot, odometer style.
fn cartesian(slots: &[&[Card]]) -> Vec<Vec<Card>> {
    if slots.iter().any(|slot| slot.is_empty()) {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut picks = vec![0usize; slots.len()];
    loop {
        out.push(
            picks
                .iter()
                .zip(slots)
                .map(|(&pick, slot)| slot[pick])
                .collect(),
        );
        let Some(slot) = (0..slots.len()).rev().find(|&i| picks[i] + 1 < slots[i].len()) else {
            return out;
        };
        picks[slot] += 1;
        for later in picks.iter_mut().skip(slot + 1) {
            *later = 0;
        }
    }
}
