use bigtwo_core::combo::{HandType, classify, compare, generate};
use bigtwo_core::model::card::Card;
use bigtwo_core::model::deck::Deck;
use core::cmp::Ordering;
use proptest::prelude::*;
use proptest::sample::subsequence;

fn deck() -> Vec<Card> {
    Deck::standard().cards().to_vec()
}

fn five_cards() -> impl Strategy<Value = Vec<Card>> {
    subsequence(deck(), 5)
}

/// Three plays of one legal size, drawn from a shared deck so they may overlap.
fn comparable_triple() -> impl Strategy<Value = (Vec<Card>, Vec<Card>, Vec<Card>)> {
    prop_oneof![Just(1usize), Just(2), Just(3), Just(5)].prop_flat_map(|size| {
        (
            subsequence(deck(), size),
            subsequence(deck(), size),
            subsequence(deck(), size),
        )
    })
}

/// Independent restatement of the five-card shapes, in precedence order.
fn predicates(cards: &[Card]) -> [(HandType, bool); 5] {
    let flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable();
    let straight = values.windows(2).all(|w| w[1] == w[0] + 1);
    let mut counts: Vec<usize> = values
        .chunk_by(|a, b| a == b)
        .map(<[u8]>::len)
        .collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));
    [
        (HandType::StraightFlush, flush && straight),
        (HandType::FourOfAKind, counts[0] == 4),
        (HandType::FullHouse, counts == [3, 2]),
        (HandType::Flush, flush && !straight),
        (HandType::Straight, straight && !flush),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn five_cards_classify_to_at_most_one_type(cards in five_cards()) {
        let shapes = predicates(&cards);
        let hits: Vec<HandType> = shapes.iter().filter(|(_, hit)| *hit).map(|(t, _)| *t).collect();
        prop_assert!(hits.len() <= 1);
        match classify(&cards) {
            Ok(result) => {
                prop_assert_eq!(hits, vec![result.hand_type]);
            }
            Err(_) => {
                prop_assert!(hits.is_empty());
            }
        }
        prop_assert_eq!(classify(&cards), classify(&cards));
    }

    #[test]
    fn compare_is_a_total_order((a, b, c) in comparable_triple()) {
        let ab = compare(&a, &b);
        let ba = compare(&b, &a);
        if let (Ok(ab), Ok(ba)) = (ab, ba) {
            prop_assert_eq!(ab, ba.reverse());

            if ab == Ordering::Equal {
                // a tie needs the same key card, so disjoint plays never tie
                let key = classify(&a).map(|r| r.key());
                prop_assert!(matches!(key, Ok(card) if a.contains(&card) && b.contains(&card)));
            }

            if let (Ok(bc), Ok(ac)) = (compare(&b, &c), compare(&a, &c)) {
                if ab == Ordering::Less && bc == Ordering::Less {
                    prop_assert_eq!(ac, Ordering::Less);
                }
                if ab == Ordering::Greater && bc == Ordering::Greater {
                    prop_assert_eq!(ac, Ordering::Greater);
                }
            }
        }
        if classify(&a).is_ok() {
            prop_assert_eq!(compare(&a, &a), Ok(Ordering::Equal));
        }
    }

    #[test]
    fn generator_finds_every_held_play(
        hand in subsequence(deck(), 13),
        picks in subsequence((0..13usize).collect::<Vec<_>>(), 1..=5),
    ) {
        let mut play: Vec<Card> = picks.iter().map(|&i| hand[i]).collect();
        play.sort();
        if let Ok(result) = classify(&play) {
            let candidates = generate(&hand, result.hand_type);
            prop_assert!(candidates.contains(&play), "{:?} missing from {:?}", play, result.hand_type);
        }
    }
}
