use crate::{Card, DeckId, Rank, RngState, Suit, ValidationError};
use serde::{Deserialize, Serialize};

pub const STANDARD_DECK_SIZE: usize = 52;

/// Suits in `Suit::ALL` order, ranks in `Rank::ALL` order within each suit:
/// starts at `AS`, ends at `KH`.
pub fn standard52() -> Vec<Card> {
    let mut cards = Vec::with_capacity(STANDARD_DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            cards.push(Card::new(rank, suit));
        }
    }
    cards
}

/// Produces the card sequence for a new deck.
///
/// With no requested codes the result is the full set, shuffled when
/// `shuffle` is set. With requested codes the result is exactly the cards
/// matching those codes, in request order. The subset is selected from the
/// full set by code, so it is never shuffled even when `shuffle` is set.
/// Unknown codes are skipped and a repeated code yields its card once.
pub fn generate_cards<S: AsRef<str>>(
    shuffle: bool,
    requested: &[S],
    rng: &mut RngState,
) -> Vec<Card> {
    let mut cards = standard52();
    if requested.is_empty() {
        if shuffle {
            rng.shuffle(&mut cards);
        }
        return cards;
    }
    let mut selected: Vec<Card> = Vec::with_capacity(requested.len());
    for code in requested {
        let code = code.as_ref();
        let Some(card) = cards.iter().find(|card| card.code() == *code) else {
            continue;
        };
        if !selected.contains(card) {
            selected.push(*card);
        }
    }
    selected
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub deck_id: DeckId,
    pub shuffled: bool,
    pub remaining: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new<S: AsRef<str>>(shuffled: bool, requested: &[S], rng: &mut RngState) -> Self {
        let cards = generate_cards(shuffled, requested, rng);
        Self {
            deck_id: DeckId::new(),
            shuffled,
            remaining: cards.len(),
            cards,
        }
    }

    /// Metadata only; the card sequence is dropped.
    pub fn into_summary(mut self) -> Self {
        self.cards = Vec::new();
        self
    }

    /// Removes the last `count` cards, returning them last card first.
    /// Leaves the deck untouched when it holds fewer than `count` cards.
    pub fn draw(&mut self, count: usize) -> Result<Vec<Card>, ValidationError> {
        if count > self.cards.len() {
            return Err(ValidationError::NotEnoughCards {
                requested: count,
                remaining: self.cards.len(),
            });
        }
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(card) = self.cards.pop() {
                drawn.push(card);
            }
        }
        self.remaining = self.cards.len();
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(cards: &[Card]) -> Vec<String> {
        cards.iter().map(|card| card.code().to_string()).collect()
    }

    #[test]
    fn unshuffled_deck_has_canonical_order() {
        let cards = generate_cards::<&str>(false, &[], &mut RngState::from_seed(1));
        assert_eq!(cards.len(), STANDARD_DECK_SIZE);
        assert_eq!(cards[0].code().as_str(), "AS");
        assert_eq!(cards[1].code().as_str(), "2S");
        assert_eq!(cards[12].code().as_str(), "KS");
        assert_eq!(cards[13].code().as_str(), "AD");
        assert_eq!(cards[26].code().as_str(), "AC");
        assert_eq!(cards[39].code().as_str(), "AH");
        assert_eq!(cards[51].code().as_str(), "KH");
    }

    #[test]
    fn shuffled_deck_is_a_permutation() {
        let shuffled = generate_cards::<&str>(true, &[], &mut RngState::from_seed(7));
        let canonical = standard52();
        assert_eq!(shuffled.len(), STANDARD_DECK_SIZE);
        assert_ne!(shuffled, canonical);
        let mut sorted = codes(&shuffled);
        let mut expected = codes(&canonical);
        sorted.sort();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn same_seed_gives_same_shuffle() {
        let a = generate_cards::<&str>(true, &[], &mut RngState::from_seed(99));
        let b = generate_cards::<&str>(true, &[], &mut RngState::from_seed(99));
        assert_eq!(a, b);
    }

    #[test]
    fn requested_codes_keep_request_order_even_when_shuffled() {
        for shuffle in [false, true] {
            let cards = generate_cards(shuffle, &["AH", "2D"], &mut RngState::from_seed(3));
            assert_eq!(codes(&cards), vec!["AH", "2D"], "shuffle={shuffle}");
        }
    }

    #[test]
    fn unknown_codes_are_skipped() {
        let cards = generate_cards(false, &["ZZ", "KC", "random value"], &mut RngState::from_seed(3));
        assert_eq!(codes(&cards), vec!["KC"]);
    }

    #[test]
    fn repeated_codes_yield_one_card() {
        let cards = generate_cards(false, &["AH", "QS", "AH"], &mut RngState::from_seed(3));
        assert_eq!(codes(&cards), vec!["AH", "QS"]);
    }

    #[test]
    fn new_deck_counts_its_cards() {
        let deck = Deck::new(false, &["AS", "1H", "JC"], &mut RngState::from_seed(5));
        assert!(!deck.shuffled);
        assert_eq!(deck.remaining, 3);
        assert_eq!(deck.cards.len(), 3);
    }

    #[test]
    fn draw_takes_from_the_end() {
        let mut deck = Deck::new::<&str>(false, &[], &mut RngState::from_seed(5));
        let drawn = deck.draw(3).expect("draw");
        assert_eq!(codes(&drawn), vec!["KH", "QH", "JH"]);
        assert_eq!(deck.remaining, 49);
        assert_eq!(deck.cards.len(), 49);
        assert_eq!(deck.cards.last().map(|card| card.code().to_string()), Some("1H".to_string()));
    }

    #[test]
    fn draw_zero_is_a_no_op() {
        let mut deck = Deck::new(false, &["AS", "2S"], &mut RngState::from_seed(5));
        let drawn = deck.draw(0).expect("draw");
        assert!(drawn.is_empty());
        assert_eq!(deck.remaining, 2);
    }

    #[test]
    fn overdraw_leaves_deck_untouched() {
        let mut deck = Deck::new(false, &["AS", "2S"], &mut RngState::from_seed(5));
        let before = deck.clone();
        let err = deck.draw(3).expect_err("overdraw");
        assert_eq!(
            err,
            ValidationError::NotEnoughCards {
                requested: 3,
                remaining: 2
            }
        );
        assert_eq!(deck, before);
    }

    #[test]
    fn summary_omits_cards_in_json() {
        let deck = Deck::new(true, &["AS"], &mut RngState::from_seed(5)).into_summary();
        let json = serde_json::to_value(&deck).expect("serialize");
        assert_eq!(json["remaining"], 1);
        assert_eq!(json["shuffled"], true);
        assert!(json.get("cards").is_none());
        assert!(json["deck_id"].is_string());
    }
}
