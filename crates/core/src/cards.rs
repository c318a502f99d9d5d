use crate::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Suit {
    Spades,
    Diamonds,
    Clubs,
    Hearts,
}

impl Suit {
    /// Canonical generation order.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Diamonds, Suit::Clubs, Suit::Hearts];

    pub fn label(self) -> &'static str {
        match self {
            Self::Spades => "SPADES",
            Self::Diamonds => "DIAMONDS",
            Self::Clubs => "CLUBS",
            Self::Hearts => "HEARTS",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Rank {
    #[serde(rename = "ACE")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "JACK")]
    Jack,
    #[serde(rename = "QUEEN")]
    Queen,
    #[serde(rename = "KING")]
    King,
}

impl Rank {
    /// Canonical generation order within a suit.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Ace => "ACE",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "JACK",
            Self::Queen => "QUEEN",
            Self::King => "KING",
        }
    }
}

/// Two ASCII characters: first letter of the rank label, then first letter
/// of the suit label. `Rank::Ten` contributes `1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardCode([u8; 2]);

impl CardCode {
    pub fn of(rank: Rank, suit: Suit) -> Self {
        Self([rank.label().as_bytes()[0], suit.label().as_bytes()[0]])
    }

    pub fn as_str(&self) -> &str {
        // Both constructors only admit ASCII.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl FromStr for CardCode {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.as_bytes() {
            [a, b] if a.is_ascii() && b.is_ascii() => Ok(Self([*a, *b])),
            _ => Err(ValidationError::InvalidCardCode(raw.to_string())),
        }
    }
}

impl fmt::Display for CardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardCode({})", self.as_str())
    }
}

impl PartialEq<str> for CardCode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl Serialize for CardCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CardCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// An immutable playing card. The code is always derived from value and
/// suit; deserialising a card whose code disagrees is rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "RawCard")]
pub struct Card {
    value: Rank,
    suit: Suit,
    code: CardCode,
}

impl Card {
    pub fn new(value: Rank, suit: Suit) -> Self {
        Self {
            value,
            suit,
            code: CardCode::of(value, suit),
        }
    }

    pub fn value(&self) -> Rank {
        self.value
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn code(&self) -> CardCode {
        self.code
    }
}

#[derive(Deserialize)]
struct RawCard {
    value: Rank,
    suit: Suit,
    code: CardCode,
}

impl TryFrom<RawCard> for Card {
    type Error = ValidationError;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        let card = Card::new(raw.value, raw.suit);
        if card.code != raw.code {
            return Err(ValidationError::CardCodeMismatch {
                expected: card.code,
                found: raw.code,
            });
        }
        Ok(card)
    }
}
