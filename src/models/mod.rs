//! Data models for scraped trading-card records

use serde::{Deserialize, Serialize};

/// Energy type labels in markup order. Duplicates are meaningful.
pub type EnergyCost = Vec<String>;

/// A card as seen on a search-result page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardReference {
    pub id: String,
    pub url: String,
    pub image: String,
}

impl CardReference {
    /// Overlay the full detail record onto this reference.
    ///
    /// The detail extractor computes `id`, `url` and `image` itself; the ids must
    /// agree or the resolver produced two different keys for the same card.
    pub fn merge(self, card: Card) -> Result<Card, crate::error::ScrapeError> {
        if self.id != card.id {
            return Err(crate::error::ScrapeError::IdentityMismatch {
                url: self.url,
                reference_id: self.id,
                detail_id: card.id,
            });
        }

        Ok(card)
    }
}

/// One parsed result-listing page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPageResult {
    pub cards: Vec<CardReference>,
    /// `0` means the query matched nothing
    pub total_pages: u32,
}

/// An attack printed on a Pokémon card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub name: String,
    pub cost: EnergyCost,
    /// Empty when the attack does no direct damage
    pub damage: String,
    pub text: String,
}

/// A static power that needs no energy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passive {
    pub name: String,
    pub text: String,
}

/// A weakness or resistance entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyEffect {
    pub energy_type: String,
    /// Free-form modifier such as `×2` or `-20`
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRef {
    pub name: String,
    pub url: String,
}

/// Three-way card category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuperType {
    Pokemon,
    Trainer,
    Energy,
}

impl SuperType {
    /// Classify a raw type label such as `Pokémon - Stage 1` or `Trainer - Item`.
    /// Matched by substring in priority order: Trainer, Energy, Pokémon.
    pub fn classify(label: &str) -> Option<Self> {
        let lower = label.to_lowercase();

        if lower.contains("trainer") {
            Some(Self::Trainer)
        } else if lower.contains("energy") {
            Some(Self::Energy)
        } else if lower.contains("pokémon") || lower.contains("pokemon") {
            Some(Self::Pokemon)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pokemon => "Pokemon",
            Self::Trainer => "Trainer",
            Self::Energy => "Energy",
        }
    }
}

/// Fields only a Pokémon card carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonDetails {
    pub evolves_from: Option<String>,
    pub hp: u32,
    pub passive: Option<Passive>,
    pub abilities: Vec<Ability>,
    pub rules: Vec<String>,
    pub color: String,
    pub weaknesses: Vec<EnergyEffect>,
    pub resistances: Vec<EnergyEffect>,
    pub retreat_cost: u32,
}

/// Category-specific part of a card, tagged by `superType`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "superType")]
pub enum CardBody {
    Pokemon(PokemonDetails),
    Trainer { text: String },
    Energy { text: String },
}

/// A fully extracted card detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub url: String,
    pub name: String,
    pub image: String,
    pub set: SetRef,
    /// Raw category label as printed, e.g. `Pokémon - Basic`
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(flatten)]
    pub body: CardBody,
}

impl Card {
    pub fn super_type(&self) -> SuperType {
        match self.body {
            CardBody::Pokemon(_) => SuperType::Pokemon,
            CardBody::Trainer { .. } => SuperType::Trainer,
            CardBody::Energy { .. } => SuperType::Energy,
        }
    }

    pub fn pokemon(&self) -> Option<&PokemonDetails> {
        match &self.body {
            CardBody::Pokemon(details) => Some(details),
            _ => None,
        }
    }

    /// Body text of a Trainer or Energy card
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            CardBody::Trainer { text } | CardBody::Energy { text } => Some(text),
            CardBody::Pokemon(_) => None,
        }
    }
}

/// Output element of a full scrape: a detailed card or just its reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardRecord {
    Card(Box<Card>),
    Reference(CardReference),
}

impl CardRecord {
    pub fn id(&self) -> &str {
        match self {
            Self::Card(card) => &card.id,
            Self::Reference(reference) => &reference.id,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Card(card) => &card.url,
            Self::Reference(reference) => &reference.url,
        }
    }

    pub fn as_card(&self) -> Option<&Card> {
        match self {
            Self::Card(card) => Some(card),
            Self::Reference(_) => None,
        }
    }
}

/// Search parameters passed through verbatim to the site's query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    params: Vec<(String, String)>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Parse an already-encoded query string such as `cardName=mr.%20mime&format=expanded`.
    ///
    /// Keys and values are percent-decoded, so `to_query_string` reproduces the
    /// input rather than encoding it twice. Pairs without `=` get an empty value.
    pub fn parse(raw: &str) -> Self {
        let params = url::form_urlencoded::parse(raw.trim().trim_start_matches('?').as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Self { params }
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Percent-encoded query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}
