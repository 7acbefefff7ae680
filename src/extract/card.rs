//! Card detail page extraction
//!
//! The detail markup differs between Pokémon, Trainer and Energy cards, and
//! between Pokémon with and without a passive ability or color marker. The
//! extractor classifies the card once and then walks a fixed decision
//! procedure for that category.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::color::color_from_indicator;
use super::{element_text, infer_color, parse_selector, resolve_identity, resolve_url};
use crate::error::ScrapeError;
use crate::models::{
    Ability, Card, CardBody, EnergyEffect, Passive, PokemonDetails, SetRef, SuperType,
};

const IMAGE: &str = ".card-image img";
const NAME: &str = ".card-description h1";
const TYPE_LABEL: &str = ".card-type h2";
const EVOLVES_FROM: &str = ".card-type h4";
const LINK: &str = "a";
const HP: &str = ".card-hp";
const ABILITIES: &str = ".pokemon-abilities";
const PASSIVE_HEADER: &str = ".pokemon-abilities h3";
const HEADER_LABEL: &str = "div";
const ABILITY: &str = ".pokemon-abilities .ability";
const ABILITY_NAME: &str = "h4";
const ABILITY_COST: &str = "ul li";
const ABILITY_DAMAGE: &str = "span.plus";
const ABILITY_TEXT: &str = "p";
const COLOR_INDICATOR: &str = ".card-basic-info .right a";
const STAT: &str = ".pokemon-stats .stat";
const STAT_LABEL: &str = "h4";
const ENERGY_ICON: &str = "li";
const SET_LINK: &str = ".stats-footer h3 a";

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").unwrap_or_else(|_| unreachable!()));

/// Used when a card has neither a color marker nor any attack cost
const FALLBACK_COLOR: &str = "Colorless";

/// Parse a card detail page fetched from `source_url`.
///
/// `id` and `url` come from `source_url` alone, never from the markup.
///
/// # Errors
/// - `MalformedUrl` if `source_url` does not identify a card
/// - `UnknownCardType` if the type label is not Trainer, Energy or Pokémon
/// - `MissingHp` if a Pokémon card has no digits in its HP field
/// - `Extraction` if any other required element is missing
pub fn extract_card(markup: &str, source_url: &str) -> Result<Card, ScrapeError> {
    let identity = resolve_identity(source_url)?;
    let document = Html::parse_document(markup);
    let page = DetailPage {
        document: &document,
        url: source_url,
    };

    let image_src = page
        .first(IMAGE)?
        .and_then(|img| img.value().attr("src"))
        .ok_or_else(|| page.missing("card image"))?;
    let image = resolve_url(source_url, image_src)?;

    let card_type = page.required_text(TYPE_LABEL, "card type")?;
    let name = page.required_text(NAME, "card name")?;
    let super_type =
        SuperType::classify(&card_type).ok_or_else(|| ScrapeError::UnknownCardType {
            url: source_url.to_string(),
            label: card_type.clone(),
        })?;

    let set_link = page.first(SET_LINK)?.ok_or_else(|| page.missing("set link"))?;
    let set = SetRef {
        name: element_text(set_link),
        url: resolve_url(
            source_url,
            set_link
                .value()
                .attr("href")
                .ok_or_else(|| page.missing("set link target"))?,
        )?,
    };

    let body = match super_type {
        SuperType::Trainer => CardBody::Trainer {
            text: page.required_text(ABILITIES, "card text")?,
        },
        SuperType::Energy => CardBody::Energy {
            text: page.required_text(ABILITIES, "card text")?,
        },
        SuperType::Pokemon => CardBody::Pokemon(page.pokemon_details()?),
    };

    Ok(Card {
        id: identity.id,
        url: identity.detail_url,
        name,
        image,
        set,
        card_type,
        body,
    })
}

struct DetailPage<'a> {
    document: &'a Html,
    url: &'a str,
}

impl<'a> DetailPage<'a> {
    fn first(&self, selector: &str) -> Result<Option<ElementRef<'a>>, ScrapeError> {
        Ok(self.document.select(&parse_selector(selector)?).next())
    }

    fn all(&self, selector: &str) -> Result<Vec<ElementRef<'a>>, ScrapeError> {
        Ok(self.document.select(&parse_selector(selector)?).collect())
    }

    fn required_text(&self, selector: &str, what: &str) -> Result<String, ScrapeError> {
        self.first(selector)?
            .map(element_text)
            .ok_or_else(|| self.missing(what))
    }

    fn missing(&self, what: &str) -> ScrapeError {
        ScrapeError::extraction(self.url, format!("missing {what}"))
    }

    fn pokemon_details(&self) -> Result<PokemonDetails, ScrapeError> {
        let evolves_from = self.evolves_from()?;
        let hp = self.hp()?;
        let passive = self.passive()?;
        let (abilities, rules) = self.abilities_and_rules()?;
        let color = self.color(&abilities)?;

        Ok(PokemonDetails {
            evolves_from,
            hp,
            passive,
            abilities,
            rules,
            color,
            weaknesses: self.energy_effects("Weakness")?,
            resistances: self.energy_effects("Resistance")?,
            retreat_cost: self.retreat_cost()?,
        })
    }

    fn evolves_from(&self) -> Result<Option<String>, ScrapeError> {
        let link = parse_selector(LINK)?;

        Ok(self
            .all(EVOLVES_FROM)?
            .into_iter()
            .filter(|marker| element_text(*marker).to_lowercase().contains("evolves from"))
            .find_map(|marker| marker.select(&link).next())
            .map(element_text)
            .filter(|name| !name.is_empty()))
    }

    fn hp(&self) -> Result<u32, ScrapeError> {
        let text = self.first(HP)?.map(element_text).unwrap_or_default();

        first_integer(&text)
            .filter(|hp| *hp > 0)
            .ok_or_else(|| ScrapeError::MissingHp {
                url: self.url.to_string(),
                text,
            })
    }

    /// A passive header only counts when its next element sibling is a
    /// paragraph; the same heading markup is reused for unrelated sections.
    fn passive(&self) -> Result<Option<Passive>, ScrapeError> {
        let label = parse_selector(HEADER_LABEL)?;

        for header in self.all(PASSIVE_HEADER)? {
            let Some(paragraph) = next_element_sibling(header) else {
                continue;
            };
            if paragraph.value().name() != "p" {
                debug!("Skipping heading not followed by a paragraph on {}", self.url);
                continue;
            }

            let name = header
                .select(&label)
                .last()
                .map_or_else(|| element_text(header), element_text);

            return Ok(Some(Passive {
                name,
                text: element_text(paragraph),
            }));
        }

        Ok(None)
    }

    /// Ability blocks without a name are card-wide rules (e.g. the EX rule).
    fn abilities_and_rules(&self) -> Result<(Vec<Ability>, Vec<String>), ScrapeError> {
        let name_selector = parse_selector(ABILITY_NAME)?;
        let cost_selector = parse_selector(ABILITY_COST)?;
        let damage_selector = parse_selector(ABILITY_DAMAGE)?;
        let text_selector = parse_selector(ABILITY_TEXT)?;

        let mut abilities = Vec::new();
        let mut rules = Vec::new();

        for block in self.all(ABILITY)? {
            let Some(name) = block.select(&name_selector).next() else {
                rules.push(element_text(block));
                continue;
            };

            abilities.push(Ability {
                name: element_text(name),
                cost: block
                    .select(&cost_selector)
                    .filter_map(|icon| icon.value().attr("title"))
                    .map(|energy| energy.trim().to_string())
                    .collect(),
                damage: first_text(block, &damage_selector),
                text: first_text(block, &text_selector),
            });
        }

        Ok((abilities, rules))
    }

    fn color(&self, abilities: &[Ability]) -> Result<String, ScrapeError> {
        let indicated = self
            .all(COLOR_INDICATOR)?
            .into_iter()
            .filter_map(|link| link.value().attr("href"))
            .find_map(|href| color_from_indicator(href, self.url));

        if let Some(color) = indicated {
            return Ok(color);
        }

        debug!("No color indicator on {}, inferring from attack costs", self.url);
        Ok(infer_color(abilities).unwrap_or_else(|| {
            warn!(
                "No color indicator or attack cost on {}, using {}",
                self.url, FALLBACK_COLOR
            );
            FALLBACK_COLOR.to_string()
        }))
    }

    fn stat(&self, label: &str) -> Result<Option<ElementRef<'a>>, ScrapeError> {
        let label_selector = parse_selector(STAT_LABEL)?;

        Ok(self.all(STAT)?.into_iter().find(|stat| {
            stat.select(&label_selector)
                .next()
                .is_some_and(|heading| element_text(heading).contains(label))
        }))
    }

    /// One effect per icon in the stat row labelled `label`.
    ///
    /// The modifier (`×2`, `-20`) is read as the text inside the icon's `<li>`.
    /// A modifier rendered next to the icon instead of inside it would come
    /// back as an empty `value`. A missing row yields an empty list.
    fn energy_effects(&self, label: &str) -> Result<Vec<EnergyEffect>, ScrapeError> {
        let Some(stat) = self.stat(label)? else {
            return Ok(Vec::new());
        };

        stat.select(&parse_selector(ENERGY_ICON)?)
            .map(|icon| {
                let energy_type = icon
                    .value()
                    .attr("title")
                    .ok_or_else(|| self.missing(&format!("{label} energy type")))?;

                Ok(EnergyEffect {
                    energy_type: energy_type.trim().to_string(),
                    value: element_text(icon),
                })
            })
            .collect()
    }

    fn retreat_cost(&self) -> Result<u32, ScrapeError> {
        let Some(stat) = self.stat("Retreat Cost")? else {
            return Ok(0);
        };

        let icons = stat.select(&parse_selector(ENERGY_ICON)?).count();
        u32::try_from(icons).map_err(|_| self.missing("sane retreat cost"))
    }
}

fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn first_integer(text: &str) -> Option<u32> {
    INTEGER.find(text)?.as_str().parse().ok()
}
