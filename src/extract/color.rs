use url::Url;

use crate::models::Ability;

/// Most frequent energy type across all attack costs.
///
/// Ties go to the type seen first when walking abilities, then costs, in
/// order. Returns `None` when no ability has any cost.
pub fn infer_color(abilities: &[Ability]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for energy in abilities.iter().flat_map(|ability| ability.cost.iter()) {
        match counts.iter_mut().find(|(seen, _)| *seen == energy.as_str()) {
            Some((_, count)) => *count += 1,
            None => counts.push((energy.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (energy, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((energy, count));
        }
    }

    best.map(|(energy, _)| energy.to_string())
}

/// Color encoded in an indicator link's query key, e.g. `?card-grass=on` → `Grass`
pub(crate) fn color_from_indicator(href: &str, base: &str) -> Option<String> {
    let url = Url::parse(base).ok()?.join(href).ok()?;

    url.query_pairs()
        .find_map(|(key, _)| key.strip_prefix("card-").map(capitalize))
        .filter(|color| !color.is_empty())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
