use url::Url;

use crate::error::ScrapeError;

/// Stable key and canonical detail URL of one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardIdentity {
    /// `<set>/<number>`, e.g. `bwp/BW01`
    pub id: String,
    /// Detail URL without query string or fragment
    pub detail_url: String,
}

/// Derive the card identity from a URL of the form `.../<series>/<set>/<number>/`.
///
/// The id is the primary key downstream, so a URL that does not end in that
/// shape is an error rather than a guess.
pub fn resolve_identity(url: &str) -> Result<CardIdentity, ScrapeError> {
    let malformed = || ScrapeError::MalformedUrl {
        url: url.to_string(),
    };

    let mut parsed = Url::parse(url).map_err(|_| malformed())?;
    parsed.set_query(None);
    parsed.set_fragment(None);

    let path = parsed.path().strip_suffix('/').ok_or_else(malformed)?;

    let mut segments = path.rsplit('/');
    let number = segments.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
    let set = segments.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
    segments.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;

    Ok(CardIdentity {
        id: format!("{set}/{number}"),
        detail_url: parsed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_set_and_number() {
        let identity = resolve_identity(
            "https://www.pokemon.com/us/pokemon-tcg/pokemon-cards/bw-series/bwp/BW01/",
        )
        .unwrap();

        assert_eq!(identity.id, "bwp/BW01");
        assert_eq!(
            identity.detail_url,
            "https://www.pokemon.com/us/pokemon-tcg/pokemon-cards/bw-series/bwp/BW01/"
        );
    }

    #[test]
    fn strips_query_from_detail_url() {
        let identity = resolve_identity(
            "https://www.pokemon.com/us/pokemon-tcg/pokemon-cards/xy-series/xy1/2/?format=expanded",
        )
        .unwrap();

        assert_eq!(identity.id, "xy1/2");
        assert_eq!(
            identity.detail_url,
            "https://www.pokemon.com/us/pokemon-tcg/pokemon-cards/xy-series/xy1/2/"
        );
    }

    #[test]
    fn rejects_missing_trailing_slash() {
        assert!(matches!(
            resolve_identity("https://www.pokemon.com/us/pokemon-tcg/pokemon-cards/bw-series/bwp/BW01"),
            Err(ScrapeError::MalformedUrl { .. })
        ));
    }

    #[test]
    fn rejects_short_paths() {
        assert!(resolve_identity("https://www.pokemon.com/BW01/").is_err());
        assert!(resolve_identity("https://www.pokemon.com/").is_err());
        assert!(resolve_identity("https://www.pokemon.com/bw-series//BW01/").is_err());
        assert!(resolve_identity("bwp/BW01/").is_err());
    }
}
