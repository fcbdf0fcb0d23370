use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::catalog::{Catalog, GameRecord};

pub const SITE_NAME: &str = "Word Rivers";

/// Query appended to embed URLs so the game host can attribute traffic.
pub const DEFAULT_UTM_SOURCE: &str = "wordrivers.com";

/// How many other games a game page links to.
pub const RELATED_GAMES: usize = 3;

/// SEO metadata for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub social: Option<SocialCard>,
}

/// Open Graph / Twitter card fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialCard {
    pub title: String,
    pub description: String,
    pub image: String,
}

/// Everything a game page needs besides layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GamePage {
    pub game: GameRecord,
    pub metadata: PageMetadata,
    pub embed_src: String,
    pub related: Vec<GameRecord>,
}

impl GamePage {
    /// Build the page for `game_id`, or `None` if the catalog lacks it.
    pub fn build(catalog: &Catalog, game_id: &str, utm_source: &str) -> Option<Self> {
        let game = catalog.get(game_id)?;
        Some(Self {
            metadata: game_metadata(game),
            embed_src: embed_src(&game.embed_url, utm_source),
            related: related_games(catalog, game_id),
            game: game.clone(),
        })
    }
}

pub fn game_metadata(game: &GameRecord) -> PageMetadata {
    let title = &game.title;
    let lower = title.to_lowercase();
    PageMetadata {
        title: format!("{title} - Play Free Online | {SITE_NAME}"),
        description: format!(
            "{} Play {title} for free online. Enjoy this amazing {lower} game with no \
             downloads required. Start playing {title} now!",
            game.description
        ),
        keywords: vec![
            title.clone(),
            lower.clone(),
            "free online games".to_string(),
            "browser games".to_string(),
            format!("{title} game"),
            format!("play {title}"),
            format!("{title} online"),
            "word games".to_string(),
            "puzzle games".to_string(),
            "brain games".to_string(),
        ],
        social: Some(SocialCard {
            title: format!("{title} - Play Free Online"),
            description: game.description.clone(),
            image: game.image_ref.clone(),
        }),
    }
}

/// Metadata served for an unknown game id.
pub fn not_found_metadata() -> PageMetadata {
    PageMetadata {
        title: format!("Game Not Found | {SITE_NAME}"),
        description: "The requested game could not be found.".to_string(),
        keywords: Vec::new(),
        social: None,
    }
}

/// The first few catalog games other than `game_id`, in catalog order.
pub fn related_games(catalog: &Catalog, game_id: &str) -> Vec<GameRecord> {
    catalog
        .iter()
        .filter(|g| g.id != game_id)
        .take(RELATED_GAMES)
        .cloned()
        .collect()
}

/// Query-value characters left as-is: RFC 3986 unreserved.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Iframe `src` for an embed URL, tagged with the UTM source. The tag goes
/// into the query, ahead of any `#fragment`.
pub fn embed_src(embed_url: &str, utm_source: &str) -> String {
    if utm_source.is_empty() {
        return embed_url.to_string();
    }
    let (base, fragment) = match embed_url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (embed_url, None),
    };
    let sep = if base.contains('?') { '&' } else { '?' };
    let value = utf8_percent_encode(utm_source, QUERY_VALUE);
    match fragment {
        Some(fragment) => format!("{base}{sep}utm_source={value}#{fragment}"),
        None => format!("{base}{sep}utm_source={value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_for_known_game() {
        let catalog = Catalog::builtin();
        let page = GamePage::build(&catalog, "quiz-master", DEFAULT_UTM_SOURCE).unwrap();
        assert_eq!(page.metadata.title, "Quiz Master - Play Free Online | Word Rivers");
        assert!(page.metadata.description.starts_with("Test your knowledge"));
        assert!(page.metadata.keywords.contains(&"quiz master".to_string()));
        assert_eq!(page.embed_src, "/b/3.html?utm_source=wordrivers.com");
        let social = page.metadata.social.unwrap();
        assert_eq!(social.image, "/quiz-master.svg");
    }

    #[test]
    fn page_for_unknown_game() {
        let catalog = Catalog::builtin();
        assert!(GamePage::build(&catalog, "nope", DEFAULT_UTM_SOURCE).is_none());
        assert_eq!(not_found_metadata().title, "Game Not Found | Word Rivers");
    }

    #[test]
    fn related_skips_current_game() {
        let catalog = Catalog::builtin();
        let ids: Vec<String> = related_games(&catalog, "pin-master")
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec!["word-rivers", "quiz-master", "block-blast-2048"]);
        let first: Vec<String> = related_games(&catalog, "word-rivers")
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(first, vec!["pin-master", "quiz-master", "block-blast-2048"]);
    }

    #[test]
    fn embed_src_keeps_existing_query() {
        assert_eq!(
            embed_src("https://html5.gamedistribution.com/abc/?gd_sdk_referrer_url=x", "site"),
            "https://html5.gamedistribution.com/abc/?gd_sdk_referrer_url=x&utm_source=site"
        );
        assert_eq!(embed_src("/b/1.html", ""), "/b/1.html");
    }

    #[test]
    fn embed_src_encodes_and_respects_fragment() {
        assert_eq!(
            embed_src("/b/1.html#play", "word rivers&co"),
            "/b/1.html?utm_source=word%20rivers%26co#play"
        );
        assert_eq!(
            embed_src("/b/1.html?a=1#x", "wordrivers.com"),
            "/b/1.html?a=1&utm_source=wordrivers.com#x"
        );
    }
}
