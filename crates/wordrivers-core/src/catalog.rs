use serde::{Deserialize, Serialize};

/// Metadata for one embedded game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Stable key, unique within a catalog. Used in page URLs.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Path or URL of the card/preview image.
    pub image_ref: String,
    /// Same-origin path or external URL of the hosted game.
    pub embed_url: String,
}

impl GameRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        image_ref: impl Into<String>,
        embed_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            image_ref: image_ref.into(),
            embed_url: embed_url.into(),
        }
    }
}

/// Ordered, immutable collection of games. Insertion order is the default
/// display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    games: Vec<GameRecord>,
}

/// Returned when a catalog would contain the same id twice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate game id in catalog: {0}")]
pub struct DuplicateGameId(pub String);

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(games: Vec<GameRecord>) -> Result<Self, DuplicateGameId> {
        for (i, game) in games.iter().enumerate() {
            if games[..i].iter().any(|g| g.id == game.id) {
                return Err(DuplicateGameId(game.id.clone()));
            }
        }
        Ok(Self { games })
    }

    /// The games shipped with the site.
    pub fn builtin() -> Self {
        let games = BUILTIN_GAMES
            .iter()
            .map(|&(id, title, description, image_ref, embed_url)| {
                GameRecord::new(id, title, description, image_ref, embed_url)
            })
            .collect();
        Self { games }
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn get(&self, id: &str) -> Option<&GameRecord> {
        self.games.iter().find(|g| g.id == id)
    }

    /// Position of a game in display order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.games.iter().position(|g| g.id == id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameRecord> {
        self.games.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a GameRecord;
    type IntoIter = std::slice::Iter<'a, GameRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.games.iter()
    }
}

/// (id, title, description, image, embed)
const BUILTIN_GAMES: &[(&str, &str, &str, &str, &str)] = &[
    (
        "word-rivers",
        "Word Rivers",
        "Swim through rivers of letters to form words and relax your mind.",
        "/og-word-rivers.svg",
        "/b/1.html",
    ),
    (
        "pin-master",
        "Pin Master: Screw Puzzle Quest",
        "Challenge your brain with intricate screw puzzle mechanics.",
        "/pin-master.svg",
        "/b/2.html",
    ),
    (
        "quiz-master",
        "Quiz Master",
        "Test your knowledge with challenging quiz questions.",
        "/quiz-master.svg",
        "/b/3.html",
    ),
    (
        "block-blast-2048",
        "Block Blast 2048",
        "Combine blocks and reach the ultimate 2048 goal.",
        "/block-blast-2048.jpg",
        "/b/4.html",
    ),
    (
        "live-star-doll",
        "Live Star Doll Dress Up",
        "Create stunning outfits and style your virtual doll.",
        "/live-star-doll.jpg",
        "/b/5.html",
    ),
    (
        "logic-blast-explorer",
        "Logic Blast Explorer",
        "Explore challenging logic puzzles and brain teasers.",
        "/logic-blast-explorer.svg",
        "/b/6.html",
    ),
    (
        "toca-avatar-hospital",
        "Toca Avatar My Hospital",
        "Manage your own hospital and take care of patients.",
        "/toca-avatar-hospital.svg",
        "/b/7.html",
    ),
    (
        "guess-the-italian-brainrot-animals",
        "Guess The Italian Brainrot Animals",
        "Get ready for a wild and hilarious ride with Guess the Italian Brainrot Animals",
        "/guess-the-italian-brainrot-animals.jpg",
        "/b/8.html",
    ),
];
