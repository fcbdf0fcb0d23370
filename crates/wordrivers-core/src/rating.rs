use std::cmp::Ordering;

/// Rating assumed for games missing from the table.
pub const DEFAULT_RATING: f64 = 4.0;

/// Fixed id -> score lookup used by the rating sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingTable {
    entries: Vec<(String, f64)>,
}

impl RatingTable {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_RATINGS
                .iter()
                .map(|&(id, rating)| (id.to_string(), rating))
                .collect(),
        }
    }

    /// Rating for `game_id`, or [`DEFAULT_RATING`].
    pub fn rating(&self, game_id: &str) -> f64 {
        self.entries
            .iter()
            .find(|(id, _)| id == game_id)
            .map(|&(_, r)| r)
            .unwrap_or(DEFAULT_RATING)
    }

    /// Base comparator of the rating sort: higher rating orders first.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.rating(b).total_cmp(&self.rating(a))
    }
}

const BUILTIN_RATINGS: &[(&str, f64)] = &[
    ("word-rivers", 4.8),
    ("quiz-master", 4.7),
    ("block-blast-2048", 4.6),
    ("pin-master", 4.5),
    ("word-search", 4.4),
    ("crossword", 4.3),
    ("logic-blast-explorer", 4.2),
    ("anagrams", 4.1),
    ("live-star-doll", 4.0),
    ("toca-avatar-hospital", 3.9),
];
