use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Reserved category key that matches every game.
pub const ALL_CATEGORY: &str = "all";

/// Display name of the reserved "all" entry.
pub const ALL_CATEGORY_NAME: &str = "All Games";

/// Label used when sorting a game that belongs to no category.
pub const UNCATEGORIZED_LABEL: &str = "Other";

/// A named group of game ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
}

impl Category {
    pub fn contains(&self, game_id: &str) -> bool {
        self.members.iter().any(|m| m == game_id)
    }
}

/// Ordered mapping from category key to member game ids.
///
/// Membership is not stored on `GameRecord`; a game's categories are found
/// by reverse lookup. Map order decides which category counts as a game's
/// "first" one when sorting by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMap {
    categories: Vec<Category>,
}

/// One row of the category sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub id: String,
    pub name: String,
    pub count: usize,
}

impl CategoryMap {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The categories shipped with the site. Some member ids refer to games
    /// that are not in the catalog yet; they never match anything.
    pub fn builtin() -> Self {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .map(|&(id, name, members)| Category {
                id: id.to_string(),
                name: name.to_string(),
                members: members.iter().map(|m| m.to_string()).collect(),
            })
            .collect();
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Whether `game_id` passes the filter for `category_id`.
    ///
    /// `"all"` passes everything, an unknown key passes nothing.
    pub fn admits(&self, category_id: &str, game_id: &str) -> bool {
        if category_id == ALL_CATEGORY {
            return true;
        }
        self.get(category_id).is_some_and(|c| c.contains(game_id))
    }

    /// First category (in map order) that contains `game_id`.
    pub fn first_category_of(&self, game_id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.contains(game_id))
    }

    /// Display name used by the category sort.
    pub fn sort_label(&self, game_id: &str) -> &str {
        self.first_category_of(game_id)
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED_LABEL)
    }

    /// Display name for a filter key, including the reserved "all".
    pub fn display_name(&self, category_id: &str) -> Option<&str> {
        if category_id == ALL_CATEGORY {
            return Some(ALL_CATEGORY_NAME);
        }
        self.get(category_id).map(|c| c.name.as_str())
    }

    /// Sidebar listing: "all" first, then each category in map order.
    /// Counts only members that exist in `catalog`.
    pub fn listing(&self, catalog: &Catalog) -> Vec<CategoryCount> {
        let mut rows = Vec::with_capacity(self.categories.len() + 1);
        rows.push(CategoryCount {
            id: ALL_CATEGORY.to_string(),
            name: ALL_CATEGORY_NAME.to_string(),
            count: catalog.len(),
        });
        for category in &self.categories {
            let count = catalog.iter().filter(|g| category.contains(&g.id)).count();
            rows.push(CategoryCount {
                id: category.id.clone(),
                name: category.name.clone(),
                count,
            });
        }
        rows
    }
}

const BUILTIN_CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "word",
        "Word Games",
        &["word-rivers", "word-search", "crossword", "anagrams"],
    ),
    (
        "puzzle",
        "Puzzle Games",
        &["pin-master", "block-blast-2048", "logic-blast-explorer"],
    ),
    (
        "brain",
        "Brain Training",
        &["quiz-master", "logic-blast-explorer", "pin-master"],
    ),
    (
        "casual",
        "Casual Games",
        &["live-star-doll", "toca-avatar-hospital"],
    ),
];
