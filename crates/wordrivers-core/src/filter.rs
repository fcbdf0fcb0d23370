use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::catalog::{Catalog, GameRecord};
use crate::category::{ALL_CATEGORY, CategoryMap};
use crate::rating::RatingTable;

/// Which comparator orders the game list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Category,
    Rating,
}

impl SortKey {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "category" => Some(Self::Category),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Category => write!(f, "category"),
            Self::Rating => write!(f, "rating"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// User-controlled list parameters. Lives as long as the list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search_term: String,
    pub category_id: String,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            category_id: ALL_CATEGORY.to_string(),
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
        }
    }
}

impl FilterState {
    /// Sort-button behaviour: the active key flips direction, a new key
    /// starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Ascending;
        }
    }

    /// "Show all games": clears search and category, keeps the sort.
    pub fn reset(&mut self) {
        self.search_term.clear();
        self.category_id = ALL_CATEGORY.to_string();
    }

    fn matches_search(&self, game: &GameRecord) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        game.title.to_lowercase().contains(&needle)
            || game.description.to_lowercase().contains(&needle)
    }
}

/// String comparison approximating a browser's default collation.
///
/// Base letters first (diacritics stripped, case folded), then accents,
/// then lowercase before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
        s.nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
    }
    fn accented(s: &str) -> impl Iterator<Item = char> + '_ {
        s.nfd().flat_map(char::to_lowercase)
    }

    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented(a).cmp(accented(b)))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
}

/// Catalog view controller: the static data needed to filter and sort.
#[derive(Debug, Clone, Copy)]
pub struct CatalogView<'a> {
    pub catalog: &'a Catalog,
    pub categories: &'a CategoryMap,
    pub ratings: &'a RatingTable,
}

impl<'a> CatalogView<'a> {
    pub fn new(catalog: &'a Catalog, categories: &'a CategoryMap, ratings: &'a RatingTable) -> Self {
        Self {
            catalog,
            categories,
            ratings,
        }
    }

    /// Filter then stable-sort the catalog. The catalog itself is untouched.
    pub fn apply(&self, state: &FilterState) -> Vec<GameRecord> {
        let mut games: Vec<&GameRecord> = self
            .catalog
            .iter()
            .filter(|g| state.matches_search(g))
            .filter(|g| self.categories.admits(&state.category_id, &g.id))
            .collect();

        // slice::sort_by is stable, equal keys keep catalog order
        games.sort_by(|a, b| state.sort_direction.apply(self.compare(state.sort_key, a, b)));

        games.into_iter().cloned().collect()
    }

    /// Base (ascending) comparator for `key`.
    pub fn compare(&self, key: SortKey, a: &GameRecord, b: &GameRecord) -> Ordering {
        match key {
            SortKey::Name => locale_compare(&a.title, &b.title),
            SortKey::Category => locale_compare(
                self.categories.sort_label(&a.id),
                self.categories.sort_label(&b.id),
            ),
            SortKey::Rating => self.ratings.compare(&a.id, &b.id),
        }
    }

    /// Result line shown above the list.
    pub fn summarize(&self, state: &FilterState, shown: usize) -> ViewSummary {
        let category_name = if state.category_id == ALL_CATEGORY {
            None
        } else {
            self.categories
                .display_name(&state.category_id)
                .map(str::to_string)
        };
        ViewSummary {
            shown,
            total: self.catalog.len(),
            search_term: (!state.search_term.is_empty()).then(|| state.search_term.clone()),
            category_name,
        }
    }
}

/// "Showing N of M games ..." line for a filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSummary {
    pub shown: usize,
    pub total: usize,
    pub search_term: Option<String>,
    pub category_name: Option<String>,
}

impl fmt::Display for ViewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} of {} games", self.shown, self.total)?;
        if let Some(ref term) = self.search_term {
            write!(f, " for \"{term}\"")?;
        }
        if let Some(ref name) = self.category_name {
            write!(f, " in {name}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> (Catalog, CategoryMap, RatingTable) {
        (
            Catalog::builtin(),
            CategoryMap::builtin(),
            RatingTable::builtin(),
        )
    }

    fn ids(games: &[GameRecord]) -> Vec<&str> {
        games.iter().map(|g| g.id.as_str()).collect()
    }

    fn state(search: &str, category: &str, key: SortKey, dir: SortDirection) -> FilterState {
        FilterState {
            search_term: search.to_string(),
            category_id: category.to_string(),
            sort_key: key,
            sort_direction: dir,
        }
    }

    #[test]
    fn default_state() {
        let s = FilterState::default();
        assert_eq!(s.search_term, "");
        assert_eq!(s.category_id, "all");
        assert_eq!(s.sort_key, SortKey::Name);
        assert_eq!(s.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn search_is_case_insensitive() {
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let result = view.apply(&state("WORD", "all", SortKey::Name, SortDirection::Ascending));
        assert!(ids(&result).contains(&"word-rivers"));
    }

    #[test]
    fn search_matches_description() {
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let result = view.apply(&state("patients", "all", SortKey::Name, SortDirection::Ascending));
        assert_eq!(ids(&result), vec!["toca-avatar-hospital"]);
    }

    #[test]
    fn search_with_no_match_is_empty() {
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let result = view.apply(&state("zzzz", "all", SortKey::Name, SortDirection::Ascending));
        assert!(result.is_empty());
    }

    #[test]
    fn all_category_keeps_catalog_order_when_keys_tie() {
        // every game has the same category label, so the sort is a no-op
        let catalog = Catalog::builtin();
        let cats = CategoryMap::default();
        let ratings = RatingTable::default();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let result = view.apply(&state("", "all", SortKey::Category, SortDirection::Ascending));
        assert_eq!(result, catalog.games());
    }

    #[test]
    fn all_category_includes_orphans() {
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let result = view.apply(&FilterState::default());
        assert_eq!(result.len(), catalog.len());
        assert!(ids(&result).contains(&"guess-the-italian-brainrot-animals"));
    }

    #[test]
    fn unknown_category_is_empty() {
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let result = view.apply(&state("", "arcade", SortKey::Name, SortDirection::Ascending));
        assert!(result.is_empty());
    }

    #[test]
    fn category_filter_excludes_orphans() {
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let result = view.apply(&state("", "casual", SortKey::Name, SortDirection::Ascending));
        assert_eq!(ids(&result), vec!["live-star-doll", "toca-avatar-hospital"]);
    }

    #[test]
    fn name_sort_ascending() {
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let result = view.apply(&FilterState::default());
        assert_eq!(
            ids(&result),
            vec![
                "block-blast-2048",
                "guess-the-italian-brainrot-animals",
                "live-star-doll",
                "logic-blast-explorer",
                "pin-master",
                "quiz-master",
                "toca-avatar-hospital",
                "word-rivers",
            ]
        );
    }

    #[test]
    fn rating_ascending_is_highest_first() {
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let result = view.apply(&state("", "all", SortKey::Rating, SortDirection::Ascending));
        let order = ids(&result);
        let rivers = order.iter().position(|&id| id == "word-rivers").unwrap();
        let toca = order.iter().position(|&id| id == "toca-avatar-hospital").unwrap();
        assert!(rivers < toca);
        assert_eq!(order[0], "word-rivers");
        assert_eq!(order[order.len() - 1], "toca-avatar-hospital");
    }

    #[test]
    fn rating_ties_keep_catalog_order() {
        // live-star-doll (4.0) and the unrated brainrot game (default 4.0)
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        for dir in [SortDirection::Ascending, SortDirection::Descending] {
            let result = view.apply(&state("", "all", SortKey::Rating, dir));
            let order = ids(&result);
            let doll = order.iter().position(|&id| id == "live-star-doll").unwrap();
            let brainrot = order
                .iter()
                .position(|&id| id == "guess-the-italian-brainrot-animals")
                .unwrap();
            assert_eq!(brainrot, doll + 1, "direction {dir:?}");
        }
    }

    #[test]
    fn category_sort_groups_by_first_category() {
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let result = view.apply(&state("", "all", SortKey::Category, SortDirection::Ascending));
        // Brain Training < Casual Games < Other < Puzzle Games < Word Games
        assert_eq!(
            ids(&result),
            vec![
                "quiz-master",
                "live-star-doll",
                "toca-avatar-hospital",
                "guess-the-italian-brainrot-animals",
                "pin-master",
                "block-blast-2048",
                "logic-blast-explorer",
                "word-rivers",
            ]
        );
    }

    #[test]
    fn descending_reverses_name_sort() {
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let asc = view.apply(&state("", "all", SortKey::Name, SortDirection::Ascending));
        let mut desc = view.apply(&state("", "all", SortKey::Name, SortDirection::Descending));
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn catalog_not_mutated() {
        let (catalog, cats, ratings) = builtin();
        let before = catalog.clone();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let _ = view.apply(&state("a", "puzzle", SortKey::Rating, SortDirection::Descending));
        assert_eq!(catalog, before);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let s = state("master", "all", SortKey::Rating, SortDirection::Descending);
        let once = view.apply(&s);
        let refiltered = Catalog::new(once.clone()).unwrap();
        let again = CatalogView::new(&refiltered, &cats, &ratings).apply(&s);
        assert_eq!(once, again);
        assert_eq!(view.apply(&s), once);
    }

    #[test]
    fn toggle_sort_flips_then_switches() {
        let mut s = FilterState::default();
        s.toggle_sort(SortKey::Name);
        assert_eq!(s.sort_direction, SortDirection::Descending);
        s.toggle_sort(SortKey::Name);
        assert_eq!(s.sort_direction, SortDirection::Ascending);
        s.toggle_sort(SortKey::Name);
        s.toggle_sort(SortKey::Rating);
        assert_eq!(s.sort_key, SortKey::Rating);
        assert_eq!(s.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn reset_keeps_sort() {
        let mut s = state("quiz", "brain", SortKey::Rating, SortDirection::Descending);
        s.reset();
        assert_eq!(s.search_term, "");
        assert_eq!(s.category_id, "all");
        assert_eq!(s.sort_key, SortKey::Rating);
        assert_eq!(s.sort_direction, SortDirection::Descending);
    }

    #[test]
    fn summary_line() {
        let (catalog, cats, ratings) = builtin();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let s = state("master", "brain", SortKey::Name, SortDirection::Ascending);
        let shown = view.apply(&s).len();
        let summary = view.summarize(&s, shown);
        assert_eq!(
            summary.to_string(),
            "Showing 2 of 8 games for \"master\" in Brain Training"
        );
        let plain = view.summarize(&FilterState::default(), 8);
        assert_eq!(plain.to_string(), "Showing 8 of 8 games");
    }

    #[test]
    fn locale_compare_ignores_case_first() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Zebra", "apple"), Ordering::Greater);
        assert_eq!(locale_compare("word", "Word"), Ordering::Less);
        assert_eq!(locale_compare("Word", "Word"), Ordering::Equal);
        assert_eq!(locale_compare("Éclair Dash", "Fruit Pop"), Ordering::Less);
        assert_eq!(locale_compare("Éclair", "Eclair"), Ordering::Greater);
        assert_eq!(locale_compare("éclair", "Eclat"), Ordering::Less);
    }

    #[test]
    fn accented_titles_sort_with_their_base_letter() {
        let catalog = Catalog::new(vec![
            GameRecord::new("z", "Zebra Run", "", "", ""),
            GameRecord::new("e", "Éclair Dash", "", "", ""),
            GameRecord::new("f", "Fruit Pop", "", "", ""),
        ])
        .unwrap();
        let cats = CategoryMap::default();
        let ratings = RatingTable::default();
        let view = CatalogView::new(&catalog, &cats, &ratings);
        let result = view.apply(&FilterState::default());
        assert_eq!(ids(&result), vec!["e", "f", "z"]);
    }

    #[test]
    fn sort_params_parse() {
        assert_eq!(SortKey::from_str_opt("rating"), Some(SortKey::Rating));
        assert_eq!(SortKey::from_str_opt("popularity"), None);
        assert_eq!(SortDirection::from_str_opt("desc"), Some(SortDirection::Descending));
        assert_eq!(SortDirection::from_str_opt("ascending"), Some(SortDirection::Ascending));
        let s: SortDirection = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(s, SortDirection::Ascending);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn catalog_from_titles(titles: &[String]) -> Catalog {
            let games = titles
                .iter()
                .enumerate()
                .map(|(i, t)| GameRecord::new(format!("g{i}"), t.clone(), "", "", ""))
                .collect();
            Catalog::new(games).unwrap()
        }

        proptest! {
            #[test]
            fn direction_toggle_reverses_distinct_titles(
                titles in proptest::collection::hash_set("[a-z]{1,8}", 1..12)
            ) {
                let titles: Vec<String> = titles.into_iter().collect();
                let catalog = catalog_from_titles(&titles);
                let cats = CategoryMap::default();
                let ratings = RatingTable::default();
                let view = CatalogView::new(&catalog, &cats, &ratings);

                let asc = view.apply(&state("", "all", SortKey::Name, SortDirection::Ascending));
                let mut desc = view.apply(&state("", "all", SortKey::Name, SortDirection::Descending));
                desc.reverse();
                prop_assert_eq!(asc, desc);
            }

            #[test]
            fn equal_titles_keep_catalog_order(
                titles in proptest::collection::vec("[ab]{1,2}", 1..16),
                descending in any::<bool>()
            ) {
                let catalog = catalog_from_titles(&titles);
                let cats = CategoryMap::default();
                let ratings = RatingTable::default();
                let view = CatalogView::new(&catalog, &cats, &ratings);
                let dir = if descending { SortDirection::Descending } else { SortDirection::Ascending };
                let result = view.apply(&state("", "all", SortKey::Name, dir));

                for pair in result.windows(2) {
                    if pair[0].title == pair[1].title {
                        let a = catalog.position(&pair[0].id).unwrap();
                        let b = catalog.position(&pair[1].id).unwrap();
                        prop_assert!(a < b, "{} should precede {}", pair[0].id, pair[1].id);
                    }
                }
            }

            #[test]
            fn result_is_subset_matching_search(
                search in "[a-zA-Z]{0,3}",
                category in prop_oneof![
                    Just("all"), Just("word"), Just("puzzle"),
                    Just("brain"), Just("casual"), Just("arcade")
                ]
            ) {
                let (catalog, cats, ratings) = builtin();
                let view = CatalogView::new(&catalog, &cats, &ratings);
                let s = state(&search, category, SortKey::Name, SortDirection::Ascending);
                let result = view.apply(&s);
                let needle = search.to_lowercase();
                for game in &result {
                    prop_assert!(catalog.get(&game.id).is_some());
                    prop_assert!(
                        game.title.to_lowercase().contains(&needle)
                            || game.description.to_lowercase().contains(&needle)
                    );
                    prop_assert!(cats.admits(category, &game.id));
                }
                prop_assert_eq!(view.apply(&s), result);
            }
        }
    }
}
