use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use wordrivers_core::catalog::GameRecord;
use wordrivers_core::category::CategoryCount;
use wordrivers_core::filter::{FilterState, SortDirection, SortKey, ViewSummary};
use wordrivers_core::page::GamePage;

use crate::error::AppError;
use crate::state::AppState;

/// Query string of `GET /api/v1/games`. All fields optional.
#[derive(Debug, Default, Deserialize)]
pub struct ListGamesQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ListGamesQuery {
    /// Turn the query into a filter, starting from the defaults.
    pub fn into_filter(self) -> Result<FilterState, AppError> {
        let mut filter = FilterState::default();
        if let Some(search) = self.search {
            filter.search_term = search;
        }
        if let Some(category) = self.category
            && !category.is_empty()
        {
            filter.category_id = category;
        }
        if let Some(sort) = self.sort {
            filter.sort_key = SortKey::from_str_opt(&sort)
                .ok_or_else(|| AppError::BadRequest(format!("unknown sort key: {sort}")))?;
        }
        if let Some(order) = self.order {
            filter.sort_direction = SortDirection::from_str_opt(&order)
                .ok_or_else(|| AppError::BadRequest(format!("unknown sort order: {order}")))?;
        }
        Ok(filter)
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryBody {
    #[serde(flatten)]
    pub summary: ViewSummary,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ListGamesResponse {
    pub games: Vec<GameRecord>,
    pub filter: FilterState,
    pub summary: SummaryBody,
}

/// GET /api/v1/games: filtered, sorted catalog.
pub async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<ListGamesQuery>,
) -> Result<Json<ListGamesResponse>, AppError> {
    let filter = query.into_filter()?;
    let view = state.view();
    let games = view.apply(&filter);
    let summary = view.summarize(&filter, games.len());
    tracing::debug!(
        search = %filter.search_term,
        category = %filter.category_id,
        sort = %filter.sort_key,
        shown = games.len(),
        "listed games"
    );
    Ok(Json(ListGamesResponse {
        games,
        summary: SummaryBody {
            text: summary.to_string(),
            summary,
        },
        filter,
    }))
}

/// GET /api/v1/games/{game_id}: everything the game page renders.
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GamePage>, AppError> {
    GamePage::build(&state.catalog, &game_id, &state.config.site.utm_source)
        .map(Json)
        .ok_or(AppError::GameNotFound(game_id))
}

/// GET /api/v1/categories: sidebar rows with counts.
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryCount>> {
    Json(state.categories.listing(&state.catalog))
}
