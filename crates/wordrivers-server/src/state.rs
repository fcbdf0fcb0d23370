use std::sync::Arc;

use wordrivers_core::analytics::{Analytics, ReportingChannel};
use wordrivers_core::catalog::Catalog;
use wordrivers_core::category::CategoryMap;
use wordrivers_core::filter::CatalogView;
use wordrivers_core::rating::RatingTable;

use crate::config::ServerConfig;
use crate::rate_limit::SubmitLimiter;

/// Server-side analytics sink. No external channel is attached by default.
pub type ServerAnalytics = Analytics<Box<dyn ReportingChannel + Send + Sync>>;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub categories: Arc<CategoryMap>,
    pub ratings: Arc<RatingTable>,
    pub analytics: Arc<ServerAnalytics>,
    pub limiter: Arc<SubmitLimiter>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_catalog(config, Catalog::builtin())
    }

    pub fn with_catalog(config: ServerConfig, catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            categories: Arc::new(CategoryMap::builtin()),
            ratings: Arc::new(RatingTable::builtin()),
            analytics: Arc::new(Analytics::with_capacity(
                config.limits.max_analytics_records,
            )),
            limiter: Arc::new(SubmitLimiter::new(
                config.limits.submit_rate_limit_burst,
                config.limits.submit_rate_limit_per_sec,
            )),
            config: Arc::new(config),
        }
    }

    pub fn view(&self) -> CatalogView<'_> {
        CatalogView::new(&self.catalog, &self.categories, &self.ratings)
    }
}
