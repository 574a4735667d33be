use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

use crate::api::{ApiClient, Collection};
use crate::cache::DerivedCache;
use crate::error::FetchError;
use crate::kpi::{KpiSettings, KpiTile, OrderKpis, ProductionKpis, StockKpis, TeamKpis};
use crate::record::{OrderRecord, ProductionRecord, StockRecord, TeamRecord};

/// One dashboard area. A failed fetch only ever affects its own section.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Section<T> {
    Ready(T),
    Unavailable { message: String },
    Skipped,
}

impl<T> Section<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Section::Skipped)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SectionFilter {
    #[default]
    All,
    Production,
    Orders,
    Stock,
    Teams,
}

impl SectionFilter {
    pub fn includes(
        self,
        collection: Collection,
    ) -> bool {
        matches!(
            (self, collection),
            (SectionFilter::All, _)
                | (SectionFilter::Production, Collection::Productions)
                | (SectionFilter::Orders, Collection::Orders)
                | (SectionFilter::Stock, Collection::Stocks)
                | (SectionFilter::Teams, Collection::Teams)
        )
    }
}

/// Fetch outcomes per collection; `None` means the collection was not asked for.
#[derive(Debug, Default)]
pub struct Collections {
    pub productions: Option<Result<Vec<ProductionRecord>, FetchError>>,
    pub orders: Option<Result<Vec<OrderRecord>, FetchError>>,
    pub stocks: Option<Result<Vec<StockRecord>, FetchError>>,
    pub teams: Option<Result<Vec<TeamRecord>, FetchError>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardReport {
    #[serde(skip_serializing_if = "Section::is_skipped")]
    pub production: Section<ProductionKpis>,
    #[serde(skip_serializing_if = "Section::is_skipped")]
    pub orders: Section<OrderKpis>,
    #[serde(skip_serializing_if = "Section::is_skipped")]
    pub stock: Section<StockKpis>,
    #[serde(skip_serializing_if = "Section::is_skipped")]
    pub teams: Section<TeamKpis>,
}

impl DashboardReport {
    /// The top row of the dashboard, limited to sections that loaded.
    pub fn headline_tiles(&self) -> Vec<KpiTile> {
        let mut tiles = Vec::new();
        if let Some(orders) = self.orders.ready() {
            tiles.push(orders.top_client_tile());
        }
        if let Some(production) = self.production.ready() {
            tiles.extend(production.headline_tiles());
        }
        if let Some(orders) = self.orders.ready() {
            tiles.push(orders.total_quantity_tile());
        }
        tiles
    }

    pub fn detail_tiles(&self) -> Vec<KpiTile> {
        let mut tiles = Vec::new();
        if let Some(production) = self.production.ready() {
            tiles.extend(production.detail_tiles());
        }
        if let Some(stock) = self.stock.ready() {
            tiles.push(stock.total_tile());
        }
        tiles
    }

    /// `(section, message)` for every section whose fetch failed.
    pub fn failures(&self) -> Vec<(&'static str, &str)> {
        [
            ("production", unavailable_message(&self.production)),
            ("orders", unavailable_message(&self.orders)),
            ("stock", unavailable_message(&self.stock)),
            ("teams", unavailable_message(&self.teams)),
        ]
        .into_iter()
        .filter_map(|(name, message)| Some((name, message?)))
        .collect()
    }
}

fn unavailable_message<T>(section: &Section<T>) -> Option<&str> {
    match section {
        Section::Unavailable { message } => Some(message.as_str()),
        _ => None,
    }
}

pub struct Dashboard {
    client: ApiClient,
    settings: KpiSettings,
    production_cache: DerivedCache<ProductionKpis>,
    order_cache: DerivedCache<OrderKpis>,
    stock_cache: DerivedCache<StockKpis>,
    team_cache: DerivedCache<TeamKpis>,
}

impl Dashboard {
    pub fn new(
        client: ApiClient,
        settings: KpiSettings,
    ) -> Self {
        Self {
            client,
            settings,
            production_cache: DerivedCache::new(),
            order_cache: DerivedCache::new(),
            stock_cache: DerivedCache::new(),
            team_cache: DerivedCache::new(),
        }
    }

    /// Fetches the selected collections concurrently and derives every
    /// section from whatever arrived.
    pub async fn refresh(
        &mut self,
        filter: SectionFilter,
    ) -> DashboardReport {
        info!(?filter, base_url = self.client.base_url(), "refreshing dashboard");
        let client = &self.client;
        let (productions, orders, stocks, teams) = tokio::join!(
            fetch_if(filter.includes(Collection::Productions), client.fetch_productions()),
            fetch_if(filter.includes(Collection::Orders), client.fetch_orders()),
            fetch_if(filter.includes(Collection::Stocks), client.fetch_stocks()),
            fetch_if(filter.includes(Collection::Teams), client.fetch_teams()),
        );

        self.ingest(Collections {
            productions,
            orders,
            stocks,
            teams,
        })
    }

    pub fn ingest(
        &mut self,
        collections: Collections,
    ) -> DashboardReport {
        let settings = &self.settings;
        DashboardReport {
            production: derive_section(
                "production",
                collections.productions,
                &mut self.production_cache,
                |records| ProductionKpis::compute(records, &settings.status),
            ),
            orders: derive_section(
                "orders",
                collections.orders,
                &mut self.order_cache,
                |records| OrderKpis::compute(records, &settings.status),
            ),
            stock: derive_section(
                "stock",
                collections.stocks,
                &mut self.stock_cache,
                StockKpis::compute,
            ),
            teams: derive_section(
                "teams",
                collections.teams,
                &mut self.team_cache,
                |records| TeamKpis::compute(records, &settings.availability),
            ),
        }
    }

    /// Drops every cached derivation.
    pub fn invalidate(&mut self) {
        self.production_cache.invalidate();
        self.order_cache.invalidate();
        self.stock_cache.invalidate();
        self.team_cache.invalidate();
    }

    pub fn cache_hits(&self) -> u64 {
        self.production_cache.hits()
            + self.order_cache.hits()
            + self.stock_cache.hits()
            + self.team_cache.hits()
    }
}

async fn fetch_if<T>(
    wanted: bool,
    fetch: impl Future<Output = Result<T, FetchError>>,
) -> Option<Result<T, FetchError>> {
    if wanted { Some(fetch.await) } else { None }
}

fn derive_section<R: Serialize, K: Clone>(
    section: &'static str,
    outcome: Option<Result<Vec<R>, FetchError>>,
    cache: &mut DerivedCache<K>,
    compute: impl FnOnce(&[R]) -> K,
) -> Section<K> {
    match outcome {
        None => Section::Skipped,
        Some(Err(error)) => {
            warn!(section, %error, "section unavailable");
            Section::Unavailable {
                message: error.to_string(),
            }
        }
        Some(Ok(records)) => {
            Section::Ready(cache.get_or_compute(&records, || compute(records.as_slice())).clone())
        }
    }
}
