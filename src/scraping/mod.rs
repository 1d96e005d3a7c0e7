pub mod afisha;
pub mod base;
pub mod crawl;
pub mod culture;
pub mod dates;
pub mod info_block;
pub mod mts;
pub mod tags;

use std::sync::Arc;

use crate::fetch::{BlockingFetcher, Fetcher};
use crate::models::{CardStub, EventRecord};
use crate::utils;

/// One extraction strategy. Implementations know how to turn a listing page
/// into card stubs and a detail page into a canonical record; everything else
/// (fetching, pagination, fan-out, persistence) is the crawl driver's job.
pub trait EventSource: Send + Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn base_url(&self) -> &'static str;

    /// Listing URL for a 1-based page number. `None` ends pagination;
    /// single-page sources answer only for page 1.
    fn listing_url(&self, page: u32) -> Option<String>;

    /// Explicit "no results" marker on a listing page. Default: none.
    fn listing_exhausted(&self, _html: &str) -> bool {
        false
    }

    /// Concurrent in-flight detail fetches allowed for this source.
    fn admission_limit(&self) -> usize {
        10
    }

    fn list_cards(&self, html: &str) -> Vec<CardStub>;
    fn extract_detail(&self, html: &str, stub: &CardStub) -> Option<EventRecord>;
}

#[derive(Clone, serde::Serialize)]
pub struct SourceInfo {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct SourceReport {
    pub id: String,
    pub count: usize,
}

fn async_sources() -> Vec<Arc<dyn EventSource>> {
    vec![Arc::new(afisha::Afisha), Arc::new(culture::Culture)]
}

pub fn list_sources() -> Vec<SourceInfo> {
    let mut infos: Vec<SourceInfo> = async_sources()
        .into_iter()
        .map(|source| SourceInfo {
            id: source.id().to_string(),
            name: source.name().to_string(),
            url: source.base_url().to_string(),
        })
        .collect();
    let mts = mts::Mts;
    infos.push(SourceInfo {
        id: mts.id().to_string(),
        name: mts.name().to_string(),
        url: mts.base_url().to_string(),
    });
    infos
}

/// Runs every source crawl concurrently: the two cooperative crawls share the
/// async runtime while the worker-pool crawl is bridged in over the blocking
/// pool, so neither model stalls the other. Reports a per-source count.
pub async fn run_all() -> Vec<SourceReport> {
    let out_root = utils::spectacles_root();
    let (afisha, culture, mts) = tokio::join!(
        run_async_source(Arc::new(afisha::Afisha), out_root.clone()),
        run_async_source(Arc::new(culture::Culture), out_root.clone()),
        run_pool_source(out_root.clone()),
    );

    tracing::info!(
        "harvested: afisha={}, culture={}, mts={}",
        afisha.len(),
        culture.len(),
        mts.len()
    );

    vec![
        SourceReport {
            id: "afisha".to_string(),
            count: afisha.len(),
        },
        SourceReport {
            id: "culture".to_string(),
            count: culture.len(),
        },
        SourceReport {
            id: "mts".to_string(),
            count: mts.len(),
        },
    ]
}

/// Runs a single source by id and returns its aggregated records.
pub async fn run_source(id: &str) -> anyhow::Result<Vec<EventRecord>> {
    let out_root = utils::spectacles_root();
    match id {
        "afisha" => Ok(run_async_source(Arc::new(afisha::Afisha), out_root).await),
        "culture" => Ok(run_async_source(Arc::new(culture::Culture), out_root).await),
        "mts" => Ok(run_pool_source(out_root).await),
        other => Err(anyhow::anyhow!("unknown source id: {other}")),
    }
}

async fn run_async_source(
    source: Arc<dyn EventSource>,
    out_root: std::path::PathBuf,
) -> Vec<EventRecord> {
    let fetcher = match Fetcher::new() {
        Ok(fetcher) => Arc::new(fetcher),
        Err(err) => {
            tracing::error!("could not build http client: {err:#}");
            return Vec::new();
        }
    };
    crawl::crawl_source(source, fetcher, out_root).await
}

async fn run_pool_source(out_root: std::path::PathBuf) -> Vec<EventRecord> {
    let joined = tokio::task::spawn_blocking(move || {
        let fetcher = match BlockingFetcher::new() {
            Ok(fetcher) => fetcher,
            Err(err) => {
                tracing::error!("could not build blocking http client: {err:#}");
                return Vec::new();
            }
        };
        crawl::crawl_source_blocking(&mts::Mts, &fetcher, mts::MAX_WORKERS, &out_root)
    })
    .await;

    match joined {
        Ok(records) => records,
        Err(err) => {
            tracing::error!("worker-pool crawl aborted: {err}");
            Vec::new()
        }
    }
}
