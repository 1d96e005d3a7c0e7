use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;

use super::EventSource;
use crate::fetch::{BlockingHtmlFetch, HtmlFetch};
use crate::models::{CardStub, EventRecord};
use crate::storage;

/// Drives one async source across its pages: fetch the listing, derive card
/// stubs, fan detail work out under the source's admission limit, join in
/// issue order, advance. Terminates on a missing next URL, an unreachable
/// listing, an explicit "no results" marker, or an empty card set.
///
/// Every produced record is persisted (and its media downloaded) by the task
/// that produced it, before the join; a failed stub yields nothing and never
/// disturbs its siblings.
pub async fn crawl_source<F>(
    source: Arc<dyn EventSource>,
    fetch: Arc<F>,
    out_root: PathBuf,
) -> Vec<EventRecord>
where
    F: HtmlFetch + 'static,
{
    let permits = Arc::new(Semaphore::new(source.admission_limit()));
    let mut records = Vec::new();
    let mut page = 1u32;

    loop {
        let Some(url) = source.listing_url(page) else {
            break;
        };
        let Some(listing) = fetch.get_html(&url).await else {
            break;
        };
        if source.listing_exhausted(&listing) {
            break;
        }
        let stubs = source.list_cards(&listing);
        if stubs.is_empty() {
            break;
        }
        tracing::info!("{}: page {page} lists {} events", source.id(), stubs.len());

        let mut handles = Vec::with_capacity(stubs.len());
        for stub in stubs {
            let source = Arc::clone(&source);
            let fetch = Arc::clone(&fetch);
            let permits = Arc::clone(&permits);
            let out_root = out_root.clone();
            handles.push(tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.ok()?;
                process_stub(source.as_ref(), fetch.as_ref(), &stub, &out_root).await
            }));
        }
        for handle in handles {
            match handle.await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(err) => tracing::error!("detail task failed: {err}"),
            }
        }
        page += 1;
    }

    records
}

async fn process_stub<F>(
    source: &dyn EventSource,
    fetch: &F,
    stub: &CardStub,
    out_root: &Path,
) -> Option<EventRecord>
where
    F: HtmlFetch + ?Sized,
{
    let html = fetch.get_html(&stub.detail_url).await?;
    let record = source.extract_detail(&html, stub)?;
    if storage::save_event(out_root, source.id(), &record) {
        let dir = storage::event_dir(out_root, source.id(), &record.title);
        if let Some(url) = &record.image {
            if let Some(bytes) = fetch.get_bytes(url).await {
                storage::write_image(&dir, "main_image.jpg", &bytes);
            }
        }
        for (index, url) in record.gallery_images.iter().enumerate() {
            if let Some(bytes) = fetch.get_bytes(url).await {
                storage::write_image(&dir, &format!("gallery_image{}.jpg", index + 1), &bytes);
            }
        }
    }
    Some(record)
}

/// Single-listing driver for the worker-pool source: a fixed number of scoped
/// threads drain an indexed job queue and the results are re-assembled in the
/// order the jobs were issued.
pub fn crawl_source_blocking<S, F>(
    source: &S,
    fetch: &F,
    workers: usize,
    out_root: &Path,
) -> Vec<EventRecord>
where
    S: EventSource + ?Sized,
    F: BlockingHtmlFetch + ?Sized,
{
    let Some(url) = source.listing_url(1) else {
        return Vec::new();
    };
    let Some(listing) = fetch.get_html(&url) else {
        return Vec::new();
    };
    if source.listing_exhausted(&listing) {
        return Vec::new();
    }
    let stubs = source.list_cards(&listing);
    if stubs.is_empty() {
        return Vec::new();
    }
    tracing::info!("{}: listing has {} events", source.id(), stubs.len());

    let stub_count = stubs.len();
    let jobs: Mutex<VecDeque<(usize, CardStub)>> =
        Mutex::new(stubs.into_iter().enumerate().collect());
    let slots: Mutex<Vec<Option<EventRecord>>> = Mutex::new(vec![None; stub_count]);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let job = jobs.lock().expect("job queue poisoned").pop_front();
                let Some((index, stub)) = job else {
                    break;
                };
                if let Some(record) = process_stub_blocking(source, fetch, &stub, out_root) {
                    slots.lock().expect("result slots poisoned")[index] = Some(record);
                }
            });
        }
    });

    slots
        .into_inner()
        .expect("result slots poisoned")
        .into_iter()
        .flatten()
        .collect()
}

fn process_stub_blocking<S, F>(
    source: &S,
    fetch: &F,
    stub: &CardStub,
    out_root: &Path,
) -> Option<EventRecord>
where
    S: EventSource + ?Sized,
    F: BlockingHtmlFetch + ?Sized,
{
    let html = fetch.get_html(&stub.detail_url)?;
    let record = source.extract_detail(&html, stub)?;
    if storage::save_event(out_root, source.id(), &record) {
        let dir = storage::event_dir(out_root, source.id(), &record.title);
        if let Some(url) = &record.image {
            if let Some(bytes) = fetch.get_bytes(url) {
                storage::write_image(&dir, "main_image.jpg", &bytes);
            }
        }
        for (index, url) in record.gallery_images.iter().enumerate() {
            if let Some(bytes) = fetch.get_bytes(url) {
                storage::write_image(&dir, &format!("gallery_image{}.jpg", index + 1), &bytes);
            }
        }
    }
    Some(record)
}
