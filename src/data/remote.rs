//! Remote dataset loader with graceful degradation.
//!
//! Each entry point issues one GET for a fixed resource, reshapes the payload
//! into the local schema, and returns it tagged with where it came from. Any
//! transport, status or parse failure is logged and answered with the bundled
//! fallback dataset, so callers always get something to render.
//!
//! Optional extras on top of that contract:
//! - a short-lived cache of live payloads, keyed by resource; while it is
//!   enabled, concurrent callers for the same resource share one request
//! - cooperative cancellation through a `CancelToken`

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, NaiveDate, Utc};
use reqwest::blocking::Client;
use reqwest::header::LAST_MODIFIED;
use tracing::{debug, info, warn};

use crate::config::LoaderConfig;
use crate::data::{fallback, reshape};
use crate::domain::{Company, DataOrigin, LastUpdated, Loaded, MarketTrend, QuarterlyRecord, Resource};
use crate::error::{AppError, FetchError};

/// What the transport hands back for a GET, before any status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub last_modified: Option<String>,
    pub body: String,
}

/// Seam between the loader and the network.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<RawResponse, FetchError>;
}

/// Blocking `reqwest` transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        let last_modified = resp
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp
            .text()
            .map_err(|e| FetchError::Transport(format!("failed to read body: {e}")))?;

        Ok(RawResponse {
            status,
            last_modified,
            body,
        })
    }
}

/// Cooperative cancellation flag shared between a caller and its request.
///
/// Cancelling never interrupts a request already on the wire (the blocking
/// transport's timeout bounds that); it makes the loader skip the request if it
/// has not started, and discard the result if it has.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-call inputs to decoding and fallback generation.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext {
    pub today: NaiveDate,
    pub quarterly_seed: u64,
}

/// A dataset the loader knows how to fetch, decode, and replace.
pub trait Dataset: Sized {
    const RESOURCE: Resource;

    fn decode(body: &str, ctx: &DecodeContext) -> Result<Vec<Self>, FetchError>;

    fn fallback(ctx: &DecodeContext) -> Vec<Self>;
}

impl Dataset for Company {
    const RESOURCE: Resource = Resource::Companies;

    fn decode(body: &str, ctx: &DecodeContext) -> Result<Vec<Self>, FetchError> {
        reshape::decode_companies(body, ctx.today)
    }

    fn fallback(_ctx: &DecodeContext) -> Vec<Self> {
        fallback::companies()
    }
}

impl Dataset for MarketTrend {
    const RESOURCE: Resource = Resource::MarketTrends;

    fn decode(body: &str, _ctx: &DecodeContext) -> Result<Vec<Self>, FetchError> {
        reshape::decode_trends(body)
    }

    fn fallback(_ctx: &DecodeContext) -> Vec<Self> {
        fallback::market_trends()
    }
}

impl Dataset for QuarterlyRecord {
    const RESOURCE: Resource = Resource::Quarterly;

    fn decode(body: &str, _ctx: &DecodeContext) -> Result<Vec<Self>, FetchError> {
        reshape::decode_quarterly(body)
    }

    fn fallback(ctx: &DecodeContext) -> Vec<Self> {
        fallback::synthesize_quarterly(ctx.today, ctx.quarterly_seed)
    }
}

struct CachedBody {
    body: Arc<str>,
    last_updated: LastUpdated,
    fetched_at: Instant,
}

type Slot = Arc<Mutex<Option<CachedBody>>>;

struct ResponseCache {
    ttl: Duration,
    slots: Mutex<HashMap<Resource, Slot>>,
}

impl ResponseCache {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    fn slot(&self, resource: Resource) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(resource).or_default().clone()
    }
}

struct Fetched {
    body: String,
    last_updated: LastUpdated,
}

/// Fetches the three remote datasets. Never fails.
pub struct DatasetLoader {
    config: LoaderConfig,
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
    clock: fn() -> NaiveDate,
}

impl DatasetLoader {
    /// Loader over the real HTTP transport.
    pub fn new(config: LoaderConfig) -> Result<Self, AppError> {
        let transport = HttpTransport::new(config.request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: LoaderConfig, transport: Arc<dyn Transport>) -> Self {
        let cache = ResponseCache::new(config.cache_ttl);
        Self {
            config,
            transport,
            cache,
            clock: local_today,
        }
    }

    /// Replace the source of "today" (round dates and the quarterly fallback range).
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn fetch_companies(&self) -> Loaded<Company> {
        self.fetch()
    }

    pub fn fetch_market_trends(&self) -> Loaded<MarketTrend> {
        self.fetch()
    }

    pub fn fetch_quarterly(&self) -> Loaded<QuarterlyRecord> {
        self.fetch()
    }

    /// Fetch a dataset, substituting its fallback on any failure.
    pub fn fetch<T: Dataset>(&self) -> Loaded<T> {
        let ctx = self.context();
        match self.attempt::<T>(None, &ctx) {
            Ok(loaded) => loaded,
            Err(err) => fall_back(err, &ctx),
        }
    }

    /// Like [`fetch`](Self::fetch), but returns `None` once `cancel` is set.
    pub fn fetch_with<T: Dataset>(&self, cancel: &CancelToken) -> Option<Loaded<T>> {
        let ctx = self.context();
        match self.attempt::<T>(Some(cancel), &ctx) {
            Ok(loaded) => Some(loaded),
            Err(FetchError::Cancelled) => {
                debug!(resource = T::RESOURCE.display_name(), "fetch cancelled, result discarded");
                None
            }
            Err(err) => Some(fall_back(err, &ctx)),
        }
    }

    fn context(&self) -> DecodeContext {
        DecodeContext {
            today: (self.clock)(),
            quarterly_seed: self.config.quarterly_seed.unwrap_or_else(rand::random),
        }
    }

    fn attempt<T: Dataset>(&self, cancel: Option<&CancelToken>, ctx: &DecodeContext) -> Result<Loaded<T>, FetchError> {
        let cancelled = || cancel.is_some_and(CancelToken::is_cancelled);

        if cancelled() {
            return Err(FetchError::Cancelled);
        }

        if self.config.offline {
            info!(resource = T::RESOURCE.display_name(), "offline mode, serving fallback dataset");
            return Ok(Loaded::fallback(T::fallback(ctx), "offline mode"));
        }

        if !self.cache.enabled() {
            let fetched = self.request(T::RESOURCE)?;
            if cancelled() {
                return Err(FetchError::Cancelled);
            }
            let records = T::decode(&fetched.body, ctx)?;
            return Ok(Loaded {
                records,
                origin: DataOrigin::Live,
                last_updated: fetched.last_updated,
            });
        }

        // The slot lock is held across the request so concurrent callers for the
        // same resource wait here and then read the cached body.
        let slot = self.cache.slot(T::RESOURCE);
        let mut entry = lock_slot(&slot, cancel)?;
        if cancelled() {
            return Err(FetchError::Cancelled);
        }

        if let Some(cached) = entry
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.cache.ttl)
        {
            debug!(resource = T::RESOURCE.display_name(), "serving cached payload");
            let records = T::decode(&cached.body, ctx)?;
            return Ok(Loaded {
                records,
                origin: DataOrigin::Cached,
                last_updated: cached.last_updated,
            });
        }

        let fetched = self.request(T::RESOURCE)?;
        let records = T::decode(&fetched.body, ctx)?;
        *entry = Some(CachedBody {
            body: Arc::from(fetched.body),
            last_updated: fetched.last_updated,
            fetched_at: Instant::now(),
        });
        drop(entry);

        if cancelled() {
            return Err(FetchError::Cancelled);
        }

        Ok(Loaded {
            records,
            origin: DataOrigin::Live,
            last_updated: fetched.last_updated,
        })
    }

    fn request(&self, resource: Resource) -> Result<Fetched, FetchError> {
        let url = self.config.url_for(resource);
        debug!(%url, "fetching dataset");

        let resp = self.transport.get(&url)?;
        if !(200..300).contains(&resp.status) {
            return Err(FetchError::Status(resp.status));
        }

        Ok(Fetched {
            last_updated: parse_last_modified(resp.last_modified.as_deref()),
            body: resp.body,
        })
    }
}

/// How often a cancellable caller re-checks its token while another caller
/// holds the resource slot.
const SLOT_POLL: Duration = Duration::from_millis(10);

fn lock_slot<'a>(
    slot: &'a Mutex<Option<CachedBody>>,
    cancel: Option<&CancelToken>,
) -> Result<MutexGuard<'a, Option<CachedBody>>, FetchError> {
    let Some(token) = cancel else {
        return Ok(slot.lock().unwrap_or_else(PoisonError::into_inner));
    };
    loop {
        match slot.try_lock() {
            Ok(guard) => return Ok(guard),
            Err(TryLockError::Poisoned(poisoned)) => return Ok(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => {
                if token.is_cancelled() {
                    return Err(FetchError::Cancelled);
                }
                std::thread::sleep(SLOT_POLL);
            }
        }
    }
}

fn fall_back<T: Dataset>(err: FetchError, ctx: &DecodeContext) -> Loaded<T> {
    warn!(
        resource = T::RESOURCE.display_name(),
        error = %err,
        "remote fetch failed, serving fallback dataset"
    );
    Loaded::fallback(T::fallback(ctx), err.to_string())
}

/// Parse a `Last-Modified` value (HTTP-date / RFC 2822, or RFC 3339).
///
/// Anything missing or unreadable is `Unknown`; this never fails the fetch.
pub fn parse_last_modified(raw: Option<&str>) -> LastUpdated {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return LastUpdated::Unknown;
    };
    match DateTime::parse_from_rfc2822(raw).or_else(|_| DateTime::parse_from_rfc3339(raw)) {
        Ok(ts) => LastUpdated::At(ts.with_timezone(&Utc)),
        Err(e) => {
            debug!(header = raw, error = %e, "unreadable Last-Modified header");
            LastUpdated::Unknown
        }
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
