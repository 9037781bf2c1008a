pub mod payload;

use std::num::NonZeroU32;

use futures::stream::{self, StreamExt};
use governor::{Quota, RateLimiter};
use indicatif::ProgressBar;
use rand::Rng;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::loading::LoadingState;
use crate::model::{Catalog, PokemonRecord, COMBAT_POWER_MAX, COMBAT_POWER_MIN};

use self::payload::PokemonPayload;

pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2/pokemon";
pub const DEFAULT_LAST_ID: u32 = 1281;

// every variant is a per-id failure: the id is logged and left out of the catalog
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status}")]
    Status { status: u16 },

    #[error("failed to decode payload: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("payload has no '{stat}' stat")]
    MissingStat { stat: &'static str },

    #[error("payload has no type entry")]
    MissingType,

    #[error("payload id {actual} does not match requested id {requested}")]
    IdMismatch { requested: u32, actual: u32 },
}

#[derive(Clone, Debug)]
pub struct AcquireConfig {
    pub api_url: String,
    pub first_id: u32,
    pub last_id: u32,
    pub concurrency: usize,
    pub rate: u32,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            first_id: 1,
            last_id: DEFAULT_LAST_ID,
            concurrency: 10,
            rate: 50,
        }
    }
}

pub fn record_url(base_url: &str, id: u32) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}

pub fn parse_record<R: Rng + ?Sized>(
    payload: &PokemonPayload,
    rng: &mut R,
) -> Result<PokemonRecord, FetchError> {
    let attack = payload
        .base_stat("attack")
        .ok_or(FetchError::MissingStat { stat: "attack" })?;
    let defense = payload
        .base_stat("defense")
        .ok_or(FetchError::MissingStat { stat: "defense" })?;
    let primary_type = payload.primary_type().ok_or(FetchError::MissingType)?;

    Ok(PokemonRecord {
        id: payload.id,
        name: payload.name.clone(),
        image_url: payload.sprites.front_default.clone(),
        combat_power: rng.gen_range(COMBAT_POWER_MIN..=COMBAT_POWER_MAX),
        attack,
        defense,
        primary_type: primary_type.to_string(),
    })
}

pub async fn fetch_record(
    client: &reqwest::Client,
    base_url: &str,
    id: u32,
) -> Result<PokemonRecord, FetchError> {
    let resp = client
        .get(record_url(base_url, id))
        .send()
        .await
        .map_err(|source| FetchError::Request { source })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let body = resp
        .bytes()
        .await
        .map_err(|source| FetchError::Request { source })?;
    let payload: PokemonPayload =
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { source })?;
    if payload.id != id {
        return Err(FetchError::IdMismatch {
            requested: id,
            actual: payload.id,
        });
    }

    let mut rng = rand::thread_rng();
    parse_record(&payload, &mut rng)
}

/// Walks `first_id..=last_id` and builds the catalog.
///
/// At most `concurrency` requests are in flight and results are reassembled
/// in id order, so `concurrency = 1` is the plain sequential walk. Failed ids
/// are logged and skipped; the walk itself never fails.
pub async fn acquire(
    client: &reqwest::Client,
    config: &AcquireConfig,
    pb: &ProgressBar,
    loading: &LoadingState,
) -> Catalog {
    let _loading = loading.begin();
    let started_at = Instant::now();

    let ids = config.first_id..=config.last_id;
    let requested = config
        .last_id
        .checked_sub(config.first_id)
        .map_or(0, |span| span as usize + 1);
    pb.set_length(requested as u64);
    info!(
        first_id = config.first_id,
        last_id = config.last_id,
        concurrency = config.concurrency,
        "starting acquisition"
    );

    let rate = NonZeroU32::new(config.rate).unwrap_or(NonZeroU32::MIN);
    let lim = RateLimiter::direct(Quota::per_second(rate));
    let lim = &lim;
    let base_url = config.api_url.as_str();

    let mut outcomes = stream::iter(ids)
        .map(|id| async move {
            lim.until_ready().await;
            (id, fetch_record(client, base_url, id).await)
        })
        .buffered(config.concurrency.max(1));

    // not pre-sized: the range is caller controlled and may be huge
    let mut records: Vec<PokemonRecord> = Vec::new();
    let mut failed = 0usize;
    while let Some((id, outcome)) = outcomes.next().await {
        pb.inc(1);
        match outcome {
            Ok(record) => {
                debug!(id, name = %record.name, "fetched record");
                records.push(record);
            }
            Err(e) => {
                warn!(id, error = %e, "failed to fetch record");
                failed += 1;
            }
        }
    }

    let elapsed = started_at.elapsed();
    info!(
        records = records.len(),
        failed,
        elapsed_ms = elapsed.as_millis() as u64,
        "acquisition completed"
    );

    Catalog {
        records,
        requested,
        failed,
        elapsed,
    }
}
