use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::ProgressBar;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::catalog::{self, PageCountBasis, ViewState};
use crate::fetcher::{self, AcquireConfig};
use crate::loading::LoadingState;
use crate::model::{Catalog, COMBAT_POWER_MAX, COMBAT_POWER_MIN};
use crate::runner::{Options, Runner};

enum Reply {
    Json(String),
    Status(u16),
}

struct Stub {
    base_url: String,
    hits: Arc<Mutex<Vec<u32>>>,
}

fn pokemon_json(id: u32, name: &str, attack: bool, defense: bool) -> String {
    let mut stats = vec![r#"{"base_stat": 45, "effort": 0, "stat": {"name": "hp", "url": ""}}"#
        .to_string()];
    if attack {
        stats.push(format!(
            r#"{{"base_stat": {}, "effort": 0, "stat": {{"name": "attack", "url": ""}}}}"#,
            40 + id
        ));
    }
    if defense {
        stats.push(format!(
            r#"{{"base_stat": {}, "effort": 0, "stat": {{"name": "defense", "url": ""}}}}"#,
            30 + id
        ));
    }
    format!(
        r#"{{"id": {id}, "name": "{name}", "base_experience": 64,
            "sprites": {{"front_default": "https://img.example/{id}.png", "back_default": null}},
            "stats": [{}],
            "types": [{{"slot": 1, "type": {{"name": "grass", "url": ""}}}}]}}"#,
        stats.join(",")
    )
}

fn valid(id: u32) -> Reply {
    Reply::Json(pokemon_json(id, &format!("mon{id}"), true, true))
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

// minimal HTTP/1.1 responder on an ephemeral port; every connection serves
// one GET for `<base>/<id>` and closes
async fn spawn_stub<F>(handler: F) -> Stub
where
    F: Fn(u32) -> (Reply, u64) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let server_hits = hits.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let handler = handler.clone();
            let hits = server_hits.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut read = 0usize;
                loop {
                    let n = match socket.read(&mut buf[read..]).await {
                        Ok(n) => n,
                        Err(_) => return,
                    };
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len() {
                        break;
                    }
                }
                let request = String::from_utf8_lossy(&buf[..read]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/");
                let id = path
                    .rsplit('/')
                    .next()
                    .and_then(|s| s.parse::<u32>().ok())
                    .unwrap_or(0);
                hits.lock().unwrap().push(id);

                let (reply, delay_ms) = handler(id);
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                let (status, body) = match reply {
                    Reply::Json(body) => (200, body),
                    Reply::Status(status) => (status, r#"{"detail": "nope"}"#.to_string()),
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    Stub {
        base_url: format!("http://{addr}/api/v2/pokemon"),
        hits,
    }
}

fn client() -> reqwest::Client {
    crate::runner::build_client(None, 5, None).unwrap()
}

fn config(stub: &Stub, last_id: u32, concurrency: usize) -> AcquireConfig {
    AcquireConfig {
        api_url: stub.base_url.clone(),
        first_id: 1,
        last_id,
        concurrency,
        rate: 1000,
    }
}

async fn acquire(stub: &Stub, last_id: u32, concurrency: usize) -> Catalog {
    fetcher::acquire(
        &client(),
        &config(stub, last_id, concurrency),
        &ProgressBar::hidden(),
        &LoadingState::new(),
    )
    .await
}

fn ids(catalog: &Catalog) -> Vec<u32> {
    catalog.records.iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn fifteen_valid_ids_then_not_found() {
    let stub = spawn_stub(|id| {
        if (1..=15).contains(&id) {
            (valid(id), 0)
        } else {
            (Reply::Status(404), 0)
        }
    })
    .await;

    let catalog = acquire(&stub, 20, 4).await;
    assert_eq!(catalog.requested, 20);
    assert_eq!(catalog.failed, 5);
    assert_eq!(ids(&catalog), (1..=15).collect::<Vec<_>>());
    for r in catalog.records.iter() {
        assert!((COMBAT_POWER_MIN..=COMBAT_POWER_MAX).contains(&r.combat_power));
        assert_eq!(r.image_url, Some(format!("https://img.example/{}.png", r.id)));
        assert_eq!(r.attack, 40 + r.id);
        assert_eq!(r.defense, 30 + r.id);
    }

    let mut state = ViewState::default();
    let first = catalog::render(&catalog.records, &state, PageCountBasis::Filtered);
    assert_eq!(first.total_pages, 2);
    assert_eq!(
        first.items.iter().map(|r| r.id).collect::<Vec<_>>(),
        (1..=10).collect::<Vec<_>>()
    );

    assert!(state.next(first.total_pages));
    let second = catalog::render(&catalog.records, &state, PageCountBasis::Filtered);
    assert_eq!(
        second.items.iter().map(|r| r.id).collect::<Vec<_>>(),
        (11..=15).collect::<Vec<_>>()
    );
    assert!(!state.next(second.total_pages));
    assert_eq!(state.current_page(), 2);
}

#[tokio::test]
async fn records_missing_a_stat_are_dropped() {
    let stub = spawn_stub(|id| match id {
        2 => (Reply::Json(pokemon_json(2, "ivysaur", true, false)), 0),
        3 => (Reply::Json(pokemon_json(3, "venusaur", false, true)), 0),
        _ => (valid(id), 0),
    })
    .await;

    let catalog = acquire(&stub, 4, 2).await;
    assert_eq!(ids(&catalog), vec![1, 4]);
    assert_eq!(catalog.failed, 2);
}

#[tokio::test]
async fn concurrent_fetch_keeps_id_order() {
    // later ids answer first
    let stub = spawn_stub(|id| (valid(id), u64::from(30 - id.min(30)) * 3)).await;

    let catalog = acquire(&stub, 12, 8).await;
    assert_eq!(ids(&catalog), (1..=12).collect::<Vec<_>>());
    assert_eq!(catalog.failed, 0);
}

#[tokio::test]
async fn bad_payloads_are_skipped() {
    let stub = spawn_stub(|id| match id {
        2 => (Reply::Json("{not json".to_string()), 0),
        3 => (Reply::Json(pokemon_json(1003, "impostor", true, true)), 0),
        4 => (Reply::Status(500), 0),
        _ => (valid(id), 0),
    })
    .await;

    let catalog = acquire(&stub, 5, 3).await;
    assert_eq!(ids(&catalog), vec![1, 5]);
    assert_eq!(catalog.failed, 3);
}

#[tokio::test]
async fn id_search_matches_record_without_name_hit() {
    let stub = spawn_stub(|id| (Reply::Json(pokemon_json(id, "pokemon", true, true)), 0)).await;

    let catalog = acquire(&stub, 30, 6).await;
    let mut state = ViewState::default();
    state.set_search("25");
    let view = catalog::render(&catalog.records, &state, PageCountBasis::Filtered);
    assert_eq!(view.filtered_count, 1);
    assert_eq!(view.items[0].id, 25);
    assert_eq!(view.total_pages, 1);
}

#[tokio::test]
async fn loading_flag_is_set_only_while_acquiring() {
    let loading = LoadingState::new();
    let observed = Arc::new(AtomicBool::new(false));

    let probe = loading.clone();
    let seen = observed.clone();
    let stub = spawn_stub(move |id| {
        if probe.is_acquiring() {
            seen.store(true, Ordering::SeqCst);
        }
        (valid(id), 0)
    })
    .await;

    assert!(!loading.is_acquiring());
    let catalog = fetcher::acquire(
        &client(),
        &config(&stub, 3, 1),
        &ProgressBar::hidden(),
        &loading,
    )
    .await;
    assert_eq!(catalog.len(), 3);
    assert!(observed.load(Ordering::SeqCst));
    assert!(!loading.is_acquiring());
}

#[tokio::test]
async fn progress_bar_counts_every_walked_id() {
    let stub = spawn_stub(|id| {
        if id % 2 == 0 {
            (Reply::Status(404), 0)
        } else {
            (valid(id), 0)
        }
    })
    .await;

    let pb = ProgressBar::hidden();
    let catalog = fetcher::acquire(
        &client(),
        &config(&stub, 9, 3),
        &pb,
        &LoadingState::new(),
    )
    .await;
    assert_eq!(ids(&catalog), vec![1, 3, 5, 7, 9]);
    assert_eq!(pb.position(), 9);
    assert_eq!(pb.length(), Some(9));
}

#[tokio::test]
async fn runner_with_single_slot_requests_ids_in_order() {
    let stub = spawn_stub(|id| (valid(id), 0)).await;

    let runner = Runner::new(Options {
        api_url: stub.base_url.clone(),
        first_id: 3,
        last_id: 8,
        concurrency: 1,
        rate: 1000,
        timeout_seconds: 5,
        ..Options::default()
    })
    .unwrap();
    let catalog = runner.run().await.unwrap();

    assert_eq!(ids(&catalog), (3..=8).collect::<Vec<_>>());
    let hits = stub.hits.lock().unwrap().clone();
    assert_eq!(hits, (3..=8).collect::<Vec<_>>());
}

#[tokio::test]
async fn unreachable_upstream_yields_empty_catalog() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let runner = Runner::new(Options {
        api_url: format!("http://{addr}/api/v2/pokemon"),
        first_id: 1,
        last_id: 3,
        concurrency: 2,
        rate: 1000,
        timeout_seconds: 2,
        ..Options::default()
    })
    .unwrap();
    let catalog = runner.run().await.unwrap();
    assert!(catalog.is_empty());
    assert_eq!(catalog.requested, 3);
    assert_eq!(catalog.failed, 3);
}

#[tokio::test]
async fn huge_id_range_walks_without_preallocating() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = AcquireConfig {
        api_url: format!("http://{addr}/api/v2/pokemon"),
        first_id: 1,
        last_id: u32::MAX,
        concurrency: 1,
        rate: 1000,
    };
    let pb = ProgressBar::hidden();
    let http = client();
    let state = LoadingState::new();
    let walk = fetcher::acquire(&http, &config, &pb, &state);
    let outcome = tokio::time::timeout(Duration::from_millis(500), walk).await;

    // still walking when the deadline hits
    assert!(outcome.is_err());
    assert_eq!(pb.length(), Some(u64::from(u32::MAX)));
}

#[tokio::test]
async fn rate_limit_paces_requests() {
    let stub = spawn_stub(|id| (valid(id), 0)).await;
    let config = AcquireConfig {
        rate: 2,
        ..config(&stub, 6, 6)
    };

    let started = std::time::Instant::now();
    let catalog = fetcher::acquire(
        &client(),
        &config,
        &ProgressBar::hidden(),
        &LoadingState::new(),
    )
    .await;
    let elapsed = started.elapsed();

    assert_eq!(ids(&catalog), (1..=6).collect::<Vec<_>>());
    // burst of 2, then one request every 500ms for the other 4
    assert!(
        elapsed >= Duration::from_millis(1500),
        "six requests at 2/s finished in {elapsed:?}"
    );
}
