use std::time::Duration;

use indicatif::ProgressBar;
use thiserror::Error;

use crate::fetcher::{self, AcquireConfig};
use crate::loading::LoadingState;
use crate::model::Catalog;

pub const DEFAULT_USER_AGENT: &str = concat!("pokeview/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct Options {
    pub api_url: String,
    pub first_id: u32,
    pub last_id: u32,
    pub concurrency: usize,
    pub rate: u32,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        let acquire = AcquireConfig::default();
        Self {
            api_url: acquire.api_url,
            first_id: acquire.first_id,
            last_id: acquire.last_id,
            concurrency: acquire.concurrency,
            rate: acquire.rate,
            timeout_seconds: 10,
            proxy: None,
            user_agent: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid API URL: {url}")]
    InvalidApiUrl { url: String },

    #[error("invalid id range {first}-{last}, expected positive ids with first <= last")]
    InvalidIdRange { first: u32, last: u32 },

    #[error("invalid concurrency {value}, expected positive integer")]
    InvalidConcurrency { value: usize },

    #[error("invalid rate {value}, expected positive integer")]
    InvalidRate { value: u32 },

    #[error("invalid user agent: {value}")]
    InvalidUserAgent { value: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if reqwest::Url::parse(&options.api_url).is_err() {
            return Err(RunnerError::InvalidApiUrl {
                url: options.api_url,
            });
        }
        if options.first_id == 0 || options.first_id > options.last_id {
            return Err(RunnerError::InvalidIdRange {
                first: options.first_id,
                last: options.last_id,
            });
        }
        if options.concurrency == 0 {
            return Err(RunnerError::InvalidConcurrency {
                value: options.concurrency,
            });
        }
        if options.rate == 0 {
            return Err(RunnerError::InvalidRate {
                value: options.rate,
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn acquire_config(&self) -> AcquireConfig {
        AcquireConfig {
            api_url: self.options.api_url.clone(),
            first_id: self.options.first_id,
            last_id: self.options.last_id,
            concurrency: self.options.concurrency,
            rate: self.options.rate,
        }
    }

    pub async fn run(&self) -> Result<Catalog, RunnerError> {
        self.run_with_progress(&ProgressBar::hidden(), &LoadingState::new())
            .await
    }

    /// Builds the catalog, reporting one tick per walked id on `pb`.
    /// Only client setup can fail; per-id failures end up in `Catalog::failed`.
    pub async fn run_with_progress(
        &self,
        pb: &ProgressBar,
        loading: &LoadingState,
    ) -> Result<Catalog, RunnerError> {
        let client = build_client(
            self.options.proxy.as_deref(),
            self.options.timeout_seconds,
            self.options.user_agent.as_deref(),
        )?;
        let catalog = fetcher::acquire(&client, &self.acquire_config(), pb, loading).await;
        Ok(catalog)
    }
}

pub fn build_client(
    proxy: Option<&str>,
    timeout_seconds: usize,
    user_agent: Option<&str>,
) -> Result<reqwest::Client, RunnerError> {
    let user_agent = user_agent
        .map(str::trim)
        .filter(|ua| !ua.is_empty())
        .unwrap_or(DEFAULT_USER_AGENT);
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(user_agent).map_err(|_| {
            RunnerError::InvalidUserAgent {
                value: user_agent.to_string(),
            }
        })?,
    );
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(10));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(timeout);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| RunnerError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| RunnerError::HttpClientBuild { source: e })
}
