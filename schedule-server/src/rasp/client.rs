//! Rasp HTTP client.
//!
//! Provides async methods for the Rasp v3.0 endpoints the service uses.
//! Handles authentication, concurrency limiting, status mapping and
//! conversion to domain types.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::catalog::StationSource;
use crate::domain::{Carrier, CodeSystem, Copyright, RouteSegment, Thread};
use crate::schedule::{ScheduleSource, SegmentQuery};

use super::convert::{
    convert_carrier_response, convert_copyright, convert_segments, convert_thread,
    schedule_thread_uids,
};
use super::error::RaspError;
use super::types::{
    AllStationsResponse, CarrierResponse, CopyrightResponse, CountryDto, ScheduleResponse,
    SegmentsResponse, ThreadResponse,
};

/// Default base URL for the Rasp API.
const DEFAULT_BASE_URL: &str = "https://api.rasp.yandex.net/v3.0";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Language for titles in responses.
const DEFAULT_LANG: &str = "ru_RU";

/// How much of an undecodable body to keep in the error.
const ERROR_BODY_CHARS: usize = 500;

/// Configuration for the Rasp client.
#[derive(Debug, Clone)]
pub struct RaspConfig {
    /// API key, sent in the `Authorization` header
    pub api_key: String,
    /// Base URL for the API (defaults to production Rasp)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Response language, e.g. "ru_RU"
    pub lang: String,
}

impl RaspConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
            lang: DEFAULT_LANG.to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the response language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

/// Rasp API client.
///
/// Cheap to clone; clones share the connection pool and the concurrency
/// limit.
#[derive(Debug, Clone)]
pub struct RaspClient {
    http: reqwest::Client,
    base_url: String,
    lang: String,
    semaphore: Arc<Semaphore>,
}

impl RaspClient {
    /// Create a new Rasp client with the given configuration.
    pub fn new(config: RaspConfig) -> Result<Self, RaspError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key).map_err(|_| RaspError::Api {
            status: 0,
            message: "Invalid API key format".to_string(),
        })?;
        headers.insert(AUTHORIZATION, api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            lang: config.lang,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// GET an endpoint and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, RaspError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| RaspError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/{}/", self.base_url, endpoint);
        debug!(endpoint, "Rasp request");

        let response = self
            .http
            .get(&url)
            .query(&[("format", "json"), ("lang", self.lang.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RaspError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RaspError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RaspError::NotFound(endpoint.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RaspError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        // stations_list is served as text/html, so decode the text ourselves
        // instead of relying on the content type.
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| RaspError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(ERROR_BODY_CHARS).collect()),
        })
    }

    /// Fetch the full country → region → settlement → station tree.
    ///
    /// This is a single, large response (tens of thousands of stations).
    pub async fn get_all_stations(&self) -> Result<Vec<CountryDto>, RaspError> {
        let response: AllStationsResponse = self.get_json("stations_list", &[]).await?;
        Ok(response.countries.unwrap_or_default())
    }

    /// Search segments between two settlements or stations.
    pub async fn search(&self, query: &SegmentQuery) -> Result<Vec<RouteSegment>, RaspError> {
        let mut params = vec![
            ("from", query.from.clone()),
            ("to", query.to.clone()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(date) = query.date {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(transport) = &query.transport_types {
            params.push(("transport_types", transport.clone()));
        }

        let response: SegmentsResponse = self.get_json("search", &params).await?;
        Ok(convert_segments(&response))
    }

    /// Look up a carrier by code.
    ///
    /// Returns `Ok(None)` when the code is unknown.
    pub async fn get_carrier(
        &self,
        code: &str,
        system: CodeSystem,
    ) -> Result<Option<Carrier>, RaspError> {
        let params = [("code", code.to_string()), ("system", system.to_string())];
        match self.get_json::<CarrierResponse>("carrier", &params).await {
            Ok(response) => Ok(convert_carrier_response(&response)),
            Err(RaspError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch the schedule of a station.
    pub async fn get_schedule(
        &self,
        station: &str,
        date: Option<NaiveDate>,
    ) -> Result<ScheduleResponse, RaspError> {
        let mut params = vec![("station", station.to_string())];
        if let Some(date) = date {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        self.get_json("schedule", &params).await
    }

    /// Fetch a thread with all of its stops.
    pub async fn get_thread(&self, uid: &str) -> Result<Thread, RaspError> {
        let response: ThreadResponse = self
            .get_json("thread", &[("uid", uid.to_string())])
            .await
            .map_err(|e| match e {
                RaspError::NotFound(_) => RaspError::NotFound(format!("thread {uid}")),
                other => other,
            })?;
        Ok(convert_thread(&response, uid))
    }

    /// Fetch the attribution to show with Rasp data.
    pub async fn get_copyright(&self) -> Result<Copyright, RaspError> {
        let response: CopyrightResponse = self.get_json("copyright", &[]).await?;
        convert_copyright(&response).ok_or_else(|| RaspError::Json {
            message: "response has no copyright".to_string(),
            body: None,
        })
    }
}

impl StationSource for RaspClient {
    async fn fetch_all_stations(&self) -> Result<Vec<CountryDto>, RaspError> {
        self.get_all_stations().await
    }
}

impl ScheduleSource for RaspClient {
    async fn search_segments(&self, query: &SegmentQuery) -> Result<Vec<RouteSegment>, RaspError> {
        self.search(query).await
    }

    async fn carrier(&self, code: &str, system: CodeSystem) -> Result<Option<Carrier>, RaspError> {
        self.get_carrier(code, system).await
    }

    async fn station_thread_uids(
        &self,
        station: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<String>, RaspError> {
        let schedule = self.get_schedule(station, date).await?;
        Ok(schedule_thread_uids(&schedule))
    }

    async fn thread(&self, uid: &str) -> Result<Thread, RaspError> {
        self.get_thread(uid).await
    }

    async fn copyright(&self) -> Result<Copyright, RaspError> {
        self.get_copyright().await
    }
}
