//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::catalog::{CatalogError, CatalogStatus, filter_cities};
use crate::domain::{CodeSystem, Copyright};
use crate::rasp::RaspError;
use crate::schedule::ScheduleError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/catalog/status", get(catalog_status))
        .route("/api/catalog/reset", post(reset_catalog))
        .route("/api/countries", get(list_countries))
        .route("/api/cities", get(list_cities))
        .route("/api/cities/:code/stations", get(city_stations))
        .route("/api/segments", get(search_segments))
        .route("/api/segments/:uid/carrier", get(segment_carrier))
        .route("/api/carriers/:code", get(carrier_info))
        .route("/api/threads/:uid", get(thread_info))
        .route("/api/stations/:code/thread", get(station_thread))
        .route("/api/copyright", get(copyright))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn catalog_status(State(state): State<AppState>) -> Json<CatalogStatus> {
    Json(state.catalog.status().await)
}

/// Clear a failed catalog load so the next request fetches again.
async fn reset_catalog(State(state): State<AppState>) -> Json<ResetResponse> {
    let reset = state.catalog.reset().await;
    Json(ResetResponse {
        reset,
        status: state.catalog.status().await,
    })
}

/// Load the catalog, or explain why it isn't available.
async fn ensure_catalog(state: &AppState) -> Result<(), AppError> {
    state.catalog.load().await.map_err(AppError::from)
}

/// The full country → region → settlement → station tree.
async fn list_countries(State(state): State<AppState>) -> Result<Json<CountriesResponse>, AppError> {
    ensure_catalog(&state).await?;
    Ok(Json(CountriesResponse {
        countries: state.catalog.countries().await,
    }))
}

/// Cities matching `q`, home country first.
async fn list_cities(
    State(state): State<AppState>,
    Query(req): Query<CitySearchRequest>,
) -> Result<Json<CitiesResponse>, AppError> {
    ensure_catalog(&state).await?;

    let cities = state.catalog.cities(req.country.as_deref()).await;
    let cities = match req.q.as_deref() {
        Some(q) => filter_cities(q, &cities),
        None => cities,
    };

    Ok(Json(CitiesResponse { cities }))
}

async fn city_stations(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StationsResponse>, AppError> {
    ensure_catalog(&state).await?;
    let stations = state.catalog.stations(&code).await;
    Ok(Json(StationsResponse {
        city: code,
        stations,
    }))
}

/// Search segments between two points, filtered and sorted by departure.
async fn search_segments(
    State(state): State<AppState>,
    Query(req): Query<SegmentSearchRequest>,
) -> Result<Json<SegmentsResponse>, AppError> {
    let date = parse_date(req.date.as_deref()).map_err(|message| AppError::BadRequest { message })?;
    let filter = req.filter();

    let query = state.schedule.query(&req.from, &req.to, date);
    let segments = state.schedule.search(&query, &filter).await?;

    Ok(Json(SegmentsResponse {
        segments: segments.iter().map(SegmentResult::from_segment).collect(),
        filtered: filter.is_active(),
    }))
}

/// Full carrier details for a segment, looked up by its preferred code when
/// possible and otherwise taken from the search results.
async fn segment_carrier(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Query(req): Query<SegmentCarrierRequest>,
) -> Result<Json<CarrierResult>, AppError> {
    let date = parse_date(req.date.as_deref()).map_err(|message| AppError::BadRequest { message })?;
    let query = state.schedule.query(&req.from, &req.to, date);
    let carrier = state.schedule.segment_carrier(&query, &uid).await?;
    Ok(Json(CarrierResult::from_carrier(&carrier)))
}

/// Look up a carrier by code. The system defaults to IATA.
async fn carrier_info(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(req): Query<CarrierRequest>,
) -> Result<Json<CarrierResult>, AppError> {
    let system = match req.system.as_deref() {
        Some(s) => CodeSystem::parse(s).map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?,
        None => CodeSystem::Iata,
    };

    let carrier = state
        .schedule
        .carrier(&code, system)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: format!("Carrier {code} ({system}) not found"),
        })?;

    Ok(Json(CarrierResult::from_carrier(&carrier)))
}

async fn thread_info(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<ThreadResult>, AppError> {
    let thread = state.schedule.thread(&uid).await?;
    Ok(Json(ThreadResult::from_thread(&thread)))
}

/// The first thread in a station's schedule, with its stops.
async fn station_thread(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(req): Query<StationThreadRequest>,
) -> Result<Json<ThreadResult>, AppError> {
    let date = parse_date(req.date.as_deref()).map_err(|message| AppError::BadRequest { message })?;
    let thread = state.schedule.station_thread(&code, date).await?;
    Ok(Json(ThreadResult::from_thread(&thread)))
}

async fn copyright(State(state): State<AppState>) -> Result<Json<Copyright>, AppError> {
    Ok(Json(state.schedule.copyright().await?))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// The schedule provider can't be reached
    Unavailable { message: String },
    /// The schedule provider answered with an error
    Upstream { message: String },
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::Unavailable {
            message: e.to_string(),
        }
    }
}

impl From<RaspError> for AppError {
    fn from(e: RaspError) -> Self {
        let message = e.to_string();
        match e {
            RaspError::NotFound(_) => AppError::NotFound { message },
            e if e.is_connection_error() => AppError::Unavailable { message },
            _ => AppError::Upstream { message },
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        match e {
            ScheduleError::Provider(e) => e.into(),
            ScheduleError::InvalidRequest(message) => AppError::BadRequest { message },
            e @ (ScheduleError::NoThread { .. } | ScheduleError::SegmentNotFound { .. }) => {
                AppError::NotFound {
                    message: e.to_string(),
                }
            }
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Unavailable { message }
            | AppError::Upstream { message } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message().to_string();

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogConfig;
    use crate::rasp::{MockRaspClient, RaspClient, RaspConfig, RaspProvider};
    use crate::schedule::ScheduleConfig;
    use serde_json::Value;

    async fn serve(provider: RaspProvider) -> String {
        let state = AppState::new(provider, CatalogConfig::default(), ScheduleConfig::default());
        let app = create_router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn mock_app() -> String {
        let client = MockRaspClient::new("data/mock").unwrap();
        serve(RaspProvider::Mock(client)).await
    }

    /// An app whose provider points at a closed port.
    async fn offline_app() -> String {
        let config = RaspConfig::new("k")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(2);
        serve(RaspProvider::Live(RaspClient::new(config).unwrap())).await
    }

    async fn get(url: String) -> (StatusCode, Value) {
        let response = reqwest::get(url).await.unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn health_check() {
        let base = mock_app().await;
        let body = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn status_before_and_after_load() {
        let base = mock_app().await;

        let (_, status) = get(format!("{base}/api/catalog/status")).await;
        assert_eq!(status["state"], "not_loaded");

        let (code, _) = get(format!("{base}/api/cities")).await;
        assert_eq!(code, StatusCode::OK);

        let (_, status) = get(format!("{base}/api/catalog/status")).await;
        assert_eq!(status["state"], "loaded");
    }

    #[tokio::test]
    async fn cities_home_country_first() {
        let base = mock_app().await;
        let (code, body) = get(format!("{base}/api/cities")).await;
        assert_eq!(code, StatusCode::OK);

        let cities = body["cities"].as_array().unwrap();
        assert!(!cities.is_empty());
        assert_eq!(cities[0]["country"], "Россия");
    }

    #[tokio::test]
    async fn cities_filtered_by_query() {
        let base = mock_app().await;
        let (_, body) = get(format!("{base}/api/cities?q=%D0%BC%D0%BE%D1%81%D0%BA")).await;

        let cities = body["cities"].as_array().unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0]["id"], "c213");
    }

    #[tokio::test]
    async fn stations_of_moscow() {
        let base = mock_app().await;
        let (code, body) = get(format!("{base}/api/cities/c213/stations")).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["city"], "c213");
        assert!(!body["stations"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn countries_tree() {
        let base = mock_app().await;
        let (code, body) = get(format!("{base}/api/countries")).await;
        assert_eq!(code, StatusCode::OK);
        assert!(body["countries"].as_array().unwrap().len() >= 2);
    }

    #[tokio::test]
    async fn segments_sorted() {
        let base = mock_app().await;
        let (code, body) = get(format!("{base}/api/segments?from=c213&to=c2")).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["filtered"], false);

        let segments = body["segments"].as_array().unwrap();
        assert!(segments.len() >= 2);
        let departures: Vec<&str> = segments
            .iter()
            .map(|s| s["departure"].as_str().unwrap())
            .collect();
        let mut sorted = departures.clone();
        sorted.sort();
        assert_eq!(departures, sorted);
    }

    #[tokio::test]
    async fn segments_filtered_by_time() {
        let base = mock_app().await;
        let (_, body) = get(format!(
            "{base}/api/segments?from=c213&to=c2&morning=true&transfers=false"
        ))
        .await;
        assert_eq!(body["filtered"], true);
        for segment in body["segments"].as_array().unwrap() {
            let hour: u32 = segment["departure_time"].as_str().unwrap()[..2].parse().unwrap();
            assert!((6..12).contains(&hour));
            assert_eq!(segment["has_transfers"], false);
        }
    }

    #[tokio::test]
    async fn segments_bad_date() {
        let base = mock_app().await;
        let (code, body) = get(format!("{base}/api/segments?from=c213&to=c2&date=tomorrow")).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("date"));
    }

    #[tokio::test]
    async fn segments_missing_origin() {
        let base = mock_app().await;
        let (code, _) = get(format!("{base}/api/segments?from=&to=c2")).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn carrier_lookup() {
        let base = mock_app().await;
        let (code, body) = get(format!("{base}/api/carriers/SU?system=iata")).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["title"], "Аэрофлот");
        assert!(body["phone_link"].as_str().unwrap().starts_with('+'));
    }

    #[tokio::test]
    async fn carrier_unknown() {
        let base = mock_app().await;
        let (code, _) = get(format!("{base}/api/carriers/ZZ")).await;
        assert_eq!(code, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn carrier_bad_system() {
        let base = mock_app().await;
        let (code, _) = get(format!("{base}/api/carriers/SU?system=morse")).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);

        let (code, _) = get(format!("{base}/api/carriers/112?system=internal")).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn segment_carrier_looked_up_by_code() {
        let base = mock_app().await;
        let (code, body) = get(format!(
            "{base}/api/segments/SU-6_1_c26_547/carrier?from=c213&to=c2"
        ))
        .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["title"], "Аэрофлот");
        assert_eq!(body["address"], "Москва, ул. Арбат, д. 1");
        assert_eq!(body["phone_link"], "+74952235555");
    }

    #[tokio::test]
    async fn segment_carrier_from_search_results() {
        let base = mock_app().await;
        let (code, body) = get(format!(
            "{base}/api/segments/752A_0_2/carrier?from=c213&to=c2"
        ))
        .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["title"], "Российские железные дороги");
        assert_eq!(body["codes"]["internal"], "153");
    }

    #[tokio::test]
    async fn segment_carrier_unknown_segment() {
        let base = mock_app().await;
        let (code, body) = get(format!(
            "{base}/api/segments/no-such-thread/carrier?from=c213&to=c2"
        ))
        .await;
        assert_eq!(code, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("no-such-thread"));

        let (code, _) = get(format!("{base}/api/segments/752A_0_2/carrier?from=c213")).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn copyright_text_and_url() {
        let base = mock_app().await;
        let (code, body) = get(format!("{base}/api/copyright")).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["text"], "Данные предоставлены сервисом Яндекс.Расписания");
        assert_eq!(body["url"], "http://rasp.yandex.ru/");
    }

    #[tokio::test]
    async fn offline_copyright_is_unavailable() {
        let base = offline_app().await;
        let (code, _) = get(format!("{base}/api/copyright")).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn thread_from_station() {
        let base = mock_app().await;
        let (code, body) = get(format!("{base}/api/stations/s2006004/thread")).await;
        assert_eq!(code, StatusCode::OK);
        assert!(body["stops"].as_array().unwrap().len() >= 2);

        let uid = body["uid"].as_str().unwrap();
        let (code, same) = get(format!("{base}/api/threads/{uid}")).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(same["uid"], body["uid"]);
    }

    #[tokio::test]
    async fn unknown_thread() {
        let base = mock_app().await;
        let (code, _) = get(format!("{base}/api/threads/no-such-thread")).await;
        assert_eq!(code, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn offline_catalog_is_unavailable() {
        let base = offline_app().await;

        let (code, body) = get(format!("{base}/api/cities")).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().starts_with("failed to load stations"));

        let (_, status) = get(format!("{base}/api/catalog/status")).await;
        assert_eq!(status["state"], "failed");

        let response = reqwest::Client::new()
            .post(format!("{base}/api/catalog/reset"))
            .send()
            .await
            .unwrap();
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["reset"], true);
        assert_eq!(body["status"]["state"], "not_loaded");
    }

    #[tokio::test]
    async fn offline_search_is_unavailable() {
        let base = offline_app().await;
        let (code, _) = get(format!("{base}/api/segments?from=c213&to=c2")).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn error_status_codes() {
        let not_found: AppError = ScheduleError::NoThread {
            station: "s1".into(),
        }
        .into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let no_segment: AppError = ScheduleError::SegmentNotFound { uid: "t1".into() }.into();
        assert_eq!(no_segment.status(), StatusCode::NOT_FOUND);

        let upstream: AppError = RaspError::RateLimited.into();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let unauthorized: AppError = ScheduleError::Provider(RaspError::Unauthorized).into();
        assert_eq!(unauthorized.status(), StatusCode::BAD_GATEWAY);
    }
}
