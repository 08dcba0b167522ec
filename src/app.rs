use crate::config::ServerConfig;
use crate::error::HttpError;
use crate::routes;
use axum::Router;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::routing::get;
use espn_fantasy_api::{Credentials, EspnClient, League};
use log::debug;
use serde::Deserialize;
use std::sync::Arc;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config: Arc::new(config) }
    }

    /// Fetch a fresh league for one request.
    pub async fn league(
        &self,
        league_id: i64,
        year: i32,
        cookies: EspnCookies,
    ) -> Result<League, HttpError> {
        debug!("Loading league {league_id} ({year})");
        let client = EspnClient::new(league_id, year)
            .with_credentials(cookies.0)
            .with_endpoints(self.config.endpoints.clone());
        Ok(League::fetch(client).await?)
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/league/{league_id}/{year}", get(routes::league_info))
        .route("/league/{league_id}/{year}/standings", get(routes::standings))
        .route("/league/{league_id}/{year}/teams", get(routes::teams))
        .route("/league/{league_id}/{year}/teams/{team_id}", get(routes::team))
        .route(
            "/league/{league_id}/{year}/matchup/{week}/{home_team_id}/{away_team_id}",
            get(routes::matchup),
        )
        .route("/league/{league_id}/{year}/free_agents", get(routes::free_agents))
        .route("/league/{league_id}/{year}/players/{player_id}", get(routes::player_by_id))
        .route(
            "/league/{league_id}/{year}/players/by_name/{player_name}",
            get(routes::player_by_name),
        )
        .route("/league/{league_id}/{year}/scoreboard/{week}", get(routes::scoreboard))
        .route("/league/{league_id}/{year}/boxscores/{week}", get(routes::box_scores))
        .route("/league/{league_id}/{year}/activity", get(routes::activity))
        .route("/league/{league_id}/{year}/transactions", get(routes::transactions))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

/// Proof that the request carried the configured `x-api-key`.
pub struct ApiKey;

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let given = parts.headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
        match given {
            Some(key) if key == state.config.api_key => Ok(ApiKey),
            _ => Err(HttpError::Forbidden("Invalid or missing API key.".into())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CookieParams {
    espn_s2: Option<String>,
    swid: Option<String>,
}

/// ESPN cookies from the query string, else from the server defaults.
pub struct EspnCookies(pub Credentials);

impl FromRequestParts<AppState> for EspnCookies {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<CookieParams>::try_from_uri(&parts.uri)
            .map_err(|e| HttpError::BadRequest(e.body_text()))?;

        let pick = |given: Option<String>, fallback: &Option<String>| {
            given.filter(|v| !v.is_empty()).or_else(|| fallback.clone())
        };
        let espn_s2 = pick(params.espn_s2, &state.config.espn_s2);
        let swid = pick(params.swid, &state.config.swid);

        match (espn_s2, swid) {
            (Some(espn_s2), Some(swid)) => Ok(EspnCookies(Credentials { espn_s2, swid })),
            _ => Err(HttpError::BadRequest("Missing ESPN authentication cookies.".into())),
        }
    }
}
