use crate::constants::GAME_CODE;
use crate::espn::{
    DraftResponse, LeagueResponse, NewsResponse, PlayersResponse, ProPlayer, ProScheduleResponse,
    RosterResponse,
};
use log::debug;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const ESPN_FANTASY: &str = "https://lm-api-reads.fantasy.espn.com/apis/v3";
const ESPN_FANTASY_NEWS: &str = "https://site.api.espn.com/apis/fantasy/v2";
const FILTER_HEADER: &str = "x-fantasy-filter";

/// Base URLs of the two ESPN hosts the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub fantasy: String,
    pub news: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self { fantasy: ESPN_FANTASY.into(), news: ESPN_FANTASY_NEWS.into() }
    }
}

/// The two cookies ESPN uses to authorize reads of private leagues.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub espn_s2: String,
    pub swid: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("espn_s2", &"<redacted>")
            .field("swid", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    fn cookie_header(&self) -> String {
        format!("espn_s2={}; SWID={}", self.espn_s2, self.swid)
    }
}

/// ESPN fantasy basketball client bound to one league-year.
#[derive(Debug, Clone)]
pub struct EspnClient {
    client: Client,
    timeout: Duration,
    endpoints: Endpoints,
    league_id: i64,
    year: i32,
    credentials: Option<Credentials>,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(StatusCode, String),
    Parsing(serde_json::Error, String),
    AccessDenied(String),
    InvalidLeague(String),
    Usage(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(status, url) => write!(f, "API error for {url}: HTTP {status}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::AccessDenied(url) => write!(
                f,
                "Access denied for {url}: league is private or the ESPN cookies are invalid"
            ),
            ApiError::InvalidLeague(url) => write!(f, "League not found at {url}"),
            ApiError::Usage(msg) => write!(f, "{msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) => Some(e),
            ApiError::Parsing(e, _) => Some(e),
            _ => None,
        }
    }
}

impl EspnClient {
    pub fn new(league_id: i64, year: i32) -> Self {
        Self {
            client: Client::builder()
                .user_agent("espn-league-server/0.1")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            endpoints: Endpoints::default(),
            league_id,
            year,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn league_id(&self) -> i64 {
        self.league_id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    fn season_url(&self) -> String {
        format!("{}/games/{GAME_CODE}/seasons/{}", self.endpoints.fantasy, self.year)
    }

    /// Leagues before 2018 only live under `leagueHistory`, which answers
    /// with a one-element array instead of the league object.
    fn league_url(&self) -> String {
        if self.year < 2018 {
            format!(
                "{}/games/{GAME_CODE}/leagueHistory/{}",
                self.endpoints.fantasy, self.league_id
            )
        } else {
            format!("{}/segments/0/leagues/{}", self.season_url(), self.league_id)
        }
    }

    /// GET the league endpoint (plus `extend` path) with view params and an
    /// optional `x-fantasy-filter` JSON filter.
    pub async fn league_get<T: DeserializeOwned>(
        &self,
        extend: &str,
        params: &[(&str, String)],
        filter: Option<&Value>,
    ) -> ApiResult<T> {
        let url = format!("{}{extend}", self.league_url());
        if self.year < 2018 {
            let mut params = params.to_vec();
            params.push(("seasonId", self.year.to_string()));
            let raw: Value = self.get(&url, &params, filter).await?;
            let first = match raw {
                Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
                Value::Array(_) => return Err(ApiError::InvalidLeague(url)),
                other => other,
            };
            return serde_json::from_value(first).map_err(|e| ApiError::Parsing(e, url));
        }
        self.get(&url, params, filter).await
    }

    /// League core: settings, status, teams, standings and the full schedule.
    pub async fn get_league(&self) -> ApiResult<LeagueResponse> {
        let params = views(&["mSettings", "mStatus", "mTeam", "mMatchup", "mStandings"]);
        self.league_get("", &params, None).await
    }

    pub async fn get_rosters(&self) -> ApiResult<RosterResponse> {
        self.league_get("", &views(&["mRoster"]), None).await
    }

    pub async fn get_draft(&self) -> ApiResult<DraftResponse> {
        self.league_get("", &views(&["mDraftDetail"]), None).await
    }

    /// Directory of every active player in the season.
    pub async fn get_pro_players(&self) -> ApiResult<Vec<ProPlayer>> {
        let url = format!("{}/players", self.season_url());
        let filter = json!({ "filterActive": { "value": true } });
        self.get(&url, &views(&["players_wl"]), Some(&filter)).await
    }

    pub async fn get_pro_schedule(&self) -> ApiResult<ProScheduleResponse> {
        let url = self.season_url();
        self.get(&url, &views(&["proTeamSchedules_wl"]), None).await
    }

    /// Player cards for several players in one request.
    pub async fn get_player_card(
        &self,
        player_ids: &[i64],
        max_scoring_period: i64,
    ) -> ApiResult<PlayersResponse> {
        let filter = json!({
            "players": {
                "filterIds": { "value": player_ids },
                "filterStatsForTopScoringPeriodIds": {
                    "value": max_scoring_period,
                    "additionalValue": [],
                },
            }
        });
        self.league_get("", &views(&["kona_playercard"]), Some(&filter)).await
    }

    pub async fn get_player_news(&self, player_id: i64) -> ApiResult<NewsResponse> {
        let url = format!("{}/games/{GAME_CODE}/news/players", self.endpoints.news);
        self.get(&url, &[("playerId", player_id.to_string())], None).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
        filter: Option<&Value>,
    ) -> ApiResult<T> {
        let url = Url::parse_with_params(url, params)
            .map_err(|e| ApiError::Other(format!("invalid url {url}: {e}")))?;
        let label = url.to_string();
        debug!("GET {label}");

        let response = self
            .client
            .get(url)
            .headers(self.headers(filter)?)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, label.clone()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(ApiError::AccessDenied(label)),
            StatusCode::NOT_FOUND => return Err(ApiError::InvalidLeague(label)),
            status if !status.is_success() => return Err(ApiError::Api(status, label)),
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e, label.clone()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parsing(e, label))
    }

    fn headers(&self, filter: Option<&Value>) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(filter) = filter {
            let value = HeaderValue::from_str(&filter.to_string())
                .map_err(|e| ApiError::Other(format!("invalid filter header: {e}")))?;
            headers.insert(FILTER_HEADER, value);
        }
        if let Some(credentials) = &self.credentials {
            let value = HeaderValue::from_str(&credentials.cookie_header())
                .map_err(|e| ApiError::Other(format!("invalid ESPN cookies: {e}")))?;
            headers.insert(COOKIE, value);
        }
        Ok(headers)
    }
}

/// Repeated `view` query params, the way ESPN expects several views at once.
pub(crate) fn views(names: &[&str]) -> Vec<(&'static str, String)> {
    names.iter().map(|name| ("view", (*name).to_owned())).collect()
}
