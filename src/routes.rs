use crate::app::{ApiKey, AppState, EspnCookies};
use crate::error::HttpError;
use crate::views::{
    ActivityView, BoxScoreView, FreeAgentView, LeagueSummary, MatchupView, PlayerInfoView,
    PlayerView, StandingView, TeamSummaryView, TeamView, TransactionView,
};
use axum::Json;
use axum::extract::{Path, Query, State};
use espn_fantasy_api::PlayerInfo;
use serde::Deserialize;

type JsonResult<T> = Result<Json<T>, HttpError>;

pub async fn league_info(
    _: ApiKey,
    cookies: EspnCookies,
    State(state): State<AppState>,
    Path((league_id, year)): Path<(i64, i32)>,
) -> JsonResult<LeagueSummary> {
    let league = state.league(league_id, year, cookies).await?;
    Ok(Json(LeagueSummary::from(&league)))
}

pub async fn standings(
    _: ApiKey,
    cookies: EspnCookies,
    State(state): State<AppState>,
    Path((league_id, year)): Path<(i64, i32)>,
) -> JsonResult<Vec<StandingView>> {
    let league = state.league(league_id, year, cookies).await?;
    Ok(Json(league.standings().iter().map(|t| StandingView::from(t.as_ref())).collect()))
}

pub async fn teams(
    _: ApiKey,
    cookies: EspnCookies,
    State(state): State<AppState>,
    Path((league_id, year)): Path<(i64, i32)>,
) -> JsonResult<Vec<TeamSummaryView>> {
    let league = state.league(league_id, year, cookies).await?;
    Ok(Json(league.teams.iter().map(|t| TeamSummaryView::from(t.as_ref())).collect()))
}

pub async fn team(
    _: ApiKey,
    cookies: EspnCookies,
    State(state): State<AppState>,
    Path((league_id, year, team_id)): Path<(i64, i32, i64)>,
) -> JsonResult<TeamView> {
    let league = state.league(league_id, year, cookies).await?;
    let team = league.team(team_id).ok_or_else(|| HttpError::not_found("Team"))?;
    Ok(Json(TeamView::from(team.as_ref())))
}

pub async fn matchup(
    _: ApiKey,
    cookies: EspnCookies,
    State(state): State<AppState>,
    Path((league_id, year, week, home_team_id, away_team_id)): Path<(i64, i32, i64, i64, i64)>,
) -> JsonResult<MatchupView> {
    let league = state.league(league_id, year, cookies).await?;
    let matchups = league.scoreboard(Some(week)).await?;

    matchups
        .iter()
        .find(|m| {
            m.home_team.id() == home_team_id
                && m.away_team.as_ref().map(|t| t.id()) == Some(away_team_id)
        })
        .map(|m| Json(MatchupView::from(m)))
        .ok_or_else(|| HttpError::not_found("Matchup"))
}

#[derive(Debug, Deserialize)]
pub struct FreeAgentParams {
    pub week: Option<i64>,
    #[serde(default = "default_free_agent_size")]
    pub size: usize,
    pub position: Option<String>,
}

fn default_free_agent_size() -> usize {
    50
}

pub async fn free_agents(
    _: ApiKey,
    cookies: EspnCookies,
    State(state): State<AppState>,
    Path((league_id, year)): Path<(i64, i32)>,
    Query(params): Query<FreeAgentParams>,
) -> JsonResult<Vec<FreeAgentView>> {
    let league = state.league(league_id, year, cookies).await?;
    let players = league
        .free_agents(params.week, params.size, params.position.as_deref(), None)
        .await?;
    Ok(Json(players.iter().map(FreeAgentView::from).collect()))
}

pub async fn player_by_id(
    _: ApiKey,
    cookies: EspnCookies,
    State(state): State<AppState>,
    Path((league_id, year, player_id)): Path<(i64, i32, i64)>,
) -> JsonResult<PlayerView> {
    let league = state.league(league_id, year, cookies).await?;
    match league.player_info(None, &[player_id], false).await? {
        Some(PlayerInfo::Single(player)) => Ok(Json(PlayerView::from(&player))),
        Some(PlayerInfo::Many(players)) => players
            .iter()
            .find(|p| p.player_id == player_id)
            .map(|p| Json(PlayerView::from(p)))
            .ok_or_else(|| HttpError::not_found("Player")),
        None => Err(HttpError::not_found("Player")),
    }
}

pub async fn player_by_name(
    _: ApiKey,
    cookies: EspnCookies,
    State(state): State<AppState>,
    Path((league_id, year, player_name)): Path<(i64, i32, String)>,
) -> JsonResult<PlayerInfoView> {
    let league = state.league(league_id, year, cookies).await?;
    let info = league.player_info(Some(player_name.as_str()), &[], false).await?;
    info.as_ref()
        .map(|info| Json(PlayerInfoView::from(info)))
        .ok_or_else(|| HttpError::not_found("Player"))
}

pub async fn scoreboard(
    _: ApiKey,
    cookies: EspnCookies,
    State(state): State<AppState>,
    Path((league_id, year, week)): Path<(i64, i32, i64)>,
) -> JsonResult<Vec<MatchupView>> {
    let league = state.league(league_id, year, cookies).await?;
    let matchups = league.scoreboard(Some(week)).await?;
    Ok(Json(matchups.iter().map(MatchupView::from).collect()))
}

pub async fn box_scores(
    _: ApiKey,
    cookies: EspnCookies,
    State(state): State<AppState>,
    Path((league_id, year, week)): Path<(i64, i32, i64)>,
) -> JsonResult<Vec<BoxScoreView>> {
    let league = state.league(league_id, year, cookies).await?;
    let boxes = league.box_scores(Some(week), None, true).await?;
    Ok(Json(boxes.iter().map(BoxScoreView::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    #[serde(default = "default_activity_size")]
    pub size: usize,
}

fn default_activity_size() -> usize {
    25
}

pub async fn activity(
    _: ApiKey,
    cookies: EspnCookies,
    State(state): State<AppState>,
    Path((league_id, year)): Path<(i64, i32)>,
    Query(params): Query<ActivityParams>,
) -> JsonResult<Vec<ActivityView>> {
    let league = state.league(league_id, year, cookies).await?;
    let activity = league.recent_activity(params.size, None, 0, false).await?;
    Ok(Json(activity.iter().map(ActivityView::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct TransactionParams {
    pub scoring_period: Option<i64>,
}

pub async fn transactions(
    _: ApiKey,
    cookies: EspnCookies,
    State(state): State<AppState>,
    Path((league_id, year)): Path<(i64, i32)>,
    Query(params): Query<TransactionParams>,
) -> JsonResult<Vec<TransactionView>> {
    let league = state.league(league_id, year, cookies).await?;
    let transactions = league.transactions(params.scoring_period, None).await?;
    Ok(Json(transactions.iter().map(TransactionView::from).collect()))
}
