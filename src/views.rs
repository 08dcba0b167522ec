//! JSON shapes served by the façade, built from the league's domain types.

use chrono::{DateTime, Utc};
use espn_fantasy_api::{
    Activity, ActivityAction, BoxPlayer, BoxScore, League, Matchup, NewsItem, Owner, Player,
    PlayerInfo, PlayerStatLine, ScheduledGame, Team, TeamRef, Transaction, TransactionItem,
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct LeagueSummary {
    pub league_id: i64,
    pub year: i32,
    pub name: String,
    pub current_week: i64,
    pub num_teams: usize,
}

impl From<&League> for LeagueSummary {
    fn from(league: &League) -> Self {
        Self {
            league_id: league.league_id,
            year: league.year,
            name: league.settings.name.clone(),
            current_week: league.current_week,
            num_teams: league.teams.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlayerView {
    pub name: String,
    #[serde(rename = "playerId")]
    pub player_id: i64,
    pub position: String,
    #[serde(rename = "proTeam")]
    pub pro_team: String,
    #[serde(rename = "injuryStatus")]
    pub injury_status: Option<String>,
    pub injured: bool,
    #[serde(rename = "onTeamId")]
    pub on_team_id: Option<i64>,
    #[serde(rename = "lineupSlot")]
    pub lineup_slot: String,
    pub stats: BTreeMap<String, PlayerStatLine>,
    pub schedule: BTreeMap<String, ScheduledGame>,
    pub total_points: f64,
    pub projected_total_points: f64,
    pub avg_points: f64,
    pub projected_avg_points: f64,
    pub percent_owned: f64,
    pub percent_started: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news: Option<Vec<NewsItem>>,
}

impl From<&Player> for PlayerView {
    fn from(p: &Player) -> Self {
        Self {
            name: p.name.clone(),
            player_id: p.player_id,
            position: p.position.clone(),
            pro_team: p.pro_team.clone(),
            injury_status: p.injury_status.clone(),
            injured: p.injured,
            on_team_id: p.on_team_id,
            lineup_slot: p.lineup_slot.clone(),
            stats: p.stats.clone(),
            schedule: p.schedule.clone(),
            total_points: p.total_points,
            projected_total_points: p.projected_total_points,
            avg_points: p.avg_points,
            projected_avg_points: p.projected_avg_points,
            percent_owned: p.percent_owned,
            percent_started: p.percent_started,
            news: p.news.clone(),
        }
    }
}

/// Either one player or several, as a name lookup may match.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PlayerInfoView {
    Single(PlayerView),
    Many(Vec<PlayerView>),
}

impl From<&PlayerInfo> for PlayerInfoView {
    fn from(info: &PlayerInfo) -> Self {
        match info {
            PlayerInfo::Single(p) => PlayerInfoView::Single(p.into()),
            PlayerInfo::Many(ps) => PlayerInfoView::Many(ps.iter().map(PlayerView::from).collect()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FreeAgentView {
    pub name: String,
    #[serde(rename = "playerId")]
    pub player_id: i64,
    pub position: String,
    #[serde(rename = "proTeam")]
    pub pro_team: String,
    pub avg_points: f64,
    pub projected_avg_points: f64,
}

impl From<&Player> for FreeAgentView {
    fn from(p: &Player) -> Self {
        Self {
            name: p.name.clone(),
            player_id: p.player_id,
            position: p.position.clone(),
            pro_team: p.pro_team.clone(),
            avg_points: p.avg_points,
            projected_avg_points: p.projected_avg_points,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamView {
    pub team_id: i64,
    pub team_name: String,
    pub owners: Vec<Owner>,
    pub wins: i64,
    pub losses: i64,
    pub ties: i64,
    pub points_for: f64,
    pub points_against: f64,
    pub standing: i64,
    pub final_standing: i64,
    pub waiver_rank: i64,
    pub logo_url: String,
    pub roster: Vec<PlayerView>,
}

impl From<&Team> for TeamView {
    fn from(t: &Team) -> Self {
        Self {
            team_id: t.team_id,
            team_name: t.team_name.clone(),
            owners: t.owners.clone(),
            wins: t.wins,
            losses: t.losses,
            ties: t.ties,
            points_for: t.points_for,
            points_against: t.points_against,
            standing: t.standing,
            final_standing: t.final_standing,
            waiver_rank: t.waiver_rank,
            logo_url: t.logo_url.clone(),
            roster: t.roster.iter().map(PlayerView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamSummaryView {
    pub team_id: i64,
    pub team_name: String,
    pub owners: Vec<Owner>,
    pub roster: Vec<String>,
}

impl From<&Team> for TeamSummaryView {
    fn from(t: &Team) -> Self {
        Self {
            team_id: t.team_id,
            team_name: t.team_name.clone(),
            owners: t.owners.clone(),
            roster: t.roster.iter().map(|p| p.name.clone()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StandingView {
    pub team_id: i64,
    pub team_name: String,
    pub wins: i64,
    pub losses: i64,
    pub ties: i64,
    pub points_for: f64,
    pub points_against: f64,
    pub standing: i64,
    pub final_standing: i64,
}

impl From<&Team> for StandingView {
    fn from(t: &Team) -> Self {
        Self {
            team_id: t.team_id,
            team_name: t.team_name.clone(),
            wins: t.wins,
            losses: t.losses,
            ties: t.ties,
            points_for: t.points_for,
            points_against: t.points_against,
            standing: t.standing,
            final_standing: t.final_standing,
        }
    }
}

/// A resolved team renders in full; an id no team claims renders bare.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TeamRefView {
    Team(Box<TeamView>),
    Id(i64),
}

impl From<&TeamRef> for TeamRefView {
    fn from(team: &TeamRef) -> Self {
        match team {
            TeamRef::Resolved(t) => TeamRefView::Team(Box::new(TeamView::from(&**t))),
            TeamRef::Id(id) => TeamRefView::Id(*id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchupView {
    pub home_team: TeamRefView,
    pub away_team: Option<TeamRefView>,
    pub home_score: f64,
    pub away_score: f64,
    pub is_playoff: bool,
    pub matchup_type: String,
}

impl From<&Matchup> for MatchupView {
    fn from(m: &Matchup) -> Self {
        Self {
            home_team: (&m.home_team).into(),
            away_team: m.away_team.as_ref().map(TeamRefView::from),
            home_score: m.home_final_score,
            away_score: m.away_final_score,
            is_playoff: m.is_playoff,
            matchup_type: m.matchup_type.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoxPlayerView {
    #[serde(flatten)]
    pub player: PlayerView,
    pub slot_position: String,
    pub points: f64,
    pub projected_points: f64,
    pub pro_opponent: Option<String>,
    pub game_played: u8,
}

impl From<&BoxPlayer> for BoxPlayerView {
    fn from(b: &BoxPlayer) -> Self {
        Self {
            player: (&b.player).into(),
            slot_position: b.slot_position.clone(),
            points: b.points,
            projected_points: b.projected_points,
            pro_opponent: b.pro_opponent.clone(),
            game_played: b.game_played,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoxScoreView {
    pub home_team: TeamRefView,
    pub home_score: f64,
    pub home_projected: Option<f64>,
    pub home_lineup: Vec<BoxPlayerView>,
    pub away_team: Option<TeamRefView>,
    pub away_score: f64,
    pub away_projected: Option<f64>,
    pub away_lineup: Vec<BoxPlayerView>,
    pub is_playoff: bool,
    pub matchup_type: String,
}

impl From<&BoxScore> for BoxScoreView {
    fn from(b: &BoxScore) -> Self {
        Self {
            home_team: (&b.home_team).into(),
            home_score: b.home_score,
            home_projected: b.home_projected,
            home_lineup: b.home_lineup.iter().map(BoxPlayerView::from).collect(),
            away_team: b.away_team.as_ref().map(TeamRefView::from),
            away_score: b.away_score,
            away_projected: b.away_projected,
            away_lineup: b.away_lineup.iter().map(BoxPlayerView::from).collect(),
            is_playoff: b.is_playoff,
            matchup_type: b.matchup_type.clone(),
        }
    }
}

fn epoch_millis(date: Option<DateTime<Utc>>) -> Option<i64> {
    date.map(|d| d.timestamp_millis())
}

#[derive(Debug, Serialize)]
pub struct ActionView {
    pub team: Option<TeamRefView>,
    pub action: String,
    pub player: Option<PlayerView>,
    pub bid_amount: i64,
}

impl From<&ActivityAction> for ActionView {
    fn from(a: &ActivityAction) -> Self {
        Self {
            team: a.team.as_ref().map(TeamRefView::from),
            action: a.kind.label(),
            player: a.player.as_ref().map(PlayerView::from),
            bid_amount: a.bid_amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityView {
    /// Epoch milliseconds.
    pub date: Option<i64>,
    pub actions: Vec<ActionView>,
}

impl From<&Activity> for ActivityView {
    fn from(a: &Activity) -> Self {
        Self { date: epoch_millis(a.date), actions: a.actions.iter().map(ActionView::from).collect() }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionItemView {
    #[serde(rename = "type")]
    pub kind: String,
    pub player_id: i64,
    pub player_name: Option<String>,
}

impl From<&TransactionItem> for TransactionItemView {
    fn from(item: &TransactionItem) -> Self {
        Self {
            kind: item.kind.clone(),
            player_id: item.player_id,
            player_name: item.player.as_ref().map(|p| p.name.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub team: TeamRefView,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Option<String>,
    pub scoring_period: i64,
    pub date: Option<i64>,
    pub bid_amount: Option<i64>,
    pub items: Vec<TransactionItemView>,
}

impl From<&Transaction> for TransactionView {
    fn from(t: &Transaction) -> Self {
        Self {
            team: (&t.team).into(),
            kind: t.kind.clone(),
            status: t.status.clone(),
            scoring_period: t.scoring_period,
            date: epoch_millis(t.date),
            bid_amount: t.bid_amount,
            items: t.items.iter().map(TransactionItemView::from).collect(),
        }
    }
}
