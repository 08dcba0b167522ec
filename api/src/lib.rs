pub mod client;
pub mod constants;
pub mod espn;
pub mod league;
pub mod mapping;

pub use client::{ApiError, ApiResult, Credentials, EspnClient, Endpoints};
pub use league::{League, PlayerInfo};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// League snapshot types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub name: String,
    pub reg_season_count: i64,
    pub team_count: i64,
    pub playoff_team_count: i64,
    pub keeper_count: i64,
    pub trade_deadline: Option<DateTime<Utc>>,
    pub veto_votes_required: i64,
    pub tie_rule: Option<String>,
    pub playoff_tie_rule: Option<String>,
    pub playoff_seed_tie_rule: Option<String>,
    pub scoring_type: String,
    pub faab: bool,
    pub acquisition_budget: i64,
    pub division_map: HashMap<i64, String>,
    pub position_slot_counts: BTreeMap<String, i64>,
}

/// How box scores are tallied, decided by the league's scoring type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoxScoring {
    #[default]
    Points,
    Categories,
}

impl BoxScoring {
    pub fn from_scoring_type(scoring_type: &str) -> Self {
        match scoring_type {
            "H2H_CATEGORY" | "H2H_MOST_CATEGORIES" => BoxScoring::Categories,
            _ => BoxScoring::Points,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Owner {
    pub id: String,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Team {
    pub team_id: i64,
    pub team_abbrev: String,
    pub team_name: String,
    pub owners: Vec<Owner>,
    pub division_id: i64,
    pub division_name: String,
    pub wins: i64,
    pub losses: i64,
    pub ties: i64,
    pub points_for: f64,
    pub points_against: f64,
    /// In-season seed.
    pub standing: i64,
    /// End-of-season rank; 0 until the season is decided.
    pub final_standing: i64,
    pub waiver_rank: i64,
    pub logo_url: String,
    pub acquisitions: i64,
    pub acquisition_budget_spent: i64,
    pub drops: i64,
    pub trades: i64,
    pub playoff_pct: f64,
    pub draft_projected_rank: i64,
    pub stats: BTreeMap<String, f64>,
    pub roster: Vec<Player>,
    pub schedule: Vec<Matchup>,
}

impl Team {
    /// Rank used for standings: the final rank once decided, else the seed.
    pub fn standings_rank(&self) -> i64 {
        if self.final_standing != 0 { self.final_standing } else { self.standing }
    }
}

/// A team reference inside a matchup, box score, activity or transaction.
///
/// Built as `Id` from the raw upstream id and swapped for `Resolved` once the
/// id is found among the league's teams. Ids no team claims stay `Id`.
#[derive(Debug, Clone)]
pub enum TeamRef {
    Id(i64),
    Resolved(Arc<Team>),
}

impl TeamRef {
    pub fn id(&self) -> i64 {
        match self {
            TeamRef::Id(id) => *id,
            TeamRef::Resolved(team) => team.team_id,
        }
    }

    pub fn team(&self) -> Option<&Team> {
        match self {
            TeamRef::Id(_) => None,
            TeamRef::Resolved(team) => Some(team),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TeamRef::Resolved(_))
    }

    /// Swap a raw id for the matching team. Already-resolved refs and ids
    /// with no match are left untouched.
    pub fn resolve(&mut self, teams: &[Arc<Team>]) {
        if let TeamRef::Id(id) = *self
            && let Some(team) = teams.iter().find(|t| t.team_id == id)
        {
            *self = TeamRef::Resolved(Arc::clone(team));
        }
    }
}

impl Default for TeamRef {
    fn default() -> Self {
        TeamRef::Id(0)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerStatLine {
    pub applied_total: f64,
    pub applied_avg: f64,
    pub team: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub avg: Option<BTreeMap<String, f64>>,
    pub total: Option<BTreeMap<String, f64>>,
}

/// One pro game as seen from the pro schedule.
#[derive(Debug, Clone)]
pub struct ProGame {
    pub date: DateTime<Utc>,
    pub home_pro_team_id: i64,
    pub away_pro_team_id: i64,
}

impl ProGame {
    pub fn opponent_of(&self, pro_team_id: i64) -> i64 {
        if self.away_pro_team_id != pro_team_id { self.away_pro_team_id } else { self.home_pro_team_id }
    }
}

/// Pro team id → scoring period → games that period.
pub type ProSchedule = HashMap<i64, BTreeMap<String, Vec<ProGame>>>;

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledGame {
    pub team: String, // opponent abbreviation
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewsItem {
    pub published: String,
    pub headline: String,
    pub story: String,
}

#[derive(Debug, Clone, Default)]
pub struct Player {
    pub player_id: i64,
    pub name: String,
    pub year: i32,
    pub position: String,
    pub lineup_slot: String,
    pub eligible_slots: Vec<String>,
    pub acquisition_type: Option<String>,
    pub pro_team: String,
    pub injury_status: Option<String>,
    pub injured: bool,
    pub on_team_id: Option<i64>,
    pub pos_rank: Option<i64>,
    /// Keyed `"{year}_total"`, `"{year}_projected"`, `"{year}_last_7"` ...,
    /// or by scoring period for single-period splits.
    pub stats: BTreeMap<String, PlayerStatLine>,
    /// Scoring period → pro game.
    pub schedule: BTreeMap<String, ScheduledGame>,
    pub total_points: f64,
    pub avg_points: f64,
    pub projected_total_points: f64,
    pub projected_avg_points: f64,
    pub percent_owned: f64,
    pub percent_started: f64,
    pub expected_return_date: Option<NaiveDate>,
    pub news: Option<Vec<NewsItem>>,
}

impl Player {
    /// Bare player known only by id and name, as activity messages report it.
    pub fn named(player_id: i64, name: impl Into<String>) -> Self {
        Self { player_id, name: name.into(), ..Self::default() }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryScore {
    pub score: f64,
    pub result: Option<String>,
}

/// Head-to-head category results for one side of a matchup.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryTally {
    pub wins: i64,
    pub ties: i64,
    pub losses: i64,
    pub stats: BTreeMap<String, CategoryScore>,
}

#[derive(Debug, Clone, Default)]
pub struct Matchup {
    pub matchup_period: i64,
    pub home_team: TeamRef,
    pub away_team: Option<TeamRef>, // None on bye weeks
    pub home_final_score: f64,
    pub away_final_score: f64,
    pub home_live_score: Option<f64>,
    pub away_live_score: Option<f64>,
    pub home_categories: Option<CategoryTally>,
    pub away_categories: Option<CategoryTally>,
    pub winner: String,
    pub matchup_type: String,
    pub is_playoff: bool,
}

impl Matchup {
    pub fn resolve_teams(&mut self, teams: &[Arc<Team>]) {
        self.home_team.resolve(teams);
        if let Some(away) = self.away_team.as_mut() {
            away.resolve(teams);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoxPlayer {
    pub player: Player,
    pub slot_position: String,
    pub points: f64,
    pub points_breakdown: BTreeMap<String, f64>,
    pub projected_points: f64,
    pub projected_breakdown: BTreeMap<String, f64>,
    pub pro_opponent: Option<String>,
    pub game_date: Option<DateTime<Utc>>,
    pub game_played: u8, // 0 or 100
}

#[derive(Debug, Clone, Default)]
pub struct BoxScore {
    pub matchup_period: i64,
    pub scoring_period: i64,
    pub home_team: TeamRef,
    pub away_team: Option<TeamRef>,
    pub home_score: f64,
    pub away_score: f64,
    pub home_projected: Option<f64>,
    pub away_projected: Option<f64>,
    pub home_categories: Option<CategoryTally>,
    pub away_categories: Option<CategoryTally>,
    pub home_lineup: Vec<BoxPlayer>,
    pub away_lineup: Vec<BoxPlayer>,
    pub winner: String,
    pub matchup_type: String,
    pub is_playoff: bool,
}

impl BoxScore {
    pub fn resolve_teams(&mut self, teams: &[Arc<Team>]) {
        self.home_team.resolve(teams);
        if let Some(away) = self.away_team.as_mut() {
            away.resolve(teams);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityKind {
    FaAdded,
    WaiverAdded,
    Dropped,
    Traded,
    Moved { position: String },
    Unknown,
}

impl ActivityKind {
    pub fn label(&self) -> String {
        match self {
            ActivityKind::FaAdded => "FA ADDED".into(),
            ActivityKind::WaiverAdded => "WAIVER ADDED".into(),
            ActivityKind::Dropped => "DROPPED".into(),
            ActivityKind::Traded => "TRADED".into(),
            ActivityKind::Moved { position } => format!("MOVED {position}"),
            ActivityKind::Unknown => "UNKNOWN".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityAction {
    pub team: Option<TeamRef>,
    pub kind: ActivityKind,
    pub player: Option<Player>,
    pub bid_amount: i64,
}

#[derive(Debug, Clone)]
pub struct Activity {
    pub date: Option<DateTime<Utc>>,
    pub actions: Vec<ActivityAction>,
}

impl Activity {
    pub fn resolve_teams(&mut self, teams: &[Arc<Team>]) {
        for action in &mut self.actions {
            if let Some(team) = action.team.as_mut() {
                team.resolve(teams);
            }
        }
    }
}

/// One draft selection. `nominating_team` is only set in auction drafts.
#[derive(Debug, Clone, Default)]
pub struct Pick {
    pub team: TeamRef,
    pub player_id: i64,
    pub player_name: String,
    pub round_num: i64,
    pub round_pick: i64,
    pub bid_amount: i64,
    pub keeper_status: bool,
    pub nominating_team: Option<TeamRef>,
}

impl Pick {
    pub fn resolve_teams(&mut self, teams: &[Arc<Team>]) {
        self.team.resolve(teams);
        if let Some(team) = self.nominating_team.as_mut() {
            team.resolve(teams);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionItem {
    pub kind: String,
    pub player: Option<Player>,
    pub player_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct Transaction {
    pub team: TeamRef,
    pub kind: String,
    pub status: Option<String>,
    pub scoring_period: i64,
    pub date: Option<DateTime<Utc>>,
    pub bid_amount: Option<i64>,
    pub items: Vec<TransactionItem>,
}
