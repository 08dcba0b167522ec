//! Serde shapes of the ESPN fantasy basketball responses, as sent on the wire.
//! `mapping.rs` turns them into the domain types in `lib.rs`.

use serde::Deserialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// League  (segments/0/leagues/{id})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct LeagueResponse {
    pub id: i64,
    pub season_id: i32,
    pub scoring_period_id: i64,
    pub status: LeagueStatus,
    pub settings: EspnSettings,
    pub members: Vec<EspnMember>,
    pub teams: Vec<EspnTeam>,
    pub schedule: Vec<ScheduleRow>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct LeagueStatus {
    pub current_matchup_period: i64,
    pub first_scoring_period: i64,
    pub final_scoring_period: i64,
    pub previous_seasons: Vec<i32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct EspnSettings {
    pub name: String,
    pub size: i64,
    pub schedule_settings: ScheduleSettings,
    pub scoring_settings: ScoringSettings,
    pub trade_settings: TradeSettings,
    pub draft_settings: DraftSettings,
    pub acquisition_settings: AcquisitionSettings,
    pub roster_settings: RosterSettings,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleSettings {
    pub matchup_period_count: i64,
    pub playoff_team_count: i64,
    pub playoff_seeding_rule: Option<String>,
    pub divisions: Vec<EspnDivision>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct EspnDivision {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringSettings {
    pub scoring_type: String, // "H2H_POINTS", "H2H_CATEGORY", "H2H_MOST_CATEGORIES", "ROTO"
    pub matchup_tie_rule: Option<String>,
    pub playoff_matchup_tie_rule: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct TradeSettings {
    pub veto_votes_required: i64,
    pub deadline_date: i64, // epoch millis, 0 when unset
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftSettings {
    pub keeper_count: i64,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct AcquisitionSettings {
    pub is_using_acquisition_budget: bool,
    pub acquisition_budget: i64,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct RosterSettings {
    /// Slot id (as a string key) → number of lineup slots.
    pub lineup_slot_counts: HashMap<String, i64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct EspnMember {
    pub id: String, // "{GUID}" SWID-style id
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Teams  (mTeam / mRoster / mStandings views)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct EspnTeam {
    pub id: i64,
    pub abbrev: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>, // pre-2020 leagues split the name in two
    pub nickname: Option<String>,
    pub division_id: i64,
    pub owners: Vec<String>,
    pub playoff_seed: i64,
    pub rank_calculated_final: i64,
    pub record: TeamRecord,
    pub transaction_counter: TransactionCounter,
    pub current_simulation_results: SimulationResults,
    pub draft_day_projected_rank: i64,
    pub waiver_rank: i64,
    pub logo: Option<String>,
    pub values_by_stat: HashMap<String, f64>,
    pub roster: Option<EspnRoster>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TeamRecord {
    pub overall: RecordLine,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordLine {
    pub wins: i64,
    pub losses: i64,
    pub ties: i64,
    pub points_for: f64,
    pub points_against: f64,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionCounter {
    pub acquisitions: i64,
    pub acquisition_budget_spent: i64,
    pub drops: i64,
    pub trades: i64,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationResults {
    pub playoff_pct: f64, // 0.0..=1.0
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct EspnRoster {
    pub applied_stat_total: Option<f64>,
    pub entries: Vec<PlayerEntry>,
}

/// Rosters arrive on their own request; only the team id and roster matter.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RosterResponse {
    pub teams: Vec<EspnTeam>,
}

// ---------------------------------------------------------------------------
// Players  (roster entries, kona_player_info, kona_playercard)
// ---------------------------------------------------------------------------

/// One player record. Roster entries nest the player under
/// `playerPoolEntry.player`; free agent and player card records use `player`.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerEntry {
    pub id: Option<i64>,
    pub player_id: Option<i64>,
    pub lineup_slot_id: Option<i64>,
    pub acquisition_type: Option<String>,
    pub injury_status: Option<String>,
    pub on_team_id: Option<i64>,
    pub status: Option<String>,
    pub player_pool_entry: Option<PlayerPoolEntry>,
    pub player: Option<EspnPlayer>,
    pub ratings: HashMap<String, EspnRating>,
}

impl PlayerEntry {
    pub fn inner(&self) -> Option<&EspnPlayer> {
        self.player_pool_entry
            .as_ref()
            .and_then(|p| p.player.as_ref())
            .or(self.player.as_ref())
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerPoolEntry {
    pub id: Option<i64>,
    pub on_team_id: Option<i64>,
    pub player: Option<EspnPlayer>,
    pub ratings: HashMap<String, EspnRating>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct EspnPlayer {
    pub id: Option<i64>,
    pub full_name: Option<String>,
    pub default_position_id: Option<i64>,
    pub eligible_slots: Vec<i64>,
    pub pro_team_id: Option<i64>,
    pub injury_status: Option<String>,
    pub injured: Option<bool>,
    pub stats: Vec<StatSplit>,
    pub ownership: Option<Ownership>,
    pub expected_return_date: Option<Vec<i32>>, // [year, month, day]
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct StatSplit {
    pub id: String,
    pub season_id: i32,
    pub scoring_period_id: i64,
    pub stat_source_id: i64, // 0 actual, 1 projected
    pub applied_total: Option<f64>,
    pub applied_average: Option<f64>,
    pub stats: HashMap<String, f64>,
    pub average_stats: Option<HashMap<String, f64>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct Ownership {
    pub percent_owned: Option<f64>,
    pub percent_started: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct EspnRating {
    pub positional_ranking: Option<i64>,
    pub total_ranking: Option<i64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PlayersResponse {
    pub players: Vec<PlayerEntry>,
}

/// Entry of the season-wide player directory (`players_wl` view).
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct ProPlayer {
    pub id: i64,
    pub full_name: String,
}

// ---------------------------------------------------------------------------
// Schedule  (mMatchup / mMatchupScore / mScoreboard views)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleRow {
    pub id: i64,
    pub matchup_period_id: i64,
    pub playoff_tier_type: Option<String>, // "NONE" outside the playoffs
    pub winner: Option<String>,            // "HOME" | "AWAY" | "TIE" | "UNDECIDED"
    pub home: Option<ScheduleSide>,
    pub away: Option<ScheduleSide>, // absent on bye weeks
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleSide {
    pub team_id: i64,
    pub total_points: f64,
    pub total_points_live: Option<f64>,
    pub total_projected_points_live: Option<f64>,
    /// Scoring period id (as a string key) → points scored in it.
    pub points_by_scoring_period: HashMap<String, f64>,
    pub cumulative_score: Option<CumulativeScore>,
    pub roster_for_current_scoring_period: Option<EspnRoster>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct CumulativeScore {
    pub wins: i64,
    pub ties: i64,
    pub losses: i64,
    pub score_by_stat: Option<HashMap<String, StatScore>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct StatScore {
    pub score: f64,
    pub result: Option<String>, // "WIN" | "LOSS" | "TIE"
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ScheduleResponse {
    pub schedule: Vec<ScheduleRow>,
}

// ---------------------------------------------------------------------------
// Pro schedules  (proTeamSchedules_wl view)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ProScheduleResponse {
    pub settings: ProScheduleSettings,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct ProScheduleSettings {
    pub pro_teams: Vec<ProTeam>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct ProTeam {
    pub id: i64,
    pub abbrev: Option<String>,
    /// Scoring period id (as a string key) → games played in it.
    pub pro_games_by_scoring_period: HashMap<String, Vec<ProGameWire>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct ProGameWire {
    pub id: i64,
    pub date: i64, // epoch millis
    pub home_pro_team_id: i64,
    pub away_pro_team_id: i64,
    pub scoring_period_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Draft  (mDraftDetail view)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftResponse {
    pub draft_detail: DraftDetail,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftDetail {
    pub drafted: bool,
    pub picks: Vec<DraftPick>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftPick {
    pub team_id: i64,
    pub player_id: i64,
    pub round_id: i64,
    pub round_pick_number: i64,
    pub bid_amount: i64,
    pub keeper: bool,
    pub nominating_team_id: i64, // 0 outside auction drafts
}

// ---------------------------------------------------------------------------
// Communication  (kona_league_communication view)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CommunicationResponse {
    pub topics: Vec<Topic>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Topic {
    pub id: Option<String>,
    pub date: i64, // epoch millis
    pub messages: Vec<TopicMessage>,
}

/// `from`, `to` and `for` are overloaded: team ids, lineup slot ids, or the
/// waiver bid depending on the message type.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct TopicMessage {
    pub message_type_id: i64,
    pub target_id: Option<i64>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    #[serde(rename = "for")]
    pub for_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Transactions  (mTransactions2 view)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TransactionsResponse {
    pub transactions: Vec<EspnTransaction>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct EspnTransaction {
    pub id: Option<String>,
    pub team_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Option<String>,
    pub scoring_period_id: i64,
    pub process_date: Option<i64>,
    pub bid_amount: Option<i64>,
    pub items: Vec<EspnTransactionItem>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct EspnTransactionItem {
    #[serde(rename = "type")]
    pub kind: String, // "ADD" | "DROP" | "LINEUP" ...
    pub player_id: i64,
    pub from_team_id: Option<i64>,
    pub to_team_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Player news  (site fantasy news API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct NewsResponse {
    pub news: Option<NewsFeed>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct NewsFeed {
    pub feed: Vec<NewsItemWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct NewsItemWire {
    pub headline: Option<String>,
    pub story: Option<String>,
    pub published: Option<String>,
}
