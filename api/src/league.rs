use crate::client::{ApiError, ApiResult, EspnClient, views};
use crate::constants::{self, DEFAULT_ACTIVITY_CODES, DEFAULT_TRANSACTION_TYPES, SPORT};
use crate::espn::{
    CommunicationResponse, DraftResponse, LeagueResponse, PlayersResponse, ProPlayer,
    ProScheduleResponse, RosterResponse, ScheduleResponse, ScheduleRow, TransactionsResponse,
};
use crate::mapping::{self, BoxContext, TeamContext};
use crate::{
    Activity, BoxScore, BoxScoring, Matchup, NewsItem, Pick, Player, ProSchedule, Settings, Team,
    Transaction,
};
use chrono::Utc;
use log::{debug, warn};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Result of a player lookup: one player or several, in upstream order.
#[derive(Debug, Clone)]
pub enum PlayerInfo {
    Single(Player),
    Many(Vec<Player>),
}

/// Snapshot of one league-year, plus the client to query it further.
#[derive(Debug, Clone)]
pub struct League {
    pub league_id: i64,
    pub year: i32,
    pub sport: &'static str,
    pub current_matchup_period: i64,
    pub scoring_period_id: i64,
    pub current_week: i64,
    pub first_scoring_period: i64,
    pub final_scoring_period: i64,
    pub previous_seasons: Vec<i32>,
    pub settings: Settings,
    /// Sorted by team id.
    pub teams: Vec<Arc<Team>>,
    /// Player name → id. The first directory entry wins a shared name.
    pub player_map: HashMap<String, i64>,
    /// Player id → name.
    pub player_names: HashMap<i64, String>,
    /// Matchup period → scoring periods with recorded points.
    pub matchup_ids: BTreeMap<i64, Vec<String>>,
    pub pro_schedule: ProSchedule,
    /// Empty until the league has drafted.
    pub draft: Vec<Pick>,
    client: EspnClient,
    box_scoring: BoxScoring,
}

impl League {
    /// Fetch the league core, rosters, player directory, pro schedule and draft.
    pub async fn fetch(client: EspnClient) -> ApiResult<League> {
        let core: LeagueResponse = client.get_league().await?;
        let rosters = client.get_rosters().await?;
        let players = client.get_pro_players().await?;
        let pro_schedule = client.get_pro_schedule().await?;
        let draft = client.get_draft().await?;

        let league = Self::from_parts(client, core, rosters, players, pro_schedule, draft);
        debug!(
            "Fetched league {} ({}): {} teams, {} players, {} picks",
            league.league_id,
            league.year,
            league.teams.len(),
            league.player_map.len(),
            league.draft.len()
        );
        Ok(league)
    }

    fn from_parts(
        client: EspnClient,
        core: LeagueResponse,
        rosters: RosterResponse,
        players: Vec<ProPlayer>,
        pro_schedule: ProScheduleResponse,
        draft: DraftResponse,
    ) -> League {
        let year = client.year();
        let settings = mapping::map_settings(&core.settings);
        let pro_schedule = mapping::map_pro_schedule(pro_schedule);

        let rosters: HashMap<i64, _> = rosters
            .teams
            .iter()
            .filter_map(|t| t.roster.as_ref().map(|r| (t.id, r)))
            .collect();

        let ctx = TeamContext {
            year,
            members: &core.members,
            schedule: &core.schedule,
            division_map: &settings.division_map,
            pro_schedule: Some(&pro_schedule),
        };
        let mut teams: Vec<Team> = core
            .teams
            .iter()
            .map(|t| mapping::map_team(t, rosters.get(&t.id).copied(), &ctx))
            .collect();
        teams.sort_by_key(|t| t.team_id);

        // Schedules point at snapshots of the teams taken before resolution.
        let snapshots: Vec<Arc<Team>> = teams.iter().cloned().map(Arc::new).collect();
        let teams: Vec<Arc<Team>> = teams
            .into_iter()
            .map(|mut team| {
                for matchup in &mut team.schedule {
                    matchup.resolve_teams(&snapshots);
                }
                Arc::new(team)
            })
            .collect();

        let mut player_map: HashMap<String, i64> = HashMap::with_capacity(players.len());
        for p in &players {
            player_map.entry(p.full_name.clone()).or_insert(p.id);
        }
        let player_names: HashMap<i64, String> =
            players.into_iter().map(|p| (p.id, p.full_name)).collect();

        let draft: Vec<Pick> = mapping::map_draft(&draft, &player_names)
            .into_iter()
            .map(|mut pick| {
                pick.resolve_teams(&teams);
                pick
            })
            .collect();

        let current_week = if year < 2018 {
            core.scoring_period_id
        } else {
            core.scoring_period_id.min(core.status.final_scoring_period)
        };

        League {
            league_id: client.league_id(),
            year,
            sport: SPORT,
            current_matchup_period: core.status.current_matchup_period,
            scoring_period_id: core.scoring_period_id,
            current_week,
            first_scoring_period: core.status.first_scoring_period,
            final_scoring_period: core.status.final_scoring_period,
            previous_seasons: core.status.previous_seasons.clone(),
            box_scoring: BoxScoring::from_scoring_type(&settings.scoring_type),
            settings,
            teams,
            player_map,
            player_names,
            matchup_ids: map_matchup_ids(&core.schedule),
            pro_schedule,
            draft,
            client,
        }
    }

    pub fn team(&self, team_id: i64) -> Option<&Arc<Team>> {
        self.teams.iter().find(|t| t.team_id == team_id)
    }

    pub fn player_name(&self, player_id: i64) -> Option<&str> {
        self.player_names.get(&player_id).map(String::as_str)
    }

    /// Teams by final rank once decided, else by seed. Ties keep team order.
    pub fn standings(&self) -> Vec<Arc<Team>> {
        let mut standings = self.teams.clone();
        standings.sort_by_key(|t| t.standings_rank());
        standings
    }

    pub async fn scoreboard(&self, matchup_period: Option<i64>) -> ApiResult<Vec<Matchup>> {
        let period = explicit(matchup_period).unwrap_or(self.current_matchup_period);
        let data: ScheduleResponse = self.client.league_get("", &views(&["mMatchup"]), None).await?;

        Ok(data
            .schedule
            .iter()
            .filter(|row| row.matchup_period_id == period)
            .map(|row| {
                let mut matchup = mapping::map_matchup(row);
                matchup.resolve_teams(&self.teams);
                matchup
            })
            .collect())
    }

    pub async fn recent_activity(
        &self,
        size: usize,
        msg_type: Option<&str>,
        offset: usize,
        include_moved: bool,
    ) -> ApiResult<Vec<Activity>> {
        if self.year < 2019 {
            return Err(ApiError::Usage("Can't use recent activity before 2019".into()));
        }

        let msg_types: Vec<i64> = match msg_type.and_then(constants::activity_code) {
            Some(code) => vec![code],
            None => DEFAULT_ACTIVITY_CODES.to_vec(),
        };
        let filter = json!({
            "topics": {
                "filterType": { "value": ["ACTIVITY_TRANSACTIONS"] },
                "limit": size,
                "limitPerMessageSet": { "value": 25 },
                "offset": offset,
                "sortMessageDate": { "sortPriority": 1, "sortAsc": false },
                "sortFor": { "sortPriority": 2, "sortAsc": false },
                "filterIncludeMessageTypeIds": { "value": msg_types },
            }
        });

        let data: CommunicationResponse = self
            .client
            .league_get("/communication/", &views(&["kona_league_communication"]), Some(&filter))
            .await?;

        Ok(data
            .topics
            .iter()
            .map(|topic| {
                let mut activity = mapping::map_activity(topic, &self.player_names, include_moved);
                activity.resolve_teams(&self.teams);
                activity
            })
            .collect())
    }

    pub async fn transactions(
        &self,
        scoring_period: Option<i64>,
        types: Option<&[&str]>,
    ) -> ApiResult<Vec<Transaction>> {
        let types = types.unwrap_or(&DEFAULT_TRANSACTION_TYPES);
        if let Some(bad) = types.iter().find(|t| !constants::is_transaction_type(t)) {
            return Err(ApiError::Usage(format!("Invalid transaction type: {bad}")));
        }
        let scoring_period = explicit(scoring_period).unwrap_or(self.scoring_period_id);

        let mut params = views(&["mTransactions2"]);
        params.push(("scoringPeriodId", scoring_period.to_string()));
        let filter = json!({ "transactions": { "filterType": { "value": types } } });

        let data: TransactionsResponse =
            self.client.league_get("", &params, Some(&filter)).await?;

        Ok(data
            .transactions
            .iter()
            .map(|raw| {
                let mut tx = mapping::map_transaction(raw, &self.player_names);
                tx.team.resolve(&self.teams);
                tx
            })
            .collect())
    }

    pub async fn free_agents(
        &self,
        week: Option<i64>,
        size: usize,
        position: Option<&str>,
        position_id: Option<i64>,
    ) -> ApiResult<Vec<Player>> {
        if self.year < 2019 {
            return Err(ApiError::Usage("Can't use free agents before 2019".into()));
        }
        let week = explicit(week).unwrap_or(self.current_week);

        let mut slot_filter: Vec<i64> = position.and_then(constants::position_slot).into_iter().collect();
        slot_filter.extend(position_id);

        let mut params = views(&["kona_player_info"]);
        params.push(("scoringPeriodId", week.to_string()));
        let filter = json!({
            "players": {
                "filterStatus": { "value": ["FREEAGENT", "WAIVERS"] },
                "filterSlotIds": { "value": slot_filter },
                "limit": size,
                "sortPercOwned": { "sortPriority": 1, "sortAsc": false },
                "sortDraftRanks": { "sortPriority": 100, "sortAsc": true, "value": "STANDARD" },
            }
        });

        let data: PlayersResponse = self.client.league_get("", &params, Some(&filter)).await?;
        Ok(data
            .players
            .iter()
            .map(|entry| mapping::map_player(entry, self.year, None, None))
            .collect())
    }

    pub async fn box_scores(
        &self,
        matchup_period: Option<i64>,
        scoring_period: Option<i64>,
        matchup_total: bool,
    ) -> ApiResult<Vec<BoxScore>> {
        if self.year < 2019 {
            return Err(ApiError::Usage("Can't use box score before 2019".into()));
        }

        let (matchup_id, scoring_id) = resolve_box_periods(
            matchup_period,
            scoring_period,
            self.current_matchup_period,
            self.current_week,
            &self.matchup_ids,
        );

        let mut params = views(&["mMatchupScore", "mScoreboard"]);
        params.push(("scoringPeriodId", scoring_id.to_string()));
        let filter = json!({ "schedule": { "filterMatchupPeriodIds": { "value": [matchup_id] } } });

        let data: ScheduleResponse = self.client.league_get("", &params, Some(&filter)).await?;

        let ctx = BoxContext {
            year: self.year,
            scoring_period: scoring_id,
            scoring: self.box_scoring,
            matchup_total,
            pro_schedule: &self.pro_schedule,
            now: Utc::now(),
        };
        Ok(data
            .schedule
            .iter()
            .map(|row| {
                let mut box_score = mapping::map_box_score(row, &ctx);
                box_score.resolve_teams(&self.teams);
                box_score
            })
            .collect())
    }

    /// Look players up by name or ids. `None` when nothing resolves or the
    /// upstream card comes back empty.
    pub async fn player_info(
        &self,
        name: Option<&str>,
        player_ids: &[i64],
        include_news: bool,
    ) -> ApiResult<Option<PlayerInfo>> {
        let ids: Vec<i64> = match name {
            Some(name) => self.player_map.get(name).copied().into_iter().collect(),
            None => player_ids.to_vec(),
        };
        if ids.is_empty() {
            return Ok(None);
        }

        let data = self.client.get_player_card(&ids, self.final_scoring_period).await?;

        let mut news: HashMap<i64, Vec<NewsItem>> = HashMap::new();
        if include_news {
            for id in &ids {
                match self.client.get_player_news(*id).await {
                    Ok(raw) => {
                        news.insert(*id, mapping::map_news(raw));
                    }
                    Err(e) => {
                        warn!("News lookup failed for player {id}: {e}");
                        return Err(e);
                    }
                }
            }
        }
        let news_for = |id: i64| include_news.then(|| news.get(&id).cloned().unwrap_or_default());

        let mut players: Vec<Player> = data
            .players
            .iter()
            .map(|entry| {
                let mut player = mapping::map_player(entry, self.year, Some(&self.pro_schedule), None);
                player.news = news_for(player.player_id);
                player
            })
            .collect();

        Ok(match players.len() {
            0 => None,
            1 => {
                let mut player = players.remove(0);
                player.news = news_for(ids[0]);
                Some(PlayerInfo::Single(player))
            }
            _ => Some(PlayerInfo::Many(players)),
        })
    }
}

/// Period 0 never names a real period; it means "current".
fn explicit(period: Option<i64>) -> Option<i64> {
    period.filter(|p| *p != 0)
}

/// Union of scored scoring periods per matchup period, sorted numerically.
pub fn map_matchup_ids(schedule: &[ScheduleRow]) -> BTreeMap<i64, Vec<String>> {
    let mut sets: BTreeMap<i64, BTreeSet<String>> = BTreeMap::new();
    for row in schedule {
        let Some(home) = row.home.as_ref() else { continue };
        if home.points_by_scoring_period.is_empty() {
            continue;
        }
        sets.entry(row.matchup_period_id)
            .or_default()
            .extend(home.points_by_scoring_period.keys().cloned());
    }

    sets.into_iter()
        .map(|(period, ids)| {
            let mut ids: Vec<String> = ids.into_iter().collect();
            ids.sort_by_cached_key(|id| (id.parse::<i64>().unwrap_or(i64::MAX), id.clone()));
            (period, ids)
        })
        .collect()
}

/// Pick the (matchup period, scoring period) pair a box score request uses.
pub fn resolve_box_periods(
    matchup_period: Option<i64>,
    scoring_period: Option<i64>,
    current_matchup_period: i64,
    current_week: i64,
    matchup_ids: &BTreeMap<i64, Vec<String>>,
) -> (i64, i64) {
    match (explicit(matchup_period), explicit(scoring_period)) {
        (Some(matchup), Some(scoring)) => (matchup, scoring),
        (Some(matchup), None) if matchup < current_matchup_period => {
            let scoring = matchup_ids
                .get(&matchup)
                .and_then(|ids| ids.last())
                .and_then(|id| id.parse().ok())
                .unwrap_or(1);
            (matchup, scoring)
        }
        (None, Some(scoring)) if scoring <= current_week => {
            let key = scoring.to_string();
            let matchup = matchup_ids
                .iter()
                .find(|(_, ids)| ids.contains(&key))
                .map(|(matchup, _)| *matchup)
                .unwrap_or(current_matchup_period);
            (matchup, scoring)
        }
        _ => (current_matchup_period, current_week),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Endpoints;
    use mockito::{Matcher, Server};
    use serde_json::Value;

    const LEAGUE_PATH: &str = "/games/fba/seasons/2024/segments/0/leagues/42";

    fn client_for(server: &Server, year: i32) -> EspnClient {
        EspnClient::new(42, year).with_endpoints(Endpoints {
            fantasy: server.url(),
            news: server.url(),
        })
    }

    fn core_body() -> Value {
        json!({
            "id": 42,
            "seasonId": 2024,
            "scoringPeriodId": 40,
            "status": {
                "currentMatchupPeriod": 5,
                "firstScoringPeriod": 1,
                "finalScoringPeriod": 160,
                "previousSeasons": [2022, 2023]
            },
            "settings": {
                "name": "Hoops",
                "size": 3,
                "scheduleSettings": { "divisions": [{ "id": 0, "name": "East" }] },
                "scoringSettings": { "scoringType": "H2H_POINTS" }
            },
            "members": [{ "id": "{A}", "displayName": "alpha" }],
            "teams": [
                { "id": 3, "name": "Threes", "playoffSeed": 1, "rankCalculatedFinal": 0, "owners": ["{A}"] },
                { "id": 1, "name": "Ones", "playoffSeed": 3, "rankCalculatedFinal": 0 },
                { "id": 2, "name": "Twos", "playoffSeed": 2, "rankCalculatedFinal": 0 }
            ],
            "schedule": [
                { "matchupPeriodId": 2, "home": { "teamId": 1, "pointsByScoringPeriod": { "8": 10.0, "9": 12.0, "10": 9.0 } },
                  "away": { "teamId": 2 } },
                { "matchupPeriodId": 3, "home": { "teamId": 3, "pointsByScoringPeriod": { "1": 1.0, "2": 2.0 } },
                  "away": { "teamId": 1 } },
                { "matchupPeriodId": 3, "home": { "teamId": 2, "pointsByScoringPeriod": { "2": 1.0, "3": 2.0 } } }
            ]
        })
    }

    fn rosters_body() -> Value {
        json!({ "teams": [
            { "id": 1, "roster": { "entries": [
                { "playerId": 10, "lineupSlotId": 0,
                  "playerPoolEntry": { "player": { "id": 10, "fullName": "Ten", "defaultPositionId": 1 } } }
            ]}}
        ]})
    }

    fn players_body() -> Value {
        json!([
            { "id": 10, "fullName": "Ten" },
            { "id": 20, "fullName": "Twenty" }
        ])
    }

    fn draft_body() -> Value {
        json!({ "draftDetail": { "drafted": true, "picks": [
            { "teamId": 3, "playerId": 20, "roundId": 1, "roundPickNumber": 1, "bidAmount": 0, "keeper": false },
            { "teamId": 1, "playerId": 10, "roundId": 1, "roundPickNumber": 2, "keeper": true },
            { "teamId": 9, "playerId": 99, "roundId": 1, "roundPickNumber": 3 }
        ]}})
    }

    fn offline_league(server: &Server, year: i32) -> League {
        let core: LeagueResponse = serde_json::from_value(core_body()).unwrap();
        let rosters: RosterResponse = serde_json::from_value(rosters_body()).unwrap();
        let players: Vec<ProPlayer> = serde_json::from_value(players_body()).unwrap();
        League::from_parts(
            client_for(server, year),
            core,
            rosters,
            players,
            ProScheduleResponse::default(),
            serde_json::from_value(draft_body()).unwrap(),
        )
    }

    async fn untouchable(server: &mut Server) -> mockito::Mock {
        server
            .mock("GET", Matcher::Any)
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await
    }

    #[test]
    fn matchup_ids_take_the_sorted_union() {
        let schedule: ScheduleResponse = serde_json::from_value(json!({ "schedule": [
            { "matchupPeriodId": 3, "home": { "teamId": 1, "pointsByScoringPeriod": { "1": 1.0, "2": 1.0 } } },
            { "matchupPeriodId": 3, "home": { "teamId": 2, "pointsByScoringPeriod": { "2": 1.0, "3": 1.0 } } },
            { "matchupPeriodId": 4, "home": { "teamId": 1, "pointsByScoringPeriod": {} } }
        ]}))
        .unwrap();

        let ids = map_matchup_ids(&schedule.schedule);

        assert_eq!(ids, BTreeMap::from([(3, vec!["1".to_owned(), "2".to_owned(), "3".to_owned()])]));
    }

    #[test]
    fn matchup_ids_sort_numerically() {
        let schedule: ScheduleResponse = serde_json::from_value(json!({ "schedule": [
            { "matchupPeriodId": 2, "home": { "teamId": 1, "pointsByScoringPeriod": { "10": 1.0, "9": 1.0, "8": 1.0 } } }
        ]}))
        .unwrap();
        assert_eq!(map_matchup_ids(&schedule.schedule)[&2], vec!["8", "9", "10"]);
    }

    #[test]
    fn box_periods_follow_the_request() {
        let ids = BTreeMap::from([
            (1, vec!["1".to_owned()]),
            (2, vec!["1".to_owned(), "2".to_owned()]),
            (3, vec!["3".to_owned(), "4".to_owned()]),
        ]);

        // Past matchup period: its last recorded scoring period.
        assert_eq!(resolve_box_periods(Some(2), None, 5, 40, &ids), (2, 2));
        // Unknown past matchup period falls back to scoring period 1.
        assert_eq!(resolve_box_periods(Some(4), None, 5, 40, &ids), (4, 1));
        // Current or future matchup period alone is ignored.
        assert_eq!(resolve_box_periods(Some(5), None, 5, 40, &ids), (5, 40));
        // Scoring period alone: first matchup period that recorded it.
        assert_eq!(resolve_box_periods(None, Some(1), 5, 40, &ids), (1, 1));
        assert_eq!(resolve_box_periods(None, Some(4), 5, 40, &ids), (3, 4));
        // Unrecorded scoring period keeps the current matchup period.
        assert_eq!(resolve_box_periods(None, Some(30), 5, 40, &ids), (5, 30));
        // Future scoring period alone is ignored.
        assert_eq!(resolve_box_periods(None, Some(41), 5, 40, &ids), (5, 40));
        assert_eq!(resolve_box_periods(Some(7), Some(99), 5, 40, &ids), (7, 99));
        assert_eq!(resolve_box_periods(None, None, 5, 40, &ids), (5, 40));
        // Period 0 counts as unset.
        assert_eq!(resolve_box_periods(Some(0), None, 5, 40, &ids), (5, 40));
        assert_eq!(resolve_box_periods(None, Some(0), 5, 40, &ids), (5, 40));
        assert_eq!(resolve_box_periods(Some(0), Some(4), 5, 40, &ids), (3, 4));
    }

    #[tokio::test]
    async fn fetch_builds_league_from_five_requests() {
        let mut server = Server::new_async().await;
        let core = server
            .mock("GET", LEAGUE_PATH)
            .match_query(Matcher::Regex("^view=mSettings".into()))
            .with_status(200)
            .with_body(core_body().to_string())
            .create_async()
            .await;
        let rosters = server
            .mock("GET", LEAGUE_PATH)
            .match_query(Matcher::Regex("^view=mRoster$".into()))
            .with_status(200)
            .with_body(rosters_body().to_string())
            .create_async()
            .await;
        let players = server
            .mock("GET", "/games/fba/seasons/2024/players")
            .match_query(Matcher::UrlEncoded("view".into(), "players_wl".into()))
            .with_status(200)
            .with_body(players_body().to_string())
            .create_async()
            .await;
        let pro = server
            .mock("GET", "/games/fba/seasons/2024")
            .match_query(Matcher::UrlEncoded("view".into(), "proTeamSchedules_wl".into()))
            .with_status(200)
            .with_body(r#"{"settings": {"proTeams": []}}"#)
            .create_async()
            .await;
        let draft = server
            .mock("GET", LEAGUE_PATH)
            .match_query(Matcher::Regex("^view=mDraftDetail$".into()))
            .with_status(200)
            .with_body(draft_body().to_string())
            .create_async()
            .await;

        let league = League::fetch(client_for(&server, 2024)).await.unwrap();

        core.assert_async().await;
        rosters.assert_async().await;
        players.assert_async().await;
        pro.assert_async().await;
        draft.assert_async().await;

        assert_eq!(league.settings.name, "Hoops");
        assert_eq!(league.current_week, 40);
        assert_eq!(league.previous_seasons, vec![2022, 2023]);
        let ids: Vec<i64> = league.teams.iter().map(|t| t.team_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(league.player_map["Twenty"], 20);
        assert_eq!(league.player_name(10), Some("Ten"));
        assert_eq!(league.matchup_ids[&3], vec!["1", "2", "3"]);
        assert_eq!(league.draft.len(), 3);
    }

    #[tokio::test]
    async fn draft_picks_resolve_teams_and_name_players() {
        let server = Server::new_async().await;
        let league = offline_league(&server, 2024);

        let first = &league.draft[0];
        assert_eq!(first.team.team().map(|t| t.team_name.as_str()), Some("Threes"));
        assert_eq!(first.player_name, "Twenty");
        assert!(league.draft[1].keeper_status);
        assert_eq!(league.draft[1].player_name, "Ten");
        // Team 9 is not in the league and player 99 is not in the directory.
        assert!(!league.draft[2].team.is_resolved());
        assert_eq!(league.draft[2].team.id(), 9);
        assert_eq!(league.draft[2].player_name, "");
    }

    #[tokio::test]
    async fn shared_player_names_keep_the_first_directory_entry() {
        let server = Server::new_async().await;
        let core: LeagueResponse = serde_json::from_value(core_body()).unwrap();
        let players: Vec<ProPlayer> = serde_json::from_value(json!([
            { "id": 100, "fullName": "Same Name" },
            { "id": 200, "fullName": "Same Name" }
        ]))
        .unwrap();

        let league = League::from_parts(
            client_for(&server, 2024),
            core,
            RosterResponse::default(),
            players,
            ProScheduleResponse::default(),
            DraftResponse::default(),
        );

        assert_eq!(league.player_map["Same Name"], 100);
        assert_eq!(league.player_name(200), Some("Same Name"));
        assert!(league.draft.is_empty());
    }

    #[tokio::test]
    async fn team_schedules_resolve_against_the_league() {
        let server = Server::new_async().await;
        let league = offline_league(&server, 2024);

        let ones = league.team(1).unwrap();
        assert_eq!(ones.roster.len(), 1);
        assert_eq!(ones.roster[0].name, "Ten");
        assert_eq!(ones.schedule.len(), 2);
        let first = &ones.schedule[0];
        assert_eq!(first.home_team.team().map(|t| t.team_name.as_str()), Some("Ones"));
        assert_eq!(
            first.away_team.as_ref().and_then(|t| t.team()).map(|t| t.team_name.as_str()),
            Some("Twos")
        );
        assert!(league.team(99).is_none());
    }

    #[tokio::test]
    async fn standings_order_by_rank_and_keep_ties_stable() {
        let server = Server::new_async().await;
        let mut league = offline_league(&server, 2024);
        league.teams = vec![
            Arc::new(Team { team_id: 1, standing: 2, final_standing: 0, ..Team::default() }),
            Arc::new(Team { team_id: 2, standing: 4, final_standing: 1, ..Team::default() }),
            Arc::new(Team { team_id: 3, standing: 2, final_standing: 0, ..Team::default() }),
            Arc::new(Team { team_id: 4, standing: 3, final_standing: 0, ..Team::default() }),
        ];

        let order: Vec<i64> = league.standings().iter().map(|t| t.team_id).collect();

        assert_eq!(order, vec![2, 1, 3, 4]);
        assert_eq!(league.teams.len(), 4);
    }

    #[tokio::test]
    async fn scoreboard_keeps_unknown_team_ids() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", LEAGUE_PATH)
            .match_query(Matcher::Regex("^view=mMatchup$".into()))
            .with_status(200)
            .with_body(
                json!({ "schedule": [
                    { "matchupPeriodId": 5, "home": { "teamId": 1, "totalPoints": 10.0 },
                      "away": { "teamId": 77, "totalPoints": 8.0 } },
                    { "matchupPeriodId": 5, "home": { "teamId": 88 } },
                    { "matchupPeriodId": 4, "home": { "teamId": 2 }, "away": { "teamId": 3 } }
                ]})
                .to_string(),
            )
            .create_async()
            .await;
        let league = offline_league(&server, 2024);

        let matchups = league.scoreboard(None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(matchups.len(), 2);
        assert!(matchups[0].home_team.is_resolved());
        let away = matchups[0].away_team.as_ref().unwrap();
        assert!(!away.is_resolved());
        assert_eq!(away.id(), 77);
        assert_eq!(matchups[1].home_team.id(), 88);
        assert!(matchups[1].away_team.is_none());
    }

    #[tokio::test]
    async fn scoreboard_period_zero_means_current() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", LEAGUE_PATH)
            .match_query(Matcher::Regex("^view=mMatchup$".into()))
            .with_status(200)
            .with_body(
                json!({ "schedule": [
                    { "matchupPeriodId": 5, "home": { "teamId": 1 }, "away": { "teamId": 2 } },
                    { "matchupPeriodId": 4, "home": { "teamId": 2 }, "away": { "teamId": 3 } }
                ]})
                .to_string(),
            )
            .create_async()
            .await;
        let league = offline_league(&server, 2024);

        let matchups = league.scoreboard(Some(0)).await.unwrap();

        assert_eq!(matchups.len(), 1);
        assert_eq!(matchups[0].home_team.id(), 1);
    }

    #[tokio::test]
    async fn free_agents_before_2019_never_hit_the_network() {
        let mut server = Server::new_async().await;
        let mock = untouchable(&mut server).await;
        let league = offline_league(&server, 2018);

        let err = league.free_agents(None, 50, None, None).await.unwrap_err();

        assert!(matches!(err, ApiError::Usage(_)), "got {err:?}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn activity_and_box_scores_before_2019_are_usage_errors() {
        let mut server = Server::new_async().await;
        let mock = untouchable(&mut server).await;
        let league = offline_league(&server, 2017);

        let activity = league.recent_activity(25, None, 0, false).await.unwrap_err();
        let boxes = league.box_scores(Some(1), None, true).await.unwrap_err();

        assert!(matches!(activity, ApiError::Usage(_)));
        assert!(matches!(boxes, ApiError::Usage(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unknown_transaction_type_is_rejected_before_request() {
        let mut server = Server::new_async().await;
        let mock = untouchable(&mut server).await;
        let league = offline_league(&server, 2024);

        let err = league.transactions(None, Some(&["WAIVER", "KEEPER"][..])).await.unwrap_err();

        assert!(matches!(err, ApiError::Usage(ref msg) if msg.contains("KEEPER")), "got {err:?}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn transactions_default_to_current_period_and_types() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", LEAGUE_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("view".into(), "mTransactions2".into()),
                Matcher::UrlEncoded("scoringPeriodId".into(), "40".into()),
            ]))
            .match_header(
                "x-fantasy-filter",
                r#"{"transactions":{"filterType":{"value":["FREEAGENT","WAIVER","WAIVER_ERROR"]}}}"#,
            )
            .with_status(200)
            .with_body(
                json!({ "transactions": [
                    { "teamId": 2, "type": "FREEAGENT", "scoringPeriodId": 40,
                      "items": [{ "type": "ADD", "playerId": 20 }] }
                ]})
                .to_string(),
            )
            .create_async()
            .await;
        let league = offline_league(&server, 2024);

        let txs = league.transactions(None, None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(txs.len(), 1);
        assert!(txs[0].team.is_resolved());
        assert_eq!(txs[0].items[0].player.as_ref().unwrap().name, "Twenty");
    }

    #[tokio::test]
    async fn free_agents_filter_by_position_slot() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", LEAGUE_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("view".into(), "kona_player_info".into()),
                Matcher::UrlEncoded("scoringPeriodId".into(), "12".into()),
            ]))
            .match_header(
                "x-fantasy-filter",
                Matcher::AllOf(vec![
                    Matcher::Regex(r#""filterSlotIds":\{"value":\[4,11\]\}"#.into()),
                    Matcher::Regex(r#""limit":5"#.into()),
                ]),
            )
            .with_status(200)
            .with_body(
                json!({ "players": [
                    { "id": 30, "player": { "id": 30, "fullName": "Big Man", "defaultPositionId": 5 } }
                ]})
                .to_string(),
            )
            .create_async()
            .await;
        let league = offline_league(&server, 2024);

        let players = league.free_agents(Some(12), 5, Some("C"), Some(11)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Big Man");
        assert_eq!(players[0].position, "C");
    }

    #[tokio::test]
    async fn recent_activity_narrows_message_types() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", format!("{LEAGUE_PATH}/communication/").as_str())
            .match_query(Matcher::UrlEncoded("view".into(), "kona_league_communication".into()))
            .match_header(
                "x-fantasy-filter",
                Matcher::Regex(r#""filterIncludeMessageTypeIds":\{"value":\[244\]\}"#.into()),
            )
            .with_status(200)
            .with_body(
                json!({ "topics": [{ "date": 1_700_000_000_000_i64, "messages": [
                    { "messageTypeId": 244, "targetId": 10, "from": 3, "to": 1 }
                ]}]})
                .to_string(),
            )
            .create_async()
            .await;
        let league = offline_league(&server, 2024);

        let activity = league.recent_activity(10, Some("TRADED"), 0, false).await.unwrap();

        mock.assert_async().await;
        let action = &activity[0].actions[0];
        assert_eq!(action.kind.label(), "TRADED");
        assert_eq!(action.team.as_ref().and_then(|t| t.team()).map(|t| t.team_id), Some(3));
        assert_eq!(action.player.as_ref().map(|p| p.name.as_str()), Some("Ten"));
    }

    #[tokio::test]
    async fn box_scores_resolve_past_matchup_to_last_scoring_period() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", LEAGUE_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("view".into(), "mMatchupScore".into()),
                Matcher::UrlEncoded("view".into(), "mScoreboard".into()),
                Matcher::UrlEncoded("scoringPeriodId".into(), "10".into()),
            ]))
            .match_header(
                "x-fantasy-filter",
                r#"{"schedule":{"filterMatchupPeriodIds":{"value":[2]}}}"#,
            )
            .with_status(200)
            .with_body(
                json!({ "schedule": [
                    { "matchupPeriodId": 2, "home": { "teamId": 1, "totalPoints": 50.0 },
                      "away": { "teamId": 2, "totalPoints": 40.0 } }
                ]})
                .to_string(),
            )
            .create_async()
            .await;
        let league = offline_league(&server, 2024);

        let boxes = league.box_scores(Some(2), None, true).await.unwrap();

        mock.assert_async().await;
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].scoring_period, 10);
        assert_eq!(boxes[0].home_score, 50.0);
        assert!(boxes[0].home_team.is_resolved());
        assert!(boxes[0].away_team.as_ref().unwrap().is_resolved());
    }

    #[tokio::test]
    async fn player_info_returns_players_in_upstream_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", LEAGUE_PATH)
            .match_query(Matcher::UrlEncoded("view".into(), "kona_playercard".into()))
            .with_status(200)
            .with_body(
                json!({ "players": [
                    { "id": 20, "player": { "id": 20, "fullName": "Twenty" } },
                    { "id": 10, "player": { "id": 10, "fullName": "Ten" } }
                ]})
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let league = offline_league(&server, 2024);

        let info = league.player_info(None, &[10, 20], false).await.unwrap();

        mock.assert_async().await;
        match info {
            Some(PlayerInfo::Many(players)) => {
                let ids: Vec<i64> = players.iter().map(|p| p.player_id).collect();
                assert_eq!(ids, vec![20, 10]);
                assert!(players.iter().all(|p| p.news.is_none()));
            }
            other => panic!("expected two players, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn player_info_by_name_attaches_news_when_asked() {
        let mut server = Server::new_async().await;
        let card = server
            .mock("GET", LEAGUE_PATH)
            .match_query(Matcher::UrlEncoded("view".into(), "kona_playercard".into()))
            .match_header("x-fantasy-filter", Matcher::Regex(r#""filterIds":\{"value":\[20\]\}"#.into()))
            .with_status(200)
            .with_body(json!({ "players": [{ "id": 20, "player": { "id": 20, "fullName": "Twenty" } }] }).to_string())
            .create_async()
            .await;
        let news = server
            .mock("GET", "/games/fba/news/players")
            .match_query(Matcher::UrlEncoded("playerId".into(), "20".into()))
            .with_status(200)
            .with_body(json!({ "news": { "feed": [{ "headline": "Back from injury" }] } }).to_string())
            .create_async()
            .await;
        let league = offline_league(&server, 2024);

        let info = league.player_info(Some("Twenty"), &[], true).await.unwrap();

        card.assert_async().await;
        news.assert_async().await;
        match info {
            Some(PlayerInfo::Single(player)) => {
                let news = player.news.unwrap();
                assert_eq!(news.len(), 1);
                assert_eq!(news[0].headline, "Back from injury");
            }
            other => panic!("expected one player, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn player_info_without_a_match_skips_the_request() {
        let mut server = Server::new_async().await;
        let mock = untouchable(&mut server).await;
        let league = offline_league(&server, 2024);

        assert!(league.player_info(Some("Nobody"), &[], false).await.unwrap().is_none());
        assert!(league.player_info(None, &[], false).await.unwrap().is_none());
        mock.assert_async().await;
    }
}
