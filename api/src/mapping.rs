use crate::constants::{
    self, MSG_DROPPED, MSG_DROPPED_FOR, MSG_DROPPED_WAIVER, MSG_FA_ADDED, MSG_MOVED, MSG_TRADED,
    MSG_WAIVER_ADDED,
};
use crate::espn::{
    CumulativeScore, DraftResponse, EspnMember, EspnRoster, EspnSettings, EspnTeam,
    EspnTransaction, NewsResponse, PlayerEntry, ProScheduleResponse, ScheduleRow, ScheduleSide,
    Topic, TopicMessage,
};
use crate::{
    Activity, ActivityAction, ActivityKind, BoxPlayer, BoxScore, BoxScoring, CategoryScore,
    CategoryTally, Matchup, NewsItem, Owner, Pick, Player, PlayerStatLine, ProGame, ProSchedule,
    ScheduledGame, Settings, Team, TeamRef, Transaction, TransactionItem,
};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Mapping: league settings and teams
// ---------------------------------------------------------------------------

pub fn map_settings(raw: &EspnSettings) -> Settings {
    let division_map = raw
        .schedule_settings
        .divisions
        .iter()
        .map(|d| (d.id, d.name.clone()))
        .collect();

    let position_slot_counts = raw
        .roster_settings
        .lineup_slot_counts
        .iter()
        .filter_map(|(slot, count)| {
            let label = slot.parse().ok().and_then(constants::position_label)?;
            Some((label.to_owned(), *count))
        })
        .collect();

    let trade_deadline = Some(raw.trade_settings.deadline_date)
        .filter(|ms| *ms > 0)
        .and_then(DateTime::from_timestamp_millis);

    Settings {
        name: raw.name.clone(),
        reg_season_count: raw.schedule_settings.matchup_period_count,
        team_count: raw.size,
        playoff_team_count: raw.schedule_settings.playoff_team_count,
        keeper_count: raw.draft_settings.keeper_count,
        trade_deadline,
        veto_votes_required: raw.trade_settings.veto_votes_required,
        tie_rule: raw.scoring_settings.matchup_tie_rule.clone(),
        playoff_tie_rule: raw.scoring_settings.playoff_matchup_tie_rule.clone(),
        playoff_seed_tie_rule: raw.schedule_settings.playoff_seeding_rule.clone(),
        scoring_type: raw.scoring_settings.scoring_type.clone(),
        faab: raw.acquisition_settings.is_using_acquisition_budget,
        acquisition_budget: raw.acquisition_settings.acquisition_budget,
        division_map,
        position_slot_counts,
    }
}

fn map_owners(team: &EspnTeam, members: &[EspnMember]) -> Vec<Owner> {
    members
        .iter()
        .filter(|m| team.owners.contains(&m.id))
        .map(|m| Owner {
            id: m.id.clone(),
            display_name: m.display_name.clone(),
            first_name: m.first_name.clone(),
            last_name: m.last_name.clone(),
        })
        .collect()
}

/// Everything a team needs besides its own record.
pub struct TeamContext<'a> {
    pub year: i32,
    pub members: &'a [EspnMember],
    pub schedule: &'a [ScheduleRow],
    pub division_map: &'a HashMap<i64, String>,
    pub pro_schedule: Option<&'a ProSchedule>,
}

/// Map one team. Schedule entries keep raw team ids; the league resolves
/// them once every team exists.
pub fn map_team(raw: &EspnTeam, roster: Option<&EspnRoster>, ctx: &TeamContext<'_>) -> Team {
    let team_name = match raw.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => format!(
            "{} {}",
            raw.location.as_deref().unwrap_or("Unknown"),
            raw.nickname.as_deref().unwrap_or("Unknown")
        ),
    };

    let roster: Vec<Player> = roster
        .or(raw.roster.as_ref())
        .map(|r| {
            r.entries
                .iter()
                .map(|entry| map_player(entry, ctx.year, ctx.pro_schedule, None))
                .collect()
        })
        .unwrap_or_default();

    // Bye rows carry no away side and are not part of a team's schedule.
    let schedule: Vec<Matchup> = ctx
        .schedule
        .iter()
        .filter(|row| {
            let home = row.home.as_ref().map(|s| s.team_id);
            let away = row.away.as_ref().map(|s| s.team_id);
            away.is_some() && (home == Some(raw.id) || away == Some(raw.id))
        })
        .map(map_matchup)
        .collect();

    let overall = &raw.record.overall;
    Team {
        team_id: raw.id,
        team_abbrev: raw.abbrev.clone().unwrap_or_default(),
        team_name,
        owners: map_owners(raw, ctx.members),
        division_id: raw.division_id,
        division_name: ctx.division_map.get(&raw.division_id).cloned().unwrap_or_default(),
        wins: overall.wins,
        losses: overall.losses,
        ties: overall.ties,
        points_for: overall.points_for,
        points_against: overall.points_against,
        standing: raw.playoff_seed,
        final_standing: raw.rank_calculated_final,
        waiver_rank: raw.waiver_rank,
        logo_url: raw.logo.clone().unwrap_or_default(),
        acquisitions: raw.transaction_counter.acquisitions,
        acquisition_budget_spent: raw.transaction_counter.acquisition_budget_spent,
        drops: raw.transaction_counter.drops,
        trades: raw.transaction_counter.trades,
        playoff_pct: raw.current_simulation_results.playoff_pct * 100.0,
        draft_projected_rank: raw.draft_day_projected_rank,
        stats: label_stats(&raw.values_by_stat),
        roster,
        schedule,
    }
}

// ---------------------------------------------------------------------------
// Mapping: players
// ---------------------------------------------------------------------------

pub fn map_pro_schedule(raw: ProScheduleResponse) -> ProSchedule {
    raw.settings
        .pro_teams
        .into_iter()
        .filter(|team| team.id != 0 && !team.pro_games_by_scoring_period.is_empty())
        .map(|team| {
            let periods: BTreeMap<String, Vec<ProGame>> = team
                .pro_games_by_scoring_period
                .into_iter()
                .map(|(period, games)| {
                    let games: Vec<ProGame> = games
                        .into_iter()
                        .filter_map(|g| {
                            Some(ProGame {
                                date: DateTime::from_timestamp_millis(g.date)?,
                                home_pro_team_id: g.home_pro_team_id,
                                away_pro_team_id: g.away_pro_team_id,
                            })
                        })
                        .collect();
                    (period, games)
                })
                .collect();
            (team.id, periods)
        })
        .collect()
}

pub fn map_news(raw: NewsResponse) -> Vec<NewsItem> {
    raw.news
        .map(|n| n.feed)
        .unwrap_or_default()
        .into_iter()
        .map(|item| NewsItem {
            published: item.published.unwrap_or_default(),
            headline: item.headline.unwrap_or_default(),
            story: item.story.unwrap_or_default(),
        })
        .collect()
}

pub fn map_player(
    entry: &PlayerEntry,
    year: i32,
    pro_schedule: Option<&ProSchedule>,
    news: Option<Vec<NewsItem>>,
) -> Player {
    let inner = entry.inner().cloned().unwrap_or_default();
    let pool = entry.player_pool_entry.as_ref();

    let player_id = inner
        .id
        .or(entry.player_id)
        .or(pool.and_then(|p| p.id))
        .or(entry.id)
        .unwrap_or_default();
    let pro_team_id = inner.pro_team_id.unwrap_or_default();

    let schedule = pro_schedule
        .and_then(|s| s.get(&pro_team_id))
        .map(|periods| player_schedule(periods, pro_team_id))
        .unwrap_or_default();

    let mut stats = BTreeMap::new();
    for split in inner.stats.iter().filter(|s| s.season_id == year) {
        let key = stat_id_pretty(&split.id, split.scoring_period_id);
        let game = schedule.get(&key);
        let (total, avg) = if split.stats.is_empty() {
            (None, None)
        } else {
            (
                Some(label_stats(&split.stats)),
                split.average_stats.as_ref().map(label_stats),
            )
        };
        stats.insert(
            key,
            PlayerStatLine {
                applied_total: split.applied_total.unwrap_or_default(),
                applied_avg: round2(split.applied_average.unwrap_or_default()),
                team: game.map(|g| g.team.clone()),
                date: game.map(|g| g.date),
                avg,
                total,
            },
        );
    }

    let season_line = |kind: &str| stats.get(&format!("{year}_{kind}"));
    let total_points = season_line("total").map(|s| s.applied_total).unwrap_or_default();
    let avg_points = season_line("total").map(|s| s.applied_avg).unwrap_or_default();
    let projected_total_points =
        season_line("projected").map(|s| s.applied_total).unwrap_or_default();
    let projected_avg_points = season_line("projected").map(|s| s.applied_avg).unwrap_or_default();

    let ownership = inner.ownership.clone().unwrap_or_default();
    let ratings = if entry.ratings.is_empty() {
        pool.map(|p| &p.ratings)
    } else {
        Some(&entry.ratings)
    };

    Player {
        player_id,
        name: inner.full_name.clone().unwrap_or_default(),
        year,
        position: inner
            .default_position_id
            .and_then(constants::default_position_label)
            .unwrap_or_default()
            .to_owned(),
        lineup_slot: entry
            .lineup_slot_id
            .and_then(constants::position_label)
            .unwrap_or_default()
            .to_owned(),
        eligible_slots: inner
            .eligible_slots
            .iter()
            .filter_map(|slot| constants::position_label(*slot))
            .map(str::to_owned)
            .collect(),
        acquisition_type: entry.acquisition_type.clone(),
        pro_team: pro_team_label(pro_team_id),
        injury_status: inner.injury_status.clone().or(entry.injury_status.clone()),
        injured: inner.injured.unwrap_or(false),
        on_team_id: pool.and_then(|p| p.on_team_id).or(entry.on_team_id),
        pos_rank: ratings
            .and_then(|r| r.get("0"))
            .and_then(|r| r.positional_ranking),
        stats,
        schedule,
        total_points,
        avg_points,
        projected_total_points,
        projected_avg_points,
        percent_owned: round2(ownership.percent_owned.unwrap_or(-1.0)),
        percent_started: round2(ownership.percent_started.unwrap_or(-1.0)),
        expected_return_date: inner.expected_return_date.as_deref().and_then(return_date),
        news,
    }
}

fn player_schedule(
    periods: &BTreeMap<String, Vec<ProGame>>,
    pro_team_id: i64,
) -> BTreeMap<String, ScheduledGame> {
    periods
        .iter()
        .filter_map(|(period, games)| {
            let game = games.first()?;
            Some((
                period.clone(),
                ScheduledGame {
                    team: pro_team_label(game.opponent_of(pro_team_id)),
                    date: game.date,
                },
            ))
        })
        .collect()
}

/// `"002024"` → `"2024_total"`; splits with an unknown prefix are keyed by
/// their scoring period.
pub fn stat_id_pretty(split_id: &str, scoring_period: i64) -> String {
    match (split_id.get(..2), split_id.get(2..)) {
        (Some(prefix), Some(season)) => match constants::stat_split_kind(prefix) {
            Some(kind) => format!("{season}_{kind}"),
            None => scoring_period.to_string(),
        },
        _ => scoring_period.to_string(),
    }
}

fn return_date(parts: &[i32]) -> Option<NaiveDate> {
    match parts {
        [y, m, d, ..] => {
            NaiveDate::from_ymd_opt(*y, u32::try_from(*m).ok()?, u32::try_from(*d).ok()?)
        }
        _ => None,
    }
}

fn pro_team_label(pro_team_id: i64) -> String {
    constants::pro_team_abbrev(pro_team_id).unwrap_or("FA").to_owned()
}

fn label_stats(raw: &HashMap<String, f64>) -> BTreeMap<String, f64> {
    raw.iter().map(|(id, v)| (constants::stat_key(id), *v)).collect()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Mapping: matchups and box scores
// ---------------------------------------------------------------------------

fn map_categories(score: &CumulativeScore) -> Option<CategoryTally> {
    let by_stat = score.score_by_stat.as_ref().filter(|s| !s.is_empty())?;
    Some(CategoryTally {
        wins: score.wins,
        ties: score.ties,
        losses: score.losses,
        stats: by_stat
            .iter()
            .map(|(id, s)| {
                (constants::stat_key(id), CategoryScore { score: s.score, result: s.result.clone() })
            })
            .collect(),
    })
}

fn matchup_type(row: &ScheduleRow) -> String {
    row.playoff_tier_type.clone().unwrap_or_else(|| "NONE".into())
}

/// Map a schedule row. Team refs hold raw ids until resolved.
pub fn map_matchup(row: &ScheduleRow) -> Matchup {
    let no_side = ScheduleSide::default();
    let home = row.home.as_ref().unwrap_or(&no_side);
    let away = row.away.as_ref();
    let matchup_type = matchup_type(row);

    Matchup {
        matchup_period: row.matchup_period_id,
        home_team: TeamRef::Id(home.team_id),
        away_team: away.map(|a| TeamRef::Id(a.team_id)),
        home_final_score: home.total_points,
        away_final_score: away.map(|a| a.total_points).unwrap_or_default(),
        home_live_score: home.total_points_live,
        away_live_score: away.and_then(|a| a.total_points_live),
        home_categories: home.cumulative_score.as_ref().and_then(map_categories),
        away_categories: away.and_then(|a| a.cumulative_score.as_ref()).and_then(map_categories),
        winner: row.winner.clone().unwrap_or_else(|| "UNDECIDED".into()),
        is_playoff: matchup_type != "NONE",
        matchup_type,
    }
}

/// Everything a box score needs besides the schedule row.
pub struct BoxContext<'a> {
    pub year: i32,
    pub scoring_period: i64,
    pub scoring: BoxScoring,
    pub matchup_total: bool,
    pub pro_schedule: &'a ProSchedule,
    pub now: DateTime<Utc>,
}

struct SideTally {
    score: f64,
    projected: Option<f64>,
    categories: Option<CategoryTally>,
    lineup: Vec<BoxPlayer>,
}

fn tally_side(side: &ScheduleSide, ctx: &BoxContext<'_>) -> SideTally {
    let roster = side.roster_for_current_scoring_period.as_ref();
    let lineup: Vec<BoxPlayer> = roster
        .map(|r| r.entries.iter().map(|e| map_box_player(e, ctx)).collect())
        .unwrap_or_default();

    match ctx.scoring {
        BoxScoring::Points => {
            let score = if ctx.matchup_total {
                side.total_points_live.unwrap_or(side.total_points)
            } else {
                roster.and_then(|r| r.applied_stat_total).unwrap_or_default()
            };
            SideTally {
                score: round2(score),
                projected: side.total_projected_points_live.map(round2),
                categories: None,
                lineup,
            }
        }
        BoxScoring::Categories => {
            let categories = side.cumulative_score.as_ref().and_then(map_categories);
            SideTally {
                score: categories.as_ref().map(|c| c.wins as f64).unwrap_or_default(),
                projected: None,
                categories,
                lineup,
            }
        }
    }
}

pub fn map_box_score(row: &ScheduleRow, ctx: &BoxContext<'_>) -> BoxScore {
    let no_side = ScheduleSide::default();
    let home = tally_side(row.home.as_ref().unwrap_or(&no_side), ctx);
    let away = row.away.as_ref().map(|a| tally_side(a, ctx));
    let matchup_type = matchup_type(row);

    let (away_score, away_projected, away_categories, away_lineup) = match away {
        Some(a) => (a.score, a.projected, a.categories, a.lineup),
        None => (0.0, None, None, Vec::new()),
    };

    BoxScore {
        matchup_period: row.matchup_period_id,
        scoring_period: ctx.scoring_period,
        home_team: TeamRef::Id(row.home.as_ref().map(|h| h.team_id).unwrap_or_default()),
        away_team: row.away.as_ref().map(|a| TeamRef::Id(a.team_id)),
        home_score: home.score,
        away_score,
        home_projected: home.projected,
        away_projected,
        home_categories: home.categories,
        away_categories,
        home_lineup: home.lineup,
        away_lineup,
        winner: row.winner.clone().unwrap_or_else(|| "UNDECIDED".into()),
        is_playoff: matchup_type != "NONE",
        matchup_type,
    }
}

pub fn map_box_player(entry: &PlayerEntry, ctx: &BoxContext<'_>) -> BoxPlayer {
    let player = map_player(entry, ctx.year, None, None);
    let inner = entry.inner();
    let pro_team_id = inner.and_then(|p| p.pro_team_id).unwrap_or_default();

    let game = ctx
        .pro_schedule
        .get(&pro_team_id)
        .and_then(|periods| periods.get(&ctx.scoring_period.to_string()))
        .and_then(|games| games.first());

    let mut box_player = BoxPlayer {
        slot_position: entry
            .lineup_slot_id
            .and_then(constants::position_label)
            .unwrap_or("FA")
            .to_owned(),
        pro_opponent: game.map(|g| pro_team_label(g.opponent_of(pro_team_id))),
        game_date: game.map(|g| g.date),
        game_played: match game {
            Some(g) if ctx.now <= g.date + TimeDelta::hours(3) => 0,
            _ => 100,
        },
        ..BoxPlayer::default()
    };

    let splits = inner.map(|p| p.stats.as_slice()).unwrap_or_default();
    for split in splits.iter().filter(|s| s.scoring_period_id == ctx.scoring_period) {
        match split.stat_source_id {
            0 => {
                box_player.points = round2(split.applied_total.unwrap_or_default());
                box_player.points_breakdown = label_stats(&split.stats);
            }
            1 => {
                box_player.projected_points = round2(split.applied_total.unwrap_or_default());
                box_player.projected_breakdown = label_stats(&split.stats);
            }
            _ => {}
        }
    }

    box_player.player = player;
    box_player
}

// ---------------------------------------------------------------------------
// Mapping: activity and transactions
// ---------------------------------------------------------------------------

fn map_activity_message(
    msg: &TopicMessage,
    player_names: &HashMap<i64, String>,
    include_moved: bool,
) -> Option<ActivityAction> {
    let code = msg.message_type_id;
    let kind = match code {
        MSG_FA_ADDED => ActivityKind::FaAdded,
        MSG_WAIVER_ADDED => ActivityKind::WaiverAdded,
        MSG_DROPPED | MSG_DROPPED_WAIVER | MSG_DROPPED_FOR => ActivityKind::Dropped,
        MSG_TRADED => ActivityKind::Traded,
        MSG_MOVED if include_moved => ActivityKind::Moved {
            position: msg.to.and_then(constants::position_label).unwrap_or_default().to_owned(),
        },
        MSG_MOVED => return None,
        _ => ActivityKind::Unknown,
    };

    // The acting team sits in a different field depending on the message.
    let team_id = match code {
        MSG_TRADED => msg.from,
        MSG_DROPPED_FOR | MSG_MOVED => msg.for_id,
        _ => msg.to,
    };

    let bid_amount = match kind {
        ActivityKind::WaiverAdded => msg.from.unwrap_or_default(),
        _ => 0,
    };

    let player = msg
        .target_id
        .and_then(|id| player_names.get(&id).map(|name| Player::named(id, name.clone())));

    Some(ActivityAction { team: team_id.map(TeamRef::Id), kind, player, bid_amount })
}

pub fn map_activity(
    topic: &Topic,
    player_names: &HashMap<i64, String>,
    include_moved: bool,
) -> Activity {
    Activity {
        date: DateTime::from_timestamp_millis(topic.date),
        actions: topic
            .messages
            .iter()
            .filter_map(|msg| map_activity_message(msg, player_names, include_moved))
            .collect(),
    }
}

pub fn map_transaction(raw: &EspnTransaction, player_names: &HashMap<i64, String>) -> Transaction {
    Transaction {
        team: TeamRef::Id(raw.team_id),
        kind: raw.kind.clone(),
        status: raw.status.clone(),
        scoring_period: raw.scoring_period_id,
        date: raw.process_date.and_then(DateTime::from_timestamp_millis),
        bid_amount: raw.bid_amount,
        items: raw
            .items
            .iter()
            .map(|item| TransactionItem {
                kind: item.kind.clone(),
                player_id: item.player_id,
                player: player_names
                    .get(&item.player_id)
                    .map(|name| Player::named(item.player_id, name.clone())),
            })
            .collect(),
    }
}

/// Picks in draft order. Empty until the league has drafted.
pub fn map_draft(raw: &DraftResponse, player_names: &HashMap<i64, String>) -> Vec<Pick> {
    let detail = &raw.draft_detail;
    if !detail.drafted {
        return Vec::new();
    }

    detail
        .picks
        .iter()
        .map(|pick| Pick {
            team: TeamRef::Id(pick.team_id),
            player_id: pick.player_id,
            player_name: player_names.get(&pick.player_id).cloned().unwrap_or_default(),
            round_num: pick.round_id,
            round_pick: pick.round_pick_number,
            bid_amount: pick.bid_amount,
            keeper_status: pick.keeper,
            nominating_team: (pick.nominating_team_id != 0)
                .then_some(TeamRef::Id(pick.nominating_team_id)),
        })
        .collect()
}
