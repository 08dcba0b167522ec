//! Lookup tables for ESPN fantasy basketball ids.
//!
//! ESPN reports positions, pro teams, stats, and activity messages as bare
//! numeric ids. These tables translate them into the labels fantasy players use.

/// Upstream game code for fantasy basketball.
pub const GAME_CODE: &str = "fba";

pub const SPORT: &str = "nba";

/// Activity message codes requested when no activity type is given:
/// FA added, waiver added, dropped (x3), traded, moved.
pub const DEFAULT_ACTIVITY_CODES: [i64; 7] = [178, 180, 179, 239, 181, 244, 188];

pub const MSG_FA_ADDED: i64 = 178;
pub const MSG_DROPPED: i64 = 179;
pub const MSG_WAIVER_ADDED: i64 = 180;
pub const MSG_DROPPED_WAIVER: i64 = 181;
pub const MSG_MOVED: i64 = 188;
pub const MSG_DROPPED_FOR: i64 = 239;
pub const MSG_TRADED: i64 = 244;

/// Every transaction type the `mTransactions2` view understands.
pub const TRANSACTION_TYPES: [&str; 13] = [
    "DRAFT",
    "TRADE_ACCEPT",
    "WAIVER",
    "TRADE_VETO",
    "FUTURE_ROSTER",
    "ROSTER",
    "RETRO_ROSTER",
    "TRADE_PROPOSAL",
    "TRADE_UPHOLD",
    "FREEAGENT",
    "TRADE_DECLINE",
    "WAIVER_ERROR",
    "TRADE_ERROR",
];

pub const DEFAULT_TRANSACTION_TYPES: [&str; 3] = ["FREEAGENT", "WAIVER", "WAIVER_ERROR"];

/// Roster slot id → label. Slot 14 is unused by ESPN and maps to nothing.
pub fn position_label(slot_id: i64) -> Option<&'static str> {
    let label = match slot_id {
        0 => "PG",
        1 => "SG",
        2 => "SF",
        3 => "PF",
        4 => "C",
        5 => "G",
        6 => "F",
        7 => "SG/SF",
        8 => "G/F",
        9 => "PF/C",
        10 => "F/C",
        11 => "UT",
        12 => "BE",
        13 => "IR",
        15 => "Rookie",
        _ => return None,
    };
    Some(label)
}

/// Label → roster slot id, the inverse of [`position_label`].
pub fn position_slot(label: &str) -> Option<i64> {
    (0..=15).find(|&id| position_label(id) == Some(label))
}

/// A player's `defaultPositionId` is one-based, unlike roster slot ids.
pub fn default_position_label(default_position_id: i64) -> Option<&'static str> {
    position_label(default_position_id - 1)
}

pub fn pro_team_abbrev(pro_team_id: i64) -> Option<&'static str> {
    let abbrev = match pro_team_id {
        0 => "FA",
        1 => "ATL",
        2 => "BOS",
        3 => "NOP",
        4 => "CHI",
        5 => "CLE",
        6 => "DAL",
        7 => "DEN",
        8 => "DET",
        9 => "GSW",
        10 => "HOU",
        11 => "IND",
        12 => "LAC",
        13 => "LAL",
        14 => "MIA",
        15 => "MIL",
        16 => "MIN",
        17 => "BKN",
        18 => "NYK",
        19 => "ORL",
        20 => "PHL",
        21 => "PHO",
        22 => "POR",
        23 => "SAC",
        24 => "SAS",
        25 => "OKC",
        26 => "UTA",
        27 => "WAS",
        28 => "TOR",
        29 => "MEM",
        30 => "CHA",
        _ => return None,
    };
    Some(abbrev)
}

/// Stat id (as ESPN keys it, a decimal string) → label.
pub fn stat_label(stat_id: &str) -> Option<&'static str> {
    let label = match stat_id {
        "0" => "PTS",
        "1" => "BLK",
        "2" => "STL",
        "3" => "AST",
        "4" => "OREB",
        "5" => "DREB",
        "6" => "REB",
        "7" => "EJ",
        "8" => "FF",
        "9" => "PF",
        "10" => "TF",
        "11" => "TO",
        "12" => "DQ",
        "13" => "FGM",
        "14" => "FGA",
        "15" => "FTM",
        "16" => "FTA",
        "17" => "3PM",
        "18" => "3PA",
        "19" => "FG%",
        "20" => "FT%",
        "21" => "3PT%",
        "22" => "AFG%",
        "23" => "FGMI",
        "24" => "FTMI",
        "25" => "3PMI",
        "26" => "APG",
        "27" => "BPG",
        "28" => "MPG",
        "29" => "PPG",
        "30" => "RPG",
        "31" => "SPG",
        "32" => "TOPG",
        "33" => "3PG",
        "34" => "PPM",
        "35" => "A/TO",
        "36" => "STR",
        "37" => "DD",
        "38" => "TD",
        "39" => "QD",
        "40" => "MIN",
        "41" => "GS",
        "42" => "GP",
        "43" => "TW",
        "44" => "FTR",
        _ => return None,
    };
    Some(label)
}

/// Stat labels fall back to the raw id so nothing reported upstream is lost.
pub fn stat_key(stat_id: &str) -> String {
    stat_label(stat_id).map(str::to_owned).unwrap_or_else(|| stat_id.to_owned())
}

/// Stat split ids carry a two-digit prefix naming the split kind,
/// followed by the season (`"002024"` is the 2024 season total).
pub fn stat_split_kind(prefix: &str) -> Option<&'static str> {
    match prefix {
        "00" => Some("total"),
        "10" => Some("projected"),
        "01" => Some("last_7"),
        "02" => Some("last_15"),
        "03" => Some("last_30"),
        _ => None,
    }
}

/// Logical activity name → the single message code it narrows a query to.
pub fn activity_code(name: &str) -> Option<i64> {
    match name {
        "FA" => Some(MSG_FA_ADDED),
        "WAIVER" => Some(MSG_WAIVER_ADDED),
        "TRADED" => Some(MSG_TRADED),
        _ => None,
    }
}

pub fn is_transaction_type(kind: &str) -> bool {
    TRANSACTION_TYPES.contains(&kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_slot_inverts_position_label() {
        for id in (0..=13).chain([15]) {
            let label = position_label(id).unwrap();
            assert_eq!(position_slot(label), Some(id));
        }
        assert_eq!(position_label(14), None);
        assert_eq!(position_slot("QB"), None);
    }

    #[test]
    fn default_position_is_one_based() {
        assert_eq!(default_position_label(1), Some("PG"));
        assert_eq!(default_position_label(5), Some("C"));
        assert_eq!(default_position_label(0), None);
    }

    #[test]
    fn unknown_stat_ids_keep_their_raw_key() {
        assert_eq!(stat_key("0"), "PTS");
        assert_eq!(stat_key("17"), "3PM");
        assert_eq!(stat_key("999"), "999");
    }

    #[test]
    fn activity_names_narrow_to_one_code() {
        assert_eq!(activity_code("FA"), Some(178));
        assert_eq!(activity_code("WAIVER"), Some(180));
        assert_eq!(activity_code("TRADED"), Some(244));
        assert_eq!(activity_code("DROPPED"), None);
        assert!(DEFAULT_ACTIVITY_CODES.contains(&MSG_MOVED));
    }

    #[test]
    fn default_transaction_types_are_known() {
        assert!(DEFAULT_TRANSACTION_TYPES.iter().all(|t| is_transaction_type(t)));
        assert!(!is_transaction_type("KEEPER"));
    }
}
