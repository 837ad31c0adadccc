use serde::Deserialize;

/// Envelope returned by `GET /players/topscorers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopScorersResponse {
    #[serde(default)]
    pub errors: serde_json::Value,
    #[serde(default)]
    pub results: Option<u64>,
    #[serde(default)]
    pub response: Vec<ScorerEntry>,
}

impl TopScorersResponse {
    /// API-Football reports request problems (bad key, plan limits) in `errors`
    /// with a 200 status; it is an empty array or object when all is well.
    pub fn api_errors(&self) -> Option<String> {
        match &self.errors {
            serde_json::Value::Array(items) if !items.is_empty() => Some(self.errors.to_string()),
            serde_json::Value::Object(map) if !map.is_empty() => Some(self.errors.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScorerEntry {
    pub player: PlayerInfo,
    #[serde(default)]
    pub statistics: Vec<Statistics>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    #[serde(default)]
    pub birth: Birth,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Birth {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Statistics {
    pub team: Team,
    #[serde(default)]
    pub games: Games,
    #[serde(default)]
    pub goals: Goals,
    #[serde(default)]
    pub penalty: Penalty,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Team {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Games {
    // Upstream spelling.
    pub appearences: Option<i64>,
    pub minutes: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Goals {
    pub total: Option<i64>,
    pub assists: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Penalty {
    pub scored: Option<i64>,
}

/// One flattened scorer, before ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopScorer {
    pub player: String,
    pub club: String,
    pub total_goals: i64,
    pub penalty_goals: i64,
    pub assists: i64,
    pub matches: i64,
    pub mins: i64,
    pub age: Option<i64>,
}

/// A scorer with its table position; this is the row that gets loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedScorer {
    pub position: i64,
    pub scorer: TopScorer,
}

pub const SCORER_COLUMNS: [&str; 9] = [
    "position",
    "player",
    "club",
    "total_goals",
    "penalty_goals",
    "assists",
    "matches",
    "mins",
    "age",
];

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub rows: Vec<RankedScorer>,
    pub csv_output: String,
    pub preview: String,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub table: String,
    pub rows_written: usize,
    pub rows_affected: u64,
    pub csv_path: Option<String>,
}
