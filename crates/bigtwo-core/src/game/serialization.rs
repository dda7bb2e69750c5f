use crate::model::player::Seat;
use crate::model::score::GameResult;
use serde::{Deserialize, Serialize};

/// Summary of one finished round, suitable for appending to a JSON lines log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub round_number: u32,
    pub players: [String; 4],
    pub winner: Seat,
    pub turns: u32,
    pub base_scores: [i32; 4],
    pub final_scores: [i32; 4],
}

impl RoundSnapshot {
    pub fn capture(
        seed: Option<u64>,
        round_number: u32,
        players: [String; 4],
        turns: u32,
        result: &GameResult,
    ) -> Self {
        RoundSnapshot {
            seed,
            round_number,
            players,
            winner: result.winner,
            turns,
            base_scores: result.base_scores,
            final_scores: result.final_scores,
        }
    }

    pub fn result(&self) -> GameResult {
        GameResult {
            winner: self.winner,
            base_scores: self.base_scores,
            final_scores: self.final_scores,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::RoundSnapshot;
    use crate::model::player::Seat;
    use crate::model::score::GameResult;

    fn names() -> [String; 4] {
        ["you", "bot-1", "bot-2", "bot-3"].map(String::from)
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let result = GameResult::from_base_scores(Seat::South, [4, 9, 0, 1]);
        let snapshot = RoundSnapshot::capture(Some(99), 1, names(), 40, &result);
        let json = snapshot.to_json_pretty().unwrap();
        assert!(json.contains("\"seed\": 99"));
        assert!(json.contains("\"winner\": \"South\""));
        assert!(json.contains("\"turns\": 40"));
    }

    #[test]
    fn unseeded_snapshot_omits_seed() {
        let result = GameResult::from_base_scores(Seat::North, [0, 1, 1, 1]);
        let snapshot = RoundSnapshot::capture(None, 3, names(), 12, &result);
        let json = snapshot.to_json().unwrap();
        assert!(!json.contains("seed"));
        let restored = RoundSnapshot::from_json(&json).unwrap();
        assert_eq!(restored.seed, None);
        assert_eq!(restored.result(), result);
    }

    #[test]
    fn from_json_ignores_unknown_fields() {
        let legacy = r#"{
            "round_number": 2,
            "players": ["a", "b", "c", "d"],
            "winner": "West",
            "turns": 18,
            "base_scores": [3, 2, 1, 0],
            "final_scores": [-6, -2, 2, 6],
            "duration_ms": 12
        }"#;
        let snapshot = RoundSnapshot::from_json(legacy).unwrap();
        assert_eq!(snapshot.winner, Seat::West);
        assert_eq!(snapshot.final_scores, [-6, -2, 2, 6]);
    }
}
