use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{PlayerCount, PlayerId};

/// Body for `POST /start_game`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRoundRequest {
    pub player_count: PlayerCount,
    pub theme: String,
}

/// Success payload for `POST /start_game`. The echoed `player_count` is
/// authoritative for how many word slots the round gets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRoundResponse {
    pub prompt: String,
    pub player_count: PlayerCount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body for `POST /submit_words`. Word-map keys are player ids and ride
/// JSON as strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitWordsRequest {
    pub prompt: String,
    pub player_words: BTreeMap<PlayerId, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScore {
    pub id: PlayerId,
    pub word: String,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria_result: Option<f64>,
}

/// Full scoring verdict for a round, stored by the session verbatim. More
/// than one winner means the winning words tied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    pub prompt: String,
    pub player_scores: Vec<PlayerScore>,
    pub winners: Vec<PlayerId>,
}

/// Failure payload the judge returns alongside a non-success status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
