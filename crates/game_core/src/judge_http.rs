use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::protocol::{
    ErrorResponse, EvaluationResponse, StartRoundRequest, StartRoundResponse, SubmitWordsRequest,
};
use tracing::warn;

use crate::{config::Settings, error::JudgeError, JudgeService};

pub const START_ROUND_FALLBACK: &str = "Failed to start game";
pub const SUBMIT_WORDS_FALLBACK: &str = "Failed to submit words";

/// HTTP client for the judge service. Non-success statuses surface the
/// `error` field of the failure payload when it parses, and a per-endpoint
/// fallback message when it does not.
pub struct HttpJudgeService {
    http: Client,
    base_url: String,
}

impl HttpJudgeService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.judge_base_url.clone())
    }

    async fn post_json<Req, Res>(
        &self,
        path: &str,
        request: &Req,
        fallback: &str,
    ) -> Result<Res, JudgeError>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(err) => {
                    warn!(%status, "judge: unreadable failure payload: {err}");
                    fallback.to_string()
                }
            };
            return Err(JudgeError::Service { message });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl JudgeService for HttpJudgeService {
    async fn start_round(
        &self,
        request: StartRoundRequest,
    ) -> Result<StartRoundResponse, JudgeError> {
        self.post_json("/start_game", &request, START_ROUND_FALLBACK)
            .await
    }

    async fn evaluate(
        &self,
        request: SubmitWordsRequest,
    ) -> Result<EvaluationResponse, JudgeError> {
        self.post_json("/submit_words", &request, SUBMIT_WORDS_FALLBACK)
            .await
    }
}
