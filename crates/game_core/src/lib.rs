use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{PlayerCount, PlayerId},
    protocol::{EvaluationResponse, StartRoundRequest, StartRoundResponse, SubmitWordsRequest},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod judge_http;
pub mod session;
pub mod view;

pub use config::{load_settings, Settings};
pub use error::{GameError, JudgeError, SessionError, BLANK_WORDS_MESSAGE};
pub use judge_http::HttpJudgeService;
pub use session::{Phase, PhaseName, RequestTicket, Session, WordSheet};
pub use view::{ResultsView, SessionView, WordRow};

/// The external collaborator that issues prompts and scores submissions.
/// The session core only consumes its request/response contract.
#[async_trait]
pub trait JudgeService: Send + Sync {
    async fn start_round(
        &self,
        request: StartRoundRequest,
    ) -> Result<StartRoundResponse, JudgeError>;

    async fn evaluate(&self, request: SubmitWordsRequest)
        -> Result<EvaluationResponse, JudgeError>;
}

/// Stand-in judge for harnesses wired up before a real service exists.
pub struct MissingJudgeService;

#[async_trait]
impl JudgeService for MissingJudgeService {
    async fn start_round(
        &self,
        _request: StartRoundRequest,
    ) -> Result<StartRoundResponse, JudgeError> {
        Err(JudgeError::Service {
            message: "judge service is unavailable".to_string(),
        })
    }

    async fn evaluate(
        &self,
        _request: SubmitWordsRequest,
    ) -> Result<EvaluationResponse, JudgeError> {
        Err(JudgeError::Service {
            message: "judge service is unavailable".to_string(),
        })
    }
}

/// Session transitions worth reacting to, broadcast so a presentation layer
/// can observe rounds without polling snapshots.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    PromptIssued {
        prompt: String,
        player_count: PlayerCount,
    },
    ResultsReady {
        evaluation: EvaluationResponse,
    },
    AttemptFailed {
        message: String,
    },
    SessionReplaced,
}

/// Drives one round at a time. The session lives behind a mutex that is
/// never held across a network await: an operation transitions into a
/// pending phase, releases the lock for the call, then applies the outcome
/// through its ticket. A response whose ticket no longer matches (the
/// session was replaced mid-flight) is discarded.
pub struct GameClient {
    judge: Arc<dyn JudgeService>,
    theme: String,
    inner: Mutex<Session>,
    events: broadcast::Sender<SessionEvent>,
}

impl GameClient {
    pub fn new(settings: &Settings) -> Arc<Self> {
        Self::new_with_judge(
            Arc::new(HttpJudgeService::from_settings(settings)),
            settings,
        )
    }

    pub fn new_with_judge(judge: Arc<dyn JudgeService>, settings: &Settings) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            judge,
            theme: settings.theme.clone(),
            inner: Mutex::new(Session::new()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionView {
        SessionView::of(&*self.inner.lock().await)
    }

    pub async fn set_player_count(&self, player_count: PlayerCount) -> Result<(), SessionError> {
        self.inner.lock().await.set_player_count(player_count)
    }

    pub async fn set_word(&self, player: PlayerId, text: &str) -> Result<(), SessionError> {
        self.inner.lock().await.set_word(player, text)
    }

    /// Requests a prompt for the table as currently configured. Rejected
    /// while another request is in flight or a round is already underway.
    pub async fn start_new_game(&self) -> Result<(), GameError> {
        let (ticket, request) = self.inner.lock().await.begin_round_start(&self.theme)?;
        info!(
            player_count = request.player_count.get(),
            theme = %request.theme,
            "round: requesting prompt"
        );

        match self.judge.start_round(request).await {
            Ok(response) => {
                let prompt = response.prompt.clone();
                let player_count = response.player_count;
                if self.inner.lock().await.apply_prompt(ticket, response) {
                    let _ = self.events.send(SessionEvent::PromptIssued {
                        prompt,
                        player_count,
                    });
                } else {
                    warn!("round: discarding prompt response for a superseded session");
                }
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                if self
                    .inner
                    .lock()
                    .await
                    .fail_round_start(ticket, message.clone())
                {
                    let _ = self.events.send(SessionEvent::AttemptFailed { message });
                } else {
                    warn!("round: discarding prompt failure for a superseded session");
                }
                Err(err.into())
            }
        }
    }

    /// Sends every player's word for scoring. Validation happens up front:
    /// a blank slot aborts locally without touching the network.
    pub async fn submit_words(&self) -> Result<(), GameError> {
        let (ticket, request) = self.inner.lock().await.begin_submit()?;
        info!(words = request.player_words.len(), "round: submitting words");

        match self.judge.evaluate(request).await {
            Ok(evaluation) => {
                let announced = evaluation.clone();
                if self.inner.lock().await.apply_evaluation(ticket, evaluation) {
                    let _ = self.events.send(SessionEvent::ResultsReady {
                        evaluation: announced,
                    });
                } else {
                    warn!("round: discarding evaluation for a superseded session");
                }
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                if self.inner.lock().await.fail_submit(ticket, message.clone()) {
                    let _ = self.events.send(SessionEvent::AttemptFailed { message });
                } else {
                    warn!("round: discarding submit failure for a superseded session");
                }
                Err(err.into())
            }
        }
    }

    /// Throws the whole session away and starts from defaults, the only way
    /// back to setup once a round has been scored.
    pub async fn reset(&self) {
        self.inner.lock().await.reset();
        let _ = self.events.send(SessionEvent::SessionReplaced);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
