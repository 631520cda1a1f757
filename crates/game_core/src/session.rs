use std::collections::BTreeMap;
use std::mem;

use shared::{
    domain::{PlayerCount, PlayerId},
    protocol::{EvaluationResponse, StartRoundRequest, StartRoundResponse, SubmitWordsRequest},
};

use crate::error::{SessionError, BLANK_WORDS_MESSAGE};

/// One word slot per seated player. Snapshots are cheap to clone and compare;
/// `with_word` returns a new sheet instead of editing in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordSheet {
    words: BTreeMap<PlayerId, String>,
}

impl WordSheet {
    pub fn blank(player_count: PlayerCount) -> Self {
        Self {
            words: player_count
                .players()
                .map(|id| (id, String::new()))
                .collect(),
        }
    }

    /// New sheet with `player`'s slot replaced verbatim. The key set never
    /// changes; a player outside it is rejected.
    pub fn with_word(
        &self,
        player: PlayerId,
        text: impl Into<String>,
    ) -> Result<Self, SessionError> {
        if !self.words.contains_key(&player) {
            return Err(SessionError::UnknownPlayer { id: player.0 });
        }
        let mut words = self.words.clone();
        words.insert(player, text.into());
        Ok(Self { words })
    }

    pub fn word(&self, player: PlayerId) -> Option<&str> {
        self.words.get(&player).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &str)> {
        self.words.iter().map(|(id, word)| (*id, word.as_str()))
    }

    /// Players whose slot is empty after whitespace trimming.
    pub fn blank_players(&self) -> Vec<PlayerId> {
        self.words
            .iter()
            .filter(|(_, word)| word.trim().is_empty())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn to_map(&self) -> BTreeMap<PlayerId, String> {
        self.words.clone()
    }
}

/// Where the round stands. Each variant carries only the fields valid in
/// that phase; "loading" is not a flag but the two pending variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Setup {
        player_count: PlayerCount,
    },
    PromptPending {
        player_count: PlayerCount,
    },
    AwaitingWords {
        player_count: PlayerCount,
        prompt: String,
        words: WordSheet,
    },
    Submitting {
        player_count: PlayerCount,
        prompt: String,
        words: WordSheet,
    },
    Results {
        player_count: PlayerCount,
        prompt: String,
        words: WordSheet,
        evaluation: EvaluationResponse,
    },
}

impl Default for Phase {
    fn default() -> Self {
        Self::Setup {
            player_count: PlayerCount::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseName {
    Setup,
    PromptPending,
    AwaitingWords,
    Submitting,
    Results,
}

impl Phase {
    pub fn name(&self) -> PhaseName {
        match self {
            Phase::Setup { .. } => PhaseName::Setup,
            Phase::PromptPending { .. } => PhaseName::PromptPending,
            Phase::AwaitingWords { .. } => PhaseName::AwaitingWords,
            Phase::Submitting { .. } => PhaseName::Submitting,
            Phase::Results { .. } => PhaseName::Results,
        }
    }

    pub fn player_count(&self) -> PlayerCount {
        match self {
            Phase::Setup { player_count }
            | Phase::PromptPending { player_count }
            | Phase::AwaitingWords { player_count, .. }
            | Phase::Submitting { player_count, .. }
            | Phase::Results { player_count, .. } => *player_count,
        }
    }

    pub fn prompt(&self) -> Option<&str> {
        match self {
            Phase::Setup { .. } | Phase::PromptPending { .. } => None,
            Phase::AwaitingWords { prompt, .. }
            | Phase::Submitting { prompt, .. }
            | Phase::Results { prompt, .. } => Some(prompt),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::PromptPending { .. } | Phase::Submitting { .. })
    }
}

/// Proof that a transition into a pending phase happened. An outcome is
/// applied only while the ticket's epoch is still the session's; a ticket
/// from a superseded session applies nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    epoch: u64,
}

/// The session aggregate for one round. Transition methods are the only
/// mutation surface; the presentation layer reads snapshots.
#[derive(Debug, Default)]
pub struct Session {
    phase: Phase,
    error: Option<String>,
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn player_count(&self) -> PlayerCount {
        self.phase.player_count()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.phase.prompt()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn words(&self) -> Option<&WordSheet> {
        match &self.phase {
            Phase::Setup { .. } | Phase::PromptPending { .. } => None,
            Phase::AwaitingWords { words, .. }
            | Phase::Submitting { words, .. }
            | Phase::Results { words, .. } => Some(words),
        }
    }

    pub fn evaluation(&self) -> Option<&EvaluationResponse> {
        match &self.phase {
            Phase::Results { evaluation, .. } => Some(evaluation),
            _ => None,
        }
    }

    /// Only honored during setup; once a prompt is requested or issued the
    /// table is locked in, even if a disabled control is bypassed.
    pub fn set_player_count(&mut self, player_count: PlayerCount) -> Result<(), SessionError> {
        match self.phase {
            Phase::Setup { .. } => {
                self.phase = Phase::Setup { player_count };
                Ok(())
            }
            Phase::PromptPending { .. } => Err(SessionError::RequestInFlight),
            _ => Err(SessionError::RoundInProgress),
        }
    }

    /// Setup -> PromptPending. Clears the visible error and hands back the
    /// request to send; the matching outcome call is `apply_prompt` or
    /// `fail_round_start` with the returned ticket.
    pub fn begin_round_start(
        &mut self,
        theme: &str,
    ) -> Result<(RequestTicket, StartRoundRequest), SessionError> {
        let player_count = match &self.phase {
            Phase::Setup { player_count } => *player_count,
            Phase::PromptPending { .. } | Phase::Submitting { .. } => {
                return Err(SessionError::RequestInFlight)
            }
            Phase::AwaitingWords { .. } => return Err(SessionError::RoundInProgress),
            Phase::Results { .. } => return Err(SessionError::RoundFinished),
        };

        self.error = None;
        self.phase = Phase::PromptPending { player_count };
        let ticket = self.issue_ticket();
        Ok((
            ticket,
            StartRoundRequest {
                player_count,
                theme: theme.to_string(),
            },
        ))
    }

    /// PromptPending -> AwaitingWords. The echoed player count is
    /// authoritative: word slots are created for exactly that many players.
    pub fn apply_prompt(&mut self, ticket: RequestTicket, response: StartRoundResponse) -> bool {
        if !self.ticket_is_current(ticket) {
            return false;
        }
        match mem::take(&mut self.phase) {
            Phase::PromptPending { .. } => {
                let player_count = response.player_count;
                self.phase = Phase::AwaitingWords {
                    player_count,
                    prompt: response.prompt,
                    words: WordSheet::blank(player_count),
                };
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    /// PromptPending -> Setup, with the failure message visible. The same
    /// table can retry.
    pub fn fail_round_start(&mut self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        if !self.ticket_is_current(ticket) {
            return false;
        }
        match mem::take(&mut self.phase) {
            Phase::PromptPending { player_count } => {
                self.phase = Phase::Setup { player_count };
                self.error = Some(message.into());
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    /// Replaces `player`'s slot verbatim; no trimming happens at entry time.
    pub fn set_word(
        &mut self,
        player: PlayerId,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        let updated = match &self.phase {
            Phase::AwaitingWords { words, .. } => words.with_word(player, text)?,
            Phase::PromptPending { .. } | Phase::Submitting { .. } => {
                return Err(SessionError::RequestInFlight)
            }
            Phase::Setup { .. } => return Err(SessionError::NoActiveRound),
            Phase::Results { .. } => return Err(SessionError::RoundFinished),
        };
        if let Phase::AwaitingWords { words, .. } = &mut self.phase {
            *words = updated;
        }
        Ok(())
    }

    /// AwaitingWords -> Submitting, unless any slot is blank after trimming,
    /// in which case the fixed validation message becomes visible and no
    /// request may be sent.
    pub fn begin_submit(&mut self) -> Result<(RequestTicket, SubmitWordsRequest), SessionError> {
        let (player_count, prompt, words) = match &self.phase {
            Phase::AwaitingWords {
                player_count,
                prompt,
                words,
            } => (*player_count, prompt.clone(), words.clone()),
            Phase::PromptPending { .. } | Phase::Submitting { .. } => {
                return Err(SessionError::RequestInFlight)
            }
            Phase::Setup { .. } => return Err(SessionError::NoActiveRound),
            Phase::Results { .. } => return Err(SessionError::RoundFinished),
        };

        let blank = words.blank_players();
        if !blank.is_empty() {
            self.error = Some(BLANK_WORDS_MESSAGE.to_string());
            return Err(SessionError::BlankWords { players: blank });
        }

        self.error = None;
        let request = SubmitWordsRequest {
            prompt: prompt.clone(),
            player_words: words.to_map(),
        };
        self.phase = Phase::Submitting {
            player_count,
            prompt,
            words,
        };
        let ticket = self.issue_ticket();
        Ok((ticket, request))
    }

    /// Submitting -> Results, storing the verdict verbatim.
    pub fn apply_evaluation(
        &mut self,
        ticket: RequestTicket,
        evaluation: EvaluationResponse,
    ) -> bool {
        if !self.ticket_is_current(ticket) {
            return false;
        }
        match mem::take(&mut self.phase) {
            Phase::Submitting {
                player_count,
                prompt,
                words,
            } => {
                self.phase = Phase::Results {
                    player_count,
                    prompt,
                    words,
                    evaluation,
                };
                self.error = None;
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    /// Submitting -> AwaitingWords with every word preserved, so the table
    /// can fix up and resubmit.
    pub fn fail_submit(&mut self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        if !self.ticket_is_current(ticket) {
            return false;
        }
        match mem::take(&mut self.phase) {
            Phase::Submitting {
                player_count,
                prompt,
                words,
            } => {
                self.phase = Phase::AwaitingWords {
                    player_count,
                    prompt,
                    words,
                };
                self.error = Some(message.into());
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    /// Replaces the whole aggregate with a fresh default session. Any
    /// response still in flight for the old session is orphaned: its ticket
    /// no longer matches and applies nothing.
    pub fn reset(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.phase = Phase::default();
        self.error = None;
    }

    fn issue_ticket(&mut self) -> RequestTicket {
        self.epoch = self.epoch.wrapping_add(1);
        RequestTicket { epoch: self.epoch }
    }

    fn ticket_is_current(&self, ticket: RequestTicket) -> bool {
        ticket.epoch == self.epoch
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
