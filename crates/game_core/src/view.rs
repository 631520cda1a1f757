use shared::{
    domain::{PlayerCount, PlayerId},
    protocol::PlayerScore,
};

use crate::session::{PhaseName, Session};

/// Everything a presentation layer needs to paint one frame, derived from
/// the session. Reading never mutates; controls carry their own enabled
/// flags so the view layer does not re-derive phase rules.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub phase: PhaseName,
    pub player_count: PlayerCount,
    pub prompt: Option<String>,
    pub rows: Vec<WordRow>,
    pub start_enabled: bool,
    pub player_count_enabled: bool,
    pub submit_enabled: bool,
    pub error: Option<String>,
    pub results: Option<ResultsView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordRow {
    pub player: PlayerId,
    pub text: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub prompt: String,
    pub scores: Vec<PlayerScore>,
    pub winners: Vec<PlayerId>,
    /// More than one winner: the winning words were judged equally uncommon.
    pub tie: bool,
}

impl SessionView {
    pub fn of(session: &Session) -> Self {
        let phase = session.phase().name();
        let player_count = session.player_count();
        let editing = phase == PhaseName::AwaitingWords;

        let rows = player_count
            .players()
            .map(|player| WordRow {
                player,
                text: session
                    .words()
                    .and_then(|words| words.word(player))
                    .unwrap_or_default()
                    .to_string(),
                enabled: editing,
            })
            .collect();

        let results = session.evaluation().map(|evaluation| ResultsView {
            prompt: evaluation.prompt.clone(),
            scores: evaluation.player_scores.clone(),
            winners: evaluation.winners.clone(),
            tie: evaluation.winners.len() > 1,
        });

        Self {
            phase,
            player_count,
            prompt: session.prompt().map(str::to_string),
            rows,
            start_enabled: phase == PhaseName::Setup,
            player_count_enabled: phase == PhaseName::Setup,
            submit_enabled: editing,
            error: session.error().map(str::to_string),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::{PlayerCount, PlayerId};
    use shared::protocol::{EvaluationResponse, PlayerScore, StartRoundResponse};

    use super::*;

    fn awaiting_session() -> Session {
        let mut session = Session::new();
        let (ticket, _request) = session.begin_round_start("nature").unwrap();
        let applied = session.apply_prompt(
            ticket,
            StartRoundResponse {
                prompt: "describe a fruit".into(),
                player_count: PlayerCount::new(2).unwrap(),
                message: None,
            },
        );
        assert!(applied);
        session
    }

    #[test]
    fn setup_enables_start_and_count_but_not_words() {
        let view = SessionView::of(&Session::new());
        assert_eq!(view.phase, PhaseName::Setup);
        assert!(view.start_enabled);
        assert!(view.player_count_enabled);
        assert!(!view.submit_enabled);
        assert_eq!(view.rows.len(), 2);
        assert!(view.rows.iter().all(|row| !row.enabled && row.text.is_empty()));
    }

    #[test]
    fn awaiting_words_enables_rows_and_submit_only() {
        let view = SessionView::of(&awaiting_session());
        assert_eq!(view.phase, PhaseName::AwaitingWords);
        assert_eq!(view.prompt.as_deref(), Some("describe a fruit"));
        assert!(!view.start_enabled);
        assert!(!view.player_count_enabled);
        assert!(view.submit_enabled);
        assert!(view.rows.iter().all(|row| row.enabled));
    }

    #[test]
    fn pending_phases_disable_everything() {
        let mut session = Session::new();
        let _ = session.begin_round_start("nature").unwrap();
        let view = SessionView::of(&session);
        assert_eq!(view.phase, PhaseName::PromptPending);
        assert!(!view.start_enabled);
        assert!(!view.player_count_enabled);
        assert!(!view.submit_enabled);
        assert!(view.rows.iter().all(|row| !row.enabled));
    }

    #[test]
    fn results_carry_a_tie_note_when_winners_share_the_pot() {
        let mut session = awaiting_session();
        session.set_word(PlayerId(1), "kiwi").unwrap();
        session.set_word(PlayerId(2), "kiwi").unwrap();
        let (ticket, _request) = session.begin_submit().unwrap();
        let applied = session.apply_evaluation(
            ticket,
            EvaluationResponse {
                prompt: "describe a fruit".into(),
                player_scores: vec![
                    PlayerScore {
                        id: PlayerId(1),
                        word: "kiwi".into(),
                        total: 3.5,
                        criteria_result: None,
                    },
                    PlayerScore {
                        id: PlayerId(2),
                        word: "kiwi".into(),
                        total: 3.5,
                        criteria_result: None,
                    },
                ],
                winners: vec![PlayerId(1), PlayerId(2)],
            },
        );
        assert!(applied);

        let view = SessionView::of(&session);
        let results = view.results.expect("results view");
        assert!(results.tie);
        assert_eq!(results.winners.len(), 2);
        assert!(!view.submit_enabled);
        assert!(!view.start_enabled);
    }
}
