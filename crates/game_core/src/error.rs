use shared::domain::PlayerId;
use thiserror::Error;

/// Fixed message surfaced when submission is attempted with a blank word.
pub const BLANK_WORDS_MESSAGE: &str = "Please ensure all players have entered a word.";

/// Local precondition and validation failures. None of these touch the
/// network and, apart from the blank-word validation (which populates the
/// visible error message), none of them change the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a request is already in flight for this session")]
    RequestInFlight,
    #[error("the round is locked in; it must finish or be reset first")]
    RoundInProgress,
    #[error("no active round; start a new game first")]
    NoActiveRound,
    #[error("the round is already scored; reset to play again")]
    RoundFinished,
    #[error("no player with id {id} is seated this round")]
    UnknownPlayer { id: i64 },
    #[error("{}", BLANK_WORDS_MESSAGE)]
    BlankWords { players: Vec<PlayerId> },
}

/// Failures talking to the judge service. Both kinds surface to the player
/// as a single message string.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// The service answered with a non-success status. The message comes
    /// from its failure payload when parseable, otherwise a per-endpoint
    /// fallback.
    #[error("{message}")]
    Service { message: String },
    /// The exchange itself failed (connect, I/O, or body decode).
    #[error("{source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Judge(#[from] JudgeError),
}
