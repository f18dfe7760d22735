use thiserror::Error;

/// Errors raised while generating or operating on a draw.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// The declared seed count disagrees with the seeded names supplied.
    #[error("Configuration Error: Expected {expected} seeds, but found {found} names.")]
    Configuration { expected: usize, found: usize },

    #[error("No competitors were entered.")]
    NoCompetitors,

    /// Slot count is not a power of two or cannot hold every competitor.
    #[error("Slot count {total_slots} cannot hold {competitors} competitors.")]
    SlotCount { total_slots: usize, competitors: usize },

    #[error("Match not found at round {round}, position {position}.")]
    MatchNotFound { round: usize, position: usize },

    #[error("No draw has been generated yet.")]
    NoDraw,

    #[error("Export failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, DrawError>;
