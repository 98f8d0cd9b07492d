use foundation::{EntityId, IndicatorName, Year};

/// Rejected transition requests. The state is never changed when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("no observations for year {0}")]
    InvalidYear(Year),

    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("unknown indicator {0}")]
    UnknownIndicator(IndicatorName),

    /// The store has no indicator to build a default state from.
    #[error("store has no indicators with values")]
    NoIndicators,
}
