use foundation::{EntityId, IndicatorName, Year};

/// Fatal or caller-recoverable store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Load produced zero valid observations.
    #[error("no valid observations in {record_count} input records")]
    EmptyStore { record_count: usize },

    /// The subset has no non-absent value for the indicator.
    #[error("no values for indicator {indicator} in the requested subset")]
    EmptyExtent { indicator: IndicatorName },
}

/// A recovered problem with one input record.
///
/// Issues never abort a load: the record (or just the field) is dropped and the
/// problem is kept on the store for inspection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record {record}: {kind}")]
pub struct MalformedInput {
    /// 0-based position in the raw input.
    pub record: usize,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssueKind {
    #[error("missing or unusable entity field `{field}`")]
    MissingEntity { field: String },

    #[error("missing or unusable year field `{field}`")]
    MissingYear { field: String },

    #[error("duplicate observation for {entity}/{year}")]
    DuplicateKey { entity: EntityId, year: Year },

    #[error("indicator `{field}` is not numeric, stored as absent")]
    UncoercibleField { field: String },
}

/// Failures reading raw records from JSON text.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of records")]
    NotAnArray,

    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },
}
