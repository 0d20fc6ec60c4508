use qn_core::{CoreError, SourceId, StationId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("station {0} not found")]
    UnknownStation(StationId),

    #[error("generator {0} not found")]
    UnknownSource(SourceId),

    /// The drawn variate fell beyond the accumulated edge mass: the
    /// station's outgoing probabilities sum to less than one.
    #[error(
        "misconfigured routing at station '{station}': variate {variate} not covered \
         by outgoing probability mass {mass}; ensure output probabilities sum to unity"
    )]
    MisconfiguredRouting {
        station: String,
        variate: f64,
        mass:    f64,
    },

    /// A scheduling-only operation was invoked on a sink.
    #[error("operation `{operation}` is not supported by sink '{station}'")]
    UnsupportedOperation {
        station:   String,
        operation: &'static str,
    },

    #[error("generator '{generator}' has no entry station")]
    NoEntryStation { generator: String },

    #[error("station '{station}' fired a completion with no job in service")]
    IdleCompletion { station: String },

    #[error("duplicate node name '{0}'")]
    DuplicateName(String),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
