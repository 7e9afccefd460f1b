use thiserror::Error;

/// Problems detected while building a stage from its parameters.
///
/// State transitions never produce errors; a request that cannot be honoured
/// leaves the stage untouched.
#[derive(Debug, Error)]
pub enum StageError {
    /// The parameter JSON could not be parsed.
    #[error("Invalid stage config: {0}")]
    Config(#[from] serde_json::Error),

    /// Stage ids key callbacks and neighbor lists, so they cannot be empty.
    #[error("Stage id must not be empty")]
    EmptyId,

    /// Position outside the 0..=100 percent range of the map canvas.
    #[error("Stage {id}: telemetry {axis} = {value} is outside 0..=100")]
    TelemetryOutOfRange {
        id: String,
        axis: &'static str,
        value: f64,
    },
}
