use thiserror::Error;

/// Failures that mean "there is nothing to show", as opposed to stats that
/// legitimately computed to zero.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("input missing: {0}")]
    InputMissing(String),
    #[error("sheet layout not recognized")]
    LayoutNotRecognized,
    #[error("no players found in sheet")]
    NoPlayersFound,
}
