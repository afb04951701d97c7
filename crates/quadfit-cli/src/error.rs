use thiserror::Error;

use crate::plot::PlotError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Source(#[from] quadfit_core::SourceError),

    #[error(transparent)]
    Analysis(#[from] quadfit_analysis::AnalysisError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("input closed before a valid stock symbol was entered")]
    InputClosed,

    #[error("no valid stock symbol after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Source(_) => 3,
            Self::Analysis(_) => 4,
            Self::Plot(_) => 6,
            Self::Io(_) => 10,
            Self::InputClosed => 2,
            Self::AttemptsExhausted { .. } => 2,
        }
    }
}
