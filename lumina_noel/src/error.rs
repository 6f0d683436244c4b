use std::io;

use lumina_formation::FormationError;
use thiserror::Error;

/// Failures starting or reading a landmark source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("empty detector command")]
    EmptyCommand,

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source:  io::Error,
    },

    #[error("detector `{0}` has no stdout")]
    NoStdout(String),

    #[error("malformed detection line: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("window: {0}")]
    Window(#[from] minifb::Error),

    #[error(transparent)]
    Formation(#[from] FormationError),

    #[error(transparent)]
    Source(#[from] SourceError),
}
