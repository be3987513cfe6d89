// Error type shared by the simulation, the evolution driver and the loaders

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A generation needs at least two agents to be evolved
    #[error("generation has {0} agent(s), at least 2 are required")]
    PopulationTooSmall(usize),

    #[error("controller produced {actual} output(s), expected {expected}")]
    ControllerArity { expected: usize, actual: usize },

    #[error("invalid genome: {0}")]
    Genome(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
