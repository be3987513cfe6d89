// Controllers and the evolution driver that breeds them

pub mod controller;
pub mod network;
pub mod population;
pub mod reporter;

pub use controller::{Controller, Observation, OBSERVATION_SIZE};
pub use network::Network;
pub use population::{AgentRecord, EvolutionDriver, Flow, GenerationInfo, Population, RunSummary};
pub use reporter::{GenerationStats, StatisticsReporter};
