// Episode loop, fitness policy and the generation-level run loops

pub mod episode;
pub mod evaluate;
pub mod fitness;
pub mod session;

pub use episode::{Episode, EpisodeState, Outcome};
pub use evaluate::Evaluator;
pub use fitness::FitnessPolicy;
pub use session::{replay, train};
