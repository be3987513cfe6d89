// Configuration module for NeuroPong
// Handles loading and validating the TOML parameter file

pub mod loader;
pub mod types;

pub use loader::{create_default_config, get_config_path, load_config};
pub use types::{
    Config, DisplayConfig, EvaluationMode, EvolutionConfig, FitnessConfig, PaddleControl,
    PhysicsConfig, TrainingConfig,
};
