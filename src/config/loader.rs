// Configuration file loading and creation

use super::types::Config;
use crate::error::{Result, SimError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Get the path to the default configuration file
pub fn get_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("neuropong");
    path.push("config.toml");
    path
}

/// Load configuration from `path`, writing a default file first if none exists.
///
/// Unlike a missing file, a file that does not parse or validate is a startup
/// failure: training never starts with settings the user did not ask for.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        let contents = fs::read_to_string(path)?;
        parse_config(&contents, path)?
    } else {
        create_default_config(path)?;
        Config::default()
    };

    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    toml::from_str(contents).map_err(|source| SimError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Create a default configuration file with helpful comments
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let config = Config::default();
    let toml_string = toml::to_string_pretty(&config)
        .map_err(|e| SimError::InvalidConfig(format!("cannot serialize defaults: {}", e)))?;

    let commented_toml = format!(
        "# NeuroPong Configuration File\n\
         # Edit this file to tune the game and the evolution run\n\
         #\n\
         # training.mode: \"lockstep\" (whole population at once) or \"sequential\"\n\
         # training.paddle_control: \"shared\" (one output) or \"independent\" (one per paddle)\n\
         # fitness.max_ticks: remove the line to let episodes run until the ball leaves\n\
         #\n\
         # Colors: RGB values from 0-255\n\n\
         {}",
        toml_string
    );

    fs::write(path, commented_toml)?;
    info!(path = %path.display(), "created default config file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EvaluationMode, PaddleControl};

    fn scratch_path(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("neuropong-test-{}-{}", std::process::id(), name));
        let _ = fs::remove_dir_all(&dir);
        dir.push("config.toml");
        dir
    }

    #[test]
    fn test_default_config_serialization() {
        let config = Config::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        let parsed: Config = toml::from_str(&toml_string).unwrap();

        assert_eq!(parsed.physics.window_width, config.physics.window_width);
        assert_eq!(parsed.physics.paddle_height, config.physics.paddle_height);
        assert_eq!(parsed.fitness.max_ticks, config.fitness.max_ticks);
        assert_eq!(parsed.training.mode, config.training.mode);
        assert_eq!(
            parsed.evolution.population_size,
            config.evolution.population_size
        );
        assert_eq!(parsed.display.target_fps, config.display.target_fps);
    }

    #[test]
    fn test_partial_config_with_defaults() {
        let partial_toml = r#"
            [physics]
            paddle_height = 300.0

            [training]
            mode = "sequential"
            paddle_control = "independent"
        "#;

        let config: Config = toml::from_str(partial_toml).unwrap();

        assert_eq!(config.physics.paddle_height, 300.0);
        assert_eq!(config.training.mode, EvaluationMode::Sequential);
        assert_eq!(config.training.paddle_control, PaddleControl::Independent);

        // Untouched fields keep their defaults
        assert_eq!(config.physics.window_height, 800.0);
        assert_eq!(config.fitness.collision_reward, 100.0);
        assert_eq!(config.training.generations, 1000);
    }

    #[test]
    fn test_missing_file_is_created() {
        let path = scratch_path("missing");
        let config = load_config(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.physics.window_width, 1200.0);

        // The written file loads back
        let reloaded = load_config(&path).unwrap();
        assert_eq!(
            reloaded.evolution.population_size,
            config.evolution.population_size
        );
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = scratch_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[physics\npaddle_height = ").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, SimError::ConfigParse { .. }));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_invalid_values_are_an_error() {
        let path = scratch_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[evolution]\npopulation_size = 1\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, SimError::PopulationTooSmall(1)));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
