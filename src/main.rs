use std::io::{self, Stdout};
use std::path::PathBuf;

use anyhow::{bail, Context};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use neuropong::ai::{Network, Population, RunSummary};
use neuropong::config::{self, Config};
use neuropong::logging::{self, LogTarget};
use neuropong::training::{self, Evaluator};
use neuropong::ui::{FrameSink, HeadlessSink, TerminalSink};

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    headless: bool,
    generations: Option<usize>,
    seed: Option<u64>,
    save: Option<PathBuf>,
    replay: Option<PathBuf>,
    episodes: Option<usize>,
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args)?;

    let log_target = if options.headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(logging::default_log_path())
    };
    logging::init(log_target, options.debug).context("failed to set up logging")?;

    let config_path = options.config.clone().unwrap_or_else(config::get_config_path);
    let mut config = config::load_config(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    if let Some(generations) = options.generations {
        config.training.generations = generations;
    }
    if options.seed.is_some() {
        config.training.seed = options.seed;
    }
    info!(config = %config_path.display(), "configuration loaded");

    if let Some(path) = &options.replay {
        let network = Network::load(path)
            .with_context(|| format!("failed to load genome {}", path.display()))?;
        let scores = if options.headless {
            run_replay(&config, &network, HeadlessSink::default(), options.episodes.or(Some(1)))?
        } else {
            with_terminal(|terminal| {
                let sink = TerminalSink::new(terminal, config.display.clone());
                run_replay(&config, &network, sink, options.episodes)
            })?
        };
        println!("Played {} episode(s): {:?}", scores.len(), scores);
        return Ok(());
    }

    let summary = if options.headless {
        run_training(&config, HeadlessSink::default())?
    } else {
        with_terminal(|terminal| {
            let sink = TerminalSink::new(terminal, config.display.clone());
            run_training(&config, sink)
        })?
    };

    println!(
        "Ran {} generation(s){}",
        summary.generations,
        if summary.stopped_by_user { ", stopped by user" } else { "" }
    );

    if let Some((best, fitness)) = &summary.best {
        let save_path = options.save.clone().unwrap_or_else(|| {
            config_path.with_file_name("best-genome.json")
        });
        best.save(&save_path)
            .with_context(|| format!("failed to save genome to {}", save_path.display()))?;
        println!("Best fitness {:.1}, genome saved to {}", fitness, save_path.display());
    }

    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn run_training<S: FrameSink>(config: &Config, sink: S) -> anyhow::Result<RunSummary<Network>> {
    let mut rng = seeded_rng(config.training.seed);
    let population_rng = StdRng::seed_from_u64(rng.gen());

    let mut population = Population::new(
        config.evolution.clone(),
        config.training.paddle_control.outputs(),
        population_rng,
    )?;
    let mut evaluator = Evaluator::new(config, sink, rng);

    let summary = training::train(&mut population, &mut evaluator, config.training.generations)?;
    Ok(summary)
}

fn run_replay<S: FrameSink>(
    config: &Config,
    network: &Network,
    sink: S,
    episodes: Option<usize>,
) -> anyhow::Result<Vec<f64>> {
    let mut evaluator = Evaluator::new(config, sink, seeded_rng(config.training.seed));
    let scores = training::replay(network, &mut evaluator, episodes)?;
    Ok(scores)
}

/// Undoes raw mode and the alternate screen when dropped, whichever steps of
/// the setup actually succeeded
struct TerminalGuard {
    alternate_screen: bool,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut guard = TerminalGuard {
            alternate_screen: false,
        };
        execute!(io::stdout(), EnterAlternateScreen)?;
        guard.alternate_screen = true;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        if self.alternate_screen {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

/// Run `f` inside the alternate screen, restoring the terminal on every exit path
fn with_terminal<T>(f: impl FnOnce(&mut Tui) -> anyhow::Result<T>) -> anyhow::Result<T> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = f(&mut terminal);
    terminal.show_cursor()?;

    result
}

fn parse_args(args: &[String]) -> anyhow::Result<Options> {
    let mut options = Options::default();
    let program = args.first().map(String::as_str).unwrap_or("neuropong");
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .with_context(|| format!("{} requires a value", arg))
        };

        match arg.as_str() {
            "--config" | "-c" => options.config = Some(PathBuf::from(value()?)),
            "--headless" => options.headless = true,
            "--generations" | "-g" => {
                options.generations = Some(value()?.parse().context("--generations expects a number")?)
            }
            "--seed" => options.seed = Some(value()?.parse().context("--seed expects a number")?),
            "--save" => options.save = Some(PathBuf::from(value()?)),
            "--replay" => options.replay = Some(PathBuf::from(value()?)),
            "--episodes" => {
                options.episodes = Some(value()?.parse().context("--episodes expects a number")?)
            }
            "--debug" => options.debug = true,
            "--help" | "-h" => {
                print_usage(program);
                std::process::exit(0);
            }
            other => {
                print_usage(program);
                bail!("unknown argument: {}", other);
            }
        }
    }

    Ok(options)
}

fn print_usage(program: &str) {
    println!("NeuroPong - evolve neural networks that play Pong");
    println!();
    println!("Usage:");
    println!("  {} [options]", program);
    println!();
    println!("Options:");
    println!("  -c, --config <path>       Config file (default: <config dir>/neuropong/config.toml)");
    println!("  -g, --generations <n>     Number of generations to run");
    println!("      --seed <n>            Seed the random number generator");
    println!("      --headless            Train without drawing, log to stderr");
    println!("      --save <path>         Where to write the best genome (JSON)");
    println!("      --replay <path>       Watch a saved genome play instead of training");
    println!("      --episodes <n>        Episodes to replay (default: until q)");
    println!("      --debug               Log per-agent events");
    println!("  -h, --help                Show this help");
    println!();
    println!("Press q or Esc to stop.");
}
