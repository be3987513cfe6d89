// Top-level run loops: evolve a population, or watch one saved controller play

use rand::Rng;
use tracing::info;

use super::evaluate::Evaluator;
use crate::ai::{Controller, EvolutionDriver, RunSummary};
use crate::error::Result;
use crate::ui::FrameSink;

/// Evolve for up to `generations` generations, scoring each one with `evaluator`
pub fn train<D, S, R>(
    driver: &mut D,
    evaluator: &mut Evaluator<S, R>,
    generations: usize,
) -> Result<RunSummary<D::Controller>>
where
    D: EvolutionDriver,
    S: FrameSink,
    R: Rng,
{
    info!(generations, "training started");
    let summary = driver.run(generations, |info, records| evaluator.evaluate(info, records))?;

    match &summary.best {
        Some((_, fitness)) => info!(
            generations = summary.generations,
            best_fitness = fitness,
            stopped_by_user = summary.stopped_by_user,
            "training finished"
        ),
        None => info!(stopped_by_user = summary.stopped_by_user, "training finished without a scored generation"),
    }
    Ok(summary)
}

/// Replay one controller episode after episode until the window is closed or
/// `max_episodes` have been played. Returns each episode's fitness.
pub fn replay<C, S, R>(
    controller: &C,
    evaluator: &mut Evaluator<S, R>,
    max_episodes: Option<usize>,
) -> Result<Vec<f64>>
where
    C: Controller + ?Sized,
    S: FrameSink,
    R: Rng,
{
    let mut scores = Vec::new();
    while max_episodes.map_or(true, |max| scores.len() < max) {
        match evaluator.play(controller, 0, 1)? {
            Some(fitness) => {
                info!(episode = scores.len() + 1, fitness, "replay episode finished");
                scores.push(fitness);
            }
            None => break,
        }
    }
    Ok(scores)
}
