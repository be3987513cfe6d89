// Per-generation fitness statistics

use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    pub population: usize,
    pub best: f64,
    pub mean: f64,
    pub stdev: f64,
}

impl GenerationStats {
    /// Summarise one generation's fitness values, `None` if there are none
    pub fn from_fitness(generation: usize, fitness: &[f64]) -> Option<Self> {
        if fitness.is_empty() {
            return None;
        }

        let n = fitness.len() as f64;
        let best = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = fitness.iter().sum::<f64>() / n;
        let variance = fitness.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            generation,
            population: fitness.len(),
            best,
            mean,
            stdev: variance.sqrt(),
        })
    }
}

/// Keeps the history of a run and logs each finished generation
#[derive(Debug, Default)]
pub struct StatisticsReporter {
    history: Vec<GenerationStats>,
}

impl StatisticsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, generation: usize, fitness: &[f64]) {
        let Some(stats) = GenerationStats::from_fitness(generation, fitness) else {
            return;
        };

        info!(
            generation = stats.generation,
            population = stats.population,
            best = format_args!("{:.3}", stats.best),
            mean = format_args!("{:.3}", stats.mean),
            stdev = format_args!("{:.3}", stats.stdev),
            "generation finished"
        );
        self.history.push(stats);
    }

    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// The highest best-of-generation fitness seen so far
    pub fn best_ever(&self) -> Option<&GenerationStats> {
        self.history
            .iter()
            .max_by(|a, b| a.best.total_cmp(&b.best))
    }
}
