// Evolution driver: owns the genomes and asks the game to score them

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use super::controller::{Controller, OBSERVATION_SIZE};
use super::network::Network;
use super::reporter::StatisticsReporter;
use crate::config::EvolutionConfig;
use crate::error::{Result, SimError};

/// One candidate of a generation and the fitness the game gives it
#[derive(Debug, Clone)]
pub struct AgentRecord<C> {
    pub id: usize,
    pub controller: C,
    pub fitness: f64,
}

impl<C> AgentRecord<C> {
    pub fn new(id: usize, controller: C) -> Self {
        Self {
            id,
            controller,
            fitness: 0.0,
        }
    }
}

/// Per-generation state handed to the evaluation callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationInfo {
    /// 1-based generation number
    pub index: usize,
    pub population: usize,
}

/// Whether the driver should keep evolving after an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The user closed the window; end the run without scoring this generation
    Stop,
}

#[derive(Debug, Clone)]
pub struct RunSummary<C> {
    pub generations: usize,
    pub stopped_by_user: bool,
    /// Best controller of any fully scored generation, with its fitness
    pub best: Option<(C, f64)>,
}

/// Something that breeds controllers and needs them scored once per generation
pub trait EvolutionDriver {
    type Controller: Controller + Clone;

    /// Evolve for at most `generations` generations.
    ///
    /// `evaluate` must fill in `fitness` for every record it is given.
    fn run<F>(&mut self, generations: usize, evaluate: F) -> Result<RunSummary<Self::Controller>>
    where
        F: FnMut(&GenerationInfo, &mut [AgentRecord<Self::Controller>]) -> Result<Flow>;
}

/// Fixed-topology population with elitism and mutation-only reproduction
pub struct Population {
    config: EvolutionConfig,
    genomes: Vec<Network>,
    generation: usize,
    next_id: usize,
    rng: StdRng,
    reporter: StatisticsReporter,
}

impl Population {
    pub fn new(config: EvolutionConfig, outputs: usize, mut rng: StdRng) -> Result<Self> {
        if config.population_size < 2 {
            return Err(SimError::PopulationTooSmall(config.population_size));
        }

        let genomes = (0..config.population_size)
            .map(|_| {
                Network::random(
                    OBSERVATION_SIZE,
                    config.hidden_nodes,
                    outputs,
                    config.weight_init_stdev,
                    &mut rng,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config,
            genomes,
            generation: 0,
            next_id: 0,
            rng,
            reporter: StatisticsReporter::new(),
        })
    }

    pub fn genomes(&self) -> &[Network] {
        &self.genomes
    }

    pub fn reporter(&self) -> &StatisticsReporter {
        &self.reporter
    }

    fn spawn_records(&mut self) -> Vec<AgentRecord<Network>> {
        self.genomes
            .drain(..)
            .map(|genome| {
                let record = AgentRecord::new(self.next_id, genome);
                self.next_id += 1;
                record
            })
            .collect()
    }

    /// Build the next generation from records sorted best first
    fn reproduce(&mut self, ranked: Vec<AgentRecord<Network>>) -> Result<Vec<Network>> {
        let size = self.config.population_size;
        let cutoff = (ranked.len() as f64 * self.config.survival_threshold).ceil() as usize;
        let keep = cutoff.max(self.config.elitism).clamp(1, ranked.len());

        let parents: Vec<Network> = ranked
            .into_iter()
            .take(keep)
            .map(|record| record.controller)
            .collect();

        let mut next: Vec<Network> = parents.iter().take(self.config.elitism).cloned().collect();
        while next.len() < size {
            let Some(parent) = parents.choose(&mut self.rng) else {
                break;
            };
            let mut child = parent.clone();
            child.mutate(&self.config, &mut self.rng)?;
            next.push(child);
        }

        debug!(parents = parents.len(), elites = self.config.elitism, "reproduced");
        Ok(next)
    }
}

impl EvolutionDriver for Population {
    type Controller = Network;

    fn run<F>(&mut self, generations: usize, mut evaluate: F) -> Result<RunSummary<Network>>
    where
        F: FnMut(&GenerationInfo, &mut [AgentRecord<Network>]) -> Result<Flow>,
    {
        let mut summary = RunSummary {
            generations: 0,
            stopped_by_user: false,
            best: None,
        };

        for _ in 0..generations {
            let mut records = self.spawn_records();
            if records.len() < 2 {
                return Err(SimError::PopulationTooSmall(records.len()));
            }

            self.generation += 1;
            let info = GenerationInfo {
                index: self.generation,
                population: records.len(),
            };

            if evaluate(&info, &mut records[..])? == Flow::Stop {
                info!(generation = info.index, "run stopped before generation finished");
                // Unscored genomes go back so the population survives the interruption
                self.genomes = records.into_iter().map(|r| r.controller).collect();
                summary.stopped_by_user = true;
                break;
            }
            summary.generations += 1;

            records.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
            let fitness: Vec<f64> = records.iter().map(|r| r.fitness).collect();
            self.reporter.record(info.index, &fitness);

            let champion = &records[0];
            if summary.best.as_ref().map_or(true, |(_, f)| champion.fitness > *f) {
                summary.best = Some((champion.controller.clone(), champion.fitness));
            }

            let solved = self
                .config
                .fitness_threshold
                .is_some_and(|threshold| champion.fitness >= threshold);

            self.genomes = self.reproduce(records)?;

            if solved {
                info!(generation = info.index, "fitness threshold reached");
                break;
            }
        }

        if let Some(best) = self.reporter.best_ever() {
            info!(generation = best.generation, fitness = best.best, "best generation of the run");
        }
        Ok(summary)
    }
}
