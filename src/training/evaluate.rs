// Per-generation evaluation: plays every agent's episode and writes its fitness

use rand::Rng;
use tracing::{debug, info};

use super::episode::{check_arity, Episode};
use super::fitness::FitnessPolicy;
use crate::ai::{AgentRecord, Controller, Flow, GenerationInfo};
use crate::config::{Config, EvaluationMode, PaddleControl, PhysicsConfig};
use crate::error::{Result, SimError};
use crate::game::Field;
use crate::ui::{FrameSink, FrameView, SinkSignal};

pub struct Evaluator<S, R> {
    physics: PhysicsConfig,
    field: Field,
    policy: FitnessPolicy,
    mode: EvaluationMode,
    control: PaddleControl,
    sink: S,
    rng: R,
}

impl<S: FrameSink, R: Rng> Evaluator<S, R> {
    pub fn new(config: &Config, sink: S, rng: R) -> Self {
        Self {
            physics: config.physics.clone(),
            field: Field::from_physics(&config.physics),
            policy: FitnessPolicy::from_config(&config.fitness),
            mode: config.training.mode,
            control: config.training.paddle_control,
            sink,
            rng,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Score one generation, the callback handed to the evolution driver.
    ///
    /// Every record's fitness is reset and then written by its episode. Returns
    /// `Flow::Stop` as soon as the sink reports the window was closed.
    pub fn evaluate<C: Controller>(
        &mut self,
        info: &GenerationInfo,
        records: &mut [AgentRecord<C>],
    ) -> Result<Flow> {
        if records.len() < 2 {
            return Err(SimError::PopulationTooSmall(records.len()));
        }
        for record in records.iter() {
            check_arity(&record.controller, self.control)?;
        }
        for record in records.iter_mut() {
            record.fitness = 0.0;
        }

        debug!(generation = info.index, agents = records.len(), mode = ?self.mode, "evaluating");
        match self.mode {
            EvaluationMode::Lockstep => self.lockstep(info, records),
            EvaluationMode::Sequential => self.sequential(info, records),
        }
    }

    /// All agents share the tick loop; each plays its own ball until it is retired
    fn lockstep<C: Controller>(
        &mut self,
        info: &GenerationInfo,
        records: &mut [AgentRecord<C>],
    ) -> Result<Flow> {
        let mut episodes: Vec<Episode> = records
            .iter()
            .map(|_| Episode::new(&self.physics, &mut self.rng))
            .collect();

        loop {
            for (episode, record) in episodes.iter_mut().zip(records.iter_mut()) {
                if episode.is_running() {
                    record.fitness += episode.advance(self.field, &self.policy);
                    if !episode.is_running() {
                        debug!(agent = record.id, fitness = record.fitness, "agent retired");
                    }
                }
            }

            let active = episodes.iter().filter(|e| e.is_running()).count();
            if active == 0 {
                return Ok(Flow::Continue);
            }

            for (episode, record) in episodes.iter_mut().zip(records.iter()) {
                episode.steer(&record.controller, self.control, self.field)?;
            }

            let Some(shown) = episodes.iter().position(|e| e.is_running()) else {
                continue;
            };
            let view = FrameView {
                field: self.field,
                ball: &episodes[shown].ball,
                left: &episodes[shown].left,
                right: &episodes[shown].right,
                generation: info.index,
                fitness: records[shown].fitness,
                active,
            };
            if self.sink.present(&view)? == SinkSignal::Close {
                info!(generation = info.index, "window closed");
                return Ok(Flow::Stop);
            }
        }
    }

    /// Agents play one after another
    fn sequential<C: Controller>(
        &mut self,
        info: &GenerationInfo,
        records: &mut [AgentRecord<C>],
    ) -> Result<Flow> {
        let total = records.len();
        for (i, record) in records.iter_mut().enumerate() {
            match self.play(&record.controller, info.index, total - i)? {
                Some(fitness) => {
                    record.fitness = fitness;
                    debug!(agent = record.id, fitness, "agent retired");
                }
                None => {
                    info!(generation = info.index, "window closed");
                    return Ok(Flow::Stop);
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Play a single episode to the end, `None` if the window was closed first
    pub fn play<C: Controller + ?Sized>(
        &mut self,
        controller: &C,
        generation: usize,
        active: usize,
    ) -> Result<Option<f64>> {
        check_arity(controller, self.control)?;

        let mut episode = Episode::new(&self.physics, &mut self.rng);
        let mut fitness = 0.0;

        loop {
            fitness += episode.tick(controller, self.control, self.field, &self.policy)?;
            if !episode.is_running() {
                return Ok(Some(fitness));
            }

            let view = FrameView {
                field: self.field,
                ball: &episode.ball,
                left: &episode.left,
                right: &episode.right,
                generation,
                fitness,
                active,
            };
            if self.sink.present(&view)? == SinkSignal::Close {
                return Ok(None);
            }
        }
    }
}
