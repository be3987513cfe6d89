// Fixed-topology feed-forward network used as the evolved genome

use std::fs;
use std::path::Path;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use super::controller::{Controller, Observation, OBSERVATION_SIZE};
use crate::config::EvolutionConfig;
use crate::error::{Result, SimError};

/// One fully connected tanh layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub inputs: usize,
    pub outputs: usize,
    /// Row-major, one row of `inputs` weights per output
    pub weights: Vec<f64>,
    pub biases: Vec<f64>,
}

impl Layer {
    fn random<R: Rng + ?Sized>(
        inputs: usize,
        outputs: usize,
        init: &Normal<f64>,
        rng: &mut R,
    ) -> Self {
        Self {
            inputs,
            outputs,
            weights: (0..inputs * outputs).map(|_| init.sample(rng)).collect(),
            biases: (0..outputs).map(|_| init.sample(rng)).collect(),
        }
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .chunks(self.inputs)
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                (sum + bias).tanh()
            })
            .collect()
    }

    fn genes_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.weights.iter_mut().chain(self.biases.iter_mut())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// A network with `hidden` tanh units (none = inputs wired straight to outputs)
    pub fn random<R: Rng + ?Sized>(
        inputs: usize,
        hidden: usize,
        outputs: usize,
        init_stdev: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let init = normal(init_stdev)?;
        let layers = if hidden == 0 {
            vec![Layer::random(inputs, outputs, &init, rng)]
        } else {
            vec![
                Layer::random(inputs, hidden, &init, rng),
                Layer::random(hidden, outputs, &init, rng),
            ]
        };
        Ok(Self { layers })
    }

    pub fn inputs(&self) -> usize {
        self.layers.first().map_or(0, |l| l.inputs)
    }

    pub fn outputs(&self) -> usize {
        self.layers.last().map_or(0, |l| l.outputs)
    }

    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut values = input.to_vec();
        for layer in &self.layers {
            values = layer.forward(&values);
        }
        values
    }

    /// Perturb or redraw each weight and bias with the configured probabilities
    pub fn mutate<R: Rng + ?Sized>(&mut self, config: &EvolutionConfig, rng: &mut R) -> Result<()> {
        let perturb = normal(config.weight_mutate_power)?;
        let replace = normal(config.weight_init_stdev)?;
        let limit = config.weight_max_value;

        for layer in &mut self.layers {
            for gene in layer.genes_mut() {
                let roll: f64 = rng.gen();
                if roll < config.weight_mutate_rate {
                    *gene += perturb.sample(rng);
                } else if roll < config.weight_mutate_rate + config.weight_replace_rate {
                    *gene = replace.sample(rng);
                }
                *gene = gene.clamp(-limit, limit);
            }
        }
        Ok(())
    }

    /// Check that layer shapes chain together and match the observation size
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(SimError::Genome("network has no layers".to_string()));
        }
        if self.inputs() != OBSERVATION_SIZE {
            return Err(SimError::Genome(format!(
                "network takes {} inputs, observations have {}",
                self.inputs(),
                OBSERVATION_SIZE
            )));
        }

        let mut width = self.inputs();
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.inputs != width
                || layer.outputs == 0
                || layer.weights.len() != layer.inputs * layer.outputs
                || layer.biases.len() != layer.outputs
            {
                return Err(SimError::Genome(format!("layer {} has inconsistent shape", i)));
            }
            width = layer.outputs;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SimError::Genome(format!("cannot serialize network: {}", e)))?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let network: Network = serde_json::from_str(&contents)
            .map_err(|e| SimError::Genome(format!("{}: {}", path.display(), e)))?;
        network.validate()?;
        Ok(network)
    }
}

impl Controller for Network {
    fn activate(&self, observation: &Observation) -> Vec<f64> {
        self.forward(observation.as_slice())
    }

    fn output_size(&self) -> usize {
        self.outputs()
    }
}

fn normal(stdev: f64) -> Result<Normal<f64>> {
    Normal::new(0.0, stdev)
        .map_err(|e| SimError::InvalidConfig(format!("bad standard deviation {}: {}", stdev, e)))
}
