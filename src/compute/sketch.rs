//! Sketch engine: binds the circle generators and the image objective to
//! the search strategies and runs one optimization.

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use super::objective::ImageObjective;
use super::primitive::{CircleParams, neighbor_sketch, random_sketch};
use super::raster::RgbBuffer;
use super::search::run_search;
use crate::schema::{Circle, ConfigError, Sketch, SketchConfig};

/// Errors raised while setting up a run or moving its data to and from disk.
#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Target image is empty")]
    EmptyTarget,
    #[error("No runs requested")]
    NoRuns,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Counters and timing for a finished run.
#[derive(Debug, Clone, Copy)]
pub struct SketchStats {
    /// Objective evaluations spent by the search.
    pub evaluations: usize,
    /// Candidates accepted as the new best.
    pub accepted: usize,
    /// Random restarts taken.
    pub restarts: usize,
    /// Figures in the best sketch.
    pub figures: usize,
    /// Wall time of the search.
    pub elapsed_seconds: f64,
    /// Search throughput.
    pub evaluations_per_second: f64,
}

impl std::fmt::Display for SketchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} evaluations ({} accepted, {} restarts) in {:.2}s ({:.1} evals/s), {} figures",
            self.evaluations,
            self.accepted,
            self.restarts,
            self.elapsed_seconds,
            self.evaluations_per_second,
            self.figures
        )
    }
}

/// Best sketch found by a run and its final rendering.
#[derive(Debug, Clone)]
pub struct SketchResult {
    pub sketch: Sketch<Circle>,
    pub score: f64,
    pub canvas: RgbBuffer,
    /// Seed the run's random source was created from.
    pub seed: u64,
    pub stats: SketchStats,
}

/// Runs the configured search against one target image.
pub struct SketchEngine<'a> {
    config: SketchConfig,
    target: &'a RgbBuffer,
    rng: StdRng,
    seed: u64,
}

impl<'a> SketchEngine<'a> {
    /// Create an engine. Draws a seed when the config has none.
    pub fn new(config: SketchConfig, target: &'a RgbBuffer) -> Result<Self, SketchError> {
        config.validate()?;
        if target.is_empty() {
            return Err(SketchError::EmptyTarget);
        }

        let seed = config.random_seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            target,
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run the search to completion and render the best sketch.
    pub fn run(&mut self) -> SketchResult {
        let start = Instant::now();
        let (width, height) = (self.target.width(), self.target.height());
        let params = CircleParams::new(width, height, self.config.min_diameter);
        let max_figures = self.config.max_figures;

        log::info!(
            "Sketching {}x{} target: {:?}, {} evaluations, up to {} figures, seed {}",
            width,
            height,
            self.config.algorithm,
            self.config.evaluations,
            max_figures,
            self.seed
        );

        let mut objective = ImageObjective::new(self.target);
        let outcome = run_search(
            self.config.algorithm,
            &mut self.rng,
            |sketch: &Sketch<Circle>| objective.score(&sketch.figures),
            |rng: &mut StdRng, sketch: &Sketch<Circle>| neighbor_sketch(rng, &params, sketch),
            |rng: &mut StdRng| random_sketch::<Circle, _>(rng, &params, max_figures),
            self.config.evaluations,
            self.config.neighborhood_size,
        );
        let canvas = objective.render(&outcome.solution.figures).clone();

        let elapsed = start.elapsed().as_secs_f64();
        let stats = SketchStats {
            evaluations: outcome.stats.evaluations,
            accepted: outcome.stats.accepted,
            restarts: outcome.stats.restarts,
            figures: outcome.solution.len(),
            elapsed_seconds: elapsed,
            evaluations_per_second: if elapsed > 0.0 {
                outcome.stats.evaluations as f64 / elapsed
            } else {
                0.0
            },
        };

        log::info!("Finished with score {:.4}: {}", outcome.score, stats);

        SketchResult {
            sketch: outcome.solution,
            score: outcome.score,
            canvas,
            seed: self.seed,
            stats,
        }
    }
}

/// Run one independent search per seed in parallel and keep the best.
///
/// Each run owns its objective and random source, so results match what
/// sequential runs with the same seeds would produce.
pub fn run_independent(
    target: &RgbBuffer,
    config: &SketchConfig,
    seeds: &[u64],
) -> Result<SketchResult, SketchError> {
    if seeds.is_empty() {
        return Err(SketchError::NoRuns);
    }

    let results = seeds
        .par_iter()
        .map(|&seed| {
            let config = SketchConfig {
                random_seed: Some(seed),
                ..config.clone()
            };
            SketchEngine::new(config, target).map(|mut engine| engine.run())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let best = results
        .into_iter()
        .min_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or(SketchError::NoRuns)?;

    log::info!(
        "Best of {} runs: score {:.4} (seed {})",
        seeds.len(),
        best.score,
        best.seed
    );
    Ok(best)
}
