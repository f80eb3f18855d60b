//! Trace completion estimation.
//!
//! Decides whether the ink laid down so far "fills" the glyph's bounding box.
//! The default policy is a Monte-Carlo estimate: draw uniform samples inside
//! the region and count those within brush radius of any ink point.  The
//! estimate is noisy and is re-drawn on every evaluation; `confirm_frames`
//! can demand several consecutive positive evaluations before reporting
//! completion.  A cheap point-count policy is available as an alternative.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::geometry::{Point, TargetRegion};
use crate::ink::InkTrail;

// ── Policy ─────────────────────────────────────────────────

/// Rule that decides completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompletionPolicy {
    /// Fraction of random samples covered by ink exceeds `threshold`.
    #[default]
    CoverageSampling,
    /// Trail holds more than `max_points` points.
    PointCount,
}

impl CompletionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoverageSampling => "coverage",
            Self::PointCount => "point-count",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "coverage" => Some(Self::CoverageSampling),
            "point-count" => Some(Self::PointCount),
            _ => None,
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Completion thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub policy: CompletionPolicy,
    /// Samples drawn per coverage evaluation.
    pub samples: usize,
    /// Coverage ratio that must be exceeded (0.0-1.0).
    pub threshold: f32,
    /// A sample within this distance of an ink point counts as covered.
    pub brush_radius: f32,
    /// Point-count policy: complete once the trail is longer than this.
    pub max_points: usize,
    /// Consecutive positive evaluations required (1 = none).
    pub confirm_frames: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            policy: CompletionPolicy::CoverageSampling,
            samples: 100,
            threshold: 0.5,
            brush_radius: 20.0,
            max_points: 80,
            confirm_frames: 1,
        }
    }
}

// ── Estimator ──────────────────────────────────────────────

/// Stateful completion check for the active target.
#[derive(Debug, Clone)]
pub struct TraceProgressEstimator {
    pub config: CompletionConfig,
    rng: StdRng,
    /// Consecutive positive evaluations so far.
    streak: u32,
    /// Ratio from the most recent evaluation.
    last_ratio: f32,
}

impl TraceProgressEstimator {
    /// Estimator seeded from the operating system.
    pub fn new(config: CompletionConfig) -> Self {
        Self::from_rng(config, StdRng::from_os_rng())
    }

    /// Estimator with a fixed seed, for reproducible runs.
    pub fn with_seed(config: CompletionConfig, seed: u64) -> Self {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: CompletionConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            streak: 0,
            last_ratio: 0.0,
        }
    }

    /// Estimate the covered fraction of `region` with fresh samples.
    ///
    /// An empty trail or a zero sample count yields 0.0.
    pub fn coverage_ratio(&mut self, trail: &InkTrail, region: &TargetRegion) -> f32 {
        let samples = self.config.samples;
        if trail.is_empty() || samples == 0 {
            return 0.0;
        }

        let radius = self.config.brush_radius;
        let mut covered = 0usize;
        for _ in 0..samples {
            let u: f32 = self.rng.random();
            let v: f32 = self.rng.random();
            if is_covered(region.at(u, v), trail, radius) {
                covered += 1;
            }
        }

        covered as f32 / samples as f32
    }

    /// Progress in `[0, 1]` under the configured policy, without touching the streak.
    pub fn progress(&mut self, trail: &InkTrail, region: &TargetRegion) -> f32 {
        match self.config.policy {
            CompletionPolicy::CoverageSampling => self.coverage_ratio(trail, region),
            CompletionPolicy::PointCount => {
                let max = self.config.max_points.max(1);
                (trail.len() as f32 / max as f32).min(1.0)
            }
        }
    }

    /// Evaluate once and report whether the target counts as complete.
    pub fn is_complete(&mut self, trail: &InkTrail, region: &TargetRegion) -> bool {
        let passed = match self.config.policy {
            CompletionPolicy::CoverageSampling => {
                let ratio = self.coverage_ratio(trail, region);
                self.last_ratio = ratio;
                ratio > self.config.threshold
            }
            CompletionPolicy::PointCount => {
                self.last_ratio = self.progress(trail, region);
                trail.len() > self.config.max_points
            }
        };

        if passed {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.streak = 0;
        }

        let complete = passed && self.streak >= self.config.confirm_frames.max(1);
        if complete {
            debug!(
                "Trace complete: policy={} ratio={:.2} points={} streak={}",
                self.config.policy.as_str(),
                self.last_ratio,
                trail.len(),
                self.streak,
            );
        }
        complete
    }

    /// Forget the streak and last ratio (new target).
    pub fn reset(&mut self) {
        self.streak = 0;
        self.last_ratio = 0.0;
    }

    pub fn last_ratio(&self) -> f32 {
        self.last_ratio
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Generate s-expression of the current configuration.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:completion :{} :samples {} :threshold {} :brush-radius {} :max-points {} :confirm-frames {})",
            self.config.policy.as_str(),
            self.config.samples,
            self.config.threshold,
            self.config.brush_radius,
            self.config.max_points,
            self.config.confirm_frames,
        )
    }
}

/// Whether `sample` lies strictly within `radius` of any ink point.
fn is_covered(sample: Point, trail: &InkTrail, radius: f32) -> bool {
    trail.iter().any(|p| p.position.distance(sample) < radius)
}

// ── Tests ──────────────────────────────────────────────────
