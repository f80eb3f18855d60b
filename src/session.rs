//! The per-frame tracing session.
//!
//! A `Session` owns every piece of mutable state (latest hands, brush handle,
//! ink trail, curriculum cursor, cached glyph region) and is advanced by the
//! caller once per rendered frame with `update`.  Nothing here blocks, and
//! nothing here fails: frames that cannot be processed are skipped and
//! reported through `FrameOutcome`.

use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::coverage::TraceProgressEstimator;
use crate::curriculum::{CurriculumCursor, CursorState};
use crate::error::ConfigError;
use crate::feed::{HandFeed, HandObserver};
use crate::geometry::{Point, TargetRegion};
use crate::gesture::{GestureTracker, PointerEvent};
use crate::hand::HandObservation;
use crate::ink::{InkColor, InkTrail};
use crate::sexp::{escape_string, sexp_bool};

// ── Font metrics ───────────────────────────────────────────

/// Source of glyph bounding boxes (the renderer's font metrics).
pub trait GlyphMetrics {
    /// Bounding box of `symbol` drawn centred at `center` with `font_size`,
    /// or `None` if the font is not ready yet.
    fn text_bounds(&self, symbol: &str, center: Point, font_size: f32) -> Option<TargetRegion>;
}

impl<F> GlyphMetrics for F
where
    F: Fn(&str, Point, f32) -> Option<TargetRegion>,
{
    fn text_bounds(&self, symbol: &str, center: Point, font_size: f32) -> Option<TargetRegion> {
        self(symbol, center, font_size)
    }
}

// ── Frame outcome ──────────────────────────────────────────

/// Why a frame was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The hand feed is stopped; state is frozen.
    Frozen,
    /// Glyph metrics were not available; retried next frame.
    MetricsUnavailable,
}

/// What one call to `Session::update` did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    Skipped(SkipReason),
    /// Curriculum finished; input is ignored.
    Finished,
    /// Processed; `drawing` is whether the pointer touched the handle and
    /// `appended` whether a point was added to the trail.
    Traced { drawing: bool, appended: bool },
    /// The target completed and the cursor moved.
    Advanced(CursorState),
}

// ── Session ────────────────────────────────────────────────

pub struct Session<M: GlyphMetrics> {
    config: SessionConfig,
    metrics: M,
    feed: HandFeed,
    tracker: GestureTracker,
    estimator: TraceProgressEstimator,
    cursor: CurriculumCursor,
    trail: InkTrail,
    /// Bounding box of the current glyph; `None` until metrics answer.
    region: Option<TargetRegion>,
    /// Brush handle the gesture is tested against.
    anchor: Point,
    pointer: PointerEvent,
    ink_color: Option<InkColor>,
    frames: u64,
}

impl<M: GlyphMetrics> Session<M> {
    /// Create a session; the configuration is validated first.
    pub fn new(config: SessionConfig, metrics: M) -> Result<Self, ConfigError> {
        let estimator = TraceProgressEstimator::new(config.completion.clone());
        Self::with_estimator(config, metrics, estimator)
    }

    /// Create a session whose coverage sampling uses a fixed seed.
    pub fn with_seed(config: SessionConfig, metrics: M, seed: u64) -> Result<Self, ConfigError> {
        let estimator = TraceProgressEstimator::with_seed(config.completion.clone(), seed);
        Self::with_estimator(config, metrics, estimator)
    }

    fn with_estimator(
        config: SessionConfig,
        metrics: M,
        estimator: TraceProgressEstimator,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let tracker = GestureTracker::with_config(config.gesture.clone());
        let mut session = Self {
            config,
            metrics,
            feed: HandFeed::new(),
            tracker,
            estimator,
            cursor: CurriculumCursor::new(),
            trail: InkTrail::new(),
            region: None,
            anchor: Point::default(),
            pointer: PointerEvent::idle(),
            ink_color: None,
            frames: 0,
        };
        session.anchor = session.start_point();
        info!(
            "Tracing session: {} symbols, mode={}, completion={}",
            session.config.curriculum.len(),
            session.config.gesture.mode.as_str(),
            session.config.completion.policy.as_str(),
        );
        Ok(session)
    }

    // ── Frame loop ────────────────────────────────────────

    /// Process one frame against the most recently delivered hands.
    pub fn update(&mut self) -> FrameOutcome {
        self.frames += 1;

        if !self.feed.is_running() {
            return FrameOutcome::Skipped(SkipReason::Frozen);
        }

        let Some(index) = self.cursor.index() else {
            return FrameOutcome::Finished;
        };

        let Some(region) = self.current_region(index) else {
            debug!("Frame {}: glyph metrics unavailable, skipping", self.frames);
            return FrameOutcome::Skipped(SkipReason::MetricsUnavailable);
        };

        let transform = self.config.layout.view_transform();
        let event = self.tracker.resolve(self.feed.hands(), &transform, self.anchor);
        self.pointer = event;

        let mut appended = false;
        if let (true, Some(position)) = (event.active, event.position) {
            self.anchor = position;
            if let Some(color) = self.config.colors.for_hand(event.handedness) {
                self.ink_color = Some(color);
            }
            appended = self.trail.push_within(position, self.ink_color, &region);
        }

        if self.estimator.is_complete(&self.trail, &region) {
            return FrameOutcome::Advanced(self.advance());
        }

        FrameOutcome::Traced {
            drawing: event.active,
            appended,
        }
    }

    /// Region for the symbol at `index`, asking the metrics provider on a miss.
    fn current_region(&mut self, index: usize) -> Option<TargetRegion> {
        if let Some(region) = self.region {
            return Some(region);
        }
        let symbol = self.config.curriculum.symbol(index)?;
        let region = self.metrics.text_bounds(
            symbol,
            self.config.layout.glyph_center(),
            self.config.layout.font_size(),
        )?;
        debug!("Glyph region for {:?}: {}", symbol, region.to_sexp());
        self.region = Some(region);
        Some(region)
    }

    /// Where the brush handle starts for the current symbol.
    fn start_point(&self) -> Point {
        let layout = &self.config.layout;
        self.cursor
            .index()
            .and_then(|i| self.config.curriculum.get(i))
            .and_then(|entry| entry.start)
            .map(|fraction| layout.canvas_point(fraction))
            .unwrap_or_else(|| layout.glyph_center())
    }

    // ── Transitions ───────────────────────────────────────

    /// Move to the next symbol.  The trail is always cleared, including on
    /// wrap and on reaching the end.
    pub fn advance(&mut self) -> CursorState {
        let from = self.cursor.state();
        let state = self
            .cursor
            .advance(self.config.curriculum.len(), self.config.end_policy);
        self.begin_target();
        info!("Curriculum advance: {:?} -> {:?}", from, state);
        state
    }

    /// Back to the first symbol with an empty trail.
    pub fn reset(&mut self) {
        self.cursor.reset();
        self.begin_target();
        self.pointer = PointerEvent::idle();
        self.ink_color = None;
        info!("Tracing session reset");
    }

    fn begin_target(&mut self) {
        self.trail.clear();
        self.estimator.reset();
        self.region = None;
        self.anchor = self.start_point();
    }

    /// Replace the configuration.  Layout or curriculum changes restart the
    /// current target; a curriculum change also resets the cursor to 0.
    pub fn reconfigure(&mut self, config: SessionConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let layout_changed = config.layout != self.config.layout;
        let curriculum_changed = config.curriculum != self.config.curriculum;

        self.tracker.config = config.gesture.clone();
        self.estimator.config = config.completion.clone();
        self.config = config;

        if curriculum_changed {
            self.cursor.reset();
        }
        if layout_changed || curriculum_changed {
            self.begin_target();
        }
        Ok(())
    }

    /// Apply an s-expression plist on top of the current configuration.
    pub fn apply_sexp(&mut self, raw: &str) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        next.apply_sexp(raw)?;
        self.reconfigure(next)
    }

    // ── Detector lifecycle ────────────────────────────────

    /// Stop listening to the detector; the session freezes in place.
    pub fn stop(&mut self) {
        self.feed.stop();
    }

    pub fn start(&mut self) {
        self.feed.start();
    }

    // ── Renderer accessors ────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn trail(&self) -> &InkTrail {
        &self.trail
    }

    pub fn pointer(&self) -> PointerEvent {
        self.pointer
    }

    /// Current brush handle position.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn region(&self) -> Option<TargetRegion> {
        self.region
    }

    pub fn cursor(&self) -> CursorState {
        self.cursor.state()
    }

    pub fn current_symbol(&self) -> Option<&str> {
        self.cursor
            .index()
            .and_then(|i| self.config.curriculum.symbol(i))
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }

    pub fn is_frozen(&self) -> bool {
        !self.feed.is_running()
    }

    /// Whether the renderer should flip the camera image horizontally.
    pub fn mirror_video(&self) -> bool {
        self.config.layout.mirror_x
    }

    /// Coverage ratio from the last completion evaluation.
    pub fn last_ratio(&self) -> f32 {
        self.estimator.last_ratio()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Generate s-expression for status reporting.
    pub fn status_sexp(&self) -> String {
        let symbol = match self.current_symbol() {
            Some(s) => format!("\"{}\"", escape_string(s)),
            None => "nil".to_string(),
        };
        let index = match self.cursor.index() {
            Some(i) => i.to_string(),
            None => "nil".to_string(),
        };
        let region = match self.region {
            Some(r) => r.to_sexp(),
            None => "nil".to_string(),
        };
        format!(
            "(:symbol {} :index {} :laps {} :finished {} :frozen {} :points {} :generation {} :coverage {:.2} :drawing {} :anchor (:x {:.1} :y {:.1}) :region {} :frames {})",
            symbol,
            index,
            self.cursor.laps(),
            sexp_bool(self.cursor.is_finished()),
            sexp_bool(self.is_frozen()),
            self.trail.len(),
            self.trail.generation(),
            self.estimator.last_ratio(),
            sexp_bool(self.pointer.active),
            self.anchor.x,
            self.anchor.y,
            region,
            self.frames,
        )
    }
}

impl<M: GlyphMetrics> HandObserver for Session<M> {
    fn on_hands(&mut self, hands: Vec<HandObservation>) {
        self.feed.on_hands(hands);
    }
}

// ── Tests ──────────────────────────────────────────────────
