//! Session configuration: defaults, validation and s-expression I/O.
//!
//! One struct collapses every variant of the tracing game: interaction mode,
//! completion policy, mirroring, curriculum and canvas layout.  Updates come
//! in as a plist and are applied all-or-nothing.

use lexpr::Value;
use tracing::warn;

use crate::coverage::{CompletionConfig, CompletionPolicy};
use crate::curriculum::{Curriculum, CurriculumEntry, EndPolicy};
use crate::error::ConfigError;
use crate::geometry::{Point, ViewTransform};
use crate::gesture::{GestureConfig, InteractionMode};
use crate::hand::Handedness;
use crate::ink::InkColor;
use crate::sexp::{
    atom_string, flatten_list, get_bool, get_float, get_int, get_keyword, get_value, list_items,
    sexp_bool,
};

// ── Layout ─────────────────────────────────────────────────

/// Canvas geometry the session needs to place the glyph and the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Detector input frame size.
    pub source_width: f32,
    pub source_height: f32,
    /// Camera viewport side as a fraction of the shorter canvas side.
    pub camera_scale: f32,
    /// Glyph font size as a fraction of the shorter canvas side.
    pub glyph_scale: f32,
    /// Vertical offset of the glyph centre below the canvas centre.
    pub glyph_offset_y: f32,
    /// Mirror keypoints (and tell the renderer to mirror the video).
    pub mirror_x: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1280.0,
            canvas_height: 720.0,
            source_width: 640.0,
            source_height: 480.0,
            camera_scale: 0.7,
            glyph_scale: 0.6,
            glyph_offset_y: 30.0,
            mirror_x: true,
        }
    }
}

impl LayoutConfig {
    fn short_side(&self) -> f32 {
        self.canvas_width.min(self.canvas_height)
    }

    /// Detector → canvas transform for the centred camera viewport.
    pub fn view_transform(&self) -> ViewTransform {
        ViewTransform::centered_square(
            self.canvas_width,
            self.canvas_height,
            self.camera_scale,
            self.source_width,
            self.source_height,
            self.mirror_x,
        )
    }

    pub fn glyph_center(&self) -> Point {
        Point::new(
            self.canvas_width / 2.0,
            self.canvas_height / 2.0 + self.glyph_offset_y,
        )
    }

    pub fn font_size(&self) -> f32 {
        self.short_side() * self.glyph_scale
    }

    /// Canvas position for fractional start coordinates.
    pub fn canvas_point(&self, fraction: Point) -> Point {
        Point::new(
            self.canvas_width * fraction.x,
            self.canvas_height * fraction.y,
        )
    }
}

// ── Ink colours ────────────────────────────────────────────

/// Ink colour per hand.  Unknown hands keep the previous colour.
#[derive(Debug, Clone, PartialEq)]
pub struct HandColors {
    pub left: InkColor,
    pub right: InkColor,
}

impl Default for HandColors {
    fn default() -> Self {
        Self {
            left: InkColor::GREEN,
            right: InkColor::RED,
        }
    }
}

impl HandColors {
    pub fn for_hand(&self, hand: Handedness) -> Option<InkColor> {
        match hand {
            Handedness::Left => Some(self.left),
            Handedness::Right => Some(self.right),
            Handedness::Unknown => None,
        }
    }
}

// ── Session config ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionConfig {
    pub gesture: GestureConfig,
    pub completion: CompletionConfig,
    pub end_policy: EndPolicy,
    pub curriculum: Curriculum,
    pub layout: LayoutConfig,
    pub colors: HandColors,
}

impl SessionConfig {
    /// Check every field; the first violation is reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gesture;
        if !(0.0..=1.0).contains(&g.min_confidence) {
            return Err(ConfigError::invalid("min-confidence", "0.0-1.0"));
        }
        if !(g.pointer_radius > 0.0) {
            return Err(ConfigError::invalid("pointer-radius", "> 0"));
        }

        let c = &self.completion;
        if !(1..=100_000).contains(&c.samples) {
            return Err(ConfigError::invalid("samples", "1-100000"));
        }
        if !(0.0..1.0).contains(&c.threshold) {
            return Err(ConfigError::invalid("threshold", "0.0 <= t < 1.0"));
        }
        if !(c.brush_radius > 0.0) {
            return Err(ConfigError::invalid("brush-radius", "> 0"));
        }
        if c.confirm_frames == 0 {
            return Err(ConfigError::invalid("confirm-frames", ">= 1"));
        }

        let l = &self.layout;
        for (key, v) in [
            ("canvas-width", l.canvas_width),
            ("canvas-height", l.canvas_height),
            ("source-width", l.source_width),
            ("source-height", l.source_height),
        ] {
            if !(v > 0.0) {
                return Err(ConfigError::invalid(key, "> 0"));
            }
        }
        if !(l.camera_scale > 0.0 && l.camera_scale <= 1.0) {
            return Err(ConfigError::invalid("camera-scale", "0.0 < s <= 1.0"));
        }
        if !(l.glyph_scale > 0.0) {
            return Err(ConfigError::invalid("glyph-scale", "> 0"));
        }

        if self.curriculum.is_empty() {
            return Err(ConfigError::invalid("curriculum", "at least one symbol"));
        }
        Ok(())
    }

    /// Parse `raw` as a plist and apply it.  On error nothing changes.
    pub fn apply_sexp(&mut self, raw: &str) -> Result<(), ConfigError> {
        let value = lexpr::from_str(raw).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        self.apply_plist(&value)
    }

    /// Apply an already-parsed plist.  On error nothing changes.
    pub fn apply_plist(&mut self, value: &Value) -> Result<(), ConfigError> {
        let mut next = self.clone();

        if let Some(s) = get_keyword(value, "mode") {
            next.gesture.mode =
                InteractionMode::from_str(&s).ok_or_else(|| ConfigError::unknown("mode", s))?;
        }
        if let Some(s) = get_keyword(value, "completion") {
            next.completion.policy = CompletionPolicy::from_str(&s)
                .ok_or_else(|| ConfigError::unknown("completion policy", s))?;
        }
        if let Some(s) = get_keyword(value, "end") {
            next.end_policy =
                EndPolicy::from_str(&s).ok_or_else(|| ConfigError::unknown("end policy", s))?;
        }

        set_f32(value, "min-confidence", &mut next.gesture.min_confidence)?;
        set_f32(value, "pointer-radius", &mut next.gesture.pointer_radius)?;
        set_f32(value, "threshold", &mut next.completion.threshold)?;
        set_f32(value, "brush-radius", &mut next.completion.brush_radius)?;
        set_f32(value, "canvas-width", &mut next.layout.canvas_width)?;
        set_f32(value, "canvas-height", &mut next.layout.canvas_height)?;
        set_f32(value, "source-width", &mut next.layout.source_width)?;
        set_f32(value, "source-height", &mut next.layout.source_height)?;
        set_f32(value, "camera-scale", &mut next.layout.camera_scale)?;
        set_f32(value, "glyph-scale", &mut next.layout.glyph_scale)?;
        set_f32(value, "glyph-offset-y", &mut next.layout.glyph_offset_y)?;

        if let Some(n) = get_count(value, "samples")? {
            next.completion.samples = n;
        }
        if let Some(n) = get_count(value, "max-points")? {
            next.completion.max_points = n;
        }
        if let Some(n) = get_count(value, "confirm-frames")? {
            next.completion.confirm_frames =
                u32::try_from(n).map_err(|_| ConfigError::invalid("confirm-frames", ">= 1"))?;
        }

        if let Some(b) = get_bool(value, "mirror-x") {
            next.layout.mirror_x = b;
        }
        if let Some(list) = get_value(value, "curriculum") {
            next.curriculum = parse_curriculum(list)?;
        }

        if let Err(e) = next.validate() {
            warn!("Rejected configuration: {}", e);
            return Err(e);
        }
        *self = next;
        Ok(())
    }

    /// Generate s-expression of the effective configuration.  Feeding it
    /// back through `apply_sexp` yields an equal configuration.
    pub fn config_sexp(&self) -> String {
        let g = &self.gesture;
        let c = &self.completion;
        let l = &self.layout;
        format!(
            "(:mode :{} :min-confidence {} :pointer-radius {} :completion :{} :samples {} :threshold {} :brush-radius {} :max-points {} :confirm-frames {} :end :{} :mirror-x {} :canvas-width {} :canvas-height {} :source-width {} :source-height {} :camera-scale {} :glyph-scale {} :glyph-offset-y {} :curriculum {})",
            g.mode.as_str(),
            g.min_confidence,
            g.pointer_radius,
            c.policy.as_str(),
            c.samples,
            c.threshold,
            c.brush_radius,
            c.max_points,
            c.confirm_frames,
            self.end_policy.as_str(),
            sexp_bool(l.mirror_x),
            l.canvas_width,
            l.canvas_height,
            l.source_width,
            l.source_height,
            l.camera_scale,
            l.glyph_scale,
            l.glyph_offset_y,
            self.curriculum.to_sexp(),
        )
    }
}

/// Curriculum list: bare symbols take their start point from the letter
/// table, `(:symbol S :start (X Y))` or `(:symbol S :start nil)` set it.
fn parse_curriculum(list: &Value) -> Result<Curriculum, ConfigError> {
    let bad = || ConfigError::invalid("curriculum", "symbols or (:symbol S :start (X Y))");
    let entries = list_items(list)
        .ok_or_else(bad)?
        .into_iter()
        .map(|item| parse_entry(item).ok_or_else(bad))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Curriculum::new(entries))
}

fn parse_entry(item: &Value) -> Option<CurriculumEntry> {
    if !matches!(item, Value::Cons(_)) {
        return Some(CurriculumEntry::lookup(atom_string(item)));
    }
    let symbol = get_keyword(item, "symbol")?;
    let start = match get_value(item, "start") {
        None => return Some(CurriculumEntry::lookup(symbol)),
        Some(v) if atom_string(v) == "nil" => return Some(CurriculumEntry::new(symbol)),
        Some(v) => v,
    };
    let coords = flatten_list(start)
        .into_iter()
        .map(|n| atom_string(n).parse::<f32>().ok().filter(|x| x.is_finite()))
        .collect::<Option<Vec<f32>>>()?;
    match coords[..] {
        [x, y] => Some(CurriculumEntry::with_start(symbol, x, y)),
        _ => None,
    }
}

fn set_f32(value: &Value, key: &'static str, slot: &mut f32) -> Result<(), ConfigError> {
    if get_keyword(value, key).is_none() {
        return Ok(());
    }
    // Out-of-range f64 values turn into infinities here, so test after the cast.
    match get_float(value, key).map(|v| v as f32) {
        Some(v) if v.is_finite() => {
            *slot = v;
            Ok(())
        }
        _ => Err(ConfigError::invalid(key, "number")),
    }
}

fn get_count(value: &Value, key: &'static str) -> Result<Option<usize>, ConfigError> {
    if get_keyword(value, key).is_none() {
        return Ok(None);
    }
    match get_int(value, key) {
        Some(n) if n >= 0 => Ok(Some(n as usize)),
        _ => Err(ConfigError::invalid(key, "non-negative integer")),
    }
}

// ── Tests ──────────────────────────────────────────────────
