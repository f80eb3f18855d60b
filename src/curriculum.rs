//! Fixed sequence of symbols to trace, and the cursor that walks it.

use tracing::info;

use crate::geometry::Point;
use crate::sexp::escape_string;

// ── End policy ─────────────────────────────────────────────

/// What happens when the cursor advances past the last symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EndPolicy {
    /// Start again from the first symbol.
    #[default]
    Wrap,
    /// Enter the terminal finished state.
    Halt,
}

impl EndPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrap => "wrap",
            Self::Halt => "halt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "wrap" => Some(Self::Wrap),
            "halt" => Some(Self::Halt),
            _ => None,
        }
    }
}

// ── Curriculum ─────────────────────────────────────────────

/// First-stroke start points for the letters the game ships with.
const LETTER_STARTS: &[(&str, f32, f32)] = &[
    ("T", 0.5, 0.28),
    ("K", 0.42, 0.22),
    ("U", 0.42, 0.22),
    ("E", 0.42, 0.22),
];

/// Known start point for `symbol`, as fractions of the canvas.
pub fn default_start(symbol: &str) -> Option<Point> {
    LETTER_STARTS
        .iter()
        .find(|(s, _, _)| *s == symbol)
        .map(|&(_, x, y)| Point::new(x, y))
}

/// One symbol of the curriculum.
#[derive(Debug, Clone, PartialEq)]
pub struct CurriculumEntry {
    pub symbol: String,
    /// Where the brush handle starts, as fractions of canvas width/height.
    /// `None` starts it at the glyph centre.
    pub start: Option<Point>,
}

impl CurriculumEntry {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            start: None,
        }
    }

    pub fn with_start(symbol: impl Into<String>, fx: f32, fy: f32) -> Self {
        Self {
            symbol: symbol.into(),
            start: Some(Point::new(fx, fy)),
        }
    }

    /// Entry with the start point from the letter table, if it has one.
    pub fn lookup(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        let start = default_start(&symbol);
        Self { symbol, start }
    }

    /// A bare string when the start point is the table's, otherwise
    /// `(:symbol S :start (X Y))` or `(:symbol S :start nil)`.
    pub fn to_sexp(&self) -> String {
        let symbol = format!("\"{}\"", escape_string(&self.symbol));
        if self.start == default_start(&self.symbol) {
            return symbol;
        }
        match self.start {
            Some(p) => format!("(:symbol {} :start ({} {}))", symbol, p.x, p.y),
            None => format!("(:symbol {} :start nil)", symbol),
        }
    }
}

/// Ordered, fixed list of symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct Curriculum {
    entries: Vec<CurriculumEntry>,
}

impl Default for Curriculum {
    /// T-K-U-E-T with the first-stroke start points for each letter.
    fn default() -> Self {
        Self::from_symbols(["T", "K", "U", "E", "T"])
    }
}

impl Curriculum {
    pub fn new(entries: Vec<CurriculumEntry>) -> Self {
        Self { entries }
    }

    /// Curriculum whose start points come from the letter table.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(symbols.into_iter().map(CurriculumEntry::lookup).collect())
    }

    pub fn get(&self, index: usize) -> Option<&CurriculumEntry> {
        self.entries.get(index)
    }

    pub fn symbol(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.symbol.as_str())
    }

    pub fn entries(&self) -> &[CurriculumEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_sexp(&self) -> String {
        let entries: Vec<String> = self.entries.iter().map(CurriculumEntry::to_sexp).collect();
        format!("({})", entries.join(" "))
    }
}

// ── Cursor ─────────────────────────────────────────────────

/// Position of the cursor after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Active(usize),
    Finished,
}

impl CursorState {
    pub fn to_sexp(&self) -> String {
        match self {
            Self::Active(i) => format!("(:active {})", i),
            Self::Finished => "(:finished t)".to_string(),
        }
    }
}

/// Index into a curriculum.  Only moved by `advance` and `reset`.
#[derive(Debug, Clone, Default)]
pub struct CurriculumCursor {
    index: usize,
    finished: bool,
    /// Completed laps (wraps) so far.
    laps: u32,
}

impl CurriculumCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CursorState {
        if self.finished {
            CursorState::Finished
        } else {
            CursorState::Active(self.index)
        }
    }

    /// Current index, or `None` once finished.
    pub fn index(&self) -> Option<usize> {
        (!self.finished).then_some(self.index)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Step forward in a curriculum of `len` symbols.
    ///
    /// Past the end the cursor wraps to 0 or finishes, per `policy`.  A
    /// finished cursor stays finished.
    pub fn advance(&mut self, len: usize, policy: EndPolicy) -> CursorState {
        if self.finished {
            return CursorState::Finished;
        }

        self.index += 1;
        if self.index >= len {
            match policy {
                EndPolicy::Wrap if len > 0 => {
                    self.index = 0;
                    self.laps += 1;
                    info!("Curriculum wrapped (lap {})", self.laps);
                }
                _ => {
                    self.finished = true;
                    info!("Curriculum finished after {} symbols", len);
                }
            }
        }
        self.state()
    }

    /// Back to the first symbol.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// ── Tests ──────────────────────────────────────────────────
