//! The formatting protocol: measuring portions and fitting them into the
//! available line width.
//!
//! Shaping and font metrics stay outside this crate; drivers hand in a
//! [`FontMetrics`] implementation and the already-itemized source text.
//! Character indices throughout are char positions in that text, not byte
//! offsets.

use crate::kind::PortionKind;
use crate::portion::{Portion, PortionData};
use galley_types::PosSize;

/// Externally supplied metrics for the attributes active over a portion.
pub trait FontMetrics {
    /// Advance width of a single character.
    fn char_width(&self, c: char) -> u32;

    /// Advance width of a run of characters.
    fn text_width(&self, text: &str) -> u32 {
        text.chars().map(|c| self.char_width(c)).sum()
    }

    /// Maximum ascender above the baseline.
    fn ascent(&self) -> u32;

    /// Total line height of the font.
    fn height(&self) -> u32;
}

/// Measurement inputs for one portion: the line's source text, the metrics
/// for the active attributes, and the character index the portion starts at.
pub struct SizeInfo<'a> {
    pub text: &'a str,
    pub metrics: &'a dyn FontMetrics,
    pub idx: usize,
}

impl<'a> SizeInfo<'a> {
    pub fn new(text: &'a str, metrics: &'a dyn FontMetrics) -> Self {
        Self {
            text,
            metrics,
            idx: 0,
        }
    }

    /// The `len` source characters starting at the current index.
    pub fn slice(&self, len: u32) -> &'a str {
        let start = self.byte_of(self.idx);
        let end = self.byte_of(self.idx + len as usize);
        &self.text[start..end]
    }

    fn byte_of(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(byte, _)| byte)
            .unwrap_or(self.text.len())
    }
}

/// Tracks the width budget while a line is being formatted.
pub struct FormatContext<'a> {
    pub info: SizeInfo<'a>,
    width: u32,
    x: u32,
}

impl<'a> FormatContext<'a> {
    pub fn new(info: SizeInfo<'a>, width: u32) -> Self {
        Self { info, width, x: 0 }
    }

    /// Total available line width.
    pub fn line_width(&self) -> u32 {
        self.width
    }

    /// Current horizontal position on the line.
    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn remaining(&self) -> u32 {
        self.width.saturating_sub(self.x)
    }

    pub fn advance(&mut self, width: u32) {
        self.x += width;
    }

    pub fn retreat(&mut self, width: u32) {
        self.x = self.x.saturating_sub(width);
    }
}

/// Whether a portion fit the line or forces a break before or at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    Placed,
    Breaks,
}

impl Portion {
    /// Pure measurement of this portion against `info`, without touching the
    /// cached extent. Tabs and driver-sized spacers report zero here; their
    /// width exists only relative to a format cursor.
    pub fn text_size(&self, info: &SizeInfo<'_>) -> PosSize {
        let metrics = info.metrics;
        match self.data() {
            PortionData::Text
            | PortionData::Lay
            | PortionData::Para
            | PortionData::Hanging
            | PortionData::Drop
            | PortionData::TocEntry
            | PortionData::TocEntryNumber
            | PortionData::TocEntryText
            | PortionData::TocRef => PosSize::new(
                metrics.text_width(info.slice(self.len())),
                metrics.height(),
                metrics.ascent(),
            ),
            PortionData::AuthorityField { text }
            | PortionData::ChapterMark { text }
            | PortionData::Field { text }
            | PortionData::Footnote { text }
            | PortionData::FootnoteNumber { text }
            | PortionData::Number { text }
            | PortionData::Bullet { text }
            | PortionData::Combined { text } => PosSize::new(
                metrics.text_width(text),
                metrics.height(),
                metrics.ascent(),
            ),
            PortionData::Blank { replacement } => PosSize::new(
                metrics.char_width(*replacement),
                metrics.height(),
                metrics.ascent(),
            ),
            PortionData::Hyphen => PosSize::new(
                metrics.char_width('-'),
                metrics.height(),
                metrics.ascent(),
            ),
            PortionData::ControlChar { .. } | PortionData::SoftHyphen { .. } => {
                PosSize::new(0, metrics.height(), metrics.ascent())
            }
            PortionData::Kern { width }
            | PortionData::Fix { width }
            | PortionData::Fly { width }
            | PortionData::GraphicNumber { width } => PosSize::new(*width, 0, 0),
            PortionData::LinkStart
            | PortionData::LinkEnd
            | PortionData::PostIt
            | PortionData::Multi
            | PortionData::Break
            | PortionData::Arrow
            | PortionData::Glue
            | PortionData::Margin
            | PortionData::Hole
            | PortionData::TabLeft { .. }
            | PortionData::TabRight { .. }
            | PortionData::TabCenter { .. }
            | PortionData::TabDecimal { .. } => PosSize::zero(),
        }
    }

    /// Measures and commits the extent.
    pub fn calc_text_size(&mut self, info: &SizeInfo<'_>) {
        let size = self.text_size(info);
        self.set_extent(size);
    }

    /// Attempts to place this portion at the context's current position.
    /// `Placed` commits the measured extent and advances the cursor and the
    /// character index; `Breaks` leaves both untouched so the driver can
    /// retry the portion on a fresh line.
    pub fn format(&mut self, inf: &mut FormatContext<'_>) -> FormatOutcome {
        let metrics = inf.info.metrics;
        if self.kind() == PortionKind::Break {
            // Zero width, but the break still shapes the line box.
            self.set_extent(PosSize::new(0, metrics.height(), metrics.ascent()));
            return FormatOutcome::Breaks;
        }
        if let Some(stop) = self.tab_stop() {
            if stop >= inf.line_width() {
                return FormatOutcome::Breaks;
            }
            // A stop at or behind the cursor still advances one blank.
            let width = if stop > inf.x() {
                stop - inf.x()
            } else {
                metrics.char_width(' ')
            };
            if inf.x() + width > inf.line_width() {
                return FormatOutcome::Breaks;
            }
            self.set_extent(PosSize::new(width, metrics.height(), metrics.ascent()));
            return self.place(inf, width);
        }
        let size = self.text_size(&inf.info);
        if size.width > 0 && inf.x() + size.width > inf.line_width() {
            return FormatOutcome::Breaks;
        }
        self.set_extent(size);
        self.place(inf, size.width)
    }

    fn place(&self, inf: &mut FormatContext<'_>, width: u32) -> FormatOutcome {
        inf.advance(width);
        inf.info.idx += self.len() as usize;
        FormatOutcome::Placed
    }

    /// Called on the portion that ends up last on a finished line. Trailing
    /// spacers collapse; a trailing text portion sheds the advance of one
    /// trailing blank. The context's index must point at this portion's
    /// first character.
    pub fn format_eol(&mut self, inf: &mut FormatContext<'_>) {
        let kind = self.kind();
        if kind.in_glue_grp() && !kind.in_tab_grp() {
            if let Ok(width) = self.width() {
                inf.retreat(width);
            }
            self.set_extent(PosSize::zero());
        } else if kind.in_text_grp() {
            let Ok(extent) = self.extent() else {
                return;
            };
            if let Some(last) = inf.info.slice(self.len()).chars().last() {
                if last == ' ' {
                    let trimmed = extent.width.saturating_sub(inf.info.metrics.char_width(' '));
                    inf.retreat(extent.width - trimmed);
                    self.set_extent(extent.with_width(trimmed));
                }
            }
        }
    }

    /// Maps a horizontal offset within this portion to a character offset,
    /// snapping to the nearest character boundary. Portions without
    /// character-granular content resolve to their full length.
    pub fn cursor_offset(&self, x: u32, info: &SizeInfo<'_>) -> u32 {
        if !self.kind().in_text_grp() {
            return self.len();
        }
        let mut acc = 0;
        for (offset, c) in info.slice(self.len()).chars().enumerate() {
            let advance = info.metrics.char_width(c);
            if x <= acc + advance / 2 {
                return offset as u32;
            }
            acc += advance;
        }
        self.len()
    }

    /// How much of `space_add` (extra width per blank) this portion absorbs
    /// during justification. Only text-family and multi portions absorb
    /// space.
    pub fn calc_spacing(&self, space_add: i32, info: &SizeInfo<'_>) -> i32 {
        if !self.kind().in_space_grp() {
            return 0;
        }
        if self.kind() == PortionKind::Multi {
            return space_add;
        }
        let blanks = info.slice(self.len()).chars().filter(|c| *c == ' ').count();
        space_add * blanks as i32
    }
}
