//! The portion node: one visually atomic span on a formatted line.
//!
//! A [`Portion`] carries the data every kind shares (measured extent,
//! covered character length, border-join flags). Everything specific to a
//! kind lives in its [`PortionData`] variant, and the kind discriminant is
//! a pure projection of that payload.

use crate::LineError;
use crate::format::SizeInfo;
use crate::kind::{PortionGroups, PortionKind};
use galley_types::PosSize;

/// Kind-specific payload, one variant per portion kind.
#[derive(Debug, Clone, PartialEq)]
pub enum PortionData {
    Text,
    Lay,
    Para,
    Hanging,
    Drop,
    LinkStart,
    LinkEnd,
    TocEntry,
    TocEntryNumber,
    TocEntryText,
    TocRef,
    AuthorityField { text: Box<str> },
    ChapterMark { text: Box<str> },
    Field { text: Box<str> },
    Footnote { text: Box<str> },
    FootnoteNumber { text: Box<str> },
    Number { text: Box<str> },
    Bullet { text: Box<str> },
    GraphicNumber { width: u32 },
    Blank { replacement: char },
    PostIt,
    Combined { text: Box<str> },
    ControlChar { character: char },
    Hyphen,
    SoftHyphen { expanded: bool },
    Multi,
    Break,
    Arrow,
    Kern { width: u32 },
    Glue,
    Margin,
    Hole,
    Fix { width: u32 },
    Fly { width: u32 },
    TabLeft { stop: u32 },
    TabRight { stop: u32 },
    TabCenter { stop: u32 },
    TabDecimal { stop: u32 },
}

impl PortionData {
    /// Determines the `PortionKind` for this payload.
    pub fn kind(&self) -> PortionKind {
        match self {
            Self::Text => PortionKind::Text,
            Self::Lay => PortionKind::Lay,
            Self::Para => PortionKind::Para,
            Self::Hanging => PortionKind::Hanging,
            Self::Drop => PortionKind::Drop,
            Self::LinkStart => PortionKind::LinkStart,
            Self::LinkEnd => PortionKind::LinkEnd,
            Self::TocEntry => PortionKind::TocEntry,
            Self::TocEntryNumber => PortionKind::TocEntryNumber,
            Self::TocEntryText => PortionKind::TocEntryText,
            Self::TocRef => PortionKind::TocRef,
            Self::AuthorityField { .. } => PortionKind::AuthorityField,
            Self::ChapterMark { .. } => PortionKind::ChapterMark,
            Self::Field { .. } => PortionKind::Field,
            Self::Footnote { .. } => PortionKind::Footnote,
            Self::FootnoteNumber { .. } => PortionKind::FootnoteNumber,
            Self::Number { .. } => PortionKind::Number,
            Self::Bullet { .. } => PortionKind::Bullet,
            Self::GraphicNumber { .. } => PortionKind::GraphicNumber,
            Self::Blank { .. } => PortionKind::Blank,
            Self::PostIt => PortionKind::PostIt,
            Self::Combined { .. } => PortionKind::Combined,
            Self::ControlChar { .. } => PortionKind::ControlChar,
            Self::Hyphen => PortionKind::Hyphen,
            Self::SoftHyphen { .. } => PortionKind::SoftHyphen,
            Self::Multi => PortionKind::Multi,
            Self::Break => PortionKind::Break,
            Self::Arrow => PortionKind::Arrow,
            Self::Kern { .. } => PortionKind::Kern,
            Self::Glue => PortionKind::Glue,
            Self::Margin => PortionKind::Margin,
            Self::Hole => PortionKind::Hole,
            Self::Fix { .. } => PortionKind::Fix,
            Self::Fly { .. } => PortionKind::Fly,
            Self::TabLeft { .. } => PortionKind::TabLeft,
            Self::TabRight { .. } => PortionKind::TabRight,
            Self::TabCenter { .. } => PortionKind::TabCenter,
            Self::TabDecimal { .. } => PortionKind::TabDecimal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MeasureState {
    Unmeasured,
    Measured,
}

/// One node of a line chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Portion {
    extent: PosSize,
    state: MeasureState,
    len: u32,
    join_prev: bool,
    join_next: bool,
    data: PortionData,
}

impl Portion {
    /// Creates a portion covering `len` source characters. Kinds whose
    /// geometry is fixed at construction (or intrinsically zero) start out
    /// measured; everything else must pass through `calc_text_size` or
    /// `format` before its geometry may be read.
    pub fn new(data: PortionData, len: u32) -> Self {
        let extent = match &data {
            PortionData::Kern { width }
            | PortionData::Fix { width }
            | PortionData::Fly { width }
            | PortionData::GraphicNumber { width } => PosSize::new(*width, 0, 0),
            _ => PosSize::zero(),
        };
        let state = match data.kind() {
            PortionKind::Kern
            | PortionKind::Fix
            | PortionKind::Fly
            | PortionKind::GraphicNumber
            | PortionKind::Glue
            | PortionKind::Margin
            | PortionKind::Hole
            | PortionKind::Break
            | PortionKind::LinkStart
            | PortionKind::LinkEnd
            | PortionKind::PostIt
            | PortionKind::Multi
            | PortionKind::Arrow => MeasureState::Measured,
            _ => MeasureState::Unmeasured,
        };
        Self {
            extent,
            state,
            len,
            join_prev: false,
            join_next: false,
            data,
        }
    }

    // Shorthand constructors for the common kinds.

    pub fn text(len: u32) -> Self {
        Self::new(PortionData::Text, len)
    }

    /// A single expanded blank, painted with a replacement character.
    pub fn blank(replacement: char) -> Self {
        Self::new(PortionData::Blank { replacement }, 1)
    }

    /// A field placeholder covering `len` source characters and displaying
    /// its expanded text.
    pub fn field(text: impl Into<Box<str>>, len: u32) -> Self {
        Self::new(PortionData::Field { text: text.into() }, len)
    }

    pub fn footnote(text: impl Into<Box<str>>, len: u32) -> Self {
        Self::new(PortionData::Footnote { text: text.into() }, len)
    }

    /// A list-number portion; purely decorative, covers no source text.
    pub fn number(text: impl Into<Box<str>>) -> Self {
        Self::new(PortionData::Number { text: text.into() }, 0)
    }

    pub fn soft_hyphen() -> Self {
        Self::new(PortionData::SoftHyphen { expanded: false }, 1)
    }

    pub fn line_break() -> Self {
        Self::new(PortionData::Break, 0)
    }

    pub fn kern(width: u32) -> Self {
        Self::new(PortionData::Kern { width }, 0)
    }

    pub fn glue(len: u32) -> Self {
        Self::new(PortionData::Glue, len)
    }

    pub fn margin() -> Self {
        Self::new(PortionData::Margin, 0)
    }

    /// A hole swallows source characters (trailing blanks) without painting
    /// or occupying width.
    pub fn hole(len: u32) -> Self {
        Self::new(PortionData::Hole, len)
    }

    pub fn fix(width: u32) -> Self {
        Self::new(PortionData::Fix { width }, 0)
    }

    pub fn fly(width: u32) -> Self {
        Self::new(PortionData::Fly { width }, 0)
    }

    pub fn tab_left(stop: u32) -> Self {
        Self::new(PortionData::TabLeft { stop }, 1)
    }

    pub fn tab_right(stop: u32) -> Self {
        Self::new(PortionData::TabRight { stop }, 1)
    }

    // Access methods

    pub fn data(&self) -> &PortionData {
        &self.data
    }

    pub fn kind(&self) -> PortionKind {
        self.data.kind()
    }

    pub fn groups(&self) -> PortionGroups {
        self.kind().groups()
    }

    /// Count of source characters and spaces this portion covers.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Changes the covered character count. The cached extent becomes stale
    /// and must be re-measured before it can be read again.
    pub fn set_len(&mut self, len: u32) {
        self.len = len;
        self.state = MeasureState::Unmeasured;
    }

    pub fn is_measured(&self) -> bool {
        self.state == MeasureState::Measured
    }

    /// The measured extent, or an error if the portion is stale.
    pub fn extent(&self) -> Result<PosSize, LineError> {
        match self.state {
            MeasureState::Measured => Ok(self.extent),
            MeasureState::Unmeasured => Err(LineError::Unmeasured(self.kind().as_str())),
        }
    }

    pub fn width(&self) -> Result<u32, LineError> {
        self.extent().map(|e| e.width)
    }

    pub fn ascent(&self) -> Result<u32, LineError> {
        self.extent().map(|e| e.ascent)
    }

    /// Commits a measured extent.
    pub fn set_extent(&mut self, extent: PosSize) {
        self.extent = extent;
        self.state = MeasureState::Measured;
    }

    /// Marks the cached extent stale.
    pub fn invalidate(&mut self) {
        self.state = MeasureState::Unmeasured;
    }

    pub fn join_border_with_prev(&self) -> bool {
        self.join_prev
    }

    pub fn join_border_with_next(&self) -> bool {
        self.join_next
    }

    pub fn set_join_border_with_prev(&mut self, join: bool) {
        self.join_prev = join;
    }

    pub fn set_join_border_with_next(&mut self, join: bool) {
        self.join_next = join;
    }

    /// Returns `None` if the portion carries no rendering payload and can be
    /// dropped from its chain. Only spent spacers compress away; a portion
    /// covering source characters never does.
    pub fn compress(&self) -> Option<&Self> {
        let spacer = matches!(
            self.kind(),
            PortionKind::Glue | PortionKind::Margin | PortionKind::Hole | PortionKind::Kern
        );
        if spacer && self.len == 0 && self.is_measured() && self.extent.width == 0 {
            None
        } else {
            Some(self)
        }
    }

    /// For portions that stand in for expandable content, the text they
    /// display in place of the source characters.
    pub fn exp_text(&self) -> Option<String> {
        match &self.data {
            PortionData::AuthorityField { text }
            | PortionData::ChapterMark { text }
            | PortionData::Field { text }
            | PortionData::Footnote { text }
            | PortionData::FootnoteNumber { text }
            | PortionData::Number { text }
            | PortionData::Bullet { text }
            | PortionData::Combined { text } => Some(text.to_string()),
            PortionData::Blank { replacement } => Some(replacement.to_string()),
            PortionData::ControlChar { character } => Some(character.to_string()),
            PortionData::Hyphen => Some("-".to_string()),
            PortionData::SoftHyphen { expanded } => {
                let text = if *expanded { "-" } else { "" };
                Some(text.to_string())
            }
            _ => None,
        }
    }

    /// Width the portion paints with when that differs from its layout
    /// width: a soft hyphen is invisible mid-line but paints a hyphen once
    /// it sits at a break.
    pub fn view_width(&self, info: &SizeInfo<'_>) -> u32 {
        match &self.data {
            PortionData::SoftHyphen { expanded: true } => info.metrics.char_width('-'),
            _ => 0,
        }
    }

    /// The tab stop position, for the tab kinds.
    pub fn tab_stop(&self) -> Option<u32> {
        match &self.data {
            PortionData::TabLeft { stop }
            | PortionData::TabRight { stop }
            | PortionData::TabCenter { stop }
            | PortionData::TabDecimal { stop } => Some(*stop),
            _ => None,
        }
    }

    /// Marks a soft hyphen as sitting at a line break, making its hyphen
    /// visible.
    pub fn set_expanded(&mut self, value: bool) {
        if let PortionData::SoftHyphen { expanded } = &mut self.data {
            *expanded = value;
        }
    }

    /// Folds `other` into this portion where the kinds allow it. Kern
    /// widths accumulate; everything else keeps its own node.
    pub(crate) fn try_merge(&mut self, other: &Self) -> bool {
        match (&mut self.data, &other.data) {
            (PortionData::Kern { width }, PortionData::Kern { width: other_width }) => {
                *width += other_width;
                self.extent.width += other_width;
                self.len += other.len;
                true
            }
            _ => false,
        }
    }
}
