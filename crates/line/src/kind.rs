//! Portion kind discriminants and their family classification.
//!
//! Every portion belongs to exactly one kind, fixed at construction. Kinds
//! are grouped into families that share formatting and spacing behavior;
//! the family mask is computed from the kind on demand, so the two can
//! never drift apart.

use bitflags::bitflags;

/// The kind of one visually atomic span on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortionKind {
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
    AuthorityField,
    ChapterMark,
    Field,
    Footnote,
    FootnoteNumber,
    Number,
    Bullet,
    GraphicNumber,
    Blank,
    PostIt,
    Combined,
    ControlChar,
    Hyphen,
    SoftHyphen,
    Multi,
    Break,
    Arrow,
    Kern,
    Glue,
    Margin,
    Hole,
    Fix,
    Fly,
    TabLeft,
    TabRight,
    TabCenter,
    TabDecimal,
}

bitflags! {
    /// Families of portion kinds that share formatting behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PortionGroups: u16 {
        const TEXT         = 0x8000;
        const EXPANDABLE   = 0x4000;
        const FIELD        = 0x2000;
        const HYPHENATION  = 0x1000;
        const NUMBER       = 0x0800;
        const GLUE         = 0x0400;
        const FIXED        = 0x0200;
        const TAB          = 0x0100;
        const FIXED_MARGIN = 0x0040;
        const TOC_REF      = 0x0008;
    }
}

impl PortionKind {
    /// The families this kind belongs to.
    pub fn groups(self) -> PortionGroups {
        use PortionKind::*;
        match self {
            Text | Lay | Para | Hanging | Drop | LinkStart | LinkEnd | TocEntry
            | TocEntryNumber | TocEntryText => PortionGroups::TEXT,
            TocRef => PortionGroups::TEXT | PortionGroups::TOC_REF,
            AuthorityField => {
                PortionGroups::TEXT | PortionGroups::FIELD | PortionGroups::TOC_REF
            }
            Field | Footnote => PortionGroups::EXPANDABLE | PortionGroups::FIELD,
            FootnoteNumber | Number | Bullet | GraphicNumber | ChapterMark => {
                PortionGroups::EXPANDABLE | PortionGroups::NUMBER
            }
            Blank | PostIt | Combined | ControlChar => PortionGroups::EXPANDABLE,
            Hyphen | SoftHyphen => PortionGroups::EXPANDABLE | PortionGroups::HYPHENATION,
            Glue | Hole => PortionGroups::GLUE,
            Margin => PortionGroups::GLUE | PortionGroups::FIXED_MARGIN,
            Fix | Fly => {
                PortionGroups::GLUE | PortionGroups::FIXED | PortionGroups::FIXED_MARGIN
            }
            Kern => PortionGroups::FIXED,
            TabLeft | TabRight | TabCenter | TabDecimal => {
                PortionGroups::GLUE
                    | PortionGroups::FIXED
                    | PortionGroups::TAB
                    | PortionGroups::FIXED_MARGIN
            }
            Multi | Break | Arrow => PortionGroups::empty(),
        }
    }

    // Family queries
    pub fn in_text_grp(self) -> bool {
        self.groups().contains(PortionGroups::TEXT)
    }
    pub fn in_exp_grp(self) -> bool {
        self.groups().contains(PortionGroups::EXPANDABLE)
    }
    pub fn in_field_grp(self) -> bool {
        self.groups().contains(PortionGroups::FIELD)
    }
    pub fn in_hyph_grp(self) -> bool {
        self.groups().contains(PortionGroups::HYPHENATION)
    }
    pub fn in_number_grp(self) -> bool {
        self.groups().contains(PortionGroups::NUMBER)
    }
    pub fn in_glue_grp(self) -> bool {
        self.groups().contains(PortionGroups::GLUE)
    }
    pub fn in_fix_grp(self) -> bool {
        self.groups().contains(PortionGroups::FIXED)
    }
    pub fn in_tab_grp(self) -> bool {
        self.groups().contains(PortionGroups::TAB)
    }
    pub fn in_fix_marg_grp(self) -> bool {
        self.groups().contains(PortionGroups::FIXED_MARGIN)
    }
    pub fn in_tox_ref_grp(self) -> bool {
        self.groups().contains(PortionGroups::TOC_REF)
    }
    pub fn in_field_or_tox_ref_grp(self) -> bool {
        self.groups()
            .intersects(PortionGroups::FIELD | PortionGroups::TOC_REF)
    }

    /// Portions that absorb extra space during justification: the text
    /// family plus multi portions.
    pub fn in_space_grp(self) -> bool {
        self.in_text_grp() || self == PortionKind::Multi
    }

    /// Returns a string representation, primarily for debugging or error
    /// messages.
    pub fn as_str(&self) -> &'static str {
        use PortionKind::*;
        match self {
            Text => "Text",
            Lay => "Lay",
            Para => "Para",
            Hanging => "Hanging",
            Drop => "Drop",
            LinkStart => "LinkStart",
            LinkEnd => "LinkEnd",
            TocEntry => "TocEntry",
            TocEntryNumber => "TocEntryNumber",
            TocEntryText => "TocEntryText",
            TocRef => "TocRef",
            AuthorityField => "AuthorityField",
            ChapterMark => "ChapterMark",
            Field => "Field",
            Footnote => "Footnote",
            FootnoteNumber => "FootnoteNumber",
            Number => "Number",
            Bullet => "Bullet",
            GraphicNumber => "GraphicNumber",
            Blank => "Blank",
            PostIt => "PostIt",
            Combined => "Combined",
            ControlChar => "ControlChar",
            Hyphen => "Hyphen",
            SoftHyphen => "SoftHyphen",
            Multi => "Multi",
            Break => "Break",
            Arrow => "Arrow",
            Kern => "Kern",
            Glue => "Glue",
            Margin => "Margin",
            Hole => "Hole",
            Fix => "Fix",
            Fly => "Fly",
            TabLeft => "TabLeft",
            TabRight => "TabRight",
            TabCenter => "TabCenter",
            TabDecimal => "TabDecimal",
        }
    }
}
