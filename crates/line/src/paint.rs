//! The painting traversal: portions emit positioned elements through a
//! paint context that tracks the pen position.
//!
//! Painting never mutates a portion. Reading the geometry of a portion that
//! was never measured is an error, not a stale paint.

use crate::LineError;
use crate::chain::PortionChain;
use crate::format::SizeInfo;
use crate::portion::{Portion, PortionData};

/// A run of display text, with the border-join flags the renderer needs to
/// merge adjacent character borders.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub content: String,
    pub join_prev: bool,
    pub join_next: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintElement {
    Text(TextElement),
    /// A single decorative glyph (control-character marks and the like).
    Decoration(char),
}

/// One paintable element, positioned on the external paint surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintedElement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub element: PaintElement,
}

/// Collects painted elements while walking a chain.
pub struct PaintContext<'a> {
    pub info: SizeInfo<'a>,
    origin_x: u32,
    origin_y: u32,
    x: u32,
    elements: Vec<PaintedElement>,
}

impl<'a> PaintContext<'a> {
    pub fn new(info: SizeInfo<'a>, origin_x: u32, origin_y: u32) -> Self {
        Self {
            info,
            origin_x,
            origin_y,
            x: 0,
            elements: Vec::new(),
        }
    }

    /// Current pen offset from the line origin.
    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn advance(&mut self, width: u32) {
        self.x += width;
    }

    pub fn push(&mut self, width: u32, height: u32, element: PaintElement) {
        self.elements.push(PaintedElement {
            x: self.origin_x + self.x,
            y: self.origin_y,
            width,
            height,
            element,
        });
    }

    pub fn elements(&self) -> &[PaintedElement] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<PaintedElement> {
        self.elements
    }
}

impl Portion {
    /// Emits this portion's visual representation at the context's current
    /// pen position.
    pub fn paint(&self, ctx: &mut PaintContext<'_>) -> Result<(), LineError> {
        let extent = self.extent()?;
        match self.data() {
            PortionData::Text
            | PortionData::Lay
            | PortionData::Para
            | PortionData::Hanging
            | PortionData::Drop
            | PortionData::TocEntry
            | PortionData::TocEntryNumber
            | PortionData::TocEntryText
            | PortionData::TocRef => {
                let content = ctx.info.slice(self.len()).to_string();
                self.push_text(ctx, extent.width, extent.height, content);
            }
            PortionData::AuthorityField { .. }
            | PortionData::ChapterMark { .. }
            | PortionData::Field { .. }
            | PortionData::Footnote { .. }
            | PortionData::FootnoteNumber { .. }
            | PortionData::Number { .. }
            | PortionData::Bullet { .. }
            | PortionData::Combined { .. }
            | PortionData::Blank { .. }
            | PortionData::Hyphen => {
                if let Some(content) = self.exp_text() {
                    self.push_text(ctx, extent.width, extent.height, content);
                }
            }
            PortionData::SoftHyphen { expanded: true } => {
                let width = self.view_width(&ctx.info);
                self.push_text(ctx, width, extent.height, "-".to_string());
            }
            PortionData::ControlChar { character } => {
                ctx.push(extent.width, extent.height, PaintElement::Decoration(*character));
            }
            // Spacers, markers and breaks paint nothing themselves.
            _ => {}
        }
        Ok(())
    }

    /// Decides whether painting is necessary at all before delegating to
    /// `paint`. Returns whether anything was painted.
    pub fn pre_paint(&self, ctx: &mut PaintContext<'_>) -> Result<bool, LineError> {
        if self.width()? == 0 && self.view_width(&ctx.info) == 0 {
            return Ok(false);
        }
        self.paint(ctx)?;
        Ok(true)
    }

    /// Advances the pen position and character index past this portion;
    /// called between portions during a paint pass.
    pub fn move_cursor(&self, ctx: &mut PaintContext<'_>) -> Result<(), LineError> {
        ctx.advance(self.width()?);
        ctx.info.idx += self.len() as usize;
        Ok(())
    }

    fn push_text(&self, ctx: &mut PaintContext<'_>, width: u32, height: u32, content: String) {
        ctx.push(
            width,
            height,
            PaintElement::Text(TextElement {
                content,
                join_prev: self.join_border_with_prev(),
                join_next: self.join_border_with_next(),
            }),
        );
    }
}

/// Paints every portion of a chain in order.
pub fn paint_chain(chain: &PortionChain, ctx: &mut PaintContext<'_>) -> Result<(), LineError> {
    for (_, portion) in chain.iter() {
        portion.pre_paint(ctx)?;
        portion.move_cursor(ctx)?;
    }
    Ok(())
}
