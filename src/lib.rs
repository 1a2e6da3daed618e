//! galley: a line-composition core for text layout.
//!
//! A formatted line is a chain of typed portions: runs of text, tabs,
//! fields, hyphenation points, breaks and other visually atomic spans, each
//! with measured geometry and grouping semantics. This facade re-exports
//! the member crates; the actual model lives in `galley-line` on top of the
//! `galley-types` geometry primitives.

pub use galley_line::{
    ComposedLine, FontMetrics, FormatContext, FormatOutcome, InsertOutcome, LineBuilder,
    LineError, PaintContext, PaintElement, PaintedElement, Portion, PortionChain, PortionData,
    PortionGroups, PortionHandler, PortionId, PortionKind, SizeInfo, handle_chain, paint_chain,
};
pub use galley_types::PosSize;
