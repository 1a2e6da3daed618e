use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("Portion {1} is not the direct successor of portion {0}.")]
    NotAdjacent(PortionId, PortionId),
    #[error("Portion {0} does not belong to a live portion in this chain.")]
    Detached(PortionId),
    #[error("Geometry of a {0} portion was read before it was measured.")]
    Unmeasured(&'static str),
}

pub mod build;
pub mod chain;
pub mod format;
pub mod handler;
pub mod kind;
pub mod paint;
pub mod portion;

pub use self::build::{ComposedLine, LineBuilder};
pub use self::chain::{InsertOutcome, PortionChain, PortionId};
pub use self::format::{FontMetrics, FormatContext, FormatOutcome, SizeInfo};
pub use self::handler::{PortionHandler, handle_chain};
pub use self::kind::{PortionGroups, PortionKind};
pub use self::paint::{PaintContext, PaintElement, PaintedElement, paint_chain};
pub use self::portion::{Portion, PortionData};

// Re-export the geometry type portions are measured in, to prevent type
// mismatches for downstream drivers.
pub use galley_types::PosSize;

#[cfg(test)]
mod format_test;
#[cfg(test)]
mod prop_test;
#[cfg(test)]
mod test_utils;
