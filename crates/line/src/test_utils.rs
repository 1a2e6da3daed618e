#![cfg(test)]

use crate::chain::{PortionChain, PortionId};
use crate::format::FontMetrics;
use crate::kind::PortionKind;
use crate::portion::Portion;

/// Deterministic metrics: every character is the same width.
pub struct FixedMetrics {
    pub char_w: u32,
    pub ascent: u32,
    pub height: u32,
}

impl FontMetrics for FixedMetrics {
    fn char_width(&self, _c: char) -> u32 {
        self.char_w
    }

    fn ascent(&self) -> u32 {
        self.ascent
    }

    fn height(&self) -> u32 {
        self.height
    }
}

pub fn metrics() -> FixedMetrics {
    FixedMetrics {
        char_w: 10,
        ascent: 8,
        height: 10,
    }
}

/// Builds a chain from a portion sequence, returning the handle of every
/// node in order. Callers pass non-merging sequences.
pub fn chain_of(portions: Vec<Portion>) -> (PortionChain, Vec<PortionId>) {
    let mut chain = PortionChain::new();
    let mut ids = Vec::new();
    for portion in portions {
        let id = match ids.last() {
            None => chain.push_head(portion),
            Some(&tail) => chain
                .insert_after(tail, portion)
                .expect("tail handle is live")
                .id(),
        };
        ids.push(id);
    }
    (chain, ids)
}

pub fn kinds(chain: &PortionChain) -> Vec<PortionKind> {
    chain.iter().map(|(_, p)| p.kind()).collect()
}

pub fn kinds_and_lens(chain: &PortionChain) -> Vec<(PortionKind, u32)> {
    chain.iter().map(|(_, p)| (p.kind(), p.len())).collect()
}
