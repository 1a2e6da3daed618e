//! A reference line-building driver.
//!
//! The formatting protocol is driven from outside the chain: something must
//! feed portions into lines, close a line when a portion no longer fits and
//! carry the rest over. This module is that driver in its simplest form.
//! Hosts with their own breaking policy can ignore it and call the protocol
//! directly.

use crate::chain::{PortionChain, PortionId};
use crate::format::{FontMetrics, FormatContext, FormatOutcome, SizeInfo};
use crate::kind::PortionKind;
use crate::portion::Portion;
use crate::{LineError, PosSize};
use std::collections::VecDeque;

/// One finished line: its chain plus the aggregated line box.
#[derive(Debug)]
pub struct ComposedLine {
    pub chain: PortionChain,
    /// Line box: summed width, maximum height and ascent.
    pub extent: PosSize,
    /// Source characters covered by the line.
    pub len: u32,
    /// Character index of the line's first covered character.
    pub start: usize,
}

/// Formats a stream of pre-itemized portions into lines of a given width.
pub struct LineBuilder<'a> {
    text: &'a str,
    metrics: &'a dyn FontMetrics,
    line_width: u32,
}

impl<'a> LineBuilder<'a> {
    pub fn new(text: &'a str, metrics: &'a dyn FontMetrics, line_width: u32) -> Self {
        Self {
            text,
            metrics,
            line_width,
        }
    }

    /// Composes `portions` into lines. Portions that report `Breaks` on a
    /// non-empty line are carried over and retried at the head of the next
    /// one; a portion too wide for an empty line is placed anyway so
    /// composition always makes progress.
    pub fn compose(&self, portions: Vec<Portion>) -> Result<Vec<ComposedLine>, LineError> {
        let mut work: VecDeque<Portion> = portions.into();
        let mut lines = Vec::new();
        let mut idx = 0usize;

        while !work.is_empty() {
            let start = idx;
            let mut info = SizeInfo::new(self.text, self.metrics);
            info.idx = idx;
            let mut ctx = FormatContext::new(info, self.line_width);
            let mut chain = PortionChain::new();
            let mut tail: Option<PortionId> = None;
            let mut tail_start = idx;

            while let Some(mut portion) = work.pop_front() {
                let portion_start = ctx.info.idx;
                match portion.format(&mut ctx) {
                    FormatOutcome::Placed => {
                        tail = Some(attach(&mut chain, tail, portion)?);
                        tail_start = portion_start;
                    }
                    FormatOutcome::Breaks if portion.kind() == PortionKind::Break => {
                        // An explicit break belongs to the line it ends.
                        ctx.info.idx += portion.len() as usize;
                        tail = Some(attach(&mut chain, tail, portion)?);
                        tail_start = portion_start;
                        break;
                    }
                    FormatOutcome::Breaks => {
                        if chain.is_empty() {
                            log::debug!(
                                "{} portion wider than the line, placing it alone",
                                portion.kind().as_str()
                            );
                            portion.calc_text_size(&ctx.info);
                            ctx.advance(portion.width()?);
                            ctx.info.idx += portion.len() as usize;
                            tail = Some(attach(&mut chain, tail, portion)?);
                            tail_start = portion_start;
                        } else {
                            work.push_front(portion);
                        }
                        break;
                    }
                }
            }

            idx = ctx.info.idx;
            if let Some(t) = tail {
                ctx.info.idx = tail_start;
                if let Some(last) = chain.get_mut(t) {
                    last.format_eol(&mut ctx);
                }
            }
            log::debug!(
                "closed line at x={} with {} portions",
                ctx.x(),
                chain.portion_count()
            );
            lines.push(seal(chain, start)?);
        }
        Ok(lines)
    }
}

fn attach(
    chain: &mut PortionChain,
    tail: Option<PortionId>,
    portion: Portion,
) -> Result<PortionId, LineError> {
    Ok(match tail {
        Some(at) => chain.insert_after(at, portion)?.id(),
        None => chain.push_head(portion),
    })
}

fn seal(chain: PortionChain, start: usize) -> Result<ComposedLine, LineError> {
    let mut width = 0u32;
    let mut height = 0u32;
    let mut ascent = 0u32;
    for (_, portion) in chain.iter() {
        let extent = portion.extent()?;
        width += extent.width;
        height = height.max(extent.height);
        ascent = ascent.max(extent.ascent);
    }
    let len = chain.total_len();
    Ok(ComposedLine {
        chain,
        extent: PosSize::new(width, height, ascent),
        len,
        start,
    })
}

impl ComposedLine {
    /// Widens the line to `target_width` by letting space-absorbing portions
    /// soak up the slack, weighted by their blank count. Slack that does not
    /// divide evenly stays at the line end.
    pub fn justify(
        &mut self,
        target_width: u32,
        text: &str,
        metrics: &dyn FontMetrics,
    ) -> Result<(), LineError> {
        if target_width <= self.extent.width {
            return Ok(());
        }
        let extra = (target_width - self.extent.width) as i32;

        let mut info = SizeInfo::new(text, metrics);
        info.idx = self.start;
        let mut weights = Vec::new();
        let mut total = 0i32;
        for (id, portion) in self.chain.iter() {
            let weight = portion.calc_spacing(1, &info);
            weights.push((id, weight));
            total += weight;
            info.idx += portion.len() as usize;
        }
        if total == 0 {
            return Ok(());
        }

        let space_add = extra / total;
        for (id, weight) in weights {
            if weight == 0 {
                continue;
            }
            if let Some(portion) = self.chain.get_mut(id) {
                let extent = portion.extent()?;
                portion.set_extent(extent.with_width(extent.width + (weight * space_add) as u32));
            }
        }
        self.extent.width += (total * space_add) as u32;
        Ok(())
    }

    /// Maps a horizontal offset on the line to a character offset relative
    /// to the line start. Offsets past the last portion resolve to the
    /// line's full length.
    pub fn cursor_offset_at(
        &self,
        x: u32,
        text: &str,
        metrics: &dyn FontMetrics,
    ) -> Result<u32, LineError> {
        let mut info = SizeInfo::new(text, metrics);
        info.idx = self.start;
        let mut acc = 0u32;
        let mut chars = 0u32;
        for (_, portion) in self.chain.iter() {
            let width = portion.extent()?.width;
            if x < acc + width {
                return Ok(chars + portion.cursor_offset(x - acc, &info));
            }
            acc += width;
            chars += portion.len();
            info.idx += portion.len() as usize;
        }
        Ok(chars)
    }
}
