//! The portion chain: an arena of portions linked by stable handles.
//!
//! One chain represents one formatted line. Slots own their portion;
//! successor links are indices into the arena, so splicing never moves a
//! node and a detached portion cannot drag a tail along with it. All walks
//! are linear, which is acceptable because lines rarely exceed a few dozen
//! portions.

use crate::LineError;
use crate::portion::Portion;
use std::fmt;

/// Stable handle to a portion inside one [`PortionChain`]. Handles from one
/// chain are meaningless in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortionId(u32);

impl fmt::Display for PortionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an insertion actually did: linked a new node, or folded the content
/// into an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(PortionId),
    MergedInto(PortionId),
}

impl InsertOutcome {
    /// The portion the caller should treat as current after the insert.
    pub fn id(self) -> PortionId {
        match self {
            Self::Inserted(id) | Self::MergedInto(id) => id,
        }
    }
}

#[derive(Debug)]
struct Slot {
    portion: Portion,
    next: Option<PortionId>,
}

/// The ordered sequence of portions making up one line.
#[derive(Debug, Default)]
pub struct PortionChain {
    slots: Vec<Option<Slot>>,
    free: Vec<u32>,
    head: Option<PortionId>,
}

impl PortionChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(&self) -> Option<PortionId> {
        self.head
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn get(&self, id: PortionId) -> Option<&Portion> {
        self.slots
            .get(id.0 as usize)
            .and_then(|s| s.as_ref())
            .map(|s| &s.portion)
    }

    pub fn get_mut(&mut self, id: PortionId) -> Option<&mut Portion> {
        self.slots
            .get_mut(id.0 as usize)
            .and_then(|s| s.as_mut())
            .map(|s| &mut s.portion)
    }

    /// The direct successor of `id`.
    pub fn next(&self, id: PortionId) -> Result<Option<PortionId>, LineError> {
        self.slot(id).map(|s| s.next)
    }

    /// Links a portion in front of the current head; the former head becomes
    /// its successor. Returns the new head's handle.
    pub fn push_head(&mut self, portion: Portion) -> PortionId {
        let old_head = self.head;
        let id = self.alloc(portion, old_head);
        self.head = Some(id);
        id
    }

    /// Places `portion` directly after `at`. A kern inserted after a kern is
    /// folded into the existing portion instead of creating a node; callers
    /// must not assume a node was created without checking the outcome.
    pub fn insert_after(
        &mut self,
        at: PortionId,
        portion: Portion,
    ) -> Result<InsertOutcome, LineError> {
        let slot = self.slot_mut(at)?;
        if slot.portion.try_merge(&portion) {
            log::trace!("merged {} portion into {at}", portion.kind().as_str());
            return Ok(InsertOutcome::MergedInto(at));
        }
        let next = slot.next;
        let id = self.alloc(portion, next);
        // Re-borrow: alloc may have grown the slot vector.
        self.slot_mut(at)?.next = Some(id);
        log::trace!("inserted portion {id} after {at}");
        Ok(InsertOutcome::Inserted(id))
    }

    /// Walks to the last portion reachable from `from` and inserts there.
    pub fn append(
        &mut self,
        from: PortionId,
        portion: Portion,
    ) -> Result<InsertOutcome, LineError> {
        let last = self.find_last(from)?;
        self.insert_after(last, portion)
    }

    /// Removes `victim`, which must be the direct successor of `at`, and
    /// hands the detached portion to the caller. The chain is re-linked
    /// around the gap.
    pub fn cut(&mut self, at: PortionId, victim: PortionId) -> Result<Portion, LineError> {
        if self.slot(at)?.next != Some(victim) {
            return Err(LineError::NotAdjacent(at, victim));
        }
        let removed = self.release(victim)?;
        self.slot_mut(at)?.next = removed.1;
        log::trace!("cut portion {victim} after {at}");
        Ok(removed.0)
    }

    /// Destroys the entire remainder of the chain after `at`. Returns how
    /// many portions were removed.
    pub fn truncate_after(&mut self, at: PortionId) -> Result<usize, LineError> {
        let mut cursor = self.slot(at)?.next;
        self.slot_mut(at)?.next = None;
        let mut removed = 0;
        while let Some(id) = cursor {
            cursor = self.release(id)?.1;
            removed += 1;
        }
        if removed > 0 {
            log::debug!("truncated {removed} portions after {at}");
        }
        Ok(removed)
    }

    /// Drops every portion whose `compress` reports no payload. Returns how
    /// many portions were removed.
    pub fn compress(&mut self) -> usize {
        let mut removed = 0;
        while let Some(head) = self.head {
            if self.keeps_payload(head) {
                break;
            }
            self.head = self.release(head).map(|(_, next)| next).unwrap_or(None);
            removed += 1;
        }
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let next = match self.next(id) {
                Ok(next) => next,
                Err(_) => break,
            };
            match next {
                Some(succ) if !self.keeps_payload(succ) => {
                    let after = self.release(succ).map(|(_, next)| next).unwrap_or(None);
                    if let Ok(slot) = self.slot_mut(id) {
                        slot.next = after;
                    }
                    removed += 1;
                    // Stay on `id`: its new successor still needs checking.
                }
                _ => cursor = next,
            }
        }
        if removed > 0 {
            log::debug!("compressed away {removed} empty portions");
        }
        removed
    }

    /// The portion whose successor is `of`, scanning from `root`. `None`
    /// when `of` is the root itself or not reachable from it.
    pub fn find_prev(&self, root: PortionId, of: PortionId) -> Option<PortionId> {
        if root == of {
            return None;
        }
        let mut cursor = root;
        loop {
            match self.next(cursor) {
                Ok(Some(next)) if next == of => return Some(cursor),
                Ok(Some(next)) => cursor = next,
                _ => return None,
            }
        }
    }

    /// The terminal portion reachable from `from`.
    pub fn find_last(&self, from: PortionId) -> Result<PortionId, LineError> {
        let mut cursor = from;
        while let Some(next) = self.next(cursor)? {
            cursor = next;
        }
        Ok(cursor)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            chain: self,
            cursor: self.head,
        }
    }

    pub fn iter_from(&self, id: PortionId) -> Iter<'_> {
        Iter {
            chain: self,
            cursor: Some(id),
        }
    }

    /// Number of portions reachable from the head.
    pub fn portion_count(&self) -> usize {
        self.iter().count()
    }

    /// Sum of covered source characters over the whole chain.
    pub fn total_len(&self) -> u32 {
        self.iter().map(|(_, p)| p.len()).sum()
    }

    fn alloc(&mut self, portion: Portion, next: Option<PortionId>) -> PortionId {
        let slot = Slot { portion, next };
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(slot);
                PortionId(index)
            }
            None => {
                self.slots.push(Some(slot));
                PortionId(self.slots.len() as u32 - 1)
            }
        }
    }

    /// Frees a slot, returning its portion and former successor.
    fn release(&mut self, id: PortionId) -> Result<(Portion, Option<PortionId>), LineError> {
        let slot = self
            .slots
            .get_mut(id.0 as usize)
            .and_then(|s| s.take())
            .ok_or(LineError::Detached(id))?;
        self.free.push(id.0);
        Ok((slot.portion, slot.next))
    }

    fn slot(&self, id: PortionId) -> Result<&Slot, LineError> {
        self.slots
            .get(id.0 as usize)
            .and_then(|s| s.as_ref())
            .ok_or(LineError::Detached(id))
    }

    fn slot_mut(&mut self, id: PortionId) -> Result<&mut Slot, LineError> {
        self.slots
            .get_mut(id.0 as usize)
            .and_then(|s| s.as_mut())
            .ok_or(LineError::Detached(id))
    }

    fn keeps_payload(&self, id: PortionId) -> bool {
        self.get(id).is_some_and(|p| p.compress().is_some())
    }
}

pub struct Iter<'a> {
    chain: &'a PortionChain,
    cursor: Option<PortionId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (PortionId, &'a Portion);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let portion = self.chain.get(id)?;
        self.cursor = self.chain.next(id).ok().flatten();
        Some((id, portion))
    }
}
