//! Structured export of a composed line to an external visitor, the hook
//! accessibility and export tooling walks a line through.

use crate::chain::PortionChain;
use crate::kind::PortionKind;
use crate::portion::Portion;

/// Receives a flat description of each portion on a line. Implementations
/// see text-family portions as runs of source characters, expandable
/// portions with their display text, and silent spacers as skips.
pub trait PortionHandler {
    /// A run of `len` source characters.
    fn text(&mut self, len: u32, kind: PortionKind);

    /// A portion displaying `text` in place of `len` source characters.
    fn special(&mut self, len: u32, text: &str, kind: PortionKind);

    /// An explicit line break of the given width.
    fn line_break(&mut self, width: u32);

    /// `len` source characters with no visual representation.
    fn skip(&mut self, len: u32);

    /// The end of the walked line.
    fn finish(&mut self);
}

impl Portion {
    /// Describes this portion to `handler`. Pure: safe to call repeatedly.
    pub fn handle_portion(&self, handler: &mut dyn PortionHandler) {
        let kind = self.kind();
        if kind.in_text_grp() {
            handler.text(self.len(), kind);
        } else if kind == PortionKind::Break {
            handler.line_break(self.width().unwrap_or_default());
        } else if kind == PortionKind::Hole {
            handler.skip(self.len());
        } else {
            let text = self.exp_text().unwrap_or_default();
            handler.special(self.len(), &text, kind);
        }
    }
}

/// Walks a whole chain through `handler`, closing with `finish`.
pub fn handle_chain(chain: &PortionChain, handler: &mut dyn PortionHandler) {
    for (_, portion) in chain.iter() {
        portion.handle_portion(handler);
    }
    handler.finish();
}
