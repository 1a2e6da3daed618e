#![cfg(test)]

use crate::LineError;
use crate::build::LineBuilder;
use crate::format::{FormatContext, FormatOutcome, SizeInfo};
use crate::handler::{PortionHandler, handle_chain};
use crate::kind::{PortionGroups, PortionKind};
use crate::paint::{PaintContext, PaintElement, paint_chain};
use crate::portion::{Portion, PortionData};
use crate::test_utils::{chain_of, kinds, metrics};
use galley_types::PosSize;

#[test]
fn test_family_membership() {
    assert!(PortionKind::Text.in_text_grp());
    assert!(!PortionKind::TabLeft.in_text_grp());
    assert!(!PortionKind::TabRight.in_text_grp());
    assert!(!PortionKind::Break.in_text_grp());

    assert!(PortionKind::SoftHyphen.in_hyph_grp());
    assert!(PortionKind::SoftHyphen.in_exp_grp());
    assert!(PortionKind::TabLeft.in_tab_grp());
    assert!(PortionKind::TabLeft.in_glue_grp());
    assert!(PortionKind::Margin.in_fix_marg_grp());

    // A portion may belong to several families at once.
    assert!(PortionKind::AuthorityField.in_field_grp());
    assert!(PortionKind::AuthorityField.in_tox_ref_grp());
    assert!(PortionKind::Footnote.in_field_or_tox_ref_grp());
    assert!(PortionKind::TocRef.in_field_or_tox_ref_grp());
    assert!(!PortionKind::Text.in_field_or_tox_ref_grp());

    // The spacing group is the text family plus multi portions.
    assert!(PortionKind::Text.in_space_grp());
    assert!(PortionKind::Multi.in_space_grp());
    assert!(!PortionKind::Multi.in_text_grp());
    assert!(!PortionKind::Glue.in_space_grp());

    assert_eq!(PortionKind::Text.groups(), PortionGroups::TEXT);
    assert_eq!(PortionKind::Text.groups().bits(), 0x8000);
}

#[test]
fn test_text_size_and_measure_state() {
    let m = metrics();
    let info = SizeInfo::new("word", &m);
    let mut portion = Portion::text(4);

    assert_eq!(
        portion.extent().unwrap_err(),
        LineError::Unmeasured("Text"),
        "geometry must not be readable before measurement"
    );

    let size = portion.text_size(&info);
    assert_eq!(size, PosSize::new(40, 10, 8));
    assert!(!portion.is_measured(), "text_size is a pure query");

    portion.calc_text_size(&info);
    assert_eq!(portion.extent().unwrap(), PosSize::new(40, 10, 8));

    portion.set_len(3);
    assert!(
        portion.extent().is_err(),
        "a length mutation makes the cached extent stale"
    );
}

#[test]
fn test_text_size_counts_chars_not_bytes() {
    let m = metrics();
    let info = SizeInfo::new("héllo", &m);
    let portion = Portion::text(5);

    assert_eq!(portion.text_size(&info).width, 50);
}

#[test]
fn test_format_fits_until_width_is_exhausted() {
    let m = metrics();
    let text = "aaaabbbbbccccc";
    let mut ctx = FormatContext::new(SizeInfo::new(text, &m), 90);

    let mut first = Portion::text(4);
    let mut second = Portion::text(5);
    let mut third = Portion::text(5);

    assert_eq!(first.format(&mut ctx), FormatOutcome::Placed);
    assert_eq!(ctx.x(), 40);
    assert_eq!(second.format(&mut ctx), FormatOutcome::Placed);
    assert_eq!(ctx.x(), 90, "a portion ending exactly at the width still fits");
    assert_eq!(third.format(&mut ctx), FormatOutcome::Breaks);
    assert_eq!(ctx.x(), 90, "a failed format leaves the cursor untouched");
    assert!(!third.is_measured());
}

#[test]
fn test_builder_splits_lines_at_the_break_point() {
    let m = metrics();
    let text = "aaaabbbbbccccc";
    let builder = LineBuilder::new(text, &m, 90);

    let lines = builder
        .compose(vec![Portion::text(4), Portion::text(5), Portion::text(5)])
        .unwrap();

    assert_eq!(lines.len(), 2);
    assert_eq!(kinds(&lines[0].chain), vec![PortionKind::Text, PortionKind::Text]);
    assert_eq!(lines[0].len, 9);
    assert_eq!(lines[0].extent, PosSize::new(90, 10, 8));
    assert_eq!(kinds(&lines[1].chain), vec![PortionKind::Text]);
    assert_eq!(lines[1].start, 9);
    assert_eq!(lines[1].len, 5);
}

#[test]
fn test_tab_advances_to_its_stop() {
    let m = metrics();
    let text = "ab\tcd";
    let mut ctx = FormatContext::new(SizeInfo::new(text, &m), 100);

    assert_eq!(Portion::text(2).format(&mut ctx), FormatOutcome::Placed);

    let mut tab = Portion::tab_left(50);
    assert_eq!(tab.format(&mut ctx), FormatOutcome::Placed);
    assert_eq!(tab.width().unwrap(), 30);
    assert_eq!(ctx.x(), 50);

    // A stop at or behind the cursor still advances one blank width.
    let mut stale_tab = Portion::tab_left(40);
    assert_eq!(stale_tab.format(&mut ctx), FormatOutcome::Placed);
    assert_eq!(stale_tab.width().unwrap(), 10);

    // A stop beyond the line width cannot be honored on this line.
    let mut far_tab = Portion::tab_left(150);
    assert_eq!(far_tab.format(&mut ctx), FormatOutcome::Breaks);
}

#[test]
fn test_format_eol_trims_trailing_blank() {
    let m = metrics();
    let mut ctx = FormatContext::new(SizeInfo::new("ab ", &m), 100);
    let mut portion = Portion::text(3);

    assert_eq!(portion.format(&mut ctx), FormatOutcome::Placed);
    assert_eq!(ctx.x(), 30);

    ctx.info.idx = 0;
    portion.format_eol(&mut ctx);
    assert_eq!(portion.width().unwrap(), 20);
    assert_eq!(ctx.x(), 20);
}

#[test]
fn test_format_eol_collapses_trailing_glue() {
    let m = metrics();
    let mut ctx = FormatContext::new(SizeInfo::new("", &m), 100);
    let mut glue = Portion::glue(0);
    glue.set_extent(PosSize::new(25, 0, 0));
    ctx.advance(25);

    glue.format_eol(&mut ctx);
    assert_eq!(glue.width().unwrap(), 0);
    assert_eq!(ctx.x(), 0);
}

#[test]
fn test_cursor_offset_snaps_to_nearest_boundary() {
    let m = metrics();
    let info = SizeInfo::new("abc", &m);
    let portion = Portion::text(3);

    assert_eq!(portion.cursor_offset(0, &info), 0);
    assert_eq!(portion.cursor_offset(4, &info), 0);
    assert_eq!(portion.cursor_offset(25, &info), 2);
    assert_eq!(portion.cursor_offset(100, &info), 3);

    // Portions without character-granular content resolve to their length.
    let tab = Portion::tab_left(50);
    assert_eq!(tab.cursor_offset(3, &info), 1);
}

#[test]
fn test_calc_spacing_weights_by_blanks() {
    let m = metrics();
    let info = SizeInfo::new("a b c", &m);

    assert_eq!(Portion::text(5).calc_spacing(7, &info), 14);
    assert_eq!(Portion::glue(0).calc_spacing(7, &info), 0);
    assert_eq!(Portion::new(PortionData::Multi, 0).calc_spacing(7, &info), 7);
}

#[test]
fn test_exp_text_and_view_width() {
    let m = metrics();
    let info = SizeInfo::new("x", &m);

    assert_eq!(Portion::field("Page 1", 1).exp_text().as_deref(), Some("Page 1"));
    assert_eq!(Portion::text(1).exp_text(), None);
    assert_eq!(Portion::blank('·').exp_text().as_deref(), Some("·"));

    let mut hyphen = Portion::soft_hyphen();
    assert_eq!(hyphen.view_width(&info), 0);
    assert_eq!(hyphen.exp_text().as_deref(), Some(""));
    hyphen.set_expanded(true);
    assert_eq!(hyphen.view_width(&info), 10);
    assert_eq!(hyphen.exp_text().as_deref(), Some("-"));
}

#[test]
fn test_paint_chain_positions_elements() {
    let m = metrics();
    let text = "Hello world";
    let mut measure = SizeInfo::new(text, &m);

    let mut hello = Portion::text(5);
    hello.calc_text_size(&measure);
    measure.idx = 5;
    let mut blank = Portion::blank(' ');
    blank.calc_text_size(&measure);
    measure.idx = 6;
    let mut world = Portion::text(5);
    world.set_join_border_with_prev(true);
    world.calc_text_size(&measure);

    let (chain, _) = chain_of(vec![hello, blank, world]);
    let mut ctx = PaintContext::new(SizeInfo::new(text, &m), 100, 200);
    paint_chain(&chain, &mut ctx).unwrap();

    let elements = ctx.elements();
    assert_eq!(elements.len(), 3);
    assert_eq!((elements[0].x, elements[0].y), (100, 200));
    assert_eq!(elements[1].x, 150);
    assert_eq!(elements[2].x, 160);

    let PaintElement::Text(run) = &elements[0].element else {
        panic!("a text portion paints a text run");
    };
    assert_eq!(run.content, "Hello");
    assert!(!run.join_prev);

    let PaintElement::Text(run) = &elements[2].element else {
        panic!("a text portion paints a text run");
    };
    assert_eq!(run.content, "world");
    assert!(run.join_prev, "join flags ride along for the renderer");
}

#[test]
fn test_paint_before_measure_fails_loudly() {
    let m = metrics();
    let (chain, _) = chain_of(vec![Portion::text(3)]);
    let mut ctx = PaintContext::new(SizeInfo::new("abc", &m), 0, 0);

    assert_eq!(
        paint_chain(&chain, &mut ctx).unwrap_err(),
        LineError::Unmeasured("Text")
    );
}

#[test]
fn test_pre_paint_skips_invisible_portions() {
    let m = metrics();
    let mut ctx = PaintContext::new(SizeInfo::new("", &m), 0, 0);

    let marker = Portion::new(PortionData::LinkStart, 0);
    assert!(!marker.pre_paint(&mut ctx).unwrap());
    assert!(ctx.elements().is_empty());

    // An expanded soft hyphen has no layout width but a visible hyphen.
    let mut hyphen = Portion::soft_hyphen();
    hyphen.set_extent(PosSize::new(0, 10, 8));
    hyphen.set_expanded(true);
    assert!(hyphen.pre_paint(&mut ctx).unwrap());
    assert_eq!(ctx.elements().len(), 1);
}

#[derive(Default)]
struct RecordingHandler {
    events: Vec<String>,
}

impl PortionHandler for RecordingHandler {
    fn text(&mut self, len: u32, kind: PortionKind) {
        self.events.push(format!("text {len} {}", kind.as_str()));
    }

    fn special(&mut self, len: u32, text: &str, kind: PortionKind) {
        self.events.push(format!("special {len} {text:?} {}", kind.as_str()));
    }

    fn line_break(&mut self, width: u32) {
        self.events.push(format!("break {width}"));
    }

    fn skip(&mut self, len: u32) {
        self.events.push(format!("skip {len}"));
    }

    fn finish(&mut self) {
        self.events.push("finish".to_string());
    }
}

#[test]
fn test_handler_walk() {
    let (chain, _) = chain_of(vec![
        Portion::text(5),
        Portion::field("1", 1),
        Portion::hole(2),
        Portion::line_break(),
    ]);

    let mut handler = RecordingHandler::default();
    handle_chain(&chain, &mut handler);
    // A second walk observes the same sequence.
    handle_chain(&chain, &mut handler);

    let expected = vec![
        "text 5 Text".to_string(),
        "special 1 \"1\" Field".to_string(),
        "skip 2".to_string(),
        "break 0".to_string(),
        "finish".to_string(),
    ];
    assert_eq!(handler.events[..5], expected[..]);
    assert_eq!(handler.events[5..], expected[..]);
}

#[test]
fn test_justify_distributes_extra_width() {
    let m = metrics();
    let text = "aa bb";
    let builder = LineBuilder::new(text, &m, 100);
    let mut lines = builder.compose(vec![Portion::text(5)]).unwrap();
    assert_eq!(lines[0].extent.width, 50);

    lines[0].justify(90, text, &m).unwrap();
    assert_eq!(lines[0].extent.width, 90);
    let (_, portion) = lines[0].chain.iter().next().unwrap();
    assert_eq!(portion.width().unwrap(), 90);
}

#[test]
fn test_justify_without_blanks_is_a_noop() {
    let m = metrics();
    let text = "aaaa";
    let builder = LineBuilder::new(text, &m, 100);
    let mut lines = builder.compose(vec![Portion::text(4)]).unwrap();

    lines[0].justify(90, text, &m).unwrap();
    assert_eq!(lines[0].extent.width, 40);
}

#[test]
fn test_cursor_offset_at_line_level() {
    let m = metrics();
    let text = "aa bb";
    let builder = LineBuilder::new(text, &m, 100);
    let lines = builder.compose(vec![Portion::text(5)]).unwrap();

    assert_eq!(lines[0].cursor_offset_at(4, text, &m).unwrap(), 0);
    assert_eq!(lines[0].cursor_offset_at(27, text, &m).unwrap(), 3);
    assert_eq!(lines[0].cursor_offset_at(400, text, &m).unwrap(), 5);
}

#[test]
fn test_builder_break_portion_closes_its_line() {
    let m = metrics();
    let text = "aabb";
    let builder = LineBuilder::new(text, &m, 1000);

    let lines = builder
        .compose(vec![Portion::text(2), Portion::line_break(), Portion::text(2)])
        .unwrap();

    assert_eq!(lines.len(), 2);
    assert_eq!(kinds(&lines[0].chain), vec![PortionKind::Text, PortionKind::Break]);
    assert_eq!(lines[0].len, 2);
    assert_eq!(lines[1].start, 2);
    assert_eq!(kinds(&lines[1].chain), vec![PortionKind::Text]);
}

#[test]
fn test_builder_places_oversized_portion_alone() {
    let m = metrics();
    let text = "aaaaaaaaaaaaaaaaaaaa";
    let builder = LineBuilder::new(text, &m, 50);

    let lines = builder.compose(vec![Portion::text(20)]).unwrap();

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].extent.width, 200);
}
