//! In-process editing surface.
//!
//! Holds at most one document plus its multi-cursor selections and reports
//! every change through an `EventHub`. All mutation goes through `&self`,
//! and no internal borrow is held while events are emitted, so listeners
//! may read or write the surface from inside a notification.

use std::cell::{Cell, RefCell};
use std::fmt;

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::buffer::TextBuffer;
use crate::controller::SelectionHost;
use crate::events::{EventHub, SurfaceEvent};
use crate::history::{Position, SelectionRange, StateSnapshot};

/// Identity of an opened document. A fresh id is minted on every open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document attached to the surface.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub buffer: TextBuffer,
}

/// A host surface that also publishes change notifications.
pub trait ObservableSurface: SelectionHost {
    fn events(&self) -> &EventHub;
}

/// Single-document editing surface with multi-cursor selections.
#[derive(Debug, Default)]
pub struct EditorSurface {
    document: RefCell<Option<Document>>,
    /// Primary selection first. Empty only when no document is attached.
    selections: RefCell<Vec<SelectionRange>>,
    /// Last range the surface was asked to scroll into view.
    last_reveal: Cell<Option<SelectionRange>>,
    events: EventHub,
}

impl EditorSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a new document with a caret at the start.
    ///
    /// Emits `DocumentReplaced`, then `SelectionChanged`.
    pub fn open_document(&self, name: impl Into<String>, text: &str) -> DocumentId {
        let id = DocumentId::generate();
        let name = name.into();
        tracing::debug!(%id, name = %name, "Opening document");
        *self.document.borrow_mut() = Some(Document {
            id,
            name,
            buffer: TextBuffer::from(text),
        });
        *self.selections.borrow_mut() = vec![SelectionRange::caret(Position::default())];
        self.last_reveal.set(None);

        self.events.emit(SurfaceEvent::DocumentReplaced);
        self.events.emit(SurfaceEvent::SelectionChanged);
        id
    }

    /// Detaches the current document, if any. Emits `DocumentReplaced`.
    pub fn close_document(&self) {
        let closed = self.document.borrow_mut().take();
        if let Some(doc) = closed {
            tracing::debug!(id = %doc.id, "Closing document");
            self.selections.borrow_mut().clear();
            self.last_reveal.set(None);
            self.events.emit(SurfaceEvent::DocumentReplaced);
        }
    }

    pub fn document_id(&self) -> Option<DocumentId> {
        self.document.borrow().as_ref().map(|d| d.id)
    }

    pub fn document_name(&self) -> Option<String> {
        self.document.borrow().as_ref().map(|d| d.name.clone())
    }

    /// Full text of the attached document.
    pub fn text(&self) -> Option<String> {
        self.document.borrow().as_ref().map(|d| d.buffer.to_string())
    }

    pub fn selections(&self) -> Vec<SelectionRange> {
        self.selections.borrow().clone()
    }

    pub fn last_reveal(&self) -> Option<SelectionRange> {
        self.last_reveal.get()
    }

    /// Replaces all selections, clamped to the document. Emits `SelectionChanged`.
    ///
    /// # Errors
    ///
    /// Returns an error if no document is attached or `ranges` is empty.
    pub fn set_selections(&self, ranges: Vec<SelectionRange>) -> Result<()> {
        if ranges.is_empty() {
            anyhow::bail!("at least one selection is required");
        }
        let clamped: Vec<SelectionRange> = {
            let document = self.document.borrow();
            let doc = document.as_ref().context("no document is attached")?;
            ranges
                .into_iter()
                .map(|r| doc.buffer.clamp_range(r))
                .collect()
        };
        *self.selections.borrow_mut() = clamped;
        self.events.emit(SurfaceEvent::SelectionChanged);
        Ok(())
    }

    /// Collapses the selections to a single caret at `pos`.
    ///
    /// # Errors
    ///
    /// Returns an error if no document is attached.
    pub fn move_caret(&self, pos: Position) -> Result<()> {
        self.set_selections(vec![SelectionRange::caret(pos)])
    }

    /// Replaces every selection with `text` and leaves a caret after each
    /// insertion.
    ///
    /// Emits `ContentChanged`, then `SelectionChanged`.
    ///
    /// # Errors
    ///
    /// Returns an error if no document is attached.
    pub fn insert_text(&self, text: &str) -> Result<()> {
        {
            let mut document = self.document.borrow_mut();
            let doc = document.as_mut().context("no document is attached")?;
            let mut selections = self.selections.borrow_mut();
            let carets = replace_selections(&mut doc.buffer, &selections, text)
                .context("inserting text")?;
            *selections = carets;
        }
        self.events.emit(SurfaceEvent::ContentChanged);
        self.events.emit(SurfaceEvent::SelectionChanged);
        Ok(())
    }
}

/// Replaces each selection with `text`, processing from the end of the
/// document backwards so earlier offsets stay valid.
///
/// Overlapping, nested, or coincident selections are merged first and
/// replaced once; every selection in a merged group gets the same caret.
/// Returns one caret per input selection, in the input order.
fn replace_selections(
    buffer: &mut TextBuffer,
    selections: &[SelectionRange],
    text: &str,
) -> Result<Vec<SelectionRange>> {
    let inserted = text.chars().count() as isize;

    // (start, end, original index), sorted by document order
    let mut spans: Vec<(usize, usize, usize)> = selections
        .iter()
        .enumerate()
        .map(|(i, r)| Ok((buffer.pos_to_char(r.start())?, buffer.pos_to_char(r.end())?, i)))
        .collect::<Result<_>>()?;
    spans.sort_unstable();

    // (start, end, members)
    let mut groups: Vec<(usize, usize, Vec<usize>)> = Vec::new();
    for (start, end, idx) in spans {
        match groups.last_mut() {
            Some(group) if start < group.1 || start == group.0 => {
                group.1 = group.1.max(end);
                group.2.push(idx);
            }
            _ => groups.push((start, end, vec![idx])),
        }
    }

    for (start, end, _) in groups.iter().rev() {
        buffer.replace(*start, *end, text)?;
    }

    // Walk forward, shifting each caret by the net growth of earlier edits
    let mut carets = vec![0usize; selections.len()];
    let mut growth: isize = 0;
    for (start, end, members) in &groups {
        let caret = (*start as isize + growth + inserted).max(0) as usize;
        for &idx in members {
            carets[idx] = caret;
        }
        growth += inserted - (end - start) as isize;
    }

    Ok(carets
        .into_iter()
        .map(|c| SelectionRange::caret(buffer.char_to_pos(c)))
        .collect())
}

impl SelectionHost for EditorSurface {
    fn read_snapshot(&self) -> StateSnapshot {
        if self.document.borrow().is_none() {
            return StateSnapshot::empty();
        }
        StateSnapshot::new(self.selections.borrow().clone())
    }

    fn write_snapshot(&self, snapshot: &StateSnapshot) -> Result<()> {
        self.set_selections(snapshot.ranges().to_vec())
            .context("writing selection snapshot")
    }

    fn reveal_range(&self, range: &SelectionRange) {
        tracing::debug!(range = %range, "Revealing range");
        self.last_reveal.set(Some(*range));
    }
}

impl ObservableSurface for EditorSurface {
    fn events(&self) -> &EventHub {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn pos(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    fn record_events(surface: &EditorSurface) -> (Rc<RefCell<Vec<SurfaceEvent>>>, crate::Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let sub = surface.events().subscribe(move |e| s.borrow_mut().push(e));
        (seen, sub)
    }

    #[test]
    fn test_empty_surface_reads_empty_snapshot() {
        let surface = EditorSurface::new();
        assert!(surface.read_snapshot().is_empty());
        assert!(surface.document_id().is_none());
    }

    #[test]
    fn test_open_document_emits_replace_then_selection() {
        let surface = EditorSurface::new();
        let (seen, _sub) = record_events(&surface);
        surface.open_document("a.txt", "hello");
        assert_eq!(
            *seen.borrow(),
            vec![SurfaceEvent::DocumentReplaced, SurfaceEvent::SelectionChanged]
        );
        assert_eq!(
            surface.read_snapshot(),
            StateSnapshot::single(SelectionRange::caret(pos(0, 0)))
        );
    }

    #[test]
    fn test_each_open_gets_a_new_identity() {
        let surface = EditorSurface::new();
        let a = surface.open_document("a.txt", "x");
        let b = surface.open_document("a.txt", "x");
        assert_ne!(a, b);
        assert_eq!(surface.document_id(), Some(b));
    }

    #[test]
    fn test_close_document_clears_selections() {
        let surface = EditorSurface::new();
        surface.open_document("a.txt", "hello");
        let (seen, _sub) = record_events(&surface);
        surface.close_document();
        assert!(surface.read_snapshot().is_empty());
        assert_eq!(*seen.borrow(), vec![SurfaceEvent::DocumentReplaced]);

        // Closing again is a no-op
        surface.close_document();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_set_selections_clamps_to_document() {
        let surface = EditorSurface::new();
        surface.open_document("a.txt", "abc\nde");
        surface
            .set_selections(vec![SelectionRange::new(pos(0, 1), pos(9, 9))])
            .unwrap();
        assert_eq!(
            surface.selections(),
            vec![SelectionRange::new(pos(0, 1), pos(1, 2))]
        );
    }

    #[test]
    fn test_selection_edits_require_document() {
        let surface = EditorSurface::new();
        assert!(surface.move_caret(pos(0, 0)).is_err());
        assert!(surface.insert_text("x").is_err());
        surface.open_document("a.txt", "");
        assert!(surface.set_selections(Vec::new()).is_err());
    }

    #[test]
    fn test_insert_text_at_single_caret() {
        let surface = EditorSurface::new();
        surface.open_document("a.txt", "hello world");
        surface.move_caret(pos(0, 5)).unwrap();

        let (seen, _sub) = record_events(&surface);
        surface.insert_text(",").unwrap();
        assert_eq!(surface.text().unwrap(), "hello, world");
        assert_eq!(surface.selections(), vec![SelectionRange::caret(pos(0, 6))]);
        assert_eq!(
            *seen.borrow(),
            vec![SurfaceEvent::ContentChanged, SurfaceEvent::SelectionChanged]
        );
    }

    #[test]
    fn test_insert_text_replaces_every_selection() {
        let surface = EditorSurface::new();
        surface.open_document("a.txt", "one two\nthree");
        surface
            .set_selections(vec![
                SelectionRange::new(pos(1, 0), pos(1, 5)),
                SelectionRange::new(pos(0, 4), pos(0, 7)),
                SelectionRange::caret(pos(0, 0)),
            ])
            .unwrap();

        surface.insert_text("X\n").unwrap();
        assert_eq!(surface.text().unwrap(), "X\none X\n\nX\n");
        assert_eq!(
            surface.selections(),
            vec![
                SelectionRange::caret(pos(4, 0)),
                SelectionRange::caret(pos(2, 0)),
                SelectionRange::caret(pos(1, 0)),
            ]
        );
    }

    #[test]
    fn test_insert_text_replaces_nested_selection_once() {
        let surface = EditorSurface::new();
        surface.open_document("a.txt", "0123456789");
        surface
            .set_selections(vec![
                SelectionRange::new(pos(0, 0), pos(0, 10)),
                SelectionRange::new(pos(0, 2), pos(0, 4)),
            ])
            .unwrap();

        surface.insert_text("X").unwrap();
        assert_eq!(surface.text().unwrap(), "X");
        assert_eq!(
            surface.selections(),
            vec![SelectionRange::caret(pos(0, 1)), SelectionRange::caret(pos(0, 1))]
        );
    }

    #[test]
    fn test_insert_text_merges_overlapping_and_coincident_selections() {
        let surface = EditorSurface::new();
        surface.open_document("a.txt", "abcdefgh");
        surface
            .set_selections(vec![
                SelectionRange::new(pos(0, 4), pos(0, 1)),
                SelectionRange::new(pos(0, 3), pos(0, 6)),
                SelectionRange::caret(pos(0, 7)),
                SelectionRange::caret(pos(0, 7)),
            ])
            .unwrap();

        surface.insert_text("-").unwrap();
        assert_eq!(surface.text().unwrap(), "a-g-h");
        assert_eq!(
            surface.selections(),
            vec![
                SelectionRange::caret(pos(0, 2)),
                SelectionRange::caret(pos(0, 2)),
                SelectionRange::caret(pos(0, 4)),
                SelectionRange::caret(pos(0, 4)),
            ]
        );
    }

    #[test]
    fn test_write_snapshot_emits_selection_changed() {
        let surface = EditorSurface::new();
        surface.open_document("a.txt", "abc\ndef");
        let (seen, _sub) = record_events(&surface);
        let snap: StateSnapshot = "1:1, 0:2".parse().unwrap();
        surface.write_snapshot(&snap).unwrap();
        assert_eq!(surface.read_snapshot(), snap);
        assert_eq!(*seen.borrow(), vec![SurfaceEvent::SelectionChanged]);
    }

    #[test]
    fn test_reveal_range_is_remembered() {
        let surface = EditorSurface::new();
        surface.open_document("a.txt", "abc");
        let range = SelectionRange::caret(pos(0, 2));
        surface.reveal_range(&range);
        assert_eq!(surface.last_reveal(), Some(range));
    }
}
