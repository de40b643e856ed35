//! Source file identifiers and byte-range spans.
//!
//! Tokens, AST nodes, and diagnostics all carry a `Span`. Positions are
//! byte offsets into the file content; line and column numbers are derived
//! by whoever holds the source text (the driver, at render time).

/// Identifier for a source file.
///
/// The compiler core never opens files; the driver assigns ids and keeps
/// the id-to-path mapping on its side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub u32);

/// A half-open byte range `[start, end)` within one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub file_id: FileId,
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(file_id: FileId, start: u32, end: u32) -> Span {
        Span { file_id, start, end }
    }

    /// An empty span at the given position.
    pub fn empty(file_id: FileId, pos: u32) -> Span {
        Span {
            file_id,
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest span covering both `self` and `other`, or `None` when
    /// they belong to different files.
    pub fn join(self, other: Span) -> Option<Span> {
        if self.file_id != other.file_id {
            return None;
        }
        Some(Span::new(
            self.file_id,
            self.start.min(other.start),
            self.end.max(other.end),
        ))
    }

    /// Placeholder for positions that have no useful source location.
    pub fn dummy() -> Span {
        Span {
            file_id: FileId(0),
            start: 0,
            end: 0,
        }
    }
}
