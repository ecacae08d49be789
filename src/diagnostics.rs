//! Container-path tracking and hex-dump rendering for decode/encode errors.
//!
//! The path is carried on an explicit stack, pushed on entering a list/map element and
//! popped on leaving it, rather than reconstructed from the host call stack (spec §9).

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// One segment of a container path: either a list index or a map key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathElem {
    /// Index into a list.
    Index(usize),
    /// Key into a map.
    Key(Box<str>),
}

/// The container stack leading to the value or byte offset an error refers to.
///
/// Renders as `root/list[3]/map["foo"]`, matching spec §4.3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path(Vec<PathElem>);

impl Path {
    /// An empty path, i.e. the top-level value itself.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Push a list-index segment.
    pub fn push_index(&mut self, index: usize) {
        self.0.push(PathElem::Index(index));
    }

    /// Push a map-key segment.
    pub fn push_key(&mut self, key: &str) {
        self.0.push(PathElem::Key(key.into()));
    }

    /// Pop the most recently pushed segment.
    pub fn pop(&mut self) {
        self.0.pop();
    }

    /// Borrow the path segments in root-to-leaf order.
    #[must_use]
    pub fn segments(&self) -> &[PathElem] {
        &self.0
    }

    /// Return a copy of this path with one more segment appended.
    #[must_use]
    pub fn joined_index(&self, index: usize) -> Self {
        let mut out = self.clone();
        out.push_index(index);
        out
    }

    /// Return a copy of this path with one more key segment appended.
    #[must_use]
    pub fn joined_key(&self, key: &str) -> Self {
        let mut out = self.clone();
        out.push_key(key);
        out
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root")?;
        for seg in &self.0 {
            match seg {
                PathElem::Index(i) => write!(f, "/list[{i}]")?,
                PathElem::Key(k) => write!(f, "/map[{k:?}]")?,
            }
        }
        Ok(())
    }
}

/// Render a fixed-width hex dump of `data` centered on `offset`, with a caret line under
/// the offending byte. Returns `None` if `data` is empty.
#[must_use]
pub fn hex_snippet(data: &[u8], offset: usize, width: usize) -> Option<String> {
    if data.is_empty() {
        return None;
    }
    let width = width.max(1);
    let center = offset.min(data.len() - 1);
    let start = center.saturating_sub(width / 2);
    let end = (start + width).min(data.len());
    let start = end.saturating_sub(width).min(start);

    let mut out = String::new();
    for (i, byte) in data[start..end].iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write_hex_byte(&mut out, *byte);
    }
    out.push('\n');
    for i in start..end {
        if i > start {
            out.push(' ');
        }
        out.push_str(if i == center { "^^" } else { "  " });
    }
    Some(out)
}

fn write_hex_byte(out: &mut String, byte: u8) -> fmt::Result {
    use fmt::Write;
    write!(out, "{byte:02x}")
}
