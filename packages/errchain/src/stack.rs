//! Call-stack capture with lazy symbol resolution
//!
//! A [`StackCapture`] records raw instruction addresses only. Turning an
//! address into a file, line and function name is comparatively expensive, so
//! it happens on first access and the result is cached in the [`Frame`].

use crate::config::capture_config;
use once_cell::sync::OnceCell;
use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder reported for any location that cannot be resolved
pub const UNKNOWN: &str = "unknown";

/// Resolved source location of a frame
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameInfo {
    /// Source file path, or [`UNKNOWN`]
    pub file: String,
    /// Source line, or `0` when unknown
    pub line: u32,
    /// Fully qualified function name, or [`UNKNOWN`]
    pub function: String,
}

impl FrameInfo {
    fn unknown() -> Self {
        Self {
            file: UNKNOWN.to_string(),
            line: 0,
            function: UNKNOWN.to_string(),
        }
    }

    /// Whether the function name could not be resolved
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.function == UNKNOWN
    }
}

/// One captured call-stack location
#[derive(Clone)]
pub struct Frame {
    ip: usize,
    info: OnceCell<FrameInfo>,
}

impl Frame {
    /// Wrap a raw instruction address
    #[must_use]
    pub fn from_ip(ip: usize) -> Self {
        Self {
            ip,
            info: OnceCell::new(),
        }
    }

    /// The raw instruction address
    #[must_use]
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Resolve this frame, caching the result
    pub fn resolve(&self) -> &FrameInfo {
        self.info.get_or_init(|| resolve_ip(self.ip))
    }

    /// Source file of this frame
    pub fn file(&self) -> &str {
        &self.resolve().file
    }

    /// Source line of this frame
    pub fn line(&self) -> u32 {
        self.resolve().line
    }

    /// Fully qualified function name of this frame
    pub fn function(&self) -> &str {
        &self.resolve().function
    }

    /// Bare function name, see [`func_name_short`]
    pub fn short_function(&self) -> &str {
        func_name_short(self.function())
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("ip", &format_args!("{:#x}", self.ip))
            .field("info", &self.info.get())
            .finish()
    }
}

impl fmt::Display for Frame {
    /// `file:line`, or `function\n\tfile:line` in alternate mode
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.resolve();
        if f.alternate() {
            write!(f, "{}\n\t{}:{}", info.function, info.file, info.line)
        } else {
            write!(f, "{}:{}", info.file, info.line)
        }
    }
}

impl Serialize for Frame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let info = self.resolve();
        if info.is_unknown() {
            serializer.serialize_str(UNKNOWN)
        } else {
            serializer.collect_str(&format_args!(
                "{} {}:{}",
                info.function, info.file, info.line
            ))
        }
    }
}

#[cfg(feature = "stack-capture")]
fn resolve_ip(ip: usize) -> FrameInfo {
    if ip == 0 {
        return FrameInfo::unknown();
    }

    let mut resolved: Option<FrameInfo> = None;
    backtrace::resolve(ip as *mut std::ffi::c_void, |symbol| {
        // Inlined frames come first; keep the innermost one.
        if resolved.is_some() {
            return;
        }
        resolved = Some(FrameInfo {
            file: symbol
                .filename()
                .map_or_else(|| UNKNOWN.to_string(), |path| path.display().to_string()),
            line: symbol.lineno().unwrap_or(0),
            function: symbol
                .name()
                .map_or_else(|| UNKNOWN.to_string(), |name| format!("{name:#}")),
        });
    });

    resolved.unwrap_or_else(FrameInfo::unknown)
}

#[cfg(not(feature = "stack-capture"))]
fn resolve_ip(_ip: usize) -> FrameInfo {
    FrameInfo::unknown()
}

/// A bounded sequence of frames, innermost call first
#[derive(Debug, Clone, Default)]
pub struct StackCapture {
    frames: Vec<Frame>,
}

impl StackCapture {
    /// Capture the current call stack
    ///
    /// The first frame is the caller of `capture` when `skip` is `0`; each
    /// increment of `skip` drops one more level. At most the configured depth
    /// is kept, and a shallower stack simply yields fewer frames.
    #[inline(never)]
    #[must_use]
    pub fn capture(skip: usize) -> Self {
        let config = capture_config();
        if !config.enabled {
            return Self::default();
        }

        let marker: fn(usize) -> StackCapture = Self::capture;
        Self {
            frames: walk(marker as usize, skip, config.depth),
        }
    }

    /// Build a capture from already known frames
    #[must_use]
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// All frames, innermost first
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The innermost frame, if any was captured
    #[must_use]
    pub fn first(&self) -> Option<&Frame> {
        self.frames.first()
    }

    /// Number of captured frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frame was captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Iterate over the frames, innermost first
    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }
}

impl<'a> IntoIterator for &'a StackCapture {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl fmt::Display for StackCapture {
    /// `[frame frame ...]`, or one alternate frame per line in alternate mode
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            for frame in &self.frames {
                write!(f, "\n{frame:#}")?;
            }
            return Ok(());
        }

        f.write_str("[")?;
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{frame}")?;
        }
        f.write_str("]")
    }
}

impl Serialize for StackCapture {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.frames.iter())
    }
}

/// Upper bound on the unwinder's own frames above `StackCapture::capture`
#[cfg(feature = "stack-capture")]
const UNWINDER_FRAMES: usize = 8;

/// Walk the stack, skipping the unwinder's own frames
///
/// Everything up to and including the frame of [`StackCapture::capture`] is
/// dropped. That frame is found by its enclosing symbol address, or by name
/// on platforms that do not report symbol addresses. Should it not be found
/// at all, the innermost frames are kept as they are.
#[cfg(feature = "stack-capture")]
fn walk(marker: usize, skip: usize, depth: usize) -> Vec<Frame> {
    let mut frames = Vec::with_capacity(depth);
    let mut unmarked = Vec::new();
    let unmarked_limit = depth + skip + UNWINDER_FRAMES;
    let mut remaining: Option<usize> = None;

    backtrace::trace(|frame| {
        let ip = frame.ip() as usize;
        match remaining {
            None if frame.symbol_address() as usize == marker => remaining = Some(skip),
            None => unmarked.push(Frame::from_ip(ip)),
            Some(0) => frames.push(Frame::from_ip(ip)),
            Some(ref mut n) => *n -= 1,
        }
        frames.len() < depth && (remaining.is_some() || unmarked.len() < unmarked_limit)
    });

    if remaining.is_some() {
        return frames;
    }

    let capture_at = unmarked
        .iter()
        .take(UNWINDER_FRAMES + 1)
        .position(|frame| frame.function().ends_with("StackCapture::capture"));
    match capture_at {
        Some(at) => unmarked.into_iter().skip(at + 1 + skip).take(depth).collect(),
        None => {
            unmarked.truncate(depth);
            unmarked
        }
    }
}

#[cfg(not(feature = "stack-capture"))]
fn walk(_marker: usize, _skip: usize, _depth: usize) -> Vec<Frame> {
    Vec::new()
}

/// Strip module path, receiver type and symbol hash from a function name
///
/// `my_crate::store::Store::get::h0123456789abcdef` becomes `get`, and
/// `<my_crate::Error as core::fmt::Display>::fmt` becomes `fmt`. Closure
/// segments stay attached to their enclosing function, so
/// `my_crate::run::{{closure}}` becomes `run::{{closure}}`.
#[must_use]
pub fn func_name_short(name: &str) -> &str {
    let name = strip_symbol_hash(name);
    let bytes = name.as_bytes();

    let mut segments = vec![0usize];
    let mut depth = 0i32;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' => depth -= 1,
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(i + 2);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    let start = segments
        .iter()
        .rev()
        .copied()
        .find(|&start| !name[start..].starts_with("{{"))
        .unwrap_or(0);
    &name[start..]
}

fn strip_symbol_hash(name: &str) -> &str {
    match name.rsplit_once("::") {
        Some((head, hash))
            if hash.len() == 17
                && hash.starts_with('h')
                && hash[1..].bytes().all(|b| b.is_ascii_hexdigit()) =>
        {
            head
        }
        _ => name,
    }
}
