//! Chain rendering

use super::info::FormatInfo;
use crate::code::{registry, CodeRegistry};
use crate::error::Error;
use log::warn;
use serde::Serialize;
use std::fmt;

const SEPARATOR: &str = "; ";

/// Rendering switches
///
/// `detail` adds location and code to each rendered link, `trace` renders
/// every link of the chain instead of only the outermost one, and `machine`
/// emits JSON records instead of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    /// Show location and code per link
    pub detail: bool,
    /// Render every link
    pub trace: bool,
    /// Emit JSON records
    pub machine: bool,
}

impl Flags {
    /// Outermost external message only
    pub const PLAIN: Flags = Flags {
        detail: false,
        trace: false,
        machine: false,
    };

    /// Outermost link with location and code
    pub const DETAIL: Flags = Flags {
        detail: true,
        trace: false,
        machine: false,
    };

    /// Every link with location and code
    pub const TRACE: Flags = Flags {
        detail: false,
        trace: true,
        machine: false,
    };

    /// Outermost external message as a JSON record
    pub const MACHINE: Flags = Flags {
        detail: false,
        trace: false,
        machine: true,
    };

    /// Read the flags of a format spec: `-` detail, `+` trace, `#` machine
    #[must_use]
    pub fn from_formatter(f: &fmt::Formatter<'_>) -> Self {
        Self {
            detail: f.sign_minus(),
            trace: f.sign_plus(),
            machine: f.alternate(),
        }
    }

    /// Turn on detail
    #[must_use]
    pub fn with_detail(mut self) -> Self {
        self.detail = true;
        self
    }

    /// Turn on trace
    #[must_use]
    pub fn with_trace(mut self) -> Self {
        self.trace = true;
        self
    }

    /// Turn on machine output
    #[must_use]
    pub fn with_machine(mut self) -> Self {
        self.machine = true;
        self
    }

    /// Whether no flag is set
    #[must_use]
    pub fn is_plain(&self) -> bool {
        !(self.detail || self.trace || self.machine)
    }

    fn annotated(self) -> bool {
        self.detail || self.trace
    }
}

/// One rendered link in machine output
///
/// Without detail or trace only `error` is set, holding the external message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// `#k`, followed by `file:line (function)` when the link has a stack
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    /// Resolved code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    /// Internal message, or the external one in the reduced form
    pub error: String,
    /// External message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Renders chains under a set of [`Flags`]
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'r> {
    flags: Flags,
    registry: &'r CodeRegistry,
}

impl Renderer<'static> {
    /// Render against the process-wide registry
    #[must_use]
    pub fn new(flags: Flags) -> Self {
        Self {
            flags,
            registry: registry(),
        }
    }
}

impl<'r> Renderer<'r> {
    /// Render against an explicit registry
    #[must_use]
    pub fn with_registry(flags: Flags, registry: &'r CodeRegistry) -> Self {
        Self { flags, registry }
    }

    /// The active flags
    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Selected links with their index, numbered from the innermost `#0`
    fn links<'e>(&self, err: &'e Error) -> Vec<(usize, &'e Error)> {
        let chain: Vec<&Error> = err.chain().collect();
        let len = chain.len();
        let take = if self.flags.trace { len } else { 1 };
        chain
            .into_iter()
            .enumerate()
            .take(take)
            .map(|(i, link)| (len - i - 1, link))
            .collect()
    }

    /// Render as text, ignoring the machine flag
    #[must_use]
    pub fn text(&self, err: &Error) -> String {
        if !self.flags.annotated() {
            return FormatInfo::build(err, self.registry).message;
        }

        let mut out = String::new();
        for (k, link) in self.links(err) {
            let info = FormatInfo::build(link, self.registry);
            if !out.is_empty() {
                out.push_str(SEPARATOR);
            }
            match info.stack.and_then(|stack| stack.first()) {
                Some(frame) => out.push_str(&format!(
                    "{} - #{k} [{}:{} ({})] ({}) {}",
                    info.error,
                    frame.file(),
                    frame.line(),
                    frame.function(),
                    info.code,
                    info.message
                )),
                None => out.push_str(&format!("{} - #{k} {}", info.error, info.message)),
            }
        }
        out.trim_matches(|c| matches!(c, '\r' | '\n' | '\t'))
            .to_string()
    }

    /// Render as records, ignoring the machine flag
    #[must_use]
    pub fn records(&self, err: &Error) -> Vec<Record> {
        self.links(err)
            .into_iter()
            .map(|(k, link)| {
                let info = FormatInfo::build(link, self.registry);
                if !self.flags.annotated() {
                    return Record {
                        caller: None,
                        code: None,
                        error: info.message,
                        message: None,
                    };
                }

                let caller = match info.stack.and_then(|stack| stack.first()) {
                    Some(frame) => format!(
                        "#{k} {}:{} ({})",
                        frame.file(),
                        frame.line(),
                        frame.function()
                    ),
                    None => format!("#{k}"),
                };
                Record {
                    caller: Some(caller),
                    code: Some(info.code),
                    error: info.error,
                    message: Some(info.message),
                }
            })
            .collect()
    }

    /// Render the records as a JSON array
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which records of plain strings and
    /// integers do not produce in practice.
    pub fn json(&self, err: &Error) -> serde_json::Result<String> {
        serde_json::to_string(&self.records(err))
    }

    /// Render as JSON when the machine flag is set, as text otherwise
    ///
    /// A serializer failure is logged and renders as an empty string.
    #[must_use]
    pub fn render(&self, err: &Error) -> String {
        if self.flags.machine {
            json_or_empty(self.json(err))
        } else {
            self.text(err)
        }
    }
}

fn json_or_empty(rendered: serde_json::Result<String>) -> String {
    match rendered {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize error records: {e}");
            String::new()
        }
    }
}

impl Error {
    /// Render this error under `flags`, see [`Renderer`]
    #[must_use]
    pub fn render(&self, flags: Flags) -> String {
        Renderer::new(flags).render(self)
    }

    /// Render this error as records under `flags`, see [`Renderer::records`]
    #[must_use]
    pub fn records(&self, flags: Flags) -> Vec<Record> {
        Renderer::new(flags).records(self)
    }
}
