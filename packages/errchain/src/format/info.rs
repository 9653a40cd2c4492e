//! Per-link rendering data

use crate::code::{Coder, CodeRegistry, UNKNOWN_CODE};
use crate::error::types::{Error, Link, Repr};
use crate::stack::StackCapture;

/// What the renderer needs to know about one link
#[derive(Debug)]
pub(crate) struct FormatInfo<'a> {
    /// Resolved code, the unknown code for uncoded links
    pub code: i32,
    /// Externally safe message
    pub message: String,
    /// Internal message
    pub error: String,
    /// Stack of the link, if it recorded a non-empty one
    pub stack: Option<&'a StackCapture>,
}

impl<'a> FormatInfo<'a> {
    pub(crate) fn build(err: &'a Error, registry: &CodeRegistry) -> Self {
        match &*err.inner {
            Repr::Link(Link::Fundamental { message, stack }) => Self {
                code: UNKNOWN_CODE,
                message: message.clone(),
                error: message.clone(),
                stack: non_empty(stack),
            },
            Repr::Link(Link::WithStack { stack, .. }) => {
                let text = plain_text(&err.inner, registry);
                Self {
                    code: UNKNOWN_CODE,
                    message: text.clone(),
                    error: text,
                    stack: non_empty(stack),
                }
            }
            Repr::Link(Link::WithCode {
                text, code, stack, ..
            }) => {
                let coder = registry.lookup(*code);
                Self {
                    code: coder.code(),
                    message: external_message(&coder, text),
                    error: text.clone(),
                    stack: non_empty(stack),
                }
            }
            Repr::Link(Link::WithMessage { .. }) | Repr::Foreign(_) | Repr::Aggregate(_) => {
                let text = plain_text(&err.inner, registry);
                Self {
                    code: UNKNOWN_CODE,
                    message: text.clone(),
                    error: text,
                    stack: None,
                }
            }
        }
    }
}

fn non_empty(stack: &StackCapture) -> Option<&StackCapture> {
    Some(stack).filter(|stack| !stack.is_empty())
}

/// The coder's text, or the link's own text when the coder has none
pub(crate) fn external_message(coder: &Coder, raw: &str) -> String {
    if coder.external_text().is_empty() {
        raw.to_string()
    } else {
        coder.external_text().to_string()
    }
}

/// Plain text of a representation, resolving codes against `registry`
pub(crate) fn plain_text(repr: &Repr, registry: &CodeRegistry) -> String {
    let mut current = repr;
    loop {
        match current {
            Repr::Link(Link::WithStack { cause, .. }) => current = &*cause.inner,
            Repr::Link(Link::Fundamental { message, .. } | Link::WithMessage { message, .. }) => {
                return message.clone()
            }
            Repr::Link(Link::WithCode { text, code, .. }) => {
                return external_message(&registry.lookup(*code), text)
            }
            Repr::Foreign(error) => return error.to_string(),
            Repr::Aggregate(aggregate) => return aggregate.to_string(),
        }
    }
}
