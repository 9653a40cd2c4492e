//! Tests for stack capture, frame resolution and function name shortening

use errchain::config::{capture_config, CaptureConfig, DEFAULT_STACK_DEPTH, MAX_STACK_DEPTH};
use errchain::{func_name_short, Error, Frame, StackCapture};
use std::collections::HashMap;
use std::hint::black_box;

#[inline(never)]
fn capture_here() -> StackCapture {
    StackCapture::capture(0)
}

#[inline(never)]
fn nested_capture() -> StackCapture {
    black_box(capture_here())
}

#[inline(never)]
fn capture_skipping_self() -> StackCapture {
    StackCapture::capture(1)
}

#[inline(never)]
fn caller_of_skipping() -> StackCapture {
    black_box(capture_skipping_self())
}

#[inline(never)]
fn recurse(n: usize) -> StackCapture {
    if n == 0 {
        capture_here()
    } else {
        black_box(recurse(black_box(n - 1)))
    }
}

#[test]
fn test_capture_starts_at_caller() {
    let stack = capture_here();
    let first = stack.first().expect("capture should record at least one frame");

    assert_eq!(first.short_function(), "capture_here");
    assert!(first.line() > 0);
    assert!(first.file().ends_with("stack_capture_test.rs"));
}

#[test]
fn test_capture_orders_innermost_first() {
    let stack = nested_capture();
    let names: Vec<&str> = stack.iter().take(2).map(Frame::short_function).collect();

    assert_eq!(names, ["capture_here", "nested_capture"]);
}

#[test]
fn test_capture_skip_drops_levels() {
    let stack = caller_of_skipping();
    let first = stack.first().expect("capture should record at least one frame");

    assert_eq!(first.short_function(), "caller_of_skipping");
    assert!(stack.iter().all(|frame| frame.short_function() != "capture_skipping_self"));
}

#[test]
fn test_capture_is_bounded_by_depth() {
    let stack = recurse(3 * MAX_STACK_DEPTH);

    assert_eq!(stack.len(), capture_config().depth);
    assert!(stack.iter().any(|frame| frame.short_function() == "recurse"));
}

#[test]
fn test_same_call_site_resolves_identically() {
    let captures: Vec<StackCapture> = (0..2).map(|_| capture_here()).collect();
    let first = captures[0].first().expect("first capture").resolve();
    let second = captures[1].first().expect("second capture").resolve();

    assert_eq!(first, second);
}

#[test]
fn test_resolution_is_cached() {
    let stack = capture_here();
    let frame = stack.first().expect("capture should record at least one frame");

    let once: *const _ = frame.resolve();
    let twice: *const _ = frame.resolve();
    assert_eq!(once, twice);
}

#[test]
fn test_unresolvable_frame_is_unknown() {
    let frame = Frame::from_ip(0);

    assert!(frame.resolve().is_unknown());
    assert_eq!(frame.file(), "unknown");
    assert_eq!(frame.line(), 0);
    assert_eq!(frame.function(), "unknown");
    assert_eq!(frame.to_string(), "unknown:0");
    assert_eq!(format!("{frame:#}"), "unknown\n\tunknown:0");
    assert_eq!(
        serde_json::to_string(&frame).expect("frame should serialize"),
        "\"unknown\""
    );
}

#[test]
fn test_stack_display_forms() {
    let empty = StackCapture::default();
    assert!(empty.is_empty());
    assert_eq!(empty.to_string(), "[]");
    assert_eq!(format!("{empty:#}"), "");

    let stack = StackCapture::from_frames(vec![Frame::from_ip(0), Frame::from_ip(0)]);
    assert_eq!(stack.len(), 2);
    assert_eq!(stack.to_string(), "[unknown:0 unknown:0]");
    assert_eq!(
        format!("{stack:#}"),
        "\nunknown\n\tunknown:0\nunknown\n\tunknown:0"
    );
    assert_eq!(
        serde_json::to_string(&stack).expect("stack should serialize"),
        "[\"unknown\",\"unknown\"]"
    );
}

#[test]
fn test_error_records_creation_site() {
    let err = Error::new("boom");
    let stack = err.stack().expect("fundamental errors carry a stack");
    let first = stack.first().expect("stack should not be empty");

    assert_eq!(first.short_function(), "test_error_records_creation_site");
}

#[test]
fn test_func_name_short() {
    let cases = [
        ("errchain::stack::StackCapture::capture", "capture"),
        ("my_app::store::get::h0123456789abcdef", "get"),
        ("<errchain::error::types::Error as core::fmt::Display>::fmt", "fmt"),
        (
            "<alloc::vec::Vec<T> as core::iter::traits::collect::Extend<&T>>::extend",
            "extend",
        ),
        ("my_app::handlers::run::{{closure}}", "run::{{closure}}"),
        ("core::ops::function::FnOnce::call_once", "call_once"),
        ("<fn() -> u8 as my_app::Task>::call", "call"),
        ("main", "main"),
        ("", ""),
    ];

    for (full, short) in cases {
        assert_eq!(func_name_short(full), short, "shortening {full:?}");
    }
}

#[test]
fn test_capture_config_from_lookup() {
    fn config_from(vars: &[(&str, &str)]) -> CaptureConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CaptureConfig::from_lookup(|key| vars.get(key).cloned())
    }

    let default = CaptureConfig::default();
    assert_eq!(default.depth, DEFAULT_STACK_DEPTH);
    assert_eq!(config_from(&[]), default);

    assert_eq!(config_from(&[("ERRCHAIN_STACK_DEPTH", "8")]).depth, 8);
    assert_eq!(config_from(&[("ERRCHAIN_STACK_DEPTH", "0")]).depth, 1);
    assert_eq!(
        config_from(&[("ERRCHAIN_STACK_DEPTH", "100000")]).depth,
        MAX_STACK_DEPTH
    );
    assert_eq!(
        config_from(&[("ERRCHAIN_STACK_DEPTH", "deep")]).depth,
        DEFAULT_STACK_DEPTH
    );

    for off in ["0", "false", "OFF", " no "] {
        assert!(!config_from(&[("ERRCHAIN_STACK", off)]).enabled, "switch {off:?}");
    }
    assert_eq!(
        config_from(&[("ERRCHAIN_STACK", "on")]).enabled,
        default.enabled
    );
    assert_eq!(
        config_from(&[("ERRCHAIN_STACK", "maybe")]).enabled,
        default.enabled
    );
}
