//! Tests for the error code registry and code classification
//!
//! Tests touching the process-wide registry use codes no other test uses.

use errchain::{
    is_code, parse_coder, CodeRegistry, Coder, Error, RegistryError, ResultExt, UNKNOWN_CODE,
};
use std::panic;
use std::sync::Arc;
use std::thread;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn coder(code: i32, status: u16, text: &str) -> Coder {
    Coder::new(code, status, text, format!("https://example.com/errors/{code}"))
}

#[test]
fn test_new_registry_holds_only_unknown() {
    let registry = CodeRegistry::new();

    assert_eq!(registry.codes(), vec![UNKNOWN_CODE]);
    assert!(registry.contains(UNKNOWN_CODE));
    assert!(registry.get(42).is_none());

    let unknown = registry.lookup(42);
    assert!(unknown.is_unknown());
    assert_eq!(unknown.code(), UNKNOWN_CODE);
    assert_eq!(unknown.http_status(), 500);
    assert_eq!(unknown.external_text(), "An internal server error occurred");
    assert_eq!(unknown.reference(), "");
}

#[test]
fn test_register_then_lookup() {
    init_logging();
    let registry = CodeRegistry::new();
    registry.register(coder(100_101, 404, "User not found"));

    let found = registry.lookup(100_101);
    assert_eq!(found.code(), 100_101);
    assert_eq!(found.http_status(), 404);
    assert_eq!(found.external_text(), "User not found");
    assert_eq!(found.reference(), "https://example.com/errors/100101");
    assert_eq!(found.to_string(), "User not found");
    assert_eq!(registry.codes(), vec![UNKNOWN_CODE, 100_101]);
}

#[test]
fn test_register_overwrites_existing_code() {
    init_logging();
    let registry = CodeRegistry::new();
    registry.register(coder(100_102, 400, "Bad input"));
    registry.register(coder(100_102, 422, "Unprocessable input"));

    let found = registry.lookup(100_102);
    assert_eq!(found.http_status(), 422);
    assert_eq!(found.external_text(), "Unprocessable input");

    let previous = registry
        .try_register(coder(100_102, 409, "Conflict"))
        .expect("overwriting should succeed");
    assert_eq!(
        previous.map(|c| c.external_text().to_string()),
        Some("Unprocessable input".to_string())
    );
}

#[test]
fn test_zero_status_falls_back_to_500() {
    let registry = CodeRegistry::new();
    registry.register(Coder::new(100_103, 0, "Unclassified", ""));

    assert_eq!(registry.lookup(100_103).http_status(), 500);
}

#[test]
#[should_panic(expected = "reserved")]
fn test_register_code_zero_panics() {
    CodeRegistry::new().register(coder(UNKNOWN_CODE, 500, "nope"));
}

#[test]
#[should_panic(expected = "already registered")]
fn test_must_register_duplicate_panics() {
    let registry = CodeRegistry::new();
    registry.must_register(coder(100_104, 400, "first"));
    registry.must_register(coder(100_104, 400, "second"));
}

#[test]
fn test_must_register_code_zero_panics() {
    let result = panic::catch_unwind(|| {
        CodeRegistry::new().must_register(coder(UNKNOWN_CODE, 500, "nope"));
    });
    assert!(result.is_err());
}

#[test]
fn test_try_forms_report_misuse() {
    let registry = CodeRegistry::new();

    assert_eq!(
        registry.try_register(coder(UNKNOWN_CODE, 500, "nope")),
        Err(RegistryError::ReservedCode)
    );
    assert_eq!(registry.try_must_register(coder(100_105, 400, "first")), Ok(()));
    assert_eq!(
        registry.try_must_register(coder(100_105, 400, "second")),
        Err(RegistryError::DuplicateCode { code: 100_105 })
    );
    assert_eq!(registry.lookup(100_105).external_text(), "first");
    assert_eq!(
        RegistryError::DuplicateCode { code: 100_105 }.to_string(),
        "code 100105 is already registered"
    );
}

#[test]
fn test_failed_registration_leaves_registry_usable() {
    let registry = Arc::new(CodeRegistry::new());
    registry.register(coder(100_106, 401, "Unauthorized"));

    let shared = Arc::clone(&registry);
    let result = thread::spawn(move || shared.must_register(coder(100_106, 401, "again"))).join();
    assert!(result.is_err());

    registry.register(coder(100_107, 403, "Forbidden"));
    assert_eq!(registry.lookup(100_106).external_text(), "Unauthorized");
    assert_eq!(registry.lookup(100_107).external_text(), "Forbidden");
}

#[test]
fn test_concurrent_registration_and_lookup() {
    let registry = Arc::new(CodeRegistry::new());

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..50 {
                    let code = 200_000 + t * 100 + i;
                    registry.register(coder(code, 400, "concurrent"));
                }
            })
        })
        .collect();

    let reader = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for _ in 0..500 {
                let found = registry.lookup(200_000);
                assert!(found.is_unknown() || found.external_text() == "concurrent");
            }
        })
    };

    for writer in writers {
        writer.join().expect("writer thread");
    }
    reader.join().expect("reader thread");

    assert_eq!(registry.codes().len(), 1 + 4 * 50);
}

#[test]
fn test_global_registry_resolves_coded_errors() {
    init_logging();
    errchain::register(coder(130_001, 404, "Order not found"));

    let err = Error::with_code(130_001, "no row for order 12");
    assert_eq!(err.to_string(), "Order not found");

    let found = parse_coder(&err).expect("an error resolves to a coder");
    assert_eq!(found.code(), 130_001);
    assert_eq!(found.http_status(), 404);
    assert_eq!(errchain::lookup(130_001).external_text(), "Order not found");
    assert!(errchain::registry().contains(130_001));
}

#[test]
fn test_global_must_register_rejects_duplicates() {
    errchain::must_register(coder(130_002, 409, "Order already paid"));

    assert_eq!(
        errchain::try_must_register(coder(130_002, 409, "again")),
        Err(RegistryError::DuplicateCode { code: 130_002 })
    );
    assert!(errchain::try_register(coder(130_002, 409, "Order paid")).is_ok());
    assert_eq!(errchain::lookup(130_002).external_text(), "Order paid");
}

#[test]
fn test_parse_coder_branches() {
    let registry = CodeRegistry::new();
    registry.register(coder(130_003, 402, "Payment required"));

    assert!(registry.parse_coder(None::<&Error>).is_none());

    let plain = Error::new("plain failure");
    let unknown = registry.parse_coder(&plain).expect("plain errors resolve");
    assert!(unknown.is_unknown());

    let coded = Error::with_code(130_003, "card expired").wrap("checking out");
    let found = registry.parse_coder(&coded).expect("coded errors resolve");
    assert_eq!(found.code(), 130_003);
    assert_eq!(found.http_status(), 402);

    let unregistered = Error::with_code(130_999, "never registered");
    assert!(registry
        .parse_coder(&unregistered)
        .expect("coded errors resolve")
        .is_unknown());
}

#[test]
fn test_parse_coder_uses_outermost_code() {
    let registry = CodeRegistry::new();
    registry.register(coder(130_004, 404, "inner"));
    registry.register(coder(130_005, 400, "outer"));

    let err = Error::with_code(130_004, "missing")
        .with_message("context")
        .wrap_c(130_005, "rejected");

    let found = registry.parse_coder(&err).expect("coded errors resolve");
    assert_eq!(found.code(), 130_005);

    let below = Error::with_code(130_004, "missing").wrap("loading");
    let found = registry.parse_coder(&below).expect("coded errors resolve");
    assert_eq!(found.code(), 130_004);
}

#[test]
fn test_is_code_follows_coded_links() {
    let err = Error::with_code(100, "inner").wrap_c(200, "outer");

    assert!(is_code(&err, 100));
    assert!(is_code(&err, 200));
    assert!(!is_code(&err, 999));
    assert!(err.is_code(100));
    assert!(!is_code(None::<&Error>, 100));

    let nested = errchain::wrap_c(errchain::wrap_c(Some(Error::new("base")), 100, "a"), 200, "b")
        .expect("error is present");
    assert!(is_code(&nested, 200));
    assert!(is_code(&nested, 100));
    assert!(!is_code(&nested, 999));
}

#[test]
fn test_is_code_stops_at_uncoded_link() {
    let err = Error::with_code(100, "inner")
        .with_message("context")
        .wrap_c(200, "outer");

    assert!(is_code(&err, 200));
    assert!(!is_code(&err, 100));

    let uncoded: Result<(), Error> = Err(Error::new("plain"));
    let err = uncoded.wrap_c(300, "coded").unwrap_err();
    assert!(is_code(&err, 300));
}
