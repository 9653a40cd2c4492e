//! Prints the frames captured at several nesting depths

use errchain::{func_name_short, Error, StackCapture};

#[inline(never)]
fn leaf() -> StackCapture {
    StackCapture::capture(0)
}

#[inline(never)]
fn middle() -> StackCapture {
    std::hint::black_box(leaf())
}

#[inline(never)]
fn outer() -> StackCapture {
    std::hint::black_box(middle())
}

fn print_stack(label: &str, stack: &StackCapture) {
    println!("== {label} ({} frames)", stack.len());
    for frame in stack.iter().take(4) {
        println!(
            "  {:<12} {} ({}:{})",
            func_name_short(frame.function()),
            frame.function(),
            frame.file(),
            frame.line()
        );
    }
}

fn main() {
    env_logger::init();

    let config = errchain::config::capture_config();
    log::info!(
        "Stack capture enabled: {}, depth: {}",
        config.enabled,
        config.depth
    );

    print_stack("leaf", &leaf());
    print_stack("middle", &middle());
    print_stack("outer", &outer());

    let first: Vec<StackCapture> = (0..2).map(|_| leaf()).collect();
    let same_site = match (first[0].first(), first[1].first()) {
        (Some(a), Some(b)) => a.resolve() == b.resolve(),
        _ => false,
    };
    println!("Same call site resolves identically: {same_site}");

    let err = Error::new("boom").wrap("while demonstrating");
    println!("Error created at: {err:-}");
    println!("{err:#?}");
}
