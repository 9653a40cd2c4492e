//! Runtime configuration for stack capture
//!
//! Capture can be tuned without recompiling through two environment variables,
//! read once on first use:
//! - `ERRCHAIN_STACK=0|false|off|no` disables capture entirely
//! - `ERRCHAIN_STACK_DEPTH=<n>` bounds the number of frames per capture
//!
//! Compiling without the `stack-capture` feature disables capture regardless
//! of the environment.

use log::warn;
use once_cell::sync::Lazy;

/// Frames kept per capture unless overridden
pub const DEFAULT_STACK_DEPTH: usize = 32;

/// Upper bound accepted from `ERRCHAIN_STACK_DEPTH`
pub const MAX_STACK_DEPTH: usize = 128;

const ENV_STACK: &str = "ERRCHAIN_STACK";
const ENV_STACK_DEPTH: &str = "ERRCHAIN_STACK_DEPTH";

static CONFIG: Lazy<CaptureConfig> = Lazy::new(CaptureConfig::from_env);

/// Stack capture settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Whether constructors capture a stack at all
    pub enabled: bool,
    /// Maximum number of frames kept per capture
    pub depth: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "stack-capture"),
            depth: DEFAULT_STACK_DEPTH,
        }
    }
}

impl CaptureConfig {
    /// Build the configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    ///
    /// Values that fail to parse are ignored and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_STACK) {
            match parse_switch(&value) {
                Some(enabled) => config.enabled = config.enabled && enabled,
                None => warn!("Ignoring invalid {ENV_STACK}={value}"),
            }
        }

        if let Some(value) = lookup(ENV_STACK_DEPTH) {
            match value.trim().parse::<usize>() {
                Ok(depth) => config.depth = depth.clamp(1, MAX_STACK_DEPTH),
                Err(_) => warn!("Ignoring invalid {ENV_STACK_DEPTH}={value}"),
            }
        }

        config
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// The configuration used by every capture in this process
#[must_use]
pub fn capture_config() -> CaptureConfig {
    *CONFIG
}
