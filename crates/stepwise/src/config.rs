//! Process-wide runtime configuration.
//!
//! `fail_on_skipped` turns a skipped scenario into a failed test unless the
//! feature or scenario carries the `allow_skipped` tag. The flag is read from
//! `STEPWISE_FAIL_ON_SKIPPED` and can be overridden in-process.

use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable consulted by [`fail_on_skipped`].
pub const FAIL_ON_SKIPPED_ENV: &str = "STEPWISE_FAIL_ON_SKIPPED";

/// Tag exempting a feature or scenario from [`fail_on_skipped`].
pub const ALLOW_SKIPPED_TAG: &str = "allow_skipped";

const OVERRIDE_UNSET: u8 = 0;
const OVERRIDE_FALSE: u8 = 1;
const OVERRIDE_TRUE: u8 = 2;

static FAIL_ON_SKIPPED_OVERRIDE: AtomicU8 = AtomicU8::new(OVERRIDE_UNSET);

fn parse_env_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    let matches = |options: &[&str]| options.iter().any(|o| value.eq_ignore_ascii_case(o));
    if matches(&["1", "true", "yes", "on"]) {
        Some(true)
    } else if matches(&["0", "false", "no", "off"]) {
        Some(false)
    } else {
        None
    }
}

fn env_fail_on_skipped() -> Option<bool> {
    let raw = std::env::var(FAIL_ON_SKIPPED_ENV).ok()?;
    let parsed = parse_env_bool(&raw);
    if parsed.is_none() {
        log::warn!("ignoring unrecognised {FAIL_ON_SKIPPED_ENV} value {raw:?}");
    }
    parsed
}

fn override_state() -> Option<bool> {
    match FAIL_ON_SKIPPED_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_FALSE => Some(false),
        OVERRIDE_TRUE => Some(true),
        _ => None,
    }
}

/// Whether skipped scenarios without `allow_skipped` should fail.
#[must_use]
pub fn fail_on_skipped() -> bool {
    override_state()
        .or_else(env_fail_on_skipped)
        .unwrap_or(false)
}

/// Override the `fail_on_skipped` flag for the current process.
pub fn set_fail_on_skipped(enabled: bool) {
    let value = if enabled {
        OVERRIDE_TRUE
    } else {
        OVERRIDE_FALSE
    };
    FAIL_ON_SKIPPED_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Drop the in-process override so the environment decides again.
pub fn clear_fail_on_skipped_override() {
    FAIL_ON_SKIPPED_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}
