// display.rs — Diagnostic display level and stderr macros.
//
// 0 = no output; 1 = errors (debug builds); 2 = warnings; 4 = verbose
// per-meta-block tracing. The level is process-wide so every decoder
// session shares it.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Once;

use crate::config::{DISPLAY_LEVEL_DEFAULT, DISPLAY_LEVEL_ENV};

pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(DISPLAY_LEVEL_DEFAULT);

static ENV_INIT: Once = Once::new();

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Applies `BROTLI_DISPLAY_LEVEL` from the environment, once per process.
///
/// Unparseable values are ignored and leave the current level in place.
/// Returns the level in effect afterwards.
pub fn init_display_level_from_env() -> u32 {
    ENV_INIT.call_once(|| {
        if let Some(level) = std::env::var(DISPLAY_LEVEL_ENV)
            .ok()
            .and_then(|v| parse_level(&v))
        {
            set_display_level(level);
        }
    });
    display_level()
}

fn parse_level(value: &str) -> Option<u32> {
    let level: u32 = value.trim().parse().ok()?;
    Some(level.min(4))
}

/// Print to stderr — equivalent to C `DISPLAY(...)`.
#[macro_export]
macro_rules! display {
    ($($arg:tt)*) => { eprint!($($arg)*) };
}

/// Conditionally print to stderr at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::display::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}

/// Print debug output. Compiled out of release builds.
#[macro_export]
macro_rules! debugoutput {
    ($($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            if $crate::display::display_level() >= 1 {
                eprint!($($arg)*);
            }
        }
    };
}
