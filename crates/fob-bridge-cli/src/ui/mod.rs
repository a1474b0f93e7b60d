//! Terminal status output.
//!
//! Status lines go to stderr; command results go to stdout.

mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use messages::{debug, error, info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR environment variables, falls back to
/// terminal capability detection.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::user_attended_stderr()
}

/// Decide once whether status lines are colored.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    COLORS.store(enabled, Ordering::Relaxed);
    console::set_colors_enabled_stderr(enabled);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_no_color_overrides_force() {
        unsafe { std::env::set_var("NO_COLOR", "1"); }
        unsafe { std::env::set_var("FORCE_COLOR", "1"); }
        assert!(!should_use_color());
        unsafe { std::env::remove_var("NO_COLOR"); }
        unsafe { std::env::remove_var("FORCE_COLOR"); }
    }

    #[test]
    #[serial]
    fn test_force_color() {
        unsafe { std::env::remove_var("NO_COLOR"); }
        unsafe { std::env::set_var("FORCE_COLOR", "1"); }
        assert!(should_use_color());
        unsafe { std::env::remove_var("FORCE_COLOR"); }
    }

    #[test]
    #[serial]
    fn test_flag_disables_colors() {
        unsafe { std::env::set_var("FORCE_COLOR", "1"); }
        init_colors(true);
        assert!(!colors_enabled());
        unsafe { std::env::remove_var("FORCE_COLOR"); }
    }
}
