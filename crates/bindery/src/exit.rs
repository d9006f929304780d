//! Process-wide exit status.
//!
//! A failed dispatch records [`GENERIC_ERROR_EXIT_CODE`] here; the host's
//! `main` reads it back when it terminates.

use std::sync::atomic::{AtomicI32, Ordering};

/// Exit code recorded when binding fails.
pub const GENERIC_ERROR_EXIT_CODE: i32 = 1;

static EXIT_CODE: AtomicI32 = AtomicI32::new(0);

pub fn exit_code() -> i32 {
    EXIT_CODE.load(Ordering::SeqCst)
}

pub fn set_exit_code(code: i32) {
    EXIT_CODE.store(code, Ordering::SeqCst);
}

/// Resets the exit code to success.
pub fn reset_exit_code() {
    set_exit_code(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(exit_code)]
    fn test_set_and_reset() {
        set_exit_code(GENERIC_ERROR_EXIT_CODE);
        assert_eq!(exit_code(), 1);
        reset_exit_code();
        assert_eq!(exit_code(), 0);
    }
}
