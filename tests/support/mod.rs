//! Shared helpers for integration tests.

use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with some environment variables swapped out, restoring the
/// previous values afterwards even if `f` panics.
///
/// Environment variables are process-global and the test harness runs tests
/// in parallel, so every access goes through one lock; tests touching the
/// environment must all use this helper or they race each other.
///
/// Each `(key, value)` pair sets the variable when `value` is `Some` and
/// removes it when `None`.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _restore = EnvSnapshot::apply(changes);
    f()
}

/// Saved state of the touched variables; puts everything back on drop.
struct EnvSnapshot {
    saved: Vec<(String, Option<String>)>,
}

impl EnvSnapshot {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let mut saved: Vec<(String, Option<String>)> = Vec::with_capacity(changes.len());
        for (key, value) in changes {
            if !saved.iter().any(|(k, _)| k == key) {
                saved.push((key.to_string(), std::env::var(key).ok()));
            }
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
        Self { saved }
    }
}

impl Drop for EnvSnapshot {
    fn drop(&mut self) {
        while let Some((key, value)) = self.saved.pop() {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}
