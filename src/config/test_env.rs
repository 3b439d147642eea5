//! Environment-variable scoping for tests that read `LOOM_*` and provider keys.

use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

static PROCESS_ENV: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Exclusive access to the process environment for one test.
///
/// Every variable touched through the scope is put back when it drops, while
/// the lock is still held.
pub(crate) struct EnvScope {
    saved: Vec<(&'static str, Option<String>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvScope {
    pub(crate) fn lock() -> Self {
        Self {
            saved: Vec::new(),
            _guard: PROCESS_ENV.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    pub(crate) fn set(&mut self, key: &'static str, value: &str) -> &mut Self {
        self.remember(key);
        // SAFETY: the scope holds PROCESS_ENV, so no other test mutates the env.
        unsafe { std::env::set_var(key, value) };
        self
    }

    pub(crate) fn unset(&mut self, key: &'static str) -> &mut Self {
        self.remember(key);
        // SAFETY: as in `set`.
        unsafe { std::env::remove_var(key) };
        self
    }

    fn remember(&mut self, key: &'static str) {
        if self.saved.iter().all(|(k, _)| *k != key) {
            self.saved.push((key, std::env::var(key).ok()));
        }
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            // SAFETY: `_guard` is released only after this body returns.
            unsafe {
                match previous {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "LOOM_TEST_ENV_SCOPE";

    #[test]
    fn restores_previous_values_on_drop() {
        {
            let mut env = EnvScope::lock();
            env.unset(KEY);
        }
        {
            let mut env = EnvScope::lock();
            env.set(KEY, "first").set(KEY, "second");
            assert_eq!(std::env::var(KEY).as_deref(), Ok("second"));
        }
        let _env = EnvScope::lock();
        assert!(std::env::var(KEY).is_err());
    }
}
