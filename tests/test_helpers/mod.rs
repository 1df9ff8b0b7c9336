//! Scoped control of the `SHOPFLOOR_*` configuration overrides.
//!
//! Each [`ShopfloorEnv`] holds a process-wide lock, so configuration tests
//! never observe each other's overrides.

use shopfloor::config::{DATABASE_URL_ENV, LOG_FILTER_ENV};
use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

static OVERRIDES_LOCK: Mutex<()> = Mutex::new(());

const OVERRIDE_KEYS: [&str; 2] = [DATABASE_URL_ENV, LOG_FILTER_ENV];

/// Override values in force while the guard lives; restored on drop.
pub struct ShopfloorEnv {
    saved: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ShopfloorEnv {
    /// Removes both overrides.
    pub fn cleared() -> Self {
        Self::with(None, None)
    }

    /// Sets the database URL and log filter overrides; `None` removes one.
    pub fn with(database_url: Option<&str>, log_filter: Option<&str>) -> Self {
        let lock = OVERRIDES_LOCK
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let saved = OVERRIDE_KEYS
            .iter()
            .map(|key| (*key, env::var_os(key)))
            .collect();
        for (key, value) in OVERRIDE_KEYS.into_iter().zip([database_url, log_filter]) {
            write_var(key, value.map(OsString::from));
        }
        Self { saved, _lock: lock }
    }
}

impl Drop for ShopfloorEnv {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..) {
            write_var(key, value);
        }
    }
}

fn write_var(key: &str, value: Option<OsString>) {
    // SAFETY: callers hold OVERRIDES_LOCK, which serializes these writes.
    unsafe {
        match value {
            Some(new_value) => env::set_var(key, new_value),
            None => env::remove_var(key),
        }
    }
}
