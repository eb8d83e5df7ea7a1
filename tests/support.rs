#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

use rootify_lib::HOME_ENV;

/// Serialize tests that share the process-wide data directory.
pub fn lock_test_mutex() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn test_home() -> &'static PathBuf {
    static HOME: OnceLock<PathBuf> = OnceLock::new();
    HOME.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("rootify-test-home-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create test home");
        dir
    })
}

/// Point `ROOTIFY_HOME` at a per-process temporary directory.
pub fn ensure_test_home() -> PathBuf {
    let home = test_home().clone();
    std::env::set_var(HOME_ENV, &home);
    home
}

/// Remove roots, history and settings left by a previous test.
pub fn reset_test_fs() {
    let home = test_home();
    if home.exists() {
        let _ = std::fs::remove_dir_all(home);
    }
    std::fs::create_dir_all(home).expect("recreate test home");
}
