//! Integration tests for loading [`AppConfig`] from disk.
//!
//! Each test writes a configuration file to a scratch directory and holds an
//! environment guard while the `SHOPFLOOR_*` overrides are applied.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

mod test_helpers;

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use rstest::{fixture, rstest};
use shopfloor::config::{AppConfig, ConfigError};
use test_helpers::ShopfloorEnv;

/// Scratch directory removed when the test finishes.
struct ScratchDir {
    path: Utf8PathBuf,
}

impl ScratchDir {
    fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let dir = Dir::open_ambient_dir(&self.path, ambient_authority()).expect("open scratch dir");
        dir.write(name, contents).expect("write config file");
        self.path.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let (Some(parent), Some(name)) = (self.path.parent(), self.path.file_name()) {
            if let Ok(dir) = Dir::open_ambient_dir(parent, ambient_authority()) {
                drop(dir.remove_dir_all(name));
            }
        }
    }
}

#[fixture]
fn scratch() -> ScratchDir {
    let root = Utf8PathBuf::from_path_buf(std::env::temp_dir()).expect("utf-8 temp dir");
    let name = format!("shopfloor-config-{}", uuid::Uuid::new_v4());
    Dir::open_ambient_dir(&root, ambient_authority())
        .expect("open temp dir")
        .create_dir(&name)
        .expect("create scratch dir");
    ScratchDir {
        path: root.join(name),
    }
}

#[rstest]
fn load_reads_file_values(scratch: ScratchDir) {
    let _env = ShopfloorEnv::cleared();
    let path = scratch.write(
        "shopfloor.json",
        r#"{
            "database": { "url": "postgres://file/plan", "max_connections": 2 },
            "telemetry": { "filter": "warn" }
        }"#,
    );

    let config = AppConfig::load(&path).expect("config loads");

    assert_eq!(config.database.url, "postgres://file/plan");
    assert_eq!(config.database.max_connections, 2);
    assert_eq!(config.database.connection_timeout_secs, 30);
    assert_eq!(config.telemetry.filter, "warn");
}

#[rstest]
fn load_applies_environment_overrides(scratch: ScratchDir) {
    let _env = ShopfloorEnv::with(Some("postgres://env/plan"), Some("debug"));
    let path = scratch.write(
        "shopfloor.json",
        r#"{ "database": { "url": "postgres://file/plan" } }"#,
    );

    let config = AppConfig::load(&path).expect("config loads");

    assert_eq!(config.database.url, "postgres://env/plan");
    assert_eq!(config.telemetry.filter, "debug");
}

#[rstest]
fn empty_url_without_override_cannot_build_a_pool(scratch: ScratchDir) {
    let _env = ShopfloorEnv::cleared();
    let path = scratch.write("shopfloor.json", "{}");

    let config = AppConfig::load(&path).expect("config loads");

    assert!(matches!(
        config.database.build_pool(),
        Err(ConfigError::MissingDatabaseUrl)
    ));
}

#[rstest]
fn missing_file_is_a_read_error(scratch: ScratchDir) {
    let path = scratch.path.join("absent.json");

    let result = AppConfig::load(&path);

    assert!(matches!(result, Err(ConfigError::Read { .. })));
}
