use campaigns::config::{ConfigError, ConfigLoader};
use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;

const KEYS: &[&str] = &[
    "CAMPAIGNS_PROFILE",
    "CAMPAIGNS_LOG_LEVEL",
    "CAMPAIGNS_LOG_FORMAT",
    "CAMPAIGNS_DB_DRIVER",
    "CAMPAIGNS_DB_URL",
    "CAMPAIGNS_DB_POOL_NAME",
    "CAMPAIGNS_DB_POOL_SIZE",
    "CAMPAIGNS_DB_ACQUIRE_TIMEOUT_MS",
    "CAMPAIGNS_DB_HOST",
    "CAMPAIGNS_DB_PORT",
    "CAMPAIGNS_DB_USER",
    "CAMPAIGNS_DB_PASSWORD",
    "CAMPAIGNS_DB_NAME",
    "CAMPAIGNS_DB_AUTO_MIGRATE",
    "CAMPAIGNS_ALLOWED_STATUSES",
];

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

fn clear_env() {
    unsafe {
        for key in KEYS {
            env::remove_var(key);
        }
    }
}

fn write_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

fn loader(dir: &TempDir) -> ConfigLoader {
    ConfigLoader::with_base_dir(PathBuf::from(dir.path()))
}

#[test]
fn loads_defaults_when_nothing_is_configured() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let cfg = loader(&temp_dir).load().expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.log_format, "pretty");
    assert_eq!(cfg.database.driver, "mysql");
    assert_eq!(cfg.database.pool.name, "campaigns_pool");
    assert_eq!(cfg.database.pool.size, 5);
    assert_eq!(cfg.database.connection.config.database, "campaigns");
    assert!(cfg.database.auto_migrate);
    assert!(cfg.campaign.allowed_statuses.is_none());
}

#[test]
fn json_file_is_read_from_base_dir() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_file(
        &temp_dir,
        "config.json",
        r#"{
            "log_level": "info",
            "database": {
                "driver": "postgres",
                "pool": { "name": "ads_pool", "size": 10 },
                "connection": { "config": { "host": "db", "port": 5432, "user": "ads", "database": "ads" } }
            },
            "campaign": { "allowed_statuses": ["planned", "active"] }
        }"#,
    );

    let cfg = loader(&temp_dir).load().expect("config loads from json");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.database.driver, "postgres");
    assert_eq!(cfg.database.pool.size, 10);
    assert_eq!(
        cfg.database.database_url().unwrap(),
        "postgres://ads@db:5432/ads"
    );
    assert_eq!(
        cfg.campaign.allowed_statuses,
        Some(vec!["planned".to_string(), "active".to_string()])
    );
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_file(&temp_dir, ".env", "CAMPAIGNS_DB_NAME=base\nCAMPAIGNS_DB_POOL_SIZE=2\n");
    write_file(&temp_dir, ".env.local", "CAMPAIGNS_PROFILE=test\nCAMPAIGNS_DB_NAME=local\n");
    write_file(&temp_dir, ".env.test", "CAMPAIGNS_DB_NAME=test\n");
    write_file(&temp_dir, ".env.test.local", "CAMPAIGNS_DB_HOST=10.0.0.5\n");

    let cfg = loader(&temp_dir).load().expect("config loads with layered env files");

    assert_eq!(cfg.profile, "test");
    assert_eq!(cfg.database.connection.config.database, "test");
    assert_eq!(cfg.database.connection.config.host, "10.0.0.5");
    assert_eq!(cfg.database.pool.size, 2);
}

#[test]
fn process_env_wins_over_files() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_file(&temp_dir, ".env", "CAMPAIGNS_DB_DRIVER=mysql\n");
    unsafe {
        env::set_var("CAMPAIGNS_DB_DRIVER", "SQLite");
        env::set_var("CAMPAIGNS_DB_NAME", ":memory:");
        env::set_var("CAMPAIGNS_ALLOWED_STATUSES", "planned, live ,");
        env::set_var("CAMPAIGNS_DB_AUTO_MIGRATE", "false");
    }

    let cfg = loader(&temp_dir).load().expect("config loads from env");
    clear_env();

    assert_eq!(cfg.database.driver, "sqlite");
    assert_eq!(cfg.database.database_url().unwrap(), "sqlite::memory:");
    assert!(!cfg.database.auto_migrate);
    assert_eq!(
        cfg.campaign.allowed_statuses,
        Some(vec!["planned".to_string(), "live".to_string()])
    );
}

#[test]
fn invalid_values_are_rejected() {
    let _guard = env_guard();
    clear_env();
    let temp_dir = TempDir::new().unwrap();

    unsafe { env::set_var("CAMPAIGNS_DB_POOL_SIZE", "64") };
    assert!(matches!(
        loader(&temp_dir).load(),
        Err(ConfigError::InvalidPoolSize { value: 64 })
    ));

    unsafe { env::set_var("CAMPAIGNS_DB_POOL_SIZE", "many") };
    assert!(matches!(
        loader(&temp_dir).load(),
        Err(ConfigError::InvalidEnvValue { .. })
    ));
    clear_env();

    unsafe { env::set_var("CAMPAIGNS_LOG_FORMAT", "xml") };
    assert!(matches!(
        loader(&temp_dir).load(),
        Err(ConfigError::InvalidLogFormat { .. })
    ));
    clear_env();

    unsafe { env::set_var("CAMPAIGNS_DB_DRIVER", "oracle") };
    assert!(matches!(
        loader(&temp_dir).load(),
        Err(ConfigError::UnsupportedDriver { .. })
    ));
    clear_env();
}

#[test]
fn explicit_config_file_must_exist() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let result = loader(&temp_dir)
        .config_file(temp_dir.path().join("missing.json"))
        .load();
    assert!(matches!(result, Err(ConfigError::ConfigFile { .. })));

    write_file(&temp_dir, "broken.json", "{ not json");
    let result = loader(&temp_dir)
        .config_file(temp_dir.path().join("broken.json"))
        .load();
    assert!(matches!(result, Err(ConfigError::ConfigParse { .. })));
}
