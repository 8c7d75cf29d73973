#![allow(dead_code)]

use std::{fs, path::PathBuf, sync::Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use kakeibo_core::{
    config::{ConfigManager, EngineConfig},
    ledger::{CategoryId, Direction, EntryTemplate, LedgerEntry, LedgerId},
    storage::{JsonLedgerStore, LedgerRecord},
};
use once_cell::sync::Lazy;
use serde_json::json;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated data directory with a config pointing at its `ledgers` folder.
pub fn setup_test_env() -> (PathBuf, ConfigManager, EngineConfig) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let ledgers = base.join("ledgers");
    fs::create_dir_all(&ledgers).expect("create ledger dir");
    let config_manager = ConfigManager::with_base_dir(base.clone());
    let config = EngineConfig {
        ledger_root: Some(ledgers),
        ..EngineConfig::default()
    };
    config_manager.save(&config).expect("save test config");

    (base, config_manager, config)
}

/// Writes `records` as the JSON document of `owner` and returns a store over it.
pub fn seed_store(config: &EngineConfig, owner: LedgerId, records: &[LedgerRecord]) -> JsonLedgerStore {
    let root = config.resolve_ledger_root();
    let body = json!({ "records": records });
    fs::write(
        root.join(format!("{owner}.json")),
        serde_json::to_string_pretty(&body).expect("serialize fixture"),
    )
    .expect("write fixture");
    JsonLedgerStore::new(root)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).expect("valid time")
}

pub fn expense(name: &str, amount: u64, category: CategoryId, when: NaiveDateTime) -> LedgerEntry {
    EntryTemplate::new(1, name, amount, Direction::Expense, category).occurrence_at(when)
}

pub fn income(name: &str, amount: u64, category: CategoryId, when: NaiveDateTime) -> LedgerEntry {
    EntryTemplate::new(1, name, amount, Direction::Income, category).occurrence_at(when)
}

pub fn record(
    id: i64,
    name: &str,
    amount: i64,
    is_income: bool,
    used_date: &str,
    category_id: CategoryId,
) -> LedgerRecord {
    LedgerRecord {
        id,
        name: name.into(),
        amount,
        is_income,
        used_date: used_date.into(),
        category_id,
        icon_name: String::new(),
    }
}
