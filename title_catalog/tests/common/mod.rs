#![allow(dead_code)]

use std::path::PathBuf;

use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use tempfile::TempDir;
use title_catalog::db::{connection, migrate};
use title_catalog::loader::{DuplicatePolicy, LoadOptions, LoadReport, store::load_csv_path};
use title_catalog::title::{ContentType, TitleRecord};

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}
#[derive(QueryableByName)]
struct Cnt {
    #[diesel(sql_type = BigInt)]
    cnt: i64,
}
#[derive(QueryableByName, Debug)]
struct FkViolation {
    #[diesel(sql_type = Text)]
    table: String,
}

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_all(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

/// Row count of `table` (test-only; table names are literals).
pub fn count(conn: &mut SqliteConnection, table: &str) -> i64 {
    let c: Cnt = diesel::sql_query(format!("SELECT COUNT(*) AS cnt FROM {table}"))
        .get_result(conn)
        .unwrap();
    c.cnt
}

pub fn fk_check_empty(conn: &mut SqliteConnection) {
    let v: Vec<FkViolation> = diesel::sql_query("PRAGMA foreign_key_check;")
        .load(conn)
        .unwrap();
    assert!(v.is_empty(), "foreign key violations: {v:?}");
}

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/titles_sample.csv")
}

/// Load the sample CSV with default options (header, comma, keep first).
pub fn load_fixture(conn: &mut SqliteConnection) -> LoadReport {
    load_csv_path(
        conn,
        fixture_path(),
        &LoadOptions::default(),
        DuplicatePolicy::KeepFirst,
    )
    .expect("load fixture")
}

/// Minimal record for programmatic seeding.
pub fn title(show_id: &str, country: Option<&str>, rating: Option<&str>) -> TitleRecord {
    TitleRecord {
        show_id: show_id.to_string(),
        content_type: ContentType::Movie,
        title: format!("Title {show_id}"),
        director: None,
        cast: None,
        country: country.map(str::to_string),
        date_added: None,
        release_year: 2020,
        rating: rating.map(str::to_string),
        duration: None,
        listed_in: None,
        description: None,
    }
}
