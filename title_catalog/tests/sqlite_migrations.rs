mod common;
use common::{assert_sqlite_pragmas, setup_db};

use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Integer;

#[derive(QueryableByName)]
struct TblCnt {
    #[diesel(sql_type = Integer)]
    cnt: i32,
}

#[test]
fn migrations_apply_and_pragmas_are_set() {
    let (_db, mut conn) = setup_db();

    // WAL is persistent per file; FKs/timeout are per-connection
    assert_sqlite_pragmas(&mut conn);

    let tbls: TblCnt = sql_query(
        "SELECT COUNT(*) AS cnt
            FROM sqlite_master
            WHERE type='table'
            AND name IN ('titles','country','title_country','genre','title_genre');",
    )
    .get_result(&mut conn)
    .unwrap();
    assert_eq!(tbls.cnt, 5, "expected five tables to be present");
}

#[test]
fn junction_rows_require_existing_parents() {
    let (_db, mut conn) = setup_db();

    let res = sql_query("INSERT INTO title_country (show_id, country_id) VALUES ('nope', 1);")
        .execute(&mut conn);
    assert!(res.is_err(), "FK enforcement should reject orphan junction rows");
}

#[test]
fn entity_names_are_unique() {
    let (_db, mut conn) = setup_db();

    sql_query("INSERT INTO genre (id, name, title_count) VALUES (1, 'Dramas', 1);")
        .execute(&mut conn)
        .unwrap();
    let res = sql_query("INSERT INTO genre (id, name, title_count) VALUES (2, 'Dramas', 1);")
        .execute(&mut conn);
    assert!(res.is_err());
}
