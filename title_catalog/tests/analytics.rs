mod common;
use common::{load_fixture, setup_db, title};

use diesel::SqliteConnection;
use title_catalog::analytics::{
    quality::{duplicate_show_ids, missing_values},
    relations::{same_title_pairs, shared_director_pairs, top_entities},
    share::rating_share,
    stats::{
        release_year_summary, runtime_summary, titles_added_by_year, titles_by_release_year,
        type_breakdown,
    },
};
use title_catalog::loader::store::insert_titles;
use title_catalog::normalize::{DelimitedField, LIST_SEPARATOR, store::normalize_field};
use title_catalog::title::ContentType;

fn loaded() -> (common::TestDb, SqliteConnection) {
    let (db, mut conn) = setup_db();
    load_fixture(&mut conn);
    for field in DelimitedField::ALL {
        normalize_field(&mut conn, field, LIST_SEPARATOR).unwrap();
    }
    (db, conn)
}

#[test]
fn missing_values_per_column() {
    let (_db, mut conn) = loaded();

    let rows = missing_values(&mut conn, 2).unwrap();
    let get = |c: &str| rows.iter().find(|r| r.column == c).unwrap();

    assert_eq!(rows.len(), 9);
    assert!(rows.iter().all(|r| r.total == 9));
    assert_eq!(get("director").missing, 3);
    assert_eq!(get("director").percent, 33.33);
    assert_eq!(get("movie_cast").missing, 3);
    assert_eq!(get("country").missing, 1);
    assert_eq!(get("date_added").missing, 1);
    assert_eq!(get("duration").missing, 1);
    assert_eq!(get("rating").missing, 0);
    assert_eq!(get("rating").percent, 0.0);

    assert!(duplicate_show_ids(&mut conn).unwrap().is_empty());
}

#[test]
fn type_split_and_release_years() {
    let (_db, mut conn) = loaded();

    let types = type_breakdown(&mut conn, 2).unwrap();
    assert_eq!(types.len(), 2);
    assert_eq!(
        (types[0].content_type.as_str(), types[0].titles, types[0].percent),
        ("Movie", 6, 66.67)
    );
    assert_eq!(
        (types[1].content_type.as_str(), types[1].titles, types[1].percent),
        ("TV Show", 3, 33.33)
    );

    let years = release_year_summary(&mut conn).unwrap().unwrap();
    assert_eq!((years.titles, years.earliest, years.latest), (9, 1993, 2021));
    assert_eq!(years.mean, 2015.8);

    let recent = titles_by_release_year(&mut conn, 3).unwrap();
    let flat: Vec<_> = recent
        .iter()
        .map(|y| (y.release_year, y.movies, y.series, y.total))
        .collect();
    assert_eq!(flat, [(2021, 1, 3, 4), (2020, 1, 0, 1), (2019, 1, 0, 1)]);
}

#[test]
fn runtimes_split_by_unit() {
    let (_db, mut conn) = loaded();

    let stats = runtime_summary(&mut conn).unwrap();
    assert_eq!(stats.len(), 2);

    let movies = &stats[0];
    assert_eq!(movies.content_type, ContentType::Movie);
    assert_eq!(movies.unit(), "min");
    assert_eq!((movies.titles, movies.min, movies.max), (5, 82, 125));
    assert_eq!(movies.mean, 99.2);
    assert_eq!(movies.unparsed, 1);

    let series = &stats[1];
    assert_eq!(series.unit(), "seasons");
    assert_eq!((series.titles, series.min, series.max), (3, 1, 2));
    assert_eq!(series.mean, 1.3);
    assert_eq!(series.unparsed, 0);
}

#[test]
fn added_dates_group_by_year() {
    let (_db, mut conn) = loaded();

    let added = titles_added_by_year(&mut conn).unwrap();
    assert_eq!(added.by_year, vec![(2016, 1), (2021, 6)]);
    assert_eq!(added.missing, 1);
    assert_eq!(added.unparsed, 1);
}

#[test]
fn top_entities_rank_by_count() {
    let (_db, mut conn) = loaded();

    let countries = top_entities(&mut conn, DelimitedField::Country, 2).unwrap();
    let names: Vec<_> = countries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["United States", "France"]);

    let genres = top_entities(&mut conn, DelimitedField::Genre, 1).unwrap();
    assert_eq!(genres[0].name, "Dramas");
    assert_eq!(genres[0].title_count, 3);
}

#[test]
fn self_joins_find_related_titles() {
    let (_db, mut conn) = loaded();

    let shared = shared_director_pairs(&mut conn, 10).unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].director, "Mike Flanagan");
    assert_eq!((shared[0].movie_id.as_str(), shared[0].movie_title.as_str()), ("s7", "Hush"));
    assert_eq!(
        (shared[0].series_id.as_str(), shared[0].series_title.as_str()),
        ("s6", "Midnight Mass")
    );

    let same = same_title_pairs(&mut conn, 10).unwrap();
    assert_eq!(same.len(), 1);
    assert_eq!((same[0].first_id.as_str(), same[0].second_id.as_str()), ("s3", "s9"));
    assert_eq!((same[0].first_year, same[0].second_year), (2021, 2010));
    assert_eq!(same[0].second_type, "Movie");
}

fn seed_share_catalog(conn: &mut SqliteConnection) {
    let mut rows = Vec::new();
    for i in 1..=12 {
        let country = if i == 1 { "Poland, France" } else { "Poland" };
        let rating = if i <= 3 { "TV-MA" } else { "PG" };
        rows.push(title(&format!("p{i}"), Some(country), Some(rating)));
    }
    rows.push(title("f1", Some("France"), Some("TV-MA")));
    insert_titles(conn, &rows).unwrap();
    normalize_field(conn, DelimitedField::Country, LIST_SEPARATOR).unwrap();
}

#[test]
fn rating_share_filters_after_grouping() {
    let (_db, mut conn) = setup_db();
    seed_share_catalog(&mut conn);

    let rows = rating_share(&mut conn, DelimitedField::Country, "TV-MA", 5, 2).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Poland");
    assert_eq!((rows[0].total, rows[0].matching), (12, 3));
    assert_eq!(rows[0].percent, 25.0);

    let rows = rating_share(&mut conn, DelimitedField::Country, "TV-MA", 1, 2).unwrap();
    let flat: Vec<_> = rows.iter().map(|r| (r.name.as_str(), r.percent)).collect();
    assert_eq!(flat, [("France", 100.0), ("Poland", 25.0)]);

    let none = rating_share(&mut conn, DelimitedField::Country, "NC-17", 1, 2).unwrap();
    assert!(none.iter().all(|r| r.matching == 0 && r.percent == 0.0));
}

#[test]
fn empty_catalog_reports_nothing() {
    let (_db, mut conn) = setup_db();

    assert!(type_breakdown(&mut conn, 2).unwrap().is_empty());
    assert_eq!(release_year_summary(&mut conn).unwrap(), None);
    assert!(runtime_summary(&mut conn).unwrap().is_empty());
    let missing = missing_values(&mut conn, 2).unwrap();
    assert!(missing.iter().all(|m| m.total == 0 && m.percent == 0.0));
}
