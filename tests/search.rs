mod common;

use common::record;
use pokedex_viewer::domain::Record;
use pokedex_viewer::search::{self, FilterCache};

fn sample() -> Vec<Record> {
    vec![
        record(1, "bulbasaur", &["grass", "poison"], &["overgrow", "chlorophyll"]),
        record(2, "ivysaur", &["grass", "poison"], &["overgrow"]),
        record(4, "charmander", &["fire"], &["blaze", "solar-power"]),
        record(25, "pikachu", &["electric"], &["static", "lightning-rod"]),
        record(37, "vulpix", &["fire"], &["flash-fire", "drought"]),
        record(133, "eevee", &["normal"], &["run-away", "adaptability"]),
        record(250, "ho-oh", &["fire", "flying"], &["pressure", "regenerator"]),
    ]
}

fn ids(records: &[&Record]) -> Vec<u32> {
    records.iter().map(|record| record.id).collect()
}

#[test]
fn blank_query_keeps_everything() {
    let records = sample();
    assert_eq!(search::filter(&records, "").len(), records.len());
    assert_eq!(search::filter(&records, "   ").len(), records.len());
    assert!(!search::is_active("  "));
}

#[test]
fn name_match_is_case_insensitive() {
    let records = sample();
    assert_eq!(ids(&search::filter(&records, "PIKA")), vec![25]);
    assert_eq!(ids(&search::filter(&records, "  saur ")), vec![1, 2]);
}

#[test]
fn type_query_matches_in_list_order() {
    let records = sample();
    assert_eq!(ids(&search::filter(&records, "fire")), vec![4, 37, 250]);
}

#[test]
fn ability_query_matches_substrings() {
    let records = sample();
    assert_eq!(ids(&search::filter(&records, "overgrow")), vec![1, 2]);
    assert_eq!(ids(&search::filter(&records, "rod")), vec![25]);
}

#[test]
fn numeric_query_matches_ids_either_way() {
    let records = sample();
    assert_eq!(ids(&search::filter(&records, "25")), vec![2, 25, 250]);
    assert_eq!(ids(&search::filter(&records, "133")), vec![1, 133]);
}

#[test]
fn non_numeric_query_ignores_ids() {
    let records = vec![record(1, "one", &["normal"], &[])];
    assert!(!search::matches(&records[0], "1a"));
    assert!(search::matches(&records[0], "1"));
}

#[test]
fn result_is_a_subsequence_of_the_source() {
    let records = sample();
    for query in ["a", "fire", "2", "o", "zzz"] {
        let filtered = search::filter(&records, query);
        let mut cursor = records.iter();
        for hit in filtered {
            assert!(cursor.any(|record| record.id == hit.id), "{query}");
        }
    }
}

#[test]
fn no_match_is_empty() {
    let records = sample();
    assert!(search::filter(&records, "mewtwo").is_empty());
}

#[test]
fn filter_cache_refreshes_on_version_or_query() {
    let mut records = sample();
    let mut cache = FilterCache::default();
    assert_eq!(cache.indices(7, &records, "fire"), &[2, 4, 6]);

    records.push(record(58, "growlithe", &["fire"], &["intimidate"]));
    assert_eq!(cache.indices(7, &records, "fire"), &[2, 4, 6]);
    assert_eq!(cache.indices(8, &records, "fire"), &[2, 4, 6, 7]);
    assert_eq!(cache.indices(8, &records, " FIRE "), &[2, 4, 6, 7]);
    assert_eq!(cache.indices(8, &records, ""), &[0, 1, 2, 3, 4, 5, 6, 7]);

    records.truncate(1);
    cache.invalidate();
    assert_eq!(cache.indices(8, &records, ""), &[0]);
}

#[test]
fn exponent_and_signed_queries_do_not_match_ids() {
    let records = vec![
        record(1, "one", &["normal"], &[]),
        record(3, "three", &["normal"], &[]),
        record(5, "five", &["normal"], &[]),
    ];
    assert!(search::filter(&records, "1e3").is_empty());
    assert!(search::filter(&records, "+5").is_empty());
    assert!(search::filter(&records, ".5").is_empty());
}
