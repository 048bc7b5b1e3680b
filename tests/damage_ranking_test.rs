use storm_etl::core::aggregate::aggregate;
use storm_etl::core::normalize::normalize;
use storm_etl::core::rank::rank_top;
use storm_etl::core::transform::transform;
use storm_etl::domain::model::{Metric, RawRecord};

fn raw(line: u64, category: &str, fatalities: &str, injuries: &str, prop: (&str, &str), crop: (&str, &str)) -> RawRecord {
    RawRecord {
        line,
        category: Some(category.to_string()),
        fatalities: Some(fatalities.to_string()),
        injuries: Some(injuries.to_string()),
        property_damage_magnitude: Some(prop.0.to_string()),
        property_damage_unit: Some(prop.1.to_string()),
        crop_damage_magnitude: Some(crop.0.to_string()),
        crop_damage_unit: Some(crop.1.to_string()),
    }
}

#[test]
fn test_tornado_and_flood_scenario() {
    let rows = vec![
        raw(2, "TORNADO", "5", "10", ("2.5", "K"), ("0", "")),
        raw(3, "TORNADO", "3", "0", ("1", "M"), ("0", "")),
        raw(4, "FLOOD", "1", "1", ("1", "B"), ("2", "K")),
    ];
    let records: Vec<_> = rows.iter().map(|r| transform(r, "NA").unwrap()).collect();
    let totals = aggregate(&records);

    let tornado = totals.get("TORNADO").unwrap();
    assert_eq!(tornado.fatalities, 8.0);
    assert_eq!(tornado.injuries, 10.0);
    assert_eq!(tornado.property_damage_dollars, 1_002_500.0);
    assert_eq!(tornado.crop_damage_dollars, 0.0);

    let flood = totals.get("FLOOD").unwrap();
    assert_eq!(flood.fatalities, 1.0);
    assert_eq!(flood.injuries, 1.0);
    assert_eq!(flood.property_damage_dollars, 1_000_000_000.0);
    assert_eq!(flood.crop_damage_dollars, 2_000.0);

    let top = rank_top(&totals, Metric::PropertyDamage, 1).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top.entries[0].category.as_str(), "FLOOD");
    assert_eq!(top.entries[0].value, 1_000_000_000.0);
}

#[test]
fn test_spelling_variants_stay_separate() {
    let rows = vec![
        raw(2, "TSTM WIND", "1", "0", ("0", ""), ("0", "")),
        raw(3, "THUNDERSTORM WIND", "1", "0", ("0", ""), ("0", "")),
        raw(4, "TSTM WIND", "1", "0", ("0", ""), ("0", "")),
    ];
    let records: Vec<_> = rows.iter().map(|r| transform(r, "NA").unwrap()).collect();
    let totals = aggregate(&records);

    assert_eq!(totals.len(), 2);
    let ranked = rank_top(&totals, Metric::Fatalities, 10).unwrap();
    let names: Vec<&str> = ranked.entries.iter().map(|e| e.category.as_str()).collect();
    assert_eq!(names, vec!["TSTM WIND", "THUNDERSTORM WIND"]);
}

#[test]
fn test_normalizer_matches_transformer() {
    let record = transform(&raw(2, "HAIL", "0", "0", ("7", "m"), ("3", "?")), "NA").unwrap();
    assert_eq!(record.property_damage_dollars, normalize(7.0, "M"));
    assert_eq!(record.crop_damage_dollars, 3.0);
}

#[test]
fn test_ranking_is_reproducible_across_runs() {
    let rows: Vec<RawRecord> = ["AVALANCHE", "BLIZZARD", "COLD", "DROUGHT"]
        .iter()
        .enumerate()
        .map(|(i, c)| raw(i as u64 + 2, c, "4", "0", ("0", ""), ("0", "")))
        .collect();
    let records: Vec<_> = rows.iter().map(|r| transform(r, "NA").unwrap()).collect();

    let first = rank_top(&aggregate(&records), Metric::Fatalities, 3).unwrap();
    for _ in 0..5 {
        assert_eq!(rank_top(&aggregate(&records), Metric::Fatalities, 3).unwrap(), first);
    }
    let names: Vec<&str> = first.entries.iter().map(|e| e.category.as_str()).collect();
    assert_eq!(names, vec!["AVALANCHE", "BLIZZARD", "COLD"]);
}
