use crate::domain::model::{CategoryTable, NormalizedRecord};

/// Sums every record into its category's totals in a single pass.
pub fn aggregate<'a, I>(records: I) -> CategoryTable
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    let mut table = CategoryTable::new();
    for record in records {
        table.entry(&record.category).add(record);
    }
    table
}

/// Aggregates fixed-size chunks separately and merges the partial tables in
/// chunk order. Gives the same totals and first-seen order as `aggregate`.
pub fn aggregate_partitioned(records: &[NormalizedRecord], chunk_size: usize) -> CategoryTable {
    let chunk_size = chunk_size.max(1);
    records
        .chunks(chunk_size)
        .map(|chunk| aggregate(chunk))
        .fold(CategoryTable::new(), |mut merged, partial| {
            merged.merge(partial);
            merged
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, fatalities: f64, injuries: f64, prop: f64, crop: f64) -> NormalizedRecord {
        NormalizedRecord {
            category: category.to_string(),
            fatalities,
            injuries,
            property_damage_dollars: prop,
            crop_damage_dollars: crop,
        }
    }

    fn sample() -> Vec<NormalizedRecord> {
        vec![
            record("TORNADO", 5.0, 10.0, 2_500.0, 0.0),
            record("FLOOD", 1.0, 1.0, 1e9, 2_000.0),
            record("TORNADO", 3.0, 0.0, 1e6, 0.0),
            record("HAIL", 0.0, 2.0, 750.0, 10_000.0),
            record("FLOOD", 0.0, 4.0, 0.0, 500.0),
        ]
    }

    #[test]
    fn test_sums_per_category() {
        let table = aggregate(&sample());
        assert_eq!(table.len(), 3);

        let tornado = table.get("TORNADO").unwrap();
        assert_eq!(tornado.fatalities, 8.0);
        assert_eq!(tornado.injuries, 10.0);
        assert_eq!(tornado.property_damage_dollars, 1_002_500.0);

        let flood = table.get("FLOOD").unwrap();
        assert_eq!(flood.injuries, 5.0);
        assert_eq!(flood.crop_damage_dollars, 2_500.0);
    }

    #[test]
    fn test_empty_input_yields_empty_table() {
        let table = aggregate(&Vec::<NormalizedRecord>::new());
        assert!(table.is_empty());
    }

    #[test]
    fn test_totals_do_not_depend_on_record_order() {
        let records = sample();
        let forward = aggregate(&records);

        let mut reversed = records.clone();
        reversed.reverse();
        let backward = aggregate(&reversed);

        let mut rotated = records.clone();
        rotated.rotate_left(2);
        let shifted = aggregate(&rotated);

        for totals in forward.iter() {
            let name = totals.category.as_str();
            assert_eq!(Some(totals), backward.get(name));
            assert_eq!(Some(totals), shifted.get(name));
        }
        assert_eq!(forward.len(), backward.len());
        assert_eq!(forward.len(), shifted.len());
    }

    #[test]
    fn test_partitioned_matches_single_pass() {
        let records = sample();
        let single = aggregate(&records);
        for chunk_size in [1, 2, 3, 10] {
            let partitioned = aggregate_partitioned(&records, chunk_size);
            let order: Vec<_> = partitioned.iter().map(|t| t.category.clone()).collect();
            let expected: Vec<_> = single.iter().map(|t| t.category.clone()).collect();
            assert_eq!(order, expected, "chunk size {}", chunk_size);
            for totals in single.iter() {
                assert_eq!(Some(totals), partitioned.get(totals.category.as_str()));
            }
        }
    }
}
