use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// One row of the storm events table as it was read, before any numeric
/// conversion. `None` marks a cell absent from a short row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub line: u64,
    pub category: Option<String>,
    pub fatalities: Option<String>,
    pub injuries: Option<String>,
    pub property_damage_magnitude: Option<String>,
    pub property_damage_unit: Option<String>,
    pub crop_damage_magnitude: Option<String>,
    pub crop_damage_unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub category: String,
    pub fatalities: f64,
    pub injuries: f64,
    pub property_damage_dollars: f64,
    pub crop_damage_dollars: f64,
}

/// Free-text event type label. Cheap to clone; compared byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(Arc<str>);

impl Category {
    pub fn new(label: &str) -> Self {
        Self(Arc::from(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Category {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub category: Category,
    pub fatalities: f64,
    pub injuries: f64,
    pub property_damage_dollars: f64,
    pub crop_damage_dollars: f64,
}

impl CategoryTotals {
    pub fn zero(category: Category) -> Self {
        Self {
            category,
            fatalities: 0.0,
            injuries: 0.0,
            property_damage_dollars: 0.0,
            crop_damage_dollars: 0.0,
        }
    }

    pub fn add(&mut self, record: &NormalizedRecord) {
        self.fatalities += record.fatalities;
        self.injuries += record.injuries;
        self.property_damage_dollars += record.property_damage_dollars;
        self.crop_damage_dollars += record.crop_damage_dollars;
    }

    fn absorb(&mut self, other: &CategoryTotals) {
        self.fatalities += other.fatalities;
        self.injuries += other.injuries;
        self.property_damage_dollars += other.property_damage_dollars;
        self.crop_damage_dollars += other.crop_damage_dollars;
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Fatalities => self.fatalities,
            Metric::Injuries => self.injuries,
            Metric::PropertyDamage => self.property_damage_dollars,
            Metric::CropDamage => self.crop_damage_dollars,
        }
    }
}

/// Totals keyed by category, iterated in the order each category was first
/// seen. Exactly one entry exists per distinct label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTable {
    index: HashMap<Category, usize>,
    entries: Vec<CategoryTotals>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<&CategoryTotals> {
        self.index.get(category).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryTotals> {
        self.entries.iter()
    }

    pub fn entry(&mut self, category: &str) -> &mut CategoryTotals {
        let slot = match self.index.get(category) {
            Some(&i) => i,
            None => {
                let key = Category::new(category);
                let i = self.entries.len();
                self.entries.push(CategoryTotals::zero(key.clone()));
                self.index.insert(key, i);
                i
            }
        };
        &mut self.entries[slot]
    }

    /// Folds `other` into this table. Categories new to `self` are appended in
    /// `other`'s first-seen order, so merging partitions in input order keeps
    /// the same order a single pass would produce.
    pub fn merge(&mut self, other: CategoryTable) {
        for totals in &other.entries {
            self.entry(totals.category.as_str()).absorb(totals);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Fatalities,
    Injuries,
    PropertyDamage,
    CropDamage,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Fatalities,
        Metric::Injuries,
        Metric::PropertyDamage,
        Metric::CropDamage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Fatalities => "fatalities",
            Metric::Injuries => "injuries",
            Metric::PropertyDamage => "property_damage",
            Metric::CropDamage => "crop_damage",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Fatalities => "Fatalities",
            Metric::Injuries => "Injuries",
            Metric::PropertyDamage => "Property damage (USD)",
            Metric::CropDamage => "Crop damage (USD)",
        }
    }

    pub fn is_monetary(&self) -> bool {
        matches!(self, Metric::PropertyDamage | Metric::CropDamage)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fatalities" => Ok(Metric::Fatalities),
            "injuries" => Ok(Metric::Injuries),
            "property_damage" | "propertyDamageDollars" => Ok(Metric::PropertyDamage),
            "crop_damage" | "cropDamageDollars" => Ok(Metric::CropDamage),
            other => Err(format!("unknown metric '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub category: Category,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedList {
    pub metric: Metric,
    pub entries: Vec<RankedEntry>,
}

impl RankedList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }
}

/// Axis metadata handed to a chart renderer together with a ranked list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub x_max: f64,
}

impl ChartSpec {
    pub fn for_ranking(ranked: &RankedList) -> Self {
        let x_max = ranked
            .entries
            .iter()
            .map(|e| e.value)
            .fold(0.0_f64, f64::max);
        Self {
            title: format!(
                "Top {} event types by {}",
                ranked.len(),
                ranked.metric.as_str().replace('_', " ")
            ),
            x_label: ranked.metric.label().to_string(),
            x_max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadRowPolicy {
    #[default]
    Abort,
    Skip,
}

impl FromStr for BadRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(BadRowPolicy::Abort),
            "skip" => Ok(BadRowPolicy::Skip),
            other => Err(format!("unknown bad-row policy '{}' (expected abort or skip)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ReportResult {
    pub totals: CategoryTable,
    /// One list per metric, in `Metric::ALL` order.
    pub rankings: Vec<RankedList>,
    pub top_n: usize,
    pub records_processed: usize,
    pub skipped_rows: Vec<SkippedRow>,
    pub generated_at: DateTime<Utc>,
}

impl ReportResult {
    pub fn ranking(&self, metric: Metric) -> Option<&RankedList> {
        self.rankings.iter().find(|r| r.metric == metric)
    }
}
