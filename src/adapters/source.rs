use crate::domain::model::RawRecord;
use crate::domain::ports::ColumnNames;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::is_remote;
use reqwest::Client;
use std::io::{Cursor, Read};
use std::time::Duration;
use zip::ZipArchive;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const BZIP2_MAGIC: &[u8] = b"BZh";

/// Reads the storm events table from a URL or a local file.
#[derive(Debug, Clone)]
pub struct DataSource {
    client: Client,
    timeout: Duration,
}

impl DataSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    pub async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        if is_remote(location) {
            tracing::info!("Downloading dataset from {}", location);
            let response = self
                .client
                .get(location)
                .timeout(self.timeout)
                .send()
                .await?
                .error_for_status()?;
            tracing::debug!("Download response status: {}", response.status());
            Ok(response.bytes().await?.to_vec())
        } else {
            tracing::info!("Reading dataset from {}", location);
            Ok(tokio::fs::read(location).await?)
        }
    }

    pub async fn load(&self, location: &str, columns: &ColumnNames) -> Result<Vec<RawRecord>> {
        let bytes = self.fetch(location).await?;
        tracing::debug!("Fetched {} bytes", bytes.len());
        let csv_bytes = unpack(bytes)?;
        parse_csv(&csv_bytes, columns)
    }
}

/// Returns the CSV payload, taking the first `.csv` entry out of a zip archive.
pub fn unpack(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if bytes.starts_with(BZIP2_MAGIC) {
        return Err(EtlError::data_format(
            0,
            "source",
            "bzip2-compressed input is not supported; decompress it or repackage it as zip",
        ));
    }
    if !bytes.starts_with(ZIP_MAGIC) {
        return Ok(bytes);
    }

    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_file() && entry.name().to_ascii_lowercase().ends_with(".csv") {
            tracing::debug!("Using archive entry {}", entry.name());
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            return Ok(data);
        }
    }

    Err(EtlError::data_format(
        0,
        "source",
        "zip archive contains no .csv entry",
    ))
}

struct ColumnIndex {
    category: usize,
    fatalities: usize,
    injuries: usize,
    property_damage: usize,
    property_damage_unit: usize,
    crop_damage: usize,
    crop_damage_unit: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::ByteRecord, columns: &ColumnNames) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| {
                String::from_utf8_lossy(h)
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .to_string()
            })
            .collect();
        let find = |wanted: &str| {
            names.iter().position(|n| n == wanted).ok_or_else(|| {
                EtlError::data_format(1, wanted, "required column not found in header")
            })
        };

        Ok(Self {
            category: find(&columns.category)?,
            fatalities: find(&columns.fatalities)?,
            injuries: find(&columns.injuries)?,
            property_damage: find(&columns.property_damage)?,
            property_damage_unit: find(&columns.property_damage_unit)?,
            crop_damage: find(&columns.crop_damage)?,
            crop_damage_unit: find(&columns.crop_damage_unit)?,
        })
    }
}

/// Parses every data row in file order. Cells are decoded lossily; cells
/// missing from a short row come back as `None`.
pub fn parse_csv(bytes: &[u8], columns: &ColumnNames) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let index = ColumnIndex::resolve(reader.byte_headers()?, columns)?;

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let cell = |i: usize| record.get(i).map(|b| String::from_utf8_lossy(b).into_owned());
        rows.push(RawRecord {
            line: record.position().map(|p| p.line()).unwrap_or(0),
            category: cell(index.category),
            fatalities: cell(index.fatalities),
            injuries: cell(index.injuries),
            property_damage_magnitude: cell(index.property_damage),
            property_damage_unit: cell(index.property_damage_unit),
            crop_damage_magnitude: cell(index.crop_damage),
            crop_damage_unit: cell(index.crop_damage_unit),
        });
    }

    Ok(rows)
}
