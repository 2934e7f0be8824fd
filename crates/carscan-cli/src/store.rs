//! CSV and JSON persistence for listing batches and summaries.
//!
//! The reader/writer functions are generic over `io::Read`/`io::Write` so they
//! can be tested against in-memory buffers; the `*_file` wrappers add paths
//! and error context.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub(crate) const RAW_LISTINGS_FILE: &str = "raw_listings.csv";
pub(crate) const CLEANED_LISTINGS_FILE: &str = "cleaned_listings.csv";
pub(crate) const CLEANING_REPORT_FILE: &str = "cleaning_report.json";
pub(crate) const SUMMARY_FILE: &str = "analysis_summary.json";

pub(crate) fn output_path(dir: &Path, file: &str) -> PathBuf {
    dir.join(file)
}

/// Writes one CSV row per record, with a header row taken from the field names.
pub(crate) fn write_csv<W, T>(writer: W, records: &[T]) -> Result<(), csv::Error>
where
    W: io::Write,
    T: Serialize,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads records by header name. Columns the target type does not know are
/// ignored, so a cleaned CSV can be read back as raw listings.
pub(crate) fn read_csv<R, T>(reader: R) -> Result<Vec<T>, csv::Error>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize().collect()
}

fn create_file(path: &Path) -> anyhow::Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))
}

pub(crate) fn save_csv_file<T: Serialize>(path: &Path, records: &[T]) -> anyhow::Result<()> {
    let file = create_file(path)?;
    write_csv(io::BufWriter::new(file), records)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), records = records.len(), "wrote csv");
    Ok(())
}

pub(crate) fn load_csv_file<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file = fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let records = read_csv(io::BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::info!(path = %path.display(), records = records.len(), "read csv");
    Ok(records)
}

pub(crate) fn save_json_file<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = create_file(path)?;
    serde_json::to_writer_pretty(io::BufWriter::new(file), value)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote json");
    Ok(())
}

#[cfg(test)]
mod tests {
    use carscan_core::{CleanedRecord, FuelType, ListingRecord, RecordSource, Transmission};
    use chrono::{DateTime, Utc};

    use super::*;

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn raw() -> ListingRecord {
        ListingRecord {
            name: "Maruti Suzuki Swift, VXI".to_string(),
            price_raw: "₹4,50,000".to_string(),
            distance_raw: "32,000 km".to_string(),
            year_raw: "2019".to_string(),
            fuel_type: "Petrol".to_string(),
            transmission: "Manual".to_string(),
            location: "Delhi".to_string(),
            brand: "Maruti Suzuki".to_string(),
            source: RecordSource::SyntheticFallback,
            scraped_at: at(),
        }
    }

    fn cleaned(price: Option<f64>) -> CleanedRecord {
        let raw = raw();
        CleanedRecord {
            name: raw.name,
            price_raw: raw.price_raw,
            distance_raw: raw.distance_raw,
            year_raw: raw.year_raw,
            fuel_type: raw.fuel_type,
            transmission: raw.transmission,
            location: raw.location,
            brand: raw.brand,
            source: raw.source,
            scraped_at: raw.scraped_at,
            price_numeric: price,
            distance_numeric: Some(32_000.0),
            year_numeric: None,
            fuel_type_clean: FuelType::Cng,
            transmission_clean: Transmission::Unknown,
            location_clean: "Delhi".to_string(),
            model_clean: "Swift".to_string(),
        }
    }

    #[test]
    fn raw_csv_header_matches_record_fields() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[raw()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "name,price_raw,distance_raw,year_raw,fuel_type,transmission,location,brand,source,scraped_at"
        );
        assert!(text.contains("synthetic-fallback"));
        assert!(text.contains("2024-05-01T10:00:00Z"));
        // Embedded comma forces quoting.
        assert!(text.contains("\"Maruti Suzuki Swift, VXI\""));
    }

    #[test]
    fn cleaned_csv_reads_back_with_nulls() {
        let records = vec![cleaned(Some(450_000.0)), cleaned(None)];
        let mut buf = Vec::new();
        write_csv(&mut buf, &records).unwrap();

        let back: Vec<CleanedRecord> = read_csv(buf.as_slice()).unwrap();
        assert_eq!(back, records);
        assert_eq!(back[1].price_numeric, None);
        assert_eq!(back[0].fuel_type_clean, FuelType::Cng);
    }

    #[test]
    fn cleaned_csv_reads_as_raw_listings() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[cleaned(Some(450_000.0))]).unwrap();

        let back: Vec<ListingRecord> = read_csv(buf.as_slice()).unwrap();
        assert_eq!(back, vec![raw()]);
    }

    #[test]
    fn empty_batch_reads_back_empty() {
        let mut buf = Vec::new();
        write_csv::<_, ListingRecord>(&mut buf, &[]).unwrap();
        let back: Vec<ListingRecord> = read_csv(buf.as_slice()).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn malformed_csv_is_an_error() {
        let text = "name,price_raw\nonly,two\n";
        let result: Result<Vec<ListingRecord>, _> = read_csv(text.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn files_round_trip_through_nested_dir() {
        let dir = std::env::temp_dir().join(format!("carscan-store-{}", std::process::id()));
        let path = output_path(&dir.join("nested"), RAW_LISTINGS_FILE);

        save_csv_file(&path, &[raw()]).unwrap();
        let back: Vec<ListingRecord> = load_csv_file(&path).unwrap();
        assert_eq!(back, vec![raw()]);

        let json_path = output_path(&dir, SUMMARY_FILE);
        save_json_file(&json_path, &serde_json::json!({"ok": true})).unwrap();
        let text = fs::read_to_string(&json_path).unwrap();
        assert!(text.contains("\"ok\": true"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_csv_file::<ListingRecord>(Path::new("/nonexistent/carscan.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/carscan.csv"));
    }
}
