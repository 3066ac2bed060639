//! Disk usage command implementation.

use crate::OutputFormat;
use hearth_store::Store;
use serde::Serialize;

/// Store usage report.
#[derive(Debug, Serialize)]
pub struct UsageReport {
    /// Store path.
    pub path: String,
    /// Number of records.
    pub records: usize,
    /// Total size of all files in bytes.
    pub bytes: u64,
}

/// Prints the number of records and bytes in the store.
pub fn run(store: &mut Store, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let report = measure(store)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("Path:    {}", report.path);
            println!("Records: {}", report.records);
            println!("Size:    {} bytes", report.bytes);
        }
    }

    Ok(())
}

/// Counts records and bytes under one shared lock.
pub fn measure(store: &mut Store) -> Result<UsageReport, Box<dyn std::error::Error>> {
    let mut report = UsageReport {
        path: store.path().display().to_string(),
        records: 0,
        bytes: 0,
    };
    if !store.path().exists() {
        return Ok(report);
    }

    store.read_only_lock()?;
    let counted = count(store, &mut report);
    store.unlock()?;
    counted?;
    Ok(report)
}

fn count(store: &Store, report: &mut UsageReport) -> Result<(), Box<dyn std::error::Error>> {
    for key in store.keys() {
        key?;
        report.records += 1;
    }
    report.bytes = hearth_fs::directory_size(store.path())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_fs::Filesystem;
    use hearth_store::StoreOptions;
    use tempfile::tempdir;

    #[test]
    fn missing_store_reports_zero_without_creating_it() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("store");
        let mut store = Store::new(StoreOptions::new().path(&base), Filesystem::default());

        let report = measure(&mut store).unwrap();
        assert_eq!(report.records, 0);
        assert_eq!(report.bytes, 0);
        assert!(!base.exists());
    }

    #[test]
    fn counts_records_and_releases_lock() {
        let dir = tempdir().unwrap();
        let options = StoreOptions::new().path(dir.path().join("store")).cache_size(0);
        let mut store = Store::new(options, Filesystem::default());
        store.write("a", &[0u8; 10]).unwrap();
        store.write("b", &[0u8; 5]).unwrap();

        let report = measure(&mut store).unwrap();
        assert_eq!(report.records, 2);
        assert_eq!(report.bytes, 15);
        assert!(!store.is_locked());
    }
}
