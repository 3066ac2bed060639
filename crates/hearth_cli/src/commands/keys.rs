//! Keys command implementation.

use crate::OutputFormat;
use hearth_store::{Store, StoreResult};

/// Prints every storage key in the store.
///
/// The walk runs under a shared lock so the listing is a consistent snapshot.
pub fn run(store: &mut Store, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let keys = snapshot(store)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&keys)?);
        }
        OutputFormat::Text => {
            for key in keys {
                println!("{key}");
            }
        }
    }

    Ok(())
}

/// Collects the storage keys under a shared lock.
///
/// A store whose base directory does not exist yet has no keys and is left
/// uncreated.
pub fn snapshot(store: &mut Store) -> StoreResult<Vec<String>> {
    if !store.path().exists() {
        return Ok(Vec::new());
    }

    store.read_only_lock()?;
    let keys = store.keys().collect::<StoreResult<Vec<_>>>();
    store.unlock()?;
    keys
}
