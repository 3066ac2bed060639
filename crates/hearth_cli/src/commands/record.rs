//! Single-record commands.

use hearth_store::Store;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::info;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Writes a record from `value`, the content of `file`, or standard input.
pub fn put(
    store: &mut Store,
    name: &str,
    value: Option<String>,
    file: Option<&Path>,
) -> CommandResult {
    let data = match (value, file) {
        (Some(value), _) => value.into_bytes(),
        (None, Some(file)) => fs::read(file)?,
        (None, None) => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            buf
        }
    };

    store.write(name, &data)?;
    info!(name, bytes = data.len(), "record written");
    Ok(())
}

/// Copies a record to standard output.
pub fn get(store: &mut Store, name: &str, raw_key: bool) -> CommandResult {
    let data = if raw_key {
        store.read_from_key(name)?
    } else {
        store.read(name)?
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(&data)?;
    stdout.flush()?;
    Ok(())
}

/// Prints `true` or `false`.
pub fn has(store: &mut Store, name: &str) -> CommandResult {
    println!("{}", store.has(name)?);
    Ok(())
}

/// Removes a record.
pub fn delete(store: &mut Store, name: &str) -> CommandResult {
    store.delete(name)?;
    info!(name, "record deleted");
    Ok(())
}

/// Moves a record.
pub fn rename(store: &mut Store, old: &str, new: &str) -> CommandResult {
    store.rename(old, new)?;
    info!(old, new, "record renamed");
    Ok(())
}
