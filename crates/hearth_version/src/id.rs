//! Time-ordered identifiers.

use uuid::Uuid;

/// Returns a new UUID v7 in its hyphenated lowercase form.
///
/// Ids generated later sort after ids generated earlier.
#[must_use]
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_version_seven() {
        let id = new_id();
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
        assert_eq!(id.len(), 36);
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let ids: Vec<String> = (0..64).map(|_| new_id()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, ids);
    }
}
