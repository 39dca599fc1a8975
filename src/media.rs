use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

/// Keyword -> id of a message previously posted to the source channel.
pub type MediaMap = HashMap<String, i32>;

/// Read the media map fresh from disk.
///
/// Called once per lookup, never cached, so edits to the file take effect
/// without a restart. Any failure (missing file, malformed JSON) degrades to
/// an empty map and a warning; dispatch then treats every keyword as a miss
/// instead of failing the request.
pub fn load(path: &Path) -> MediaMap {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read media map {}: {}", path.display(), e);
            return MediaMap::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(map) => map,
        Err(e) => {
            warn!("Failed to parse media map {}: {}", path.display(), e);
            MediaMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_map(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("media_map.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_map(&dir, r#"{"cat": 101, "dog": 202}"#);

        let map = load(&path);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("cat"), Some(&101));
        assert_eq!(map.get("dog"), Some(&202));
    }

    #[test]
    fn test_missing_file_yields_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let map = load(&dir.path().join("nope.json"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_malformed_json_yields_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_map(&dir, "{not json");
        assert!(load(&path).is_empty());
    }

    #[test]
    fn test_wrong_shape_yields_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        // Array root, and string values — both reject as MediaMap.
        assert!(load(&write_map(&dir, r#"[1, 2, 3]"#)).is_empty());
        assert!(load(&write_map(&dir, r#"{"cat": "101"}"#)).is_empty());
    }

    #[test]
    fn test_load_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_map(&dir, r#"{"cat": 101}"#);
        assert_eq!(load(&path), load(&path));
    }

    #[test]
    fn test_load_picks_up_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_map(&dir, r#"{"cat": 101}"#);
        assert_eq!(load(&path).get("cat"), Some(&101));

        std::fs::write(&path, r#"{"cat": 999}"#).unwrap();
        assert_eq!(load(&path).get("cat"), Some(&999));
    }
}
