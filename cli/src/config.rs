use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use toml_edit::DocumentMut;
use toml_edit::Item as TomlItem;
use toml_edit::Table as TomlTable;
use toml_edit::value;

use crate::atomic_write::write_atomic_text;

const GRAPH_TABLE: &str = "graph";

/// Values read from `config.toml`. Every field is optional; absent or unusable keys fall back to
/// the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub lookup_endpoint: Option<String>,
    pub throttle_window_ms: Option<u64>,
    pub blur_grace_ms: Option<u64>,
    pub lookup_timeout_ms: Option<u64>,
    pub default_size: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn new_default() -> anyhow::Result<Self> {
        let Some(home) = dirs::home_dir() else {
            anyhow::bail!("cannot determine home directory for config path");
        };
        Ok(Self::new(default_config_path(&home)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<FileConfig> {
        let Some(content) = read_document_string(&self.path)? else {
            return Ok(FileConfig::default());
        };

        match content.parse::<DocumentMut>() {
            Ok(doc) => Ok(read_file_config(&doc)),
            Err(err) => {
                tracing::warn!(
                    "{} is not valid TOML ({err}); reading known keys line by line",
                    self.path.display()
                );
                Ok(read_file_config_fallback(&content))
            }
        }
    }

    /// Remember `size` as the starting "web size" for the next session.
    pub fn set_default_size(&self, size: i64) -> anyhow::Result<()> {
        let content = read_document_string(&self.path)?.unwrap_or_default();

        let updated = match content.parse::<DocumentMut>() {
            Ok(mut doc) => {
                let graph = ensure_table_for_write(&mut doc, GRAPH_TABLE);
                graph["default_size"] = value(size);
                doc.to_string()
            }
            Err(_) => append_default_size_fallback(&content, size),
        };

        write_atomic_text(&self.path, &updated)
    }
}

fn default_config_path(home: &Path) -> PathBuf {
    home.join(".artistsearch").join("config.toml")
}

fn read_file_config(doc: &DocumentMut) -> FileConfig {
    let top = doc.as_table();
    let graph = doc.get(GRAPH_TABLE).and_then(TomlItem::as_table);

    FileConfig {
        lookup_endpoint: top
            .get("lookup_endpoint")
            .and_then(|item| expect_str(item, "lookup_endpoint")),
        throttle_window_ms: top
            .get("throttle_window_ms")
            .and_then(|item| expect_millis(item, "throttle_window_ms")),
        blur_grace_ms: top
            .get("blur_grace_ms")
            .and_then(|item| expect_millis(item, "blur_grace_ms")),
        lookup_timeout_ms: top
            .get("lookup_timeout_ms")
            .and_then(|item| expect_millis(item, "lookup_timeout_ms")),
        default_size: graph
            .and_then(|graph| graph.get("default_size"))
            .and_then(|item| {
                let size = item.as_integer();
                if size.is_none() {
                    tracing::warn!("ignoring graph.default_size: expected an integer");
                }
                size
            }),
    }
}

fn expect_str(item: &TomlItem, key: &str) -> Option<String> {
    match item.as_str() {
        Some(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => {
            tracing::warn!("ignoring {key}: expected a non-empty string");
            None
        }
    }
}

fn expect_millis(item: &TomlItem, key: &str) -> Option<u64> {
    let millis = item
        .as_integer()
        .and_then(|millis| u64::try_from(millis).ok());
    if millis.is_none() {
        tracing::warn!("ignoring {key}: expected a non-negative integer of milliseconds");
    }
    millis
}

fn read_file_config_fallback(contents: &str) -> FileConfig {
    let millis = |key| fallback_value(contents, None, key).and_then(|raw| raw.parse::<u64>().ok());

    FileConfig {
        lookup_endpoint: fallback_value(contents, None, "lookup_endpoint")
            .map(|raw| raw.trim_matches('"').trim())
            .filter(|endpoint| !endpoint.is_empty())
            .map(str::to_string),
        throttle_window_ms: millis("throttle_window_ms"),
        blur_grace_ms: millis("blur_grace_ms"),
        lookup_timeout_ms: millis("lookup_timeout_ms"),
        default_size: fallback_value(contents, Some(GRAPH_TABLE), "default_size")
            .and_then(|raw| raw.parse::<i64>().ok()),
    }
}

/// Last raw value assigned to `key` inside `table` (`None` for the top level). Lines after a
/// malformed table header are treated as top level.
fn fallback_value<'a>(contents: &'a str, table: Option<&str>, key: &str) -> Option<&'a str> {
    let mut current_table = None;
    let mut result = None;

    for line in contents.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            current_table = parse_table_header_name(trimmed);
            continue;
        }

        if current_table != table {
            continue;
        }

        let Some(line) = strip_toml_comment(trimmed) else {
            continue;
        };
        let Some((line_key, raw)) = line.split_once('=') else {
            continue;
        };
        if line_key.trim() == key {
            result = Some(raw.trim());
        }
    }

    result
}

fn parse_table_header_name(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if !line.starts_with('[') {
        return None;
    }
    let end = line.find(']')?;
    if end <= 1 {
        return None;
    }
    let name = line[1..end].trim();
    if name.is_empty() {
        return None;
    }
    Some(name)
}

/// Drop a trailing `#` comment. A `#` inside a basic (`"…"`) or literal (`'…'`) string is part
/// of the value.
fn strip_toml_comment(line: &str) -> Option<&str> {
    let mut quote = None;
    let mut escaped = false;
    let mut end = line.len();

    for (idx, ch) in line.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if ch == '\\' => escaped = true,
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch == '#' => {
                end = idx;
                break;
            }
            None => {}
        }
    }

    let line = line[..end].trim();
    if line.is_empty() { None } else { Some(line) }
}

fn ensure_table_for_write<'a>(doc: &'a mut DocumentMut, key: &str) -> &'a mut TomlTable {
    if doc.get(key).and_then(TomlItem::as_table).is_none() {
        let mut table = TomlTable::new();
        table.set_implicit(false);
        doc[key] = TomlItem::Table(table);
    }

    match &mut doc[key] {
        TomlItem::Table(table) => table,
        _ => unreachable!("expected `{key}` to be a table"),
    }
}

fn append_default_size_fallback(existing: &str, size: i64) -> String {
    let mut out = existing.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&format!("[{GRAPH_TABLE}]\n"));
    out.push_str(&format!("default_size = {size}\n"));
    out
}

fn read_document_string(path: &Path) -> anyhow::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(anyhow::Error::new(err).context("read config.toml")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store_with(contents: &str) -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).expect("write config");
        (dir, ConfigStore::new(path))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::new(dir.path().join("config.toml"));
        assert_eq!(store.load().expect("load"), FileConfig::default());
    }

    #[test]
    fn reads_all_known_keys() {
        let (_dir, store) = store_with(
            r#"lookup_endpoint = "http://localhost:8080"
throttle_window_ms = 500
blur_grace_ms = 150
lookup_timeout_ms = 2000

[graph]
default_size = 25
"#,
        );

        assert_eq!(
            store.load().expect("load"),
            FileConfig {
                lookup_endpoint: Some("http://localhost:8080".to_string()),
                throttle_window_ms: Some(500),
                blur_grace_ms: Some(150),
                lookup_timeout_ms: Some(2000),
                default_size: Some(25),
            }
        );
    }

    #[test]
    fn ignores_values_of_the_wrong_type() {
        let (_dir, store) = store_with(
            r#"lookup_endpoint = 3
throttle_window_ms = -5
blur_grace_ms = "soon"

[graph]
default_size = "big"
"#,
        );

        assert_eq!(store.load().expect("load"), FileConfig::default());
    }

    #[test]
    fn reads_known_keys_when_toml_is_invalid() {
        let (_dir, store) = store_with(
            r#"# broken table header makes this TOML invalid
[other
throttle_window_ms = 300 # keep me
lookup_endpoint = "http://example.test"

[graph]
default_size = 12
"#,
        );

        assert_eq!(
            store.load().expect("load"),
            FileConfig {
                lookup_endpoint: Some("http://example.test".to_string()),
                throttle_window_ms: Some(300),
                default_size: Some(12),
                ..FileConfig::default()
            }
        );
    }

    #[test]
    fn hash_inside_quoted_value_is_not_a_comment() {
        let (_dir, store) = store_with(
            r#"[broken
lookup_endpoint = "http://h/a #b" # trailing comment
throttle_window_ms = 250 # keep me
"#,
        );

        let config = store.load().expect("load");
        assert_eq!(config.lookup_endpoint.as_deref(), Some("http://h/a #b"));
        assert_eq!(config.throttle_window_ms, Some(250));
    }

    #[test]
    fn strip_toml_comment_respects_string_literals() {
        assert_eq!(strip_toml_comment("# only a comment"), None);
        assert_eq!(strip_toml_comment("key = 1 # note"), Some("key = 1"));
        assert_eq!(
            strip_toml_comment(r#"key = "a \" # b" # note"#),
            Some(r#"key = "a \" # b""#)
        );
        assert_eq!(strip_toml_comment("key = 'x#y'"), Some("key = 'x#y'"));
    }

    #[test]
    fn set_default_size_preserves_comments() {
        let (_dir, store) = store_with(
            r#"# top comment
throttle_window_ms = 800

[graph] # keep me
# inner comment
default_size = 18
"#,
        );

        store.set_default_size(30).expect("set size");

        let updated = std::fs::read_to_string(store.path()).expect("read updated");
        assert!(updated.contains("# top comment"));
        assert!(updated.contains("# inner comment"));
        assert!(updated.contains("default_size = 30"));
        assert_eq!(store.load().expect("load").default_size, Some(30));
    }

    #[test]
    fn set_default_size_creates_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::new(dir.path().join("nested").join("config.toml"));

        store.set_default_size(7).expect("set size");

        assert_eq!(store.load().expect("load").default_size, Some(7));
    }

    #[test]
    fn default_config_path_uses_artistsearch_home_dir() {
        let home = Path::new("home");
        assert_eq!(
            default_config_path(home),
            home.join(".artistsearch").join("config.toml")
        );
    }
}
