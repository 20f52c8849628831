//! INI-style config store.
//!
//! Loads `[section]` / `key=value` files into a [`ConfigMap`] and writes them
//! back in canonical form. Only the subset of INI used by mod config files is
//! understood:
//!
//! - `[name]` headers, `key=value` or `key: value` entries (first `=` or `:`
//!   wins), keys trimmed and case-sensitive; a value right after `=` is
//!   kept verbatim, other spellings have it trimmed
//! - full-line `#` / `;` comments and blank lines, which are not preserved
//! - indented lines after an entry continue its value on a new line
//!
//! A leading UTF-8 byte-order mark is stripped.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::Utf8Error;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use thiserror::Error;

const UTF8_BOM: &str = "\u{feff}";

/// Keys and values of one section, in first-seen order.
pub type Section = IndexMap<String, String>;

/// Two-level `section -> key -> value` mapping, in first-seen order.
///
/// Equality ignores ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    sections: IndexMap<String, Section>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the map holds no sections at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Number of keys across all sections.
    pub fn entry_count(&self) -> usize {
        self.sections.values().map(IndexMap::len).sum()
    }

    pub fn contains_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn section(&self, section: &str) -> Option<&Section> {
        self.sections.get(section)
    }

    /// Returns the named section, appending an empty one when missing.
    pub fn section_mut(&mut self, section: &str) -> &mut Section {
        self.sections.entry(section.to_string()).or_default()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    /// Sets `section.key`, creating the section when needed. Returns the
    /// previous value; an overwritten key keeps its position.
    pub fn set(
        &mut self,
        section: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.section_mut(section).insert(key.into(), value.into())
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections
            .iter()
            .map(|(name, entries)| (name.as_str(), entries))
    }

    pub(crate) fn into_sections(self) -> impl Iterator<Item = (String, Section)> {
        self.sections.into_iter()
    }
}

impl fmt::Display for ConfigMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, entries) in &self.sections {
            writeln!(f, "[{name}]")?;
            for (key, value) in entries {
                writeln!(f, "{key}={}", value.replace('\n', "\n\t"))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("config is not valid UTF-8")]
    NotUtf8(#[source] Utf8Error),
    #[error("line {line}: entry before any [section] header")]
    MissingSectionHeader { line: usize },
    #[error("line {line}: section header is missing its closing `]`")]
    UnterminatedHeader { line: usize },
    #[error("line {line}: empty section name")]
    EmptySectionName { line: usize },
    #[error("line {line}: expected `key=value` or `key: value`")]
    MissingDelimiter { line: usize },
    #[error("line {line}: empty key")]
    EmptyKey { line: usize },
}

/// Loads the config at `path`, or an empty map when the file does not exist.
pub fn load(path: &Path) -> Result<ConfigMap> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no existing config, starting empty");
            return Ok(ConfigMap::new());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file {}", path.display()))
        }
    };

    tracing::debug!(path = %path.display(), "reading existing config");
    parse(&bytes).with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Renders the map in canonical form: one `key=value` per line, a blank
/// line after every section, continuation lines indented with a tab.
pub fn serialize(config: &ConfigMap) -> Vec<u8> {
    config.to_string().into_bytes()
}

/// Parses UTF-8 (optionally BOM-prefixed) INI content.
pub fn parse(bytes: &[u8]) -> Result<ConfigMap, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(ParseError::NotUtf8)?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut config = ConfigMap::new();
    let mut section: Option<String> = None;
    let mut current_key: Option<String> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw_line.trim();

        let indented = raw_line.starts_with([' ', '\t']);
        if indented {
            if let (Some(name), Some(key)) = (&section, &current_key) {
                if !is_comment(trimmed) {
                    if let Some(value) = config.section_mut(name).get_mut(key) {
                        value.push('\n');
                        value.push_str(trimmed);
                    }
                }
                continue;
            }
        }

        if trimmed.is_empty() {
            finish_value(&mut config, section.as_deref(), current_key.take());
            continue;
        }
        if is_comment(trimmed) {
            continue;
        }

        finish_value(&mut config, section.as_deref(), current_key.take());

        if let Some(header) = trimmed.strip_prefix('[') {
            let end = header
                .rfind(']')
                .ok_or(ParseError::UnterminatedHeader { line })?;
            let name = header[..end].trim();
            if name.is_empty() {
                return Err(ParseError::EmptySectionName { line });
            }
            config.section_mut(name);
            section = Some(name.to_string());
            continue;
        }

        let Some(name) = &section else {
            return Err(ParseError::MissingSectionHeader { line });
        };
        let entry = raw_line.trim_start();
        let split = entry
            .find(['=', ':'])
            .ok_or(ParseError::MissingDelimiter { line })?;
        let key = entry[..split].trim_end();
        if key.is_empty() {
            return Err(ParseError::EmptyKey { line });
        }
        // Canonical `key=value` lines carry the value verbatim.
        let canonical = key.len() == split && entry[split..].starts_with('=');
        let value = if canonical {
            &entry[split + 1..]
        } else {
            entry[split + 1..].trim()
        };

        config.set(name, key, value);
        current_key = Some(key.to_string());
    }

    finish_value(&mut config, section.as_deref(), current_key);
    Ok(config)
}

/// Why a section name cannot be written so that it reads back unchanged.
pub fn section_name_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("section name is empty")
    } else if name.trim() != name {
        Some("section name has surrounding whitespace")
    } else if name.chars().any(char::is_control) {
        Some("section name contains control characters")
    } else {
        None
    }
}

/// Why a key cannot be written so that it reads back unchanged.
pub fn key_problem(key: &str) -> Option<&'static str> {
    if key.is_empty() {
        Some("key is empty")
    } else if key.trim() != key {
        Some("key has surrounding whitespace")
    } else if key.chars().any(char::is_control) {
        Some("key contains control characters")
    } else if key.contains(['=', ':']) {
        Some("key contains a `=` or `:` delimiter")
    } else if key.starts_with(['[', '#', ';']) {
        Some("key starts with a header or comment marker")
    } else {
        None
    }
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with(['#', ';'])
}

// Blank continuation lines may leave trailing newlines on a value.
fn finish_value(config: &mut ConfigMap, section: Option<&str>, key: Option<String>) {
    let (Some(name), Some(key)) = (section, key) else {
        return;
    };
    if let Some(value) = config.section_mut(name).get_mut(&key) {
        let kept = value.trim_end_matches('\n').len();
        value.truncate(kept);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ConfigMap {
        let mut config = ConfigMap::new();
        config.set("General", "Name", "Valheim Server");
        config.set("General", "Port", "2456");
        config.set("Logging.Console", "Enabled", "true");
        config.set("Logging.Console", "Some_Var", "");
        config.set("Paths", "Url", "http://example.com/a=b?c:d");
        config
    }

    #[test]
    fn parses_sections_and_entries() {
        let text = "\
# leading comment
[General]
Name = Valheim Server
Port=2456

; another comment
[Logging.Console]
Enabled: true
";
        let config = parse(text.as_bytes()).expect("parse config");

        assert_eq!(config.len(), 2);
        assert_eq!(config.get("General", "Name"), Some("Valheim Server"));
        assert_eq!(config.get("General", "Port"), Some("2456"));
        assert_eq!(config.get("Logging.Console", "Enabled"), Some("true"));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let config = parse(b"[S]\nKey=1\nkey=2\n").expect("parse config");

        assert_eq!(config.get("S", "Key"), Some("1"));
        assert_eq!(config.get("S", "key"), Some("2"));
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let config = parse(b"[S]\nk=1\nk=2\n[S]\nk=3\n").expect("parse config");

        assert_eq!(config.len(), 1);
        assert_eq!(config.get("S", "k"), Some("3"));
    }

    #[test]
    fn strips_utf8_bom() {
        let mut bytes = b"\xef\xbb\xbf".to_vec();
        bytes.extend_from_slice(b"[General]\nName=x\n");

        let config = parse(&bytes).expect("parse config with bom");
        assert_eq!(config.get("General", "Name"), Some("x"));
    }

    #[test]
    fn continuation_lines_extend_value() {
        let config = parse(b"[S]\nmotd=line one\n\tline two\n  line three\nnext=1\n")
            .expect("parse config");

        assert_eq!(config.get("S", "motd"), Some("line one\nline two\nline three"));
        assert_eq!(config.get("S", "next"), Some("1"));
    }

    #[test]
    fn value_keeps_delimiters_after_first() {
        let config = parse(b"[S]\nurl=http://host:80/a=b\n").expect("parse config");
        assert_eq!(config.get("S", "url"), Some("http://host:80/a=b"));
    }

    #[test]
    fn rejects_entry_before_section() {
        assert_eq!(
            parse(b"key=value\n[S]\n"),
            Err(ParseError::MissingSectionHeader { line: 1 })
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            parse(b"[S]\njust text\n"),
            Err(ParseError::MissingDelimiter { line: 2 })
        );
        assert_eq!(
            parse(b"[S\nk=v\n"),
            Err(ParseError::UnterminatedHeader { line: 1 })
        );
        assert_eq!(parse(b"[ ]\n"), Err(ParseError::EmptySectionName { line: 1 }));
        assert_eq!(parse(b"[S]\n=v\n"), Err(ParseError::EmptyKey { line: 2 }));
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(matches!(
            parse(b"[S]\nk=\xff\xfe\n"),
            Err(ParseError::NotUtf8(_))
        ));
    }

    #[test]
    fn serializes_canonical_form() {
        let mut config = ConfigMap::new();
        config.set("Server", "test", "true");
        config.set("Server", "name", "My Server");
        config.set("Other", "x", "");

        let text = String::from_utf8(serialize(&config)).expect("utf8");
        assert_eq!(text, "[Server]\ntest=true\nname=My Server\n\n[Other]\nx=\n\n");
    }

    #[test]
    fn empty_sections_survive_round_trip() {
        let mut config = sample();
        config.section_mut("Empty");

        let reloaded = parse(&serialize(&config)).expect("reparse");
        assert!(reloaded.contains_section("Empty"));
        assert_eq!(reloaded, config);
    }

    #[test]
    fn serialize_then_parse_round_trips() {
        let config = sample();
        let reloaded = parse(&serialize(&config)).expect("reparse");

        assert_eq!(reloaded, config);
        assert_eq!(serialize(&reloaded), serialize(&config));
    }

    #[test]
    fn padded_values_round_trip() {
        let mut config = ConfigMap::new();
        config.set("Server", "motd", "  Welcome ");
        config.set("Server", "blank", "   ");
        config.set("Server", "last", "tail\t");

        let text = String::from_utf8(serialize(&config)).expect("utf8");
        assert_eq!(text, "[Server]\nmotd=  Welcome \nblank=   \nlast=tail\t\n\n");

        let reloaded = parse(text.as_bytes()).expect("reparse");
        assert_eq!(reloaded.get("Server", "motd"), Some("  Welcome "));
        assert_eq!(reloaded, config);
    }

    #[test]
    fn spaced_delimiters_trim_values() {
        let config = parse(b"[S]\na = one  \nb: two\nc =three\n").expect("parse config");

        assert_eq!(config.get("S", "a"), Some("one"));
        assert_eq!(config.get("S", "b"), Some("two"));
        assert_eq!(config.get("S", "c"), Some("three"));
    }

    #[test]
    fn blank_continuation_lines_are_dropped_from_value_end() {
        let config = parse(b"[S]\nmotd=first\n\tsecond\n\t\nnext=1\n").expect("parse config");
        assert_eq!(config.get("S", "motd"), Some("first\nsecond"));
    }

    #[test]
    fn multiline_values_round_trip() {
        let mut config = ConfigMap::new();
        config.set("S", "motd", "first\nsecond");

        let text = String::from_utf8(serialize(&config)).expect("utf8");
        assert_eq!(text, "[S]\nmotd=first\n\tsecond\n\n");
        assert_eq!(parse(text.as_bytes()).expect("reparse"), config);
    }

    #[test]
    fn overwrite_keeps_key_position() {
        let mut config = sample();
        let previous = config.set("General", "Name", "Renamed");

        assert_eq!(previous.as_deref(), Some("Valheim Server"));
        let keys: Vec<_> = config
            .section("General")
            .expect("section")
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, ["Name", "Port"]);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let temp = TempDir::new().expect("temp dir");
        let config = load(&temp.path().join("absent.cfg")).expect("load missing");
        assert!(config.is_empty());
    }

    #[test]
    fn load_reads_existing_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("BepInEx.cfg");
        fs::write(&path, "[Caching]\nEnableAssemblyCache = true\n").expect("write config");

        let config = load(&path).expect("load config");
        assert_eq!(config.get("Caching", "EnableAssemblyCache"), Some("true"));
    }

    #[test]
    fn load_reports_parse_failure_with_path() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("broken.cfg");
        fs::write(&path, "no header here\n").expect("write config");

        let err = load(&path).expect_err("malformed config should fail");
        assert!(err.to_string().contains("broken.cfg"));
        assert!(err.downcast_ref::<ParseError>().is_some());
    }

    #[test]
    fn name_checks_flag_unwritable_names() {
        assert_eq!(section_name_problem("Logging.Console"), None);
        assert!(section_name_problem(" padded").is_some());
        assert!(section_name_problem("").is_some());

        assert_eq!(key_problem("Some_Var"), None);
        assert!(key_problem("a=b").is_some());
        assert!(key_problem("a:b").is_some());
        assert!(key_problem("#hidden").is_some());
        assert!(key_problem("line\nbreak").is_some());
    }
}
