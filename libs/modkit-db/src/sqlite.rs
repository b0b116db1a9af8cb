//! SQLite DSN handling: PRAGMA query parameters, in-memory detection and
//! parent directory preparation.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use std::{path::PathBuf, str::FromStr, time::Duration};

const PRAGMA_PARAMS: &[&str] = &["wal", "synchronous", "busy_timeout", "journal_mode"];

/// PRAGMA settings accepted from DSN query parameters.
///
/// Only a fixed whitelist is honoured; invalid values are logged and ignored.
#[derive(Clone, Debug, Default)]
pub(crate) struct Pragmas {
    pub journal_mode: Option<SqliteJournalMode>,
    pub synchronous: Option<SqliteSynchronous>,
    pub busy_timeout_ms: Option<u64>,
}

impl Pragmas {
    fn set(&mut self, key: &str, value: &str) {
        match key {
            "journal_mode" => match SqliteJournalMode::from_str(value) {
                Ok(mode) => self.journal_mode = Some(mode),
                Err(_) => tracing::warn!("Invalid 'journal_mode' PRAGMA value '{value}', ignoring"),
            },
            // Legacy toggle; an explicit journal_mode wins.
            "wal" if self.journal_mode.is_none() => match value.to_ascii_lowercase().as_str() {
                "true" | "1" => self.journal_mode = Some(SqliteJournalMode::Wal),
                "false" | "0" => self.journal_mode = Some(SqliteJournalMode::Delete),
                _ => tracing::warn!("Invalid 'wal' PRAGMA value '{value}', ignoring"),
            },
            "synchronous" => match SqliteSynchronous::from_str(value) {
                Ok(mode) => self.synchronous = Some(mode),
                Err(_) => tracing::warn!("Invalid 'synchronous' PRAGMA value '{value}', ignoring"),
            },
            "busy_timeout" => match value.parse::<u64>() {
                Ok(ms) => self.busy_timeout_ms = Some(ms),
                Err(_) => tracing::warn!("Invalid 'busy_timeout' PRAGMA value '{value}', ignoring"),
            },
            _ => {}
        }
    }

    /// Apply onto sqlx connect options. In-memory databases always use the
    /// DELETE journal since WAL needs a file.
    pub(crate) fn apply(
        &self,
        opts: SqliteConnectOptions,
        in_memory: bool,
        default_busy_timeout_ms: u64,
    ) -> SqliteConnectOptions {
        let journal = if in_memory {
            SqliteJournalMode::Delete
        } else {
            self.journal_mode.unwrap_or(SqliteJournalMode::Wal)
        };
        opts.journal_mode(journal)
            .synchronous(self.synchronous.unwrap_or(SqliteSynchronous::Normal))
            .busy_timeout(Duration::from_millis(
                self.busy_timeout_ms.unwrap_or(default_busy_timeout_ms),
            ))
    }
}

/// Split whitelisted PRAGMA parameters out of the DSN.
///
/// Returns the DSN sqlx should see plus the parsed settings. A DSN that does
/// not parse as a URL is returned unchanged.
pub(crate) fn extract_pragmas(dsn: &str) -> (String, Pragmas) {
    let mut pragmas = Pragmas::default();
    let Ok(mut url) = url::Url::parse(dsn) else {
        return (dsn.to_string(), pragmas);
    };

    let mut remaining = Vec::new();
    // journal_mode first so it takes precedence over the legacy `wal` flag.
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort_by_key(|(k, _)| !k.eq_ignore_ascii_case("journal_mode"));

    for (key, value) in pairs {
        let lower = key.to_ascii_lowercase();
        if PRAGMA_PARAMS.contains(&lower.as_str()) {
            pragmas.set(&lower, &value);
        } else {
            remaining.push(format!("{key}={value}"));
        }
    }

    url.set_query(None);
    if !remaining.is_empty() {
        url.set_query(Some(&remaining.join("&")));
    }
    (url.to_string(), pragmas)
}

pub(crate) fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

/// File path named by a SQLite DSN, if it names one.
pub(crate) fn file_path(dsn: &str) -> Option<PathBuf> {
    if is_memory_dsn(dsn) {
        return None;
    }
    let rest = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with("file:") {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Create the parent directory of a file-backed database.
pub(crate) fn prepare_parent_dir(dsn: &str) -> std::io::Result<()> {
    if let Some(parent) = file_path(dsn).as_deref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pragmas_are_extracted_and_removed() {
        let (clean, p) = extract_pragmas(
            "sqlite://test.db?synchronous=full&busy_timeout=10000&journal_mode=delete&cache=shared",
        );
        assert_eq!(clean, "sqlite://test.db?cache=shared");
        assert!(matches!(p.journal_mode, Some(SqliteJournalMode::Delete)));
        assert!(matches!(p.synchronous, Some(SqliteSynchronous::Full)));
        assert_eq!(p.busy_timeout_ms, Some(10000));
    }

    #[test]
    fn test_only_pragmas_leaves_no_query() {
        let (clean, _) = extract_pragmas("sqlite://test.db?wal=true&synchronous=NORMAL");
        assert_eq!(clean, "sqlite://test.db");
    }

    #[test]
    fn test_legacy_wal_toggle() {
        let (_, on) = extract_pragmas("sqlite://test.db?wal=1");
        assert!(matches!(on.journal_mode, Some(SqliteJournalMode::Wal)));

        let (_, off) = extract_pragmas("sqlite://test.db?WAL=false");
        assert!(matches!(off.journal_mode, Some(SqliteJournalMode::Delete)));

        let (_, both) = extract_pragmas("sqlite://test.db?wal=true&journal_mode=truncate");
        assert!(matches!(both.journal_mode, Some(SqliteJournalMode::Truncate)));
    }

    #[test]
    fn test_invalid_values_ignored() {
        let (_, p) = extract_pragmas(
            "sqlite://test.db?wal=maybe&synchronous=yes&busy_timeout=-1&journal_mode=true",
        );
        assert!(p.journal_mode.is_none());
        assert!(p.synchronous.is_none());
        assert!(p.busy_timeout_ms.is_none());
    }

    #[test]
    fn test_memory_detection() {
        assert!(is_memory_dsn("sqlite::memory:"));
        assert!(is_memory_dsn("sqlite:file:memdb?mode=memory&cache=shared"));
        assert!(!is_memory_dsn("sqlite://database/students.db"));
    }

    #[test]
    fn test_file_path() {
        assert_eq!(
            file_path("sqlite:///var/lib/students.db?wal=true"),
            Some(PathBuf::from("/var/lib/students.db"))
        );
        assert_eq!(
            file_path("sqlite://database/students.db"),
            Some(PathBuf::from("database/students.db"))
        );
        assert_eq!(file_path("sqlite:local.db"), Some(PathBuf::from("local.db")));
        assert_eq!(file_path("sqlite::memory:"), None);
        assert_eq!(file_path("postgres://localhost/db"), None);
    }

    #[test]
    fn test_prepare_parent_dir_creates_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let db = tmp.path().join("a/b/students.db");
        let dsn = format!("sqlite://{}", db.display());

        prepare_parent_dir(&dsn).unwrap();
        assert!(tmp.path().join("a/b").is_dir());
    }
}
