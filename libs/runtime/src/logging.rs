use crate::config::{LoggingConfig, Section};
use std::{
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::AppendCount,
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" | "" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        "off" | "none" => None,
        _ => Some(LevelFilter::INFO),
    }
}

/// True if `target` is `prefix` itself or lives under `prefix::`.
fn matches_prefix(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

// -------- rotating file writer --------

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendCount>>>);

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.0.lock() {
            Ok(mut f) => f.write(buf),
            // A panic while holding the lock must not take logging down with it.
            Err(poisoned) => poisoned.into_inner().write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.0.lock() {
            Ok(mut f) => f.flush(),
            Err(poisoned) => poisoned.into_inner().flush(),
        }
    }
}

impl<'a> fmt::MakeWriter<'a> for RotatingFile {
    type Writer = RotatingFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating(section: &Section, base_dir: &Path) -> std::io::Result<Option<RotatingFile>> {
    if section.file.trim().is_empty() {
        return Ok(None);
    }
    let path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let rot = FileRotate::new(
        &path,
        AppendCount::new(section.max_backups.unwrap_or(3)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(Some(RotatingFile(Arc::new(Mutex::new(rot)))))
}

/// Split the config into the catch-all section and the named subsystems.
fn split_sections(cfg: &LoggingConfig) -> (Option<&Section>, Vec<(&str, &Section)>) {
    let named = cfg
        .iter()
        .filter(|(k, _)| k.as_str() != DEFAULT_SECTION)
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    (cfg.get(DEFAULT_SECTION), named)
}

/// Per-target filter: named subsystems use their own level, everything else
/// uses the default section's level.
fn targets_for<F>(default: Option<&Section>, named: &[(&str, &Section)], level_of: F) -> Targets
where
    F: Fn(&Section) -> Option<LevelFilter>,
{
    let mut targets = Targets::new().with_default(
        default
            .and_then(&level_of)
            .unwrap_or(LevelFilter::OFF),
    );
    for (name, section) in named {
        targets = targets.with_target(*name, level_of(section).unwrap_or(LevelFilter::OFF));
    }
    targets
}

/// Initialize the global subscriber.
///
/// `base_dir` anchors relative log file paths (usually `server.home_dir`).
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` records (sqlx, sea-orm) into tracing.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let (default, named) = split_sections(cfg);

    let console = fmt::layer()
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(targets_for(default, &named, |s| parse_level(&s.console_level)));

    let mut file_layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let sections = default
        .map(|s| (DEFAULT_SECTION, s))
        .into_iter()
        .chain(named.iter().copied());
    for (name, section) in sections {
        let writer = match open_rotating(section, base_dir) {
            Ok(Some(w)) => w,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("Failed to open log file for '{name}' ({}): {e}", section.file);
                continue;
            }
        };
        let Some(level) = parse_level(&section.file_level) else {
            continue;
        };
        let filter = file_filter(name, level, &named);
        file_layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
        );
    }

    let _ = Registry::default()
        .with(file_layers)
        .with(console)
        .try_init();
}

type MetaFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync>>;

/// A named section's file receives its own targets; the default file receives
/// every target that no named section claims.
fn file_filter(name: &str, level: LevelFilter, named: &[(&str, &Section)]) -> MetaFilter {
    if name == DEFAULT_SECTION {
        let claimed: Vec<String> = named.iter().map(|(n, _)| n.to_string()).collect();
        FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
            !claimed.iter().any(|c| matches_prefix(meta.target(), c)) && level >= *meta.level()
        }))
    } else {
        let own = name.to_string();
        FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
            matches_prefix(meta.target(), &own) && level >= *meta.level()
        }))
    }
}
