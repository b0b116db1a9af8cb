use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use modkit_db::{redact_credentials_in_dsn, ConnectOpts, DbHandle};
use runtime::{AppConfig, CliArgs, DatabaseConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use api_ingress::{ApiIngress, ApiIngressConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use students::{config::StudentsConfig, Students};
use tokio_util::sync::CancellationToken;

const MEMORY_DSN: &str = "sqlite::memory:";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps in-memory DSNs as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:") {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        bail!("Empty SQLite path in DSN");
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// Student records server: GraphQL API over a SQL store
#[derive(Parser)]
#[command(name = "students-server")]
#[command(about = "Student records server - GraphQL API over a SQL store")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database instead of the configured one
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Print the GraphQL schema (SDL) and exit
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    if matches!(command, Commands::Schema) {
        print!("{}", students::api::graphql::sdl());
        return Ok(());
    }

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Students server starting");
    tracing::debug!(server = ?config.server, "effective server configuration");

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match command {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args).await,
        Commands::Schema => Ok(()),
    }
}

/// The DSN the server will actually open: `--mock` wins, relative SQLite
/// paths are resolved under `home_dir`.
fn resolve_dsn(db: Option<&DatabaseConfig>, args: &CliArgs, base_dir: &Path) -> Result<String> {
    if args.mock {
        return Ok(MEMORY_DSN.to_string());
    }
    let raw = db
        .map(|c| c.url.trim())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| anyhow!("Database URL not configured"))?;
    DbHandle::detect(raw)?;
    if raw.starts_with("sqlite://") {
        absolutize_sqlite_dsn(raw, base_dir)
    } else {
        Ok(raw.to_string())
    }
}

async fn connect_database(config: &AppConfig, args: &CliArgs) -> Result<DbHandle> {
    let base_dir = PathBuf::from(&config.server.home_dir);
    let dsn = resolve_dsn(config.database.as_ref(), args, &base_dir)?;

    let mut opts = ConnectOpts {
        acquire_timeout: Some(Duration::from_secs(5)),
        create_sqlite_dirs: true,
        ..Default::default()
    };
    if let Some(db) = &config.database {
        opts.max_conns = db.max_conns.or(opts.max_conns);
        if let Some(ms) = db.busy_timeout_ms {
            opts.sqlite_busy_timeout_ms = u64::from(ms);
        }
    }

    tracing::info!("Connecting to database: {}", redact_credentials_in_dsn(&dsn));
    let db = DbHandle::connect(&dsn, opts).await?;
    tracing::info!("Connected DB backend: {:?}", db.engine());
    Ok(db)
}

async fn bind_addr(config: &AppConfig) -> Result<SocketAddr> {
    let host = config.server.host.as_str();
    tokio::net::lookup_host((host, config.server.port))
        .await
        .with_context(|| format!("invalid bind address {host}:{}", config.server.port))?
        .next()
        .ok_or_else(|| anyhow!("invalid bind address {host}: no addresses resolved"))
}

fn ingress_config(config: &AppConfig) -> Result<ApiIngressConfig> {
    let mut ingress: ApiIngressConfig = config.module_config("api_ingress")?;
    if config.server.timeout_sec > 0 {
        ingress.request_timeout_sec = config.server.timeout_sec;
    }
    Ok(ingress)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");
    let addr = bind_addr(&config).await?;
    let students_config: StudentsConfig = config.module_config("students")?;
    let ingress = ApiIngress::new(ingress_config(&config)?);

    // A store that cannot be reached is not fatal: resolvers report
    // STORE_UNAVAILABLE until the process is restarted.
    let db = match connect_database(&config, &args).await {
        Ok(db) => Some(db),
        Err(e) => {
            tracing::error!(error = %e, "Database connection failed, serving without a store");
            None
        }
    };
    let students = match &db {
        Some(db) => {
            let conn = db.sea();
            Students::migrate(&conn).await?;
            Students::init(conn, students_config)
        }
        None => Students::unavailable(students_config),
    };
    let router = ingress.build_router(students.router());

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = runtime::wait_for_shutdown().await {
            tracing::warn!(error = %e, "signal handler failed, shutting down");
        }
        signal_cancel.cancel();
    });

    tracing::info!(
        "Students API listening on http://{addr}{}",
        students.config().path
    );
    ingress.serve(addr, router, cancel).await?;

    if let Some(db) = db {
        db.close().await;
    }
    tracing::info!("Students server stopped");
    Ok(())
}

async fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    bind_addr(&config).await?;
    let base_dir = PathBuf::from(&config.server.home_dir);
    let dsn = resolve_dsn(config.database.as_ref(), &args, &base_dir)?;
    tracing::info!("Database DSN: {}", redact_credentials_in_dsn(&dsn));
    ingress_config(&config)?;
    config.module_config::<StudentsConfig>("students")?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
