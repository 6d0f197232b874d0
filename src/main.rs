//! MySQL Audit - account, privilege and server setting audit for MySQL.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mysql_audit::audit::{AuditEngine, CheckKind};
use mysql_audit::config::{
    validate_identifier, AuditOptions, ConfigError, ConfigLoader, ConnectionSettings, FileConfig,
    OptionFile,
};
use mysql_audit::db::MySqlSession;
use mysql_audit::display;

#[derive(Parser)]
#[command(
    name = "mysql-audit",
    about = "Audit a MySQL server's accounts, privileges and global settings",
    version
)]
struct Cli {
    /// MySQL user.
    #[arg(short, long)]
    user: Option<String>,
    /// MySQL host (default: localhost).
    #[arg(short = 'H', long)]
    host: Option<String>,
    /// MySQL password.
    #[arg(short, long)]
    password: Option<String>,
    /// Prompt for password.
    #[arg(long)]
    ask_pass: bool,
    /// TCP/IP port (default: 3306).
    #[arg(short = 'P', long)]
    port: Option<u16>,
    /// Socket file. Only applies when host is localhost.
    #[arg(short = 'S', long)]
    socket: Option<PathBuf>,
    /// Read connection options from a MySQL option file. Overrides all other
    /// connection options.
    #[arg(long)]
    defaults_file: Option<PathBuf>,
    /// Print user friendly messages.
    #[arg(short, long)]
    verbose: bool,
    /// Do not execute. Only print statements.
    #[arg(long)]
    print_only: bool,
    /// Report a failing check and continue with the next one.
    #[arg(long)]
    keep_going: bool,
    /// Checks to leave out (comma separated).
    #[arg(long, value_delimiter = ',')]
    skip: Vec<CheckKind>,
    /// Account table column holding password hashes.
    #[arg(long)]
    password_column: Option<String>,
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Enable debug logging on stderr.
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Merge defaults, config file, command line and option file, in that order.
fn resolve(cli: &Cli) -> Result<(ConnectionSettings, AuditOptions), ConfigError> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    let FileConfig {
        connection: mut settings,
        audit: mut options,
    } = loader.load()?;

    if let Some(user) = &cli.user {
        settings.user.clone_from(user);
    }
    if let Some(host) = &cli.host {
        settings.host.clone_from(host);
    }
    if let Some(password) = &cli.password {
        settings.password = Some(password.clone());
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(socket) = &cli.socket {
        settings.socket = Some(socket.clone());
    }
    if let Some(path) = &cli.defaults_file {
        settings.defaults_file = Some(path.clone());
    }

    options.verbose |= cli.verbose;
    options.print_only |= cli.print_only;
    options.keep_going |= cli.keep_going;
    options.skip.extend(cli.skip.iter().copied());
    if let Some(column) = &cli.password_column {
        validate_identifier("--password-column", column)?;
        options.password_column.clone_from(column);
    }

    if settings.defaults_file.is_some() {
        settings = OptionFile::resolve(settings)?;
    } else if cli.ask_pass {
        let password =
            rpassword::prompt_password("Password: ").map_err(ConfigError::PasswordPrompt)?;
        settings.password = Some(password);
    }

    Ok((settings, options))
}

/// Report a run-ending error on the report stream.
fn report_fatal(error: &dyn std::error::Error) -> ExitCode {
    tracing::debug!(error = ?error, "Audit aborted");
    let mut stdout = io::stdout();
    let _ = writeln!(stdout, "-- ERROR: {error}");
    let _ = stdout.flush();
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let (settings, options) = match resolve(&cli) {
        Ok(resolved) => resolved,
        Err(e) => return report_fatal(&e),
    };
    tracing::info!(
        server = %settings.target(),
        verbose = options.verbose,
        print_only = options.print_only,
        "Starting audit"
    );

    let session = match MySqlSession::connect(&settings).await {
        Ok(session) => session,
        Err(e) => return report_fatal(&e),
    };

    let engine = AuditEngine::new(options);
    let mut stdout = io::stdout().lock();
    let result = engine.run_and_close(session, &mut stdout).await;
    drop(stdout);

    match result {
        Ok(summary) => {
            if engine.options().verbose {
                display::print_summary(&summary);
            }
            ExitCode::SUCCESS
        }
        Err(e) => report_fatal(&e),
    }
}
