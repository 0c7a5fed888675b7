// crates/dockhand-cli/src/main.rs
// ============================================================================
// Module: Dockhand CLI Entry Point
// Description: Command dispatcher for record store migration workflows.
// Purpose: Run, preview, and inspect store migrations from the command line.
// Dependencies: clap, dockhand-config, dockhand-migrator, dockhand-store-sqlite
// ============================================================================

//! ## Overview
//! The Dockhand CLI opens the configured `SQLite` record store and brings it
//! to the schema version the built-in migration registry expects. All
//! user-facing strings are routed through the message catalog. Inputs are
//! untrusted: configuration and overrides are validated before the store is
//! opened.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use dockhand_cli::t;
use dockhand_config::AuditConfig;
use dockhand_config::AuditSinkKind;
use dockhand_config::DockhandConfig;
use dockhand_config::config_toml_example;
use dockhand_migrator::BootstrapConfig;
use dockhand_migrator::CommitPolicy;
use dockhand_migrator::MigrationAuditSink;
use dockhand_migrator::MigrationFileAuditSink;
use dockhand_migrator::MigrationNoopAuditSink;
use dockhand_migrator::MigrationOrchestrator;
use dockhand_migrator::MigrationPlan;
use dockhand_migrator::MigrationStderrAuditSink;
use dockhand_migrator::StepRegistry;
use dockhand_store_sqlite::SqliteRecordStore;
use dockhand_store_sqlite::SqliteStoreError;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "dockhand", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Bring the record store up to the latest schema version.
    Migrate(MigrateCommand),
    /// Record store inspection.
    Store {
        /// Selected store subcommand.
        #[command(subcommand)]
        command: StoreCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Record store subcommands.
#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// Show the stored schema version and pending steps.
    Status(StoreStatusCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a Dockhand configuration file.
    Validate(ConfigValidateCommand),
    /// Print a canonical example configuration.
    Example,
}

/// Store location inputs shared by store-touching commands.
#[derive(Args, Debug, Clone, Default)]
struct StoreLocationArgs {
    /// Optional config file path (defaults to dockhand.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Optional direct `SQLite` store path (overrides config).
    #[arg(long = "store-path", value_name = "PATH")]
    store_path: Option<PathBuf>,
}

/// Arguments for `migrate`.
#[derive(Args, Debug, Default)]
struct MigrateCommand {
    /// Store location inputs.
    #[command(flatten)]
    location: StoreLocationArgs,
    /// List pending steps without applying them.
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
    /// Version commit policy (overrides config).
    #[arg(long, value_enum, value_name = "POLICY")]
    commit_policy: Option<CommitPolicyArg>,
    /// Image used for the in-browser kubectl shell.
    #[arg(long, value_name = "IMAGE")]
    kubectl_shell_image: Option<String>,
    /// Application templates definition URL.
    #[arg(long, value_name = "URL")]
    templates_url: Option<String>,
    /// Helm chart repository URL.
    #[arg(long, value_name = "URL")]
    helm_repository_url: Option<String>,
}

/// Arguments for `store status`.
#[derive(Args, Debug)]
struct StoreStatusCommand {
    /// Store location inputs.
    #[command(flatten)]
    location: StoreLocationArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to dockhand.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Commit policy selector for the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum CommitPolicyArg {
    /// Commit the version after every successful step.
    PerStep,
    /// Commit the version once when the pass ends.
    EndOfPass,
}

impl From<CommitPolicyArg> for CommitPolicy {
    fn from(value: CommitPolicyArg) -> Self {
        match value {
            CommitPolicyArg::PerStep => Self::PerStep,
            CommitPolicyArg::EndOfPass => Self::EndOfPass,
        }
    }
}

/// Output formats for structured commands.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable text.
    Text,
    /// JSON document.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Migrate(command) => command_migrate(&command),
        Commands::Store {
            command,
        } => command_store(command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Migrate Command
// ============================================================================

/// Executes `migrate`.
fn command_migrate(command: &MigrateCommand) -> CliResult<ExitCode> {
    let mut config = load_config(&command.location)?;
    config
        .apply_bootstrap_overrides(&bootstrap_overrides(command))
        .map_err(|err| CliError::new(t!("config.override_failed", error = err)))?;
    if let Some(policy) = command.commit_policy {
        config.migration.commit_policy = policy.into();
    }

    let registry = builtin_registry()?;

    if command.dry_run {
        let store = open_existing_store(&config)?;
        let plan = MigrationOrchestrator::new(&store, &registry, &config.bootstrap)
            .plan()
            .map_err(|err| CliError::new(t!("migrate.plan_failed", error = err)))?;
        write_stdout_line(&render_plan_text(&plan))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let store = open_store(&config)?;
    let audit = build_audit_sink(&config.migration.audit)?;
    let report = MigrationOrchestrator::new(&store, &registry, &config.bootstrap)
        .with_audit(audit.as_ref())
        .with_commit_policy(config.migration.commit_policy)
        .migrate()
        .map_err(|err| CliError::new(t!("migrate.failed", error = err)))?;

    let message = if report.is_noop() {
        t!("migrate.up_to_date", version = report.to)
    } else {
        t!("migrate.done", from = report.from, to = report.to, count = report.applied.len())
    };
    write_stdout_line(&message).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Collects bootstrap overrides supplied on the command line.
fn bootstrap_overrides(command: &MigrateCommand) -> BootstrapConfig {
    BootstrapConfig {
        kubectl_shell_image: command.kubectl_shell_image.clone(),
        templates_url: command.templates_url.clone(),
        helm_repository_url: command.helm_repository_url.clone(),
        ..BootstrapConfig::default()
    }
}

/// Renders a migration plan as text.
fn render_plan_text(plan: &MigrationPlan) -> String {
    if plan.is_current() {
        return t!("migrate.up_to_date", version = plan.current);
    }
    let mut lines = vec![t!(
        "migrate.dry_run.header",
        current = plan.current,
        count = plan.pending.len(),
        target = plan.target
    )];
    for step in &plan.pending {
        lines.push(t!("migrate.step", version = step.version, description = step.description));
    }
    lines.join("\n")
}

// ============================================================================
// SECTION: Store Commands
// ============================================================================

/// Dispatches store subcommands.
fn command_store(command: StoreCommand) -> CliResult<ExitCode> {
    match command {
        StoreCommand::Status(command) => command_store_status(&command),
    }
}

/// Executes `store status`.
fn command_store_status(command: &StoreStatusCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.location)?;
    let store = open_existing_store(&config)?;
    let registry = builtin_registry()?;
    let plan = MigrationOrchestrator::new(&store, &registry, &config.bootstrap)
        .plan()
        .map_err(|err| CliError::new(t!("migrate.plan_failed", error = err)))?;
    let output = StoreStatusOutput::from(&plan);
    let text = match command.format {
        OutputFormat::Text => render_store_status_text(&output),
        OutputFormat::Json => serde_json::to_string_pretty(&output)
            .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?,
    };
    write_stdout_line(&text).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Output for `store status`.
#[derive(Debug, Serialize)]
struct StoreStatusOutput {
    /// Stored schema version.
    current_version: u32,
    /// Latest version known to the registry.
    latest_version: u32,
    /// Versions of steps still to run.
    pending_versions: Vec<u32>,
}

impl From<&MigrationPlan> for StoreStatusOutput {
    fn from(plan: &MigrationPlan) -> Self {
        Self {
            current_version: plan.current.get(),
            latest_version: plan.target.get(),
            pending_versions: plan.pending.iter().map(|step| step.version.get()).collect(),
        }
    }
}

/// Renders `store status` output as text.
fn render_store_status_text(output: &StoreStatusOutput) -> String {
    [
        t!("status.current", version = output.current_version),
        t!("status.latest", version = output.latest_version),
        t!("status.pending", count = output.pending_versions.len()),
    ]
    .join("\n")
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => command_config_example(),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = DockhandConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the canonical example configuration.
fn command_config_example() -> CliResult<ExitCode> {
    write_stdout_line(config_toml_example().trim_end())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Store Helpers
// ============================================================================

/// Loads configuration and applies the direct store path override.
fn load_config(location: &StoreLocationArgs) -> CliResult<DockhandConfig> {
    let mut config = DockhandConfig::load(location.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    if let Some(store_path) = &location.store_path {
        config.store.path.clone_from(store_path);
        config.validate().map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    }
    Ok(config)
}

/// Opens the `SQLite` record store described by `config`.
fn open_store(config: &DockhandConfig) -> CliResult<SqliteRecordStore> {
    SqliteRecordStore::new(config.store.sqlite_config())
        .map_err(|err| CliError::new(t!("store.open_failed", error = err)))
}

/// Opens the record store described by `config` without creating it.
fn open_existing_store(config: &DockhandConfig) -> CliResult<SqliteRecordStore> {
    SqliteRecordStore::open_existing(config.store.sqlite_config()).map_err(|err| match err {
        SqliteStoreError::NotFound(_) => {
            CliError::new(t!("store.not_found", path = config.store.path.display()))
        }
        other => CliError::new(t!("store.open_failed", error = other)),
    })
}

/// Builds the registry shipped with this binary.
fn builtin_registry() -> CliResult<StepRegistry> {
    StepRegistry::builtin().map_err(|err| CliError::new(t!("registry.invalid", error = err)))
}

/// Builds the migration audit sink selected by configuration.
fn build_audit_sink(config: &AuditConfig) -> CliResult<Box<dyn MigrationAuditSink>> {
    match (config.sink, &config.path) {
        (AuditSinkKind::File, Some(path)) => {
            let sink = MigrationFileAuditSink::new(path).map_err(|err| {
                CliError::new(t!("audit.open_failed", path = path.display(), error = err))
            })?;
            Ok(Box::new(sink))
        }
        (AuditSinkKind::File, None) => Err(CliError::new(t!("audit.path_missing"))),
        (AuditSinkKind::None, _) => Ok(Box::new(MigrationNoopAuditSink)),
        (AuditSinkKind::Stderr, _) => Ok(Box::new(MigrationStderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
