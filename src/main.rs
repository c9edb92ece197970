//! Kinyu CLI
//!
//! Command-line front end for the Kinyu dashboard backend:
//! - Check connectivity and health
//! - Manage documents and todos
//! - Trigger workflow checks
//! - Switch the display language

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kinyu::api::{ApiClient, ApiClientError, Endpoint};
use kinyu::backend::{BulkAction, PingTarget, Priority, TodoFilter, TodoInput, TodoUpdate};
use kinyu::config::{generate_default_config, Config, LoggingConfig};
use kinyu::i18n::{missing_keys, Catalogs, LanguageContext, Locale};

#[derive(Parser)]
#[command(name = "kinyu")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for the Kinyu document and todo dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/kinyu/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding config and environment
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show configuration and connection status
    Status,

    /// Timed health check
    Probe,

    /// Backend health report
    #[command(group = clap::ArgGroup::new("view").multiple(false))]
    Health {
        #[arg(long, group = "view")]
        detailed: bool,
        /// Readiness check
        #[arg(long, group = "view")]
        readiness: bool,
        /// Liveness check
        #[arg(long, group = "view")]
        liveness: bool,
        /// Service name, version and routes
        #[arg(long, group = "view")]
        info: bool,
        /// Authentication status
        #[arg(long, group = "view")]
        auth: bool,
    },

    /// Check storage access through the backend's managed identity
    Identity,

    /// Ping a target (service, microsoft, github, internet, dns, connectivity, all)
    Ping {
        #[arg(default_value = "service")]
        target: String,
        /// Ping every target from here, concurrently
        #[arg(long)]
        each: bool,
    },

    /// Document management
    Docs {
        #[command(subcommand)]
        command: DocsCommand,
    },

    /// Todo management
    Todos {
        #[command(subcommand)]
        command: TodosCommand,
    },

    /// Logic App workflow checks
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommand,
    },

    /// Display language
    Lang {
        #[command(subcommand)]
        command: LangCommand,
    },

    /// Translate a key in the current language
    T { key: String },

    /// List every endpoint URL
    Urls,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum DocsCommand {
    List,
    Stats,
    /// Upload files one after another
    Upload { paths: Vec<PathBuf> },
    Download {
        id: u64,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    Delete { id: u64 },
    Process { id: u64 },
    BulkProcess { ids: Vec<u64> },
    /// Generate a SAS URL for a blob
    Sas { blob_name: String },
}

#[derive(Subcommand)]
pub enum TodosCommand {
    List {
        #[arg(long)]
        completed: Option<bool>,
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
    },
    Stats,
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
        #[arg(short, long, default_value = "general")]
        category: String,
        #[arg(long, default_value = "")]
        due: String,
    },
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    Toggle { id: u64 },
    Delete { id: u64 },
    /// Apply complete, incomplete or delete to several todos
    Bulk { action: BulkAction, ids: Vec<u64> },
}

#[derive(Subcommand)]
pub enum WorkflowCommand {
    Status,
    Test,
    Tables,
    ProxyTest,
}

#[derive(Subcommand)]
pub enum LangCommand {
    Show,
    List,
    /// Switch language (vi, en, ja)
    Set { code: String },
    /// Keys missing from a locale compared to the default
    Keys { code: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    init_logging(&config.logging, config.api.debug_mode);

    let catalogs = Arc::new(Catalogs::embedded().context("embedded locale catalogs")?);
    let lang = LanguageContext::load(catalogs, Arc::new(config.locale_store()));
    let client = ApiClient::new(config.api_config())?;
    let mut out = Output {
        lang,
        format: cli.format.clone(),
    };

    match run(cli.command, &client, &mut out).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("✗ {}: {:#}", out.t("common.error"), e);
            std::process::exit(1);
        }
    }
}

fn init_logging(logging: &LoggingConfig, debug: bool) {
    let level = if debug { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kinyu={}", level)));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Localized printing in the selected format
struct Output {
    lang: LanguageContext,
    format: String,
}

impl Output {
    fn t(&self, key: &str) -> String {
        self.lang.t(key)
    }

    fn success(&self, key: &str, detail: Option<&str>) {
        match detail {
            Some(detail) if !detail.is_empty() => println!("✓ {}: {}", self.t(key), detail),
            _ => println!("✓ {}", self.t(key)),
        }
    }

    /// Rejected uploads explain the accepted files, like the upload panel does
    fn upload_failure(&self, path: &Path, err: &ApiClientError) -> String {
        match err {
            ApiClientError::InvalidUpload { file, reason } => format!(
                "{}: {} - {}",
                self.t("fileUpload.uploadError"),
                file,
                self.t(reason.label_key())
            ),
            other => format!(
                "{}: {} ({})",
                self.t("fileUpload.uploadError"),
                path.display(),
                other
            ),
        }
    }

    fn json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Records as json, csv or an aligned table
    fn records<T: Serialize>(
        &self,
        rows: &[T],
        empty_key: &str,
        table: impl Fn(&T) -> Vec<String>,
        headers: &[&str],
    ) -> anyhow::Result<()> {
        match self.format.as_str() {
            "json" => self.json(&rows),
            "csv" => {
                let mut writer = csv::Writer::from_writer(std::io::stdout());
                for row in rows {
                    writer.serialize(row)?;
                }
                writer.flush()?;
                Ok(())
            }
            _ => {
                if rows.is_empty() {
                    println!("{}", self.t(empty_key));
                    return Ok(());
                }
                print_row(headers.iter().map(|h| self.t(h)).collect());
                println!("{}", "-".repeat(headers.len() * 18));
                for row in rows {
                    print_row(table(row));
                }
                Ok(())
            }
        }
    }

    /// Label/value pairs; json format prints `value` instead
    fn pairs<T: Serialize>(&self, value: &T, pairs: &[(&str, String)]) -> anyhow::Result<()> {
        if self.format == "json" {
            return self.json(value);
        }
        for (key, val) in pairs {
            println!("{:<24} {}", format!("{}:", self.t(key)), val);
        }
        Ok(())
    }
}

fn print_row(cells: Vec<String>) {
    let line: Vec<String> = cells.iter().map(|c| format!("{:<16}", c)).collect();
    println!("{}", line.join("  ").trim_end());
}

async fn run(command: Commands, client: &ApiClient, out: &mut Output) -> anyhow::Result<()> {
    match command {
        Commands::Status => {
            let config = client.config();
            println!("{}", out.t("debugger.title"));
            println!();
            println!("{}", out.t("debugger.configuration"));
            println!("  {}: {}", out.t("debugger.baseUrl"), config.base_url);
            let debug_key = if config.debug { "debugger.enabled" } else { "debugger.disabled" };
            println!("  {}: {}", out.t("debugger.debugMode"), out.t(debug_key));
            println!();

            let report = client.probe().await;
            println!("  {}: {}", out.t("debugger.status"), out.t(report.status.label_key()));
            println!("  {}: {} ms", out.t("debugger.responseTime"), report.response_time_ms);
            if let Some(error) = &report.last_error {
                println!("  {}: {}", out.t("debugger.error"), error);
            }
            println!();

            println!("{}", out.t("debugger.testUrls"));
            println!(
                "  {}: {}",
                out.t("debugger.healthCheck"),
                config.display_url(Endpoint::Health.template())
            );
            println!(
                "  {}: {}",
                out.t("debugger.documentsApi"),
                config.display_url(Endpoint::Documents.template())
            );

            if !report.is_connected() {
                std::process::exit(1);
            }
        }

        Commands::Probe => {
            let report = client.probe().await;
            out.pairs(
                &report,
                &[
                    ("debugger.status", out.t(report.status.label_key())),
                    ("debugger.responseTime", format!("{} ms", report.response_time_ms)),
                    (
                        "debugger.error",
                        report.last_error.clone().unwrap_or_else(|| "-".to_string()),
                    ),
                ],
            )?;
            if !report.is_connected() {
                std::process::exit(1);
            }
        }

        Commands::Health {
            detailed,
            readiness,
            liveness,
            info,
            auth,
        } => {
            let system = client.system();
            if readiness || liveness || info || auth {
                let report = if readiness {
                    system.readiness().await?
                } else if liveness {
                    system.liveness().await?
                } else if info {
                    system.api_info().await?
                } else {
                    serde_json::Value::Object(system.auth_status().await?.data)
                };
                return out.json(&report);
            }

            let health = system.health(detailed).await?;
            if out.format == "json" || detailed {
                out.json(&health)?;
            } else {
                let status = health["status"].as_str().unwrap_or("unknown").to_string();
                let uptime = health["uptime"]
                    .as_f64()
                    .map(|s| format_duration(s as u64))
                    .unwrap_or_else(|| "-".to_string());
                println!("{}", out.t("health.title"));
                out.pairs(&health, &[("health.status", status), ("health.uptime", uptime)])?;
            }
        }

        Commands::Identity => {
            let outcome = client.system().managed_identity().await?;
            if out.format == "json" {
                out.json(&outcome.data)?;
            } else {
                println!("{}", out.t("identity.title"));
                out.success("identity.success", outcome.message.as_deref());
                for (field, value) in &outcome.data {
                    match value.as_str() {
                        Some(text) => println!("  {}: {}", field, text),
                        None => println!("  {}: {}", field, value),
                    }
                }
            }
        }

        Commands::Ping { target, each } => {
            if each {
                let results = client.connectivity().ping_each().await;
                let mut failed = 0;
                for (target, result) in &results {
                    match result {
                        Ok(_) => println!("✓ {:<20} {}", target.name(), out.t("ping.online")),
                        Err(e) => {
                            failed += 1;
                            println!("✗ {:<20} {} ({})", target.name(), out.t("ping.offline"), e);
                        }
                    }
                }
                if failed > 0 {
                    std::process::exit(1);
                }
            } else if target.eq_ignore_ascii_case("all") {
                let outcome = client.connectivity().ping_all().await?;
                let report = &outcome.data;
                if out.format == "json" {
                    out.json(report)?;
                } else {
                    out.success("ping.testedEndpoints", Some(report.summary.total.to_string().as_str()));
                    out.records(
                        &report.results,
                        "common.noData",
                        |r| {
                            vec![
                                r.name.clone(),
                                out.t(if r.is_online() { "ping.online" } else { "ping.offline" }),
                                r.response_time
                                    .map(|ms| format!("{:.0} ms", ms))
                                    .unwrap_or_else(|| "-".to_string()),
                                r.error.clone().unwrap_or_default(),
                            ]
                        },
                        &["ping.title", "debugger.status", "debugger.responseTime", "debugger.error"],
                    )?;
                }
            } else {
                let target: PingTarget = target.parse().map_err(anyhow::Error::msg)?;
                let outcome = client.connectivity().ping(target).await?;
                if out.format == "json" {
                    out.json(&outcome.data)?;
                } else {
                    out.success("ping.testSuccess", outcome.message.as_deref());
                }
            }
        }

        Commands::Docs { command } => docs(command, client, out).await?,
        Commands::Todos { command } => todos(command, client, out).await?,
        Commands::Workflow { command } => workflow(command, client, out).await?,

        Commands::Lang { command } => match command {
            LangCommand::Show => {
                let locale = out.lang.locale();
                println!(
                    "{}: {} ({})",
                    out.t("language.current"),
                    out.lang.locale_name(locale),
                    locale.code()
                );
            }
            LangCommand::List => {
                println!("{}:", out.t("language.available"));
                let current = out.lang.locale();
                for &locale in out.lang.supported_locales() {
                    let marker = if locale == current { "*" } else { " " };
                    println!("  {} {}  {}", marker, locale.code(), locale.display_name());
                }
            }
            LangCommand::Set { code } => {
                let locale: Locale = code.parse()?;
                out.lang.change_locale(locale)?;
                out.success("language.changed", Some(locale.display_name()));
            }
            LangCommand::Keys { code } => {
                let catalogs = out.lang.catalogs();
                let target = match code {
                    Some(code) => code.parse::<Locale>()?,
                    None => out.lang.locale(),
                };
                let (Some(reference), Some(other)) =
                    (catalogs.catalog(Locale::default()), catalogs.catalog(target))
                else {
                    anyhow::bail!("no catalog loaded for {}", target);
                };
                let missing = missing_keys(reference, other);
                println!("{} ({}): {}", out.t("language.missingKeys"), target.code(), missing.len());
                for key in missing {
                    println!("  {}", key);
                }
            }
        },

        Commands::T { key } => println!("{}", out.t(&key)),

        Commands::Urls => {
            let config = client.config();
            for endpoint in Endpoint::all() {
                println!(
                    "{:<28} {}",
                    format!("{:?}", endpoint),
                    config.display_url(endpoint.template())
                );
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    out.success("common.saved", Some(path.display().to_string().as_str()));
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

async fn docs(command: DocsCommand, client: &ApiClient, out: &Output) -> anyhow::Result<()> {
    let documents = client.documents();

    match command {
        DocsCommand::List => {
            let list = documents.list().await?.data;
            out.records(
                &list.documents,
                "documents.noDocuments",
                |d| {
                    vec![
                        d.id.to_string(),
                        d.original_name.clone(),
                        d.status.clone(),
                        format_bytes(d.file_size),
                    ]
                },
                &["ID", "documents.title", "debugger.status", "documents.totalSize"],
            )?;
        }
        DocsCommand::Stats => {
            let stats = documents.stats().await?.data;
            let count = |status: &str| stats.by_status.get(status).copied().unwrap_or(0).to_string();
            println!("{}", out.t("documents.statistics"));
            out.pairs(
                &stats,
                &[
                    ("documents.totalDocuments", stats.total.to_string()),
                    ("documents.processed", count("processed")),
                    ("documents.pending", count("uploaded")),
                    ("documents.totalSize", format_bytes(stats.total_size)),
                ],
            )?;
        }
        DocsCommand::Upload { paths } => {
            if paths.is_empty() {
                anyhow::bail!(out.t("fileUpload.noFilesSelected"));
            }
            let mut failed = 0;
            for (path, result) in documents.upload_all(&paths).await {
                match result {
                    Ok(outcome) => out.success(
                        "fileUpload.uploadSuccess",
                        Some(outcome.message.as_deref().unwrap_or(&path.display().to_string())),
                    ),
                    Err(e) => {
                        failed += 1;
                        eprintln!("✗ {}", out.upload_failure(&path, &e));
                    }
                }
            }
            if failed > 0 {
                std::process::exit(1);
            }
        }
        DocsCommand::Download { id, output } => {
            let bytes = documents.download(id).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &bytes).await?;
                    out.success("documents.downloadFile", Some(path.display().to_string().as_str()));
                }
                None => {
                    use std::io::Write;
                    std::io::stdout().write_all(&bytes)?;
                }
            }
        }
        DocsCommand::Delete { id } => {
            let outcome = documents.delete(id).await?;
            out.success("documents.deleteSuccess", outcome.message.as_deref());
        }
        DocsCommand::Process { id } => {
            let outcome = documents.process(id).await?;
            out.success("common.success", outcome.message.as_deref());
        }
        DocsCommand::BulkProcess { ids } => {
            let outcome = documents.bulk_process(&ids).await?;
            out.success("common.success", outcome.message.as_deref());
        }
        DocsCommand::Sas { blob_name } => {
            let sas = documents.sas_url(&blob_name).await?.data;
            if out.format == "json" {
                out.json(&sas)?;
            } else {
                out.success("documents.sasGenerated", Some(sas.sas_url.as_str()));
            }
        }
    }

    Ok(())
}

async fn todos(command: TodosCommand, client: &ApiClient, out: &Output) -> anyhow::Result<()> {
    let todos = client.todos();

    match command {
        TodosCommand::List {
            completed,
            priority,
            category,
            search,
        } => {
            let filter = TodoFilter {
                completed,
                priority,
                category,
                search,
            };
            let list = todos.list(&filter).await?.data;
            out.records(
                &list,
                "todos.noTodos",
                |t| {
                    let state = if t.completed { "todos.completed" } else { "todos.pendingStatus" };
                    vec![
                        t.id.to_string(),
                        t.title.clone(),
                        out.t(t.priority.label_key()),
                        t.category.clone(),
                        out.t(state),
                    ]
                },
                &["ID", "todos.form.title", "todos.form.priority", "todos.form.category", "debugger.status"],
            )?;
        }
        TodosCommand::Stats => {
            let stats = todos.stats().await?.data;
            out.pairs(
                &stats,
                &[
                    ("todos.stats.total", stats.total.to_string()),
                    ("todos.stats.completed", stats.completed.to_string()),
                    ("todos.stats.pending", stats.pending.to_string()),
                    ("todos.stats.categories", stats.total_categories.to_string()),
                ],
            )?;
        }
        TodosCommand::Add {
            title,
            description,
            priority,
            category,
            due,
        } => {
            let input = TodoInput {
                title,
                description,
                priority,
                category,
                due_date: due,
            };
            let outcome = todos.create(&input).await?;
            out.success("todos.createSuccess", outcome.message.as_deref());
        }
        TodosCommand::Update {
            id,
            title,
            description,
            priority,
            category,
            due,
            completed,
        } => {
            let update = TodoUpdate {
                title,
                description,
                priority,
                category,
                due_date: due,
                completed,
            };
            let outcome = todos.update(id, &update).await?;
            out.success("todos.updateSuccess", outcome.message.as_deref());
        }
        TodosCommand::Toggle { id } => {
            let outcome = todos.toggle(id).await?;
            out.success("todos.toggleSuccess", outcome.message.as_deref());
        }
        TodosCommand::Delete { id } => {
            let outcome = todos.delete(id).await?;
            out.success("todos.deleteSuccess", outcome.message.as_deref());
        }
        TodosCommand::Bulk { action, ids } => {
            let outcome = todos.bulk(&ids, action).await?;
            out.success("todos.bulkActionSuccess", Some(outcome.data.to_string().as_str()));
        }
    }

    Ok(())
}

async fn workflow(command: WorkflowCommand, client: &ApiClient, out: &Output) -> anyhow::Result<()> {
    let workflow = client.workflow();

    match command {
        WorkflowCommand::Status => {
            let outcome = workflow.status().await?;
            if out.format == "json" {
                out.json(&outcome.data)?;
            } else {
                out.success("logicApp.statusOk", outcome.message.as_deref());
            }
        }
        WorkflowCommand::Test => match workflow.test().await {
            Ok(outcome) => out.success("logicApp.connectionOk", outcome.message.as_deref()),
            Err(e @ ApiClientError::Backend(_)) => {
                anyhow::bail!("{}: {}", out.t("logicApp.connectionFailed"), e)
            }
            Err(e) => return Err(e.into()),
        },
        WorkflowCommand::Tables => {
            let result = workflow.tables().await?.data;
            if out.format == "json" {
                out.json(&result)?;
            } else {
                out.success("logicApp.tablesRetrieved", Some(result.table_count().to_string().as_str()));
                for table in result.tables.iter().flatten() {
                    match table.as_str() {
                        Some(name) => println!("  {}", name),
                        None => println!("  {}", table),
                    }
                }
            }
        }
        WorkflowCommand::ProxyTest => {
            let result = workflow.proxy_test().await?.data;
            let elapsed = result
                .response_time
                .map(|ms| format!("{:.0} ms", ms))
                .unwrap_or_else(|| "-".to_string());
            out.success("logicApp.connectionOk", Some(elapsed.as_str()));
        }
    }

    Ok(())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
