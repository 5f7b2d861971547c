use clap::Parser;
use pkg_constants::naming::{DEFAULT_OPERAND_NAMESPACE, DEFAULT_OPERATOR_NAMESPACE};
use pkg_constants::paths::{DEFAULT_DATA_DIR, DEFAULT_OPERATOR_CONFIG};
use pkg_constants::state::DEFAULT_RESYNC_INTERVAL_SECS;
use pkg_controllers::externaldns::ExternalDnsController;
use pkg_controllers::rbac::RbacReconciler;
use pkg_state::client::StateStore;
use pkg_state::objects::StoreClient;
use pkg_types::config::{OperatorConfigFile, load_config_file};
use pkg_types::scheme::Scheme;
use pkg_types::validate::validate_name;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "extdns-operator",
    about = "Keeps the RBAC objects of ExternalDNS operands converged"
)]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = DEFAULT_OPERATOR_CONFIG)]
    config: String,

    /// Namespace where ExternalDNS operands run
    #[arg(long)]
    operand_namespace: Option<String>,

    /// Namespace where the operator's service account lives
    #[arg(long)]
    operator_namespace: Option<String>,

    /// Directory for SlateDB state storage
    #[arg(long)]
    data_dir: Option<String>,

    /// Seconds between reconciliation passes
    #[arg(long)]
    resync_interval_secs: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    // Load config file (returns defaults if file not found)
    let file_cfg: OperatorConfigFile = load_config_file(&cli.config)?;
    info!("Config file: {}", cli.config);

    // Merge: CLI args > config file > defaults
    let operand_namespace = cli
        .operand_namespace
        .or(file_cfg.operand_namespace)
        .unwrap_or_else(|| DEFAULT_OPERAND_NAMESPACE.to_string());
    let operator_namespace = cli
        .operator_namespace
        .or(file_cfg.operator_namespace)
        .unwrap_or_else(|| DEFAULT_OPERATOR_NAMESPACE.to_string());
    let data_dir = cli
        .data_dir
        .or(file_cfg.data_dir)
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    let resync = cli
        .resync_interval_secs
        .or(file_cfg.resync_interval_secs)
        .unwrap_or(DEFAULT_RESYNC_INTERVAL_SECS)
        .max(1);

    validate_name(&operand_namespace)?;
    validate_name(&operator_namespace)?;

    info!("Starting extdns-operator");
    info!("  Operand namespace:  {}", operand_namespace);
    info!("  Operator namespace: {}", operator_namespace);
    info!("  Data dir:           {}", data_dir);
    info!("  Resync interval:    {}s", resync);

    let scheme = Arc::new(Scheme::operator()?);
    let store = StateStore::new(&data_dir).await?;
    let client = StoreClient::new(store.clone(), scheme);

    let reconciler = RbacReconciler::new(client, operand_namespace, operator_namespace);
    let handle = ExternalDnsController::new(reconciler, Duration::from_secs(resync)).start();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    handle.abort();
    store.close().await?;
    Ok(())
}
