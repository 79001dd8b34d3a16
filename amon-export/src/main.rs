use amon_export::{
    assemble::AssembleOptions,
    config::{AppConfig, BackendKind},
    metrics_server,
    observability,
    pipeline::{ExportSettings, Exporter},
    sinks::HttpTransport,
    sources::FixtureBackOffice,
    transform,
};
use anyhow::{anyhow, Result};
use clap::Parser;
use erp_client::db::PgBackOffice;

/// Export back-office readings, supply points, devices, contracts and
/// partners as AMON payloads.
#[derive(Parser, Debug)]
#[command(name = "amon-export", version)]
struct Cli {
    /// Maximum number of profile readings fetched this run.
    #[arg(default_value_t = 80)]
    limit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();
    let cli = Cli::parse();

    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let time_zone = transform::resolve_time_zone(&cfg.erp.source_timezone)?;
    let transport = HttpTransport::new(cfg.transport.url.clone(), cfg.transport.encoding);
    tracing::info!(
        url = transport.url(),
        encoding = ?cfg.transport.encoding,
        "submitting to receiver"
    );

    let settings = ExportSettings {
        limit: cli.limit,
        time_zone,
        company_prefixes: cfg.partners.company_prefixes.clone(),
        options: AssembleOptions::default(),
    };

    let report = match cfg.erp.backend {
        BackendKind::Postgres => {
            tracing::info!(settings = ?cfg.connection, "connecting to back office");
            let backoffice =
                PgBackOffice::connect(cfg.connection.pg_options(), cfg.erp.max_connections)
                    .await?;
            Exporter::new(backoffice, transport, settings).run().await?
        }
        BackendKind::Fixture => {
            let path = cfg
                .erp
                .fixture_path
                .as_ref()
                .ok_or_else(|| anyhow!("erp.fixture_path is required for the fixture backend"))?;
            tracing::info!(path = %path.display(), "reading back-office snapshot");
            let backoffice = FixtureBackOffice::from_path(path)?;
            Exporter::new(backoffice, transport, settings).run().await?
        }
    };

    print!("{}", report.summary());

    Ok(())
}
