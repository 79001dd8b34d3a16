//! The export run: fetch, assemble per kind, validate, submit, report.

mod context;

pub use context::{PartnerIds, RunContext};

use std::fmt;

use erp_client::{BackOffice, ErpError};
use serde_json::Value;
use time_tz::Tz;

use crate::assemble::{
    assemble_contracts, assemble_devices, assemble_metering_points, assemble_partners,
    assemble_readings, AssembleOptions, CompanyPrefixes,
};
use crate::schema::{validate, PayloadKind};
use crate::sinks::Transport;

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("source error: {0}")]
    Source(#[from] ErpError),
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
    #[error("unknown time zone '{0}'")]
    UnknownTimeZone(String),
    #[error("unknown magnitude scale '{0}'")]
    UnknownScale(String),
    #[error("invalid value '{value}' for {schema}.{field}")]
    InvalidEnumValue {
        schema: &'static str,
        field: String,
        value: String,
    },
    #[error("{schema}.{field} must be a {expected}")]
    InvalidFieldType {
        schema: &'static str,
        field: String,
        expected: &'static str,
    },
    #[error("{schema}.{field} is required")]
    MissingField { schema: &'static str, field: String },
    #[error("device {0} has no known metering point")]
    UnresolvedDevice(String),
    #[error("metering point {0} was not discovered in this run")]
    UnresolvedMeteringPoint(String),
    #[error("sink error: {0}")]
    Sink(String),
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    fn at(stage: Stage) -> impl FnOnce(PipelineError) -> PipelineError {
        move |e| PipelineError::Stage {
            stage,
            source: Box::new(e),
        }
    }
}

/// Steps of a run, in the only order they happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Readings,
    MeteringPoints,
    Devices,
    Contracts,
    Partners,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetch => "fetch",
            Stage::Readings => "readings",
            Stage::MeteringPoints => "metering points",
            Stage::Devices => "devices",
            Stage::Contracts => "contracts",
            Stage::Partners => "partners",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub kind: PayloadKind,
    pub emitted: usize,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub stages: Vec<StageReport>,
}

impl RunReport {
    pub fn emitted(&self, kind: PayloadKind) -> usize {
        self.stages
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.emitted)
            .sum()
    }

    /// Per-kind totals, as printed at the end of a run.
    pub fn summary(&self) -> String {
        let totals = [
            ("Profiles", PayloadKind::Reading),
            ("CUPS", PayloadKind::MeteringPoint),
            ("Devices", PayloadKind::Device),
            ("Contracts", PayloadKind::Contract),
            ("Partners", PayloadKind::Partner),
        ];

        let mut out = String::from("Total generated:\n");
        for (label, kind) in totals {
            out.push_str(&format!("  {label}: {}\n", self.emitted(kind)));
        }
        out
    }
}

/// Run-wide settings.
#[derive(Clone)]
pub struct ExportSettings {
    /// Maximum number of profiles fetched.
    pub limit: usize,
    /// Zone the back office records wall-clock timestamps in.
    pub time_zone: &'static Tz,
    pub company_prefixes: CompanyPrefixes,
    pub options: AssembleOptions,
}

/// Drives one export run from a back office to a transport.
///
/// Stages run strictly in sequence. A failing stage aborts the run; batches
/// already submitted stay submitted.
pub struct Exporter<B, T> {
    backoffice: B,
    transport: T,
    settings: ExportSettings,
}

impl<B, T> Exporter<B, T>
where
    B: BackOffice,
    T: Transport,
{
    pub fn new(backoffice: B, transport: T, settings: ExportSettings) -> Self {
        Self {
            backoffice,
            transport,
            settings,
        }
    }

    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let settings = &self.settings;
        let options = &settings.options;
        let mut ctx = RunContext::new();
        let mut partners = PartnerIds::new();
        let mut report = RunReport::default();

        let profiles = self
            .backoffice
            .profiles(settings.limit)
            .await
            .map_err(|e| PipelineError::at(Stage::Fetch)(e.into()))?;
        tracing::info!(count = profiles.len(), limit = settings.limit, "fetched profiles");

        let readings = assemble_readings(
            &self.backoffice,
            &mut ctx,
            &profiles,
            settings.time_zone,
            options,
        )
        .await
        .map_err(PipelineError::at(Stage::Readings))?;
        self.submit(Stage::Readings, PayloadKind::Reading, readings, &mut report)
            .await?;

        let point_ids = ctx.metering_point_ids();
        let metering_points = assemble_metering_points(&self.backoffice, &ctx, &point_ids, options)
            .await
            .map_err(PipelineError::at(Stage::MeteringPoints))?;
        self.submit(
            Stage::MeteringPoints,
            PayloadKind::MeteringPoint,
            metering_points,
            &mut report,
        )
        .await?;

        let devices = assemble_devices(&ctx, &ctx.device_ids(), options)
            .map_err(PipelineError::at(Stage::Devices))?;
        self.submit(Stage::Devices, PayloadKind::Device, devices, &mut report)
            .await?;

        let contract_ids = self
            .backoffice
            .contracts_for_metering_points(&ctx.metering_point_records())
            .await
            .map_err(|e| PipelineError::at(Stage::Contracts)(e.into()))?;
        let contracts = assemble_contracts(&self.backoffice, &contract_ids, &mut partners, options)
            .await
            .map_err(PipelineError::at(Stage::Contracts))?;
        self.submit(Stage::Contracts, PayloadKind::Contract, contracts, &mut report)
            .await?;

        let partner_payloads = assemble_partners(
            &self.backoffice,
            partners.as_slice(),
            &settings.company_prefixes,
            options,
        )
        .await
        .map_err(PipelineError::at(Stage::Partners))?;
        self.submit(Stage::Partners, PayloadKind::Partner, partner_payloads, &mut report)
            .await?;

        for stage in &report.stages {
            tracing::info!(
                kind = %stage.kind,
                emitted = stage.emitted,
                status = stage.status,
                "run total"
            );
        }

        Ok(report)
    }

    async fn submit(
        &self,
        stage: Stage,
        kind: PayloadKind,
        payloads: Vec<Value>,
        report: &mut RunReport,
    ) -> Result<(), PipelineError> {
        for payload in &payloads {
            validate(kind.schema(), payload).map_err(PipelineError::at(stage))?;
        }

        let submission = self.transport.submit(kind, &payloads).await.map_err(|e| {
            tracing::error!(%stage, error = %e, "submission failed, aborting run");
            PipelineError::at(stage)(e)
        })?;
        tracing::info!(
            %kind,
            emitted = payloads.len(),
            status = submission.status,
            body = %submission.body,
            "batch submitted"
        );

        report.stages.push(StageReport {
            kind,
            emitted: payloads.len(),
            status: submission.status,
            body: submission.body,
        });
        Ok(())
    }
}
