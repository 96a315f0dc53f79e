//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `pressure_gate` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Driving a burst of simulated outbound requests through the gate
//! - User-facing output formatting
//!
//! All admission logic is implemented in the library crate.

use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use pressure_gate::config::Opt;
use pressure_gate::initialization::{init_logger_with, init_signal_source};
use pressure_gate::{
    AdmissionError, FixedSignalSource, OutboundGate, PressureConfig, PressureDecelerator,
    RateLimiter, RequestContext, SignalSource,
};

/// Counters for one simulated burst.
#[derive(Debug, Default)]
struct BurstReport {
    admitted: usize,
    downgraded: usize,
    rejected: usize,
    paced: Duration,
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let start = Instant::now();
    match run(&opt).await {
        Ok(report) => {
            println!(
                "✅ Sent {} request{} ({} admitted, {} downgraded, {} rejected) in {:.1}s, paced {}ms total",
                opt.requests,
                if opt.requests == 1 { "" } else { "s" },
                report.admitted,
                report.downgraded,
                report.rejected,
                start.elapsed().as_secs_f64(),
                report.paced.as_millis()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("pressure_gate error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(opt: &Opt) -> Result<BurstReport> {
    let config = PressureConfig::from_json_str(&opt.pressure_config);
    debug!("Pressure config: {:?}", config);

    let source: Arc<dyn SignalSource> = match &opt.signal_url {
        Some(url) => Arc::new(
            init_signal_source(url, Duration::from_secs(opt.timeout_secs))
                .context("Failed to initialize signal source")?,
        ),
        None => Arc::new(FixedSignalSource::new(opt.fixed_sleep_ms)),
    };

    let mut context = RequestContext::new();
    if let Some(tenant) = &opt.tenant {
        context = context.with_tenant(tenant.as_str());
    }

    let decelerator = Arc::new(PressureDecelerator::start(config, context, source));
    let gate = OutboundGate::new(Arc::new(RateLimiter::new(opt.quota)))
        .with_decelerator(Arc::clone(&decelerator))
        .with_downgrade(opt.downgrade);

    info!(
        "Sending {} requests (quota {}, downgrade {})",
        opt.requests, opt.quota, opt.downgrade
    );

    let mut report = BurstReport::default();
    for i in 0..opt.requests {
        let key = opt
            .keys
            .get(i % opt.keys.len().max(1))
            .map(String::as_str)
            .filter(|k| !k.is_empty());

        match gate.admit(key).await {
            Ok(admission) => {
                report.admitted += 1;
                if admission.downgraded {
                    report.downgraded += 1;
                }
                report.paced += admission.paced;
                debug!(
                    "Request {} (key {:?}) admitted after {}ms",
                    i,
                    key,
                    admission.paced.as_millis()
                );
            }
            Err(e @ AdmissionError::QuotaExceeded { .. }) => {
                report.rejected += 1;
                info!("Request {} (key {:?}) rejected: {}", i, key, e);
            }
        }
    }

    decelerator.stop();
    Ok(report)
}
