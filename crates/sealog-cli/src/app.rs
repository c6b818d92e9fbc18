use std::io::Write;

use anyhow::Context;
use tokio::io::BufReader;
use tracing::{error, info};

use sealog_core::pipeline;
use sealog_core::replay::{Replay, ReplayRecord, ReplaySummary};
use sealog_core::shutdown::{ShutdownCoordinator, TerminationSignals};
use sealog_core::storage::{DurableWriter, SharedWriter};
use sealog_core::throttle::RateLimiter;
use sealog_core::SealogError;

use crate::cli::OutputFormat;
use crate::constants::exit_codes;
use crate::settings::Settings;

/// Read stdin into the output file until end of input or a termination signal.
pub fn run_ingest(settings: &Settings) -> anyhow::Result<i32> {
    let codec = settings.codec()?;
    let writer = DurableWriter::create(&settings.file_path, settings.buffer_size)
        .with_context(|| format!("Failed to create {}", settings.file_path.display()))?;
    let writer = SharedWriter::new(writer);

    info!(
        path = %settings.file_path.display(),
        encrypted = codec.is_sealed(),
        flow_speed = settings.flow_speed,
        buffer_size = settings.buffer_size,
        "Logging stdin"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(async {
        let mut signals = TerminationSignals::register()?;
        let (coordinator, shutdown) = ShutdownCoordinator::new(writer.clone());
        let shutdown_task = tokio::spawn(coordinator.run(async move {
            let name = signals.recv().await;
            info!(signal = name, "Received termination signal");
        }));

        let mut limiter = RateLimiter::new(settings.flow_speed);
        let stdin = BufReader::new(tokio::io::stdin());
        let stats = pipeline::run(stdin, &mut limiter, &codec, &writer, shutdown).await?;

        if stats.stopped_by_shutdown {
            shutdown_task.await.context("Shutdown task failed")??;
        } else {
            shutdown_task.abort();
        }
        Ok::<_, anyhow::Error>(exit_codes::SUCCESS)
    });

    // A blocked stdin read must not keep the process alive after shutdown.
    runtime.shutdown_background();
    result
}

/// Decode the output file and print every record.
pub fn run_replay(settings: &Settings, format: OutputFormat) -> anyhow::Result<i32> {
    let codec = settings.codec()?;
    let replay = Replay::open(&settings.file_path, &codec)
        .with_context(|| format!("Failed to open {}", settings.file_path.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut summary = ReplaySummary::default();

    for record in replay {
        let record = record.context("Failed to read record")?;
        summary.record(&record);
        match format {
            OutputFormat::Text => print_text(&mut out, &record)?,
            OutputFormat::Json => print_json(&mut out, &record)?,
        }
    }
    out.flush()?;

    if summary.all_ok() {
        info!(records = summary.ok, "Replay finished");
        Ok(exit_codes::SUCCESS)
    } else {
        error!(
            ok = summary.ok,
            failed = summary.failed,
            "Some records could not be decoded"
        );
        Ok(exit_codes::AUTH_FAILED)
    }
}

fn print_text(out: &mut impl Write, record: &ReplayRecord) -> anyhow::Result<()> {
    writeln!(out, "{}", String::from_utf8_lossy(&record.encoded))?;
    match &record.decoded {
        Ok(line) => writeln!(out, "{}", String::from_utf8_lossy(line))?,
        Err(e) => writeln!(out, "<line {}: {}>", record.line, e)?,
    }
    writeln!(out, "---")?;
    Ok(())
}

fn print_json(out: &mut impl Write, record: &ReplayRecord) -> anyhow::Result<()> {
    let (decoded, error) = match &record.decoded {
        Ok(line) => (Some(String::from_utf8_lossy(line).into_owned()), None),
        Err(e) => (None, Some(e.to_string())),
    };
    let value = serde_json::json!({
        "line": record.line,
        "encoded": String::from_utf8_lossy(&record.encoded),
        "decoded": decoded,
        "error": error,
    });
    writeln!(out, "{}", value)?;
    Ok(())
}

/// Exit code for a fatal error.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<SealogError>() {
        Some(SealogError::InvalidInput(_)) | Some(SealogError::Config(_)) => {
            exit_codes::INVALID_INPUT
        }
        _ => exit_codes::FAILURE,
    }
}
