//! Telemetry initialization.
//!
//! Controlled by `RANKDRILL_LOG`:
//! - unset or empty → no-op (no subscriber installed, zero overhead)
//! - `"stderr"` → JSON events to stderr, filtered by `RUST_LOG` (default `info`)
//!
//! Any other value is treated as `"stderr"` after a warning.
//!
//! When a subscriber is installed, dropping the guard emits a final
//! `run finished` event carrying the elapsed time.

use std::time::Instant;

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log sink.
pub const LOG_ENV: &str = "RANKDRILL_LOG";

/// Opaque guard held in `main()` until exit. Dropping it logs the end of
/// the run.
#[must_use = "hold the guard until the program exits"]
pub struct TelemetryGuard {
    started: Option<Instant>,
}

impl TelemetryGuard {
    const fn disabled() -> Self {
        Self { started: None }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(started) = self.started.take() {
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            tracing::info!(elapsed_ms, "run finished");
        }
    }
}

/// Initialize telemetry based on `RANKDRILL_LOG`.
pub fn init() -> TelemetryGuard {
    let sink = std::env::var(LOG_ENV).ok();

    match sink.as_deref() {
        None | Some("") => TelemetryGuard::disabled(),
        Some("stderr") => init_stderr(),
        Some(other) => {
            eprintln!("warning: unknown {LOG_ENV} value '{other}', logging to stderr");
            init_stderr()
        }
    }
}

/// JSON events to stderr via tracing-subscriber's JSON formatter.
fn init_stderr() -> TelemetryGuard {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE),
        )
        .try_init()
        .is_ok();

    if installed {
        TelemetryGuard {
            started: Some(Instant::now()),
        }
    } else {
        TelemetryGuard::disabled()
    }
}
