use std::fmt;
use std::path::Path;
use anyhow::Context;
use fnv::FnvHashMap;

pub use anyhow::Result;
pub use drone_instances::dataset::{Arc, DroneInstance, Loc};

pub mod energy;
pub mod table;

pub use energy::EnergyModel;
pub use table::ArcEnergy;

pub type Map<K, V> = FnvHashMap<K, V>;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Error {
    /// Energy requested for a non-positive (or non-finite) ground speed.
    DegenerateArc { ground_speed: f64 },
    SpeedOutOfBounds { ground_speed: f64, v_min: f64, v_max: f64 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for Error {}


mod logging_setup {
    use super::*;
    use tracing::Dispatch;
    use tracing_subscriber::{EnvFilter, fmt, registry, prelude::*};
    use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
    use std::fs::OpenOptions;

    /// Filter used when `RUST_LOG` is unset or unparseable.
    pub const DEFAULT_LOG_FILTER: &str = "info";

    /// Build the subscriber without installing it: human-readable events on stderr, plus JSON
    /// lines (one per event, with the enclosing spans) to `logfile` if given. Events from
    /// `ArcEnergy::compute` carry the instance id in their span.
    pub fn log_dispatch(logfile: Option<&Path>, filter: EnvFilter) -> Result<(Dispatch, Option<WorkerGuard>)> {
        let r = registry().with(fmt::layer()).with(filter);

        match logfile {
            Some(p) => {
                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(p)
                    .with_context(|| format!("unable to open log file {:?}", p))?;
                let (writer, guard) = non_blocking::NonBlockingBuilder::default()
                    .lossy(false)
                    .finish(file);
                let json = fmt::layer()
                    .json()
                    .with_span_list(true)
                    .with_current_span(false)
                    .with_writer(writer);
                Ok((Dispatch::new(r.with(json)), Some(guard)))
            },
            None => Ok((Dispatch::new(r), None)),
        }
    }

    /// Install the global subscriber, filtered by `RUST_LOG` (default [`DEFAULT_LOG_FILTER`]).
    /// Keep the returned guard alive until exit so the log file is flushed.
    pub fn init_logging(logfile: Option<impl AsRef<Path>>) -> Result<Option<WorkerGuard>> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        let (dispatch, guard) = log_dispatch(logfile.as_ref().map(AsRef::as_ref), filter)?;
        tracing::dispatcher::set_global_default(dispatch)
            .context("a global subscriber is already installed")?;
        Ok(guard)
    }

    #[allow(dead_code)]
    pub(crate) fn init_test_logging() {
        init_logging(None::<&str>).ok();
    }
}
pub use logging_setup::*;
