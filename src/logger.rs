use std::time::Instant;

use crate::routines::output::OutputFile;
use crate::routines::settings::Settings;
use eyre::Result;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber for a CRM run
///
/// Events are filtered by `settings.log.level`, which accepts any `EnvFilter` directive
/// (`"debug"`, `"crmcore=trace"`, ...). Every event goes to stdout with the elapsed run time.
/// With `settings.log.write`, the same events are also written without colour codes to
/// `settings.log.file` inside `settings.output.path`.
///
/// Only the first call in a process installs a subscriber. Later calls, or a subscriber set by
/// the embedding application, leave the existing one in place.
pub fn setup_log(settings: &Settings) -> Result<()> {
    let env_filter = EnvFilter::new(settings.log.level.as_str());

    let timestamper = CompactTimestamp {
        start: Instant::now(),
    };

    let subscriber = Registry::default().with(env_filter);

    // Plain-text copy in the output folder
    let file_layer = match settings.log.write {
        true => {
            let outputfile = OutputFile::new(&settings.output.path, &settings.log.file)?;
            Some(
                fmt::layer()
                    .with_writer(outputfile.file_owned())
                    .with_ansi(false)
                    .with_timer(timestamper.clone()),
            )
        }
        false => None,
    };

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(false)
        .with_timer(timestamper);

    if subscriber.with(file_layer).with(stdout_layer).try_init().is_err() {
        tracing::debug!("A global subscriber is already set, keeping the existing one");
    }

    Ok(())
}

/// Time since `setup_log` was called, as `00h 00m 00s`
#[derive(Clone)]
struct CompactTimestamp {
    start: Instant,
}

impl FormatTime for CompactTimestamp {
    fn format_time(
        &self,
        w: &mut tracing_subscriber::fmt::format::Writer<'_>,
    ) -> Result<(), std::fmt::Error> {
        let elapsed = self.start.elapsed();
        let hours = elapsed.as_secs() / 3600;
        let minutes = (elapsed.as_secs() % 3600) / 60;
        let seconds = elapsed.as_secs() % 60;

        write!(w, "{:02}h {:02}m {:02}s", hours, minutes, seconds)
    }
}
