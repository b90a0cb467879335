use std::io::{self, Write};
use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use workdesk::kernel::services::adapters::ensure_log_dir;
use workdesk::kernel::services::ports::WorkspaceSettings;

const DEFAULT_FILTER: &str = "workdesk=info";

/// Keeps the non-blocking writer flushing until dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Writes every event to the log file and copies warnings and errors to
/// stderr.
#[derive(Clone)]
struct TeeMakeWriter {
    file: NonBlocking,
}

enum TeeWriter {
    FileOnly(NonBlocking),
    Mirrored(NonBlocking, io::Stderr),
}

impl<'a> MakeWriter<'a> for TeeMakeWriter {
    type Writer = TeeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        TeeWriter::FileOnly(self.file.make_writer())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        if *meta.level() <= Level::WARN {
            TeeWriter::Mirrored(self.file.make_writer(), io::stderr())
        } else {
            TeeWriter::FileOnly(self.file.make_writer())
        }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            TeeWriter::FileOnly(file) => file.write(buf),
            TeeWriter::Mirrored(file, stderr) => {
                let n = file.write(buf)?;
                let _ = stderr.write_all(&buf[..n]);
                Ok(n)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            TeeWriter::FileOnly(file) => file.flush(),
            TeeWriter::Mirrored(file, stderr) => {
                file.flush()?;
                stderr.flush()
            }
        }
    }
}

pub fn init(settings: &WorkspaceSettings) -> Option<LoggingGuard> {
    let log_dir = ensure_log_dir()
        .or_else(|_| -> std::io::Result<PathBuf> {
            let dir = std::env::temp_dir().join("workdesk").join("logs");
            std::fs::create_dir_all(&dir)?;
            Ok(dir)
        })
        .ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "workdesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let writer = TeeMakeWriter { file: non_blocking };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = settings.log_filter.as_deref().unwrap_or(DEFAULT_FILTER);
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    });

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard { _guard: guard })
}
