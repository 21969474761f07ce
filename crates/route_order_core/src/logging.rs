use std::{fs::File, io::Write};

use env_logger::{Builder, Target, fmt::Formatter};
use log::{Level, Record};

use crate::{Error, Result, SolverOptions, options::LogFormat};

/// Installs the global logger described by `options`.
///
/// `pretty` lines carry the emitting module and the rayon worker, so branch
/// logs from the parallel exhaustive search can be told apart.
pub fn init_logger(options: &SolverOptions) -> Result<()> {
    let log_format = options.log_format;
    let log_timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(env_logger::WriteStyle::Never)
        .format(move |buf: &mut Formatter, record| {
            if log_timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            write_record(buf, log_format, record)
        });

    let target = match options.log_output_path() {
        Some(log_path) => {
            let log_file = File::create(log_path).map_err(|e| {
                Error::other(format!(
                    "failed to create log output file {}: {e}",
                    log_path.display()
                ))
            })?;
            Target::Pipe(Box::new(log_file))
        }
        None => Target::Stderr,
    };
    builder.target(target);

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

fn write_record(out: &mut impl Write, format: LogFormat, record: &Record) -> std::io::Result<()> {
    let level = level_tag(record.level());
    match format {
        LogFormat::Compact => writeln!(out, "{level:<5} {}", record.args()),
        LogFormat::Pretty => writeln!(
            out,
            "{level:<5} [{}] ({}) {}",
            record.module_path().unwrap_or_else(|| record.target()),
            worker_tag(rayon::current_thread_index()),
            record.args()
        ),
    }
}

/// `main` off the pool, `w<N>` on rayon worker `N`.
fn worker_tag(index: Option<usize>) -> String {
    index.map_or_else(|| "main".to_string(), |idx| format!("w{idx}"))
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
