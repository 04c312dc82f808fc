use std::{
    env,
    io::{self, Write},
    path::Path,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt::MakeWriter, prelude::*, registry, EnvFilter};

const DEFAULT_LOG_FILE: &str = "/tmp/poridhictl.log";

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
    Off,
}

impl LogOutput {
    fn parse(value: &str) -> Self {
        match value {
            "console" => LogOutput::Console,
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            _ => LogOutput::Off,
        }
    }

    fn console(self) -> bool {
        matches!(self, LogOutput::Console | LogOutput::Both)
    }

    fn file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::Both)
    }
}

/// Logging settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub output: LogOutput,
    pub json: bool,
    pub file_path: String,
}

impl LogSettings {
    /// Reads `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT` and `LOG_FILE_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            output: LogOutput::parse(
                &lookup("LOG_OUTPUT").unwrap_or_else(|| "console".to_string()),
            ),
            json: lookup("LOG_FORMAT").is_some_and(|f| f == "json"),
            file_path: lookup("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        }
    }
}

// Writes every line to both sinks, whole, exactly once each.
struct Tee<A, B> {
    a: A,
    b: B,
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // A failing console must not cost the file its copy.
        let res_a = self.a.write_all(buf);
        let res_b = self.b.write_all(buf);
        res_a.and(res_b).map(|()| buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.a.flush()?;
        self.b.flush()
    }
}

#[derive(Clone)]
struct MakeTee<A, B> {
    make_a: A,
    make_b: B,
}

impl<'a, A, B> MakeWriter<'a> for MakeTee<A, B>
where
    A: MakeWriter<'a>,
    B: MakeWriter<'a>,
{
    type Writer = Tee<A::Writer, B::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        Tee {
            a: self.make_a.make_writer(),
            b: self.make_b.make_writer(),
        }
    }
}

fn install<W>(filter: EnvFilter, writer: W, json: bool)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(false);
    let subscriber = registry().with(filter);
    if json {
        subscriber.with(fmt_layer.json()).init();
    } else {
        subscriber.with(fmt_layer.compact()).init();
    }
}

/// Initializes the global tracing subscriber based on environment variables.
pub fn init_subscriber() -> Option<WorkerGuard> {
    init_with(LogSettings::from_env())
}

/// Initializes the global tracing subscriber from explicit settings.
///
/// Console logs go to stderr; stdout is reserved for command results. The
/// returned guard must be held until exit so buffered file logs are flushed.
pub fn init_with(settings: LogSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let log_path = Path::new(&settings.file_path);
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("/tmp"));
    let log_filename = log_path
        .file_name()
        .unwrap_or_else(|| "poridhictl.log".as_ref());

    match (settings.output.console(), settings.output.file()) {
        (true, true) => {
            let appender = tracing_appender::rolling::daily(log_dir, log_filename);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let tee = MakeTee {
                make_a: io::stderr,
                make_b: non_blocking,
            };
            install(filter, tee, settings.json);
            Some(guard)
        }
        (true, false) => {
            install(filter, io::stderr, settings.json);
            None
        }
        (false, true) => {
            let appender = tracing_appender::rolling::daily(log_dir, log_filename);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            install(filter, non_blocking, settings.json);
            Some(guard)
        }
        (false, false) => {
            registry().with(filter).init();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> LogSettings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogSettings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.level, "info");
        assert_eq!(s.output, LogOutput::Console);
        assert!(!s.json);
        assert_eq!(s.file_path, DEFAULT_LOG_FILE);
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("LOG_LEVEL", "debug"),
            ("LOG_OUTPUT", "both"),
            ("LOG_FORMAT", "json"),
            ("LOG_FILE_PATH", "/var/log/pctl.log"),
        ]);
        assert_eq!(s.level, "debug");
        assert_eq!(s.output, LogOutput::Both);
        assert!(s.json);
        assert_eq!(s.file_path, "/var/log/pctl.log");
    }

    #[test]
    fn test_unknown_output_disables_layers() {
        let s = settings(&[("LOG_OUTPUT", "nowhere")]);
        assert!(!s.output.console());
        assert!(!s.output.file());
    }

    // Accepts at most two bytes per call.
    struct Trickle(Vec<u8>);

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(2);
            self.0.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tee_short_write_does_not_duplicate() {
        let mut tee = Tee {
            a: Trickle(Vec::new()),
            b: Vec::new(),
        };
        tee.write_all(b"one line\n").unwrap();
        assert_eq!(tee.a.0, b"one line\n");
        assert_eq!(tee.b, b"one line\n");
    }

    #[test]
    fn test_tee_writes_both_sinks() {
        let mut tee = Tee {
            a: Vec::new(),
            b: Vec::new(),
        };
        tee.write_all(b"line\n").unwrap();
        tee.flush().unwrap();
        assert_eq!(tee.a, b"line\n");
        assert_eq!(tee.b, b"line\n");
    }
}
