use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use indicatif::ProgressBar;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub fn log_filter(verbose: u8) -> String {
    let level = match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    format!("pokeview={level}")
}

/// Installs the global fmt subscriber. `RUST_LOG` wins over `verbose`.
///
/// Events go through the returned writer, so attaching the active progress
/// bar keeps log lines from tearing through its redraws.
pub fn init_logging(verbose: u8) -> BarWriter {
    let writer = BarWriter::stderr();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer.clone())
        .with_target(false)
        .try_init();
    writer
}

/// Log sink that suspends the attached progress bar while a line is written.
#[derive(Clone, Debug)]
pub struct BarWriter<M = fn() -> io::Stderr> {
    bar: Arc<Mutex<Option<ProgressBar>>>,
    inner: M,
}

impl BarWriter {
    pub fn stderr() -> Self {
        Self::new(io::stderr)
    }
}

impl<M> BarWriter<M> {
    pub fn new(inner: M) -> Self {
        Self {
            bar: Arc::new(Mutex::new(None)),
            inner,
        }
    }

    pub fn attach(&self, pb: &ProgressBar) {
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(pb.clone());
        }
    }

    pub fn detach(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            *slot = None;
        }
    }

    fn active_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|slot| slot.clone())
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for BarWriter<M> {
    type Writer = BarLine<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        BarLine {
            bar: self.active_bar(),
            inner: self.inner.make_writer(),
            buf: Vec::new(),
        }
    }
}

/// One formatted event. The fmt layer may write it in pieces; it is emitted
/// as a whole on drop.
pub struct BarLine<W: Write> {
    bar: Option<ProgressBar>,
    inner: W,
    buf: Vec<u8>,
}

impl<W: Write> Write for BarLine<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: Write> Drop for BarLine<W> {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let Self { bar, inner, buf } = self;
        let mut emit = || {
            let _ = inner.write_all(buf.as_slice());
            let _ = inner.flush();
        };
        match bar {
            Some(pb) => pb.suspend(emit),
            None => emit(),
        }
    }
}
