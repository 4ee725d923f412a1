use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{self, Write},
    mem,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
};

use parking_lot::Mutex;

use crate::log::{
    log_error::{LogError, Result},
    log_level::{LevelFilter, LogLevel},
    log_line,
    output_options::OutputOptions,
};

/// A writer owned by someone else and shared with one or more sinks.
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// A destination the sink writes to but never closes.
#[derive(Clone)]
pub enum Stream {
    Stdout,
    Stderr,
    /// The diagnostic log stream. Routed to standard error.
    Stdlog,
    Writer(SharedWriter),
}

impl Stream {
    /// Wraps any writer so it can be shared between sinks.
    pub fn writer<W: Write + Send + 'static>(w: W) -> Self {
        Stream::Writer(Arc::new(Mutex::new(w)))
    }

    /// Whether this is one of the three console streams. Decided by identity, not by TTY detection.
    #[must_use]
    pub const fn is_console(&self) -> bool {
        matches!(self, Stream::Stdout | Stream::Stderr | Stream::Stdlog)
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => f.write_str("Stdout"),
            Stream::Stderr => f.write_str("Stderr"),
            Stream::Stdlog => f.write_str("Stdlog"),
            Stream::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

enum Binding {
    Unbound,
    Borrowed(Stream),
    /// Opened by the sink; closed when the binding is dropped.
    Owned { path: PathBuf, file: File },
}

impl Binding {
    fn is_console(&self) -> bool {
        matches!(self, Binding::Borrowed(s) if s.is_console())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self {
            Binding::Unbound => Ok(()),
            Binding::Borrowed(Stream::Stdout) => write_flushed(&mut io::stdout().lock(), line),
            Binding::Borrowed(Stream::Stderr | Stream::Stdlog) => {
                write_flushed(&mut io::stderr().lock(), line)
            }
            Binding::Borrowed(Stream::Writer(w)) => write_flushed(&mut *w.lock(), line),
            Binding::Owned { file, .. } => write_flushed(file, line),
        }
    }
}

fn write_flushed<W: Write + ?Sized>(w: &mut W, line: &str) -> io::Result<()> {
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    w.write_all(buf.as_bytes())?;
    w.flush()
}

pub(crate) fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogError::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}

/// One output destination with its own level filter and decoration options.
///
/// Filter and options are atomics and may be changed while other threads log;
/// a change takes effect on the next line. The destination sits behind a mutex
/// so a rebind never interleaves with a write.
///
/// File destinations are opened eagerly, in append mode, and closed exactly
/// once when replaced, unbound, or when the sink is dropped.
pub struct Sink {
    binding: Mutex<Binding>,
    level_filter: AtomicU8,
    options: AtomicU8,
}

impl Sink {
    /// Binds an external stream. Never fails.
    #[must_use]
    pub fn new(stream: Stream, options: OutputOptions, level_filter: LevelFilter) -> Self {
        Self::with_binding(Binding::Borrowed(stream), options, level_filter)
    }

    /// Opens `path` for append (creating it if absent) and owns the handle.
    ///
    /// # Errors
    ///
    /// [`LogError::OpenFile`] if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(
        path: P,
        options: OutputOptions,
        level_filter: LevelFilter,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = open_append(path)?;
        Ok(Self::with_binding(
            Binding::Owned {
                path: path.to_path_buf(),
                file,
            },
            options,
            level_filter,
        ))
    }

    /// A sink with no destination; every write is skipped until it is bound.
    #[must_use]
    pub fn unbound(options: OutputOptions, level_filter: LevelFilter) -> Self {
        Self::with_binding(Binding::Unbound, options, level_filter)
    }

    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Stream::Stdout, OutputOptions::ALL, LevelFilter::ALL)
    }

    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Stream::Stderr, OutputOptions::ALL, LevelFilter::ALL)
    }

    fn with_binding(binding: Binding, options: OutputOptions, level_filter: LevelFilter) -> Self {
        Self {
            binding: Mutex::new(binding),
            level_filter: AtomicU8::new(level_filter.bits()),
            options: AtomicU8::new(options.bits()),
        }
    }

    #[must_use]
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_bits(self.level_filter.load(Ordering::Relaxed))
    }

    pub fn set_level_filter(&self, filter: LevelFilter) {
        self.level_filter.store(filter.bits(), Ordering::Relaxed);
    }

    #[must_use]
    pub fn output_options(&self) -> OutputOptions {
        OutputOptions::from_bits(self.options.load(Ordering::Relaxed))
    }

    pub fn set_output_options(&self, options: OutputOptions) {
        self.options.store(options.bits(), Ordering::Relaxed);
    }

    #[inline]
    #[must_use]
    pub fn accepts(&self, level: LogLevel) -> bool {
        self.level_filter().allows(level)
    }

    /// Switches to an external stream, releasing any file this sink owned.
    pub fn rebind(&self, stream: Stream) {
        self.replace_binding(Binding::Borrowed(stream));
    }

    /// Switches to `path`, opened for append.
    ///
    /// The new file is opened before the current destination is released, so
    /// on failure the sink keeps writing where it did before.
    ///
    /// # Errors
    ///
    /// [`LogError::OpenFile`] if the file cannot be opened.
    pub fn rebind_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = open_append(path)?;
        self.replace_binding(Binding::Owned {
            path: path.to_path_buf(),
            file,
        });
        Ok(())
    }

    /// Releases the destination. Later writes are skipped.
    pub fn unbind(&self) {
        self.replace_binding(Binding::Unbound);
    }

    fn replace_binding(&self, binding: Binding) {
        let old = mem::replace(&mut *self.binding.lock(), binding);
        // Closed outside the lock.
        drop(old);
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        !matches!(*self.binding.lock(), Binding::Unbound)
    }

    /// Whether the sink opened its destination itself.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(*self.binding.lock(), Binding::Owned { .. })
    }

    #[must_use]
    pub fn is_console(&self) -> bool {
        self.binding.lock().is_console()
    }

    /// Path of the owned file, if any.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        match &*self.binding.lock() {
            Binding::Owned { path, .. } => Some(path.clone()),
            _ => None,
        }
    }

    /// Writes `line` plus a newline and flushes. No-op while unbound.
    ///
    /// # Errors
    ///
    /// Any I/O error from the destination.
    pub fn write(&self, line: &str) -> io::Result<()> {
        self.binding.lock().write_line(line)
    }

    /// Decorates and writes one message if `level` passes the filter.
    ///
    /// Colorization is decided against the destination held for this very
    /// write. Returns whether a line was written.
    pub(crate) fn emit(&self, level: LogLevel, timestamp: &str, body: &str) -> io::Result<bool> {
        if !self.accepts(level) {
            return Ok(false);
        }
        let mut binding = self.binding.lock();
        match self.render_for(&binding, level, timestamp, body) {
            Some(line) => {
                binding.write_line(&line)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The line `emit` would write to `binding`, or `None` if it writes nothing.
    fn render_for(
        &self,
        binding: &Binding,
        level: LogLevel,
        timestamp: &str,
        body: &str,
    ) -> Option<String> {
        if !self.accepts(level) || matches!(binding, Binding::Unbound) {
            return None;
        }
        let options = self.output_options();
        let colorize = options.contains(OutputOptions::COLORIZE) && binding.is_console();
        Some(log_line::compose(options, colorize, timestamp, level, body))
    }
}

/// Number of descriptors this process holds open on `path`.
#[cfg(all(test, target_os = "linux"))]
pub(crate) fn open_handle_count(path: &Path) -> usize {
    let Ok(target) = path.canonicalize() else {
        return 0;
    };
    std::fs::read_dir("/proc/self/fd")
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| std::fs::read_link(entry.path()).ok())
                .filter(|link| *link == target)
                .count()
        })
        .unwrap_or(0)
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let destination = match &*self.binding.lock() {
            Binding::Unbound => "unbound".to_string(),
            Binding::Borrowed(s) => format!("{s:?}"),
            Binding::Owned { path, .. } => format!("file {}", path.display()),
        };
        f.debug_struct("Sink")
            .field("destination", &destination)
            .field("level_filter", &self.level_filter())
            .field("options", &self.output_options())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::fs;

    fn capture() -> (Arc<Mutex<Vec<u8>>>, Stream) {
        let buf = Arc::new(Mutex::new(Vec::<u8>::new()));
        let stream = Stream::Writer(buf.clone());
        (buf, stream)
    }

    fn text(buf: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buf.lock().clone()).unwrap()
    }

    #[test]
    fn write_appends_newline() {
        let (buf, stream) = capture();
        let sink = Sink::new(stream, OutputOptions::NONE, LevelFilter::ALL);
        sink.write("one").unwrap();
        sink.write("two").unwrap();
        assert_eq!(text(&buf), "one\ntwo\n");
        assert!(!sink.is_owned());
        assert!(!sink.is_console());
    }

    #[test]
    fn emit_honors_level_filter() {
        let (buf, stream) = capture();
        let sink = Sink::new(stream, OutputOptions::WITH_LEVEL, LogLevel::Error | LogLevel::Fatal);

        assert!(!sink.emit(LogLevel::Info, "ts", "quiet").unwrap());
        assert!(sink.emit(LogLevel::Error, "ts", "loud").unwrap());
        assert_eq!(text(&buf), "[Error] loud\n");
    }

    #[test]
    fn colorize_is_ignored_for_non_console_streams() {
        let (buf, stream) = capture();
        let sink = Sink::new(stream, OutputOptions::ALL, LevelFilter::ALL);
        sink.emit(LogLevel::Warn, "T", "m").unwrap();
        assert_eq!(text(&buf), "T [Warn] m\n");
    }

    #[test]
    fn attribute_changes_apply_to_next_write() {
        let (buf, stream) = capture();
        let sink = Sink::new(stream, OutputOptions::NONE, LevelFilter::NONE);
        assert!(!sink.emit(LogLevel::Info, "T", "dropped").unwrap());

        sink.set_level_filter(LevelFilter::ALL);
        sink.set_output_options(OutputOptions::WITH_TIMESTAMP);
        assert!(sink.emit(LogLevel::Info, "T", "kept").unwrap());
        assert_eq!(text(&buf), "T kept\n");
    }

    #[test]
    fn console_identity() {
        assert!(Sink::stdout().is_console());
        assert!(Sink::stderr().is_console());
        assert!(Sink::new(Stream::Stdlog, OutputOptions::NONE, LevelFilter::ALL).is_console());
    }

    #[test]
    fn file_sink_appends_and_never_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "existing\n").unwrap();

        let sink = Sink::open(&path, OutputOptions::NONE, LevelFilter::ALL).unwrap();
        assert!(sink.is_owned());
        assert_eq!(sink.path().as_deref(), Some(path.as_path()));
        sink.write("appended").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "existing\nappended\n");
    }

    #[test]
    fn open_failure_carries_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("app.log");
        match Sink::open(&path, OutputOptions::NONE, LevelFilter::ALL) {
            Err(LogError::OpenFile { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected OpenFile, got: {:?}", other),
        }
    }

    #[test]
    fn rebind_file_switches_destination() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");

        let sink = Sink::open(&first, OutputOptions::NONE, LevelFilter::ALL).unwrap();
        sink.write("a").unwrap();
        sink.rebind_file(&second).unwrap();
        sink.write("b").unwrap();

        assert_eq!(fs::read_to_string(&first).unwrap(), "a\n");
        assert_eq!(fs::read_to_string(&second).unwrap(), "b\n");
        assert_eq!(sink.path().as_deref(), Some(second.as_path()));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn rebind_and_unbind_close_the_owned_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");

        let sink = Sink::open(&first, OutputOptions::NONE, LevelFilter::ALL).unwrap();
        assert_eq!(open_handle_count(&first), 1);

        sink.rebind_file(&second).unwrap();
        assert_eq!(open_handle_count(&first), 0);
        assert_eq!(open_handle_count(&second), 1);

        let bad = dir.path().join("nope").join("bad.log");
        assert!(sink.rebind_file(&bad).is_err());
        assert_eq!(open_handle_count(&second), 1);

        sink.unbind();
        assert_eq!(open_handle_count(&second), 0);

        let dropped = Sink::open(&first, OutputOptions::NONE, LevelFilter::ALL).unwrap();
        assert_eq!(open_handle_count(&first), 1);
        drop(dropped);
        assert_eq!(open_handle_count(&first), 0);
    }

    #[test]
    fn console_sinks_get_colorized_lines() {
        for stream in [Stream::Stdout, Stream::Stderr, Stream::Stdlog] {
            let sink = Sink::new(
                stream,
                OutputOptions::ALL,
                LogLevel::Warn | LogLevel::Error | LogLevel::Fatal,
            );
            let binding = sink.binding.lock();

            assert_eq!(sink.render_for(&binding, LogLevel::Info, "T", "connected to host1"), None);
            assert_eq!(
                sink.render_for(&binding, LogLevel::Error, "T", "timeout after 500 ms").unwrap(),
                "\x1b[0m\x1b[1;30mT\x1b[0m \x1b[0m\x1b[31m[Error]\x1b[0m timeout after 500 ms"
            );
        }
    }

    #[test]
    fn console_without_colorize_is_plain() {
        let sink = Sink::new(Stream::Stderr, OutputOptions::WITH_LEVEL, LevelFilter::ALL);
        let binding = sink.binding.lock();
        assert_eq!(
            sink.render_for(&binding, LogLevel::Warn, "T", "m").unwrap(),
            "[Warn] m"
        );
    }

    #[test]
    fn file_sink_ignores_colorize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.log");
        let sink = Sink::open(&path, OutputOptions::ALL, LevelFilter::ALL).unwrap();

        {
            let binding = sink.binding.lock();
            assert_eq!(
                sink.render_for(&binding, LogLevel::Error, "T", "boom").unwrap(),
                "T [Error] boom"
            );
        }
        assert!(sink.emit(LogLevel::Error, "T", "boom").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "T [Error] boom\n");
    }

    #[test]
    fn failed_rebind_keeps_previous_destination() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.log");
        let bad = dir.path().join("nope").join("bad.log");

        let sink = Sink::open(&good, OutputOptions::NONE, LevelFilter::ALL).unwrap();
        assert!(matches!(sink.rebind_file(&bad), Err(LogError::OpenFile { .. })));

        sink.write("still here").unwrap();
        assert_eq!(fs::read_to_string(&good).unwrap(), "still here\n");
        assert!(sink.is_owned());
    }

    #[test]
    fn rebind_to_stream_releases_owned_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("owned.log");
        let (buf, stream) = capture();

        let sink = Sink::open(&path, OutputOptions::NONE, LevelFilter::ALL).unwrap();
        sink.rebind(stream);
        assert!(!sink.is_owned());
        assert_eq!(sink.path(), None);

        sink.write("to memory").unwrap();
        assert_eq!(text(&buf), "to memory\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn unbound_sink_skips_writes() {
        let sink = Sink::unbound(OutputOptions::ALL, LevelFilter::ALL);
        assert!(!sink.is_bound());
        sink.write("nowhere").unwrap();
        assert!(!sink.emit(LogLevel::Fatal, "T", "nowhere").unwrap());

        let (buf, stream) = capture();
        sink.rebind(stream);
        sink.unbind();
        sink.write("still nowhere").unwrap();
        assert!(text(&buf).is_empty());
    }
}
