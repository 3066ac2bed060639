//! Line-oriented log sinks.

use std::fmt::Display;
use std::io::{self, BufRead};
use tracing::{debug, error, warn};

/// Logs each line of `reader` at debug level until end of input.
///
/// # Errors
///
/// Returns the first read error.
pub fn debug_sink<R: BufRead>(reader: R) -> io::Result<()> {
    forward_lines(reader, |line| debug!(target: "hearth::sink", "{line}"))
}

/// Logs each line of `reader` at warn level until end of input.
///
/// # Errors
///
/// Returns the first read error.
pub fn warn_sink<R: BufRead>(reader: R) -> io::Result<()> {
    forward_lines(reader, |line| warn!(target: "hearth::sink", "{line}"))
}

/// Logs each line of `reader` at error level until end of input.
///
/// # Errors
///
/// Returns the first read error.
pub fn error_sink<R: BufRead>(reader: R) -> io::Result<()> {
    forward_lines(reader, |line| error!(target: "hearth::sink", "{line}"))
}

/// Logs `message` at error level and exits the process with status 1.
pub fn fatal(message: impl Display) -> ! {
    error!("{message}");
    std::process::exit(1)
}

fn forward_lines<R: BufRead>(mut reader: R, mut emit: impl FnMut(&str)) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        emit(line.trim_end_matches(['\n', '\r']));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(max: tracing::Level, f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_max_level(max)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        captured.contents()
    }

    #[test]
    fn warn_sink_forwards_every_line() {
        let output = capture(tracing::Level::TRACE, || {
            warn_sink(Cursor::new("first\nsecond\r\nthird")).unwrap();
        });

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("WARN") && lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
        assert!(lines[2].ends_with("third"));
    }

    #[test]
    fn debug_sink_is_filtered_by_level() {
        let output = capture(tracing::Level::INFO, || {
            debug_sink(Cursor::new("hidden\n")).unwrap();
        });
        assert!(output.is_empty());
    }

    #[test]
    fn error_sink_tolerates_invalid_utf8() {
        let output = capture(tracing::Level::TRACE, || {
            error_sink(Cursor::new(b"bad \xff byte\n".to_vec())).unwrap();
        });
        assert!(output.contains("ERROR"));
        assert!(output.contains("bad"));
    }

    #[test]
    fn empty_input_logs_nothing() {
        let output = capture(tracing::Level::TRACE, || {
            warn_sink(Cursor::new("")).unwrap();
        });
        assert!(output.is_empty());
    }
}
