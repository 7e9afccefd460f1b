// Small helpers shared by the stage and the demo host

use std::io;
use std::sync::Arc;

use tracing::Level;
use wasm_bindgen::JsValue;

/// Parses the longest leading decimal number of `raw`, the way authoring
/// tools hand over sizes ("37.5", " 12px", "1e2%"). `None` when no digits lead.
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

pub fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

type Sink = Arc<dyn Fn(&str) + Send + Sync>;

/// Collects one formatted event and hands it to the sink on drop.
struct LineWriter {
    buf: Vec<u8>,
    sink: Sink,
}

impl io::Write for LineWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if !line.is_empty() {
            (self.sink)(line);
        }
    }
}

/// `tracing` subscriber printing debug and above, one event per sink call.
/// No timestamps: the system clock is unavailable on wasm.
pub fn console_subscriber(
    sink: impl Fn(&str) + Send + Sync + 'static,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    let sink: Sink = Arc::new(sink);
    tracing_subscriber::fmt()
        .with_writer(move || LineWriter { buf: Vec::new(), sink: sink.clone() })
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .without_time()
        .finish()
}

/// Routes library diagnostics to the browser console through `clog`.
pub fn init_tracing() {
    if tracing::subscriber::set_global_default(console_subscriber(clog)).is_err() {
        clog("tracing subscriber already installed");
    }
}


#[cfg(test)]
mod subscriber_tests {
    use super::console_subscriber;
    use std::sync::{Arc, Mutex};

    #[test]
    fn each_event_is_one_trimmed_line() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = lines.clone();
        let subscriber = console_subscriber(move |line: &str| {
            sink_lines.lock().expect("lock").push(line.to_string())
        });
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("first");
            tracing::trace!("below the level");
            tracing::warn!("second");
        });
        let lines = lines.lock().expect("lock");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("DEBUG") && lines[0].ends_with("first"));
        assert!(lines[1].contains("WARN") && lines[1].ends_with("second"));
    }
}
