//! `init_tracing` next to a subscriber the host already installed.
//!
//! Kept in its own binary: it owns the process-wide subscriber and `RUST_LOG`.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;

#[derive(Clone)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn existing_subscriber_is_kept_and_the_refusal_logged() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Capture(Arc::clone(&log));
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || sink.clone())
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    std::env::set_var("RUST_LOG", "debug");
    furrow_parse::init_tracing();
    furrow_parse::init_tracing();

    let output = String::from_utf8(log.lock().clone()).unwrap();
    assert_eq!(
        output
            .matches("keeping the existing tracing subscriber")
            .count(),
        1,
        "{output}"
    );
}
