// Keyboard-wedge QR scanner adapter.
// Hardware scanners type the decoded payload followed by Enter, so each input
// line is one frame from the decoder.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, oneshot};

use crate::domain::CodeScanner;

// Input lines shared by the console and the scanner; only one holds the lock at a time.
pub type SharedLines = Arc<Mutex<mpsc::Receiver<String>>>;

// Typed on its own line to end a scan session without a code.
pub const CANCEL_SCAN: &str = "cancel";

#[derive(Debug, PartialEq, Eq)]
enum Frame {
    Payload(String),
    Cancel,
    Empty,
}

// Scanners may prefix control characters (GS, STX); they are not part of the payload.
fn decode_frame(line: &str) -> Frame {
    let payload = line.trim().trim_matches(|c: char| c.is_control()).trim();
    if payload.is_empty() {
        Frame::Empty
    } else if payload.eq_ignore_ascii_case(CANCEL_SCAN) {
        Frame::Cancel
    } else {
        Frame::Payload(payload.to_string())
    }
}

#[derive(Clone)]
pub struct LineScanner {
    lines: SharedLines,
    enabled: bool,
}

impl LineScanner {
    pub fn new(lines: SharedLines, enabled: bool) -> Self {
        Self { lines, enabled }
    }
}

#[async_trait]
impl CodeScanner for LineScanner {
    async fn request_permission(&self) -> bool {
        self.enabled
    }

    async fn scan(&self) -> Result<Option<String>, String> {
        let (result_tx, result_rx) = oneshot::channel();
        let lines = Arc::clone(&self.lines);

        // Each scan session runs on its own task and reports at most one result.
        let session = tokio::spawn(async move {
            let mut lines = lines.lock().await;
            while let Some(line) = lines.recv().await {
                match decode_frame(&line) {
                    Frame::Payload(code) => {
                        tracing::debug!(code = %code, "scanned QR code.");
                        let _ = result_tx.send(Some(code));
                        return;
                    }
                    Frame::Cancel => {
                        let _ = result_tx.send(None);
                        return;
                    }
                    Frame::Empty => continue,
                }
            }
            // Input closed before a code arrived.
            let _ = result_tx.send(None);
        });

        let result = result_rx
            .await
            .map_err(|_| "scan session ended without reporting".to_string());
        if let Err(err) = session.await {
            tracing::error!(error = %err, "scan session task failed.");
        }
        result
    }
}
