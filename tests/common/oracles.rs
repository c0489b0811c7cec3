// Deterministic oracle stubs for scenario tests

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

use aether::model::language::Language;
use aether::services::oracle::{Oracle, OracleReply};

/// Replies instantly with configured text, recording every request.
pub struct RecordingOracle {
    run_reply: String,
    explain_reply: String,
    fix_reply: String,
    pub runs: Mutex<Vec<(String, Language)>>,
    pub explains: Mutex<Vec<String>>,
    pub fixes: Mutex<Vec<(String, String)>>,
}

impl RecordingOracle {
    pub fn new() -> Arc<Self> {
        Self::with_replies("ran", "explained", "")
    }

    pub fn with_replies(run: &str, explain: &str, fix: &str) -> Arc<Self> {
        Arc::new(Self {
            run_reply: run.to_string(),
            explain_reply: explain.to_string(),
            fix_reply: fix.to_string(),
            runs: Mutex::new(Vec::new()),
            explains: Mutex::new(Vec::new()),
            fixes: Mutex::new(Vec::new()),
        })
    }
}

impl Oracle for RecordingOracle {
    fn simulate_run(&self, code: &str, language: Language) -> OracleReply {
        self.runs
            .lock()
            .unwrap()
            .push((code.to_string(), language));
        OracleReply::ok(self.run_reply.clone())
    }

    fn explain(&self, code: &str) -> OracleReply {
        self.explains.lock().unwrap().push(code.to_string());
        OracleReply::ok(self.explain_reply.clone())
    }

    fn fix(&self, code: &str, context: &str) -> OracleReply {
        self.fixes
            .lock()
            .unwrap()
            .push((code.to_string(), context.to_string()));
        OracleReply::ok(self.fix_reply.clone())
    }
}

/// Fix requests block until the test sends the reply text — for race
/// scenarios where an edit happens while the request is in flight.
pub struct GatedFixOracle {
    release: Mutex<Receiver<String>>,
}

/// Returns (release sender, oracle). Each `send` releases one fix call.
pub fn gated_fix_oracle() -> (Sender<String>, Arc<GatedFixOracle>) {
    let (sender, receiver) = channel();
    (
        sender,
        Arc::new(GatedFixOracle {
            release: Mutex::new(receiver),
        }),
    )
}

impl Oracle for GatedFixOracle {
    fn simulate_run(&self, _code: &str, _language: Language) -> OracleReply {
        OracleReply::ok("ran")
    }

    fn explain(&self, _code: &str) -> OracleReply {
        OracleReply::ok("explained")
    }

    fn fix(&self, _code: &str, _context: &str) -> OracleReply {
        let text = self.release.lock().unwrap().recv().unwrap_or_default();
        OracleReply::ok(text)
    }
}
