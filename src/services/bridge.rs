//! Bridge between oracle worker threads and the synchronous UI loop.
//!
//! Each user action spawns one detached worker thread that performs the
//! blocking HTTP round trip and sends the reply back over an mpsc channel;
//! the UI loop drains the channel every tick. There is no cancellation and
//! no fencing by buffer version: a reply is applied whenever it arrives,
//! regardless of edits made in the meantime.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

use super::oracle::{Oracle, OracleReply};
use crate::model::language::Language;

/// Messages sent from oracle workers to the synchronous main loop.
#[derive(Debug)]
pub enum AsyncMessage {
    /// Simulated execution finished
    RunCompleted(OracleReply),
    /// Explanation finished
    ExplainCompleted(OracleReply),
    /// Fix finished; the reply text is the extracted replacement code
    FixCompleted(OracleReply),
}

pub struct OracleBridge {
    sender: Sender<AsyncMessage>,
    receiver: Receiver<AsyncMessage>,
}

impl OracleBridge {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// Non-blocking poll for the next completed reply.
    pub fn try_recv(&self) -> Option<AsyncMessage> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn spawn_run(&self, oracle: Arc<dyn Oracle>, code: String, language: Language) {
        let sender = self.sender.clone();
        thread::spawn(move || {
            let reply = oracle.simulate_run(&code, language);
            let _ = sender.send(AsyncMessage::RunCompleted(reply));
        });
    }

    pub fn spawn_explain(&self, oracle: Arc<dyn Oracle>, code: String) {
        let sender = self.sender.clone();
        thread::spawn(move || {
            let reply = oracle.explain(&code);
            let _ = sender.send(AsyncMessage::ExplainCompleted(reply));
        });
    }

    pub fn spawn_fix(&self, oracle: Arc<dyn Oracle>, code: String, context: String) {
        let sender = self.sender.clone();
        thread::spawn(move || {
            let reply = oracle.fix(&code, &context);
            let _ = sender.send(AsyncMessage::FixCompleted(reply));
        });
    }
}

impl Default for OracleBridge {
    fn default() -> Self {
        Self::new()
    }
}
