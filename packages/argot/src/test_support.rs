//! Scripted in-memory transport for session tests.
//!
//! Tests queue stream outcomes per capability and drive each stream through
//! a [`StreamControl`]: push orchestrator frames or errors in, read the
//! container's frames out. Dropping the control's inbound sender reads as
//! clean end-of-stream; dropping its outbound receiver makes sends fail.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use argot_registry::Capability;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::protocol::{ContainerFrame, OrchestratorFrame};
use crate::transport::{CapabilityStream, Connection, Connector};

pub enum StreamEvent {
    Frame(OrchestratorFrame),
    Error(String),
}

/// Test-side handle for one scripted stream.
pub struct StreamControl {
    pub inbound: mpsc::UnboundedSender<StreamEvent>,
    pub sent: mpsc::UnboundedReceiver<ContainerFrame>,
}

pub struct ScriptedStream {
    inbound: mpsc::UnboundedReceiver<StreamEvent>,
    sent: mpsc::UnboundedSender<ContainerFrame>,
}

#[async_trait]
impl CapabilityStream for ScriptedStream {
    async fn send(&mut self, frame: ContainerFrame) -> Result<()> {
        self.sent.send(frame).map_err(|_| anyhow!("stream closed"))
    }

    async fn recv(&mut self) -> Result<Option<OrchestratorFrame>> {
        match self.inbound.recv().await {
            Some(StreamEvent::Frame(frame)) => Ok(Some(frame)),
            Some(StreamEvent::Error(message)) => Err(anyhow!(message)),
            None => Ok(None),
        }
    }
}

#[derive(Clone, Default)]
pub struct ScriptedConnection {
    streams: Arc<Mutex<HashMap<Capability, VecDeque<Result<ScriptedStream, String>>>>>,
    opened: Arc<Mutex<Vec<Capability>>>,
    closed: Arc<Mutex<bool>>,
    events: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_events(events: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// Queue a stream for the next `open_stream(capability)`.
    pub fn push_stream(&self, capability: Capability) -> StreamControl {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        self.streams
            .lock()
            .unwrap()
            .entry(capability)
            .or_default()
            .push_back(Ok(ScriptedStream {
                inbound: inbound_rx,
                sent: sent_tx,
            }));
        StreamControl {
            inbound: inbound_tx,
            sent: sent_rx,
        }
    }

    /// Queue an open failure for the next `open_stream(capability)`.
    pub fn push_open_error(&self, capability: Capability, message: &str) {
        self.streams
            .lock()
            .unwrap()
            .entry(capability)
            .or_default()
            .push_back(Err(message.to_string()));
    }

    pub fn opened_count(&self, capability: Capability) -> usize {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == capability)
            .count()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap()
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    type Stream = ScriptedStream;

    async fn open_stream(&self, capability: Capability) -> Result<ScriptedStream> {
        self.opened.lock().unwrap().push(capability);
        let next = self
            .streams
            .lock()
            .unwrap()
            .get_mut(&capability)
            .and_then(|queue| queue.pop_front());
        match next {
            Some(Ok(stream)) => Ok(stream),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no scripted stream for {capability}")),
        }
    }

    fn close(&self) {
        *self.closed.lock().unwrap() = true;
        self.events.lock().unwrap().push("close".to_string());
    }
}

pub enum ConnectOutcome {
    Connection(ScriptedConnection),
    Error(String),
}

pub struct ScriptedConnector {
    outcomes: Mutex<VecDeque<ConnectOutcome>>,
    pub events: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful dial and hand back its connection for scripting.
    pub fn push_connection(&self) -> ScriptedConnection {
        let connection = ScriptedConnection::with_events(Arc::clone(&self.events));
        self.outcomes
            .lock()
            .unwrap()
            .push_back(ConnectOutcome::Connection(connection.clone()));
        connection
    }

    /// Queue a failed dial.
    pub fn push_dial_error(&self, message: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(ConnectOutcome::Error(message.to_string()));
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    type Connection = ScriptedConnection;

    async fn connect(&self) -> Result<ScriptedConnection> {
        let next = self.outcomes.lock().unwrap().pop_front();
        match next {
            Some(ConnectOutcome::Connection(connection)) => {
                self.events.lock().unwrap().push("dial".to_string());
                Ok(connection)
            }
            Some(ConnectOutcome::Error(message)) => {
                self.events.lock().unwrap().push("dial_failed".to_string());
                Err(anyhow!(message))
            }
            None => {
                // Script exhausted: hold this dial open until the test
                // cancels the supervisor.
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }

    fn address(&self) -> String {
        "scripted:0".to_string()
    }
}
