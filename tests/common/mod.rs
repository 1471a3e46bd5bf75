//! Shared fixtures: a scripted gateway and a writer that records into the
//! same event log, so tests can check what happened in which order.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use chroma_mcp_bridge::{Gateway, McpError, McpServer, McpSession, Result};
use serde_json::{json, Value};
use tokio::io::AsyncWrite;

/// Something the bridge did.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Call { name: String, arguments: Value },
    ListTools,
    Forward(Value),
    Health,
    Closed,
    Write(Value),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

/// Canned gateway behavior.
#[derive(Debug, Clone)]
pub enum Scripted {
    Body(Value),
    Status(u16, &'static str),
    Timeout,
    Refused,
}

impl Scripted {
    fn produce(&self) -> Result<Value> {
        match self {
            Scripted::Body(v) => Ok(v.clone()),
            Scripted::Status(status, body) => Err(McpError::Remote {
                status: *status,
                body: body.to_string(),
            }),
            Scripted::Timeout => Err(McpError::Timeout("operation timed out".into())),
            Scripted::Refused => Err(McpError::Transport("connection refused".into())),
        }
    }
}

pub struct MockGateway {
    pub log: EventLog,
    tools: HashMap<String, Scripted>,
    default_tool: Scripted,
    catalog: Scripted,
    forward: Scripted,
}

impl MockGateway {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            tools: HashMap::new(),
            default_tool: Scripted::Body(json!({"result": "ok"})),
            catalog: Scripted::Refused,
            forward: Scripted::Body(json!({})),
        }
    }

    pub fn tool(mut self, name: &str, reply: Scripted) -> Self {
        self.tools.insert(name.to_string(), reply);
        self
    }

    pub fn catalog(mut self, reply: Scripted) -> Self {
        self.catalog = reply;
        self
    }

    pub fn forward(mut self, reply: Scripted) -> Self {
        self.forward = reply;
        self
    }

    fn record(&self, event: Event) {
        self.log.lock().unwrap().push(event);
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn call_tool(&mut self, name: &str, arguments: &Value) -> Result<Value> {
        self.record(Event::Call {
            name: name.to_string(),
            arguments: arguments.clone(),
        });
        self.tools
            .get(name)
            .unwrap_or(&self.default_tool)
            .produce()
    }

    async fn list_tools(&mut self) -> Result<Value> {
        self.record(Event::ListTools);
        self.catalog.produce()
    }

    async fn forward(&mut self, message: &Value) -> Result<Value> {
        self.record(Event::Forward(message.clone()));
        self.forward.produce()
    }

    async fn health(&mut self) -> Result<Value> {
        self.record(Event::Health);
        Ok(json!({"status": "healthy"}))
    }

    fn close(&mut self) {
        self.record(Event::Closed);
    }
}

/// Writer that logs every complete output line as an [`Event::Write`].
pub struct LogWriter {
    log: EventLog,
    pending: Vec<u8>,
}

impl LogWriter {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            pending: Vec::new(),
        }
    }
}

impl AsyncWrite for LogWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        this.pending.extend_from_slice(buf);
        while let Some(pos) = this.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = this.pending.drain(..=pos).collect();
            let value = serde_json::from_slice(&line)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            this.log.lock().unwrap().push(Event::Write(value));
        }
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<Event> {
    log.lock().unwrap().clone()
}

/// Replies written by the bridge, in order.
pub fn writes(log: &EventLog) -> Vec<Value> {
    events(log)
        .into_iter()
        .filter_map(|e| match e {
            Event::Write(v) => Some(v),
            _ => None,
        })
        .collect()
}

/// Gateway calls made by the bridge, in order.
pub fn calls(log: &EventLog) -> Vec<Event> {
    events(log)
        .into_iter()
        .filter(|e| !matches!(e, Event::Write(_)))
        .collect()
}

/// Feed `input` through a bridge backed by `gateway`.
pub async fn drive(gateway: MockGateway, input: &str) -> McpServer<MockGateway> {
    let log = gateway.log.clone();
    let mut server = McpServer::new(McpSession::new(gateway));
    server
        .run(input.as_bytes(), LogWriter::new(log))
        .await
        .expect("bridge loop failed");
    server
}

/// Join JSON values into newline-delimited input.
pub fn lines(messages: &[Value]) -> String {
    messages
        .iter()
        .map(|m| format!("{}\n", m))
        .collect()
}
