//! Generation lifecycle: holds the description, runs at most one request at a
//! time and publishes every state transition to observers.

use crate::generator::{GenerationError, GenerationService};
use crate::models::{GenerationRequest, GenerationResult, Notification};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use thiserror::Error;
use tokio::{sync::{mpsc, watch}, task::JoinHandle};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleState {
    Idle,
    Generating,
    Succeeded(GenerationResult),
    Failed,
}

impl LifecycleState {
    pub fn is_generating(&self) -> bool { matches!(self, LifecycleState::Generating) }

    pub fn result(&self) -> Option<&GenerationResult> {
        match self {
            LifecycleState::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}

/// Why a `submit()` call did nothing. Never shown to the user.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    #[error("description is empty")] EmptyInput,
    #[error("a generation request is already in flight")] AlreadyInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started,
    Ignored(SubmitRejection),
}

/// Fire-and-forget receiver of user-facing messages.
pub trait NotificationSink: Send + Sync + 'static {
    fn notify(&self, notification: Notification);
}

pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, n: Notification) {
        info!(severity = ?n.severity, "🔔 {}: {}", n.title, n.message);
    }
}

impl NotificationSink for Vec<Arc<dyn NotificationSink>> {
    fn notify(&self, notification: Notification) {
        for sink in self {
            sink.notify(notification.clone());
        }
    }
}

pub struct ChannelSink(mpsc::UnboundedSender<Notification>);

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        // receiver gone means nobody is looking; drop it
        let _ = self.0.send(notification);
    }
}

struct Session {
    description: String,
    ticket: u64,
    task: Option<JoinHandle<()>>,
}

struct Inner {
    session: Mutex<Session>,
    state: watch::Sender<LifecycleState>,
    notifier: Arc<dyn NotificationSink>,
}

impl Inner {
    // Notification goes out before the settled state is published, so anyone
    // woken by the state change finds it already delivered. Sinks must not
    // call back into the controller.
    fn complete(&self, ticket: u64, outcome: Result<GenerationResult, GenerationError>) {
        let mut session = self.session.lock();
        if session.ticket != ticket {
            warn!(ticket, current = session.ticket, "discarding response for a superseded request");
            return;
        }
        session.task = None;
        let settled = match outcome {
            Ok(result) => {
                if result.status != "ok" && result.status != "ready" {
                    debug!(status = %result.status, "accepting envelope with unrecognised status");
                }
                info!("✅ Template '{}' generated ({} sections)", result.template.name, result.template.sections.len());
                self.notifier.notify(Notification::generated(&result));
                LifecycleState::Succeeded(result)
            }
            Err(e) => {
                error!(error = %e, "❌ Generation request failed");
                self.notifier.notify(Notification::generation_failed());
                LifecycleState::Failed
            }
        };
        self.state.send_replace(settled);
    }
}

/// Owns one interaction session. Requests are spawned on the ambient tokio
/// runtime, so `submit` must be called from within one.
pub struct GenerationController {
    inner: Arc<Inner>,
    service: Arc<dyn GenerationService>,
}

impl GenerationController {
    pub fn new(service: Arc<dyn GenerationService>, notifier: Arc<dyn NotificationSink>) -> Self {
        let (state, _) = watch::channel(LifecycleState::Idle);
        Self {
            inner: Arc::new(Inner {
                session: Mutex::new(Session { description: String::new(), ticket: 0, task: None }),
                state,
                notifier,
            }),
            service,
        }
    }

    pub fn update_description(&self, text: impl Into<String>) {
        self.inner.session.lock().description = text.into();
    }

    pub fn description(&self) -> String { self.inner.session.lock().description.clone() }

    pub fn state(&self) -> LifecycleState { self.inner.state.borrow().clone() }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> { self.inner.state.subscribe() }

    /// Mirrors the submit button: disabled on blank text or while generating.
    pub fn can_submit(&self) -> bool {
        let session = self.inner.session.lock();
        !session.description.trim().is_empty() && !self.inner.state.borrow().is_generating()
    }

    pub fn submit(&self) -> SubmitOutcome {
        let mut session = self.inner.session.lock();
        if session.description.trim().is_empty() {
            debug!("submit ignored: empty description");
            return SubmitOutcome::Ignored(SubmitRejection::EmptyInput);
        }
        if self.inner.state.borrow().is_generating() {
            debug!("submit ignored: request already in flight");
            return SubmitOutcome::Ignored(SubmitRejection::AlreadyInFlight);
        }

        session.ticket += 1;
        let ticket = session.ticket;
        let request = GenerationRequest::new(session.description.clone());
        self.inner.state.send_replace(LifecycleState::Generating);
        info!(ticket, "🚀 Generating site for description ({} chars)", request.description.chars().count());

        let service = Arc::clone(&self.service);
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        session.task = Some(tokio::spawn(async move {
            let outcome = service.generate(&request).await;
            match inner.upgrade() {
                Some(inner) => inner.complete(ticket, outcome),
                None => warn!(ticket, "discarding response for a closed session"),
            }
        }));
        SubmitOutcome::Started
    }

    /// Abandons any in-flight request and clears the result region.
    pub fn reset(&self) {
        let mut session = self.inner.session.lock();
        session.ticket += 1;
        if let Some(task) = session.task.take() {
            task.abort();
            info!("🛑 Aborted in-flight generation request");
        }
        self.inner.state.send_replace(LifecycleState::Idle);
    }

    /// Resolves with the first state that is not `Generating`.
    pub async fn wait_settled(&self) -> LifecycleState {
        let mut rx = self.inner.state.subscribe();
        let settled = rx.wait_for(|s| !s.is_generating()).await.map(|s| (*s).clone());
        settled.unwrap_or_else(|_| self.state())
    }
}

impl Drop for GenerationController {
    fn drop(&mut self) {
        if let Some(task) = self.inner.session.lock().task.take() {
            task.abort();
        }
    }
}
