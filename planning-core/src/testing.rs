//! Fakes for the collaborators, shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{PlanningError, PlanningResult};
use crate::event::Event;
use crate::notify::{Notification, Notifier};
use crate::remote::RemoteSource;

pub(crate) fn event(id: &str, title: &str, start: &str, end: &str) -> Event {
    Event::new(id, title, start.parse().unwrap(), end.parse().unwrap())
}

/// Remote source that replays scripted responses and counts calls.
#[derive(Default)]
pub(crate) struct FakeRemote {
    responses: Mutex<VecDeque<PlanningResult<Vec<Event>>>>,
    calls: AtomicUsize,
    gate: Option<Gate>,
}

/// Lets a test hold a fetch open until it decides to release it.
#[derive(Default)]
pub(crate) struct Gate {
    pub started: Notify,
    pub release: Notify,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        FakeRemote {
            gate: Some(Gate::default()),
            ..Self::default()
        }
    }

    pub fn push_ok(&self, events: Vec<Event>) {
        self.responses.lock().unwrap().push_back(Ok(events));
    }

    pub fn push_err(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(PlanningError::Remote(message.to_string())));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn gate(&self) -> &Gate {
        self.gate.as_ref().expect("FakeRemote::gated")
    }
}

#[async_trait]
impl RemoteSource for FakeRemote {
    async fn fetch_planning(&self) -> PlanningResult<Vec<Event>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PlanningError::Remote("no scripted response".into())))
    }
}

/// Notifier that keeps everything it receives.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn received(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received.lock().unwrap().push(notification);
    }
}
