/*
[INPUT]:  Scripted replies for start/status/cancel
[OUTPUT]: In-memory ResearchTransport that records every call with its (paused-clock) instant
[POS]:    Test infrastructure - shared across poller integration tests
[UPDATE]: When ResearchTransport gains or changes operations
*/

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use fragrance_research_adapter::{
    CancelResponse, Recommendation, ResearchError, ResearchTransport, Result,
    StartResearchRequest, StartResearchResponse, TaskStatus, TaskStatusResponse,
};
use tokio::sync::{oneshot, watch};
use tokio::time::Instant;

enum Step<T> {
    Reply(Result<T>),
    Gated(oneshot::Receiver<()>, Result<T>),
}

impl<T> Step<T> {
    async fn resolve(self) -> Result<T> {
        match self {
            Step::Reply(result) => result,
            Step::Gated(gate, result) => {
                let _ = gate.await;
                result
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusCall {
    pub task_id: String,
    pub at: Instant,
}

pub struct ScriptedTransport {
    starts: Mutex<VecDeque<Step<StartResearchResponse>>>,
    statuses: Mutex<VecDeque<Step<TaskStatusResponse>>>,
    start_calls: watch::Sender<Vec<(Vec<String>, String)>>,
    status_calls: watch::Sender<Vec<StatusCall>>,
    cancel_calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            starts: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(VecDeque::new()),
            start_calls: watch::channel(Vec::new()).0,
            status_calls: watch::channel(Vec::new()).0,
            cancel_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push_start(&self, result: Result<StartResearchResponse>) {
        self.starts.lock().unwrap().push_back(Step::Reply(result));
    }

    /// Queue a start reply that is held back until the returned sender fires.
    pub fn push_start_gated(&self, result: Result<StartResearchResponse>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.starts.lock().unwrap().push_back(Step::Gated(rx, result));
        tx
    }

    pub fn push_status(&self, result: Result<TaskStatusResponse>) {
        self.statuses.lock().unwrap().push_back(Step::Reply(result));
    }

    pub fn push_status_gated(&self, result: Result<TaskStatusResponse>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.statuses.lock().unwrap().push_back(Step::Gated(rx, result));
        tx
    }

    pub fn start_calls(&self) -> Vec<(Vec<String>, String)> {
        self.start_calls.borrow().clone()
    }

    pub async fn wait_for_start_calls(&self, count: usize) {
        let mut rx = self.start_calls.subscribe();
        rx.wait_for(|calls| calls.len() >= count).await.unwrap();
    }

    pub fn status_calls(&self) -> Vec<StatusCall> {
        self.status_calls.borrow().clone()
    }

    pub fn status_count(&self) -> usize {
        self.status_calls.borrow().len()
    }

    pub async fn wait_for_status_calls(&self, count: usize) {
        let mut rx = self.status_calls.subscribe();
        rx.wait_for(|calls| calls.len() >= count).await.unwrap();
    }

    pub fn cancel_calls(&self) -> Vec<String> {
        self.cancel_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResearchTransport for ScriptedTransport {
    async fn start(&self, request: &StartResearchRequest) -> Result<StartResearchResponse> {
        self.start_calls.send_modify(|calls| {
            calls.push((request.notes().to_vec(), request.preferences().to_string()))
        });
        let step = self.starts.lock().unwrap().pop_front();
        match step {
            Some(step) => step.resolve().await,
            None => Err(ResearchError::Unavailable),
        }
    }

    async fn status(&self, task_id: &str) -> Result<TaskStatusResponse> {
        self.status_calls.send_modify(|calls| {
            calls.push(StatusCall {
                task_id: task_id.to_string(),
                at: Instant::now(),
            })
        });
        let step = self.statuses.lock().unwrap().pop_front();
        match step {
            Some(step) => step.resolve().await,
            None => Ok(status(TaskStatus::Running, 50)),
        }
    }

    async fn cancel(&self, task_id: &str) -> Result<CancelResponse> {
        self.cancel_calls.lock().unwrap().push(task_id.to_string());
        Ok(CancelResponse {
            message: Some("Task cancelled".to_string()),
        })
    }
}

pub fn started(task_id: &str) -> StartResearchResponse {
    StartResearchResponse {
        task_id: task_id.to_string(),
        status: Some(TaskStatus::Pending),
        message: None,
    }
}

pub fn status(status: TaskStatus, progress: u32) -> TaskStatusResponse {
    TaskStatusResponse::new(status, progress)
}

pub fn completed(names: &[&str]) -> TaskStatusResponse {
    let mut response = status(TaskStatus::Completed, 100);
    response.recommendations = Some(names.iter().map(|name| Recommendation::named(*name)).collect());
    response
}

pub fn notes(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
