//! In-process doubles for the cache, upstream and deferred-task seams.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use futures::executor::block_on;

use crate::cache::{CacheKey, CacheStore};
use crate::deferred::{Deferred, Task};
use crate::dgt::payload::UpstreamRequest;
use crate::dgt::{Upstream, UpstreamReply};
use crate::error::TrafficError;
use crate::response::ProxyResponse;

/// Map-backed cache. Clones share storage.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Rc<RefCell<HashMap<CacheKey, ProxyResponse>>>,
    fail_lookups: bool,
    fail_stores: bool,
}

impl MemoryCache {
    pub fn failing_lookups() -> Self {
        Self {
            fail_lookups: true,
            ..Self::default()
        }
    }

    pub fn failing_stores() -> Self {
        Self {
            fail_stores: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn stored(&self, key: &CacheKey) -> Option<ProxyResponse> {
        self.entries.borrow().get(key).cloned()
    }
}

#[async_trait(?Send)]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &CacheKey) -> worker::Result<Option<ProxyResponse>> {
        if self.fail_lookups {
            return Err(worker::Error::RustError("lookup unavailable".to_string()));
        }
        Ok(self.stored(key))
    }

    async fn put(&self, key: &CacheKey, response: ProxyResponse) -> worker::Result<()> {
        if self.fail_stores {
            return Err(worker::Error::RustError("store unavailable".to_string()));
        }
        self.entries.borrow_mut().insert(key.clone(), response);
        Ok(())
    }
}

/// Upstream returning a canned reply and counting calls. Clones share counters.
#[derive(Clone)]
pub struct StubUpstream {
    reply: Result<UpstreamReply, TrafficError>,
    calls: Rc<Cell<usize>>,
    last: Rc<RefCell<Option<UpstreamRequest>>>,
}

impl StubUpstream {
    fn with(reply: Result<UpstreamReply, TrafficError>) -> Self {
        Self {
            reply,
            calls: Rc::new(Cell::new(0)),
            last: Rc::new(RefCell::new(None)),
        }
    }

    pub fn ok(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::with(Ok(UpstreamReply {
            status,
            body: body.to_string(),
        }))
    }

    pub fn unreachable(details: &str) -> Self {
        Self::with(Err(TrafficError::Transport(details.to_string())))
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_request(&self) -> Option<UpstreamRequest> {
        self.last.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Upstream for StubUpstream {
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamReply, TrafficError> {
        self.calls.set(self.calls.get() + 1);
        *self.last.borrow_mut() = Some(request.clone());
        self.reply.clone()
    }
}

/// Collects deferred tasks until the test runs them. Clones share the queue.
#[derive(Clone, Default)]
pub struct TaskQueue {
    tasks: Rc<RefCell<Vec<Task>>>,
}

impl TaskQueue {
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn run_all(&self) {
        let tasks: Vec<Task> = self.tasks.borrow_mut().drain(..).collect();
        for task in tasks {
            block_on(task);
        }
    }
}

impl Deferred for TaskQueue {
    fn defer(&self, task: Task) {
        self.tasks.borrow_mut().push(task);
    }
}
