use std::future::Future;
use std::pin::Pin;

use worker::Context;

/// Work that may outlive the response it was scheduled from.
pub type Task = Pin<Box<dyn Future<Output = ()>>>;

/// Channel for fire-and-forget work. Implementations must not run the task
/// to completion inside `defer`.
pub trait Deferred {
    fn defer(&self, task: Task);
}

impl Deferred for Context {
    fn defer(&self, task: Task) {
        self.wait_until(task);
    }
}
