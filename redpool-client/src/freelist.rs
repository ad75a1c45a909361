//! Process-wide freelists for pipelines and replies.
//!
//! Both objects are acquired blank, used, and returned reset; the lists
//! only amortize buffer capacity across calls. Objects are single-owner
//! while leased, so a plain locked stack is all the coordination needed.

use parking_lot::Mutex;

use redpool_resp::Reply;

use crate::pipeline::Pipeline;

struct Freelist<T> {
    stack: Mutex<Vec<T>>,
}

impl<T> Freelist<T> {
    const fn new() -> Self {
        Freelist {
            stack: Mutex::new(Vec::new()),
        }
    }

    fn get(&self) -> Option<T> {
        self.stack.lock().pop()
    }

    fn put(&self, value: T) {
        self.stack.lock().push(value);
    }
}

static PIPELINES: Freelist<Pipeline> = Freelist::new();
static REPLIES: Freelist<Reply> = Freelist::new();

/// Returns a blank pipeline from the freelist.
pub fn blank_pipeline() -> Pipeline {
    PIPELINES.get().unwrap_or_default()
}

/// Resets a pipeline and returns it to the freelist.
pub fn release_pipeline(mut p: Pipeline) {
    p.reset();
    PIPELINES.put(p);
}

/// Returns a blank reply from the freelist.
pub fn blank_reply() -> Reply {
    REPLIES.get().unwrap_or_default()
}

/// Resets a reply and returns it to the freelist.
pub fn release_reply(mut r: Reply) {
    r.reset();
    REPLIES.put(r);
}
