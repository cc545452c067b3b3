use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Connection between a session's control side and its render-side graph.
///
/// The control thread calls [`SessionLink::detach`] when the session is torn
/// down; the render thread checks [`SessionLink::is_detached`] before every
/// block and retires the graph once it is set.
#[derive(Clone, Debug)]
pub struct SessionLink {
    state: Arc<LinkState>,
}

#[derive(Debug)]
struct LinkState {
    id: u64,
    detached: AtomicBool,
}

impl SessionLink {
    pub fn new(id: u64) -> Self {
        Self {
            state: Arc::new(LinkState {
                id,
                detached: AtomicBool::new(false),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.state.id
    }

    pub fn detach(&self) {
        self.state.detached.store(true, Ordering::Release);
    }

    pub fn is_detached(&self) -> bool {
        self.state.detached.load(Ordering::Acquire)
    }
}
