use crossbeam::queue::SegQueue;
use glam::Vec3;

/// Upper bound on idle buffers kept per pool.
const MAX_POOLED: usize = 64;

/// Lock-free pool of reusable `Vec<T>` scratch buffers.
///
/// Shared by every worker sanitizing a batch; buffers carry no data between
/// meshes, only capacity.
#[derive(Debug)]
pub struct ScratchPool<T> {
    free: SegQueue<Vec<T>>,
}

impl<T> Default for ScratchPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScratchPool<T> {
    pub fn new() -> Self {
        Self {
            free: SegQueue::new(),
        }
    }

    /// Take an empty buffer with room for at least `capacity` elements.
    pub fn take(&self, capacity: usize) -> Vec<T> {
        match self.free.pop() {
            Some(mut buf) => {
                buf.clear();
                buf.reserve(capacity);
                buf
            }
            None => Vec::with_capacity(capacity),
        }
    }

    /// Return a buffer to the pool.
    pub fn give(&self, mut buf: Vec<T>) {
        if buf.capacity() == 0 || self.free.len() >= MAX_POOLED {
            return;
        }
        buf.clear();
        self.free.push(buf);
    }

    /// Number of idle buffers.
    pub fn idle(&self) -> usize {
        self.free.len()
    }
}

/// Scratch pools keyed by element type.
#[derive(Debug, Default)]
pub struct ScratchBuffers {
    pub indices: ScratchPool<u32>,
    pub vectors: ScratchPool<Vec3>,
}
