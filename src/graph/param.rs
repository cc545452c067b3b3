//! Shared, lock-free node parameters.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

/*
Node Parameters
===============

A node that lives on the render thread still has to react to knobs turned on
the control thread. Each tweakable value is stored in a `Param`: an `f32`
packed into an `AtomicU32` and shared through an `Arc`.

  control thread                     render thread
  --------------                     -------------
  handle.set(0.7)   ── store ──▶     node reads param.get() at block start

Properties:
  - no locks, no allocation on either side
  - stores to one param are observed in the order they were issued
  - nothing orders stores across different params (and nothing needs to)

The render side only ever reads the number; everything around it (which slot
it belongs to, whether a session is running) stays on the control thread.
*/

/// A shared `f32` cell read by the render thread and written by the control thread.
#[derive(Clone, Debug)]
pub struct Param {
    bits: Arc<AtomicU32>,
}

impl Param {
    pub fn new(value: f32) -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(value.to_bits())),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }
}

impl Default for Param {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_value() {
        let param = Param::new(1.0);
        let handle = param.clone();

        handle.set(0.25);

        assert_eq!(param.get(), 0.25);
    }

    #[test]
    fn last_store_wins() {
        let param = Param::new(0.0);
        for value in [0.1, 0.4, 0.9, 0.3] {
            param.set(value);
        }
        assert_eq!(param.get(), 0.3);
    }

    #[test]
    fn independent_params_do_not_alias() {
        let a = Param::new(1.0);
        let b = Param::new(1.0);
        b.set(2.0);

        assert_eq!(a.get(), 1.0);
    }

    #[test]
    fn visible_across_threads() {
        let param = Param::new(0.0);
        let writer = param.clone();

        std::thread::spawn(move || writer.set(1.5))
            .join()
            .unwrap();

        assert_eq!(param.get(), 1.5);
    }
}
