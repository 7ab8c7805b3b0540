use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::fmt::Debug;

/// Source of uniform choices for phrase selection.
///
/// Injected into the summarizer and outfit advisor so callers can swap in a
/// seeded or fixed source.
pub trait PhrasePicker: Send + Sync + Debug {
    /// Index in `0..len`. Only called with `len > 0`.
    fn pick_index(&self, len: usize) -> usize;
}

/// Pick one phrase from `phrases`, or `None` if the list is empty.
pub fn choose<'a, S: AsRef<str>>(picker: &dyn PhrasePicker, phrases: &'a [S]) -> Option<&'a str> {
    if phrases.is_empty() {
        return None;
    }
    let idx = picker.pick_index(phrases.len()).min(phrases.len() - 1);
    phrases.get(idx).map(AsRef::as_ref)
}

/// Draws from the thread-local generator on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngPicker;

impl PhrasePicker for ThreadRngPicker {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Reproducible sequence of choices from a fixed seed.
#[derive(Debug)]
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl PhrasePicker for SeededPicker {
    fn pick_index(&self, len: usize) -> usize {
        self.rng.lock().gen_range(0..len)
    }
}

/// Always returns the same index, clamped to the list length.
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl PhrasePicker for FixedPicker {
    fn pick_index(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}
