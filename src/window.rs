//! Sliding window of standardized feature vectors.
//!
//! A fixed-capacity circular buffer: each push overwrites the slot written `WINDOW_SIZE`
//! pushes ago. The window starts [`WindowState::Filling`] and moves to
//! [`WindowState::Full`] exactly once, on the push that wraps the write position back
//! to slot 0. It never leaves `Full`.
//!
//! # Layout
//!
//! ```text
//! slots:  [ v10 | v11 | v12 | v3 | v4 | ... | v9 ]
//!                           ^ write_position (next slot to overwrite = oldest)
//! ```
//!
//! [`SlidingWindow::snapshot`] unrolls the ring into time order (oldest first), which is
//! the order the model expects.

use crate::config::{NUM_FEATURES, WINDOW_SIZE};
use crate::features::FeatureVector;

/// Fill state of the window.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum WindowState {
    /// Fewer than `WINDOW_SIZE` vectors pushed so far.
    #[default]
    Filling,
    /// At least `WINDOW_SIZE` vectors pushed. Terminal.
    Full,
}

/// What a single [`SlidingWindow::push`] did to the fill state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum PushOutcome {
    /// Still filling; carries the number of valid vectors now held.
    Filling(usize),
    /// This push completed the window (happens once per window lifetime).
    BecameFull,
    /// Window was already full; the oldest vector was evicted.
    Rolled,
}

/// Fixed-capacity circular buffer of standardized feature vectors.
pub struct SlidingWindow {
    slots: [FeatureVector; WINDOW_SIZE],
    /// Next slot to write (also the oldest slot once full).
    write_position: usize,
    state: WindowState,
}

impl SlidingWindow {
    /// Create an empty window.
    pub const fn new() -> Self {
        Self {
            slots: [[0.0; NUM_FEATURES]; WINDOW_SIZE],
            write_position: 0,
            state: WindowState::Filling,
        }
    }

    /// Store `vector` as the newest time step.
    pub fn push(
        &mut self,
        vector: FeatureVector,
    ) -> PushOutcome {
        self.slots[self.write_position] = vector;
        self.write_position = (self.write_position + 1) % WINDOW_SIZE;

        match self.state {
            WindowState::Full => PushOutcome::Rolled,
            WindowState::Filling if self.write_position == 0 => {
                self.state = WindowState::Full;
                PushOutcome::BecameFull
            }
            WindowState::Filling => PushOutcome::Filling(self.write_position),
        }
    }

    /// Current fill state.
    #[inline]
    pub const fn state(&self) -> WindowState { self.state }

    /// True once `WINDOW_SIZE` vectors have been pushed.
    #[inline]
    pub const fn is_full(&self) -> bool { matches!(self.state, WindowState::Full) }

    /// Slot the next push will write.
    #[inline]
    pub const fn write_position(&self) -> usize { self.write_position }

    /// Number of valid vectors held.
    #[inline]
    pub const fn len(&self) -> usize {
        match self.state {
            WindowState::Full => WINDOW_SIZE,
            WindowState::Filling => self.write_position,
        }
    }

    /// True before the first push.
    #[inline]
    pub const fn is_empty(&self) -> bool { self.len() == 0 }

    /// Iterate over valid vectors from oldest to newest.
    pub fn iter(&self) -> WindowIter<'_> {
        let start = if self.is_full() { self.write_position } else { 0 };
        WindowIter {
            window: self,
            pos: start,
            remaining: self.len(),
        }
    }

    /// The full window in time order (oldest first).
    ///
    /// Returns `None` while filling: unwritten slots must never reach the model.
    pub fn snapshot(&self) -> Option<[FeatureVector; WINDOW_SIZE]> {
        if !self.is_full() {
            return None;
        }
        let mut out = [[0.0; NUM_FEATURES]; WINDOW_SIZE];
        for (dst, src) in out.iter_mut().zip(self.iter()) {
            *dst = *src;
        }
        Some(out)
    }
}

impl Default for SlidingWindow {
    fn default() -> Self { Self::new() }
}

/// Iterator over window vectors (oldest to newest).
pub struct WindowIter<'a> {
    window: &'a SlidingWindow,
    pos: usize,
    remaining: usize,
}

impl<'a> Iterator for WindowIter<'a> {
    type Item = &'a FeatureVector;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let vector = &self.window.slots[self.pos];
        self.pos = (self.pos + 1) % WINDOW_SIZE;
        self.remaining -= 1;
        Some(vector)
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.remaining, Some(self.remaining)) }
}

impl ExactSizeIterator for WindowIter<'_> {}

// =============================================================================
// Unit Tests
// =============================================================================
