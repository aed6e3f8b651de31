//! Channel thread state

use std::collections::VecDeque;

use pl330_spec::{ChannelControl, LoopSlot};

/// Registers and FIFO of one channel thread
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelState {
    /// Offset of the next instruction within the program
    pub pc: usize,
    pub sar: u32,
    pub dar: u32,
    pub ccr: u32,
    /// Loop counters LC0 and LC1
    pub lc: [u32; 2],
    /// Data loaded but not yet stored
    pub fifo: VecDeque<u8>,
}

impl ChannelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded channel control register
    pub fn control(&self) -> ChannelControl {
        ChannelControl::from_word(self.ccr)
    }

    #[inline]
    pub fn counter(&self, slot: LoopSlot) -> u32 {
        self.lc[slot.index()]
    }

    #[inline]
    pub fn counter_mut(&mut self, slot: LoopSlot) -> &mut u32 {
        &mut self.lc[slot.index()]
    }
}
