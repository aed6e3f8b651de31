//! Sparse byte-addressed bus memory

use std::collections::HashMap;

/// One byte written by the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryWrite {
    pub address: u32,
    pub value: u8,
}

#[derive(Debug, Clone, Default)]
pub struct Memory {
    data: HashMap<u32, u8>,
    tracing: bool,
    trace: Vec<MemoryWrite>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every store in write order
    pub fn enable_tracing(&mut self, enabled: bool) {
        self.tracing = enabled;
    }

    pub fn read_byte(&self, addr: u32) -> u8 {
        self.data.get(&addr).copied().unwrap_or(0)
    }

    pub fn write_byte(&mut self, addr: u32, value: u8) {
        if self.tracing {
            self.trace.push(MemoryWrite {
                address: addr,
                value,
            });
        }
        if value == 0 {
            self.data.remove(&addr);
        } else {
            self.data.insert(addr, value);
        }
    }

    /// Copy `bytes` in starting at `addr`, wrapping at the top of the bus
    pub fn load(&mut self, addr: u32, bytes: &[u8]) {
        let mut a = addr;
        for &b in bytes {
            if b != 0 {
                self.data.insert(a, b);
            } else {
                self.data.remove(&a);
            }
            a = a.wrapping_add(1);
        }
    }

    pub fn read_range(&self, addr: u32, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| self.read_byte(addr.wrapping_add(i as u32)))
            .collect()
    }

    pub fn trace(&self) -> &[MemoryWrite] {
        &self.trace
    }

    pub fn take_trace(&mut self) -> Vec<MemoryWrite> {
        std::mem::take(&mut self.trace)
    }
}
