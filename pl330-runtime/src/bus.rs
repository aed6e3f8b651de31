//! Register bus abstraction
//!
//! The dispatcher talks to the controller through [`RegisterBus`] so the
//! same code drives real MMIO on target and a recording bus in tests.

use std::ptr;

/// One 32-bit register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    pub address: u32,
    pub value: u32,
}

/// Sink for 32-bit device register writes
pub trait RegisterBus {
    fn write_register(&mut self, value: u32, address: u32);
}

/// Volatile writes to physical addresses
#[derive(Debug)]
pub struct MmioBus {
    _private: (),
}

impl MmioBus {
    /// # Safety
    /// * Every address later passed to `write_register` must be a mapped,
    ///   4-byte aligned device register
    /// * Those registers must not be accessed through any other path while
    ///   this bus exists
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for MmioBus {
    fn write_register(&mut self, value: u32, address: u32) {
        let reg = address as usize as *mut u32;
        // SAFETY: the constructor's caller vouches for every address
        unsafe { ptr::write_volatile(reg, value) }
    }
}

/// Bus that keeps every write in order
#[derive(Debug, Clone, Default)]
pub struct RecordingBus {
    writes: Vec<RegisterWrite>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> &[RegisterWrite] {
        &self.writes
    }

    pub fn take_writes(&mut self) -> Vec<RegisterWrite> {
        std::mem::take(&mut self.writes)
    }
}

impl RegisterBus for RecordingBus {
    fn write_register(&mut self, value: u32, address: u32) {
        self.writes.push(RegisterWrite { address, value });
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn write_register(&mut self, value: u32, address: u32) {
        (**self).write_register(value, address)
    }
}
