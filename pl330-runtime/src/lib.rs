//! # PL330 Runtime
//!
//! Everything that happens after a program is generated: starting a channel
//! through the controller's debug registers, and a host-side simulator that
//! executes microcode against a sparse memory.
//!
//! ## Example
//!
//! ```rust
//! use pl330_runtime::{Simulator, SimulatorConfig};
//!
//! // MOV CCR (incrementing, 1-byte bursts); LDA; STA; END
//! let code = [0xBC, 0x01, 0x01, 0x40, 0x00, 0x00, 0x04, 0x08, 0x00];
//! let mut sim = Simulator::new(SimulatorConfig::default());
//! sim.memory_mut().load(0, &[0x5A]);
//! let result = sim.run(&code).unwrap();
//! assert_eq!(result.bytes_stored, 1);
//! ```

pub mod error;
pub mod bus;
pub mod dispatch;
pub mod memory;
pub mod state;
pub mod simulator;

pub use error::{Result, RuntimeError};
pub use bus::{MmioBus, RecordingBus, RegisterBus, RegisterWrite};
pub use dispatch::{DebugThread, Dispatcher, DispatcherConfig};
pub use memory::{Memory, MemoryWrite};
pub use state::ChannelState;
pub use simulator::{ExecutionResult, RequestType, Simulator, SimulatorConfig};
