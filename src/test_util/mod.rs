//! Utilities for exercising the protocol engine without a real channel: an in-memory
//!  lossy channel and scriptable stand-ins for the layer above. They are used for testing
//!  the engine itself, and they are exported as regular code so applications and
//!  integration harnesses can wire up simulated links the same way.

pub mod channel;
pub mod network;
