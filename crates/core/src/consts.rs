//! Constant variables.

/// Bits of the identifier space.
pub const RING_BITS: u32 = 20;
/// Size of the identifier space. Identifiers live in `[0, RING_SIZE)`.
pub const RING_SIZE: u64 = 1 << RING_BITS;
/// One finger per bit of the identifier space.
pub const FINGER_TABLE_SIZE: usize = RING_BITS as usize;
/// Default timeout of an outbound remote call, in seconds.
pub const DEFAULT_RPC_TIMEOUT: u64 = 10;
