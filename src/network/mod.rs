//! Network model: devices, links and packets.

pub mod device;
pub mod link;
pub mod packet;

pub use device::{Device, DeviceClass, DeviceKind};
pub use link::Link;
pub use packet::{Packet, DEFAULT_SIZE_BYTES, DEFAULT_TTL};
