// src/hal/mod.rs
//! Hardware abstraction for the EGG-D800.
//!
//! Register blocks are modeled as fixed-size report images with typed
//! field tables; the transport trait hides the USB HID plumbing.

pub mod afe;
pub mod codec;
pub mod device;
pub mod fields;
pub mod gpio;
pub mod transport;

pub use afe::{AfeRegisters, CHANNEL_PATTERNS};
pub use codec::CodecRegisters;
pub use device::EggD800;
pub use fields::{FieldSpec, FieldWidth, LegalValues};
pub use gpio::GpioPins;
pub use transport::{HidTransport, MemoryTransport, PRODUCT_ID, VENDOR_ID};
