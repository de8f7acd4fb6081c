//! InstrumentLink: command/response links to serial-style lab instruments
//!
//! Many lab instruments speak a simple line protocol: the host sends a short
//! ASCII command followed by a terminator, the instrument answers with one
//! terminated line. This crate provides the [`InstrumentLink`] trait that
//! captures exactly that exchange, plus a [`LinkError`] type that instrument
//! drivers should return.
//!
//! # Currently implemented links are:
//! - Serial (blocking) using the [`serialport`] crate, behind the `serial`
//!   feature. This also provides [`available_endpoints`] to take a snapshot
//!   of the serial ports reachable on the system.
//! - [`LoopbackLink`], an instrument simulator for writing driver tests
//!   without hardware.
//!
//! A driver built on top of this crate takes any type implementing
//! [`InstrumentLink`], so the same driver code runs against real hardware and
//! against the loopback simulator in its test suite.
//!
//! # License
//!
//! Licensed under either of
//!
//! - Apache License, Version 2.0 ([LICENSE-APACHE](http://www.apache.org/licenses/LICENSE-2.0))
//! - MIT license ([LICENSE-MIT](http://opensource.org/licenses/MIT))
//!
//! at your option.

#![warn(missing_docs)]

mod link;
mod loopback;
#[cfg(feature = "serial")]
mod serial;

pub use link::{InstrumentLink, LinkError};
pub use loopback::LoopbackLink;
#[cfg(feature = "serial")]
pub use serial::{Endpoint, SerialLink, available_endpoints};
