//! This module provides the implementation for an instrument link over a
//! serial port.
//!
//! It includes a blocking implementation of the [`InstrumentLink`] trait using
//! the `serialport` crate, and the [`available_endpoints`] function to
//! enumerate the serial ports reachable on the system.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort, SerialPortBuilder, SerialPortType};

use crate::{InstrumentLink, LinkError};

/// A reachable serial endpoint.
///
/// Returned by [`available_endpoints`]; the `name` is what you pass on to
/// [`SerialLink::simple`] or [`serialport::new`] to open the port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Port name, e.g., `"/dev/ttyUSB0"` or `"COM3"`.
    pub name: String,
    /// Human-readable description of the port, as far as the system knows it.
    pub description: String,
}

/// Take a fresh snapshot of the serial ports reachable on this system.
///
/// This has no side effects and can be called repeatedly; every call
/// re-enumerates the ports.
pub fn available_endpoints() -> Result<Vec<Endpoint>, LinkError> {
    let ports = serialport::available_ports()?;
    Ok(ports
        .into_iter()
        .map(|port| Endpoint {
            name: port.port_name,
            description: describe_port_type(&port.port_type),
        })
        .collect())
}

/// Describe a port type the way a user would want to read it in a picker.
fn describe_port_type(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(info) => match &info.product {
            Some(product) => format!("USB serial device ({product})"),
            None => "USB serial device".to_string(),
        },
        SerialPortType::PciPort => "PCI serial port".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth serial port".to_string(),
        SerialPortType::Unknown => "Serial port".to_string(),
    }
}

/// A blocking serial link implementation using the `serialport` crate.
#[derive(Debug)]
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    terminator: String,
}

impl SerialLink {
    /// Try to create a new instance of `SerialLink`.
    ///
    /// The terminator is by default set to `"\n"`, but can be changed using
    /// the `set_terminator` function. Note that the terminator is
    /// automatically appended to commands and reading responses will read
    /// until the terminator is found.
    ///
    /// # Arguments
    /// * `spb` - A `SerialPortBuilder` to configure the serial port. See
    ///   [`serialport::SerialPortBuilder`] and the [`serialport::new`]
    ///   function for more details.
    pub fn try_new(spb: SerialPortBuilder) -> Result<Self, LinkError> {
        Ok(SerialLink {
            port: spb.open()?,
            terminator: "\n".to_string(),
        })
    }

    /// Try to create a `SerialLink` with a simple serial port configuration.
    ///
    /// The port is opened with the system default framing and a timeout of 3
    /// seconds. Use [`SerialLink::try_new`] with your own builder if the
    /// instrument needs specific parity, stop bits, or data bits.
    ///
    /// # Arguments
    /// * `port` - The name of the serial port, e.g., `"/dev/ttyUSB0"` or
    ///   `"COM3"`.
    /// * `baud_rate` - The baud rate to open the port with.
    pub fn simple(port: &str, baud_rate: u32) -> Result<Self, LinkError> {
        let spb = serialport::new(port, baud_rate).timeout(Duration::from_secs(3));
        Self::try_new(spb)
    }
}

impl InstrumentLink for SerialLink {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        self.port.read_exact(buf)?;
        Ok(())
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }

    fn get_terminator(&self) -> &str {
        self.terminator.as_str()
    }

    fn set_terminator(&mut self, terminator: &str) {
        self.terminator = terminator.to_string();
    }

    fn get_timeout(&self) -> Duration {
        self.port.timeout()
    }

    fn clear(&mut self) -> Result<(), LinkError> {
        self.port.clear(ClearBuffer::All)?;
        Ok(())
    }

    fn is_live(&self) -> bool {
        // A port that was unplugged under us fails this probe.
        self.port.bytes_to_read().is_ok()
    }
}
