//! Serial interface configuration for the thermo-hygrometer.

use std::{thread, time::Duration};

use instrumentlink::{LinkError, SerialLink};
use log::debug;

use crate::{ConnectionState, ThermoHygro};

/// Fixed baud rate for this instrument class.
const BAUD_RATE: u32 = 9600;
/// Bounded read timeout for command replies.
const READ_TIMEOUT: Duration = Duration::from_secs(2);
/// Settle interval between opening the port and the first command.
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// A SerialLink builder for the thermo-hygrometer.
///
/// Builds an InstrumentLink serial link with the correct baud rate, parity,
/// stop bits, and data bits for communication with the thermo-hygrometer.
#[derive(Debug)]
pub struct SerialInterfaceThermoHygro {}

impl SerialInterfaceThermoHygro {
    /// Try to create a serial link with the fixed configuration of this
    /// instrument class: 9600 baud, 8 data bits, no parity, 1 stop bit, and
    /// a 2 second read timeout.
    ///
    /// # Arguments:
    /// * `port` - The name of the serial port, e.g., `"/dev/ttyUSB0"` or
    ///   `"COM3"`.
    pub fn simple(port: &str) -> Result<SerialLink, LinkError> {
        let spb = serialport::new(port, BAUD_RATE)
            .timeout(READ_TIMEOUT)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One);
        SerialLink::try_new(spb)
    }
}

impl ThermoHygro<SerialLink> {
    /// Connect the session to the instrument on the given serial port.
    ///
    /// Any prior transport resource is closed first. The port is opened with
    /// the fixed link configuration; an open failure leaves the session
    /// disconnected with the cause recorded and no half-open resource behind.
    /// After a short settle interval the instrument is identified, see
    /// [`ThermoHygro::connect_with`] for the identification rules.
    ///
    /// # Arguments
    /// * `port` - The name of the serial port, e.g., `"/dev/ttyUSB0"` or
    ///   `"COM3"`.
    pub fn connect(&mut self, port: &str) -> Result<String, LinkError> {
        let mut session = self.inner.lock().expect("Mutex should not be poisoned");
        session.link = None;
        session.state = ConnectionState::Disconnected;

        let link = match SerialInterfaceThermoHygro::simple(port) {
            Ok(link) => link,
            Err(e) => {
                session.fail(&e);
                return Err(e);
            }
        };
        debug!("serial port '{port}' opened at {BAUD_RATE} baud");

        thread::sleep(SETTLE_DELAY);
        session.attach(link, port)
    }
}
