//! A rust driver for a dual-probe thermo-hygrometer.
//!
//! This driver manages one session with a thermo-hygrometer that reports two
//! probe temperatures, relative humidity, and dew point over a serial line.
//! The session owns the connection: `connect` opens the port and identifies
//! the instrument, `disconnect` releases it, and every command in between
//! goes through one lock so that exactly one command/response exchange is in
//! flight at any time.
//!
//! Command failures are never fatal to the session. A failed read or an
//! unparseable reply degrades to an absent value, the cause is recorded and
//! can be read back with [`ThermoHygro::last_error`], and the session stays
//! usable; reconnecting is always an explicit caller decision.
//!
//! # Example
//!
//! This example shows the usage via the serial interface.
//! ```no_run
//! use thermohygro::ThermoHygro;
//!
//! // The port where the thermo-hygrometer is connected to
//! let port = "/dev/ttyUSB0";
//!
//! // Open the session. The fixed framing (9600 baud, 8N1) for this
//! // instrument class is set up by the driver.
//! let mut inst = ThermoHygro::new();
//! println!("{}", inst.connect(port).expect("Failed to open serial port"));
//!
//! // Read the full channel bundle; channels that could not be read are None.
//! let mea = inst.read_all();
//! println!("Probe 1: {:?} degC", mea.temperature1);
//! println!("Humidity: {:?} %RH", mea.humidity);
//!
//! // Read a single probe as a typed temperature.
//! println!("Probe 2: {:?}", inst.temperature2());
//! ```

#![deny(warnings, missing_docs)]

mod interface;
mod measurement;
mod response;

pub use instrumentlink::{Endpoint, available_endpoints};
pub use interface::SerialInterfaceThermoHygro;
pub use measurement::Measurement;
pub use response::parse_labeled_scalar;

use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

use instrumentlink::{InstrumentLink, LinkError};
use log::{debug, warn};
use measurements::Temperature;

/// Terminator used by the instrument in both directions.
const TERMINATOR: &str = "\r";

/// Identification command; the instrument answers with a free-text identity.
const CMD_IDENTITY: &str = "I";
/// Structured read command; the instrument answers `t1,rh,t2,dp`.
const CMD_READ_ALL: &str = "R";
/// Probe-1 temperature command.
const CMD_TEMPERATURE_1: &str = "T1";
/// Probe-2 temperature command.
const CMD_TEMPERATURE_2: &str = "T2";

/// Substring of the identity reply that marks a supported instrument.
const IDENTITY_SIGNATURE: &str = "TH";

/// Connection state of a session.
///
/// The state only changes through [`ThermoHygro::connect`],
/// [`ThermoHygro::connect_with`], and [`ThermoHygro::disconnect`]; it is
/// never inferred from transport errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport resource is held; all commands are rejected.
    Disconnected,
    /// A transport resource is open and commands may be sent.
    Connected,
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connected => write!(f, "Connected"),
        }
    }
}

/// The lock-guarded state of one session. Holding the lock is what
/// serializes connect, disconnect, and every command exchange.
struct Session<T> {
    link: Option<T>,
    state: ConnectionState,
    last_error: Option<String>,
}

impl<T: InstrumentLink> Session<T> {
    /// Record a failure as the most recent error of this session.
    fn fail(&mut self, err: impl Display) {
        let msg = err.to_string();
        warn!("thermo-hygrometer: {msg}");
        self.last_error = Some(msg);
    }

    /// Run one command/response exchange, or record why it was not possible.
    fn command(&mut self, cmd: &str) -> Option<String> {
        if self.state != ConnectionState::Connected {
            self.fail(LinkError::NotConnected);
            return None;
        }
        let Some(link) = self.link.as_mut() else {
            self.fail(LinkError::NotConnected);
            return None;
        };
        match link.query(cmd) {
            Ok(response) => Some(response),
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    /// Replace the session's transport with a freshly opened link and
    /// identify the instrument on it.
    ///
    /// Any prior resource is dropped before the new link is touched, so a
    /// session never holds two transports. The identification exchange may
    /// fail or return an unknown identity without failing the connect; only
    /// the success message differs.
    fn attach(&mut self, link: T, endpoint: &str) -> Result<String, LinkError> {
        self.link = None;
        self.state = ConnectionState::Disconnected;

        let mut link = link;
        link.set_terminator(TERMINATOR);
        let identity = link.query(CMD_IDENTITY);

        self.link = Some(link);
        self.state = ConnectionState::Connected;
        self.last_error = None;

        match identity {
            Ok(id) if id.to_ascii_uppercase().contains(IDENTITY_SIGNATURE) => {
                debug!("connected, instrument identified as '{id}'");
                Ok(format!("Connected to {id}."))
            }
            _ => {
                debug!("connected to '{endpoint}', no supported identity reply");
                Ok(format!("Connected to {endpoint}."))
            }
        }
    }
}

/// A session with a dual-probe thermo-hygrometer.
///
/// The session is a shared handle: cloning it yields another handle onto the
/// same connection, and one mutex inside serializes all operations across
/// handles. See the top-level documentation for an example on how to use
/// this driver.
pub struct ThermoHygro<T: InstrumentLink> {
    inner: Arc<Mutex<Session<T>>>,
}

impl<T: InstrumentLink> ThermoHygro<T> {
    /// Create a new, disconnected session.
    pub fn new() -> Self {
        ThermoHygro {
            inner: Arc::new(Mutex::new(Session {
                link: None,
                state: ConnectionState::Disconnected,
                last_error: None,
            })),
        }
    }

    /// Connect the session over an already opened instrument link.
    ///
    /// Closes any prior transport first, sets the instrument's terminator on
    /// the link, and issues the identification command. The call succeeds
    /// even if the instrument does not answer with a supported identity; the
    /// returned message then names the endpoint instead of the instrument.
    /// On success the recorded last error is cleared.
    ///
    /// For serial hardware you usually want [`ThermoHygro::connect`] instead,
    /// which also opens the port with the fixed link configuration.
    ///
    /// # Arguments
    /// * `link` - An instrument link that implements the [`InstrumentLink`]
    ///   trait.
    pub fn connect_with(&mut self, link: T) -> Result<String, LinkError> {
        let mut session = self.inner.lock().expect("Mutex should not be poisoned");
        session.attach(link, "instrument")
    }

    /// Disconnect the session, dropping the transport resource if one is
    /// held.
    ///
    /// Idempotent; the session always ends up [`ConnectionState::Disconnected`].
    pub fn disconnect(&mut self) -> Result<String, LinkError> {
        let mut session = self.inner.lock().expect("Mutex should not be poisoned");
        if session.link.take().is_some() {
            debug!("thermo-hygrometer link closed");
        }
        session.state = ConnectionState::Disconnected;
        Ok("Disconnected.".to_string())
    }

    /// Send a raw command and return the instrument's reply, if any.
    ///
    /// Returns `None` without touching the transport when the session is
    /// disconnected. On a live link the exchange clears stale buffers, writes
    /// the command with the terminator, and reads exactly one terminated
    /// line, trimmed. Any link failure is recorded (see
    /// [`ThermoHygro::last_error`]) and surfaced as `None`.
    pub fn send_command(&mut self, cmd: &str) -> Option<String> {
        self.inner
            .lock()
            .expect("Mutex should not be poisoned")
            .command(cmd)
    }

    /// Send a command and parse its reply into a single number.
    ///
    /// A reply that the parser rejects is recorded as the last error and
    /// returned as `None`; the session stays usable.
    ///
    /// # Arguments
    /// * `cmd` - The command to send.
    /// * `parse` - The instrument-specific text-to-number parser to apply to
    ///   the reply, e.g. [`parse_labeled_scalar`].
    pub fn query_scalar<F>(&mut self, cmd: &str, parse: F) -> Option<f64>
    where
        F: FnOnce(&str) -> Option<f64>,
    {
        let mut session = self.inner.lock().expect("Mutex should not be poisoned");
        let response = session.command(cmd)?;
        match parse(&response) {
            Some(value) => Some(value),
            None => {
                session.fail(LinkError::ResponseParse(response));
                None
            }
        }
    }

    /// Read the probe-1 temperature.
    pub fn temperature1(&mut self) -> Option<Temperature> {
        self.query_scalar(CMD_TEMPERATURE_1, parse_labeled_scalar)
            .map(Temperature::from_celsius)
    }

    /// Read the probe-2 temperature.
    pub fn temperature2(&mut self) -> Option<Temperature> {
        self.query_scalar(CMD_TEMPERATURE_2, parse_labeled_scalar)
            .map(Temperature::from_celsius)
    }

    /// Send a structured read command and fill a [`Measurement`] from its
    /// comma-separated reply.
    ///
    /// How many channels are filled depends on the field count of the reply,
    /// reproducing the observed firmware behavior: four or more fields fill
    /// all four channels in reply order, exactly two or three fill only the
    /// first probe pair, fewer than two fill nothing and record an error. A
    /// field that does not convert aborts filling for this call, leaving the
    /// record all-absent. Every call starts from a fresh all-absent record.
    pub fn query_structured(&mut self, cmd: &str) -> Measurement {
        let mut session = self.inner.lock().expect("Mutex should not be poisoned");
        let mut measurement = Measurement::new();
        let Some(response) = session.command(cmd) else {
            return measurement;
        };

        let fields: Vec<&str> = response.split(',').map(str::trim).collect();
        let n_fill = match fields.len() {
            0..=1 => {
                session.fail(LinkError::ResponseParse(response.clone()));
                return measurement;
            }
            2..=3 => 2,
            _ => 4,
        };

        let mut values = [None; 4];
        for (slot, field) in values.iter_mut().zip(&fields[..n_fill]) {
            match field.parse::<f64>() {
                Ok(value) => *slot = Some(value),
                Err(_) => {
                    session.fail(LinkError::ResponseParse(response.clone()));
                    return measurement;
                }
            }
        }

        measurement.temperature1 = values[0];
        measurement.humidity = values[1];
        measurement.temperature2 = values[2];
        measurement.dewpoint = values[3];
        measurement
    }

    /// Read the full channel bundle of the instrument.
    pub fn read_all(&mut self) -> Measurement {
        self.query_structured(CMD_READ_ALL)
    }

    /// Whether the session currently has a usable connection.
    ///
    /// Checks both the lifecycle state and the transport itself, so a link
    /// that was dropped externally (e.g., an unplugged adapter) reports as
    /// disconnected even though no `disconnect` call was made.
    pub fn is_connected(&self) -> bool {
        let session = self.inner.lock().expect("Mutex should not be poisoned");
        session.state == ConnectionState::Connected
            && session.link.as_ref().is_some_and(|link| link.is_live())
    }

    /// The lifecycle state of the session.
    pub fn state(&self) -> ConnectionState {
        self.inner
            .lock()
            .expect("Mutex should not be poisoned")
            .state
    }

    /// Query the identity of the connected instrument.
    ///
    /// Returns `None` when the session is disconnected or the exchange fails.
    pub fn identity(&mut self) -> Option<String> {
        self.send_command(CMD_IDENTITY)
    }

    /// The most recent failure of this session, if any.
    ///
    /// Overwritten on every new failure and cleared by a successful connect.
    pub fn last_error(&self) -> Option<String> {
        self.inner
            .lock()
            .expect("Mutex should not be poisoned")
            .last_error
            .clone()
    }
}

impl<T: InstrumentLink> Default for ThermoHygro<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: InstrumentLink> Clone for ThermoHygro<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
