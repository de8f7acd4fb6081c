//! The main trait for command/response links, plus the shared error enum.
//!
//! Every concrete link only has to provide byte-level reading and writing.
//! Command framing, terminated-line reads, and timeout handling are provided
//! by the trait itself so that all links behave the same way.

use std::time::{Duration, Instant};

use thiserror::Error;

/// The error enum for all instrument links.
///
/// For any command sending or querying, an instrument driver should return
/// either an empty result or a result with the query where this error is the
/// alternative. [`LinkError`] makes it easy to propagate sending and querying
/// errors forward with the `?` operator such that errors propagate nicely.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LinkError {
    /// No connection to an instrument is currently open. Returned before any
    /// transport access is attempted.
    #[error("Not connected to an instrument.")]
    NotConnected,
    /// Error when reading from/writing to a link. See [`std::io::Error`] for
    /// more details.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Response from the instrument could not be parsed because it was
    /// unexpected by the driver. This error contains the response that was
    /// received from the instrument.
    #[error("Response from instrument could not be parsed. Response was: {0}")]
    ResponseParse(String),
    #[cfg(feature = "serial")]
    /// Serial port errors can occur when opening a serial link. See the
    /// [`serialport::Error`] documentation for more information.
    #[error(transparent)]
    Serialport(#[from] serialport::Error),
    /// Timeout occured while waiting for a response from the instrument. The
    /// error contains the timeout that was exceeded.
    #[error(
        "Timeout occured while waiting for a response from the instrument. Timeout was set to {0:?}."
    )]
    Timeout(Duration),
    /// Timeout occured while waiting for a response to a query. The error
    /// contains the query that was sent and the timeout that was exceeded.
    #[error(
        "Timeout occured while waiting for a response to query: {query}. Timeout was set to {timeout:?}."
    )]
    TimeoutQuery {
        /// The query that timed out.
        query: String,
        /// The timeout that was set.
        timeout: Duration,
    },
}

/// The `InstrumentLink` trait defines the command/response interface to an
/// instrument.
///
/// Implementations only need to provide [`read_exact`](InstrumentLink::read_exact)
/// and [`write_raw`](InstrumentLink::write_raw). The provided methods build the
/// line protocol on top of these: commands are terminated with the link's
/// terminator before transmission, and replies are read until the terminator
/// shows up or the link's timeout elapses.
pub trait InstrumentLink {
    /// Read exactly `buf.len()` bytes from the instrument into `buf`.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LinkError>;

    /// Write raw bytes to the instrument and flush the link.
    fn write_raw(&mut self, data: &[u8]) -> Result<(), LinkError>;

    /// Get the terminator of the link.
    fn get_terminator(&self) -> &str {
        "\n"
    }

    /// Set the terminator of the link from a `&str`.
    ///
    /// # Arguments:
    /// - `_terminator` - A string slice that terminates commands and replies.
    fn set_terminator(&mut self, _terminator: &str) {}

    /// Get the read timeout of the link.
    fn get_timeout(&self) -> Duration {
        Duration::from_secs(3)
    }

    /// Discard any stale input/output buffering on the link.
    ///
    /// Links without device-side buffers (e.g., in-memory test links) leave
    /// this as the provided no-op.
    fn clear(&mut self) -> Result<(), LinkError> {
        Ok(())
    }

    /// Whether the underlying resource still responds.
    ///
    /// Links that cannot probe their resource report `true`; the serial link
    /// overrides this to detect externally-dropped connections.
    fn is_live(&self) -> bool {
        true
    }

    /// Send a command to the instrument.
    ///
    /// This function discards stale buffers, appends the terminator to the
    /// command, and writes it to the instrument.
    ///
    /// # Arguments:
    /// - `cmd` - A string slice that will be sent to the instrument.
    fn sendcmd(&mut self, cmd: &str) -> Result<(), LinkError> {
        self.clear()?;
        let cmd = format!("{}{}", cmd, self.get_terminator());
        self.write_raw(cmd.as_bytes())
    }

    /// Read one terminated line from the instrument.
    ///
    /// The response is read character by character until it ends with the
    /// terminator. If no terminator is encountered, the function returns a
    /// [`LinkError::Timeout`] once the link's timeout is reached. If a
    /// non-UTF-8 byte is received, an error is printed to stderr and the byte
    /// is skipped. The returned line is trimmed of surrounding whitespace.
    fn read_until_terminator(&mut self) -> Result<String, LinkError> {
        let mut response = String::new();
        let mut single_buf = [0u8];

        let tic = Instant::now();
        while (Instant::now() - tic) < self.get_timeout() {
            self.read_exact(&mut single_buf)?;
            if let Ok(val) = std::str::from_utf8(&single_buf) {
                response.push_str(val);
            } else {
                eprintln!("Received invalid UTF-8 data: {single_buf:?}");
            }
            if response.ends_with(self.get_terminator()) {
                return Ok(response.trim().to_string());
            }
        }

        Err(LinkError::Timeout(self.get_timeout()))
    }

    /// Query the instrument with a command and return the response as a String.
    ///
    /// This function uses [`sendcmd`](InstrumentLink::sendcmd) to send the
    /// command and then reads exactly one terminated line as the reply. A bare
    /// timeout from the read is upgraded to [`LinkError::TimeoutQuery`] so the
    /// failed query shows up in the error.
    ///
    /// # Arguments
    /// * `cmd` - The command to send to the instrument for which we expect a
    ///   response.
    fn query(&mut self, cmd: &str) -> Result<String, LinkError> {
        self.sendcmd(cmd)?;
        match self.read_until_terminator() {
            Err(LinkError::Timeout(timeout)) => Err(LinkError::TimeoutQuery {
                query: cmd.to_string(),
                timeout,
            }),
            other => other,
        }
    }
}
