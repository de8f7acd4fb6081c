//! The loopback module provides an instrument simulator for testing purposes.
//!
//! [`LoopbackLink`] allows testing of instrument drivers that communicate by
//! sending strings with a fixed terminator declaring the end of a line. The
//! link is scripted: you provide the commands you expect the driver to send
//! and the replies the simulated instrument answers with, in order.

use std::collections::VecDeque;

use crate::{InstrumentLink, LinkError};

/// A self-incrementing index structure that by default starts at 0 and
/// increments whenever `next` is called.
#[derive(Debug, Default)]
struct IncrIndex {
    index: usize,
}

impl IncrIndex {
    fn next(&mut self) -> usize {
        let current = self.index;
        self.index += 1;
        current
    }
}

/// An instrument simulator that allows you to simply write tests for your
/// instrument driver.
///
/// The commands are consumed in order. Whenever the driver sends something
/// that is not the next expected command, the link panics with a message
/// naming both. When the link is dropped, leftover commands in either
/// direction panic as well, so a test cannot silently skip part of its
/// script.
///
/// # Example
///
/// Let us build a minimal driver that sends an identification command to its
/// instrument, and test it against the loopback link.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use instrumentlink::{InstrumentLink, LinkError, LoopbackLink};
///
/// struct MyInstrument<T: InstrumentLink> {
///     link: Arc<Mutex<T>>,
/// }
///
/// impl<T: InstrumentLink> MyInstrument<T> {
///     fn new(link: T) -> Self {
///         MyInstrument {
///             link: Arc::new(Mutex::new(link)),
///         }
///     }
///
///     fn identity(&mut self) -> Result<String, LinkError> {
///         self.link.lock().unwrap().query("I")
///     }
/// }
///
/// let host2inst = vec!["I".to_string()];
/// let inst2host = vec!["TH-2100 v1.3".to_string()];
/// let loopback = LoopbackLink::new(host2inst, inst2host, "\n");
///
/// let mut inst = MyInstrument::new(loopback);
/// assert_eq!("TH-2100 v1.3", inst.identity().unwrap());
/// ```
pub struct LoopbackLink {
    from_host: Vec<String>,
    from_inst: Vec<String>,
    terminator_exp: String,
    from_host_index: IncrIndex,
    from_inst_index: IncrIndex,
    curr_bytes: VecDeque<u8>,
    terminator: String,
}

impl LoopbackLink {
    /// Create a new loopback link with given commands to and from instrument.
    ///
    /// # Arguments:
    /// * `from_host` - Commands expected from host to instrument, in order.
    /// * `from_inst` - Replies from instrument to host, in order.
    /// * `terminator_exp` - The terminator the driver under test is expected
    ///   to set on the link.
    pub fn new(from_host: Vec<String>, from_inst: Vec<String>, terminator_exp: &str) -> Self {
        LoopbackLink {
            from_host,
            from_inst,
            terminator_exp: terminator_exp.to_string(),
            from_host_index: IncrIndex::default(),
            from_inst_index: IncrIndex::default(),
            curr_bytes: VecDeque::new(),
            terminator: "\n".to_string(), // default terminator of all links
        }
    }

    /// This command panics if not all commands in the link have been used.
    ///
    /// It is automatically called when the [`LoopbackLink`] is dropped, but
    /// you can also call it manually at the end of a test.
    pub fn finalize(&mut self) {
        let from_host_leftover = self.from_host.get(self.from_host_index.next());
        let from_inst_leftover = self.from_inst.get(self.from_inst_index.next());
        if let Some(fhl) = from_host_leftover {
            panic!("Leftover expected commands found from host to instrument: {fhl}");
        }
        if let Some(fil) = from_inst_leftover {
            panic!("Leftover expected commands found from instrument to host: {fil}");
        }
    }

    /// Get the next command from host to instrument, or panic.
    fn get_next_from_host(&mut self) -> &str {
        self.from_host
            .get(self.from_host_index.next())
            .expect("No more commands were expected from host to instrument.")
    }

    /// Get the next command from instrument to host, or panic.
    fn get_next_from_inst(&mut self) -> &str {
        self.from_inst
            .get(self.from_inst_index.next())
            .expect("No more commands were expected from instrument to host.")
    }

    /// Get the next command from host to instrument including the terminator.
    fn get_next_from_host_with_terminator(&mut self) -> String {
        let cmd = self.get_next_from_host().to_string();
        format!("{cmd}{}", self.terminator_exp)
    }

    /// Get the next command from instrument to host including the terminator.
    fn get_next_from_inst_with_terminator(&mut self) -> String {
        let cmd = self.get_next_from_inst().to_string();
        format!("{cmd}{}", self.terminator_exp)
    }

    /// Read exactly one byte from the next command from the instrument.
    ///
    /// This just panics if there are no more commands. If there are no more
    /// commands but one is required, the panic is justified as this is a test
    /// interface.
    fn read_one_byte(&mut self) -> u8 {
        match self.curr_bytes.pop_front() {
            Some(byte) => byte,
            None => {
                let next_cmd = self.get_next_from_inst_with_terminator();
                self.curr_bytes = next_cmd.as_bytes().iter().copied().collect();
                self.read_one_byte()
            }
        }
    }
}

impl InstrumentLink for LoopbackLink {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        for byte in buf.iter_mut() {
            *byte = self.read_one_byte();
        }
        Ok(())
    }

    fn write_raw(&mut self, cmd: &[u8]) -> Result<(), LinkError> {
        let exp = self.get_next_from_host_with_terminator();
        assert_eq!(
            exp.as_bytes(),
            cmd,
            "Expected sendcmd '{0}', got '{1:?}'",
            exp,
            std::str::from_utf8(cmd)
        );
        Ok(())
    }

    fn get_terminator(&self) -> &str {
        self.terminator.as_str()
    }

    fn set_terminator(&mut self, terminator: &str) {
        self.terminator = terminator.to_string();
    }
}

impl Drop for LoopbackLink {
    fn drop(&mut self) {
        self.finalize();
    }
}

// Tests of internal functionality
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incrementing_index() {
        let mut idx = IncrIndex::default();
        assert_eq!(0, idx.next());
        assert_eq!(1, idx.next());
        assert_eq!(2, idx.next());
    }
}
