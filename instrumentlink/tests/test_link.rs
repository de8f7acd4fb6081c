//! Tests for the default implementation of the [`InstrumentLink`] trait.

use std::{
    collections::VecDeque,
    io::{Read, Write},
    time::Duration,
};

use rstest::*;

use instrumentlink::{InstrumentLink, LinkError};

/// A minimal link over an in-memory byte queue: writes append to the queue,
/// reads pop from it.
struct TestLink {
    port: VecDeque<u8>,
    timeout: Duration,
}

impl InstrumentLink for TestLink {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        self.port.read_exact(buf)?;
        Ok(())
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.port.write_all(data)?;
        Ok(())
    }

    fn get_timeout(&self) -> Duration {
        self.timeout
    }
}

/// Set up an empty link with the default 3 second timeout.
#[fixture]
fn empt_link() -> TestLink {
    TestLink {
        port: VecDeque::new(),
        timeout: Duration::from_secs(3),
    }
}

/// Set up a link whose queued response carries no terminator and whose
/// timeout is zero.
#[fixture]
fn no_term_link() -> TestLink {
    TestLink {
        port: VecDeque::from(vec![b'r', b'e', b's', b'p']),
        timeout: Duration::from_secs(0),
    }
}

#[rstest]
fn test_default_terminator(empt_link: TestLink) {
    assert_eq!(empt_link.get_terminator(), "\n");
}

#[rstest]
fn test_default_clear_and_liveness(mut empt_link: TestLink) {
    assert!(empt_link.clear().is_ok());
    assert!(empt_link.is_live());
}

#[rstest]
fn test_write_read_roundtrip(mut empt_link: TestLink) {
    let data = b"Hello, Instrument!";
    empt_link.write_raw(data).unwrap();

    let mut buf = vec![0; data.len()];
    empt_link.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, data);
}

/// `sendcmd` appends the terminator; the echoed line reads back trimmed.
#[rstest]
fn test_sendcmd_appends_terminator(mut empt_link: TestLink) {
    empt_link.sendcmd("PING").unwrap();
    assert_eq!(empt_link.read_until_terminator().unwrap(), "PING");
}

/// A reply with surrounding whitespace is trimmed before it is returned.
#[rstest]
fn test_read_until_terminator_trims(mut empt_link: TestLink) {
    empt_link.write_raw(b"  23.25 \n").unwrap();
    assert_eq!(empt_link.read_until_terminator().unwrap(), "23.25");
}

#[rstest]
fn test_read_until_terminator_timeout(mut no_term_link: TestLink) {
    let timeout_exp = Duration::from_secs(0);

    match no_term_link.read_until_terminator() {
        Err(LinkError::Timeout(timeout)) => {
            assert_eq!(timeout_exp, timeout);
        }
        _ => panic!("Expected timeout error, but got a different result."),
    }
}

#[rstest]
fn test_query_timeout(mut no_term_link: TestLink) {
    let timeout_exp = Duration::from_secs(0);
    let query_exp = "QUERY";

    match no_term_link.query(query_exp) {
        Err(LinkError::TimeoutQuery { query, timeout }) => {
            assert_eq!(query_exp, query);
            assert_eq!(timeout_exp, timeout);
        }
        _ => panic!("Expected timeout error, but got a different result."),
    }
}
