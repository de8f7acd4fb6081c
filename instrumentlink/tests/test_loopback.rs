//! Test cases for the LoopbackLink.

use rstest::*;

use instrumentlink::{InstrumentLink, LoopbackLink};

/// A function that creates a new `LoopbackLink` with the given input and
/// output vectors.
fn crt_lbk(from_host: Vec<&str>, from_inst: Vec<&str>) -> LoopbackLink {
    let h2i: Vec<String> = from_host.iter().map(|s| s.to_string()).collect();
    let i2h: Vec<String> = from_inst.iter().map(|s| s.to_string()).collect();
    LoopbackLink::new(h2i, i2h, "\n")
}

/// Create a loopback link that contains no commands.
#[fixture]
fn emp_lbk() -> LoopbackLink {
    crt_lbk(vec![], vec![])
}

/// Ensure `finalize` method passes if an empty loopback link is used.
#[rstest]
fn finalize_test(mut emp_lbk: LoopbackLink) {
    emp_lbk.finalize();
}

/// Ensure `finalize` method panics if commands are left in the loopback link.
#[rstest]
#[case(vec!["cmd"], vec![])]
#[case(vec![], vec!["resp"])]
#[case(vec!["cmd"], vec!["resp"])]
#[should_panic]
fn finalize_test_panic(#[case] from_host: Vec<&str>, #[case] from_inst: Vec<&str>) {
    let mut lbk = crt_lbk(from_host, from_inst);
    lbk.finalize();
}

#[rstest]
fn sendcmd() {
    let mut lbk = crt_lbk(vec!["cmd1", "cmd2"], vec![]);
    lbk.sendcmd("cmd1").unwrap();
    lbk.sendcmd("cmd2").unwrap();
}

#[rstest]
#[should_panic]
fn sendcmd_mismatch() {
    let mut lbk = crt_lbk(vec!["cmd1"], vec![]);
    let _ = lbk.sendcmd("cmd3");
}

#[rstest]
fn terminator_default(emp_lbk: LoopbackLink) {
    assert_eq!(emp_lbk.get_terminator(), "\n");
}

#[rstest]
fn terminator_set(mut emp_lbk: LoopbackLink) {
    emp_lbk.set_terminator("\r\n");
    assert_eq!(emp_lbk.get_terminator(), "\r\n");
}

#[rstest]
fn query() {
    let mut lbk = crt_lbk(vec!["cmd1", "cmd2"], vec!["resp1", "resp2"]);
    let resp1 = lbk.query("cmd1").unwrap();
    assert_eq!(resp1, "resp1");
    let resp2 = lbk.query("cmd2").unwrap();
    assert_eq!(resp2, "resp2");
}

/// The expected terminator is part of the command comparison: a driver that
/// keeps the default terminator fails against a link expecting another one.
#[rstest]
#[should_panic]
fn terminator_mismatch() {
    let mut lbk = LoopbackLink::new(vec!["cmd1".to_string()], vec![], "\r");
    let _ = lbk.sendcmd("cmd1");
}
