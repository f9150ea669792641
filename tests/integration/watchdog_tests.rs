//! Integration tests for connectivity supervision against the scripted
//! link driver: fault-check cadence, retry spacing, and the boot join.

use crate::mock_hw::MockLink;

use relaynode::app::ports::LinkStatus;
use relaynode::config::SystemConfig;
use relaynode::control::watchdog::{ConnectivityState, ConnectivityWatchdog};
use relaynode::error::LinkError;

fn run(wd: &mut ConnectivityWatchdog, link: &mut MockLink, from: u64, to: u64, step: u64) {
    let mut now = from;
    while now <= to {
        link.now = now;
        wd.tick(now, link);
        now += step;
    }
}

#[test]
fn fault_check_fires_at_most_once_per_interval() {
    let mut wd = ConnectivityWatchdog::new(&SystemConfig::default());
    let mut link = MockLink::new();

    // Busy loop at 1 ms for 12 s of healthy link.
    run(&mut wd, &mut link, 0, 12_000, 1);

    assert_eq!(link.status_calls, vec![3_000, 6_000, 9_000, 12_000]);
    assert!(link.connect_calls.is_empty());
    assert_eq!(wd.state(), ConnectivityState::Connected);
}

#[test]
fn no_status_probes_while_reconnecting() {
    let mut wd = ConnectivityWatchdog::new(&SystemConfig::default());
    let mut link = MockLink::new();

    link.script_status(LinkStatus::ConnectionLost);
    link.script_connect(Err(LinkError::AssociationFailed));
    link.script_connect(Err(LinkError::AssociationFailed));
    link.script_connect(Ok(()));

    run(&mut wd, &mut link, 0, 23_000, 10);

    // One probe found the fault; the retry machine then owns the link
    // until reassociation (no cadence checks in between).
    assert_eq!(link.status_calls, vec![3_000]);
    assert_eq!(link.connect_calls, vec![3_000, 13_000, 23_000]);
    assert_eq!(wd.state(), ConnectivityState::Connected);
}

#[test]
fn all_fault_statuses_trigger_recovery() {
    for fault in [
        LinkStatus::ConnectionLost,
        LinkStatus::Disconnected,
        LinkStatus::ScanCompleted,
    ] {
        let mut wd = ConnectivityWatchdog::new(&SystemConfig::default());
        let mut link = MockLink::new();
        link.script_status(fault);
        link.script_connect(Ok(()));

        run(&mut wd, &mut link, 0, 3_000, 10);

        assert_eq!(
            link.connect_calls,
            vec![3_000],
            "status {fault:?} must enter recovery"
        );
        assert_eq!(wd.state(), ConnectivityState::Connected);
    }
}

#[test]
fn boot_join_uses_the_same_retry_machine() {
    let mut wd = ConnectivityWatchdog::new(&SystemConfig::default());
    let mut link = MockLink::new();

    link.script_connect(Err(LinkError::AssociationFailed));
    link.script_connect(Ok(()));

    wd.begin_association(0);
    run(&mut wd, &mut link, 0, 10_000, 10);

    assert_eq!(link.connect_calls, vec![0, 10_000]);
    assert_eq!(wd.state(), ConnectivityState::Connected);
    // The cadence probe never ran: the boot join needs no fault detection.
    assert!(link.status_calls.is_empty());
}

#[test]
fn recovered_link_resumes_normal_cadence() {
    let mut wd = ConnectivityWatchdog::new(&SystemConfig::default());
    let mut link = MockLink::new();

    link.script_status(LinkStatus::Disconnected);
    link.script_connect(Ok(()));

    run(&mut wd, &mut link, 0, 9_000, 10);

    // Fault + instant recovery at 3000, then checks resume 3 s later.
    assert_eq!(link.status_calls, vec![3_000, 6_000, 9_000]);
    assert_eq!(wd.state(), ConnectivityState::Connected);
}
