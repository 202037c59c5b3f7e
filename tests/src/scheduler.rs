#![cfg(test)]
//! Scheduler behavior under a paused clock: fixed-rate pacing, subnet
//! de-duplication, and resilience to per-subnet failures.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{self, Instant};

use whoshome_common::error::ProbeInfraError;
use whoshome_common::network::subnet::Subnet;
use whoshome_core::registry::{DeviceRecord, MemoryRegistry};
use whoshome_core::routes::SubnetResolver;
use whoshome_core::scheduler::UpdateScheduler;
use whoshome_core::status::UpdateStatus;
use whoshome_core::sweep::Sweeper;

/// Resolves any address to its enclosing /24, as a live route table would
/// for a directly attached segment.
struct FixedResolver;

#[async_trait]
impl SubnetResolver for FixedResolver {
    async fn resolve(&self, addr: Ipv4Addr) -> Result<Option<Subnet>, ProbeInfraError> {
        Ok(Some(Subnet::new(addr, 24).unwrap()))
    }
}

/// Pretends no route covers anything.
struct DeadResolver;

#[async_trait]
impl SubnetResolver for DeadResolver {
    async fn resolve(&self, _addr: Ipv4Addr) -> Result<Option<Subnet>, ProbeInfraError> {
        Ok(None)
    }
}

struct RecordingSweeper {
    starts: Mutex<Vec<Instant>>,
    subnets: Mutex<Vec<Subnet>>,
    sweep_time: Duration,
    fail_for: Option<Subnet>,
}

impl RecordingSweeper {
    fn new(sweep_time: Duration) -> Self {
        Self {
            starts: Mutex::new(Vec::new()),
            subnets: Mutex::new(Vec::new()),
            sweep_time,
            fail_for: None,
        }
    }

    fn failing_for(subnet: Subnet) -> Self {
        Self {
            fail_for: Some(subnet),
            ..Self::new(Duration::ZERO)
        }
    }
}

#[async_trait]
impl Sweeper for RecordingSweeper {
    async fn sweep(&self, subnet: &Subnet) -> Result<(), ProbeInfraError> {
        self.starts.lock().unwrap().push(Instant::now());
        self.subnets.lock().unwrap().push(*subnet);

        time::sleep(self.sweep_time).await;

        if self.fail_for == Some(*subnet) {
            return Err(ProbeInfraError::UnreadableOutput {
                command: "ping",
                reason: "injected failure".into(),
            });
        }
        Ok(())
    }
}

fn device(name: &str, mac: &str, network: &str) -> DeviceRecord {
    DeviceRecord {
        name: name.into(),
        lladdr: mac.parse().unwrap(),
        network: network.parse().unwrap(),
    }
}

#[tokio::test(start_paused = true)]
async fn cycles_run_at_a_fixed_rate() {
    let registry = Arc::new(MemoryRegistry::with_records(vec![device(
        "laptop",
        "aa:bb:cc:dd:ee:ff",
        "10.0.0.0/24",
    )]));
    // Each cycle spends 10s sweeping against a 300s interval, so starts
    // should land exactly 300s apart (290s sleep), not 310s.
    let sweeper = Arc::new(RecordingSweeper::new(Duration::from_secs(10)));
    let status = Arc::new(UpdateStatus::new());

    let scheduler = UpdateScheduler::new(
        registry,
        Arc::new(FixedResolver),
        Arc::clone(&sweeper) as Arc<dyn Sweeper>,
        status,
        Duration::from_secs(300),
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(stop_rx));

    time::sleep(Duration::from_secs(650)).await;
    stop_tx.send(true).unwrap();
    handle.await.unwrap();

    let starts = sweeper.starts.lock().unwrap().clone();
    assert_eq!(starts.len(), 3, "expected cycle starts at 0s, 300s, 600s");
    assert_eq!(starts[1] - starts[0], Duration::from_secs(300));
    assert_eq!(starts[2] - starts[1], Duration::from_secs(300));
}

#[tokio::test(start_paused = true)]
async fn overrunning_cycles_restart_immediately() {
    let registry = Arc::new(MemoryRegistry::with_records(vec![device(
        "laptop",
        "aa:bb:cc:dd:ee:ff",
        "10.0.0.0/24",
    )]));
    // 40s of sweeping against a 30s interval: no sleep between cycles.
    let sweeper = Arc::new(RecordingSweeper::new(Duration::from_secs(40)));
    let status = Arc::new(UpdateStatus::new());

    let scheduler = UpdateScheduler::new(
        registry,
        Arc::new(FixedResolver),
        Arc::clone(&sweeper) as Arc<dyn Sweeper>,
        status,
        Duration::from_secs(30),
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(stop_rx));

    time::sleep(Duration::from_secs(100)).await;
    stop_tx.send(true).unwrap();
    handle.await.unwrap();

    let starts = sweeper.starts.lock().unwrap().clone();
    assert!(starts.len() >= 3);
    assert_eq!(starts[1] - starts[0], Duration::from_secs(40));
    assert_eq!(starts[2] - starts[1], Duration::from_secs(40));
}

#[tokio::test(start_paused = true)]
async fn one_failing_subnet_does_not_spoil_the_cycle() {
    let registry = Arc::new(MemoryRegistry::with_records(vec![
        device("desktop", "aa:aa:aa:aa:aa:aa", "10.0.0.0/24"),
        device("phone", "bb:bb:bb:bb:bb:bb", "10.0.1.0/24"),
    ]));
    let poisoned: Subnet = "10.0.0.0/24".parse().unwrap();
    let sweeper = Arc::new(RecordingSweeper::failing_for(poisoned));
    let status = Arc::new(UpdateStatus::new());

    let scheduler = UpdateScheduler::new(
        registry,
        Arc::new(FixedResolver),
        Arc::clone(&sweeper) as Arc<dyn Sweeper>,
        Arc::clone(&status),
        Duration::from_secs(60),
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(stop_rx));

    time::sleep(Duration::from_secs(70)).await;
    stop_tx.send(true).unwrap();
    handle.await.unwrap();

    // The failing subnet was attempted, the healthy one was still swept,
    // freshness was recorded, and a second cycle ran.
    let subnets = sweeper.subnets.lock().unwrap().clone();
    assert!(subnets.contains(&poisoned));
    assert!(subnets.contains(&"10.0.1.0/24".parse().unwrap()));
    assert_eq!(subnets.len(), 4, "both subnets in both cycles");
    assert!(status.last_cycle_start().is_some());
}

#[tokio::test(start_paused = true)]
async fn devices_on_the_same_segment_share_one_sweep() {
    let registry = Arc::new(MemoryRegistry::with_records(vec![
        device("desktop", "aa:aa:aa:aa:aa:aa", "192.168.1.0/24"),
        device("phone", "bb:bb:bb:bb:bb:bb", "192.168.1.0/24"),
    ]));
    let sweeper = Arc::new(RecordingSweeper::new(Duration::ZERO));
    let status = Arc::new(UpdateStatus::new());

    let scheduler = UpdateScheduler::new(
        registry,
        Arc::new(FixedResolver),
        Arc::clone(&sweeper) as Arc<dyn Sweeper>,
        status,
        Duration::from_secs(60),
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(stop_rx));

    time::sleep(Duration::from_secs(10)).await;
    stop_tx.send(true).unwrap();
    handle.await.unwrap();

    assert_eq!(sweeper.subnets.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn unroutable_registrations_are_skipped_quietly() {
    let registry = Arc::new(MemoryRegistry::with_records(vec![device(
        "old-laptop",
        "aa:bb:cc:dd:ee:ff",
        "10.9.9.0/24",
    )]));
    let sweeper = Arc::new(RecordingSweeper::new(Duration::ZERO));
    let status = Arc::new(UpdateStatus::new());

    let scheduler = UpdateScheduler::new(
        registry,
        Arc::new(DeadResolver),
        Arc::clone(&sweeper) as Arc<dyn Sweeper>,
        Arc::clone(&status),
        Duration::from_secs(60),
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(stop_rx));

    time::sleep(Duration::from_secs(10)).await;
    stop_tx.send(true).unwrap();
    handle.await.unwrap();

    // Nothing swept, but the cycle still completed and recorded freshness.
    assert!(sweeper.subnets.lock().unwrap().is_empty());
    assert!(status.last_cycle_start().is_some());
}
