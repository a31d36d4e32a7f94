//! `reconn probe <addr>` – connect through the reconnect loop and report how
//! many reconnects it took.

use anyhow::{Context, Result};
use reconn_core::config::ReconnConfig;
use reconn_core::dial::{DialTarget, ProbeTransport, TcpDialer};
use reconn_core::retry::{Reconnector, TracingObserver};
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeOptions {
    pub max_retries: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub debug: bool,
}

pub fn run_probe(cfg: &ReconnConfig, addr: &str, opts: ProbeOptions) -> Result<()> {
    let mut reconnect = cfg.reconnect.clone();
    if let Some(n) = opts.max_retries {
        reconnect.max_retries = n;
    }
    reconnect.debug |= opts.debug;

    let mut dial = cfg.dial_or_default();
    if let Some(ms) = opts.timeout_ms {
        dial.timeout_ms = ms;
    }

    let mut probe = ProbeTransport::new(DialTarget::tcp(addr, &dial), TcpDialer);
    let observer = TracingObserver::new(reconnect.debug);
    let r = Reconnector::new(&reconnect, &observer);
    let mut budget = r.budget();
    let started = Instant::now();

    r.ensure_connected(&mut probe, &mut budget)
        .with_context(|| format!("{addr} unreachable after {} reconnects", budget.attempts()))?;

    let peer = probe
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|| addr.to_string());
    println!(
        "{} reachable ({} reconnects, {:.2?})",
        peer,
        budget.attempts(),
        started.elapsed()
    );
    probe.close();
    Ok(())
}
