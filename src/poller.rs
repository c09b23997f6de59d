//! The polling loop: fetch, evaluate, render, sleep, forever.
//!
//! Errors from the fetch step are logged and retried after the same fixed
//! interval; they never end the loop. The loop stops only when the shutdown
//! channel flips to `true` (or its sender goes away).

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::alert::AlertPolicy;
use crate::clock::Clock;
use crate::display::{render, DisplayState, SharedDisplay};
use crate::source::ReadingSource;

// ---

/// Delay between cycles. Injected so tests do not wait in real time.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

pub struct Poller<S, C, Z> {
    // ---
    source: S,
    clock: C,
    sleeper: Z,
    display: SharedDisplay,
    policy: AlertPolicy,
    name: String,
    interval: Duration,
}

impl<S, C, Z> Poller<S, C, Z>
where
    S: ReadingSource,
    C: Clock,
    Z: Sleeper,
{
    pub fn new(
        source: S,
        clock: C,
        sleeper: Z,
        display: SharedDisplay,
        policy: AlertPolicy,
        name: impl Into<String>,
        interval: Duration,
    ) -> Self {
        // ---
        Self {
            source,
            clock,
            sleeper,
            display,
            policy,
            name: name.into(),
            interval,
        }
    }

    /// One fetch-evaluate-render pass. On error nothing is published.
    pub async fn run_cycle(&self) -> Result<DisplayState> {
        // ---
        let reading = self.source.fetch().await?;
        debug!("Response is {:?}", reading);

        let now = self.clock.now_millis();
        let state = render(&reading, now, &self.name, &self.policy);
        self.display.publish(state.clone()).await;

        Ok(state)
    }

    /// Run cycles until shutdown, sleeping `interval` after each one.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        // ---
        info!("Starting poller with {:?} interval", self.interval);

        loop {
            if *shutdown.borrow() {
                break;
            }

            if let Err(e) = self.run_cycle().await {
                error!("Fetch failed, retrying in {:?}: {:#}", self.interval, e);
            }

            tokio::select! {
                _ = self.sleeper.sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Poller stopped");
    }
}
