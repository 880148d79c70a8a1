//! Dependency invalidation after a route-set change.
//!
//! ```text
//! seeds (registration modules + virtual module)
//!   → importer closure
//!   → invalidate each module
//!   → targeted update, or full reload after a grace delay
//! ```

use std::time::Duration;

use thiserror::Error;

use super::graph::{ModuleGraph, importer_closure};
use super::message::HmrMessage;

/// Delay before a fallback full reload.
pub const RELOAD_GRACE_MS: u64 = 50;

#[derive(Debug, Error)]
pub enum InvalidateError {
    #[error("hot update channel closed")]
    ChannelClosed,

    #[error("failed to send hot update: {0}")]
    Send(String),
}

/// Host-side effects of an invalidation.
pub trait HmrChannel {
    /// Drop the cached evaluation of `module`.
    fn invalidate(&mut self, module: &str) -> Result<(), InvalidateError>;

    /// Deliver a message to connected clients.
    fn send(&mut self, message: HmrMessage) -> Result<(), InvalidateError>;
}

/// What an invalidation round ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Targeted(Vec<String>),
    FullReload(String),
}

pub struct Invalidator {
    seeds: Vec<String>,
    grace: Duration,
}

impl Invalidator {
    pub fn new(seeds: Vec<String>) -> Self {
        Self {
            seeds,
            grace: Duration::from_millis(RELOAD_GRACE_MS),
        }
    }

    /// Run one invalidation round against the host.
    pub async fn run<G, C>(&self, graph: &G, channel: &mut C) -> Outcome
    where
        G: ModuleGraph + ?Sized,
        C: HmrChannel + ?Sized,
    {
        let closure = importer_closure(graph, &self.seeds);
        if closure.is_empty() {
            return self
                .full_reload(channel, "no route modules loaded by the host")
                .await;
        }

        crate::debug!("hmr"; "invalidating {} modules", closure.len());

        match self.targeted(&closure, channel) {
            Ok(()) => Outcome::Targeted(closure),
            Err(e) => {
                crate::log!("hmr"; "targeted update failed: {}", e);
                self.full_reload(channel, &e.to_string()).await
            }
        }
    }

    fn targeted<C>(&self, closure: &[String], channel: &mut C) -> Result<(), InvalidateError>
    where
        C: HmrChannel + ?Sized,
    {
        for module in closure {
            channel.invalidate(module)?;
        }
        channel.send(HmrMessage::update(closure.iter().cloned()))
    }

    async fn full_reload<C>(&self, channel: &mut C, reason: &str) -> Outcome
    where
        C: HmrChannel + ?Sized,
    {
        tokio::time::sleep(self.grace).await;
        if let Err(e) = channel.send(HmrMessage::full_reload(reason)) {
            crate::log!("error"; "full reload not delivered: {}", e);
        }
        Outcome::FullReload(reason.to_string())
    }
}
