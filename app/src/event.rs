//! Events published by the facade.

use surety_governance::GovernanceEvent;
use surety_insurance::InsuranceEvent;
use surety_oracle::OracleEvent;
use surety_types::{AccountId, Amount};

/// Everything observable that the engine did, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    OperatingStatusChanged { operational: bool, by: AccountId },
    Governance(GovernanceEvent),
    Oracle(OracleEvent),
    Insurance(InsuranceEvent),
    /// Credit left the escrow for the passenger's wallet.
    CreditWithdrawn { passenger: AccountId, amount: Amount },
}

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast to
/// avoid stalling the caller's operation.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&AppEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&AppEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &AppEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
