// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Busy indicator reported around store operations.
//!
//! The flag is advisory display state. Nothing in the store checks it.

/// Busy flag plus a human-readable message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    busy: bool,
    message: String,
}

impl StoreStatus {
    /// Create a status
    pub fn new(busy: bool, message: impl Into<String>) -> Self {
        Self {
            busy,
            message: message.into(),
        }
    }

    /// Idle status with no message
    pub fn idle() -> Self {
        Self::default()
    }

    /// Busy status with a message
    pub fn busy(message: impl Into<String>) -> Self {
        Self::new(true, message)
    }

    /// Check if an operation is in progress
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Get the status message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Receives every status change of a store
pub trait StatusReporter {
    /// Called after the status changes
    fn report(&mut self, status: &StoreStatus);
}

impl<F> StatusReporter for F
where
    F: FnMut(&StoreStatus),
{
    fn report(&mut self, status: &StoreStatus) {
        self(status)
    }
}
