// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Vigil integration tests.
//!
//! Provides mock implementations of the gateway and notifier collaborator
//! traits plus a session harness that assembles a running monitor session
//! around them.

pub mod harness;
pub mod mock_gateway;
pub mod mock_notifier;

pub use harness::SessionHarness;
pub use mock_gateway::MockGateway;
pub use mock_notifier::MockNotifier;
