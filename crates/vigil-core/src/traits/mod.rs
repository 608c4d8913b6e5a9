// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits. The gateway and the notifier are the two seams the
//! monitor session talks across; both have mock implementations in
//! `vigil-test-utils`.

pub mod gateway;
pub mod notifier;

pub use gateway::ChatGateway;
pub use notifier::Notifier;
