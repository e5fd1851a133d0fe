// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Collaborator implementations for the stays booking engine
//!
//! Fake catalog, messenger, and invoice adapters for tests and local
//! embedding, plus a traced messenger wrapper for observability.

pub mod catalog;
pub mod invoice;
pub mod notify;
pub mod traced;

pub use catalog::FakeCatalog;
pub use invoice::{FakeInvoicer, InvoiceCall};
pub use notify::{Audience, FakeMessenger, NoticeCall};
pub use traced::TracedMessenger;
