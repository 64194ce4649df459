//! Application layer orchestrating receipt creation.
//!
//! This module defines the `ReceiptService`, which authenticates against the
//! receipt API on demand and submits income receipts through the `IncomeApi` port.

pub mod receipts;
