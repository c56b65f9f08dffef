//! # TAK - agent coordination for multi-agent commerce
//!
//! TAK coordinates; it never holds funds.
//!
//! ## Architecture
//!
//! - **Client**: reqwest wrapper for the TAK REST API (agents, services,
//!   requests, offers, deals, deal messages). Writes are stamped with the
//!   schema version and an idempotency key.
//! - **MCP Adapter**: pluggable payment execution for approved deals. The
//!   bare adapter and the TON stub always fail; the mock returns fake receipts.

pub mod adapter;
pub mod client;
pub mod config;
pub mod error;
pub mod idempotency;
pub mod logging;
pub mod model;

pub use adapter::{build_adapter, dispatch_payment, McpAdapter, MockMcpAdapter, TonMcpAdapter, UnimplementedAdapter};
pub use client::TakClient;
pub use config::{AppConfig, SCHEMA_VERSION};
pub use error::{Result, TakError};
pub use model::{Deal, DealAction, OfferStatus};
