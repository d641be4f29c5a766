//! Context broker client.
//!
//! Maps [`model`] entities onto the broker's REST surface: create, read,
//! update and delete by `(type, id)`, existence checks, and paginated
//! listing by type.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Wire framing, HTTP transport and status interpretation
//! live here. Callers see only [`BrokerClient`], the [`model`] types, and
//! [`BrokerError`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`client`] | `BrokerClient` operations and the pagination driver |
//! | [`transport`] | `Transport` port and `HttpTransport` |
//! | [`config`] | `BrokerConfig` and environment loading |
//! | [`errors`] | `BrokerError`, `TransportError`, `PartialListing` |
//! | `wire` | Private JSON envelope shapes |
//!
//! ## Example
//!
//! ```no_run
//! use broker::{BrokerClient, BrokerConfig};
//! use model::ContextEntity;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BrokerClient::from_config(&BrokerConfig::from_env()?)?;
//! let rooms = client.list_all("Room", ContextEntity::new).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod transport;
mod wire;

pub use client::BrokerClient;
pub use config::BrokerConfig;
pub use errors::{BrokerError, BrokerResult, PartialListing, TransportError, STATUS_OK};
pub use transport::{HttpTransport, Method, Transport, TransportRequest};
