//! RADIUS client and listener for network access control
//!
//! This crate sends Change-of-Authorization requests to NAS devices and
//! exchanges RADIUS packets with an ordered list of servers, built on top
//! of the `radius-nac-proto` packet and vendor-attribute codec.
//!
//! # Features
//!
//! - Async UDP exchange with Tokio, with resend and reply validation
//! - Sequential fail-over across several servers
//! - CoA request building and CoA-ACK checking
//! - A small packet server for CoA listeners and tests
//! - JSON configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use radius_nac::{ClientConfig, CoaRequest, UdpExchanger, VsaEntry, send_coa_reliably};
//! use radius_nac_proto::VENDOR_WIMARK;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let exchanger = UdpExchanger::new(ClientConfig::default());
//!     let request = CoaRequest {
//!         framed_ip_address: "10.0.0.15".to_string(),
//!         acct_session_id: "5F3A0001".to_string(),
//!         session_timeout: 3600,
//!         idle_timeout: 600,
//!         vsas: vec![VsaEntry::text(VENDOR_WIMARK, 3, "guests")],
//!     };
//!
//!     let servers = ["192.168.1.10:3799", "192.168.1.11:3799"];
//!     send_coa_reliably(&exchanger, &servers, "testing123", &request).await?;
//!     Ok(())
//! }
//! ```

pub mod coa;
pub mod config;
pub mod error;
pub mod exchange;
pub mod reliable;
pub mod server;

pub use coa::{CoaError, CoaRequest, VsaEntry, VsaValue, build_coa_packet, send_coa, send_coa_reliably};
pub use config::{Config, ConfigError, ServerSettings};
pub use error::{ExchangeError, ExchangeResult};
pub use exchange::{ClientConfig, Exchanger, UdpExchanger, send_packet};
pub use reliable::exchange_reliably;
pub use server::{
    Handler, PacketServer, Request, SecretSource, ServerError, StaticSecretSource, listen, spawn,
};
