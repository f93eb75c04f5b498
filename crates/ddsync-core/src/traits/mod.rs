//! Core traits for the ddsync system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpResolver`]: Discover the machine's current public IP per family
//! - [`DnsGateway`]: Query and write DNS records via a provider API

pub mod dns_gateway;
pub mod ip_resolver;

pub use dns_gateway::{DnsGateway, RecordHandle};
pub use ip_resolver::{AddressFamily, IpResolver};
