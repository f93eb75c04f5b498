// # ddsync-core
//
// Core library for the ddsync dynamic DNS reconciler.
//
// ## Architecture Overview
//
// This library provides the reconciliation core that keeps provider-side
// address records aligned with the machine's current public IPs:
// - **IpResolver**: Trait for discovering the current public IP per family
// - **DnsGateway**: Trait for querying and writing provider DNS records
// - **SyncEngine**: Reconciler, round orchestrator and scheduler loop
// - **SyncConfig**: Immutable process configuration built once at startup
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core decision logic is separate from
//    the HTTP resolver and provider gateway implementations
// 2. **Failure Isolation**: One malformed domain or one failing provider
//    call never aborts the rest of a round
// 3. **Stateless Rounds**: Desired state is re-derived every round from the
//    current public IP and the provider's current records; nothing is cached
// 4. **Library-First**: The engine can be embedded with custom resolver and
//    gateway implementations

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod traits;

// Re-export core types for convenience
pub use config::{Credentials, SyncConfig};
pub use domain::{SplitDomain, split_domain};
pub use engine::{EngineEvent, SyncEngine};
pub use error::{Error, Result};
pub use traits::{AddressFamily, DnsGateway, IpResolver, RecordHandle};
