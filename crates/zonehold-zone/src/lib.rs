//! # Zonehold Zone Store
//!
//! An in-memory, concurrency-safe store for the records of one
//! authoritative DNS zone:
//!
//! - **Canonical keys**: owner names are indexed by their reversed,
//!   lowercased labels, so index order is DNSSEC canonical order
//! - **Two-tier locking**: a zone-wide lock guards the name index, and each
//!   owner name guards its own record sets
//! - **Neighbour lookups**: predecessor and successor queries for NSEC
//!   proofs and wildcard synthesis
//! - **Signing walk**: hands every authoritative name, with its canonical
//!   successor, to an external [`ZoneSigner`]
//!
//! ## Example
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use std::str::FromStr;
//! use zonehold_proto::{Name, RecordType, ResourceRecord};
//! use zonehold_zone::Zone;
//!
//! let zone = Zone::new("example.com.")?;
//! let www = Name::from_str("www.example.com.")?;
//! zone.insert(ResourceRecord::a(www.clone(), 300, Ipv4Addr::new(192, 0, 2, 1)))?;
//!
//! let node = zone.find(&www).expect("just inserted");
//! assert_eq!(node.records(RecordType::A).len(), 1);
//!
//! let before = zone.predecessor_str("zzz.example.com.")?.expect("www precedes zzz");
//! assert_eq!(before.name(), &www);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod error;
pub mod index;
pub mod key;
pub mod node;
pub mod sign;
pub mod zone;

pub use error::{Result, ZoneError};
pub use index::{BTreeIndex, OrderedIndex};
pub use key::CanonicalKey;
pub use node::{RecordRole, RecordSets, ZoneData};
pub use sign::{NodeContext, NodeSignatures, SignReport, SigningKeys, SigningWindow, ZoneSigner};
pub use zone::Zone;
pub use zonehold_config::SignatureConfig;
