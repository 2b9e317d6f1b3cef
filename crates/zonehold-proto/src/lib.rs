//! # Zonehold DNS Data Model
//!
//! The parsed-record vocabulary shared by the zonehold crates:
//!
//! - **Domain names** with escape-aware presentation parsing, case-insensitive
//!   comparison and RFC 4034 canonical ordering
//! - **Record types and classes**
//! - **RDATA** for the types a signed authoritative zone carries (address,
//!   delegation, text, SOA and the DNSSEC types)
//! - **Resource records** as owned, immutable values
//!
//! Message encoding and zone-file syntax live elsewhere; this crate only models
//! records that were already parsed.
//!
//! ## Example
//!
//! ```rust
//! use zonehold_proto::{Name, ResourceRecord};
//! use std::net::Ipv4Addr;
//! use std::str::FromStr;
//!
//! let owner = Name::from_str("www.example.com.").unwrap();
//! let record = ResourceRecord::a(owner.clone(), 3600, Ipv4Addr::new(192, 0, 2, 1));
//! assert_eq!(record.name(), &owner);
//! assert!(owner.is_subdomain_of(&Name::from_str("example.com.").unwrap()));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod class;
pub mod error;
pub mod name;
pub mod rdata;
pub mod record;
pub mod rtype;

pub use class::Class;
pub use error::{Error, Result};
pub use name::Name;
pub use rdata::RData;
pub use record::ResourceRecord;
pub use rtype::{RecordType, Type};

/// Maximum length of a DNS label (63 bytes per RFC 1035)
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum length of a domain name (255 bytes per RFC 1035)
pub const MAX_NAME_LENGTH: usize = 255;
