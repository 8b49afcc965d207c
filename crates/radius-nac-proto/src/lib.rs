//! RADIUS protocol support for network access control
//!
//! This crate provides the packet-level pieces needed to talk to NAS devices
//! and external RADIUS servers: packet framing (RFC 2865, RFC 5176 codes),
//! authenticators, and above all the vendor-specific sub-attribute codec.
//!
//! # Features
//!
//! - Packet encoding and decoding, including CoA and Disconnect codes
//! - Request/Response Authenticator calculation
//! - Vendor-Specific sub-attribute scanning and in-packet add/set/delete
//! - Typed accessors for Wimark, Cisco and RDP sub-attributes
//! - External-auth role/location extraction
//!
//! # Example
//!
//! ```rust
//! use radius_nac_proto::dictionary::{WIMARK_CLIENT_GROUP, WIMARK_SESSION_TIMEOUT};
//! use radius_nac_proto::{Code, Packet};
//!
//! let mut packet = Packet::request(Code::CoaRequest, "testing123");
//! WIMARK_CLIENT_GROUP.add_string(&mut packet, "guests").unwrap();
//! WIMARK_SESSION_TIMEOUT.set(&mut packet, &600).unwrap();
//!
//! assert_eq!(WIMARK_CLIENT_GROUP.get_string(&packet), "guests");
//!
//! // Encode to bytes
//! let bytes = packet.encode().unwrap();
//! assert_eq!(bytes.len(), packet.length());
//! ```

pub mod attributes;
pub mod auth;
pub mod avpair;
pub mod dictionary;
pub mod external_auth;
pub mod packet;
pub mod vendor;
pub mod vsa;

pub use attributes::{Attribute, AttributeType};
pub use auth::{
    calculate_request_authenticator, calculate_response_authenticator,
    generate_request_authenticator, sign_request, verify_request_authenticator,
    verify_response_authenticator,
};
pub use avpair::{Avp, AvpError, CiscoAvps, WimarkAvps};
pub use dictionary::{AccessorSpec, Codec, Integer, Octets, Text, ValueKind, VendorAttribute};
pub use external_auth::{ExternalAuthError, ExternalAuthResult, extract_external_auth};
pub use packet::{Code, Packet, PacketError};
pub use vendor::{VENDOR_ALU, VENDOR_CISCO, VENDOR_RDP, VENDOR_WIMARK, Vendor};
pub use vsa::{Vsa, VsaError, VsaIter};
