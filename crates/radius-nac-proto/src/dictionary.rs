//! Typed accessors for vendor sub-attributes
//!
//! Every known sub-attribute is a [`VendorAttribute`] constant parameterised
//! by its value codec. All of them share the same operation family:
//!
//! | operation | not present            | undecodable value |
//! |-----------|------------------------|-------------------|
//! | `add`     | -                      | -                 |
//! | `get`     | zero value             | zero value        |
//! | `gets`    | empty list             | error             |
//! | `lookup`  | [`VsaError::NoAttribute`] | error          |
//! | `set`     | adds                   | -                 |
//! | `del`     | no-op                  | -                 |
//!
//! The `*_string` readers of octet-valued entries never fail on their bytes:
//! invalid UTF-8 comes back with U+FFFD in its place.
//!
//! ```rust
//! use radius_nac_proto::dictionary::{WIMARK_SESSION_TIMEOUT, WIMARK_WLAN_ID};
//! use radius_nac_proto::{Code, Packet};
//!
//! let mut packet = Packet::new(Code::AccessAccept, 1, [0u8; 16]);
//! WIMARK_SESSION_TIMEOUT.add(&mut packet, &3600).unwrap();
//! WIMARK_WLAN_ID.add_string(&mut packet, "corp-wifi").unwrap();
//!
//! assert_eq!(WIMARK_SESSION_TIMEOUT.get(&packet), 3600);
//! assert_eq!(WIMARK_WLAN_ID.get_string(&packet), "corp-wifi");
//! ```

use crate::packet::Packet;
use crate::vendor::{VENDOR_CISCO, VENDOR_RDP, VENDOR_WIMARK};
use crate::vsa::VsaError;
use std::marker::PhantomData;

/// Value encoding of a sub-attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// UTF-8 text, no terminator
    Text,
    /// Opaque bytes
    Octets,
    /// 32-bit unsigned integer, big-endian
    Integer,
}

/// Conversion between a Rust value and sub-attribute value bytes
pub trait Codec {
    /// Borrowed form accepted by writers
    type Input: ?Sized;
    /// Owned form returned by readers; `Default` is the "zero value"
    type Value: Default;

    const KIND: ValueKind;

    fn encode(input: &Self::Input) -> Vec<u8>;
    fn decode(raw: &[u8]) -> Result<Self::Value, VsaError>;
}

#[derive(Debug, Clone, Copy)]
pub struct Text;

#[derive(Debug, Clone, Copy)]
pub struct Octets;

#[derive(Debug, Clone, Copy)]
pub struct Integer;

impl Codec for Text {
    type Input = str;
    type Value = String;

    const KIND: ValueKind = ValueKind::Text;

    fn encode(input: &str) -> Vec<u8> {
        input.as_bytes().to_vec()
    }

    fn decode(raw: &[u8]) -> Result<String, VsaError> {
        String::from_utf8(raw.to_vec()).map_err(|e| VsaError::Decode {
            codec: "text",
            reason: e.to_string(),
        })
    }
}

impl Codec for Octets {
    type Input = [u8];
    type Value = Vec<u8>;

    const KIND: ValueKind = ValueKind::Octets;

    fn encode(input: &[u8]) -> Vec<u8> {
        input.to_vec()
    }

    fn decode(raw: &[u8]) -> Result<Vec<u8>, VsaError> {
        Ok(raw.to_vec())
    }
}

impl Codec for Integer {
    type Input = u32;
    type Value = u32;

    const KIND: ValueKind = ValueKind::Integer;

    fn encode(input: &u32) -> Vec<u8> {
        input.to_be_bytes().to_vec()
    }

    fn decode(raw: &[u8]) -> Result<u32, VsaError> {
        let bytes: [u8; 4] = raw.try_into().map_err(|_| VsaError::Decode {
            codec: "integer",
            reason: format!("expected 4 bytes, got {}", raw.len()),
        })?;
        Ok(u32::from_be_bytes(bytes))
    }
}

/// Untyped description of a dictionary entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorSpec {
    pub name: &'static str,
    pub vendor_id: u32,
    pub vendor_type: u8,
    pub kind: ValueKind,
}

/// A vendor sub-attribute with a fixed value codec
#[derive(Debug)]
pub struct VendorAttribute<C> {
    pub name: &'static str,
    pub vendor_id: u32,
    pub vendor_type: u8,
    codec: PhantomData<fn() -> C>,
}

impl<C> Clone for VendorAttribute<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for VendorAttribute<C> {}

impl<C> VendorAttribute<C> {
    pub const fn new(name: &'static str, vendor_id: u32, vendor_type: u8) -> Self {
        VendorAttribute {
            name,
            vendor_id,
            vendor_type,
            codec: PhantomData,
        }
    }

    /// The same sub-attribute read through another codec
    const fn with_codec<D>(self) -> VendorAttribute<D> {
        VendorAttribute::new(self.name, self.vendor_id, self.vendor_type)
    }
}

impl<C: Codec> VendorAttribute<C> {
    pub const fn spec(&self) -> AccessorSpec {
        AccessorSpec {
            name: self.name,
            vendor_id: self.vendor_id,
            vendor_type: self.vendor_type,
            kind: C::KIND,
        }
    }

    /// Append a new occurrence
    pub fn add(&self, packet: &mut Packet, value: &C::Input) -> Result<(), VsaError> {
        packet.add_vsa(self.vendor_id, self.vendor_type, &C::encode(value))
    }

    /// First occurrence, or the zero value when absent or undecodable
    pub fn get(&self, packet: &Packet) -> C::Value {
        self.lookup(packet).unwrap_or_default()
    }

    /// Every occurrence in packet order; fails if any one fails to decode
    pub fn gets(&self, packet: &Packet) -> Result<Vec<C::Value>, VsaError> {
        packet
            .vsa_values(self.vendor_id, self.vendor_type)
            .into_iter()
            .map(C::decode)
            .collect()
    }

    /// First occurrence, or [`VsaError::NoAttribute`]
    pub fn lookup(&self, packet: &Packet) -> Result<C::Value, VsaError> {
        let raw = packet
            .lookup_vsa(self.vendor_id, self.vendor_type)
            .ok_or(VsaError::NoAttribute)?;
        C::decode(raw)
    }

    /// Replace all occurrences with `value`
    pub fn set(&self, packet: &mut Packet, value: &C::Input) -> Result<(), VsaError> {
        packet.set_vsa(self.vendor_id, self.vendor_type, &C::encode(value))
    }

    /// Remove all occurrences
    pub fn del(&self, packet: &mut Packet) {
        packet.delete_vsa(self.vendor_id, self.vendor_type);
    }
}

/// Octet-valued sub-attributes are commonly filled with text
impl VendorAttribute<Octets> {
    fn text(&self) -> VendorAttribute<Text> {
        self.with_codec()
    }

    pub fn add_string(&self, packet: &mut Packet, value: &str) -> Result<(), VsaError> {
        self.text().add(packet, value)
    }

    /// Invalid UTF-8 is replaced rather than rejected
    pub fn get_string(&self, packet: &Packet) -> String {
        lossy(&self.get(packet))
    }

    pub fn get_strings(&self, packet: &Packet) -> Result<Vec<String>, VsaError> {
        Ok(self.gets(packet)?.iter().map(|raw| lossy(raw)).collect())
    }

    pub fn lookup_string(&self, packet: &Packet) -> Result<String, VsaError> {
        self.lookup(packet).map(|raw| lossy(&raw))
    }

    pub fn set_string(&self, packet: &mut Packet, value: &str) -> Result<(), VsaError> {
        self.text().set(packet, value)
    }
}

fn lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

pub const WIMARK_CLIENT_GROUP: VendorAttribute<Octets> =
    VendorAttribute::new("Wimark-Client-Group", VENDOR_WIMARK, 3);
pub const WIMARK_SESSION_TIMEOUT: VendorAttribute<Integer> =
    VendorAttribute::new("Wimark-Session-Timeout", VENDOR_WIMARK, 4);
pub const WIMARK_ALWAYS_REDIRECT: VendorAttribute<Integer> =
    VendorAttribute::new("Wimark-Always-Redirect", VENDOR_WIMARK, 5);
pub const WIMARK_WLAN_ID: VendorAttribute<Octets> =
    VendorAttribute::new("Wimark-WLAN-ID", VENDOR_WIMARK, 8);
pub const WIMARK_CPE_ID: VendorAttribute<Octets> =
    VendorAttribute::new("Wimark-CPE-ID", VENDOR_WIMARK, 9);
pub const WIMARK_EXTERNAL_AUTH_USER_ROLE: VendorAttribute<Text> =
    VendorAttribute::new("Wimark-External-Auth-User-Role", VENDOR_WIMARK, 10);
pub const WIMARK_EXTERNAL_AUTH_USER_LOCATION: VendorAttribute<Text> =
    VendorAttribute::new("Wimark-External-Auth-User-Location", VENDOR_WIMARK, 11);
pub const WIMARK_EXTERNAL_AUTH_USER_LOCATION_NAME: VendorAttribute<Text> =
    VendorAttribute::new("Wimark-External-Auth-User-Location-Name", VENDOR_WIMARK, 12);

pub const CISCO_AVPAIR: VendorAttribute<Text> =
    VendorAttribute::new("Cisco-AVPair", VENDOR_CISCO, 1);
pub const CISCO_ACCOUNT_INFO: VendorAttribute<Text> =
    VendorAttribute::new("Cisco-Account-Info", VENDOR_CISCO, 250);
pub const CISCO_COMMAND_CODE: VendorAttribute<Octets> =
    VendorAttribute::new("Cisco-Command-Code", VENDOR_CISCO, 252);

pub const RDP_SERVICE_NAME: VendorAttribute<Text> =
    VendorAttribute::new("RDP-Service-Name", VENDOR_RDP, 250);

/// Every known sub-attribute
pub const DICTIONARY: &[AccessorSpec] = &[
    WIMARK_CLIENT_GROUP.spec(),
    WIMARK_SESSION_TIMEOUT.spec(),
    WIMARK_ALWAYS_REDIRECT.spec(),
    WIMARK_WLAN_ID.spec(),
    WIMARK_CPE_ID.spec(),
    WIMARK_EXTERNAL_AUTH_USER_ROLE.spec(),
    WIMARK_EXTERNAL_AUTH_USER_LOCATION.spec(),
    WIMARK_EXTERNAL_AUTH_USER_LOCATION_NAME.spec(),
    CISCO_AVPAIR.spec(),
    CISCO_ACCOUNT_INFO.spec(),
    CISCO_COMMAND_CODE.spec(),
    RDP_SERVICE_NAME.spec(),
];

/// Find a dictionary entry by name (case-insensitive)
pub fn find_by_name(name: &str) -> Option<&'static AccessorSpec> {
    DICTIONARY.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Find a dictionary entry by vendor and vendor type
pub fn find(vendor_id: u32, vendor_type: u8) -> Option<&'static AccessorSpec> {
    DICTIONARY
        .iter()
        .find(|s| s.vendor_id == vendor_id && s.vendor_type == vendor_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attribute;
    use crate::packet::Code;
    use crate::vsa::VENDOR_SPECIFIC;

    fn packet() -> Packet {
        Packet::new(Code::AccessAccept, 1, [0u8; 16])
    }

    #[test]
    fn test_integer_accessor() {
        let mut p = packet();
        WIMARK_SESSION_TIMEOUT.add(&mut p, &7200).unwrap();
        assert_eq!(p.lookup_vsa(VENDOR_WIMARK, 4), Some(&[0, 0, 0x1c, 0x20][..]));
        assert_eq!(WIMARK_SESSION_TIMEOUT.get(&p), 7200);
        assert_eq!(WIMARK_SESSION_TIMEOUT.lookup(&p), Ok(7200));
    }

    #[test]
    fn test_get_defaults_when_absent() {
        let p = packet();
        assert_eq!(WIMARK_ALWAYS_REDIRECT.get(&p), 0);
        assert_eq!(WIMARK_CPE_ID.get(&p), Vec::<u8>::new());
        assert_eq!(WIMARK_CPE_ID.get_string(&p), "");
        assert_eq!(WIMARK_ALWAYS_REDIRECT.gets(&p), Ok(vec![]));
    }

    #[test]
    fn test_lookup_reports_absence() {
        let p = packet();
        assert_eq!(WIMARK_SESSION_TIMEOUT.lookup(&p), Err(VsaError::NoAttribute));
        assert_eq!(WIMARK_WLAN_ID.lookup_string(&p), Err(VsaError::NoAttribute));
    }

    #[test]
    fn test_integer_decode_failure() {
        let mut p = packet();
        p.add_vsa(VENDOR_WIMARK, 4, &[0, 1]).unwrap();

        assert_eq!(WIMARK_SESSION_TIMEOUT.get(&p), 0);
        assert!(matches!(
            WIMARK_SESSION_TIMEOUT.lookup(&p),
            Err(VsaError::Decode { codec: "integer", .. })
        ));
    }

    #[test]
    fn test_gets_fails_on_any_bad_entry() {
        let mut p = packet();
        WIMARK_SESSION_TIMEOUT.add(&mut p, &10).unwrap();
        p.add_vsa(VENDOR_WIMARK, 4, &[1, 2, 3]).unwrap();
        WIMARK_SESSION_TIMEOUT.add(&mut p, &20).unwrap();

        assert!(WIMARK_SESSION_TIMEOUT.gets(&p).is_err());
    }

    #[test]
    fn test_octets_string_family() {
        let mut p = packet();
        WIMARK_CLIENT_GROUP.add_string(&mut p, "staff").unwrap();
        WIMARK_CLIENT_GROUP.add(&mut p, b"guests").unwrap();

        assert_eq!(WIMARK_CLIENT_GROUP.get(&p), b"staff".to_vec());
        assert_eq!(
            WIMARK_CLIENT_GROUP.get_strings(&p),
            Ok(vec!["staff".to_string(), "guests".to_string()])
        );

        WIMARK_CLIENT_GROUP.set_string(&mut p, "admins").unwrap();
        assert_eq!(WIMARK_CLIENT_GROUP.gets(&p), Ok(vec![b"admins".to_vec()]));
        assert_eq!(WIMARK_CLIENT_GROUP.lookup_string(&p), Ok("admins".to_string()));
    }

    #[test]
    fn test_octets_strings_are_lossy() {
        let mut p = packet();
        WIMARK_CPE_ID.add_string(&mut p, "cpe").unwrap();
        WIMARK_CPE_ID.add(&mut p, &[b'a', 0xff, b'b']).unwrap();

        assert_eq!(WIMARK_CPE_ID.get_string(&p), "cpe");
        assert_eq!(
            WIMARK_CPE_ID.get_strings(&p),
            Ok(vec!["cpe".to_string(), "a\u{fffd}b".to_string()])
        );

        WIMARK_CPE_ID.set(&mut p, &[0xfe]).unwrap();
        assert_eq!(WIMARK_CPE_ID.lookup_string(&p), Ok("\u{fffd}".to_string()));
    }

    #[test]
    fn test_text_rejects_invalid_utf8() {
        let mut p = packet();
        CISCO_AVPAIR.add(&mut p, "ok").unwrap();
        p.add_vsa(VENDOR_CISCO, 1, &[0xff, 0xfe]).unwrap();

        assert_eq!(CISCO_AVPAIR.get(&p), "ok");
        assert!(CISCO_AVPAIR.gets(&p).is_err());
    }

    #[test]
    fn test_set_preserves_other_types_in_block() {
        let mut p = packet();
        let mut value = VENDOR_WIMARK.to_be_bytes().to_vec();
        value.extend_from_slice(&[8, 5, b'w', b'l', b'1', 4, 6, 0, 0, 0, 30]);
        p.add_attribute(Attribute::new(VENDOR_SPECIFIC, value).unwrap());

        WIMARK_SESSION_TIMEOUT.set(&mut p, &60).unwrap();

        assert_eq!(WIMARK_SESSION_TIMEOUT.gets(&p), Ok(vec![60]));
        assert_eq!(WIMARK_WLAN_ID.get_string(&p), "wl1");
    }

    #[test]
    fn test_del_removes_every_occurrence() {
        let mut p = packet();
        WIMARK_WLAN_ID.add_string(&mut p, "a").unwrap();
        WIMARK_CPE_ID.add_string(&mut p, "cpe").unwrap();
        WIMARK_WLAN_ID.add_string(&mut p, "b").unwrap();

        WIMARK_WLAN_ID.del(&mut p);

        assert_eq!(p.attributes.len(), 1);
        assert_eq!(WIMARK_CPE_ID.get_string(&p), "cpe");
        assert_eq!(WIMARK_WLAN_ID.lookup(&p), Err(VsaError::NoAttribute));
    }

    #[test]
    fn test_same_type_different_vendor() {
        let mut p = packet();
        CISCO_ACCOUNT_INFO.add(&mut p, "S10.0.0.1").unwrap();
        RDP_SERVICE_NAME.add(&mut p, "internet").unwrap();

        assert_eq!(CISCO_ACCOUNT_INFO.get(&p), "S10.0.0.1");
        assert_eq!(RDP_SERVICE_NAME.get(&p), "internet");
    }

    #[test]
    fn test_dictionary_lookup() {
        let spec = find_by_name("wimark-session-timeout").unwrap();
        assert_eq!(spec.vendor_type, 4);
        assert_eq!(spec.kind, ValueKind::Integer);

        assert_eq!(find(VENDOR_CISCO, 252).map(|s| s.name), Some("Cisco-Command-Code"));
        assert!(find(VENDOR_CISCO, 7).is_none());
    }

    #[test]
    fn test_dictionary_entries_unique() {
        for (i, a) in DICTIONARY.iter().enumerate() {
            for b in &DICTIONARY[i + 1..] {
                assert!(
                    (a.vendor_id, a.vendor_type) != (b.vendor_id, b.vendor_type),
                    "{} and {} share a code",
                    a.name,
                    b.name
                );
            }
        }
    }
}
