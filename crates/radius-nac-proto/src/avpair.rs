//! Flat decoding of vendor AV-pairs
//!
//! Most NAS vendors put exactly one sub-attribute in each Vendor-Specific
//! attribute. This module reads that first sub-attribute header as-is and
//! treats the rest of the payload as its value, which is how NAS logs and
//! CoA tooling usually present them.

use crate::dictionary::{
    CISCO_ACCOUNT_INFO, CISCO_AVPAIR, CISCO_COMMAND_CODE, Codec, Integer, WIMARK_CLIENT_GROUP,
    WIMARK_SESSION_TIMEOUT, WIMARK_WLAN_ID,
};
use crate::packet::Packet;
use crate::vendor::{VENDOR_CISCO, VENDOR_WIMARK};
use crate::vsa::{VENDOR_SPECIFIC, VsaError, encode_vendor_payload};
use std::fmt;
use thiserror::Error;

/// Vendor-Id (4) + vendor type (1) + vendor length (1)
const AVPAIR_HEADER_LENGTH: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvpError {
    #[error("Too short VSA: {0} bytes")]
    TooShort(usize),
    #[error("No AV-pairs for vendor {0}")]
    Empty(u32),
    #[error("AV-pair value error: {0}")]
    Value(#[from] VsaError),
}

/// One vendor AV-pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avp {
    pub vendor_id: u32,
    pub type_id: u8,
    /// Length octet as received, not validated against `value`
    pub value_len: u8,
    pub value: Vec<u8>,
}

impl fmt::Display for Avp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vendor: {}, Type: {}, Value: {}",
            self.vendor_id,
            self.type_id,
            String::from_utf8_lossy(&self.value)
        )
    }
}

/// Decode a Vendor-Specific payload as a single AV-pair
pub fn decode_avpair(payload: &[u8]) -> Result<Avp, AvpError> {
    if payload.len() <= AVPAIR_HEADER_LENGTH {
        return Err(AvpError::TooShort(payload.len()));
    }

    Ok(Avp {
        vendor_id: u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]),
        type_id: payload[4],
        value_len: payload[5],
        value: payload[AVPAIR_HEADER_LENGTH..].to_vec(),
    })
}

/// Decode every Vendor-Specific attribute of the packet, in order
pub fn decode_avpairs(packet: &Packet) -> Result<Vec<Avp>, AvpError> {
    packet
        .find_all_attributes(VENDOR_SPECIFIC)
        .into_iter()
        .map(|attr| decode_avpair(&attr.value))
        .collect()
}

/// Decode the Vendor-Specific attributes of one vendor.
///
/// A too-short attribute fails the whole call, whichever vendor it is for.
pub fn decode_avpairs_by_vendor(packet: &Packet, vendor_id: u32) -> Result<Vec<Avp>, AvpError> {
    let avps = decode_avpairs(packet)?;
    Ok(avps.into_iter().filter(|a| a.vendor_id == vendor_id).collect())
}

/// Cisco AV-pairs found in a packet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiscoAvps {
    pub account_info: String,
    pub command_code: String,
    pub command_code_bytes: Vec<u8>,
    /// Cisco-AVPair values, in packet order
    pub av_pairs: Vec<String>,
}

impl CiscoAvps {
    pub fn from_packet(packet: &Packet) -> Result<Self, AvpError> {
        let avps = decode_avpairs_by_vendor(packet, VENDOR_CISCO)?;
        if avps.is_empty() {
            return Err(AvpError::Empty(VENDOR_CISCO));
        }

        let mut cisco = CiscoAvps::default();
        for avp in avps {
            let text = String::from_utf8_lossy(&avp.value).into_owned();
            match avp.type_id {
                t if t == CISCO_ACCOUNT_INFO.vendor_type => cisco.account_info = text,
                t if t == CISCO_COMMAND_CODE.vendor_type => {
                    cisco.command_code = text;
                    cisco.command_code_bytes = avp.value;
                }
                t if t == CISCO_AVPAIR.vendor_type => cisco.av_pairs.push(text),
                _ => {}
            }
        }
        Ok(cisco)
    }
}

/// Wimark AV-pairs found in a packet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WimarkAvps {
    pub client_group: String,
    pub session_timeout: u32,
}

impl WimarkAvps {
    pub fn from_packet(packet: &Packet) -> Result<Self, AvpError> {
        let avps = decode_avpairs_by_vendor(packet, VENDOR_WIMARK)?;
        if avps.is_empty() {
            return Err(AvpError::Empty(VENDOR_WIMARK));
        }

        let mut wimark = WimarkAvps::default();
        for avp in avps {
            match avp.type_id {
                t if t == WIMARK_CLIENT_GROUP.vendor_type => {
                    wimark.client_group = String::from_utf8_lossy(&avp.value).into_owned();
                }
                t if t == WIMARK_SESSION_TIMEOUT.vendor_type => {
                    wimark.session_timeout = Integer::decode(&avp.value)?;
                }
                _ => {}
            }
        }
        Ok(wimark)
    }
}

/// Vendor-Specific payload carrying a Wimark WLAN id, ready to be used as
/// an attribute value. `None` if the id does not fit in one attribute.
pub fn wlan_id_vendor_payload(wlan_id: &str) -> Option<Vec<u8>> {
    encode_vendor_payload(VENDOR_WIMARK, WIMARK_WLAN_ID.vendor_type, wlan_id.as_bytes()).ok()
}
