//! Vendor-Specific attribute (RFC 2865 Section 5.26) sub-attribute codec
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   Type (26)   |    Length     |            Vendor-Id
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!      Vendor-Id (cont)           |  Vendor type  | Vendor length |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |    Value ...                  |  Vendor type  | Vendor length |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Sub-attributes are packed back to back. Their length octet counts the
//! 2-byte sub-attribute header. A sub-attribute whose length is below 3 or
//! runs past the end of the payload ends the scan of that attribute without
//! an error; everything read before it stays valid.
//!
//! The mutators on [`Packet`] operate across every Vendor-Specific attribute
//! in the packet, since a packet may carry several for the same vendor.

use crate::attributes::{Attribute, AttributeType};
use crate::packet::Packet;
use thiserror::Error;

/// Type code of the top-level Vendor-Specific attribute
pub const VENDOR_SPECIFIC: u8 = AttributeType::VendorSpecific as u8;
/// Size of the Vendor-Id prefix of a Vendor-Specific payload
pub const VENDOR_ID_LENGTH: usize = 4;
/// Size of the sub-attribute header (vendor type + vendor length)
pub const VSA_HEADER_LENGTH: usize = 2;
/// Smallest well-formed sub-attribute (header plus one value byte)
pub const MIN_VSA_LENGTH: usize = 3;
/// Largest value one sub-attribute can carry inside a single top-level attribute
pub const MAX_VSA_VALUE_LENGTH: usize =
    Attribute::MAX_VALUE_LENGTH - VENDOR_ID_LENGTH - VSA_HEADER_LENGTH;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VsaError {
    #[error("Vendor sub-attribute value too long: {0} bytes (max {max})", max = MAX_VSA_VALUE_LENGTH)]
    ValueTooLong(usize),
    #[error("No such attribute")]
    NoAttribute,
    #[error("Invalid {codec} value: {reason}")]
    Decode {
        codec: &'static str,
        reason: String,
    },
}

/// One vendor sub-attribute borrowed from a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vsa<'a> {
    pub vendor_type: u8,
    pub value: &'a [u8],
}

impl Vsa<'_> {
    /// Length octet as it appears on the wire
    pub fn encoded_length(&self) -> usize {
        VSA_HEADER_LENGTH + self.value.len()
    }

    fn write_to(&self, buffer: &mut Vec<u8>) {
        buffer.push(self.vendor_type);
        buffer.push(self.encoded_length() as u8);
        buffer.extend_from_slice(self.value);
    }
}

/// Left-to-right scan over the sub-attributes of one Vendor-Specific payload
#[derive(Debug, Clone)]
pub struct VsaIter<'a> {
    data: &'a [u8],
    stopped: bool,
}

impl<'a> VsaIter<'a> {
    /// Scan sub-attributes packed in `data` (the payload after the Vendor-Id)
    pub fn new(data: &'a [u8]) -> Self {
        VsaIter {
            data,
            stopped: false,
        }
    }

    fn empty() -> Self {
        VsaIter {
            data: &[],
            stopped: true,
        }
    }

    /// Bytes not consumed by the scan, e.g. a truncated trailing sub-attribute
    pub fn remainder(&self) -> &'a [u8] {
        self.data
    }
}

impl<'a> Iterator for VsaIter<'a> {
    type Item = Vsa<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped || self.data.len() < MIN_VSA_LENGTH {
            self.stopped = true;
            return None;
        }

        let vendor_type = self.data[0];
        let length = self.data[1] as usize;
        if length < MIN_VSA_LENGTH || length > self.data.len() {
            self.stopped = true;
            return None;
        }

        let value = &self.data[VSA_HEADER_LENGTH..length];
        self.data = &self.data[length..];
        Some(Vsa { vendor_type, value })
    }
}

/// Split a Vendor-Specific attribute into its Vendor-Id and sub-attribute bytes.
///
/// Returns `None` for other attribute types and for payloads too short to
/// hold a Vendor-Id.
pub fn split_vendor_specific(attr: &Attribute) -> Option<(u32, &[u8])> {
    if attr.attr_type != VENDOR_SPECIFIC || attr.value.len() < VENDOR_ID_LENGTH {
        return None;
    }
    let (id, rest) = attr.value.split_at(VENDOR_ID_LENGTH);
    let vendor_id = u32::from_be_bytes([id[0], id[1], id[2], id[3]]);
    Some((vendor_id, rest))
}

/// Scan the sub-attributes of `attr` that belong to `vendor_id`.
///
/// Yields nothing when the attribute is not Vendor-Specific or is for
/// another vendor.
pub fn scan(attr: &Attribute, vendor_id: u32) -> VsaIter<'_> {
    match split_vendor_specific(attr) {
        Some((id, data)) if id == vendor_id => VsaIter::new(data),
        _ => VsaIter::empty(),
    }
}

/// Build a Vendor-Specific payload holding a single sub-attribute.
pub fn encode_vendor_payload(
    vendor_id: u32,
    vendor_type: u8,
    value: &[u8],
) -> Result<Vec<u8>, VsaError> {
    if value.len() > MAX_VSA_VALUE_LENGTH {
        return Err(VsaError::ValueTooLong(value.len()));
    }

    let vsa = Vsa { vendor_type, value };
    let mut payload = Vec::with_capacity(VENDOR_ID_LENGTH + vsa.encoded_length());
    payload.extend_from_slice(&vendor_id.to_be_bytes());
    vsa.write_to(&mut payload);
    Ok(payload)
}

/// Build a top-level Vendor-Specific attribute holding a single sub-attribute.
pub fn vendor_attribute(
    vendor_id: u32,
    vendor_type: u8,
    value: &[u8],
) -> Result<Attribute, VsaError> {
    let payload = encode_vendor_payload(vendor_id, vendor_type, value)?;
    Ok(Attribute {
        attr_type: VENDOR_SPECIFIC,
        value: payload,
    })
}

/// Drop every `vendor_type` sub-attribute from `attr`.
///
/// Survivors keep their order and any unscanned trailing bytes are kept as-is.
/// Returns `None` when nothing is left after the Vendor-Id.
fn strip_sub_attribute(attr: Attribute, vendor_id: u32, vendor_type: u8) -> Option<Attribute> {
    let mut vsas = scan(&attr, vendor_id);
    if vsas.stopped {
        return Some(attr);
    }

    let mut kept = Vec::with_capacity(attr.value.len());
    kept.extend_from_slice(&attr.value[..VENDOR_ID_LENGTH]);
    for vsa in vsas.by_ref() {
        if vsa.vendor_type != vendor_type {
            vsa.write_to(&mut kept);
        }
    }
    kept.extend_from_slice(vsas.remainder());

    if kept.len() == VENDOR_ID_LENGTH {
        return None;
    }
    Some(Attribute {
        attr_type: attr.attr_type,
        value: kept,
    })
}

impl Packet {
    /// All sub-attributes of `vendor_id`, across every Vendor-Specific attribute, in packet order
    pub fn vsas(&self, vendor_id: u32) -> impl Iterator<Item = Vsa<'_>> + '_ {
        self.attributes
            .iter()
            .flat_map(move |attr| scan(attr, vendor_id))
    }

    /// Append `value` as a new Vendor-Specific attribute.
    ///
    /// Existing attributes for the same vendor are left alone.
    pub fn add_vsa(&mut self, vendor_id: u32, vendor_type: u8, value: &[u8]) -> Result<(), VsaError> {
        let attr = vendor_attribute(vendor_id, vendor_type, value)?;
        self.attributes.push(attr);
        Ok(())
    }

    /// Values of every `vendor_type` sub-attribute, in packet order
    pub fn vsa_values(&self, vendor_id: u32, vendor_type: u8) -> Vec<&[u8]> {
        self.vsas(vendor_id)
            .filter(|vsa| vsa.vendor_type == vendor_type)
            .map(|vsa| vsa.value)
            .collect()
    }

    /// Value of the first `vendor_type` sub-attribute
    pub fn lookup_vsa(&self, vendor_id: u32, vendor_type: u8) -> Option<&[u8]> {
        self.vsas(vendor_id)
            .find(|vsa| vsa.vendor_type == vendor_type)
            .map(|vsa| vsa.value)
    }

    /// Replace every `vendor_type` sub-attribute with a single new one.
    ///
    /// The new value is appended as its own Vendor-Specific attribute. If it
    /// cannot be encoded the packet is left untouched.
    pub fn set_vsa(&mut self, vendor_id: u32, vendor_type: u8, value: &[u8]) -> Result<(), VsaError> {
        let attr = vendor_attribute(vendor_id, vendor_type, value)?;
        self.delete_vsa(vendor_id, vendor_type);
        self.attributes.push(attr);
        Ok(())
    }

    /// Remove every `vendor_type` sub-attribute.
    ///
    /// Vendor-Specific attributes left with no sub-attributes are removed
    /// from the packet.
    pub fn delete_vsa(&mut self, vendor_id: u32, vendor_type: u8) {
        let attributes = std::mem::take(&mut self.attributes);
        self.attributes = attributes
            .into_iter()
            .filter_map(|attr| strip_sub_attribute(attr, vendor_id, vendor_type))
            .collect();
    }
}
