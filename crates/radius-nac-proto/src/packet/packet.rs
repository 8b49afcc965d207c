use super::Code;
use crate::attributes::Attribute;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PacketError {
    #[error("Invalid packet length: {0}")]
    InvalidLength(usize),
    #[error("Packet too large: {0} bytes")]
    PacketTooLarge(usize),
    #[error("Attribute {attr_type} value too long: {length} bytes (max {max})", max = Attribute::MAX_VALUE_LENGTH)]
    AttributeTooLong { attr_type: u8, length: usize },
    #[error("Attribute {attr_type} has invalid length {length}")]
    InvalidAttributeLength { attr_type: u8, length: usize },
    #[error("Truncated attribute: need {needed} bytes, have {available}")]
    TruncatedAttribute { needed: usize, available: usize },
    #[error("Attribute {attr_type} value is {actual} bytes, expected {expected}")]
    InvalidValueLength {
        attr_type: u8,
        expected: usize,
        actual: usize,
    },
}

/// A RADIUS packet (RFC 2865 Section 3): 20-byte header followed by
/// attributes in wire order.
///
/// The shared secret travels with the packet so whoever puts it on the wire
/// can compute the authenticator. It is never encoded.
#[derive(Debug, Clone)]
pub struct Packet {
    pub code: Code,
    /// Matches a response to its request
    pub identifier: u8,
    /// Request or Response Authenticator
    pub authenticator: [u8; 16],
    pub attributes: Vec<Attribute>,
    pub secret: Vec<u8>,
}

impl Packet {
    /// Header only: code, identifier, length, authenticator
    pub const MIN_PACKET_SIZE: usize = 20;
    pub const MAX_PACKET_SIZE: usize = 4096;

    const AUTHENTICATOR_OFFSET: usize = 4;

    pub fn new(code: Code, identifier: u8, authenticator: [u8; 16]) -> Self {
        Packet {
            code,
            identifier,
            authenticator,
            attributes: Vec::new(),
            secret: Vec::new(),
        }
    }

    /// Create an outgoing request with a zero authenticator and the given secret.
    ///
    /// The identifier and authenticator are filled in when the packet is sent.
    pub fn request(code: Code, secret: impl Into<Vec<u8>>) -> Self {
        Packet {
            secret: secret.into(),
            ..Packet::new(code, 0, [0u8; 16])
        }
    }

    pub fn with_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secret = secret.into();
        self
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn encode(&self) -> Result<Vec<u8>, PacketError> {
        self.encode_with_authenticator(&self.authenticator)
    }

    /// Wire form with `authenticator` in place of the packet's own, as
    /// hashed by the authenticator digests.
    pub(crate) fn encode_with_authenticator(
        &self,
        authenticator: &[u8; 16],
    ) -> Result<Vec<u8>, PacketError> {
        let length = self.length();
        if length > Self::MAX_PACKET_SIZE {
            return Err(PacketError::PacketTooLarge(length));
        }

        let mut buffer = Vec::with_capacity(length);
        buffer.push(self.code.as_u8());
        buffer.push(self.identifier);
        buffer.extend_from_slice(&(length as u16).to_be_bytes());
        buffer.extend_from_slice(authenticator);
        for attr in &self.attributes {
            attr.encode_into(&mut buffer)?;
        }

        Ok(buffer)
    }

    /// Decode a datagram. Bytes past the header's length field are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, PacketError> {
        if data.len() < Self::MIN_PACKET_SIZE {
            return Err(PacketError::InvalidLength(data.len()));
        }

        let code = Code::from_u8(data[0]);
        let identifier = data[1];
        let length = u16::from_be_bytes([data[2], data[3]]) as usize;

        if !(Self::MIN_PACKET_SIZE..=Self::MAX_PACKET_SIZE).contains(&length) || length > data.len()
        {
            return Err(PacketError::InvalidLength(length));
        }

        let mut authenticator = [0u8; 16];
        authenticator.copy_from_slice(&data[Self::AUTHENTICATOR_OFFSET..Self::MIN_PACKET_SIZE]);

        let mut attributes = Vec::new();
        let mut rest = &data[Self::MIN_PACKET_SIZE..length];
        while !rest.is_empty() {
            let attr = Attribute::decode(rest)?;
            rest = &rest[attr.encoded_length()..];
            attributes.push(attr);
        }

        Ok(Packet {
            code,
            identifier,
            authenticator,
            attributes,
            secret: Vec::new(),
        })
    }

    /// Encoded length in bytes
    pub fn length(&self) -> usize {
        Self::MIN_PACKET_SIZE
            + self
                .attributes
                .iter()
                .map(Attribute::encoded_length)
                .sum::<usize>()
    }

    pub fn find_attribute(&self, attr_type: u8) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.attr_type == attr_type)
    }

    pub fn find_all_attributes(&self, attr_type: u8) -> Vec<&Attribute> {
        self.attributes
            .iter()
            .filter(|a| a.attr_type == attr_type)
            .collect()
    }
}
