use crate::packet::PacketError;
use std::net::Ipv4Addr;

/// One top-level attribute: `[type][length][value]`, length counting the
/// two header octets (RFC 2865 Section 5)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub attr_type: u8,
    /// Raw value, at most [`Attribute::MAX_VALUE_LENGTH`] octets
    pub value: Vec<u8>,
}

impl Attribute {
    /// Type and length octets
    pub const MIN_LENGTH: usize = 2;
    pub const MAX_LENGTH: usize = 255;
    pub const MAX_VALUE_LENGTH: usize = Self::MAX_LENGTH - Self::MIN_LENGTH;

    pub fn new(attr_type: u8, value: Vec<u8>) -> Result<Self, PacketError> {
        if value.len() > Self::MAX_VALUE_LENGTH {
            return Err(PacketError::AttributeTooLong {
                attr_type,
                length: value.len(),
            });
        }
        Ok(Attribute { attr_type, value })
    }

    pub fn string(attr_type: u8, value: impl Into<String>) -> Result<Self, PacketError> {
        Self::new(attr_type, value.into().into_bytes())
    }

    /// 32-bit big-endian integer value
    pub fn integer(attr_type: u8, value: u32) -> Result<Self, PacketError> {
        Self::new(attr_type, value.to_be_bytes().to_vec())
    }

    pub fn ipv4(attr_type: u8, value: Ipv4Addr) -> Result<Self, PacketError> {
        Self::new(attr_type, value.octets().to_vec())
    }

    /// Append the wire form to `buffer`
    pub fn encode_into(&self, buffer: &mut Vec<u8>) -> Result<(), PacketError> {
        // `value` is public and may exceed the bound
        let length = u8::try_from(self.encoded_length()).map_err(|_| {
            PacketError::AttributeTooLong {
                attr_type: self.attr_type,
                length: self.value.len(),
            }
        })?;
        buffer.push(self.attr_type);
        buffer.push(length);
        buffer.extend_from_slice(&self.value);
        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>, PacketError> {
        let mut buffer = Vec::with_capacity(self.encoded_length());
        self.encode_into(&mut buffer)?;
        Ok(buffer)
    }

    /// Decode the attribute at the start of `data`; trailing bytes are left alone
    pub fn decode(data: &[u8]) -> Result<Self, PacketError> {
        let &[attr_type, length, ..] = data else {
            return Err(PacketError::TruncatedAttribute {
                needed: Self::MIN_LENGTH,
                available: data.len(),
            });
        };

        let length = length as usize;
        if length < Self::MIN_LENGTH {
            return Err(PacketError::InvalidAttributeLength { attr_type, length });
        }
        let value = data
            .get(Self::MIN_LENGTH..length)
            .ok_or(PacketError::TruncatedAttribute {
                needed: length,
                available: data.len(),
            })?;

        Ok(Attribute {
            attr_type,
            value: value.to_vec(),
        })
    }

    pub fn encoded_length(&self) -> usize {
        Self::MIN_LENGTH + self.value.len()
    }

    pub fn as_string(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.value.clone())
    }

    pub fn as_integer(&self) -> Result<u32, PacketError> {
        Ok(u32::from_be_bytes(self.fixed::<4>()?))
    }

    pub fn as_ipv4(&self) -> Result<Ipv4Addr, PacketError> {
        Ok(Ipv4Addr::from(self.fixed::<4>()?))
    }

    fn fixed<const N: usize>(&self) -> Result<[u8; N], PacketError> {
        self.value
            .as_slice()
            .try_into()
            .map_err(|_| PacketError::InvalidValueLength {
                attr_type: self.attr_type,
                expected: N,
                actual: self.value.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_attribute() {
        let attr = Attribute::string(44, "acct-0001").unwrap();
        assert_eq!(attr.attr_type, 44);
        assert_eq!(attr.as_string().unwrap(), "acct-0001");
    }

    #[test]
    fn test_integer_attribute() {
        let attr = Attribute::integer(27, 3600).unwrap();
        assert_eq!(attr.value, vec![0, 0, 0x0e, 0x10]);
        assert_eq!(attr.as_integer().unwrap(), 3600);
    }

    #[test]
    fn test_ipv4_attribute() {
        let attr = Attribute::ipv4(8, Ipv4Addr::new(10, 1, 2, 3)).unwrap();
        assert_eq!(attr.value, vec![10, 1, 2, 3]);
        assert_eq!(attr.as_ipv4().unwrap(), Ipv4Addr::new(10, 1, 2, 3));
    }

    #[test]
    fn test_attribute_decode_respects_length() {
        let data = [26, 4, 0xaa, 0xbb, 0xff, 0xff];
        let attr = Attribute::decode(&data).unwrap();
        assert_eq!(attr.value, vec![0xaa, 0xbb]);
        assert_eq!(attr.encode().unwrap(), data[..4].to_vec());
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            Attribute::decode(&[1]),
            Err(PacketError::TruncatedAttribute { needed: 2, available: 1 })
        ));
        assert!(matches!(
            Attribute::decode(&[1, 1, 0]),
            Err(PacketError::InvalidAttributeLength { attr_type: 1, length: 1 })
        ));
        assert!(matches!(
            Attribute::decode(&[1, 6, b'a']),
            Err(PacketError::TruncatedAttribute { needed: 6, available: 3 })
        ));
    }

    #[test]
    fn test_max_value_length() {
        assert_eq!(Attribute::MAX_VALUE_LENGTH, 253);
        assert!(Attribute::new(1, vec![0u8; 253]).is_ok());
        assert!(matches!(
            Attribute::new(1, vec![0u8; 254]),
            Err(PacketError::AttributeTooLong { attr_type: 1, length: 254 })
        ));
    }

    #[test]
    fn test_encode_rejects_oversized_public_value() {
        let attr = Attribute {
            attr_type: 18,
            value: vec![0u8; 300],
        };
        assert!(attr.encode().is_err());
    }

    #[test]
    fn test_integer_wrong_length() {
        let attr = Attribute::new(27, vec![1, 2, 3]).unwrap();
        assert!(matches!(
            attr.as_integer(),
            Err(PacketError::InvalidValueLength { expected: 4, actual: 3, .. })
        ));
    }
}
