/// Standard RADIUS attribute types used by CoA and session-control requests
///
/// Only the attributes this crate reads or writes itself are listed; anything
/// else is still carried through as a raw `Attribute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AttributeType {
    /// User-Name (1) - RFC 2865
    UserName = 1,
    /// NAS-IP-Address (4) - RFC 2865
    NasIpAddress = 4,
    /// Framed-IP-Address (8) - RFC 2865
    FramedIpAddress = 8,
    /// Reply-Message (18) - RFC 2865
    ReplyMessage = 18,
    /// Class (25) - RFC 2865
    Class = 25,
    /// Vendor-Specific (26) - RFC 2865
    /// Value: 4-byte Vendor-Id followed by vendor sub-attributes
    VendorSpecific = 26,
    /// Session-Timeout (27) - RFC 2865
    SessionTimeout = 27,
    /// Idle-Timeout (28) - RFC 2865
    IdleTimeout = 28,
    /// Calling-Station-Id (31) - RFC 2865
    CallingStationId = 31,
    /// NAS-Identifier (32) - RFC 2865
    NasIdentifier = 32,
    /// Acct-Session-Id (44) - RFC 2866
    AcctSessionId = 44,
    /// Event-Timestamp (55) - RFC 2869
    /// Seconds since 1970-01-01 00:00 UTC
    EventTimestamp = 55,
    /// Error-Cause (101) - RFC 5176
    ErrorCause = 101,
}

impl AttributeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(AttributeType::UserName),
            4 => Some(AttributeType::NasIpAddress),
            8 => Some(AttributeType::FramedIpAddress),
            18 => Some(AttributeType::ReplyMessage),
            25 => Some(AttributeType::Class),
            26 => Some(AttributeType::VendorSpecific),
            27 => Some(AttributeType::SessionTimeout),
            28 => Some(AttributeType::IdleTimeout),
            31 => Some(AttributeType::CallingStationId),
            32 => Some(AttributeType::NasIdentifier),
            44 => Some(AttributeType::AcctSessionId),
            55 => Some(AttributeType::EventTimestamp),
            101 => Some(AttributeType::ErrorCause),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
