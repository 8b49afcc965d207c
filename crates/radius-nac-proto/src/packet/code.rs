/// RADIUS packet codes as defined in RFC 2865 Section 4 and RFC 5176
///
/// Codes without a variant of their own decode to [`Code::Other`], so a peer
/// answering with an unlisted code is still reported by its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// Access-Request (1)
    AccessRequest,
    /// Access-Accept (2)
    AccessAccept,
    /// Access-Reject (3)
    AccessReject,
    /// Accounting-Request (4) - RFC 2866
    AccountingRequest,
    /// Accounting-Response (5) - RFC 2866
    AccountingResponse,
    /// Access-Challenge (11)
    AccessChallenge,
    /// Status-Server (12) - RFC 5997
    StatusServer,
    /// Status-Client (13) - RFC 5997
    StatusClient,
    /// Disconnect-Request (40) - RFC 5176
    DisconnectRequest,
    /// Disconnect-ACK (41) - RFC 5176
    DisconnectAck,
    /// Disconnect-NAK (42) - RFC 5176
    DisconnectNak,
    /// CoA-Request (43) - RFC 5176
    CoaRequest,
    /// CoA-ACK (44) - RFC 5176
    CoaAck,
    /// CoA-NAK (45) - RFC 5176
    CoaNak,
    /// Any other code, kept as received
    Other(u8),
}

impl Code {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Code::AccessRequest,
            2 => Code::AccessAccept,
            3 => Code::AccessReject,
            4 => Code::AccountingRequest,
            5 => Code::AccountingResponse,
            11 => Code::AccessChallenge,
            12 => Code::StatusServer,
            13 => Code::StatusClient,
            40 => Code::DisconnectRequest,
            41 => Code::DisconnectAck,
            42 => Code::DisconnectNak,
            43 => Code::CoaRequest,
            44 => Code::CoaAck,
            45 => Code::CoaNak,
            other => Code::Other(other),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Code::AccessRequest => 1,
            Code::AccessAccept => 2,
            Code::AccessReject => 3,
            Code::AccountingRequest => 4,
            Code::AccountingResponse => 5,
            Code::AccessChallenge => 11,
            Code::StatusServer => 12,
            Code::StatusClient => 13,
            Code::DisconnectRequest => 40,
            Code::DisconnectAck => 41,
            Code::DisconnectNak => 42,
            Code::CoaRequest => 43,
            Code::CoaAck => 44,
            Code::CoaNak => 45,
            Code::Other(value) => value,
        }
    }

    /// Whether the Request Authenticator is a digest over the packet
    /// (RFC 2866 Section 3, RFC 5176 Section 3.5) rather than random bytes.
    pub fn has_digest_authenticator(self) -> bool {
        matches!(
            self,
            Code::AccountingRequest | Code::DisconnectRequest | Code::CoaRequest
        )
    }
}

impl From<u8> for Code {
    fn from(value: u8) -> Self {
        Code::from_u8(value)
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Code::Other(value) => write!(f, "Code({value})"),
            known => write!(f, "{:?}({})", known, known.as_u8()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coa_codes() {
        assert_eq!(Code::from_u8(43), Code::CoaRequest);
        assert_eq!(Code::from_u8(44), Code::CoaAck);
        assert_eq!(Code::from_u8(45), Code::CoaNak);
        assert_eq!(Code::from_u8(46), Code::Other(46));
    }

    #[test]
    fn test_every_byte_round_trips() {
        for value in 0..=u8::MAX {
            assert_eq!(Code::from(value).as_u8(), value);
        }
    }

    #[test]
    fn test_digest_authenticator_codes() {
        assert!(Code::CoaRequest.has_digest_authenticator());
        assert!(Code::DisconnectRequest.has_digest_authenticator());
        assert!(!Code::AccessRequest.has_digest_authenticator());
        assert!(!Code::Other(46).has_digest_authenticator());
    }

    #[test]
    fn test_display() {
        assert_eq!(Code::CoaNak.to_string(), "CoaNak(45)");
        assert_eq!(Code::Other(7).to_string(), "Code(7)");
    }
}
