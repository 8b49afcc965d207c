//! NAS vendors with known sub-attribute dictionaries
//!
//! Vendor identifiers are IANA Private Enterprise Numbers.

/// Cisco Systems
pub const VENDOR_CISCO: u32 = 9;
/// Wimark Systems (home vendor for external-auth attributes)
pub const VENDOR_WIMARK: u32 = 52400;
/// Alcatel-Lucent
pub const VENDOR_ALU: u32 = 6527;
/// RDP
pub const VENDOR_RDP: u32 = 250;

/// Name and identifier of a supported vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vendor {
    pub name: &'static str,
    pub id: u32,
}

pub const VENDORS: &[Vendor] = &[
    Vendor {
        name: "Cisco",
        id: VENDOR_CISCO,
    },
    Vendor {
        name: "Wimark",
        id: VENDOR_WIMARK,
    },
    Vendor {
        name: "Alcatel-Lucent",
        id: VENDOR_ALU,
    },
    Vendor {
        name: "RDP",
        id: VENDOR_RDP,
    },
];

/// Find a vendor by name (case-insensitive)
pub fn vendor_by_name(name: &str) -> Option<&'static Vendor> {
    VENDORS.iter().find(|v| v.name.eq_ignore_ascii_case(name))
}

/// Find a vendor by identifier
pub fn vendor_by_id(id: u32) -> Option<&'static Vendor> {
    VENDORS.iter().find(|v| v.id == id)
}

/// Cisco subscriber-service command strings carried in Cisco-AVPair and
/// Cisco-Command-Code sub-attributes of CoA requests
pub mod cisco {
    pub const SUBSCRIBER_LOGON: &str = "subscriber:command=account-logon";
    pub const SUBSCRIBER_LOGOFF: &str = "subscriber:command=account-logoff";
    pub const SUBSCRIBER_REAUTHENTICATE: &str = "subscriber:command=reauthenticate";
    pub const SUBSCRIBER_REAUTHENTICATE_LAST: &str = "subscriber:reathenticate-type=last";
    pub const AUDIT_SESSION_ID_PREFIX: &str = "audit-session-id=";

    /// Command-Code value for account logon
    pub const COMMAND_CODE_LOGON: u8 = 0x1;
    /// Command-Code value for account logoff
    pub const COMMAND_CODE_LOGOFF: u8 = 0x2;

    /// Cisco-AVPair value identifying a session by its audit session id
    pub fn audit_session_id(session_id: &str) -> String {
        format!("{AUDIT_SESSION_ID_PREFIX}{session_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(vendor_by_name("wimark").map(|v| v.id), Some(52400));
        assert_eq!(vendor_by_name("CISCO").map(|v| v.id), Some(9));
        assert!(vendor_by_name("juniper").is_none());
    }

    #[test]
    fn test_lookup_by_id() {
        assert_eq!(vendor_by_id(6527).map(|v| v.name), Some("Alcatel-Lucent"));
        assert!(vendor_by_id(1).is_none());
    }

    #[test]
    fn test_audit_session_id() {
        assert_eq!(
            cisco::audit_session_id("0A000001"),
            "audit-session-id=0A000001"
        );
    }
}
