//! User attributes returned by an external RADIUS server
//!
//! When a captive portal delegates authentication to a customer's own RADIUS
//! server, the Access-Accept carries the user's role and location as Wimark
//! sub-attributes. Repeated sub-attributes are allowed; the last one wins.

use crate::dictionary::{
    WIMARK_EXTERNAL_AUTH_USER_LOCATION, WIMARK_EXTERNAL_AUTH_USER_LOCATION_NAME,
    WIMARK_EXTERNAL_AUTH_USER_ROLE,
};
use crate::packet::Packet;
use crate::vendor::VENDOR_WIMARK;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExternalAuthError {
    #[error("Attributes list from response RADIUS packet is empty")]
    EmptyPacket,
    #[error("Attribute UserRole not found")]
    MissingRole,
    #[error("Attribute UserLocation or UserLocationName not found")]
    MissingLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalAuthResult {
    pub role: String,
    pub location: String,
    pub location_name: String,
}

/// Extract the external-auth role and location from a response packet.
///
/// The role is required, as is at least one of location and location name.
pub fn extract_external_auth(packet: &Packet) -> Result<ExternalAuthResult, ExternalAuthError> {
    if packet.attributes.is_empty() {
        return Err(ExternalAuthError::EmptyPacket);
    }

    let mut result = ExternalAuthResult::default();
    for vsa in packet.vsas(VENDOR_WIMARK) {
        let slot = match vsa.vendor_type {
            t if t == WIMARK_EXTERNAL_AUTH_USER_ROLE.vendor_type => &mut result.role,
            t if t == WIMARK_EXTERNAL_AUTH_USER_LOCATION.vendor_type => &mut result.location,
            t if t == WIMARK_EXTERNAL_AUTH_USER_LOCATION_NAME.vendor_type => {
                &mut result.location_name
            }
            _ => continue,
        };
        *slot = String::from_utf8_lossy(vsa.value).into_owned();
    }

    if result.role.is_empty() {
        return Err(ExternalAuthError::MissingRole);
    }
    if result.location.is_empty() && result.location_name.is_empty() {
        return Err(ExternalAuthError::MissingLocation);
    }

    Ok(result)
}
