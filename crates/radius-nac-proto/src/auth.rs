use crate::packet::{Packet, PacketError};
use rand::Rng;

/// Generate a random Request Authenticator (16 bytes) per RFC 2865 Section 3
pub fn generate_request_authenticator() -> [u8; 16] {
    let mut rng = rand::rng();
    let mut authenticator = [0u8; 16];
    rng.fill(&mut authenticator);
    authenticator
}

/// MD5(Code + ID + Length + `authenticator` + Attributes + Secret)
///
/// Shared by every authenticator flavour; they differ only in which
/// 16 bytes are hashed in the authenticator position.
fn packet_digest(
    packet: &Packet,
    authenticator: &[u8; 16],
    secret: &[u8],
) -> Result<[u8; 16], PacketError> {
    let mut data = packet.encode_with_authenticator(authenticator)?;
    data.extend_from_slice(secret);
    Ok(md5::compute(&data).0)
}

/// Calculate the Request Authenticator for Accounting-Request, CoA-Request
/// and Disconnect-Request packets (RFC 2866 Section 3, RFC 5176 Section 3.5)
///
/// Request Authenticator = MD5(Code + ID + Length + 16 zero octets + Attributes + Secret)
pub fn calculate_request_authenticator(
    packet: &Packet,
    secret: &[u8],
) -> Result<[u8; 16], PacketError> {
    packet_digest(packet, &[0u8; 16], secret)
}

/// Calculate Response Authenticator per RFC 2865 Section 3
///
/// Response Authenticator = MD5(Code + ID + Length + Request Authenticator + Attributes + Secret)
pub fn calculate_response_authenticator(
    packet: &Packet,
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> Result<[u8; 16], PacketError> {
    packet_digest(packet, request_authenticator, secret)
}

/// Fill in the Request Authenticator of an outgoing request.
///
/// Codes with a digest authenticator are signed with `packet.secret`;
/// everything else gets 16 random bytes.
pub fn sign_request(packet: &mut Packet) -> Result<(), PacketError> {
    packet.authenticator = if packet.code.has_digest_authenticator() {
        calculate_request_authenticator(packet, &packet.secret)?
    } else {
        generate_request_authenticator()
    };
    Ok(())
}

/// Verify the Request Authenticator of an inbound request.
///
/// Random authenticators (Access-Request, Status-Server) always pass.
pub fn verify_request_authenticator(packet: &Packet, secret: &[u8]) -> bool {
    if !packet.code.has_digest_authenticator() {
        return true;
    }
    calculate_request_authenticator(packet, secret)
        .map(|expected| expected == packet.authenticator)
        .unwrap_or(false)
}

/// Verify Response Authenticator
///
/// Verifies that the Response Authenticator matches the expected value
/// calculated from the request and secret.
pub fn verify_response_authenticator(
    response: &Packet,
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> bool {
    calculate_response_authenticator(response, request_authenticator, secret)
        .map(|calculated| response.authenticator == calculated)
        .unwrap_or(false)
}
