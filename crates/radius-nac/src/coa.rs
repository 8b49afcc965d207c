//! Change-of-Authorization requests (RFC 5176)

use crate::error::ExchangeError;
use crate::exchange::{Exchanger, send_packet};
use crate::reliable::exchange_reliably;
use radius_nac_proto::{Attribute, AttributeType, Code, Packet, PacketError, VsaError};
use std::net::Ipv4Addr;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum CoaError {
    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),
    #[error("Attribute error: {0}")]
    Attribute(#[from] PacketError),
    #[error("Vendor attribute error: {0}")]
    Vsa(#[from] VsaError),
    #[error("Response is not CoA-ACK: {0}")]
    UnexpectedResponseCode(Code),
}

/// Value of a vendor attribute in a CoA request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VsaValue {
    Text(String),
    Integer(u32),
}

/// One vendor attribute to attach to a CoA request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VsaEntry {
    pub vendor_id: u32,
    pub vendor_type: u8,
    pub value: VsaValue,
}

impl VsaEntry {
    pub fn text(vendor_id: u32, vendor_type: u8, value: impl Into<String>) -> Self {
        VsaEntry {
            vendor_id,
            vendor_type,
            value: VsaValue::Text(value.into()),
        }
    }

    pub fn integer(vendor_id: u32, vendor_type: u8, value: u32) -> Self {
        VsaEntry {
            vendor_id,
            vendor_type,
            value: VsaValue::Integer(value),
        }
    }

    /// Wire value. An empty string goes out as integer zero.
    fn encoded_value(&self) -> Vec<u8> {
        match &self.value {
            VsaValue::Text(text) if !text.is_empty() => text.as_bytes().to_vec(),
            VsaValue::Text(_) => 0u32.to_be_bytes().to_vec(),
            VsaValue::Integer(value) => value.to_be_bytes().to_vec(),
        }
    }
}

/// Session re-authorization sent to a NAS
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoaRequest {
    /// Client address; anything but dotted IPv4 is left out of the packet
    pub framed_ip_address: String,
    pub acct_session_id: String,
    pub session_timeout: u32,
    pub idle_timeout: u32,
    pub vsas: Vec<VsaEntry>,
}

/// Assemble the CoA-Request packet for `request`.
///
/// Attribute order: Framed-IP-Address, Acct-Session-Id, Event-Timestamp,
/// Idle-Timeout, Session-Timeout, then the vendor attributes as given.
pub fn build_coa_packet(secret: &str, request: &CoaRequest) -> Result<Packet, CoaError> {
    let mut packet = Packet::request(Code::CoaRequest, secret);

    match request.framed_ip_address.parse::<Ipv4Addr>() {
        Ok(ip) => packet.add_attribute(Attribute::ipv4(
            AttributeType::FramedIpAddress.as_u8(),
            ip,
        )?),
        Err(_) => warn!(
            framed_ip = %request.framed_ip_address,
            "Framed-IP-Address is not an IPv4 address, omitting it"
        ),
    }

    packet.add_attribute(Attribute::string(
        AttributeType::AcctSessionId.as_u8(),
        request.acct_session_id.as_str(),
    )?);
    packet.add_attribute(Attribute::integer(
        AttributeType::EventTimestamp.as_u8(),
        event_timestamp(),
    )?);
    packet.add_attribute(Attribute::integer(
        AttributeType::IdleTimeout.as_u8(),
        request.idle_timeout,
    )?);
    packet.add_attribute(Attribute::integer(
        AttributeType::SessionTimeout.as_u8(),
        request.session_timeout,
    )?);

    for vsa in &request.vsas {
        packet.add_vsa(vsa.vendor_id, vsa.vendor_type, &vsa.encoded_value())?;
    }

    Ok(packet)
}

/// Seconds since the Unix epoch, saturated to the attribute's 32 bits
fn event_timestamp() -> u32 {
    u32::try_from(chrono::Utc::now().timestamp()).unwrap_or(u32::MAX)
}

/// Accept a CoA-ACK or no response at all
fn check_response(response: Option<Packet>) -> Result<(), CoaError> {
    match response {
        None => {
            debug!("CoA request got no response");
            Ok(())
        }
        Some(response) if response.code == Code::CoaAck => Ok(()),
        Some(response) => Err(CoaError::UnexpectedResponseCode(response.code)),
    }
}

/// Send a CoA request to one NAS and check its answer
pub async fn send_coa<E>(
    exchanger: &E,
    address: &str,
    secret: &str,
    request: &CoaRequest,
) -> Result<(), CoaError>
where
    E: Exchanger + ?Sized,
{
    let packet = build_coa_packet(secret, request)?;
    info!(
        address = %address,
        session_id = %request.acct_session_id,
        "Sending CoA request"
    );
    check_response(send_packet(exchanger, &packet, address).await?)
}

/// Send a CoA request to the first of `addresses` that answers
pub async fn send_coa_reliably<E, S>(
    exchanger: &E,
    addresses: &[S],
    secret: &str,
    request: &CoaRequest,
) -> Result<(), CoaError>
where
    E: Exchanger + ?Sized,
    S: AsRef<str>,
{
    let packet = build_coa_packet(secret, request)?;
    info!(
        servers = addresses.len(),
        session_id = %request.acct_session_id,
        "Sending CoA request"
    );
    check_response(exchange_reliably(exchanger, addresses, &packet).await?)
}
