//! Request/response exchange with a single RADIUS server

use crate::error::{ExchangeError, ExchangeResult};
use async_trait::async_trait;
use radius_nac_proto::{Packet, sign_request, verify_response_authenticator};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{UdpSocket, lookup_host};
use tracing::{debug, trace};

/// Deadline applied to every exchange started through [`send_packet`]
pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of invalid replies tolerated within one exchange
pub const DEFAULT_MAX_PACKET_ERRORS: u32 = 10;

/// Sends one packet to one server and waits for its reply.
///
/// `Ok(None)` means the server accepted the exchange without answering.
/// The packet is borrowed: implementations sign and encode a copy.
#[async_trait]
pub trait Exchanger: Send + Sync {
    async fn exchange(&self, packet: &Packet, address: &str) -> ExchangeResult<Option<Packet>>;
}

/// Client-side exchange tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Overall deadline for one exchange
    pub timeout: Duration,
    /// Resend interval; zero disables resending
    pub retry: Duration,
    /// Invalid replies tolerated before giving up; zero ignores them all
    pub max_packet_errors: u32,
}

impl ClientConfig {
    pub fn new(max_packet_errors: u32, retry: Duration) -> Self {
        ClientConfig {
            max_packet_errors,
            retry,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            timeout: DEFAULT_EXCHANGE_TIMEOUT,
            retry: Duration::ZERO,
            max_packet_errors: DEFAULT_MAX_PACKET_ERRORS,
        }
    }
}

/// Exchanges packets over UDP, one ephemeral socket per exchange
#[derive(Debug, Clone, Default)]
pub struct UdpExchanger {
    config: ClientConfig,
}

impl UdpExchanger {
    pub fn new(config: ClientConfig) -> Self {
        UdpExchanger { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn resolve(address: &str) -> ExchangeResult<SocketAddr> {
        if address.is_empty() {
            return Err(ExchangeError::InvalidAddress(address.to_string()));
        }
        lookup_host(address)
            .await
            .map_err(|_| ExchangeError::InvalidAddress(address.to_string()))?
            .next()
            .ok_or_else(|| ExchangeError::InvalidAddress(address.to_string()))
    }

    async fn exchange_once(
        &self,
        packet: &Packet,
        address: &str,
    ) -> ExchangeResult<Option<Packet>> {
        let peer = Self::resolve(address).await?;

        let mut request = packet.clone();
        request.identifier = rand::random();
        sign_request(&mut request)?;
        let data = request.encode()?;

        let local = if peer.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(peer).await?;
        socket.send(&data).await?;
        debug!(
            server = %peer,
            code = ?request.code,
            identifier = request.identifier,
            "Request sent"
        );

        let mut buf = vec![0u8; Packet::MAX_PACKET_SIZE];
        let mut packet_errors = 0u32;

        loop {
            let len = if self.config.retry.is_zero() {
                socket.recv(&mut buf).await?
            } else {
                tokio::select! {
                    received = socket.recv(&mut buf) => received?,
                    _ = tokio::time::sleep(self.config.retry) => {
                        trace!(server = %peer, identifier = request.identifier, "Resending request");
                        socket.send(&data).await?;
                        continue;
                    }
                }
            };

            let response = match Packet::decode(&buf[..len]) {
                Ok(response)
                    if response.identifier == request.identifier
                        && verify_response_authenticator(
                            &response,
                            &request.authenticator,
                            &request.secret,
                        ) =>
                {
                    response
                }
                Ok(response) => {
                    debug!(
                        server = %peer,
                        identifier = response.identifier,
                        "Discarding response with mismatched identifier or authenticator"
                    );
                    self.count_packet_error(&mut packet_errors)?;
                    continue;
                }
                Err(e) => {
                    debug!(server = %peer, error = %e, "Discarding malformed response");
                    self.count_packet_error(&mut packet_errors)?;
                    continue;
                }
            };

            debug!(server = %peer, code = ?response.code, "Response received");
            return Ok(Some(response.with_secret(request.secret)));
        }
    }

    fn count_packet_error(&self, packet_errors: &mut u32) -> ExchangeResult<()> {
        if self.config.max_packet_errors == 0 {
            return Ok(());
        }
        *packet_errors += 1;
        if *packet_errors >= self.config.max_packet_errors {
            return Err(ExchangeError::TooManyPacketErrors(*packet_errors));
        }
        Ok(())
    }
}

#[async_trait]
impl Exchanger for UdpExchanger {
    async fn exchange(&self, packet: &Packet, address: &str) -> ExchangeResult<Option<Packet>> {
        tokio::time::timeout(self.config.timeout, self.exchange_once(packet, address))
            .await
            .map_err(|_| ExchangeError::Timeout(self.config.timeout))?
    }
}

/// Exchange `packet` with `address` under [`DEFAULT_EXCHANGE_TIMEOUT`],
/// whatever deadline the exchanger itself uses.
pub async fn send_packet<E>(
    exchanger: &E,
    packet: &Packet,
    address: &str,
) -> ExchangeResult<Option<Packet>>
where
    E: Exchanger + ?Sized,
{
    tokio::time::timeout(DEFAULT_EXCHANGE_TIMEOUT, exchanger.exchange(packet, address))
        .await
        .map_err(|_| ExchangeError::Timeout(DEFAULT_EXCHANGE_TIMEOUT))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry, Duration::ZERO);
        assert_eq!(config.max_packet_errors, 10);
    }

    #[test]
    fn test_client_config_new() {
        let config = ClientConfig::new(3, Duration::from_millis(500))
            .with_timeout(Duration::from_secs(2));
        assert_eq!(config.max_packet_errors, 3);
        assert_eq!(config.retry, Duration::from_millis(500));
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_count_packet_errors() {
        let exchanger = UdpExchanger::new(ClientConfig::new(2, Duration::ZERO));
        let mut errors = 0;
        assert!(exchanger.count_packet_error(&mut errors).is_ok());
        assert!(matches!(
            exchanger.count_packet_error(&mut errors),
            Err(ExchangeError::TooManyPacketErrors(2))
        ));
    }

    #[test]
    fn test_unlimited_packet_errors() {
        let exchanger = UdpExchanger::new(ClientConfig::new(0, Duration::ZERO));
        let mut errors = 0;
        for _ in 0..100 {
            assert!(exchanger.count_packet_error(&mut errors).is_ok());
        }
        assert_eq!(errors, 0);
    }

    #[tokio::test]
    async fn test_empty_address_rejected() {
        let exchanger = UdpExchanger::default();
        let packet = Packet::request(radius_nac_proto::Code::StatusServer, "secret");
        let result = exchanger.exchange(&packet, "").await;
        assert!(matches!(result, Err(ExchangeError::InvalidAddress(_))));
    }
}
