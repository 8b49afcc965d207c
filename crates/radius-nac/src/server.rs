use crate::config::ServerSettings;
use async_trait::async_trait;
use radius_nac_proto::{
    Packet, PacketError, calculate_response_authenticator, verify_request_authenticator,
};
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{ToSocketAddrs, UdpSocket};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Packet error: {0}")]
    Packet(#[from] PacketError),
    #[error("No shared secret for client {0}")]
    UnknownClient(IpAddr),
    #[error("Invalid request authenticator")]
    InvalidAuthenticator,
}

/// Looks up the shared secret for a client
pub trait SecretSource: Send + Sync {
    fn secret(&self, remote: SocketAddr) -> Option<Vec<u8>>;
}

/// Same secret for every client
#[derive(Debug, Clone)]
pub struct StaticSecretSource(Vec<u8>);

impl StaticSecretSource {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        StaticSecretSource(secret.into())
    }
}

impl SecretSource for StaticSecretSource {
    fn secret(&self, _remote: SocketAddr) -> Option<Vec<u8>> {
        Some(self.0.clone())
    }
}

/// An authenticated inbound request
#[derive(Debug, Clone)]
pub struct Request {
    pub remote_addr: SocketAddr,
    /// Decoded packet carrying the client's secret
    pub packet: Packet,
}

/// Request handler
///
/// Return the response to send, or `None` to stay silent. The server fills
/// in the identifier and Response Authenticator.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn serve(&self, request: Request) -> Option<Packet>;
}

#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Option<Packet>> + Send + 'static,
{
    async fn serve(&self, request: Request) -> Option<Packet> {
        (self)(request).await
    }
}

/// UDP packet server
pub struct PacketServer {
    socket: Arc<UdpSocket>,
    secrets: Arc<dyn SecretSource>,
    handler: Arc<dyn Handler>,
}

impl PacketServer {
    /// Bind a new packet server
    pub async fn bind<A: ToSocketAddrs>(
        addr: A,
        secrets: Arc<dyn SecretSource>,
        handler: Arc<dyn Handler>,
    ) -> Result<Self, ServerError> {
        let socket = UdpSocket::bind(addr).await?;
        info!("RADIUS packet server listening on {}", socket.local_addr()?);

        Ok(PacketServer {
            socket: Arc::new(socket),
            secrets,
            handler,
        })
    }

    /// Get the local address the server is listening on
    ///
    /// This is useful for testing when binding to port 0 (OS-assigned port)
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.socket.local_addr().map_err(ServerError::from)
    }

    /// Receive and handle requests until the socket fails
    pub async fn run(&self) -> Result<(), ServerError> {
        let mut buf = vec![0u8; Packet::MAX_PACKET_SIZE];

        loop {
            let (len, addr) = self.socket.recv_from(&mut buf).await?;
            let data = buf[..len].to_vec();

            let socket = Arc::clone(&self.socket);
            let secrets = Arc::clone(&self.secrets);
            let handler = Arc::clone(&self.handler);

            tokio::spawn(async move {
                if let Err(e) = Self::handle_request(data, addr, socket, secrets, handler).await {
                    debug!("Error handling request from {}: {}", addr, e);
                }
            });
        }
    }

    async fn handle_request(
        data: Vec<u8>,
        addr: SocketAddr,
        socket: Arc<UdpSocket>,
        secrets: Arc<dyn SecretSource>,
        handler: Arc<dyn Handler>,
    ) -> Result<(), ServerError> {
        let secret = secrets
            .secret(addr)
            .ok_or(ServerError::UnknownClient(addr.ip()))?;

        let request = Packet::decode(&data)?;
        if !verify_request_authenticator(&request, &secret) {
            warn!(
                client = %addr,
                code = ?request.code,
                identifier = request.identifier,
                "Dropping request with invalid authenticator"
            );
            return Err(ServerError::InvalidAuthenticator);
        }

        debug!(
            client = %addr,
            code = ?request.code,
            identifier = request.identifier,
            "Received request"
        );

        let identifier = request.identifier;
        let request_authenticator = request.authenticator;
        let response = handler
            .serve(Request {
                remote_addr: addr,
                packet: request.with_secret(secret.clone()),
            })
            .await;

        let Some(mut response) = response else {
            debug!(client = %addr, identifier, "Handler produced no response");
            return Ok(());
        };

        response.identifier = identifier;
        response.authenticator =
            calculate_response_authenticator(&response, &request_authenticator, &secret)?;
        let response_data = response.encode()?;
        socket.send_to(&response_data, addr).await?;

        debug!(client = %addr, code = ?response.code, identifier, "Sent response");
        Ok(())
    }
}

/// Bind to `settings` and serve requests until the socket fails
pub async fn listen(settings: &ServerSettings, handler: Arc<dyn Handler>) -> Result<(), ServerError> {
    let server = PacketServer::bind(
        settings.addr(),
        Arc::new(StaticSecretSource::new(settings.secret.as_bytes())),
        handler,
    )
    .await?;
    server.run().await
}

/// Bind to `settings` and serve requests on a background task.
///
/// Returns once the socket is bound, with the bound address.
pub async fn spawn(
    settings: &ServerSettings,
    handler: Arc<dyn Handler>,
) -> Result<(SocketAddr, JoinHandle<Result<(), ServerError>>), ServerError> {
    let server = PacketServer::bind(
        settings.addr(),
        Arc::new(StaticSecretSource::new(settings.secret.as_bytes())),
        handler,
    )
    .await?;
    let addr = server.local_addr()?;
    let task = tokio::spawn(async move { server.run().await });
    Ok((addr, task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_secret_source() {
        let source = StaticSecretSource::new("shared");
        let remote: SocketAddr = "192.0.2.1:1700".parse().unwrap();
        assert_eq!(source.secret(remote), Some(b"shared".to_vec()));
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let handler: Arc<dyn Handler> = Arc::new(|_request: Request| async { None::<Packet> });
        let server = PacketServer::bind(
            "127.0.0.1:0",
            Arc::new(StaticSecretSource::new("secret")),
            handler,
        )
        .await
        .unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
    }
}
