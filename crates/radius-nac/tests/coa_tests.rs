//! CoA End-to-End Tests
//!
//! These tests send CoA requests to a live packet server bound to 127.0.0.1
//! and check what the NAS side receives and how its answer is interpreted.

use async_trait::async_trait;
use radius_nac::{
    ClientConfig, CoaError, CoaRequest, ExchangeError, ExchangeResult, Exchanger, PacketServer,
    Request, StaticSecretSource, UdpExchanger, VsaEntry, send_coa, send_coa_reliably,
};
use radius_nac_proto::dictionary::{CISCO_AVPAIR, WIMARK_CLIENT_GROUP, WIMARK_SESSION_TIMEOUT};
use radius_nac_proto::vendor::cisco;
use radius_nac_proto::{
    AttributeType, Code, Packet, VENDOR_CISCO, VENDOR_WIMARK, verify_request_authenticator,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Duration;

const SECRET: &str = "coa-secret";

/// Start a NAS stand-in that forwards every request and answers with `reply`
async fn start_nas(secret: &str, reply: Code) -> (SocketAddr, mpsc::UnboundedReceiver<Packet>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handler = move |request: Request| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(request.packet);
            Some(Packet::new(reply, 0, [0u8; 16]))
        }
    };

    let server = PacketServer::bind(
        "127.0.0.1:0",
        Arc::new(StaticSecretSource::new(secret)),
        Arc::new(handler),
    )
    .await
    .expect("Failed to bind server");
    let addr = server.local_addr().expect("Failed to get server address");
    tokio::spawn(async move { server.run().await });

    (addr, rx)
}

fn coa_request() -> CoaRequest {
    CoaRequest {
        framed_ip_address: "10.20.30.40".to_string(),
        acct_session_id: "8000000A".to_string(),
        session_timeout: 7200,
        idle_timeout: 900,
        vsas: vec![
            VsaEntry::text(VENDOR_WIMARK, WIMARK_CLIENT_GROUP.vendor_type, "staff"),
            VsaEntry::integer(VENDOR_WIMARK, WIMARK_SESSION_TIMEOUT.vendor_type, 3600),
            VsaEntry::text(VENDOR_CISCO, CISCO_AVPAIR.vendor_type, cisco::SUBSCRIBER_REAUTHENTICATE),
        ],
    }
}

/// Answers every exchange with a fixed result
struct FixedExchanger(Option<Code>);

#[async_trait]
impl Exchanger for FixedExchanger {
    async fn exchange(&self, _packet: &Packet, _address: &str) -> ExchangeResult<Option<Packet>> {
        Ok(self.0.map(|code| Packet::new(code, 1, [0u8; 16])))
    }
}

#[tokio::test]
async fn test_coa_ack() {
    let (addr, mut received) = start_nas(SECRET, Code::CoaAck).await;
    let exchanger = UdpExchanger::default();

    send_coa(&exchanger, &addr.to_string(), SECRET, &coa_request())
        .await
        .expect("CoA should be acknowledged");

    let packet = received.recv().await.expect("NAS should see the request");
    assert_eq!(packet.code, Code::CoaRequest);
    assert!(verify_request_authenticator(&packet, SECRET.as_bytes()));

    assert_eq!(
        packet
            .find_attribute(AttributeType::FramedIpAddress.as_u8())
            .unwrap()
            .as_ipv4()
            .unwrap(),
        Ipv4Addr::new(10, 20, 30, 40)
    );
    assert_eq!(
        packet
            .find_attribute(AttributeType::AcctSessionId.as_u8())
            .unwrap()
            .as_string()
            .unwrap(),
        "8000000A"
    );
    assert_eq!(
        packet
            .find_attribute(AttributeType::SessionTimeout.as_u8())
            .unwrap()
            .as_integer()
            .unwrap(),
        7200
    );
    assert_eq!(WIMARK_CLIENT_GROUP.get_string(&packet), "staff");
    assert_eq!(WIMARK_SESSION_TIMEOUT.get(&packet), 3600);
    assert_eq!(
        CISCO_AVPAIR.lookup(&packet).unwrap(),
        cisco::SUBSCRIBER_REAUTHENTICATE
    );
}

#[tokio::test]
async fn test_coa_nak() {
    let (addr, _received) = start_nas(SECRET, Code::CoaNak).await;
    let exchanger = UdpExchanger::default();

    let result = send_coa(&exchanger, &addr.to_string(), SECRET, &coa_request()).await;

    assert!(matches!(result, Err(CoaError::UnexpectedResponseCode(Code::CoaNak))));
}

#[tokio::test]
async fn test_coa_unlisted_response_code_is_reported() {
    let (addr, _received) = start_nas(SECRET, Code::from_u8(46)).await;
    let config = ClientConfig::default().with_timeout(Duration::from_secs(2));
    let exchanger = UdpExchanger::new(config);

    let result = send_coa(&exchanger, &addr.to_string(), SECRET, &coa_request()).await;

    match result {
        Err(CoaError::UnexpectedResponseCode(code)) => assert_eq!(code.as_u8(), 46),
        other => panic!("expected unexpected response code, got {other:?}"),
    }
}

#[tokio::test]
async fn test_coa_wrong_secret_is_dropped() {
    let (addr, mut received) = start_nas("nas-secret", Code::CoaAck).await;
    let config = ClientConfig::default().with_timeout(Duration::from_millis(300));
    let exchanger = UdpExchanger::new(config);

    let result = send_coa(&exchanger, &addr.to_string(), SECRET, &coa_request()).await;

    assert!(matches!(result, Err(CoaError::Exchange(ExchangeError::Timeout(_)))));
    assert!(received.try_recv().is_err());
}

#[tokio::test]
async fn test_coa_no_response_is_success() {
    let exchanger = FixedExchanger(None);
    assert!(send_coa(&exchanger, "nas", SECRET, &coa_request()).await.is_ok());
}

#[tokio::test]
async fn test_coa_disconnect_ack_is_failure() {
    let exchanger = FixedExchanger(Some(Code::DisconnectAck));
    let result = send_coa(&exchanger, "nas", SECRET, &coa_request()).await;
    assert!(matches!(
        result,
        Err(CoaError::UnexpectedResponseCode(Code::DisconnectAck))
    ));
}

#[tokio::test]
async fn test_coa_invalid_vsa_not_sent() {
    let (addr, mut received) = start_nas(SECRET, Code::CoaAck).await;
    let exchanger = UdpExchanger::default();
    let mut request = coa_request();
    request
        .vsas
        .push(VsaEntry::text(VENDOR_WIMARK, 3, "g".repeat(400)));

    let result = send_coa(&exchanger, &addr.to_string(), SECRET, &request).await;

    assert!(matches!(result, Err(CoaError::Vsa(_))));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(received.try_recv().is_err());
}

#[tokio::test]
async fn test_coa_reliably_skips_dead_server() {
    // Bound but silent
    let dead = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let (addr, mut received) = start_nas(SECRET, Code::CoaAck).await;

    let config = ClientConfig::default().with_timeout(Duration::from_millis(300));
    let exchanger = UdpExchanger::new(config);
    let servers = vec![dead.local_addr().unwrap().to_string(), addr.to_string()];

    send_coa_reliably(&exchanger, &servers, SECRET, &coa_request())
        .await
        .expect("second server should acknowledge");

    let packet = received.recv().await.unwrap();
    assert_eq!(packet.code, Code::CoaRequest);
}
