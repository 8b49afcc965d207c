//! Sequential fail-over across an ordered list of servers

use crate::error::{ExchangeError, ExchangeResult};
use crate::exchange::{Exchanger, send_packet};
use radius_nac_proto::Packet;
use tracing::{debug, warn};

/// Exchange `packet` with each address in turn until one succeeds.
///
/// Returns the first successful result, which may itself be "no response".
/// When every address fails the last error is returned. An empty address
/// list is not an error and yields `Ok(None)`.
pub async fn exchange_reliably<E, S>(
    exchanger: &E,
    addresses: &[S],
    packet: &Packet,
) -> ExchangeResult<Option<Packet>>
where
    E: Exchanger + ?Sized,
    S: AsRef<str>,
{
    let mut last_error: Option<ExchangeError> = None;

    for address in addresses {
        let address = address.as_ref();
        match send_packet(exchanger, packet, address).await {
            Ok(response) => {
                debug!(
                    address = %address,
                    code = ?response.as_ref().map(|r| r.code),
                    "Exchange succeeded"
                );
                return Ok(response);
            }
            Err(e) => {
                warn!(address = %address, error = %e, "Exchange failed, trying next server");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(e),
        None => Ok(None),
    }
}
