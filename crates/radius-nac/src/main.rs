use clap::{Parser, Subcommand};
use radius_nac::{
    Config, CoaRequest, Handler, Request, UdpExchanger, VsaEntry, listen, send_coa_reliably,
};
use radius_nac_proto::avpair::decode_avpairs;
use radius_nac_proto::vendor::vendor_by_name;
use radius_nac_proto::{Code, Packet};
use std::path::Path;
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// RADIUS Change-of-Authorization client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "radius-nac")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "config.json")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a CoA request to the configured servers, first answer wins
    Coa {
        /// Client IPv4 address (Framed-IP-Address)
        #[arg(long)]
        framed_ip: String,

        /// Accounting session id (Acct-Session-Id)
        #[arg(long)]
        session_id: String,

        /// Session-Timeout in seconds
        #[arg(long, default_value_t = 0)]
        session_timeout: u32,

        /// Idle-Timeout in seconds
        #[arg(long, default_value_t = 0)]
        idle_timeout: u32,

        /// Vendor attribute as vendor:type:value; vendor is a name or id,
        /// numeric values are sent as 32-bit integers
        #[arg(long = "vsa", value_name = "VENDOR:TYPE:VALUE", value_parser = parse_vsa)]
        vsas: Vec<VsaEntry>,
    },

    /// Validate configuration and exit
    Validate,

    /// Listen for CoA and Disconnect requests, log them and acknowledge
    Listen,
}

fn parse_vsa(arg: &str) -> Result<VsaEntry, String> {
    let mut parts = arg.splitn(3, ':');
    let (Some(vendor), Some(vendor_type), Some(value)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected vendor:type:value, got '{arg}'"));
    };

    let vendor_id = match vendor.parse::<u32>() {
        Ok(id) => id,
        Err(_) => vendor_by_name(vendor)
            .map(|v| v.id)
            .ok_or_else(|| format!("unknown vendor '{vendor}'"))?,
    };
    let vendor_type = vendor_type
        .parse::<u8>()
        .map_err(|_| format!("invalid vendor type '{vendor_type}'"))?;

    Ok(match value.parse::<u32>() {
        Ok(number) => VsaEntry::integer(vendor_id, vendor_type, number),
        Err(_) => VsaEntry::text(vendor_id, vendor_type, value),
    })
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs every request and acknowledges CoA and Disconnect requests
struct AckHandler;

#[async_trait::async_trait]
impl Handler for AckHandler {
    async fn serve(&self, request: Request) -> Option<Packet> {
        info!(client = %request.remote_addr, code = ?request.packet.code, "Request received");
        match decode_avpairs(&request.packet) {
            Ok(avps) => {
                for avp in avps {
                    info!("  {}", avp);
                }
            }
            Err(e) => warn!(error = %e, "Could not decode vendor attributes"),
        }

        let code = match request.packet.code {
            Code::CoaRequest => Code::CoaAck,
            Code::DisconnectRequest => Code::DisconnectAck,
            _ => return None,
        };
        Some(Packet::new(code, request.packet.identifier, [0u8; 16]))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !Path::new(&cli.config).exists() {
        init_tracing("info");
        warn!("Could not find config file: {}", cli.config);
        info!("Creating example configuration at: {}", cli.config);
        if let Err(e) = Config::example().to_file(&cli.config) {
            error!("Error creating example config: {}", e);
            process::exit(1);
        }
        info!("Please edit {} and run again", cli.config);
        process::exit(0);
    }

    let config = match Config::from_file(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration validation failed!");
            eprintln!("   Error: {}", e);
            process::exit(1);
        }
    };

    if let Command::Validate = cli.command {
        println!("Configuration validated successfully!");
        println!();
        println!("Configuration summary:");
        println!("  Servers: {}", config.servers.len());
        for server in &config.servers {
            println!("    {}", server);
        }
        println!("  Timeout: {}s", config.timeout_secs);
        println!("  Retry interval: {}ms", config.retry_interval_ms);
        println!("  Max packet errors: {}", config.max_packet_errors);
        println!("  Listen: {}:{}", config.listen_address, config.listen_port);
        println!("  Log level: {}", config.log_level.as_deref().unwrap_or("info"));
        if config.servers.is_empty() {
            println!();
            println!("WARNING: No servers configured, CoA requests will not be sent");
        }
        process::exit(0);
    }

    init_tracing(config.log_level.as_deref().unwrap_or("info"));

    match cli.command {
        Command::Coa {
            framed_ip,
            session_id,
            session_timeout,
            idle_timeout,
            vsas,
        } => {
            if config.servers.is_empty() {
                warn!("No servers configured, nothing sent");
            }

            let request = CoaRequest {
                framed_ip_address: framed_ip,
                acct_session_id: session_id,
                session_timeout,
                idle_timeout,
                vsas,
            };
            let exchanger = UdpExchanger::new(config.client_config());

            match send_coa_reliably(&exchanger, &config.servers, &config.secret, &request).await {
                Ok(()) => info!("CoA request accepted"),
                Err(e) => {
                    error!("CoA request failed: {}", e);
                    process::exit(1);
                }
            }
        }
        Command::Listen => {
            let settings = config.server_settings();
            info!("Listening for dynamic authorization requests on {}", settings.addr());
            if let Err(e) = listen(&settings, Arc::new(AckHandler)).await {
                error!("Server error: {}", e);
                process::exit(1);
            }
        }
        Command::Validate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radius_nac::VsaValue;
    use radius_nac_proto::{VENDOR_CISCO, VENDOR_WIMARK};

    #[test]
    fn test_parse_vsa_named_vendor() {
        let vsa = parse_vsa("wimark:3:guests").unwrap();
        assert_eq!(vsa.vendor_id, VENDOR_WIMARK);
        assert_eq!(vsa.vendor_type, 3);
        assert_eq!(vsa.value, VsaValue::Text("guests".to_string()));
    }

    #[test]
    fn test_parse_vsa_numeric() {
        let vsa = parse_vsa("52400:4:1800").unwrap();
        assert_eq!(vsa.vendor_id, VENDOR_WIMARK);
        assert_eq!(vsa.value, VsaValue::Integer(1800));
    }

    #[test]
    fn test_parse_vsa_value_with_colons() {
        let vsa = parse_vsa("cisco:1:subscriber:command=reauthenticate").unwrap();
        assert_eq!(vsa.vendor_id, VENDOR_CISCO);
        assert_eq!(
            vsa.value,
            VsaValue::Text("subscriber:command=reauthenticate".to_string())
        );
    }

    #[test]
    fn test_parse_vsa_errors() {
        assert!(parse_vsa("wimark:3").is_err());
        assert!(parse_vsa("nobody:3:x").is_err());
        assert!(parse_vsa("wimark:300:x").is_err());
    }
}
