use std::net::Ipv4Addr;
use clap::Parser;
use shared::protocol::{DEFAULT_HOST_LABEL, DEFAULT_HTTP_PORT};

#[derive(Parser, Debug, Clone)]
#[command(name = "specsserver-announcerd")]
#[command(author, version, about = "Announce this machine as <name>.local via multicast DNS")]
pub struct Args {
    /// IPv4 address to advertise. Auto-detected from the primary interface
    /// when omitted.
    #[arg(long)]
    pub ip: Option<Ipv4Addr>,

    /// Port of the companion HTTP service
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// Host label to announce (becomes <name>.local)
    #[arg(long, default_value = DEFAULT_HOST_LABEL)]
    pub name: String,
}
