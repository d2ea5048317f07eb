use clap::Parser;
use shared::protocol::{DEFAULT_HOST_LABEL, DEFAULT_HTTP_PORT};

#[derive(Parser, Debug, Clone)]
#[command(name = "specsserver-httpd")]
#[command(author, version, about = "Minimal HTTP service behind the announced hostname")]
pub struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// Host label this server is reachable under (becomes <name>.local)
    #[arg(long, default_value = DEFAULT_HOST_LABEL)]
    pub name: String,

    /// Log at debug level
    #[arg(long)]
    pub debug: bool,
}
