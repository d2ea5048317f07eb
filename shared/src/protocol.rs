/// mDNS service type advertised for the companion HTTP server
pub const HTTP_SERVICE_TYPE: &str = "_http._tcp.local.";

/// Domain suffix appended to the announced host label
pub const LOCAL_DOMAIN: &str = "local.";

/// Default host label, announced as specsserver.local
pub const DEFAULT_HOST_LABEL: &str = "specsserver";

/// Default port for the companion HTTP service
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// TXT record key naming the HTTP path clients should start from
pub const TXT_PATH: &str = "path";

/// Default value for the TXT path record
pub const DEFAULT_PATH: &str = "/";
