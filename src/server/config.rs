use std::net::SocketAddr;

/// Default port the server binds to.
pub const DEFAULT_PORT: u16 = 42069;

/// Default initial capacity of a connection read buffer.
pub const DEFAULT_BUFFER_CAP: usize = 1024;

/// Default maximum size of the request line and header block.
pub const MAX_HEADER_SIZE: usize = 8 * 1024;

/// Server configuration.
///
/// ```rust
/// use tcphttp::Config;
///
/// let config = Config::new()
///     .with_addr(([127, 0, 0, 1], 0))
///     .with_max_header_size(16 * 1024);
///
/// assert_eq!(config.buffer_capacity(), 1024);
/// assert_eq!(config.max_header_size(), 16 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    addr: SocketAddr,
    buffer_capacity: usize,
    max_header_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            buffer_capacity: DEFAULT_BUFFER_CAP,
            max_header_size: MAX_HEADER_SIZE,
        }
    }
}

impl Config {
    /// Create default configuration, listening on `0.0.0.0:42069`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_addr(mut self, addr: impl Into<SocketAddr>) -> Self {
        self.addr = addr.into();
        self
    }

    /// Set the bind port, keeping the address.
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }

    /// Set the initial read buffer capacity of each connection.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set the maximum size of the request line and header block.
    ///
    /// Requests reaching this limit are rejected with `431 Request Header Fields Too Large`.
    pub fn with_max_header_size(mut self, size: usize) -> Self {
        self.max_header_size = size;
        self
    }

    #[inline]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    #[inline]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    #[inline]
    pub fn max_header_size(&self) -> usize {
        self.max_header_size
    }
}
