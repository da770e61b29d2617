//! Control-port plumbing: the line transport, the setup command exchange, and
//! the collaborators that find an endpoint and the authentication cookie.

pub mod connector;
pub mod cookie;
pub mod exchange;
pub mod transport;

pub use connector::{connect_first, DIAL_TIMEOUT};
pub use cookie::{find_cookie_file, read_cookie};
pub use exchange::{ControlExchange, MONITORED_EVENTS};
pub use transport::{LineReader, LineTransport};
