//! Transport layer: a small capability set (connect, listen, accept,
//! send a record, receive one, close) implemented today over plain TCP.

pub mod tcp;
pub mod traits;

pub use tcp::TcpTransport;
pub use traits::{Connection, Listener, Transport, MAX_RECORD_LEN};
