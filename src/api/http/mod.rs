mod request;
mod response;
mod transport;

pub use request::{Request, RequestBody};
pub use response::{decode, HeaderField, NoContent, RawResponse, ResponseShape};
pub use transport::{Auth, BlockingTransport, Transport};
