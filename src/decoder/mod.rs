//! Payload decoding modules
//!
//! - Classification of the raw QR payload into a wire format
//! - The secure numeric format (big integer, compression cascade, tokens)
//! - The legacy XML format

/// Wire format classification
pub mod classify;
/// Secure QR numeric format
pub mod secure;
/// Legacy XML format
pub mod xml;

pub use classify::classify;
pub use secure::decode_secure;
pub use secure::inflate::DecompressionPolicy;
pub use xml::decode_xml;
