pub mod digest;
pub mod payload;
pub mod record;

pub use digest::{Fingerprint, IdentifierHash};
pub use payload::{ClassifiedPayload, PayloadKind, RawPayload};
pub use record::{Gender, IdentityRecord};
