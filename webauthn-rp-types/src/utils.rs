pub mod bytes;
pub mod crypto;
pub mod encoding;
pub mod rand;
pub(crate) mod serde;
