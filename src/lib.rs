pub mod cs;

pub use cs::ecc::{batch, checksum, hamming};
pub use cs::error::{Error, Result};
