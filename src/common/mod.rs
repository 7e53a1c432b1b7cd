pub mod bitstring;
pub mod codec;
pub mod ec;
pub mod error;
pub mod mask;
pub mod metadata;

pub use bitstring::*;
pub use codec::*;
pub use error::*;
pub use mask::*;
pub use metadata::*;
