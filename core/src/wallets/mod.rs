//! Provider adapters.

pub mod magic_eden;
pub mod unisat;
pub mod xverse;

pub use magic_eden::MagicEdenWallet;
pub use unisat::UnisatWallet;
pub use xverse::XverseWallet;
