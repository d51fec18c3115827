// Internal modules
mod header;
mod parsed;

// Public API exports
pub use header::Header;

pub(crate) use parsed::TokenParts;
