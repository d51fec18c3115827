use crate::error::Result;
use crate::keys::Key;

/// Contract every JWS signature algorithm implements
///
/// Implementations are stateless unit structs. Key material is borrowed for
/// the duration of a single call and checked against the algorithm family on
/// every use.
pub(crate) trait SigningAlgorithm: Send + Sync {
    /// The algorithm identifier (e.g., "HS256", "RS256")
    fn name(&self) -> &'static str;

    /// Produce the raw signature bytes over `signing_input` (header.payload)
    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>>;

    /// Check raw signature bytes against `signing_input`
    ///
    /// A signature that does not match yields `SignatureMismatch`; a key that
    /// cannot be used with this algorithm yields `InvalidKey`.
    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()>;
}
