use crate::claims::Claims;
use crate::error::{Error, Result};
use crate::limits::{
    MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_DECODED_SIGNATURE_SIZE,
    MAX_TOKEN_LENGTH,
};
use crate::token::Header;
use crate::utils::base64url;

/// A compact JWS split into its segments, nothing decoded yet
///
/// Segments borrow from the input. Each accessor decodes on demand so the
/// caller controls the order: header, then signature, and the payload only
/// once the signature is known to be good.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TokenParts<'a> {
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
    signing_input: &'a str,
}

impl<'a> TokenParts<'a> {
    /// Split `header.payload.signature`; anything but three segments is malformed
    pub(crate) fn split(token: &'a str) -> Result<Self> {
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(Error::malformed(format!(
                "token too long: {} bytes (max: {MAX_TOKEN_LENGTH})",
                token.len()
            )));
        }

        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(Error::malformed(
                "expected three segments separated by '.'",
            ));
        };

        Ok(Self {
            header,
            payload,
            signature,
            signing_input: &token[..header.len() + 1 + payload.len()],
        })
    }

    /// The exact bytes the signature covers
    pub(crate) fn signing_input(&self) -> &'a str {
        self.signing_input
    }

    pub(crate) fn header(&self) -> Result<Header> {
        let json = base64url::decode(self.header, MAX_DECODED_HEADER_SIZE)?;
        Header::from_json(&json)
    }

    pub(crate) fn claims(&self) -> Result<Claims> {
        let json = base64url::decode(self.payload, MAX_DECODED_PAYLOAD_SIZE)?;
        Claims::from_json(&json)
    }

    pub(crate) fn signature(&self) -> Result<Vec<u8>> {
        base64url::decode_bytes(self.signature, MAX_DECODED_SIGNATURE_SIZE)
    }
}
