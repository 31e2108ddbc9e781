//! Defines the output of a captioning operation.

use std::ops::Deref;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use mime::{self, Mime};


/// Output of the captioning process: an encoded PNG image.
#[derive(Clone, Debug)]
#[must_use = "unused caption output which must be used"]
pub struct CaptionOutput {
    bytes: Vec<u8>,
}

impl CaptionOutput {
    #[inline]
    pub(super) fn new(bytes: Vec<u8>) -> Self {
        CaptionOutput{bytes}
    }
}

impl CaptionOutput {
    /// Raw bytes of the output.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    /// Size of the output in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Convert the output into a vector of bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The MIME type of the output.
    #[inline]
    pub fn mime_type(&self) -> Mime {
        mime::IMAGE_PNG
    }

    /// Encode the output as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), BASE64.encode(&self.bytes))
    }
}

impl Deref for CaptionOutput {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.bytes()
    }
}

impl From<CaptionOutput> for Vec<u8> {
    fn from(output: CaptionOutput) -> Self {
        output.into_bytes()
    }
}
