//! Streaming decoder that tolerates multi-byte sequences split across chunks.

use encoding_rs::DecoderResult;

use super::utf32::Utf32Decoder;
use super::{CodecError, Encoding};

enum Inner {
    Rs(encoding_rs::Decoder),
    Utf32(Utf32Decoder),
}

/// Incremental bytes-to-text decoder.
///
/// Incomplete trailing sequences are held back until the next call; only
/// the final call (`last = true`) treats them as malformed.
pub struct Decoder {
    encoding: Encoding,
    inner: Inner,
    position: u64,
}

impl Decoder {
    pub fn new(encoding: Encoding) -> Self {
        let inner = match encoding {
            Encoding::Utf8 => Inner::Rs(encoding_rs::UTF_8.new_decoder_without_bom_handling()),
            Encoding::Utf16Le => {
                Inner::Rs(encoding_rs::UTF_16LE.new_decoder_without_bom_handling())
            }
            Encoding::Utf16Be => {
                Inner::Rs(encoding_rs::UTF_16BE.new_decoder_without_bom_handling())
            }
            Encoding::Utf32Le => Inner::Utf32(Utf32Decoder::new(false)),
            Encoding::Utf32Be => Inner::Utf32(Utf32Decoder::new(true)),
            Encoding::Legacy(rs) => Inner::Rs(rs.new_decoder_without_bom_handling()),
        };
        Decoder {
            encoding,
            inner,
            position: 0,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Decode `bytes`, appending the text to `out`.
    pub fn decode(
        &mut self,
        bytes: &[u8],
        last: bool,
        out: &mut String,
    ) -> Result<(), CodecError> {
        let start = self.position;
        self.position += bytes.len() as u64;
        match &mut self.inner {
            Inner::Utf32(decoder) => decoder.decode(bytes, last, out).map_err(|offset| {
                CodecError::Malformed {
                    encoding: self.encoding,
                    position: start + offset as u64,
                }
            }),
            Inner::Rs(decoder) => {
                let mut consumed = 0usize;
                loop {
                    let input = &bytes[consumed..];
                    let needed = decoder
                        .max_utf8_buffer_length_without_replacement(input.len())
                        .unwrap_or(input.len() * 3 + 16);
                    out.reserve(needed);
                    let (result, read) =
                        decoder.decode_to_string_without_replacement(input, out, last);
                    consumed += read;
                    match result {
                        DecoderResult::InputEmpty => return Ok(()),
                        DecoderResult::OutputFull => continue,
                        DecoderResult::Malformed(_, _) => {
                            return Err(CodecError::Malformed {
                                encoding: self.encoding,
                                position: start + consumed as u64,
                            });
                        }
                    }
                }
            }
        }
    }
}
