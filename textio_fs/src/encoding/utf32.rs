/// Encode text as UTF-32 in the requested byte order.
pub fn encode_utf32(text: &str, big_endian: bool) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len() * 4);
    for ch in text.chars() {
        let code = ch as u32;
        if big_endian {
            result.extend_from_slice(&code.to_be_bytes());
        } else {
            result.extend_from_slice(&code.to_le_bytes());
        }
    }
    result
}

/// Streaming UTF-32 decoder holding back a partial code unit between calls.
pub struct Utf32Decoder {
    big_endian: bool,
    pending: Vec<u8>,
}

impl Utf32Decoder {
    pub fn new(big_endian: bool) -> Self {
        Utf32Decoder {
            big_endian,
            pending: Vec::with_capacity(4),
        }
    }

    /// Decode into `out`. On failure returns the offset into `bytes` of the
    /// offending code unit.
    pub fn decode(&mut self, bytes: &[u8], last: bool, out: &mut String) -> Result<(), usize> {
        let carried = self.pending.len();
        self.pending.extend_from_slice(bytes);

        let mut units = self.pending.chunks_exact(4);
        for (i, unit) in units.by_ref().enumerate() {
            let raw = [unit[0], unit[1], unit[2], unit[3]];
            let code = if self.big_endian {
                u32::from_be_bytes(raw)
            } else {
                u32::from_le_bytes(raw)
            };
            match char::from_u32(code) {
                Some(ch) => out.push(ch),
                None => return Err((i * 4).saturating_sub(carried)),
            }
        }
        let rest = units.remainder().to_vec();
        if last && !rest.is_empty() {
            return Err(bytes.len() - rest.len().min(bytes.len()));
        }
        self.pending = rest;
        Ok(())
    }
}
