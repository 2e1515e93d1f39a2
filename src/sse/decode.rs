//! Incremental UTF-8 decoding of transport chunks.
//!
//! HTTP chunk boundaries fall wherever the network puts them, including in
//! the middle of a multi-byte character. The decoder holds back an
//! incomplete trailing sequence until the next chunk completes it.

/// Stateful bytes-to-text decoder for a single response body.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `chunk` (prefixed by any held-back bytes) as forms
    /// complete characters. Invalid sequences become U+FFFD.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::with_capacity(self.pending.len());
        let mut rest: &[u8] = &self.pending;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    // `valid_up_to` guarantees this prefix is UTF-8
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        // Incomplete sequence at the end: keep it for next time
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        self.pending = rest.to_vec();
        out
    }

    /// Flush whatever is still held back at end of stream.
    pub fn finish(&mut self) -> String {
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.decode(b"data: hi\n\n"), "data: hi\n\n");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn test_multibyte_split_across_chunks() {
        let text = "héllo ✓";
        let bytes = text.as_bytes();
        // Split inside the three-byte check mark
        let split = bytes.len() - 1;

        let mut decoder = Utf8ChunkDecoder::new();
        let mut out = decoder.decode(&bytes[..split]);
        assert_eq!(out, "héllo ");
        out.push_str(&decoder.decode(&bytes[split..]));
        assert_eq!(out, text);
    }

    #[test]
    fn test_every_split_point_roundtrips() {
        let text = "data: {\"text\":\"naïve café 日本\"}\n\n";
        let bytes = text.as_bytes();
        for split in 0..=bytes.len() {
            let mut decoder = Utf8ChunkDecoder::new();
            let mut out = decoder.decode(&bytes[..split]);
            out.push_str(&decoder.decode(&bytes[split..]));
            out.push_str(&decoder.finish());
            assert_eq!(out, text, "split at {}", split);
        }
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        let mut decoder = Utf8ChunkDecoder::new();
        let out = decoder.decode(&[b'a', 0xFF, b'b']);
        assert_eq!(out, "a\u{FFFD}b");
    }

    #[test]
    fn test_finish_flushes_truncated_sequence() {
        let mut decoder = Utf8ChunkDecoder::new();
        // First two bytes of a three-byte sequence
        let out = decoder.decode(&[b'x', 0xE2, 0x9C]);
        assert_eq!(out, "x");
        assert_eq!(decoder.finish(), "\u{FFFD}");
        assert_eq!(decoder.finish(), "");
    }
}
