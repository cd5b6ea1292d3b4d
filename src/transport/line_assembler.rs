//! # Line Assembler
//!
//! Buffers raw byte chunks until newline boundaries. Chunk boundaries fall
//! anywhere — mid-line, mid-codepoint — so bytes accumulate untouched and
//! decoding happens lossily per complete line only.

/// Incremental byte-to-line splitter.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buffer: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every line completed by it.
    ///
    /// Lines are decoded lossily (invalid UTF-8 becomes U+FFFD) with the
    /// trailing `\n` and any `\r` stripped. Bytes after the last newline
    /// stay buffered for the next chunk.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            raw.pop(); // the newline itself
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            lines.push(String::from_utf8_lossy(&raw).into_owned());
        }
        lines
    }

    /// Bytes buffered past the last newline.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
