/// Literal tag that marks an event line.
pub const DATA_TAG: &str = "data: ";
/// Payload that ends an event stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Incremental UTF-8 decoder that survives characters split across chunks.
///
/// At most one truncated sequence (up to 3 bytes) is carried between calls.
/// Invalid bytes decode to U+FFFD, like a lossy decoder would.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut pieces = bytes.utf8_chunks().peekable();
        while let Some(piece) = pieces.next() {
            out.push_str(piece.valid());
            let invalid = piece.invalid();
            if invalid.is_empty() {
                continue;
            }
            if pieces.peek().is_none() && is_truncated_sequence(invalid) {
                self.pending = invalid.to_vec();
            } else {
                out.push(char::REPLACEMENT_CHARACTER);
            }
        }
        out
    }

    /// Flushes a dangling truncated sequence at end of stream.
    pub fn finish(&mut self) -> String {
        if std::mem::take(&mut self.pending).is_empty() {
            String::new()
        } else {
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }
}

fn is_truncated_sequence(bytes: &[u8]) -> bool {
    let width = match bytes.first() {
        Some(0xC2..=0xDF) => 2,
        Some(0xE0..=0xEF) => 3,
        Some(0xF0..=0xF4) => 4,
        _ => return false,
    };
    bytes.len() < width
}

/// Splits a chunked byte stream into complete text lines.
///
/// The unterminated tail stays in the line buffer until a later chunk
/// completes it.
#[derive(Debug, Default)]
pub struct LineFramer {
    decoder: Utf8StreamDecoder,
    line_buffer: String,
}

impl LineFramer {
    /// Returns the lines completed by `chunk`, without their terminators.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = self.decoder.decode(chunk);
        self.line_buffer.push_str(&text);

        let Some(last_newline) = self.line_buffer.rfind('\n') else {
            return Vec::new();
        };
        let tail = self.line_buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.line_buffer, tail);
        complete.lines().map(str::to_owned).collect()
    }

    /// Drains whatever was never terminated by a newline.
    pub fn finish(&mut self) -> String {
        let flushed = self.decoder.finish();
        self.line_buffer.push_str(&flushed);
        std::mem::take(&mut self.line_buffer)
    }
}

/// Strips the `data: ` tag from an event line.
pub fn data_payload(line: &str) -> Option<&str> {
    line.strip_prefix(DATA_TAG)
}
