//! Chunk-to-segment splitting.
//!
//! Turns raw body chunks into trimmed, non-empty line segments. Two modes:
//!
//! - **Independent** (default): every chunk is split on its own. A line that
//!   spans a chunk boundary is delivered as two segments, split exactly at
//!   the boundary. Downstream handlers must tolerate this.
//! - **Reassembly**: an incomplete trailing fragment is carried over and
//!   prepended to the next chunk, giving strict line framing. The carry is at
//!   most one partial line; [`SegmentSplitter::finish`] flushes whatever
//!   remains at end of stream.
//!
//! Chunks are decoded lossily, so invalid UTF-8 degrades to replacement
//! characters rather than failing the stream.

/// Incremental splitter from body chunks to line segments.
#[derive(Debug, Default)]
pub(crate) struct SegmentSplitter {
    reassemble: bool,
    carry: String,
}

impl SegmentSplitter {
    pub(crate) fn new(reassemble: bool) -> Self {
        SegmentSplitter {
            reassemble,
            carry: String::new(),
        }
    }

    /// Split one chunk into trimmed, non-empty segments, in order.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = String::from_utf8_lossy(chunk);

        if !self.reassemble {
            return split_trimmed(&text);
        }

        let mut data = std::mem::take(&mut self.carry);
        data.push_str(&text);

        match data.rfind('\n') {
            Some(pos) => {
                self.carry = data[pos + 1..].to_string();
                split_trimmed(&data[..pos])
            }
            None => {
                self.carry = data;
                Vec::new()
            }
        }
    }

    /// Flush the carried fragment at end of stream, if any survives trimming.
    pub(crate) fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.carry);
        let trimmed = rest.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn split_trimmed(data: &str) -> Vec<String> {
    data.split('\n')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
