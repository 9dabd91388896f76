//! Line Editor

/// Default line buffer size
pub const DEFAULT_LINE_CAPACITY: usize = 32;

/// Outcome of feeding one byte to the line editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Character appended (to be echoed)
    Accepted(u8),
    /// Character dropped because the line is full
    Discarded,
    /// Terminator on an empty line
    Empty,
    /// Terminator completing a line
    Line(String),
}

/// Fixed-size line accumulator
///
/// Holds at most `capacity - 1` characters; anything typed past that is
/// discarded until the next `\r` or `\n`, and the truncated line is still
/// dispatched.
#[derive(Debug)]
pub struct LineBuffer {
    buf: Vec<u8>,
    capacity: usize,
}

impl LineBuffer {
    /// Create a line buffer of `capacity` bytes (minimum 2)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Feed one received byte
    pub fn push(&mut self, byte: u8) -> LineEvent {
        if byte == b'\r' || byte == b'\n' {
            if self.buf.is_empty() {
                return LineEvent::Empty;
            }
            let line = String::from_utf8_lossy(&self.buf).into_owned();
            self.buf.clear();
            return LineEvent::Line(line);
        }

        if self.buf.len() < self.capacity - 1 {
            self.buf.push(byte);
            LineEvent::Accepted(byte)
        } else {
            LineEvent::Discarded
        }
    }

    /// Get the number of characters accumulated
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if no characters are accumulated
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed(buffer: &mut LineBuffer, input: &[u8]) -> Vec<LineEvent> {
        input.iter().map(|b| buffer.push(*b)).collect()
    }

    #[test]
    fn test_line_completed_on_cr_or_lf() {
        let mut buffer = LineBuffer::default();
        let events = feed(&mut buffer, b"h\r");
        assert_eq!(events, vec![LineEvent::Accepted(b'h'), LineEvent::Line("h".into())]);

        let events = feed(&mut buffer, b"ok\n");
        assert_eq!(events.last(), Some(&LineEvent::Line("ok".into())));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_crlf_yields_line_then_empty() {
        let mut buffer = LineBuffer::default();
        let events = feed(&mut buffer, b"x\r\n");
        assert_eq!(events[1], LineEvent::Line("x".into()));
        assert_eq!(events[2], LineEvent::Empty);
    }

    #[test]
    fn test_overflow_truncates_line() {
        let mut buffer = LineBuffer::new(8);
        let events = feed(&mut buffer, b"abcdefghijk\r");

        let discarded = events.iter().filter(|e| **e == LineEvent::Discarded).count();
        assert_eq!(discarded, 4);
        assert_eq!(events.last(), Some(&LineEvent::Line("abcdefg".into())));

        // Next line starts clean
        assert_eq!(feed(&mut buffer, b"z\r")[1], LineEvent::Line("z".into()));
    }

    proptest! {
        #[test]
        fn prop_length_bounded_and_lines_truncated(
            capacity in 2usize..40,
            input in proptest::collection::vec(any::<u8>(), 0..200),
        ) {
            let mut buffer = LineBuffer::new(capacity);
            for byte in input {
                if let LineEvent::Line(line) = buffer.push(byte) {
                    prop_assert!(line.chars().count() <= capacity - 1);
                }
                prop_assert!(buffer.len() <= capacity - 1);
            }
        }
    }
}
