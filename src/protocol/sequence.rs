//! Rolling request sequence counter.

/// One-byte sequence counter pairing requests with their expected replies.
///
/// Values stay in `1..=255`; zero is never issued. The counter starts at 1
/// and advances once per encoded request, so the expected sequence number of
/// a reply is whatever [`next`](SequenceNumber::next) returned last.
#[derive(Debug, Clone)]
pub struct SequenceNumber {
    current: u8,
}

impl SequenceNumber {
    /// Create a counter in its initial state.
    pub fn new() -> Self {
        Self { current: 1 }
    }

    /// Advance to the next sequence number and return it.
    ///
    /// Wraps from 255 back to 1, skipping 0.
    pub fn next(&mut self) -> u8 {
        self.current = if self.current == u8::MAX {
            1
        } else {
            self.current + 1
        };
        self.current
    }

    /// The most recently issued value (the value a reply must echo).
    #[inline]
    pub fn current(&self) -> u8 {
        self.current
    }
}

impl Default for SequenceNumber {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_one() {
        assert_eq!(SequenceNumber::new().current(), 1);
    }

    #[test]
    fn test_first_advance_returns_two() {
        let mut seq = SequenceNumber::new();
        assert_eq!(seq.next(), 2);
        assert_eq!(seq.current(), 2);
    }

    #[test]
    fn test_wraparound_after_255_calls() {
        let mut seq = SequenceNumber::new();
        for _ in 0..254 {
            seq.next();
        }
        assert_eq!(seq.current(), 255);
        assert_eq!(seq.next(), 1);
    }

    #[test]
    fn test_never_zero_never_above_255() {
        let mut seq = SequenceNumber::new();
        for _ in 0..600 {
            let value = seq.next();
            assert!(value >= 1);
        }
    }

    #[test]
    fn test_advance_does_not_skip_values() {
        let mut seq = SequenceNumber::new();
        for expected in 2..=255u8 {
            assert_eq!(seq.next(), expected);
        }
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
    }
}
