use std::fmt::{Display, Formatter};

/// The highest sequence number; the sequence space is `[0, MAX_SEQ]`.
pub const MAX_SEQ: u8 = 7;

/// Size of the circular sequence space.
pub const SEQ_SPACE: u8 = MAX_SEQ + 1;

/// Number of frames that may be outstanding on the sender, and of sequence numbers the
/// receiver will buffer out of order. This is also the size of both buffer pools.
pub const WINDOW_SIZE: usize = (SEQ_SPACE / 2) as usize;

// A window wider than half the sequence space would make an old duplicate indistinguishable
//  from a new frame sharing its buffer slot.
const _: () = assert!(WINDOW_SIZE <= (SEQ_SPACE as usize) / 2);

/// A sequence number in the circular space `[0, SEQ_SPACE)`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SeqNr(u8);

impl Display for SeqNr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SeqNr {
    pub const ZERO: SeqNr = SeqNr(0);

    pub fn from_raw(value: u8) -> SeqNr {
        SeqNr(value % SEQ_SPACE)
    }

    pub fn to_raw(&self) -> u8 {
        self.0
    }

    /// The next sequence number on the circle, wrapping to 0 after `MAX_SEQ`.
    pub fn next(&self) -> SeqNr {
        SeqNr((self.0 + 1) % SEQ_SPACE)
    }

    /// The previous sequence number on the circle. A frame expecting `self` next
    ///  acknowledges everything up to and including this value.
    pub fn prev(&self) -> SeqNr {
        SeqNr((self.0 + MAX_SEQ) % SEQ_SPACE)
    }

    /// Index of the buffer slot this sequence number occupies.
    pub fn slot(&self) -> usize {
        (self.0 as usize) % WINDOW_SIZE
    }
}

/// True iff `b` lies in the circular half-open interval `[a, c)`.
///
/// The three disjuncts cover all rotations of the circle: no wrap, wrap between `b` and `c`,
///  and wrap between `a` and `b`.
pub fn between(a: SeqNr, b: SeqNr, c: SeqNr) -> bool {
    (a.0 <= b.0 && b.0 < c.0) || (c.0 < a.0 && a.0 <= b.0) || (b.0 < c.0 && c.0 < a.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case::zero(0, 1)]
    #[case::middle(3, 4)]
    #[case::wrap(7, 0)]
    fn test_next(#[case] from: u8, #[case] expected: u8) {
        assert_eq!(SeqNr::from_raw(from).next(), SeqNr::from_raw(expected));
    }

    #[rstest]
    #[case::zero(0, 7)]
    #[case::middle(4, 3)]
    #[case::one(1, 0)]
    fn test_prev(#[case] from: u8, #[case] expected: u8) {
        assert_eq!(SeqNr::from_raw(from).prev(), SeqNr::from_raw(expected));
    }

    #[rstest]
    #[case::low(0, 0)]
    #[case::first_half(3, 3)]
    #[case::second_half(4, 0)]
    #[case::high(7, 3)]
    fn test_slot(#[case] seq: u8, #[case] expected: usize) {
        assert_eq!(SeqNr::from_raw(seq).slot(), expected);
    }

    #[rstest]
    // no wrap: [2, 6)
    #[case::plain_lower_edge(2, 2, 6, true)]
    #[case::plain_inside(2, 4, 6, true)]
    #[case::plain_upper_edge(2, 6, 6, false)]
    #[case::plain_below(2, 1, 6, false)]
    #[case::plain_above(2, 7, 6, false)]
    // wrap between b and c: [6, 2)
    #[case::wrap_high_part(6, 7, 2, true)]
    #[case::wrap_lower_edge(6, 6, 2, true)]
    #[case::wrap_low_part(6, 1, 2, true)]
    #[case::wrap_upper_edge(6, 2, 2, false)]
    #[case::wrap_outside(6, 4, 2, false)]
    // empty interval
    #[case::empty(3, 3, 3, false)]
    #[case::empty_other(3, 5, 3, false)]
    // full-width window [5, 1)
    #[case::window_start(5, 5, 1, true)]
    #[case::window_wrap(5, 0, 1, true)]
    #[case::window_end(5, 1, 1, false)]
    fn test_between(#[case] a: u8, #[case] b: u8, #[case] c: u8, #[case] expected: bool) {
        assert_eq!(
            between(SeqNr::from_raw(a), SeqNr::from_raw(b), SeqNr::from_raw(c)),
            expected
        );
    }
}
