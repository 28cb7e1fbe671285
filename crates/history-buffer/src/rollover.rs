//! Rollover Arithmetic
//!
//! Modular add/subtract over unsigned integers with an inclusive upper
//! `limit`. Every slot index and every cursor in this crate is advanced
//! through these helpers, never through raw `%`.

use std::fmt::Debug;

/// Unsigned integer types that support rollover arithmetic
pub trait Rollover: Copy + Ord + Debug {
    /// Zero value
    const ZERO: Self;
    /// One value
    const ONE: Self;
    /// Largest representable value, the default limit
    const MAX: Self;

    /// `(self + rhs) mod (limit + 1)`
    fn add_rollover(self, rhs: Self, limit: Self) -> Self;

    /// `(self - rhs) mod (limit + 1)`
    fn sub_rollover(self, rhs: Self, limit: Self) -> Self;
}

macro_rules! impl_rollover {
    ($($t:ty),* $(,)?) => {
        $(
            impl Rollover for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MAX: Self = <$t>::MAX;

                #[inline]
                fn add_rollover(self, rhs: Self, limit: Self) -> Self {
                    debug_assert!(self <= limit, "operand {} exceeds limit {}", self, limit);
                    debug_assert!(rhs <= limit, "operand {} exceeds limit {}", rhs, limit);

                    let headroom = limit - self;
                    if headroom < rhs {
                        rhs - headroom - 1
                    } else {
                        self + rhs
                    }
                }

                #[inline]
                fn sub_rollover(self, rhs: Self, limit: Self) -> Self {
                    debug_assert!(self <= limit, "operand {} exceeds limit {}", self, limit);
                    debug_assert!(rhs <= limit, "operand {} exceeds limit {}", rhs, limit);

                    if rhs > self {
                        (limit - rhs) + self + 1
                    } else {
                        self - rhs
                    }
                }
            }
        )*
    };
}

impl_rollover!(u8, u16, u32, u64, u128, usize);

/// Add `b` to `a`, wrapping past `limit` back to zero
#[inline]
pub fn add_rollover<T: Rollover>(a: T, b: T, limit: T) -> T {
    a.add_rollover(b, limit)
}

/// Subtract `b` from `a`, wrapping below zero back to `limit`
#[inline]
pub fn sub_rollover<T: Rollover>(a: T, b: T, limit: T) -> T {
    a.sub_rollover(b, limit)
}

/// [`add_rollover`] with the type maximum as limit
#[inline]
pub fn add_rollover_max<T: Rollover>(a: T, b: T) -> T {
    a.add_rollover(b, T::MAX)
}

/// [`sub_rollover`] with the type maximum as limit
#[inline]
pub fn sub_rollover_max<T: Rollover>(a: T, b: T) -> T {
    a.sub_rollover(b, T::MAX)
}

/// Advance `a` by one, wrapping past `limit`
///
/// Unlike `add_rollover(a, 1, limit)` this also accepts `limit == 0`.
#[inline]
pub fn increment<T: Rollover>(a: &mut T, limit: T) {
    debug_assert!(*a <= limit, "operand {:?} exceeds limit {:?}", a, limit);
    *a = if *a >= limit {
        T::ZERO
    } else {
        a.add_rollover(T::ONE, limit)
    };
}

/// Step `a` back by one, wrapping below zero
///
/// Unlike `sub_rollover(a, 1, limit)` this also accepts `limit == 0`.
#[inline]
pub fn decrement<T: Rollover>(a: &mut T, limit: T) {
    debug_assert!(*a <= limit, "operand {:?} exceeds limit {:?}", a, limit);
    *a = if *a == T::ZERO {
        limit
    } else {
        a.sub_rollover(T::ONE, limit)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_wraps_at_limit() {
        assert_eq!(add_rollover(3usize, 1, 4), 4);
        assert_eq!(add_rollover(4usize, 1, 4), 0);
        assert_eq!(add_rollover(4usize, 4, 4), 3);
        assert_eq!(add_rollover_max(u8::MAX, 1u8), 0);
        assert_eq!(add_rollover_max(u64::MAX - 1, 5u64), 3);
    }

    #[test]
    fn test_sub_wraps_below_zero() {
        assert_eq!(sub_rollover(0usize, 1, 4), 4);
        assert_eq!(sub_rollover(2usize, 4, 4), 3);
        assert_eq!(sub_rollover(4usize, 4, 4), 0);
        assert_eq!(sub_rollover_max(0u8, 1u8), u8::MAX);
        assert_eq!(sub_rollover_max(3u64, u64::MAX), 4);
    }

    #[test]
    fn test_increment_decrement() {
        let mut pos = 0usize;
        for expected in [1, 2, 0, 1] {
            increment(&mut pos, 2);
            assert_eq!(pos, expected);
        }

        decrement(&mut pos, 2);
        decrement(&mut pos, 2);
        assert_eq!(pos, 2);
    }

    #[test]
    fn test_zero_limit_is_identity() {
        assert_eq!(add_rollover(0usize, 0, 0), 0);
        let mut pos = 0usize;
        increment(&mut pos, 0);
        assert_eq!(pos, 0);
        decrement(&mut pos, 0);
        assert_eq!(pos, 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "exceeds limit")]
    fn test_operand_above_limit_panics_in_debug() {
        add_rollover(5usize, 1, 4);
    }

    /// Operands biased towards `0` and `limit`
    fn operand(limit: u64) -> impl Strategy<Value = u64> {
        prop_oneof![
            Just(0u64),
            Just(1u64.min(limit)),
            Just(limit),
            Just(limit.saturating_sub(1)),
            0..=limit,
        ]
    }

    fn limit_and_operands() -> impl Strategy<Value = (u64, u64, u64)> {
        prop_oneof![
            Just(u64::MAX),
            Just(0u64),
            Just(1u64),
            1u64..64,
            any::<u64>(),
        ]
        .prop_flat_map(|limit| (Just(limit), operand(limit), operand(limit)))
    }

    proptest! {
        #[test]
        fn prop_sub_then_add_is_identity((limit, a, b) in limit_and_operands()) {
            prop_assert_eq!(add_rollover(sub_rollover(a, b, limit), b, limit), a);
        }

        #[test]
        fn prop_add_then_sub_is_identity((limit, a, b) in limit_and_operands()) {
            prop_assert_eq!(sub_rollover(add_rollover(a, b, limit), b, limit), a);
        }

        #[test]
        fn prop_result_stays_within_limit((limit, a, b) in limit_and_operands()) {
            prop_assert!(add_rollover(a, b, limit) <= limit);
            prop_assert!(sub_rollover(a, b, limit) <= limit);
        }

        #[test]
        fn prop_matches_modular_reference(limit in 0u32..1000, a in 0u32..1000, b in 0u32..1000) {
            let (a, b) = (a.min(limit), b.min(limit));
            let modulus = u64::from(limit) + 1;
            let expected_add = (u64::from(a) + u64::from(b)) % modulus;
            let expected_sub = (u64::from(a) + modulus - u64::from(b)) % modulus;
            prop_assert_eq!(u64::from(add_rollover(a, b, limit)), expected_add);
            prop_assert_eq!(u64::from(sub_rollover(a, b, limit)), expected_sub);
        }
    }
}
