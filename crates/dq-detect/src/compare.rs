//! Boundary comparisons honoring inclusivity.

use dq_model::Inclusive;

/// Whether `value` lies outside `[lower, upper]` under `inclusive`.
///
/// An absent bound never flags anything on its side.
pub fn is_outside<T: PartialOrd>(
    value: &T,
    lower: Option<&T>,
    upper: Option<&T>,
    inclusive: Inclusive,
) -> bool {
    let below = lower.is_some_and(|lower| {
        if inclusive.lower_closed() {
            value < lower
        } else {
            value <= lower
        }
    });
    let above = upper.is_some_and(|upper| {
        if inclusive.upper_closed() {
            value > upper
        } else {
            value >= upper
        }
    });
    below || above
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_both_accepts_boundaries() {
        for v in [0.0, 10.0, 5.0] {
            assert!(!is_outside(&v, Some(&0.0), Some(&10.0), Inclusive::Both));
        }
        assert!(is_outside(&-0.1, Some(&0.0), Some(&10.0), Inclusive::Both));
        assert!(is_outside(&10.1, Some(&0.0), Some(&10.0), Inclusive::Both));
    }

    #[test]
    fn test_inclusive_neither_rejects_boundaries() {
        assert!(is_outside(&0.0, Some(&0.0), Some(&10.0), Inclusive::Neither));
        assert!(is_outside(&10.0, Some(&0.0), Some(&10.0), Inclusive::Neither));
        assert!(!is_outside(&5.0, Some(&0.0), Some(&10.0), Inclusive::Neither));
    }

    #[test]
    fn test_half_open() {
        assert!(!is_outside(&0.0, Some(&0.0), Some(&10.0), Inclusive::Left));
        assert!(is_outside(&10.0, Some(&0.0), Some(&10.0), Inclusive::Left));
        assert!(is_outside(&0.0, Some(&0.0), Some(&10.0), Inclusive::Right));
        assert!(!is_outside(&10.0, Some(&0.0), Some(&10.0), Inclusive::Right));
    }

    #[test]
    fn test_unbounded_side() {
        assert!(!is_outside(&1e300, Some(&0.0), None, Inclusive::Both));
        assert!(!is_outside(&-1e300, None, None, Inclusive::Neither));
    }
}
