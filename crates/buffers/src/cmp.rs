//! Element sequence comparison.

use std::cmp::Ordering;

use crate::Element;

/// Compares two sequences element by element.
///
/// NaN elements match each other.
///
/// # Example
///
/// ```
/// use binbuf_buffers::equal_elements;
///
/// assert!(equal_elements([1i32, 2, 3], [1, 2, 3]));
/// assert!(!equal_elements([1i32, 2], [1, 2, 3]));
/// assert!(equal_elements([f32::NAN], [f32::NAN]));
/// ```
pub fn equal_elements<T: Element>(
    a: impl IntoIterator<Item = T>,
    b: impl IntoIterator<Item = T>,
) -> bool {
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    loop {
        match (a.next(), b.next()) {
            (Some(x), Some(y)) if T::same(x, y) => continue,
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Compares two sequences lexicographically.
///
/// The first differing element decides; otherwise the shorter sequence
/// sorts first.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use binbuf_buffers::compare_elements;
///
/// assert_eq!(compare_elements([1u8, 2], [1, 2, 3]), Ordering::Less);
/// assert_eq!(compare_elements([1u8, 3], [1, 2, 3]), Ordering::Greater);
/// assert_eq!(compare_elements([1u8, 2, 3], [1, 2, 3]), Ordering::Equal);
/// ```
pub fn compare_elements<T: Element>(
    a: impl IntoIterator<Item = T>,
    b: impl IntoIterator<Item = T>,
) -> Ordering {
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    loop {
        match (a.next(), b.next()) {
            (Some(x), Some(y)) => match T::compare(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_elements() {
        assert!(equal_elements([1u8, 2, 3], [1, 2, 3]));
        assert!(!equal_elements([1u8, 2, 3], [1, 2, 4]));
        assert!(!equal_elements([1u8, 2], [1, 2, 3]));
        assert!(equal_elements(Vec::<u8>::new(), Vec::new()));
        assert!(equal_elements([0.0f64], [-0.0]));
    }

    #[test]
    fn test_compare_elements() {
        assert_eq!(compare_elements([1u8, 2, 3], [1, 2, 3]), Ordering::Equal);
        assert_eq!(compare_elements([1u8, 2, 3], [1, 3, 2]), Ordering::Less);
        assert_eq!(compare_elements([1u8, 3, 2], [1, 2, 3]), Ordering::Greater);
        assert_eq!(compare_elements([1u8, 2], [1, 2, 3]), Ordering::Less);
        assert_eq!(compare_elements([1u8, 2, 3], [1, 2]), Ordering::Greater);
    }

    #[test]
    fn test_compare_signed() {
        assert_eq!(compare_elements([-1i64], [1]), Ordering::Less);
        assert_eq!(compare_elements([i16::MIN], [i16::MAX]), Ordering::Less);
    }
}
