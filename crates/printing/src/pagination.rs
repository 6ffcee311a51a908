//! Splits the check list between the two faces of the slip.
//! 將支票清單分配到存款單的正反兩面。
//!
//! The same rule drives the interactive preview and the print job.

/// Number of check rows printed on the front face.
pub const FRONT_ROWS: usize = 2;

/// Rows `0..2`, printed on the front.
pub fn checks_for_front<T>(checks: &[T]) -> &[T] {
    &checks[..checks.len().min(FRONT_ROWS)]
}

/// Rows `2..`, printed on the back. Indices stay global: the first back row is row 2.
pub fn checks_for_back<T>(checks: &[T]) -> &[T] {
    &checks[checks.len().min(FRONT_ROWS)..]
}

/// Whether the front carries a "total from other side" line.
pub fn needs_back_subtotal_on_front<T>(checks: &[T]) -> bool {
    checks.len() > FRONT_ROWS
}

/// Whether a print job needs a second pass for the back face.
pub fn needs_back_page<T>(checks: &[T]) -> bool {
    needs_back_subtotal_on_front(checks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lengths_follow_row_count() {
        for n in 0..8usize {
            let checks: Vec<usize> = (0..n).collect();
            let front = checks_for_front(&checks);
            let back = checks_for_back(&checks);
            assert_eq!(front.len(), n.min(2));
            assert_eq!(back.len(), n.saturating_sub(2));

            let mut joined = front.to_vec();
            joined.extend_from_slice(back);
            assert_eq!(joined, checks);
        }
    }

    #[test]
    fn subtotal_only_when_more_than_two_checks() {
        let gates: Vec<bool> = (0..4)
            .map(|n| needs_back_subtotal_on_front(&vec![0u8; n]))
            .collect();
        assert_eq!(gates, vec![false, false, false, true]);
    }
}
