//! Viewport window provider — translate scroll state into a [`ListWindow`].
//!
//! The row builder consumes the window as an opaque value object; this
//! module owns the arithmetic.  Row positions are 1-based and the window
//! bounds are inclusive, so a viewport showing `height` rows starting at
//! scroll `offset` covers positions `offset+1 ..= offset+height`, extended
//! by `overscan` rows on both sides to keep small scroll steps from
//! constantly re-materialising edge rows.

use crate::core::render::ListWindow;

/// Compute the window for one frame.
///
/// `offset` is the number of rows scrolled past above the viewport,
/// `height` the viewport row count, `total_rows` the full list length.
/// The paddings account for every hidden row, so
/// `start_padding + (end - start + 1) + end_padding == total_rows` whenever
/// the list is non-empty.
pub fn visible_window(
    offset: usize,
    height: usize,
    overscan: usize,
    total_rows: usize,
) -> ListWindow {
    let total = total_rows.max(1);
    let first = (offset + 1).min(total);
    let last = (offset + height.max(1)).min(total);

    let start = first.saturating_sub(overscan).max(1);
    let end = (last + overscan).min(total);

    ListWindow {
        start,
        end,
        start_padding: start - 1,
        end_padding: total - end,
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_covers_the_viewport_rows() {
        let w = visible_window(10, 5, 0, 100);
        assert_eq!((w.start, w.end), (11, 15));
        assert!(w.contains(11));
        assert!(w.contains(15));
        assert!(!w.contains(10));
        assert!(!w.contains(16));
    }

    #[test]
    fn overscan_extends_both_edges() {
        let w = visible_window(10, 5, 3, 100);
        assert_eq!((w.start, w.end), (8, 18));
    }

    #[test]
    fn clamped_at_the_top_of_the_list() {
        let w = visible_window(0, 5, 3, 100);
        assert_eq!((w.start, w.end), (1, 8));
        assert_eq!(w.start_padding, 0);
    }

    #[test]
    fn clamped_at_the_bottom_of_the_list() {
        let w = visible_window(96, 5, 3, 100);
        assert_eq!(w.end, 100);
        assert_eq!(w.end_padding, 0);
    }

    #[test]
    fn paddings_account_for_every_hidden_row() {
        for offset in 0..40 {
            for overscan in [0, 2, 5] {
                let w = visible_window(offset, 7, overscan, 40);
                assert_eq!(
                    w.start_padding + (w.end - w.start + 1) + w.end_padding,
                    40,
                    "offset={offset} overscan={overscan}"
                );
            }
        }
    }

    #[test]
    fn short_list_never_underflows() {
        let w = visible_window(0, 50, 5, 3);
        assert_eq!((w.start, w.end), (1, 3));
        assert_eq!(w.start_padding, 0);
        assert_eq!(w.end_padding, 0);

        let empty = visible_window(0, 50, 5, 0);
        assert_eq!((empty.start, empty.end), (1, 1));
    }
}
