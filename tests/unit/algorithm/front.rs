//! Tests for fill-front detection and incremental refresh

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use patchfill::algorithm::front::{FrontTracker, is_front_pixel};
    use patchfill::spatial::state::ImageState;

    /// 7x7 flat buffer, window 3, with a square unknown block
    fn block_state(rows: std::ops::RangeInclusive<usize>, cols: std::ops::RangeInclusive<usize>) -> ImageState {
        let image = Array2::from_elem((7, 7), 0.5);
        let mask = Array2::from_shape_fn((7, 7), |(r, c)| rows.contains(&r) && cols.contains(&c));
        ImageState::new(image, mask, 3).expect("valid state")
    }

    // Tests that the front is the boundary of an unknown block in row-major order
    // Verified by using 8-connectivity for the known-neighbour test
    #[test]
    fn test_block_boundary() {
        let state = block_state(2..=4, 2..=4);
        let front = FrontTracker::build(&state);

        assert_eq!(
            front.current_front(),
            vec![
                [2, 2],
                [2, 3],
                [2, 4],
                [3, 2],
                [3, 4],
                [4, 2],
                [4, 3],
                [4, 4]
            ]
        );
        assert_eq!(front.len(), 8);
        assert!(!front.contains([3, 3]));
        assert!(front.contains([4, 3]));
        assert!(!front.contains([10, 10]));
    }

    // Tests a lone unknown pixel and a fully known buffer
    // Verified by requiring two known neighbours
    #[test]
    fn test_single_pixel_and_empty() {
        let single = block_state(3..=3, 3..=3);
        assert_eq!(FrontTracker::build(&single).current_front(), vec![[3, 3]]);

        let image = Array2::from_elem((5, 5), 0.5);
        let mask = Array2::from_elem((5, 5), false);
        let known = ImageState::new(image, mask, 3).expect("valid state");
        let front = FrontTracker::build(&known);
        assert!(front.is_empty());
        assert_eq!(front.len(), 0);
    }

    // Tests the per-pixel predicate on known and interior unknown pixels
    // Verified by returning true for every unknown pixel
    #[test]
    fn test_is_front_pixel() {
        let state = block_state(2..=4, 2..=4);
        assert!(is_front_pixel(&state, [2, 3]));
        assert!(!is_front_pixel(&state, [3, 3]));
        assert!(!is_front_pixel(&state, [1, 3]));
        assert!(!is_front_pixel(&state, [20, 3]));
    }

    // Tests that refreshing an unchanged region keeps membership
    // Verified by clearing bits outside the refreshed region
    #[test]
    fn test_refresh_unchanged_region() {
        let state = block_state(2..=4, 2..=4);
        let mut front = FrontTracker::build(&state);
        let before = front.current_front();

        front.refresh_region(&state, 1..4, 1..9);
        assert_eq!(front.current_front(), before);
    }
}
