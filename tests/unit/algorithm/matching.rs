//! Tests for masked SSD, candidate enumeration and best-match search

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use patchfill::InpaintError;
    use patchfill::algorithm::matching::{
        candidate_centers, find_best_match, known_template, masked_ssd, validate_threshold,
    };
    use patchfill::math::integral::UnknownIntegral;
    use patchfill::spatial::state::ImageState;

    /// 9x9 ramp with distinct dyadic values, window 3, one unknown pixel at the centre
    fn ramp_state() -> ImageState {
        let image = Array2::from_shape_fn((9, 9), |(r, c)| (r * 9 + c) as f64 / 128.0);
        let mask = Array2::from_shape_fn((9, 9), |(r, c)| (r, c) == (4, 4));
        ImageState::new(image, mask, 3).expect("valid state")
    }

    // Tests threshold validation
    // Verified by accepting zero as a threshold
    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold(0.2).is_ok());
        assert!(validate_threshold(0.0).is_err());
        assert!(validate_threshold(-1.0).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
        assert!(validate_threshold(f64::INFINITY).is_err());
    }

    // Tests that unknown target pixels are left out of the template
    // Verified by including unknown pixels with their stored value
    #[test]
    fn test_known_template_skips_unknown() {
        let state = ramp_state();
        let template = known_template(&state, &state.patch([4, 4]));
        assert_eq!(template.len(), 8);
        assert!(template.iter().all(|&(position, _)| position != [4, 4]));
    }

    // Tests masked SSD for a constant offset between patches
    // Verified by also summing the unknown centre pixel
    #[test]
    fn test_masked_ssd() {
        let state = ramp_state();
        let step: f64 = 1.0 / 128.0;

        // Shifting two columns changes every known pixel by two steps
        let ssd = masked_ssd(&state, [4, 4], [4, 2]);
        assert!((ssd - 8.0 * (2.0 * step).powi(2)).abs() < 1e-15);

        // Shifting one row changes every pixel by nine steps
        let ssd = masked_ssd(&state, [4, 4], [5, 1]);
        let offset = 9.0 * step - 3.0 * step;
        assert!((ssd - 8.0 * offset.powi(2)).abs() < 1e-15);
    }

    // Tests that candidates are interior, fully known and row-major
    // Verified by skipping the integral image check
    #[test]
    fn test_candidate_centers() {
        let state = ramp_state();
        let integral = UnknownIntegral::build(state.mask());
        let centers = candidate_centers(&state, &integral);

        // 7x7 interior centres minus the 3x3 whose footprint covers (4, 4)
        assert_eq!(centers.len(), 40);
        assert_eq!(centers.first(), Some(&[1, 1]));
        assert_eq!(centers.last(), Some(&[7, 7]));
        assert!(!centers.contains(&[3, 3]));
        assert!(centers.contains(&[3, 2]));
        assert!(centers.windows(2).all(|pair| match pair {
            [a, b] => a < b,
            _ => false,
        }));
    }

    // Tests the global minimum with ties broken by scan order
    // Verified by replacing the strict comparison with a non-strict one
    #[test]
    fn test_global_minimum_first_tie() {
        let state = ramp_state();
        let matched = find_best_match(&state, [4, 4], 1e-6).expect("candidates exist");

        // (4, 2) and (4, 6) tie; (4, 2) comes first
        assert_eq!(matched.source, [4, 2]);
        assert!(!matched.early_accepted);
        assert!((matched.ssd - 0.001_953_125).abs() < 1e-15);
        assert_eq!(matched.candidates_scanned, 20);
    }

    // Tests early acceptance of the first candidate under the threshold
    // Verified by continuing the scan after an accepted candidate
    #[test]
    fn test_early_acceptance() {
        let state = ramp_state();
        let matched = find_best_match(&state, [4, 4], 0.002).expect("candidates exist");
        assert_eq!(matched.source, [4, 2]);
        assert!(matched.early_accepted);
        assert_eq!(matched.candidates_scanned, 20);

        // On a flat image the very first candidate is a perfect match
        let image = Array2::from_elem((9, 9), 0.5);
        let mask = Array2::from_shape_fn((9, 9), |(r, c)| (r, c) == (4, 4));
        let flat = ImageState::new(image, mask, 3).expect("valid state");
        let matched = find_best_match(&flat, [4, 4], 0.2).expect("candidates exist");
        assert_eq!(matched.source, [1, 1]);
        assert_eq!(matched.candidates_scanned, 1);
        assert!(matched.ssd.abs() < f64::EPSILON);
    }

    // Tests exhaustion when every footprint touches the unknown region
    // Verified by returning the target itself as a fallback source
    #[test]
    fn test_search_exhausted() {
        let image = Array2::from_elem((7, 7), 0.5);
        let mask = Array2::from_shape_fn((7, 7), |(r, c)| (2..=4).contains(&r) && (2..=4).contains(&c));
        let state = ImageState::new(image, mask, 3).expect("valid state");

        let result = find_best_match(&state, [2, 2], 0.2);
        assert!(matches!(
            result,
            Err(InpaintError::SearchExhausted {
                target: [2, 2],
                dimensions: (7, 7),
                ..
            })
        ));
    }

    // Tests that an invalid threshold is rejected before searching
    // Verified by validating only after the candidate scan
    #[test]
    fn test_rejects_invalid_threshold() {
        let state = ramp_state();
        assert!(matches!(
            find_best_match(&state, [4, 4], 0.0),
            Err(InpaintError::InvalidParameter {
                parameter: "max_thresh",
                ..
            })
        ));
    }
}
