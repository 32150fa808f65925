//! Tests for window padding, cropping and sample normalization

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};
    use patchfill::InpaintError;
    use patchfill::spatial::padding::{
        PaddingInfo, crop_padding, denormalize_samples, mask_from_samples, normalize_samples,
        pad_for_window,
    };

    // Tests leading and trailing padding for odd and even windows
    // Verified by padding both sides with window / 2
    #[test]
    fn test_padding_amounts() {
        assert_eq!(
            PaddingInfo::for_window(5),
            PaddingInfo {
                leading: 2,
                trailing: 2
            }
        );
        assert_eq!(
            PaddingInfo::for_window(4),
            PaddingInfo {
                leading: 2,
                trailing: 1
            }
        );
        assert_eq!(
            PaddingInfo::for_window(1),
            PaddingInfo {
                leading: 0,
                trailing: 0
            }
        );
        assert_eq!(PaddingInfo::for_window(4).padded_dimensions((10, 6)), (13, 9));
    }

    // Tests that padding adds a zero, known ring around the input
    // Verified by placing the input at the origin of the padded buffer
    #[test]
    fn test_pad_for_window() {
        let image = array![
            [0.1, 0.2, 0.3, 0.4],
            [0.5, 0.6, 0.7, 0.8],
            [0.9, 1.0, 0.0, 0.25]
        ];
        let mask = array![
            [false, true, false, false],
            [false, false, false, false],
            [false, false, false, true]
        ];

        let (padded_image, padded_mask) = pad_for_window(&image, &mask, 3).expect("pad");
        assert_eq!(padded_image.dim(), (5, 6));
        assert_eq!(padded_mask.dim(), (5, 6));

        assert_eq!(padded_image.get([1, 1]), Some(&0.1));
        assert_eq!(padded_image.get([2, 2]), Some(&0.6));
        assert_eq!(padded_image.get([3, 4]), Some(&0.25));
        assert_eq!(padded_mask.get([1, 2]), Some(&true));
        assert_eq!(padded_mask.get([3, 4]), Some(&true));

        for c in 0..6 {
            assert_eq!(padded_image.get([0, c]), Some(&0.0));
            assert_eq!(padded_image.get([4, c]), Some(&0.0));
            assert_eq!(padded_mask.get([0, c]), Some(&false));
            assert_eq!(padded_mask.get([4, c]), Some(&false));
        }
        for r in 0..5 {
            assert_eq!(padded_image.get([r, 0]), Some(&0.0));
            assert_eq!(padded_image.get([r, 5]), Some(&0.0));
        }
        assert_eq!(padded_mask.iter().filter(|&&m| m).count(), 2);
    }

    // Tests that a wide mask survives padding and cropping unchanged
    // Verified by swapping the row and column offsets
    #[test]
    fn test_pad_then_crop_non_square() {
        let image = Array2::from_shape_fn((3, 7), |(r, c)| (r * 7 + c) as f64 / 21.0);
        let mask = Array2::from_shape_fn((3, 7), |(r, c)| (r + 2 * c) % 3 == 0);

        let (padded_image, padded_mask) = pad_for_window(&image, &mask, 3).expect("pad");
        assert_eq!(padded_mask.dim(), (5, 9));

        assert_eq!(crop_padding(&padded_image, 3, (3, 7)).expect("crop"), image);
        assert_eq!(crop_padding(&padded_mask, 3, (3, 7)).expect("crop"), mask);
    }

    // Tests that cropping recovers exactly the unpadded region
    // Verified by cropping from the trailing padding offset
    #[test]
    fn test_crop_recovers_input() {
        let image = Array2::from_shape_fn((4, 6), |(r, c)| (r * 6 + c) as f64 / 24.0);
        let mask = Array2::from_elem((4, 6), false);

        let (padded, _) = pad_for_window(&image, &mask, 4).expect("pad");
        assert_eq!(padded.dim(), (7, 9));

        let cropped = crop_padding(&padded, 4, (4, 6)).expect("crop");
        assert_eq!(cropped, image);
    }

    // Tests cropping a buffer whose shape doesn't match the window padding
    // Verified by removing the shape check
    #[test]
    fn test_crop_rejects_wrong_shape() {
        let padded = Array2::<f64>::zeros((6, 6));
        assert!(matches!(
            crop_padding(&padded, 3, (5, 5)),
            Err(InpaintError::InvalidSourceData { .. })
        ));
    }

    // Tests parameter validation before padding
    // Verified by removing each validation branch in turn
    #[test]
    fn test_pad_rejects_invalid_input() {
        let image = Array2::<f64>::zeros((3, 3));
        let mask = Array2::from_elem((3, 3), false);

        assert!(pad_for_window(&image, &mask, 0).is_err());
        assert!(pad_for_window(&image, &mask, 4).is_err());

        let short_mask = Array2::from_elem((3, 2), false);
        assert!(matches!(
            pad_for_window(&image, &short_mask, 3),
            Err(InpaintError::ShapeMismatch { .. })
        ));
    }

    // Tests 8-bit sample conversion in both directions
    // Verified by truncating instead of rounding on the way back
    #[test]
    fn test_sample_normalization() {
        let samples: Array2<u8> = array![[0, 51], [255, 128]];
        let normalized = normalize_samples(&samples);
        let at = |position: [usize; 2]| normalized.get(position).copied().unwrap_or(f64::NAN);
        assert!((at([0, 1]) - 0.2).abs() < 1e-12);
        assert!((at([1, 0]) - 1.0).abs() < f64::EPSILON);
        assert!(at([0, 0]).abs() < f64::EPSILON);

        let intensities = array![[0.2, 1.5], [-0.3, 0.999]];
        let restored: Array2<u8> = denormalize_samples(&intensities);
        assert_eq!(restored, array![[51, 255], [0, 255]]);
    }

    // Tests that any non-zero mask sample marks a pixel unknown
    // Verified by thresholding at the midpoint instead
    #[test]
    fn test_mask_from_samples() {
        let samples: Array2<u8> = array![[0, 1], [255, 0]];
        assert_eq!(
            mask_from_samples(&samples),
            array![[false, true], [true, false]]
        );
    }
}
