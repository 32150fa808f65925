//! Tests for the crate error type: messages, sources and attached context

#[cfg(test)]
mod tests {
    use patchfill::InpaintError;
    use patchfill::io::error::{
        ErrorContext, WithContext, computation_error, invalid_parameter, invalid_source,
    };
    use std::error::Error;

    // Tests I/O failures expose their cause and input errors do not
    // Verified by returning None for every variant
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error = InpaintError::FileSystem {
            path: "/tmp/test.png".into(),
            operation: "read",
            source: io_error,
        };
        assert!(error.source().is_some());

        let leaf = invalid_source(&"empty");
        assert!(leaf.source().is_none());
    }

    // Tests SearchExhausted error formatting
    // Verified by dropping the iteration from the message
    #[test]
    fn test_search_exhausted_message() {
        let error = InpaintError::SearchExhausted {
            iteration: 42,
            target: [3, 7],
            dimensions: (10, 20),
        };
        let message = error.to_string();
        assert!(message.contains("42"));
        assert!(message.contains("(3, 7)"));
        assert!(message.contains("10x20"));
    }

    // Tests helper constructors and their messages
    // Verified by swapping the parameter name and value in the message
    #[test]
    fn test_helper_constructors() {
        let error = invalid_parameter("window", &0, &"must be positive");
        assert!(matches!(
            error,
            InpaintError::InvalidParameter {
                parameter: "window",
                ..
            }
        ));
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'window' = '0': must be positive"
        );

        let error = computation_error("matching", &"nan distance");
        assert_eq!(error.to_string(), "Computation error in matching: nan distance");

        let error = InpaintError::ShapeMismatch {
            image: (4, 5),
            mask: (5, 4),
        };
        assert_eq!(error.to_string(), "Image is 4x5 but mask is 5x4");
    }

    // Tests that context patches iteration and target into search errors
    // Verified by ignoring the position in the context
    #[test]
    fn test_with_context() {
        let result: Result<(), InpaintError> = Err(InpaintError::SearchExhausted {
            iteration: 0,
            target: [1, 1],
            dimensions: (8, 8),
        });
        let context = ErrorContext {
            iteration: Some(7),
            position: Some([2, 5]),
            operation: None,
        };

        match result.with_context(context) {
            Err(InpaintError::SearchExhausted {
                iteration, target, ..
            }) => {
                assert_eq!(iteration, 7);
                assert_eq!(target, [2, 5]);
            }
            other => unreachable!("unexpected result: {other:?}"),
        }
    }

    // Tests that iteration context leaves other error kinds unchanged
    // Verified by converting every error into a search error
    #[test]
    fn test_with_iteration_other_errors() {
        let result: Result<(), InpaintError> = Err(computation_error("fill", &"stalled"));
        let error = result.with_iteration(3).expect_err("still an error");
        assert!(matches!(
            error,
            InpaintError::Computation {
                operation: "fill",
                ..
            }
        ));

        let ok: Result<u8, InpaintError> = Ok(5);
        assert_eq!(ok.with_iteration(3).ok(), Some(5));
    }

    // Tests conversion from I/O errors
    // Verified by mapping I/O errors onto image load errors
    #[test]
    fn test_from_io_error() {
        let error: InpaintError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(error, InpaintError::FileSystem { .. }));
    }

    // Tests context application leaves untouched fields and other kinds alone
    // Verified by resetting the iteration when the context has none
    #[test]
    fn test_context_apply() {
        let context = ErrorContext {
            operation: Some("patch search"),
            ..ErrorContext::default()
        };

        let error = context.apply(InpaintError::SearchExhausted {
            iteration: 4,
            target: [2, 2],
            dimensions: (6, 6),
        });
        assert!(matches!(
            error,
            InpaintError::SearchExhausted {
                iteration: 4,
                target: [2, 2],
                ..
            }
        ));

        let error = context.apply(computation_error("unknown", &"stalled"));
        assert!(matches!(
            error,
            InpaintError::Computation {
                operation: "patch search",
                ..
            }
        ));

        let error = context.apply(invalid_source(&"ring"));
        assert_eq!(error.to_string(), "Unusable input buffers: ring");
    }

    // Tests the missing mask message names both files
    // Verified by printing only the image path
    #[test]
    fn test_missing_mask_message() {
        let error = InpaintError::MissingMask {
            image: "scan.png".into(),
            expected: "scan_mask.png".into(),
        };
        assert_eq!(
            error.to_string(),
            "Image 'scan.png' has no mask (looked for 'scan_mask.png')"
        );
    }
}
