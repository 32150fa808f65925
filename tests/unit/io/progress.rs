//! Tests for progress tracking and multi-file batch processing

#[cfg(test)]
mod tests {
    use patchfill::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
    use patchfill::io::progress::ProgressManager;
    use std::path::Path;

    // Tests ProgressManager construction and an empty batch
    // Verified by creating bars before initialization
    #[test]
    fn test_progress_manager_new() {
        let mut pm = ProgressManager::new();
        assert!(pm.file_bar(0).is_none());

        pm.initialize(0);
        assert_eq!(pm.file_count(), 0);
        assert!(pm.file_bar(0).is_none());
        pm.finish();
    }

    // Tests a single file from start to completion
    // Verified by not setting the bar length from the unknown count
    #[test]
    fn test_single_file_lifecycle() {
        let mut pm = ProgressManager::default();
        pm.initialize(1);

        pm.start_file(0, Path::new("single.png"), 100);
        let bar = pm.file_bar(0).expect("bar for the only file");
        assert_eq!(bar.length(), Some(100));
        assert_eq!(bar.position(), 0);

        bar.set_position(40);
        pm.complete_file(0);
        assert_eq!(bar.position(), 100);
        pm.finish();
    }

    // Tests bar reuse for batches larger than the individual bar limit
    // Verified by creating one bar per file
    #[test]
    fn test_large_batch_reuses_bars() {
        let mut pm = ProgressManager::new();
        let count = MAX_INDIVIDUAL_PROGRESS_BARS * 3;
        pm.initialize(count);
        assert_eq!(pm.file_count(), count);

        for index in 0..count {
            pm.start_file(index, Path::new("batch.png"), index + 1);
            let bar = pm.file_bar(index).expect("reused bar");
            assert_eq!(bar.length(), Some((index + 1) as u64));
            pm.complete_file(index);
        }

        // Indices one cycle apart share a bar
        let first = pm.file_bar(0).expect("bar");
        first.set_position(3);
        let same = pm.file_bar(MAX_INDIVIDUAL_PROGRESS_BARS).expect("bar");
        assert_eq!(same.position(), 3);
        pm.finish();
    }

    // Tests that closing the display twice keeps the finished bars intact
    // Verified by discarding the bars when the display is cleared
    #[test]
    fn test_finish_is_repeatable() {
        let mut pm = ProgressManager::new();
        pm.initialize(MAX_INDIVIDUAL_PROGRESS_BARS + 1);
        pm.start_file(0, Path::new("first.png"), 10);
        pm.complete_file(0);

        pm.finish();
        pm.finish();

        let bar = pm.file_bar(0).expect("bar survives finish");
        assert_eq!(bar.position(), 10);
    }
}
