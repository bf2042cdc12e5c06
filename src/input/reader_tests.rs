/*
 * Unit tests for the input reader
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_reader_submits_and_shuts_down
 * - test_reader_skips_bad_lines
 * - test_reader_replays_timestamps
 * - test_reader_skips_stamp_past_clock_range
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod reader_tests {
    use crate::dispatcher::Dispatcher;
    use crate::input::InputReader;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn setup_reader(input: &str, replay: bool) -> (InputReader<Cursor<Vec<u8>>>, Arc<Dispatcher>) {
        let dispatcher = Arc::new(Dispatcher::new(2));
        let reader = InputReader::new(
            Cursor::new(input.as_bytes().to_vec()),
            Arc::clone(&dispatcher),
            replay,
            Instant::now(),
        );
        (reader, dispatcher)
    }

    #[test]
    fn test_reader_submits_and_shuts_down() {
        // Arrange
        let input = "[0.0]1-PRI-5-FROM-F1-TO-F3-BY-1\n\
                     [0.0]2-PRI-5-FROM-B1-TO-F3-BY-2\n\
                     [0.1]3-PRI-9-FROM-F4-TO-F1-BY-1\n";
        let (reader, dispatcher) = setup_reader(input, false);

        // Act
        let submitted = reader.run().unwrap();

        // Assert
        assert_eq!(submitted, 3);
        assert_eq!(dispatcher.queue(1).unwrap().len(), 2);
        assert_eq!(dispatcher.queue(2).unwrap().len(), 1);
        assert!(dispatcher.queue(1).unwrap().is_shutting_down());
        assert!(dispatcher.queue(2).unwrap().is_shutting_down());
    }

    #[test]
    fn test_reader_skips_bad_lines() {
        // Arrange
        let input = "garbage\n\
                     \n\
                     1-PRI-5-FROM-F1-TO-F3-BY-7\n\
                     2-PRI-5-FROM-F0-TO-F3-BY-1\n\
                     3-PRI-5-FROM-F2-TO-F3-BY-1\n";
        let (reader, dispatcher) = setup_reader(input, false);

        // Act
        let submitted = reader.run().unwrap();

        // Assert
        assert_eq!(submitted, 1);
        assert_eq!(dispatcher.queue(1).unwrap().len(), 1);
        assert_eq!(dispatcher.queue(2).unwrap().len(), 0);
    }

    #[test]
    fn test_reader_replays_timestamps() {
        // Arrange
        let input = "[0.0]1-PRI-5-FROM-F1-TO-F3-BY-1\n[0.15]2-PRI-5-FROM-F1-TO-F3-BY-1\n";
        let (reader, _dispatcher) = setup_reader(input, true);
        let start = Instant::now();

        // Act
        reader.run().unwrap();

        // Assert
        assert!(start.elapsed() >= Duration::from_millis(140));
    }

    #[test]
    fn test_reader_skips_stamp_past_clock_range() {
        // Purpose: a stamp the clock cannot reach is skipped instead of panicking or sleeping

        // Arrange
        let input = "[1e19]1-PRI-5-FROM-F1-TO-F3-BY-1\n[0.0]2-PRI-5-FROM-F1-TO-F3-BY-2\n";
        let (reader, dispatcher) = setup_reader(input, true);
        let start = Instant::now();

        // Act
        let submitted = reader.run().unwrap();

        // Assert
        assert_eq!(submitted, 1);
        assert_eq!(dispatcher.queue(1).unwrap().len(), 0);
        assert_eq!(dispatcher.queue(2).unwrap().len(), 1);
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
