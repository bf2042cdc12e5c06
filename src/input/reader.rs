/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info, warn};
use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/***************************************/
/*           Local modules             */
/***************************************/
use super::parser::{parse_line, InputRequest};
use crate::dispatcher::{DispatchError, Dispatcher};

/**
 * Feeds request lines into the dispatcher.
 *
 * Reads until end of input, then asks every elevator to shut down. With `replay` set, a
 * stamped line is held back until its timestamp has passed since `start`.
 */
pub struct InputReader<R: BufRead> {
    source: R,
    dispatcher: Arc<Dispatcher>,
    replay: bool,
    start: Instant,
}

impl<R: BufRead> InputReader<R> {
    pub fn new(source: R, dispatcher: Arc<Dispatcher>, replay: bool, start: Instant) -> InputReader<R> {
        InputReader {
            source,
            dispatcher,
            replay,
            start,
        }
    }

    /// Returns the number of submitted requests. Shutdown is requested even on a read error.
    pub fn run(mut self) -> io::Result<usize> {
        let result = self.feed();
        self.dispatcher.request_shutdown();
        result
    }

    fn feed(&mut self) -> io::Result<usize> {
        let mut submitted = 0;
        for line in (&mut self.source).lines() {
            let line = line?;
            let request = match parse_line(&line) {
                Ok(Some(InputRequest::Person { at, request })) => {
                    if let (true, Some(at)) = (self.replay, at) {
                        let Some(due) = self.start.checked_add(at) else {
                            warn!("Skipping passenger {}: stamp {:?} out of range", request.id, at);
                            continue;
                        };
                        let now = Instant::now();
                        if due > now {
                            thread::sleep(due - now);
                        }
                    }
                    request
                }
                Ok(None) => continue,
                Err(e) => {
                    warn!("Skipping input line: {}", e);
                    continue;
                }
            };

            let id = request.id;
            match self.dispatcher.submit(request) {
                Ok(()) => {
                    debug!("Submitted passenger {}", id);
                    submitted += 1;
                }
                Err(DispatchError::UnknownElevator(elevator)) => {
                    warn!("Skipping passenger {}: no elevator {}", id, elevator)
                }
            }
        }
        info!("End of input after {} requests", submitted);
        Ok(submitted)
    }
}
