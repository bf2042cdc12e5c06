/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::warn;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::lock_or_recover;
use crate::shared::Floor;

/***************************************/
/*       Public data structures        */
/***************************************/

/// A state change of one elevator, printed as a single output token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    In { person: u32, floor: Floor, elevator: u8 },
    Out { person: u32, floor: Floor, elevator: u8 },
    Open { floor: Floor, elevator: u8 },
    Close { floor: Floor, elevator: u8 },
    Arrive { floor: Floor, elevator: u8 },
}

impl Event {
    #[cfg(test)]
    pub fn elevator(&self) -> u8 {
        match *self {
            Event::In { elevator, .. }
            | Event::Out { elevator, .. }
            | Event::Open { elevator, .. }
            | Event::Close { elevator, .. }
            | Event::Arrive { elevator, .. } => elevator,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::In { person, floor, elevator } => write!(f, "IN-{}-{}-{}", person, floor, elevator),
            Event::Out { person, floor, elevator } => write!(f, "OUT-{}-{}-{}", person, floor, elevator),
            Event::Open { floor, elevator } => write!(f, "OPEN-{}-{}", floor, elevator),
            Event::Close { floor, elevator } => write!(f, "CLOSE-{}-{}", floor, elevator),
            Event::Arrive { floor, elevator } => write!(f, "ARRIVE-{}-{}", floor, elevator),
        }
    }
}

/// An event stamped with the time since the simulation started.
#[derive(Debug, Clone)]
pub struct LoggedEvent {
    pub at: Duration,
    pub event: Event,
}

/**
 * Handle used by the elevators to publish events.
 *
 * Cloning is cheap; every clone feeds the same `EventWriter`. The timestamp is taken when
 * `emit` is called, so the writer thread's own latency never shows up in the output.
 * Stamping and sending happen under one lock, so the writer sees timestamps in order
 * across all elevators.
 */
#[derive(Clone)]
pub struct EventLog {
    start: Instant,
    event_tx: Arc<Mutex<cbc::Sender<LoggedEvent>>>,
}

impl EventLog {
    pub fn new(start: Instant) -> (EventLog, cbc::Receiver<LoggedEvent>) {
        let (event_tx, event_rx) = cbc::unbounded::<LoggedEvent>();
        let event_tx = Arc::new(Mutex::new(event_tx));
        (EventLog { start, event_tx }, event_rx)
    }

    pub fn emit(&self, event: Event) {
        let event_tx = lock_or_recover!(self.event_tx, "event log sender");
        let at = Instant::now().duration_since(self.start);
        if let Err(e) = event_tx.send(LoggedEvent { at, event }) {
            warn!("Event log closed, dropping {}", e.0.event);
        }
    }
}

/// Prints every logged event as `[<seconds>]<token>` until all `EventLog` handles are gone.
pub struct EventWriter<W: Write> {
    event_rx: cbc::Receiver<LoggedEvent>,
    out: W,
}

impl<W: Write> EventWriter<W> {
    pub fn new(event_rx: cbc::Receiver<LoggedEvent>, out: W) -> EventWriter<W> {
        EventWriter { event_rx, out }
    }

    pub fn run(mut self) -> io::Result<W> {
        for logged in self.event_rx.iter() {
            writeln!(self.out, "[{:>10.4}]{}", logged.at.as_secs_f64(), logged.event)?;
            self.out.flush()?;
        }
        Ok(self.out)
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod tests {
    use super::*;

    fn floor(value: i32) -> Floor {
        Floor::new(value).unwrap()
    }

    #[test]
    fn test_event_tokens() {
        assert_eq!(
            Event::In { person: 7, floor: floor(-2), elevator: 3 }.to_string(),
            "IN-7-B2-3"
        );
        assert_eq!(
            Event::Out { person: 7, floor: floor(5), elevator: 3 }.to_string(),
            "OUT-7-F5-3"
        );
        assert_eq!(Event::Open { floor: floor(1), elevator: 6 }.to_string(), "OPEN-F1-6");
        assert_eq!(Event::Close { floor: floor(1), elevator: 6 }.to_string(), "CLOSE-F1-6");
        assert_eq!(Event::Arrive { floor: floor(-1), elevator: 2 }.to_string(), "ARRIVE-B1-2");
    }

    #[test]
    fn test_writer_formats_lines() {
        // Arrange
        let (events, event_rx) = EventLog::new(Instant::now());
        let writer = EventWriter::new(event_rx, Vec::new());

        // Act
        events.emit(Event::Arrive { floor: floor(2), elevator: 1 });
        events.emit(Event::Open { floor: floor(2), elevator: 1 });
        drop(events);
        let out = writer.run().unwrap();

        // Assert
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("]ARRIVE-F2-1"));
        assert!(lines[1].ends_with("]OPEN-F2-1"));
        assert_eq!(lines[0].find(']'), Some(11));
    }

    #[test]
    fn test_timestamps_ordered_across_threads() {
        // Purpose: concurrent emitters never make the log go back in time

        // Arrange
        let (events, event_rx) = EventLog::new(Instant::now());

        // Act
        let emitters: Vec<_> = (1..=8u8)
            .map(|elevator| {
                let events = events.clone();
                std::thread::spawn(move || {
                    for _ in 0..2000 {
                        events.emit(Event::Arrive { floor: floor(2), elevator });
                    }
                })
            })
            .collect();
        for e in emitters {
            e.join().unwrap();
        }
        drop(events);

        // Assert
        let stamps: Vec<Duration> = event_rx.iter().map(|logged| logged.at).collect();
        assert_eq!(stamps.len(), 8 * 2000);
        let backwards = stamps.windows(2).filter(|w| w[1] < w[0]).count();
        assert_eq!(backwards, 0);
    }

    #[test]
    fn test_emit_after_writer_gone() {
        let (events, event_rx) = EventLog::new(Instant::now());
        drop(event_rx);

        // Must not panic
        events.emit(Event::Close { floor: floor(3), elevator: 4 });
    }
}
