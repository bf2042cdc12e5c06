/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info};
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::ElevatorConfig;
use crate::elevator::{DispatchQueue, ElevatorError, ElevatorFSM};
use crate::event_log::EventLog;
use crate::shared::{Passenger, Request};

/***************************************/
/*               Enums                 */
/***************************************/
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    UnknownElevator(u8),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnknownElevator(id) => write!(f, "no elevator with id {}", id),
        }
    }
}

impl std::error::Error for DispatchError {}

pub type ElevatorThread = JoinHandle<Result<(), ElevatorError>>;

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Routes requests to the elevator they name.
 *
 * Holds one `DispatchQueue` per elevator, numbered from 1. Shared between the input side
 * and `main` behind an `Arc`; every method takes `&self` and is safe to call from any
 * thread.
 *
 * # Fields
 * - `queues`:          Queue of elevator `id` is stored at index `id - 1`.
 * - `next_arrival`:    Source of the monotonic arrival stamps used for tie-breaking.
 */
pub struct Dispatcher {
    queues: Vec<Arc<DispatchQueue>>,
    next_arrival: AtomicU64,
}

impl Dispatcher {
    pub fn new(n_elevators: u8) -> Dispatcher {
        Dispatcher {
            queues: (1..=n_elevators)
                .map(|id| Arc::new(DispatchQueue::new(id)))
                .collect(),
            next_arrival: AtomicU64::new(0),
        }
    }

    pub fn n_elevators(&self) -> usize {
        self.queues.len()
    }

    pub fn queue(&self, elevator: u8) -> Option<&Arc<DispatchQueue>> {
        (elevator as usize)
            .checked_sub(1)
            .and_then(|index| self.queues.get(index))
    }

    pub fn submit(&self, request: Request) -> Result<(), DispatchError> {
        let queue = self
            .queue(request.elevator)
            .ok_or(DispatchError::UnknownElevator(request.elevator))?;
        let arrival = self.next_arrival.fetch_add(1, Ordering::SeqCst);
        queue.insert(Passenger::new(request, arrival));
        Ok(())
    }

    /// Asks every elevator to stop once its accepted work is done.
    pub fn request_shutdown(&self) {
        info!("Shutdown requested for {} elevators", self.queues.len());
        for queue in self.queues.iter() {
            queue.request_shutdown();
        }
    }

    /// Spawns one named thread per elevator.
    pub fn start_elevators(
        &self,
        config: &ElevatorConfig,
        events: &EventLog,
    ) -> io::Result<Vec<ElevatorThread>> {
        let mut threads = Vec::with_capacity(self.queues.len());
        for queue in self.queues.iter() {
            let elevator_fsm =
                ElevatorFSM::new(queue.elevator(), config, Arc::clone(queue), events.clone())
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
            let id = elevator_fsm.id();

            let elevator_thread = Builder::new().name(format!("elevator_{}", id));
            threads.push(elevator_thread.spawn(move || elevator_fsm.run())?);
            debug!("Spawned elevator {}", id);
        }
        Ok(threads)
    }
}
