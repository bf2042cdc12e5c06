/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, warn};
use std::collections::BTreeSet;
use std::sync::{Condvar, Mutex, MutexGuard};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::lock_or_recover;
use crate::shared::Passenger;

/***************************************/
/*       Public data structures        */
/***************************************/

/// Everything guarded by an elevator's monitor lock.
#[derive(Debug, Default)]
pub struct Waiting {
    passengers: BTreeSet<Passenger>,
    terminate_requested: bool,
}

impl Waiting {
    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    /// Waiting passengers by priority, then arrival, then id.
    pub fn iter(&self) -> impl Iterator<Item = &Passenger> {
        self.passengers.iter()
    }

    pub fn remove(&mut self, passenger: &Passenger) -> bool {
        self.passengers.remove(passenger)
    }

    pub fn terminate_requested(&self) -> bool {
        self.terminate_requested
    }

    fn has_work_or_terminate(&self) -> bool {
        !self.passengers.is_empty() || self.terminate_requested
    }
}

/**
 * Monitor owning the waiting passengers of one elevator.
 *
 * Any thread may `insert` or `request_shutdown`. Only the owning elevator takes the lock
 * through `lock` and blocks in `wait_for_work`. The wake condition (work queued or
 * shutdown requested) is evaluated under the same lock that producers take, so a signal
 * can never slip in between the check and the wait.
 */
#[derive(Debug)]
pub struct DispatchQueue {
    elevator: u8,
    waiting: Mutex<Waiting>,
    work_available: Condvar,
}

impl DispatchQueue {
    pub fn new(elevator: u8) -> DispatchQueue {
        DispatchQueue {
            elevator,
            waiting: Mutex::new(Waiting::default()),
            work_available: Condvar::new(),
        }
    }

    pub fn elevator(&self) -> u8 {
        self.elevator
    }

    pub fn insert(&self, passenger: Passenger) {
        debug_assert_eq!(passenger.request.elevator, self.elevator);
        let mut waiting = self.lock();
        debug!(
            "Queueing passenger {} at {} for elevator {}",
            passenger.id(),
            passenger.origin(),
            self.elevator
        );
        waiting.passengers.insert(passenger);
        self.work_available.notify_one();
    }

    pub fn request_shutdown(&self) {
        let mut waiting = self.lock();
        waiting.terminate_requested = true;
        self.work_available.notify_all();
    }

    #[cfg(test)]
    pub fn is_shutting_down(&self) -> bool {
        self.lock().terminate_requested
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn lock(&self) -> MutexGuard<'_, Waiting> {
        lock_or_recover!(
            self.waiting,
            format!("waiting queue of elevator {}", self.elevator)
        )
    }

    /// Blocks until work is queued or shutdown is requested. Takes and returns the held lock.
    pub fn wait_for_work<'a>(&self, waiting: MutexGuard<'a, Waiting>) -> MutexGuard<'a, Waiting> {
        match self
            .work_available
            .wait_while(waiting, |w| !w.has_work_or_terminate())
        {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Elevator {} wait interrupted, continuing", self.elevator);
                poisoned.into_inner()
            }
        }
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
