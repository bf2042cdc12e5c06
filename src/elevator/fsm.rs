/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info};
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use super::dispatch_queue::{DispatchQueue, Waiting};
use super::time_fixer::TimeFixer;
use crate::config::ElevatorConfig;
use crate::event_log::{Event, EventLog};
use crate::shared::floor::N_FLOORS;
use crate::shared::{Direction, Floor, Passenger};

/**
 * Runs one elevator.
 *
 * The `ElevatorFSM` owns the elevator's position, direction and passengers, and shares only
 * its `DispatchQueue` with the rest of the system. Each pass of the main loop either sleeps
 * until work arrives, or decides a direction, runs a door cycle at the current floor and
 * travels one floor. The queue lock is held from the direction decision through the end of
 * the door cycle and released before any travel.
 *
 * # Fields
 * - `id`:              Elevator number used in every emitted event.
 * - `queue`:           Waiting passengers for this elevator, plus the shutdown flag.
 * - `events`:          Sink for IN/OUT/OPEN/CLOSE/ARRIVE events.
 * - `max_capacity`:    Passengers allowed onboard at once.
 * - `move_time`:       Time to travel one floor.
 * - `door_hold`:       Minimum time between OPEN and CLOSE.
 * - `state`:           Position, direction and onboard passengers.
 * - `timer`:           Drift correction for door holds and travel.
 */
pub struct ElevatorFSM {
    id: u8,
    queue: Arc<DispatchQueue>,
    events: EventLog,
    max_capacity: usize,
    move_time: Duration,
    door_hold: Duration,

    // Private fields
    state: ElevatorState,
    timer: TimeFixer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElevatorError {
    InvalidState(String),
}

impl fmt::Display for ElevatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevatorError::InvalidState(reason) => write!(f, "invalid elevator state: {}", reason),
        }
    }
}

impl std::error::Error for ElevatorError {}

/// Position, direction and passengers of one elevator.
#[derive(Debug, Clone)]
pub struct ElevatorState {
    pub floor: Floor,
    pub direction: Direction,
    /// Onboard passengers bucketed by destination, indexed by `Floor::index`.
    pub onboard: Vec<BTreeSet<Passenger>>,
    pub occupants: usize,
}

impl ElevatorState {
    pub fn new(floor: Floor) -> ElevatorState {
        ElevatorState {
            floor,
            direction: Direction::Unknown,
            onboard: vec![BTreeSet::new(); N_FLOORS],
            occupants: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.occupants == 0
    }

    pub fn board(&mut self, passenger: Passenger) {
        self.onboard[passenger.destination().index()].insert(passenger);
        self.occupants += 1;
    }

    /// Removes and returns everyone riding to the current floor.
    pub fn alight(&mut self) -> BTreeSet<Passenger> {
        let leaving = std::mem::take(&mut self.onboard[self.floor.index()]);
        self.occupants -= leaving.len();
        leaving
    }

    fn onboard_beyond(&self, direction: Direction) -> bool {
        Floor::all()
            .filter(|f| direction.leads_to(self.floor, *f))
            .any(|f| !self.onboard[f.index()].is_empty())
    }

    /// LOOK: keep going while anything lies ahead in the current direction, else reverse.
    pub fn continue_or_reverse(&self, waiting: &Waiting) -> Direction {
        let direction = self.direction;
        let ahead = self.onboard_beyond(direction)
            || waiting.iter().any(|p| {
                direction.leads_to(self.floor, p.origin())
                    || (p.origin() == self.floor
                        && direction.leads_to(self.floor, p.destination()))
            });
        if ahead {
            direction
        } else {
            direction.reverse()
        }
    }

    /// Direction toward the destination of the first passenger waiting at the current floor.
    pub fn admission_direction(&self, waiting: &Waiting) -> Option<Direction> {
        waiting
            .iter()
            .find(|p| p.origin() == self.floor)
            .map(|p| Direction::toward(self.floor, p.destination()))
    }

    /// Nearest waiting origin; ties go to higher priority, then earlier arrival.
    pub fn nearest_origin(&self, waiting: &Waiting) -> Option<Floor> {
        waiting
            .iter()
            .min_by_key(|p| {
                (
                    self.floor.distance(p.origin()),
                    Reverse(p.priority()),
                    p.arrival,
                )
            })
            .map(Passenger::origin)
    }

    fn boards_here(&self, passenger: &Passenger) -> bool {
        passenger.origin() == self.floor
            && self.direction.leads_to(self.floor, passenger.destination())
    }

    pub fn next_floor(&self) -> Result<Floor, ElevatorError> {
        let next = match self.direction {
            Direction::Up => self.floor.above(),
            Direction::Down => self.floor.below(),
            Direction::Unknown => {
                return Err(ElevatorError::InvalidState(format!(
                    "no direction to move in from {}",
                    self.floor
                )))
            }
        };
        next.ok_or_else(|| {
            ElevatorError::InvalidState(format!(
                "moving {:?} from {} leaves the building",
                self.direction, self.floor
            ))
        })
    }
}

impl ElevatorFSM {
    pub fn new(
        id: u8,
        config: &ElevatorConfig,
        queue: Arc<DispatchQueue>,
        events: EventLog,
    ) -> Result<ElevatorFSM, ElevatorError> {
        let initial_floor = Floor::new(config.initial_floor)
            .map_err(|e| ElevatorError::InvalidState(e.to_string()))?;
        if config.max_capacity == 0 {
            return Err(ElevatorError::InvalidState(format!(
                "elevator {} has no seats",
                id
            )));
        }
        Ok(ElevatorFSM {
            id,
            queue,
            events,
            max_capacity: config.max_capacity,
            move_time: config.move_time(),
            door_hold: config.door_hold(),
            state: ElevatorState::new(initial_floor),
            timer: TimeFixer::new(),
        })
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn run(mut self) -> Result<(), ElevatorError> {
        info!("Elevator {} started at {}", self.id, self.state.floor);
        let queue = Arc::clone(&self.queue);

        loop {
            let mut waiting = queue.lock();

            // Sleeping
            if waiting.is_empty() && self.state.is_empty() {
                debug!("Elevator {} idle at {}", self.id, self.state.floor);
                waiting = queue.wait_for_work(waiting);
                if waiting.is_empty() {
                    info!("Elevator {} terminated at {}", self.id, self.state.floor);
                    return Ok(());
                }
                debug!("Elevator {} woke with {} waiting", self.id, waiting.len());
                self.state.direction = Direction::Unknown;
            }

            // Deciding
            if self.state.direction == Direction::Unknown {
                match self.state.admission_direction(&waiting) {
                    Some(direction) => self.state.direction = direction,
                    None => {
                        let target = self.state.nearest_origin(&waiting).ok_or_else(|| {
                            ElevatorError::InvalidState("woke without waiting passengers".into())
                        })?;
                        let direction = Direction::toward(self.state.floor, target);
                        if direction == Direction::Unknown {
                            return Err(ElevatorError::InvalidState(format!(
                                "nearest origin {} is the current floor",
                                target
                            )));
                        }
                        drop(waiting);
                        self.state.direction = direction;
                        self.travel()?;
                        continue;
                    }
                }
            } else {
                self.state.direction = self.state.continue_or_reverse(&waiting);
            }

            self.door_cycle(&mut waiting);

            if waiting.is_empty() && self.state.is_empty() {
                if waiting.terminate_requested() {
                    info!("Elevator {} terminated at {}", self.id, self.state.floor);
                    return Ok(());
                }
                continue;
            }

            // Traveling
            drop(waiting);
            self.travel()?;
        }
    }

    fn door_cycle(&mut self, waiting: &mut Waiting) {
        let floor = self.state.floor;
        let leaving = !self.state.onboard[floor.index()].is_empty();
        let has_candidate = waiting.iter().any(|p| self.state.boards_here(p));
        let entering = has_candidate && (self.state.occupants < self.max_capacity || leaving);
        let door_open = entering || leaving;

        if door_open {
            self.emit(Event::Open { floor, elevator: self.id });
            self.timer.checkpoint();
        }

        if leaving {
            for passenger in self.state.alight() {
                self.emit(Event::Out {
                    person: passenger.id(),
                    floor,
                    elevator: self.id,
                });
            }
        }

        if door_open {
            self.timer.sleep_remaining(self.door_hold);
        }

        let free_seats = self.max_capacity.saturating_sub(self.state.occupants);
        let boarding: Vec<Passenger> = waiting
            .iter()
            .filter(|p| self.state.boards_here(p))
            .take(free_seats)
            .cloned()
            .collect();
        for passenger in boarding {
            waiting.remove(&passenger);
            self.emit(Event::In {
                person: passenger.id(),
                floor,
                elevator: self.id,
            });
            self.state.board(passenger);
        }
        debug_assert!(self.state.occupants <= self.max_capacity);

        if door_open {
            self.emit(Event::Close { floor, elevator: self.id });
            self.timer.checkpoint();
        }
    }

    fn travel(&mut self) -> Result<(), ElevatorError> {
        let next = self.state.next_floor()?;
        self.timer.sleep_remaining(self.move_time);
        self.state.floor = next;
        self.emit(Event::Arrive {
            floor: next,
            elevator: self.id,
        });
        self.timer.checkpoint();
        Ok(())
    }

    fn emit(&self, event: Event) {
        self.events.emit(event);
    }

    #[cfg(test)]
    pub fn test_state(&self) -> &ElevatorState {
        &self.state
    }
}
