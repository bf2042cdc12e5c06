/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::cmp::Ordering;

/***************************************/
/*           Local modules             */
/***************************************/
use super::floor::Floor;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Unknown,
    Up,
    Down,
}

impl Direction {
    /// Direction from `from` toward `to`, `Unknown` when they are the same floor.
    pub fn toward(from: Floor, to: Floor) -> Direction {
        match to.cmp(&from) {
            Ordering::Greater => Direction::Up,
            Ordering::Less => Direction::Down,
            Ordering::Equal => Direction::Unknown,
        }
    }

    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Unknown => Direction::Unknown,
        }
    }

    /// True if `to` lies strictly beyond `from` when travelling in this direction.
    pub fn leads_to(self, from: Floor, to: Floor) -> bool {
        match self {
            Direction::Up => to > from,
            Direction::Down => to < from,
            Direction::Unknown => false,
        }
    }
}

/// One passenger trip as delivered by the input side. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: u32,
    pub origin: Floor,
    pub destination: Floor,
    pub priority: u32,
    pub elevator: u8,
}

/**
 * A request waiting for, or riding in, an elevator.
 *
 * `arrival` is a monotonic stamp handed out at submission. Passengers order by priority
 * (highest first), then arrival, then request id, so two distinct passengers never compare
 * equal inside an ordered set.
 */
#[derive(Debug, Clone)]
pub struct Passenger {
    pub request: Request,
    pub arrival: u64,
}

impl Passenger {
    pub fn new(request: Request, arrival: u64) -> Passenger {
        Passenger { request, arrival }
    }

    pub fn id(&self) -> u32 {
        self.request.id
    }

    pub fn origin(&self) -> Floor {
        self.request.origin
    }

    pub fn destination(&self) -> Floor {
        self.request.destination
    }

    pub fn priority(&self) -> u32 {
        self.request.priority
    }
}

impl Ord for Passenger {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority()
            .cmp(&self.priority())
            .then(self.arrival.cmp(&other.arrival))
            .then(self.id().cmp(&other.id()))
    }
}

impl PartialOrd for Passenger {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Passenger {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Passenger {}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn passenger(id: u32, priority: u32, arrival: u64) -> Passenger {
        Passenger::new(
            Request {
                id,
                origin: Floor::new(1).unwrap(),
                destination: Floor::new(3).unwrap(),
                priority,
                elevator: 1,
            },
            arrival,
        )
    }

    #[test]
    fn test_passenger_order() {
        // Arrange
        let mut set = BTreeSet::new();
        set.insert(passenger(4, 10, 3));
        set.insert(passenger(1, 10, 1));
        set.insert(passenger(2, 50, 2));
        set.insert(passenger(3, 10, 1));

        // Act
        let ids: Vec<u32> = set.iter().map(Passenger::id).collect();

        // Assert
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_distinct_passengers_never_collapse() {
        let mut set = BTreeSet::new();
        assert!(set.insert(passenger(1, 5, 0)));
        assert!(set.insert(passenger(2, 5, 0)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_direction_helpers() {
        let f1 = Floor::new(1).unwrap();
        let b1 = Floor::new(-1).unwrap();

        assert_eq!(Direction::toward(f1, b1), Direction::Down);
        assert_eq!(Direction::toward(b1, f1), Direction::Up);
        assert_eq!(Direction::toward(f1, f1), Direction::Unknown);
        assert_eq!(Direction::Up.reverse(), Direction::Down);
        assert!(Direction::Down.leads_to(f1, b1));
        assert!(!Direction::Up.leads_to(f1, b1));
        assert!(!Direction::Unknown.leads_to(b1, f1));
    }
}
