/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::fmt;
use std::str::FromStr;

/***************************************/
/*              Constants              */
/***************************************/
pub const LOWEST_FLOOR: i32 = -4;
pub const HIGHEST_FLOOR: i32 = 7;
/// Number of real floors; there is no floor 0.
pub const N_FLOORS: usize = (HIGHEST_FLOOR - LOWEST_FLOOR) as usize;

/***************************************/
/*       Public data structures        */
/***************************************/

/**
 * A floor of the building.
 *
 * Floors are numbered ..., -2, -1, 1, 2, ... with basements negative. The value 0 never
 * exists, so stepping and distances skip over it. Labels are `B<n>` for basements and
 * `F<n>` for the rest.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Floor(i32);

#[derive(Debug, Clone, PartialEq)]
pub enum FloorError {
    Format(String),
    OutOfRange(i32),
}

impl fmt::Display for FloorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloorError::Format(label) => write!(f, "malformed floor label {:?}", label),
            FloorError::OutOfRange(value) => write!(f, "floor {} is outside the building", value),
        }
    }
}

impl std::error::Error for FloorError {}

impl Floor {
    pub fn new(value: i32) -> Result<Floor, FloorError> {
        if value == 0 || value < LOWEST_FLOOR || value > HIGHEST_FLOOR {
            return Err(FloorError::OutOfRange(value));
        }
        Ok(Floor(value))
    }

    pub fn label(self) -> String {
        if self.0 >= 0 {
            format!("F{}", self.0)
        } else {
            format!("B{}", -self.0)
        }
    }

    pub fn from_label(text: &str) -> Result<Floor, FloorError> {
        let sign = match text.get(..1) {
            Some("F") => 1,
            Some("B") => -1,
            _ => return Err(FloorError::Format(text.to_string())),
        };
        let number: i32 = text[1..]
            .parse()
            .map_err(|_| FloorError::Format(text.to_string()))?;
        if number < 0 {
            return Err(FloorError::Format(text.to_string()));
        }
        Floor::new(sign * number)
    }

    /// Number of floors travelled between `self` and `other`.
    pub fn distance(self, other: Floor) -> u32 {
        let gap = (self.0 - other.0).unsigned_abs();
        if self.0 * other.0 > 0 {
            gap
        } else {
            gap - 1
        }
    }

    pub fn above(self) -> Option<Floor> {
        match self.0 {
            -1 => Some(Floor(1)),
            HIGHEST_FLOOR => None,
            v => Some(Floor(v + 1)),
        }
    }

    pub fn below(self) -> Option<Floor> {
        match self.0 {
            1 => Some(Floor(-1)),
            LOWEST_FLOOR => None,
            v => Some(Floor(v - 1)),
        }
    }

    /// Slot of this floor in a table of `N_FLOORS` entries, lowest floor first.
    pub fn index(self) -> usize {
        if self.0 < 0 {
            (self.0 - LOWEST_FLOOR) as usize
        } else {
            (self.0 - LOWEST_FLOOR - 1) as usize
        }
    }

    pub fn from_index(index: usize) -> Floor {
        let value = index as i32 + LOWEST_FLOOR;
        if value < 0 {
            Floor(value)
        } else {
            Floor(value + 1)
        }
    }

    pub fn all() -> impl Iterator<Item = Floor> {
        (0..N_FLOORS).map(Floor::from_index)
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Floor {
    type Err = FloorError;

    fn from_str(s: &str) -> Result<Floor, FloorError> {
        Floor::from_label(s)
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
