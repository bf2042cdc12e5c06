/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::fmt;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Floor, FloorError, Request};

/***************************************/
/*       Public data structures        */
/***************************************/

/// One parsed input line. Only passenger requests reach the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum InputRequest {
    Person { at: Option<Duration>, request: Request },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Malformed(String),
    Floor(FloorError),
    SameFloor(u32),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Malformed(line) => write!(f, "malformed request line {:?}", line),
            ParseError::Floor(e) => write!(f, "{}", e),
            ParseError::SameFloor(id) => write!(f, "passenger {} starts at its destination", id),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<FloorError> for ParseError {
    fn from(e: FloorError) -> ParseError {
        ParseError::Floor(e)
    }
}

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Parses `[<seconds>]<id>-PRI-<priority>-FROM-<floor>-TO-<floor>-BY-<elevator>`.
 *
 * The bracketed timestamp is optional. Blank lines give `Ok(None)`.
 */
pub fn parse_line(line: &str) -> Result<Option<InputRequest>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let malformed = || ParseError::Malformed(line.to_string());

    let (at, body) = match line.strip_prefix('[') {
        Some(rest) => {
            let (stamp, body) = rest.split_once(']').ok_or_else(malformed)?;
            let seconds: f64 = stamp.trim().parse().map_err(|_| malformed())?;
            let at = Duration::try_from_secs_f64(seconds).map_err(|_| malformed())?;
            (Some(at), body)
        }
        None => (None, line),
    };

    let fields: Vec<&str> = body.split('-').collect();
    let [id, "PRI", priority, "FROM", origin, "TO", destination, "BY", elevator] = fields[..] else {
        return Err(malformed());
    };

    let request = Request {
        id: id.parse().map_err(|_| malformed())?,
        origin: Floor::from_label(origin)?,
        destination: Floor::from_label(destination)?,
        priority: priority.parse().map_err(|_| malformed())?,
        elevator: elevator.parse().map_err(|_| malformed())?,
    };
    if request.origin == request.destination {
        return Err(ParseError::SameFloor(request.id));
    }
    Ok(Some(InputRequest::Person { at, request }))
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
    fn test_parse_stamped_line() {
        let parsed = parse_line("[1.5]12-PRI-40-FROM-B2-TO-F5-BY-3").unwrap();

        assert_eq!(
            parsed,
            Some(InputRequest::Person {
                at: Some(Duration::from_millis(1500)),
                request: Request {
                    id: 12,
                    origin: floor(-2),
                    destination: floor(5),
                    priority: 40,
                    elevator: 3,
                },
            })
        );
    }

    #[test]
    fn test_parse_unstamped_line() {
        let parsed = parse_line("  7-PRI-1-FROM-F1-TO-B1-BY-6 \n").unwrap();

        match parsed {
            Some(InputRequest::Person { at, request }) => {
                assert_eq!(at, None);
                assert_eq!(request.id, 7);
                assert_eq!(request.destination, floor(-1));
                assert_eq!(request.elevator, 6);
            }
            other => panic!("unexpected parse result {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unrepresentable_stamp() {
        // Purpose: a finite stamp too large for a Duration is a bad line, not a crash
        assert!(matches!(
            parse_line("[1e30]1-PRI-1-FROM-F1-TO-F2-BY-1"),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_line("[1.0]1-FROM-F1-TO-F2-BY-1"),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_line("[x]1-PRI-1-FROM-F1-TO-F2-BY-1"),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_line("[1.0 1-PRI-1-FROM-F1-TO-F2-BY-1"),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_line("[-1.0]1-PRI-1-FROM-F1-TO-F2-BY-1"),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_line("[inf]1-PRI-1-FROM-F1-TO-F2-BY-1"),
            Err(ParseError::Malformed(_))
        ));
        assert_eq!(
            parse_line("1-PRI-1-FROM-X1-TO-F2-BY-1"),
            Err(ParseError::Floor(FloorError::Format("X1".to_string())))
        );
        assert_eq!(
            parse_line("1-PRI-1-FROM-F9-TO-F2-BY-1"),
            Err(ParseError::Floor(FloorError::OutOfRange(9)))
        );
        assert_eq!(
            parse_line("4-PRI-1-FROM-F2-TO-F2-BY-1"),
            Err(ParseError::SameFloor(4))
        );
    }
}
