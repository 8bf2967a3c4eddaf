//! Textual representation of coordinates as typed by users.
//!
//! Accepted forms:
//!
//! - `[x,y]`: a single point
//! - `[x,y],[x,y],...`: a list of points
//! - `[[x,y],...]`: a list of points (also with only one entry)

use omc_entities::coordinates::*;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No coordinates given")]
    Empty,
    #[error("Expected '[' at position {0}")]
    ExpectedOpeningBracket(usize),
    #[error("Missing ']' after position {0}")]
    MissingClosingBracket(usize),
    #[error("A point needs exactly two numbers: '{0}'")]
    Arity(String),
    #[error("Invalid number: '{0}'")]
    Number(String),
    #[error("Unexpected input at position {0}")]
    Trailing(usize),
}

pub fn parse_coordinates(input: &str) -> Result<Coordinates, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    if let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .filter(|s| s.trim_start().starts_with('['))
    {
        let points = parse_point_list(inner)?;
        // The list is never empty here, but don't rely on it
        return Points::try_from(points)
            .map(Coordinates::Multi)
            .map_err(|_| ParseError::Empty);
    }
    let mut points = parse_point_list(trimmed)?;
    if points.len() == 1 {
        return Ok(Coordinates::Single(points.remove(0)));
    }
    Points::try_from(points)
        .map(Coordinates::Multi)
        .map_err(|_| ParseError::Empty)
}

fn parse_point_list(input: &str) -> Result<Vec<Point>, ParseError> {
    let mut points = vec![];
    let mut pos = 0;
    let bytes = input.as_bytes();
    loop {
        pos = skip_whitespace(bytes, pos);
        if bytes.get(pos) != Some(&b'[') {
            return Err(ParseError::ExpectedOpeningBracket(pos));
        }
        let start = pos + 1;
        let end = input[start..]
            .find(']')
            .map(|offset| start + offset)
            .ok_or(ParseError::MissingClosingBracket(pos))?;
        points.push(parse_point(&input[start..end])?);
        pos = skip_whitespace(bytes, end + 1);
        match bytes.get(pos) {
            None => break,
            Some(b',') => pos += 1,
            Some(_) => return Err(ParseError::Trailing(pos)),
        }
    }
    Ok(points)
}

fn parse_point(pair: &str) -> Result<Point, ParseError> {
    let numbers: Vec<_> = pair.split(',').map(str::trim).collect();
    let [x, y] = numbers[..] else {
        return Err(ParseError::Arity(pair.trim().to_owned()));
    };
    Ok(Point::new(parse_number(x)?, parse_number(y)?))
}

fn parse_number(s: &str) -> Result<f64, ParseError> {
    s.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ParseError::Number(s.to_owned()))
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

pub fn format_point(point: Point) -> String {
    format!("[{},{}]", point.x, point.y)
}

/// Inverse of [`parse_coordinates`]. Lists are always
/// enclosed in an extra pair of brackets to keep their shape.
pub fn format_coordinates(coordinates: &Coordinates) -> String {
    match coordinates {
        Coordinates::Single(p) => format_point(*p),
        Coordinates::Multi(points) => {
            let mut s = String::from("[");
            for (i, p) in points.as_slice().iter().enumerate() {
                if i > 0 {
                    s.push(',');
                }
                s.push_str(&format_point(*p));
            }
            s.push(']');
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(c: &Coordinates) -> Vec<(f64, f64)> {
        c.points().iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn parse_single_point() {
        let c = parse_coordinates(" [10, 20] ").unwrap();
        assert_eq!(c, Coordinates::Single(Point::new(10.0, 20.0)));
    }

    #[test]
    fn parse_comma_joined_list() {
        let c = parse_coordinates("[1,2], [3.5,-4]").unwrap();
        assert!(matches!(c, Coordinates::Multi(_)));
        assert_eq!(points(&c), vec![(1.0, 2.0), (3.5, -4.0)]);
    }

    #[test]
    fn parse_nested_list() {
        let c = parse_coordinates("[[1,2]]").unwrap();
        assert!(matches!(c, Coordinates::Multi(_)));
        assert_eq!(points(&c), vec![(1.0, 2.0)]);
        let c = parse_coordinates("[ [1,2] , [3,4] ]").unwrap();
        assert_eq!(points(&c), vec![(1.0, 2.0), (3.0, 4.0)]);
    }

    #[test]
    fn reject_invalid_input() {
        assert_eq!(parse_coordinates(""), Err(ParseError::Empty));
        assert_eq!(
            parse_coordinates("10,20"),
            Err(ParseError::ExpectedOpeningBracket(0))
        );
        assert!(matches!(
            parse_coordinates("[1,2,3]"),
            Err(ParseError::Arity(_))
        ));
        assert!(matches!(
            parse_coordinates("[1,x]"),
            Err(ParseError::Number(_))
        ));
        assert!(matches!(
            parse_coordinates("[1,2"),
            Err(ParseError::MissingClosingBracket(_))
        ));
        assert!(matches!(
            parse_coordinates("[1,2] [3,4]"),
            Err(ParseError::Trailing(_))
        ));
        assert!(matches!(
            parse_coordinates("[1,NaN]"),
            Err(ParseError::Number(_))
        ));
    }

    #[test]
    fn parse_format_reproduces_the_points() {
        for input in [
            "[10,20]",
            "[1,2],[3,4]",
            "[-1.25,0.5],[3,4],[3,4]",
            "[[7,8]]",
            "[0.001,1e3]",
        ] {
            let parsed = parse_coordinates(input).unwrap();
            let formatted = format_coordinates(&parsed);
            let reparsed = parse_coordinates(&formatted).unwrap();
            assert_eq!(parsed, reparsed, "{input} -> {formatted}");
        }
    }

    #[test]
    fn format_examples() {
        assert_eq!(
            format_coordinates(&Coordinates::Single(Point::new(10.0, 20.0))),
            "[10,20]"
        );
        let c = parse_coordinates("[1,2],[3,4]").unwrap();
        assert_eq!(format_coordinates(&c), "[[1,2],[3,4]]");
    }
}
