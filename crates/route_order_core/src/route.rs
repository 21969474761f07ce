use std::fmt;

use crate::{Error, Result};

/// How a route finishes.
///
/// `ReturnToStart` (no end given) and `EndAtStart` (end given as the start)
/// route identically; both close back on the start stop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EndConstraint {
    ReturnToStart,
    EndAtStart,
    EndAt(usize),
}

impl EndConstraint {
    pub fn from_index(start: usize, end: Option<usize>) -> Self {
        match end {
            None => Self::ReturnToStart,
            Some(end) if end == start => Self::EndAtStart,
            Some(end) => Self::EndAt(end),
        }
    }

    pub fn closing_index(self, start: usize) -> usize {
        match self {
            Self::ReturnToStart | Self::EndAtStart => start,
            Self::EndAt(end) => end,
        }
    }

    /// The reserved last stop of an open route.
    pub fn fixed_end(self) -> Option<usize> {
        match self {
            Self::EndAt(end) => Some(end),
            Self::ReturnToStart | Self::EndAtStart => None,
        }
    }

    pub fn is_closed(self) -> bool {
        self.fixed_end().is_none()
    }
}

impl fmt::Display for EndConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReturnToStart => f.write_str("return-to-start"),
            Self::EndAtStart => f.write_str("start"),
            Self::EndAt(end) => write!(f, "stop:{end}"),
        }
    }
}

/// Ordered stop indices produced by a solver, start first and closing stop last.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Route {
    stops: Vec<usize>,
}

impl Route {
    pub fn new(stops: Vec<usize>) -> Self {
        Self { stops }
    }

    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    pub fn into_stops(self) -> Vec<usize> {
        self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Verifies that every stop in `0..n` is visited exactly once, the route
    /// starts at `start`, and it finishes as `end` requires.
    pub fn check(&self, n: usize, start: usize, end: EndConstraint) -> Result<()> {
        if self.is_empty() {
            return Err(invariant("route is empty".to_string()));
        }
        let expected_len = if end.is_closed() { n + 1 } else { n };
        if self.stops.len() != expected_len {
            return Err(invariant(format!(
                "expected {expected_len} stops, got {}",
                self.stops.len()
            )));
        }
        if self.stops.first() != Some(&start) {
            return Err(invariant(format!("route must start at stop {start}")));
        }
        let close = end.closing_index(start);
        if self.stops.last() != Some(&close) {
            return Err(invariant(format!("route must finish at stop {close}")));
        }

        let visits = if end.is_closed() {
            &self.stops[..n]
        } else {
            &self.stops[..]
        };
        let mut seen = vec![false; n];
        for &stop in visits {
            match seen.get_mut(stop) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => return Err(invariant(format!("stop {stop} is visited twice"))),
                None => return Err(invariant(format!("stop {stop} is out of range"))),
            }
        }

        Ok(())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, stop) in self.stops.iter().enumerate() {
            if idx > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{stop}")?;
        }
        Ok(())
    }
}

fn invariant(message: String) -> Error {
    Error::other(format!("route invariant violated: {message}"))
}
