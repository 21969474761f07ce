use std::{fs, io::Read};

use route_order_derive::KvDisplay;
use serde::Deserialize;

use crate::{Error, Result, SolverOptions, matrix::CostMatrix};

/// A problem file: the cost matrix, the fixed stops and optional stop ids.
#[derive(Clone, Debug, Deserialize, KvDisplay)]
#[serde(deny_unknown_fields)]
pub struct SolverInput {
    #[kv(fmt = "len")]
    matrix: CostMatrix,
    #[serde(default)]
    start: usize,
    #[serde(default)]
    #[kv(fmt = "debug")]
    end: Option<usize>,
    #[serde(default)]
    #[kv(fmt = "len")]
    stops: Vec<String>,
}

impl SolverInput {
    pub fn new(matrix: CostMatrix, start: usize, end: Option<usize>) -> Self {
        Self {
            matrix,
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Attaches caller ids, one per matrix row, used to label the result.
    pub fn with_stop_ids(mut self, stops: Vec<String>) -> Result<Self> {
        self.stops = stops;
        self.check_stop_ids()?;
        Ok(self)
    }

    /// Reads the problem from `--input`, or stdin when it is unset.
    pub fn from_options(options: &SolverOptions) -> Result<Self> {
        let raw = match options.input_path() {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::invalid_input(format!("failed to read input {}: {e}", path.display()))
            })?,
            None => {
                let mut raw = String::new();
                std::io::stdin().read_to_string(&mut raw)?;
                raw
            }
        };
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::invalid_input("No problem provided on input."));
        }
        let input: Self = serde_json::from_str(raw)?;
        input.check_stop_ids()?;
        Ok(input)
    }

    pub fn matrix(&self) -> &CostMatrix {
        &self.matrix
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> Option<usize> {
        self.end
    }

    pub fn stop_ids(&self) -> Option<&[String]> {
        if self.stops.is_empty() {
            None
        } else {
            Some(&self.stops)
        }
    }

    fn check_stop_ids(&self) -> Result<()> {
        if !self.stops.is_empty() && self.stops.len() != self.matrix.len() {
            return Err(Error::invalid_input(format!(
                "stops lists {} ids but the matrix has {} rows",
                self.stops.len(),
                self.matrix.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SolverInput;
    use crate::{Error, matrix::CostMatrix};

    const TWO_STOPS: &str = r#"[[{"duration":0,"distance":0},{"duration":60,"distance":900}],
                               [{"duration":75,"distance":950},{"duration":0,"distance":0}]]"#;

    #[test]
    fn parse_defaults_start_and_end() {
        let input = SolverInput::parse(&format!(r#"{{"matrix": {TWO_STOPS}}}"#)).expect("parse");

        assert_eq!(input.matrix().len(), 2);
        assert_eq!(input.start(), 0);
        assert_eq!(input.end(), None);
        assert!(input.stop_ids().is_none());
    }

    #[test]
    fn parse_reads_end_and_stop_ids() {
        let input = SolverInput::parse(&format!(
            r#"{{"matrix": {TWO_STOPS}, "start": 0, "end": 1, "stops": ["home", "office"]}}"#
        ))
        .expect("parse");

        assert_eq!(input.end(), Some(1));
        assert_eq!(
            input.stop_ids(),
            Some(&["home".to_string(), "office".to_string()][..])
        );
    }

    #[test]
    fn parse_accepts_explicit_null_end() {
        let input = SolverInput::parse(&format!(r#"{{"matrix": {TWO_STOPS}, "end": null}}"#))
            .expect("parse");
        assert_eq!(input.end(), None);
    }

    #[test]
    fn parse_rejects_mismatched_stop_ids() {
        let err = SolverInput::parse(&format!(r#"{{"matrix": {TWO_STOPS}, "stops": ["a"]}}"#))
            .expect_err("one id for two rows");
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("stops lists 1 ids"));
    }

    #[test]
    fn parse_rejects_empty_and_malformed_json() {
        let empty = SolverInput::parse("  \n").expect_err("empty input");
        assert!(empty.to_string().contains("No problem provided"));

        let malformed = SolverInput::parse(r#"{"matrix": [[{"duration": "fast"}]]}"#)
            .expect_err("bad cell");
        assert!(matches!(malformed, Error::Json(_)));

        let unknown = SolverInput::parse(&format!(r#"{{"matrix": {TWO_STOPS}, "tolls": true}}"#))
            .expect_err("unknown field");
        assert!(matches!(unknown, Error::Json(_)));
    }

    #[test]
    fn with_stop_ids_checks_length() {
        let matrix = CostMatrix::from_durations(&[vec![0.0, 1.0], vec![1.0, 0.0]]);
        assert!(
            SolverInput::new(matrix.clone(), 0, None)
                .with_stop_ids(vec!["a".into(), "b".into()])
                .is_ok()
        );
        assert!(
            SolverInput::new(matrix, 0, None)
                .with_stop_ids(vec!["a".into()])
                .is_err()
        );
    }

    #[test]
    fn display_summarizes_sizes() {
        let input = SolverInput::parse(&format!(r#"{{"matrix": {TWO_STOPS}, "end": 1}}"#))
            .expect("parse");
        let rendered = input.to_string();

        assert!(rendered.contains("matrix = 2"));
        assert!(rendered.contains("end    = Some(1)"));
    }
}
