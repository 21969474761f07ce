use std::{fs, io::Write};

use serde::Serialize;

use crate::{Error, Result, SolverOptions, metrics::OptimizationResult, solver::SolveReport};

/// JSON document written for a solved problem.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverOutput<'a> {
    #[serde(flatten)]
    result: &'a OptimizationResult,
    strategy: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ordered_ids: Option<Vec<&'a str>>,
}

impl<'a> SolverOutput<'a> {
    pub fn new(report: &'a SolveReport, stop_ids: Option<&'a [String]>) -> Self {
        let result = report.result();
        let ordered_ids = stop_ids.map(|ids| {
            result
                .ordered_stops()
                .iter()
                .map(|&idx| ids.get(idx).map_or("", String::as_str))
                .collect()
        });
        Self {
            result,
            strategy: report.strategy().as_str(),
            ordered_ids,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Writes to `--output`, or stdout when it is unset.
    pub fn write(&self, options: &SolverOptions) -> Result<()> {
        let json = self.to_json(options.pretty)?;
        match options.output_path() {
            Some(path) => fs::write(path, format!("{json}\n")).map_err(|e| {
                Error::other(format!("failed to write output {}: {e}", path.display()))
            }),
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{json}")?;
                Ok(())
            }
        }
    }
}
