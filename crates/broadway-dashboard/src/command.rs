//! Prompt commands standing in for the dashboard controls.

use crate::error::{DashboardError, DashboardResult};

/// Help text listing every prompt command.
pub const HELP: &str = "\
Commands:
  top <n>         number of ranked shows (slider)
  metric <name>   ranking metric: Average Gross per Week | Total Revenue | Running Weeks
  show            print the current views
  help            print this help
  quit            leave the dashboard";

/// One parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    Top(i64),
    Metric(String),
    Show,
    Help,
    Quit,
}

impl PromptCommand {
    /// Parses a prompt line; blank lines yield `None`.
    pub fn parse(line: &str) -> DashboardResult<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match head.to_ascii_lowercase().as_str() {
            "top" | "n" => match rest.as_slice() {
                [n] => Self::Top(n.parse().map_err(|_| DashboardError::Usage("top <n>"))?),
                _ => return Err(DashboardError::Usage("top <n>")),
            },
            "metric" | "m" => {
                if rest.is_empty() {
                    return Err(DashboardError::Usage("metric <name>"));
                }
                Self::Metric(rest.join(" "))
            }
            "show" | "status" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(DashboardError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}
