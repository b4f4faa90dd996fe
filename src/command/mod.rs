//! Command templates and per-dispatch argument vectors.
//!
//! The configured command string is split once with shell quoting rules
//! into a program plus fixed leading arguments. Each dispatch then appends
//! the work item's token and bookkeeping flags (`--ppid`, `--pid`,
//! `--alias`) as separate argv elements, so argument boundaries are never
//! ambiguous.

use crate::error::{Result, RunlistError};
use crate::items::WorkItem;

/// Parsed command template: program name plus fixed leading arguments.
///
/// Immutable for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    /// Program to execute.
    pub program: String,
    /// Fixed arguments that precede the per-item arguments, in order.
    pub args: Vec<String>,
}

impl CommandTemplate {
    /// Parse a command string with shell quoting rules.
    ///
    /// The first token is the program; any remaining tokens are fixed
    /// leading arguments. An empty or unparsable command is a
    /// configuration error.
    pub fn parse(cmd: &str) -> Result<Self> {
        let tokens = shell_words::split(cmd).map_err(|e| {
            RunlistError::Config(format!(
                "failed to parse command template '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                cmd, e
            ))
        })?;

        let mut tokens = tokens.into_iter();
        let Some(program) = tokens.next() else {
            return Err(RunlistError::Config(
                "command template is empty; pass --cmd or set cmd in the config file".to_string(),
            ));
        };

        Ok(Self {
            program,
            args: tokens.collect(),
        })
    }
}

/// Build the concrete argv for one dispatch.
///
/// Layout: template tokens first, then the item token, then `--ppid` with
/// the supervisor's process id, `--pid` with the logical worker id, and
/// `--alias` with the item's derived alias. Every flag and value is its own
/// element. No validation of template or item content; any string is
/// accepted.
pub fn build_argv(
    template: &CommandTemplate,
    item: &WorkItem,
    parent_pid: u32,
    worker_id: usize,
) -> Vec<String> {
    let mut argv = Vec::with_capacity(template.args.len() + 8);
    argv.push(template.program.clone());
    argv.extend(template.args.iter().cloned());
    argv.push(item.token.clone());
    argv.push("--ppid".to_string());
    argv.push(parent_pid.to_string());
    argv.push("--pid".to_string());
    argv.push(worker_id.to_string());
    argv.push("--alias".to_string());
    argv.push(item.alias.clone());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_token() {
        let template = CommandTemplate::parse("checker").unwrap();
        assert_eq!(template.program, "checker");
        assert!(template.args.is_empty());
    }

    #[test]
    fn parse_with_fixed_arguments() {
        let template = CommandTemplate::parse("checker --max 60 -v").unwrap();
        assert_eq!(template.program, "checker");
        assert_eq!(template.args, vec!["--max", "60", "-v"]);
    }

    #[test]
    fn parse_respects_quoting() {
        let template = CommandTemplate::parse("sh -c 'sleep 1; exit 0'").unwrap();
        assert_eq!(template.program, "sh");
        assert_eq!(template.args, vec!["-c", "sleep 1; exit 0"]);
    }

    #[test]
    fn parse_empty_is_a_config_error() {
        let err = CommandTemplate::parse("   ").unwrap_err();
        assert!(err.to_string().contains("command template is empty"));
    }

    #[test]
    fn parse_unmatched_quote_is_a_config_error() {
        let err = CommandTemplate::parse("echo \"unmatched").unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn argv_appends_item_and_bookkeeping_as_separate_elements() {
        let template = CommandTemplate::parse("checker --max 60").unwrap();
        let item = WorkItem::new("http://a/b");

        let argv = build_argv(&template, &item, 4242, 7);
        assert_eq!(
            argv,
            vec![
                "checker", "--max", "60", "http://a/b", "--ppid", "4242", "--pid", "7", "--alias",
                "http-__a_b",
            ]
        );
    }

    #[test]
    fn argv_without_fixed_arguments() {
        let template = CommandTemplate::parse("checker").unwrap();
        let item = WorkItem::new("x");

        let argv = build_argv(&template, &item, 1, 0);
        assert_eq!(
            argv,
            vec!["checker", "x", "--ppid", "1", "--pid", "0", "--alias", "x"]
        );
    }
}
