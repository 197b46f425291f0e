// File: ./src/cli.rs
//! Command-line parsing and help text for the `sheetwatch` binary.
use crate::report::ReportKind;
use anyhow::{Result, anyhow, bail};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Report(ReportKind),
    /// Classified tasks as JSON.
    Tasks,
    Refresh,
    Status,
    Init,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub force_refresh: bool,
    pub caller: Option<i64>,
    pub command: Command,
}

/// Parses `args` (without the program name).
pub fn parse_args<I, S>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut root = None;
    let mut verbose = false;
    let mut force_refresh = false;
    let mut caller = None;
    let mut help = false;
    let mut positional: Vec<String> = Vec::new();

    let mut iter = args.into_iter().map(Into::into);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-r" | "--root" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("{} expects a path", arg))?;
                root = Some(PathBuf::from(value));
            }
            "-v" | "--verbose" => verbose = true,
            "--refresh" => force_refresh = true,
            "--caller" => {
                let value = iter.next().ok_or_else(|| anyhow!("--caller expects an id"))?;
                let id = value
                    .parse::<i64>()
                    .map_err(|_| anyhow!("Invalid caller id '{}'", value))?;
                caller = Some(id);
            }
            "-h" | "--help" => help = true,
            _ => positional.push(arg),
        }
    }

    if help {
        return Ok(CliArgs {
            root,
            verbose,
            force_refresh,
            caller,
            command: Command::Help,
        });
    }

    let mut words = positional.into_iter();
    let command = match words.next().as_deref() {
        None | Some("help") => Command::Help,
        Some("daily") => Command::Report(ReportKind::Daily),
        Some("weekly") => Command::Report(ReportKind::Weekly),
        Some("today") => Command::Report(ReportKind::Today),
        Some("overdue") => Command::Report(ReportKind::OverdueByPerson),
        Some("due-soon") => Command::Report(ReportKind::DueSoon),
        Some("search") => {
            let keyword = words.by_ref().collect::<Vec<_>>().join(" ");
            if keyword.trim().is_empty() {
                bail!("search expects a keyword");
            }
            Command::Report(ReportKind::Search(keyword))
        }
        Some("tasks") => Command::Tasks,
        Some("refresh") => Command::Refresh,
        Some("status") => Command::Status,
        Some("init") => Command::Init,
        Some(other) => bail!("Unknown command '{}'. Try 'sheetwatch help'.", other),
    };

    if let Some(extra) = words.next() {
        bail!("Unexpected argument '{}'", extra);
    }

    Ok(CliArgs {
        root,
        verbose,
        force_refresh,
        caller,
        command,
    })
}

pub fn print_help(binary_name: &str) {
    println!(
        "Sheetwatch v{} - Deadline reports for spreadsheet task lists",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] <COMMAND>", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    daily                 Full morning digest of open tasks");
    println!("    weekly                Completed this week, overdue top 10, per-person stats");
    println!("    today                 Overdue and due today (plus a peek at tomorrow)");
    println!("    overdue               Overdue tasks grouped by person");
    println!("    due-soon              Tasks due in the next 1-3 days");
    println!("    search <keyword>      Find tasks by person name or description");
    println!("    tasks                 Print classified tasks as JSON");
    println!("    refresh               Drop cached rows and fetch the sheet again");
    println!("    status                Show the clock, source and cache TTL");
    println!("    init                  Write a default config file");
    println!("    help                  Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    --refresh             Bypass the cache for this command.");
    println!("    --caller <id>         Identify the requester for the allow-list.");
    println!("    -v, --verbose         Debug logging on stderr.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("STATUS BUCKETS:");
    println!("    Overdue               Past the deadline");
    println!("    Due today             Deadline is today");
    println!("    Due tomorrow          Deadline is tomorrow");
    println!("    Due in 2-3 days       Deadline two or three days out");
    println!("    On track              Four or more days left, or already completed");
    println!("    No deadline           Deadline cell empty or unreadable");
    println!();
    println!("DATE FORMATS:");
    println!("    25/12/2024, 5/3/2024, 2024-12-25, 2024-3-5, or a sheet day serial (45651)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_commands() {
        let args = parse_args(["--refresh", "daily"]).unwrap();
        assert!(args.force_refresh);
        assert_eq!(args.command, Command::Report(ReportKind::Daily));

        let args = parse_args(["overdue"]).unwrap();
        assert_eq!(args.command, Command::Report(ReportKind::OverdueByPerson));
    }

    #[test]
    fn test_search_joins_words() {
        let args = parse_args(["search", "quarterly", "report", "--caller", "-1001"]).unwrap();
        assert_eq!(
            args.command,
            Command::Report(ReportKind::Search("quarterly report".to_string()))
        );
        assert_eq!(args.caller, Some(-1001));
    }

    #[test]
    fn test_root_and_help() {
        let args = parse_args(["--root", "/tmp/x"]).unwrap();
        assert_eq!(args.root, Some(PathBuf::from("/tmp/x")));
        assert_eq!(args.command, Command::Help);

        let args = parse_args(["today", "-h"]).unwrap();
        assert_eq!(args.command, Command::Help);

        let err = parse_args(["today", "tomorrow"]).unwrap_err();
        assert!(err.to_string().contains("Unexpected argument"));
    }

    #[test]
    fn test_errors() {
        assert!(parse_args(["search"]).is_err());
        assert!(parse_args(["frobnicate"]).is_err());
        assert!(parse_args(["--root"]).is_err());
        assert!(parse_args(["--caller", "abc", "today"]).is_err());
    }
}
