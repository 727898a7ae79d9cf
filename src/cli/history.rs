//! Command history

use anyhow::Result;

use super::output::Output;
use crate::storage::{HistoryFile, Project};

/// Quotes arguments that would not survive a copy-paste back into a shell
pub fn command_line<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.as_ref();
            if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
                format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
            } else {
                arg.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Appends one invocation to the project's history
pub fn record(file: &HistoryFile, line: &str) -> Result<()> {
    if line.trim().is_empty() {
        return Ok(());
    }
    file.append(line)
}

/// Shows the history, or the entry `back` steps before the present
pub fn show(output: &Output, back: Option<usize>, clear: bool) -> Result<()> {
    let project = Project::open_current()?;
    let file = project.history_file();

    if clear {
        file.write_all(&[])?;
        output.success("Command history cleared");
        return Ok(());
    }

    let mut history = file.load()?;
    output.verbose_ctx("history", &format!("{} entries in {}", history.len(), file.path().display()));

    if let Some(steps) = back {
        if steps == 0 {
            anyhow::bail!("--back must be at least 1");
        }
        let mut entry = None;
        for _ in 0..steps {
            entry = history.previous().map(str::to_string);
        }
        let entry = entry.ok_or_else(|| anyhow::anyhow!("No commands in history yet"))?;

        if output.is_json() {
            output.data(&serde_json::json!({ "back": steps, "command": entry }));
        } else {
            println!("{}", entry);
        }
        return Ok(());
    }

    if output.is_json() {
        output.data(&history.entries());
    } else if history.is_empty() {
        println!("No commands in history yet");
    } else {
        let width = history.len().to_string().len();
        for (i, entry) in history.entries().iter().enumerate() {
            println!("{:>width$}  {}", i + 1, entry, width = width);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn plain_arguments_are_joined() {
        assert_eq!(command_line(["employee", "list", "--sort", "id"]), "employee list --sort id");
    }

    #[test]
    fn arguments_with_spaces_are_quoted() {
        assert_eq!(
            command_line(["employee", "list", "--name", "Alex Yeoh", ""]),
            "employee list --name \"Alex Yeoh\" \"\""
        );
        assert_eq!(command_line(["say \"hi\""]), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn blank_lines_are_not_recorded() {
        let dir = TempDir::new().unwrap();
        let file = HistoryFile::new(dir.path().join("history.jsonl"), 10);

        record(&file, "   ").unwrap();
        record(&file, "status").unwrap();

        assert_eq!(file.read_all().unwrap(), vec!["status"]);
    }
}
