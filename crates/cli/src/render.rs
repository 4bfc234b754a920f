//! Plain-text rendering of controller results.

use humansize::{BINARY, format_size};
use procman::{
    ProcessStatusSnapshot,
    controller::{RunOutput, StartOutcome},
    table::ProcessEntry,
};
use std::io::{self, Write};

/// Two right-aligned columns in a bordered box.
fn table(out: &mut impl Write, header: (&str, &str), rows: &[(String, String)]) -> io::Result<()> {
    let left = rows
        .iter()
        .map(|(k, _)| k.len())
        .chain([header.0.len()])
        .max()
        .unwrap_or_default();
    let right = rows
        .iter()
        .map(|(_, v)| v.len())
        .chain([header.1.len()])
        .max()
        .unwrap_or_default();
    let rule = format!("+-{}-+-{}-+", "-".repeat(left), "-".repeat(right));

    writeln!(out, "{rule}")?;
    writeln!(out, "| {:>left$} | {:>right$} |", header.0, header.1)?;
    writeln!(out, "{rule}")?;
    for (key, value) in rows {
        writeln!(out, "| {key:>left$} | {value:>right$} |")?;
    }
    writeln!(out, "{rule}")
}

pub fn snapshot(
    out: &mut impl Write,
    snapshot: &ProcessStatusSnapshot,
    page_size: u64,
) -> io::Result<()> {
    let mut rows = vec![("Name".to_owned(), snapshot.name.clone())];
    rows.extend(
        snapshot
            .fields()
            .into_iter()
            .map(|(label, value)| (label.to_owned(), value.to_string())),
    );
    rows.push((
        "RSS_size".to_owned(),
        format_size(snapshot.resident_set_bytes(page_size), BINARY),
    ));
    table(out, ("Attribute", "Value"), &rows)
}

pub fn start_outcome(out: &mut impl Write, outcome: &StartOutcome, target_pid: u32) -> io::Result<()> {
    match outcome {
        StartOutcome::Finished(output) => run_output(out, output),
        StartOutcome::AlreadyRunning { child: Some(child) } => writeln!(
            out,
            "Process {target_pid} is already running `{}` (pid {}).",
            child.command, child.pid
        ),
        StartOutcome::AlreadyRunning { child: None } => {
            writeln!(out, "Process {target_pid} is already running.")
        }
    }
}

fn run_output(out: &mut impl Write, output: &RunOutput) -> io::Result<()> {
    writeln!(out, "Subprocess output:")?;
    writeln!(out, "{}", output.stdout)?;
    if !output.stderr.is_empty() {
        writeln!(out, "Subprocess error:")?;
        writeln!(out, "{}", output.stderr)?;
    }
    if !output.success() {
        writeln!(out, "Subprocess {} exited with {}", output.pid, output.status)?;
    }
    Ok(())
}

pub fn processes(
    out: &mut impl Write,
    processes: impl Iterator<Item = ProcessEntry>,
) -> io::Result<()> {
    for process in processes {
        writeln!(out, "PID: {}, Name: {}", process.pid, process.name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    fn sample() -> ProcessStatusSnapshot {
        let mut record = "4242 (demo) S 1".to_owned();
        for i in 4..52 {
            record.push_str(&format!(" {i}"));
        }
        record.parse().unwrap()
    }

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn snapshot_table_is_aligned() {
        let text = rendered(|out| snapshot(out, &sample(), 4096));
        let lines: Vec<&str> = text.lines().collect();

        // rule, header, rule, name + 14 fields + size, rule
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
        assert!(text.contains(" Name |   demo |"));
        assert!(text.contains(" PID |   4242 |"));
        assert!(text.contains(" 0x17 |"));
        assert!(text.contains("92 KiB"));
    }

    #[test]
    fn failed_child_reports_status_and_stderr() {
        let output = RunOutput {
            pid: 9,
            stdout: String::new(),
            stderr: "boom\n".into(),
            status: ExitStatus::from_raw(2 << 8),
        };
        let text = rendered(|out| start_outcome(out, &StartOutcome::Finished(output), 1));
        assert!(text.contains("Subprocess error:\nboom\n"));
        assert!(text.contains("Subprocess 9 exited with exit status: 2"));
    }

    #[test]
    fn already_running_names_the_child() {
        let outcome = StartOutcome::AlreadyRunning {
            child: Some(procman::controller::ChildHandle {
                pid: 77,
                command: "sleep 5".into(),
            }),
        };
        let text = rendered(|out| start_outcome(out, &outcome, 1));
        assert_eq!(text, "Process 1 is already running `sleep 5` (pid 77).\n");
    }

    #[test]
    fn process_listing() {
        let entries = vec![ProcessEntry {
            pid: 3,
            name: "bash".into(),
            owner: Some("alice".into()),
        }];
        let text = rendered(|out| processes(out, entries.into_iter()));
        assert_eq!(text, "PID: 3, Name: bash\n");
    }
}
