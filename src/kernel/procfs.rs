/// Process table lookups through /proc
use nix::unistd::Pid;
use std::fs;

/// Fields of `/proc/<pid>/stat` the executor needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcStat {
    pub state: char,
    pub pgrp: i32,
}

impl ProcStat {
    /// False for zombies and dead tasks
    pub fn is_live(&self) -> bool {
        !matches!(self.state, 'Z' | 'X' | 'x')
    }
}

/// Parse the contents of a `/proc/<pid>/stat` file.
///
/// The command name may itself contain spaces and parentheses, so fields are
/// read after the last `)`.
pub fn parse_stat(content: &str) -> Option<ProcStat> {
    let rest = &content[content.rfind(')')? + 1..];
    let mut fields = rest.split_whitespace();

    let state = fields.next()?.chars().next()?;
    let _ppid = fields.next()?;
    let pgrp = fields.next()?.parse().ok()?;

    Some(ProcStat { state, pgrp })
}

pub fn read_stat(pid: Pid) -> Option<ProcStat> {
    let content = fs::read_to_string(format!("/proc/{}/stat", pid)).ok()?;
    parse_stat(&content)
}

/// Live (non-zombie) processes whose process group is `pgid`
pub fn live_group_members(pgid: Pid) -> Vec<Pid> {
    let entries = match fs::read_dir("/proc") {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("cannot scan /proc for group {}: {}", pgid, e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str()?.parse::<i32>().ok())
        .map(Pid::from_raw)
        .filter(|pid| {
            read_stat(*pid)
                .map(|stat| stat.pgrp == pgid.as_raw() && stat.is_live())
                .unwrap_or(false)
        })
        .collect()
}
