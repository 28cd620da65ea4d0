use std::fmt::Write;

/// Build a command line whose last argument is always the trailing segment.
///
/// Middle arguments are written as-is; the final one is colon-prefixed.
pub(super) fn cmd_freeform(cmd: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(cmd.len() + args.iter().map(|a| a.len() + 2).sum::<usize>());
    out.push_str(cmd);
    if let Some((suffix, middle)) = args.split_last() {
        for arg in middle {
            out.push(' ');
            out.push_str(arg);
        }
        let _ = write!(out, " :{}", suffix);
    }
    out
}

/// Build a command line of plain space-separated tokens.
pub(super) fn cmd_middle(cmd: &str, args: &[&str]) -> String {
    let mut out = String::from(cmd);
    for arg in args {
        out.push(' ');
        out.push_str(arg);
    }
    out
}
