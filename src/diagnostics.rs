use crate::config::CONFIG_FILE;
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one,
/// how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::MultipleUnits { count } => render_multiple_units(*count),
        Error::NoUnits => render_no_units(),
        Error::ConfigInvalid { reason } => render_config_invalid(reason),
        _ => render_generic(e),
    };
}

fn render_generic(e: &Error) -> String {
    return match e {
        Error::Json(e) => format!("\
# Error: Invalid Request

The JSON on stdin could not be decoded: {e}
"),

        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

`{CONFIG_FILE}` is malformed: {e}
"),

        Error::Walk(e) => format!("\
# Error: Directory Walk

{e}
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        _ => format!("\
# Error

{e}
"),
    };
}

fn render_multiple_units(count: usize) -> String {
    return format!("\
# Error: Multiple Units

`build-graph` received {count} source units; it graphs exactly one.

## Fix

Pass the single unit printed by:

    selgraph discover
");
}

fn render_no_units() -> String {
    return "\
# Error: No Units

`build-graph` received an empty unit list.

## Fix

Pipe the output of discover into build-graph:

    selgraph discover | selgraph build-graph
"
    .to_string();
}

fn render_config_invalid(reason: &str) -> String {
    return format!("\
# Error: Invalid Config

{reason}

## Fix

Edit `{CONFIG_FILE}` or remove the offending key to use its default.
");
}
