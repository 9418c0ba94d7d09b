use crate::dri::Dri;
use crate::error::Error;

/// Bold ANSI escape for headings.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
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
/// Each variant produces a block with what happened, why, and how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::LockfileNotFound { .. } => render_lockfile_not_found(),
        Error::EncodingCollision { key, first, second } => render_encoding_collision(key, first, second),
        Error::MalformedDri { reason } => render_malformed_dri(reason),
        _ => render_generic(e),
    }
}

/// Short diagnostics for variants with no fix to suggest.
fn render_generic(e: &Error) -> String {
    match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::LockfileCorrupt { reason } => format!("\
# Error: Lockfile Corrupt

{reason}

## Fix

Regenerate the lockfile:

    dri init <inputs>
"),

        Error::UnsupportedInput { path } => format!("\
# Error: Unsupported Input

`{}` is not a `.toml` or `.json` identifier file.
", path.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Json(e) => format!("\
# Error: Invalid JSON

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}
"),
        Error::TomlSer(e) => format!("\
# Error: TOML Serialization

{e}
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_lockfile_not_found() -> String {
    "\
# Error: Lockfile Not Found

`.dri.lock` does not exist.

## Fix

Run `dri init` on your identifier files to generate the lockfile:

    dri init <inputs>
"
    .to_string()
}

fn render_encoding_collision(key: &str, first: &Dri, second: &Dri) -> String {
    format!("\
# Error: Encoding Collision

Two distinct identifiers encode to `{key}`:

- `{first:?}`
- `{second:?}`

## Fix

Canonical slots are separated by `/`. Check that no package, class, or
callable name contains `/`.
")
}

fn render_malformed_dri(reason: &str) -> String {
    format!("\
# Error: Malformed DRI

{reason}
")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_lists_both_identifiers() {
        let e = Error::EncodingCollision {
            first: Box::new(Dri::new("a", Some("b/c"))),
            key: "a/b/c///PointingToDeclaration/".to_string(),
            second: Box::new(Dri::new("a/b", Some("c"))),
        };
        let md = render_error(&e);
        assert!(md.starts_with("# Error: Encoding Collision"));
        assert!(md.contains("`a/b/c///PointingToDeclaration/`"));
        assert!(md.contains("\"b/c\""));
    }

    #[test]
    fn malformed_names_reason() {
        let md = render_error(&Error::MalformedDri { reason: "no class".to_string() });
        assert!(md.contains("# Error: Malformed DRI"));
        assert!(md.contains("no class"));
    }
}
