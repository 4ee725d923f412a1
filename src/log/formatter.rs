//! `{}` placeholder substitution.
//!
//! Arguments are consumed strictly left to right. `{{}}` produces a literal
//! `{}` and consumes nothing. Extra arguments are ignored; once a placeholder
//! has no argument left, the rest of the template is copied untouched.

use std::fmt::{Display, Write};

const PLACEHOLDER: &str = "{}";
const ESCAPED_PLACEHOLDER: &str = "{{}}";

/// Substitutes `args` into the `{}` placeholders of `template`.
///
/// # Example
///
/// ```rust
/// use minilog::log::formatter::format_message;
///
/// assert_eq!(format_message("x={}, y={}", &[&1, &2]), "x=1, y=2");
/// assert_eq!(format_message("literal {{}} end", &[&5]), "literal {} end");
/// ```
#[must_use]
pub fn format_message(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut args = args.iter();
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with(ESCAPED_PLACEHOLDER) {
            out.push_str(PLACEHOLDER);
            rest = &tail[ESCAPED_PLACEHOLDER.len()..];
        } else if tail.starts_with(PLACEHOLDER) {
            match args.next() {
                Some(arg) => {
                    // Writing into a String cannot fail.
                    let _ = write!(out, "{arg}");
                    rest = &tail[PLACEHOLDER.len()..];
                }
                None => {
                    out.push_str(tail);
                    return out;
                }
            }
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}
