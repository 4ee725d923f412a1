use crate::log::{log_level::LogLevel, output_options::OutputOptions};

const RESET: &str = "\x1b[0m";
const TIMESTAMP_COLOR: &str = "\x1b[1;30m";

/// Composes `[timestamp ][levelTag ]body` for one destination.
///
/// The timestamp always precedes the level tag. With `colorize`, each present
/// segment is wrapped in a reset + color pair and followed by a reset.
#[must_use]
pub fn compose(
    options: OutputOptions,
    colorize: bool,
    timestamp: &str,
    level: LogLevel,
    body: &str,
) -> String {
    let mut line = String::with_capacity(timestamp.len() + body.len() + 32);

    if options.contains(OutputOptions::WITH_TIMESTAMP) {
        if colorize {
            line.push_str(RESET);
            line.push_str(TIMESTAMP_COLOR);
        }
        line.push_str(timestamp);
        if colorize {
            line.push_str(RESET);
        }
        line.push(' ');
    }

    if options.contains(OutputOptions::WITH_LEVEL) {
        if colorize {
            line.push_str(RESET);
            line.push_str(level.color_code());
        }
        line.push_str(level.tag());
        if colorize {
            line.push_str(RESET);
        }
        line.push(' ');
    }

    line.push_str(body);
    line
}
