//! INI-style configuration for building a [`Logger`] from a file.
//!
//! ```ini
//! # minilog.ini
//! [timestamp]
//! bracketed = true
//!
//! [sink.console]
//! target = stderr
//! levels = warn|error|fatal
//! options = level|timestamp|colorize
//!
//! [sink.file]
//! target = file
//! path = ~/logs/app.log
//! levels = all
//! options = level|timestamp
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::log::{
    LevelFilter, LogError, Logger, OutputOptions, Result, Sink, Stream, TimestampFormat,
};

const SINK_SECTION_PREFIX: &str = "sink.";
const TIMESTAMP_SECTION: &str = "timestamp";

#[derive(Debug, Default)]
pub struct Config {
    pub globals: HashMap<String, String>,
    pub sections: HashMap<String, HashMap<String, String>>,
    /// Section names in the order they first appear.
    section_order: Vec<String>,
}

impl Config {
    /// # Errors
    ///
    /// [`LogError::Io`] if the file cannot be read.
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parses `# comments`, `[section]` headers and `key = value` lines.
    /// Surrounding double quotes are stripped from values; other lines are ignored.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut config = Self::empty();
        let mut current_section: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                let name = line[1..line.len() - 1].trim().to_string();
                if !config.sections.contains_key(&name) {
                    config.section_order.push(name.clone());
                    config.sections.insert(name.clone(), HashMap::new());
                }
                current_section = Some(name);
                continue;
            }

            if let Some(pos) = line.find('=') {
                let key = line[..pos].trim().to_string();
                let value = line[pos + 1..].trim().trim_matches('"').to_string();

                match &current_section {
                    None => {
                        config.globals.insert(key, value);
                    }
                    Some(sec) => {
                        config.sections.entry(sec.clone()).or_default().insert(key, value);
                    }
                }
            }
        }
        config
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            globals: HashMap::new(),
            sections: HashMap::new(),
            section_order: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sec| sec.get(key))
            .map(|s| s.as_str())
    }

    #[must_use]
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn get_global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(|s| s.as_str())
    }

    #[must_use]
    pub fn get_or_default<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key)
            .or_else(|| self.get_global(key))
            .unwrap_or(default)
    }

    /// Section names in declaration order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.section_order.iter().map(String::as_str)
    }

    /// The `[timestamp]` section, or the default format when absent.
    ///
    /// # Errors
    ///
    /// [`LogError::Config`] if a separator is not exactly one character or
    /// `bracketed` is not `true`/`false`.
    pub fn timestamp_format(&self) -> Result<TimestampFormat> {
        let mut format = TimestampFormat::default();
        if let Some(c) = self.get(TIMESTAMP_SECTION, "date_separator") {
            format.date_separator = single_char("date_separator", c)?;
        }
        if let Some(c) = self.get(TIMESTAMP_SECTION, "time_separator") {
            format.time_separator = single_char("time_separator", c)?;
        }
        if let Some(c) = self.get(TIMESTAMP_SECTION, "separator") {
            format.separator = single_char("separator", c)?;
        }
        if let Some(b) = self.get(TIMESTAMP_SECTION, "bracketed") {
            format.bracketed = b.parse().map_err(|_| {
                LogError::Config(format!("bracketed must be true or false, got {b:?}"))
            })?;
        }
        Ok(format)
    }

    /// Builds one sink per `[sink.<name>]` section, in declaration order.
    ///
    /// # Errors
    ///
    /// [`LogError::Config`] for an unknown target or a file sink without a
    /// path, [`LogError::UnknownLevel`]/[`LogError::UnknownOption`] for bad
    /// lists, [`LogError::OpenFile`] if a file cannot be opened.
    pub fn build_sinks(&self) -> Result<Vec<(String, Sink)>> {
        self.section_names()
            .filter_map(|section| {
                section
                    .strip_prefix(SINK_SECTION_PREFIX)
                    .map(|name| (section, name))
            })
            .map(|(section, name)| {
                self.build_sink(section)
                    .map(|sink| (name.to_string(), sink))
            })
            .collect()
    }

    fn build_sink(&self, section: &str) -> Result<Sink> {
        let levels: LevelFilter = self.get_or_default(section, "levels", "all").parse()?;
        let options: OutputOptions = self.get_or_default(section, "options", "all").parse()?;

        let target = self.get_or_default(section, "target", "stdout");
        let stream = match target.to_ascii_lowercase().as_str() {
            "stdout" => Stream::Stdout,
            "stderr" => Stream::Stderr,
            "stdlog" => Stream::Stdlog,
            "file" => {
                let path = self.get_non_empty(section, "path").ok_or_else(|| {
                    LogError::Config(format!("[{section}] file target needs a path"))
                })?;
                return Sink::open(expand_path(path), options, levels);
            }
            other => {
                return Err(LogError::Config(format!(
                    "[{section}] unknown target {other:?}"
                )));
            }
        };
        Ok(Sink::new(stream, options, levels))
    }
}

impl Logger {
    /// A logger with the sinks and timestamp format described by `config`.
    ///
    /// # Errors
    ///
    /// See [`Config::build_sinks`] and [`Config::timestamp_format`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let logger = Logger::new();
        logger.set_timestamp_format(config.timestamp_format()?);
        for (name, sink) in config.build_sinks()? {
            logger.add_sink(name, sink);
        }
        Ok(logger)
    }
}

fn single_char(key: &str, value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(LogError::Config(format!(
            "{key} must be a single character, got {value:?}"
        ))),
    }
}

/// Expands tilde (`~`) in file paths to the user's home directory.
fn expand_path(path_str: &str) -> PathBuf {
    if path_str.starts_with('~') {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()
            .map(PathBuf::from);

        if let Some(mut home_path) = home {
            if path_str == "~" {
                return home_path;
            }
            if let Some(rest) = path_str
                .strip_prefix("~/")
                .or_else(|| path_str.strip_prefix("~\\"))
            {
                home_path.push(rest);
                return home_path;
            }
        }
    }
    PathBuf::from(path_str)
}
