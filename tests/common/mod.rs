/// Test utilities for building Zeek log files
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Builder for creating Zeek ASCII log test files
pub struct ZeekLogBuilder {
    separator: char,
    lines: Vec<String>,
}

#[allow(dead_code)]
impl ZeekLogBuilder {
    /// Create a builder with the standard Zeek preamble (tab separator)
    pub fn new() -> Self {
        let mut builder = Self {
            separator: ' ',
            lines: Vec::new(),
        };
        builder.lines.push("#separator \\x09".to_string());
        builder.separator = '\t';
        builder
            .directive("set_separator", &[","])
            .directive("empty_field", &["(empty)"])
            .directive("unset_field", &["-"])
            .directive("path", &["conn"])
    }

    /// Create a builder with no preamble; directives use the default space separator
    pub fn bare() -> Self {
        Self {
            separator: ' ',
            lines: Vec::new(),
        }
    }

    /// Add a `#key value...` line joined with the current separator
    pub fn directive(mut self, key: &str, values: &[&str]) -> Self {
        let mut parts = vec![format!("#{}", key)];
        parts.extend(values.iter().map(|v| v.to_string()));
        self.lines.push(parts.join(&self.separator.to_string()));
        self
    }

    /// Add a `#separator` directive and switch to that separator
    pub fn separator(mut self, directive_value: &str, separator: char) -> Self {
        self = self.directive("separator", &[directive_value]);
        self.separator = separator;
        self
    }

    pub fn fields(self, names: &[&str]) -> Self {
        self.directive("fields", names)
    }

    pub fn types(self, types: &[&str]) -> Self {
        self.directive("types", types)
    }

    /// Add a data row joined with the current separator
    pub fn row(mut self, values: &[&str]) -> Self {
        self.lines.push(values.join(&self.separator.to_string()));
        self
    }

    /// Add a line verbatim
    pub fn raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// Write the log into `dir` and return its path
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path)
            .unwrap()
            .write_all(self.build().as_bytes())
            .unwrap();
        path
    }
}

/// A small conn.log with three connections: tcp, udp, tcp
#[allow(dead_code)]
pub fn conn_log() -> ZeekLogBuilder {
    ZeekLogBuilder::new()
        .directive("open", &["2016-12-24-00-00-00"])
        .fields(&["ts", "uid", "id.orig_h", "id.orig_p", "id.resp_h", "id.resp_p", "proto", "duration", "orig_bytes", "service"])
        .types(&["time", "string", "addr", "port", "addr", "port", "enum", "interval", "count", "string"])
        .row(&["1482538000.000000", "C1", "192.168.1.1", "49152", "10.0.0.1", "80", "tcp", "1.5", "300", "http"])
        .row(&["1482538001.250000", "C2", "192.168.1.2", "53", "8.8.8.8", "53", "udp", "-", "-", "dns"])
        .row(&["1482538002.500000", "C3", "fe80::1", "49153", "10.0.0.2", "443", "tcp", "0.25", "1200", "(empty)"])
        .raw_line("#close\t2016-12-24-00-00-00")
}
