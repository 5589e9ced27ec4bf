//! Data script generation
//!
//! The editor lookup feature loads the table as a JavaScript object literal:
//!
//! ```text
//! const stlData = {
//! 	"vector::begin": "container/vector/begin",
//! 	"sort": "algorithm/sort"
//! };
//! ```
//!
//! Keys are qualified names without the root namespace, values are links
//! without the site's documentation prefix.

use crate::output::traits::{OutputResult, TableSink};
use crate::symbols::TokenLink;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the table as a `const stlData = {...};` script
#[derive(Debug, Clone)]
pub struct ScriptWriter {
    path: PathBuf,
    namespace_prefix: String,
    link_prefix: String,
}

impl ScriptWriter {
    /// Creates a writer for `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Destination file
    /// * `namespace` - Root namespace stripped from keys (`std` strips `std::`)
    /// * `link_prefix` - Prefix stripped from values
    pub fn new(path: impl Into<PathBuf>, namespace: &str, link_prefix: &str) -> Self {
        Self {
            path: path.into(),
            namespace_prefix: format!("{}::", namespace),
            link_prefix: link_prefix.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Key written for an entry
    fn short_name<'a>(&self, token: &'a TokenLink) -> &'a str {
        token
            .qualified_name
            .strip_prefix(self.namespace_prefix.as_str())
            .unwrap_or(&token.qualified_name)
    }

    /// Value written for an entry
    fn relative_link<'a>(&self, token: &'a TokenLink) -> &'a str {
        token
            .link
            .strip_prefix(self.link_prefix.as_str())
            .unwrap_or(&token.link)
    }
}

impl TableSink for ScriptWriter {
    fn render(&self, table: &[TokenLink]) -> OutputResult<String> {
        let mut script = String::from("const stlData = {");

        let mut entries = Vec::with_capacity(table.len());
        for token in table {
            entries.push(format!(
                "\n\t{}: {}",
                serde_json::to_string(self.short_name(token))?,
                serde_json::to_string(self.relative_link(token))?
            ));
        }
        script.push_str(&entries.join(","));

        script.push_str("\n};");
        Ok(script)
    }

    fn persist(&self, rendered: &str) -> OutputResult<()> {
        let mut file = File::create(&self.path)?;
        file.write_all(rendered.as_bytes())?;
        Ok(())
    }
}
