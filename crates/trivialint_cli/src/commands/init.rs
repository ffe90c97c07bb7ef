//! Init command implementation

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tracing::info;
use trivialint_core::{DEFAULT_MAX_LINE_LENGTH, LinterConfig};

pub fn run_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(LinterConfig::CONFIG_FILES[0]);

    let default_config = format!(
        r#"{{
  // "off", "info", "warning", "error" or true / false per rule id
  "options": {{}},
  "max_line_length": {DEFAULT_MAX_LINE_LENGTH},
  "extension_methods": [],
  "exclude": [],
  "overrides": []
}}
"#
    );

    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    match options.open(&config_path) {
        Ok(mut file) => {
            file.write_all(default_config.as_bytes()).into_diagnostic()?;
            info!("Created {}", config_path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(miette::miette!(
            "Config file already exists. Use --force to overwrite."
        )),
        Err(e) => Err(e).into_diagnostic(),
    }
}
