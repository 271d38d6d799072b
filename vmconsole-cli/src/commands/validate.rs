//! `validate` command: check a descriptor without connecting.

use std::path::Path;

use crate::error::CliError;
use crate::util;

/// Validates every option in a descriptor and reports per-option results.
pub fn cmd_validate(file: Option<&Path>, quiet: bool) -> Result<(), CliError> {
    let descriptor = util::load_descriptor(file)?;

    let mut invalid = 0usize;
    for (index, option) in descriptor.console_options.iter().enumerate() {
        match option.validate() {
            Ok(()) => {
                if !quiet {
                    println!("option {index}: {} ok", option.label());
                }
            }
            Err(e) => {
                invalid += 1;
                if !quiet {
                    println!("option {index}: {} INVALID ({e})", option.label());
                }
            }
        }
    }

    if invalid > 0 {
        return Err(CliError::Descriptor(format!(
            "{invalid} invalid option(s) in descriptor for '{}'",
            descriptor.vm_name
        )));
    }

    if !quiet {
        println!(
            "descriptor for '{}' is valid ({} option(s))",
            descriptor.vm_name,
            descriptor.console_options.len()
        );
    }
    Ok(())
}
