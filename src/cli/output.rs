use awsiprules::Result;
use log::info;
use std::io::Write;
use std::path::Path;
use std::{fs, io};

/*-------------------------------------------------------------------------------------------------
  Output Functions
-------------------------------------------------------------------------------------------------*/

/// Write rendered output to a file, or to stdout when no path is given. Files receive the
/// rendered text exactly as produced; stdout output is newline-terminated.
pub fn write(rendered: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, rendered)?;
            info!("Wrote output to {:?}", path);
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.is_empty() && !rendered.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}
