use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::record_io;

/// Create the record file named by `--record`
pub fn cmd_init(args: InitArgs, record: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err("record name cannot be empty".into());
    }
    let file = record_io::init_record(record, name)?;
    println!(
        "created {} with fields: {}",
        record.display(),
        file.record.field_names().join(", ")
    );
    Ok(())
}
