use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mf", about = concat!("multifield v", env!("CARGO_PKG_VERSION"), " - edit multi-item contact fields"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Record file to operate on
    #[arg(short = 'r', long, global = true, default_value = "record.toml")]
    pub record: PathBuf,

    /// Config file (default: ./multifield.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the editor on a field (default: the first field)
    Edit(EditArgs),
    /// Create a new record file with emails, phones and links fields
    Init(InitArgs),
    /// List the record's fields
    Fields,
    /// List a field's items, primary first
    List(FieldArgs),
    /// Append an item to a field
    Add(AddArgs),
    /// Replace an item's text (empty text deletes the item)
    Set(SetArgs),
    /// Delete an item
    Rm(ItemArgs),
    /// Make an item the primary one
    Primary(ItemArgs),
    /// Add an empty field to the record
    AddField(AddFieldArgs),
}

#[derive(Args)]
pub struct EditArgs {
    /// Field to open
    pub field: Option<String>,
}

#[derive(Args)]
pub struct InitArgs {
    /// Record name
    pub name: String,
}

#[derive(Args)]
pub struct FieldArgs {
    pub field: String,
}

#[derive(Args)]
pub struct AddArgs {
    pub field: String,
    /// Item text as it would be typed in the editor
    pub text: String,
}

#[derive(Args)]
pub struct SetArgs {
    pub field: String,
    /// Item position (0 = primary)
    pub index: usize,
    pub text: String,
}

#[derive(Args)]
pub struct ItemArgs {
    pub field: String,
    /// Item position (0 = primary)
    pub index: usize,
}

#[derive(Args)]
pub struct AddFieldArgs {
    pub name: String,
    /// Item kind: emails, phones, links or array
    pub kind: String,
}
