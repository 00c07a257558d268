mod init;
pub use init::cmd_init;

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use tracing::{debug, info};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::editor::{FieldEditor, FieldSignal, SubmitOutcome};
use crate::io::config_io;
use crate::io::record_io::{self, RecordError, RecordFile};
use crate::logging;
use crate::model::{Config, FieldKind, FieldValue};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// What every command needs besides its own arguments
struct Context {
    record: PathBuf,
    config: Config,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let config = config_io::load_config(cli.config.as_deref())?;
    let tui = matches!(cli.command, None | Some(Commands::Edit(_)));
    if tui {
        if let Some(path) = &config.log.file {
            logging::init_file(path, config.log.filter.as_deref())?;
        }
    } else {
        logging::init_stderr(config.log.filter.as_deref());
    }

    let ctx = Context {
        record: cli.record,
        config,
        json: cli.json,
    };
    match cli.command {
        None => cmd_edit(EditArgs { field: None }, ctx),
        Some(cmd) => match cmd {
            Commands::Edit(args) => cmd_edit(args, ctx),
            Commands::Init(args) => cmd_init(args, &ctx.record),
            Commands::Fields => cmd_fields(&ctx),
            Commands::List(args) => cmd_list(args, &ctx),
            Commands::Add(args) => cmd_add(args, &ctx),
            Commands::Set(args) => cmd_set(args, &ctx),
            Commands::Rm(args) => cmd_rm(args, &ctx),
            Commands::Primary(args) => cmd_primary(args, &ctx),
            Commands::AddField(args) => cmd_add_field(args, &ctx),
        },
    }
}

fn cmd_edit(args: EditArgs, ctx: Context) -> CmdResult {
    crate::tui::run(&ctx.record, ctx.config, args.field.as_deref())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_fields(ctx: &Context) -> CmdResult {
    let file = record_io::load_record(&ctx.record)?;
    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&field_summaries(&file.record))?
        );
    } else {
        for line in format_fields(&file.record) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_list(args: FieldArgs, ctx: &Context) -> CmdResult {
    let file = record_io::load_record(&ctx.record)?;
    print_field(&file, &args.field, ctx.json)
}

fn print_field(file: &RecordFile, field: &str, json: bool) -> CmdResult {
    let value = file.value(field)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&field_json(field, value))?);
    } else {
        for line in format_items(value) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

/// An editor on one field of a loaded record. Commands drive it exactly
/// as the TUI does, then write whatever it proposed.
struct FieldCommand {
    file: RecordFile,
    field: String,
    value: FieldValue,
    editor: FieldEditor,
    signals: Receiver<FieldSignal>,
}

impl FieldCommand {
    fn open(ctx: &Context, field: &str) -> Result<Self, RecordError> {
        let file = record_io::load_record(&ctx.record)?;
        let value = file.value(field)?.clone();
        let (tx, signals) = mpsc::channel();
        let editor = FieldEditor::new(value.kind(), &ctx.config.editor, tx);
        Ok(FieldCommand {
            file,
            field: field.to_string(),
            value,
            editor,
            signals,
        })
    }

    /// Type `text` into the open session and submit it
    fn submit_text(&mut self, text: &str) -> CmdResult {
        self.editor.update_text(&self.value, text)?;
        let outcome = self.editor.submit(&self.value)?;
        debug!(?outcome, field = %self.field, "submit");
        match outcome {
            SubmitOutcome::Invalid => {
                let message = self.editor.error_message().unwrap_or("invalid input");
                Err(message.to_string().into())
            }
            SubmitOutcome::IgnoredEmpty => Err("nothing to add: text is empty".into()),
            _ => Ok(()),
        }
    }

    /// Save the proposed list, if any, and print the field
    fn finish(mut self, json: bool) -> CmdResult {
        let mut proposed = None;
        for signal in self.signals.try_iter() {
            if let FieldSignal::Persist(value) = signal {
                proposed = Some(value);
            }
        }
        match proposed {
            Some(value) => {
                let count = value.len();
                self.file.save_field(&self.field, value)?;
                info!(field = %self.field, items = count, "field saved");
            }
            None => debug!(field = %self.field, "nothing to save"),
        }
        print_field(&self.file, &self.field, json)
    }
}

fn cmd_add(args: AddArgs, ctx: &Context) -> CmdResult {
    let mut cmd = FieldCommand::open(ctx, &args.field)?;
    cmd.editor.start_add();
    cmd.submit_text(&args.text)?;
    cmd.finish(ctx.json)
}

fn cmd_set(args: SetArgs, ctx: &Context) -> CmdResult {
    let mut cmd = FieldCommand::open(ctx, &args.field)?;
    cmd.editor.start_edit(&cmd.value, args.index)?;
    cmd.submit_text(&args.text)?;
    cmd.finish(ctx.json)
}

fn cmd_rm(args: ItemArgs, ctx: &Context) -> CmdResult {
    let mut cmd = FieldCommand::open(ctx, &args.field)?;
    cmd.editor.delete_item(&cmd.value, args.index)?;
    cmd.finish(ctx.json)
}

fn cmd_primary(args: ItemArgs, ctx: &Context) -> CmdResult {
    let mut cmd = FieldCommand::open(ctx, &args.field)?;
    cmd.editor.set_primary(&cmd.value, args.index)?;
    cmd.finish(ctx.json)
}

fn cmd_add_field(args: AddFieldArgs, ctx: &Context) -> CmdResult {
    let kind: FieldKind = args.kind.parse()?;
    let mut file = record_io::load_record(&ctx.record)?;
    file.add_field(&args.name, kind)?;
    file.save()?;
    info!(field = %args.name, %kind, "field added");
    println!("added {} ({})", args.name, kind);
    Ok(())
}
