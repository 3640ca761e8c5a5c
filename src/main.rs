//! InkWell - a local note-taking client.
//!
//! # Usage
//!
//! ```bash
//! inkwell signup --name Ada --email ada@example.com --password secret
//! inkwell write --file draft.txt
//! inkwell indent --start 4 --end 12
//! inkwell punctuate
//! inkwell export --export-dir ~/Documents
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use inkwell::account::{self, LOGGED_OUT_MESSAGE, Profile};
use inkwell::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use inkwell::editor::EditorBuffer;
use inkwell::notes::{self, EXPORTED_STATUS};
use inkwell::store::{MemoryStorage, Storage, open_storage};
use inkwell::text::Selection;

/// A local note-taking client with indent and punctuation helpers
#[derive(Parser, Debug)]
#[command(name = "inkwell", version, about, long_about = None)]
struct Cli {
    /// Directory holding accounts and notes
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Directory exported notes are written to
    #[arg(long, value_name = "DIR", global = true)]
    export_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Suppress status lines
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in to an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show who is signed in and the state of their note
    Status,
    /// Print the note
    Show,
    /// Replace the note with a file's contents (stdin by default)
    Write {
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Indent the lines touched by a selection
    Indent(SelectionArgs),
    /// Outdent the lines touched by a selection
    Outdent(SelectionArgs),
    /// Replace a selection with two spaces
    Tab(SelectionArgs),
    /// Clean up spacing, capitalization and the final punctuation mark
    Punctuate,
    /// Write the note to a dated text file
    Export,
}

#[derive(Args, Debug, Clone, Copy)]
struct SelectionArgs {
    /// Selection start, in characters
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Selection end, in characters (defaults to the start)
    #[arg(long)]
    end: Option<usize>,
}

impl From<SelectionArgs> for Selection {
    fn from(args: SelectionArgs) -> Self {
        Self::new(args.start, args.end.unwrap_or(args.start))
    }
}

#[derive(Debug, Clone, Copy)]
enum Edit {
    Indent,
    Outdent,
    Tab,
    Punctuate,
}

struct Session {
    storage: Box<dyn Storage>,
    flags: ConfigFlags,
}

impl Session {
    fn status(&self, line: &str) {
        if !self.flags.quiet {
            eprintln!("{line}");
        }
    }

    fn require_user(&self) -> Result<Profile> {
        account::current_user(self.storage.as_ref())
            .context("Not signed in. Run `inkwell login` or `inkwell signup` first.")
    }

    fn open_note(&self, profile: &Profile) {
        let note = notes::load_note(self.storage.as_ref(), profile);
        self.status(&note.title);
        self.status(note.status);
    }

    fn save(&mut self, text: &str) -> Result<()> {
        if let Some(status) = notes::save_note(self.storage.as_mut(), text)? {
            self.status(&status);
        }
        Ok(())
    }

    fn edit(&mut self, edit: Edit, selection: Selection) -> Result<()> {
        let profile = self.require_user()?;
        let note = notes::load_note(self.storage.as_ref(), &profile);
        let mut buffer = EditorBuffer::from_text(&note.text);
        buffer.set_selection(selection);
        match edit {
            Edit::Indent => buffer.indent(),
            Edit::Outdent => buffer.outdent(),
            Edit::Tab => buffer.insert_soft_tab(),
            Edit::Punctuate => buffer.normalize_punctuation(),
        }
        debug!(?edit, dirty = buffer.is_dirty(), "applied edit");
        self.save(&buffer.text())?;
        buffer.mark_clean();

        let selection = buffer.selection();
        println!("{} {}", selection.start, selection.end);
        Ok(())
    }

    fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Signup {
                name,
                email,
                password,
            } => {
                let profile =
                    account::sign_up(self.storage.as_mut(), &name, &email, &password)?;
                self.open_note(&profile);
            }
            Command::Login { email, password } => {
                let profile = account::log_in(self.storage.as_mut(), &email, &password)?;
                self.open_note(&profile);
            }
            Command::Logout => {
                account::log_out(self.storage.as_mut())?;
                self.status(LOGGED_OUT_MESSAGE);
            }
            Command::Status => {
                let profile = self.require_user()?;
                let note = notes::load_note(self.storage.as_ref(), &profile);
                let lines = EditorBuffer::from_text(&note.text).line_count();
                println!("{} <{}>", note.title, profile.email);
                println!("{} ({lines} lines)", note.status);
            }
            Command::Show => {
                let profile = self.require_user()?;
                print!("{}", notes::load_note(self.storage.as_ref(), &profile).text);
            }
            Command::Write { file } => {
                self.require_user()?;
                let text = match file {
                    Some(path) => std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                    None => {
                        let mut text = String::new();
                        std::io::stdin()
                            .read_to_string(&mut text)
                            .context("Failed to read stdin")?;
                        text
                    }
                };
                self.save(&text)?;
            }
            Command::Indent(args) => self.edit(Edit::Indent, args.into())?,
            Command::Outdent(args) => self.edit(Edit::Outdent, args.into())?,
            Command::Tab(args) => self.edit(Edit::Tab, args.into())?,
            Command::Punctuate => self.edit(Edit::Punctuate, Selection::caret(0))?,
            Command::Export => {
                let profile = self.require_user()?;
                let note = notes::load_note(self.storage.as_ref(), &profile);
                let date = chrono::Local::now().date_naive();
                let path =
                    notes::export_note(&note.text, &self.flags.effective_export_dir(), date)?;
                println!("{}", path.display());
                self.status(EXPORTED_STATUS);
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let storage: Box<dyn Storage> = if effective.ephemeral {
        Box::new(MemoryStorage::new())
    } else {
        open_storage(&effective.effective_data_dir())
    };

    let mut session = Session {
        storage,
        flags: effective,
    };
    session.run(cli.command.unwrap_or(Command::Status))
}
