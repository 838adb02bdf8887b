use std::fs;
use std::io::stdin;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use crude_csv::create::CreateRequest;
use crude_csv::fs::{CONFIG_DIR, FsVault, VaultConfigRegistry};
use crude_csv::{CsvView, Grid, Notifier, Settings, ViewHost, settings};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "crude-csv",
    about = "Edit CSV files as a grid and create new ones from templates",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse CSV and print the grid as JSON
    Parse {
        /// Pretty-print the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,

        /// Input file (defaults to stdin)
        input: Option<PathBuf>,
    },
    /// Parse CSV and write it back out in canonical form
    Fmt {
        /// Input file (defaults to stdin)
        input: Option<PathBuf>,
    },
    /// Apply grid edits: add-row, remove-row, add-column, remove-column, set:ROW:COL:TEXT
    Edit {
        /// Write the result back to FILE instead of stdout
        #[arg(short, long, default_value_t = false)]
        in_place: bool,

        file: PathBuf,

        #[arg(required = true)]
        ops: Vec<Op>,
    },
    /// Print the content a new CSV document would start with
    Template {
        #[command(flatten)]
        vault: VaultArgs,
    },
    /// Create a new CSV document in the vault
    New {
        /// File name, `.csv` is appended when missing
        name: String,

        /// Folder inside the vault (defaults to the vault root)
        #[arg(long)]
        folder: Option<String>,

        #[command(flatten)]
        vault: VaultArgs,
    },
}

#[derive(clap::Args, Debug)]
struct VaultArgs {
    /// Vault root directory
    #[arg(long, default_value = ".")]
    vault: PathBuf,

    /// Settings file (defaults to <vault>/.obsidian/plugins/crude-csv/data.json)
    #[arg(long)]
    settings: Option<PathBuf>,
}

impl VaultArgs {
    fn load_settings(&self) -> Settings {
        let path = self.settings.clone().unwrap_or_else(|| {
            self.vault
                .join(CONFIG_DIR)
                .join("plugins")
                .join("crude-csv")
                .join("data.json")
        });
        settings::load_from(&path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    AddRow,
    RemoveRow,
    AddColumn,
    RemoveColumn,
    Set { row: usize, column: usize, text: String },
}

impl FromStr for Op {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add-row" => return Ok(Op::AddRow),
            "remove-row" => return Ok(Op::RemoveRow),
            "add-column" => return Ok(Op::AddColumn),
            "remove-column" => return Ok(Op::RemoveColumn),
            _ => {}
        }
        let rest = s
            .strip_prefix("set:")
            .ok_or_else(|| anyhow!("unknown edit `{s}`"))?;
        let mut parts = rest.splitn(3, ':');
        let (Some(row), Some(column), Some(text)) = (parts.next(), parts.next(), parts.next())
        else {
            bail!("expected set:ROW:COL:TEXT, got `{s}`");
        };
        Ok(Op::Set {
            row: row.parse().context("row index")?,
            column: column.parse().context("column index")?,
            text: text.to_string(),
        })
    }
}

/// Notices go to stderr; saves are counted so the caller knows whether to write.
#[derive(Default)]
struct CliHost {
    saves: usize,
}

impl Notifier for CliHost {
    fn notice(&self, message: &str) {
        eprintln!("notice: {message}");
    }
}

impl ViewHost for CliHost {
    fn request_save(&mut self) {
        self.saves += 1;
    }

    fn request_render(&mut self, grid: &Grid) {
        debug!(target: "cli", rows = grid.row_count(), columns = grid.column_count(), "render");
    }
}

struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notice(&self, message: &str) {
        eprintln!("{message}");
    }
}

fn read_grid(input: Option<&Path>) -> Result<Grid> {
    let grid = match input {
        Some(path) => {
            let file = fs::File::open(path).with_context(|| format!("reading {}", path.display()))?;
            crude_csv::decode_from_reader(file)?
        }
        None => crude_csv::decode_from_reader(stdin().lock())?,
    };
    Ok(grid)
}

fn run_edit(file: &Path, ops: &[Op], in_place: bool) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let mut view = CsvView::new(CliHost::default());
    if let Some(name) = file.file_name() {
        view.set_file_name(name.to_string_lossy());
    }
    view.on_open()?;
    view.set_view_data(&text, false)?;
    for op in ops {
        match op {
            Op::AddRow => view.add_row()?,
            Op::RemoveRow => view.remove_row()?,
            Op::AddColumn => view.add_column()?,
            Op::RemoveColumn => view.remove_column()?,
            Op::Set { row, column, text } => view.edit_cell(*row, *column, text)?,
        };
    }
    let out = view.get_view_data()?;
    let saves = view.host().saves;
    view.on_close();

    if in_place {
        if saves > 0 {
            fs::write(file, out).with_context(|| format!("writing {}", file.display()))?;
        }
    } else {
        println!("{out}");
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Parse { pretty, input } => {
            let grid = read_grid(input.as_deref())?;
            if pretty {
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                println!("{}", serde_json::to_string(&grid)?);
            }
        }
        Command::Fmt { input } => {
            let grid = read_grid(input.as_deref())?;
            println!("{}", crude_csv::encode_to_string(&grid));
        }
        Command::Edit { in_place, file, ops } => run_edit(&file, &ops, in_place)?,
        Command::Template { vault } => {
            let settings = vault.load_settings();
            let registry = VaultConfigRegistry::for_vault(&vault.vault);
            let fs_vault = FsVault::new(&vault.vault);
            print!("{}", crude_csv::resolve_template_content(&settings, &fs_vault, &registry));
        }
        Command::New { name, folder, vault } => {
            let settings = vault.load_settings();
            let registry = VaultConfigRegistry::for_vault(&vault.vault);
            let mut fs_vault = FsVault::new(&vault.vault);
            let mut request = CreateRequest::named(&name);
            if let Some(folder) = folder.as_deref() {
                request = request.in_folder(folder);
            }
            match crude_csv::new_csv(&mut fs_vault, &settings, &registry, &request, &StderrNotifier) {
                Some(path) => println!("{path}"),
                None => std::process::exit(1),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_edit_ops() {
        assert_eq!("add-row".parse::<Op>().unwrap(), Op::AddRow);
        assert_eq!(
            "set:1:2:a:b".parse::<Op>().unwrap(),
            Op::Set { row: 1, column: 2, text: "a:b".into() }
        );
        assert!("set:x:2:a".parse::<Op>().is_err());
        assert!("set:1".parse::<Op>().is_err());
        assert!("drop-table".parse::<Op>().is_err());
    }
}
