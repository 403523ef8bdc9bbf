mod render;
mod server;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dm_core::{
    AnyMatrix, Arcana, BirthDate, MatrixLayout, build_matrix, compose, describe, export_json,
    import_json,
};
use dm_store::DataDir;
use rmcp::{ServiceExt, transport::stdio};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "dm", about = "Destiny matrix calculator and MCP server")]
struct Cli {
    /// History owner (defaults to `owner` in config.toml)
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server on stdio transport
    Serve,

    /// Compute the matrix for a birth date
    Matrix {
        /// YYYY-MM-DD, DD.MM.YYYY or DDMMYYYY
        date: String,

        #[arg(long)]
        name: Option<String>,

        /// Print the JSON snapshot instead of the table
        #[arg(long)]
        json: bool,

        /// Save to history
        #[arg(long)]
        save: bool,
    },

    /// Compute the compatibility matrix of two birth dates
    Compat {
        date1: String,
        date2: String,

        #[arg(long)]
        name1: Option<String>,

        #[arg(long)]
        name2: Option<String>,

        #[arg(long)]
        json: bool,

        #[arg(long)]
        save: bool,
    },

    /// List saved matrices, newest first
    History {
        /// Filter on name or date
        #[arg(long)]
        search: Option<String>,

        /// Only favourites
        #[arg(long)]
        favorites: bool,
    },

    /// Rename a history entry
    Rename { id: Uuid, name: String },

    /// Mark a history entry as favourite
    Favorite {
        id: Uuid,

        /// Clear the mark instead
        #[arg(long)]
        off: bool,
    },

    /// Delete a history entry
    Delete { id: Uuid },

    /// List saved compatibility readings
    Pairs,

    /// Delete a saved compatibility reading
    Unpair { id: Uuid },

    /// Describe an arcana
    Arcana { number: u8 },

    /// Public figures sharing a main arcana (number or birth date)
    Celebs { target: String },

    /// Print diagram node positions for a birth date
    Layout {
        date: String,

        /// Canvas size in pixels
        #[arg(long, default_value_t = 400.0)]
        size: f64,
    },

    /// Show a matrix snapshot written by `--json`
    View { path: PathBuf },

    /// Export history to a JSON file
    Export { path: PathBuf },

    /// Import history from a JSON file
    Import { path: PathBuf },
}

fn open_data() -> Result<DataDir> {
    DataDir::open(None).context("failed to open data directory")
}

fn parse_date(input: &str) -> Result<BirthDate> {
    BirthDate::parse_input(input).with_context(|| format!("invalid birth date '{input}'"))
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Serve => cmd_serve().await,
        Commands::Matrix {
            date,
            name,
            json,
            save,
        } => cmd_matrix(&cli, date, name.as_deref(), *json, *save),
        Commands::Compat {
            date1,
            date2,
            name1,
            name2,
            json,
            save,
        } => cmd_compat(
            &cli,
            (date1, name1.as_deref()),
            (date2, name2.as_deref()),
            *json,
            *save,
        ),
        Commands::History { search, favorites } => {
            cmd_history(&cli, search.as_deref(), *favorites)
        }
        Commands::Rename { id, name } => cmd_rename(&cli, *id, name),
        Commands::Favorite { id, off } => cmd_favorite(&cli, *id, !*off),
        Commands::Delete { id } => cmd_delete(&cli, *id),
        Commands::Pairs => cmd_pairs(&cli),
        Commands::Unpair { id } => cmd_unpair(&cli, *id),
        Commands::Arcana { number } => cmd_arcana(*number),
        Commands::Celebs { target } => cmd_celebs(target),
        Commands::Layout { date, size } => cmd_layout(date, *size),
        Commands::View { path } => cmd_view(path),
        Commands::Export { path } => cmd_export(&cli, path),
        Commands::Import { path } => cmd_import(&cli, path),
    }
}

async fn cmd_serve() -> Result<()> {
    let data = open_data()?;
    tracing::info!("starting MCP server on {}", data.root().display());

    let service = server::DmServer::new(data)
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await?;
    Ok(())
}

fn cmd_matrix(cli: &Cli, date: &str, name: Option<&str>, json: bool, save: bool) -> Result<()> {
    let date = parse_date(date)?;
    let matrix = build_matrix(date);
    let data = open_data()?;

    if json {
        println!(
            "{}",
            export_json(&AnyMatrix::Personal(matrix)).context("failed to serialize matrix")?
        );
    } else {
        let main = matrix.main_arcana();
        if let Some(name) = name {
            println!("{name}");
        }
        println!("birth date: {}", data.config().date_format.format(date));
        println!("main arcana: {} ({})", main, describe(main).name);
        println!();
        println!("{}", render::points_table(&matrix));
    }

    if save {
        let owner = data.owner(cli.owner.as_deref());
        let outcome = data
            .store()
            .save_matrix(owner, name.unwrap_or(""), date, &matrix)
            .context("failed to save matrix")?;
        if outcome.is_new() {
            eprintln!("saved {}", outcome.id());
        } else {
            eprintln!("already saved {}", outcome.id());
        }
    }
    Ok(())
}

fn cmd_compat(
    cli: &Cli,
    first: (&str, Option<&str>),
    second: (&str, Option<&str>),
    json: bool,
    save: bool,
) -> Result<()> {
    let a = parse_date(first.0)?;
    let b = parse_date(second.0)?;
    let matrix = compose(&build_matrix(a), &build_matrix(b));
    let data = open_data()?;

    if json {
        println!(
            "{}",
            export_json(&AnyMatrix::Compatibility(matrix))
                .context("failed to serialize matrix")?
        );
    } else {
        let fmt = data.config().date_format;
        println!("{} & {}", fmt.format(a), fmt.format(b));
        println!();
        println!("{}", render::points_table(&matrix));
    }

    if save {
        let owner = data.owner(cli.owner.as_deref());
        let outcome = data
            .store()
            .save_compatibility(
                owner,
                (first.1.unwrap_or(""), a),
                (second.1.unwrap_or(""), b),
                &matrix,
            )
            .context("failed to save compatibility")?;
        if outcome.is_new() {
            eprintln!("saved {}", outcome.id());
        } else {
            eprintln!("already saved {}", outcome.id());
        }
    }
    Ok(())
}

fn cmd_history(cli: &Cli, search: Option<&str>, favorites: bool) -> Result<()> {
    let data = open_data()?;
    let owner = data.owner(cli.owner.as_deref());
    let entries = if favorites {
        data.store().list_favorites(owner)
    } else {
        data.store().search_history(owner, search.unwrap_or(""))
    };
    let entries = entries.context("failed to load history")?;

    if entries.is_empty() {
        println!("(no saved matrices)");
    }
    for e in &entries {
        println!("{}", render::history_line(e, data.config().date_format));
    }
    Ok(())
}

fn cmd_rename(cli: &Cli, id: Uuid, name: &str) -> Result<()> {
    let data = open_data()?;
    let owner = data.owner(cli.owner.as_deref());
    data.store()
        .rename_entry(owner, id, name)
        .with_context(|| format!("failed to rename {id}"))?;
    println!("renamed {id}");
    Ok(())
}

fn cmd_favorite(cli: &Cli, id: Uuid, on: bool) -> Result<()> {
    let data = open_data()?;
    let owner = data.owner(cli.owner.as_deref());
    data.store()
        .set_favorite(owner, id, on)
        .with_context(|| format!("failed to update {id}"))?;
    println!("{} {id}", if on { "favorited" } else { "unfavorited" });
    Ok(())
}

fn cmd_delete(cli: &Cli, id: Uuid) -> Result<()> {
    let data = open_data()?;
    let owner = data.owner(cli.owner.as_deref());
    if !data
        .store()
        .delete_entry(owner, id)
        .context("failed to delete")?
    {
        bail!("no history entry {id}");
    }
    println!("deleted {id}");
    Ok(())
}

fn cmd_pairs(cli: &Cli) -> Result<()> {
    let data = open_data()?;
    let owner = data.owner(cli.owner.as_deref());
    let pairs = data
        .store()
        .list_compatibility(owner)
        .context("failed to load compatibility history")?;
    if pairs.is_empty() {
        println!("(no saved pairs)");
    }
    for p in &pairs {
        println!("{}", render::pair_line(p, data.config().date_format));
    }
    Ok(())
}

fn cmd_unpair(cli: &Cli, id: Uuid) -> Result<()> {
    let data = open_data()?;
    let owner = data.owner(cli.owner.as_deref());
    if !data
        .store()
        .delete_compatibility(owner, id)
        .context("failed to delete")?
    {
        bail!("no saved pair {id}");
    }
    println!("deleted {id}");
    Ok(())
}

fn cmd_arcana(number: u8) -> Result<()> {
    let arcana = Arcana::new(number)?;
    let d = describe(arcana);
    println!("{} {}", d.number, d.name);
    println!();
    println!("{}", d.description);
    println!("+ {}", d.positive);
    println!("- {}", d.negative);
    Ok(())
}

fn cmd_celebs(target: &str) -> Result<()> {
    let arcana = match target.parse::<u8>() {
        Ok(n) => Arcana::new(n)?,
        Err(_) => build_matrix(parse_date(target)?).main_arcana(),
    };
    let data = open_data()?;
    let records = data
        .store()
        .celebrities_by_arcana(arcana)
        .context("failed to query celebrities")?;

    println!("arcana {} ({})", arcana, describe(arcana).name);
    if records.is_empty() {
        println!("(no matches)");
    }
    for r in &records {
        println!("  {:<24} {}", r.name, r.birth_date);
    }
    Ok(())
}

fn cmd_layout(date: &str, size: f64) -> Result<()> {
    if !(size.is_finite() && size > 0.0) {
        bail!("size must be a positive number, got {size}");
    }
    let matrix = build_matrix(parse_date(date)?);
    print!("{}", render::layout_table(&MatrixLayout::place(&matrix, size)));
    Ok(())
}

fn cmd_view(path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let snapshot = import_json(&json)
        .with_context(|| format!("{} is not a matrix snapshot", path.display()))?;
    match snapshot {
        AnyMatrix::Personal(matrix) => {
            let main = matrix.main_arcana();
            println!("main arcana: {} ({})", main, describe(main).name);
            println!();
            println!("{}", render::points_table(&matrix));
        }
        AnyMatrix::Compatibility(matrix) => {
            println!("compatibility");
            println!();
            println!("{}", render::points_table(&matrix));
        }
    }
    Ok(())
}

fn cmd_export(cli: &Cli, path: &Path) -> Result<()> {
    let data = open_data()?;
    let owner = data.owner(cli.owner.as_deref());
    data.store()
        .export_json_file(owner, path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("exported to {}", path.display());
    Ok(())
}

fn cmd_import(cli: &Cli, path: &Path) -> Result<()> {
    let data = open_data()?;
    let owner = data.owner(cli.owner.as_deref());
    let summary = data
        .store()
        .import_json_file(owner, path)
        .context("failed to import JSON")?;
    println!(
        "imported from {}. history={}, pairs={}",
        path.display(),
        summary.history,
        summary.compatibility
    );
    Ok(())
}
