//! Terminal front end for the budget tracker.
//!
//! Renders the model as tables and turns subcommands into messages for
//! [`Program::dispatch`].

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use budget_buddy::error::BudgetError;
use budget_buddy::models::{Totals, Transaction, TransactionId, TransactionType};
use budget_buddy::program::Program;
use budget_buddy::storage::{FileStore, KeyValueStore};
use budget_buddy::update::Msg;
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, Table};
use owo_colors::OwoColorize;

/// Track income and expenses from the terminal.
#[derive(Debug, Parser)]
#[command(name = "budget", version, about)]
struct Cli {
    /// Override the storage directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR", env = "BUDGET_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// List all transactions, newest first, followed by the totals.
    List,
    /// Record a new transaction.
    Add(AddArgs),
    /// Delete a transaction by id.
    Delete {
        /// Identifier shown by `list`.
        #[arg(value_parser = parse_id)]
        id: TransactionId,
    },
    /// Show total income, total expenses and the balance.
    Totals,
}

/// Arguments for the `add` subcommand.
#[derive(Debug, Args)]
struct AddArgs {
    /// What the money was spent on or received for.
    description: String,
    /// Amount as a positive number, e.g. `3.5`.
    #[arg(allow_hyphen_values = true)]
    amount: String,
    /// Transaction type.
    #[arg(long = "type", short = 't', default_value = "expense", value_parser = parse_type)]
    kind: TransactionType,
}

/// Parses a transaction type for clap.
fn parse_type(s: &str) -> Result<TransactionType, String> {
    s.parse().map_err(|err| format!("{err}"))
}

/// Parses a transaction id for clap.
fn parse_id(s: &str) -> Result<TransactionId, String> {
    TransactionId::parse_str(s).map_err(|err| format!("{err}"))
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    let _dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut program = match create_store(cli.data_dir).and_then(Program::init) {
        Ok(program) => program,
        Err(err) => return report_error("failed to open storage", &err),
    };

    if let Some(warning) = program.load_warning() {
        writeln!(
            io::stderr().lock(),
            "{} stored transactions could not be read ({warning}); starting with an empty list",
            "warning:".yellow().bold()
        )?;
    }

    dispatch(&mut program, cli.command)
}

/// Creates the file store, using `data_dir` if provided or the default
/// XDG data directory otherwise.
fn create_store(data_dir: Option<PathBuf>) -> budget_buddy::error::Result<FileStore> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileStore::default_dir()?,
    };
    FileStore::new(dir)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch<S: KeyValueStore>(program: &mut Program<S>, command: Command) -> io::Result<ExitCode> {
    match command {
        Command::List => cmd_list(program),
        Command::Add(args) => cmd_add(program, args),
        Command::Delete { id } => cmd_delete(program, id),
        Command::Totals => cmd_totals(program),
    }
}

/// Executes the `list` subcommand.
fn cmd_list<S: KeyValueStore>(program: &Program<S>) -> io::Result<ExitCode> {
    print_transactions_table(&program.model().transactions)?;
    print_totals(&program.totals())?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `add` subcommand: fills the entry form, validates it and
/// adds the transaction.
fn cmd_add<S: KeyValueStore>(program: &mut Program<S>, args: AddArgs) -> io::Result<ExitCode> {
    let form = [
        Msg::SetDescription(args.description),
        Msg::SetAmount(args.amount),
        Msg::SetType(args.kind),
    ];
    for msg in form {
        if let Err(err) = program.dispatch(msg) {
            return report_error("failed to update entry", &err);
        }
    }

    if let Err(reason) = program.model().validate_entry() {
        writeln!(
            io::stderr().lock(),
            "{} transaction not added: {reason}",
            "error:".red().bold()
        )?;
        return Ok(ExitCode::FAILURE);
    }

    if let Err(err) = program.dispatch(Msg::AddTransaction) {
        return report_error("failed to save transaction", &err);
    }

    let mut out = io::stdout().lock();
    if let Some(tx) = program.model().transactions.first() {
        writeln!(
            out,
            "{} {} {} {}",
            "Added".green().bold(),
            tx.description(),
            format_amount(tx),
            format_args!("({})", tx.id()).dimmed()
        )?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `delete` subcommand.
fn cmd_delete<S: KeyValueStore>(program: &mut Program<S>, id: TransactionId) -> io::Result<ExitCode> {
    let Some(description) = program.model().find(id).map(|tx| tx.description().to_owned()) else {
        writeln!(
            io::stderr().lock(),
            "{} transaction not found: {id}",
            "error:".red().bold()
        )?;
        return Ok(ExitCode::FAILURE);
    };

    if let Err(err) = program.dispatch(Msg::DeleteTransaction(id)) {
        return report_error("failed to save transactions", &err);
    }

    writeln!(
        io::stdout().lock(),
        "{} {description}",
        "Deleted".green().bold()
    )?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `totals` subcommand.
fn cmd_totals<S: KeyValueStore>(program: &Program<S>) -> io::Result<ExitCode> {
    print_totals(&program.totals())?;
    Ok(ExitCode::SUCCESS)
}

/// Prints `context` and `err` to stderr and returns a failure code.
fn report_error(context: &str, err: &BudgetError) -> io::Result<ExitCode> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )?;
    Ok(ExitCode::FAILURE)
}

// ── Output formatting ────────────────────────────────────────────────

/// Formats the amount with the sign implied by its type.
fn format_amount(tx: &Transaction) -> String {
    let sign = match tx.kind() {
        TransactionType::Expense => '-',
        TransactionType::Income => '+',
    };
    format!("{sign}{:.2}", tx.amount())
}

/// Prints transactions in a table.
fn print_transactions_table(txs: &[Transaction]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if txs.is_empty() {
        writeln!(out, "{}", "No transactions yet.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Date").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
        Cell::new("Id").fg(Color::Cyan),
    ]);

    for tx in txs {
        let color = match tx.kind() {
            TransactionType::Expense => Color::Red,
            TransactionType::Income => Color::Green,
        };
        _ = table.add_row(vec![
            Cell::new(tx.date().format("%Y-%m-%d")),
            Cell::new(tx.description()),
            Cell::new(format_amount(tx))
                .fg(color)
                .set_alignment(CellAlignment::Right),
            Cell::new(tx.id()).fg(Color::DarkGrey),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Transactions".green().bold(),
        format_args!("({})", txs.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the income, expense and balance summary.
fn print_totals(totals: &Totals) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let balance = totals.balance();
    let balance_str = format!("{balance:.2}");
    writeln!(
        out,
        "{} {:.2}   {} {:.2}   {} {}",
        "Total Income:".bold(),
        totals.income,
        "Total Expenses:".bold(),
        totals.expenses,
        "Balance:".bold(),
        if balance < 0.0_f64 {
            balance_str.red().to_string()
        } else {
            balance_str.green().to_string()
        }
    )?;
    Ok(())
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // Last-resort error output; if stderr itself failed there is
            // nothing left to report to.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
