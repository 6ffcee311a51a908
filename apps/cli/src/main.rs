use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use depositslip_core::{
    Account, SessionEvent, SessionObserver, SessionView, SlipCommand, SlipSession,
};
use depositslip_printing::{
    render_preview, run_print_job, LayoutConfiguration, PlatformAdapter, PlatformJobHandle,
    PrintJobId, PrintJobOptions, PrintJobResult, PrintTarget, RenderRequest, Side,
    SpoolCommandAdapter, SpoolPage,
};
use depositslip_settings::{default_config_path, ConfigurationStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "depositslip-cli",
    about = "Manage accounts and print bank deposit slips",
    author,
    version
)]
struct Cli {
    /// 指定工作區根目錄；預設為目前目錄。 / Workspace root (defaults to current directory).
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 管理存款帳戶。 / Manage deposit accounts.
    #[command(subcommand)]
    Accounts(AccountsCommand),
    /// 檢視或重設存款單版面。 / Show or reset the slip layout.
    #[command(subcommand)]
    Layout(LayoutCommand),
    /// 匯入/匯出設定檔。 / Import or export the configuration file.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// 產生存款單預覽圖。 / Render a PNG preview of one side of the slip.
    Preview(PreviewArgs),
    /// 列印存款單。 / Print the slip or write it to a PDF file.
    Print(PrintArgs),
}

#[derive(Subcommand)]
enum AccountsCommand {
    /// 列出帳戶。 / List configured accounts.
    List,
    /// 新增帳戶。 / Add an account.
    Add(AccountAddArgs),
    /// 移除帳戶。 / Remove an account by number.
    Remove {
        #[arg(value_name = "NUMBER")]
        number: String,
    },
    /// 匯入舊版 Tab 分隔帳戶檔。 / Import accounts from a legacy tab-separated file.
    Import {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Args)]
struct AccountAddArgs {
    /// 帳號。 / Account number.
    #[arg(long)]
    number: String,
    /// 戶名。 / Account holder name.
    #[arg(long)]
    name: String,
    /// 銀行路由號碼。 / Bank routing number.
    #[arg(long)]
    routing: String,
    /// 備註。 / Free-form description.
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Subcommand)]
enum LayoutCommand {
    /// 顯示目前版面。 / Print the active layout.
    Show,
    /// 還原預設版面。 / Restore the built-in layout.
    Reset,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// 匯出目前設定。 / Export the current configuration.
    Export {
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// 匯入設定 JSON。 / Replace the configuration from JSON (the old file is kept as .bak).
    Import {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Args)]
struct SlipArgs {
    /// 要列印的帳號；略過則欄位留白。 / Account number to print; fields stay blank when omitted.
    #[arg(long)]
    account: Option<String>,
    /// 支票金額，可重複。 / Check amount; repeat for each check.
    #[arg(long = "check", value_name = "AMOUNT")]
    checks: Vec<String>,
    /// 存款日期（YYYY-MM-DD）；預設為今天。 / Deposit date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SideChoice {
    Front,
    Back,
}

impl From<SideChoice> for Side {
    fn from(choice: SideChoice) -> Self {
        match choice {
            SideChoice::Front => Side::Front,
            SideChoice::Back => Side::Back,
        }
    }
}

#[derive(Args)]
struct PreviewArgs {
    #[command(flatten)]
    slip: SlipArgs,
    #[arg(long, value_enum, default_value_t = SideChoice::Front)]
    side: SideChoice,
    /// 縮放百分比。 / Zoom level in percent.
    #[arg(long, default_value_t = 100)]
    zoom: u32,
    /// 輸出 PNG 檔案。 / Destination PNG file.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

#[derive(Args)]
struct PrintArgs {
    #[command(flatten)]
    slip: SlipArgs,
    /// 寫入 PDF 檔案而不送出列印。 / Write the PDF here instead of spooling it.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// 目標印表機名稱。 / Destination printer name.
    #[arg(long)]
    printer: Option<String>,
    /// 列印份數。 / Number of copies.
    #[arg(long, default_value_t = 1)]
    copies: u32,
    /// 列印佇列指令。 / Spool command receiving the PDF on stdin.
    #[arg(long, value_name = "CMD", default_value = "lp")]
    spool_command: String,
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run() -> Result<()> {
    let Cli { workspace, command } = Cli::parse();
    let workspace_root = resolve_workspace(workspace)?;
    let config_path = default_config_path(&workspace_root);
    let mut store = ConfigurationStore::load(&config_path)
        .with_context(|| format!("load configuration {}", config_path.display()))?;

    match command {
        Commands::Accounts(subcommand) => execute_accounts_command(subcommand, &mut store),
        Commands::Layout(subcommand) => execute_layout_command(subcommand, &mut store),
        Commands::Config(subcommand) => execute_config_command(subcommand, &mut store),
        Commands::Preview(args) => execute_preview(args, &store),
        Commands::Print(args) => execute_print(args, &store),
    }
}

fn execute_accounts_command(command: AccountsCommand, store: &mut ConfigurationStore) -> Result<()> {
    match command {
        AccountsCommand::List => {
            if store.accounts().is_empty() {
                println!("No accounts configured.");
            }
            for account in store.accounts().iter() {
                println!(
                    "{}\t{}\t{}\t{}",
                    account.number, account.name, account.routing_number, account.description
                );
            }
            Ok(())
        }
        AccountsCommand::Add(args) => {
            let account = Account::new(&args.number, args.name, args.routing)
                .with_description(args.description);
            store
                .add_account(account)
                .with_context(|| format!("add account {}", args.number))?;
            println!("Added account {}", args.number);
            Ok(())
        }
        AccountsCommand::Remove { number } => {
            let removed = store.remove_account(&number)?;
            println!("Removed account {} ({})", removed.number, removed.name);
            Ok(())
        }
        AccountsCommand::Import { input } => {
            let input = resolve_input_path(&input)?;
            let added = store.import_accounts_tsv(&input)?;
            println!("Imported {added} account(s) from {}", input.display());
            Ok(())
        }
    }
}

fn execute_layout_command(command: LayoutCommand, store: &mut ConfigurationStore) -> Result<()> {
    match command {
        LayoutCommand::Show => {
            print_layout(store.layout());
            Ok(())
        }
        LayoutCommand::Reset => {
            store.reset_layout()?;
            println!("Layout reset to defaults in {}", store.path().display());
            Ok(())
        }
    }
}

fn print_layout(layout: &LayoutConfiguration) {
    let fonts = &layout.fonts;
    println!("fonts:");
    println!("  sans        {} {}", fonts.sans_family, fonts.sans_size);
    println!("  mono        {} {}", fonts.mono_family, fonts.mono_size);
    println!("  micr        {}", fonts.micr_family);
    println!("  label_scale {}", fonts.label_scale);
    println!("  labels      {}", fonts.print_name_account_labels);
    let front = &layout.front;
    println!("front:");
    println!("  label_x {} value_x {}", front.label_x, front.value_x);
    println!(
        "  name_y {} account_y {} date_y {}",
        front.name_y, front.account_y, front.date_y
    );
    println!("  micr_x {} micr_y {}", front.micr_x, front.micr_y);
    println!(
        "  amount_x {} first_amount_y {} amount_pitch {}",
        front.amount_x, front.first_amount_y, front.amount_pitch
    );
    println!("  subtotal_y {} total_y {}", front.subtotal_y, front.total_y);
    println!("  underline_width {}", front.underline_width);
    let back = &layout.back;
    println!("back:");
    println!(
        "  amount_x {} first_amount_y {} amount_pitch {} total_y {}",
        back.amount_x, back.first_amount_y, back.amount_pitch, back.total_y
    );
}

fn execute_config_command(command: ConfigCommand, store: &mut ConfigurationStore) -> Result<()> {
    match command {
        ConfigCommand::Export { output } => {
            let output = resolve_input_path(&output)?;
            store.export_to(&output)?;
            println!("Exported configuration to {}", output.display());
        }
        ConfigCommand::Import { input } => {
            let input = resolve_input_path(&input)?;
            store.import_from(&input)?;
            println!("Imported configuration from {}", input.display());
        }
    }
    Ok(())
}

/// Logs every session event; the CLI has no widgets to refresh.
struct EventLog;

impl SessionObserver for EventLog {
    fn on_event(&mut self, event: &SessionEvent, session: &SessionView<'_>) {
        tracing::debug!(
            ?event,
            checks = session.checks.len(),
            selected = session.selected.map(|account| account.number.as_str()),
            "session event"
        );
    }
}

fn build_session(store: &ConfigurationStore, args: &SlipArgs) -> Result<SlipSession> {
    let mut session = SlipSession::new(store.accounts().clone());
    session.subscribe(Box::new(EventLog));

    if let Some(number) = &args.account {
        session
            .dispatch(SlipCommand::SelectAccount(number.clone()))
            .with_context(|| format!("select account {number}"))?;
    }
    for input in &args.checks {
        session.dispatch(SlipCommand::AddCheck)?;
        let row = session.checks().len() - 1;
        session
            .dispatch(SlipCommand::EditAmount {
                row,
                input: input.clone(),
            })
            .with_context(|| format!("check amount '{input}'"))?;
    }
    Ok(session)
}

fn deposit_date(args: &SlipArgs) -> NaiveDate {
    args.date
        .unwrap_or_else(|| chrono::Local::now().date_naive())
}

fn execute_preview(args: PreviewArgs, store: &ConfigurationStore) -> Result<()> {
    let session = build_session(store, &args.slip)?;
    let request = RenderRequest {
        account: session.selected_account(),
        checks: session.checks().as_slice(),
        date: deposit_date(&args.slip),
    };
    let (entry, _) = render_preview(args.side.into(), &request, store.layout(), args.zoom)?;

    let output = resolve_input_path(&args.output)?;
    ensure_parent(&output)?;
    fs::write(&output, &entry.data)
        .with_context(|| format!("write preview {}", output.display()))?;
    println!(
        "Wrote {:?} preview ({}x{} px) to {}",
        args.side,
        entry.width_px,
        entry.height_px,
        output.display()
    );
    Ok(())
}

fn execute_print(args: PrintArgs, store: &ConfigurationStore) -> Result<()> {
    let mut session = build_session(store, &args.slip)?;
    session.dispatch(SlipCommand::RequestPrint)?;
    let request = RenderRequest {
        account: session.selected_account(),
        checks: session.checks().as_slice(),
        date: deposit_date(&args.slip),
    };
    let job_options = PrintJobOptions::new(args.printer.map(PrintTarget::new), args.copies);

    let result = match &args.output {
        Some(output) => {
            let output = resolve_input_path(output)?;
            ensure_parent(&output)?;
            let adapter = PdfFileAdapter { path: output.clone() };
            let result = run_print_job(&request, store.layout(), &job_options, &adapter, None)?;
            report_totals(&result);
            println!("Wrote {} page(s) to {}", result.page_count(), output.display());
            result
        }
        None => {
            let Some(adapter) = SpoolCommandAdapter::from_command_line(&args.spool_command) else {
                bail!("--spool-command must not be empty");
            };
            let result = run_print_job(&request, store.layout(), &job_options, &adapter, None)?;
            report_totals(&result);
            println!(
                "Sent {} page(s) to {}",
                result.page_count(),
                adapter.program()
            );
            result
        }
    };
    tracing::debug!(job = %job_options.job_id, state = ?result.state, "print finished");
    Ok(())
}

fn report_totals(result: &PrintJobResult) {
    println!("Front checks:  {}", result.totals.front_rows_total);
    println!("Back subtotal: {}", result.totals.back_subtotal);
    println!("Total deposit: {}", result.totals.front_total);
}

/// Writes the finished document to a file instead of a printer.
struct PdfFileAdapter {
    path: PathBuf,
}

struct PdfFileHandle {
    job_id: PrintJobId,
    path: PathBuf,
}

impl PlatformAdapter for PdfFileAdapter {
    type Error = anyhow::Error;
    type JobHandle = PdfFileHandle;

    fn begin_job(&self, options: &PrintJobOptions) -> Result<Self::JobHandle, Self::Error> {
        Ok(PdfFileHandle {
            job_id: options.job_id,
            path: self.path.clone(),
        })
    }
}

impl PlatformJobHandle for PdfFileHandle {
    type Error = anyhow::Error;

    fn submit_page(&mut self, page: SpoolPage) -> Result<(), Self::Error> {
        tracing::debug!(job = %self.job_id, page = page.page_number, "page ready");
        Ok(())
    }

    fn finish(self, document: &[u8]) -> Result<(), Self::Error> {
        fs::write(&self.path, document)
            .with_context(|| format!("write PDF {}", self.path.display()))
    }

    fn abort(self, reason: &str) {
        tracing::warn!(job = %self.job_id, reason, "PDF export aborted");
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    Ok(())
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => resolve_input_path(&path),
        None => std::env::current_dir().context("determine current directory"),
    }
}

fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
