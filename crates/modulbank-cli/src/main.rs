//! CLI для API МодульБанка.
//!
//! # Запуск
//!
//! ```bash
//! # Счета и остатки (токен можно положить в .env)
//! MODULBANK_TOKEN=... modulbank accounts
//! modulbank balance 58c20343-5d3b-422c-b98b-a5ec037df782
//!
//! # Входящие операции за апрель, вторая страница
//! modulbank operations 58c20343-... --category debet --from 2016-04-01 --till 2016-04-30 --page 1
//!
//! # Черновик платёжки: сначала посмотреть документ, потом отправить
//! modulbank draft order.json --dry-run
//! modulbank --sandbox draft order.json --output sent.txt
//!
//! # Проверка подписи уведомления
//! modulbank verify-notify notify.json
//! ```

use std::fs;
use std::io::{Write, stdout};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use modulbank::config::DEFAULT_API_URL;
use modulbank::{
    ClientConfig, ModulbankClient, NotifyRequest, OperationCategory, PaymentOrder, SearchOptions,
};
use tracing::{debug, info};

const TOKEN_REQUIRED: &str = "token is required (--token or MODULBANK_TOKEN)";

/// Клиент API МодульБанка.
///
/// Настройки берутся из аргументов, переменных окружения `MODULBANK_*`
/// или файла `.env` в текущем каталоге.
#[derive(Parser, Debug)]
#[command(name = "modulbank")]
#[command(version, about)]
struct Args {
    /// Токен из личного кабинета.
    #[arg(long, env = "MODULBANK_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Режим песочницы.
    #[arg(long, env = "MODULBANK_SANDBOX", global = true)]
    sandbox: bool,

    /// Размер страницы операций (не больше 50).
    #[arg(long, env = "MODULBANK_PAGE_SIZE", default_value_t = 50, global = true)]
    page_size: u32,

    /// Адрес API.
    #[arg(long, env = "MODULBANK_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Компании пользователя и их счета.
    Accounts,

    /// Остаток на счёте.
    Balance {
        /// Системный идентификатор счёта.
        account_id: String,
    },

    /// История операций по счёту.
    Operations {
        /// Системный идентификатор счёта.
        account_id: String,

        /// Направление платежа.
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,

        /// Операции начиная с даты (YYYY-MM-DD).
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Операции по дату включительно (YYYY-MM-DD).
        #[arg(long)]
        till: Option<NaiveDate>,

        /// Номер страницы, начиная с 0.
        #[arg(long, default_value_t = 0, conflicts_with = "no_paging")]
        page: u32,

        /// Не передавать параметры постраничного вывода.
        #[arg(long)]
        no_paging: bool,
    },

    /// Черновик платёжного поручения из JSON-файла.
    Draft {
        /// Файл с платёжным поручением.
        order: PathBuf,

        /// Только напечатать документ обмена, ничего не отправляя.
        #[arg(long)]
        dry_run: bool,

        /// Куда сохранить документ обмена. При --dry-run по умолчанию stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Проверка подписи уведомления о новой операции.
    VerifyNotify {
        /// Файл с JSON уведомления.
        notify: PathBuf,
    },
}

/// Направление платежа для аргументов CLI.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    /// Входящий платёж.
    Debet,
    /// Исходящий платёж.
    Credit,
}

impl From<CategoryArg> for OperationCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Debet => OperationCategory::Debet,
            CategoryArg::Credit => OperationCategory::Credit,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "loaded .env");
    }
    let args = Args::parse();

    match &args.command {
        Command::Accounts => {
            let companies = client(&args)?.accounts().await.context("fetch accounts")?;
            let mut out = stdout().lock();
            for company in &companies {
                writeln!(out, "{company}")?;
                for account in &company.bank_accounts {
                    writeln!(out, "  {account}")?;
                }
            }
        }
        Command::Balance { account_id } => {
            let balance = client(&args)?
                .balance(account_id)
                .await
                .context("fetch balance")?;
            println!("{balance}");
        }
        Command::Operations {
            account_id,
            category,
            from,
            till,
            page,
            no_paging,
        } => {
            let search = SearchOptions {
                category: category.map(Into::into),
                date_from: *from,
                date_till: *till,
                page: (!no_paging).then_some(*page),
            };
            let operations = client(&args)?
                .operations(account_id, search)
                .await
                .context("fetch operations")?;
            info!(count = operations.len(), "operations received");
            let mut out = stdout().lock();
            for operation in &operations {
                writeln!(out, "{operation}")?;
            }
        }
        Command::Draft {
            order,
            dry_run,
            output,
        } => {
            let order = read_order(order)?;
            if *dry_run {
                let document = order
                    .to_exchange()
                    .render()
                    .context("render exchange document")?;
                write_document(output.as_deref(), &document)?;
                eprintln!("Rendered payment order {}", order.doc_num());
                return Ok(());
            }

            let response = client(&args)?
                .create_payment_draft(&order)
                .await
                .context("upload payment draft")?;
            if let Some(path) = output {
                write_document(Some(path), &response.document)?;
            }
            for message in &response.errors {
                eprintln!("  {message}");
            }
            let rejected = response.errors.len();
            ensure!(rejected == 0, "bank rejected {rejected} payment order(s)");
            eprintln!("Loaded {} payment order(s)", response.total_loaded);
        }
        Command::VerifyNotify { notify } => {
            let token = args.token.as_deref().context(TOKEN_REQUIRED)?;
            let raw = fs::read_to_string(notify)
                .with_context(|| format!("read {}", notify.display()))?;
            let request: NotifyRequest = serde_json::from_str(&raw)
                .with_context(|| format!("parse notification {}", notify.display()))?;
            if !request.check_signature(token) {
                bail!("signature mismatch for {}", notify.display());
            }
            println!("signature OK");
        }
    }

    Ok(())
}

fn client(args: &Args) -> Result<ModulbankClient> {
    let token = args.token.clone().context(TOKEN_REQUIRED)?;
    let config = ClientConfig::new(token)
        .with_sandbox(args.sandbox)
        .with_page_size(args.page_size)?
        .with_base_url(&args.api_url);
    debug!(?config, "client config");
    Ok(ModulbankClient::new(config)?)
}

fn read_order(path: &Path) -> Result<PaymentOrder> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read order file: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse order file: {}", path.display()))
}

fn write_document(output: Option<&Path>, document: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, document).with_context(|| format!("write {}", path.display()))
        }
        None => {
            let mut out = stdout().lock();
            out.write_all(document.as_bytes())?;
            writeln!(out)?;
            Ok(())
        }
    }
}
