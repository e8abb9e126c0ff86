//! # xtask - Автоматизация сборки проекта
//!
//! Команды запускаются из корня воркспейса независимо от текущего каталога.
//! См. [`HELP_TEXT`] для списка команд.
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use xshell::{Shell, cmd};

/// Текст справки для команды xtask.
pub const HELP_TEXT: &str = r#"xtask

Использование:
  cargo run -p xtask -- <команда>

Команды:
  help          Показать это сообщение
  fmt           Запустить rustfmt
  fmt-check     Проверить форматирование (CI)
  clippy        Запустить clippy (воркспейс, а также modulbank без HTTP)
  test          Запустить тесты через nextest и doc-тесты
  ci            fmt-check + clippy + сборка + test (профиль CI)
  sample-draft  Напечатать пример документа 1CClientBankExchange из фикстуры

Примечание:
  cargo-nextest устанавливается автоматически при первом запуске тестов
"#;

/// Фикстура платёжного поручения для `sample-draft`.
const SAMPLE_ORDER: &str = "crates/e2e-tests/fixtures/order.json";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let task = args.next().unwrap_or_else(|| "help".to_string());

    let sh = Shell::new()?;
    sh.change_dir(project_root()?);

    match task.as_str() {
        "help" | "-h" | "--help" => {
            println!("{HELP_TEXT}");
            Ok(())
        }
        "fmt" => Ok(cmd!(sh, "cargo +nightly fmt --all").run()?),
        "fmt-check" => fmt_check(&sh),
        "clippy" => clippy(&sh),
        "test" => test(&sh, false),
        "ci" => {
            fmt_check(&sh)?;
            clippy(&sh)?;
            // e2e-тестам нужен собранный бинарник `modulbank`
            cmd!(sh, "cargo build --workspace").run()?;
            test(&sh, true)
        }
        "sample-draft" => {
            let order = project_root()?.join(SAMPLE_ORDER);
            cmd!(
                sh,
                "cargo run -q -p modulbank-cli -- draft --dry-run {order}"
            )
            .run()?;
            Ok(())
        }
        other => bail!("Неизвестная команда: {other}\n\nЗапустите: cargo run -p xtask -- help"),
    }
}

fn fmt_check(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo +nightly fmt --all -- --check").run()?;
    Ok(())
}

/// Clippy по воркспейсу и отдельно по библиотеке без транспорта `reqwest`.
fn clippy(sh: &Shell) -> Result<()> {
    cmd!(
        sh,
        "cargo +nightly clippy --workspace --all-targets -- -D warnings"
    )
    .run()?;
    cmd!(
        sh,
        "cargo +nightly clippy -p modulbank --no-default-features -- -D warnings"
    )
    .run()?;
    Ok(())
}

/// Тесты через nextest; doc-тесты отдельно, nextest их не запускает.
fn test(sh: &Shell, ci: bool) -> Result<()> {
    ensure_nextest(sh)?;
    if ci {
        cmd!(sh, "cargo nextest run --workspace --profile ci").run()?;
    } else {
        cmd!(sh, "cargo nextest run --workspace").run()?;
    }
    cmd!(sh, "cargo test --workspace --doc").run()?;
    Ok(())
}

/// Корень воркспейса: родитель каталога манифеста xtask.
fn project_root() -> Result<PathBuf> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").map(PathBuf::from)?;
    let root = manifest_dir
        .parent()
        .context("CARGO_MANIFEST_DIR не имеет родительской директории")?;
    Ok(root.to_path_buf())
}

/// Устанавливает cargo-nextest, если его нет.
fn ensure_nextest(sh: &Shell) -> Result<()> {
    if cmd!(sh, "cargo nextest --version").quiet().run().is_ok() {
        return Ok(());
    }

    eprintln!("cargo-nextest не найден, устанавливаю...");
    cmd!(sh, "cargo install cargo-nextest --locked").run()?;
    Ok(())
}
