use clap::Parser;
use newsdesk::core::export::CategoryExporter;
use newsdesk::core::site::Outcome;
use newsdesk::domain::ports::{ConfigProvider, ContentProvider};
use newsdesk::utils::error::{CmsError, ErrorSeverity};
use newsdesk::utils::{logger, validation::Validate};
use newsdesk::{Cli, Command, HttpContentProvider, LocalStorage, MenuCache, NavTree, SiteConfig, SiteRenderer};
use serde::Serialize;

const EXIT_NOT_FOUND: i32 = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logging() {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting newsdesk CLI");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let exit_code = match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => report(&e),
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn run(command: Command, config: &SiteConfig) -> Result<i32, CmsError> {
    let provider = build_provider(config)?;

    match command {
        Command::Page { slug } => {
            let renderer = SiteRenderer::from_config(provider, config);
            print_outcome("Page", renderer.render_page(&slug).await)
        }
        Command::Post { slug } => {
            let renderer = SiteRenderer::from_config(provider, config);
            print_outcome("Post", renderer.render_post(&slug).await)
        }
        Command::Category { slug } => {
            let renderer = SiteRenderer::from_config(provider, config);
            print_outcome("Category", renderer.render_category(&slug).await)
        }
        Command::Menu { location, watch } => {
            if watch {
                watch_menu(provider, location, config).await
            } else {
                let menu = provider.fetch_menu(&location).await?;
                print_json(&NavTree::from_menu(&menu))?;
                Ok(0)
            }
        }
        Command::ExportCategories { file } => {
            let storage = LocalStorage::new(config.output_path().to_string());
            let exporter = CategoryExporter::new(storage, config.output_path());
            let file_name = file.as_deref().unwrap_or(config.export_file_name());

            let saved_path = exporter.export_from(&provider, file_name).await?;
            tracing::info!("✅ Category export completed successfully!");
            println!("✅ Category export completed successfully!");
            println!("📁 Output saved to: {}", saved_path);
            Ok(0)
        }
    }
}

fn build_provider(config: &SiteConfig) -> Result<HttpContentProvider, CmsError> {
    let mut provider = HttpContentProvider::from_config(config)?.with_headers(config.api_headers());
    if let Some(token) = config.api_token() {
        provider = provider.with_token(token);
    }
    Ok(provider)
}

/// 每次刷新成功就印出新的導覽樹，直到 Ctrl-C
async fn watch_menu(
    provider: HttpContentProvider,
    location: String,
    config: &SiteConfig,
) -> Result<i32, CmsError> {
    let interval = config.menu_refresh_interval();
    tracing::info!("🔄 Watching '{}' menu every {:?}", location, interval);
    let mut cache = MenuCache::spawn(provider, location, interval);

    loop {
        let changed = tokio::select! {
            changed = cache.changed() => changed,
            _ = tokio::signal::ctrl_c() => false,
        };
        if !changed {
            tracing::info!("Stopping menu watch for '{}'", cache.location());
            break;
        }
        if let Some(menu) = cache.snapshot() {
            print_json(&NavTree::from_menu(&menu))?;
        }
    }

    cache.shutdown();
    Ok(0)
}

fn print_outcome<T: Serialize>(kind: &str, outcome: Outcome<T>) -> Result<i32, CmsError> {
    match outcome {
        Outcome::Found(rendered) => {
            print_json(&rendered)?;
            Ok(0)
        }
        Outcome::NotFound { slug } => {
            eprintln!("🔍 {} '{}' could not be found", kind, slug);
            Ok(EXIT_NOT_FOUND)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CmsError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(e: &CmsError) -> i32 {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    if e.is_not_found() {
        return EXIT_NOT_FOUND;
    }

    // 根據錯誤嚴重程度決定退出碼
    match e.severity() {
        ErrorSeverity::Low => 0,      // 警告，但成功
        ErrorSeverity::Medium => 2,   // 重試錯誤
        ErrorSeverity::High => 1,     // 處理錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    }
}
