use crate::config::site_config::SiteConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "newsdesk")]
#[command(about = "Render CMS pages, posts and menus from the command line")]
pub struct Cli {
    #[arg(long, short = 'c', help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override api.base_url from the configuration file")]
    pub api_base_url: Option<String>,

    #[arg(long, short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    #[command(about = "Render a published page and print it as JSON")]
    Page { slug: String },
    #[command(about = "Render a published post")]
    Post { slug: String },
    #[command(about = "Render a category with its latest articles")]
    Category { slug: String },
    #[command(about = "Print the navigation tree for a menu location")]
    Menu {
        location: String,
        #[arg(long, help = "Keep polling and print every refreshed tree")]
        watch: bool,
    },
    #[command(about = "Export every category to CSV under export.output_path")]
    ExportCategories {
        #[arg(long, help = "Output file name (defaults to export.file_name)")]
        file: Option<String>,
    },
}

impl Cli {
    /// 讀取設定檔（沒有指定時使用預設值），再套用命令列覆寫
    pub fn load_config(&self) -> Result<SiteConfig> {
        let mut config = match &self.config {
            Some(path) => SiteConfig::from_file(path)?,
            None => SiteConfig::default(),
        };

        if let Some(base_url) = &self.api_base_url {
            config.api.base_url = base_url.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["newsdesk", "-v", "page", "about"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Page { ref slug } if slug == "about"));

        let cli = Cli::parse_from(["newsdesk", "menu", "footer", "--watch"]);
        assert!(matches!(cli.command, Command::Menu { watch: true, .. }));

        let cli = Cli::parse_from(["newsdesk", "export-categories", "--file", "cats.csv"]);
        assert!(
            matches!(cli.command, Command::ExportCategories { file: Some(ref f) } if f == "cats.csv")
        );
    }

    #[test]
    fn test_base_url_override() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[api]
base_url = "https://cms.example.com"
timeout_seconds = 3
"#
        )
        .unwrap();

        let path = temp_file.path().to_str().unwrap().to_string();
        let cli = Cli::parse_from([
            "newsdesk",
            "--config",
            path.as_str(),
            "--api-base-url",
            "http://127.0.0.1:8080",
            "post",
            "hello",
        ]);

        let config = cli.load_config().unwrap();
        assert_eq!(config.api_base_url(), "http://127.0.0.1:8080");
        assert_eq!(config.request_timeout_seconds(), 3);
    }

    #[test]
    fn test_defaults_without_config_file() {
        let cli = Cli::parse_from(["newsdesk", "category", "sports"]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.api_base_url(), "http://localhost:3000/api/v1");
    }
}
