use anyhow::Context;
use clap::Parser;
use extract_ai::analyzer::{self, UploadedFile};
use extract_ai::cli::{Cli, Commands};
use extract_ai::config::Config;
use extract_ai::llm::GroqClient;
use extract_ai::server::{self, AppState};
use extract_ai_common::{combine_csv_reports, export_json_payload};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // .envがなくてもよい
    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.host.clone());
            let port = port.unwrap_or(config.port);
            let state = AppState::from_config(config)?;
            server::serve(state, &host, port).await?;
        }

        Commands::Analyze { files, mime, output, csv } => {
            let client = GroqClient::from_config(&config)?;

            let mut envelopes = Vec::with_capacity(files.len());
            for path in &files {
                let file = UploadedFile::from_path(path, mime.as_deref())?;
                let envelope = analyzer::analyze_upload(&file, &client)
                    .await
                    .with_context(|| format!("解析に失敗: {}", path.display()))?;
                eprintln!("✔ {} ({})", path.display(), envelope.summary.format);
                envelopes.push(envelope);
            }

            let rendered = if csv {
                let reports: Vec<&str> = envelopes.iter().map(|e| e.csv_report.as_str()).collect();
                if reports.len() == 1 {
                    reports[0].to_string()
                } else {
                    combine_csv_reports(&reports)
                }
            } else {
                let values = envelopes
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<Result<Vec<_>, _>>()?;
                serde_json::to_string_pretty(&export_json_payload(values))?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    eprintln!("✔ 結果を保存: {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Config { show } => {
            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  APIベースURL: {}", config.base_url);
                println!("  CORS許可オリジン: {}", config.cors_origins.join(", "));
                println!("  待ち受け: {}:{}", config.host, config.port);
                println!(
                    "  タイムアウト: {}",
                    config
                        .request_timeout
                        .map(|t| format!("{}秒", t.as_secs()))
                        .unwrap_or_else(|| "既定".to_string())
                );
                println!("  APIキー: {}", if config.has_api_key() { "設定済み" } else { "未設定" });
            } else {
                println!("`extract-ai config --show` で現在の設定を表示します");
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "extract_ai=debug,tower_http=debug"
    } else {
        "extract_ai=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
