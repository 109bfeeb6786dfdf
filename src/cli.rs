use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "extract-ai")]
#[command(about = "ファイルのAI解析・統一JSONレポート生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// HTTPサーバーを起動
    Serve {
        /// 待ち受けアドレス（デフォルト: HOST または 0.0.0.0）
        #[arg(long)]
        host: Option<String>,

        /// ポート番号（デフォルト: PORT または 5000）
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// ファイルを解析してJSONレポートを出力
    Analyze {
        /// 解析するファイル
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// MIMEタイプを指定（省略時は拡張子から推定）
        #[arg(short, long)]
        mime: Option<String>,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSONの代わりにCSVレポートを出力
        #[arg(long)]
        csv: bool,
    },

    /// 設定を表示
    Config {
        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
