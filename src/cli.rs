use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parking-scan")]
#[command(about = "駐車レシートOCR・記録管理・Excel出力ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力（-v: info, -vv: debug, -vvv: trace）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// 保存先ディレクトリ（設定より優先）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// レシート画像を読み取って保存（ファイル・フォルダを指定）
    Scan {
        /// 画像ファイルまたはフォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 既存のレコードを残して追加する（デフォルトは置き換え）
        #[arg(short, long)]
        append: bool,
    },

    /// 保存済みレコードを表示
    List {
        /// JSONで出力（画像は除く）
        #[arg(long)]
        json: bool,
    },

    /// Excelに出力
    Export {
        /// 出力ファイル/ディレクトリ（デフォルト: カレント/parking_data.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 保存済みレコードをすべて削除
    Clear {
        /// 確認をスキップ
        #[arg(short, long)]
        yes: bool,
    },

    /// OCRテキストファイルから日付・金額を抽出（確認用）
    Parse {
        /// OCR結果のテキストファイル
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// OCRコマンドを設定
        #[arg(long)]
        set_tesseract: Option<String>,

        /// OCR言語を設定
        #[arg(long)]
        set_language: Option<String>,

        /// 保存先ディレクトリを設定
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
