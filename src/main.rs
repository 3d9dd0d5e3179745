use clap::Parser;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use parking_scan::{cli, config, error, export, extractor, pipeline, scanner, store};
use cli::{Cli, Commands};
use config::Config;
use error::{ParkingScanError, Result};
use parking_scan_common::parse_receipt_text;
use store::{JsonFileSlot, RecordStore};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("ログ初期化に失敗: {}", e);
    }
}

fn open_store(cli: &Cli, config: &Config) -> Result<RecordStore<JsonFileSlot>> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => config.resolve_data_dir()?,
    };
    let slot = JsonFileSlot::new(&data_dir, &config.storage_key);
    tracing::debug!("保存スロット: {}", slot.path().display());
    Ok(RecordStore::open(slot))
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
    {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load_or_default();

    match &cli.command {
        Commands::Scan { paths, append } => {
            println!("🅿 parking-scan - レシート読み取り\n");

            // 1. 画像収集
            println!("[1/3] 画像を収集中...");
            let images = scanner::collect_images(paths)?;
            if images.is_empty() {
                let joined = paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ParkingScanError::NoImagesFound(joined));
            }
            println!("✔ {}枚の画像を検出\n", images.len());

            // 2. OCR
            println!("[2/3] OCR中... (言語: {})", config.language);
            let ocr = extractor::TesseractCli::from_config(&config);
            let outcome = pipeline::process_batch(&images, &ocr, &config.language, &progress_bar()).await;
            println!("✔ {}件を解析\n", outcome.records.len());

            for failure in &outcome.failures {
                let action = if failure.placeholder { "Not found で登録" } else { "スキップ" };
                println!("⚠ {} ({}): {}", failure.path.display(), action, failure.error);
            }

            // 3. 保存
            println!("[3/3] 保存中...");
            let mut store = open_store(&cli, &config)?;
            if *append {
                store.append(outcome.records)?;
            } else {
                store.replace(outcome.records)?;
            }
            println!("✔ 保存: {}件", store.len());

            println!("\n✅ 読み取り完了");
        }

        Commands::List { json } => {
            let store = open_store(&cli, &config)?;

            if *json {
                let rows: Vec<serde_json::Value> = store
                    .current()
                    .iter()
                    .map(|r| serde_json::json!({ "fileName": r.file_name, "date": r.date, "cost": r.cost }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if store.is_empty() {
                println!("保存済みのレコードはありません");
            } else {
                println!("解析済みデータ: {}件", store.len());
                for (i, r) in store.current().iter().enumerate() {
                    println!("  {:>3}. 📅 {} | 💰 {}  {}", i + 1, r.date, r.cost, r.file_name);
                }

                let missing_date = store.current().iter().filter(|r| !r.has_date()).count();
                let missing_cost = store.current().iter().filter(|r| !r.has_cost()).count();
                if missing_date > 0 || missing_cost > 0 {
                    println!("\n⚠ 読み取れなかった項目: 日付 {}件 / 金額 {}件", missing_date, missing_cost);
                }
            }
        }

        Commands::Export { output } => {
            println!("📤 parking-scan - エクスポート\n");

            let store = open_store(&cli, &config)?;
            let output_dir = output.clone().unwrap_or_else(|| std::path::PathBuf::from("."));

            println!("- Excelを生成中... ({}件)", store.len());
            let path = export::export_records(store.current(), &output_dir)?;
            println!("✔ Excel出力: {}", path.display());

            println!("\n✅ エクスポート完了");
        }

        Commands::Clear { yes } => {
            let mut store = open_store(&cli, &config)?;

            let confirmed = *yes
                || Confirm::new()
                    .with_prompt(format!("保存済みのデータ{}件をすべて削除しますか?", store.len()))
                    .default(false)
                    .interact()
                    .map_err(|e| ParkingScanError::Prompt(e.to_string()))?;

            if confirmed {
                store.clear()?;
                println!("✔ すべてのデータを削除しました");
            } else {
                println!("キャンセルしました");
            }
        }

        Commands::Parse { input } => {
            let content = std::fs::read_to_string(input)?;
            let fields = parse_receipt_text(&content);
            println!("📅 Date: {}", fields.date);
            println!("💰 Cost: {}", fields.cost);
        }

        Commands::Config { set_tesseract, set_language, set_data_dir, show } => {
            let mut config = config;

            if let Some(command) = set_tesseract {
                config.set_tesseract_command(command.clone())?;
                println!("✔ OCRコマンドを設定しました");
            }

            if let Some(language) = set_language {
                config.set_language(language.clone())?;
                println!("✔ OCR言語を設定しました");
            }

            if let Some(dir) = set_data_dir {
                config.set_data_dir(dir.clone())?;
                println!("✔ 保存先を設定しました");
            }

            if *show {
                println!("設定:");
                println!("  OCRコマンド: {}", config.tesseract_command);
                println!("  言語: {}", config.language);
                println!("  保存先: {}", config.resolve_data_dir()?.display());
                println!("  保存キー: {}", config.storage_key);
                match config.ocr_timeout_seconds {
                    Some(secs) => println!("  OCRタイムアウト: {}秒", secs),
                    None => println!("  OCRタイムアウト: なし"),
                }
            }
        }
    }

    Ok(())
}
