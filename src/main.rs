pub mod app;
mod config;
mod logger;
mod storage;
mod theme;
mod todo;

use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::Terminal;
use std::time::Duration;

use app::terminal_util::{cleanup_terminal, setup_terminal};
use app::TodoApp;
use config::Config;
use storage::Storage;
use todo::TodoStore;

#[tokio::main]
async fn main() -> Result<()> {
    // 設定を読み込む
    let config = Config::load()?;

    // プログラム開始時にログファイルをリセットして初期化
    if let Err(e) = logger::reset_log_file(&config.log_file) {
        eprintln!("Failed to reset {}: {}", config.log_file, e);
    }
    if let Err(e) = logger::init_logger(&config.log_file) {
        eprintln!("Failed to initialize debug logger: {}", e);
    } else {
        logger::log_debug("Debug logger initialized.");
    }

    // ストレージを準備し、保存済みの状態をロード
    let storage = Storage::new(config.data_dir.clone())?;
    let store = TodoStore::load(storage).await;
    debug_log!(
        "Loaded state: {} items, category={:?}, mode={:?}",
        store.list().len(),
        store.category(),
        store.mode()
    );

    // ターミナルをセットアップ
    let mut terminal = setup_terminal()?;

    let mut app = TodoApp::new(store);
    let result = run_app(&mut app, &mut terminal);

    // ターミナルをクリーンアップ
    cleanup_terminal(&mut terminal)?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(
    app: &mut TodoApp,
    terminal: &mut Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            app.render(f);
        })?;

        // イベントを非ブロッキングで処理
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if app.handle_key_event(key)? {
                        return Ok(());
                    }
                }
                Event::Resize(_, _) => {
                    // 次のdrawで再レイアウトされる
                }
                _ => {}
            }
        }
    }
}
