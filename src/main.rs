use anyhow::Context;
use clap::Parser;
use dreamdrape_client::admin::{BulkAction, BulkActionDispatcher, BulkOutcome, DashboardStatsPoller, ExportRunner, SidebarState};
use dreamdrape_client::api::{HttpApi, StorefrontApi};
use dreamdrape_client::cart::CartSync;
use dreamdrape_client::cli::{AdminCommand, CartCommand, Cli, Commands, WishlistCommand};
use dreamdrape_client::config::Config;
use dreamdrape_client::notify::NotificationCenter;
use dreamdrape_client::search::{SearchPhase, SearchSuggester};
use dreamdrape_client::store::LocalStore;
use dreamdrape_client::ui::terminal::TerminalUi;
use dreamdrape_client::{logging, ClientError};
use dreamdrape_common::{AddToCart, Column, QuantityInput, RowId, TableRow};
use std::sync::Arc;
use std::time::Duration;

// 擬似的なタイピング間隔（デバウンスより短い）
const KEYSTROKE_INTERVAL: Duration = Duration::from_millis(50);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose).context("failed to initialise logging")?;
    let mut config = Config::load().context("failed to load config")?;

    let ui = Arc::new(TerminalUi::new(&config.base_url, cli.yes));
    let api: Arc<dyn StorefrontApi> = Arc::new(HttpApi::new(&config).context("failed to build HTTP client")?);

    match cli.command {
        Commands::Search { text, select } => {
            let mut suggester = SearchSuggester::new(api, ui.clone(), ui.clone(), &config);

            let mut typed = String::new();
            for ch in text.chars() {
                typed.push(ch);
                suggester.on_input(&typed);
                tokio::time::sleep(KEYSTROKE_INTERVAL).await;
            }

            // デバウンスと取得の完了を待つ
            let deadline = tokio::time::Instant::now() + config.search_debounce() + config.request_timeout();
            while matches!(suggester.phase(), SearchPhase::Pending(_)) && tokio::time::Instant::now() < deadline {
                tokio::time::sleep(KEYSTROKE_INTERVAL).await;
            }

            match (suggester.phase(), select) {
                (SearchPhase::Displaying(_), Some(index)) => {
                    if suggester.select(index).is_none() {
                        anyhow::bail!("no suggestion at index {}", index);
                    }
                }
                (SearchPhase::Displaying(_), None) => {}
                _ => println!("候補はありません"),
            }
        }

        Commands::Cart { action } => {
            let notifier = NotificationCenter::storefront(ui.clone(), &config);
            let cart = CartSync::new(api, notifier, ui.clone(), ui.clone(), ui.clone(), &config);
            match action {
                CartCommand::Count => {
                    cart.refresh_count().await?;
                }
                CartCommand::Add { product_id, quantity, size, color } => {
                    let request = AddToCart::new(product_id, quantity, size.as_deref(), color.as_deref());
                    cart.add(&request).await?;
                }
                CartCommand::Remove { item_id } => {
                    if !cart.remove(item_id).await? {
                        println!("キャンセルしました");
                    }
                }
                CartCommand::Update { item_id, quantity } => {
                    let mut input = QuantityInput::new(config.quantity_min, config.quantity_max);
                    let quantity = input.on_change(&quantity);
                    cart.update(item_id, quantity).await?;
                }
            }
        }

        Commands::Wishlist { action } => {
            let notifier = NotificationCenter::storefront(ui.clone(), &config);
            let cart = CartSync::new(api, notifier, ui.clone(), ui.clone(), ui.clone(), &config);
            match action {
                WishlistCommand::Add { product_id } => match cart.add_to_wishlist(product_id).await {
                    Err(ClientError::AuthRequired) => {
                        // ログイン画面への遷移を待ってから終了
                        tokio::time::sleep(config.auth_redirect_delay() + KEYSTROKE_INTERVAL).await;
                        return Err(ClientError::AuthRequired.into());
                    }
                    other => other?,
                },
                WishlistCommand::Remove { product_id } => cart.remove_from_wishlist(product_id).await?,
            }
        }

        Commands::Newsletter { email } => {
            let notifier = NotificationCenter::storefront(ui.clone(), &config);
            let cart = CartSync::new(api, notifier, ui.clone(), ui.clone(), ui.clone(), &config);
            cart.newsletter_signup(&email).await?;
        }

        Commands::Admin { action } => {
            let notifier = NotificationCenter::admin(ui.clone(), &config);
            match action {
                AdminCommand::Stats { watch } => {
                    let poller = Arc::new(DashboardStatsPoller::new(
                        api,
                        ui.clone(),
                        ui.clone(),
                        config.stats_poll_interval(),
                    ));
                    if watch {
                        poller.start().await.context("stats poller stopped")?;
                    } else {
                        poller.poll_once().await?;
                    }
                }
                AdminCommand::Charts => {
                    let poller = DashboardStatsPoller::new(api, ui.clone(), ui.clone(), config.stats_poll_interval());
                    let rendered = poller.load_charts().await;
                    println!("✔ {}件のチャートデータを取得", rendered);
                }
                AdminCommand::Bulk { action, ids, status, filter } => {
                    let dispatcher = BulkActionDispatcher::new(api, notifier, ui.clone(), ui.clone(), ui.clone());
                    let rows: Vec<TableRow> = ids
                        .into_iter()
                        .map(|id| TableRow::new(RowId::from(id.as_str()), vec![id]))
                        .collect();
                    let mut table = config.admin_table(vec![Column::sortable("ID")]).with_rows(rows);
                    if let Some(query) = filter {
                        table.set_filter(&query);
                    }
                    table.set_all(true);
                    let action = BulkAction::parse(&action, status.as_deref());
                    match dispatcher.dispatch_selection(&table, &action).await? {
                        BulkOutcome::Applied { message } => {
                            println!("✔ {}", message.unwrap_or_else(|| "完了".to_string()));
                        }
                        BulkOutcome::Cancelled => println!("キャンセルしました"),
                    }
                }
                AdminCommand::Export { export_type, format } => {
                    let runner = ExportRunner::new(api, notifier, ui.clone(), ui.clone());
                    runner.export(&export_type, &format).await?;
                }
                AdminCommand::Sidebar { toggle } => {
                    let mut sidebar = SidebarState::restore(LocalStore::open_default()?);
                    if toggle {
                        sidebar.toggle()?;
                    }
                    println!("サイドバー: {}", if sidebar.is_collapsed() { "折りたたみ" } else { "展開" });
                }
            }
        }

        Commands::Config { set_base_url, show } => {
            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ 接続先を設定しました: {}", config.base_url);
            }
            if show {
                print_config(&config);
            }
        }
    }

    Ok(())
}

fn print_config(config: &Config) {
    println!("設定:");
    println!("  接続先: {}", config.base_url);
    println!("  セッション: {}", if config.session_cookie.is_some() { "設定済み" } else { "未設定" });
    println!("  検索デバウンス: {}ms", config.search_debounce_ms);
    println!("  通知表示時間: {}ms", config.notification_ttl_ms);
    println!("  管理通知の自動消去: {}", config.admin_auto_dismiss);
    println!("  集計ポーリング間隔: {}s", config.stats_poll_interval_secs);
    println!("  全選択の範囲: {:?}", config.select_all_scope);
}
