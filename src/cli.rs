use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dreamdrape")]
#[command(about = "Dream-Drape ストアフロント/管理コンソールクライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力（-v: info, -vv: debug）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// 確認プロンプトをすべて承諾
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 検索候補を表示（入力を1文字ずつ送ってデバウンスを通す）
    Search {
        #[arg(required = true)]
        text: String,

        /// 候補を選択して検索を実行（0始まり）
        #[arg(long)]
        select: Option<usize>,
    },

    /// カート操作
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },

    /// ウィッシュリスト操作
    Wishlist {
        #[command(subcommand)]
        action: WishlistCommand,
    },

    /// ニュースレター登録
    Newsletter {
        #[arg(required = true)]
        email: String,
    },

    /// 管理コンソール
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },

    /// 設定を表示/編集
    Config {
        /// 接続先URLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// カート件数を表示
    Count,

    /// 商品を追加
    Add {
        product_id: u64,

        /// 数量（不正値は1）
        #[arg(short, long, allow_negative_numbers = true)]
        quantity: Option<i64>,

        #[arg(long)]
        size: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// 商品を削除（確認あり）
    Remove { item_id: u64 },

    /// 数量を変更（設定の範囲に丸める）
    Update { item_id: u64, quantity: String },
}

#[derive(Subcommand)]
pub enum WishlistCommand {
    Add { product_id: u64 },
    Remove { product_id: u64 },
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// 集計を表示
    Stats {
        /// 定期的に再取得し続ける
        #[arg(long)]
        watch: bool,
    },

    /// チャート用データを表示
    Charts,

    /// 一括操作
    Bulk {
        /// 操作名（delete, update_status, ...）
        action: String,

        /// 対象ID
        #[arg(required = true)]
        ids: Vec<String>,

        /// update_status の対象ステータス
        #[arg(long)]
        status: Option<String>,

        /// 全選択の前に適用する絞り込み
        #[arg(long)]
        filter: Option<String>,
    },

    /// データをエクスポート
    Export {
        /// 種類（orders, products, users, ...）
        export_type: String,

        #[arg(short, long, default_value = "csv")]
        format: String,
    },

    /// サイドバーの開閉状態
    Sidebar {
        /// 開閉を切り替える
        #[arg(long)]
        toggle: bool,
    },
}
