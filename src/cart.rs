//! カート・ウィッシュリスト同期
//!
//! CartStateはサーバー往復が成功したときだけ更新する（見込みで増やさない）。
//! 追加・削除の後は件数を取り直す。

use crate::api::StorefrontApi;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::notify::NotificationCenter;
use crate::ui::{CartBadge, CartBadgeView, Confirm, Navigator};
use dreamdrape_common::validation::is_valid_email;
use dreamdrape_common::AddToCart;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// カート件数（常に0以上、最後に成功したレスポンスの値）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartState {
    pub count: u32,
}

pub struct CartSync {
    api: Arc<dyn StorefrontApi>,
    notifier: NotificationCenter,
    badge: Arc<dyn CartBadgeView>,
    confirm: Arc<dyn Confirm>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    auth_redirect_delay: Duration,
    state: Mutex<CartState>,
}

impl CartSync {
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        notifier: NotificationCenter,
        badge: Arc<dyn CartBadgeView>,
        confirm: Arc<dyn Confirm>,
        navigator: Arc<dyn Navigator>,
        config: &Config,
    ) -> Self {
        Self {
            api,
            notifier,
            badge,
            confirm,
            navigator,
            login_path: config.login_path.clone(),
            auth_redirect_delay: config.auth_redirect_delay(),
            state: Mutex::new(CartState::default()),
        }
    }

    pub fn state(&self) -> CartState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 件数を取得してバッジを更新する。失敗時は状態を変えない
    pub async fn refresh_count(&self) -> Result<u32> {
        match self.api.cart_count().await {
            Ok(resp) => {
                *self.state.lock().unwrap_or_else(|e| e.into_inner()) = CartState { count: resp.count };
                self.badge.render(CartBadge::from_count(resp.count));
                debug!(count = resp.count, "cart count refreshed");
                Ok(resp.count)
            }
            Err(e) => {
                warn!(error = %e, "cart count refresh failed");
                Err(e)
            }
        }
    }

    /// カートに追加する。成功したら通知して件数を取り直す
    pub async fn add(&self, request: &AddToCart) -> Result<()> {
        match self.api.add_to_cart(request).await {
            Ok(()) => {
                info!(product_id = request.product_id, quantity = request.quantity, "added to cart");
                self.notifier.success("Product added to cart!");
                // 件数の再取得に失敗してもバッジが古いだけ
                let _ = self.refresh_count().await;
                Ok(())
            }
            Err(e) => {
                self.notifier.error(e.user_message("Error adding product to cart"));
                Err(e)
            }
        }
    }

    /// カートから削除する。確認が取れなければリクエストしない
    pub async fn remove(&self, item_id: u64) -> Result<bool> {
        if !self
            .confirm
            .confirm("Are you sure you want to remove this item from your cart?")
        {
            debug!(item_id, "cart removal declined");
            return Ok(false);
        }
        match self.api.remove_from_cart(item_id).await {
            Ok(redirect) => {
                self.navigator.navigate(&redirect.location);
                Ok(true)
            }
            Err(e) => {
                self.notifier.error(e.user_message("Error removing item from cart"));
                Err(e)
            }
        }
    }

    /// 数量変更（フォームPOST、ページ遷移あり）
    pub async fn update(&self, item_id: u64, quantity: u32) -> Result<()> {
        match self.api.update_cart(item_id, quantity).await {
            Ok(redirect) => {
                self.navigator.navigate(&redirect.location);
                Ok(())
            }
            Err(e) => {
                self.notifier.error(e.user_message("Error updating cart"));
                Err(e)
            }
        }
    }

    /// ウィッシュリストに追加する
    ///
    /// 失敗はすべて未ログインとして扱い、通知の後に少し待ってログイン画面へ遷移する。
    pub async fn add_to_wishlist(&self, product_id: u64) -> Result<()> {
        match self.api.add_to_wishlist(product_id).await {
            Ok(()) => {
                self.notifier.success("Added to wishlist!");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, product_id, "wishlist add failed, login required");
                self.notifier.error("Please login to add items to wishlist");
                self.redirect_to_login_later();
                Err(ClientError::AuthRequired)
            }
        }
    }

    pub async fn remove_from_wishlist(&self, product_id: u64) -> Result<()> {
        match self.api.remove_from_wishlist(product_id).await {
            Ok(redirect) => {
                self.navigator.navigate(&redirect.location);
                Ok(())
            }
            Err(e) => {
                self.notifier.error(e.user_message("Error removing item from wishlist"));
                Err(e)
            }
        }
    }

    /// ニュースレター登録。メール形式が不正ならリクエストしない
    pub async fn newsletter_signup(&self, email: &str) -> Result<()> {
        let email = email.trim();
        if !is_valid_email(email) {
            self.notifier.error("Please enter a valid email address");
            return Err(ClientError::Validation("email".into()));
        }
        match self.api.newsletter_signup(email).await {
            Ok(()) => {
                self.notifier.success("Thank you for subscribing to our newsletter!");
                Ok(())
            }
            Err(e) => {
                self.notifier.error(e.user_message("Error subscribing to newsletter"));
                Err(e)
            }
        }
    }

    fn redirect_to_login_later(&self) {
        let navigator = self.navigator.clone();
        let login_path = self.login_path.clone();
        let delay = self.auth_redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(&login_path);
        });
    }
}
