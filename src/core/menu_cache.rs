use crate::domain::model::Menu;
use crate::domain::ports::ContentProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(1);

/// 定期重新抓取某個位置的選單
///
/// 背景任務是唯一的寫入者，每次刷新直接覆蓋舊值（最後寫入為準），
/// 讀取端只拿快照。刷新失敗時保留原本的值。
pub struct MenuCache {
    location: String,
    receiver: watch::Receiver<Option<Arc<Menu>>>,
    task: JoinHandle<()>,
}

impl MenuCache {
    /// 必須在 tokio runtime 內呼叫，第一次抓取會立即執行。
    /// 間隔最小為 1ms（`tokio::time::interval` 不接受 0）
    pub fn spawn<P>(provider: P, location: impl Into<String>, interval: Duration) -> Self
    where
        P: ContentProvider + 'static,
    {
        let location = location.into();
        let interval = interval.max(MIN_REFRESH_INTERVAL);
        let (sender, receiver) = watch::channel(None);

        let task_location = location.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                if sender.is_closed() {
                    break;
                }

                match provider.fetch_menu(&task_location).await {
                    Ok(menu) => {
                        tracing::debug!(
                            "🔄 Refreshed '{}' menu ({} items)",
                            task_location,
                            menu.items.len()
                        );
                        sender.send_replace(Some(Arc::new(menu)));
                    }
                    Err(e) => {
                        tracing::warn!(
                            "⚠️ Menu refresh for '{}' failed, keeping previous value: {}",
                            task_location,
                            e
                        );
                    }
                }
            }
        });

        Self {
            location,
            receiver,
            task,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn snapshot(&self) -> Option<Arc<Menu>> {
        self.receiver.borrow().clone()
    }

    /// 等待下一次成功刷新；背景任務停止後回傳 `false`
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Menu>>> {
        self.receiver.clone()
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for MenuCache {
    fn drop(&mut self) {
        self.task.abort();
    }
}
