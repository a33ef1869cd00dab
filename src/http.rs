use once_cell::sync::OnceCell;
use reqwest::Client;
use std::time::Duration;

/// 全局复用的 HTTP Client（统一连接池/Keep-Alive），避免每次请求重复创建。
///
/// 说明：
/// - 不同调用点需要不同的 timeout，这里按 timeout 维度拆分 client。
/// - `Client` 本身是线程安全的，适合全局复用。
static CLIENT_TIMEOUT_10S: OnceCell<Client> = OnceCell::new();
static CLIENT_TIMEOUT_30S: OnceCell<Client> = OnceCell::new();
static CLIENT_TIMEOUT_90S: OnceCell<Client> = OnceCell::new();

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// timeout=10s 的 HTTP Client（用于海报下载）。
pub fn client_timeout_10s() -> Result<&'static Client, reqwest::Error> {
    CLIENT_TIMEOUT_10S.get_or_try_init(|| client_with_timeout(Duration::from_secs(10)))
}

/// timeout=30s 的 HTTP Client（用于 YouTube 元信息等短请求）。
pub fn client_timeout_30s() -> Result<&'static Client, reqwest::Error> {
    CLIENT_TIMEOUT_30S.get_or_try_init(|| client_with_timeout(Duration::from_secs(30)))
}

/// timeout=90s 的 HTTP Client（用于文案生成这类慢请求）。
pub fn client_timeout_90s() -> Result<&'static Client, reqwest::Error> {
    CLIENT_TIMEOUT_90S.get_or_try_init(|| client_with_timeout(Duration::from_secs(90)))
}

/// 按给定 timeout 新建 Client（不进入全局复用池）。
pub fn client_with_timeout(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}
