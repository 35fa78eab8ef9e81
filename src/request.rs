//! 底层 HTTP 传输层：发送带标准请求头的 GET / POST 请求，
//! 并把非 2xx 响应按状态码统一分类为 [`YandexMusicError`]。

use std::{
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    config::Config,
    error::{Result, YandexMusicError},
};

/// 执行单次 HTTP 请求的抽象。
///
/// [`Client`](crate::Client) 持有一个 `Arc<dyn Transport>`，
/// 测试中可以注入伪实现来模拟远端响应。
#[async_trait]
pub trait Transport: Send + Sync {
    /// 发送 GET 请求，返回原始响应体（响应体缺失时为空字符串）。
    async fn get(&self, url: &str) -> Result<String>;

    /// 以表单编码发送 POST 请求，返回原始响应体。
    async fn post(&self, url: &str, form: &[(String, String)]) -> Result<String>;

    /// 将远端资源完整写入本地文件。
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// 基于 `reqwest` 的默认传输实现。
///
/// 与拥有它的 `Client` 共享同一份 [`Config`]，请求头在每次
/// 调用时重新构建，因此令牌在构造后被替换也会立即生效。
pub struct ApiRequest {
    http: reqwest::Client,
    config: Arc<RwLock<Config>>,
}

impl ApiRequest {
    /// 根据配置构建传输实例。超时与 TLS 选项在此一次性固定。
    pub fn new(config: Arc<RwLock<Config>>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        {
            let snapshot = read_config(&config);
            if let Some(timeout) = snapshot.timeout {
                builder = builder.timeout(timeout);
            }
            if snapshot.accept_invalid_certs {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    fn headers(&self) -> Result<reqwest::header::HeaderMap> {
        read_config(&self.config).headers()
    }
}

#[async_trait]
impl Transport for ApiRequest {
    async fn get(&self, url: &str) -> Result<String> {
        debug!("GET {url}");
        let response = self.http.get(url).headers(self.headers()?).send().await?;
        read_body(response).await
    }

    async fn post(&self, url: &str, form: &[(String, String)]) -> Result<String> {
        debug!("POST {url}");
        let response = self
            .http
            .post(url)
            .headers(self.headers()?)
            .form(form)
            .send()
            .await?;
        read_body(response).await
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        debug!("DOWNLOAD {url} -> {}", dest.display());
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), &body));
        }
        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}

fn read_config(config: &Arc<RwLock<Config>>) -> Config {
    config
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

async fn read_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    Err(classify_status(status.as_u16(), &body))
}

/// 把非 2xx 状态码映射为对应的错误类别。
///
/// 401 / 403 归为认证失败，400 归为参数错误，404 归为资源不存在，
/// 其余（含 409 / 413 / 5xx）一律归为网络错误；502 / 503 不附带
/// 详细信息，其余未分类状态码把状态码与原始响应体拼进消息。
pub(crate) fn classify_status(status: u16, body: &str) -> YandexMusicError {
    let detail = parse_error(body);
    match status {
        400 => YandexMusicError::BadRequest(detail),
        401 | 403 => YandexMusicError::Unauthorized(detail),
        404 => YandexMusicError::NotFound(detail),
        409 | 413 => YandexMusicError::Network(detail),
        502 | 503 => YandexMusicError::Network(String::new()),
        _ => YandexMusicError::Network(format!("{detail} {status} {body}")),
    }
}

/// 从响应体的 JSON 信封中提取 `error.name` 与 `error.message`。
/// 响应体为空或不是信封结构时返回空字符串。
pub(crate) fn parse_error(body: &str) -> String {
    if body.is_empty() {
        return String::new();
    }
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return String::new();
    };
    match value.get("error") {
        Some(error) if !error.is_null() => format!(
            "{} {}",
            error.get("name").and_then(|v| v.as_str()).unwrap_or(""),
            error.get("message").and_then(|v| v.as_str()).unwrap_or("")
        ),
        _ => String::new(),
    }
}
