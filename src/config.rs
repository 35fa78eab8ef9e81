//! 客户端运行时配置：令牌、客户端标识以及每次请求携带的标准请求头。

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};

use crate::error::{Result, YandexMusicError};

/// 默认的 API 基础地址。
pub const DEFAULT_BASE_URL: &str = "https://api.music.yandex.net";
/// 默认的 OAuth 门户地址。
pub const DEFAULT_OAUTH_URL: &str = "https://oauth.yandex.ru";

/// 默认的 `X-Yandex-Music-Client` 客户端标识串。
const DEFAULT_CLIENT_ID: &str =
    "os=Rust; os_version=; manufacturer=ST; model=Yandex Music API; clid=; device_id=random; uuid=random";
/// 固定的 `X-Yandex-Music-Device` 设备标识串。
const DEVICE_ID: &str =
    "os=Rust; os_version=; manufacturer=Stoun; model=Yandex Music API; clid=; device_id=random; uuid=random";

/// 客户端的配置值对象。
///
/// `token` 与 `client_id` 在构造后仍可通过 [`Config::update_token`] /
/// [`Config::update_client`] 原地修改；`Client` 内部以读写锁共享同一份
/// 配置，每次请求时重新构建请求头。
#[derive(Debug, Clone)]
pub struct Config {
    token: String,
    client_id: String,
    /// API 基础地址。
    pub base_url: String,
    /// OAuth 门户地址。
    pub oauth_url: String,
    /// 单次请求的超时时间。`None` 表示不设置超时。
    pub timeout: Option<Duration>,
    /// 是否接受无效的 TLS 证书。默认关闭。
    ///
    /// 仅用于兼容个别需要绕过证书校验的代理环境，开启后连接
    /// 不再有传输层安全保证。
    pub accept_invalid_certs: bool,
}

impl Config {
    /// 使用给定的 OAuth 令牌创建配置。
    ///
    /// 令牌可以为空字符串，此时所有请求以匿名身份发送，
    /// 只能访问无需登录的接口。
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            oauth_url: DEFAULT_OAUTH_URL.to_string(),
            timeout: Some(Duration::from_secs(30)),
            accept_invalid_certs: false,
        }
    }

    /// 替换 OAuth 令牌。
    pub fn update_token(&mut self, token: &str) {
        self.token = token.to_string();
    }

    /// 替换 `X-Yandex-Music-Client` 客户端标识串。
    pub fn update_client(&mut self, client_id: &str) {
        self.client_id = client_id.to_string();
    }

    /// 当前的 OAuth 令牌。
    pub fn token(&self) -> &str {
        &self.token
    }

    /// 构建一次请求所需的全部标准请求头。
    ///
    /// 令牌为空时不携带 `Authorization` 头，对应匿名访问。
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("X-Yandex-Music-Client", parse_header(&self.client_id)?);
        headers.insert(USER_AGENT, HeaderValue::from_static("Windows 10"));
        headers.insert("X-Yandex-Music-Device", HeaderValue::from_static(DEVICE_ID));
        headers.insert(CONNECTION, HeaderValue::from_static("Keep-Alive"));
        if !self.token.is_empty() {
            headers.insert(AUTHORIZATION, parse_header(&format!("OAuth {}", self.token))?);
        }
        Ok(headers)
    }
}

fn parse_header(value: &str) -> Result<HeaderValue> {
    value
        .parse::<HeaderValue>()
        .map_err(|e| YandexMusicError::Internal(format!("无法构建请求头 `{value}`: {e}")))
}
