//! 定义了整个 `yandex-music-api` 库的错误类型 `YandexMusicError`。

use std::io;
use thiserror::Error;

/// `yandex-music-api` 库的通用错误枚举。
///
/// `Unauthorized` / `BadRequest` / `NotFound` / `Network` 四类对应
/// 远端 API 按 HTTP 状态码分类出的错误；`Api` 对应 2xx 响应信封内
/// 携带的业务错误。
#[derive(Error, Debug)]
pub enum YandexMusicError {
    /// 认证失败 (HTTP 401 / 403)
    #[error("认证失败: {0}")]
    Unauthorized(String),

    /// 请求参数错误 (HTTP 400)
    #[error("请求参数错误: {0}")]
    BadRequest(String),

    /// 资源不存在 (HTTP 404)
    #[error("资源不存在: {0}")]
    NotFound(String),

    /// 网络层错误（409 / 413 / 5xx 以及其余未分类的非 2xx 状态码）
    #[error("网络错误: {0}")]
    Network(String),

    /// API 在 2xx 响应的信封 `error` 字段中返回的业务错误
    #[error("API 返回错误: {name}: {message}")]
    Api {
        /// 错误名称（信封中的 `error.name`）。
        name: String,
        /// 错误描述（信封中的 `error.message`）。
        message: String,
    },

    /// 网络请求失败 (源自 `reqwest::Error`)
    #[error("网络请求失败: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// JSON 解析失败 (源自 `serde_json::Error`)
    #[error("JSON 解析失败: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// XML 解析失败 (源自 `quick_xml::DeError`)
    #[error("XML 解析失败: {0}")]
    XmlParse(#[from] quick_xml::DeError),

    /// I/O 错误 (源自 `io::Error`)
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    /// 实体未绑定客户端句柄，无法进行延迟加载
    #[error("实体 `{0}` 未绑定客户端句柄")]
    Detached(&'static str),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

/// `YandexMusicError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, YandexMusicError>;
