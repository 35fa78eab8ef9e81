//! 模型层的公共基础设施。
//!
//! 该模块定义了实体与客户端句柄的绑定机制、JSON 水合辅助函数、
//! 延迟加载字段的缓存单元，以及批量查询接口使用的 [`Ids`] 类型。
//! 具体的领域模型按远端对象类型拆分在各个子模块中。

use std::{fmt, future::Future, path::Path, sync::Arc};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{Result, YandexMusicError};

pub mod account;
pub mod album;
pub mod artist;
pub mod feed;
pub mod genre;
pub mod landing;
pub mod playlist;
pub mod queue;
pub mod search;
pub mod station;
pub mod supplement;
pub mod track;

use album::Album;
use queue::Queue;
use supplement::Supplement;
use track::Track;

/// 实体进行延迟加载时可用的客户端能力面。
///
/// 只暴露实体解析内嵌引用真正需要的几个拉取操作，而不是完整的
/// [`Client`](crate::Client)，以便在测试中用伪实现替换。
#[async_trait]
pub trait ApiSource: Send + Sync {
    /// 按 id 批量获取曲目。
    async fn tracks_by_ids(&self, ids: Ids) -> Result<Vec<Track>>;

    /// 获取携带完整曲目列表的专辑。
    async fn album_with_tracks(&self, album_id: &str) -> Result<Album>;

    /// 按 id 获取播放队列的完整内容。
    async fn queue_by_id(&self, queue_id: &str) -> Result<Queue>;

    /// 获取曲目的补充信息（歌词与视频）。
    async fn track_supplement(&self, track_id: &str) -> Result<Supplement>;

    /// 把下载信息描述 XML 解析为短时效直链。
    async fn direct_link(&self, info_url: &str, codec: &str) -> Result<String>;

    /// 把远端资源下载到本地文件。
    async fn download_to(&self, url: &str, dest: &Path) -> Result<()>;
}

/// 共享的客户端句柄。实体持有它来发起后续请求。
pub type ApiSourceRef = Arc<dyn ApiSource>;

/// 实体内保存客户端反向引用的插槽。
///
/// 反序列化时为空，由 [`Entity::bind`] 在水合阶段填充。
#[derive(Clone, Default)]
pub(crate) struct SourceHandle(Option<ApiSourceRef>);

impl SourceHandle {
    pub(crate) fn set(&mut self, source: &ApiSourceRef) {
        self.0 = Some(Arc::clone(source));
    }

    /// 取出句柄；实体从未经过绑定时返回 [`YandexMusicError::Detached`]。
    pub(crate) fn get(&self, entity: &'static str) -> Result<&ApiSourceRef> {
        self.0.as_ref().ok_or(YandexMusicError::Detached(entity))
    }

    pub(crate) fn inner(&self) -> Option<&ApiSourceRef> {
        self.0.as_ref()
    }
}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.is_some() {
            "SourceHandle(bound)"
        } else {
            "SourceHandle(detached)"
        })
    }
}

/// 可以从 JSON 水合并绑定客户端句柄的实体。
pub(crate) trait Entity: DeserializeOwned {
    /// 绑定客户端句柄，并向内嵌的子实体递归传播。
    fn bind(&mut self, source: &ApiSourceRef);
}

/// 把单个 JSON 对象水合为实体并绑定客户端句柄。
pub(crate) fn de_json<T: Entity>(source: &ApiSourceRef, value: Value) -> Result<T> {
    let mut entity: T = serde_json::from_value(value)?;
    entity.bind(source);
    Ok(entity)
}

/// 把 JSON 数组按原始顺序逐项水合为实体列表。
///
/// `null`（远端缺失列表时的取值）按空列表处理。
pub(crate) fn de_list<T: Entity>(source: &ApiSourceRef, value: Value) -> Result<Vec<T>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| de_json(source, item))
            .collect(),
        other => Err(YandexMusicError::Internal(format!(
            "期望 JSON 数组，得到: {other}"
        ))),
    }
}

/// 延迟加载字段的缓存单元，显式区分「未解析 / 已解析」两态。
///
/// 首次访问时执行拉取并缓存结果，之后直接返回缓存值；
/// 传入 `force = true` 则无条件重新拉取并覆盖缓存。
pub(crate) struct Lazy<T>(Mutex<Option<Arc<T>>>);

impl<T> Lazy<T> {
    pub(crate) async fn get_or_fetch<F>(&self, force: bool, fetch: F) -> Result<Arc<T>>
    where
        F: Future<Output = Result<T>>,
    {
        if !force {
            if let Some(cached) = self.0.lock().await.as_ref() {
                return Ok(Arc::clone(cached));
            }
        }
        let value = Arc::new(fetch.await?);
        *self.0.lock().await = Some(Arc::clone(&value));
        Ok(value)
    }
}

impl<T> Default for Lazy<T> {
    fn default() -> Self {
        Self(Mutex::new(None))
    }
}

impl<T> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        // 克隆实体时尽量带走已解析的缓存；拿不到锁就退回未解析态。
        let cached = self.0.try_lock().map(|guard| guard.clone()).unwrap_or(None);
        Self(Mutex::new(cached))
    }
}

impl<T> fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_lock() {
            Ok(guard) if guard.is_some() => f.write_str("Lazy(resolved)"),
            _ => f.write_str("Lazy(unresolved)"),
        }
    }
}

/// 批量查询接口接受的 id 集合：单个 id 或一组 id 都可以传入。
///
/// 发送时各 id 以逗号拼接，见 [`Ids::join`]。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ids(Vec<String>);

impl Ids {
    /// 以逗号拼接所有 id，得到接口要求的参数形式。
    pub fn join(&self) -> String {
        self.0.join(",")
    }

    /// 以切片形式访问所有 id。
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for Ids {
    fn from(id: &str) -> Self {
        Self(vec![id.to_string()])
    }
}

impl From<String> for Ids {
    fn from(id: String) -> Self {
        Self(vec![id])
    }
}

impl From<u64> for Ids {
    fn from(id: u64) -> Self {
        Self(vec![id.to_string()])
    }
}

impl From<Vec<String>> for Ids {
    fn from(ids: Vec<String>) -> Self {
        Self(ids)
    }
}

impl From<Vec<&str>> for Ids {
    fn from(ids: Vec<&str>) -> Self {
        Self(ids.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Ids {
    fn from(ids: &[&str]) -> Self {
        Self(ids.iter().map(|id| id.to_string()).collect())
    }
}

impl From<Vec<u64>> for Ids {
    fn from(ids: Vec<u64>) -> Self {
        Self(ids.into_iter().map(|id| id.to_string()).collect())
    }
}
