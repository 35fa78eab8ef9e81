//! 播放队列模型。
//!
//! `/queues` 列表接口只返回队列的基本信息（[`QueueItem`]）；
//! 队列内容需要再请求 `/queues/{id}` 获得，[`Queue`] 的曲目与
//! 当前位置访问器封装了这次按需补全。

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiSourceRef, Entity, Ids, Lazy, SourceHandle, track::Track};
use crate::error::{Result, YandexMusicError};

/// 队列中的原始曲目引用，只携带 id。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackId {
    /// 曲目 id。
    pub track_id: Option<String>,
    /// 专辑 id。
    pub album_id: Option<String>,
    /// 引用来源。
    pub from: Option<String>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrackId {
    /// `{曲目 id}:{专辑 id}` 形式的完整 id；无专辑信息时退化为曲目 id。
    pub fn full_id(&self) -> Option<String> {
        let track_id = self.track_id.as_ref()?;
        match &self.album_id {
            Some(album_id) => Some(format!("{track_id}:{album_id}")),
            None => Some(track_id.clone()),
        }
    }
}

/// 队列列表中的一项。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueItem {
    /// 队列 id。
    pub id: String,
    /// 最后修改时间（ISO 8601）。
    pub modified: Option<String>,
    /// 队列的播放上下文。
    pub context: Option<Value>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    client: SourceHandle,
}

impl QueueItem {
    /// 拉取该队列的完整内容。
    pub async fn fetch_queue(&self) -> Result<Queue> {
        let client = self.client.get("QueueItem")?;
        client.queue_by_id(&self.id).await
    }
}

impl Entity for QueueItem {
    fn bind(&mut self, source: &ApiSourceRef) {
        self.client.set(source);
    }
}

/// 一个播放队列。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Queue {
    /// 队列 id。
    pub id: String,
    /// 最后修改时间（ISO 8601）。
    pub modified: Option<String>,
    /// 队列的播放上下文。
    pub context: Option<Value>,
    /// 原始曲目引用，仅详情接口返回。
    pub tracks: Option<Vec<TrackId>>,
    /// 当前播放位置，仅详情接口返回。
    pub current_index: Option<usize>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    client: SourceHandle,
    #[serde(skip)]
    tracks_cache: Lazy<Vec<Track>>,
    #[serde(skip)]
    index_cache: Lazy<usize>,
}

impl Queue {
    /// 队列中的完整曲目列表，顺序与远端一致。
    ///
    /// 本实体缺少曲目引用时（来自列表接口）会先补拉一次队列
    /// 详情；随后把原始引用经一次批量查询展开为完整曲目并缓存。
    pub async fn tracks(&self, force: bool) -> Result<Arc<Vec<Track>>> {
        self.tracks_cache
            .get_or_fetch(force, async {
                let client = self.client.get("Queue")?;
                let refs = match (&self.tracks, force) {
                    (Some(refs), false) => refs.clone(),
                    _ => client
                        .queue_by_id(&self.id)
                        .await?
                        .tracks
                        .unwrap_or_default(),
                };
                let ids: Vec<String> = refs.iter().filter_map(TrackId::full_id).collect();
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                client.tracks_by_ids(Ids::from(ids)).await
            })
            .await
    }

    /// 当前播放位置。缺失时补拉一次队列详情并缓存。
    pub async fn current_index(&self, force: bool) -> Result<usize> {
        let index = self
            .index_cache
            .get_or_fetch(force, async {
                if let (Some(index), false) = (self.current_index, force) {
                    return Ok(index);
                }
                let client = self.client.get("Queue")?;
                client
                    .queue_by_id(&self.id)
                    .await?
                    .current_index
                    .ok_or_else(|| {
                        YandexMusicError::Internal(format!("队列 {} 缺少 currentIndex", self.id))
                    })
            })
            .await?;
        Ok(*index)
    }

    /// 当前正在播放的曲目。
    pub async fn current_track(&self) -> Result<Track> {
        let tracks = self.tracks(false).await?;
        let index = self.current_index(false).await?;
        tracks.get(index).cloned().ok_or_else(|| {
            YandexMusicError::Internal(format!(
                "队列 {} 的 currentIndex ({index}) 超出曲目范围",
                self.id
            ))
        })
    }
}

impl Entity for Queue {
    fn bind(&mut self, source: &ApiSourceRef) {
        self.client.set(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_id_full_id() {
        let with_album: TrackId =
            serde_json::from_str(r#"{"trackId": "100", "albumId": "200"}"#).unwrap();
        assert_eq!(with_album.full_id().as_deref(), Some("100:200"));

        let without_album: TrackId = serde_json::from_str(r#"{"trackId": "100"}"#).unwrap();
        assert_eq!(without_album.full_id().as_deref(), Some("100"));

        let empty: TrackId = serde_json::from_str("{}").unwrap();
        assert!(empty.full_id().is_none());
    }

    #[test]
    fn test_queue_deserializes_detail_payload() {
        let json = r#"{
            "id": "queue-1",
            "modified": "2024-01-01T00:00:00Z",
            "context": {"type": "album", "id": "297567"},
            "tracks": [
                {"trackId": "1", "albumId": "10"},
                {"trackId": "2", "albumId": "10"}
            ],
            "currentIndex": 1
        }"#;
        let queue: Queue = serde_json::from_str(json).unwrap();

        assert_eq!(queue.id, "queue-1");
        assert_eq!(queue.tracks.as_ref().unwrap().len(), 2);
        assert_eq!(queue.current_index, Some(1));
    }
}
