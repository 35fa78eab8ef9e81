//! 曲目模型及其下载信息。

use std::{path::Path, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    ApiSourceRef, Entity, Ids, Lazy, SourceHandle,
    album::Album,
    artist::Artist,
    supplement::{Lyric, Supplement, Video},
};
use crate::error::{Result, YandexMusicError};

/// 一首曲目。
///
/// 来自播放队列的曲目引用可能只携带 `track_id`，此时可调用
/// [`Track::update`] 补全全部字段。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Track {
    /// 曲目 id。
    pub id: String,
    /// 原始引用中的曲目 id，仅部分载荷携带。
    pub track_id: Option<String>,
    /// 去重后的真实 id。
    pub real_id: Option<String>,
    /// 曲目标题。
    pub title: Option<String>,
    /// 是否可用。
    pub available: Option<bool>,
    /// 是否仅对付费用户可用。
    pub available_for_premium_users: Option<bool>,
    /// 无权限时是否仍可完整播放。
    pub available_full_without_permission: Option<bool>,
    /// 存储目录。
    pub storage_dir: Option<String>,
    /// 时长（毫秒）。
    pub duration_ms: Option<u64>,
    /// 文件大小（字节）。
    pub file_size: Option<u64>,
    /// 试听片段时长（毫秒）。
    pub preview_duration_ms: Option<u64>,
    /// OpenGraph 图片 URI。
    pub og_image: Option<String>,
    /// 是否有歌词。
    pub lyrics_available: Option<bool>,
    /// 是否记忆播放进度（播客等长内容）。
    pub remember_position: Option<bool>,
    /// 分享许可标记。
    pub track_sharing_flag: Option<String>,
    /// 曲目来源。
    pub track_source: Option<String>,
    /// 所属专辑列表。
    pub albums: Vec<Album>,
    /// 艺术家列表。
    pub artists: Vec<Artist>,
    /// R128 响度信息。
    pub r128: Option<Value>,
    /// 发行方信息。
    pub major: Option<Value>,
    /// 歌词元信息。
    pub lyrics_info: Option<Value>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    client: SourceHandle,
    #[serde(skip)]
    supplement_cache: Lazy<Supplement>,
}

impl Track {
    /// `{曲目 id}:{专辑 id}` 形式的完整 id。
    ///
    /// 没有专辑信息时返回 `None`。
    pub fn full_id(&self) -> Option<String> {
        let album_id = self.albums.first().and_then(|album| album.id)?;
        if self.id.is_empty() {
            return None;
        }
        Some(format!("{}:{album_id}", self.id))
    }

    /// 重新拉取本曲目并覆盖全部字段。
    ///
    /// 只携带 `track_id` 的队列引用经过一次 `update` 即成为
    /// 完整曲目；补充信息缓存同时被清空。
    pub async fn update(&mut self) -> Result<()> {
        let key = if !self.id.is_empty() {
            self.id.clone()
        } else {
            self.track_id
                .clone()
                .ok_or(YandexMusicError::Detached("Track"))?
        };
        let client = self.client.get("Track")?;
        let fetched = client
            .tracks_by_ids(Ids::from(key.clone()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| YandexMusicError::NotFound(format!("曲目 {key} 不存在")))?;

        let handle = self.client.clone();
        *self = fetched;
        self.client = handle;
        Ok(())
    }

    /// 曲目的补充信息，首次访问时通过 `/tracks/{id}/supplement`
    /// 拉取并缓存；`force = true` 时强制重新拉取。
    pub async fn supplement(&self, force: bool) -> Result<Arc<Supplement>> {
        self.supplement_cache
            .get_or_fetch(force, async {
                let client = self.client.get("Track")?;
                client.track_supplement(&self.id).await
            })
            .await
    }

    /// 曲目歌词。见 [`Track::supplement`] 的缓存语义。
    pub async fn lyric(&self, force: bool) -> Result<Lyric> {
        Ok(self.supplement(force).await?.lyric.clone())
    }

    /// 曲目相关视频。见 [`Track::supplement`] 的缓存语义。
    pub async fn videos(&self, force: bool) -> Result<Vec<Video>> {
        Ok(self.supplement(force).await?.videos.clone())
    }
}

impl Entity for Track {
    fn bind(&mut self, source: &ApiSourceRef) {
        self.client.set(source);
        for album in &mut self.albums {
            album.bind(source);
        }
        for artist in &mut self.artists {
            artist.bind(source);
        }
    }
}

/// 单个可下载变体的描述，来自 `/tracks/{id}/download-info` 接口。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DownloadInfo {
    /// 音频编码（如 `mp3` / `aac`）。
    pub codec: Option<String>,
    /// 是否带增益信息。
    pub gain: Option<bool>,
    /// 是否为试听片段。
    pub preview: Option<bool>,
    /// 下载描述 XML 的地址。获取直链后该地址会被清空。
    pub download_info_url: Option<String>,
    /// 是否为直链。
    pub direct: Option<bool>,
    /// 比特率（kbps）。
    pub bitrate_in_kbps: Option<u32>,
    /// 已解析出的直链。仅一分钟内有效，不应持久保存。
    pub direct_link: Option<String>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    client: SourceHandle,
}

impl DownloadInfo {
    /// 该变体的下载直链。
    ///
    /// 已在批量解析时得到直链则直接返回；否则访问下载描述 XML
    /// 解析一次。直链带签名且时效很短，因此不做缓存，每次调用
    /// 都重新解析，取到后应立即使用。
    pub async fn download_link(&self) -> Result<String> {
        if let Some(link) = &self.direct_link {
            return Ok(link.clone());
        }
        let client = self.client.get("DownloadInfo")?;
        let info_url = self.download_info_url.as_deref().ok_or_else(|| {
            YandexMusicError::Internal("下载信息缺少 downloadInfoUrl".to_string())
        })?;
        let codec = self.codec.as_deref().unwrap_or("mp3");
        client.direct_link(info_url, codec).await
    }

    /// 把该变体的音频文件下载到 `dest`。
    pub async fn download(&self, dest: &Path) -> Result<()> {
        let link = self.download_link().await?;
        let client = self.client.get("DownloadInfo")?;
        client.download_to(&link, dest).await
    }
}

impl Entity for DownloadInfo {
    fn bind(&mut self, source: &ApiSourceRef) {
        self.client.set(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_full_id() {
        let track: Track = serde_json::from_str(
            r#"{"id": "10994777", "title": "Bohemian Rhapsody", "albums": [{"id": 297567}]}"#,
        )
        .unwrap();
        assert_eq!(track.full_id().as_deref(), Some("10994777:297567"));

        let bare: Track = serde_json::from_str(r#"{"id": "1"}"#).unwrap();
        assert!(bare.full_id().is_none(), "无专辑信息时应返回 None");
    }

    #[test]
    fn test_track_roundtrip_preserves_fields() {
        let json = r#"{
            "id": "10994777",
            "realId": "10994777",
            "title": "Bohemian Rhapsody",
            "available": true,
            "durationMs": 355490,
            "lyricsAvailable": true,
            "unknownField": "kept"
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();
        let reserialized = serde_json::to_value(&track).unwrap();

        assert_eq!(reserialized["id"], "10994777");
        assert_eq!(reserialized["realId"], "10994777");
        assert_eq!(reserialized["title"], "Bohemian Rhapsody");
        assert_eq!(reserialized["available"], true);
        assert_eq!(reserialized["durationMs"], 355490);
        assert_eq!(reserialized["lyricsAvailable"], true);
        // 未识别字段经 extra 原样保留
        assert_eq!(reserialized["unknownField"], "kept");
    }

    #[test]
    fn test_download_info_deserializes() {
        let json = r#"{
            "codec": "mp3",
            "gain": false,
            "preview": false,
            "downloadInfoUrl": "https://storage.example/info.xml",
            "direct": false,
            "bitrateInKbps": 320
        }"#;
        let info: DownloadInfo = serde_json::from_str(json).unwrap();

        assert_eq!(info.codec.as_deref(), Some("mp3"));
        assert_eq!(info.bitrate_in_kbps, Some(320));
        assert!(info.direct_link.is_none());
    }
}
