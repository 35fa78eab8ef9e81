//! 歌单模型。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiSourceRef, Entity, SourceHandle};

/// 一个歌单。
///
/// `revision` 是远端的乐观并发计数器，提交歌单变更时必须回传；
/// 版本过期的变更会被远端拒绝。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Playlist {
    /// 歌单所有者信息。
    pub owner: Option<Value>,
    /// 歌单 UUID。
    pub playlist_uuid: Option<String>,
    /// 是否可用。
    pub available: Option<bool>,
    /// 所有者的用户 id。
    pub uid: Option<u64>,
    /// 歌单在所有者名下的序号 id（接口中的 `kind`）。
    pub kind: Option<u64>,
    /// 歌单标题。
    pub title: Option<String>,
    /// 歌单描述。
    pub description: Option<String>,
    /// 带格式的歌单描述。
    pub description_formatted: Option<String>,
    /// 乐观并发修订号。
    pub revision: Option<u64>,
    /// 快照号。
    pub snapshot: Option<u64>,
    /// 曲目数。
    pub track_count: Option<u32>,
    /// 可见性（`public` / `private`）。
    pub visibility: Option<String>,
    /// 是否为协作歌单。
    pub collective: Option<bool>,
    /// 创建时间（ISO 8601）。
    pub created: Option<String>,
    /// 最后修改时间（ISO 8601）。
    pub modified: Option<String>,
    /// 是否为横幅歌单。
    pub is_banner: Option<bool>,
    /// 是否为首发歌单。
    pub is_premiere: Option<bool>,
    /// 总时长（毫秒）。
    pub duration_ms: Option<u64>,
    /// 封面信息。
    pub cover: Option<Value>,
    /// OpenGraph 图片 URI。
    pub og_image: Option<String>,
    /// 标签列表。
    pub tags: Vec<Value>,
    /// 点赞数。
    pub likes_count: Option<u64>,
    /// 曲目条目列表（详情接口返回）。
    pub tracks: Vec<Value>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    client: SourceHandle,
}

impl Entity for Playlist {
    fn bind(&mut self, source: &ApiSourceRef) {
        self.client.set(source);
    }
}

/// 歌单可见性。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistVisibility {
    /// 公开。
    Public,
    /// 私有。
    Private,
}

impl PlaylistVisibility {
    /// 接口使用的字符串形式。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// 为用户生成的智能歌单（如每日推荐），出现在信息流中。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedPlaylist {
    /// 智能歌单类型（如 `playlistOfTheDay`）。
    #[serde(rename = "type")]
    pub playlist_type: Option<String>,
    /// 是否已生成完毕。
    pub ready: Option<bool>,
    /// 是否需要提醒用户。
    pub notify: Option<bool>,
    /// 歌单本体。
    pub data: Option<Playlist>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for GeneratedPlaylist {
    fn bind(&mut self, source: &ApiSourceRef) {
        if let Some(playlist) = &mut self.data {
            playlist.bind(source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_deserializes_revision() {
        let json = r#"{
            "uid": 1130000,
            "kind": 1250,
            "title": "Мой плейлист",
            "revision": 7,
            "trackCount": 25,
            "visibility": "public"
        }"#;
        let playlist: Playlist = serde_json::from_str(json).unwrap();

        assert_eq!(playlist.kind, Some(1250));
        assert_eq!(playlist.revision, Some(7));
        assert_eq!(playlist.visibility.as_deref(), Some("public"));
    }

    #[test]
    fn test_generated_playlist_embeds_data() {
        let json = r#"{
            "type": "playlistOfTheDay",
            "ready": true,
            "notify": false,
            "data": {"kind": 127167070, "title": "Плейлист дня"}
        }"#;
        let generated: GeneratedPlaylist = serde_json::from_str(json).unwrap();

        assert_eq!(generated.playlist_type.as_deref(), Some("playlistOfTheDay"));
        assert_eq!(
            generated.data.as_ref().unwrap().title.as_deref(),
            Some("Плейлист дня")
        );
    }
}
