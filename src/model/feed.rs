//! 个性化信息流模型。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiSourceRef, Entity, playlist::GeneratedPlaylist};

/// 为用户生成的信息流，来自 `/feed` 接口，包含智能歌单等内容。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Feed {
    /// 下一页的修订号。
    pub next_revision: Option<String>,
    /// 是否还能获取更多事件。
    pub can_get_more_events: Option<bool>,
    /// 内部标记。
    pub pumpkin: Option<bool>,
    /// 是否已完成口味向导。
    pub is_wizard_passed: Option<bool>,
    /// 智能歌单列表。
    pub generated_playlists: Vec<GeneratedPlaylist>,
    /// 头条内容。
    pub headlines: Vec<Value>,
    /// 今天的日期。
    pub today: Option<String>,
    /// 按天分组的事件。
    pub days: Vec<Value>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Feed {
    fn bind(&mut self, source: &ApiSourceRef) {
        for playlist in &mut self.generated_playlists {
            playlist.bind(source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_deserializes() {
        let json = r#"{
            "canGetMoreEvents": true,
            "today": "2024-01-01",
            "generatedPlaylists": [
                {"type": "playlistOfTheDay", "ready": true, "data": {"kind": 1}}
            ]
        }"#;
        let feed: Feed = serde_json::from_str(json).unwrap();

        assert_eq!(feed.can_get_more_events, Some(true));
        assert_eq!(feed.generated_playlists.len(), 1);
        assert_eq!(
            feed.generated_playlists[0].playlist_type.as_deref(),
            Some("playlistOfTheDay")
        );
    }
}
