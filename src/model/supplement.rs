//! 曲目的补充信息：歌词与相关视频。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiSourceRef, Entity};

/// 曲目的补充信息，来自 `/tracks/{id}/supplement` 接口。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Supplement {
    /// 补充信息记录的 id。
    pub id: Option<Value>,
    /// 歌词。接口未返回时为全默认值的空歌词。
    pub lyric: Lyric,
    /// 相关视频列表。
    pub videos: Vec<Video>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Supplement {
    fn bind(&mut self, _source: &ApiSourceRef) {}
}

/// 歌词文本。
///
/// 所有字段都带默认值：无版权或无歌词时接口会省略大部分键，
/// 此时得到空字符串与 `false`，而不是反序列化错误。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lyric {
    /// 歌词记录的 id。
    pub id: Option<u64>,
    /// 截断的歌词文本。
    pub lyrics: String,
    /// 完整的歌词文本。
    pub full_lyrics: String,
    /// 是否拥有歌词版权。
    pub has_rights: bool,
    /// 是否显示翻译。
    pub show_translation: bool,
    /// 歌词语言。
    pub text_language: Option<String>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 与曲目相关的视频。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Video {
    /// 视频标题。
    pub title: Option<String>,
    /// 封面图片 URL。
    pub cover: Option<String>,
    /// 嵌入播放器的 URL。
    pub embed_url: Option<String>,
    /// 视频提供方（如 `youtube`）。
    pub provider: Option<String>,
    /// 视频在提供方平台的 id。
    pub provider_video_id: Option<String>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Video {
    fn bind(&mut self, _source: &ApiSourceRef) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lyric_defaults_when_fields_absent() {
        let lyric: Lyric = serde_json::from_str("{}").unwrap();

        assert_eq!(lyric.lyrics, "");
        assert_eq!(lyric.full_lyrics, "");
        assert!(!lyric.has_rights);
        assert!(!lyric.show_translation);
        assert!(lyric.id.is_none());
    }

    #[test]
    fn test_supplement_deserializes() {
        let json = r#"{
            "id": "123",
            "lyric": {"id": 7, "lyrics": "la la", "fullLyrics": "la la la", "hasRights": true},
            "videos": [{"title": "clip", "provider": "youtube", "providerVideoId": "abc"}]
        }"#;
        let supplement: Supplement = serde_json::from_str(json).unwrap();

        assert_eq!(supplement.lyric.id, Some(7));
        assert_eq!(supplement.lyric.lyrics, "la la");
        assert!(supplement.lyric.has_rights);
        assert_eq!(supplement.videos.len(), 1);
        assert_eq!(supplement.videos[0].provider.as_deref(), Some("youtube"));
    }
}
