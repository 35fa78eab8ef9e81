//! 搜索结果模型。
//!
//! 远端把不同类型的结果分组返回，另附一个「最佳匹配」信封，
//! 其中的 `type` 标签决定结果应水合成哪种实体。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    ApiSourceRef, Entity, SourceHandle, album::Album, artist::Artist, playlist::Playlist,
    track::Track,
};
use crate::error::Result;

/// 搜索的目标类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    /// 所有类型。
    #[default]
    All,
    /// 仅曲目。
    Track,
    /// 仅专辑。
    Album,
    /// 仅艺术家。
    Artist,
    /// 仅歌单。
    Playlist,
}

impl SearchType {
    /// 接口使用的字符串形式。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Track => "track",
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Playlist => "playlist",
        }
    }
}

/// 一组同类型的搜索结果。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchGroup<T> {
    /// 命中总数。
    pub total: Option<u64>,
    /// 每页数量。
    pub per_page: Option<u64>,
    /// 该组在结果中的排序位置。
    pub order: Option<u64>,
    /// 本页结果，顺序与远端一致。
    #[serde(default)]
    pub results: Vec<T>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T: Entity> SearchGroup<T> {
    fn bind(&mut self, source: &ApiSourceRef) {
        for result in &mut self.results {
            result.bind(source);
        }
    }
}

/// 「最佳匹配」信封，保留原始载荷，由 [`Search::best`] 按需水合。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BestEnvelope {
    /// 结果类型标签。
    #[serde(rename = "type")]
    pub result_type: String,
    /// 原始结果载荷。
    pub result: Option<Value>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 按「最佳匹配」的类型标签分发出的实体。
///
/// 无法识别的标签归入 [`BestMatch::None`]，不视为错误。
#[derive(Debug, Clone)]
pub enum BestMatch {
    /// 最佳匹配是一首曲目。
    Track(Track),
    /// 最佳匹配是一张专辑。
    Album(Album),
    /// 最佳匹配是一位艺术家。
    Artist(Artist),
    /// 最佳匹配是一个歌单。
    Playlist(Playlist),
    /// 没有最佳匹配，或类型无法识别。
    None,
}

/// 一次搜索的完整结果。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Search {
    /// 查询是否被自动纠错。
    pub misspell_corrected: Option<bool>,
    /// 是否禁用了纠错。
    pub nocorrect: Option<bool>,
    /// 本次搜索的请求 id。
    pub search_request_id: Option<String>,
    /// 实际使用的查询文本。
    pub text: Option<String>,
    /// 最佳匹配信封。
    pub best: Option<BestEnvelope>,
    /// 专辑结果组。
    pub albums: Option<SearchGroup<Album>>,
    /// 艺术家结果组。
    pub artists: Option<SearchGroup<Artist>>,
    /// 曲目结果组。
    pub tracks: Option<SearchGroup<Track>>,
    /// 歌单结果组。
    pub playlists: Option<SearchGroup<Playlist>>,
    /// 播客结果组（未建模，保留原始载荷）。
    pub podcasts: Option<Value>,
    /// 播客单集结果组。
    pub podcast_episodes: Option<SearchGroup<Track>>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    client: SourceHandle,
}

impl Search {
    /// 把「最佳匹配」按其 `type` 标签水合为对应实体。
    ///
    /// 信封缺失、载荷缺失或类型无法识别时返回 [`BestMatch::None`]；
    /// 只有载荷本身无法反序列化才算错误。
    pub fn best(&self) -> Result<BestMatch> {
        let Some(envelope) = &self.best else {
            return Ok(BestMatch::None);
        };
        let Some(raw) = envelope.result.clone() else {
            return Ok(BestMatch::None);
        };
        Ok(match envelope.result_type.as_str() {
            "track" => BestMatch::Track(self.hydrate(raw)?),
            "album" => BestMatch::Album(self.hydrate(raw)?),
            "artist" => BestMatch::Artist(self.hydrate(raw)?),
            "playlist" => BestMatch::Playlist(self.hydrate(raw)?),
            _ => BestMatch::None,
        })
    }

    fn hydrate<T: Entity>(&self, value: Value) -> Result<T> {
        let mut entity: T = serde_json::from_value(value)?;
        if let Some(source) = self.client.inner() {
            entity.bind(source);
        }
        Ok(entity)
    }
}

impl Entity for Search {
    fn bind(&mut self, source: &ApiSourceRef) {
        self.client.set(source);
        if let Some(group) = &mut self.albums {
            group.bind(source);
        }
        if let Some(group) = &mut self.artists {
            group.bind(source);
        }
        if let Some(group) = &mut self.tracks {
            group.bind(source);
        }
        if let Some(group) = &mut self.playlists {
            group.bind(source);
        }
        if let Some(group) = &mut self.podcast_episodes {
            group.bind(source);
        }
    }
}
