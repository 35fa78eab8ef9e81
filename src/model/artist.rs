//! 艺术家模型：[`Artist`]、厂牌 [`Label`] 与汇总页 [`ArtistBriefInfo`]。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    ApiSourceRef, Entity, SourceHandle, album::Album, playlist::Playlist, supplement::Video,
    track::Track,
};

/// 一位艺术家。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Artist {
    /// 艺术家 id。
    pub id: Value,
    /// 艺术家姓名。
    pub name: Option<String>,
    /// 是否为「群星」之类的聚合条目。
    pub various: Option<bool>,
    /// 是否为作曲家条目。
    pub composer: Option<bool>,
    /// 封面信息。
    pub cover: Option<Value>,
    /// OpenGraph 图片 URI。
    pub og_image: Option<String>,
    /// 关联的流派标签。
    pub genres: Vec<String>,
    /// 专辑数、曲目数等统计。
    pub counts: Option<Value>,
    /// 是否可用。
    pub available: Option<bool>,
    /// 评分信息。
    pub ratings: Option<Value>,
    /// 外部链接列表。
    pub links: Vec<Value>,
    /// 是否有演出票务信息。
    pub tickets_available: Option<bool>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    client: SourceHandle,
}

impl Entity for Artist {
    fn bind(&mut self, source: &ApiSourceRef) {
        self.client.set(source);
    }
}

/// 发行厂牌。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Label {
    /// 厂牌 id。
    pub id: Option<u64>,
    /// 厂牌名称。
    pub name: Option<String>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Label {
    fn bind(&mut self, _source: &ApiSourceRef) {}
}

/// 艺术家页的汇总信息，来自 `/artists/{id}/brief-info` 接口。
///
/// 内嵌的专辑、曲目、相似艺术家等引用在水合阶段直接展开为
/// 完整类型，并随本实体一起绑定客户端句柄。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtistBriefInfo {
    /// 艺术家本体。
    pub artist: Option<Artist>,
    /// 专辑列表。
    pub albums: Vec<Album>,
    /// 参与的其他专辑。
    pub also_albums: Vec<Album>,
    /// 最近发行的 id 列表。
    pub last_release_ids: Vec<Value>,
    /// 热门曲目。
    pub popular_tracks: Vec<Track>,
    /// 相似艺术家。
    pub similar_artists: Vec<Artist>,
    /// 所有封面。
    pub all_covers: Vec<Value>,
    /// 演出信息。
    pub concerts: Vec<Value>,
    /// 相关视频。
    pub videos: Vec<Video>,
    /// 黑胶商品信息。
    pub vinyls: Vec<Value>,
    /// 是否有推广内容。
    pub has_promotions: Option<bool>,
    /// 最近发行的曲目。
    pub last_releases: Vec<Track>,
    /// 关联歌单的 id 列表。
    pub playlist_ids: Vec<Value>,
    /// 关联歌单。
    pub playlists: Vec<Playlist>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    client: SourceHandle,
}

impl Entity for ArtistBriefInfo {
    fn bind(&mut self, source: &ApiSourceRef) {
        self.client.set(source);
        if let Some(artist) = &mut self.artist {
            artist.bind(source);
        }
        for album in self.albums.iter_mut().chain(self.also_albums.iter_mut()) {
            album.bind(source);
        }
        for track in self
            .popular_tracks
            .iter_mut()
            .chain(self.last_releases.iter_mut())
        {
            track.bind(source);
        }
        for artist in &mut self.similar_artists {
            artist.bind(source);
        }
        for playlist in &mut self.playlists {
            playlist.bind(source);
        }
    }
}
