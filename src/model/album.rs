//! 专辑模型，支持按需展开完整曲目列表。

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    ApiSourceRef, Entity, Lazy, SourceHandle,
    artist::{Artist, Label},
    track::Track,
};
use crate::error::{Result, YandexMusicError};

/// 一张专辑。
///
/// 批量接口（`/albums`）返回的专辑不携带曲目列表；
/// [`Album::tracks`] 在首次访问时通过 `/albums/{id}/with-tracks`
/// 接口补全并缓存。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Album {
    /// 专辑 id。
    pub id: Option<u64>,
    /// 专辑标题。
    pub title: Option<String>,
    /// 专辑类型（如 `single`）。
    #[serde(rename = "type")]
    pub album_type: Option<String>,
    /// 元类型（如 `music`）。
    pub meta_type: Option<String>,
    /// 发行年份。
    pub year: Option<u32>,
    /// 发行日期（ISO 8601）。
    pub release_date: Option<String>,
    /// 封面 URI 模板。
    pub cover_uri: Option<String>,
    /// OpenGraph 图片 URI。
    pub og_image: Option<String>,
    /// 流派。
    pub genre: Option<String>,
    /// 购买渠道。
    pub buy: Vec<Value>,
    /// 曲目数。
    pub track_count: Option<u32>,
    /// 点赞数。
    pub likes_count: Option<u64>,
    /// 是否为最近发行。
    pub recent: Option<bool>,
    /// 是否为重点推荐。
    pub very_important: Option<bool>,
    /// 专辑的艺术家列表。
    pub artists: Vec<Artist>,
    /// 发行厂牌列表。
    pub labels: Vec<Label>,
    /// 是否可用。
    pub available: Option<bool>,
    /// 是否仅对付费用户可用。
    pub available_for_premium_users: Option<bool>,
    /// 是否可在移动端使用。
    pub available_for_mobile: Option<bool>,
    /// 是否部分可用。
    pub available_partially: Option<bool>,
    /// 精选曲目的 id 列表。
    pub bests: Vec<Value>,
    /// 按碟分组的曲目列表，仅 `with-tracks` 接口返回。
    pub volumes: Option<Vec<Vec<Track>>>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    client: SourceHandle,
    #[serde(skip)]
    tracks_cache: Lazy<Vec<Track>>,
}

impl Album {
    /// 专辑的全部曲目，按碟序与曲序排列。
    ///
    /// 水合时已携带 `volumes` 的专辑直接展开内嵌数据；否则通过
    /// 客户端补发一次 `with-tracks` 请求。结果会被缓存，重复调用
    /// 不再发起网络请求，除非传入 `force = true`。
    pub async fn tracks(&self, force: bool) -> Result<Arc<Vec<Track>>> {
        self.tracks_cache
            .get_or_fetch(force, async {
                let volumes = match (&self.volumes, force) {
                    (Some(volumes), false) => volumes.clone(),
                    _ => {
                        let client = self.client.get("Album")?;
                        let id = self.id.ok_or_else(|| {
                            YandexMusicError::Internal("专辑缺少 id，无法补全曲目".to_string())
                        })?;
                        client
                            .album_with_tracks(&id.to_string())
                            .await?
                            .volumes
                            .unwrap_or_default()
                    }
                };
                Ok(volumes.into_iter().flatten().collect())
            })
            .await
    }
}

impl Entity for Album {
    fn bind(&mut self, source: &ApiSourceRef) {
        self.client.set(source);
        for artist in &mut self.artists {
            artist.bind(source);
        }
        if let Some(volumes) = &mut self.volumes {
            for track in volumes.iter_mut().flatten() {
                track.bind(source);
            }
        }
    }
}
