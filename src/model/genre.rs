//! 音乐流派模型。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiSourceRef, Entity};

/// 一个音乐流派，可能包含子流派。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Genre {
    /// 流派 id。
    pub id: String,
    /// 排序权重。
    pub weight: Option<u64>,
    /// 是否进入作曲家榜单。
    pub composer_top: Option<bool>,
    /// URL 片段。
    pub url_part: Option<String>,
    /// 流派名称。
    pub title: Option<String>,
    /// 各语言的名称。
    pub titles: Option<Value>,
    /// 主题色。
    pub color: Option<String>,
    /// 图片集合。
    pub images: Option<Value>,
    /// 是否显示在菜单中。
    pub show_in_menu: Option<bool>,
    /// 电台图标。
    pub radio_icon: Option<Value>,
    /// 子流派列表。
    pub sub_genres: Vec<Genre>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Genre {
    fn bind(&mut self, source: &ApiSourceRef) {
        for genre in &mut self.sub_genres {
            genre.bind(source);
        }
    }
}
