//! 电台模型。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiSourceRef, Entity};

/// 一个电台及其播放设置，来自 `/rotor/stations/list` 等接口。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Station {
    /// 电台描述。
    pub station: Option<Value>,
    /// 播放设置。
    pub settings: Option<Value>,
    /// 第二代播放设置。
    pub settings2: Option<Value>,
    /// 广告参数。
    pub ad_params: Option<Value>,
    /// 推荐理由。
    pub explanation: Option<String>,
    /// 推荐位标题。
    pub rup_title: Option<String>,
    /// 推荐位描述。
    pub rup_description: Option<String>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Station {
    fn bind(&mut self, _source: &ApiSourceRef) {}
}
