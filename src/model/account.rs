//! 账户相关模型：账户状态、权限、订阅与设置。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiSourceRef, Entity};

/// 账户状态，来自 `/account/status` 接口。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountStatus {
    /// 账户本体。
    pub account: Option<Account>,
    /// 权限信息。
    pub permissions: Option<Permissions>,
    /// 订阅信息。
    pub subscription: Option<Subscription>,
    /// 是否为众包编辑。
    pub subeditor: Option<bool>,
    /// 众包编辑等级。
    pub subeditor_level: Option<u32>,
    /// 是否处于试用预备期。
    pub pretrial_active: Option<bool>,
    /// Masterhub 订阅信息。
    pub masterhub: Option<Value>,
    /// Plus 会员信息。
    pub plus: Option<Value>,
    /// 默认邮箱。
    pub default_email: Option<String>,
    /// 用户哈希。
    pub userhash: Option<String>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for AccountStatus {
    fn bind(&mut self, _source: &ApiSourceRef) {}
}

/// 账户本体信息。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    /// 服务端当前时间。
    pub now: Option<String>,
    /// 用户 id。
    pub uid: Option<u64>,
    /// 登录名。
    pub login: Option<String>,
    /// 地区代码。
    pub region: Option<u32>,
    /// 全名。
    pub full_name: Option<String>,
    /// 姓。
    pub second_name: Option<String>,
    /// 名。
    pub first_name: Option<String>,
    /// 显示名称。
    pub display_name: Option<String>,
    /// 服务是否对该账户可用。
    pub service_available: Option<bool>,
    /// 是否为托管用户。
    pub hosted_user: Option<bool>,
    /// 绑定的电话。
    pub passport_phones: Option<Value>,
    /// 注册时间。
    pub registered_at: Option<String>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 账户权限。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Permissions {
    /// 权限有效期。
    pub until: Option<String>,
    /// 当前生效的权限值。
    pub values: Vec<String>,
    /// 默认权限值。
    #[serde(rename = "default")]
    pub default_values: Vec<String>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 订阅信息。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subscription {
    /// 自动续费的订阅列表。
    pub auto_renewable: Vec<Value>,
    /// 非自动续费订阅的剩余信息。
    pub non_auto_renewable_remainder: Option<Value>,
    /// 是否曾有过任何订阅。
    pub had_any_subscription: Option<bool>,
    /// 是否可以开始试用。
    pub can_start_trial: Option<bool>,
    /// 促销活动标记。
    pub mcdonalds: Option<bool>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 电台功能的账户状态，来自 `/rotor/account/status` 接口。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RotorAccountStatus {
    /// 账户本体。
    pub account: Option<Account>,
    /// 权限信息。
    pub permissions: Option<Permissions>,
    /// 订阅信息。
    pub subscription: Option<Subscription>,
    /// 每小时可跳过的曲目数。
    pub skips_per_hour: Option<u32>,
    /// 是否已有个人电台。
    pub station_exists: Option<bool>,
    /// Plus 会员信息。
    pub plus: Option<Value>,
    /// 付费地区代码。
    pub premium_region: Option<u32>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for RotorAccountStatus {
    fn bind(&mut self, _source: &ApiSourceRef) {}
}

/// 账户的播放器与隐私设置，来自 `/account/settings` 接口。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountSettings {
    /// 用户 id。
    pub uid: Option<u64>,
    /// 是否启用 Last.fm 同步。
    pub last_fm_scrobbling_enabled: Option<bool>,
    /// 是否启用 Facebook 同步。
    pub facebook_scrobbling_enabled: Option<bool>,
    /// 是否启用随机播放。
    pub shuffle_enabled: Option<bool>,
    /// 新曲目是否插入歌单顶部。
    pub add_new_track_on_playlist_top: Option<bool>,
    /// 音量百分比。
    pub volume_percents: Option<u32>,
    /// 音乐库的可见性。
    pub user_music_visibility: Option<String>,
    /// 社交信息的可见性。
    pub user_social_visibility: Option<String>,
    /// 是否关闭广告。
    pub ads_disabled: Option<bool>,
    /// 最后修改时间。
    pub modified: Option<String>,
    /// 是否关闭彩铃推广。
    pub rbt_disabled: Option<bool>,
    /// 界面主题。
    pub theme: Option<String>,
    /// 是否关闭促销信息。
    pub promos_disabled: Option<bool>,
    /// 播放完歌单后是否自动续播电台。
    pub auto_play_radio: Option<bool>,
    /// 是否启用队列同步。
    pub sync_queue_enabled: Option<bool>,
    /// 是否启用儿童模式。
    pub child_mod_enabled: Option<bool>,
    /// 未被识别的其他字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for AccountSettings {
    fn bind(&mut self, _source: &ApiSourceRef) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_status_deserializes() {
        let json = r#"{
            "account": {"uid": 1130000, "login": "user", "serviceAvailable": true},
            "permissions": {"values": ["landing-play"], "default": ["landing-play"]},
            "subscription": {"hadAnySubscription": false},
            "subeditor": false,
            "defaultEmail": "user@example.com"
        }"#;
        let status: AccountStatus = serde_json::from_str(json).unwrap();

        assert_eq!(status.account.as_ref().unwrap().uid, Some(1130000));
        assert_eq!(
            status.permissions.as_ref().unwrap().default_values,
            vec!["landing-play".to_string()]
        );
        assert_eq!(status.default_email.as_deref(), Some("user@example.com"));
    }
}
