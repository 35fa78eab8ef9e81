//! 客户端门面：每个远端接口对应一个方法。
//!
//! 方法把参数翻译成 URL 与表单体，经由 [`Transport`] 发送请求，
//! 解包 `{result, error}` 响应信封，再把结果水合为对应的模型实体。

use std::{
    fmt::Write as _,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use chrono::Utc;
use md5::{Digest, Md5};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::OnceCell;
use tracing::warn;

use crate::{
    config::Config,
    error::{Result, YandexMusicError},
    model::{
        ApiSource, ApiSourceRef, Entity, Ids, de_json, de_list,
        account::{AccountSettings, AccountStatus, RotorAccountStatus},
        album::Album,
        artist::{Artist, ArtistBriefInfo},
        feed::Feed,
        genre::Genre,
        landing::LandingBlock,
        playlist::{Playlist, PlaylistVisibility},
        queue::{Queue, QueueItem},
        search::{Search, SearchType},
        station::Station,
        supplement::Supplement,
        track::{DownloadInfo, Track},
    },
    request::{ApiRequest, Transport},
};

/// 直链签名使用的协议常量。
///
/// 这是从官方客户端逆向得到的固定盐值，属于协议的一部分，
/// 必须逐字节保持一致，不能当作可配置的密钥。
const DIRECT_LINK_SALT: &str = "XGRlBW9FXlekgbPrRHuSiA";

/// 下载信息描述 XML 的字段，由存储节点返回。
#[derive(Debug, Deserialize)]
pub(crate) struct DirectLinkXml {
    /// 存储节点主机名。
    pub host: String,
    /// 文件路径（以 `/` 开头）。
    pub path: String,
    /// 时间戳片段。
    pub ts: String,
    /// 签名字段。
    pub s: String,
}

/// 由描述 XML 与编码格式确定性地拼出下载直链。
pub(crate) fn build_direct_link(info: &DirectLinkXml, codec: &str) -> String {
    let sign = md5_hex(&format!(
        "{DIRECT_LINK_SALT}{}{}",
        info.path.get(1..).unwrap_or_default(),
        info.s
    ));
    format!(
        "https://{}/get-{codec}/{sign}/{}{}",
        info.host, info.ts, info.path
    )
}

fn md5_hex(input: &str) -> String {
    let digest = Md5::digest(input.as_bytes());
    let mut output = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}

/// 一次播放上报的参数，见 [`Client::play_audio`]。
#[derive(Debug, Clone, Default)]
pub struct PlayAudio {
    /// 曲目 id。
    pub track_id: String,
    /// 上报来源的客户端名称。
    pub from: String,
    /// 专辑 id。
    pub album_id: String,
    /// 歌单 id（如果正在播放歌单）。
    pub playlist_id: Option<String>,
    /// 是否从缓存播放。
    pub from_cache: bool,
    /// 本次播放的唯一 id。
    pub play_id: Option<String>,
    /// 曲目总时长（秒）。
    pub track_length_seconds: u32,
    /// 累计已播放时长（秒）。
    pub total_played_seconds: u32,
    /// 播放结束位置（秒）。
    pub end_position_seconds: u32,
}

/// Yandex Music API 客户端。
///
/// 克隆是廉价的：所有克隆共享同一份配置、传输与已缓存的用户 id。
/// 更换令牌后缓存不会失效，如需切换账户请构造新的客户端。
#[derive(Clone)]
pub struct Client {
    config: Arc<RwLock<Config>>,
    transport: Arc<dyn Transport>,
    uid: Arc<OnceCell<u64>>,
}

impl Client {
    /// 使用给定的 OAuth 令牌和默认配置创建客户端。
    pub fn new(token: &str) -> Result<Self> {
        Self::with_config(Config::new(token))
    }

    /// 使用完整配置创建客户端。
    pub fn with_config(config: Config) -> Result<Self> {
        let config = Arc::new(RwLock::new(config));
        let transport = Arc::new(ApiRequest::new(Arc::clone(&config))?);
        Ok(Self {
            config,
            transport,
            uid: Arc::new(OnceCell::new()),
        })
    }

    /// 使用自定义传输创建客户端。
    ///
    /// 主要用于测试中注入伪传输来模拟远端响应。
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            transport,
            uid: Arc::new(OnceCell::new()),
        }
    }

    /// 替换 OAuth 令牌，对后续请求立即生效。
    pub fn update_token(&self, token: &str) {
        self.config
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .update_token(token);
    }

    /// 替换客户端标识串，对后续请求立即生效。
    pub fn update_client(&self, client_id: &str) {
        self.config
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .update_client(client_id);
    }

    fn base_url(&self) -> String {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .base_url
            .clone()
    }

    // ==========================================================
    //  请求与水合辅助
    // ==========================================================

    async fn get_result(&self, url: &str) -> Result<Value> {
        let body = self.transport.get(url).await?;
        extract_result(&body)
    }

    async fn post_result(&self, url: &str, form: &[(String, String)]) -> Result<Value> {
        let body = self.transport.post(url, form).await?;
        extract_result(&body)
    }

    fn source(&self) -> ApiSourceRef {
        Arc::new(self.clone())
    }

    fn hydrate<T: Entity>(&self, value: Value) -> Result<T> {
        de_json(&self.source(), value)
    }

    fn hydrate_list<T: Entity>(&self, value: Value) -> Result<Vec<T>> {
        de_list(&self.source(), value)
    }

    // ==========================================================
    //  账户
    // ==========================================================

    /// 已登录用户的 uid。
    ///
    /// 首次调用拉取一次账户状态并缓存结果；之后直接返回缓存值，
    /// 不再发起请求。没有失效路径，换号请新建客户端。
    pub async fn uid(&self) -> Result<u64> {
        self.uid
            .get_or_try_init(|| async {
                let status = self.account_status().await?;
                status
                    .account
                    .and_then(|account| account.uid)
                    .ok_or_else(|| {
                        YandexMusicError::Internal("账户状态中缺少 uid".to_string())
                    })
            })
            .await
            .map(|uid| *uid)
    }

    /// 账户状态。
    pub async fn account_status(&self) -> Result<AccountStatus> {
        let result = self
            .get_result(&format!("{}/account/status", self.base_url()))
            .await?;
        self.hydrate(result)
    }

    /// 电台功能的账户状态。
    pub async fn rotor_account_status(&self) -> Result<RotorAccountStatus> {
        let result = self
            .get_result(&format!("{}/rotor/account/status", self.base_url()))
            .await?;
        self.hydrate(result)
    }

    /// 账户的播放器与隐私设置。
    pub async fn account_settings(&self) -> Result<AccountSettings> {
        let result = self
            .get_result(&format!("{}/account/settings", self.base_url()))
            .await?;
        self.hydrate(result)
    }

    /// 账户启用的实验性功能开关。
    pub async fn account_experiments(&self) -> Result<Value> {
        self.get_result(&format!("{}/account/experiments", self.base_url()))
            .await
    }

    /// 账户的权限提醒。
    pub async fn permission_alerts(&self) -> Result<Value> {
        self.get_result(&format!("{}/permission-alerts", self.base_url()))
            .await
    }

    // ==========================================================
    //  信息流与首页
    // ==========================================================

    /// 为用户生成的信息流，包含智能歌单。
    pub async fn feed(&self) -> Result<Feed> {
        let result = self.get_result(&format!("{}/feed", self.base_url())).await?;
        self.hydrate(result)
    }

    /// 用户是否已完成口味向导。字段缺失时视为 `false`。
    pub async fn feed_wizard_is_passed(&self) -> Result<bool> {
        let result = self
            .get_result(&format!("{}/feed/wizard/is-passed", self.base_url()))
            .await?;
        Ok(result
            .get("isWizardPassed")
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }

    /// 首页内容块：新专辑、榜单、新歌单等。
    pub async fn landing(&self, blocks: &[LandingBlock]) -> Result<Value> {
        let joined = blocks
            .iter()
            .map(|block| block.as_str())
            .collect::<Vec<_>>()
            .join(",");
        self.get_result(&format!("{}/landing3?blocks={joined}", self.base_url()))
            .await
    }

    /// 全部音乐流派。
    pub async fn genres(&self) -> Result<Vec<Genre>> {
        let result = self
            .get_result(&format!("{}/genres", self.base_url()))
            .await?;
        self.hydrate_list(result)
    }

    // ==========================================================
    //  播放队列
    // ==========================================================

    /// 当前账户在各设备上的播放队列列表。
    pub async fn queues_list(&self) -> Result<Vec<QueueItem>> {
        let result = self
            .get_result(&format!("{}/queues", self.base_url()))
            .await?;
        let queues = result.get("queues").cloned().unwrap_or(Value::Null);
        self.hydrate_list(queues)
    }

    /// 按 id 获取播放队列的完整内容。
    pub async fn queue(&self, queue_id: &str) -> Result<Queue> {
        let result = self
            .get_result(&format!("{}/queues/{queue_id}", self.base_url()))
            .await?;
        self.hydrate(result)
    }

    // ==========================================================
    //  曲目、专辑与艺术家
    // ==========================================================

    /// 按 id 批量获取曲目。接受单个 id 或一组 id，总是返回列表。
    pub async fn tracks(&self, track_ids: impl Into<Ids>) -> Result<Vec<Track>> {
        self.get_list("track", track_ids.into()).await
    }

    /// 按 id 批量获取专辑。
    pub async fn albums(&self, album_ids: impl Into<Ids>) -> Result<Vec<Album>> {
        self.get_list("album", album_ids.into()).await
    }

    /// 按 id 批量获取艺术家。
    pub async fn artists(&self, artist_ids: impl Into<Ids>) -> Result<Vec<Artist>> {
        self.get_list("artist", artist_ids.into()).await
    }

    /// 按 id 批量获取歌单。
    pub async fn playlists_list(&self, playlist_ids: impl Into<Ids>) -> Result<Vec<Playlist>> {
        self.get_list("playlist", playlist_ids.into()).await
    }

    async fn get_list<T: Entity>(&self, object_type: &str, ids: Ids) -> Result<Vec<T>> {
        let mut url = format!("{}/{object_type}s", self.base_url());
        if object_type == "playlist" {
            url.push_str("/list");
        }
        let form = vec![(format!("{object_type}-ids"), ids.join())];
        let result = self.post_result(&url, &form).await?;
        self.hydrate_list(result)
    }

    /// 按 id 获取专辑及其完整曲目列表。
    pub async fn albums_with_tracks(&self, album_id: &str) -> Result<Album> {
        let result = self
            .get_result(&format!("{}/albums/{album_id}/with-tracks", self.base_url()))
            .await?;
        self.hydrate(result)
    }

    /// 艺术家页的汇总信息。
    pub async fn artists_brief_info(&self, artist_id: &str) -> Result<ArtistBriefInfo> {
        let result = self
            .get_result(&format!(
                "{}/artists/{artist_id}/brief-info",
                self.base_url()
            ))
            .await?;
        self.hydrate(result)
    }

    /// 曲目的补充信息（歌词与视频）。
    pub async fn track_supplement(&self, track_id: &str) -> Result<Supplement> {
        let result = self
            .get_result(&format!("{}/tracks/{track_id}/supplement", self.base_url()))
            .await?;
        self.hydrate(result)
    }

    // ==========================================================
    //  下载
    // ==========================================================

    /// 曲目的可下载变体列表。
    ///
    /// `get_direct_links = true` 时只保留 `mp3` 变体，逐个解析出
    /// 下载直链并清空描述 XML 地址。直链约一分钟内有效，取到后
    /// 应立即使用，不要缓存。
    pub async fn tracks_download_info(
        &self,
        track_id: &str,
        get_direct_links: bool,
    ) -> Result<Vec<DownloadInfo>> {
        let result = self
            .get_result(&format!(
                "{}/tracks/{track_id}/download-info",
                self.base_url()
            ))
            .await?;
        let infos: Vec<DownloadInfo> = self.hydrate_list(result)?;
        if !get_direct_links {
            return Ok(infos);
        }

        let mut resolved = Vec::new();
        for mut info in infos {
            if info.codec.as_deref() != Some("mp3") {
                continue;
            }
            let Some(info_url) = info.download_info_url.take() else {
                continue;
            };
            info.direct_link = Some(self.get_direct_link(&info_url, "mp3").await?);
            resolved.push(info);
        }
        Ok(resolved)
    }

    /// 从下载信息描述 XML 解析出下载直链。
    ///
    /// 描述 XML 在获取下载信息后约一分钟内有效，过期后存储节点
    /// 返回 410。
    pub async fn get_direct_link(&self, info_url: &str, codec: &str) -> Result<String> {
        let xml = self.transport.get(info_url).await?;
        let info: DirectLinkXml = quick_xml::de::from_str(&xml)?;
        Ok(build_direct_link(&info, codec))
    }

    /// 把直链指向的文件下载到 `dest`。
    pub async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.transport.download(url, dest).await
    }

    // ==========================================================
    //  搜索
    // ==========================================================

    /// 按文本搜索曲目、专辑、艺术家与歌单。
    pub async fn search(
        &self,
        text: &str,
        nocorrect: bool,
        search_type: SearchType,
        page: u32,
        playlist_in_best: bool,
    ) -> Result<Search> {
        let url = format!(
            "{}/search?text={}&nocorrect={nocorrect}&type={}&page={page}&playlist-in-best={playlist_in_best}",
            self.base_url(),
            urlencoding::encode(text),
            search_type.as_str(),
        );
        let result = self.get_result(&url).await?;
        self.hydrate(result)
    }

    /// 对输入的部分查询文本给出搜索建议。
    pub async fn search_suggest(&self, part: &str) -> Result<Value> {
        self.get_result(&format!(
            "{}/search/suggest?part={}",
            self.base_url(),
            urlencoding::encode(part)
        ))
        .await
    }

    // ==========================================================
    //  歌单
    // ==========================================================

    /// 按 `kind` 获取用户名下的歌单。
    ///
    /// `user_id` 为 `None` 时使用当前登录用户。
    pub async fn users_playlists(
        &self,
        kind: impl Into<Ids>,
        user_id: Option<u64>,
    ) -> Result<Vec<Playlist>> {
        let user = match user_id {
            Some(user) => user,
            None => self.uid().await?,
        };
        let url = format!("{}/users/{user}/playlists", self.base_url());
        let form = vec![("kind".to_string(), kind.into().join())];
        let result = self.post_result(&url, &form).await?;
        self.hydrate_list(result)
    }

    /// 当前用户的全部歌单。
    pub async fn users_playlists_list(&self) -> Result<Vec<Playlist>> {
        let uid = self.uid().await?;
        let result = self
            .get_result(&format!("{}/users/{uid}/playlists/list", self.base_url()))
            .await?;
        self.hydrate_list(result)
    }

    /// 创建歌单。
    pub async fn users_playlists_create(
        &self,
        title: &str,
        visibility: PlaylistVisibility,
    ) -> Result<Playlist> {
        let uid = self.uid().await?;
        let url = format!("{}/users/{uid}/playlists/create", self.base_url());
        let form = vec![
            ("title".to_string(), title.to_string()),
            ("visibility".to_string(), visibility.as_str().to_string()),
        ];
        let result = self.post_result(&url, &form).await?;
        self.hydrate(result)
    }

    /// 删除歌单。
    pub async fn users_playlists_delete(&self, kind: u64) -> Result<Value> {
        let uid = self.uid().await?;
        let url = format!("{}/users/{uid}/playlists/{kind}/delete", self.base_url());
        self.post_result(&url, &[]).await
    }

    /// 修改歌单名称。
    pub async fn users_playlists_name_change(&self, kind: u64, name: &str) -> Result<Playlist> {
        let uid = self.uid().await?;
        let url = format!("{}/users/{uid}/playlists/{kind}/name", self.base_url());
        let form = vec![("value".to_string(), name.to_string())];
        let result = self.post_result(&url, &form).await?;
        self.hydrate(result)
    }

    /// 提交一次歌单差量变更。远端按 `revision` 做乐观并发控制，
    /// 版本过期的提交会被拒绝。
    async fn users_playlists_change(
        &self,
        kind: u64,
        diff: &str,
        revision: u64,
    ) -> Result<Playlist> {
        let uid = self.uid().await?;
        let url = format!("{}/users/{uid}/playlists/{kind}/change", self.base_url());
        let form = vec![
            ("kind".to_string(), kind.to_string()),
            ("revision".to_string(), revision.to_string()),
            ("diff".to_string(), diff.to_string()),
        ];
        let result = self.post_result(&url, &form).await?;
        self.hydrate(result)
    }

    /// 在歌单的 `at` 位置插入一首曲目。
    ///
    /// 未指定 `revision` 时先读取歌单当前修订号再提交（读-改-写）。
    /// 修订号过期时远端直接拒绝，本客户端不做冲突重试，错误原样
    /// 上抛给调用者。
    pub async fn users_playlists_insert_track(
        &self,
        kind: u64,
        track_id: &str,
        album_id: &str,
        at: usize,
        revision: Option<u64>,
    ) -> Result<Playlist> {
        let revision = match revision {
            Some(revision) => revision,
            None => self
                .users_playlists(kind, None)
                .await?
                .first()
                .and_then(|playlist| playlist.revision)
                .ok_or_else(|| {
                    YandexMusicError::Internal(format!("无法获取歌单 {kind} 的当前 revision"))
                })?,
        };

        let diff = json!([{
            "op": "insert",
            "at": at,
            "tracks": [{"id": track_id, "albumId": album_id}],
        }])
        .to_string();

        self.users_playlists_change(kind, &diff, revision).await
    }

    // ==========================================================
    //  喜欢 / 不喜欢
    // ==========================================================

    async fn like_action(&self, object_type: &str, ids: Ids, remove: bool) -> Result<Value> {
        let action = if remove { "remove" } else { "add-multiple" };
        let uid = self.uid().await?;
        let url = format!(
            "{}/users/{uid}/likes/{object_type}s/{action}",
            self.base_url()
        );
        let form = vec![(format!("{object_type}-ids"), ids.join())];
        self.post_result(&url, &form).await
    }

    fn extract_revision(result: &Value) -> Result<u64> {
        result
            .get("revision")
            .and_then(Value::as_u64)
            .ok_or_else(|| YandexMusicError::Internal("响应中缺少 revision 字段".to_string()))
    }

    /// 把曲目加入喜欢列表，返回列表的新修订号。
    pub async fn users_likes_tracks_add(&self, track_ids: impl Into<Ids>) -> Result<u64> {
        let result = self.like_action("track", track_ids.into(), false).await?;
        Self::extract_revision(&result)
    }

    /// 把曲目移出喜欢列表，返回列表的新修订号。
    pub async fn users_likes_tracks_remove(&self, track_ids: impl Into<Ids>) -> Result<u64> {
        let result = self.like_action("track", track_ids.into(), true).await?;
        Self::extract_revision(&result)
    }

    /// 把艺术家加入喜欢列表。
    pub async fn users_likes_artists_add(&self, artist_ids: impl Into<Ids>) -> Result<Value> {
        self.like_action("artist", artist_ids.into(), false).await
    }

    /// 把艺术家移出喜欢列表。
    pub async fn users_likes_artists_remove(&self, artist_ids: impl Into<Ids>) -> Result<Value> {
        self.like_action("artist", artist_ids.into(), true).await
    }

    /// 把歌单加入喜欢列表。
    pub async fn users_likes_playlists_add(&self, playlist_ids: impl Into<Ids>) -> Result<Value> {
        self.like_action("playlist", playlist_ids.into(), false).await
    }

    /// 把歌单移出喜欢列表。
    pub async fn users_likes_playlists_remove(
        &self,
        playlist_ids: impl Into<Ids>,
    ) -> Result<Value> {
        self.like_action("playlist", playlist_ids.into(), true).await
    }

    /// 把专辑加入喜欢列表。
    pub async fn users_likes_albums_add(&self, album_ids: impl Into<Ids>) -> Result<Value> {
        self.like_action("album", album_ids.into(), false).await
    }

    /// 把专辑移出喜欢列表。
    pub async fn users_likes_albums_remove(&self, album_ids: impl Into<Ids>) -> Result<Value> {
        self.like_action("album", album_ids.into(), true).await
    }

    async fn get_likes(&self, object_type: &str) -> Result<Value> {
        let uid = self.uid().await?;
        let url = format!("{}/users/{uid}/likes/{object_type}s", self.base_url());
        let result = self.get_result(&url).await?;
        if object_type == "track" {
            return Ok(result.get("library").cloned().unwrap_or(Value::Null));
        }
        Ok(result)
    }

    /// 喜欢的曲目库。
    pub async fn get_likes_tracks(&self) -> Result<Value> {
        self.get_likes("track").await
    }

    /// 喜欢的专辑列表。
    pub async fn get_likes_albums(&self) -> Result<Value> {
        self.get_likes("album").await
    }

    /// 喜欢的艺术家列表。
    pub async fn get_likes_artists(&self) -> Result<Value> {
        self.get_likes("artist").await
    }

    /// 喜欢的歌单列表。
    pub async fn get_likes_playlists(&self) -> Result<Value> {
        self.get_likes("playlist").await
    }

    /// 不喜欢的曲目库。
    pub async fn get_dislikes_tracks(&self, if_modified_since_revision: u64) -> Result<Value> {
        let uid = self.uid().await?;
        let url = format!(
            "{}/users/{uid}/dislikes/tracks?if_modified_since_revision={if_modified_since_revision}",
            self.base_url()
        );
        let result = self.get_result(&url).await?;
        Ok(result.get("library").cloned().unwrap_or(Value::Null))
    }

    async fn dislike_action(&self, ids: Ids, remove: bool) -> Result<Value> {
        let action = if remove { "remove" } else { "add-multiple" };
        let uid = self.uid().await?;
        let url = format!("{}/users/{uid}/dislikes/tracks/{action}", self.base_url());
        let form = vec![("track-ids".to_string(), ids.join())];
        self.post_result(&url, &form).await
    }

    /// 把曲目加入不喜欢列表。
    pub async fn users_dislikes_tracks_add(&self, track_ids: impl Into<Ids>) -> Result<Value> {
        self.dislike_action(track_ids.into(), false).await
    }

    /// 把曲目移出不喜欢列表。
    pub async fn users_dislikes_tracks_remove(&self, track_ids: impl Into<Ids>) -> Result<Value> {
        self.dislike_action(track_ids.into(), true).await
    }

    // ==========================================================
    //  播放上报与电台
    // ==========================================================

    /// 上报当前曲目的播放状态。
    pub async fn play_audio(&self, report: &PlayAudio) -> Result<()> {
        let uid = self.uid().await?;
        let now = Utc::now().to_rfc3339();
        let form = vec![
            ("track-id".to_string(), report.track_id.clone()),
            ("from-cache".to_string(), report.from_cache.to_string()),
            ("from".to_string(), report.from.clone()),
            (
                "play-id".to_string(),
                report.play_id.clone().unwrap_or_default(),
            ),
            ("uid".to_string(), uid.to_string()),
            ("timestamp".to_string(), now.clone()),
            (
                "track-length-seconds".to_string(),
                report.track_length_seconds.to_string(),
            ),
            (
                "total-played-seconds".to_string(),
                report.total_played_seconds.to_string(),
            ),
            (
                "end-position-seconds".to_string(),
                report.end_position_seconds.to_string(),
            ),
            ("album-id".to_string(), report.album_id.clone()),
            (
                "playlist-id".to_string(),
                report.playlist_id.clone().unwrap_or_default(),
            ),
            ("client-now".to_string(), now),
        ];
        self.post_result(&format!("{}/play-audio", self.base_url()), &form)
            .await?;
        Ok(())
    }

    /// 电台推荐仪表盘。
    pub async fn rotor_stations_dashboard(&self) -> Result<Value> {
        self.get_result(&format!("{}/rotor/stations/dashboard", self.base_url()))
            .await
    }

    /// 全部可用电台。`lang` 为 ISO 639-1 语言代码。
    pub async fn rotor_stations_list(&self, lang: &str) -> Result<Vec<Station>> {
        let result = self
            .get_result(&format!(
                "{}/rotor/stations/list?language={lang}",
                self.base_url()
            ))
            .await?;
        self.hydrate_list(result)
    }

    /// 向流派电台上报一次播放反馈。
    pub async fn rotor_station_genre_feedback(
        &self,
        genre: &str,
        feedback_type: &str,
        from: Option<&str>,
        batch_id: Option<&str>,
        track_id: Option<&str>,
    ) -> Result<Value> {
        let mut url = format!("{}/rotor/station/genre:{genre}/feedback", self.base_url());
        if let Some(batch_id) = batch_id {
            let _ = write!(&mut url, "?batch-id={batch_id}");
        }

        let mut form = vec![
            ("type".to_string(), feedback_type.to_string()),
            ("timestamp".to_string(), Utc::now().to_rfc3339()),
        ];
        if let Some(from) = from {
            form.push(("from".to_string(), from.to_string()));
        }
        if let Some(track_id) = track_id {
            form.push(("trackId".to_string(), track_id.to_string()));
        }
        self.post_result(&url, &form).await
    }
}

#[async_trait::async_trait]
impl ApiSource for Client {
    async fn tracks_by_ids(&self, ids: Ids) -> Result<Vec<Track>> {
        self.tracks(ids).await
    }

    async fn album_with_tracks(&self, album_id: &str) -> Result<Album> {
        self.albums_with_tracks(album_id).await
    }

    async fn queue_by_id(&self, queue_id: &str) -> Result<Queue> {
        self.queue(queue_id).await
    }

    async fn track_supplement(&self, track_id: &str) -> Result<Supplement> {
        Client::track_supplement(self, track_id).await
    }

    async fn direct_link(&self, info_url: &str, codec: &str) -> Result<String> {
        self.get_direct_link(info_url, codec).await
    }

    async fn download_to(&self, url: &str, dest: &Path) -> Result<()> {
        self.download(url, dest).await
    }
}

/// 解包 `{result, error}` 响应信封。
///
/// 2xx 响应也可能在信封里携带业务错误，此时返回
/// [`YandexMusicError::Api`]；正常时取出 `result`，响应体为空
/// 按 `null` 处理。
fn extract_result(body: &str) -> Result<Value> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    let envelope: Value = serde_json::from_str(body)?;
    if let Some(error) = envelope.get("error").filter(|error| !error.is_null()) {
        let name = error
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        warn!("API 返回业务错误: {name}: {message}");
        return Err(YandexMusicError::Api { name, message });
    }
    Ok(envelope.get("result").cloned().unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::classify_status;
    use std::sync::Mutex;

    /// 按 URL 片段路由响应的伪传输。
    ///
    /// 路由值为 `Ok(响应体)` 或 `Err(状态码)`，后者按正式的
    /// 状态分类逻辑转成错误返回。
    struct FakeTransport {
        routes: Vec<(&'static str, std::result::Result<String, u16>)>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn new(routes: Vec<(&'static str, std::result::Result<String, u16>)>) -> Arc<Self> {
            Arc::new(Self {
                routes,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn respond(&self, url: &str) -> Result<String> {
            self.calls.lock().unwrap().push(url.to_string());
            for (fragment, response) in &self.routes {
                if url.contains(fragment) {
                    return match response {
                        Ok(body) => Ok(body.clone()),
                        Err(status) => Err(classify_status(*status, "")),
                    };
                }
            }
            panic!("伪传输没有为 {url} 配置路由");
        }

        fn calls_matching(&self, fragment: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|url| url.contains(fragment))
                .count()
        }
    }

    #[async_trait::async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, url: &str) -> Result<String> {
            self.respond(url)
        }

        async fn post(&self, url: &str, _form: &[(String, String)]) -> Result<String> {
            self.respond(url)
        }

        async fn download(&self, url: &str, _dest: &Path) -> Result<()> {
            self.respond(url).map(|_| ())
        }
    }

    fn client_with(
        routes: Vec<(&'static str, std::result::Result<String, u16>)>,
    ) -> (Client, Arc<FakeTransport>) {
        let transport = FakeTransport::new(routes);
        let client = Client::with_transport(Config::new("test-token"), transport.clone());
        (client, transport)
    }

    const ACCOUNT_STATUS_BODY: &str =
        r#"{"result": {"account": {"uid": 1130000, "login": "user"}}}"#;

    #[tokio::test]
    async fn test_uid_is_memoized() {
        let (client, transport) = client_with(vec![(
            "/account/status",
            Ok(ACCOUNT_STATUS_BODY.to_string()),
        )]);

        assert_eq!(client.uid().await.unwrap(), 1130000);
        assert_eq!(client.uid().await.unwrap(), 1130000);
        assert_eq!(
            transport.calls_matching("/account/status"),
            1,
            "第二次调用应命中缓存，不再请求账户状态"
        );
    }

    #[tokio::test]
    async fn test_soft_error_in_envelope_surfaces_as_api_error() {
        let (client, _transport) = client_with(vec![(
            "/account/status",
            Ok(r#"{"error": {"name": "session-expired", "message": "expired"}}"#.to_string()),
        )]);

        match client.account_status().await {
            Err(YandexMusicError::Api { name, .. }) => assert_eq!(name, "session-expired"),
            other => panic!("期望 Api 错误，得到: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_tracks_preserve_order() {
        let (client, _transport) = client_with(vec![(
            "/tracks",
            Ok(r#"{"result": [{"id": "a"}, {"id": "b"}, {"id": "c"}]}"#.to_string()),
        )]);

        let tracks = client.tracks(vec!["a", "b", "c"]).await.unwrap();
        let ids: Vec<&str> = tracks.iter().map(|track| track.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_insert_track_with_stale_revision_surfaces_error() {
        let (client, _transport) = client_with(vec![
            ("/account/status", Ok(ACCOUNT_STATUS_BODY.to_string())),
            ("/change", Err(409)),
        ]);

        let result = client
            .users_playlists_insert_track(1250, "100", "200", 0, Some(2))
            .await;
        assert!(
            matches!(result, Err(YandexMusicError::Network(_))),
            "过期的 revision 应以错误上抛，而不是静默成功"
        );
    }

    #[tokio::test]
    async fn test_insert_track_fetches_revision_when_absent() {
        let (client, transport) = client_with(vec![
            ("/account/status", Ok(ACCOUNT_STATUS_BODY.to_string())),
            ("/change", Ok(r#"{"result": {"kind": 1250, "revision": 8}}"#.to_string())),
            (
                "/playlists",
                Ok(r#"{"result": [{"kind": 1250, "revision": 7}]}"#.to_string()),
            ),
        ]);

        let playlist = client
            .users_playlists_insert_track(1250, "100", "200", 0, None)
            .await
            .unwrap();
        assert_eq!(playlist.revision, Some(8));
        assert_eq!(
            transport.calls_matching("/playlists"),
            1,
            "未提供 revision 时应先读取歌单当前修订号"
        );
    }

    #[tokio::test]
    async fn test_likes_tracks_add_returns_revision() {
        let (client, _transport) = client_with(vec![
            ("/account/status", Ok(ACCOUNT_STATUS_BODY.to_string())),
            (
                "/likes/tracks/add-multiple",
                Ok(r#"{"result": {"revision": 12}}"#.to_string()),
            ),
        ]);

        let revision = client.users_likes_tracks_add("100:200").await.unwrap();
        assert_eq!(revision, 12);
    }

    const DIRECT_LINK_XML: &str = concat!(
        r#"<download-info>"#,
        r#"<host>s123.storage.yandex.net</host>"#,
        r#"<path>/a/b/c.mp3</path>"#,
        r#"<ts>0005e1b2</ts>"#,
        r#"<region>-1</region>"#,
        r#"<s>abcdef0123456789</s>"#,
        r#"</download-info>"#,
    );

    #[test]
    fn test_build_direct_link_is_deterministic() {
        let info = DirectLinkXml {
            host: "s123.storage.yandex.net".to_string(),
            path: "/a/b/c.mp3".to_string(),
            ts: "0005e1b2".to_string(),
            s: "abcdef0123456789".to_string(),
        };
        assert_eq!(
            build_direct_link(&info, "mp3"),
            "https://s123.storage.yandex.net/get-mp3/f9918b1bf7dd872dcf63bc14ba2823da/0005e1b2/a/b/c.mp3"
        );
    }

    #[tokio::test]
    async fn test_get_direct_link_parses_xml_fixture() {
        let (client, _transport) =
            client_with(vec![("info.xml", Ok(DIRECT_LINK_XML.to_string()))]);

        let link = client
            .get_direct_link("https://storage.example/info.xml", "mp3")
            .await
            .unwrap();
        assert_eq!(
            link,
            "https://s123.storage.yandex.net/get-mp3/f9918b1bf7dd872dcf63bc14ba2823da/0005e1b2/a/b/c.mp3"
        );
    }

    #[tokio::test]
    async fn test_download_link_is_resolved_fresh_each_call() {
        let download_info_body = r#"{"result": [
            {"codec": "mp3", "bitrateInKbps": 320, "downloadInfoUrl": "https://storage.example/info.xml"}
        ]}"#;
        let (client, transport) = client_with(vec![
            ("/download-info", Ok(download_info_body.to_string())),
            ("info.xml", Ok(DIRECT_LINK_XML.to_string())),
        ]);

        let infos = client.tracks_download_info("42", false).await.unwrap();
        infos[0].download_link().await.unwrap();
        infos[0].download_link().await.unwrap();
        assert_eq!(
            transport.calls_matching("info.xml"),
            2,
            "直链时效很短，每次调用都应重新解析"
        );
    }

    #[tokio::test]
    async fn test_album_without_id_does_not_fetch_tracks() {
        let (client, transport) = client_with(vec![(
            "/albums",
            Ok(r#"{"result": [{"title": "No Id"}]}"#.to_string()),
        )]);

        let albums = client.albums("x").await.unwrap();
        let result = albums[0].tracks(false).await;
        assert!(
            matches!(result, Err(YandexMusicError::Internal(_))),
            "缺少 id 的专辑应直接报错"
        );
        assert_eq!(
            transport.calls_matching("with-tracks"),
            0,
            "不应向远端发出补全请求"
        );
    }

    #[tokio::test]
    async fn test_download_info_resolves_only_mp3() {
        let download_info_body = r#"{"result": [
            {"codec": "mp3", "bitrateInKbps": 320, "downloadInfoUrl": "https://storage.example/info.xml"},
            {"codec": "aac", "bitrateInKbps": 128, "downloadInfoUrl": "https://storage.example/other.xml"}
        ]}"#;
        let (client, _transport) = client_with(vec![
            ("/download-info", Ok(download_info_body.to_string())),
            ("info.xml", Ok(DIRECT_LINK_XML.to_string())),
        ]);

        let infos = client.tracks_download_info("42", true).await.unwrap();
        assert_eq!(infos.len(), 1, "应只保留 mp3 变体");
        assert!(infos[0].direct_link.as_ref().unwrap().contains("/get-mp3/"));
        assert!(
            infos[0].download_info_url.is_none(),
            "解析出直链后应清空描述 XML 地址"
        );
    }

    #[tokio::test]
    async fn test_lazy_supplement_is_memoized_and_force_refetches() {
        let (client, transport) = client_with(vec![
            (
                "/tracks/100/supplement",
                Ok(r#"{"result": {"lyric": {"lyrics": "la"}, "videos": []}}"#.to_string()),
            ),
            (
                "/tracks",
                Ok(r#"{"result": [{"id": "100", "title": "x"}]}"#.to_string()),
            ),
        ]);

        let tracks = client.tracks("100").await.unwrap();
        let track = &tracks[0];

        let first = track.lyric(false).await.unwrap();
        assert_eq!(first.lyrics, "la");
        track.lyric(false).await.unwrap();
        assert_eq!(
            transport.calls_matching("/supplement"),
            1,
            "重复访问应命中缓存"
        );

        track.lyric(true).await.unwrap();
        assert_eq!(
            transport.calls_matching("/supplement"),
            2,
            "force 应强制重新拉取"
        );
    }

    #[tokio::test]
    async fn test_queue_resolves_track_refs() {
        let (client, transport) = client_with(vec![
            (
                "/queues/q1",
                Ok(r#"{"result": {
                    "id": "q1",
                    "tracks": [{"trackId": "1", "albumId": "10"}, {"trackId": "2", "albumId": "10"}],
                    "currentIndex": 1
                }}"#
                .to_string()),
            ),
            (
                "/queues",
                Ok(r#"{"result": {"queues": [{"id": "q1", "modified": "2024-01-01T00:00:00Z"}]}}"#
                    .to_string()),
            ),
            (
                "/tracks",
                Ok(r#"{"result": [{"id": "1", "title": "one"}, {"id": "2", "title": "two"}]}"#
                    .to_string()),
            ),
        ]);

        let queues = client.queues_list().await.unwrap();
        assert_eq!(queues.len(), 1);

        let queue = queues[0].fetch_queue().await.unwrap();
        let current = queue.current_track().await.unwrap();
        assert_eq!(current.title.as_deref(), Some("two"));

        queue.tracks(false).await.unwrap();
        assert_eq!(
            transport.calls_matching("/tracks?"),
            0,
            "不应出现带查询串的曲目请求"
        );
        assert_eq!(
            transport.calls_matching("/tracks"),
            1,
            "曲目引用应只经一次批量查询展开"
        );
    }

    #[tokio::test]
    async fn test_feed_wizard_defaults_to_false() {
        let (client, _transport) = client_with(vec![(
            "/feed/wizard/is-passed",
            Ok(r#"{"result": {}}"#.to_string()),
        )]);

        assert!(!client.feed_wizard_is_passed().await.unwrap());
    }

    // ==========================================================
    //  真实接口测试（需要网络与令牌，默认跳过）
    // ==========================================================

    fn init_tracing() {
        use tracing_subscriber::{EnvFilter, FmtSubscriber};
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,yandex_music_api=trace"));
        let _ = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }

    fn live_client() -> Client {
        init_tracing();
        let token = std::env::var("YANDEX_MUSIC_TOKEN").unwrap_or_default();
        Client::new(&token).unwrap()
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_account_status() {
        let client = live_client();
        let status = client.account_status().await.unwrap();
        println!("✅ 账户: {:?}", status.account.map(|a| a.login));
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_search() {
        let client = live_client();
        let search = client
            .search("Queen", false, SearchType::All, 0, true)
            .await
            .unwrap();
        match search.best().unwrap() {
            crate::model::search::BestMatch::None => println!("没有最佳匹配"),
            best => println!("✅ 最佳匹配: {best:?}"),
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_genres() {
        let client = live_client();
        let genres = client.genres().await.unwrap();
        assert!(!genres.is_empty());
        println!("✅ 共 {} 个流派", genres.len());
    }
}
