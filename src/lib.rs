#![warn(missing_docs)]

//! # Yandex Music API
//!
//! 一个非官方的 Yandex Music HTTP API 异步 Rust 客户端。
//!
//! ## 主要功能
//!
//! - **账户与内容**: 账户状态、信息流、首页内容块、流派列表。
//! - **实体模型**: 曲目、专辑、艺术家、歌单、播放队列等实体，
//!   水合后可直接发起后续请求（歌词、专辑曲目、队列展开等）。
//! - **搜索**: 按类型搜索并解析「最佳匹配」。
//! - **下载**: 解析带签名的短时效下载直链并保存音频文件。
//! - **歌单管理**: 创建、改名、删除，以及带乐观并发控制的曲目插入。
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use yandex_music_api::{Client, SearchType};
//!
//! async {
//!     let client = Client::new("你的 OAuth 令牌").unwrap();
//!
//!     let search = client
//!         .search("Bohemian Rhapsody", false, SearchType::Track, 0, true)
//!         .await
//!         .unwrap();
//!     if let Some(group) = &search.tracks {
//!         for track in &group.results {
//!             println!("{:?}", track.title);
//!         }
//!     }
//!
//!     let tracks = client.tracks("10994777").await.unwrap();
//!     let lyric = tracks[0].lyric(false).await.unwrap();
//!     println!("{}", lyric.lyrics);
//! };
//! ```
//!
//! ## 实体与延迟加载
//!
//! 经客户端获取的实体持有客户端句柄，可以直接补全内嵌引用：
//!
//! ```rust,no_run
//! use yandex_music_api::Client;
//!
//! async {
//!     let client = Client::new("你的 OAuth 令牌").unwrap();
//!     let album = client.albums_with_tracks("297567").await.unwrap();
//!     // 内嵌了完整曲目列表，这次调用不会发起网络请求
//!     let tracks = album.tracks(false).await.unwrap();
//!     println!("共 {} 首", tracks.len());
//! };
//! ```
//!
//! 直接反序列化得到的实体没有绑定句柄，调用这类方法会返回
//! [`YandexMusicError::Detached`]。

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod request;

pub use client::{Client, PlayAudio};
pub use config::Config;
pub use error::{Result, YandexMusicError};
pub use model::{ApiSource, ApiSourceRef, Ids};
pub use model::landing::LandingBlock;
pub use model::playlist::PlaylistVisibility;
pub use model::search::{BestMatch, SearchType};
