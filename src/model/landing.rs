//! 首页（landing）接口支持的内容块类型。

/// `/landing3` 接口支持请求的内容块。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingBlock {
    /// 个性化歌单。
    PersonalPlaylists,
    /// 推广内容。
    Promotions,
    /// 新专辑。
    NewReleases,
    /// 新歌单。
    NewPlaylists,
    /// 混音电台。
    Mixes,
    /// 排行榜。
    Chart,
    /// 艺术家。
    Artists,
    /// 专辑。
    Albums,
    /// 歌单。
    Playlists,
    /// 播放上下文。
    PlayContexts,
}

impl LandingBlock {
    /// 接口使用的字符串形式。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PersonalPlaylists => "personalplaylists",
            Self::Promotions => "promotions",
            Self::NewReleases => "new-releases",
            Self::NewPlaylists => "new-playlists",
            Self::Mixes => "mixes",
            Self::Chart => "chart",
            Self::Artists => "artists",
            Self::Albums => "albums",
            Self::Playlists => "playlists",
            Self::PlayContexts => "play_contexts",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_names() {
        assert_eq!(LandingBlock::PersonalPlaylists.as_str(), "personalplaylists");
        assert_eq!(LandingBlock::NewReleases.as_str(), "new-releases");
        assert_eq!(LandingBlock::PlayContexts.as_str(), "play_contexts");
    }
}
