//! History Commands

/// 切换收藏状态命令
#[derive(Debug, Clone)]
pub struct ToggleFavorite {
    pub id: i64,
}
