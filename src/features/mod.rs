/// 文案：课程摘要、生成、字段提取与 HTML 标记
pub mod caption;
/// 封面合成
pub mod cover;
/// 健康检查
pub mod health;
/// 帖子流程与单轮标题修改
pub mod post;
/// YouTube 链接识别与元信息
pub mod youtube;
