use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::OpenAiConfig;
use crate::error::AppError;
use crate::http;

use super::extractor::strip_code_fences;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// 组装提示词：要求模型按固定版式输出，首行为 `<b>标题</b>`，次行为副标题。
pub fn build_prompt(course_info: &str) -> String {
    format!(
        "Мне нужно сделать оформление поста для соцсети, в котором будет описан учебный курс, по образцу.\n\
         Вся информация берётся из описания курса:\n\n\
         {course_info}\n\n\
         Формат ответа (HTML для Telegram):\n\
         <b>Короткое название курса</b>\n\
         Подзаголовок одной строкой\n\
         🗓 Год курса\n\
         ⏰ Продолжительность\n\
         🔹 Пункты о содержании курса\n\
         <a href=\"ссылка на курс\">Смотреть курс</a>\n\n\
         Ответ верни без лишних символов, строго по формату."
    )
}

/// OpenAI 兼容 Chat Completions 文案生成器
#[derive(Clone)]
pub struct CaptionGenerator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

impl CaptionGenerator {
    pub fn new(cfg: &OpenAiConfig) -> Result<Self, AppError> {
        let client = http::client_timeout_90s()?.clone();
        Ok(Self::with_client(client, cfg))
    }

    pub fn with_client(client: Client, cfg: &OpenAiConfig) -> Self {
        Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
        }
    }

    /// 课程摘要 → 帖子文案（已去掉代码块标记）。
    pub async fn generate(&self, course_info: &str) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::MissingCredentials("未配置文案生成 API Key".to_string()))?;

        let prompt = build_prompt(course_info);
        tracing::debug!(target: "caption::gpt", "=== 请求 ===\n{}", prompt);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: self.max_tokens,
        };
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(target: "caption::gpt", "文案生成请求失败: {e}");
                AppError::GenerationFailed(e.to_string())
            })?;

        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(|e| AppError::GenerationFailed(e.to_string()))?;
        tracing::debug!(target: "caption::gpt", "=== 原始响应 ({}) ===\n{}", status, raw);

        if !status.is_success() {
            return Err(AppError::GenerationFailed(format!("上游返回 {status}")));
        }

        let parsed: ChatResponse = serde_json::from_str(&raw)
            .map_err(|e| AppError::GenerationFailed(format!("响应无法解析: {e}")))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::GenerationFailed("响应中没有文案".to_string()))?;

        let cleaned = strip_code_fences(&content);
        tracing::debug!(target: "caption::gpt", "=== 清理后文案 ===\n{}", cleaned);
        Ok(cleaned)
    }
}
