use crate::{
    error::{GenError, Result},
    interpreter,
    models::{validate_idea, ParsedPromptRecord, PromptOptions},
    provider::{GenerationParameters, GenerativeProvider},
};
use std::sync::Arc;

const PROMPT_MODEL: &str = "gemini-1.5-flash";

/// Turns a short idea into ready-to-use art prompts.
#[derive(Clone)]
pub struct PromptClient {
    provider: Option<Arc<dyn GenerativeProvider>>,
}

impl PromptClient {
    pub fn new(provider: Option<Arc<dyn GenerativeProvider>>) -> Self {
        Self { provider }
    }

    pub async fn generate_prompts(
        &self,
        idea: &str,
        options: &PromptOptions,
    ) -> Result<Vec<ParsedPromptRecord>> {
        let provider = self.provider.as_deref().ok_or_else(|| {
            GenError::MissingCredential("Gemini API key is required".into())
        })?;
        validate_idea(idea)?;

        let instruction = format!(
            "{}\n\n{}",
            build_system_prompt(),
            build_user_prompt(idea.trim(), options)
        );
        let params = GenerationParameters::new()
            .with_temperature(0.8)
            .with_max_output_tokens(2048);

        log::info!(
            "Generating {} prompt(s) in {} style",
            options.count,
            options.art_style
        );
        let response = provider.invoke(PROMPT_MODEL, &instruction, &params).await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(GenError::ResponseError("No text in model response".into()));
        }

        let records = interpreter::parse(&text);
        if records.is_empty() {
            log::warn!("Model output contained no prompt blocks");
            return Err(GenError::ParseError("No prompts found in model output".into()));
        }
        if records.len() != options.count as usize {
            log::debug!(
                "Requested {} prompt(s), model returned {}",
                options.count,
                records.len()
            );
        }

        Ok(records)
    }
}

pub fn build_system_prompt() -> &'static str {
    r#"Bạn là một chuyên gia tạo prompt cho AI Art (Stable Diffusion, Midjourney, DALL-E).
Nhiệm vụ của bạn là chuyển đổi ý tưởng đơn giản thành các prompt chi tiết, chuyên nghiệp.

Quy tắc tạo prompt:
1. Bắt đầu với chủ thể chính
2. Thêm chi tiết về hành động, cảm xúc
3. Mô tả môi trường, bối cảnh
4. Chỉ định phong cách nghệ thuật
5. Thêm thông số kỹ thuật (lighting, composition, quality)
6. Kết thúc với negative prompt (những gì cần tránh)

Định dạng trả về:
**Prompt [số]:**
[Mô tả chi tiết bằng tiếng Anh]

**Mô tả tiếng Việt:**
[Giải thích prompt bằng tiếng Việt để người dùng hiểu]

**Negative Prompt:**
[Những gì cần tránh bằng tiếng Anh]

---"#
}

pub fn build_user_prompt(idea: &str, options: &PromptOptions) -> String {
    format!(
        "Ý tưởng gốc: \"{idea}\"\n\
         Phong cách: {style}\n\
         Mức độ chi tiết: {detail}\n\
         Tỷ lệ khung hình: {ratio}\n\
         Số lượng prompt cần tạo: {count}\n\
         \n\
         Hãy tạo {count} prompt khác nhau cho ý tưởng này, mỗi prompt có góc nhìn và cách diễn đạt khác nhau nhưng cùng phong cách \"{name}\".",
        idea = idea,
        style = options.art_style.phrase(),
        detail = options.detail_level.phrase(),
        ratio = options.aspect_ratio,
        count = options.count,
        name = options.art_style,
    )
}
